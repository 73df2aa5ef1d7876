use std::net::IpAddr;

use hooper_chat::UserId;
use hooper_ratelimit::Identity;

/// The caller's identity for one request.
///
/// Produced by the hosting authentication service (session cookie
/// exchange); its presence determines whether turns are persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Session {
    User { id: UserId, email: String },
    Anonymous { ip: IpAddr },
}

impl Session {
    #[must_use]
    pub fn user(id: UserId, email: impl Into<String>) -> Self {
        Self::User {
            id,
            email: email.into(),
        }
    }

    #[must_use]
    pub const fn anonymous(ip: IpAddr) -> Self {
        Self::Anonymous { ip }
    }

    /// The owning user id, if authenticated.
    #[must_use]
    pub const fn user_id(&self) -> Option<UserId> {
        match self {
            Self::User { id, .. } => Some(*id),
            Self::Anonymous { .. } => None,
        }
    }

    /// The key this session's submissions are rate limited under.
    #[must_use]
    pub const fn rate_limit_identity(&self) -> Identity {
        match self {
            Self::User { id, .. } => Identity::User(*id),
            Self::Anonymous { ip } => Identity::Ip(*ip),
        }
    }
}
