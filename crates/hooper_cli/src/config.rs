use std::{
    env,
    net::{IpAddr, Ipv4Addr},
};

use hooper_agent::Session;
use hooper_chat::UserId;

use crate::error::{Error, Result};

/// Environment-driven configuration.
///
/// Required values are validated up front; a missing model API key aborts
/// before any turn is submitted rather than failing mid-request.
#[derive(Debug, Clone)]
pub(crate) struct Config {
    pub api_key: Option<String>,
    pub db_path: String,
    pub model: String,
    pub user: Option<(UserId, String)>,
    pub openai_base_url: Option<String>,
    pub espn_base_url: Option<String>,
}

impl Config {
    pub(crate) fn from_env() -> Result<Self> {
        let user = match env::var("HOOPER_USER").ok() {
            Some(value) => {
                let id = value.parse::<UserId>().map_err(|_| Error::InvalidEnv {
                    name: "HOOPER_USER",
                    value,
                })?;
                let email =
                    env::var("HOOPER_EMAIL").unwrap_or_else(|_| "unknown@localhost".to_owned());
                Some((id, email))
            }
            None => None,
        };

        Ok(Self {
            api_key: env::var("OPENAI_API_KEY").ok(),
            db_path: env::var("HOOPER_DB").unwrap_or_else(|_| "hooper.db".to_owned()),
            model: env::var("HOOPER_MODEL").unwrap_or_else(|_| "gpt-3.5-turbo".to_owned()),
            user,
            openai_base_url: env::var("OPENAI_BASE_URL").ok(),
            espn_base_url: env::var("ESPN_BASE_URL").ok(),
        })
    }

    pub(crate) fn require_api_key(&self) -> Result<&str> {
        self.api_key
            .as_deref()
            .ok_or(Error::MissingEnv("OPENAI_API_KEY"))
    }

    /// The session this process acts as: the configured user, or an
    /// anonymous local session.
    pub(crate) fn session(&self) -> Session {
        match &self.user {
            Some((id, email)) => Session::user(*id, email.clone()),
            None => Session::anonymous(IpAddr::V4(Ipv4Addr::LOCALHOST)),
        }
    }
}
