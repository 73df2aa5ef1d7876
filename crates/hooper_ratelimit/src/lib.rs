//! Sliding-window admission control for turn submission.
//!
//! Each identity class carries its own quota; admission is evaluated
//! synchronously against a shared counter map and rejected calls are not
//! retried. The caller is responsible for surfacing a rate-limit message
//! and must not mutate conversation state on rejection.

use std::{
    collections::HashMap,
    fmt,
    net::IpAddr,
    time::{Duration, SystemTime, UNIX_EPOCH},
};

use hooper_chat::UserId;
use parking_lot::Mutex;
use tracing::debug;

/// Authenticated identities may submit 10 turns per rolling 5 minutes.
pub const AUTHENTICATED_QUOTA: Quota = Quota {
    limit: 10,
    window: Duration::from_secs(5 * 60),
};

/// Anonymous identities may submit 5 turns per rolling 5 days.
pub const ANONYMOUS_QUOTA: Quota = Quota {
    limit: 5,
    window: Duration::from_secs(5 * 24 * 60 * 60),
};

/// The key a submission is counted under. Not persisted; lives only as a
/// counter key for the duration of its window.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Identity {
    /// An authenticated user.
    User(UserId),

    /// An anonymous caller, keyed by address.
    Ip(IpAddr),
}

impl Identity {
    #[must_use]
    pub const fn quota(&self) -> Quota {
        match self {
            Self::User(_) => AUTHENTICATED_QUOTA,
            Self::Ip(_) => ANONYMOUS_QUOTA,
        }
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::User(id) => write!(f, "user:{id}"),
            Self::Ip(addr) => write!(f, "ip:{addr}"),
        }
    }
}

/// A per-class admission quota over a rolling window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quota {
    pub limit: u32,
    pub window: Duration,
}

/// Sliding-window rate limiter.
///
/// Uses two-bucket weighted counting: the effective count is the current
/// fixed window's count plus the previous window's count weighted by how
/// much of the previous window still overlaps the rolling one. Admission
/// requires the effective count to be strictly below the quota limit;
/// exactly at quota is a rejection.
#[derive(Debug, Default)]
pub struct RateLimiter {
    windows: Mutex<HashMap<Identity, Window>>,
}

#[derive(Debug, Clone, Copy)]
struct Window {
    index: u128,
    current: u32,
    previous: u32,
}

impl RateLimiter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Admit or reject one submission for the given identity.
    ///
    /// Admitted calls are counted; rejected calls are not.
    #[must_use]
    pub fn check(&self, identity: &Identity) -> bool {
        self.check_at(identity, SystemTime::now())
    }

    /// Clock-explicit variant of [`check`](Self::check).
    #[must_use]
    pub fn check_at(&self, identity: &Identity, now: SystemTime) -> bool {
        let quota = identity.quota();
        let elapsed = now
            .duration_since(UNIX_EPOCH)
            .unwrap_or(Duration::ZERO)
            .as_millis();
        let window_len = quota.window.as_millis();
        let index = elapsed / window_len;

        let mut windows = self.windows.lock();
        let window = windows.entry(identity.clone()).or_insert(Window {
            index,
            current: 0,
            previous: 0,
        });

        // Slide the buckets forward if the clock has moved past the window
        // the counters were recorded in.
        if window.index != index {
            window.previous = if window.index + 1 == index {
                window.current
            } else {
                0
            };
            window.current = 0;
            window.index = index;
        }

        // Fraction of the previous fixed window still inside the rolling
        // window.
        #[allow(clippy::cast_precision_loss)]
        let overlap = 1.0 - (elapsed % window_len) as f64 / window_len as f64;
        let effective = f64::from(window.previous) * overlap + f64::from(window.current);

        if effective >= f64::from(quota.limit) {
            debug!(%identity, effective, limit = quota.limit, "Admission rejected.");
            return false;
        }

        window.current += 1;
        true
    }
}
