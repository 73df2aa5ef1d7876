//! Opaque identifiers for chats, messages, tool calls and users.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::Error;

macro_rules! id_type {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(
            Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Generate a fresh random id.
            #[must_use]
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.debug_tuple(stringify!($name)).field(&self.to_string()).finish()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }

        impl FromStr for $name {
            type Err = Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                s.parse::<Uuid>()
                    .map(Self)
                    .map_err(|_| Error::InvalidId(s.to_owned()))
            }
        }
    };
}

id_type! {
    /// Identifies one conversation, assigned at creation and immutable
    /// thereafter.
    ChatId
}

id_type! {
    /// Identifies one message within a conversation.
    MessageId
}

id_type! {
    /// Pairs a tool invocation with its result.
    ToolCallId
}

id_type! {
    /// Identifies the owning user of a transcript.
    UserId
}
