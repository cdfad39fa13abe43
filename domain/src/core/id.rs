//! Identifier value objects.
//!
//! Every entity carries a short random id. Ids are plain strings on the
//! wire but distinct types in code, so a proposal id can never be passed
//! where a member id is expected.

use serde::{Deserialize, Serialize};

/// Length of generated ids. Short enough to quote in chat messages,
/// long enough that collisions within one squad are not a practical concern.
const SHORT_ID_LEN: usize = 8;

fn short_id() -> String {
    let mut id = uuid::Uuid::new_v4().simple().to_string();
    id.truncate(SHORT_ID_LEN);
    id
}

macro_rules! id_type {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Creates an id from an existing string.
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Generates a new random id.
            pub fn generate() -> Self {
                Self(short_id())
            }

            /// Returns the id as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self::new(s)
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

id_type!(
    /// Unique identifier for a squad (the isolation boundary).
    SquadId
);
id_type!(
    /// Unique identifier for a member. A member who leaves and rejoins
    /// receives a fresh id; the old one stays attached to past messages
    /// and votes.
    MemberId
);
id_type!(
    /// Unique identifier for a channel message.
    MessageId
);
id_type!(
    /// Unique identifier for a commit proposal.
    ProposalId
);
id_type!(
    /// Unique identifier for a canonical-context entry.
    EntryId
);
