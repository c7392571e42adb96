//! Typed identifiers for submissions, quotes, carriers and parties
//!
//! Each id wraps a UUID and displays with a short prefix (`SUB-…`, `QTE-…`).
//! Parsing accepts either the prefixed or the bare UUID form. JSON carries
//! the bare UUID.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

macro_rules! define_id {
    ($name:ident, $prefix:literal) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Creates a new time-ordered identifier (v7)
            pub fn new() -> Self {
                Self(Uuid::now_v7())
            }

            /// Creates from an existing UUID
            pub fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Returns the underlying UUID
            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }

            /// Returns the identifier prefix for display
            pub fn prefix() -> &'static str {
                $prefix
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}-{}", $prefix, self.0)
            }
        }

        impl FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                // Strip prefix if present
                let uuid_str = s.strip_prefix(concat!($prefix, "-")).unwrap_or(s);
                Ok(Self(Uuid::parse_str(uuid_str)?))
            }
        }

        impl From<Uuid> for $name {
            fn from(uuid: Uuid) -> Self {
                Self(uuid)
            }
        }

        impl From<$name> for Uuid {
            fn from(id: $name) -> Uuid {
                id.0
            }
        }
    };
}

// Submission workflow identifiers
define_id!(SubmissionId, "SUB");
define_id!(DocumentId, "DOC");
define_id!(EnvelopeId, "ENV");

// Quote identifiers
define_id!(QuoteId, "QTE");
define_id!(CarrierId, "CAR");

// Parties
define_id!(AgencyId, "AGY");
define_id!(UserId, "USR");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_submission_id_display() {
        let id = SubmissionId::new();
        assert!(id.to_string().starts_with("SUB-"));
    }

    #[test]
    fn test_id_parsing_accepts_bare_uuid() {
        let uuid = Uuid::new_v4();
        let parsed: QuoteId = uuid.to_string().parse().unwrap();
        assert_eq!(*parsed.as_uuid(), uuid);
    }

    #[test]
    fn test_id_parsing_rejects_foreign_prefix() {
        let carrier = CarrierId::new();
        assert!(carrier.to_string().parse::<QuoteId>().is_err());
    }
}
