//! Typed ID wrappers for domain entities.
//!
//! Identifiers are allocated by the relational store (`BIGSERIAL`), so each
//! wrapper carries an `i64` rather than generating its own value.

use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};
use std::str::FromStr;

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl $name {
            /// Wraps a raw identifier.
            #[must_use]
            pub const fn new(id: i64) -> Self {
                Self(id)
            }

            /// Returns the raw identifier.
            #[must_use]
            pub const fn into_inner(self) -> i64 {
                self.0
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = std::num::ParseIntError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                s.parse::<i64>().map(Self)
            }
        }

        impl From<i64> for $name {
            fn from(id: i64) -> Self {
                Self(id)
            }
        }

        impl From<$name> for i64 {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_id!(
    /// Identifier shared by an account and its profile.
    AccountId
);

define_id!(
    /// Identifier of a post.
    PostId
);

define_id!(
    /// Identifier of a comment.
    CommentId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_account_id_parse_and_display() {
        let id: AccountId = "42".parse().unwrap();
        assert_eq!(id, AccountId::new(42));
        assert_eq!(id.to_string(), "42");
        assert!("abc".parse::<AccountId>().is_err());
    }

    #[test]
    fn test_id_serializes_transparently() {
        let json = serde_json::to_string(&PostId::new(7)).unwrap();
        assert_eq!(json, "7");
        let back: PostId = serde_json::from_str(&json).unwrap();
        assert_eq!(back.into_inner(), 7);
    }
}
