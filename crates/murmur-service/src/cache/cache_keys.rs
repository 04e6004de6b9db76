//! Cache key generators for consistent key naming.
//!
//! Every key names exactly one entity, so invalidation is a single delete.

use murmur_core::{AccountId, PostId};

/// Key of a cached profile.
#[must_use]
pub fn profile(id: AccountId) -> String {
    format!("profile-{}", id)
}

/// Key of a cached post detail.
#[must_use]
pub fn post_detail(id: PostId) -> String {
    format!("post-detail-{}", id)
}

/// Key of a revocation marker for a session token.
#[must_use]
pub fn revoked_token(token: &str) -> String {
    format!("revoked-{}", token)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_key() {
        assert_eq!(profile(AccountId::new(42)), "profile-42");
    }

    #[test]
    fn test_post_detail_key() {
        assert_eq!(post_detail(PostId::new(7)), "post-detail-7");
    }

    #[test]
    fn test_revoked_token_key() {
        assert_eq!(revoked_token("abc.def.ghi"), "revoked-abc.def.ghi");
    }
}
