//! Profile entity and partial update.

use crate::AccountId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Public profile of an account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub id: AccountId,
    pub fullname: String,
    pub phone: Option<String>,
    pub img: Option<String>,
    pub updated_at: DateTime<Utc>,
}

/// Partial profile update. `None` leaves the stored column unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfilePatch {
    pub fullname: Option<String>,
    pub phone: Option<String>,
    pub img: Option<String>,
}

impl ProfilePatch {
    /// Returns true when no field would change.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.fullname.is_none() && self.phone.is_none() && self.img.is_none()
    }

    /// Applies the patch to an in-memory profile.
    pub fn apply_to(&self, profile: &mut Profile) {
        if let Some(fullname) = &self.fullname {
            profile.fullname.clone_from(fullname);
        }
        if let Some(phone) = &self.phone {
            profile.phone = Some(phone.clone());
        }
        if let Some(img) = &self.img {
            profile.img = Some(img.clone());
        }
    }
}

/// Compact profile used in follower lists and post authorship.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileSummary {
    pub id: AccountId,
    pub fullname: String,
    pub img: Option<String>,
}

impl From<&Profile> for ProfileSummary {
    fn from(profile: &Profile) -> Self {
        Self {
            id: profile.id,
            fullname: profile.fullname.clone(),
            img: profile.img.clone(),
        }
    }
}
