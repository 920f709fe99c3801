use std::str::FromStr;

use crate::models::{Role, UserProfile};

/// Role dropdown on the manage-users page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RoleFilter {
    #[default]
    All,
    Only(Role),
}

impl FromStr for RoleFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Ok(RoleFilter::All);
        }
        s.parse().map(RoleFilter::Only)
    }
}

impl RoleFilter {
    pub fn admits(&self, user: &UserProfile) -> bool {
        match self {
            RoleFilter::All => true,
            RoleFilter::Only(role) => user.role() == Some(*role),
        }
    }
}

pub fn filter_users(users: &[UserProfile], filter: RoleFilter) -> Vec<&UserProfile> {
    users.iter().filter(|u| filter.admits(u)).collect()
}
