use crate::models::Role;
use crate::routing::navigator::Location;

/// Access check in front of a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Guard {
    Public,
    Authenticated,
    Moderator,
    Admin,
}

/// Everything a guard looks at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GuardInput {
    pub signed_in: bool,
    pub auth_loading: bool,
    pub role: Option<Role>,
    pub role_loading: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    Render,
    Loading,
    Redirect(Location),
}

impl Guard {
    pub fn needs_role(&self) -> bool {
        matches!(self, Guard::Moderator | Guard::Admin)
    }

    /// Admins can reach everything moderators can.
    pub fn admits(&self, role: Role) -> bool {
        match self {
            Guard::Public | Guard::Authenticated => true,
            Guard::Moderator => match role {
                Role::Moderator | Role::Admin => true,
                Role::User => false,
            },
            Guard::Admin => match role {
                Role::Admin => true,
                Role::User | Role::Moderator => false,
            },
        }
    }

    pub fn evaluate(&self, input: &GuardInput, path: &str) -> GuardDecision {
        match self {
            Guard::Public => GuardDecision::Render,
            Guard::Authenticated => {
                if input.auth_loading {
                    GuardDecision::Loading
                } else if !input.signed_in {
                    GuardDecision::Redirect(Location::login(Some(path)))
                } else {
                    GuardDecision::Render
                }
            }
            Guard::Moderator | Guard::Admin => {
                if input.auth_loading || input.role_loading {
                    return GuardDecision::Loading;
                }
                // an unknown or failed role lookup fails closed
                match (input.signed_in, input.role) {
                    (true, Some(role)) if self.admits(role) => GuardDecision::Render,
                    _ => GuardDecision::Redirect(Location::forbidden(Some(path))),
                }
            }
        }
    }
}
