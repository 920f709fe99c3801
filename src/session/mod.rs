pub mod identity;
mod provider;
pub mod role;

pub use identity::{AuthUser, FirebaseIdentity, IdentityProvider, ProfileUpdate};
pub use provider::{AuthSession, Session};
pub use role::{RoleResolver, RoleState};
