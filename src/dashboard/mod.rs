pub mod catalog;
pub mod checkout;
pub mod manage_users;
pub mod overview;
pub mod workflow;

pub use catalog::{filter_scholarships, CatalogView, CATALOG_PAGE_SIZE};
pub use checkout::{Checkout, PaymentConfirmation, PendingCheckout};
pub use manage_users::{filter_users, RoleFilter};
pub use overview::{Analytics, Bucket, PortalReport, StatusCounts, UserOverview};
pub use workflow::{ApplicationWorkflow, ReviewDecision};
