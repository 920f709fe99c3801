pub mod guards;
pub mod menu;
pub mod navigator;
mod router;
pub mod table;

pub use guards::{Guard, GuardDecision, GuardInput};
pub use navigator::{Location, Navigator};
pub use router::{NavigationOutcome, RenderedRoute, Router};
pub use table::{Layout, Page, RouteMatch, RouteTable};
