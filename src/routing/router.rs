use std::collections::HashMap;
use std::sync::Arc;

use super::guards::{GuardDecision, GuardInput};
use super::navigator::{Location, Navigator};
use super::table::{Layout, Page, RouteMatch, RouteTable};
use crate::models::Role;
use crate::session::{AuthSession, RoleResolver, RoleState};

#[derive(Debug, Clone, PartialEq)]
pub struct RenderedRoute {
    pub layout: Layout,
    pub page: Page,
    pub params: HashMap<String, String>,
    /// Role of the viewer when the page needed one.
    pub role: Option<Role>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum NavigationOutcome {
    Render(RenderedRoute),
    Loading,
    Redirect(Location),
    NotFound,
}

/// Route table → guard → page.
pub struct Router {
    table: &'static RouteTable,
    auth: Arc<AuthSession>,
    roles: Arc<RoleResolver>,
    navigator: Arc<Navigator>,
}

impl Router {
    pub fn new(auth: Arc<AuthSession>, roles: Arc<RoleResolver>, navigator: Arc<Navigator>) -> Self {
        Self {
            table: RouteTable::global(),
            auth,
            roles,
            navigator,
        }
    }

    /// Resolve `path` for the current session. Renders and redirects move
    /// the navigator; a loading outcome leaves it where it was.
    #[tracing::instrument(name = "Resolve route", skip(self))]
    pub async fn resolve(&self, path: &str) -> NavigationOutcome {
        let found = match self.table.match_path(path) {
            Some(found) => found,
            None => {
                tracing::info!("no route matches");
                self.navigator.navigate(Location::new(path));
                return NavigationOutcome::NotFound;
            }
        };

        let auth_loading = self.auth.is_loading().await;
        let signed_in = self.auth.current().await.is_some();
        let role_state = if found.guard.needs_role() || found.page == Page::DashboardHome {
            self.roles.resolve(&self.auth).await
        } else {
            RoleState::anonymous()
        };

        let input = GuardInput {
            signed_in,
            auth_loading,
            role: role_state.role,
            role_loading: role_state.loading,
        };

        match found.guard.evaluate(&input, path) {
            GuardDecision::Loading => NavigationOutcome::Loading,
            GuardDecision::Redirect(location) => self.redirect(location),
            GuardDecision::Render => self.render(found, path, role_state),
        }
    }

    fn render(&self, found: RouteMatch, path: &str, role_state: RoleState) -> NavigationOutcome {
        let page = if found.page == Page::DashboardHome {
            if role_state.loading {
                return NavigationOutcome::Loading;
            }
            match role_state.role {
                Some(Role::User) => Page::UserDashboard,
                Some(Role::Moderator) => Page::ModeratorDashboard,
                Some(Role::Admin) => Page::AdminDashboard,
                None => return self.redirect(Location::forbidden(Some(path))),
            }
        } else {
            found.page
        };

        self.navigator.navigate(Location::new(path));
        NavigationOutcome::Render(RenderedRoute {
            layout: found.layout,
            page,
            params: found.params,
            role: role_state.role,
        })
    }

    fn redirect(&self, location: Location) -> NavigationOutcome {
        self.navigator.navigate(location.clone());
        NavigationOutcome::Redirect(location)
    }
}
