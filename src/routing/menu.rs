use crate::core::capitalize;
use crate::models::Role;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MenuLink {
    pub label: &'static str,
    pub path: &'static str,
}

const fn link(label: &'static str, path: &'static str) -> MenuLink {
    MenuLink { label, path }
}

const USER_LINKS: &[MenuLink] = &[
    link("My Profile", "/dashboard/myProfile"),
    link("My Applications", "/dashboard/applications"),
    link("My Reviews", "/dashboard/myReviews"),
    link("Overview", "/dashboard/userOverview"),
];

const MODERATOR_LINKS: &[MenuLink] = &[
    link("My Profile", "/dashboard/myProfile"),
    link("Manage Scholarships", "/dashboard/manageScholarships"),
    link("Add Scholarship", "/dashboard/addScholarships"),
    link("All Applied Scholarships", "/dashboard/allAppliedScholarship"),
    link("All Reviews", "/dashboard/allReviews"),
    link("Overview", "/dashboard/moderatorOverview"),
];

const ADMIN_LINKS: &[MenuLink] = &[
    link("Admin Profile", "/dashboard/myProfile"),
    link("Manage Users", "/dashboard/manageUsers"),
    link("Add Scholarship", "/dashboard/addScholarshipAdmin"),
    link("Manage Applied Applications", "/dashboard/manageAppliedApplication"),
    link("Manage Scholarships", "/dashboard/manageScholarshipsAdmin"),
    link("Manage Reviews", "/dashboard/manageReviews"),
    link("Analytics", "/dashboard/analytics"),
];

/// Sidebar of the dashboard layout. Guests only get the way home.
pub fn dashboard_links(role: Option<Role>) -> &'static [MenuLink] {
    match role {
        Some(Role::User) => USER_LINKS,
        Some(Role::Moderator) => MODERATOR_LINKS,
        Some(Role::Admin) => ADMIN_LINKS,
        None => &[],
    }
}

/// Badge shown next to the avatar.
pub fn role_badge(role: Option<Role>) -> String {
    capitalize(role.map(|r| r.as_str()).unwrap_or("guest"))
}
