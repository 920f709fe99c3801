use once_cell::sync::Lazy;
use std::collections::HashMap;

use super::guards::Guard;

/// Shell a page renders inside.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    Root,
    Auth,
    Dashboard,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Home,
    Login,
    Register,
    AllScholarships,
    AboutUs,
    Media,
    ScholarshipDetails,
    Payment,
    Forbidden,
    DashboardHome,
    // user
    Applications,
    MyProfile,
    MyReviews,
    UserOverview,
    // moderator
    AddScholarships,
    ManageScholarships,
    AllReviews,
    AllAppliedScholarship,
    ModeratorOverview,
    // admin
    AddScholarshipAdmin,
    ManageUsers,
    ManageReviews,
    ManageScholarshipsAdmin,
    ManageAppliedApplication,
    Analytics,
    // role-specific dashboard homes
    UserDashboard,
    ModeratorDashboard,
    AdminDashboard,
}

#[derive(Debug, Clone)]
pub struct RouteEntry {
    pub pattern: &'static str,
    pub layout: Layout,
    pub page: Page,
    pub guard: Guard,
    segments: Vec<Segment>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Static(&'static str),
    Param(&'static str),
}

#[derive(Debug, Clone, PartialEq)]
pub struct RouteMatch {
    pub pattern: &'static str,
    pub layout: Layout,
    pub page: Page,
    pub guard: Guard,
    pub params: HashMap<String, String>,
}

impl RouteMatch {
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }
}

impl RouteEntry {
    fn new(pattern: &'static str, layout: Layout, page: Page, guard: Guard) -> Self {
        let segments = pattern
            .split('/')
            .filter(|s| !s.is_empty())
            .map(|s| match s.strip_prefix(':') {
                Some(name) => Segment::Param(name),
                None => Segment::Static(s),
            })
            .collect();
        Self {
            pattern,
            layout,
            page,
            guard,
            segments,
        }
    }

    fn matches(&self, parts: &[&str]) -> Option<HashMap<String, String>> {
        if parts.len() != self.segments.len() {
            return None;
        }
        let mut params = HashMap::new();
        for (segment, part) in self.segments.iter().zip(parts) {
            match segment {
                Segment::Static(expected) if expected.eq_ignore_ascii_case(part) => {}
                Segment::Static(_) => return None,
                Segment::Param(name) => {
                    params.insert(name.to_string(), part.to_string());
                }
            }
        }
        Some(params)
    }
}

pub struct RouteTable {
    entries: Vec<RouteEntry>,
}

static ROUTES: Lazy<RouteTable> = Lazy::new(|| {
    use Guard::*;
    use Layout::*;

    let entries = vec![
        RouteEntry::new("/", Root, Page::Home, Public),
        RouteEntry::new("/allScholarships", Root, Page::AllScholarships, Public),
        RouteEntry::new("/aboutUs", Root, Page::AboutUs, Public),
        RouteEntry::new("/media", Root, Page::Media, Public),
        RouteEntry::new("/scholarships/:id", Root, Page::ScholarshipDetails, Authenticated),
        RouteEntry::new("/payment/:id", Root, Page::Payment, Authenticated),
        RouteEntry::new("/forbidden", Root, Page::Forbidden, Public),
        RouteEntry::new("/login", Auth, Page::Login, Public),
        RouteEntry::new("/register", Auth, Page::Register, Public),
        RouteEntry::new("/dashboard", Dashboard, Page::DashboardHome, Authenticated),
        RouteEntry::new("/dashboard/myProfile", Dashboard, Page::MyProfile, Authenticated),
        RouteEntry::new("/dashboard/applications", Dashboard, Page::Applications, Authenticated),
        RouteEntry::new("/dashboard/myReviews", Dashboard, Page::MyReviews, Authenticated),
        RouteEntry::new("/dashboard/userOverview", Dashboard, Page::UserOverview, Authenticated),
        RouteEntry::new("/dashboard/addScholarships", Dashboard, Page::AddScholarships, Moderator),
        RouteEntry::new("/dashboard/manageScholarships", Dashboard, Page::ManageScholarships, Moderator),
        RouteEntry::new("/dashboard/allReviews", Dashboard, Page::AllReviews, Moderator),
        RouteEntry::new("/dashboard/allAppliedScholarship", Dashboard, Page::AllAppliedScholarship, Moderator),
        RouteEntry::new("/dashboard/moderatorOverview", Dashboard, Page::ModeratorOverview, Moderator),
        RouteEntry::new("/dashboard/addScholarshipAdmin", Dashboard, Page::AddScholarshipAdmin, Admin),
        RouteEntry::new("/dashboard/manageUsers", Dashboard, Page::ManageUsers, Admin),
        RouteEntry::new("/dashboard/manageReviews", Dashboard, Page::ManageReviews, Admin),
        RouteEntry::new("/dashboard/manageScholarshipsAdmin", Dashboard, Page::ManageScholarshipsAdmin, Admin),
        RouteEntry::new("/dashboard/manageAppliedApplication", Dashboard, Page::ManageAppliedApplication, Admin),
        RouteEntry::new("/dashboard/analytics", Dashboard, Page::Analytics, Admin),
        RouteEntry::new("/dashboard/forbidden", Dashboard, Page::Forbidden, Public),
    ];
    RouteTable { entries }
});

impl RouteTable {
    pub fn global() -> &'static RouteTable {
        &ROUTES
    }

    pub fn entries(&self) -> impl Iterator<Item = &RouteEntry> {
        self.entries.iter()
    }

    /// Match a browser path; query string, fragment and trailing slash are ignored.
    pub fn match_path(&self, path: &str) -> Option<RouteMatch> {
        let path = path.split(['?', '#']).next().unwrap_or("");
        let parts: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

        self.entries.iter().find_map(|entry| {
            entry.matches(&parts).map(|params| RouteMatch {
                pattern: entry.pattern,
                layout: entry.layout,
                page: entry.page,
                guard: entry.guard,
                params,
            })
        })
    }
}
