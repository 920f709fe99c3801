use chrono::Datelike;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::api::{ApplicationsApi, ReviewsApi, ScholarshipsApi, UsersApi};
use crate::core::AppError;
use crate::models::{
    Application, ApplicationDigest, ApplicationStatus, Scholarship, ScholarshipCategory,
};

pub const UNKNOWN_STATUS: &str = "unknown";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    pub pending: usize,
    pub processing: usize,
    pub completed: usize,
    pub rejected: usize,
}

impl StatusCounts {
    pub fn from_applications(applications: &[Application]) -> Self {
        let mut counts = Self::default();
        for application in applications {
            match application.status {
                ApplicationStatus::Pending => counts.pending += 1,
                ApplicationStatus::Processing => counts.processing += 1,
                ApplicationStatus::Completed => counts.completed += 1,
                ApplicationStatus::Rejected => counts.rejected += 1,
            }
        }
        counts
    }

    pub fn total(&self) -> usize {
        self.pending + self.processing + self.completed + self.rejected
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bucket {
    pub label: String,
    pub count: usize,
}

pub fn scholarships_by_category(scholarships: &[Scholarship]) -> Vec<Bucket> {
    [
        ScholarshipCategory::FullFund,
        ScholarshipCategory::Partial,
        ScholarshipCategory::SelfFund,
    ]
    .iter()
    .map(|category| Bucket {
        label: category.label().to_string(),
        count: scholarships
            .iter()
            .filter(|s| s.scholarship_category == *category)
            .count(),
    })
    .collect()
}

/// Known statuses in workflow order, then an `unknown` bucket when needed.
pub fn applications_by_status(applications: &[ApplicationDigest]) -> Vec<Bucket> {
    let mut known = [0usize; 4];
    let mut unknown = 0;
    for application in applications {
        let parsed = application
            .status
            .as_deref()
            .and_then(|raw| raw.parse::<ApplicationStatus>().ok());
        match parsed.and_then(|s| ApplicationStatus::ALL.iter().position(|k| *k == s)) {
            Some(index) => known[index] += 1,
            None => unknown += 1,
        }
    }

    let mut buckets: Vec<Bucket> = ApplicationStatus::ALL
        .iter()
        .zip(known)
        .map(|(status, count)| Bucket {
            label: status.as_str().to_string(),
            count,
        })
        .collect();
    if unknown > 0 {
        buckets.push(Bucket {
            label: UNKNOWN_STATUS.to_string(),
            count: unknown,
        });
    }
    buckets
}

/// Applications per calendar month, oldest first, labelled `YYYY-MM`.
/// Undated applications are left out.
pub fn applications_per_month(applications: &[ApplicationDigest]) -> Vec<Bucket> {
    let mut months: BTreeMap<(i32, u32), usize> = BTreeMap::new();
    for created_at in applications.iter().filter_map(|a| a.created_at) {
        *months.entry((created_at.year(), created_at.month())).or_default() += 1;
    }
    months
        .into_iter()
        .map(|((year, month), count)| Bucket {
            label: format!("{:04}-{:02}", year, month),
            count,
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PortalReport {
    pub total_scholarships: usize,
    pub total_applications: usize,
    pub total_reviews: usize,
    /// Only filled in for admins, who may list users.
    pub total_users: Option<usize>,
    pub by_category: Vec<Bucket>,
    pub by_status: Vec<Bucket>,
    pub per_month: Vec<Bucket>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserOverview {
    pub applications: StatusCounts,
    pub reviews: usize,
    pub paid: usize,
}

pub struct Analytics<'a> {
    scholarships: &'a ScholarshipsApi,
    applications: &'a ApplicationsApi,
    reviews: &'a ReviewsApi,
    users: &'a UsersApi,
}

impl<'a> Analytics<'a> {
    pub fn new(
        scholarships: &'a ScholarshipsApi,
        applications: &'a ApplicationsApi,
        reviews: &'a ReviewsApi,
        users: &'a UsersApi,
    ) -> Self {
        Self {
            scholarships,
            applications,
            reviews,
            users,
        }
    }

    /// Moderator and admin overview. The three collections load concurrently.
    #[tracing::instrument(name = "Build portal report", skip(self))]
    pub async fn portal_report(&self) -> Result<PortalReport, AppError> {
        let (scholarships, applications, reviews) = tokio::try_join!(
            self.scholarships.list(),
            self.applications.digests(),
            self.reviews.all()
        )?;

        Ok(PortalReport {
            total_scholarships: scholarships.len(),
            total_applications: applications.len(),
            total_reviews: reviews.len(),
            total_users: None,
            by_category: scholarships_by_category(&scholarships),
            by_status: applications_by_status(&applications),
            per_month: applications_per_month(&applications),
        })
    }

    #[tracing::instrument(name = "Build admin report", skip(self))]
    pub async fn admin_report(&self) -> Result<PortalReport, AppError> {
        let (mut report, users) = tokio::try_join!(self.portal_report(), self.users.list())?;
        report.total_users = Some(users.len());
        Ok(report)
    }

    #[tracing::instrument(name = "Build user overview", skip(self))]
    pub async fn user_overview(&self, email: &str) -> Result<UserOverview, AppError> {
        let (applications, reviews) =
            tokio::try_join!(self.applications.list_mine(email), self.reviews.mine(email))?;
        Ok(UserOverview {
            applications: StatusCounts::from_applications(&applications),
            reviews: reviews.len(),
            paid: applications.iter().filter(|a| a.is_paid()).count(),
        })
    }
}
