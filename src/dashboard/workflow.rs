use crate::api::ApplicationsApi;
use crate::core::AppError;
use crate::models::{Application, ApplicationPatch, ApplicationStatus, WriteResult};

/// What a moderator or admin can do to an application under review.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReviewDecision {
    /// Leave feedback; the application moves to processing.
    Feedback(String),
    Accept,
    Reject,
}

impl ReviewDecision {
    pub fn target_status(&self) -> ApplicationStatus {
        match self {
            ReviewDecision::Feedback(_) => ApplicationStatus::Processing,
            ReviewDecision::Accept => ApplicationStatus::Completed,
            ReviewDecision::Reject => ApplicationStatus::Rejected,
        }
    }

    /// The patch to send, or an error when `application` cannot make the move.
    pub fn patch_for(&self, application: &Application) -> Result<ApplicationPatch, AppError> {
        let status = application.status.transition_to(self.target_status())?;
        let feedback = match self {
            ReviewDecision::Feedback(text) if text.trim().is_empty() => {
                return Err(AppError::validation_error("feedback: Required"))
            }
            ReviewDecision::Feedback(text) => Some(text.trim().to_string()),
            _ => None,
        };
        Ok(ApplicationPatch {
            status: Some(status),
            feedback,
            ..Default::default()
        })
    }
}

pub struct ApplicationWorkflow<'a> {
    applications: &'a ApplicationsApi,
}

impl<'a> ApplicationWorkflow<'a> {
    pub fn new(applications: &'a ApplicationsApi) -> Self {
        Self { applications }
    }

    #[tracing::instrument(name = "Review application", skip(self, application), fields(id = %application.id, from = application.status.as_str()))]
    pub async fn review(
        &self,
        application: &Application,
        decision: ReviewDecision,
    ) -> Result<WriteResult, AppError> {
        let patch = decision.patch_for(application)?;
        self.applications.patch(&application.id, &patch).await
    }

    /// Applicant edits are only accepted while the application is pending.
    /// Status and payment cannot be changed this way.
    #[tracing::instrument(name = "Edit application", skip(self, application, changes), fields(id = %application.id))]
    pub async fn edit(
        &self,
        application: &Application,
        changes: ApplicationPatch,
    ) -> Result<WriteResult, AppError> {
        application.ensure_editable()?;
        let patch = ApplicationPatch {
            status: None,
            payment_status: None,
            feedback: None,
            ..changes
        };
        self.applications.patch(&application.id, &patch).await
    }

    pub async fn cancel(&self, application: &Application) -> Result<WriteResult, AppError> {
        self.applications.cancel(application).await
    }
}
