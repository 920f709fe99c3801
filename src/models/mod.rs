pub mod applications;
pub mod common;
pub mod pagination;
pub mod payments;
pub mod reviews;
pub mod scholarships;
pub mod users;

pub use applications::{
    ApplicantDetails, Application, ApplicationDigest, ApplicationPatch, ApplicationStatus,
    NewApplication, PaymentStatus,
};
pub use common::WriteResult;
pub use pagination::{paginate, Paginated, PaginationMeta, PaginationQuery};
pub use payments::{PaymentIntent, PaymentIntentRequest, PaymentRecord};
pub use reviews::{NewReview, Review, ReviewPatch};
pub use scholarships::{
    Degree, NewScholarship, Scholarship, ScholarshipCategory, ScholarshipPatch, SubjectCategory,
};
pub use users::{LoginForm, NewUser, RegistrationForm, Role, RoleUpdate, UserProfile};
