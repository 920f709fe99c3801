pub mod applications;
pub mod payments;
pub mod reviews;
pub mod scholarships;
pub mod uploads;
pub mod users;

pub use applications::ApplicationsApi;
pub use payments::PaymentsApi;
pub use reviews::ReviewsApi;
pub use scholarships::ScholarshipsApi;
pub use uploads::ImageUploader;
pub use users::UsersApi;
