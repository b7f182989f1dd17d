mod dashboard;
mod health;
mod link;

pub use dashboard::{DashboardAction, DashboardForm, DashboardQuery};
pub use health::HealthResponse;
pub use link::{CreateLinkForm, RedirectQuery};
