//! HTTP front end of Snip: the shorten form, the `/s/{id}` redirect and the
//! access-code protected dashboard.

pub mod app;
pub mod error;
pub mod handlers;
pub mod model;
pub mod state;
pub mod views;

pub use app::App;
pub use error::AppError;
pub use state::AppState;
