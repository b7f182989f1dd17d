mod dashboard;
mod health;
mod home;
mod redirect;

pub use dashboard::{dashboard_action_handler, dashboard_handler};
pub use health::health_handler;
pub use home::{create_link_handler, home_handler};
pub use redirect::{not_found_handler, redirect_handler};
