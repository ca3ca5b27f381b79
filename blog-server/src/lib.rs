pub mod application;
pub mod data;
pub mod domain;
pub mod infrastructure;
pub mod presentation;
pub mod server;

pub use application::AppServices;
pub use server::build_app;
