pub mod billing;
pub mod config;
pub mod db;
pub mod http;
pub mod reports;

pub use db::Store;
pub use http::{build_router, AppState};
