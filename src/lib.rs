pub mod cache;
pub mod config;
pub mod docs;
pub mod error;
pub mod handlers;
pub mod intervals;
pub mod loader;
pub mod middleware;
pub mod movie;
pub mod rate_limiter;
pub mod server;
pub mod store;

pub use config::Config;
pub use error::ApiError;
pub use intervals::{compute_intervals, Interval, IntervalResult, WinRecord};
pub use server::create_app;
