pub mod api;
pub mod cli;
pub mod config;
pub mod models;
pub mod session;

pub use api::{ApiClient, ClientError};
pub use session::{Session, TokenStore};
