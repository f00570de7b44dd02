//! Domain models split into domain-specific modules.

pub mod booking;
pub mod review;
pub mod schedule;
pub mod service;
pub mod user;

pub use booking::*;
pub use review::*;
pub use schedule::*;
pub use service::*;
pub use user::*;
