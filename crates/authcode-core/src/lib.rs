mod classify;
mod config;
mod credentials;
mod errors;
mod general;
mod models;

pub use classify::*;
pub use config::*;
pub use credentials::*;
pub use errors::*;
pub use general::*;
pub use models::*;
