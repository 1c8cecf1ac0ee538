mod middlewares;
mod utils;

pub mod response;
pub mod router;

pub use router::{router, AppState};
