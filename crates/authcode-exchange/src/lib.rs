mod authorize;
mod detail;
mod exchange_http;
mod guard;

pub use authorize::*;
pub use exchange_http::*;
