mod callback_request;

pub use callback_request::*;
