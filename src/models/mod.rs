pub mod common;
pub mod history;
pub mod request;
pub mod response;

pub use common::*;
pub use history::*;
pub use request::*;
pub use response::*;
