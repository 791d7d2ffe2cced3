mod command;
mod request;
mod response;

pub use command::*;
pub use request::*;
pub use response::*;
