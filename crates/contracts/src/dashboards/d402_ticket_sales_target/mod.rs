pub mod chart;
pub mod request;
pub mod response;

pub use chart::*;
pub use request::*;
pub use response::*;
