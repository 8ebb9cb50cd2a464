pub mod catalog;
pub mod platform;
pub mod query;
pub mod result;

pub use catalog::*;
pub use platform::*;
pub use query::*;
pub use result::*;
