pub mod duration;
pub mod text;
pub mod yields;

pub use duration::parse_minutes;
pub use yields::{parse_yield, Yield};
