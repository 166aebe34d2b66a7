//! Schema module - Pattern values, engine configuration and result records.

mod config;
mod pattern;
mod result;
mod time_delay;

pub use config::*;
pub use pattern::*;
pub use result::*;
pub use time_delay::*;
