#[macro_use]
pub mod macros;

pub mod logging;
pub mod time;

pub use time::FrameClock;
