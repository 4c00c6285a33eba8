pub mod advisory;
pub mod air_quality;
pub mod weather;

pub use advisory::*;
pub use air_quality::*;
pub use weather::*;
