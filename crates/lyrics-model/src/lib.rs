pub mod song;
pub mod report;

pub use song::*;
pub use report::*;
