mod flatten;
mod merge;
mod types;

pub use flatten::*;
pub use merge::*;
pub use types::*;
