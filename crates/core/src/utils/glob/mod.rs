mod glob_matcher;
mod glob_pattern;

pub use glob_matcher::*;
pub use glob_pattern::*;
