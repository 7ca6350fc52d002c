use globset::GlobBuilder;
use globset::GlobMatcher as CompiledGlob;
use thiserror::Error;

use super::GlobMatcherOptions;

/// A glob pattern that failed to compile (ex. an unterminated `[`).
///
/// Raised when the pattern is compiled rather than on first match so an
/// entire rule set can be validated up front.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid glob pattern '{pattern}'. {message}")]
pub struct PatternSyntaxError {
  pub pattern: String,
  pub message: String,
}

impl PatternSyntaxError {
  pub(crate) fn new(pattern: &str, error: &globset::Error) -> Self {
    PatternSyntaxError {
      pattern: pattern.to_string(),
      message: error.kind().to_string(),
    }
  }
}

/// A single compiled glob pattern.
///
/// Matches against normalized relative paths (forward slashes, no
/// leading `./`). `*` and `?` never cross a path separator and the
/// pattern is anchored to the full path unless it starts with `**/`.
/// Polarity (`!`) is a rule-level concern; compile the non-negated text.
#[derive(Debug, Clone)]
pub struct GlobPattern {
  pattern: String,
  matcher: CompiledGlob,
}

impl GlobPattern {
  pub fn compile(pattern: &str, opts: &GlobMatcherOptions) -> Result<GlobPattern, PatternSyntaxError> {
    let glob = build_glob(pattern, opts)?;
    Ok(GlobPattern {
      pattern: pattern.to_string(),
      matcher: glob.compile_matcher(),
    })
  }

  pub fn as_str(&self) -> &str {
    &self.pattern
  }

  pub fn matches(&self, path: &str) -> bool {
    self.matcher.is_match(path)
  }
}

pub(super) fn build_glob(pattern: &str, opts: &GlobMatcherOptions) -> Result<globset::Glob, PatternSyntaxError> {
  GlobBuilder::new(pattern)
    .literal_separator(true)
    .case_insensitive(opts.case_insensitive)
    .build()
    .map_err(|err| PatternSyntaxError::new(pattern, &err))
}

pub fn is_negated_glob(pattern: &str) -> bool {
  let mut chars = pattern.chars();
  let first_char = chars.next();
  let second_char = chars.next();

  first_char == Some('!') && second_char != Some('(')
}

pub fn non_negated_glob(pattern: &str) -> &str {
  if is_negated_glob(pattern) {
    &pattern[1..]
  } else {
    pattern
  }
}
