use globset::GlobSet;
use globset::GlobSetBuilder;

use super::glob_pattern::build_glob;
use super::is_negated_glob;
use super::non_negated_glob;
use super::PatternSyntaxError;

#[derive(Debug, Default, Clone)]
pub struct GlobMatcherOptions {
  /// Callers that need case-insensitive matching normalize paths before
  /// matching; the engine itself always uses the case-sensitive default.
  pub case_insensitive: bool,
}

/// Matches a path against a pattern list where `!`-prefixed patterns
/// exclude. A path matches when at least one include pattern matches
/// and no exclude pattern does, so an empty or exclude-only list never
/// matches anything.
#[derive(Debug)]
pub struct GlobMatcher {
  include_globset: GlobSet,
  exclude_globset: GlobSet,
}

impl GlobMatcher {
  pub fn new(patterns: &[String], opts: &GlobMatcherOptions) -> Result<GlobMatcher, PatternSyntaxError> {
    let mut match_patterns = Vec::new();
    let mut ignore_patterns = Vec::new();
    for pattern in patterns {
      if is_negated_glob(pattern) {
        ignore_patterns.push(non_negated_glob(pattern));
      } else {
        match_patterns.push(pattern.as_str());
      }
    }
    Ok(GlobMatcher {
      include_globset: build_glob_set(&match_patterns, opts)?,
      exclude_globset: build_glob_set(&ignore_patterns, opts)?,
    })
  }

  pub fn is_match(&self, path: &str) -> bool {
    self.include_globset.is_match(path) && !self.exclude_globset.is_match(path)
  }

  pub fn is_excluded(&self, path: &str) -> bool {
    self.exclude_globset.is_match(path)
  }
}

fn build_glob_set(patterns: &[&str], opts: &GlobMatcherOptions) -> Result<GlobSet, PatternSyntaxError> {
  let mut builder = GlobSetBuilder::new();
  for pattern in patterns {
    builder.add(build_glob(pattern, opts)?);
  }
  builder.build().map_err(|err| PatternSyntaxError {
    pattern: err.glob().map(|g| g.to_string()).unwrap_or_default(),
    message: err.kind().to_string(),
  })
}
