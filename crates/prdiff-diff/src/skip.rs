//! Decide which files are rendered as a placeholder instead of their content
//!
//! The built-in table covers lock files, minified bundles, source maps,
//! images and notebooks. Matching is case-insensitive.

use super::error::{DiffError, DiffResult};
use prdiff_core::DiffConfig;
use regex::{RegexBuilder, RegexSet, RegexSetBuilder};

#[derive(Debug, Clone, Copy)]
enum SkipRule {
    /// Path ends with the given text
    Suffix(&'static str),
    /// Path contains the given text anywhere
    Contains(&'static str),
}

impl SkipRule {
    fn matches(self, lowercase_path: &str) -> bool {
        match self {
            SkipRule::Suffix(suffix) => lowercase_path.ends_with(suffix),
            SkipRule::Contains(part) => lowercase_path.contains(part),
        }
    }
}

// Entries are stored lowercase
const BUILTIN_SKIP_RULES: &[SkipRule] = &[
    SkipRule::Suffix("package-lock.json"),
    SkipRule::Suffix("yarn.lock"),
    SkipRule::Suffix("pnpm-lock.yaml"),
    SkipRule::Suffix("go.sum"),
    SkipRule::Suffix("cargo.lock"),
    SkipRule::Suffix("composer.lock"),
    SkipRule::Suffix("gemfile.lock"),
    SkipRule::Suffix("pipfile.lock"),
    SkipRule::Suffix("poetry.lock"),
    SkipRule::Suffix(".min.js"),
    SkipRule::Suffix(".min.css"),
    SkipRule::Suffix(".map"),
    SkipRule::Suffix(".svg"),
    SkipRule::Suffix(".png"),
    SkipRule::Suffix(".jpg"),
    SkipRule::Suffix(".jpeg"),
    SkipRule::Suffix(".gif"),
    SkipRule::Suffix(".ico"),
    SkipRule::Suffix(".pdf"),
    SkipRule::Contains("__snapshots__/"),
    SkipRule::Suffix(".ipynb"),
];

/// Check the built-in table only
pub fn should_skip(filename: &str) -> bool {
    let lower = filename.to_lowercase();
    BUILTIN_SKIP_RULES.iter().any(|rule| rule.matches(&lower))
}

/// Built-in table plus optional user-supplied regexes
#[derive(Debug, Clone, Default)]
pub struct SkipFilter {
    extra: Option<RegexSet>,
}

impl SkipFilter {
    /// Compile extra patterns; each is matched case-insensitively anywhere in the path
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> DiffResult<Self> {
        let patterns: Vec<&str> = patterns.iter().map(|p| p.as_ref()).collect();
        if patterns.is_empty() {
            return Ok(Self::default());
        }

        // Compile one by one first so the error names the offending pattern
        for pattern in &patterns {
            RegexBuilder::new(pattern)
                .case_insensitive(true)
                .build()
                .map_err(|source| DiffError::InvalidSkipPattern {
                    pattern: pattern.to_string(),
                    source,
                })?;
        }

        let set = RegexSetBuilder::new(&patterns)
            .case_insensitive(true)
            .build()
            .map_err(|source| DiffError::InvalidSkipPattern {
                pattern: patterns.join(", "),
                source,
            })?;

        Ok(Self { extra: Some(set) })
    }

    pub fn from_config(config: &DiffConfig) -> DiffResult<Self> {
        Self::new(&config.extra_skip_patterns)
    }

    pub fn is_skipped(&self, filename: &str) -> bool {
        should_skip(filename)
            || self
                .extra
                .as_ref()
                .is_some_and(|set| set.is_match(filename))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lock_files_are_skipped() {
        assert!(should_skip("pnpm-lock.yaml"));
        assert!(should_skip("frontend/package-lock.json"));
        assert!(should_skip("Cargo.lock"));
        assert!(should_skip("Gemfile.lock"));
        assert!(should_skip("go.sum"));
    }

    #[test]
    fn test_generated_and_binary_assets_are_skipped() {
        assert!(should_skip("bundle.min.js"));
        assert!(should_skip("static/site.MIN.CSS"));
        assert!(should_skip("app.js.map"));
        assert!(should_skip("diagram.svg"));
        assert!(should_skip("docs/Manual.PDF"));
        assert!(should_skip("analysis.ipynb"));
        assert!(should_skip("src/__snapshots__/app.test.js.snap"));
    }

    #[test]
    fn test_source_files_are_kept() {
        assert!(!should_skip("src/app.py"));
        assert!(!should_skip("src/map.rs"));
        assert!(!should_skip("lockfile.rs"));
        assert!(!should_skip("snapshots/readme.md"));
        assert!(!should_skip("image.png.rs"));
    }

    #[test]
    fn test_filter_extra_patterns() {
        let filter = SkipFilter::new(&["\\.generated\\.ts$", "^vendor/"]).unwrap();
        assert!(filter.is_skipped("api/client.GENERATED.ts"));
        assert!(filter.is_skipped("vendor/lib/x.go"));
        assert!(filter.is_skipped("yarn.lock"));
        assert!(!filter.is_skipped("src/vendor/x.go"));
        assert!(!filter.is_skipped("src/main.ts"));
    }

    #[test]
    fn test_filter_default_matches_builtin() {
        let filter = SkipFilter::default();
        assert!(filter.is_skipped("poetry.lock"));
        assert!(!filter.is_skipped("README.md"));
    }

    #[test]
    fn test_filter_invalid_pattern() {
        let err = SkipFilter::new(&["ok$", "(unclosed"]).unwrap_err();
        match err {
            DiffError::InvalidSkipPattern { pattern, .. } => assert_eq!(pattern, "(unclosed"),
        }
    }

    #[test]
    fn test_filter_from_config() {
        let config = DiffConfig {
            extra_skip_patterns: vec!["\\.pb\\.go$".to_string()],
            ..DiffConfig::default()
        };
        let filter = SkipFilter::from_config(&config).unwrap();
        assert!(filter.is_skipped("proto/user.pb.go"));
    }
}
