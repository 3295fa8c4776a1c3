//! Completion criteria evaluation
//!
//! A criterion is a short string attached to a step. The engine dispatches on
//! a case-sensitive prefix:
//!
//! | Criterion       | Passes when                                      |
//! |-----------------|--------------------------------------------------|
//! | `""`            | always                                           |
//! | `contains:<s>`  | output contains `<s>` literally                  |
//! | `regex:<p>`     | pattern `<p>` matches somewhere in the output    |
//! | `json`          | trimmed output parses as a JSON value            |
//! | `code`          | output holds a fenced code block                 |
//! | anything else   | output contains the whole criterion literally    |
//!
//! Evaluation never fails: an invalid regex simply does not match.

use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};

/// Opening fence followed later by a closing fence of the same kind
static CODE_FENCE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)```.*?```|~~~.*?~~~").unwrap());

/// Compiled size cap for user-supplied patterns
const REGEX_SIZE_LIMIT: usize = 1 << 20;

const CONTAINS_PREFIX: &str = "contains:";
const REGEX_PREFIX: &str = "regex:";

/// A parsed completion criterion, borrowing from the step definition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionCriterion<'a> {
    Always,
    Contains(&'a str),
    Regex(&'a str),
    Json,
    Code,
    Literal(&'a str),
}

impl<'a> CompletionCriterion<'a> {
    /// Parse a criterion string, unrecognized forms fall back to `Literal`
    pub fn parse(criterion: &'a str) -> Self {
        if criterion.is_empty() {
            return Self::Always;
        }

        if let Some(needle) = criterion.strip_prefix(CONTAINS_PREFIX) {
            return Self::Contains(needle);
        }

        if let Some(pattern) = criterion.strip_prefix(REGEX_PREFIX) {
            return Self::Regex(pattern);
        }

        match criterion {
            "json" => Self::Json,
            "code" => Self::Code,
            other => Self::Literal(other),
        }
    }

    /// Whether the given model output satisfies this criterion
    pub fn is_satisfied_by(&self, output: &str) -> bool {
        match self {
            Self::Always => true,
            Self::Contains(needle) | Self::Literal(needle) => output.contains(needle),
            Self::Regex(pattern) => RegexBuilder::new(pattern)
                .size_limit(REGEX_SIZE_LIMIT)
                .build()
                .map(|re| re.is_match(output))
                .unwrap_or(false),
            Self::Json => serde_json::from_str::<serde_json::Value>(output.trim()).is_ok(),
            Self::Code => CODE_FENCE_PATTERN.is_match(output),
        }
    }

    /// Short label used in logs
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Always => "always",
            Self::Contains(_) => "contains",
            Self::Regex(_) => "regex",
            Self::Json => "json",
            Self::Code => "code",
            Self::Literal(_) => "literal",
        }
    }
}

/// Decide whether `output` satisfies `criterion`
pub fn evaluate(output: &str, criterion: &str) -> bool {
    CompletionCriterion::parse(criterion).is_satisfied_by(output)
}
