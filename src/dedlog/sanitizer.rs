//! Log message sanitization for deduplicated logging.
//!
//! Volatile fragments of error texts (addresses, ports, timestamps, ids)
//! are replaced with placeholders so repeated failures aggregate.

use once_cell::sync::Lazy;
use regex::Regex;

/// Sanitization rule with regex pattern and placeholder
struct Rule {
    re: Regex,
    placeholder: &'static str,
}

fn rule(pattern: &str, placeholder: &'static str) -> Rule {
    Rule {
        re: Regex::new(pattern).expect("sanitizer pattern must compile"),
        placeholder,
    }
}

// Order matters: URLs swallow hosts and ports, so they go first.
static RULES: Lazy<Vec<Rule>> = Lazy::new(|| {
    vec![
        rule(r"\bhttps?://[^\s]+", "<url>"),
        rule(
            r"\b\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2}(?:\.\d{1,9})?(?:Z|[+-]\d{2}:\d{2})\b",
            "<ts>",
        ),
        rule(
            r"\b[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[1-5][0-9a-fA-F]{3}-[89abAB][0-9a-fA-F]{3}-[0-9a-fA-F]{12}\b",
            "<uuid>",
        ),
        rule(r"\b(?:\d{1,3}\.){3}\d{1,3}(?::\d{1,5})?\b", "<ip4>"),
        rule(r"\b\d+(?:\.\d+)?(?:ns|µs|us|ms|s)\b", "<dur>"),
        rule(r"\b[0-9a-fA-F]{16,64}\b", "<hex>"),
    ]
});

/// Sanitizer applies an ordered set of sanitization rules
pub struct Sanitizer {
    collapse_spaces: bool,
}

/// Options for customizing Sanitizer
pub struct WithCollapseSpaces(pub bool);

impl Sanitizer {
    pub fn new(opts: WithCollapseSpaces) -> Self {
        Self {
            collapse_spaces: opts.0,
        }
    }

    /// Sanitizes a message string according to the configured rules
    pub fn sanitize(&self, err: &str) -> String {
        if err.is_empty() {
            return String::new();
        }

        let mut result = err.to_string();
        for rule in RULES.iter() {
            result = rule.re.replace_all(&result, rule.placeholder).into_owned();
        }

        if self.collapse_spaces {
            result = result.split_whitespace().collect::<Vec<_>>().join(" ");
        }

        result
    }
}
