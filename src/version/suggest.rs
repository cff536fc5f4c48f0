//! Heuristics turning common irrational version strings into rational ones.

use regex::Regex;
use std::sync::LazyLock;

use super::NormalizedVersion;

/// Plain substring rewrites, applied in order to the lowercased input.
const REPLACEMENTS: &[(&str, &str)] = &[
    ("-alpha", "a"),
    ("-beta", "b"),
    ("alpha", "a"),
    ("beta", "b"),
    ("rc", "c"),
    ("-final", ""),
    ("-pre", "c"),
    ("-release", ""),
    (".release", ""),
    ("-stable", ""),
    ("+", "."),
    ("_", "."),
    (" ", ""),
    (".final", ""),
    ("final", ""),
];

struct Rule {
    pattern: Regex,
    replacement: &'static str,
}

fn rule(pattern: &str, replacement: &'static str) -> Rule {
    Rule {
        pattern: Regex::new(pattern).expect("suggestion pattern is valid"),
        replacement,
    }
}

/// Rules run before the `v` prefix is stripped.
static EARLY_RULES: LazyLock<Vec<Rule>> = LazyLock::new(|| {
    vec![
        rule(r"pre$", "pre0"),
        rule(r"dev$", "dev0"),
        // 1.0b-2, 1.0a.2
        rule(r"([abc])[\-\.](\d+)$", "${1}${2}"),
        // 1.0-dev-r371 -> 1.0.dev371
        rule(r"[\-\.](dev)[\-\.]?r?(\d+)$", ".${1}${2}"),
        // 2.0.a.3, 2.0.b1, 0.9.0~c1
        rule(r"[.~]?([abc])\.?", "${1}"),
    ]
});

/// Rules run after the `v` prefix is stripped.
static LATE_RULES: LazyLock<Vec<Rule>> = LazyLock::new(|| {
    vec![
        // leading zeros on numbers: 1.02 -> 1.2
        rule(r"\b0+(\d+)", "${1}"),
        // 1.0a -> 1.0a0
        rule(r"(\d+[abc])$", "${1}0"),
        rule(r"\.?(dev-r|dev\.r)\.?(\d+)$", ".dev${2}"),
        rule(r"-(a|b|c)(\d+)$", "${1}${2}"),
        rule(r"[\.\-](dev|devel)$", ".dev0"),
        rule(r"dev$", ".dev0"),
        rule(r"(final|stable)$", ""),
        // 0.4a1.r10 -> 0.4a1.post10, 0.9.33-17222 -> 0.9.33.post17222
        rule(r"\.?(r|-|-r)\.?(\d+)$", ".post${2}"),
        // 1.0dev123, 1.0.git123 -> 1.0.dev123
        rule(r"\.?(dev|git|bzr)\.?(\d+)$", ".dev${2}"),
        // 0.2.pre1, 0.2-c1, 1.0preview123 -> 0.2c1
        rule(r"\.?(pre|preview|-c)(\d+)$", "c${2}"),
        // Tcl/Tk style post releases: 8.5p2
        rule(r"p(\d+)$", ".post${1}"),
    ]
});

fn apply(rules: &[Rule], input: String) -> String {
    rules.iter().fold(input, |acc, rule| {
        rule.pattern
            .replace_all(&acc, rule.replacement)
            .into_owned()
    })
}

/// Suggest a rational version for `s`.
///
/// Returns `s` unchanged when it already parses, the rewritten string when
/// the heuristics produce something rational, and `None` otherwise.
#[tracing::instrument]
pub fn suggest_normalized_version(s: &str) -> Option<String> {
    if NormalizedVersion::parse(s).is_ok() {
        return Some(s.to_string());
    }

    let mut rs = s.to_lowercase();
    for (from, to) in REPLACEMENTS {
        rs = rs.replace(from, to);
    }

    let mut rs = apply(&EARLY_RULES, rs);
    if let Some(stripped) = rs.strip_prefix('v') {
        rs = stripped.to_string();
    }
    let rs = apply(&LATE_RULES, rs);

    match NormalizedVersion::parse(&rs) {
        Ok(_) => Some(rs),
        Err(e) => {
            log::debug!("No rational suggestion for {:?}: {}", s, e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rational_input_is_returned_as_is() {
        assert_eq!(suggest_normalized_version("1.0"), Some("1.0".into()));
        assert_eq!(suggest_normalized_version("1.0rc1"), Some("1.0rc1".into()));
        assert_eq!(
            suggest_normalized_version("1.0.post4.dev2"),
            Some("1.0.post4.dev2".into())
        );
    }

    #[test]
    fn test_suggestions() {
        let cases = [
            ("1.0-alpha1", "1.0a1"),
            ("1.0-beta2", "1.0b2"),
            ("1.0RC2", "1.0c2"),
            ("1.0-final", "1.0"),
            ("1.0 final", "1.0"),
            ("v1.0", "1.0"),
            ("1.0a", "1.0a0"),
            ("1.02", "1.2"),
            ("1.0-dev-r371", "1.0.dev371"),
            ("0.1-dev-r79", "0.1.dev79"),
            ("1.0dev", "1.0.dev0"),
            ("0.1dev", "0.1.dev0"),
            ("1.0dev123", "1.0.dev123"),
            ("1.0.git123", "1.0.dev123"),
            ("0.4a1.r10", "0.4a1.post10"),
            ("0.9.33-17222", "0.9.33.post17222"),
            ("0.9.33-r17222", "0.9.33.post17222"),
            ("0.2.pre1", "0.2c1"),
            ("1.0preview123", "1.0c123"),
            ("2.0.b1", "2.0b1"),
            ("0.9.0~c1", "0.9.0c1"),
            ("8.5p2", "8.5.post2"),
            ("1.0_1", "1.0.1"),
        ];
        for (input, expected) in cases {
            assert_eq!(
                suggest_normalized_version(input),
                Some(expected.to_string()),
                "suggestion for {}",
                input
            );
        }
    }

    #[test]
    fn test_hopeless_versions() {
        for input in [
            "walla walla washington",
            "2023-01-dev",
            "2009.01.03",
            "1",
            "",
            // the b of bzr is taken for a beta marker first
            "1.0.bzr123",
        ] {
            assert_eq!(suggest_normalized_version(input), None, "{}", input);
        }
    }
}
