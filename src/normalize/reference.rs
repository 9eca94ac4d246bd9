use regex::Regex;
use std::sync::OnceLock;

/// a reference number recovered from free-text name, tagged with which
/// authority issued it so the caller knows whether it belongs under
/// `ref` (county) or `ref:usfs` (forest service).
#[derive(Debug, Clone, PartialEq)]
pub enum RecoveredReference {
    Usfs(String),
    County(String),
}

struct NamePattern {
    regex: fn() -> &'static Regex,
    usfs: bool,
    /// index of the number token within the name, split on whitespace.
    token_index: usize,
}

fn pat_leading_number() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)^[0-9]+[.a-z]*\b").unwrap())
}
fn pat_fire_road() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)^fire road\s").unwrap())
}
fn pat_county_road() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)^county road\s").unwrap())
}
fn pat_forest_road() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)^forest road\s").unwrap())
}
fn pat_fr_prefix() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)^fr\s").unwrap())
}
fn pat_fs_prefix() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)^fs\s").unwrap())
}

/// attempts to recover a route number from a free-text name, in the order
/// an author would plausibly have written it ("Forest Road 123", "FR 123",
/// "County Road 9", a bare leading route number).
pub fn recover_from_name(name: &str) -> Option<RecoveredReference> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return None;
    }
    let tokens: Vec<&str> = trimmed.split_whitespace().collect();

    let patterns = [
        NamePattern { regex: pat_fire_road, usfs: true, token_index: 2 },
        NamePattern { regex: pat_county_road, usfs: false, token_index: 2 },
        NamePattern { regex: pat_forest_road, usfs: true, token_index: 2 },
        NamePattern { regex: pat_fr_prefix, usfs: true, token_index: 1 },
        NamePattern { regex: pat_fs_prefix, usfs: true, token_index: 1 },
    ];

    for p in &patterns {
        if (p.regex)().is_match(trimmed) {
            if let Some(tok) = tokens.get(p.token_index) {
                let number = tok.trim_end_matches(|c: char| !c.is_alphanumeric());
                return Some(if p.usfs {
                    RecoveredReference::Usfs(number.to_string())
                } else {
                    RecoveredReference::County(number.to_string())
                });
            }
        }
    }

    if pat_leading_number().is_match(trimmed) {
        return Some(RecoveredReference::Usfs(tokens[0].to_string()));
    }

    None
}

/// normalizes a route-number string to the `FR <number>` form used by
/// `ref:usfs`, unifying `FS`, `FSR`, and bare-number spellings.
pub fn canonicalize_usfs(raw: &str) -> String {
    let trimmed = raw.trim();
    let upper = trimmed.to_uppercase();
    let stripped = upper
        .strip_prefix("FSR")
        .or_else(|| upper.strip_prefix("FS"))
        .or_else(|| upper.strip_prefix("FR"))
        .unwrap_or(&upper)
        .trim();
    format!("FR {}", stripped)
}

/// normalizes a route-number string to the `CR <number>` form used by
/// `ref` on county roads.
pub fn canonicalize_county(raw: &str) -> String {
    let trimmed = raw.trim();
    let upper = trimmed.to_uppercase();
    let stripped = upper.strip_prefix("CR").unwrap_or(&upper).trim();
    format!("CR {}", stripped)
}

/// splits a `;`-delimited multi-value reference (`"123;FR123A"`) into its
/// primary value and the remainder, mirroring how the upstream datasets
/// pack an alternate reference into the same field.
pub fn split_multi_value(raw: &str) -> (String, Vec<String>) {
    let mut parts = raw.split(';').map(str::trim).filter(|s| !s.is_empty());
    let primary = parts.next().unwrap_or("").to_string();
    let rest = parts.map(str::to_string).collect();
    (primary, rest)
}
