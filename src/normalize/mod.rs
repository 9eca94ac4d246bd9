pub mod abbreviations;
pub mod reference;

use crate::model::Tags;
use itertools::Itertools;
use reference::RecoveredReference;
use regex::Regex;
use std::sync::OnceLock;

/// tags carried over from TIGER-derived county imports that add no value
/// once a feature has been merged into this pipeline's output.
const LEGACY_TAG_PREFIXES: &[&str] = &["tiger:"];

/// MVUM import fields all start with `_` followed by an upper-case field
/// name (e.g. `_HIGH_CLEARANCE_VEHICLE`); they're scaffolding left by the
/// source agency's export and carry nothing useful once merged.
fn legacy_underscore_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^_[A-Z]+").unwrap())
}

fn is_legacy_tag(key: &str) -> bool {
    LEGACY_TAG_PREFIXES.iter().any(|p| key.starts_with(p)) || legacy_underscore_pattern().is_match(key)
}

/// removes TIGER import scaffolding tags (`tiger:*`) and MVUM `_FIELD_NAME`
/// artifacts in place.
pub fn strip_legacy_tags(tags: &mut Tags) {
    tags.retain(|k, _| !is_legacy_tag(k));
}

/// expands abbreviations in `name`/`name:*` tags in place.
pub fn expand_name_abbreviations(tags: &mut Tags) {
    for (key, value) in tags.iter_mut() {
        if key == "name" || key.starts_with("name:") {
            *value = abbreviations::expand(value);
        }
    }
}

/// appends "Road" to a name that doesn't already read as one, matching how
/// the source agencies name unsigned forest routes by number alone.
fn ensure_road_suffix(name: &str) -> String {
    let lower = name.to_lowercase();
    if lower.contains("road") || lower.contains("trail") || lower.contains("highway") {
        name.trim().to_string()
    } else {
        format!("{} Road", name.trim())
    }
}

/// recovers `ref`/`ref:usfs` from a free-text `name` when the tag set has
/// no explicit reference, and splits an already-present `;`-delimited
/// `ref` into a primary value plus `ref:usfs:alt` alternates.
pub fn synthesize_references(tags: &mut Tags) {
    if let Some(raw_ref) = tags.get("ref").cloned() {
        if raw_ref.contains(';') {
            let (primary, alternates) = reference::split_multi_value(&raw_ref);
            tags.insert("ref".to_string(), primary);
            if let Some(first_alt) = alternates.first() {
                tags.insert(
                    "ref:usfs".to_string(),
                    reference::canonicalize_usfs(first_alt),
                );
            }
            if alternates.len() > 1 {
                tags.insert("ref:usfs:alt".to_string(), alternates[1..].iter().join(";"));
            }
        }
        return;
    }

    if tags.contains_key("ref:usfs") {
        return;
    }

    let Some(name) = tags.get("name").cloned() else {
        return;
    };

    if name.contains(';') {
        synthesize_from_multi_branch_name(tags, &name);
        return;
    }

    match reference::recover_from_name(&name) {
        Some(RecoveredReference::Usfs(num)) => {
            tags.insert("ref:usfs".to_string(), reference::canonicalize_usfs(&num));
            tags.insert("name".to_string(), ensure_road_suffix(&name));
        }
        Some(RecoveredReference::County(num)) => {
            tags.insert("ref".to_string(), reference::canonicalize_county(&num));
        }
        None => {}
    }
}

/// a `;`-delimited `name` packs several route designations into one field
/// (`"Forest Road 701; Forest Road 701A"`). Each branch is resolved to a
/// reference independently; the first branch's reference becomes the
/// feature's canonical `ref:usfs` and its text becomes `name`, while the
/// rest are preserved verbatim under `ref:usfs:alt` rather than discarded.
fn synthesize_from_multi_branch_name(tags: &mut Tags, name: &str) {
    let branches: Vec<&str> = name.split(';').map(str::trim).filter(|s| !s.is_empty()).collect();
    let Some(first) = branches.first() else { return };

    let recovered: Vec<String> = branches
        .iter()
        .filter_map(|branch| match reference::recover_from_name(branch) {
            Some(RecoveredReference::Usfs(num)) => Some(reference::canonicalize_usfs(&num)),
            _ => None,
        })
        .collect();

    let Some(primary_ref) = recovered.first() else { return };
    tags.insert("ref:usfs".to_string(), primary_ref.clone());
    tags.insert("name".to_string(), ensure_road_suffix(first));
    if recovered.len() > 1 {
        tags.insert("ref:usfs:alt".to_string(), recovered[1..].iter().join(";"));
    }
}

/// full normalization pipeline applied to a feature's tags before matching:
/// drop import scaffolding, expand name abbreviations, then recover or
/// canonicalize reference numbers. Idempotent — running it twice on its
/// own output is a no-op.
pub fn normalize_feature_tags(tags: &mut Tags) {
    strip_legacy_tags(tags);
    expand_name_abbreviations(tags);
    synthesize_references(tags);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags(pairs: &[(&str, &str)]) -> Tags {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn strips_tiger_and_mvum_underscore_fields() {
        let mut t = tags(&[
            ("tiger:county", "Lake, CA"),
            ("_HIGH_CLEARANCE_VEHICLE", "x"),
            ("name", "Bear Cr"),
        ]);
        strip_legacy_tags(&mut t);
        assert!(!t.contains_key("tiger:county"));
        assert!(!t.contains_key("_HIGH_CLEARANCE_VEHICLE"));
        assert!(t.contains_key("name"));
    }

    #[test]
    fn underscore_field_with_lowercase_is_not_stripped() {
        let mut t = tags(&[("name_1", "x")]);
        strip_legacy_tags(&mut t);
        assert!(t.contains_key("name_1"));
    }

    #[test]
    fn synthesizes_usfs_ref_from_name() {
        let mut t = tags(&[("name", "Forest Road 123")]);
        synthesize_references(&mut t);
        assert_eq!(t.get("ref:usfs").unwrap(), "FR 123");
    }

    #[test]
    fn splits_multi_value_ref_into_alternates() {
        let mut t = tags(&[("ref", "123;123A;123B")]);
        synthesize_references(&mut t);
        assert_eq!(t.get("ref").unwrap(), "123");
        assert_eq!(t.get("ref:usfs").unwrap(), "FR 123A");
        assert_eq!(t.get("ref:usfs:alt").unwrap(), "123B");
    }

    #[test]
    fn multi_branch_name_promotes_first_branch_and_keeps_the_rest() {
        let mut t = tags(&[("name", "Forest Road 701; Forest Road 701A")]);
        synthesize_references(&mut t);
        assert_eq!(t.get("ref:usfs").unwrap(), "FR 701");
        assert_eq!(t.get("ref:usfs:alt").unwrap(), "FR 701A");
        assert_eq!(t.get("name").unwrap(), "Forest Road 701");
    }

    #[test]
    fn pipeline_is_idempotent() {
        let mut t = tags(&[("name", "Forest Road 123"), ("tiger:county", "drop me")]);
        normalize_feature_tags(&mut t);
        let once = t.clone();
        normalize_feature_tags(&mut t);
        assert_eq!(once, t);
    }
}
