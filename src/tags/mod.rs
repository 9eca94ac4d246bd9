pub mod fuzzy;

use crate::model::Tags;

/// tag keys compared for a fuzzy match. `ref:usfs` is checked both as its
/// own match key and, when `ref`/`name` disagree only in FS/FR prefix, as
/// the tiebreaker that upgrades a near-miss into a second hit.
const MATCH_KEYS: &[&str] = &["name", "ref", "ref:usfs"];

/// ODK Collect leaves these on a submitted feature; they carry no
/// conflation-relevant information and are dropped from the merge.
const DENY_LIST: &[&str] = &["title", "label"];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TagThresholds {
    pub match_ratio: u8,
    pub max_length_delta: i64,
}

impl Default for TagThresholds {
    fn default() -> Self {
        TagThresholds {
            match_ratio: 85,
            max_length_delta: 3,
        }
    }
}

/// compares a primary (external) feature's tags against a candidate
/// secondary (OSM) feature's tags.
///
/// Returns the number of matching keys ("hits") and the tag set that
/// should replace the secondary's if this pair is accepted: secondary
/// values win ties on merge, primary's value wins on an accepted fuzzy
/// match, and a secondary value displaced by a non-exact match is kept
/// under `old_<key>` for review — except when the only difference is an
/// `FS`-to-`FR` prefix rewrite on `ref:usfs`, which is common enough not
/// to need flagging.
pub fn compare(primary: &Tags, secondary: &Tags, thresholds: &TagThresholds) -> (u8, Tags) {
    let mut merged = primary.clone();
    for (k, v) in secondary {
        merged.insert(k.clone(), v.clone());
    }
    for key in DENY_LIST {
        merged.remove(*key);
    }
    if let Some(highway) = secondary.get("highway") {
        merged.insert("highway".to_string(), highway.clone());
    }

    let mut hits = 0u8;
    for key in MATCH_KEYS {
        let (Some(pv), Some(sv)) = (primary.get(*key), secondary.get(*key)) else {
            continue;
        };

        let length_delta = (pv.chars().count() as i64 - sv.chars().count() as i64).abs();
        let ratio = fuzzy::ratio(pv, sv);
        if ratio <= thresholds.match_ratio || length_delta > thresholds.max_length_delta {
            continue;
        }

        hits += 1;
        merged.insert(key.to_string(), pv.clone());
        merged.insert("ratio".to_string(), ratio.to_string());

        if ratio == 100 {
            continue;
        }

        let mut suppress_old = false;
        if key.starts_with("ref") {
            if let (Some(ext_usfs), Some(osm_usfs)) =
                (primary.get("ref:usfs"), secondary.get("ref:usfs"))
            {
                let extref = ext_usfs.split_whitespace().nth(1).map(str::to_uppercase);
                let newref = osm_usfs.split_whitespace().nth(1).map(str::to_uppercase);
                if extref.is_some() && extref == newref {
                    hits += 1;
                    if osm_usfs.starts_with("FS ") && ratio > 80 && ratio < 90 {
                        suppress_old = true;
                    }
                }
            }
        }

        if !suppress_old {
            merged.insert(format!("old_{}", key), sv.clone());
        }
    }

    (hits, merged)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags(pairs: &[(&str, &str)]) -> Tags {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn exact_name_match_counts_one_hit_no_old_value() {
        let primary = tags(&[("name", "Bear Creek Road")]);
        let secondary = tags(&[("name", "Bear Creek Road")]);
        let (hits, merged) = compare(&primary, &secondary, &TagThresholds::default());
        assert_eq!(hits, 1);
        assert!(!merged.contains_key("old_name"));
    }

    #[test]
    fn fuzzy_name_match_caches_old_value() {
        let primary = tags(&[("name", "Bear Creek Road")]);
        let secondary = tags(&[("name", "Bear Creak Road")]);
        let (hits, merged) = compare(&primary, &secondary, &TagThresholds::default());
        assert_eq!(hits, 1);
        assert_eq!(merged.get("name").unwrap(), "Bear Creek Road");
        assert_eq!(merged.get("old_name").unwrap(), "Bear Creak Road");
        assert!(merged.contains_key("ratio"));
    }

    #[test]
    fn exact_match_records_ratio_of_100() {
        let primary = tags(&[("name", "Bear Creek Road")]);
        let secondary = tags(&[("name", "Bear Creek Road")]);
        let (_, merged) = compare(&primary, &secondary, &TagThresholds::default());
        assert_eq!(merged.get("ratio").unwrap(), "100");
    }

    #[test]
    fn fs_to_fr_prefix_rewrite_is_not_cached() {
        let primary = tags(&[("ref:usfs", "FR 123A")]);
        let secondary = tags(&[("ref:usfs", "FS 123A")]);
        let (hits, merged) = compare(&primary, &secondary, &TagThresholds::default());
        assert_eq!(hits, 2);
        assert!(!merged.contains_key("old_ref:usfs"));
    }

    #[test]
    fn deny_listed_odk_tags_are_dropped() {
        let primary = tags(&[("title", "survey title"), ("name", "Bear Creek Road")]);
        let secondary = tags(&[("label", "survey label")]);
        let (_, merged) = compare(&primary, &secondary, &TagThresholds::default());
        assert!(!merged.contains_key("title"));
        assert!(!merged.contains_key("label"));
    }

    #[test]
    fn secondary_highway_value_always_wins() {
        let primary = tags(&[("highway", "path")]);
        let secondary = tags(&[("highway", "track")]);
        let (_, merged) = compare(&primary, &secondary, &TagThresholds::default());
        assert_eq!(merged.get("highway").unwrap(), "track");
    }

    #[test]
    fn unrelated_names_score_no_hit() {
        let primary = tags(&[("name", "Bear Creek Road")]);
        let secondary = tags(&[("name", "Main Street")]);
        let (hits, _) = compare(&primary, &secondary, &TagThresholds::default());
        assert_eq!(hits, 0);
    }
}
