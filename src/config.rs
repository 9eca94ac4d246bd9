use crate::error::ConfigError;
use crate::matcher::MatcherThresholds;
use crate::tags::TagThresholds;
use serde::{Deserialize, Serialize};

/// tunables for a conflation run. Defaults match the line-feature
/// thresholds (roads and trails); [`Config::poi_defaults`] loosens the
/// geometry thresholds for point features, which don't have a slope or
/// bearing to compare.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct Config {
    pub max_distance_m: f64,
    /// angle/slope gate applied to a single-tag-hit candidate (the hits==1
    /// "strong alignment" rule); tighter than the caller-facing thresholds
    /// below, which describe how far apart two lines are allowed to drift
    /// before this engine stops treating them as comparable at all.
    pub max_angle_deg: f64,
    pub max_slope_delta: f64,
    /// caller-facing angle threshold, independent of `max_angle_deg`'s
    /// internal single-hit gate — a dataset with looser survey alignment
    /// can widen this without touching the single-hit acceptance rule.
    pub angle_threshold_deg: f64,
    /// caller-facing slope threshold, independent of `max_slope_delta`.
    pub slope_threshold: f64,
    pub tag_match_ratio: u8,
    pub tag_max_length_delta: i64,
    pub scan_cap: usize,
    /// number of rayon workers to use; 1 runs the sequential matcher path.
    /// 0 defers to rayon's own default (usually the number of CPU cores).
    pub workers: usize,
    /// when a matched secondary's tags already equal the merged result
    /// (nothing would actually change), whether to surface that pair in
    /// `updated` anyway. Off by default — a caller re-conflating the same
    /// two datasets usually wants to see only genuine changes.
    pub emit_unchanged: bool,
    /// reject a Point/LineString pairing outright instead of measuring
    /// point-to-polyline distance. See [`crate::matcher::MatcherThresholds::reject_point_line_cross`].
    pub reject_point_line_cross: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            max_distance_m: 2.0,
            max_angle_deg: 15.0,
            max_slope_delta: 1.0,
            angle_threshold_deg: 20.0,
            slope_threshold: 4.0,
            tag_match_ratio: 85,
            tag_max_length_delta: 3,
            scan_cap: 5,
            workers: 0,
            emit_unchanged: false,
            reject_point_line_cross: true,
        }
    }
}

impl Config {
    /// POIs have no line orientation to speak of, so the angle/slope
    /// thresholds that matter for roads and trails are set wide open —
    /// acceptance for points rests entirely on distance and tag match.
    pub fn poi_defaults() -> Self {
        Config {
            max_distance_m: 7.0,
            max_angle_deg: 180.0,
            max_slope_delta: f64::MAX,
            angle_threshold_deg: 180.0,
            slope_threshold: f64::MAX,
            reject_point_line_cross: false,
            ..Config::default()
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_distance_m <= 0.0 {
            return Err(ConfigError::Invalid(
                "max_distance_m must be positive".to_string(),
            ));
        }
        if self.tag_match_ratio > 100 {
            return Err(ConfigError::Invalid(
                "tag_match_ratio must be in 0..=100".to_string(),
            ));
        }
        if self.scan_cap == 0 {
            return Err(ConfigError::Invalid(
                "scan_cap must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn matcher_thresholds(&self) -> MatcherThresholds {
        MatcherThresholds {
            max_distance_m: self.max_distance_m,
            max_angle_deg: self.max_angle_deg,
            max_slope_delta: self.max_slope_delta,
            angle_threshold_deg: self.angle_threshold_deg,
            slope_threshold: self.slope_threshold,
            tags: TagThresholds {
                match_ratio: self.tag_match_ratio,
                max_length_delta: self.tag_max_length_delta,
            },
            scan_cap: self.scan_cap,
            reject_point_line_cross: self.reject_point_line_cross,
        }
    }
}

impl TryFrom<&str> for Config {
    type Error = ConfigError;

    fn try_from(path: &str) -> Result<Self, Self::Error> {
        if path.ends_with(".toml") {
            let s = std::fs::read_to_string(path).map_err(|e| ConfigError::Io(path.to_string(), e))?;
            let config: Config =
                toml::from_str(&s).map_err(|e| ConfigError::Toml(path.to_string(), e))?;
            config.validate()?;
            Ok(config)
        } else if path.ends_with(".json") {
            let s = std::fs::read_to_string(path).map_err(|e| ConfigError::Io(path.to_string(), e))?;
            let config: Config =
                serde_json::from_str(&s).map_err(|e| ConfigError::Json(path.to_string(), e))?;
            config.validate()?;
            Ok(config)
        } else {
            Err(ConfigError::UnsupportedFileType(path.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn poi_defaults_loosen_geometry_thresholds() {
        let poi = Config::poi_defaults();
        assert!(poi.validate().is_ok());
        assert!(poi.max_angle_deg > Config::default().max_angle_deg);
    }

    #[test]
    fn zero_distance_threshold_is_invalid() {
        let mut cfg = Config::default();
        cfg.max_distance_m = 0.0;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn unsupported_extension_is_rejected() {
        let err = Config::try_from("config.yaml");
        assert!(matches!(err, Err(ConfigError::UnsupportedFileType(_))));
    }

    #[test]
    fn angle_and_slope_thresholds_are_distinct_from_the_single_hit_gate() {
        let cfg = Config::default();
        assert_ne!(cfg.angle_threshold_deg, cfg.max_angle_deg);
        assert_ne!(cfg.slope_threshold, cfg.max_slope_delta);

        let t = cfg.matcher_thresholds();
        assert_eq!(t.angle_threshold_deg, cfg.angle_threshold_deg);
        assert_eq!(t.slope_threshold, cfg.slope_threshold);
        assert_eq!(t.reject_point_line_cross, cfg.reject_point_line_cross);
    }
}
