use super::shape::Geometry;
use std::collections::HashMap;

/// tag bag: string key to string value, keys unique, order irrelevant.
pub type Tags = HashMap<String, String>;

/// the universal record passed between components. Read-only once handed
/// to [`crate::conflate`]; candidates and decisions are derived from it.
#[derive(Debug, Clone, PartialEq)]
pub struct Feature {
    pub geometry: Option<Geometry>,
    pub tags: Tags,
    /// ordered node ids backing a way's geometry. Empty for POIs.
    pub refs: Vec<i64>,
}

pub type FeatureVec = Vec<Feature>;

impl Feature {
    pub fn new(geometry: Option<Geometry>, tags: Tags) -> Feature {
        Feature {
            geometry,
            tags,
            refs: Vec::new(),
        }
    }

    /// `id<0` means "originated outside OSM, not yet assigned a canonical id".
    /// Absent `id` tags are treated as external origin per the same rule.
    pub fn id(&self) -> i64 {
        self.tags
            .get("id")
            .and_then(|v| v.parse::<i64>().ok())
            .unwrap_or(-1)
    }

    pub fn version(&self) -> u32 {
        self.tags
            .get("version")
            .and_then(|v| v.parse::<u32>().ok())
            .unwrap_or(1)
    }

    pub fn is_external_origin(&self) -> bool {
        self.id() < 0
    }

    /// a Point carrying only scaffolding tags (`id`/`version`, the
    /// attributes a way node needs and nothing else) is not a POI.
    pub fn is_bare_way_node(&self) -> bool {
        matches!(self.geometry, Some(Geometry::Point(_)))
            && self
                .tags
                .keys()
                .all(|k| k == "id" || k == "version")
    }
}
