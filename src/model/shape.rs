use geo::{LineString, Point, Polygon};

/// A feature's geometry. Coordinates are WGS84 decimal degrees on input;
/// the same shape is reused to hold projected (meter) coordinates once
/// [`crate::geometry::project`] has run over a feature.
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    Point(Point<f64>),
    LineString(LineString<f64>),
    Polygon(Polygon<f64>),
}

impl Geometry {
    pub fn point(lon: f64, lat: f64) -> Geometry {
        Geometry::Point(Point::new(lon, lat))
    }

    pub fn line_string(coords: Vec<(f64, f64)>) -> Geometry {
        Geometry::LineString(LineString::from(coords))
    }

    pub fn polygon(outer: Vec<(f64, f64)>, holes: Vec<Vec<(f64, f64)>>) -> Geometry {
        Geometry::Polygon(Polygon::new(
            LineString::from(outer),
            holes.into_iter().map(LineString::from).collect(),
        ))
    }

    /// a LineString with fewer than 2 distinct points, or a Polygon whose
    /// outer ring isn't closed, violates the data model's invariants.
    pub fn is_structurally_valid(&self) -> bool {
        match self {
            Geometry::Point(_) => true,
            Geometry::LineString(ls) => {
                ls.0.len() >= 2 && ls.0.iter().any(|c| *c != ls.0[0])
            }
            Geometry::Polygon(p) => {
                let ring = p.exterior();
                ring.0.len() >= 4 && ring.0.first() == ring.0.last()
            }
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Geometry::Point(_) => "Point",
            Geometry::LineString(_) => "LineString",
            Geometry::Polygon(_) => "Polygon",
        }
    }
}
