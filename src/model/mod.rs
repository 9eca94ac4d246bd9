pub mod candidate;
pub mod decision;
pub mod feature;
pub mod shape;

pub use candidate::MatchCandidate;
pub use decision::{MatchDecision, ScoreBundle};
pub use feature::{Feature, FeatureVec, Tags};
pub use shape::Geometry;
