use serde::{Deserialize, Serialize};

use super::{AttrSet, ItemId};

/// Default number of recommendations returned per query
pub const DEFAULT_RECOMMENDATIONS: usize = 5;
/// Default minimum number of shared tags for a first-tier match
pub const DEFAULT_MIN_TAGS: usize = 2;
/// Default minimum number of shared genres for a first-tier match
pub const DEFAULT_MIN_GENRES: usize = 2;

/// Parameters of a single recommendation query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecommendParams {
    pub n_recommendations: usize,
    pub min_tags: usize,
    pub min_genres: usize,
}

impl Default for RecommendParams {
    fn default() -> Self {
        Self {
            n_recommendations: DEFAULT_RECOMMENDATIONS,
            min_tags: DEFAULT_MIN_TAGS,
            min_genres: DEFAULT_MIN_GENRES,
        }
    }
}

/// Search tier a candidate was discovered in
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Tier {
    /// Whole catalog, strict tag and genre thresholds
    Strict,
    /// Same cluster as the target, at least one shared tag
    SameCluster,
    /// Other clusters, at least one shared tag
    OtherClusters,
}

/// A scored candidate accepted by the tier search
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub id: ItemId,
    pub tier: Tier,
    pub common_tags: AttrSet,
    pub tags_common_count: usize,
    pub common_genres: AttrSet,
    pub genres_common_count: usize,
    pub weighted_score: f64,
    pub rating: f64,
}

/// A recommended game as returned to the caller
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecommendationRecord {
    pub name: String,
    pub developer: String,
    /// Comma-joined tag labels shared with the queried game
    pub common_tags: String,
    /// Comma-joined genre labels shared with the queried game
    pub common_genres: String,
    /// Integer percentage, e.g. "86%"
    pub rating: String,
    /// "$X.XX", or "Free" when the game costs nothing
    pub price: String,
    pub cluster: u32,
}

/// Display view of a single game
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GameDetails {
    pub name: String,
    pub developer: String,
    pub tags: Vec<String>,
    pub genres: Vec<String>,
    pub rating: String,
    pub price: String,
    pub cluster: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_params() {
        let params = RecommendParams::default();
        assert_eq!(params.n_recommendations, 5);
        assert_eq!(params.min_tags, 2);
        assert_eq!(params.min_genres, 2);
    }

    #[test]
    fn test_record_serialization() {
        let record = RecommendationRecord {
            name: "Portal".to_string(),
            developer: "Valve".to_string(),
            common_tags: "Puzzle, Sci-fi".to_string(),
            common_genres: "Action".to_string(),
            rating: "97%".to_string(),
            price: "$9.99".to_string(),
            cluster: 3,
        };

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["common_tags"], "Puzzle, Sci-fi");
        assert_eq!(json["price"], "$9.99");
        assert_eq!(json["cluster"], 3);
    }
}
