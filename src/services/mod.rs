pub mod ranking;
pub mod recommendations;
pub mod similarity;
pub mod tier_search;

pub use recommendations::RecommendationService;
pub use similarity::SimilarityEngine;
pub use tier_search::TierSearch;
