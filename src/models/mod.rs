pub mod item;
pub mod recommendation;

pub use item::{AttrSet, GenreId, Item, ItemId, TagId};
pub use recommendation::{
    Candidate, GameDetails, RecommendParams, RecommendationRecord, Tier,
    DEFAULT_MIN_GENRES, DEFAULT_MIN_TAGS, DEFAULT_RECOMMENDATIONS,
};
