use crate::{
    catalog::CatalogStore,
    models::{AttrSet, GenreId, Item, TagId},
};

/// Weight of the shared-tag rarity term
pub const TAG_WEIGHT: f64 = 5.0;
/// Weight of the shared-genre rarity term
pub const GENRE_WEIGHT: f64 = 1.0;
/// Keeps the inverse frequency finite
pub const RARITY_EPSILON: f64 = 1e-6;
/// Scale applied to embedding distance before inversion
pub const DISTANCE_SCALE: f64 = 0.5;

/// Inverse-frequency weight of one attribute
pub fn rarity(frequency: f64) -> f64 {
    1.0 / (frequency + RARITY_EPSILON)
}

/// Sum of inverse frequencies over a set of shared attributes
///
/// An empty set scores 1.0 rather than 0.0.
pub fn rarity_score(frequencies: impl IntoIterator<Item = f64>) -> f64 {
    let mut frequencies = frequencies.into_iter().peekable();
    if frequencies.peek().is_none() {
        return 1.0;
    }
    frequencies.map(rarity).sum()
}

/// Euclidean distance between two equal-length embeddings
pub fn euclidean_distance(a: &[f32], b: &[f32]) -> f64 {
    a.iter()
        .zip(b)
        .map(|(x, y)| {
            let d = f64::from(*x) - f64::from(*y);
            d * d
        })
        .sum::<f64>()
        .sqrt()
}

/// Maps an embedding distance into (0, 1], 1.0 for identical vectors
pub fn embedding_similarity(a: &[f32], b: &[f32]) -> f64 {
    1.0 / (1.0 + DISTANCE_SCALE * euclidean_distance(a, b))
}

/// Weighted similarity between a target game and a candidate
///
/// Shared tags and genres are weighted by rarity, so an uncommon shared
/// attribute counts for more than a common one. Embedding proximity scales
/// the result.
#[derive(Debug, Clone, Copy)]
pub struct SimilarityEngine<'a> {
    catalog: &'a CatalogStore,
}

impl<'a> SimilarityEngine<'a> {
    pub fn new(catalog: &'a CatalogStore) -> Self {
        Self { catalog }
    }

    pub fn tag_rarity(&self, common_tags: &AttrSet) -> f64 {
        rarity_score(
            common_tags
                .iter()
                .map(|t| self.catalog.tag_frequency(TagId(t))),
        )
    }

    pub fn genre_rarity(&self, common_genres: &AttrSet) -> f64 {
        rarity_score(
            common_genres
                .iter()
                .map(|g| self.catalog.genre_frequency(GenreId(g))),
        )
    }

    /// Score of `candidate` against `target` given their shared attributes
    pub fn weighted_score(
        &self,
        target: &Item,
        candidate: &Item,
        common_tags: &AttrSet,
        common_genres: &AttrSet,
    ) -> f64 {
        let similarity = embedding_similarity(&target.embedding, &candidate.embedding);
        similarity
            * (TAG_WEIGHT * self.tag_rarity(common_tags)
                + GENRE_WEIGHT * self.genre_rarity(common_genres))
    }
}
