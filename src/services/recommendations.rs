use std::sync::Arc;

use tracing::instrument;

use crate::{
    catalog::CatalogStore,
    config::SearchSettings,
    error::{AppError, AppResult},
    models::{
        GameDetails, GenreId, Item, ItemId, RecommendParams, RecommendationRecord, TagId,
    },
    services::{ranking, tier_search::TierSearch},
};

/// Internal prefix carried by tag labels in the catalog tables
pub const TAG_PREFIX: &str = "tag_";
/// Internal prefix carried by genre labels in the catalog tables
pub const GENRE_PREFIX: &str = "gen_";

/// Recommends games similar to a named game
///
/// Resolves the name against the catalog, runs the tier search, ranks the
/// candidate pool and formats the top entries. The catalog is shared
/// read-only; every call allocates its own candidate list.
#[derive(Debug, Clone)]
pub struct RecommendationService {
    catalog: Arc<CatalogStore>,
    settings: SearchSettings,
}

impl RecommendationService {
    pub fn new(catalog: Arc<CatalogStore>, settings: SearchSettings) -> Self {
        Self { catalog, settings }
    }

    pub fn catalog(&self) -> &CatalogStore {
        &self.catalog
    }

    /// Fills unspecified request parameters from the configured defaults
    pub fn params(
        &self,
        n_recommendations: Option<usize>,
        min_tags: Option<usize>,
        min_genres: Option<usize>,
    ) -> AppResult<RecommendParams> {
        let params = RecommendParams {
            n_recommendations: n_recommendations.unwrap_or(self.settings.default_recommendations),
            min_tags: min_tags.unwrap_or(self.settings.default_min_tags),
            min_genres: min_genres.unwrap_or(self.settings.default_min_genres),
        };

        if params.n_recommendations == 0 {
            return Err(AppError::InvalidInput(
                "n_recommendations must be positive".to_string(),
            ));
        }
        if params.n_recommendations > self.settings.max_recommendations {
            return Err(AppError::InvalidInput(format!(
                "n_recommendations must not exceed {}",
                self.settings.max_recommendations
            )));
        }

        Ok(params)
    }

    /// Ranked recommendations for the game called `name`
    ///
    /// An unknown name fails with `NotFound` carrying up to three
    /// suggestions. Finding no candidate at all yields an empty list.
    #[instrument(skip(self), fields(n = params.n_recommendations))]
    pub fn recommend(
        &self,
        name: &str,
        params: RecommendParams,
    ) -> AppResult<Vec<RecommendationRecord>> {
        if params.n_recommendations == 0 {
            return Err(AppError::InvalidInput(
                "n_recommendations must be positive".to_string(),
            ));
        }

        let target = self.catalog.resolve(name).map_err(|e| {
            tracing::info!(error = %e, "Query game not in catalog");
            e
        })?;

        let candidates = TierSearch::new(&self.catalog)
            .with_parallel_threshold(self.settings.parallel_scan_threshold)
            .run(target, &params);
        let pool_size = candidates.len();
        let ranked = ranking::rank(candidates, params.n_recommendations);

        tracing::info!(
            pool_size,
            returned = ranked.len(),
            "Recommendations ranked"
        );

        let target_item = self.catalog.get(target);
        Ok(ranked
            .iter()
            .map(|c| self.format_record(target_item, c.id))
            .collect())
    }

    /// Display view of a single game
    pub fn details(&self, name: &str) -> AppResult<GameDetails> {
        let item = self.catalog.get(self.catalog.resolve(name)?);
        Ok(GameDetails {
            name: item.name.clone(),
            developer: item.developer.clone(),
            tags: item
                .tag_ids()
                .map(|t| strip_prefix(self.catalog.tag_label(t), TAG_PREFIX).to_string())
                .collect(),
            genres: item
                .genre_ids()
                .map(|g| strip_prefix(self.catalog.genre_label(g), GENRE_PREFIX).to_string())
                .collect(),
            rating: format_rating(item.rating),
            price: format_price(item.price),
            cluster: item.cluster,
        })
    }

    /// Up to three names containing `partial`, case-insensitively
    pub fn suggest(&self, partial: &str) -> Vec<String> {
        self.catalog.suggest(partial)
    }

    fn format_record(&self, target: &Item, id: ItemId) -> RecommendationRecord {
        let item = self.catalog.get(id);
        let common_tags = target
            .tags
            .intersection(&item.tags)
            .iter()
            .map(|t| strip_prefix(self.catalog.tag_label(TagId(t)), TAG_PREFIX))
            .collect::<Vec<_>>()
            .join(", ");
        let common_genres = target
            .genres
            .intersection(&item.genres)
            .iter()
            .map(|g| strip_prefix(self.catalog.genre_label(GenreId(g)), GENRE_PREFIX))
            .collect::<Vec<_>>()
            .join(", ");

        RecommendationRecord {
            name: item.name.clone(),
            developer: item.developer.clone(),
            common_tags,
            common_genres,
            rating: format_rating(item.rating),
            price: format_price(item.price),
            cluster: item.cluster,
        }
    }
}

fn strip_prefix<'a>(label: &'a str, prefix: &str) -> &'a str {
    label.strip_prefix(prefix).unwrap_or(label)
}

/// Integer percentage, rounded half away from zero: 0.865 -> "87%"
pub fn format_rating(rating: f64) -> String {
    format!("{}%", (rating * 100.0).round() as i64)
}

/// "$X.XX", or "Free" for a zero price
///
/// Cents are rounded from the exact binary value, so 0.005 (stored just
/// above the tie) prints "$0.01" and 2.675 (stored just below) "$2.67".
pub fn format_price(price: f64) -> String {
    if price > 0.0 {
        format!("${:.2}", price)
    } else {
        "Free".to_string()
    }
}
