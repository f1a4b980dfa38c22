use rayon::prelude::*;

use crate::{
    catalog::CatalogStore,
    models::{Candidate, Item, ItemId, RecommendParams, Tier},
    services::similarity::SimilarityEngine,
};

/// Shared tags required by the cluster fallback tiers
pub const RELAXED_MIN_TAGS: usize = 1;
/// Shared genres required by the cluster fallback tiers
pub const RELAXED_MIN_GENRES: usize = 0;

/// Three-stage candidate search with progressively looser inclusion rules
///
/// 1. Whole catalog, `min_tags` and `min_genres` shared attributes.
/// 2. Games in the target's cluster, at least one shared tag.
/// 3. Games outside the target's cluster, at least one shared tag.
///
/// A tier only runs while fewer than `n_recommendations` candidates have been
/// found, but once started it scans its whole pool. No game is accepted
/// twice and the target never appears in its own results.
pub struct TierSearch<'a> {
    catalog: &'a CatalogStore,
    engine: SimilarityEngine<'a>,
    parallel_threshold: usize,
}

impl<'a> TierSearch<'a> {
    pub fn new(catalog: &'a CatalogStore) -> Self {
        Self {
            catalog,
            engine: SimilarityEngine::new(catalog),
            parallel_threshold: usize::MAX,
        }
    }

    /// Scan pools of at least `threshold` games on the rayon thread pool
    pub fn with_parallel_threshold(mut self, threshold: usize) -> Self {
        self.parallel_threshold = threshold;
        self
    }

    /// Runs the tiers for `target` and returns accepted candidates in
    /// discovery order (tier order, then catalog order within a tier)
    pub fn run(&self, target: ItemId, params: &RecommendParams) -> Vec<Candidate> {
        let target_item = self.catalog.get(target);
        let mut included = vec![false; self.catalog.len()];
        included[target.index()] = true;

        let mut results = self.scan(
            target_item,
            Tier::Strict,
            params.min_tags,
            params.min_genres,
            &mut included,
            |_| true,
        );
        tracing::debug!(
            target = %target_item.name,
            found = results.len(),
            "Strict tier complete"
        );

        if results.len() < params.n_recommendations {
            let cluster = target_item.cluster;
            let found = self.scan(
                target_item,
                Tier::SameCluster,
                RELAXED_MIN_TAGS,
                RELAXED_MIN_GENRES,
                &mut included,
                |item| item.cluster == cluster,
            );
            tracing::debug!(cluster, found = found.len(), "Same-cluster tier complete");
            results.extend(found);
        }

        if results.len() < params.n_recommendations {
            let cluster = target_item.cluster;
            let found = self.scan(
                target_item,
                Tier::OtherClusters,
                RELAXED_MIN_TAGS,
                RELAXED_MIN_GENRES,
                &mut included,
                |item| item.cluster != cluster,
            );
            tracing::debug!(cluster, found = found.len(), "Other-clusters tier complete");
            results.extend(found);
        }

        results
    }

    /// Scores every not-yet-included game of the pool in catalog order and
    /// marks accepted ones as included
    fn scan(
        &self,
        target: &Item,
        tier: Tier,
        min_tags: usize,
        min_genres: usize,
        included: &mut [bool],
        in_pool: impl Fn(&Item) -> bool + Sync,
    ) -> Vec<Candidate> {
        let items = self.catalog.items();
        let seen: &[bool] = included;
        let evaluate = |item: &Item| {
            if seen[item.id.index()] || !in_pool(item) {
                return None;
            }
            self.evaluate(target, item, tier, min_tags, min_genres)
        };

        // rayon's collect keeps catalog order, so ranking ties resolve the
        // same way as in the sequential scan.
        let found: Vec<Candidate> = if items.len() >= self.parallel_threshold {
            items.par_iter().filter_map(evaluate).collect()
        } else {
            items.iter().filter_map(evaluate).collect()
        };

        for candidate in &found {
            included[candidate.id.index()] = true;
        }
        found
    }

    fn evaluate(
        &self,
        target: &Item,
        item: &Item,
        tier: Tier,
        min_tags: usize,
        min_genres: usize,
    ) -> Option<Candidate> {
        let tags_common_count = target.tags.common_count(&item.tags);
        let genres_common_count = target.genres.common_count(&item.genres);
        if tags_common_count < min_tags || genres_common_count < min_genres {
            return None;
        }

        let common_tags = target.tags.intersection(&item.tags);
        let common_genres = target.genres.intersection(&item.genres);
        let weighted_score =
            self.engine
                .weighted_score(target, item, &common_tags, &common_genres);

        Some(Candidate {
            id: item.id,
            tier,
            common_tags,
            tags_common_count,
            common_genres,
            genres_common_count,
            weighted_score,
            rating: item.rating,
        })
    }
}
