use std::cmp::Ordering;

use crate::models::Candidate;

/// Descending order on `(genres_common, tags_common, weighted_score, rating)`
pub fn compare(a: &Candidate, b: &Candidate) -> Ordering {
    b.genres_common_count
        .cmp(&a.genres_common_count)
        .then_with(|| b.tags_common_count.cmp(&a.tags_common_count))
        .then_with(|| b.weighted_score.total_cmp(&a.weighted_score))
        .then_with(|| b.rating.total_cmp(&a.rating))
}

/// Sorts the candidate pool and keeps the first `n`
///
/// The sort is stable: candidates equal on every key keep their discovery
/// order. Fewer than `n` candidates is not an error.
pub fn rank(mut candidates: Vec<Candidate>, n: usize) -> Vec<Candidate> {
    candidates.sort_by(compare);
    candidates.truncate(n);
    candidates
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AttrSet, ItemId, Tier};

    fn candidate(id: usize, genres: usize, tags: usize, score: f64, rating: f64) -> Candidate {
        Candidate {
            id: ItemId(id),
            tier: Tier::Strict,
            common_tags: AttrSet::default(),
            tags_common_count: tags,
            common_genres: AttrSet::default(),
            genres_common_count: genres,
            weighted_score: score,
            rating,
        }
    }

    fn ids(ranked: &[Candidate]) -> Vec<usize> {
        ranked.iter().map(|c| c.id.0).collect()
    }

    #[test]
    fn test_genre_overlap_dominates() {
        let pool = vec![
            candidate(0, 1, 9, 100.0, 1.0),
            candidate(1, 2, 1, 1.0, 0.1),
        ];
        assert_eq!(ids(&rank(pool, 5)), vec![1, 0]);
    }

    #[test]
    fn test_tags_then_score_then_rating() {
        let pool = vec![
            candidate(0, 1, 2, 5.0, 0.5),
            candidate(1, 1, 3, 1.0, 0.5),
            candidate(2, 1, 2, 7.0, 0.5),
            candidate(3, 1, 2, 5.0, 0.9),
        ];
        assert_eq!(ids(&rank(pool, 5)), vec![1, 2, 3, 0]);
    }

    #[test]
    fn test_exact_ties_keep_discovery_order() {
        let pool = vec![
            candidate(4, 1, 1, 2.0, 0.5),
            candidate(2, 1, 1, 2.0, 0.5),
            candidate(9, 1, 1, 2.0, 0.5),
        ];
        assert_eq!(ids(&rank(pool, 5)), vec![4, 2, 9]);
    }

    #[test]
    fn test_truncates_to_n() {
        let pool = (0..10).map(|i| candidate(i, 0, 1, i as f64, 0.5)).collect();
        assert_eq!(ids(&rank(pool, 3)), vec![9, 8, 7]);
    }

    #[test]
    fn test_fewer_than_n_returns_all() {
        let pool = vec![candidate(0, 0, 1, 1.0, 0.5)];
        assert_eq!(rank(pool, 5).len(), 1);
        assert!(rank(Vec::new(), 5).is_empty());
    }
}
