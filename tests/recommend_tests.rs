use std::collections::HashSet;
use std::sync::Arc;

use game_recs::{
    catalog::{CatalogStore, CatalogTables, ItemRow},
    config::SearchSettings,
    error::AppError,
    models::{ItemId, RecommendParams, Tier},
    services::{ranking, RecommendationService, TierSearch},
};

fn row(name: &str, tags: &[&str], genres: &[&str], rating: f64, price: f64) -> ItemRow {
    ItemRow {
        name: name.to_string(),
        developer: format!("{} Games", name),
        tags: tags.iter().map(|t| t.to_string()).collect(),
        genres: genres.iter().map(|g| g.to_string()).collect(),
        rating,
        price,
    }
}

/// A shares 3 tags / 2 genres with B, 1 tag / 0 genres with C (same
/// cluster), 1 tag / 0 genres with D and nothing with E (other cluster)
fn five_game_catalog() -> CatalogStore {
    CatalogStore::from_tables(CatalogTables {
        items: vec![
            row(
                "A",
                &["tag_Roguelike", "tag_Pixel Graphics", "tag_Difficult", "tag_Dungeon"],
                &["gen_Action", "gen_Indie"],
                0.9,
                14.99,
            ),
            row(
                "B",
                &["tag_Roguelike", "tag_Pixel Graphics", "tag_Difficult"],
                &["gen_Action", "gen_Indie"],
                0.85,
                9.99,
            ),
            row("C", &["tag_Dungeon"], &["gen_RPG"], 0.7, 0.0),
            row("D", &["tag_Difficult", "tag_Racing"], &["gen_Sports"], 0.6, 4.99),
            row("E", &["tag_Racing"], &["gen_Sports"], 0.95, 0.005),
        ],
        embeddings: vec![
            vec![0.0, 0.0, 0.0],
            vec![0.1, 0.0, 0.0],
            vec![0.5, 0.5, 0.0],
            vec![2.0, 1.0, 1.0],
            vec![3.0, 3.0, 3.0],
        ],
        clusters: vec![0, 1, 0, 2, 2],
        tag_frequencies: None,
        genre_frequencies: None,
    })
    .unwrap()
}

fn service(store: CatalogStore) -> RecommendationService {
    RecommendationService::new(Arc::new(store), SearchSettings::default())
}

fn params(n: usize) -> RecommendParams {
    RecommendParams {
        n_recommendations: n,
        ..RecommendParams::default()
    }
}

#[test]
fn test_end_to_end_three_recommendations() {
    let service = service(five_game_catalog());
    let records = service.recommend("A", params(3)).unwrap();

    let names: Vec<_> = records.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["B", "C", "D"]);

    assert_eq!(records[0].common_tags, "Roguelike, Pixel Graphics, Difficult");
    assert_eq!(records[0].common_genres, "Action, Indie");
    assert_eq!(records[0].rating, "85%");
    assert_eq!(records[0].price, "$9.99");
    assert_eq!(records[0].cluster, 1);

    assert_eq!(records[1].common_tags, "Dungeon");
    assert_eq!(records[1].common_genres, "");
    assert_eq!(records[1].price, "Free");

    assert_eq!(records[2].common_tags, "Difficult");
    assert_eq!(records[2].cluster, 2);
}

#[test]
fn test_other_clusters_tier_runs_only_when_short() {
    let store = five_game_catalog();
    let search = TierSearch::new(&store);

    let found = search.run(ItemId(0), &params(3));
    let tiers: Vec<_> = found.iter().map(|c| (c.id, c.tier)).collect();
    assert_eq!(
        tiers,
        vec![
            (ItemId(1), Tier::Strict),
            (ItemId(2), Tier::SameCluster),
            (ItemId(3), Tier::OtherClusters),
        ]
    );

    // Two strict + same-cluster matches satisfy n = 2
    let found = search.run(ItemId(0), &params(2));
    assert!(found.iter().all(|c| c.tier != Tier::OtherClusters));
}

#[test]
fn test_games_sharing_no_tag_are_never_recommended() {
    let service = service(five_game_catalog());
    let records = service.recommend("A", params(10)).unwrap();

    assert_eq!(records.len(), 3);
    assert!(records.iter().all(|r| r.name != "E"));
}

#[test]
fn test_game_never_recommends_itself() {
    let store = five_game_catalog();
    let names: Vec<String> = store.items().iter().map(|i| i.name.clone()).collect();
    let service = service(store);

    for name in names {
        let records = service.recommend(&name, params(10)).unwrap();
        assert!(records.iter().all(|r| r.name != name), "{} recommended itself", name);

        let unique: HashSet<_> = records.iter().map(|r| r.name.clone()).collect();
        assert_eq!(unique.len(), records.len());
    }
}

#[test]
fn test_strict_results_respect_thresholds() {
    let store = five_game_catalog();
    let strict = RecommendParams {
        n_recommendations: 1,
        min_tags: 3,
        min_genres: 2,
    };

    let found = TierSearch::new(&store).run(ItemId(0), &strict);
    for candidate in found.iter().filter(|c| c.tier == Tier::Strict) {
        assert!(candidate.tags_common_count >= 3);
        assert!(candidate.genres_common_count >= 2);
    }
}

#[test]
fn test_ranked_pool_is_sorted_descending() {
    let store = five_game_catalog();
    let found = TierSearch::new(&store).run(ItemId(3), &params(10));
    let ranked = ranking::rank(found.clone(), 10);

    assert_eq!(ranked.len(), found.len());
    for pair in ranked.windows(2) {
        assert_ne!(
            ranking::compare(&pair[0], &pair[1]),
            std::cmp::Ordering::Greater
        );
    }
}

#[test]
fn test_result_length_is_min_of_requested_and_found() {
    let service = service(five_game_catalog());

    assert_eq!(service.recommend("A", params(1)).unwrap().len(), 1);
    assert_eq!(service.recommend("A", params(50)).unwrap().len(), 3);
}

#[test]
fn test_repeated_query_is_identical() {
    let service = service(five_game_catalog());

    let first = service.recommend("D", params(5)).unwrap();
    let second = service.recommend("D", params(5)).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_unknown_game_returns_suggestions() {
    let service = service(five_game_catalog());

    match service.recommend("a", params(5)) {
        Err(AppError::NotFound { query, suggestions }) => {
            assert_eq!(query, "a");
            assert_eq!(suggestions, vec!["A"]);
        }
        other => panic!("expected NotFound, got {:?}", other),
    }
}

#[test]
fn test_price_rounding_in_records() {
    let service = service(five_game_catalog());
    let records = service.recommend("D", params(5)).unwrap();

    let e = records.iter().find(|r| r.name == "E").unwrap();
    assert_eq!(e.price, "$0.01");
    assert_eq!(e.rating, "95%");
}
