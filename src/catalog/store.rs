use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::{
    error::{AppError, AppResult},
    models::{AttrSet, GenreId, Item, ItemId, TagId},
};

/// Maximum number of names offered when a lookup misses
pub const MAX_SUGGESTIONS: usize = 3;

/// One row of the item table as delivered by the catalog source
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ItemRow {
    pub name: String,
    #[serde(default)]
    pub developer: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub genres: Vec<String>,
    pub rating: f64,
    #[serde(default)]
    pub price: f64,
}

/// Raw, index-aligned catalog tables
///
/// `items`, `embeddings` and `clusters` are parallel arrays addressed by the
/// same row index. Frequency tables are optional; when absent they are
/// derived from tag/genre membership.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CatalogTables {
    pub items: Vec<ItemRow>,
    pub embeddings: Vec<Vec<f32>>,
    pub clusters: Vec<u32>,
    #[serde(default)]
    pub tag_frequencies: Option<HashMap<String, f64>>,
    #[serde(default)]
    pub genre_frequencies: Option<HashMap<String, f64>>,
}

/// Label interner handing out ids in first-seen order
#[derive(Default)]
struct Interner {
    ids: HashMap<String, u32>,
    labels: Vec<String>,
}

impl Interner {
    fn intern(&mut self, label: &str) -> u32 {
        if let Some(id) = self.ids.get(label) {
            return *id;
        }
        let id = self.labels.len() as u32;
        self.ids.insert(label.to_string(), id);
        self.labels.push(label.to_string());
        id
    }
}

/// Immutable, indexed view of every game plus the attribute frequency tables
///
/// Built once at startup and shared read-only by all requests.
#[derive(Debug, Clone)]
pub struct CatalogStore {
    items: Vec<Item>,
    tag_labels: Vec<String>,
    genre_labels: Vec<String>,
    tag_frequencies: Vec<f64>,
    genre_frequencies: Vec<f64>,
    by_name: HashMap<String, ItemId>,
    lowercase_names: Vec<String>,
    dimensions: usize,
}

impl CatalogStore {
    /// Validates the raw tables and builds the store
    ///
    /// Fails with `ConfigMismatch` when the parallel tables disagree in
    /// length, embeddings disagree in dimensionality, names repeat, or an
    /// attribute lacks a usable frequency.
    pub fn from_tables(tables: CatalogTables) -> AppResult<Self> {
        let CatalogTables {
            items: rows,
            embeddings,
            clusters,
            tag_frequencies,
            genre_frequencies,
        } = tables;

        if rows.len() != embeddings.len() || rows.len() != clusters.len() {
            return Err(AppError::ConfigMismatch(format!(
                "table lengths differ: {} items, {} embeddings, {} cluster labels",
                rows.len(),
                embeddings.len(),
                clusters.len()
            )));
        }

        let dimensions = embeddings.first().map_or(0, Vec::len);
        if !rows.is_empty() && dimensions == 0 {
            return Err(AppError::ConfigMismatch(
                "embeddings must have at least one dimension".to_string(),
            ));
        }
        if let Some((idx, vector)) = embeddings
            .iter()
            .enumerate()
            .find(|(_, v)| v.len() != dimensions)
        {
            return Err(AppError::ConfigMismatch(format!(
                "embedding {} has {} dimensions, expected {}",
                idx,
                vector.len(),
                dimensions
            )));
        }

        let mut tags = Interner::default();
        let mut genres = Interner::default();
        let mut by_name = HashMap::with_capacity(rows.len());

        for (idx, row) in rows.iter().enumerate() {
            if by_name.insert(row.name.clone(), ItemId(idx)).is_some() {
                return Err(AppError::ConfigMismatch(format!(
                    "duplicate game name '{}'",
                    row.name
                )));
            }
            if !(0.0..=1.0).contains(&row.rating) {
                return Err(AppError::ConfigMismatch(format!(
                    "game '{}' has rating {} outside [0, 1]",
                    row.name, row.rating
                )));
            }
            if !row.price.is_finite() || row.price < 0.0 {
                return Err(AppError::ConfigMismatch(format!(
                    "game '{}' has invalid price {}",
                    row.name, row.price
                )));
            }
            for label in &row.tags {
                tags.intern(label);
            }
            for label in &row.genres {
                genres.intern(label);
            }
        }

        let tag_capacity = tags.labels.len();
        let genre_capacity = genres.labels.len();

        let items: Vec<Item> = rows
            .into_iter()
            .zip(embeddings)
            .zip(clusters)
            .enumerate()
            .map(|(idx, ((row, embedding), cluster))| {
                let mut tag_set = AttrSet::with_capacity(tag_capacity);
                for label in &row.tags {
                    tag_set.insert(tags.intern(label));
                }
                let mut genre_set = AttrSet::with_capacity(genre_capacity);
                for label in &row.genres {
                    genre_set.insert(genres.intern(label));
                }
                Item {
                    id: ItemId(idx),
                    name: row.name,
                    developer: row.developer,
                    tags: tag_set,
                    genres: genre_set,
                    embedding,
                    cluster,
                    rating: row.rating,
                    price: row.price,
                }
            })
            .collect();

        let tag_frequencies = resolve_frequencies(
            "tag",
            &tags.labels,
            tag_frequencies.as_ref(),
            &items,
            |item| &item.tags,
        )?;
        let genre_frequencies = resolve_frequencies(
            "genre",
            &genres.labels,
            genre_frequencies.as_ref(),
            &items,
            |item| &item.genres,
        )?;

        let lowercase_names = items.iter().map(|i| i.name.to_lowercase()).collect();

        tracing::info!(
            games = items.len(),
            dimensions,
            tags = tags.labels.len(),
            genres = genres.labels.len(),
            "Catalog built"
        );

        Ok(Self {
            items,
            tag_labels: tags.labels,
            genre_labels: genres.labels,
            tag_frequencies,
            genre_frequencies,
            by_name,
            lowercase_names,
            dimensions,
        })
    }

    /// Exact, case-sensitive name lookup
    ///
    /// A miss carries up to three suggestions from [`CatalogStore::suggest`].
    pub fn resolve(&self, name: &str) -> AppResult<ItemId> {
        self.by_name
            .get(name)
            .copied()
            .ok_or_else(|| AppError::NotFound {
                query: name.to_string(),
                suggestions: self.suggest(name),
            })
    }

    /// Case-insensitive substring match over all names, in catalog order
    pub fn suggest(&self, partial: &str) -> Vec<String> {
        let needle = partial.to_lowercase();
        self.lowercase_names
            .iter()
            .enumerate()
            .filter(|(_, name)| name.contains(&needle))
            .take(MAX_SUGGESTIONS)
            .map(|(idx, _)| self.items[idx].name.clone())
            .collect()
    }

    pub fn get(&self, id: ItemId) -> &Item {
        &self.items[id.index()]
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    pub fn tag_count(&self) -> usize {
        self.tag_labels.len()
    }

    pub fn genre_count(&self) -> usize {
        self.genre_labels.len()
    }

    pub fn tag_frequency(&self, tag: TagId) -> f64 {
        self.tag_frequencies[tag.0 as usize]
    }

    pub fn genre_frequency(&self, genre: GenreId) -> f64 {
        self.genre_frequencies[genre.0 as usize]
    }

    pub fn tag_label(&self, tag: TagId) -> &str {
        &self.tag_labels[tag.0 as usize]
    }

    pub fn genre_label(&self, genre: GenreId) -> &str {
        &self.genre_labels[genre.0 as usize]
    }

    /// All names, sorted
    pub fn sorted_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.items.iter().map(|i| i.name.as_str()).collect();
        names.sort_unstable();
        names
    }
}

/// Looks up each label in the supplied table, or derives the frequency from
/// membership when no table was supplied
fn resolve_frequencies(
    kind: &str,
    labels: &[String],
    supplied: Option<&HashMap<String, f64>>,
    items: &[Item],
    members: impl Fn(&Item) -> &AttrSet,
) -> AppResult<Vec<f64>> {
    let frequencies: Vec<f64> = match supplied {
        Some(table) => labels
            .iter()
            .map(|label| {
                table.get(label).copied().ok_or_else(|| {
                    AppError::ConfigMismatch(format!(
                        "{} '{}' is missing from the frequency table",
                        kind, label
                    ))
                })
            })
            .collect::<AppResult<_>>()?,
        None => {
            let mut counts = vec![0usize; labels.len()];
            for item in items {
                for id in members(item).iter() {
                    counts[id as usize] += 1;
                }
            }
            counts
                .into_iter()
                .map(|count| count as f64 / items.len() as f64)
                .collect()
        }
    };

    if let Some((label, freq)) = labels
        .iter()
        .zip(&frequencies)
        .find(|(_, f)| !(f.is_finite() && **f > 0.0 && **f <= 1.0))
    {
        return Err(AppError::ConfigMismatch(format!(
            "{} '{}' has frequency {} outside (0, 1]",
            kind, label, freq
        )));
    }

    Ok(frequencies)
}
