use std::fmt::Display;

/// Dense index of a game in the catalog (0..N-1)
///
/// The same id addresses every parallel table of the catalog: items,
/// embeddings and cluster labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ItemId(pub usize);

impl ItemId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl Display for ItemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Interned tag label
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TagId(pub u32);

/// Interned genre label
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GenreId(pub u32);

/// Word-packed set of attribute ids
///
/// All sets built for one catalog share the same capacity, so intersection is
/// a word-wise AND and cardinality a popcount.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AttrSet {
    words: Vec<u64>,
}

impl AttrSet {
    /// Creates an empty set able to hold ids in `0..capacity`
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            words: vec![0; capacity.div_ceil(64)],
        }
    }

    pub fn insert(&mut self, id: u32) {
        let (word, bit) = (id as usize / 64, id as usize % 64);
        if word >= self.words.len() {
            self.words.resize(word + 1, 0);
        }
        self.words[word] |= 1u64 << bit;
    }

    pub fn contains(&self, id: u32) -> bool {
        let (word, bit) = (id as usize / 64, id as usize % 64);
        self.words
            .get(word)
            .map_or(false, |w| w & (1u64 << bit) != 0)
    }

    pub fn len(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.words.iter().all(|w| *w == 0)
    }

    pub fn intersection(&self, other: &AttrSet) -> AttrSet {
        AttrSet {
            words: self
                .words
                .iter()
                .zip(other.words.iter())
                .map(|(a, b)| a & b)
                .collect(),
        }
    }

    /// Size of the intersection without materializing it
    pub fn common_count(&self, other: &AttrSet) -> usize {
        self.words
            .iter()
            .zip(other.words.iter())
            .map(|(a, b)| (a & b).count_ones() as usize)
            .sum()
    }

    /// Members in ascending id order
    pub fn iter(&self) -> impl Iterator<Item = u32> + '_ {
        self.words.iter().enumerate().flat_map(|(i, &word)| {
            (0..64u32)
                .filter(move |bit| word & (1u64 << bit) != 0)
                .map(move |bit| i as u32 * 64 + bit)
        })
    }
}

impl FromIterator<u32> for AttrSet {
    fn from_iter<I: IntoIterator<Item = u32>>(iter: I) -> Self {
        let mut set = AttrSet::default();
        for id in iter {
            set.insert(id);
        }
        set
    }
}

/// A game in the catalog with its precomputed content features
#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    pub id: ItemId,
    /// Unique, case-sensitive
    pub name: String,
    pub developer: String,
    pub tags: AttrSet,
    pub genres: AttrSet,
    pub embedding: Vec<f32>,
    pub cluster: u32,
    /// Fraction of positive reviews, in [0, 1]
    pub rating: f64,
    /// Price in currency units; zero means free to play
    pub price: f64,
}

impl Item {
    pub fn tag_ids(&self) -> impl Iterator<Item = TagId> + '_ {
        self.tags.iter().map(TagId)
    }

    pub fn genre_ids(&self) -> impl Iterator<Item = GenreId> + '_ {
        self.genres.iter().map(GenreId)
    }
}
