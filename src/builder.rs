use std::cell::Cell;
use std::collections::hash_map::RandomState;
use std::hash::{BuildHasher, Hash};

use crate::node::Bucket;
use crate::table::Table;

/// Default initial logical bucket count (`M0`), matching the reference
/// program's default.
pub(crate) const DEFAULT_INITIAL_BUCKETS: usize = 4;
/// Default load factor above which an `insert` triggers a split.
pub(crate) const DEFAULT_MAX_FILL_FACTOR: f64 = 0.75;
/// Default load factor below which a `remove` triggers a merge.
pub(crate) const DEFAULT_LOWER_BOUND: f64 = 0.40;

/// Initialise a new [`Table`] instance.
///
/// By default a builder constructs an empty table using `M0 = 4`, a maximum
/// fill factor of `0.75`, a lower bound of `0.40`, and the standard library's
/// [`RandomState`] hasher:
///
/// ```rust
/// use linearhash::Table;
///
/// let mut table: Table<String, u32> = Table::new();
/// table.insert("a".to_string(), 1).unwrap();
/// ```
///
/// Any of these can be overridden, and the hash implementation can be
/// swapped with [`with_hasher`]:
///
/// ```rust
/// use fnv::FnvBuildHasher;
/// use linearhash::Builder;
///
/// let table = Builder::with_hasher(FnvBuildHasher::default())
///     .with_initial_buckets(8)
///     .build::<String, u32>();
/// ```
///
/// [`with_hasher`]: Self::with_hasher
#[derive(Debug, Clone)]
pub struct Builder<S> {
    hasher: S,
    initial_buckets: usize,
    max_fill_factor: f64,
    lower_bound: f64,
}

impl Default for Builder<RandomState> {
    fn default() -> Self {
        Self {
            hasher: RandomState::default(),
            initial_buckets: DEFAULT_INITIAL_BUCKETS,
            max_fill_factor: DEFAULT_MAX_FILL_FACTOR,
            lower_bound: DEFAULT_LOWER_BOUND,
        }
    }
}

impl<S> Builder<S>
where
    S: BuildHasher,
{
    /// Use the provided hash algorithm when hashing keys.
    pub fn with_hasher(hasher: S) -> Self {
        Self {
            hasher,
            initial_buckets: DEFAULT_INITIAL_BUCKETS,
            max_fill_factor: DEFAULT_MAX_FILL_FACTOR,
            lower_bound: DEFAULT_LOWER_BOUND,
        }
    }

    /// Set the initial logical bucket count (`M0`).
    ///
    /// # Panics
    ///
    /// Panics if `n` is zero.
    pub fn with_initial_buckets(self, n: usize) -> Self {
        assert!(n > 0, "initial bucket count must be non-zero");
        Self {
            initial_buckets: n,
            ..self
        }
    }

    /// Set the load factor above which an `insert` triggers a split.
    ///
    /// # Panics
    ///
    /// Panics unless `0.0 < factor` and `factor > lower_bound`.
    pub fn with_max_fill_factor(self, factor: f64) -> Self {
        assert!(factor > self.lower_bound, "max_fill_factor must exceed lower_bound");
        Self {
            max_fill_factor: factor,
            ..self
        }
    }

    /// Set the load factor below which a `remove` triggers a merge.
    ///
    /// # Panics
    ///
    /// Panics unless `0.0 <= bound` and `bound < max_fill_factor`.
    pub fn with_lower_bound(self, bound: f64) -> Self {
        assert!(bound >= 0.0, "lower_bound must not be negative");
        assert!(bound < self.max_fill_factor, "lower_bound must be below max_fill_factor");
        Self {
            lower_bound: bound,
            ..self
        }
    }

    /// Construct the [`Table`], empty, ready to accept keys of type `K` and
    /// values of type `V`.
    pub fn build<K, V>(self) -> Table<K, V, S>
    where
        K: Hash,
    {
        let m0 = self.initial_buckets;
        let buckets = (0..m0).map(|_| Bucket::empty()).collect::<Vec<_>>();

        Table {
            buckets,
            m0,
            i: 0,
            p: 0,
            bucket_count: m0,
            capacity: m0,
            data_count: 0,
            visited: Cell::new(0),
            max_fill_factor: self.max_fill_factor,
            lower_bound: self.lower_bound,
            hasher: self.hasher,
        }
    }
}
