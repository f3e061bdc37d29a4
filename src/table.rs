use std::cell::Cell;
use std::collections::hash_map::RandomState;
use std::hash::{BuildHasher, Hash, Hasher};

use crate::builder::Builder;
use crate::error::{Error, Result};
use crate::iter::BucketIter;
use crate::node::{Bucket, Node};

/// A dynamic chained linear hashing table.
///
/// `Table` grows and shrinks one logical bucket at a time instead of
/// rehashing the whole map, keeping the average chain length bounded by a
/// load-factor band (`lower_bound ..= max_fill_factor`). See the crate
/// documentation for the addressing scheme.
///
/// # Key and Value Types
///
/// Any type implementing [`Hash`] and [`Eq`] can be used as a key; values
/// place no bounds on the table itself.
///
/// ```rust
/// use linearhash::Table;
///
/// let mut table: Table<String, u32> = Table::new();
/// table.insert("a".to_string(), 1).unwrap();
/// assert_eq!(table.get(&"a".to_string()), Ok(&1));
/// ```
#[derive(Debug)]
pub struct Table<K, V, S = RandomState>
where
    K: Hash,
{
    pub(crate) buckets: Vec<Bucket<K, V>>,

    // M0: initial logical bucket count.
    pub(crate) m0: usize,
    // i: current expansion level.
    pub(crate) i: u32,
    // p: next-to-split pointer, 0 <= p < M0 * 2^i.
    pub(crate) p: usize,
    // Active logical buckets; M0 * 2^i <= bucket_count <= M0 * 2^(i+1).
    pub(crate) bucket_count: usize,
    // Physical bucket slots allocated; always M0 * 2^k for some k >= 0.
    pub(crate) capacity: usize,
    // Total live nodes.
    pub(crate) data_count: usize,
    // Counts node visits across insert/get/remove/split/merge. Named
    // `visited_buckets` externally for historical reasons; it counts nodes,
    // not buckets. A `Cell` so read-only operations can still record visits.
    pub(crate) visited: Cell<usize>,

    pub(crate) max_fill_factor: f64,
    pub(crate) lower_bound: f64,

    pub(crate) hasher: S,
}

impl<K, V> Table<K, V, RandomState>
where
    K: Hash,
{
    /// Construct an empty table with the default shape (`M0 = 4`,
    /// `max_fill_factor = 0.75`, `lower_bound = 0.40`) and the standard
    /// library's [`RandomState`] hasher.
    pub fn new() -> Self {
        Builder::default().build()
    }

    /// Construct an empty table with `n` initial buckets and otherwise
    /// default parameters. A convenience over [`Builder`] for the common
    /// case of only wanting to override `M0`.
    pub fn with_initial_buckets(n: usize) -> Self {
        Builder::default().with_initial_buckets(n).build()
    }
}

impl<K, V> Default for Table<K, V, RandomState>
where
    K: Hash,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, S> Table<K, V, S>
where
    K: Hash + Eq + Clone,
    S: BuildHasher,
{
    fn hash(&self, key: &K) -> u64 {
        let mut hasher = self.hasher.build_hasher();
        key.hash(&mut hasher);
        hasher.finish()
    }

    /// The logical bucket `key` currently addresses: the home bucket under
    /// the current level `i`, redirected to the extended addressing if that
    /// home bucket has already been split this round.
    fn addressed_bucket(&self, key: &K) -> usize {
        let h = self.hash(key);
        let modulus = self.m0 as u64 * (1u64 << self.i);
        let curr = (h % modulus) as usize;
        if curr < self.p {
            self.extended_index(h)
        } else {
            curr
        }
    }

    /// `extended_index`, used only during split: always addresses under the
    /// next level up.
    fn extended_index_for(&self, key: &K) -> usize {
        self.extended_index(self.hash(key))
    }

    fn extended_index(&self, h: u64) -> usize {
        let modulus = self.m0 as u64 * (1u64 << (self.i + 1));
        (h % modulus) as usize
    }

    fn load_factor(&self) -> f64 {
        self.data_count as f64 / self.bucket_count as f64
    }

    /// Number of live entries.
    pub fn size(&self) -> usize {
        self.data_count
    }

    /// Number of active logical buckets.
    pub fn bucket_count(&self) -> usize {
        self.bucket_count
    }

    /// Number of physical bucket slots currently allocated.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Node-visit counter, incremented once per node inspected across
    /// insert/get/remove/split/merge. The name is a historical misnomer —
    /// it counts nodes, not buckets.
    pub fn visited_buckets(&self) -> usize {
        self.visited.get()
    }

    /// Length of the chain at logical bucket `index`.
    pub fn bucket_size(&self, index: usize) -> Result<usize> {
        self.check_bucket_index(index)?;
        Ok(self.buckets[index].len)
    }

    fn check_bucket_index(&self, index: usize) -> Result<()> {
        if index >= self.bucket_count {
            return Err(Error::IndexOutOfRange {
                index,
                bucket_count: self.bucket_count,
            });
        }
        Ok(())
    }

    /// If `key` is present, overwrite its value; otherwise insert a new
    /// entry. May trigger exactly one split step if the load factor exceeds
    /// `max_fill_factor` afterwards.
    pub fn insert(&mut self, key: K, value: V) -> Result<()> {
        let index = self.addressed_bucket(&key);

        let mut cursor = self.buckets[index].head.as_deref_mut();
        while let Some(node) = cursor {
            self.visited.set(self.visited.get() + 1);
            if node.key == key {
                node.value = value;
                return Ok(());
            }
            cursor = node.next.as_deref_mut();
        }

        self.visited.set(self.visited.get() + 1);
        self.buckets[index].push_front(Box::new(Node::new(key, value)));
        self.data_count += 1;

        if self.load_factor() > self.max_fill_factor {
            self.split()?;
        }
        Ok(())
    }

    /// Return the value associated with `key`, or [`Error::KeyNotFound`] if
    /// absent.
    pub fn get(&self, key: &K) -> Result<&V> {
        self.find(key).ok_or(Error::KeyNotFound)
    }

    /// Return the value associated with `key`, or `None` if absent. Never
    /// fails.
    pub fn try_get(&self, key: &K) -> Option<&V> {
        self.find(key)
    }

    fn find(&self, key: &K) -> Option<&V> {
        let index = self.addressed_bucket(key);
        let mut cursor = self.buckets[index].head.as_deref();
        while let Some(node) = cursor {
            self.visited.set(self.visited.get() + 1);
            if &node.key == key {
                return Some(&node.value);
            }
            cursor = node.next.as_deref();
        }
        None
    }

    /// Whether `key` is present.
    pub fn contains(&self, key: &K) -> bool {
        self.find(key).is_some()
    }

    /// Remove `key` if present, returning whether it was found. May trigger
    /// exactly one merge step if the load factor drops below `lower_bound`
    /// afterwards (and the table is above its minimum shape).
    pub fn remove(&mut self, key: &K) -> Result<bool> {
        let index = self.addressed_bucket(key);
        let (removed, visited) = remove_from_chain(&mut self.buckets[index].head, key);
        self.visited.set(self.visited.get() + visited);

        if !removed {
            return Ok(false);
        }
        self.buckets[index].len -= 1;
        self.data_count -= 1;

        if self.load_factor() < self.lower_bound && self.capacity > self.m0 {
            self.merge()?;
        }
        Ok(true)
    }

    /// Delete all entries. Resets `size()` to zero but retains `i`, `p`,
    /// `bucket_count`, and `capacity` — the allocated shape is kept for
    /// reuse.
    pub fn clear(&mut self) {
        for bucket in &mut self.buckets[..self.bucket_count] {
            bucket.head = None;
            bucket.len = 0;
        }
        self.data_count = 0;
        self.visited.set(0);
    }

    /// A lazy, finite, non-restartable traversal of bucket `index`'s chain,
    /// in chain order. The returned iterator borrows the table; the borrow
    /// checker rejects mutating the table while it is alive.
    pub fn iterate_bucket(&self, index: usize) -> Result<BucketIter<'_, K, V>> {
        self.check_bucket_index(index)?;
        Ok(BucketIter {
            current: self.buckets[index].head.as_deref(),
        })
    }

    /// Two-phase bulk removal: collect every key for which `pred(key,
    /// value)` returns `true`, then remove each collected key. Returns the
    /// number of entries removed.
    ///
    /// Collecting before removing decouples traversal from structural
    /// mutation, which would otherwise invalidate an in-progress chain walk
    /// if a merge ran mid-traversal.
    pub fn for_each_remove_if<F>(&mut self, mut pred: F) -> Result<usize>
    where
        F: FnMut(&K, &V) -> bool,
    {
        let mut doomed = Vec::new();
        for b in 0..self.bucket_count {
            let mut cursor = self.buckets[b].head.as_deref();
            while let Some(node) = cursor {
                self.visited.set(self.visited.get() + 1);
                if pred(&node.key, &node.value) {
                    doomed.push(node.key.clone());
                }
                cursor = node.next.as_deref();
            }
        }

        let mut removed = 0;
        for key in &doomed {
            if self.remove(key)? {
                removed += 1;
            }
        }
        Ok(removed)
    }

    /// Write a human-readable snapshot of the table's state and every
    /// bucket's contents. Observational only; never mutates the table.
    pub fn debug_dump(&self, label: &str) -> String
    where
        K: std::fmt::Display,
    {
        use std::fmt::Write;

        let mut out = String::new();
        let _ = writeln!(out, "==== Table {label} ====");
        let _ = writeln!(
            out,
            "M0={} i={} p={} bucket_count={} capacity={} data_count={} load_factor={:.4}",
            self.m0,
            self.i,
            self.p,
            self.bucket_count,
            self.capacity,
            self.data_count,
            self.load_factor()
        );
        for b in 0..self.bucket_count {
            let _ = write!(out, "bucket {b} (size={}): ", self.buckets[b].len);
            let mut cursor = self.buckets[b].head.as_deref();
            if cursor.is_none() {
                let _ = write!(out, "[empty]");
            }
            while let Some(node) = cursor {
                let _ = write!(out, "{}", node.key);
                cursor = node.next.as_deref();
                if cursor.is_some() {
                    let _ = write!(out, " -> ");
                }
            }
            let _ = writeln!(out);
        }
        out
    }

    fn grow_to(&mut self, new_capacity: usize) -> Result<()> {
        let additional = new_capacity - self.buckets.len();
        self.buckets
            .try_reserve(additional)
            .map_err(|_| Error::AllocationFailure)?;
        self.buckets.resize_with(new_capacity, Bucket::empty);
        self.capacity = new_capacity;
        Ok(())
    }

    /// Triggered post-insert when the load factor exceeds `max_fill_factor`.
    /// Executes exactly one split step: grows physical capacity if this
    /// round is opening, activates one new logical bucket, and redistributes
    /// the chain at bucket `p` between itself and the new bucket.
    fn split(&mut self) -> Result<()> {
        if self.p == 0 {
            self.grow_to(self.capacity * 2)?;
        }
        self.bucket_count += 1;

        let (chain, _) = self.buckets[self.p].take_chain();
        let mut keep = Bucket::empty();
        let mut cursor = chain;
        while let Some(mut node) = cursor {
            self.visited.set(self.visited.get() + 1);
            cursor = node.next.take();
            let new_index = self.extended_index_for(&node.key);
            if new_index == self.p {
                keep.push_front(node);
            } else {
                self.buckets[new_index].push_front(node);
            }
        }
        self.buckets[self.p] = keep;

        self.p += 1;
        if self.p == self.m0 * (1usize << self.i) {
            self.i += 1;
            self.p = 0;
        }
        Ok(())
    }

    /// Triggered post-remove when the load factor drops below
    /// `lower_bound` and the table is above its minimum shape. Executes
    /// exactly one merge step: the exact inverse of split.
    fn merge(&mut self) -> Result<()> {
        if self.p == 0 {
            self.i -= 1;
            self.p = self.m0 * (1usize << self.i);
        } else {
            self.p -= 1;
        }

        let last = self.bucket_count - 1;
        let (chain, len) = self.buckets[last].take_chain();
        let walked = self.buckets[self.p].append_chain(chain, len);
        self.visited.set(self.visited.get() + walked);

        self.bucket_count -= 1;

        if self.p == 0 {
            let new_capacity = self.capacity / 2;
            self.buckets.truncate(new_capacity);
            self.capacity = new_capacity;
        }
        Ok(())
    }
}

/// Remove the node matching `key` from a chain, returning whether a node was
/// removed and how many nodes were inspected along the way.
///
/// Recurses down the chain rather than juggling two live mutable borrows of
/// neighbouring nodes; chain length is expected O(1) under the load-factor
/// invariant, so the recursion depth stays shallow in practice.
fn remove_from_chain<K, V>(link: &mut Option<Box<Node<K, V>>>, key: &K) -> (bool, usize)
where
    K: Eq,
{
    match link {
        None => (false, 0),
        Some(node) if &node.key == key => {
            *link = node.next.take();
            (true, 1)
        }
        Some(node) => {
            let (removed, visited) = remove_from_chain(&mut node.next, key);
            (removed, visited + 1)
        }
    }
}
