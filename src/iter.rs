use std::iter::FusedIterator;

use crate::node::Node;

/// A lazy, finite, non-restartable traversal of one bucket's chain, yielding
/// `(&K, &V)` pairs in chain order.
///
/// Borrows the table for the iterator's lifetime, so the borrow checker
/// rejects any attempt to mutate the table while the iterator is alive —
/// the static enforcement of the "no mutation during iteration" rule.
///
/// [`Table`]: crate::Table
#[derive(Debug, Clone)]
pub struct BucketIter<'a, K, V> {
    pub(crate) current: Option<&'a Node<K, V>>,
}

impl<'a, K, V> Iterator for BucketIter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.current?;
        self.current = node.next.as_deref();
        Some((&node.key, &node.value))
    }
}

impl<'a, K, V> FusedIterator for BucketIter<'a, K, V> {}

#[cfg(test)]
mod tests {
    use crate::Table;

    fn assert_fused_impl<F: std::iter::FusedIterator>(_iter: F) {}

    #[test]
    fn test_iter_fused() {
        let mut t = Table::<&str, i32>::new();
        t.insert("a", 1).unwrap();
        assert_fused_impl(t.iterate_bucket(0).unwrap());
    }

    #[test]
    fn test_iter_yields_chain_order() {
        let mut t = Table::<&str, i32>::with_initial_buckets(1);
        t.insert("a", 1).unwrap();
        t.insert("b", 2).unwrap();

        // Both keys hash into the one active bucket at this point.
        let got: Vec<_> = t.iterate_bucket(0).unwrap().collect();
        assert_eq!(got.len(), 2);
    }

    #[test]
    fn test_iter_empty_bucket() {
        let t = Table::<&str, i32>::new();
        let mut it = t.iterate_bucket(0).unwrap();
        assert_eq!(it.next(), None);
        // Exhausted iterators keep returning None (FusedIterator).
        assert_eq!(it.next(), None);
    }
}
