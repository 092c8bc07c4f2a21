//! Persistent ordered map.
//!
//! ## Design
//!
//! An AVL tree whose nodes live behind `Arc`. Updates never touch an
//! existing node: `insert` and `remove` copy the nodes on the path from the
//! root to the change and reuse every other subtree, so the map before the
//! update stays valid and shares all untouched structure with the map
//! after it.
//!
//! ```text
//!   before          after insert(7)
//!     5                 5'
//!    / \               / \
//!   3   8      =>     3   8'       3 and its children are shared
//!                        /
//!                       7
//! ```
//!
//! | Operation | Cost |
//! |-----------|------|
//! | get / first | O(log n) |
//! | insert / remove | O(log n) time, O(log n) new nodes |
//! | clone | O(1) |

use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

type Link<K, V> = Option<Arc<Node<K, V>>>;

struct Node<K, V> {
    key: K,
    value: V,
    height: usize,
    left: Link<K, V>,
    right: Link<K, V>,
}

/// Immutable ordered map with structural sharing between versions.
pub struct PersistentMap<K, V> {
    root: Link<K, V>,
    len: usize,
}

impl<K, V> Clone for PersistentMap<K, V> {
    fn clone(&self) -> Self {
        Self {
            root: self.root.clone(),
            len: self.len,
        }
    }
}

impl<K, V> Default for PersistentMap<K, V> {
    fn default() -> Self {
        Self { root: None, len: 0 }
    }
}

impl<K, V> PersistentMap<K, V> {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Smallest entry
    pub fn first(&self) -> Option<(&K, &V)> {
        let mut node = self.root.as_ref()?;
        while let Some(left) = node.left.as_ref() {
            node = left;
        }
        Some((&node.key, &node.value))
    }

    /// In-order iterator
    pub fn iter(&self) -> Iter<'_, K, V> {
        let mut iter = Iter {
            stack: Vec::new(),
            remaining: self.len,
        };
        iter.push_left(self.root.as_ref());
        iter
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> + '_ {
        self.iter().map(|(k, _)| k)
    }

    pub fn values(&self) -> impl Iterator<Item = &V> + '_ {
        self.iter().map(|(_, v)| v)
    }

    /// True if both maps share the same root node (or are both empty).
    pub fn ptr_eq(&self, other: &Self) -> bool {
        match (&self.root, &other.root) {
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            (None, None) => true,
            _ => false,
        }
    }
}

impl<K: Ord, V> PersistentMap<K, V> {
    pub fn get(&self, key: &K) -> Option<&V> {
        let mut link = self.root.as_ref();
        while let Some(node) = link {
            link = match key.cmp(&node.key) {
                Ordering::Less => node.left.as_ref(),
                Ordering::Greater => node.right.as_ref(),
                Ordering::Equal => return Some(&node.value),
            };
        }
        None
    }

    #[inline]
    pub fn contains_key(&self, key: &K) -> bool {
        self.get(key).is_some()
    }
}

impl<K: Ord + Clone, V: Clone> PersistentMap<K, V> {
    /// New map with `key` bound to `value`, replacing any previous binding.
    pub fn insert(&self, key: K, value: V) -> Self {
        let (root, replaced) = insert_node(&self.root, key, value);
        Self {
            root: Some(root),
            len: if replaced { self.len } else { self.len + 1 },
        }
    }

    /// New map without `key`, plus the removed value. `None` if absent.
    pub fn remove(&self, key: &K) -> Option<(Self, V)> {
        let (root, value) = remove_node(&self.root, key)?;
        Some((
            Self {
                root,
                len: self.len - 1,
            },
            value,
        ))
    }
}

// ============================================================================
// Tree internals
// ============================================================================

#[inline]
fn height<K, V>(link: &Link<K, V>) -> usize {
    link.as_ref().map_or(0, |node| node.height)
}

fn make<K, V>(key: K, value: V, left: Link<K, V>, right: Link<K, V>) -> Arc<Node<K, V>> {
    let height = 1 + height(&left).max(height(&right));
    Arc::new(Node {
        key,
        value,
        height,
        left,
        right,
    })
}

fn rotate_right<K: Clone, V: Clone>(
    key: K,
    value: V,
    left: &Arc<Node<K, V>>,
    right: Link<K, V>,
) -> Arc<Node<K, V>> {
    let demoted = make(key, value, left.right.clone(), right);
    make(
        left.key.clone(),
        left.value.clone(),
        left.left.clone(),
        Some(demoted),
    )
}

fn rotate_left<K: Clone, V: Clone>(
    key: K,
    value: V,
    left: Link<K, V>,
    right: &Arc<Node<K, V>>,
) -> Arc<Node<K, V>> {
    let demoted = make(key, value, left, right.left.clone());
    make(
        right.key.clone(),
        right.value.clone(),
        Some(demoted),
        right.right.clone(),
    )
}

/// Build a node from children whose heights differ by at most 2,
/// rotating as needed to restore the AVL bound.
fn balance<K: Clone, V: Clone>(
    key: K,
    value: V,
    left: Link<K, V>,
    right: Link<K, V>,
) -> Arc<Node<K, V>> {
    let hl = height(&left);
    let hr = height(&right);

    if hl > hr + 1 {
        if let Some(l) = &left {
            return match &l.right {
                Some(lr) if height(&l.left) < lr.height => {
                    let pivot = rotate_left(l.key.clone(), l.value.clone(), l.left.clone(), lr);
                    rotate_right(key, value, &pivot, right)
                }
                _ => rotate_right(key, value, l, right),
            };
        }
    }
    if hr > hl + 1 {
        if let Some(r) = &right {
            return match &r.left {
                Some(rl) if height(&r.right) < rl.height => {
                    let pivot = rotate_right(r.key.clone(), r.value.clone(), rl, r.right.clone());
                    rotate_left(key, value, left, &pivot)
                }
                _ => rotate_left(key, value, left, r),
            };
        }
    }
    make(key, value, left, right)
}

fn insert_node<K: Ord + Clone, V: Clone>(
    link: &Link<K, V>,
    key: K,
    value: V,
) -> (Arc<Node<K, V>>, bool) {
    let Some(node) = link else {
        return (make(key, value, None, None), false);
    };
    match key.cmp(&node.key) {
        Ordering::Less => {
            let (left, replaced) = insert_node(&node.left, key, value);
            let rebuilt = balance(
                node.key.clone(),
                node.value.clone(),
                Some(left),
                node.right.clone(),
            );
            (rebuilt, replaced)
        }
        Ordering::Greater => {
            let (right, replaced) = insert_node(&node.right, key, value);
            let rebuilt = balance(
                node.key.clone(),
                node.value.clone(),
                node.left.clone(),
                Some(right),
            );
            (rebuilt, replaced)
        }
        Ordering::Equal => (
            make(key, value, node.left.clone(), node.right.clone()),
            true,
        ),
    }
}

fn remove_node<K: Ord + Clone, V: Clone>(link: &Link<K, V>, key: &K) -> Option<(Link<K, V>, V)> {
    let node = link.as_ref()?;
    match key.cmp(&node.key) {
        Ordering::Less => {
            let (left, value) = remove_node(&node.left, key)?;
            let rebuilt = balance(node.key.clone(), node.value.clone(), left, node.right.clone());
            Some((Some(rebuilt), value))
        }
        Ordering::Greater => {
            let (right, value) = remove_node(&node.right, key)?;
            let rebuilt = balance(node.key.clone(), node.value.clone(), node.left.clone(), right);
            Some((Some(rebuilt), value))
        }
        Ordering::Equal => {
            let replacement = match (&node.left, &node.right) {
                (None, None) => None,
                (Some(only), None) | (None, Some(only)) => Some(Arc::clone(only)),
                (Some(_), Some(right)) => {
                    let (rest, succ_key, succ_value) = remove_min(right);
                    Some(balance(succ_key, succ_value, node.left.clone(), rest))
                }
            };
            Some((replacement, node.value.clone()))
        }
    }
}

fn remove_min<K: Clone, V: Clone>(node: &Arc<Node<K, V>>) -> (Link<K, V>, K, V) {
    match &node.left {
        None => (node.right.clone(), node.key.clone(), node.value.clone()),
        Some(left) => {
            let (rest, key, value) = remove_min(left);
            let rebuilt = balance(node.key.clone(), node.value.clone(), rest, node.right.clone());
            (Some(rebuilt), key, value)
        }
    }
}

// ============================================================================
// Iteration
// ============================================================================

/// In-order iterator over a [`PersistentMap`].
pub struct Iter<'a, K, V> {
    stack: Vec<&'a Arc<Node<K, V>>>,
    remaining: usize,
}

impl<'a, K, V> Iter<'a, K, V> {
    fn push_left(&mut self, mut link: Option<&'a Arc<Node<K, V>>>) {
        while let Some(node) = link {
            self.stack.push(node);
            link = node.left.as_ref();
        }
    }
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.push_left(node.right.as_ref());
        self.remaining -= 1;
        Some((&node.key, &node.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

impl<'a, K, V> IntoIterator for &'a PersistentMap<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K: Ord + Clone, V: Clone> FromIterator<(K, V)> for PersistentMap<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        iter.into_iter()
            .fold(Self::new(), |map, (key, value)| map.insert(key, value))
    }
}

impl<K: PartialEq, V: PartialEq> PartialEq for PersistentMap<K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len && (self.ptr_eq(other) || self.iter().eq(other.iter()))
    }
}

impl<K: Eq, V: Eq> Eq for PersistentMap<K, V> {}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for PersistentMap<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    /// Verify the AVL bound and cached heights; returns the subtree height.
    fn check_balanced<K, V>(link: &Link<K, V>) -> usize {
        match link {
            None => 0,
            Some(node) => {
                let hl = check_balanced(&node.left);
                let hr = check_balanced(&node.right);
                assert!(hl.abs_diff(hr) <= 1, "unbalanced node");
                assert_eq!(node.height, 1 + hl.max(hr), "stale height");
                node.height
            }
        }
    }

    fn map_of(keys: &[u32]) -> PersistentMap<u32, u32> {
        keys.iter().map(|&k| (k, k * 10)).collect()
    }

    #[test]
    fn test_empty_map() {
        let map: PersistentMap<u32, u32> = PersistentMap::new();
        assert!(map.is_empty());
        assert_eq!(map.len(), 0);
        assert!(map.first().is_none());
        assert_eq!(map.iter().count(), 0);
    }

    #[test]
    fn test_insert_and_get() {
        let map = map_of(&[5, 3, 8, 1, 4]);
        assert_eq!(map.len(), 5);
        assert_eq!(map.get(&4), Some(&40));
        assert_eq!(map.get(&9), None);
        assert!(map.contains_key(&1));
    }

    #[test]
    fn test_iteration_is_sorted() {
        let map = map_of(&[9, 2, 7, 4, 1, 8, 3]);
        let keys: Vec<u32> = map.keys().copied().collect();
        assert_eq!(keys, vec![1, 2, 3, 4, 7, 8, 9]);
        assert_eq!(map.iter().len(), 7);
        assert_eq!(map.first(), Some((&1, &10)));
    }

    #[test]
    fn test_insert_replaces() {
        let map = map_of(&[1, 2, 3]);
        let updated = map.insert(2, 99);
        assert_eq!(updated.len(), 3);
        assert_eq!(updated.get(&2), Some(&99));
        // Old version untouched
        assert_eq!(map.get(&2), Some(&20));
    }

    #[test]
    fn test_remove() {
        let map = map_of(&[5, 3, 8, 1, 4, 7, 9]);
        let (smaller, removed) = map.remove(&5).unwrap();
        assert_eq!(removed, 50);
        assert_eq!(smaller.len(), 6);
        assert!(!smaller.contains_key(&5));
        assert_eq!(
            smaller.keys().copied().collect::<Vec<_>>(),
            vec![1, 3, 4, 7, 8, 9]
        );
        assert_eq!(map.len(), 7);
        assert!(map.contains_key(&5));
    }

    #[test]
    fn test_remove_missing() {
        let map = map_of(&[1, 2]);
        assert!(map.remove(&3).is_none());
    }

    #[test]
    fn test_stays_balanced_sequential_inserts() {
        let map: PersistentMap<u32, u32> = (0..1024).map(|k| (k, k)).collect();
        let h = check_balanced(&map.root);
        // AVL height bound: 1.44 * log2(n + 2)
        assert!(h <= 15, "height {h} too large");
    }

    #[test]
    fn test_stays_balanced_after_removals() {
        let mut map: PersistentMap<u32, u32> = (0..500).map(|k| (k, k)).collect();
        for k in (0..500).filter(|k| k % 3 != 0) {
            map = map.remove(&k).unwrap().0;
            check_balanced(&map.root);
        }
        assert_eq!(map.len(), 167);
        assert!(map.keys().all(|k| k % 3 == 0));
    }

    #[test]
    fn test_insert_shares_untouched_subtree() {
        let map = map_of(&[4, 2, 6, 1, 3, 5, 7]);
        let root = map.root.as_ref().unwrap();
        let updated = map.insert(8, 80);
        let new_root = updated.root.as_ref().unwrap();

        assert!(!Arc::ptr_eq(root, new_root));
        // Left subtree (1, 2, 3) was not on the insertion path.
        assert!(Arc::ptr_eq(
            root.left.as_ref().unwrap(),
            new_root.left.as_ref().unwrap()
        ));
    }

    #[test]
    fn test_clone_is_shallow() {
        let map = map_of(&[1, 2, 3]);
        let copy = map.clone();
        assert!(map.ptr_eq(&copy));
        assert_eq!(map, copy);
    }

    #[test]
    fn test_structural_equality_ignores_shape() {
        let a = map_of(&[1, 2, 3, 4]);
        let b = map_of(&[4, 3, 2, 1]);
        assert!(!a.ptr_eq(&b));
        assert_eq!(a, b);
        assert_ne!(a, map_of(&[1, 2, 3]));
    }
}
