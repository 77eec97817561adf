use alloc::vec::Vec;
use core::fmt;
use log::trace;
use num_traits::{Float, NumCast};
use ordered_float::{FloatCore, OrderedFloat};

use crate::Kbn;

/// Red-Black tree node colors used to maintain tree balance properties.
///
/// Red-Black trees maintain balance by ensuring:
/// - Red nodes have black children
/// - All paths from root to leaves have equal black node counts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    /// Red node - cannot be adjacent to other red nodes
    Red,
    /// Black node - can have children of any color, contributes to black height
    Black,
}

impl Color {
    /// Returns the single letter label of the color
    ///
    /// # Returns
    ///
    /// * `char` - `'R'` for red, `'B'` for black
    #[inline]
    pub const fn label(self) -> char {
        match self {
            Color::Red => 'R',
            Color::Black => 'B',
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// A stored value together with the color of the node holding it.
///
/// Renders as `value(R)` or `value(B)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Entry<T> {
    /// The stored value
    pub value: T,
    /// Color of the node holding the value
    pub color: Color,
}

impl<T: fmt::Display> fmt::Display for Entry<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.value, self.color)
    }
}

/// A node in the Red-Black tree containing data and structural information.
#[derive(Debug, Clone)]
struct Node<T> {
    /// The stored value wrapped in OrderedFloat for consistent comparison including NaN
    value: OrderedFloat<T>,

    /// Index of parent node in the nodes arena (None if this is root)
    parent: Option<usize>,

    /// Index of left child node in the nodes arena
    left: Option<usize>,

    /// Index of right child node in the nodes arena
    right: Option<usize>,

    /// Color of this node (Red or Black) used for Red-Black tree balancing
    color: Color,
}

/// Compensated running sum that falls back to the plain sum once the
/// compensation term overflows (its correction turns `inf - inf` into NaN)
struct Accumulator<T> {
    compensated: Kbn<T>,
    plain: T,
}

impl<T: Float + Default> Accumulator<T> {
    fn new() -> Self {
        Self {
            compensated: Kbn::default(),
            plain: T::zero(),
        }
    }

    #[inline]
    fn add(&mut self, value: T) {
        self.compensated += value;
        self.plain = self.plain + value;
    }

    fn total(&self) -> T {
        let total = self.compensated.total();
        if Float::is_finite(total) {
            total
        } else {
            self.plain
        }
    }
}

/// A Red-Black tree of real numbers with ordered traversals and aggregate queries.
///
/// Nodes live in a growable arena and link to each other by index, so parent
/// links never own anything. Equal values are kept as separate nodes: a value
/// descends left only when it is strictly smaller than the node it meets.
///
/// # Examples
///
/// ```
/// # use rb_aggregates::{Color, OrderedTree};
/// let mut tree = OrderedTree::new();
/// tree.insert(50.0).insert(30.0).insert(70.0).insert(20.0).insert(40.0);
///
/// let sorted: Vec<f64> = tree.inorder().iter().map(|e| e.value).collect();
/// assert_eq!(sorted, [20.0, 30.0, 40.0, 50.0, 70.0]);
/// assert_eq!(tree.sum_of_leaves(), 130.0);
/// assert_eq!(tree.average(), 42.0);
/// ```
#[derive(Debug, Clone)]
pub struct OrderedTree<T> {
    /// Arena of nodes, indexed by the links stored in each node
    nodes: Vec<Node<T>>,

    /// Index of the root node, None when the tree is empty
    root: Option<usize>,
}

impl<T> Default for OrderedTree<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> OrderedTree<T> {
    /// Creates an empty tree
    pub const fn new() -> Self {
        Self {
            nodes: Vec::new(),
            root: None,
        }
    }

    /// Returns the number of stored values, duplicates included
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns `true` if the tree holds no values
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Releases every node, leaving an empty tree that accepts new insertions
    pub fn reset(&mut self) {
        self.nodes.clear();
        self.root = None;
    }
}

impl<T: Float + FloatCore + Default> OrderedTree<T> {
    /// Inserts a value and restores the red-black invariants
    ///
    /// Any value is accepted, including duplicates of stored values.
    ///
    /// # Arguments
    ///
    /// * `value` - The value to insert
    ///
    /// # Returns
    ///
    /// * `&mut Self` - The tree, for chaining
    pub fn insert(&mut self, value: T) -> &mut Self {
        let ordered_value = OrderedFloat(value);
        let parent_idx = self.find_insertion_parent(ordered_value);

        let new_idx = self.nodes.len();
        self.nodes.push(Node {
            value: ordered_value,
            parent: parent_idx,
            left: None,
            right: None,
            color: Color::Red,
        });
        self.link_to_parent(new_idx, parent_idx, ordered_value);
        self.fix_insertion_violations(new_idx);

        debug_assert!(
            self.black_height().is_some(),
            "RB tree invariants violated after insertion"
        );

        self
    }

    /// Returns the root value and its color
    ///
    /// # Returns
    ///
    /// * `Option<Entry<T>>` - The root entry, or `None` if the tree is empty
    pub fn root(&self) -> Option<Entry<T>> {
        self.root.map(|idx| self.entry_at(idx))
    }

    /// Returns the smallest stored value
    pub fn min(&self) -> Option<T> {
        let mut node = self.root?;
        while let Some(left) = self.node_at(node).left {
            node = left;
        }
        Some(self.node_at(node).value.into_inner())
    }

    /// Returns the largest stored value
    pub fn max(&self) -> Option<T> {
        let mut node = self.root?;
        while let Some(right) = self.node_at(node).right {
            node = right;
        }
        Some(self.node_at(node).value.into_inner())
    }

    /// Returns the entries in preorder: node, then left subtree, then right subtree
    ///
    /// # Returns
    ///
    /// * `Vec<Entry<T>>` - The entries, empty for an empty tree
    pub fn preorder(&self) -> Vec<Entry<T>> {
        let mut entries = Vec::with_capacity(self.len());
        self.collect_preorder(self.root, &mut entries);
        entries
    }

    /// Returns the entries in order: left subtree, then node, then right subtree
    ///
    /// The values come out in non-decreasing order whatever the tree shape.
    ///
    /// # Returns
    ///
    /// * `Vec<Entry<T>>` - The entries, empty for an empty tree
    pub fn inorder(&self) -> Vec<Entry<T>> {
        let mut entries = Vec::with_capacity(self.len());
        self.collect_inorder(self.root, &mut entries);
        entries
    }

    /// Returns the sum of the values stored in leaves (nodes without children)
    ///
    /// The sum uses compensated summation, falling back to plain summation
    /// when the compensated total overflows.
    ///
    /// # Returns
    ///
    /// * `T` - The leaf sum, zero for an empty tree
    pub fn sum_of_leaves(&self) -> T {
        let mut sum = Accumulator::new();
        self.accumulate_leaves(self.root, &mut sum);
        sum.total()
    }

    /// Returns the arithmetic mean of every stored value
    ///
    /// # Returns
    ///
    /// * `T` - The mean, zero for an empty tree
    pub fn average(&self) -> T {
        let mut sum = Accumulator::new();
        let count = self.count_and_sum(self.root, &mut sum);
        if count == 0 {
            return T::zero();
        }
        match <T as NumCast>::from(count) {
            Some(n) => sum.total() / n,
            None => T::zero(),
        }
    }

    /// Checks the red-black invariants and returns the black height of the tree
    ///
    /// Absent links count as one black node, so an empty tree has height 1.
    ///
    /// # Returns
    ///
    /// * `Option<usize>` - The black height, or `None` if the root is red, a red
    ///   node has a red child, black heights differ, or links are inconsistent
    pub fn black_height(&self) -> Option<usize> {
        if self.is_red(self.root) || self.parent_of(self.root).is_some() {
            return None;
        }
        self.verify_black_height(self.root)
    }

    fn find_insertion_parent(&self, value: OrderedFloat<T>) -> Option<usize> {
        let mut current = self.root;
        let mut parent = None;

        while let Some(idx) = current {
            parent = Some(idx);
            let node = self.node_at(idx);
            current = if value < node.value {
                node.left
            } else {
                node.right
            };
        }
        parent
    }

    fn link_to_parent(
        &mut self,
        node_idx: usize,
        parent_idx: Option<usize>,
        value: OrderedFloat<T>,
    ) {
        match parent_idx {
            None => self.root = Some(node_idx),
            Some(parent) if value < self.node_at(parent).value => {
                self.node_at_mut(parent).left = Some(node_idx);
            }
            Some(parent) => self.node_at_mut(parent).right = Some(node_idx),
        }
    }

    fn entry_at(&self, idx: usize) -> Entry<T> {
        let node = self.node_at(idx);
        Entry {
            value: node.value.into_inner(),
            color: node.color,
        }
    }

    fn collect_preorder(&self, node_idx: Option<usize>, entries: &mut Vec<Entry<T>>) {
        let Some(idx) = node_idx else {
            return;
        };
        entries.push(self.entry_at(idx));
        self.collect_preorder(self.node_at(idx).left, entries);
        self.collect_preorder(self.node_at(idx).right, entries);
    }

    fn collect_inorder(&self, node_idx: Option<usize>, entries: &mut Vec<Entry<T>>) {
        let Some(idx) = node_idx else {
            return;
        };
        self.collect_inorder(self.node_at(idx).left, entries);
        entries.push(self.entry_at(idx));
        self.collect_inorder(self.node_at(idx).right, entries);
    }

    fn accumulate_leaves(&self, node_idx: Option<usize>, sum: &mut Accumulator<T>) {
        let Some(idx) = node_idx else {
            return;
        };
        let node = self.node_at(idx);
        if node.left.is_none() && node.right.is_none() {
            sum.add(node.value.into_inner());
            return;
        }
        self.accumulate_leaves(node.left, sum);
        self.accumulate_leaves(node.right, sum);
    }

    /// Adds every value under `node_idx` into `sum` and returns how many were added
    fn count_and_sum(&self, node_idx: Option<usize>, sum: &mut Accumulator<T>) -> usize {
        let Some(idx) = node_idx else {
            return 0;
        };
        let node = self.node_at(idx);
        sum.add(node.value.into_inner());
        1 + self.count_and_sum(node.left, sum) + self.count_and_sum(node.right, sum)
    }

    #[inline]
    fn node_at(&self, idx: usize) -> &Node<T> {
        &self.nodes[idx]
    }

    #[inline]
    fn node_at_mut(&mut self, idx: usize) -> &mut Node<T> {
        &mut self.nodes[idx]
    }

    /// Absent links are black
    #[inline]
    fn get_color(&self, node_idx: Option<usize>) -> Color {
        node_idx.map_or(Color::Black, |idx| self.node_at(idx).color)
    }

    #[inline]
    fn set_color(&mut self, node_idx: Option<usize>, color: Color) {
        if let Some(idx) = node_idx {
            self.node_at_mut(idx).color = color;
        }
    }

    #[inline]
    fn is_red(&self, node_idx: Option<usize>) -> bool {
        self.get_color(node_idx) == Color::Red
    }

    #[inline]
    fn parent_of(&self, node_idx: Option<usize>) -> Option<usize> {
        node_idx.and_then(|idx| self.node_at(idx).parent)
    }

    fn rotate_left(&mut self, x: usize) {
        let Some(y) = self.node_at(x).right else {
            return;
        };

        let y_left = self.node_at(y).left;
        self.node_at_mut(x).right = y_left;
        if let Some(y_left) = y_left {
            self.node_at_mut(y_left).parent = Some(x);
        }

        let x_parent = self.node_at(x).parent;
        self.node_at_mut(y).parent = x_parent;

        match x_parent {
            None => self.root = Some(y),
            Some(p) if self.node_at(p).left == Some(x) => self.node_at_mut(p).left = Some(y),
            Some(p) => self.node_at_mut(p).right = Some(y),
        }

        self.node_at_mut(y).left = Some(x);
        self.node_at_mut(x).parent = Some(y);
        trace!("rotated left at node {x}");
    }

    fn rotate_right(&mut self, y: usize) {
        let Some(x) = self.node_at(y).left else {
            return;
        };

        let x_right = self.node_at(x).right;
        self.node_at_mut(y).left = x_right;
        if let Some(x_right) = x_right {
            self.node_at_mut(x_right).parent = Some(y);
        }

        let y_parent = self.node_at(y).parent;
        self.node_at_mut(x).parent = y_parent;

        match y_parent {
            None => self.root = Some(x),
            Some(p) if self.node_at(p).left == Some(y) => self.node_at_mut(p).left = Some(x),
            Some(p) => self.node_at_mut(p).right = Some(x),
        }

        self.node_at_mut(x).right = Some(y);
        self.node_at_mut(y).parent = Some(x);
        trace!("rotated right at node {y}");
    }

    fn fix_insertion_violations(&mut self, mut node: usize) {
        while self.root != Some(node) && self.is_red(self.parent_of(Some(node))) {
            // A red parent is never the root, so the grandparent exists.
            let Some(parent) = self.node_at(node).parent else {
                break;
            };
            let Some(grandparent) = self.node_at(parent).parent else {
                break;
            };

            if self.node_at(grandparent).left == Some(parent) {
                let uncle = self.node_at(grandparent).right;

                if self.is_red(uncle) {
                    self.set_color(Some(parent), Color::Black);
                    self.set_color(uncle, Color::Black);
                    self.set_color(Some(grandparent), Color::Red);
                    node = grandparent;
                } else {
                    if self.node_at(parent).right == Some(node) {
                        node = parent;
                        self.rotate_left(node);
                    }
                    let updated_parent = self.parent_of(Some(node));
                    let updated_grandparent = self.parent_of(updated_parent);
                    self.set_color(updated_parent, Color::Black);
                    self.set_color(updated_grandparent, Color::Red);
                    if let Some(gp) = updated_grandparent {
                        self.rotate_right(gp);
                    }
                }
            } else {
                let uncle = self.node_at(grandparent).left;

                if self.is_red(uncle) {
                    self.set_color(Some(parent), Color::Black);
                    self.set_color(uncle, Color::Black);
                    self.set_color(Some(grandparent), Color::Red);
                    node = grandparent;
                } else {
                    if self.node_at(parent).left == Some(node) {
                        node = parent;
                        self.rotate_right(node);
                    }
                    let updated_parent = self.parent_of(Some(node));
                    let updated_grandparent = self.parent_of(updated_parent);
                    self.set_color(updated_parent, Color::Black);
                    self.set_color(updated_grandparent, Color::Red);
                    if let Some(gp) = updated_grandparent {
                        self.rotate_left(gp);
                    }
                }
            }
        }
        self.set_color(self.root, Color::Black);
    }

    fn verify_black_height(&self, node_idx: Option<usize>) -> Option<usize> {
        let Some(idx) = node_idx else {
            return Some(1);
        };
        let node = self.node_at(idx);

        if node.color == Color::Red && (self.is_red(node.left) || self.is_red(node.right)) {
            return None;
        }

        let linked_back = [node.left, node.right]
            .into_iter()
            .flatten()
            .all(|child| self.node_at(child).parent == Some(idx));
        if !linked_back {
            return None;
        }

        let left_height = self.verify_black_height(node.left)?;
        let right_height = self.verify_black_height(node.right)?;

        if left_height != right_height {
            return None;
        }

        if node.color == Color::Black {
            Some(left_height + 1)
        } else {
            Some(left_height)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::{string::ToString, vec};
    use assert_approx_eq::assert_approx_eq;

    fn tree_from(values: &[f64]) -> OrderedTree<f64> {
        let mut tree = OrderedTree::new();
        for &value in values {
            tree.insert(value);
        }
        tree
    }

    fn values(entries: &[Entry<f64>]) -> Vec<f64> {
        entries.iter().map(|e| e.value).collect()
    }

    fn labels(entries: &[Entry<f64>]) -> Vec<char> {
        entries.iter().map(|e| e.color.label()).collect()
    }

    /// Small deterministic generator so the stress tests need no extra crates
    fn pseudo_random(seed: &mut u64) -> f64 {
        *seed ^= *seed << 13;
        *seed ^= *seed >> 7;
        *seed ^= *seed << 17;
        (*seed % 1000) as f64 / 10.0
    }

    fn assert_valid(tree: &OrderedTree<f64>) {
        assert!(tree.black_height().is_some(), "invariants violated");
        let sorted = values(&tree.inorder());
        assert!(sorted.windows(2).all(|w| w[0] <= w[1]), "{sorted:?}");
        assert_eq!(sorted.len(), tree.len());
        assert_eq!(tree.preorder().len(), tree.len());
    }

    #[test]
    fn test_empty_tree() {
        let tree = OrderedTree::<f64>::new();
        assert!(tree.is_empty());
        assert_eq!(tree.len(), 0);
        assert!(tree.root().is_none());
        assert!(tree.preorder().is_empty());
        assert!(tree.inorder().is_empty());
        assert_eq!(tree.sum_of_leaves(), 0.0);
        assert_eq!(tree.average(), 0.0);
        assert_eq!(tree.black_height(), Some(1));
        assert!(tree.min().is_none());
        assert!(tree.max().is_none());
    }

    #[test]
    fn test_single_element() {
        let tree = tree_from(&[7.5]);
        let expected = vec![Entry {
            value: 7.5,
            color: Color::Black,
        }];
        assert_eq!(tree.preorder(), expected);
        assert_eq!(tree.inorder(), expected);
        assert_eq!(tree.average(), 7.5);
        assert_eq!(tree.sum_of_leaves(), 7.5);
        assert_eq!(tree.black_height(), Some(2));
    }

    #[test]
    fn test_ascending_insert_rotates() {
        let tree = tree_from(&[10.0, 20.0, 30.0]);

        assert_eq!(
            tree.root(),
            Some(Entry {
                value: 20.0,
                color: Color::Black
            })
        );
        let inorder = tree.inorder();
        assert_eq!(values(&inorder), [10.0, 20.0, 30.0]);
        assert_eq!(labels(&inorder), ['R', 'B', 'R']);
        assert_eq!(values(&tree.preorder()), [20.0, 10.0, 30.0]);
    }

    #[test]
    fn test_descending_insert_rotates() {
        let tree = tree_from(&[30.0, 20.0, 10.0]);
        assert_eq!(tree.root().map(|e| e.value), Some(20.0));
        assert_eq!(labels(&tree.preorder()), ['B', 'R', 'R']);
        assert_valid(&tree);
    }

    #[test]
    fn test_inner_child_double_rotation() {
        // 10 <- 30, then 20 lands as the inner (right) child of 10
        let tree = tree_from(&[30.0, 10.0, 20.0]);
        assert_eq!(values(&tree.preorder()), [20.0, 10.0, 30.0]);
        assert_eq!(labels(&tree.preorder()), ['B', 'R', 'R']);

        let mirrored = tree_from(&[10.0, 30.0, 20.0]);
        assert_eq!(values(&mirrored.preorder()), [20.0, 10.0, 30.0]);
        assert_eq!(labels(&mirrored.preorder()), ['B', 'R', 'R']);
    }

    #[test]
    fn test_duplicates_go_right() {
        let tree = tree_from(&[5.0, 5.0]);

        let preorder = tree.preorder();
        assert_eq!(values(&preorder), [5.0, 5.0]);
        assert_eq!(labels(&preorder), ['B', 'R']);

        let root = tree.root.unwrap();
        assert!(tree.node_at(root).left.is_none());
        assert!(tree.node_at(root).right.is_some());
        assert_eq!(values(&tree.inorder()), [5.0, 5.0]);
        assert_valid(&tree);
    }

    #[test]
    fn test_duplicate_heavy_workload() {
        let tree = tree_from(&[1.0; 50]);
        assert_eq!(tree.len(), 50);
        assert_eq!(values(&tree.inorder()), vec![1.0; 50]);
        assert_eq!(tree.average(), 1.0);
        assert_valid(&tree);
    }

    #[test]
    fn test_leaf_sum_uses_rebalanced_shape() {
        // 20 makes the uncle 70 red, so the insert only recolors; 40 hangs under black 30
        let tree = tree_from(&[50.0, 30.0, 70.0, 20.0, 40.0]);

        let preorder = tree.preorder();
        assert_eq!(values(&preorder), [50.0, 30.0, 20.0, 40.0, 70.0]);
        assert_eq!(labels(&preorder), ['B', 'B', 'R', 'R', 'B']);
        assert_eq!(tree.sum_of_leaves(), 130.0);
        assert_eq!(tree.average(), 42.0);
    }

    #[test]
    fn test_leaf_sum_after_rotation() {
        // Plain BST would be a chain with the single leaf 5
        let tree = tree_from(&[1.0, 2.0, 3.0, 4.0, 5.0]);
        assert_eq!(values(&tree.preorder()), [2.0, 1.0, 4.0, 3.0, 5.0]);
        assert_eq!(labels(&tree.preorder()), ['B', 'B', 'B', 'R', 'R']);
        assert_eq!(tree.sum_of_leaves(), 9.0);
    }

    #[test]
    fn test_invariants_ascending_stress() {
        let mut tree = OrderedTree::new();
        for i in 0..500 {
            tree.insert(i as f64);
            assert!(tree.black_height().is_some(), "invariants violated at {i}");
        }
        assert_valid(&tree);
        assert_eq!(tree.min(), Some(0.0));
        assert_eq!(tree.max(), Some(499.0));
        assert_approx_eq!(tree.average(), 249.5);
    }

    #[test]
    fn test_invariants_random_stress() {
        let mut seed = 0x2545_f491_4f6c_dd1d;
        let mut tree = OrderedTree::new();
        let mut inserted = Vec::new();

        for _ in 0..1000 {
            let value = pseudo_random(&mut seed);
            tree.insert(value);
            inserted.push(value);
        }

        assert_valid(&tree);
        inserted.sort_by(|a, b| a.total_cmp(b));
        assert_eq!(values(&tree.inorder()), inserted);

        let mean = inserted.iter().sum::<f64>() / inserted.len() as f64;
        assert_approx_eq!(tree.average(), mean, 1e-9);
    }

    #[test]
    fn test_black_height_is_logarithmic() {
        let mut tree = OrderedTree::new();
        for i in 0..1023 {
            tree.insert(i as f64);
        }
        let black_height = tree.black_height().unwrap();
        assert!((2..=11).contains(&black_height), "{black_height}");
    }

    #[test]
    fn test_black_height_detects_violations() {
        let mut tree = tree_from(&[10.0, 20.0, 30.0]);
        let root = tree.root.unwrap();
        tree.set_color(Some(root), Color::Red);
        assert!(tree.black_height().is_none());

        let mut tree = tree_from(&[10.0, 20.0, 30.0]);
        let left = tree.node_at(root).left;
        tree.set_color(left, Color::Black);
        assert!(tree.black_height().is_none());
    }

    #[test]
    fn test_rotations_keep_inorder() {
        let mut tree = tree_from(&[40.0, 20.0, 60.0, 10.0, 30.0, 50.0, 70.0]);
        let before = values(&tree.inorder());

        let root = tree.root.unwrap();
        tree.rotate_left(root);
        assert_eq!(tree.root().map(|e| e.value), Some(60.0));
        assert_eq!(values(&tree.inorder()), before);

        let root = tree.root.unwrap();
        tree.rotate_right(root);
        assert_eq!(tree.root().map(|e| e.value), Some(40.0));
        assert_eq!(values(&tree.inorder()), before);
        assert!(tree.parent_of(tree.root).is_none());
    }

    #[test]
    fn test_reset() {
        let mut tree = tree_from(&[3.0, 1.0, 2.0]);
        tree.reset();
        assert!(tree.is_empty());
        assert_eq!(tree.len(), 0);
        assert_eq!(tree.average(), 0.0);

        tree.reset();
        assert!(tree.is_empty());

        tree.insert(42.0);
        assert_eq!(values(&tree.inorder()), [42.0]);
        assert_eq!(tree.root().map(|e| e.color), Some(Color::Black));
    }

    #[test]
    fn test_negative_and_fractional_values() {
        let tree = tree_from(&[-1.5, 0.25, -3.0, 2.0]);
        assert_eq!(values(&tree.inorder()), [-3.0, -1.5, 0.25, 2.0]);
        assert_approx_eq!(tree.average(), -0.5625);
        assert_valid(&tree);
    }

    #[test]
    fn test_infinity_values() {
        let tree = tree_from(&[1.0, f64::INFINITY, f64::NEG_INFINITY, 2.0]);
        assert_eq!(tree.min(), Some(f64::NEG_INFINITY));
        assert_eq!(tree.max(), Some(f64::INFINITY));
        assert_valid(&tree);
    }

    #[test]
    fn test_compensated_average() {
        let tree = tree_from(&[1_000_000.1, 1_000_000.2, 1_000_000.3]);
        assert_approx_eq!(tree.average(), 1_000_000.2, 1e-9);
    }

    #[test]
    fn test_average_near_overflow() {
        let tree = tree_from(&[1e308, 1e308]);
        assert_eq!(tree.average(), f64::INFINITY);

        let tree = tree_from(&[1e308, 1e308, 1e308]);
        assert_eq!(tree.average(), f64::INFINITY);
        assert_eq!(tree.sum_of_leaves(), f64::INFINITY);

        let tree = tree_from(&[1e308, -1e308, 5.0]);
        assert_eq!(tree.average(), 5.0 / 3.0);
    }

    #[test]
    fn test_f32_tree() {
        let mut tree = OrderedTree::<f32>::new();
        tree.insert(2.0).insert(1.0).insert(3.0);
        assert_eq!(tree.average(), 2.0);
        assert_eq!(tree.sum_of_leaves(), 4.0);
    }

    #[test]
    fn test_entry_display() {
        let tree = tree_from(&[10.0, 2.5]);
        let rendered: Vec<_> = tree.inorder().iter().map(|e| e.to_string()).collect();
        assert_eq!(rendered, ["2.5(R)", "10(B)"]);
    }
}
