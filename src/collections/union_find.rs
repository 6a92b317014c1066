//! Disjoint-set (Union-Find) data structure.
//!
//! Maintains a collection of disjoint sets over elements `0..n` with
//! near-constant-time union and find operations.
//!
//! # Algorithm
//!
//! Uses **weighted union by size** during `union` and **path halving**
//! during `find` to achieve amortized O(α(n)) per operation, where α is
//! the inverse Ackermann function. Union by size alone bounds every tree
//! to height O(log n) regardless of the order of unions.
//!
//! # References
//!
//! - Tarjan (1975), "Efficiency of a Good but Not Linear Set Union Algorithm"
//! - Tarjan & van Leeuwen (1984), "Worst-Case Analysis of Set Union Algorithms"

/// Disjoint-set forest with path halving and union by size.
///
/// # Examples
/// ```
/// use u_percolation::collections::UnionFind;
///
/// let mut uf = UnionFind::new(5);
/// assert_eq!(uf.component_count(), 5);
///
/// uf.union(0, 1);
/// uf.union(2, 3);
/// assert_eq!(uf.component_count(), 3);
///
/// assert!(uf.connected(0, 1));
/// assert!(!uf.connected(0, 2));
///
/// uf.union(1, 3);
/// assert!(uf.connected(0, 2)); // transitivity
/// assert_eq!(uf.component_count(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct UnionFind {
    parent: Vec<usize>,
    size: Vec<usize>,
    components: usize,
}

impl UnionFind {
    /// Creates a new Union-Find with `n` disjoint singleton sets `{0}, {1}, ..., {n-1}`.
    ///
    /// # Complexity
    /// O(n)
    pub fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
            size: vec![1; n],
            components: n,
        }
    }

    /// Returns the number of elements.
    pub fn len(&self) -> usize {
        self.parent.len()
    }

    /// Returns `true` if there are no elements.
    pub fn is_empty(&self) -> bool {
        self.parent.is_empty()
    }

    /// Finds the representative (root) of the set containing `x`.
    ///
    /// Applies **path halving**: every visited node is repointed to its
    /// grandparent, halving the path length on each call without changing
    /// which set any element belongs to.
    ///
    /// # Complexity
    /// Amortized O(α(n))
    ///
    /// # Panics
    /// Panics if `x >= len()`.
    pub fn find(&mut self, mut x: usize) -> usize {
        while self.parent[x] != x {
            self.parent[x] = self.parent[self.parent[x]];
            x = self.parent[x];
        }
        x
    }

    /// Merges the sets containing `x` and `y`.
    ///
    /// Uses **union by size**: the root of the smaller tree is attached
    /// under the root of the larger tree. On a tie, `y`'s root goes under
    /// `x`'s root.
    ///
    /// # Returns
    /// `true` if `x` and `y` were in different sets (and are now merged),
    /// `false` if they were already in the same set.
    ///
    /// # Complexity
    /// Amortized O(α(n))
    ///
    /// # Panics
    /// Panics if `x >= len()` or `y >= len()`.
    pub fn union(&mut self, x: usize, y: usize) -> bool {
        let root_x = self.find(x);
        let root_y = self.find(y);

        if root_x == root_y {
            return false;
        }

        if self.size[root_x] < self.size[root_y] {
            self.parent[root_x] = root_y;
            self.size[root_y] += self.size[root_x];
        } else {
            self.parent[root_y] = root_x;
            self.size[root_x] += self.size[root_y];
        }

        self.components -= 1;
        true
    }

    /// Returns `true` if `x` and `y` are in the same set.
    ///
    /// # Complexity
    /// Amortized O(α(n))
    pub fn connected(&mut self, x: usize, y: usize) -> bool {
        self.find(x) == self.find(y)
    }

    /// Returns the number of disjoint sets.
    ///
    /// # Complexity
    /// O(1)
    pub fn component_count(&self) -> usize {
        self.components
    }

    /// Returns the size of the set containing `x`.
    ///
    /// # Complexity
    /// Amortized O(α(n))
    pub fn component_size(&mut self, x: usize) -> usize {
        let root = self.find(x);
        self.size[root]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Height of the tree containing `x`, measured without compressing.
    fn depth(uf: &UnionFind, mut x: usize) -> usize {
        let mut d = 0;
        while uf.parent[x] != x {
            x = uf.parent[x];
            d += 1;
        }
        d
    }

    #[test]
    fn test_new() {
        let uf = UnionFind::new(5);
        assert_eq!(uf.len(), 5);
        assert_eq!(uf.component_count(), 5);
    }

    #[test]
    fn test_new_empty() {
        let uf = UnionFind::new(0);
        assert!(uf.is_empty());
        assert_eq!(uf.component_count(), 0);
    }

    #[test]
    fn test_find_initial() {
        let mut uf = UnionFind::new(5);
        for i in 0..5 {
            assert_eq!(uf.find(i), i);
        }
    }

    #[test]
    fn test_union_same_set() {
        let mut uf = UnionFind::new(5);
        assert!(uf.union(0, 1));
        assert!(!uf.union(1, 0)); // already same set
        assert_eq!(uf.component_count(), 4);
    }

    #[test]
    fn test_tie_attaches_second_under_first() {
        let mut uf = UnionFind::new(4);
        uf.union(0, 1);
        assert_eq!(uf.find(1), 0);

        uf.union(3, 2);
        assert_eq!(uf.find(2), 3);
    }

    #[test]
    fn test_smaller_tree_goes_under_larger() {
        let mut uf = UnionFind::new(5);
        uf.union(0, 1);
        uf.union(0, 2);
        // {3} is smaller than {0, 1, 2}, so 0 stays the root even though
        // it is passed second.
        uf.union(3, 0);
        assert_eq!(uf.find(3), 0);
        assert_eq!(uf.component_size(3), 4);
    }

    #[test]
    fn test_transitivity() {
        let mut uf = UnionFind::new(5);
        uf.union(0, 1);
        uf.union(1, 2);
        assert!(uf.connected(0, 2));
        assert!(!uf.connected(0, 3));
    }

    #[test]
    fn test_component_size() {
        let mut uf = UnionFind::new(5);
        assert_eq!(uf.component_size(0), 1);

        uf.union(0, 1);
        assert_eq!(uf.component_size(1), 2);

        uf.union(0, 2);
        assert_eq!(uf.component_size(2), 3);
    }

    #[test]
    fn test_path_halving_shortens_paths() {
        let mut uf = UnionFind::new(4);
        // Build the chain 3 -> 2 -> 1 -> 0 by hand.
        uf.parent = vec![0, 0, 1, 2];
        uf.size = vec![4, 1, 1, 1];
        uf.components = 1;

        assert_eq!(depth(&uf, 3), 3);
        assert_eq!(uf.find(3), 0);
        assert!(depth(&uf, 3) < 3);
        assert_eq!(uf.find(2), 0);
        assert_eq!(uf.component_size(3), 4);
    }

    #[test]
    fn test_height_is_logarithmic() {
        // A chain of unions in the worst order for unweighted union.
        let n = 1024;
        let mut uf = UnionFind::new(n);
        for i in 1..n {
            uf.union(i, i - 1);
        }
        let max_depth = (0..n).map(|i| depth(&uf, i)).max().unwrap();
        assert!(max_depth <= 10, "depth {max_depth} exceeds log2(n)");
        assert_eq!(uf.component_count(), 1);
    }

    #[test]
    fn test_single_element() {
        let mut uf = UnionFind::new(1);
        assert_eq!(uf.find(0), 0);
        assert!(uf.connected(0, 0));
        assert_eq!(uf.component_size(0), 1);
    }

    #[test]
    #[should_panic]
    fn test_out_of_range_panics() {
        let mut uf = UnionFind::new(3);
        uf.find(3);
    }
}
