//! Percolation model on an n×n grid.
//!
//! Sites start closed and are opened one at a time. The grid *percolates*
//! once an open path of 4-neighbour adjacent sites joins the top row to
//! the bottom row. A site is *full* when an open path joins it to the top
//! row.
//!
//! # Algorithm
//!
//! Two virtual sites collapse the row-to-row check into a single
//! connectivity query: a virtual top joined to every top-row cell and a
//! virtual bottom joined to every bottom-row cell.
//!
//! A single union-find holding both virtual sites cannot answer "is full"
//! correctly. Once the grid percolates, the virtual bottom is reachable
//! from the virtual top, so any open bottom-row site would look full even
//! without its own path to the top (*backwash*). The model therefore keeps
//! two independent [`UnionFind`] instances:
//!
//! | Structure | Elements | Answers |
//! |---|---|---|
//! | percolation | n² + 2 (top and bottom) | [`Percolation::percolates`] |
//! | fullness | n² + 1 (top only) | [`Percolation::is_full`] |
//!
//! # Coordinates
//!
//! Rows and columns are 1-indexed, `(1, 1)` is the top-left corner and
//! both must lie in `[1, n]`.

use thiserror::Error;
use tracing::trace;

use crate::collections::UnionFind;

/// Invalid argument passed to a [`Percolation`] operation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PercolationError {
    /// Grid dimension is zero or too large to index.
    #[error("grid size must be > 0, got {0}")]
    InvalidGridSize(usize),
    /// Row outside `[1, n]`.
    #[error("row {row} is out of bounds for a {n}x{n} grid")]
    RowOutOfBounds { row: usize, n: usize },
    /// Column outside `[1, n]`.
    #[error("column {col} is out of bounds for a {n}x{n} grid")]
    ColumnOutOfBounds { col: usize, n: usize },
}

/// An n×n percolation system backed by two union-find structures.
///
/// # Examples
/// ```
/// use u_percolation::Percolation;
///
/// let mut perc = Percolation::new(3)?;
/// perc.open(1, 1)?;
/// perc.open(2, 1)?;
/// assert!(!perc.percolates());
///
/// perc.open(3, 1)?;
/// assert!(perc.percolates());
/// assert!(perc.is_full(3, 1)?);
/// assert_eq!(perc.number_of_open_sites(), 3);
/// # Ok::<(), u_percolation::PercolationError>(())
/// ```
#[derive(Debug, Clone)]
pub struct Percolation {
    n: usize,
    open: Vec<bool>,
    open_count: usize,
    /// Grid cells plus virtual top (`n²`) and virtual bottom (`n² + 1`).
    percolation_uf: UnionFind,
    /// Grid cells plus virtual top (`n²`). No virtual bottom.
    fullness_uf: UnionFind,
}

impl Percolation {
    /// Creates an n×n grid with every site closed.
    ///
    /// # Errors
    /// Returns [`PercolationError::InvalidGridSize`] if `n == 0` or `n² + 2`
    /// overflows `usize`.
    ///
    /// # Complexity
    /// O(n²)
    pub fn new(n: usize) -> Result<Self, PercolationError> {
        let sites = n
            .checked_mul(n)
            .filter(|&s| n > 0 && s.checked_add(2).is_some())
            .ok_or(PercolationError::InvalidGridSize(n))?;

        let mut percolation_uf = UnionFind::new(sites + 2);
        let mut fullness_uf = UnionFind::new(sites + 1);
        let top = sites;
        let bottom = sites + 1;

        for col in 0..n {
            percolation_uf.union(col, top);
            fullness_uf.union(col, top);
            percolation_uf.union(n * (n - 1) + col, bottom);
        }

        Ok(Self {
            n,
            open: vec![false; sites],
            open_count: 0,
            percolation_uf,
            fullness_uf,
        })
    }

    /// Returns the grid dimension `n`.
    pub fn grid_size(&self) -> usize {
        self.n
    }

    /// Returns the number of grid sites, `n²`.
    pub fn site_count(&self) -> usize {
        self.open.len()
    }

    /// Opens the site at `(row, col)` if it is not open already.
    ///
    /// Joins the site with each open 4-neighbour in both structures.
    /// Opening an open site again is a no-op.
    ///
    /// # Errors
    /// Returns an out-of-bounds error if `row` or `col` is outside `[1, n]`.
    ///
    /// # Complexity
    /// Amortized O(α(n²))
    pub fn open(&mut self, row: usize, col: usize) -> Result<(), PercolationError> {
        let pos = self.index(row, col)?;

        if !self.open[pos] {
            self.open[pos] = true;
            self.open_count += 1;
            trace!(row, col, open_sites = self.open_count, "opened site");
        }

        let n = self.n;
        if col > 1 && self.open[pos - 1] {
            self.link(pos, pos - 1);
        }
        if col < n && self.open[pos + 1] {
            self.link(pos, pos + 1);
        }
        if row > 1 && self.open[pos - n] {
            self.link(pos, pos - n);
        }
        if row < n && self.open[pos + n] {
            self.link(pos, pos + n);
        }
        Ok(())
    }

    /// Returns `true` if the site at `(row, col)` is open.
    ///
    /// # Errors
    /// Returns an out-of-bounds error if `row` or `col` is outside `[1, n]`.
    pub fn is_open(&self, row: usize, col: usize) -> Result<bool, PercolationError> {
        let pos = self.index(row, col)?;
        Ok(self.open[pos])
    }

    /// Returns `true` if the site at `(row, col)` is open and joined to the
    /// top row through open sites. Closed sites are never full.
    ///
    /// Takes `&mut self` because the lookup compresses union-find paths.
    ///
    /// # Errors
    /// Returns an out-of-bounds error if `row` or `col` is outside `[1, n]`.
    pub fn is_full(&mut self, row: usize, col: usize) -> Result<bool, PercolationError> {
        let pos = self.index(row, col)?;
        if !self.open[pos] {
            return Ok(false);
        }
        let top = self.virtual_top();
        Ok(self.fullness_uf.connected(pos, top))
    }

    /// Returns the number of open sites.
    pub fn number_of_open_sites(&self) -> usize {
        self.open_count
    }

    /// Returns the fraction of sites that are open, in `[0, 1]`.
    pub fn open_fraction(&self) -> f64 {
        self.open_count as f64 / self.site_count() as f64
    }

    /// Returns `true` if an open path joins the top row to the bottom row.
    ///
    /// On a 1×1 grid the single cell is wired to both virtual sites at
    /// construction, so the answer is just whether it is open.
    pub fn percolates(&mut self) -> bool {
        if self.n == 1 {
            return self.open[0];
        }
        let top = self.virtual_top();
        let bottom = top + 1;
        self.percolation_uf.connected(top, bottom)
    }

    fn virtual_top(&self) -> usize {
        self.open.len()
    }

    fn link(&mut self, a: usize, b: usize) {
        self.percolation_uf.union(a, b);
        self.fullness_uf.union(a, b);
    }

    /// Converts 1-indexed `(row, col)` into a linear cell index.
    fn index(&self, row: usize, col: usize) -> Result<usize, PercolationError> {
        let n = self.n;
        if row == 0 || row > n {
            return Err(PercolationError::RowOutOfBounds { row, n });
        }
        if col == 0 || col > n {
            return Err(PercolationError::ColumnOutOfBounds { col, n });
        }
        Ok(n * (row - 1) + (col - 1))
    }
}
