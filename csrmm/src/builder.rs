//! Accumulating CSR construction
//!
//! [`CsrBuilder`] collects `(row, col, value)` contributions in any order,
//! summing repeated positions per row, and compresses them into flat CSR
//! arrays when [`CsrBuilder::finalize`] is called.

use hashbrown::hash_map::Entry;
use hashbrown::HashMap;

use csrmm_core::{check_dimensions, check_position, CsrMatrix, MatrixElement, Result};

/// Running sums for one row, in first-insertion order
#[derive(Debug, Clone)]
struct RowAccumulator<T> {
    /// column -> position in `entries`
    slots: HashMap<usize, usize>,
    entries: Vec<(usize, T)>,
}

impl<T: MatrixElement> RowAccumulator<T> {
    fn new() -> Self {
        Self {
            slots: HashMap::new(),
            entries: Vec::new(),
        }
    }

    fn reserve(&mut self, additional: usize) {
        self.slots.reserve(additional);
        self.entries.reserve(additional);
    }

    fn add(&mut self, col: usize, value: T) {
        match self.slots.entry(col) {
            Entry::Occupied(slot) => self.entries[*slot.get()].1 += value,
            Entry::Vacant(slot) => {
                slot.insert(self.entries.len());
                self.entries.push((col, value));
            }
        }
    }

    /// Entries whose running sum is not exactly zero
    fn nonzero(&self) -> impl Iterator<Item = (usize, T)> + '_ {
        self.entries
            .iter()
            .copied()
            .filter(|&(_, value)| !value.is_zero())
    }
}

/// Builder that merges duplicate positions before producing a [`CsrMatrix`]
///
/// `finalize` consumes the builder, so nothing can be added afterwards.
#[derive(Debug, Clone)]
pub struct CsrBuilder<T> {
    nrows: usize,
    ncols: usize,
    /// `row_pointer[row + 1]` counts `add_value` calls for `row`; only a
    /// real prefix sum after finalize
    row_pointer: Vec<usize>,
    rows: Vec<RowAccumulator<T>>,
}

impl<T: MatrixElement> CsrBuilder<T> {
    /// Create a builder with every row empty
    pub fn new(nrows: usize, ncols: usize) -> Result<Self> {
        check_dimensions(nrows, ncols)?;
        Ok(Self {
            nrows,
            ncols,
            row_pointer: vec![0; nrows + 1],
            rows: (0..nrows).map(|_| RowAccumulator::new()).collect(),
        })
    }

    pub fn dimensions(&self) -> (usize, usize) {
        (self.nrows, self.ncols)
    }

    /// Pre-size the accumulator of `row` for `additional` distinct columns
    pub fn reserve_row(&mut self, row: usize, additional: usize) {
        if let Some(acc) = self.rows.get_mut(row) {
            acc.reserve(additional);
        }
    }

    /// Add `value` to the running sum at `(row, col)`
    ///
    /// The raw call counter of `row` is bumped even for a zero `value`. A
    /// zero never creates an entry by itself.
    pub fn add_value(&mut self, row: usize, col: usize, value: T) -> Result<()> {
        check_position(row, col, self.nrows, self.ncols)?;

        self.row_pointer[row + 1] += 1;
        if !value.is_zero() {
            self.rows[row].add(col, value);
        }
        Ok(())
    }

    /// Raw per-row call counts, offset by one (`[0, calls(0), calls(1), ..]`)
    ///
    /// These are not row sizes: repeated columns and cancelled sums are
    /// only resolved by `finalize`.
    pub fn raw_row_pointer(&self) -> &[usize] {
        &self.row_pointer
    }

    /// Compress the accumulated sums into CSR arrays
    ///
    /// Row pointers are recomputed from the number of distinct columns with
    /// a nonzero sum in each row. Entries keep their per-row first-insertion
    /// order; exact-zero sums are dropped.
    pub fn finalize(self) -> CsrMatrix<T> {
        let Self {
            nrows,
            ncols,
            mut row_pointer,
            rows,
        } = self;

        row_pointer[0] = 0;
        for (row, acc) in rows.iter().enumerate() {
            row_pointer[row + 1] = row_pointer[row] + acc.nonzero().count();
        }

        let nnz = row_pointer[nrows];
        let mut col_index = Vec::with_capacity(nnz);
        let mut values = Vec::with_capacity(nnz);
        for acc in &rows {
            for (col, value) in acc.nonzero() {
                col_index.push(col);
                values.push(value);
            }
        }

        log::debug!("Finalized {nrows}x{ncols} CSR with {nnz} nonzeros");

        CsrMatrix::from_raw_parts_unchecked(nrows, ncols, row_pointer, col_index, values)
    }
}
