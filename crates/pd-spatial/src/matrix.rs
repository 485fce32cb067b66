//! Dense distance matrix with unknown cells.

use pd_core::LocationId;

use crate::{SpatialError, SpatialResult};

/// A square n×n table of non-negative distances stored in row-major order.
///
/// Input tables are usually lower-triangular: only `D[i][j]` with `j ≤ i` is
/// populated.  [`get`](Self::get) therefore tries both orientations, so a
/// caller never needs to know which half of the table was filled in.  Cells
/// that are blank in both orientations are unknown (`None`).
///
/// # Examples
///
/// ```
/// use pd_core::LocationId;
/// use pd_spatial::DistanceMatrix;
///
/// let dm = DistanceMatrix::from_rows(vec![
///     vec![Some(0.0)],
///     vec![Some(7.2), Some(0.0)],
/// ])
/// .unwrap();
/// assert_eq!(dm.get(LocationId(0), LocationId(1)), Some(7.2));
/// assert_eq!(dm.get(LocationId(1), LocationId(0)), Some(7.2));
/// assert_eq!(dm.size(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct DistanceMatrix {
    data: Vec<Option<f64>>,
    size: usize,
}

impl DistanceMatrix {
    /// Creates a matrix of the given size with every off-diagonal cell
    /// unknown.
    pub fn new(size: usize) -> Self {
        Self {
            data: vec![None; size * size],
            size,
        }
    }

    /// Creates a matrix from (possibly ragged) rows.
    ///
    /// The matrix is `rows.len()` square.  Each row may be shorter than that
    /// (missing trailing cells are unknown) but never longer.
    ///
    /// # Errors
    ///
    /// [`SpatialError::DimensionMismatch`] for an over-long row and
    /// [`SpatialError::InvalidDistance`] for a negative or non-finite cell.
    pub fn from_rows(rows: Vec<Vec<Option<f64>>>) -> SpatialResult<Self> {
        let size = rows.len();
        let mut dm = Self::new(size);
        for (i, row) in rows.into_iter().enumerate() {
            if row.len() > size {
                return Err(SpatialError::DimensionMismatch { row: i, len: row.len(), size });
            }
            for (j, cell) in row.into_iter().enumerate() {
                if let Some(d) = cell {
                    dm.set(LocationId(i as u32), LocationId(j as u32), d)?;
                }
            }
        }
        Ok(dm)
    }

    /// Sets the distance in the `from` row, `to` column.
    ///
    /// # Errors
    ///
    /// Rejects negative and non-finite distances and out-of-range indices.
    pub fn set(&mut self, from: LocationId, to: LocationId, distance: f64) -> SpatialResult<()> {
        if !(distance.is_finite() && distance >= 0.0) {
            return Err(SpatialError::InvalidDistance { from, to, value: distance });
        }
        let slot = self
            .slot(from, to)
            .ok_or(SpatialError::InvalidDistance { from, to, value: distance })?;
        self.data[slot] = Some(distance);
        Ok(())
    }

    /// Returns the distance between `a` and `b`, trying both orientations.
    ///
    /// The diagonal defaults to zero.  Returns `None` for an unknown pair or
    /// an out-of-range index.
    pub fn get(&self, a: LocationId, b: LocationId) -> Option<f64> {
        let known = self.cell(a, b).or_else(|| self.cell(b, a));
        match known {
            None if a == b && a.index() < self.size => Some(0.0),
            other => other,
        }
    }

    /// Like [`get`](Self::get) but reports an unknown pair as an error.
    pub fn require(&self, a: LocationId, b: LocationId) -> SpatialResult<f64> {
        self.get(a, b).ok_or(SpatialError::MatrixGap { from: a, to: b })
    }

    /// Number of locations in this matrix.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Returns the nearest candidate to `from` with a known distance.
    ///
    /// Candidates are scanned in the order given; on equal distance the
    /// earlier candidate wins, so passing them in ascending index order
    /// breaks ties by lowest index.  Returns `None` if no candidate has a
    /// known distance.
    pub fn nearest<I>(&self, from: LocationId, candidates: I) -> Option<(LocationId, f64)>
    where
        I: IntoIterator<Item = LocationId>,
    {
        let mut best: Option<(LocationId, f64)> = None;
        for c in candidates {
            let Some(d) = self.get(from, c) else { continue };
            if best.is_none_or(|(_, b)| d < b) {
                best = Some((c, d));
            }
        }
        best
    }

    /// Locations in `0..upto` whose distance to the hub is unknown.
    pub fn hub_gaps(&self, upto: usize) -> Vec<LocationId> {
        (0..upto)
            .map(|i| LocationId(i as u32))
            .filter(|&l| self.get(LocationId::HUB, l).is_none())
            .collect()
    }

    #[inline]
    fn slot(&self, from: LocationId, to: LocationId) -> Option<usize> {
        (from.index() < self.size && to.index() < self.size)
            .then(|| from.index() * self.size + to.index())
    }

    #[inline]
    fn cell(&self, from: LocationId, to: LocationId) -> Option<f64> {
        self.slot(from, to).and_then(|s| self.data[s])
    }
}
