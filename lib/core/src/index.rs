//! Exact nearest-neighbor search over poem embeddings.
//!
//! [`FlatL2Index`] is a brute-force L2 index over a contiguous buffer. Like the
//! index artifacts it is loaded from, a search for `k` neighbors always returns
//! exactly `k` slots, padding with [`SENTINEL`] when fewer vectors are stored.
//!
//! [`PoemIndex`] pairs the raw index with its parallel identifier list so that
//! positions never leak to callers.

use crate::poem::PoemId;
use crate::store::NearestNeighbors;
use crate::{Error, Result, Vector};
use ordered_float::OrderedFloat;

/// Position reported for unfilled result slots
pub const SENTINEL: i64 = -1;

#[derive(Debug, Clone)]
pub struct FlatL2Index {
    dim: usize,
    data: Vec<f32>,
}

impl FlatL2Index {
    pub fn new(dim: usize) -> Self {
        Self { dim, data: Vec::new() }
    }

    /// Build from row vectors, all of which must have dimension `dim`.
    pub fn from_rows<I>(dim: usize, rows: I) -> Result<Self>
    where
        I: IntoIterator<Item = Vec<f32>>,
    {
        let mut index = Self::new(dim);
        for row in rows {
            index.add(&row)?;
        }
        Ok(index)
    }

    pub fn add(&mut self, vector: &[f32]) -> Result<()> {
        if vector.len() != self.dim {
            return Err(Error::InvalidDimension {
                expected: self.dim,
                actual: vector.len(),
            });
        }
        self.data.extend_from_slice(vector);
        Ok(())
    }

    #[inline]
    pub fn dim(&self) -> usize {
        self.dim
    }

    #[inline]
    pub fn len(&self) -> usize {
        if self.dim == 0 {
            0
        } else {
            self.data.len() / self.dim
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Stored rows in insertion order
    pub fn rows(&self) -> impl Iterator<Item = &[f32]> {
        self.data.chunks_exact(self.dim.max(1))
    }

    /// The `k` nearest positions with their squared L2 distances, closest first.
    /// Ties resolve to the lower position. Unfilled slots hold `(SENTINEL, f32::MAX)`.
    pub fn search(&self, query: &Vector, k: usize) -> Result<Vec<(i64, f32)>> {
        if query.dim() != self.dim {
            return Err(Error::InvalidDimension {
                expected: self.dim,
                actual: query.dim(),
            });
        }

        let mut scored: Vec<(i64, f32)> = self
            .rows()
            .enumerate()
            .map(|(pos, row)| (pos as i64, crate::vector::squared_l2(query.as_slice(), row)))
            .collect();

        scored.sort_unstable_by_key(|&(pos, dist)| (OrderedFloat(dist), pos));
        scored.truncate(k);
        scored.resize(k, (SENTINEL, f32::MAX));
        Ok(scored)
    }
}

/// Flat index plus the identifier of the poem stored at each position.
#[derive(Debug, Clone)]
pub struct PoemIndex {
    index: FlatL2Index,
    ids: Vec<PoemId>,
}

impl PoemIndex {
    /// Pair an index with its identifier list; both must describe the same positions.
    pub fn new(index: FlatL2Index, ids: Vec<PoemId>) -> Result<Self> {
        if index.len() != ids.len() {
            return Err(Error::InvalidConfig(format!(
                "index holds {} vectors but {} poem ids were supplied",
                index.len(),
                ids.len()
            )));
        }
        Ok(Self { index, ids })
    }

    pub fn from_entries<I>(dim: usize, entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (PoemId, Vector)>,
    {
        let mut index = FlatL2Index::new(dim);
        let mut ids = Vec::new();
        for (id, vector) in entries {
            index.add(vector.as_slice())?;
            ids.push(id);
        }
        Self::new(index, ids)
    }

    #[inline]
    pub fn dim(&self) -> usize {
        self.index.dim()
    }

    #[inline]
    pub fn ids(&self) -> &[PoemId] {
        &self.ids
    }

    #[inline]
    pub fn raw(&self) -> &FlatL2Index {
        &self.index
    }

    /// Resolve raw positions to identifiers, dropping sentinels.
    pub fn resolve(&self, positions: &[(i64, f32)]) -> Vec<PoemId> {
        positions
            .iter()
            .filter_map(|&(pos, _)| {
                let pos = usize::try_from(pos).ok()?;
                self.ids.get(pos).cloned()
            })
            .collect()
    }
}

impl NearestNeighbors for PoemIndex {
    fn nearest(&self, query: &Vector, k: usize) -> Result<Vec<PoemId>> {
        let positions = self.index.search(query, k)?;
        Ok(self.resolve(&positions))
    }

    fn len(&self) -> usize {
        self.ids.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index_of(rows: &[[f32; 2]]) -> FlatL2Index {
        FlatL2Index::from_rows(2, rows.iter().map(|r| r.to_vec())).unwrap()
    }

    #[test]
    fn test_search_orders_by_distance() {
        let index = index_of(&[[10.0, 10.0], [0.0, 0.0], [1.0, 1.0]]);
        let hits = index.search(&Vector::new(vec![0.1, 0.1]), 3).unwrap();
        let positions: Vec<i64> = hits.iter().map(|h| h.0).collect();
        assert_eq!(positions, vec![1, 2, 0]);
        assert!(hits[0].1 <= hits[1].1 && hits[1].1 <= hits[2].1);
    }

    #[test]
    fn test_search_pads_with_sentinel() {
        let index = index_of(&[[0.0, 0.0], [1.0, 1.0]]);
        let hits = index.search(&Vector::new(vec![0.0, 0.0]), 5).unwrap();
        assert_eq!(hits.len(), 5);
        assert_eq!(hits[2].0, SENTINEL);
        assert_eq!(hits[4].0, SENTINEL);
    }

    #[test]
    fn test_search_rejects_wrong_dimension() {
        let index = index_of(&[[0.0, 0.0]]);
        let err = index.search(&Vector::new(vec![0.0, 0.0, 0.0]), 1).unwrap_err();
        assert!(matches!(err, Error::InvalidDimension { expected: 2, actual: 3 }));
    }

    #[test]
    fn test_poem_index_requires_parallel_ids() {
        let err = PoemIndex::new(index_of(&[[0.0, 0.0], [1.0, 1.0]]), vec![PoemId::from("a")])
            .unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));
    }

    #[test]
    fn test_nearest_skips_sentinels() {
        let index = PoemIndex::new(
            index_of(&[[0.0, 0.0], [3.0, 3.0]]),
            vec![PoemId::from("near"), PoemId::from("far")],
        )
        .unwrap();
        let ids = index.nearest(&Vector::new(vec![0.0, 0.0]), 10).unwrap();
        assert_eq!(ids, vec![PoemId::from("near"), PoemId::from("far")]);
    }

    #[test]
    fn test_resolve_ignores_out_of_range_positions() {
        let index = PoemIndex::new(index_of(&[[0.0, 0.0]]), vec![PoemId::from("only")]).unwrap();
        let ids = index.resolve(&[(0, 0.0), (-1, f32::MAX), (7, 1.0)]);
        assert_eq!(ids, vec![PoemId::from("only")]);
    }
}
