use thiserror::Error;

use crate::types::{PackArrangement, PackSizes, Score};

/// Rejected solver input. Raised before any computation happens.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SolveError {
    #[error("order quantity must be greater than zero")]
    ZeroQuantity,

    #[error("no pack sizes configured")]
    NoPackSizes,

    #[error("pack sizes must be greater than zero")]
    ZeroPackSize,

    #[error("order quantity {quantity} is too large to solve in memory")]
    QuantityTooLarge { quantity: u32 },
}

/// Computes the pack arrangement for `quantity` using `pack_sizes`.
///
/// Order and duplicates in `pack_sizes` are ignored.
pub fn solve(quantity: u32, pack_sizes: &[u32]) -> Result<PackArrangement, SolveError> {
    if quantity == 0 {
        return Err(SolveError::ZeroQuantity);
    }
    let sizes = PackSizes::new(pack_sizes.iter().copied())?;
    Solver::new(sizes).solve(quantity)
}

/// Bottom-up solver over shipped-item count.
///
/// Entry `i` of the grid holds the best arrangement that ships at least `i`
/// items, ranked by [`Score`]. Each entry is built from a single pack or from
/// an already finalized smaller entry plus one pack, so the table is filled
/// once in increasing order and never revisited.
pub struct Solver {
    sizes: PackSizes,
}

impl Solver {
    pub fn new(sizes: PackSizes) -> Self {
        Self { sizes }
    }

    pub fn solve(&self, quantity: u32) -> Result<PackArrangement, SolveError> {
        if quantity == 0 {
            return Err(SolveError::ZeroQuantity);
        }
        let mut grid = Grid::new(quantity, self.sizes.len())?;

        for target in 1..=quantity {
            let (best_idx, best_score) = self.best_step(&grid, target);
            grid.push(target, best_idx, self.sizes.as_slice()[best_idx], best_score);
        }

        let counts = grid.row(quantity).to_vec();
        Ok(PackArrangement::from_counts(self.sizes.clone(), counts))
    }

    /// Picks the last pack for `target`: index into the sizes and the
    /// resulting score. Candidates are only adopted when strictly better, so
    /// the first of several equal candidates wins.
    fn best_step(&self, grid: &Grid, target: u32) -> (usize, Score) {
        let mut best: Option<(usize, Score)> = None;

        for (idx, &size) in self.sizes.as_slice().iter().enumerate() {
            let candidate = if target <= size {
                Score::single(size)
            } else {
                grid.score(target - size).with_pack(size)
            };

            if best.is_none_or(|(_, score)| candidate < score) {
                best = Some((idx, candidate));
            }
        }

        // Sizes are never empty, so at least one candidate is recorded.
        best.unwrap_or((0, Score::single(self.sizes.smallest())))
    }
}

/// Flat solution grid: one row of counts per target quantity, aligned with
/// the pack sizes, plus the cached score of each row.
struct Grid {
    width: usize,
    counts: Vec<u32>,
    scores: Vec<Score>,
}

impl Grid {
    fn new(quantity: u32, width: usize) -> Result<Self, SolveError> {
        let rows = quantity as usize;
        let cells = rows
            .checked_mul(width)
            .ok_or(SolveError::QuantityTooLarge { quantity })?;
        let too_large =
            |_: std::collections::TryReserveError| SolveError::QuantityTooLarge { quantity };
        let mut counts = Vec::new();
        counts.try_reserve_exact(cells).map_err(too_large)?;
        let mut scores = Vec::new();
        scores.try_reserve_exact(rows).map_err(too_large)?;
        Ok(Self {
            width,
            counts,
            scores,
        })
    }

    fn row(&self, target: u32) -> &[u32] {
        let start = (target as usize - 1) * self.width;
        &self.counts[start..start + self.width]
    }

    fn score(&self, target: u32) -> Score {
        self.scores[target as usize - 1]
    }

    /// Appends the row for `target`: one pack at `idx`, on top of the row for
    /// `target - size` when that is still a positive quantity.
    fn push(&mut self, target: u32, idx: usize, size: u32, score: Score) {
        debug_assert_eq!(self.scores.len() + 1, target as usize);
        let start = self.counts.len();
        if target > size {
            let base = (target - size - 1) as usize * self.width;
            self.counts.extend_from_within(base..base + self.width);
        } else {
            self.counts.resize(start + self.width, 0);
        }
        self.counts[start + idx] += 1;
        self.scores.push(score);
    }
}
