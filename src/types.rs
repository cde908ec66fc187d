use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::solver::SolveError;

/// Distinct pack sizes, sorted ascending.
///
/// Arrangements and solver grid rows are indexed by position in this list.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PackSizes(Vec<u32>);

impl PackSizes {
    /// Sorts and deduplicates `sizes`. Fails on an empty set or a zero size.
    pub fn new(sizes: impl IntoIterator<Item = u32>) -> Result<Self, SolveError> {
        let mut sizes: Vec<u32> = sizes.into_iter().collect();
        if sizes.is_empty() {
            return Err(SolveError::NoPackSizes);
        }
        if sizes.contains(&0) {
            return Err(SolveError::ZeroPackSize);
        }
        sizes.sort_unstable();
        sizes.dedup();
        Ok(Self(sizes))
    }

    pub fn as_slice(&self) -> &[u32] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn smallest(&self) -> u32 {
        self.0[0]
    }

    pub fn position(&self, size: u32) -> Option<usize> {
        self.0.binary_search(&size).ok()
    }
}

/// Ranking key for an arrangement: fewer items first, then fewer packs.
///
/// Field order is significant, the derived `Ord` is lexicographic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Score {
    pub items: u64,
    pub packs: u64,
}

impl Score {
    pub const ZERO: Score = Score { items: 0, packs: 0 };

    pub fn single(size: u32) -> Self {
        Self {
            items: size as u64,
            packs: 1,
        }
    }

    /// Score after adding one more pack of `size`.
    pub fn with_pack(self, size: u32) -> Self {
        Self {
            items: self.items + size as u64,
            packs: self.packs + 1,
        }
    }
}

/// Count of each pack size used for one order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackArrangement {
    sizes: PackSizes,
    counts: Vec<u32>,
}

impl PackArrangement {
    /// Arrangement using no packs at all.
    pub fn empty(sizes: PackSizes) -> Self {
        let counts = vec![0; sizes.len()];
        Self { sizes, counts }
    }

    /// Builds an arrangement from counts aligned with `sizes`.
    ///
    /// # Panics
    ///
    /// Panics if `counts.len()` differs from `sizes.len()`.
    pub(crate) fn from_counts(sizes: PackSizes, counts: Vec<u32>) -> Self {
        assert_eq!(
            sizes.len(),
            counts.len(),
            "one count per pack size is required"
        );
        Self { sizes, counts }
    }

    /// Number of packs of `size` used. Unknown sizes count as zero.
    pub fn count(&self, size: u32) -> u32 {
        self.sizes
            .position(size)
            .map_or(0, |idx| self.counts[idx])
    }

    pub fn add_pack(&mut self, size: u32) -> bool {
        match self.sizes.position(size) {
            Some(idx) => {
                self.counts[idx] += 1;
                true
            }
            None => false,
        }
    }

    /// `(size, count)` pairs for every size actually used, ascending by size.
    pub fn packs(&self) -> impl DoubleEndedIterator<Item = (u32, u32)> + '_ {
        self.sizes
            .as_slice()
            .iter()
            .copied()
            .zip(self.counts.iter().copied())
            .filter(|&(_, count)| count > 0)
    }

    pub fn total_items(&self) -> u64 {
        self.packs()
            .map(|(size, count)| size as u64 * count as u64)
            .sum()
    }

    pub fn total_packs(&self) -> u64 {
        self.counts.iter().map(|&c| c as u64).sum()
    }

    pub fn score(&self) -> Score {
        Score {
            items: self.total_items(),
            packs: self.total_packs(),
        }
    }
}

impl std::fmt::Display for PackArrangement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{{")?;
        for (i, (size, count)) in self.packs().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{size}:{count}")?;
        }
        write!(f, "}}")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: Uuid,
    pub quantity: u32,
}

/// Pack breakdown computed for an order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderPacks {
    pub order_id: Uuid,
    pub quantity: u32,
    pub arrangement: PackArrangement,
}
