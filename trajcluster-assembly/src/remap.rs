//! Input hit to output hit bookkeeping.

use std::fmt;

/// Why a claim was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClaimError {
    /// Index outside the input hit collection.
    OutOfRange { index: usize, len: usize },
    /// Input hit already consumed by output hit `owner`.
    AlreadyClaimed { index: usize, owner: usize },
}

impl fmt::Display for ClaimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfRange { index, len } => {
                write!(f, "input hit {index} outside collection of size {len}")
            }
            Self::AlreadyClaimed { index, owner } => {
                write!(f, "input hit {index} already claimed by output hit {owner}")
            }
        }
    }
}

/// Maps each input hit to the output hit that consumed it.
///
/// Entries are written once. A second claim on the same input hit is
/// refused rather than overwritten.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemapTable {
    entries: Vec<Option<usize>>,
}

impl RemapTable {
    /// Creates a table with every one of `len` input hits unclaimed.
    #[must_use]
    pub fn new(len: usize) -> Self {
        Self {
            entries: vec![None; len],
        }
    }

    /// Number of input hits tracked.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no input hits are tracked.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Output hit owning input hit `index`, if claimed.
    #[inline]
    #[must_use]
    pub fn owner(&self, index: usize) -> Option<usize> {
        self.entries.get(index).copied().flatten()
    }

    /// Checks that input hit `index` exists and is unclaimed.
    ///
    /// # Errors
    /// Returns the reason the hit cannot be claimed.
    pub fn check(&self, index: usize) -> Result<(), ClaimError> {
        match self.entries.get(index) {
            None => Err(ClaimError::OutOfRange {
                index,
                len: self.entries.len(),
            }),
            Some(Some(owner)) => Err(ClaimError::AlreadyClaimed {
                index,
                owner: *owner,
            }),
            Some(None) => Ok(()),
        }
    }

    /// Records that output hit `output` consumed input hit `index`.
    ///
    /// # Errors
    /// Returns the reason the hit cannot be claimed; the table is unchanged.
    pub fn claim(&mut self, index: usize, output: usize) -> Result<(), ClaimError> {
        self.check(index)?;
        self.entries[index] = Some(output);
        Ok(())
    }

    /// Input hits not yet claimed, in index order.
    pub fn unclaimed(&self) -> impl Iterator<Item = usize> + '_ {
        self.entries
            .iter()
            .enumerate()
            .filter_map(|(index, owner)| owner.is_none().then_some(index))
    }

    /// Number of claimed input hits.
    #[must_use]
    pub fn claimed_count(&self) -> usize {
        self.entries.iter().filter(|owner| owner.is_some()).count()
    }
}
