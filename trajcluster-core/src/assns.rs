//! Association tables between output collections.

use crate::error::{Error, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// One link: an index into the left collection, an index into the right
/// collection, and optional per-link data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AssnPair<D = ()> {
    /// Index into the left collection.
    pub left: usize,
    /// Index into the right collection.
    pub right: usize,
    /// Link data.
    pub data: D,
}

/// An ordered table of links between two collections.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Assns<D = ()> {
    pairs: Vec<AssnPair<D>>,
}

impl<D> Default for Assns<D> {
    fn default() -> Self {
        Self { pairs: Vec::new() }
    }
}

impl<D> Assns<D> {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a link after checking both ends against their collection sizes.
    ///
    /// # Errors
    /// Returns [`Error::Association`] if either index is outside its collection.
    pub fn link(
        &mut self,
        what: &'static str,
        (left, left_len): (usize, usize),
        (right, right_len): (usize, usize),
        data: D,
    ) -> Result<()> {
        if left >= left_len || right >= right_len {
            return Err(Error::Association { what, left, right });
        }
        self.pairs.push(AssnPair { left, right, data });
        Ok(())
    }

    /// Returns the number of links.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Returns true if there are no links.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Returns an iterator over the links in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &AssnPair<D>> {
        self.pairs.iter()
    }

    /// Right-hand indices linked to `left`, in insertion order.
    pub fn rights_of(&self, left: usize) -> impl Iterator<Item = usize> + '_ {
        self.pairs
            .iter()
            .filter(move |pair| pair.left == left)
            .map(|pair| pair.right)
    }

    /// Left-hand indices linked to `right`, in insertion order.
    pub fn lefts_of(&self, right: usize) -> impl Iterator<Item = usize> + '_ {
        self.pairs
            .iter()
            .filter(move |pair| pair.right == right)
            .map(|pair| pair.left)
    }
}
