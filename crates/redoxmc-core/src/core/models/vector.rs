use crate::core::error::ValidationError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Largest number of modifiable sites a state space may span.
///
/// The full space holds `2^R` states and every per-state table is dense, so this
/// bounds memory rather than the bit width of the representation.
pub const MAX_SITES: usize = 24;

/// Binary modification pattern over `R` sites; bit `j` set means site `j` is oxidized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ModificationVector {
    mask: u64,
    sites: u8,
}

impl ModificationVector {
    /// The all-reduced vector over `sites` sites.
    pub fn reduced(sites: usize) -> Self {
        debug_assert!(sites <= MAX_SITES);
        Self {
            mask: 0,
            sites: sites as u8,
        }
    }

    /// Builds a vector from a raw bit mask, discarding bits beyond `sites`.
    pub fn from_mask(mask: u64, sites: usize) -> Self {
        debug_assert!(sites <= MAX_SITES);
        Self {
            mask: mask & Self::full_mask(sites),
            sites: sites as u8,
        }
    }

    pub fn from_sites<I>(modified: I, sites: usize) -> Self
    where
        I: IntoIterator<Item = usize>,
    {
        let mask = modified
            .into_iter()
            .filter(|&site| site < sites)
            .fold(0u64, |acc, site| acc | (1 << site));
        Self::from_mask(mask, sites)
    }

    pub fn from_bools(bits: &[bool]) -> Self {
        Self::from_sites(
            bits.iter()
                .enumerate()
                .filter_map(|(site, &on)| on.then_some(site)),
            bits.len(),
        )
    }

    /// Like [`from_bools`](Self::from_bools), but rejects widths above [`MAX_SITES`].
    pub fn try_from_bools(bits: &[bool]) -> Result<Self, ValidationError> {
        if bits.len() > MAX_SITES {
            return Err(ValidationError::SiteCount(bits.len()));
        }
        Ok(Self::from_bools(bits))
    }

    #[inline]
    pub fn mask(&self) -> u64 {
        self.mask
    }

    #[inline]
    pub fn sites(&self) -> usize {
        self.sites as usize
    }

    /// k-grade: the number of oxidized sites.
    #[inline]
    pub fn grade(&self) -> usize {
        self.mask.count_ones() as usize
    }

    #[inline]
    pub fn is_modified(&self, site: usize) -> bool {
        site < self.sites() && self.mask & (1 << site) != 0
    }

    /// Returns a copy with `site` toggled; out-of-range sites leave the vector unchanged.
    pub fn flipped(&self, site: usize) -> Self {
        if site >= self.sites() {
            return *self;
        }
        Self {
            mask: self.mask ^ (1 << site),
            sites: self.sites,
        }
    }

    pub fn hamming_distance(&self, other: &Self) -> usize {
        (self.mask ^ other.mask).count_ones() as usize
    }

    pub fn modified_sites(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.sites()).filter(|&site| self.is_modified(site))
    }

    pub fn unmodified_sites(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.sites()).filter(|&site| !self.is_modified(site))
    }

    pub fn to_bits(&self) -> Vec<u8> {
        (0..self.sites())
            .map(|site| u8::from(self.is_modified(site)))
            .collect()
    }

    fn full_mask(sites: usize) -> u64 {
        if sites >= 64 {
            u64::MAX
        } else {
            (1u64 << sites) - 1
        }
    }
}

impl fmt::Display for ModificationVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for site in 0..self.sites() {
            write!(f, "{}", u8::from(self.is_modified(site)))?;
        }
        write!(f, "]")
    }
}
