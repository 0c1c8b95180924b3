// source.rs - Genotype source capability and per-source merge bookkeeping

use std::collections::HashSet;
use std::path::Path;

use crate::data::Sample;
use crate::error::DatasetError;

/// One parsed individual: identity plus its flattened allele sequence.
pub type GenotypeRow = (Sample, Vec<String>);

/// Per-source record of how a merged file's rows relate to the dataset.
///
/// Recorded once per source at load/merge time and consumed as a
/// row-admission filter whenever the source is re-streamed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceMix {
    /// Every individual of the source was newly admitted; payload is the count.
    FullyNew(usize),
    /// Only the listed original positions were admitted; the rest were
    /// deduplicated against identifiers already present at merge time.
    PartialRows(HashSet<usize>),
}

impl SourceMix {
    /// Whether the individual at `position` (original order within its own
    /// source file) should be yielded when the source is re-streamed.
    pub fn admits(&self, position: usize) -> bool {
        match self {
            SourceMix::FullyNew(_) => true,
            SourceMix::PartialRows(positions) => positions.contains(&position),
        }
    }
}

/// Capability to stream genotype rows out of one source file.
///
/// A dataset drives this once per source (primary plus every merged-in file),
/// passing that source's row-admission filter. Implementations yield
/// individuals lazily and in file order; the sequence is forward-only, so
/// reading a file again requires a new `stream` call.
pub trait GenotypeSource {
    /// Diploid sources pair two physical rows per individual.
    fn diploid(&self) -> bool;

    /// Microsatellite data passes allele codes through unchanged.
    fn is_str(&self) -> bool;

    /// Open `path` and yield the `(Sample, allele sequence)` pairs admitted
    /// by `mix`. `None` admits every individual.
    fn stream<'a>(
        &'a self,
        path: &Path,
        mix: Option<&'a SourceMix>,
    ) -> Result<Box<dyn Iterator<Item = Result<GenotypeRow, DatasetError>> + 'a>, DatasetError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fully_new_admits_everything() {
        let mix = SourceMix::FullyNew(3);
        assert!(mix.admits(0));
        assert!(mix.admits(2));
        assert!(mix.admits(100));
    }

    #[test]
    fn test_partial_rows_admits_listed_positions_only() {
        let mix = SourceMix::PartialRows([1, 3].into_iter().collect());
        assert!(!mix.admits(0));
        assert!(mix.admits(1));
        assert!(!mix.admits(2));
        assert!(mix.admits(3));
    }
}
