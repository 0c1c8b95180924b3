// error.rs - Typed error kinds for loading, configuration and merging

use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced by parser construction, dataset loading and merging.
///
/// Three families: loading failures (malformed or inconsistent genotype
/// rows), configuration failures (rejected before any parsing) and
/// compatibility failures (merge preconditions). All of them abort the
/// enclosing operation; none are retried internally.
#[derive(Debug, Error)]
pub enum DatasetError {
    /// The two physical rows of a diploid individual carry different column counts.
    #[error("diploid loci count mismatch for sample {identifier}")]
    DiploidPairMismatch { identifier: String },

    /// A sample's marker count disagrees with the count established by the
    /// first sample of the dataset.
    #[error("mismatch in the number of loci: sample {identifier} has {found}, dataset has {expected}")]
    LociCountMismatch {
        identifier: String,
        expected: usize,
        found: usize,
    },

    /// Row too short to carry the identifier, population, flag and skipped columns.
    #[error("{}: row {row} has {found} columns, expected at least {expected}", path.display())]
    ShortRow {
        path: PathBuf,
        row: usize,
        expected: usize,
        found: usize,
    },

    /// Unrecognized allele code while decoding SNP genotypes.
    #[error("invalid allele code '{code}' for sample {identifier}")]
    InvalidAlleleCode { identifier: String, code: String },

    /// The number of ignored leading columns cannot be negative.
    #[error("number of optional columns must be greater than or equal to zero (got {0})")]
    NegativeOptionalColumns(i64),

    /// Merge precondition violated: ploidy, marker type and locus count must
    /// all match the primary dataset.
    #[error("original dataset and appendix must have the same properties (source: {origin})")]
    IncompatibleSource { origin: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
