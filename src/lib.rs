// lib.rs - popdist library root

//! # popdist - Pairwise genetic distance calculator for Structure-formatted genotype data
//!
//! This library loads population-genetics genotype files in the fixed-column
//! Structure row format, assembles them into in-memory datasets, merges
//! multiple datasets with identifier-aware deduplication and index remapping,
//! and computes pairwise genetic distances with missing-data exclusion.
//!
//! ## Features
//!
//! - **Structure format**: diploid row-pairs or haploid rows, optional ignored
//!   columns, microsatellite pass-through or SNP nucleotide decoding
//! - **Dataset merging**: identifier deduplication with per-source index maps
//!   and row filters that keep re-parsing consistent after a merge
//! - **Parallel distances**: rayon-backed symmetric distance matrix with
//!   pairwise missing-data exclusion
//! - **Multiple formats**: TSV, CSV, PHYLIP, NEXUS output
//!
//! ## Basic Usage
//!
//! ```rust,no_run
//! use popdist::prelude::*;
//!
//! // Diploid SNP data, no optional columns
//! let mut dataset = Dataset::structure("samples.str", true, 0, false)?;
//! dataset.load()?;
//!
//! let mut extra = Dataset::structure("extra.str", true, 0, false)?;
//! extra.load()?;
//!
//! let (original_count, index_maps) = dataset.concatenate(vec![extra])?;
//! let distances = dataset.distances()?;
//! # let _ = (original_count, index_maps, distances);
//! # Ok::<(), popdist::error::DatasetError>(())
//! ```

// Re-export all main modules
pub mod cli;
pub mod core;
pub mod data;
pub mod error;
pub mod output;

// Convenience prelude for common imports
pub mod prelude {
    pub use crate::cli::{validate_args, Args, ValidationResult};
    pub use crate::core::{pair_distance, pairwise_distances, MICROSATELLITE_MISSING};
    pub use crate::data::loaders::{StructureParser, SNP_MISSING};
    pub use crate::data::{Dataset, GenotypeRow, GenotypeSource, Sample, SourceMix};
    pub use crate::error::DatasetError;
    pub use crate::output::{select_samples, write_matrix};
}

// Re-export main types at the root level for convenience
pub use data::{Dataset, Sample, SourceMix};
pub use error::DatasetError;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get library information
pub fn get_info() -> String {
    format!(
        "popdist v{} - Pairwise genetic distance calculator for Structure-formatted genotype data",
        VERSION
    )
}
