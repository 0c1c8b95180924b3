// dataset.rs - Ordered sample collection with merge bookkeeping

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::core::distance::{pairwise_distances, MICROSATELLITE_MISSING};
use crate::data::loaders::structure::{StructureParser, SNP_MISSING};
use crate::data::source::{GenotypeSource, SourceMix};
use crate::data::Sample;
use crate::error::DatasetError;

/// In-memory genotype dataset backed by one primary source file plus the
/// extra files folded in by [`Dataset::concatenate`].
///
/// The sample list's insertion order (load order, then merge order) defines
/// the row order of every derived matrix. All samples share the dataset's
/// `num_loci`; `load` enforces the invariant.
pub struct Dataset {
    file_path: PathBuf,
    parser: Box<dyn GenotypeSource>,
    samples: Vec<Sample>,
    num_loci: Option<usize>,
    extra_file_paths: Vec<PathBuf>,
    mix_indices: Vec<SourceMix>,
}

impl Dataset {
    pub fn new(file_path: impl Into<PathBuf>, parser: Box<dyn GenotypeSource>) -> Self {
        Self {
            file_path: file_path.into(),
            parser,
            samples: Vec::new(),
            num_loci: None,
            extra_file_paths: Vec::new(),
            mix_indices: Vec::new(),
        }
    }

    /// Convenience constructor for the Structure row format.
    pub fn structure(
        file_path: impl Into<PathBuf>,
        diploid: bool,
        n_optional_cols: i64,
        is_str: bool,
    ) -> Result<Self, DatasetError> {
        let parser = StructureParser::new(diploid, n_optional_cols, is_str)?;
        Ok(Self::new(file_path, Box::new(parser)))
    }

    /// Drain the primary source into the sample list.
    ///
    /// Any previous samples and merge bookkeeping are discarded, so a
    /// reloaded dataset is indistinguishable from a freshly loaded one.
    /// A load that fails leaves the dataset unchanged, but callers must not
    /// rely on its contents afterwards.
    pub fn load(&mut self) -> Result<(), DatasetError> {
        let mut samples = Vec::new();
        let mut num_loci = None;

        for item in self.parser.stream(&self.file_path, None)? {
            let (sample, _genotype) = item?;
            match num_loci {
                None => num_loci = Some(sample.num_loci()),
                Some(expected) if expected != sample.num_loci() => {
                    return Err(DatasetError::LociCountMismatch {
                        identifier: sample.identifier().to_string(),
                        expected,
                        found: sample.num_loci(),
                    });
                }
                Some(_) => {}
            }
            samples.push(sample);
        }

        self.mix_indices = vec![SourceMix::FullyNew(samples.len())];
        self.extra_file_paths.clear();
        self.samples = samples;
        self.num_loci = num_loci;
        self.statistics();
        Ok(())
    }

    /// Fold other loaded datasets into this one, deduplicating by identifier.
    ///
    /// Compatibility (`diploid`, `is_str`, `num_loci`) is validated for every
    /// source before anything is mutated, so an incompatible source late in
    /// the list cannot leave a half-merged primary. The other datasets are
    /// consumed; their samples are moved, not copied.
    ///
    /// Returns the primary's pre-merge sample count and, per source, the
    /// merged index of each of its rows in original order.
    pub fn concatenate(
        &mut self,
        others: Vec<Dataset>,
    ) -> Result<(usize, Vec<Vec<usize>>), DatasetError> {
        for other in &others {
            if other.diploid() != self.diploid()
                || other.is_str() != self.is_str()
                || other.num_loci != self.num_loci
            {
                return Err(DatasetError::IncompatibleSource {
                    origin: other.file_path.display().to_string(),
                });
            }
        }

        let original_sample_count = self.samples.len();
        let mut sample_no = original_sample_count;
        let mut index_maps = Vec::with_capacity(others.len());

        for other in others {
            let source_size = other.samples.len();
            let mut indices = Vec::with_capacity(source_size);
            let mut admitted = HashSet::new();

            for (position, sample) in other.samples.into_iter().enumerate() {
                // first match against current state, including samples merged
                // earlier in this same call
                let existing = self
                    .samples
                    .iter()
                    .position(|s| s.identifier() == sample.identifier());
                match existing {
                    Some(index) => indices.push(index),
                    None => {
                        indices.push(sample_no);
                        self.samples.push(sample);
                        admitted.insert(position);
                        sample_no += 1;
                    }
                }
            }

            self.mix_indices.push(if admitted.len() == source_size {
                SourceMix::FullyNew(source_size)
            } else {
                SourceMix::PartialRows(admitted)
            });
            self.extra_file_paths.push(other.file_path);
            index_maps.push(indices);
        }

        self.statistics();
        Ok((original_sample_count, index_maps))
    }

    /// Materialize the allele matrix by re-streaming every source in order,
    /// applying each source's row-admission filter. Rows follow the sample
    /// list's order; sources are re-read on every call.
    pub fn allele_matrix(&self) -> Result<Vec<Vec<String>>, DatasetError> {
        let mut rows = Vec::with_capacity(self.samples.len());
        let sources = std::iter::once(&self.file_path).chain(self.extra_file_paths.iter());
        for (i, path) in sources.enumerate() {
            let mix = self.mix_indices.get(i);
            for item in self.parser.stream(path, mix)? {
                let (_sample, genotype) = item?;
                rows.push(genotype);
            }
        }
        Ok(rows)
    }

    /// Symmetric pairwise distance matrix over the current allele matrix,
    /// with mode-appropriate missing sentinels excluded pairwise.
    pub fn distances(&self) -> Result<Vec<Vec<f64>>, DatasetError> {
        let matrix = self.allele_matrix()?;
        let missing: &[&str] = if self.is_str() {
            &MICROSATELLITE_MISSING
        } else {
            &[SNP_MISSING]
        };
        Ok(pairwise_distances(&matrix, missing))
    }

    pub fn num_samples(&self) -> usize {
        self.samples.len()
    }

    pub fn num_loci(&self) -> Option<usize> {
        self.num_loci
    }

    pub fn diploid(&self) -> bool {
        self.parser.diploid()
    }

    pub fn haploid(&self) -> bool {
        !self.diploid()
    }

    pub fn is_str(&self) -> bool {
        self.parser.is_str()
    }

    pub fn file_path(&self) -> &Path {
        &self.file_path
    }

    pub fn extra_file_paths(&self) -> &[PathBuf] {
        &self.extra_file_paths
    }

    pub fn mix_indices(&self) -> &[SourceMix] {
        &self.mix_indices
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn identifiers(&self) -> Vec<&str> {
        self.samples.iter().map(Sample::identifier).collect()
    }

    pub fn populations(&self) -> Vec<Option<&str>> {
        self.samples.iter().map(Sample::population).collect()
    }

    pub fn flags(&self) -> Vec<bool> {
        self.samples.iter().map(Sample::flag).collect()
    }

    /// Reassign the population label of the sample at `index`.
    ///
    /// Panics if `index` is out of bounds.
    pub fn set_sample_population(&mut self, index: usize, population: Option<String>) {
        self.samples[index].set_population(population);
    }

    /// Console summary. Diagnostic only, never part of the data contract.
    pub fn statistics(&self) {
        println!(
            "📊 Loaded {} samples with {} loci.",
            self.num_samples(),
            self.num_loci.unwrap_or(0)
        );
    }
}
