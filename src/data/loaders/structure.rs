// structure.rs - Structure-format genotype file reader

use std::fs::File;
use std::io::{BufRead, BufReader, Lines};
use std::path::{Path, PathBuf};

use crate::data::source::{GenotypeRow, GenotypeSource, SourceMix};
use crate::data::Sample;
use crate::error::DatasetError;

/// Fixed leading columns: identifier, population label, known/unknown flag.
const FIXED_COLS: usize = 3;

/// Missing-genotype sentinel in raw Structure rows.
const RAW_MISSING: &str = "-9";

/// Sentinel emitted for missing alleles after nucleotide decoding.
pub const SNP_MISSING: &str = "N";

/// Decode table for SNP-mode integer allele codes.
const DNA: [&str; 4] = ["A", "T", "G", "C"];

/// Structure-formatted file reader.
///
/// Rows are whitespace-delimited: identifier, population label, known flag
/// (`"1"` for known/reference), `n_optional_cols` ignored columns, then one
/// allele code per marker. Diploid genotypes occupy two consecutive rows
/// whose marker columns are concatenated (first row, then second).
#[derive(Debug, Clone)]
pub struct StructureParser {
    diploid: bool,
    n_optional_cols: usize,
    is_str: bool,
}

impl StructureParser {
    /// Fails before any parsing if `n_optional_cols` is negative.
    pub fn new(diploid: bool, n_optional_cols: i64, is_str: bool) -> Result<Self, DatasetError> {
        if n_optional_cols < 0 {
            return Err(DatasetError::NegativeOptionalColumns(n_optional_cols));
        }
        Ok(Self {
            diploid,
            n_optional_cols: n_optional_cols as usize,
            is_str,
        })
    }

    /// Marker codes of one physical row. Microsatellite codes pass through
    /// unchanged; SNP codes are decoded to nucleotide letters with `-9`
    /// normalized to the missing sentinel.
    fn decode(&self, identifier: &str, codes: &[String]) -> Result<Vec<String>, DatasetError> {
        if self.is_str {
            return Ok(codes.to_vec());
        }
        codes
            .iter()
            .map(|code| {
                if code == RAW_MISSING {
                    return Ok(SNP_MISSING.to_string());
                }
                code.parse::<usize>()
                    .ok()
                    .and_then(|i| DNA.get(i))
                    .map(|base| base.to_string())
                    .ok_or_else(|| DatasetError::InvalidAlleleCode {
                        identifier: identifier.to_string(),
                        code: code.clone(),
                    })
            })
            .collect()
    }
}

impl GenotypeSource for StructureParser {
    fn diploid(&self) -> bool {
        self.diploid
    }

    fn is_str(&self) -> bool {
        self.is_str
    }

    fn stream<'a>(
        &'a self,
        path: &Path,
        mix: Option<&'a SourceMix>,
    ) -> Result<Box<dyn Iterator<Item = Result<GenotypeRow, DatasetError>> + 'a>, DatasetError>
    {
        let file = File::open(path)?;
        Ok(Box::new(StructureRows {
            parser: self,
            path: path.to_path_buf(),
            lines: BufReader::new(file).lines(),
            mix,
            position: 0,
            row: 0,
            failed: false,
        }))
    }
}

/// Lazy iterator over one Structure file.
///
/// Forward-only: after a loading error the iterator is fused, and reading
/// the file again requires a new `stream` call.
struct StructureRows<'a> {
    parser: &'a StructureParser,
    path: PathBuf,
    lines: Lines<BufReader<File>>,
    mix: Option<&'a SourceMix>,
    /// Individual counter within this source (counts row-pairs when diploid).
    position: usize,
    /// Physical row counter, for error reporting.
    row: usize,
    failed: bool,
}

impl StructureRows<'_> {
    /// Next non-blank physical row, split on whitespace.
    fn next_fields(&mut self) -> Option<Result<Vec<String>, DatasetError>> {
        loop {
            let line = match self.lines.next()? {
                Ok(line) => line,
                Err(e) => return Some(Err(e.into())),
            };
            self.row += 1;
            let fields: Vec<String> = line.split_whitespace().map(str::to_string).collect();
            if !fields.is_empty() {
                return Some(Ok(fields));
            }
        }
    }

    fn parse_individual(&mut self, fields_a: Vec<String>) -> Result<GenotypeRow, DatasetError> {
        let prefix = FIXED_COLS + self.parser.n_optional_cols;
        if fields_a.len() < prefix {
            return Err(DatasetError::ShortRow {
                path: self.path.clone(),
                row: self.row,
                expected: prefix,
                found: fields_a.len(),
            });
        }
        let identifier = fields_a[0].clone();

        let fields_b = if self.parser.diploid {
            match self.next_fields() {
                Some(Ok(fields)) => fields,
                Some(Err(e)) => return Err(e),
                // EOF mid-pair leaves the genotype inconsistent, same failure
                None => return Err(DatasetError::DiploidPairMismatch { identifier }),
            }
        } else {
            Vec::new()
        };
        if self.parser.diploid && fields_b.len() != fields_a.len() {
            return Err(DatasetError::DiploidPairMismatch { identifier });
        }

        let population = Some(fields_a[1].clone());
        let known = fields_a[2] == "1";

        let mut genotype = self.parser.decode(&identifier, &fields_a[prefix..])?;
        let num_loci = genotype.len();
        if self.parser.diploid {
            genotype.extend(self.parser.decode(&identifier, &fields_b[prefix..])?);
        }

        Ok((Sample::new(identifier, num_loci, population, known), genotype))
    }
}

impl Iterator for StructureRows<'_> {
    type Item = Result<GenotypeRow, DatasetError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        loop {
            let fields = match self.next_fields()? {
                Ok(fields) => fields,
                Err(e) => {
                    self.failed = true;
                    return Some(Err(e));
                }
            };
            let admitted = self.mix.map_or(true, |m| m.admits(self.position));
            self.position += 1;
            match self.parse_individual(fields) {
                Ok(row) => {
                    if admitted {
                        return Some(Ok(row));
                    }
                }
                Err(e) => {
                    self.failed = true;
                    return Some(Err(e));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_source(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    fn collect(
        parser: &StructureParser,
        path: &Path,
        mix: Option<&SourceMix>,
    ) -> Vec<GenotypeRow> {
        parser
            .stream(path, mix)
            .unwrap()
            .collect::<Result<Vec<_>, _>>()
            .unwrap()
    }

    #[test]
    fn test_haploid_microsatellite_rows() {
        let file = write_source("S1 pop1 1 120 135 -9\nS2 pop2 0 118 000 142\n");
        let parser = StructureParser::new(false, 0, true).unwrap();
        let rows = collect(&parser, file.path(), None);

        assert_eq!(rows.len(), 2);
        let (sample, genotype) = &rows[0];
        assert_eq!(sample.identifier(), "S1");
        assert_eq!(sample.population(), Some("pop1"));
        assert!(sample.flag());
        assert_eq!(sample.num_loci(), 3);
        assert_eq!(genotype, &["120", "135", "-9"]);

        let (sample, genotype) = &rows[1];
        assert!(!sample.flag());
        // microsatellite codes pass through, sentinels included
        assert_eq!(genotype, &["118", "000", "142"]);
    }

    #[test]
    fn test_diploid_rows_are_concatenated() {
        let file = write_source("S1 pop1 1 120 135\nS1 pop1 1 122 135\n");
        let parser = StructureParser::new(true, 0, true).unwrap();
        let rows = collect(&parser, file.path(), None);

        assert_eq!(rows.len(), 1);
        let (sample, genotype) = &rows[0];
        assert_eq!(sample.num_loci(), 2);
        assert_eq!(genotype, &["120", "135", "122", "135"]);
    }

    #[test]
    fn test_optional_columns_are_skipped() {
        let file = write_source("S1 pop1 1 skipA skipB 120 135\n");
        let parser = StructureParser::new(false, 2, true).unwrap();
        let rows = collect(&parser, file.path(), None);
        assert_eq!(rows[0].1, vec!["120", "135"]);
    }

    #[test]
    fn test_snp_mode_decodes_nucleotides() {
        let file = write_source("S1 pop1 1 0 1 2 3 -9\n");
        let parser = StructureParser::new(false, 0, false).unwrap();
        let rows = collect(&parser, file.path(), None);
        assert_eq!(rows[0].1, vec!["A", "T", "G", "C", "N"]);
    }

    #[test]
    fn test_snp_mode_rejects_unknown_codes() {
        let file = write_source("S1 pop1 1 0 7\n");
        let parser = StructureParser::new(false, 0, false).unwrap();
        let err = parser
            .stream(file.path(), None)
            .unwrap()
            .next()
            .unwrap()
            .unwrap_err();
        match err {
            DatasetError::InvalidAlleleCode { identifier, code } => {
                assert_eq!(identifier, "S1");
                assert_eq!(code, "7");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_diploid_pair_mismatch_names_the_sample() {
        let file = write_source("S1 pop1 1 120 135\nS1 pop1 1 122\n");
        let parser = StructureParser::new(true, 0, true).unwrap();
        let err = parser
            .stream(file.path(), None)
            .unwrap()
            .next()
            .unwrap()
            .unwrap_err();
        match err {
            DatasetError::DiploidPairMismatch { identifier } => assert_eq!(identifier, "S1"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_diploid_truncated_pair_at_eof() {
        let file = write_source("S1 pop1 1 120 135\n");
        let parser = StructureParser::new(true, 0, true).unwrap();
        let err = parser
            .stream(file.path(), None)
            .unwrap()
            .next()
            .unwrap()
            .unwrap_err();
        assert!(matches!(err, DatasetError::DiploidPairMismatch { .. }));
    }

    #[test]
    fn test_short_row_is_rejected() {
        let file = write_source("S1 pop1\n");
        let parser = StructureParser::new(false, 0, true).unwrap();
        let err = parser
            .stream(file.path(), None)
            .unwrap()
            .next()
            .unwrap()
            .unwrap_err();
        assert!(matches!(err, DatasetError::ShortRow { .. }));
    }

    #[test]
    fn test_negative_optional_columns_fail_at_construction() {
        let err = StructureParser::new(true, -1, false).unwrap_err();
        assert!(matches!(err, DatasetError::NegativeOptionalColumns(-1)));
    }

    #[test]
    fn test_partial_rows_filter_skips_deduplicated_individuals() {
        let file = write_source("S1 p 1 10\nS2 p 1 11\nS3 p 1 12\n");
        let parser = StructureParser::new(false, 0, true).unwrap();
        let mix = SourceMix::PartialRows([0, 2].into_iter().collect());
        let rows = collect(&parser, file.path(), Some(&mix));
        let ids: Vec<_> = rows.iter().map(|(s, _)| s.identifier().to_string()).collect();
        assert_eq!(ids, vec!["S1", "S3"]);
    }

    #[test]
    fn test_blank_lines_are_ignored() {
        let file = write_source("S1 p 1 10\n\nS2 p 1 11\n");
        let parser = StructureParser::new(false, 0, true).unwrap();
        let rows = collect(&parser, file.path(), None);
        assert_eq!(rows.len(), 2);
    }

    #[test]
    fn test_iterator_is_fused_after_error() {
        let file = write_source("S1 pop1 1 0 7\nS2 pop1 1 0 1\n");
        let parser = StructureParser::new(false, 0, false).unwrap();
        let mut rows = parser.stream(file.path(), None).unwrap();
        assert!(rows.next().unwrap().is_err());
        assert!(rows.next().is_none());
    }
}
