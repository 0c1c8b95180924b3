// config.rs - Configuration file support

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    // Input/Output
    pub input: Option<String>,
    pub merge: Option<Vec<String>>,
    pub output: Option<String>,
    pub format: Option<String>,

    // Dataset shape
    pub haploid: Option<bool>,
    pub microsatellite: Option<bool>,
    pub optional_cols: Option<i64>,

    // Performance
    pub threads: Option<usize>,

    // Output filtering
    pub include_samples: Option<String>,
    pub exclude_samples: Option<String>,

    // Flags
    pub dry_run: Option<bool>,
}

impl Config {
    /// Create a new empty configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file '{}': {}", path.display(), e))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| format!("Failed to parse config file '{}': {}", path.display(), e))?;

        println!("📄 Loaded configuration from: {}", path.display());
        Ok(config)
    }

    /// Save configuration to TOML file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), String> {
        let path = path.as_ref();
        let content = toml::to_string_pretty(self)
            .map_err(|e| format!("Failed to serialize config: {}", e))?;

        fs::write(path, content)
            .map_err(|e| format!("Failed to write config file '{}': {}", path.display(), e))?;

        println!("📄 Saved configuration to: {}", path.display());
        Ok(())
    }

    /// Generate a sample configuration file with comments
    pub fn generate_sample() -> String {
        r#"# popdist.toml - Configuration file for popdist
# Command line arguments will override these settings

# =============================================================================
# INPUT/OUTPUT
# =============================================================================

# Path to the primary Structure-formatted genotype file
input = "/path/to/samples.str"

# Extra Structure-formatted files merged into the primary dataset
# merge = ["/path/to/extra_a.str", "/path/to/extra_b.str"]

# Output distance matrix file
output = "distances.tsv"

# Output format: tsv, csv, phylip, nexus
format = "tsv"

# =============================================================================
# DATASET SHAPE
# =============================================================================

# Haploid sources use one row per individual (default: diploid row pairs)
haploid = false

# Microsatellite codes are kept as-is; otherwise integer codes are decoded
# to nucleotide letters
microsatellite = false

# Number of ignored columns after the known/unknown flag column
optional_cols = 0

# =============================================================================
# PERFORMANCE
# =============================================================================

# Number of threads (omit for auto-detection)
# threads = 8

# =============================================================================
# OUTPUT FILTERING
# =============================================================================

# Include only samples matching regex pattern in the output matrix
# include_samples = "pattern.*"

# Exclude samples matching regex pattern from the output matrix
# exclude_samples = "control.*"

# =============================================================================
# FLAGS
# =============================================================================

# Validate and load inputs without computing distances
dry_run = false
"#
        .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_config_parses() {
        let config: Config = toml::from_str(&Config::generate_sample()).unwrap();
        assert_eq!(config.input.as_deref(), Some("/path/to/samples.str"));
        assert_eq!(config.format.as_deref(), Some("tsv"));
        assert_eq!(config.haploid, Some(false));
        assert_eq!(config.optional_cols, Some(0));
        assert!(config.merge.is_none());
    }

    #[test]
    fn test_partial_config_leaves_rest_unset() {
        let config: Config = toml::from_str("output = \"d.tsv\"\n").unwrap();
        assert_eq!(config.output.as_deref(), Some("d.tsv"));
        assert!(config.input.is_none());
        assert!(config.threads.is_none());
    }
}
