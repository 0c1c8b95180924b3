// merge.rs - Merge configuration file with CLI arguments

use crate::cli::{Args, Config};

impl Args {
    /// Merge with configuration from file
    /// CLI arguments take precedence over config file values
    pub fn merge_with_config(mut self, config: Config) -> Self {
        // Input/Output
        if self.input.is_none() {
            self.input = config.input;
        }
        if self.merge.is_empty() {
            if let Some(merge) = config.merge {
                self.merge = merge;
            }
        }
        if self.output.is_none() {
            self.output = config.output;
        }

        // Dataset shape (only override defaults, not explicit CLI values)
        if self.format == "tsv" && config.format.is_some() {
            self.format = config.format.unwrap();
        }
        if self.optional_cols == 0 && config.optional_cols.is_some() {
            self.optional_cols = config.optional_cols.unwrap();
        }

        // Performance
        if self.threads.is_none() {
            self.threads = config.threads;
        }

        // Output filtering
        if self.include_samples.is_none() {
            self.include_samples = config.include_samples;
        }
        if self.exclude_samples.is_none() {
            self.exclude_samples = config.exclude_samples;
        }

        // Flags (CLI flags take precedence, config only sets if not explicitly set)
        if !self.haploid && config.haploid.unwrap_or(false) {
            self.haploid = true;
        }
        if !self.microsatellite && config.microsatellite.unwrap_or(false) {
            self.microsatellite = true;
        }
        if !self.dry_run && config.dry_run.unwrap_or(false) {
            self.dry_run = true;
        }

        self
    }

    /// Load configuration and merge with CLI args
    pub fn with_config_file(self, config_path: &str) -> Result<Self, String> {
        let config = Config::from_file(config_path)?;
        Ok(self.merge_with_config(config))
    }
}
