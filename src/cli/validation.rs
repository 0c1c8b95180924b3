// validation.rs - Input validation utilities

use regex::Regex;

use crate::cli::args::Args;

#[derive(Debug)]
pub struct ValidationResult {
    pub sample_include_regex: Option<Regex>,
    pub sample_exclude_regex: Option<Regex>,
}

/// Validate all command line arguments
pub fn validate_args(args: &Args) -> Result<ValidationResult, String> {
    // Validate output format
    match args.format.to_lowercase().as_str() {
        "tsv" | "csv" | "phylip" | "nexus" => {}
        other => {
            return Err(format!(
                "Unsupported output format: {}. Use: tsv, csv, phylip, nexus",
                other
            ))
        }
    }

    if args.optional_cols < 0 {
        return Err(format!(
            "--optional-cols must be greater than or equal to zero (got {})",
            args.optional_cols
        ));
    }

    // Compile regex patterns
    let sample_include_regex = if let Some(pattern) = &args.include_samples {
        Some(Regex::new(pattern).map_err(|e| format!("Invalid include_samples regex: {}", e))?)
    } else {
        None
    };

    let sample_exclude_regex = if let Some(pattern) = &args.exclude_samples {
        Some(Regex::new(pattern).map_err(|e| format!("Invalid exclude_samples regex: {}", e))?)
    } else {
        None
    };

    Ok(ValidationResult {
        sample_include_regex,
        sample_exclude_regex,
    })
}
