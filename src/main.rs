// main.rs - CLI entry point

use std::time::Instant;

use popdist::cli::Config;
use popdist::prelude::*;

fn main() {
    if let Err(e) = run_main() {
        eprintln!("❌ ERROR: {}", e);
        std::process::exit(1);
    }
}

fn run_main() -> Result<(), String> {
    let mut args: Args = argh::from_env();
    let command_line = std::env::args().collect::<Vec<String>>().join(" ");

    // Handle generate config first
    if args.generate_config {
        let sample_config = Config::generate_sample();
        println!("{}", sample_config);
        println!("\n💡 Save this content to a .toml file and use --config /path/to/config.toml");
        return Ok(());
    }

    // Load configuration file if specified
    if let Some(config_path) = args.config.clone() {
        args = args.with_config_file(&config_path)?;
    }

    let input = args.input.clone().ok_or("--input is required")?;
    if !args.stats_only && !args.dry_run && args.output.is_none() {
        return Err("--output is required".to_string());
    }

    println!("🚀 popdist v{}", env!("CARGO_PKG_VERSION"));

    // Configure thread pool
    if let Some(n) = args.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(n)
            .build_global()
            .map_err(|e| format!("Failed to configure thread pool: {}", e))?;
        println!("🧵 Threads: {}", n);
    } else {
        println!("🧵 Threads: {} (auto-detected)", rayon::current_num_threads());
    }

    // Validate all arguments
    let validation_result = validate_args(&args)?;

    let total_start = Instant::now();

    let diploid = !args.haploid;
    let is_str = args.microsatellite;
    println!(
        "🧬 Dataset: {} {} (optional columns: {})",
        if diploid { "diploid" } else { "haploid" },
        if is_str { "microsatellite" } else { "SNP" },
        args.optional_cols
    );

    let mut dataset = Dataset::structure(&input, diploid, args.optional_cols, is_str)
        .map_err(|e| e.to_string())?;
    dataset.load().map_err(|e| e.to_string())?;

    if !args.merge.is_empty() {
        let mut others = Vec::with_capacity(args.merge.len());
        for path in &args.merge {
            let mut other = Dataset::structure(path, diploid, args.optional_cols, is_str)
                .map_err(|e| e.to_string())?;
            other.load().map_err(|e| e.to_string())?;
            others.push(other);
        }
        let (original, index_maps) = dataset.concatenate(others).map_err(|e| e.to_string())?;
        println!(
            "🔗 Merged {} extra source(s): {} → {} samples",
            index_maps.len(),
            original,
            dataset.num_samples()
        );
    }

    // Handle stats-only mode
    if args.stats_only {
        print_dataset_statistics(&dataset)?;
        println!("\n✅ Statistics analysis completed");
        return Ok(());
    }

    if args.dry_run {
        println!("✅ Dry run completed successfully");
        println!(
            "📊 Final dataset: {} samples × {} loci",
            dataset.num_samples(),
            dataset.num_loci().unwrap_or(0)
        );
        return Ok(());
    }

    let distances = dataset.distances().map_err(|e| e.to_string())?;

    let identifiers: Vec<String> = dataset
        .identifiers()
        .iter()
        .map(|s| s.to_string())
        .collect();
    let (identifiers, distances) = select_samples(
        &identifiers,
        &distances,
        validation_result.sample_include_regex.as_ref(),
        validation_result.sample_exclude_regex.as_ref(),
    );

    let output = args.output.as_ref().ok_or("--output is required")?;
    write_matrix(output, &args.format, &identifiers, &distances, &command_line)?;

    println!(
        "🏁 Completed in {:.2}s at {}",
        total_start.elapsed().as_secs_f64(),
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    Ok(())
}

/// Dataset-level summary for --stats-only: dimensions, missing data, flags
/// and population breakdown.
fn print_dataset_statistics(dataset: &Dataset) -> Result<(), String> {
    let matrix = dataset.allele_matrix().map_err(|e| e.to_string())?;
    let missing: &[&str] = if dataset.is_str() {
        &MICROSATELLITE_MISSING
    } else {
        &[SNP_MISSING]
    };

    println!("\n📊 === DATASET STATISTICS ===");
    let columns = matrix.first().map_or(0, |row| row.len());
    let total_cells = matrix.len() * columns;
    println!(
        "  📏 Dimensions: {} samples × {} loci = {} allele cells",
        dataset.num_samples(),
        dataset.num_loci().unwrap_or(0),
        total_cells
    );

    let missing_cells: usize = matrix
        .iter()
        .map(|row| {
            row.iter()
                .filter(|code| missing.contains(&code.as_str()))
                .count()
        })
        .sum();
    if total_cells > 0 {
        println!(
            "  📊 Missing data: {:.2}% ({} cells)",
            100.0 * missing_cells as f64 / total_cells as f64,
            missing_cells
        );
    }

    let known = dataset.flags().iter().filter(|flag| **flag).count();
    println!(
        "  ✅ Known/reference samples: {} ({} unknown)",
        known,
        dataset.num_samples() - known
    );

    let mut populations: Vec<&str> = dataset.populations().into_iter().flatten().collect();
    populations.sort_unstable();
    populations.dedup();
    println!("  🌍 Populations: {}", populations.len());

    if !dataset.extra_file_paths().is_empty() {
        println!(
            "  🔗 Merged sources: {} (+ primary)",
            dataset.extra_file_paths().len()
        );
    }

    Ok(())
}
