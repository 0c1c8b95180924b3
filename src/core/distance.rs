// distance.rs - Pairwise distance computation over allele matrices

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;

use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;

/// Missing-genotype sentinels in raw microsatellite allele codes.
pub const MICROSATELLITE_MISSING: [&str; 2] = ["-9", "000"];

/// Distance between two allele rows.
///
/// Only columns where neither side holds a missing sentinel are compared;
/// the distance is the differing fraction of those columns, or 0.0 when no
/// column is mutually present.
pub fn pair_distance(a: &[String], b: &[String], missing: &[&str]) -> f64 {
    let mut differing = 0usize;
    let mut selected = 0usize;
    for (x, y) in a.iter().zip(b.iter()) {
        if missing.contains(&x.as_str()) || missing.contains(&y.as_str()) {
            continue;
        }
        selected += 1;
        if x != y {
            differing += 1;
        }
    }
    if selected == 0 {
        0.0
    } else {
        differing as f64 / selected as f64
    }
}

/// Full symmetric distance matrix over `matrix` rows.
///
/// The upper triangle is computed in parallel and mirrored below the
/// diagonal; the diagonal is zero.
pub fn pairwise_distances(matrix: &[Vec<String>], missing: &[&str]) -> Vec<Vec<f64>> {
    let n = matrix.len();
    let mut distances = vec![vec![0.0; n]; n];
    if n < 2 {
        return distances;
    }

    let total_comparisons = n * (n - 1) / 2;
    println!(
        "🔄 Computing distance matrix ({} × {} = {} comparisons)...",
        n, n, total_comparisons
    );

    let pb = ProgressBar::new(total_comparisons as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {per_sec} ETA: {eta}")
            .unwrap()
            .progress_chars("#>-"),
    );

    // Progress tracking with reduced contention
    let update_interval = std::cmp::max(1, total_comparisons / 100);
    let progress_counter = Arc::new(AtomicUsize::new(0));

    let start = Instant::now();
    let upper_triangle: Vec<(usize, usize, f64)> = (0..n)
        .into_par_iter()
        .flat_map(|i| {
            let progress_clone = progress_counter.clone();
            let pb_clone = pb.clone();
            (i + 1..n).into_par_iter().map(move |j| {
                let distance = pair_distance(&matrix[i], &matrix[j], missing);

                let count = progress_clone.fetch_add(1, Ordering::Relaxed) + 1;
                if count % update_interval == 0 {
                    pb_clone.set_position(count as u64);
                }

                (i, j, distance)
            })
        })
        .collect();

    pb.finish_and_clear();

    for (i, j, distance) in upper_triangle {
        distances[i][j] = distance;
        distances[j][i] = distance;
    }

    println!(
        "✅ Distance matrix computed in {:.2}s",
        start.elapsed().as_secs_f64()
    );

    distances
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn row(codes: &[&str]) -> Vec<String> {
        codes.iter().map(|c| c.to_string()).collect()
    }

    #[test]
    fn test_matrix_is_symmetric_with_zero_diagonal() {
        let matrix = vec![
            row(&["120", "135", "140"]),
            row(&["120", "136", "-9"]),
            row(&["121", "135", "140"]),
        ];
        let distances = pairwise_distances(&matrix, &MICROSATELLITE_MISSING);

        for i in 0..3 {
            assert_relative_eq!(distances[i][i], 0.0);
            for j in 0..3 {
                assert_relative_eq!(distances[i][j], distances[j][i]);
            }
        }
    }

    #[test]
    fn test_identical_rows_have_zero_distance() {
        let a = row(&["120", "-9", "135"]);
        let b = row(&["120", "118", "135"]);
        assert_relative_eq!(pair_distance(&a, &b, &MICROSATELLITE_MISSING), 0.0);
    }

    #[test]
    fn test_fully_differing_rows_have_distance_one() {
        let a = row(&["120", "135", "000"]);
        let b = row(&["121", "136", "140"]);
        assert_relative_eq!(pair_distance(&a, &b, &MICROSATELLITE_MISSING), 1.0);
    }

    #[test]
    fn test_mutually_missing_columns_are_excluded() {
        // one differing column out of two valid; third excluded on both sides
        let a = row(&["A", "A", "-9"]);
        let b = row(&["A", "T", "000"]);
        assert_relative_eq!(pair_distance(&a, &b, &MICROSATELLITE_MISSING), 0.5);
    }

    #[test]
    fn test_no_mutually_present_column_yields_zero() {
        let a = row(&["-9", "120"]);
        let b = row(&["135", "000"]);
        assert_relative_eq!(pair_distance(&a, &b, &MICROSATELLITE_MISSING), 0.0);
    }

    #[test]
    fn test_snp_sentinel_set() {
        let a = row(&["A", "N"]);
        let b = row(&["G", "N"]);
        assert_relative_eq!(pair_distance(&a, &b, &["N"]), 1.0);
    }

    #[test]
    fn test_empty_and_single_row_matrices() {
        assert!(pairwise_distances(&[], &MICROSATELLITE_MISSING).is_empty());
        let single = vec![row(&["120"])];
        let distances = pairwise_distances(&single, &MICROSATELLITE_MISSING);
        assert_relative_eq!(distances[0][0], 0.0);
    }
}
