// mod.rs - Distance matrix output formatters

use std::fs::{create_dir_all, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use regex::Regex;

/// Ensure parent directory exists before creating file
fn ensure_parent_dir(file_path: &str) -> Result<(), String> {
    if let Some(parent) = Path::new(file_path).parent() {
        create_dir_all(parent).map_err(|e| {
            format!(
                "Failed to create parent directory '{}': {}",
                parent.display(),
                e
            )
        })?;
    }
    Ok(())
}

fn format_distance(distance: f64) -> String {
    format!("{:.6}", distance)
}

/// Restrict a finished matrix to identifiers passing the include/exclude
/// patterns. Rows and columns are dropped together so the matrix stays square.
pub fn select_samples(
    identifiers: &[String],
    matrix: &[Vec<f64>],
    include: Option<&Regex>,
    exclude: Option<&Regex>,
) -> (Vec<String>, Vec<Vec<f64>>) {
    let keep: Vec<usize> = identifiers
        .iter()
        .enumerate()
        .filter(|(_, identifier)| {
            if let Some(regex) = include {
                if !regex.is_match(identifier) {
                    return false;
                }
            }
            if let Some(regex) = exclude {
                if regex.is_match(identifier) {
                    return false;
                }
            }
            true
        })
        .map(|(i, _)| i)
        .collect();

    if keep.len() != identifiers.len() {
        println!(
            "Sample filters: kept {} samples (removed {})",
            keep.len(),
            identifiers.len() - keep.len()
        );
    }

    let selected_ids = keep.iter().map(|&i| identifiers[i].clone()).collect();
    let selected_rows = keep
        .iter()
        .map(|&i| keep.iter().map(|&j| matrix[i][j]).collect())
        .collect();
    (selected_ids, selected_rows)
}

/// Write distance matrix in TSV format
pub fn write_tsv(
    file_path: &str,
    identifiers: &[String],
    matrix: &[Vec<f64>],
    command_line: &str,
) -> Result<(), String> {
    ensure_parent_dir(file_path)?;
    let file = File::create(file_path)
        .map_err(|e| format!("Failed to create output file '{}': {}", file_path, e))?;
    let mut writer = BufWriter::new(file);

    writeln!(writer, "# Command: {}", command_line).map_err(|e| format!("Write error: {}", e))?;
    writeln!(
        writer,
        "# Generated: {}",
        chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC")
    )
    .map_err(|e| format!("Write error: {}", e))?;
    writeln!(writer, "# popdist v{}", env!("CARGO_PKG_VERSION"))
        .map_err(|e| format!("Write error: {}", e))?;

    write!(writer, "Sample").map_err(|e| format!("Write error: {}", e))?;
    for identifier in identifiers {
        write!(writer, "\t{}", identifier).map_err(|e| format!("Write error: {}", e))?;
    }
    writeln!(writer).map_err(|e| format!("Write error: {}", e))?;

    for (i, identifier) in identifiers.iter().enumerate() {
        write!(writer, "{}", identifier).map_err(|e| format!("Write error: {}", e))?;
        for j in 0..identifiers.len() {
            write!(writer, "\t{}", format_distance(matrix[i][j]))
                .map_err(|e| format!("Write error: {}", e))?;
        }
        writeln!(writer).map_err(|e| format!("Write error: {}", e))?;
    }

    writer.flush().map_err(|e| format!("Flush error: {}", e))?;
    println!("✅ Distance matrix written to: {}", file_path);
    Ok(())
}

/// Write distance matrix in CSV format
pub fn write_csv(
    file_path: &str,
    identifiers: &[String],
    matrix: &[Vec<f64>],
    command_line: &str,
) -> Result<(), String> {
    ensure_parent_dir(file_path)?;
    let file = File::create(file_path)
        .map_err(|e| format!("Failed to create output file '{}': {}", file_path, e))?;
    let mut buffered = BufWriter::new(file);

    writeln!(buffered, "# Command: {}", command_line).map_err(|e| format!("Write error: {}", e))?;
    writeln!(
        buffered,
        "# Generated: {}",
        chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC")
    )
    .map_err(|e| format!("Write error: {}", e))?;
    writeln!(buffered, "# popdist v{}", env!("CARGO_PKG_VERSION"))
        .map_err(|e| format!("Write error: {}", e))?;

    let mut writer = csv::Writer::from_writer(buffered);

    let mut header = Vec::with_capacity(identifiers.len() + 1);
    header.push("Sample".to_string());
    header.extend(identifiers.iter().cloned());
    writer
        .write_record(&header)
        .map_err(|e| format!("Write error: {}", e))?;

    for (i, identifier) in identifiers.iter().enumerate() {
        let mut record = Vec::with_capacity(identifiers.len() + 1);
        record.push(identifier.clone());
        record.extend(matrix[i].iter().map(|d| format_distance(*d)));
        writer
            .write_record(&record)
            .map_err(|e| format!("Write error: {}", e))?;
    }

    writer.flush().map_err(|e| format!("Flush error: {}", e))?;
    println!("✅ Distance matrix written to: {}", file_path);
    Ok(())
}

/// Write distance matrix in PHYLIP format
pub fn write_phylip(
    file_path: &str,
    identifiers: &[String],
    matrix: &[Vec<f64>],
    command_line: &str,
) -> Result<(), String> {
    ensure_parent_dir(file_path)?;
    let file = File::create(file_path)
        .map_err(|e| format!("Failed to create output file '{}': {}", file_path, e))?;
    let mut writer = BufWriter::new(file);

    writeln!(writer, "    {}", identifiers.len()).map_err(|e| format!("Write error: {}", e))?;

    // lower triangle, diagonal included
    for (i, identifier) in identifiers.iter().enumerate() {
        write!(writer, "{:<10}", identifier).map_err(|e| format!("Write error: {}", e))?;
        for j in 0..=i {
            write!(writer, "  {}", format_distance(matrix[i][j]))
                .map_err(|e| format!("Write error: {}", e))?;
        }
        writeln!(writer).map_err(|e| format!("Write error: {}", e))?;
    }

    // trailing comments are ignored by most PHYLIP parsers
    writeln!(writer).map_err(|e| format!("Write error: {}", e))?;
    writeln!(writer, "# Command: {}", command_line).map_err(|e| format!("Write error: {}", e))?;
    writeln!(
        writer,
        "# Generated: {}",
        chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC")
    )
    .map_err(|e| format!("Write error: {}", e))?;
    writeln!(writer, "# popdist v{}", env!("CARGO_PKG_VERSION"))
        .map_err(|e| format!("Write error: {}", e))?;

    writer.flush().map_err(|e| format!("Flush error: {}", e))?;
    println!(
        "✅ Distance matrix written to: {} (PHYLIP format)",
        file_path
    );
    Ok(())
}

/// Write distance matrix in NEXUS format
pub fn write_nexus(
    file_path: &str,
    identifiers: &[String],
    matrix: &[Vec<f64>],
    command_line: &str,
) -> Result<(), String> {
    ensure_parent_dir(file_path)?;
    let file = File::create(file_path)
        .map_err(|e| format!("Failed to create output file '{}': {}", file_path, e))?;
    let mut writer = BufWriter::new(file);

    writeln!(writer, "#NEXUS").map_err(|e| format!("Write error: {}", e))?;
    writeln!(writer, "[Command: {}]", command_line).map_err(|e| format!("Write error: {}", e))?;
    writeln!(
        writer,
        "[Generated: {}]",
        chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC")
    )
    .map_err(|e| format!("Write error: {}", e))?;
    writeln!(writer, "[popdist v{}]", env!("CARGO_PKG_VERSION"))
        .map_err(|e| format!("Write error: {}", e))?;
    writeln!(writer, "BEGIN DISTANCES;").map_err(|e| format!("Write error: {}", e))?;
    writeln!(writer, "    DIMENSIONS NTAX={};", identifiers.len())
        .map_err(|e| format!("Write error: {}", e))?;
    writeln!(writer, "    FORMAT LABELS LOWER DIAGONAL;")
        .map_err(|e| format!("Write error: {}", e))?;
    writeln!(writer, "    MATRIX").map_err(|e| format!("Write error: {}", e))?;

    for (i, identifier) in identifiers.iter().enumerate() {
        write!(writer, "        {}", identifier).map_err(|e| format!("Write error: {}", e))?;
        for j in 0..i {
            write!(writer, " {}", format_distance(matrix[i][j]))
                .map_err(|e| format!("Write error: {}", e))?;
        }
        writeln!(writer).map_err(|e| format!("Write error: {}", e))?;
    }

    writeln!(writer, "    ;").map_err(|e| format!("Write error: {}", e))?;
    writeln!(writer, "END;").map_err(|e| format!("Write error: {}", e))?;

    writer.flush().map_err(|e| format!("Flush error: {}", e))?;
    println!(
        "✅ Distance matrix written to: {} (NEXUS format)",
        file_path
    );
    Ok(())
}

/// Write distance matrix in the specified format
pub fn write_matrix(
    file_path: &str,
    format: &str,
    identifiers: &[String],
    matrix: &[Vec<f64>],
    command_line: &str,
) -> Result<(), String> {
    match format.to_lowercase().as_str() {
        "tsv" => write_tsv(file_path, identifiers, matrix, command_line),
        "csv" => write_csv(file_path, identifiers, matrix, command_line),
        "phylip" => write_phylip(file_path, identifiers, matrix, command_line),
        "nexus" => write_nexus(file_path, identifiers, matrix, command_line),
        _ => Err(format!(
            "Unsupported output format: {}. Use: tsv, csv, phylip, nexus",
            format
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::fs;
    use tempfile::TempDir;

    fn fixture() -> (Vec<String>, Vec<Vec<f64>>) {
        let identifiers = vec!["S1".to_string(), "S2".to_string(), "S3".to_string()];
        let matrix = vec![
            vec![0.0, 0.5, 1.0],
            vec![0.5, 0.0, 0.25],
            vec![1.0, 0.25, 0.0],
        ];
        (identifiers, matrix)
    }

    #[test]
    fn test_select_samples_keeps_matrix_square() {
        let (identifiers, matrix) = fixture();
        let exclude = Regex::new("^S2$").unwrap();
        let (ids, rows) = select_samples(&identifiers, &matrix, None, Some(&exclude));

        assert_eq!(ids, vec!["S1", "S3"]);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].len(), 2);
        assert_relative_eq!(rows[0][1], 1.0);
        assert_relative_eq!(rows[1][0], 1.0);
    }

    #[test]
    fn test_select_samples_include_pattern() {
        let (identifiers, matrix) = fixture();
        let include = Regex::new("^S[12]$").unwrap();
        let (ids, rows) = select_samples(&identifiers, &matrix, Some(&include), None);
        assert_eq!(ids, vec!["S1", "S2"]);
        assert_relative_eq!(rows[0][1], 0.5);
    }

    #[test]
    fn test_write_tsv_shape() {
        let (identifiers, matrix) = fixture();
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.tsv");
        write_tsv(path.to_str().unwrap(), &identifiers, &matrix, "popdist test").unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert!(lines[0].starts_with("# Command: popdist test"));
        assert_eq!(lines[3], "Sample\tS1\tS2\tS3");
        assert_eq!(lines[4], "S1\t0.000000\t0.500000\t1.000000");
        // 3 comments + header + 3 rows
        assert_eq!(lines.len(), 7);
    }

    #[test]
    fn test_write_csv_shape() {
        let (identifiers, matrix) = fixture();
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.csv");
        write_csv(path.to_str().unwrap(), &identifiers, &matrix, "popdist test").unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines[3], "Sample,S1,S2,S3");
        assert_eq!(lines[4], "S1,0.000000,0.500000,1.000000");
    }

    #[test]
    fn test_write_phylip_lower_triangle() {
        let (identifiers, matrix) = fixture();
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.phy");
        write_phylip(path.to_str().unwrap(), &identifiers, &matrix, "popdist test").unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines[0].trim(), "3");
        assert!(lines[1].starts_with("S1"));
        assert!(lines[3].contains("1.000000  0.250000  0.000000"));
    }

    #[test]
    fn test_write_nexus_block() {
        let (identifiers, matrix) = fixture();
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.nex");
        write_nexus(path.to_str().unwrap(), &identifiers, &matrix, "popdist test").unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("#NEXUS"));
        assert!(content.contains("DIMENSIONS NTAX=3;"));
        assert!(content.contains("END;"));
    }

    #[test]
    fn test_write_matrix_rejects_unknown_format() {
        let (identifiers, matrix) = fixture();
        let err = write_matrix("out.bin", "bin", &identifiers, &matrix, "popdist").unwrap_err();
        assert!(err.contains("Unsupported output format"));
    }
}
