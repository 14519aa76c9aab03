//! Point ingestion and result emission.
//!
//! # Input format
//!
//! One point per line, coordinates separated by commas:
//!
//! ```text
//! 0.1,2.5,-1.0
//! 0.4,2.1,-0.7
//! ```
//!
//! The dimension `d` is taken from the first line; every later line must have
//! exactly `d` fields. Blank lines are skipped. A malformed row fails the whole
//! read rather than producing a partial matrix.
//!
//! # Output format
//!
//! One matrix row per line, values comma-separated with 4 decimal digits.

use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use std::path::Path;

use tracing::debug;

use crate::error::{Result, SymNmfError};
use crate::matrix::Matrix;

/// Read an `n × d` point set from a comma-separated text file.
pub fn read_points(path: impl AsRef<Path>) -> Result<Matrix> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let points = parse_points(BufReader::new(file))?;
    debug!(path = %path.display(), n = points.rows(), d = points.cols(), "points loaded");
    Ok(points)
}

/// Parse an `n × d` point set from any buffered reader.
pub fn parse_points<R: BufRead>(reader: R) -> Result<Matrix> {
    let mut data = Vec::new();
    let mut dim: Option<usize> = None;
    let mut n = 0usize;

    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let line_no = idx + 1;
        let before = data.len();
        for field in line.split(',') {
            let field = field.trim();
            let value: f64 = field.parse().map_err(|_| {
                SymNmfError::malformed(line_no, format!("cannot parse {field:?} as a number"))
            })?;
            data.push(value);
        }
        let fields = data.len() - before;
        match dim {
            None => dim = Some(fields),
            Some(d) if d != fields => {
                return Err(SymNmfError::malformed(
                    line_no,
                    format!("expected {d} fields, got {fields}"),
                ));
            }
            Some(_) => {}
        }
        n += 1;
    }

    let d = dim.ok_or_else(|| SymNmfError::malformed(0, "no data points"))?;
    Matrix::from_vec(n, d, data)
}

/// Write `m` as comma-separated rows with 4 decimal digits.
pub fn write_matrix<W: Write>(out: &mut W, m: &Matrix) -> Result<()> {
    for row in m.iter_rows() {
        writeln!(out, "{}", format_row(row))?;
    }
    Ok(())
}

/// Render `m` in the [`write_matrix`] format.
pub fn format_matrix(m: &Matrix) -> String {
    m.iter_rows().map(|row| format_row(row) + "\n").collect()
}

fn format_row(row: &[f64]) -> String {
    row.iter()
        .map(|v| format!("{v:.4}"))
        .collect::<Vec<_>>()
        .join(",")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_points() {
        let input = "1.0,2.0\n3.5,-4.25\n";
        let m = parse_points(input.as_bytes()).unwrap();
        assert_eq!(m.shape(), (2, 2));
        assert_eq!(m.to_rows(), vec![vec![1.0, 2.0], vec![3.5, -4.25]]);
    }

    #[test]
    fn test_parse_points_tolerates_crlf_and_blank_lines() {
        let input = "1,2,3\r\n\r\n4,5,6\r\n\n";
        let m = parse_points(input.as_bytes()).unwrap();
        assert_eq!(m.shape(), (2, 3));
    }

    #[test]
    fn test_parse_points_no_trailing_newline() {
        let m = parse_points("7.0".as_bytes()).unwrap();
        assert_eq!(m.shape(), (1, 1));
        assert_eq!(m[(0, 0)], 7.0);
    }

    #[test]
    fn test_parse_points_rejects_wrong_field_count() {
        let err = parse_points("1,2\n3,4,5\n".as_bytes()).unwrap_err();
        match err {
            SymNmfError::MalformedInput { line, .. } => assert_eq!(line, 2),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_parse_points_rejects_garbage() {
        assert!(matches!(
            parse_points("1,abc\n".as_bytes()).unwrap_err(),
            SymNmfError::MalformedInput { line: 1, .. }
        ));
    }

    #[test]
    fn test_parse_points_rejects_empty() {
        assert!(matches!(
            parse_points("".as_bytes()).unwrap_err(),
            SymNmfError::MalformedInput { line: 0, .. }
        ));
    }

    #[test]
    fn test_format_matrix() {
        let m = Matrix::from_rows(&[[0.0, 1.0 / 3.0], [2.0, -0.5]]).unwrap();
        assert_eq!(format_matrix(&m), "0.0000,0.3333\n2.0000,-0.5000\n");
    }

    #[test]
    fn test_format_matrix_agrees_with_write_matrix() {
        let m = Matrix::from_rows(&[[1.23456], [0.00004], [10.0]]).unwrap();
        let mut buf = Vec::new();
        write_matrix(&mut buf, &m).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), format_matrix(&m));
        assert_eq!(format_matrix(&m), "1.2346\n0.0000\n10.0000\n");
    }

    #[test]
    fn test_format_empty_matrix() {
        let m = Matrix::zeros(0, 3).unwrap();
        assert_eq!(format_matrix(&m), "");
    }
}
