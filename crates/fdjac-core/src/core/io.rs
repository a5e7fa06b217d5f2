use nalgebra::DMatrix;
use std::path::Path;
use thiserror::Error;

use super::model::Model;

#[derive(Debug, Error)]
pub enum CsvError {
    #[error("CSV parsing failed: {0}")]
    Parse(#[from] csv::Error),

    #[error("Invalid numeric value '{value}' at row {row}, column {column}")]
    InvalidNumber {
        row: usize,
        column: usize,
        value: String,
    },

    #[error("Row {row} has {actual} fields, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        actual: usize,
    },

    #[error("File contains no rows")]
    Empty,

    #[error("Expected a single row or column, found a {nrows} x {ncols} matrix")]
    NotAVector { nrows: usize, ncols: usize },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Reads a headerless CSV file into a dense matrix, one record per row.
pub fn read_matrix(path: &Path) -> Result<DMatrix<f64>, CsvError> {
    // Flexible parsing so unequal record lengths reach the width check below,
    // which reports the offending row instead of a generic parse error.
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(path)?;

    let mut values = Vec::new();
    let mut n_cols = None;
    let mut n_rows = 0;

    for (row, record) in reader.records().enumerate() {
        let record = record?;
        let expected = *n_cols.get_or_insert(record.len());
        if record.len() != expected {
            return Err(CsvError::RaggedRow {
                row,
                expected,
                actual: record.len(),
            });
        }
        for (column, field) in record.iter().enumerate() {
            let value = field.parse::<f64>().map_err(|_| CsvError::InvalidNumber {
                row,
                column,
                value: field.to_string(),
            })?;
            values.push(value);
        }
        n_rows += 1;
    }

    match n_cols {
        Some(n_cols) if n_rows > 0 => Ok(DMatrix::from_row_iterator(n_rows, n_cols, values)),
        _ => Err(CsvError::Empty),
    }
}

/// Reads a vector from CSV. Accepts either a single row or a single column.
pub fn read_vector(path: &Path) -> Result<Model, CsvError> {
    let matrix = read_matrix(path)?;
    if matrix.nrows() == 1 {
        Ok(Model::from_iterator(
            matrix.ncols(),
            matrix.row(0).iter().copied(),
        ))
    } else if matrix.ncols() == 1 {
        Ok(matrix.column(0).into_owned())
    } else {
        Err(CsvError::NotAVector {
            nrows: matrix.nrows(),
            ncols: matrix.ncols(),
        })
    }
}

/// Writes a dense matrix as headerless CSV, one record per row.
pub fn write_matrix(path: &Path, matrix: &DMatrix<f64>) -> Result<(), CsvError> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)?;

    for row in matrix.row_iter() {
        let record: Vec<String> = row.iter().map(|v| format!("{v}")).collect();
        writer.write_record(&record)?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn read_matrix_parses_rows_and_columns() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("g.csv");
        fs::write(&path, "1.0,2.0,3.0\n4.0,5.0,6.0\n").unwrap();

        let matrix = read_matrix(&path).unwrap();

        assert_eq!(matrix.nrows(), 2);
        assert_eq!(matrix.ncols(), 3);
        assert_eq!(matrix[(1, 2)], 6.0);
    }

    #[test]
    fn read_matrix_rejects_ragged_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.csv");
        fs::write(&path, "1.0,2.0\n3.0\n").unwrap();

        let result = read_matrix(&path);

        assert!(matches!(
            result,
            Err(CsvError::RaggedRow {
                row: 1,
                expected: 2,
                actual: 1
            })
        ));
    }

    #[test]
    fn read_matrix_rejects_non_numeric_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.csv");
        fs::write(&path, "1.0,abc\n").unwrap();

        let result = read_matrix(&path);

        assert!(matches!(
            result,
            Err(CsvError::InvalidNumber { row: 0, column: 1, .. })
        ));
    }

    #[test]
    fn read_matrix_rejects_empty_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.csv");
        fs::write(&path, "").unwrap();

        assert!(matches!(read_matrix(&path), Err(CsvError::Empty)));
    }

    #[test]
    fn read_vector_accepts_row_and_column_layouts() {
        let dir = tempfile::tempdir().unwrap();

        let row_path = dir.path().join("row.csv");
        fs::write(&row_path, "1.0,2.0,3.0\n").unwrap();
        let column_path = dir.path().join("column.csv");
        fs::write(&column_path, "1.0\n2.0\n3.0\n").unwrap();

        let from_row = read_vector(&row_path).unwrap();
        let from_column = read_vector(&column_path).unwrap();

        assert_eq!(from_row, from_column);
        assert_eq!(from_row.len(), 3);
    }

    #[test]
    fn read_vector_rejects_full_matrices() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("matrix.csv");
        fs::write(&path, "1.0,2.0\n3.0,4.0\n").unwrap();

        let result = read_vector(&path);

        assert!(matches!(
            result,
            Err(CsvError::NotAVector { nrows: 2, ncols: 2 })
        ));
    }

    #[test]
    fn write_matrix_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        let matrix = DMatrix::from_row_slice(2, 2, &[1.5, -2.0, 0.25, 10.0]);

        write_matrix(&path, &matrix).unwrap();
        let read_back = read_matrix(&path).unwrap();

        assert_eq!(matrix, read_back);
    }
}
