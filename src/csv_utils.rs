use std::error::Error;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Reads a column of f64 values from a CSV file by column name, skipping invalid/missing values.
///
/// Returns an error if the header has no such column.
pub fn read_csv_column<P: AsRef<Path>>(path: P, column: &str) -> Result<Vec<f64>, Box<dyn Error>> {
    let mut rdr = csv::Reader::from_reader(File::open(path)?);
    let col_index = column_index(rdr.headers()?, column)?;

    let mut values = Vec::new();
    for result in rdr.records() {
        let record = result?;
        if let Some(val) = record.get(col_index).and_then(parse_field) {
            values.push(val);
        }
    }
    Ok(values)
}

/// Reads a signal from two columns of a CSV file: positions and values.
///
/// Rows where either field is missing or not a number are skipped as a whole,
/// so the returned vectors always have equal length and stay row-aligned.
pub fn read_signal<P: AsRef<Path>>(
    path: P,
    x_column: &str,
    y_column: &str,
) -> Result<(Vec<f64>, Vec<f64>), Box<dyn Error>> {
    read_signal_from_reader(File::open(path)?, x_column, y_column)
}

/// Same as [`read_signal`], for any reader yielding CSV text.
pub fn read_signal_from_reader<R: Read>(
    reader: R,
    x_column: &str,
    y_column: &str,
) -> Result<(Vec<f64>, Vec<f64>), Box<dyn Error>> {
    let mut rdr = csv::Reader::from_reader(reader);
    let headers = rdr.headers()?.clone();
    let x_index = column_index(&headers, x_column)?;
    let y_index = column_index(&headers, y_column)?;

    let mut xs = Vec::new();
    let mut ys = Vec::new();
    let mut skipped = 0usize;
    for result in rdr.records() {
        let record = result?;
        let x = record.get(x_index).and_then(parse_field);
        let y = record.get(y_index).and_then(parse_field);
        match (x, y) {
            (Some(x), Some(y)) => {
                xs.push(x);
                ys.push(y);
            }
            _ => skipped += 1,
        }
    }

    if skipped > 0 {
        log::debug!("skipped {} CSV rows without numeric {}/{}", skipped, x_column, y_column);
    }
    Ok((xs, ys))
}

fn column_index(headers: &csv::StringRecord, column: &str) -> Result<usize, Box<dyn Error>> {
    headers
        .iter()
        .position(|h| h.trim() == column)
        .ok_or_else(|| format!("column '{}' not found in CSV header", column).into())
}

fn parse_field(field: &str) -> Option<f64> {
    field.trim().parse::<f64>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_signal_keeps_rows_aligned() {
        let data = "t,value,label\n0.0,1.5,a\n0.1,,b\n0.25,2.5,c\nbad,3.0,d\n0.4,4.0,e\n";
        let (x, y) = read_signal_from_reader(data.as_bytes(), "t", "value").unwrap();

        assert_eq!(x, vec![0.0, 0.25, 0.4]);
        assert_eq!(y, vec![1.5, 2.5, 4.0]);
    }

    #[test]
    fn test_missing_column_is_an_error() {
        let data = "t,value\n0.0,1.0\n";
        assert!(read_signal_from_reader(data.as_bytes(), "t", "missing").is_err());
    }

    #[test]
    fn test_read_csv_column_from_file() {
        let path = std::env::temp_dir().join(format!("savgol_nonuniform_{}.csv", std::process::id()));
        std::fs::write(&path, "x,y\n1,10\n2,oops\n3,30\n").unwrap();

        let values = read_csv_column(&path, "y").unwrap();
        let _ = std::fs::remove_file(&path);

        assert_eq!(values, vec![10.0, 30.0]);
    }
}
