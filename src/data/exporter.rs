//! CSV Exporter Module
//! Writes a cleaned DataFrame back to disk.

use crate::data::list_values;
use polars::prelude::*;
use std::fs::File;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Cannot write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Polars error: {0}")]
    Polars(#[from] PolarsError),
}

/// Render a list cell the way the cleaned dataset stores it: `['a', 'b']`.
fn list_literal(items: &[String]) -> String {
    let quoted: Vec<String> = items.iter().map(|s| quote_item(s)).collect();
    format!("[{}]", quoted.join(", "))
}

/// Quote one item as Python prints it: double quotes only for text with an
/// apostrophe and no double quote.
fn quote_item(text: &str) -> String {
    let quote = if text.contains('\'') && !text.contains('"') { '"' } else { '\'' };
    let mut out = String::with_capacity(text.len() + 2);
    out.push(quote);
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c == quote => {
                out.push('\\');
                out.push(c);
            }
            c => out.push(c),
        }
    }
    out.push(quote);
    out
}

/// Replace every list column with its text rendering; CSV has no list cells.
fn flatten_lists(df: &DataFrame) -> Result<DataFrame, ExportError> {
    let mut out = df.clone();
    let list_columns: Vec<String> = df
        .get_columns()
        .iter()
        .filter(|col| matches!(col.dtype(), DataType::List(_)))
        .map(|col| col.name().to_string())
        .collect();

    for name in list_columns {
        let rendered: Vec<Option<String>> = list_values(df, &name)?
            .into_iter()
            .map(|cell| cell.map(|items| list_literal(&items)))
            .collect();
        out.with_column(Column::new(name.as_str().into(), rendered))?;
    }
    Ok(out)
}

/// Write `df` with a header row, overwriting any file at `path`.
pub fn export_csv(df: &DataFrame, path: &Path) -> Result<(), ExportError> {
    let mut out = flatten_lists(df)?;
    let mut file = File::create(path).map_err(|source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    CsvWriter::new(&mut file)
        .include_header(true)
        .finish(&mut out)?;
    info!("wrote {} rows to {}", out.height(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::DataCleaner;
    use tempfile::tempdir;

    #[test]
    fn test_export_writes_header_and_list_cells() {
        let df = df!(
            "title" => &["Sankofa", "Kota Factory"],
            "listed_in" => &["Dramas, Independent Movies", "TV Comedies"]
        )
        .unwrap();
        let df = DataCleaner::split_field(&df, "listed_in", ",", "genres").unwrap();

        let dir = tempdir().unwrap();
        let path = dir.path().join("cleaned.csv");
        std::fs::write(&path, "stale contents\n").unwrap();
        export_csv(&df, &path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("title,listed_in,genres"));
        let first = lines.next().unwrap();
        assert!(first.starts_with("Sankofa,"));
        assert!(first.contains("['Dramas', 'Independent Movies']"));
        assert!(!text.contains("stale"));
    }

    #[test]
    fn test_export_unwritable_path() {
        let dir = tempdir().unwrap();
        let df = df!("a" => &[1]).unwrap();
        let err = export_csv(&df, &dir.path().join("missing").join("out.csv")).unwrap_err();
        assert!(matches!(err, ExportError::Io { .. }));
    }

    #[test]
    fn test_list_literal_quotes_like_python_lists() {
        assert_eq!(
            list_literal(&["Kids' TV".to_string(), "Comedies".to_string()]),
            r#"["Kids' TV", 'Comedies']"#
        );
        assert_eq!(
            list_literal(&[r#"Rock 'n' "Roll""#.to_string(), r"A\B".to_string()]),
            r#"['Rock \'n\' "Roll"', 'A\\B']"#
        );
        assert_eq!(list_literal(&[]), "[]");
    }
}
