//! Integration tests for batch input readers

use barcodegen::GenerationError;
use barcodegen::services::{BatchSource, ColumnSelector, read_csv_column, read_csv_headers, read_records};
use camino::Utf8PathBuf;
use std::fs;
use tempfile::TempDir;

fn write_input(name: &str, content: &str) -> (TempDir, Utf8PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let path = Utf8PathBuf::try_from(temp_dir.path().join(name)).unwrap();
    fs::write(&path, content).unwrap();
    (temp_dir, path)
}

#[test]
fn test_csv_skips_header_and_blank_cells() {
    let (_temp_dir, path) = write_input("items.csv", "name,code\na,1\nb,\nc,2\n");

    let source = BatchSource::Csv {
        path,
        column: ColumnSelector::Name("code".into()),
    };
    assert_eq!(read_records(&source).unwrap(), vec!["1", "2"]);
}

#[test]
fn test_csv_quoted_cells() {
    let (_temp_dir, path) = write_input(
        "items.csv",
        "id,label\n1,\"Widget, large\"\n2,\" spaced \"\n3,\"\"\n",
    );

    let values = read_csv_column(&path, &ColumnSelector::Name("label".into())).unwrap();
    assert_eq!(values, vec!["Widget, large", "spaced"]);
}

#[test]
fn test_csv_headers_for_column_selection() {
    let (_temp_dir, path) = write_input("items.csv", "sku,description,price\n1,a,2\n");
    assert_eq!(
        read_csv_headers(&path).unwrap(),
        vec!["sku", "description", "price"]
    );
}

#[test]
fn test_unknown_column_is_invalid_input() {
    let (_temp_dir, path) = write_input("items.csv", "sku\n1\n");

    let err = read_csv_column(&path, &ColumnSelector::Name("barcode".into())).unwrap_err();
    assert!(matches!(err, GenerationError::InvalidInput(_)));
    assert!(err.to_string().contains("sku"));
}

#[test]
fn test_numeric_headers_select_by_name() {
    let (_temp_dir, path) = write_input("items.csv", "id,0,1\nx,zero,one\n");

    let source = BatchSource::from_path(path.clone(), Some("1".parse().unwrap()));
    assert_eq!(read_records(&source).unwrap(), vec!["one"]);

    let source = BatchSource::from_path(path, Some("#1".parse().unwrap()));
    assert_eq!(read_records(&source).unwrap(), vec!["zero"]);
}

#[test]
fn test_excel_byte_order_mark() {
    let (_temp_dir, path) = write_input("items.csv", "\u{feff}barcode,qty\n4006381333931,2\n");

    let values = read_csv_column(&path, &ColumnSelector::Name("barcode".into())).unwrap();
    assert_eq!(values, vec!["4006381333931"]);
}

#[test]
fn test_header_only_csv_has_no_records() {
    let (_temp_dir, path) = write_input("items.csv", "sku,name\n");
    assert!(read_csv_column(&path, &ColumnSelector::Index(0)).unwrap().is_empty());
}

#[test]
fn test_text_source_for_other_extensions() {
    let (_temp_dir, path) = write_input("items.lst", "one\r\n\r\n two \n");

    let source = BatchSource::from_path(path, None);
    assert!(matches!(source, BatchSource::Text(_)));
    assert_eq!(read_records(&source).unwrap(), vec!["one", "two"]);
}

#[test]
fn test_missing_input_is_io_error() {
    let temp_dir = TempDir::new().unwrap();
    let path = Utf8PathBuf::try_from(temp_dir.path().join("nope.csv")).unwrap();

    assert!(matches!(
        read_csv_headers(&path),
        Err(GenerationError::Io { .. })
    ));
}
