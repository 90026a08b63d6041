//! Loading factor tables through each source

use std::io::Write;

use cmvm_factor::{
    CoefficientMatrix, CoefficientSource, FactorEntry, FactorError, FactorTable,
    FactorTableSource, JsonFileSource, JsonStrSource, TableDocument, TableShape,
};
use cmvm_fixed_point::BitWidth;

const SHIFT_BY_ONE: &str = r#"{
    "planes": 1, "rows": 4, "cols": 4,
    "entries": [{"plane": 0, "row": 0, "col": 0, "shift": 1, "sign": "+"}]
}"#;

fn shape() -> TableShape {
    TableShape::new(1, 4, 4)
}

#[test]
fn test_json_file_source() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(SHIFT_BY_ONE.as_bytes()).unwrap();

    let source = JsonFileSource::new(file.path(), shape(), BitWidth::default());
    let table = source.load().unwrap();
    assert_eq!(table.get(0, 0, 0), Some(FactorEntry::positive(1)));
    assert_eq!(table.term_count(), 1);
}

#[test]
fn test_missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let source = JsonFileSource::new(dir.path().join("absent.json"), shape(), BitWidth::default());
    assert!(matches!(source.load(), Err(FactorError::Io(_))));
}

#[test]
fn test_truncated_file_is_malformed() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(&SHIFT_BY_ONE.as_bytes()[..40]).unwrap();

    let source = JsonFileSource::new(file.path(), shape(), BitWidth::default());
    assert!(matches!(source.load(), Err(FactorError::MalformedData(_))));
}

#[test]
fn test_str_source_validates_declared_shape() {
    let source = JsonStrSource::new(SHIFT_BY_ONE, TableShape::new(1, 4, 2), BitWidth::default());
    match source.load() {
        Err(FactorError::ShapeMismatch { expected, got }) => {
            assert_eq!(expected, TableShape::new(1, 4, 2));
            assert_eq!(got, shape());
        }
        other => panic!("expected shape mismatch, got {:?}", other),
    }
}

#[test]
fn test_str_source_validates_shift() {
    let source = JsonStrSource::new(SHIFT_BY_ONE, shape(), BitWidth::new(1).unwrap());
    assert!(matches!(
        source.load(),
        Err(FactorError::ShiftOutOfRange { shift: 1, width: 1, .. })
    ));
}

#[test]
fn test_table_is_its_own_source() {
    let table = JsonStrSource::new(SHIFT_BY_ONE, shape(), BitWidth::default())
        .load()
        .unwrap();
    let boxed: Box<dyn FactorTableSource> = Box::new(table.clone());
    assert_eq!(boxed.load().unwrap(), table);
}

#[test]
fn test_coefficient_source_plane_count() {
    let matrix = CoefficientMatrix::from_raw(vec![3, 0, 0, 1], 2, 2).unwrap();

    let minimal = CoefficientSource::new(matrix.clone(), BitWidth::default())
        .load()
        .unwrap();
    assert_eq!(minimal.shape(), TableShape::new(2, 2, 2));

    let padded = CoefficientSource::new(matrix, BitWidth::default())
        .with_planes(4)
        .load()
        .unwrap();
    assert_eq!(padded.shape(), TableShape::new(4, 2, 2));
    assert_eq!(padded.effective_matrix(), minimal.effective_matrix());
}

#[test]
fn test_decomposed_table_survives_json() {
    let matrix = CoefficientMatrix::from_raw(vec![-5, 9, 12, 0, 1, -1], 2, 3).unwrap();
    let width = BitWidth::new(16).unwrap();
    let table: FactorTable = CoefficientSource::new(matrix, width).load().unwrap();

    let json = TableDocument::from_table(&table).to_json().unwrap();
    let reloaded = JsonStrSource::new(json, table.shape(), width).load().unwrap();
    assert_eq!(reloaded, table);
}
