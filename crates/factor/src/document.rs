//! JSON interchange form of a factor table

use cmvm_fixed_point::BitWidth;
use serde::{Deserialize, Serialize};

use crate::entry::{FactorEntry, Sign};
use crate::error::{FactorError, Result};
use crate::table::{FactorTable, TableShape, Term};

/// One present term of a table document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TermRecord {
    pub plane: usize,
    pub row: usize,
    pub col: usize,
    pub shift: u32,
    pub sign: Sign,
}

/// Sparse table document: declared dimensions plus the present terms
///
/// ```json
/// {"planes": 1, "rows": 4, "cols": 4,
///  "entries": [{"plane": 0, "row": 0, "col": 0, "shift": 1, "sign": "positive"}]}
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TableDocument {
    pub planes: usize,
    pub rows: usize,
    pub cols: usize,
    #[serde(default)]
    pub entries: Vec<TermRecord>,
}

impl TableDocument {
    /// Parse a document from JSON text
    pub fn parse(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Describe an existing table
    pub fn from_table(table: &FactorTable) -> Self {
        let shape = table.shape();
        Self {
            planes: shape.planes,
            rows: shape.rows,
            cols: shape.cols,
            entries: table
                .terms()
                .map(|t| TermRecord {
                    plane: t.plane,
                    row: t.row,
                    col: t.col,
                    shift: t.entry.shift,
                    sign: t.entry.sign,
                })
                .collect(),
        }
    }

    /// Declared dimensions
    pub fn shape(&self) -> TableShape {
        TableShape::new(self.planes, self.rows, self.cols)
    }

    /// Validate against the expected shape and width and build the table
    pub fn into_table(self, expected: TableShape, width: BitWidth) -> Result<FactorTable> {
        let got = self.shape();
        if got != expected {
            return Err(FactorError::ShapeMismatch { expected, got });
        }

        let terms = self.entries.into_iter().map(|r| Term {
            plane: r.plane,
            row: r.row,
            col: r.col,
            entry: FactorEntry {
                shift: r.shift,
                sign: r.sign,
            },
        });
        FactorTable::from_terms(expected, width, terms)
    }

    /// Serialize as pretty-printed JSON
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| FactorError::MalformedData(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: &str = r#"{
        "planes": 1, "rows": 4, "cols": 4,
        "entries": [{"plane": 0, "row": 0, "col": 0, "shift": 1, "sign": "positive"}]
    }"#;

    #[test]
    fn test_parse_into_table() {
        let shape = TableShape::new(1, 4, 4);
        let table = TableDocument::parse(DOC)
            .unwrap()
            .into_table(shape, BitWidth::default())
            .unwrap();
        assert_eq!(table.get(0, 0, 0), Some(FactorEntry::positive(1)));
        assert_eq!(table.term_count(), 1);
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            TableDocument::parse("{\"planes\": 1, "),
            Err(FactorError::MalformedData(_))
        ));
        assert!(matches!(
            TableDocument::parse(r#"{"planes": 1, "rows": 1, "cols": 1, "extra": 0}"#),
            Err(FactorError::MalformedData(_))
        ));
    }

    #[test]
    fn test_bad_sign_is_malformed() {
        let text = r#"{"planes": 1, "rows": 1, "cols": 1,
            "entries": [{"plane": 0, "row": 0, "col": 0, "shift": 1, "sign": "maybe"}]}"#;
        assert!(matches!(
            TableDocument::parse(text),
            Err(FactorError::MalformedData(_))
        ));
    }

    #[test]
    fn test_shape_mismatch() {
        let result = TableDocument::parse(DOC)
            .unwrap()
            .into_table(TableShape::new(2, 4, 4), BitWidth::default());
        assert!(matches!(result, Err(FactorError::ShapeMismatch { .. })));
    }

    #[test]
    fn test_shift_out_of_range() {
        let text = r#"{"planes": 1, "rows": 1, "cols": 1,
            "entries": [{"plane": 0, "row": 0, "col": 0, "shift": 16, "sign": "-"}]}"#;
        let result = TableDocument::parse(text)
            .unwrap()
            .into_table(TableShape::new(1, 1, 1), BitWidth::new(16).unwrap());
        assert!(matches!(result, Err(FactorError::ShiftOutOfRange { shift: 16, .. })));
    }

    #[test]
    fn test_document_of_table_reloads() {
        let shape = TableShape::new(1, 4, 4);
        let width = BitWidth::default();
        let table = TableDocument::parse(DOC).unwrap().into_table(shape, width).unwrap();

        let json = TableDocument::from_table(&table).to_json().unwrap();
        let reloaded = TableDocument::parse(&json).unwrap().into_table(shape, width).unwrap();
        assert_eq!(reloaded, table);
    }
}
