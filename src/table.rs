//! Fixed-column tabular projection of resolved records.
//!
//! The column order is part of the export format and never changes:
//! name, database id, structural notation, molecular mass, molecular formula,
//! logP, hydrogen-donor count, hydrogen-acceptor count.
//!
//! # Example
//!
//! ```
//! use chemly_core::table::{to_table, TABLE_COLUMNS};
//!
//! let table = to_table(&[]);
//! assert_eq!(table.row_count(), 0);
//! assert_eq!(table.to_tsv(), format!("{}\n", TABLE_COLUMNS.join("\t")));
//! ```

use crate::batch::MoleculeRecord;

/// Number of columns in every table.
pub const COLUMN_COUNT: usize = 8;

/// Header row, in column order.
pub const TABLE_COLUMNS: [&str; COLUMN_COUNT] = [
    "name",
    "cid",
    "smiles",
    "molecular_mass",
    "molecular_formula",
    "logP",
    "H_donor_atoms",
    "H_acceptor_atoms",
];

/// A header plus zero or more rows of rendered cells.
///
/// Absent attributes render as empty cells.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultTable {
    rows: Vec<[String; COLUMN_COUNT]>,
}

impl ResultTable {
    #[must_use]
    pub fn header(&self) -> &'static [&'static str; COLUMN_COUNT] {
        &TABLE_COLUMNS
    }

    #[must_use]
    pub fn rows(&self) -> &[[String; COLUMN_COUNT]] {
        &self.rows
    }

    #[must_use]
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Renders tab-separated text with a header row and a trailing newline.
    ///
    /// Tabs and line breaks inside a cell are replaced by spaces so each record
    /// stays on one line.
    #[must_use]
    pub fn to_tsv(&self) -> String {
        let mut out = TABLE_COLUMNS.join("\t");
        out.push('\n');
        for row in &self.rows {
            let cells: Vec<String> = row.iter().map(|cell| escape_cell(cell)).collect();
            out.push_str(&cells.join("\t"));
            out.push('\n');
        }
        out
    }
}

/// Projects records into a table, one row per record, in the given order.
///
/// An empty slice yields a zero-row table.
#[must_use]
pub fn to_table(records: &[MoleculeRecord]) -> ResultTable {
    ResultTable {
        rows: records.iter().map(project_row).collect(),
    }
}

/// Renders records as a pretty-printed JSON array keyed by the table header names.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn records_to_json(records: &[MoleculeRecord]) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(records)
}

fn project_row(record: &MoleculeRecord) -> [String; COLUMN_COUNT] {
    [
        record.display_name().to_string(),
        record.database_id().to_string(),
        optional_cell(record.structural_notation()),
        optional_cell(record.molecular_mass()),
        optional_cell(record.molecular_formula()),
        optional_cell(record.log_p()),
        optional_cell(record.hydrogen_donor_count()),
        optional_cell(record.hydrogen_acceptor_count()),
    ]
}

fn optional_cell<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn escape_cell(cell: &str) -> String {
    cell.replace(['\t', '\r', '\n'], " ")
}
