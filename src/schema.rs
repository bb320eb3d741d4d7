use crate::backup_window::BackupWindow;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const COL_PEDIDO: &str = "PEDIDO";
pub const COL_STATUS: &str = "STATUS";
pub const COL_DATA: &str = "DATA";
pub const COL_VALOR: &str = "VALOR";
pub const COL_UNIDADE: &str = "UNIDADE";
pub const COL_CARRO: &str = "CARRO | UTILIZAÇÃO";
pub const COL_FORNECEDOR: &str = "FORNECEDOR";

pub const ALTA_SHEET: &str = "ALTA";
pub const EMERGENCIAL_SHEET: &str = "EMERGENCIAL";

/// One purchase-order row after normalization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Raw `PEDIDO` cell; matching happens on its trimmed, uppercased form.
    pub order_id: String,
    pub status: String,
    /// `None` only when the table has no `DATA` column at all.
    pub date: Option<NaiveDate>,
    pub amount: f64,
    pub requesting_unit: String,
    pub vehicle_usage: String,
    pub supplier: String,
}

/// A normalized worksheet: deduplicated column names plus its surviving rows.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Table {
    pub columns: Vec<String>,
    pub records: Vec<Record>,
}

impl Table {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c == name)
    }
}

/// Where a hit came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SourceTable {
    Alta,
    Emergencial,
    Backup(BackupWindow),
}

impl SourceTable {
    /// Origin label shown next to a hit; for the backup tab this is its worksheet name.
    pub fn label(&self) -> String {
        match self {
            SourceTable::Alta => ALTA_SHEET.to_string(),
            SourceTable::Emergencial => EMERGENCIAL_SHEET.to_string(),
            SourceTable::Backup(window) => window.label(),
        }
    }
}

impl fmt::Display for SourceTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

/// A source table that failed to load for a reason other than "not found".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceDiagnostic {
    pub sheet: String,
    pub message: String,
}

/// The three source tables for one day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoadedTables {
    pub alta: Table,
    pub emergencial: Table,
    pub backup: Table,
    pub backup_window: BackupWindow,
    pub diagnostics: Vec<SourceDiagnostic>,
}

impl LoadedTables {
    /// Tables in presentation order: ALTA, EMERGENCIAL, backup.
    pub fn sources(&self) -> [(SourceTable, &Table); 3] {
        [
            (SourceTable::Alta, &self.alta),
            (SourceTable::Emergencial, &self.emergencial),
            (SourceTable::Backup(self.backup_window), &self.backup),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LookupHit {
    pub origin: SourceTable,
    pub record: Record,
}

/// Result of one search: at most one hit per source table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LookupOutcome {
    /// The query as typed by the operator.
    pub query: String,
    pub hits: Vec<LookupHit>,
    pub backup_window: BackupWindow,
    pub diagnostics: Vec<SourceDiagnostic>,
}

impl LookupOutcome {
    pub fn is_empty_query(&self) -> bool {
        self.query.trim().is_empty()
    }

    pub fn is_not_found(&self) -> bool {
        !self.is_empty_query() && self.hits.is_empty()
    }

    pub fn hit_for(&self, origin: &SourceTable) -> Option<&LookupHit> {
        self.hits.iter().find(|hit| &hit.origin == origin)
    }
}
