// Copyright © Aptos Foundation
// SPDX-License-Identifier: Apache-2.0

//! Rows exchanged with the column store client.

/// The atomic unit of stored data: one named, timestamped value.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ColumnEntry {
    pub name: Vec<u8>,
    pub value: Vec<u8>,
    pub timestamp: i64,
}

impl ColumnEntry {
    pub fn new(name: impl Into<Vec<u8>>, value: impl Into<Vec<u8>>, timestamp: i64) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            timestamp,
        }
    }
}

/// A named group of columns within a super family row.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SuperColumnEntry {
    pub name: Vec<u8>,
    pub columns: Vec<ColumnEntry>,
}

impl SuperColumnEntry {
    pub fn new(name: impl Into<Vec<u8>>, columns: Vec<ColumnEntry>) -> Self {
        Self {
            name: name.into(),
            columns,
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum RowColumns {
    Standard(Vec<ColumnEntry>),
    Super(Vec<SuperColumnEntry>),
}

impl RowColumns {
    pub fn is_super(&self) -> bool {
        matches!(self, RowColumns::Super(_))
    }

    fn kind(&self) -> &'static str {
        if self.is_super() {
            "super"
        } else {
            "standard"
        }
    }
}

/// A single row of a column family.
///
/// The keyspace and family travel with the row so the storage client can
/// build column paths without the descriptor.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RowData {
    pub keyspace: String,
    pub family: String,
    pub key: Vec<u8>,
    pub columns: RowColumns,
}

impl RowData {
    pub fn standard(
        keyspace: impl Into<String>,
        family: impl Into<String>,
        key: impl Into<Vec<u8>>,
        columns: Vec<ColumnEntry>,
    ) -> Self {
        Self {
            keyspace: keyspace.into(),
            family: family.into(),
            key: key.into(),
            columns: RowColumns::Standard(columns),
        }
    }

    pub fn with_super_columns(
        keyspace: impl Into<String>,
        family: impl Into<String>,
        key: impl Into<Vec<u8>>,
        super_columns: Vec<SuperColumnEntry>,
    ) -> Self {
        Self {
            keyspace: keyspace.into(),
            family: family.into(),
            key: key.into(),
            columns: RowColumns::Super(super_columns),
        }
    }

    pub fn is_super(&self) -> bool {
        self.columns.is_super()
    }

    /// "standard" or "super", for diagnostics.
    pub fn kind(&self) -> &'static str {
        self.columns.kind()
    }

    /// Columns of a standard row, `None` for a super row.
    pub fn standard_columns(&self) -> Option<&[ColumnEntry]> {
        match &self.columns {
            RowColumns::Standard(columns) => Some(columns),
            RowColumns::Super(_) => None,
        }
    }

    /// Super columns of a super row, `None` for a standard row.
    pub fn super_columns(&self) -> Option<&[SuperColumnEntry]> {
        match &self.columns {
            RowColumns::Standard(_) => None,
            RowColumns::Super(super_columns) => Some(super_columns),
        }
    }

    /// Total number of leaf columns in the row.
    pub fn column_count(&self) -> usize {
        match &self.columns {
            RowColumns::Standard(columns) => columns.len(),
            RowColumns::Super(super_columns) => {
                super_columns.iter().map(|sc| sc.columns.len()).sum()
            },
        }
    }
}
