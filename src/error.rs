use itertools::Itertools;
use std::fmt;
use thiserror::Error;

use crate::model::validate::FieldError;

/// One rejected element of an import, by its position in the input array.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct RecordError {
    pub index: usize,
    pub fields: Vec<FieldError>,
}

impl fmt::Display for RecordError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}: {}", self.index, self.fields.iter().join(", "))
    }
}

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("file is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("expected a JSON array of programs")]
    NotAnArray,
    #[error("{} invalid record(s): {}", .0.len(), .0.iter().join("; "))]
    InvalidRecords(Vec<RecordError>),
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("no program at index {index}, list has {len}")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("import rejected, {0}")]
    Import(#[from] ImportError),
    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}
