//! JSON file serializer.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::PathBuf;

use spendbook_receipts::Receipt;

use crate::serializer::{PersistenceError, Serializer};

/// Serializes the receipt collection to a JSON file.
#[derive(Debug)]
pub struct JsonSerializer {
    path: PathBuf,
}

impl JsonSerializer {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl Serializer for JsonSerializer {
    fn write(&self, receipts: &[Receipt]) -> Result<(), PersistenceError> {
        let file = File::create(&self.path)?;
        serde_json::to_writer_pretty(BufWriter::new(file), receipts)
            .map_err(|e| PersistenceError::Malformed(e.to_string()))
    }

    fn read(&self) -> Result<Vec<Receipt>, PersistenceError> {
        let file = File::open(&self.path)?;
        serde_json::from_reader(BufReader::new(file))
            .map_err(|e| PersistenceError::Malformed(e.to_string()))
    }
}
