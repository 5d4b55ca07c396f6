//! XML file serializer.

use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use spendbook_receipts::Receipt;

use crate::serializer::{PersistenceError, Serializer};

/// Document wrapper: quick-xml needs a single named root element.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename = "receipts")]
struct ReceiptsDocument {
    #[serde(rename = "receipt", default)]
    receipts: Vec<Receipt>,
}

/// Serializes the receipt collection to an XML file.
#[derive(Debug)]
pub struct XmlSerializer {
    path: PathBuf,
}

impl XmlSerializer {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl Serializer for XmlSerializer {
    fn write(&self, receipts: &[Receipt]) -> Result<(), PersistenceError> {
        let document = ReceiptsDocument {
            receipts: receipts.to_vec(),
        };
        let body = quick_xml::se::to_string(&document)
            .map_err(|e| PersistenceError::Malformed(e.to_string()))?;
        fs::write(&self.path, body)?;
        Ok(())
    }

    fn read(&self) -> Result<Vec<Receipt>, PersistenceError> {
        let body = fs::read_to_string(&self.path)?;
        let document: ReceiptsDocument = quick_xml::de::from_str(&body)
            .map_err(|e| PersistenceError::Malformed(e.to_string()))?;
        Ok(document.receipts)
    }
}
