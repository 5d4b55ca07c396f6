use spendbook_core::ReceiptId;
use spendbook_persistence::{PersistenceError, Serializer};
use spendbook_receipts::{Receipt, ReceiptDetails};

/// Owns the ordered receipt collection.
///
/// The position of a receipt in the sequence is its externally visible
/// index. Indices are dense and **not stable across deletions**: removing
/// element `k` shifts every later index down by one. A stable surrogate
/// [`ReceiptId`] is available via [`ReceiptStore::find_by_id`] for callers
/// that need identity across mutation.
#[derive(Debug)]
pub struct ReceiptStore<S> {
    receipts: Vec<Receipt>,
    serializer: S,
}

impl<S: Serializer> ReceiptStore<S> {
    pub fn new(serializer: S) -> Self {
        Self {
            receipts: Vec::new(),
            serializer,
        }
    }

    /// Append a receipt to the end of the sequence. No duplicate check.
    pub fn add(&mut self, receipt: Receipt) {
        tracing::debug!(receipt_id = %receipt.receipt_id(), "adding receipt");
        self.receipts.push(receipt);
    }

    pub fn number_of_receipts(&self) -> usize {
        self.receipts.len()
    }

    /// Full ordered collection (read-only).
    pub fn receipts(&self) -> &[Receipt] {
        &self.receipts
    }

    /// Bounds-checked lookup by index. Out-of-range is not-found, never a
    /// panic.
    pub fn find_receipt(&self, index: usize) -> Option<&Receipt> {
        self.receipts.get(index)
    }

    /// Mutable lookup by index, for product operations scoped to one
    /// receipt.
    pub fn find_receipt_mut(&mut self, index: usize) -> Option<&mut Receipt> {
        self.receipts.get_mut(index)
    }

    /// Lookup by stable surrogate id.
    pub fn find_by_id(&self, id: ReceiptId) -> Option<&Receipt> {
        self.receipts.iter().find(|r| r.receipt_id() == id)
    }

    /// Render the whole collection, one `<index>: <receipt>` line per
    /// receipt, or the `"No receipts stored"` sentinel.
    pub fn list_all_receipts(&self) -> String {
        if self.receipts.is_empty() {
            return "No receipts stored".to_string();
        }
        Self::format_listing(self.receipts.iter().enumerate())
    }

    /// Case-insensitive substring search against store names only.
    ///
    /// Matches keep the index they hold in the full sequence, not their
    /// position in the filtered result.
    pub fn search_receipts(&self, term: &str) -> String {
        let needle = term.to_lowercase();
        Self::format_listing(
            self.receipts
                .iter()
                .enumerate()
                .filter(|(_, r)| r.store_name().to_lowercase().contains(&needle)),
        )
    }

    /// Remove the first receipt equal to `receipt`. Returns whether a
    /// removal occurred. Later indices shift down by one.
    pub fn delete_receipt(&mut self, receipt: &Receipt) -> bool {
        match self.receipts.iter().position(|r| r == receipt) {
            Some(index) => {
                self.receipts.remove(index);
                tracing::debug!(index, "deleted receipt");
                true
            }
            None => false,
        }
    }

    /// Remove the receipt at `index`, returning it. Later indices shift
    /// down by one.
    pub fn remove(&mut self, index: usize) -> Option<Receipt> {
        if index < self.receipts.len() {
            Some(self.receipts.remove(index))
        } else {
            None
        }
    }

    /// Overwrite the scalar fields of the receipt at `index`; its product
    /// set is untouched. Returns whether the index was valid.
    pub fn update_receipt(&mut self, index: usize, details: ReceiptDetails) -> bool {
        match self.receipts.get_mut(index) {
            Some(receipt) => {
                receipt.update_details(details);
                true
            }
            None => false,
        }
    }

    /// Durably write the collection through the serializer. Errors
    /// propagate untouched; the caller reports.
    pub fn save(&self) -> Result<(), PersistenceError> {
        self.serializer.write(&self.receipts)?;
        tracing::info!(count = self.receipts.len(), "saved receipt collection");
        Ok(())
    }

    /// Replace the in-memory collection with the serialized one.
    pub fn load(&mut self) -> Result<(), PersistenceError> {
        self.receipts = self.serializer.read()?;
        tracing::info!(count = self.receipts.len(), "loaded receipt collection");
        Ok(())
    }

    fn format_listing<'a>(entries: impl Iterator<Item = (usize, &'a Receipt)>) -> String {
        entries
            .map(|(index, receipt)| format!("{index}: {receipt}"))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
