mod input;
mod menu;

use spendbook_persistence::XmlSerializer;
use spendbook_store::ReceiptStore;

fn main() -> anyhow::Result<()> {
    spendbook_observability::init();

    // Swap in JsonSerializer::new("receipts.json") for JSON storage.
    let store = ReceiptStore::new(XmlSerializer::new("receipts.xml"));

    menu::run(store)
}
