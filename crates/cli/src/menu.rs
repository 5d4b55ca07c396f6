//! Interactive text menu: thin IO glue over the receipt store.
//!
//! No business logic lives here; every choice reads input, calls one store
//! or receipt operation, and prints the outcome.

use std::io;

use spendbook_persistence::Serializer;
use spendbook_receipts::{NewProduct, Receipt, ReceiptDetails};
use spendbook_store::ReceiptStore;

use crate::input;

const MAIN_MENU: &str = "
----------------------------------
|         RECEIPT TRACKER        |
----------------------------------
| RECEIPT MENU                   |
|   1) Add a receipt             |
|   2) List receipts             |
|   3) Update a receipt          |
|   4) Delete a receipt          |
|   5) Search receipts           |
----------------------------------
| PRODUCT MENU                   |
|   6) Add product to receipt    |
|   7) List products in receipt  |
|   8) Delete product in receipt |
|   9) Number of products        |
|   10) Update product info      |
----------------------------------
| SPENDING ANALYSIS MENU         |
|   11) Open menu                |
----------------------------------
|   20) Save receipts            |
|   21) Load receipts            |
----------------------------------
|   0) Exit                      |
----------------------------------
==>> ";

const SPENDING_MENU: &str = "
----------------------------------
|     SPENDING ANALYSIS MENU     |
----------------------------------
|   1) Total spending            |
|   2) Average receipt spend     |
|   3) Top 5 categories of spend |
|   4) Payment type breakdown    |
----------------------------------
|   0) Back                      |
----------------------------------
==>> ";

pub fn run<S: Serializer>(mut store: ReceiptStore<S>) -> anyhow::Result<()> {
    loop {
        match input::read_int(MAIN_MENU)? {
            1 => add_receipt(&mut store)?,
            2 => println!("{}", store.list_all_receipts()),
            3 => update_receipt(&mut store)?,
            4 => delete_receipt(&mut store)?,
            5 => search_receipts(&store)?,
            6 => add_product_to_receipt(&mut store)?,
            7 => list_products_in_receipt(&store)?,
            8 => delete_product_in_receipt(&mut store)?,
            9 => number_of_products(&store)?,
            10 => update_product(&mut store)?,
            11 => run_spending_menu(&store)?,
            20 => save(&store),
            21 => load(&mut store),
            0 => {
                println!("Exiting...bye");
                return Ok(());
            }
            other => println!("invalid option entered: {other}"),
        }
    }
}

fn run_spending_menu<S: Serializer>(store: &ReceiptStore<S>) -> io::Result<()> {
    loop {
        match input::read_int(SPENDING_MENU)? {
            1 => println!("Total spend: €{:.2}", store.total_spend_for_all_receipts()),
            2 => println!("Average receipt spend: €{:.2}", store.average_receipt_spend()),
            3 => {
                println!("Top 5 categories of spend: ");
                print!("{}", store.top_categories_by_spend());
            }
            4 => println!("{}", store.payment_breakdown()),
            0 => return Ok(()),
            other => println!("invalid option entered: {other}"),
        }
    }
}

/// Prints the current listing; false when there is nothing to work on.
fn check_receipts<S: Serializer>(store: &ReceiptStore<S>) -> bool {
    let listing = store.list_all_receipts();
    println!("{listing}");
    listing != "No receipts stored"
}

fn read_details(prefix: &str) -> io::Result<ReceiptDetails> {
    Ok(ReceiptDetails {
        store_name: input::read_line(&format!("Enter the {prefix}store name for the receipt: "))?,
        category: input::read_line(&format!("Enter the {prefix}category of receipt: "))?,
        description: input::read_line(&format!("Enter the {prefix}receipt description: "))?,
        date: input::read_date(&format!("Enter the {prefix}date of the receipt, (13/04/23): "))?,
        payment_method: input::read_line(&format!(
            "Enter the {prefix}payment method, (cash, card): "
        ))?,
    })
}

fn read_product_fields(prefix: &str) -> io::Result<NewProduct> {
    Ok(NewProduct {
        name: input::read_line(&format!("Enter the {prefix}product name: "))?,
        unit_price: input::read_f64(&format!("Enter the {prefix}price of the product: "))?,
        quantity: input::read_u32(&format!("Enter the {prefix}quantity bought: "))?,
    })
}

fn add_receipt<S: Serializer>(store: &mut ReceiptStore<S>) -> io::Result<()> {
    let details = read_details("")?;
    store.add(Receipt::new(details));
    println!("Receipt added successfully");
    Ok(())
}

fn update_receipt<S: Serializer>(store: &mut ReceiptStore<S>) -> io::Result<()> {
    tracing::info!("update receipt requested");
    if !check_receipts(store) {
        return Ok(());
    }

    let index = input::read_int("Enter the index of the receipt you want to update: ")?;
    let details = read_details("new ")?;

    let updated = input::to_index(index)
        .map(|i| store.update_receipt(i, details))
        .unwrap_or(false);
    if updated {
        println!("Receipt updated!");
    } else {
        println!("There is no receipt at that index");
    }
    Ok(())
}

fn delete_receipt<S: Serializer>(store: &mut ReceiptStore<S>) -> io::Result<()> {
    if !check_receipts(store) {
        return Ok(());
    }

    let index = input::read_int("Enter the index of the receipt you want to delete: ")?;
    match input::to_index(index).and_then(|i| store.remove(i)) {
        Some(_) => println!("Receipt deleted!"),
        None => println!("There is no receipt at that index"),
    }
    Ok(())
}

fn search_receipts<S: Serializer>(store: &ReceiptStore<S>) -> io::Result<()> {
    if !check_receipts(store) {
        return Ok(());
    }
    let term = input::read_line("Enter store name to search receipts: ")?;
    println!("{}", store.search_receipts(&term));
    Ok(())
}

fn add_product_to_receipt<S: Serializer>(store: &mut ReceiptStore<S>) -> io::Result<()> {
    if !check_receipts(store) {
        return Ok(());
    }

    let index = input::read_int("Enter the index of the receipt to add a product: ")?;
    let Some(receipt) = input::to_index(index).and_then(|i| store.find_receipt_mut(i)) else {
        println!("There is no receipt at that index");
        return Ok(());
    };

    let fields = read_product_fields("")?;
    match receipt.add_product(fields) {
        Ok(_) => println!("Product added successfully!"),
        Err(e) => println!("Add failed: {e}"),
    }
    Ok(())
}

fn list_products_in_receipt<S: Serializer>(store: &ReceiptStore<S>) -> io::Result<()> {
    if !check_receipts(store) {
        return Ok(());
    }
    let index = input::read_int("Enter the index of the receipt to list products: ")?;
    match input::to_index(index).and_then(|i| store.find_receipt(i)) {
        Some(receipt) => println!("{}", receipt.list_products()),
        None => println!("There is no receipt at that index"),
    }
    Ok(())
}

fn delete_product_in_receipt<S: Serializer>(store: &mut ReceiptStore<S>) -> io::Result<()> {
    if !check_receipts(store) {
        return Ok(());
    }

    let index = input::read_int("Enter the index of the receipt to delete a product: ")?;
    let Some(receipt) = input::to_index(index).and_then(|i| store.find_receipt_mut(i)) else {
        println!("There is no receipt at that index");
        return Ok(());
    };

    println!("{}", receipt.list_products());
    let id = input::read_u32("Enter the id of the product you want to delete: ")?;
    if receipt.delete_product(id) {
        println!("Product deleted!");
    } else {
        println!("There is no product with that id");
    }
    Ok(())
}

fn number_of_products<S: Serializer>(store: &ReceiptStore<S>) -> io::Result<()> {
    if !check_receipts(store) {
        return Ok(());
    }
    let index = input::read_int("Enter the index of the receipt to get number of products: ")?;
    match input::to_index(index).and_then(|i| store.find_receipt(i)) {
        Some(receipt) => println!("{}", receipt.number_of_products()),
        None => println!("There is no receipt at that index"),
    }
    Ok(())
}

fn update_product<S: Serializer>(store: &mut ReceiptStore<S>) -> io::Result<()> {
    if !check_receipts(store) {
        return Ok(());
    }

    let index = input::read_int("Enter the index of the receipt to update a product: ")?;
    let Some(receipt) = input::to_index(index).and_then(|i| store.find_receipt_mut(i)) else {
        println!("There is no receipt at that index");
        return Ok(());
    };

    println!("{}", receipt.list_products());
    let id = input::read_u32("Enter the id of the product you would like to update: ")?;
    let fields = read_product_fields("new ")?;
    match receipt.update_product(id, fields) {
        Ok(()) => println!("Product updated!"),
        Err(e) => println!("Update failed: {e}"),
    }
    Ok(())
}

fn save<S: Serializer>(store: &ReceiptStore<S>) {
    if let Err(e) = store.save() {
        eprintln!("Error writing to file: {e}");
    }
}

fn load<S: Serializer>(store: &mut ReceiptStore<S>) {
    if let Err(e) = store.load() {
        eprintln!("Error reading from file: {e}");
    }
}
