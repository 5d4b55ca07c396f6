//! Receipts domain module.
//!
//! This crate contains the receipt/product aggregate: a `Receipt` exclusively
//! owns its product lines and is the only component allowed to mutate them.
//! Pure domain logic (no IO, no storage).

pub mod product;
pub mod receipt;

pub use product::{NewProduct, Product};
pub use receipt::{Receipt, ReceiptDetails};
