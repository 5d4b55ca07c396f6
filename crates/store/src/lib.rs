//! Collection manager for the receipt store.
//!
//! [`ReceiptStore`] owns the ordered receipt collection and exposes CRUD,
//! search and cross-receipt spending analytics. Persistence is delegated to
//! a [`spendbook_persistence::Serializer`] collaborator.

pub mod analytics;
pub mod store;

pub use store::ReceiptStore;
