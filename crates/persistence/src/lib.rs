//! Persistence collaborator for the receipt collection.
//!
//! The store talks to a [`Serializer`]: write the full ordered collection,
//! read it back as an equivalent object graph. Two file formats are
//! provided; the choice is made once, at construction time, by the caller.

pub mod json;
pub mod serializer;
pub mod xml;

pub use json::JsonSerializer;
pub use serializer::{PersistenceError, Serializer};
pub use xml::XmlSerializer;
