use serde::{Deserialize, Serialize};

use spendbook_core::{DomainError, DomainResult, Entity};

/// A purchased line item within a receipt.
///
/// The id is receipt-scoped: assigned by the owning receipt's counter at
/// insertion time, never supplied by callers and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    id: u32,
    name: String,
    unit_price: f64,
    quantity: u32,
}

impl Product {
    pub(crate) fn from_parts(id: u32, fields: NewProduct) -> Self {
        Self {
            id,
            name: fields.name,
            unit_price: fields.unit_price,
            quantity: fields.quantity,
        }
    }

    pub fn product_id(&self) -> u32 {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn unit_price(&self) -> f64 {
        self.unit_price
    }

    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Spend contributed by this line: unit price times quantity bought.
    pub fn line_total(&self) -> f64 {
        self.unit_price * f64::from(self.quantity)
    }

    pub(crate) fn overwrite(&mut self, fields: NewProduct) {
        // The id stays untouched.
        self.name = fields.name;
        self.unit_price = fields.unit_price;
        self.quantity = fields.quantity;
    }

    /// Re-check the field invariants, for products that bypassed
    /// [`NewProduct::validate`] (deserialized from a file).
    pub(crate) fn validate(&self) -> DomainResult<()> {
        validate_fields(&self.name, self.unit_price, self.quantity)
    }
}

impl Entity for Product {
    type Id = u32;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl core::fmt::Display for Product {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "[{}] {}, €{:.2} x {}",
            self.id, self.name, self.unit_price, self.quantity
        )
    }
}

/// Caller-supplied product fields. The id is never part of this value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewProduct {
    pub name: String,
    pub unit_price: f64,
    pub quantity: u32,
}

impl NewProduct {
    pub fn new(name: impl Into<String>, unit_price: f64, quantity: u32) -> Self {
        Self {
            name: name.into(),
            unit_price,
            quantity,
        }
    }

    pub(crate) fn validate(&self) -> DomainResult<()> {
        validate_fields(&self.name, self.unit_price, self.quantity)
    }
}

fn validate_fields(name: &str, unit_price: f64, quantity: u32) -> DomainResult<()> {
    if name.trim().is_empty() {
        return Err(DomainError::validation("product name cannot be empty"));
    }
    if !unit_price.is_finite() || unit_price < 0.0 {
        return Err(DomainError::validation("unit price must be non-negative"));
    }
    if quantity == 0 {
        return Err(DomainError::validation("quantity must be positive"));
    }
    Ok(())
}
