use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

use spendbook_core::{DomainError, DomainResult, Entity, ReceiptId};

use crate::product::{NewProduct, Product};

/// Aggregate root: one purchase event.
///
/// A receipt exclusively owns its product lines. Product ids come from a
/// receipt-scoped counter that starts at 0 and never hands out the same id
/// twice within the counter's lifetime, so ids can have gaps after deletion.
/// The counter is not persisted; deserialization rebuilds it from the loaded
/// products (max live id + 1).
#[derive(Debug, Clone, Serialize)]
pub struct Receipt {
    id: ReceiptId,
    store_name: String,
    category: String,
    description: String,
    date: NaiveDate,
    payment_method: String,
    products: Vec<Product>,
    #[serde(skip)]
    next_product_id: u32,
}

/// Caller-supplied scalar fields of a receipt.
///
/// `payment_method` is free text and may encode several comma-space-separated
/// methods for a single receipt (e.g. `"Cash, Credit Card"`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceiptDetails {
    pub store_name: String,
    pub category: String,
    pub description: String,
    pub date: NaiveDate,
    pub payment_method: String,
}

impl Receipt {
    /// Create a receipt with no products and a fresh surrogate id.
    pub fn new(details: ReceiptDetails) -> Self {
        Self {
            id: ReceiptId::new(),
            store_name: details.store_name,
            category: details.category,
            description: details.description,
            date: details.date,
            payment_method: details.payment_method,
            products: Vec::new(),
            next_product_id: 0,
        }
    }

    pub fn receipt_id(&self) -> ReceiptId {
        self.id
    }

    pub fn store_name(&self) -> &str {
        &self.store_name
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn payment_method(&self) -> &str {
        &self.payment_method
    }

    /// Live products in stable enumeration order (insertion order, not id
    /// order: ids can have gaps after deletion).
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Overwrite the scalar fields. The product set and the surrogate id are
    /// untouched.
    pub fn update_details(&mut self, details: ReceiptDetails) {
        self.store_name = details.store_name;
        self.category = details.category;
        self.description = details.description;
        self.date = details.date;
        self.payment_method = details.payment_method;
    }

    /// Add a product line; the receipt assigns the next counter id.
    ///
    /// Returns the assigned id. Fails on invalid fields, or if the assigned
    /// id is somehow already live (cannot normally occur since ids are
    /// counter-assigned).
    pub fn add_product(&mut self, fields: NewProduct) -> DomainResult<u32> {
        fields.validate()?;

        let id = self.next_product_id;
        if self.products.iter().any(|p| p.product_id() == id) {
            return Err(DomainError::invariant(format!(
                "duplicate product id {id} in receipt"
            )));
        }

        self.next_product_id += 1;
        self.products.push(Product::from_parts(id, fields));
        Ok(id)
    }

    /// Find the product with the given id. Absence is not an error.
    pub fn find_product(&self, id: u32) -> Option<&Product> {
        self.products.iter().find(|p| p.product_id() == id)
    }

    /// Delete the product with the given id.
    ///
    /// Returns whether a removal occurred. The counter does not move back:
    /// deleted ids are never reused within this receipt's lifetime.
    pub fn delete_product(&mut self, id: u32) -> bool {
        let before = self.products.len();
        self.products.retain(|p| p.product_id() != id);
        self.products.len() < before
    }

    /// Overwrite name/price/quantity of the product with the given id.
    ///
    /// The id is untouched. On any failure no partial mutation occurs.
    pub fn update_product(&mut self, id: u32, fields: NewProduct) -> DomainResult<()> {
        fields.validate()?;
        let product = self
            .products
            .iter_mut()
            .find(|p| p.product_id() == id)
            .ok_or(DomainError::NotFound)?;
        product.overwrite(fields);
        Ok(())
    }

    pub fn number_of_products(&self) -> usize {
        self.products.len()
    }

    /// Render the product list for display.
    ///
    /// Empty receipts yield the `"\tNO PRODUCTS FOUND"` sentinel; otherwise
    /// one `<index>: <product>` line per product in enumeration order.
    pub fn list_products(&self) -> String {
        if self.products.is_empty() {
            return "\tNO PRODUCTS FOUND".to_string();
        }
        self.products
            .iter()
            .enumerate()
            .map(|(index, product)| format!("{index}: {product}"))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Total amount spent on this receipt: sum of line totals, 0.0 when empty.
    pub fn total_spend(&self) -> f64 {
        self.products.iter().map(Product::line_total).sum()
    }
}

impl Entity for Receipt {
    type Id = ReceiptId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

// The product-id counter is bookkeeping, not identity: two receipts with the
// same fields and the same live products are equal even if their counters
// diverged through deletions.
impl PartialEq for Receipt {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
            && self.store_name == other.store_name
            && self.category == other.category
            && self.description == other.description
            && self.date == other.date
            && self.payment_method == other.payment_method
            && self.products == other.products
    }
}

impl core::fmt::Display for Receipt {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "{}, {}, {}, {}, {}, {} products",
            self.store_name,
            self.category,
            self.description,
            self.date,
            self.payment_method,
            self.products.len()
        )
    }
}

impl<'de> Deserialize<'de> for Receipt {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde::de::Error;
        use std::collections::HashSet;

        #[derive(Deserialize)]
        struct Stored {
            id: ReceiptId,
            store_name: String,
            category: String,
            description: String,
            date: NaiveDate,
            payment_method: String,
            #[serde(default)]
            products: Vec<Product>,
        }

        let stored = Stored::deserialize(deserializer)?;

        // Stored products get the same scrutiny as caller-supplied ones:
        // ids must be unique within the receipt and every field must hold
        // the construction-time invariants. A file that fails either check
        // is malformed, not a receipt.
        let mut seen = HashSet::new();
        for product in &stored.products {
            product.validate().map_err(D::Error::custom)?;
            if !seen.insert(product.product_id()) {
                return Err(D::Error::custom(format!(
                    "duplicate product id {} in receipt",
                    product.product_id()
                )));
            }
        }

        let next_product_id = stored
            .products
            .iter()
            .map(|p| p.product_id() + 1)
            .max()
            .unwrap_or(0);

        Ok(Self {
            id: stored.id,
            store_name: stored.store_name,
            category: stored.category,
            description: stored.description,
            date: stored.date,
            payment_method: stored.payment_method,
            products: stored.products,
            next_product_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2023, 4, 13).unwrap()
    }

    fn grocery_receipt() -> Receipt {
        Receipt::new(ReceiptDetails {
            store_name: "Tesco".to_string(),
            category: "Groceries".to_string(),
            description: "Weekly shopping".to_string(),
            date: test_date(),
            payment_method: "Debit Card".to_string(),
        })
    }

    #[test]
    fn add_product_assigns_sequential_ids_from_zero() {
        let mut receipt = grocery_receipt();
        let first = receipt.add_product(NewProduct::new("Milk", 1.99, 1)).unwrap();
        let second = receipt.add_product(NewProduct::new("Bread", 2.49, 2)).unwrap();
        assert_eq!(first, 0);
        assert_eq!(second, 1);
        assert_eq!(receipt.number_of_products(), 2);
    }

    #[test]
    fn deleted_ids_are_never_reused() {
        let mut receipt = grocery_receipt();
        receipt.add_product(NewProduct::new("Milk", 1.99, 1)).unwrap();
        receipt.add_product(NewProduct::new("Bread", 2.49, 2)).unwrap();
        assert!(receipt.delete_product(1));

        let third = receipt.add_product(NewProduct::new("Eggs", 3.10, 1)).unwrap();
        assert_eq!(third, 2);
        assert!(receipt.find_product(1).is_none());
    }

    #[test]
    fn add_product_rejects_invalid_fields() {
        let mut receipt = grocery_receipt();
        assert!(receipt.add_product(NewProduct::new("", 1.0, 1)).is_err());
        assert!(receipt.add_product(NewProduct::new("Milk", -1.0, 1)).is_err());
        assert!(receipt.add_product(NewProduct::new("Milk", 1.0, 0)).is_err());
        assert_eq!(receipt.number_of_products(), 0);
    }

    #[test]
    fn find_product_returns_none_for_unknown_id() {
        let mut receipt = grocery_receipt();
        receipt.add_product(NewProduct::new("Milk", 1.99, 1)).unwrap();
        assert!(receipt.find_product(0).is_some());
        assert!(receipt.find_product(7).is_none());
    }

    #[test]
    fn delete_product_reports_whether_removal_occurred() {
        let mut receipt = grocery_receipt();
        receipt.add_product(NewProduct::new("Milk", 1.99, 1)).unwrap();
        assert!(receipt.delete_product(0));
        assert!(!receipt.delete_product(0));
        assert_eq!(receipt.number_of_products(), 0);
    }

    #[test]
    fn update_product_overwrites_fields_but_not_id() {
        let mut receipt = grocery_receipt();
        let id = receipt.add_product(NewProduct::new("Milk", 1.99, 1)).unwrap();

        receipt
            .update_product(id, NewProduct::new("Oat Milk", 2.29, 2))
            .unwrap();

        let product = receipt.find_product(id).unwrap();
        assert_eq!(product.product_id(), id);
        assert_eq!(product.name(), "Oat Milk");
        assert_eq!(product.unit_price(), 2.29);
        assert_eq!(product.quantity(), 2);
    }

    #[test]
    fn update_product_fails_without_partial_mutation() {
        let mut receipt = grocery_receipt();
        let id = receipt.add_product(NewProduct::new("Milk", 1.99, 1)).unwrap();

        let err = receipt
            .update_product(id, NewProduct::new("", 2.29, 2))
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));

        let product = receipt.find_product(id).unwrap();
        assert_eq!(product.name(), "Milk");
        assert_eq!(product.unit_price(), 1.99);

        let err = receipt
            .update_product(99, NewProduct::new("Oat Milk", 2.29, 2))
            .unwrap_err();
        assert_eq!(err, DomainError::NotFound);
    }

    #[test]
    fn list_products_uses_sentinel_when_empty() {
        let receipt = grocery_receipt();
        assert_eq!(receipt.list_products(), "\tNO PRODUCTS FOUND");
    }

    #[test]
    fn list_products_renders_display_index_not_product_id() {
        let mut receipt = grocery_receipt();
        receipt.add_product(NewProduct::new("Milk", 1.99, 1)).unwrap();
        receipt.add_product(NewProduct::new("Bread", 2.49, 2)).unwrap();
        receipt.delete_product(0);
        receipt.add_product(NewProduct::new("Eggs", 3.10, 1)).unwrap();

        // Display index 0 now holds product id 1; ids keep their gaps.
        let listing = receipt.list_products();
        assert_eq!(
            listing,
            "0: [1] Bread, €2.49 x 2\n1: [2] Eggs, €3.10 x 1"
        );
    }

    #[test]
    fn total_spend_sums_line_totals() {
        let mut receipt = grocery_receipt();
        assert_eq!(receipt.total_spend(), 0.0);

        receipt.add_product(NewProduct::new("Milk", 1.99, 1)).unwrap();
        receipt.add_product(NewProduct::new("Bread", 2.50, 2)).unwrap();
        assert_eq!(receipt.total_spend(), 1.99 + 5.00);
    }

    #[test]
    fn update_details_leaves_products_untouched() {
        let mut receipt = grocery_receipt();
        receipt.add_product(NewProduct::new("Milk", 1.99, 1)).unwrap();

        receipt.update_details(ReceiptDetails {
            store_name: "Dunnes".to_string(),
            category: "Food".to_string(),
            description: "Monthly shopping".to_string(),
            date: test_date(),
            payment_method: "Cash".to_string(),
        });

        assert_eq!(receipt.store_name(), "Dunnes");
        assert_eq!(receipt.number_of_products(), 1);
        assert_eq!(receipt.find_product(0).unwrap().name(), "Milk");
    }

    #[test]
    fn serde_round_trip_rebuilds_the_product_counter() {
        let mut receipt = grocery_receipt();
        receipt.add_product(NewProduct::new("Milk", 1.99, 1)).unwrap();
        receipt.add_product(NewProduct::new("Bread", 2.49, 2)).unwrap();
        receipt.delete_product(0);

        let json = serde_json::to_string(&receipt).unwrap();
        let mut loaded: Receipt = serde_json::from_str(&json).unwrap();
        assert_eq!(loaded, receipt);

        // Counter resumes past the highest loaded id: no collision with the
        // surviving product.
        let id = loaded.add_product(NewProduct::new("Eggs", 3.10, 1)).unwrap();
        assert_eq!(id, 2);
    }

    fn stored_json(products: &str) -> String {
        format!(
            r#"{{
                "id": "{}",
                "store_name": "Tesco",
                "category": "Groceries",
                "description": "Weekly shopping",
                "date": "2023-04-13",
                "payment_method": "Debit Card",
                "products": {products}
            }}"#,
            ReceiptId::new()
        )
    }

    #[test]
    fn load_rejects_duplicate_product_ids() {
        let json = stored_json(
            r#"[
                {"id": 0, "name": "Milk", "unit_price": 1.99, "quantity": 1},
                {"id": 0, "name": "Bread", "unit_price": 2.49, "quantity": 2}
            ]"#,
        );

        let err = serde_json::from_str::<Receipt>(&json).unwrap_err();
        assert!(err.to_string().contains("duplicate product id 0"));
    }

    #[test]
    fn load_rejects_products_with_invalid_fields() {
        for products in [
            r#"[{"id": 0, "name": "", "unit_price": 1.99, "quantity": 1}]"#,
            r#"[{"id": 0, "name": "Milk", "unit_price": -1.0, "quantity": 1}]"#,
            r#"[{"id": 0, "name": "Milk", "unit_price": 1.99, "quantity": 0}]"#,
        ] {
            assert!(serde_json::from_str::<Receipt>(&stored_json(products)).is_err());
        }
    }

    #[test]
    fn equality_ignores_the_counter() {
        let mut a = grocery_receipt();
        let b = a.clone();
        a.add_product(NewProduct::new("Milk", 1.99, 1)).unwrap();
        a.delete_product(0);

        // Same fields, same (empty) product set, diverged counters.
        assert_eq!(a, b);
    }

    #[test]
    fn display_renders_scalar_fields_and_product_count() {
        let mut receipt = grocery_receipt();
        receipt.add_product(NewProduct::new("Milk", 1.99, 1)).unwrap();
        assert_eq!(
            receipt.to_string(),
            "Tesco, Groceries, Weekly shopping, 2023-04-13, Debit Card, 1 products"
        );
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig {
                cases: 256,
                ..ProptestConfig::default()
            })]

            /// Property: ids are unique among live products and strictly
            /// increasing in assignment order, for any add/delete sequence.
            #[test]
            fn product_ids_stay_unique_and_monotonic(
                ops in prop::collection::vec(prop_oneof![
                    (1u32..100).prop_map(|q| Some(q)),
                    (0u32..10).prop_map(|_| None),
                ], 1..40)
            ) {
                let mut receipt = grocery_receipt();
                let mut assigned: Vec<u32> = Vec::new();
                let mut delete_cursor = 0u32;

                for op in ops {
                    match op {
                        Some(quantity) => {
                            let id = receipt
                                .add_product(NewProduct::new("Item", 1.0, quantity))
                                .unwrap();
                            prop_assert!(assigned.iter().all(|&seen| seen < id));
                            assigned.push(id);
                        }
                        None => {
                            receipt.delete_product(delete_cursor);
                            delete_cursor += 1;
                        }
                    }
                }

                let mut live: Vec<u32> = receipt
                    .products()
                    .iter()
                    .map(|p| p.product_id())
                    .collect();
                live.sort_unstable();
                live.dedup();
                prop_assert_eq!(live.len(), receipt.number_of_products());
            }

            /// Property: total spend equals the sum of price*quantity over
            /// the live products.
            #[test]
            fn total_spend_matches_manual_sum(
                lines in prop::collection::vec((0.0f64..1000.0, 1u32..50), 0..20)
            ) {
                let mut receipt = grocery_receipt();
                let mut expected = 0.0;
                for (price, quantity) in &lines {
                    receipt
                        .add_product(NewProduct::new("Item", *price, *quantity))
                        .unwrap();
                    expected += price * f64::from(*quantity);
                }
                prop_assert!((receipt.total_spend() - expected).abs() < 1e-9);
            }
        }
    }
}
