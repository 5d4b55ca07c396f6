//! Spending analytics over the whole collection.
//!
//! Every function here is a read-only pass over the receipts; nothing
//! mutates. Degenerate inputs (empty collection) are guarded explicitly and
//! yield a defined value instead of a numeric fault.

use std::cmp::Ordering;
use std::collections::HashMap;

use chrono::Datelike;
use indexmap::IndexMap;

use spendbook_persistence::Serializer;
use spendbook_receipts::Receipt;

use crate::store::ReceiptStore;

/// How many category lines the ranking reports at most.
const TOP_CATEGORY_LIMIT: usize = 5;

impl<S: Serializer> ReceiptStore<S> {
    /// Sum of every receipt's total spend. 0.0 when the collection is
    /// empty.
    pub fn total_spend_for_all_receipts(&self) -> f64 {
        self.receipts().iter().map(Receipt::total_spend).sum()
    }

    /// Mean of per-week spend sums.
    ///
    /// Receipts are grouped by the ISO calendar week of their date; each
    /// week's products are summed, and the mean is taken over the number of
    /// **distinct weeks represented** (not the number of receipts — kept
    /// for compatibility with the established behaviour despite the name).
    /// An empty collection returns 0.0.
    pub fn average_receipt_spend(&self) -> f64 {
        let mut weekly: HashMap<(i32, u32), f64> = HashMap::new();
        for receipt in self.receipts() {
            let week = receipt.date().iso_week();
            *weekly.entry((week.year(), week.week())).or_insert(0.0) += receipt.total_spend();
        }

        if weekly.is_empty() {
            return 0.0;
        }
        weekly.values().sum::<f64>() / weekly.len() as f64
    }

    /// Top categories ranked by accumulated spend.
    ///
    /// Categories are lower-cased before grouping; a receipt's whole total
    /// is attributed to its category once per receipt. Ties keep
    /// first-encountered order (stable sort). At most five entries, each
    /// rendered as `"<category> : €<amount>\n"` with two decimal places;
    /// fewer distinct categories mean fewer lines, no padding.
    pub fn top_categories_by_spend(&self) -> String {
        let mut by_category: IndexMap<String, f64> = IndexMap::new();
        for receipt in self.receipts() {
            *by_category
                .entry(receipt.category().to_lowercase())
                .or_insert(0.0) += receipt.total_spend();
        }

        let mut ranked: Vec<(String, f64)> = by_category.into_iter().collect();
        ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));

        ranked
            .into_iter()
            .take(TOP_CATEGORY_LIMIT)
            .map(|(category, amount)| format!("{category} : €{amount:.2}\n"))
            .collect()
    }

    /// Payment method usage as percentages.
    ///
    /// Each receipt's `payment_method` field is split on `", "`, so one
    /// receipt can contribute several tokens. Percentages are of total
    /// tokens counted, not of total receipts. Lines follow first-seen token
    /// order, joined with `"\n"`, no trailing newline. Zero tokens yield
    /// the empty string.
    pub fn payment_breakdown(&self) -> String {
        let mut counts: IndexMap<String, u32> = IndexMap::new();
        for receipt in self.receipts() {
            for token in receipt.payment_method().split(", ") {
                *counts.entry(token.to_string()).or_insert(0) += 1;
            }
        }

        let total: u32 = counts.values().sum();
        if total == 0 {
            return String::new();
        }

        counts
            .into_iter()
            .map(|(method, count)| {
                let pct = f64::from(count) / f64::from(total) * 100.0;
                format!("{method}: {pct:.2}%")
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}
