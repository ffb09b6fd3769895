//! # Inventory Purchases
//!
//! The partner dashboard loads purchase rows page by page and shows running
//! per-item totals. [`PurchaseStore`] is the in-memory side of that: pages
//! merge by purchase id so a re-fetched page never double counts, and the
//! backend-reported row count drives "load more".

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Purchase {
    pub id: String,
    pub item: String,
    pub quantity: u32,
    pub unit_price: f64,
}

impl Purchase {
    pub fn spend(&self) -> f64 {
        f64::from(self.quantity) * self.unit_price
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemTotals {
    /// Wider than the row type so summing rows cannot overflow.
    pub quantity: u64,
    pub spend: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InventorySummary {
    /// Keyed by item name, ordered for stable rendering.
    pub items: BTreeMap<String, ItemTotals>,
    pub total_quantity: u64,
    pub total_spend: f64,
}

#[derive(Debug, Default)]
pub struct PurchaseStore {
    rows: HashMap<String, Purchase>,
    total_count: usize,
}

impl PurchaseStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merges one fetched page. Rows already present are replaced, not
    /// duplicated, so overlapping or repeated pages are harmless.
    /// `total_count` is the backend's count over the whole result set.
    pub fn merge_page(&mut self, rows: Vec<Purchase>, total_count: usize) {
        self.total_count = total_count;
        for row in rows {
            self.rows.insert(row.id.clone(), row);
        }
    }

    pub fn loaded(&self) -> usize {
        self.rows.len()
    }

    pub fn total_count(&self) -> usize {
        self.total_count
    }

    pub fn has_more(&self) -> bool {
        self.rows.len() < self.total_count
    }

    pub fn summary(&self) -> InventorySummary {
        let mut summary = InventorySummary::default();

        for row in self.rows.values() {
            let totals = summary.items.entry(row.item.clone()).or_default();
            totals.quantity += u64::from(row.quantity);
            totals.spend += row.spend();

            summary.total_quantity += u64::from(row.quantity);
            summary.total_spend += row.spend();
        }

        summary
    }
}
