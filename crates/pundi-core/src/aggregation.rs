//! Dashboard totals and history filtering derived from a transaction list.

use std::collections::HashMap;

use pundi_domain::{DateWindow, Transaction};
use rust_decimal::Decimal;
use serde::Serialize;

/// Expense total for one category, in first-seen order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryTotal {
    pub category: String,
    pub amount: Decimal,
}

/// Income, expense and balance plus the per-category expense breakdown.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DashboardTotals {
    pub income: Decimal,
    pub expense: Decimal,
    pub balance: Decimal,
    pub by_category: Vec<CategoryTotal>,
}

impl DashboardTotals {
    pub fn category_amount(&self, category: &str) -> Option<Decimal> {
        self.by_category
            .iter()
            .find(|total| total.category == category)
            .map(|total| total.amount)
    }
}

/// Side-effect free derivations over transaction slices.
pub struct AggregationEngine;

impl AggregationEngine {
    /// Single pass over `transactions`. Income adds to `income`; everything
    /// else adds to `expense` and to its category bucket.
    pub fn compute_totals<'a, I>(transactions: I) -> DashboardTotals
    where
        I: IntoIterator<Item = &'a Transaction>,
    {
        let mut totals = DashboardTotals::default();
        let mut slots: HashMap<&'a str, usize> = HashMap::new();

        for txn in transactions {
            if txn.kind.is_income() {
                totals.income += txn.amount;
                continue;
            }
            totals.expense += txn.amount;
            let slot = *slots.entry(txn.category.as_str()).or_insert_with(|| {
                totals.by_category.push(CategoryTotal {
                    category: txn.category.clone(),
                    amount: Decimal::ZERO,
                });
                totals.by_category.len() - 1
            });
            totals.by_category[slot].amount += txn.amount;
        }

        totals.balance = totals.income - totals.expense;
        totals
    }

    /// Totals restricted to transactions dated inside `window`.
    pub fn compute_totals_in(transactions: &[Transaction], window: &DateWindow) -> DashboardTotals {
        Self::compute_totals(
            transactions
                .iter()
                .filter(|txn| window.contains(txn.date)),
        )
    }

    /// Case-insensitive substring match on category or note, preserving order.
    pub fn filter_by_keyword(transactions: &[Transaction], keyword: &str) -> Vec<Transaction> {
        let needle = keyword.to_lowercase();
        transactions
            .iter()
            .filter(|txn| txn.matches_lowercase(&needle))
            .cloned()
            .collect()
    }
}
