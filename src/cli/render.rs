//! Plain-text renderings of controller snapshots.

use std::fmt::Write;

use pundi_core::{format_amount, DashboardTotals};
use pundi_domain::{Category, Profile, Transaction};

pub fn dashboard(profile: &Profile, totals: &DashboardTotals, symbol: &str) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} - {}", profile.display_name(), profile.display_status());
    let _ = writeln!(out, "{:<10}{}", "Income", format_amount(totals.income, symbol));
    let _ = writeln!(out, "{:<10}{}", "Expense", format_amount(totals.expense, symbol));
    let _ = writeln!(out, "{:<10}{}", "Balance", format_amount(totals.balance, symbol));
    if !totals.by_category.is_empty() {
        let _ = writeln!(out, "Expenses by category:");
        for total in &totals.by_category {
            let _ = writeln!(
                out,
                "  {:<18}{}",
                total.category,
                format_amount(total.amount, symbol)
            );
        }
    }
    out
}

pub fn history(transactions: &[Transaction], symbol: &str) -> String {
    if transactions.is_empty() {
        return "No transactions found.\n".into();
    }
    let mut out = String::new();
    for transaction in transactions {
        let sign = if transaction.kind.is_income() { "+" } else { "-" };
        let _ = write!(
            out,
            "{}  {:<8} {:<8} {:<16} {}{}",
            transaction.date,
            transaction.id,
            transaction.kind,
            transaction.category,
            sign,
            format_amount(transaction.amount, symbol)
        );
        if let Some(note) = &transaction.note {
            let _ = write!(out, "  ({note})");
        }
        out.push('\n');
    }
    out
}

pub fn categories<'a>(categories: impl IntoIterator<Item = &'a Category>) -> String {
    let mut out = String::new();
    for category in categories {
        let _ = writeln!(out, "{:<8} {:<20} {}", category.id, category.name, category.kind);
    }
    if out.is_empty() {
        out.push_str("No categories.\n");
    }
    out
}

pub fn profile(profile: &Profile) -> String {
    let photo = if profile.embedded_photo().is_some() {
        "embedded"
    } else {
        "none"
    };
    format!(
        "Name:   {}\nStatus: {}\nPhoto:  {}\n",
        profile.display_name(),
        profile.display_status(),
        photo
    )
}
