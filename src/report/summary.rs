use chrono::NaiveDate;
use log::{debug, warn};
use rust_decimal::Decimal;
use serde::Serialize;
use std::cmp::Ordering;

use super::money::format_currency;
use crate::table::{ColumnRole, RecordTable};

/// Aging totals for one report snapshot.
///
/// `received` is computed independently of the due-date buckets, so a row
/// that has been received also counts in one of overdue/due-today/upcoming.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AgingSummary {
    pub overdue: Decimal,
    pub due_today: Decimal,
    pub upcoming: Decimal,
    pub received: Decimal,
    pub total: Decimal,
}

/// Add `amount` to a running total, saturating at the decimal range.
fn accumulate(total: &mut Decimal, amount: Decimal, bucket: &str) {
    *total = match total.checked_add(amount) {
        Some(sum) => sum,
        None => {
            warn!("Aging total '{bucket}' overflowed; clamping to the largest representable amount");
            if amount.is_sign_negative() {
                Decimal::MIN
            } else {
                Decimal::MAX
            }
        }
    };
}

/// Formatted summary for JSON output.
#[derive(Debug, Serialize)]
pub struct SummaryView {
    pub overdue: String,
    pub due_today: String,
    pub upcoming: String,
    pub received: String,
    pub total: String,
}

impl AgingSummary {
    /// Compute the summary as of `today`.
    ///
    /// Returns `None` when the table has no amount column or no due-date
    /// column; the summary block is then left out of the report.
    pub fn compute(table: &RecordTable, today: NaiveDate) -> Option<Self> {
        let Some(amount_col) = ColumnRole::Amount.resolve(table) else {
            debug!("No amount column found; skipping summary");
            return None;
        };
        let Some(due_col) = ColumnRole::DueDate.resolve(table) else {
            debug!("No due-date column found; skipping summary");
            return None;
        };
        let receipt_col = ColumnRole::ReceiptDate.resolve(table);

        debug!(
            "Aging summary over {} row(s): amount='{amount_col}', due='{due_col}', receipt={receipt_col:?}",
            table.len()
        );

        let mut summary = AgingSummary::default();
        for row in table.rows() {
            let amount = row.get(amount_col).as_amount().unwrap_or(Decimal::ZERO);
            accumulate(&mut summary.total, amount, "total");

            if let Some(due) = row.get(due_col).as_date() {
                match due.date().cmp(&today) {
                    Ordering::Less => accumulate(&mut summary.overdue, amount, "overdue"),
                    Ordering::Equal => accumulate(&mut summary.due_today, amount, "due today"),
                    Ordering::Greater => accumulate(&mut summary.upcoming, amount, "upcoming"),
                }
            }

            if let Some(col) = receipt_col {
                if !row.get(col).is_missing() {
                    accumulate(&mut summary.received, amount, "received");
                }
            }
        }

        Some(summary)
    }

    /// Labelled lines in display order.
    pub fn lines(&self) -> [(&'static str, Decimal); 5] {
        [
            ("Vencidos (R$)", self.overdue),
            ("Vencem hoje (R$)", self.due_today),
            ("A vencer (R$)", self.upcoming),
            ("Recebidos (R$)", self.received),
            ("Total do Período (R$)", self.total),
        ]
    }

    pub fn formatted_lines(&self) -> Vec<(&'static str, String)> {
        self.lines()
            .into_iter()
            .map(|(label, value)| (label, format_currency(value)))
            .collect()
    }

    pub fn view(&self) -> SummaryView {
        SummaryView {
            overdue: format_currency(self.overdue),
            due_today: format_currency(self.due_today),
            upcoming: format_currency(self.upcoming),
            received: format_currency(self.received),
            total: format_currency(self.total),
        }
    }
}
