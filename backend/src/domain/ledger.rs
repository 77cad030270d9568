//! Fee ledger: per-family fee breakdown and payment bookkeeping.
//!
//! All functions here are pure. They take the lists they need and return new
//! lists; persisting the result is the fee service's job.

use shared::{Fee, FeeLedgerEntry, FeeStatus, FinanceSummary, Payment};

/// NaN and infinities never reach a displayed total
fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

/// Status of one fee given what was paid. Checked in order: a fee with a zero
/// amount and no payment counts as paid.
pub fn fee_status(paid: f64, amount: f64) -> FeeStatus {
    if paid >= amount {
        FeeStatus::Paid
    } else if paid > 0.0 {
        FeeStatus::Partial
    } else {
        FeeStatus::Pending
    }
}

/// The payment a family made toward a fee, if any
pub fn payment_for<'a>(family_id: &str, fee_id: &str, payments: &'a [Payment]) -> Option<&'a Payment> {
    payments
        .iter()
        .find(|payment| payment.family_id == family_id && payment.fee_id == fee_id)
}

/// Per-fee paid/balance/status for one family, in fee-list order, plus totals.
///
/// `total_amount` sums every fee in the system; `total_paid` sums what this
/// family paid toward those fees.
pub fn finances_for(family_id: &str, fees: &[Fee], payments: &[Payment]) -> FinanceSummary {
    let detail: Vec<FeeLedgerEntry> = fees
        .iter()
        .map(|fee| {
            let amount = finite_or_zero(fee.amount);
            let paid = payment_for(family_id, &fee.id, payments)
                .map(|payment| finite_or_zero(payment.amount))
                .unwrap_or(0.0);

            FeeLedgerEntry {
                fee: fee.clone(),
                paid,
                balance: amount - paid,
                status: fee_status(paid, amount),
            }
        })
        .collect();

    let total_paid = finite_or_zero(detail.iter().map(|entry| entry.paid).sum());
    let total_amount = finite_or_zero(fees.iter().map(|fee| finite_or_zero(fee.amount)).sum());

    FinanceSummary {
        detail,
        total_paid,
        total_amount,
        total_balance: total_amount - total_paid,
    }
}

/// Record what a family paid toward a fee.
///
/// An existing payment for the pair keeps its position and gets the new amount
/// and date; otherwise a new payment is appended. The amount is not checked
/// against the fee, so overpayment is allowed.
pub fn record_payment(
    family_id: &str,
    fee_id: &str,
    amount: f64,
    recorded_at: &str,
    payments: &[Payment],
) -> Vec<Payment> {
    let mut updated = payments.to_vec();

    match updated
        .iter_mut()
        .find(|payment| payment.family_id == family_id && payment.fee_id == fee_id)
    {
        Some(existing) => {
            existing.amount = amount;
            existing.date = recorded_at.to_string();
        }
        None => updated.push(Payment {
            family_id: family_id.to_string(),
            fee_id: fee_id.to_string(),
            amount,
            date: recorded_at.to_string(),
        }),
    }

    updated
}

/// Remove a fee and every payment referencing it
pub fn remove_fee(fee_id: &str, fees: &[Fee], payments: &[Payment]) -> (Vec<Fee>, Vec<Payment>) {
    let remaining_fees = fees.iter().filter(|fee| fee.id != fee_id).cloned().collect();
    let remaining_payments = payments
        .iter()
        .filter(|payment| payment.fee_id != fee_id)
        .cloned()
        .collect();
    (remaining_fees, remaining_payments)
}

/// Fee id for a fee created at `epoch_millis`, bumped past any id already taken
pub fn next_fee_id(epoch_millis: i64, fees: &[Fee]) -> String {
    let mut candidate = epoch_millis;
    while fees.iter().any(|fee| fee.id == candidate.to_string()) {
        candidate += 1;
    }
    candidate.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::FeeCategory;

    fn fee(id: &str, amount: f64) -> Fee {
        Fee {
            id: id.to_string(),
            title: format!("Fee {}", id),
            category: FeeCategory::Membership,
            amount,
        }
    }

    fn payment(family_id: &str, fee_id: &str, amount: f64) -> Payment {
        Payment {
            family_id: family_id.to_string(),
            fee_id: fee_id.to_string(),
            amount,
            date: "2025-01-01T00:00:00.000Z".to_string(),
        }
    }

    #[test]
    fn test_partial_payment_breakdown() {
        let fees = vec![fee("f1", 100.0)];
        let payments = vec![payment("A", "f1", 40.0)];

        let summary = finances_for("A", &fees, &payments);

        assert_eq!(summary.detail.len(), 1);
        let entry = &summary.detail[0];
        assert_eq!(entry.fee.id, "f1");
        assert_eq!(entry.paid, 40.0);
        assert_eq!(entry.balance, 60.0);
        assert_eq!(entry.status, FeeStatus::Partial);
        assert_eq!(summary.total_paid, 40.0);
        assert_eq!(summary.total_amount, 100.0);
        assert_eq!(summary.total_balance, 60.0);
    }

    #[test]
    fn test_no_fees_means_empty_summary() {
        let payments = vec![payment("A", "f1", 40.0)];
        let summary = finances_for("A", &[], &payments);
        assert_eq!(summary, FinanceSummary::default());
    }

    #[test]
    fn test_detail_follows_fee_order_and_ignores_other_families() {
        let fees = vec![fee("f2", 50.0), fee("f1", 100.0), fee("f3", 25.0)];
        let payments = vec![
            payment("B", "f1", 100.0),
            payment("A", "f1", 100.0),
            payment("A", "f3", 10.0),
        ];

        let summary = finances_for("A", &fees, &payments);
        let ids: Vec<&str> = summary.detail.iter().map(|e| e.fee.id.as_str()).collect();
        assert_eq!(ids, vec!["f2", "f1", "f3"]);

        let statuses: Vec<FeeStatus> = summary.detail.iter().map(|e| e.status).collect();
        assert_eq!(statuses, vec![FeeStatus::Pending, FeeStatus::Paid, FeeStatus::Partial]);
        assert_eq!(summary.total_paid, 110.0);
        assert_eq!(summary.total_amount, 175.0);
        assert_eq!(summary.total_balance, 65.0);
    }

    #[test]
    fn test_overpayment_yields_negative_balance() {
        let fees = vec![fee("f1", 100.0)];
        let payments = vec![payment("A", "f1", 150.0)];
        let summary = finances_for("A", &fees, &payments);
        assert_eq!(summary.detail[0].balance, -50.0);
        assert_eq!(summary.detail[0].display_balance(), 0.0);
        assert_eq!(summary.detail[0].status, FeeStatus::Paid);
    }

    #[test]
    fn test_status_rules() {
        assert_eq!(fee_status(100.0, 100.0), FeeStatus::Paid);
        assert_eq!(fee_status(0.01, 100.0), FeeStatus::Partial);
        assert_eq!(fee_status(0.0, 100.0), FeeStatus::Pending);
        assert_eq!(fee_status(0.0, 0.0), FeeStatus::Paid);
    }

    #[test]
    fn test_non_finite_amounts_count_as_zero() {
        let fees = vec![fee("f1", f64::NAN), fee("f2", 100.0)];
        let payments = vec![payment("A", "f2", f64::INFINITY)];

        let summary = finances_for("A", &fees, &payments);
        assert_eq!(summary.total_amount, 100.0);
        assert_eq!(summary.total_paid, 0.0);
        assert_eq!(summary.total_balance, 100.0);
        assert_eq!(summary.detail[1].status, FeeStatus::Pending);
    }

    #[test]
    fn test_record_payment_appends_new_pair() {
        let payments = vec![payment("A", "f1", 40.0)];
        let updated = record_payment("B", "f1", 25.0, "2025-02-01T00:00:00.000Z", &payments);

        assert_eq!(updated.len(), 2);
        assert_eq!(updated[0], payments[0]);
        assert_eq!(updated[1].family_id, "B");
        assert_eq!(updated[1].amount, 25.0);
        assert_eq!(updated[1].date, "2025-02-01T00:00:00.000Z");
    }

    #[test]
    fn test_record_payment_twice_replaces_in_place() {
        let payments = vec![payment("B", "f1", 10.0), payment("A", "f1", 40.0), payment("C", "f1", 5.0)];

        let once = record_payment("A", "f1", 60.0, "2025-02-01T00:00:00.000Z", &payments);
        let twice = record_payment("A", "f1", 80.0, "2025-03-01T00:00:00.000Z", &once);

        assert_eq!(twice.len(), 3);
        let matching: Vec<&Payment> = twice.iter().filter(|p| p.family_id == "A" && p.fee_id == "f1").collect();
        assert_eq!(matching.len(), 1);
        assert_eq!(twice[1].amount, 80.0);
        assert_eq!(twice[1].date, "2025-03-01T00:00:00.000Z");
        assert_eq!(twice[0], payments[0]);
        assert_eq!(twice[2], payments[2]);
        // Input list is untouched
        assert_eq!(payments[1].amount, 40.0);
    }

    #[test]
    fn test_remove_fee_cascades_to_its_payments_only() {
        let fees = vec![fee("f1", 100.0), fee("f2", 50.0)];
        let payments = vec![payment("A", "f1", 40.0), payment("A", "f2", 50.0), payment("B", "f1", 100.0)];

        let (fees_after, payments_after) = remove_fee("f1", &fees, &payments);

        assert_eq!(fees_after, vec![fee("f2", 50.0)]);
        assert_eq!(payments_after, vec![payment("A", "f2", 50.0)]);
    }

    #[test]
    fn test_remove_unknown_fee_changes_nothing() {
        let fees = vec![fee("f1", 100.0)];
        let payments = vec![payment("A", "f1", 40.0)];
        let (fees_after, payments_after) = remove_fee("nope", &fees, &payments);
        assert_eq!(fees_after, fees);
        assert_eq!(payments_after, payments);
    }

    #[test]
    fn test_next_fee_id_skips_taken_ids() {
        let fees = vec![fee("1700000000000", 10.0), fee("1700000000001", 10.0)];
        assert_eq!(next_fee_id(1700000000000, &fees), "1700000000002");
        assert_eq!(next_fee_id(1800000000000, &fees), "1800000000000");
    }
}
