//! Consolidated fee report across all families, and its CSV export.

use anyhow::{anyhow, Context, Result};
use csv::Writer;

use shared::{Family, Fee, FeeReport, FeeReportRow, Payment};

use super::ledger::finances_for;
use super::search::matches_name_or_id;

/// One row per family whose name or id matches `query`, with grand totals over
/// the rows shown
pub fn build_fee_report(query: &str, families: &[Family], fees: &[Fee], payments: &[Payment]) -> FeeReport {
    let rows: Vec<FeeReportRow> = families
        .iter()
        .filter(|family| matches_name_or_id(query, family))
        .map(|family| {
            let summary = finances_for(&family.id, fees, payments);
            FeeReportRow {
                id: family.id.clone(),
                name: family.display_name().to_string(),
                total_paid: summary.total_paid,
                total_balance: summary.total_balance,
                detail: summary.detail,
            }
        })
        .collect();

    let total_collected: f64 = rows.iter().map(|row| row.total_paid).sum();
    let total_outstanding: f64 = rows.iter().map(|row| row.total_balance).sum();
    let total_expected: f64 = rows.iter().map(|row| row.total_paid + row.total_balance).sum();

    FeeReport {
        rows,
        total_expected,
        total_collected,
        total_outstanding,
    }
}

/// CSV with one column per fee (amount paid), in fee-list order
pub fn fee_report_csv(report: &FeeReport, fees: &[Fee]) -> Result<String> {
    let mut writer = Writer::from_writer(Vec::new());

    let mut header = vec!["family_id".to_string(), "name".to_string()];
    header.extend(fees.iter().map(|fee| fee.title.clone()));
    header.push("total_paid".to_string());
    header.push("total_balance".to_string());
    writer.write_record(&header)?;

    for row in &report.rows {
        let mut record = vec![row.id.clone(), row.name.clone()];
        for fee in fees {
            let paid = row
                .detail
                .iter()
                .find(|entry| entry.fee.id == fee.id)
                .map(|entry| entry.paid)
                .unwrap_or(0.0);
            record.push(format!("{:.2}", paid));
        }
        record.push(format!("{:.2}", row.total_paid));
        record.push(format!("{:.2}", row.total_balance));
        writer.write_record(&record)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| anyhow!("Failed to flush fee report CSV: {}", e))?;
    String::from_utf8(bytes).context("Fee report CSV is not valid UTF-8")
}
