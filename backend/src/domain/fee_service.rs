use anyhow::{Context, Result};
use chrono::{SecondsFormat, Utc};
use log::{error, info, warn};

use shared::{Fee, FeeReport, FinanceSummary, Payment};

use super::commands::fees::{AddFeeCommand, AddFeeResult, DeleteFeeResult, RecordPaymentCommand, RecordPaymentResult};
use super::error::DirectoryError;
use super::ledger::{fee_status, finances_for, next_fee_id, record_payment, remove_fee};
use super::report::{build_fee_report, fee_report_csv};
use super::state::{self, SharedDirectory};
use crate::storage::{save_json, StoreHandle, FEES_KEY, PAYMENTS_KEY};

/// Service for the fee catalogue, payments and everything derived from them
#[derive(Clone)]
pub struct FeeService {
    store: StoreHandle,
    directory: SharedDirectory,
}

impl FeeService {
    pub fn new(store: StoreHandle, directory: SharedDirectory) -> Self {
        Self { store, directory }
    }

    pub fn list_fees(&self) -> Result<Vec<Fee>> {
        let data = state::read(&self.directory)?;
        info!("Listing {} fees", data.fees.len());
        Ok(data.fees.clone())
    }

    pub fn list_payments(&self) -> Result<Vec<Payment>> {
        let data = state::read(&self.directory)?;
        info!("Listing {} payments", data.payments.len());
        Ok(data.payments.clone())
    }

    pub fn add_fee(&self, command: AddFeeCommand) -> Result<AddFeeResult> {
        info!("Adding fee: title={}, category={}, amount={}", command.title, command.category, command.amount);

        let mut data = state::write(&self.directory)?;
        let fee = Fee {
            id: next_fee_id(Utc::now().timestamp_millis(), &data.fees),
            title: command.title,
            category: command.category,
            amount: command.amount,
        };

        let mut fees = data.fees.clone();
        fees.push(fee.clone());
        save_json(self.store.as_ref(), FEES_KEY, &fees).context("Failed to save fees")?;
        data.fees = fees;

        info!("Added fee {} ({})", fee.id, fee.title);
        Ok(AddFeeResult { fee })
    }

    /// Remove a fee together with every payment made toward it
    pub fn delete_fee(&self, fee_id: &str) -> Result<DeleteFeeResult> {
        info!("Deleting fee: {}", fee_id);

        let mut data = state::write(&self.directory)?;
        let deleted = data.fees.iter().any(|fee| fee.id == fee_id);
        let (fees, payments) = remove_fee(fee_id, &data.fees, &data.payments);
        let removed_payments = data.payments.len() - payments.len();

        if !deleted && removed_payments == 0 {
            warn!("Fee {} not present, nothing to delete", fee_id);
            return Ok(DeleteFeeResult {
                deleted: false,
                removed_payments: 0,
                success_message: format!("Fee '{}' was not found", fee_id),
            });
        }

        // Payments before fees: stored payments never reference a removed fee
        save_json(self.store.as_ref(), PAYMENTS_KEY, &payments).context("Failed to save payments")?;
        if let Err(e) = save_json(self.store.as_ref(), FEES_KEY, &fees) {
            if let Err(restore) = save_json(self.store.as_ref(), PAYMENTS_KEY, &data.payments) {
                error!("Failed to restore payments after fee save failed: {:#}", restore);
            }
            return Err(e.context("Failed to save fees"));
        }
        data.fees = fees;
        data.payments = payments;

        info!("Deleted fee {} and {} payments", fee_id, removed_payments);
        Ok(DeleteFeeResult {
            deleted,
            removed_payments,
            success_message: format!("Fee '{}' deleted with {} payments", fee_id, removed_payments),
        })
    }

    /// Record a payment, replacing any earlier one for the same family and fee
    pub fn record_payment(&self, command: RecordPaymentCommand) -> Result<RecordPaymentResult> {
        info!(
            "Recording payment: family={}, fee={}, amount={}",
            command.family_id, command.fee_id, command.amount
        );

        let mut data = state::write(&self.directory)?;
        if !data.families.iter().any(|family| family.id == command.family_id) {
            warn!("Payment for unknown family {}", command.family_id);
            return Err(DirectoryError::FamilyNotFound(command.family_id).into());
        }
        if !data.fees.iter().any(|fee| fee.id == command.fee_id) {
            warn!("Payment for unknown fee {}", command.fee_id);
            return Err(DirectoryError::FeeNotFound(command.fee_id).into());
        }

        let recorded_at = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
        let payments = record_payment(&command.family_id, &command.fee_id, command.amount, &recorded_at, &data.payments);
        save_json(self.store.as_ref(), PAYMENTS_KEY, &payments).context("Failed to save payments")?;

        let payment = payments
            .iter()
            .find(|p| p.family_id == command.family_id && p.fee_id == command.fee_id)
            .cloned()
            .context("Recorded payment missing from updated list")?;
        data.payments = payments;

        let status = data
            .fees
            .iter()
            .find(|fee| fee.id == payment.fee_id)
            .map(|fee| fee_status(payment.amount, fee.amount));
        if let Some(status) = status {
            info!(
                "Recorded payment of {} by {} toward {}: {}",
                payment.amount, payment.family_id, payment.fee_id, status
            );
        }
        Ok(RecordPaymentResult { payment })
    }

    /// Per-fee breakdown for one family, `None` when the family does not exist
    pub fn get_family_finances(&self, family_id: &str) -> Result<Option<FinanceSummary>> {
        let data = state::read(&self.directory)?;
        if !data.families.iter().any(|family| family.id == family_id) {
            warn!("Finances requested for unknown family {}", family_id);
            return Ok(None);
        }
        Ok(Some(finances_for(family_id, &data.fees, &data.payments)))
    }

    pub fn fee_report(&self, query: &str) -> Result<FeeReport> {
        let data = state::read(&self.directory)?;
        let report = build_fee_report(query, &data.families, &data.fees, &data.payments);
        info!("Fee report '{}': {} rows", query, report.rows.len());
        Ok(report)
    }

    pub fn fee_report_csv(&self, query: &str) -> Result<String> {
        let data = state::read(&self.directory)?;
        let report = build_fee_report(query, &data.families, &data.fees, &data.payments);
        info!("Exporting fee report '{}' as CSV: {} rows", query, report.rows.len());
        fee_report_csv(&report, &data.fees)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::state::{shared_directory, DirectoryData};
    use crate::storage::test_utils::{FailingStore, RejectKeyStore};
    use crate::storage::{load_json, MemoryStore};
    use serde_json::json;
    use shared::{FeeCategory, FeeStatus};
    use std::sync::Arc;

    fn setup() -> (Arc<MemoryStore>, FeeService) {
        let families = serde_json::from_value(json!([
            { "id": "A", "primary_member": { "name": { "en": "Anitha" } } },
            { "id": "B", "primary_member": { "name": { "en": "Biju" } } }
        ]))
        .unwrap();
        let fees = vec![
            Fee { id: "f1".into(), title: "Annual".into(), category: FeeCategory::Membership, amount: 100.0 },
            Fee { id: "f2".into(), title: "Onam".into(), category: FeeCategory::Celebration, amount: 50.0 },
        ];
        let payments = vec![
            Payment { family_id: "A".into(), fee_id: "f1".into(), amount: 40.0, date: String::new() },
            Payment { family_id: "B".into(), fee_id: "f2".into(), amount: 50.0, date: String::new() },
        ];

        let store = Arc::new(MemoryStore::new());
        let directory = shared_directory(DirectoryData { families, fees, payments, notification: None });
        (store.clone(), FeeService::new(store, directory))
    }

    #[test]
    fn test_add_fee_assigns_unique_ids() {
        let (store, service) = setup();

        let first = service
            .add_fee(AddFeeCommand { title: "Vishu".into(), category: FeeCategory::Celebration, amount: 30.0 })
            .unwrap();
        let second = service
            .add_fee(AddFeeCommand { title: "Xmas".into(), category: FeeCategory::Other, amount: 20.0 })
            .unwrap();

        assert_ne!(first.fee.id, second.fee.id);
        assert!(first.fee.id.parse::<i64>().is_ok());

        let stored: Vec<Fee> = load_json(store.as_ref(), FEES_KEY).unwrap().unwrap();
        assert_eq!(stored.len(), 4);
        assert_eq!(stored[3].title, "Xmas");
    }

    #[test]
    fn test_record_payment_updates_summary() {
        let (store, service) = setup();

        let result = service
            .record_payment(RecordPaymentCommand { family_id: "A".into(), fee_id: "f1".into(), amount: 100.0 })
            .unwrap();
        assert_eq!(result.payment.amount, 100.0);
        assert!(result.payment.date.ends_with('Z'));

        let summary = service.get_family_finances("A").unwrap().unwrap();
        assert_eq!(summary.detail[0].status, FeeStatus::Paid);
        assert_eq!(summary.total_paid, 100.0);
        assert_eq!(summary.total_balance, 50.0);

        let stored: Vec<Payment> = load_json(store.as_ref(), PAYMENTS_KEY).unwrap().unwrap();
        assert_eq!(stored.len(), 2);
        assert_eq!(stored[0].amount, 100.0);
    }

    #[test]
    fn test_record_payment_for_unknown_ids() {
        let (_store, service) = setup();

        let err = service
            .record_payment(RecordPaymentCommand { family_id: "Z".into(), fee_id: "f1".into(), amount: 1.0 })
            .unwrap_err();
        assert_eq!(err.downcast_ref::<DirectoryError>(), Some(&DirectoryError::FamilyNotFound("Z".into())));

        let err = service
            .record_payment(RecordPaymentCommand { family_id: "A".into(), fee_id: "f9".into(), amount: 1.0 })
            .unwrap_err();
        assert_eq!(err.downcast_ref::<DirectoryError>(), Some(&DirectoryError::FeeNotFound("f9".into())));
        assert_eq!(service.list_payments().unwrap().len(), 2);
    }

    #[test]
    fn test_delete_fee_cascades_payments() {
        let (store, service) = setup();

        let result = service.delete_fee("f2").unwrap();
        assert!(result.deleted);
        assert_eq!(result.removed_payments, 1);
        assert_eq!(service.list_fees().unwrap().len(), 1);
        assert_eq!(service.list_payments().unwrap().len(), 1);

        let stored: Vec<Payment> = load_json(store.as_ref(), PAYMENTS_KEY).unwrap().unwrap();
        assert!(stored.iter().all(|p| p.fee_id != "f2"));

        let missing = service.delete_fee("f2").unwrap();
        assert!(!missing.deleted);
        assert_eq!(missing.removed_payments, 0);
    }

    #[test]
    fn test_finances_for_unknown_family() {
        let (_store, service) = setup();
        assert!(service.get_family_finances("nobody").unwrap().is_none());
    }

    #[test]
    fn test_report_and_csv() {
        let (_store, service) = setup();

        let report = service.fee_report("").unwrap();
        assert_eq!(report.rows.len(), 2);
        assert_eq!(report.total_collected, 90.0);
        assert_eq!(report.total_expected, 300.0);

        let csv = service.fee_report_csv("biju").unwrap();
        assert_eq!(csv.lines().count(), 2);
        assert!(csv.starts_with("family_id,name,Annual,Onam,total_paid,total_balance"));
    }

    #[test]
    fn test_failed_save_leaves_payments_untouched() {
        let (_store, healthy) = setup();
        let directory = shared_directory(DirectoryData {
            families: healthy.directory.read().unwrap().families.clone(),
            fees: healthy.list_fees().unwrap(),
            payments: healthy.list_payments().unwrap(),
            notification: None,
        });
        let service = FeeService::new(Arc::new(FailingStore), directory);

        assert!(service
            .record_payment(RecordPaymentCommand { family_id: "A".into(), fee_id: "f1".into(), amount: 90.0 })
            .is_err());
        assert_eq!(service.list_payments().unwrap()[0].amount, 40.0);
        assert!(service.delete_fee("f1").is_err());
        assert_eq!(service.list_fees().unwrap().len(), 2);
    }

    #[test]
    fn test_delete_fee_keeps_fee_when_payments_cannot_be_saved() {
        let (_store, healthy) = setup();
        let directory = shared_directory(DirectoryData {
            families: healthy.directory.read().unwrap().families.clone(),
            fees: healthy.list_fees().unwrap(),
            payments: healthy.list_payments().unwrap(),
            notification: None,
        });
        let store = Arc::new(RejectKeyStore::new(PAYMENTS_KEY));
        let service = FeeService::new(store.clone(), directory);

        assert!(service.delete_fee("f1").is_err());
        assert_eq!(service.list_fees().unwrap().len(), 2);
        assert_eq!(service.list_payments().unwrap().len(), 2);

        let stored: Option<Vec<Fee>> = load_json(store.as_ref(), FEES_KEY).unwrap();
        assert!(stored.is_none());
    }
}
