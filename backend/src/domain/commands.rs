//! Domain-level command and result types.
//!
//! Services take and return these; the REST layer maps the public DTOs from
//! the `shared` crate onto them.

pub mod family {
    use shared::{Address, Family, Person};

    /// Input for replacing parts of a family record. `None` keeps the stored value.
    #[derive(Debug, Clone, Default)]
    pub struct UpdateFamilyCommand {
        pub family_id: String,
        pub primary_member: Option<Person>,
        pub address: Option<Address>,
        pub family_members: Option<Vec<Person>>,
    }

    impl UpdateFamilyCommand {
        /// The family with this command's fields replaced
        pub fn apply_to(&self, family: &Family) -> Family {
            let mut updated = family.clone();
            if let Some(primary_member) = &self.primary_member {
                updated.primary_member = Some(primary_member.clone());
            }
            if let Some(address) = &self.address {
                updated.address = Some(address.clone());
            }
            if let Some(family_members) = &self.family_members {
                updated.family_members = Some(family_members.clone());
            }
            updated
        }
    }

    #[derive(Debug, Clone)]
    pub struct FamilyResult {
        pub family: Family,
        pub success_message: String,
    }

    #[derive(Debug, Clone)]
    pub struct DeleteFamilyResult {
        pub deleted: bool,
        pub success_message: String,
    }
}

pub mod fees {
    use shared::{Fee, FeeCategory, Payment};

    /// Input for adding a fee to the catalogue.
    #[derive(Debug, Clone)]
    pub struct AddFeeCommand {
        pub title: String,
        pub category: FeeCategory,
        pub amount: f64,
    }

    /// Input for recording what a family paid toward a fee.
    #[derive(Debug, Clone)]
    pub struct RecordPaymentCommand {
        pub family_id: String,
        pub fee_id: String,
        pub amount: f64,
    }

    #[derive(Debug, Clone)]
    pub struct AddFeeResult {
        pub fee: Fee,
    }

    #[derive(Debug, Clone)]
    pub struct RecordPaymentResult {
        pub payment: Payment,
    }

    #[derive(Debug, Clone)]
    pub struct DeleteFeeResult {
        pub deleted: bool,
        pub removed_payments: usize,
        pub success_message: String,
    }
}

pub mod directory {
    /// Counts after re-reading the store.
    #[derive(Debug, Clone, PartialEq)]
    pub struct RefreshResult {
        pub families: usize,
        pub fees: usize,
        pub payments: usize,
        pub notification: Option<String>,
    }
}
