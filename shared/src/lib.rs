use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Deserialize a field that may be `null` in older snapshots into its default value
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// A text value recorded in English and Malayalam.
///
/// Either side may be missing in the snapshot; the accessors return `""` instead.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BilingualText {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub en: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ml: Option<String>,
}

impl BilingualText {
    pub fn new(en: impl Into<String>, ml: impl Into<String>) -> Self {
        Self {
            en: Some(en.into()),
            ml: Some(ml.into()),
        }
    }

    pub fn en(&self) -> &str {
        self.en.as_deref().unwrap_or("")
    }

    pub fn ml(&self) -> &str {
        self.ml.as_deref().unwrap_or("")
    }
}

/// A number that older records sometimes store as a numeric string (`"9.97"`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NumberOrText {
    Number(f64),
    Text(String),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lat: Option<NumberOrText>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lng: Option<NumberOrText>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Address {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub house_name: Option<BilingualText>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<BilingualText>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geo: Option<GeoPoint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub google_maps_url: Option<String>,
}

/// A person in the directory: either a family's primary member or one of its members
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Person {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<BilingualText>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blood_group: Option<String>,
    /// Only the first number is used for login and display
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<Vec<String>>,
    /// Recorded for family members only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<NumberOrText>,
}

impl Person {
    pub fn name_en(&self) -> &str {
        self.name.as_ref().map(BilingualText::en).unwrap_or("")
    }

    pub fn name_ml(&self) -> &str {
        self.name.as_ref().map(BilingualText::ml).unwrap_or("")
    }

    pub fn blood_group(&self) -> &str {
        self.blood_group.as_deref().unwrap_or("")
    }

    pub fn phones(&self) -> &[String] {
        self.phone.as_deref().unwrap_or(&[])
    }

    pub fn primary_phone(&self) -> Option<&str> {
        self.phones().first().map(String::as_str)
    }
}

/// A household record keyed by its directory identifier (e.g. `ERA-7`)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Family {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_member: Option<Person>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<Address>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub family_members: Option<Vec<Person>>,
}

impl Family {
    pub fn primary_member(&self) -> Option<&Person> {
        self.primary_member.as_ref()
    }

    /// Family members in recorded order; an absent list reads as empty
    pub fn members(&self) -> &[Person] {
        self.family_members.as_deref().unwrap_or(&[])
    }

    /// Primary member's English name, the name shown on cards and reports
    pub fn display_name(&self) -> &str {
        self.primary_member().map(Person::name_en).unwrap_or("")
    }

    pub fn house_name(&self) -> Option<&BilingualText> {
        self.address.as_ref().and_then(|a| a.house_name.as_ref())
    }
}

/// Fee category. The admin form offers the three named categories but
/// stored data may carry any free-text label.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FeeCategory {
    #[default]
    Membership,
    Celebration,
    Other,
    Custom(String),
}

impl From<String> for FeeCategory {
    fn from(value: String) -> Self {
        match value.as_str() {
            "Membership" => FeeCategory::Membership,
            "Celebration" => FeeCategory::Celebration,
            "Other" => FeeCategory::Other,
            _ => FeeCategory::Custom(value),
        }
    }
}

impl From<FeeCategory> for String {
    fn from(category: FeeCategory) -> Self {
        category.to_string()
    }
}

impl fmt::Display for FeeCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeeCategory::Membership => write!(f, "Membership"),
            FeeCategory::Celebration => write!(f, "Celebration"),
            FeeCategory::Other => write!(f, "Other"),
            FeeCategory::Custom(label) => write!(f, "{}", label),
        }
    }
}

/// A payable item that applies to every family
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fee {
    /// Epoch milliseconds at creation, as a string
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub category: FeeCategory,
    #[serde(default)]
    pub amount: f64,
}

/// What a family has paid toward one fee. `(family_id, fee_id)` is unique.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    #[serde(rename = "familyId")]
    pub family_id: String,
    #[serde(rename = "feeId")]
    pub fee_id: String,
    pub amount: f64,
    /// RFC 3339 timestamp of the last time this payment was recorded
    #[serde(default, deserialize_with = "null_as_default")]
    pub date: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FeeStatus {
    Paid,
    Partial,
    Pending,
}

impl fmt::Display for FeeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeeStatus::Paid => write!(f, "Paid"),
            FeeStatus::Partial => write!(f, "Partial"),
            FeeStatus::Pending => write!(f, "Pending"),
        }
    }
}

/// One fee as seen from a single family's ledger
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeeLedgerEntry {
    #[serde(flatten)]
    pub fee: Fee,
    pub paid: f64,
    pub balance: f64,
    pub status: FeeStatus,
}

impl FeeLedgerEntry {
    /// Balance clamped at zero; overpayments show as nothing owed
    pub fn display_balance(&self) -> f64 {
        self.balance.max(0.0)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinanceSummary {
    pub detail: Vec<FeeLedgerEntry>,
    pub total_paid: f64,
    pub total_amount: f64,
    pub total_balance: f64,
}

/// Login credential issued to a family, keyed by the primary member's phone
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Credential {
    pub password: String,
    #[serde(rename = "familyId")]
    pub family_id: String,
    pub name: String,
}

/// Phone number -> credential
pub type CredentialMap = BTreeMap<String, Credential>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CredentialCheckRequest {
    pub phone: String,
    pub password: String,
}

/// Who a matching phone and password belong to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CredentialCheckResponse {
    #[serde(rename = "familyId")]
    pub family_id: String,
    pub name: String,
}

/// One family's row in the consolidated fee report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeeReportRow {
    pub id: String,
    pub name: String,
    pub total_paid: f64,
    pub total_balance: f64,
    pub detail: Vec<FeeLedgerEntry>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeeReport {
    pub rows: Vec<FeeReportRow>,
    pub total_expected: f64,
    pub total_collected: f64,
    pub total_outstanding: f64,
}

/// Query string for directory and report searches
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FamilyListResponse {
    pub families: Vec<Family>,
}

/// Partial update of a family; absent fields keep their stored value
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateFamilyRequest {
    #[serde(default)]
    pub primary_member: Option<Person>,
    #[serde(default)]
    pub address: Option<Address>,
    #[serde(default)]
    pub family_members: Option<Vec<Person>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FamilyResponse {
    pub family: Family,
    pub success_message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeleteFamilyResponse {
    pub deleted: bool,
    pub success_message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddFeeRequest {
    pub title: String,
    #[serde(default)]
    pub category: FeeCategory,
    pub amount: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeeListResponse {
    pub fees: Vec<Fee>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeleteFeeResponse {
    pub deleted: bool,
    pub removed_payments: usize,
    pub success_message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordPaymentRequest {
    #[serde(rename = "familyId")]
    pub family_id: String,
    #[serde(rename = "feeId")]
    pub fee_id: String,
    pub amount: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentListResponse {
    pub payments: Vec<Payment>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NotificationResponse {
    pub notification: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateNotificationRequest {
    /// Empty text clears the banner
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RefreshResponse {
    pub families: usize,
    pub fees: usize,
    pub payments: usize,
    pub notification: Option<String>,
}
