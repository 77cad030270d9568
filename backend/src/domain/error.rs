/// Errors the domain reports to its callers.
///
/// Services return `anyhow::Result`; when the root cause is one of these the
/// REST layer maps it to a specific status code.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DirectoryError {
    #[error("Family not found: {0}")]
    FamilyNotFound(String),
    #[error("Fee not found: {0}")]
    FeeNotFound(String),
    #[error("A family with id {0} already exists")]
    DuplicateFamilyId(String),
    #[error("Family id cannot be empty")]
    EmptyFamilyId,
    #[error("Directory state is unavailable after a failed update")]
    LockPoisoned,
}
