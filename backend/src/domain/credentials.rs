//! Offline credential issuance.
//!
//! Every family whose primary member has a phone number gets a fresh random
//! password, keyed by that first phone number. Each run starts from an empty
//! map, so rerunning regenerates every password.

use log::{info, warn};
use uuid::Uuid;

use shared::{Credential, CredentialMap, Family};

pub const PASSWORD_CHARSET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";
pub const DEFAULT_PASSWORD_LENGTH: usize = 6;

/// Largest multiple of the charset size below 256; bytes at or above it are
/// discarded so every character is equally likely
const ACCEPT_BELOW: u8 = (256 / PASSWORD_CHARSET.len() * PASSWORD_CHARSET.len()) as u8;

/// Random password over `[a-z0-9]`.
///
/// Randomness comes from v4 UUIDs, which `uuid` fills from the operating
/// system's CSPRNG through `getrandom`. Bytes 6 and 8 carry the version and
/// variant bits and are skipped.
pub fn generate_password(length: usize) -> String {
    let mut password = String::with_capacity(length);

    while password.len() < length {
        let bytes = Uuid::new_v4().into_bytes();
        for (index, byte) in bytes.iter().enumerate() {
            if index == 6 || index == 8 || *byte >= ACCEPT_BELOW {
                continue;
            }
            password.push(PASSWORD_CHARSET[*byte as usize % PASSWORD_CHARSET.len()] as char);
            if password.len() == length {
                break;
            }
        }
    }

    password
}

/// Issue credentials with passwords of `password_length` characters
pub fn issue_credentials(families: &[Family], password_length: usize) -> CredentialMap {
    issue_credentials_with(families, || generate_password(password_length))
}

/// Issue credentials using `next_password` for each new entry.
///
/// Families without a primary member or without a non-empty first phone are
/// skipped. When two families share a phone number the first one keeps it.
pub fn issue_credentials_with<F>(families: &[Family], mut next_password: F) -> CredentialMap
where
    F: FnMut() -> String,
{
    let mut credentials = CredentialMap::new();

    for family in families {
        let Some(primary) = family.primary_member() else {
            continue;
        };
        let Some(phone) = primary.primary_phone().map(str::trim).filter(|p| !p.is_empty()) else {
            continue;
        };

        if let Some(existing) = credentials.get(phone) {
            warn!(
                "Phone {} of family {} already issued to family {}, skipping",
                phone, family.id, existing.family_id
            );
            continue;
        }

        credentials.insert(
            phone.to_string(),
            Credential {
                password: next_password(),
                family_id: family.id.clone(),
                name: primary.name_en().to_string(),
            },
        );
    }

    info!("Generated {} credentials for {} families", credentials.len(), families.len());
    credentials
}
