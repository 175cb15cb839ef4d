//! Credential and deployment records, and the wallet-file repair step.

use crate::account_loader::derive_key;
use crate::address_resolver::AddressLike;
use crate::error::DepositError;
use groupfund_transact::mnemonic::normalize_phrase;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_NETWORK: &str = "testnet";
pub const REPAIR_NOTE: &str = "normalized by groupfund repair-wallet";

/// The persisted wallet record.
///
/// The stored address is kept as raw JSON because older tooling wrote it as a serialised
/// public-key object rather than a string.
#[derive(Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct CredentialRecord {
    #[serde(rename = "mnemonic", default, skip_serializing_if = "Option::is_none")]
    pub secret_phrase: Option<String>,

    #[serde(
        rename = "addr",
        alias = "address",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub stored_address: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl Debug for CredentialRecord {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("CredentialRecord")
            .field(
                "secret_phrase",
                &self.secret_phrase.as_ref().map(|_| "<redacted>"),
            )
            .field("stored_address", &self.stored_address)
            .field("network", &self.network)
            .field("note", &self.note)
            .finish()
    }
}

pub trait CredentialStore {
    fn read(&self) -> Result<CredentialRecord, DepositError>;

    fn write(&self, record: &CredentialRecord) -> Result<(), DepositError>;

    /// Saves a copy of the current record before it is overwritten.
    fn backup(&self) -> Result<Option<PathBuf>, DepositError> {
        Ok(None)
    }
}

#[derive(Debug, Clone)]
pub struct JsonFileCredentialStore {
    path: PathBuf,
}

impl JsonFileCredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        JsonFileCredentialStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// `wallet.json` backs up to `wallet.backup.json` next to it.
    pub fn backup_path(&self) -> PathBuf {
        let stem = self
            .path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "wallet".to_string());
        self.path.with_file_name(format!("{}.backup.json", stem))
    }
}

impl CredentialStore for JsonFileCredentialStore {
    fn read(&self) -> Result<CredentialRecord, DepositError> {
        let text = fs::read_to_string(&self.path).map_err(|e| DepositError::Storage {
            message: format!("Failed to read {}: {}", self.path.display(), e),
        })?;
        serde_json::from_str(&text).map_err(|e| DepositError::Storage {
            message: format!("{} is not a valid credential file: {}", self.path.display(), e),
        })
    }

    fn write(&self, record: &CredentialRecord) -> Result<(), DepositError> {
        let text = serde_json::to_string_pretty(record).map_err(|e| DepositError::Storage {
            message: e.to_string(),
        })?;
        fs::write(&self.path, text).map_err(|e| DepositError::Storage {
            message: format!("Failed to write {}: {}", self.path.display(), e),
        })
    }

    fn backup(&self) -> Result<Option<PathBuf>, DepositError> {
        let backup = self.backup_path();
        fs::copy(&self.path, &backup).map_err(|e| DepositError::Storage {
            message: format!("Failed to back up to {}: {}", backup.display(), e),
        })?;
        Ok(Some(backup))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepairOutcome {
    AlreadyConsistent {
        address: String,
    },
    Repaired {
        /// The stored value before the repair, canonicalised when possible.
        previous: Option<String>,
        address: String,
        backup: Option<PathBuf>,
    },
}

/// Rewrites the record so the stored address is the canonical string derived from the phrase.
///
/// A record is left alone when its stored address is already a string naming the derived
/// address.
pub fn repair_credentials(store: &dyn CredentialStore) -> Result<RepairOutcome, DepositError> {
    let record = store.read()?;
    let phrase = record
        .secret_phrase
        .as_deref()
        .ok_or_else(|| DepositError::InvalidCredential {
            message: "credential record has no secret phrase".to_string(),
        })?;
    let normalized_phrase = normalize_phrase(phrase);
    let address = derive_key(&normalized_phrase)?.address().as_str();

    let stored = record.stored_address.as_ref().map(AddressLike::from);
    let stored_normalized = stored.as_ref().and_then(AddressLike::normalize);
    let consistent = stored.as_ref().is_some_and(AddressLike::is_text)
        && stored_normalized.as_deref() == Some(address.as_str());

    if consistent {
        return Ok(RepairOutcome::AlreadyConsistent { address });
    }

    let backup = store.backup()?;
    if let Some(path) = &backup {
        log::info!("Backed up credential record to {}", path.display());
    }

    let previous =
        stored_normalized.or_else(|| record.stored_address.as_ref().map(Value::to_string));
    let repaired = CredentialRecord {
        secret_phrase: Some(normalized_phrase),
        stored_address: Some(Value::String(address.clone())),
        network: Some(
            record
                .network
                .clone()
                .unwrap_or_else(|| DEFAULT_NETWORK.to_string()),
        ),
        note: Some(REPAIR_NOTE.to_string()),
    };
    store.write(&repaired)?;
    log::info!("Credential record rewritten for {}", address);

    Ok(RepairOutcome::Repaired {
        previous,
        address,
        backup,
    })
}

/// The application a deployment produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeploymentRecord {
    pub app_id: u64,
}

impl DeploymentRecord {
    pub fn new(app_id: u64) -> Result<Self, DepositError> {
        if app_id == 0 {
            return Err(DepositError::InvalidApplicationId {
                message: "application id must be a positive integer".to_string(),
            });
        }
        Ok(DeploymentRecord { app_id })
    }

    pub fn from_json(text: &str) -> Result<Self, DepositError> {
        let value: Value = serde_json::from_str(text).map_err(|e| DepositError::Storage {
            message: format!("deployment record is not valid JSON: {}", e),
        })?;
        let app_id = value
            .get("appId")
            .ok_or_else(|| DepositError::InvalidApplicationId {
                message: "deployment record has no appId".to_string(),
            })?;
        let app_id = app_id
            .as_u64()
            .ok_or_else(|| DepositError::InvalidApplicationId {
                message: format!("appId {} is not a positive integer", app_id),
            })?;
        Self::new(app_id)
    }

    pub fn load(path: &Path) -> Result<Self, DepositError> {
        let text = fs::read_to_string(path).map_err(|e| DepositError::Storage {
            message: format!("Failed to read {}: {}", path.display(), e),
        })?;
        Self::from_json(&text)
    }
}
