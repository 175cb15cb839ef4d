//! Turns a credential record into the signing identity used for a run.

use crate::address_resolver::{AddressLike, Reconciliation, ReconciliationPolicy, reconcile};
use crate::credentials::{CredentialRecord, CredentialStore};
use crate::error::DepositError;
use groupfund_transact::mnemonic::{normalize_phrase, to_key};
use groupfund_transact::{Address, SignedTransaction, SigningKeyPair, Transaction};
use std::fmt::{Debug, Formatter, Result as FmtResult};

/// The sender address plus the key that signs for it.
///
/// The address is normally the key's own. When a stored address is preferred over the
/// derived one, signatures carry the key's address as the auth address.
#[derive(Clone)]
pub struct SigningIdentity {
    address: Address,
    key: SigningKeyPair,
}

impl SigningIdentity {
    pub fn from_secret_phrase(phrase: &str) -> Result<Self, DepositError> {
        let key = derive_key(phrase)?;
        Ok(SigningIdentity {
            address: key.address(),
            key,
        })
    }

    pub fn address(&self) -> &Address {
        &self.address
    }

    /// The address of the signing key itself.
    pub fn signer_address(&self) -> Address {
        self.key.address()
    }

    pub fn is_rekeyed(&self) -> bool {
        self.address != self.key.address()
    }

    pub fn sign(&self, transaction: &Transaction) -> Result<SignedTransaction, DepositError> {
        let mut signed = self.key.sign_transaction(transaction)?;
        if self.is_rekeyed() {
            signed.auth_address = Some(self.key.address());
        }
        Ok(signed)
    }
}

impl Debug for SigningIdentity {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("SigningIdentity")
            .field("address", &self.address.as_str())
            .field("signing_key", &"<redacted>")
            .finish()
    }
}

/// Normalises the phrase and derives the ed25519 key from it.
pub(crate) fn derive_key(phrase: &str) -> Result<SigningKeyPair, DepositError> {
    let normalized = normalize_phrase(phrase);
    if normalized.is_empty() {
        return Err(DepositError::InvalidCredential {
            message: "secret phrase is empty".to_string(),
        });
    }
    let seed = to_key(&normalized).map_err(|e| DepositError::InvalidCredential {
        message: e.to_string(),
    })?;
    Ok(SigningKeyPair::from_seed(&seed))
}

#[derive(Debug, Clone, Copy, Default)]
pub struct AccountLoader {
    policy: ReconciliationPolicy,
}

impl AccountLoader {
    pub fn new(policy: ReconciliationPolicy) -> Self {
        AccountLoader { policy }
    }

    pub fn policy(&self) -> ReconciliationPolicy {
        self.policy
    }

    pub fn load(&self, record: &CredentialRecord) -> Result<SigningIdentity, DepositError> {
        self.load_with_report(record).map(|(identity, _)| identity)
    }

    pub fn load_from_store(
        &self,
        store: &dyn CredentialStore,
    ) -> Result<SigningIdentity, DepositError> {
        self.load(&store.read()?)
    }

    /// Loads the identity and returns how the stored address compared.
    pub fn load_with_report(
        &self,
        record: &CredentialRecord,
    ) -> Result<(SigningIdentity, Reconciliation), DepositError> {
        let phrase =
            record
                .secret_phrase
                .as_deref()
                .ok_or_else(|| DepositError::InvalidCredential {
                    message: "credential record has no secret phrase".to_string(),
                })?;
        let key = derive_key(phrase)?;
        let derived = key.address();

        let stored = record.stored_address.as_ref().map(AddressLike::from);
        let reconciliation = reconcile(stored.as_ref(), &derived, self.policy);

        if !reconciliation.is_match() {
            let stored_text = reconciliation
                .stored
                .clone()
                .unwrap_or_else(|| "<unrecognised>".to_string());
            if self.policy == ReconciliationPolicy::Strict {
                return Err(DepositError::AddressMismatch {
                    stored: stored_text,
                    derived: derived.as_str(),
                });
            }
            log::warn!(
                "Stored address {} does not match address {} derived from the secret phrase; using {}",
                stored_text,
                derived.as_str(),
                reconciliation.effective
            );
        }

        let address = reconciliation
            .effective
            .parse::<Address>()
            .map_err(|e| DepositError::InvalidCredential {
                message: e.to_string(),
            })?;

        log::debug!("Loaded signing identity for {}", address.as_str());
        Ok((SigningIdentity { address, key }, reconciliation))
    }
}
