//! Algorand ed25519 keypair accounts.
//!
//! [`KeyPairAccount`] holds only the public half and is what addresses are derived from.
//! [`SigningKeyPair`] adds the secret seed and is the one thing in the workspace that
//! produces signatures.

use crate::address::Address;
use crate::constants::Byte32;
use crate::error::GroupfundTransactError;
use crate::traits::AlgorandMsgpack;
use crate::{SignedTransaction, Transaction};
use ed25519_dalek::{Signer, SigningKey};
use serde::{Deserialize, Serialize};
use serde_with::{Bytes, serde_as};
use std::fmt::{Debug, Display, Formatter, Result as FmtResult};
use std::str::FromStr;

/// Represents an ed25519 keypair Algorand account by its 32-byte public key.
#[serde_as]
#[derive(Serialize, Deserialize, Debug, PartialEq, Clone, Default)]
#[serde(transparent)]
pub struct KeyPairAccount {
    #[serde_as(as = "Bytes")]
    pub pub_key: Byte32,
}

impl KeyPairAccount {
    pub fn from_pubkey(pub_key: &Byte32) -> Self {
        KeyPairAccount { pub_key: *pub_key }
    }

    /// Returns the [`Address`] corresponding to this account's public key.
    pub fn address(&self) -> Address {
        Address::from(self.clone())
    }
}

impl From<Address> for KeyPairAccount {
    fn from(addr: Address) -> Self {
        KeyPairAccount::from_pubkey(addr.as_bytes())
    }
}

impl From<KeyPairAccount> for Address {
    fn from(account: KeyPairAccount) -> Address {
        Address(account.pub_key)
    }
}

impl FromStr for KeyPairAccount {
    type Err = GroupfundTransactError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<Address>().map(Into::into)
    }
}

impl Display for KeyPairAccount {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", Address::from(self.clone()).as_str())
    }
}

/// An ed25519 signing key derived from a 32-byte seed.
///
/// `Debug` never prints key material.
#[derive(Clone)]
pub struct SigningKeyPair {
    signing_key: SigningKey,
}

impl SigningKeyPair {
    pub fn from_seed(seed: &Byte32) -> Self {
        SigningKeyPair {
            signing_key: SigningKey::from_bytes(seed),
        }
    }

    pub fn seed(&self) -> Byte32 {
        self.signing_key.to_bytes()
    }

    pub fn account(&self) -> KeyPairAccount {
        KeyPairAccount::from_pubkey(&self.signing_key.verifying_key().to_bytes())
    }

    pub fn address(&self) -> Address {
        self.account().address()
    }

    /// Signs the `TX`-prefixed canonical encoding of the transaction.
    pub fn sign_transaction(
        &self,
        transaction: &Transaction,
    ) -> Result<SignedTransaction, GroupfundTransactError> {
        let signature = self.signing_key.sign(&transaction.encode()?);
        Ok(SignedTransaction {
            transaction: transaction.clone(),
            signature: Some(signature.to_bytes()),
            auth_address: None,
        })
    }
}

impl Debug for SigningKeyPair {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("SigningKeyPair")
            .field("address", &self.address().as_str())
            .finish_non_exhaustive()
    }
}
