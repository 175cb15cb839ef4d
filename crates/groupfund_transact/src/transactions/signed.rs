use crate::address::Address;
use crate::constants::{ALGORAND_SIGNATURE_BYTE_LENGTH, HASH_BYTES_LENGTH};
use crate::error::GroupfundTransactError;
use crate::traits::{AlgorandMsgpack, EstimateTransactionSize, TransactionId};
use crate::utils::is_zero_addr_opt;
use serde::{Deserialize, Serialize};
use serde_with::{Bytes, serde_as};

use super::Transaction;

/// A transaction with the signature that authorises it.
#[serde_as]
#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
pub struct SignedTransaction {
    #[serde(rename = "txn")]
    pub transaction: Transaction,

    #[serde(rename = "sig")]
    #[serde_as(as = "Option<Bytes>")]
    pub signature: Option<[u8; ALGORAND_SIGNATURE_BYTE_LENGTH]>,

    /// Set when the sender has been rekeyed to another key.
    #[serde(rename = "sgnr")]
    #[serde(skip_serializing_if = "is_zero_addr_opt")]
    #[serde(default)]
    pub auth_address: Option<Address>,
}

impl AlgorandMsgpack for SignedTransaction {
    // The inner transaction goes through Transaction::decode so its type tag is checked;
    // the envelope fields are read straight off the map.
    fn decode(bytes: &[u8]) -> Result<Self, GroupfundTransactError> {
        let mut reader = bytes;
        let value = rmpv::decode::read_value(&mut reader)?;
        let entries = value
            .as_map()
            .ok_or_else(|| malformed("expected a map"))?;
        let field = |name: &str| {
            entries
                .iter()
                .find(|(key, _)| key.as_str() == Some(name))
                .map(|(_, value)| value)
        };

        let txn = field("txn").ok_or_else(|| malformed("missing txn"))?;
        let mut txn_bytes = Vec::new();
        rmpv::encode::write_value(&mut txn_bytes, txn)?;
        let transaction = Transaction::decode(&txn_bytes)?;

        let signature = field("sig")
            .map(|sig| {
                sig.as_slice()
                    .and_then(|bytes| <[u8; ALGORAND_SIGNATURE_BYTE_LENGTH]>::try_from(bytes).ok())
                    .ok_or_else(|| malformed("sig is not a 64 byte string"))
            })
            .transpose()?;

        let auth_address = field("sgnr")
            .map(|sgnr| {
                sgnr.as_slice()
                    .ok_or_else(|| malformed("sgnr is not a byte string"))
                    .and_then(Address::try_from)
            })
            .transpose()?;

        Ok(SignedTransaction {
            transaction,
            signature,
            auth_address,
        })
    }
}

fn malformed(detail: &str) -> GroupfundTransactError {
    GroupfundTransactError::InputError {
        message: format!("Malformed signed transaction: {}", detail),
    }
}

impl TransactionId for SignedTransaction {
    fn id_raw(&self) -> Result<[u8; HASH_BYTES_LENGTH], GroupfundTransactError> {
        self.transaction.id_raw()
    }
}

impl EstimateTransactionSize for SignedTransaction {
    fn estimate_size(&self) -> Result<usize, GroupfundTransactError> {
        Ok(self.encode()?.len())
    }
}
