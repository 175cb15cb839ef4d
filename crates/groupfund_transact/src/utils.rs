use crate::constants::{
    ALGORAND_CHECKSUM_BYTE_LENGTH, ALGORAND_PUBLIC_KEY_BYTE_LENGTH, Byte32, HASH_BYTES_LENGTH,
};
use crate::{Address, AlgorandMsgpack, GroupfundTransactError, MAX_TX_GROUP_SIZE, Transaction};
use crate::{GROUP_DOMAIN_PREFIX, TransactionId};
use serde::{Deserialize, Serialize};
use serde_with::{Bytes, serde_as, skip_serializing_none};
use sha2::{Digest, Sha512_256};

/// Orders every map's entries by key, recursively. Hashes and signatures are taken over
/// this form.
pub fn canonical_msgpack_value(value: rmpv::Value) -> rmpv::Value {
    match value {
        rmpv::Value::Map(entries) => {
            let mut entries: Vec<(rmpv::Value, rmpv::Value)> = entries
                .into_iter()
                .map(|(key, value)| (key, canonical_msgpack_value(value)))
                .collect();
            entries.sort_by(|(a, _), (b, _)| a.as_str().cmp(&b.as_str()));
            rmpv::Value::Map(entries)
        }
        rmpv::Value::Array(items) => {
            rmpv::Value::Array(items.into_iter().map(canonical_msgpack_value).collect())
        }
        other => other,
    }
}

pub fn is_zero<T>(n: &T) -> bool
where
    T: PartialEq + From<u8>,
{
    *n == T::from(0u8)
}

pub fn is_zero_opt<T>(n: &Option<T>) -> bool
where
    T: PartialEq + From<u8>,
{
    n.as_ref().is_none_or(is_zero)
}

pub fn is_zero_addr(addr: &Address) -> bool {
    addr.as_bytes() == &[0u8; ALGORAND_PUBLIC_KEY_BYTE_LENGTH]
}

pub fn is_zero_addr_opt(addr: &Option<Address>) -> bool {
    addr.as_ref().is_none_or(is_zero_addr)
}

pub fn is_empty_bytes32(bytes: &Byte32) -> bool {
    bytes == &[0u8; 32]
}

pub fn is_empty_bytes32_opt(bytes: &Option<Byte32>) -> bool {
    bytes.as_ref().is_none_or(is_empty_bytes32)
}

pub fn is_empty_string_opt(string: &Option<String>) -> bool {
    string.as_ref().is_none_or(String::is_empty)
}

pub fn is_empty_vec_opt<T>(vec: &Option<Vec<T>>) -> bool {
    vec.as_ref().is_none_or(Vec::is_empty)
}

pub fn pub_key_to_checksum(pub_key: &Byte32) -> [u8; ALGORAND_CHECKSUM_BYTE_LENGTH] {
    let digest = hash(pub_key);

    let mut checksum = [0u8; ALGORAND_CHECKSUM_BYTE_LENGTH];
    checksum.copy_from_slice(&digest[(HASH_BYTES_LENGTH - ALGORAND_CHECKSUM_BYTE_LENGTH)..]);
    checksum
}

/// SHA-512/256 digest of the given bytes.
pub fn hash(bytes: &[u8]) -> Byte32 {
    let mut hasher = Sha512_256::new();
    hasher.update(bytes);

    let mut hash_bytes = [0u8; HASH_BYTES_LENGTH];
    hash_bytes.copy_from_slice(&hasher.finalize()[..HASH_BYTES_LENGTH]);
    hash_bytes
}

/// Computes the group id over the ordered, ungrouped transactions.
pub fn compute_group_id(txs: &[Transaction]) -> Result<Byte32, GroupfundTransactError> {
    let message = match txs.len() {
        0 => Some("Transaction group size cannot be 0".to_string()),
        n if n > MAX_TX_GROUP_SIZE => Some(format!(
            "Transaction group size exceeds the max limit of {}",
            MAX_TX_GROUP_SIZE
        )),
        _ if txs.iter().any(|tx| tx.header().group.is_some()) => {
            Some("Transactions must not already be grouped".to_string())
        }
        _ => None,
    };
    if let Some(message) = message {
        return Err(GroupfundTransactError::InputError { message });
    }

    let tx_hashes = txs
        .iter()
        .map(TransactionId::id_raw)
        .collect::<Result<Vec<Byte32>, _>>()?;
    let txlist = GroupedTransactions { tx_hashes }.encode()?;

    Ok(hash(&txlist))
}

/// The `TG`-prefixed message a group id is the hash of.
#[serde_as]
#[skip_serializing_none]
#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
struct GroupedTransactions {
    #[serde(rename = "txlist")]
    #[serde_as(as = "Vec<Bytes>")]
    pub tx_hashes: Vec<Byte32>,
}

impl AlgorandMsgpack for GroupedTransactions {
    const PREFIX: &'static [u8] = GROUP_DOMAIN_PREFIX;
}
