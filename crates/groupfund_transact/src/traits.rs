use crate::constants::HASH_BYTES_LENGTH;
use crate::error::GroupfundTransactError;
use crate::utils::{canonical_msgpack_value, hash};
use serde::{Deserialize, Serialize};

/// Canonical msgpack encoding used on the wire and for hashing.
///
/// Keys are sorted and the domain `PREFIX` is prepended by [`AlgorandMsgpack::encode`].
pub trait AlgorandMsgpack: Serialize + for<'de> Deserialize<'de> {
    const PREFIX: &'static [u8] = b"";

    fn decode(bytes: &[u8]) -> Result<Self, GroupfundTransactError> {
        let bytes = if !Self::PREFIX.is_empty() && bytes.starts_with(Self::PREFIX) {
            &bytes[Self::PREFIX.len()..]
        } else {
            bytes
        };
        Ok(rmp_serde::from_slice(bytes)?)
    }

    fn encode_raw(&self) -> Result<Vec<u8>, GroupfundTransactError> {
        let mut temp_buf = Vec::new();
        let mut serializer = rmp_serde::Serializer::new(&mut temp_buf).with_struct_map();
        self.serialize(&mut serializer)?;

        let value = rmpv::decode::read_value(&mut temp_buf.as_slice())?;
        let mut canonical = Vec::new();
        rmpv::encode::write_value(&mut canonical, &canonical_msgpack_value(value))?;
        Ok(canonical)
    }

    fn encode(&self) -> Result<Vec<u8>, GroupfundTransactError> {
        let mut buf = Self::PREFIX.to_vec();
        buf.extend_from_slice(&self.encode_raw()?);
        Ok(buf)
    }
}

pub trait TransactionId: AlgorandMsgpack {
    /// Generates the raw transaction ID as a hash of the prefixed canonical encoding.
    fn id_raw(&self) -> Result<[u8; HASH_BYTES_LENGTH], GroupfundTransactError> {
        let encoded = self.encode()?;
        Ok(hash(&encoded))
    }

    /// Generates the base32 transaction ID shown by explorers and returned by algod.
    fn id(&self) -> Result<String, GroupfundTransactError> {
        let id = self.id_raw()?;
        Ok(base32::encode(
            base32::Alphabet::Rfc4648 { padding: false },
            &id,
        ))
    }
}

pub trait EstimateTransactionSize {
    fn estimate_size(&self) -> Result<usize, GroupfundTransactError>;
}

pub trait Transactions {
    fn assign_group(self) -> Result<Vec<crate::Transaction>, GroupfundTransactError>;
}
