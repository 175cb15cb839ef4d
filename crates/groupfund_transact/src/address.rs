//! Algorand addresses are base32-encoded strings that represent 32 bytes plus a checksum.
//!
//! This module provides the [`Address`] type, which encapsulates parsing, validating and
//! displaying addresses. An address is a 58-character base32 string encoding 32 bytes of
//! public key (or hash digest) followed by a 4-byte checksum.

use crate::constants::{APP_ID_DOMAIN_PREFIX, Byte32};
use crate::error::GroupfundTransactError;
use crate::utils::{hash, pub_key_to_checksum};
use crate::{
    ALGORAND_ADDRESS_LENGTH, ALGORAND_CHECKSUM_BYTE_LENGTH, ALGORAND_PUBLIC_KEY_BYTE_LENGTH,
};
use serde::{Deserialize, Serialize};
use serde_with::{Bytes, serde_as};
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

const BASE32: base32::Alphabet = base32::Alphabet::Rfc4648 { padding: false };

/// Represents an Algorand address as decoded bytes without the checksum.
///
/// The checksum is calculated when formatting and validated when parsing, so an
/// [`Address`] value always holds exactly the 32 bytes that identify the account.
#[serde_as]
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Address(#[serde_as(as = "Bytes")] pub Byte32);

impl Address {
    /// Creates an address from a 32-byte ed25519 public key.
    pub fn from_pubkey(pub_key: &Byte32) -> Self {
        Address(*pub_key)
    }

    /// Returns the 32 bytes of the address as a byte array reference.
    pub fn as_bytes(&self) -> &Byte32 {
        &self.0
    }

    /// Computes the escrow address of an application from its id.
    ///
    /// Payments sent to this address are held by the application itself.
    pub fn from_app_id(app_id: &u64) -> Self {
        let mut to_hash = APP_ID_DOMAIN_PREFIX.to_vec();
        to_hash.extend_from_slice(&app_id.to_be_bytes());
        Address(hash(&to_hash))
    }

    /// The 58-character base32 form: the 32 bytes followed by their checksum.
    pub fn as_str(&self) -> String {
        let mut bytes = self.0.to_vec();
        bytes.extend_from_slice(&self.checksum());
        base32::encode(BASE32, &bytes)
    }

    /// Computes the 4-byte checksum for the address.
    pub fn checksum(&self) -> [u8; ALGORAND_CHECKSUM_BYTE_LENGTH] {
        pub_key_to_checksum(&self.0)
    }
}

impl TryFrom<&[u8]> for Address {
    type Error = GroupfundTransactError;

    /// Builds an address from a raw public key slice, which must be exactly 32 bytes long.
    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        let pub_key: Byte32 =
            bytes
                .try_into()
                .map_err(|_| GroupfundTransactError::InvalidAddress {
                    message: format!(
                        "Public key must be {} bytes, got {}",
                        ALGORAND_PUBLIC_KEY_BYTE_LENGTH,
                        bytes.len()
                    ),
                })?;
        Ok(Address(pub_key))
    }
}

impl FromStr for Address {
    type Err = GroupfundTransactError;

    /// Parses the base32 form, validating its length and checksum.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |message: &str| GroupfundTransactError::InvalidAddress {
            message: message.to_string(),
        };

        if s.len() != ALGORAND_ADDRESS_LENGTH {
            return Err(invalid("Algorand address must be exactly 58 characters"));
        }
        let decoded = base32::decode(BASE32, s)
            .ok_or_else(|| invalid("Invalid base32 encoding for Algorand address"))?;
        if decoded.len() != ALGORAND_PUBLIC_KEY_BYTE_LENGTH + ALGORAND_CHECKSUM_BYTE_LENGTH {
            return Err(invalid("Decoded address has the wrong length"));
        }

        let (key, checksum) = decoded.split_at(ALGORAND_PUBLIC_KEY_BYTE_LENGTH);
        let address = Address::try_from(key)?;
        if address.checksum().as_slice() != checksum {
            return Err(invalid("Checksum is invalid"));
        }
        Ok(address)
    }
}

impl Display for Address {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(123, "WRBMNT66ECE2AOYKM76YVWIJMBW6Z3XCQZOKG5BL7NISAQC2LBGEKTZLRM")]
    #[case(42, "MW6NSXPOT4R6EQCK4VRNZOJSAKSPQ5TXYZQBCJXXYBK4ET4E7R74GVWL2Q")]
    fn test_from_app_id(#[case] app_id: u64, #[case] expected: &str) {
        let address = Address::from_app_id(&app_id);
        assert_eq!(address.to_string(), expected);
    }

    #[test]
    fn test_zero_address() {
        let addr = Address::default();
        assert_eq!(
            addr.to_string(),
            "AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAY5HFKQ"
        );
        assert_eq!(addr.to_string().parse::<Address>().unwrap(), addr);
    }

    #[test]
    fn test_rejects_bad_checksum() {
        // Last character flipped from the valid zero address.
        let result = "AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAY5HFKA".parse::<Address>();
        assert!(result.is_err());
    }

    #[test]
    fn test_rejects_wrong_length() {
        let err = "ABC".parse::<Address>().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Algorand address must be exactly 58 characters"
        );
    }

    #[test]
    fn test_try_from_slice() {
        let bytes = [7u8; 32];
        let addr = Address::try_from(&bytes[..]).unwrap();
        assert_eq!(addr.as_bytes(), &bytes);
        assert!(Address::try_from(&bytes[..31]).is_err());
    }
}
