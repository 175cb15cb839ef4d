//! Canonicalisation of address values that arrive in more than one shape.
//!
//! Credential files written by different wallet tooling store the address either as the
//! canonical 58-character string or as a serialised public-key object. [`AddressLike`]
//! captures the shapes seen in the wild and [`AddressLike::normalize`] turns any of them
//! back into the canonical string.

use base64::{Engine, prelude::BASE64_STANDARD};
use groupfund_transact::{ALGORAND_PUBLIC_KEY_BYTE_LENGTH, Address};
use serde_json::{Map, Value};
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

/// Fields that may hold raw public-key bytes, in the order they are tried.
const PUBLIC_KEY_FIELDS: [&str; 3] = ["publicKey", "bytes", "pk"];
/// Fields that may hold a nested address value.
const NESTED_ADDRESS_FIELDS: [&str; 2] = ["addr", "address"];

#[derive(Debug, Clone, PartialEq)]
pub enum AddressLike {
    Text(String),
    PublicKey(Vec<u8>),
    Unrecognized(Value),
}

impl AddressLike {
    /// Returns the canonical address string, or `None` when no shape yields a usable key.
    pub fn normalize(&self) -> Option<String> {
        match self {
            AddressLike::Text(text) => normalize_text(text),
            AddressLike::PublicKey(bytes) => normalize_bytes(bytes),
            AddressLike::Unrecognized(value) => match value {
                Value::Number(n) => normalize_text(&n.to_string()),
                Value::Bool(b) => normalize_text(&b.to_string()),
                _ => None,
            },
        }
    }

    pub fn is_text(&self) -> bool {
        matches!(self, AddressLike::Text(_))
    }
}

impl From<&Value> for AddressLike {
    fn from(value: &Value) -> Self {
        match value {
            Value::String(text) => AddressLike::Text(text.clone()),
            Value::Array(_) => bytes_from_value(value)
                .map(AddressLike::PublicKey)
                .unwrap_or_else(|| AddressLike::Unrecognized(value.clone())),
            Value::Object(object) => from_object(object)
                .unwrap_or_else(|| AddressLike::Unrecognized(value.clone())),
            other => AddressLike::Unrecognized(other.clone()),
        }
    }
}

impl From<&str> for AddressLike {
    fn from(text: &str) -> Self {
        AddressLike::Text(text.to_string())
    }
}

impl From<&Address> for AddressLike {
    fn from(address: &Address) -> Self {
        AddressLike::PublicKey(address.as_bytes().to_vec())
    }
}

fn from_object(object: &Map<String, Value>) -> Option<AddressLike> {
    let direct = PUBLIC_KEY_FIELDS
        .iter()
        .filter_map(|field| object.get(*field))
        .filter_map(bytes_from_value)
        .find(|bytes| bytes.len() == ALGORAND_PUBLIC_KEY_BYTE_LENGTH)
        .map(AddressLike::PublicKey);

    direct.or_else(|| {
        NESTED_ADDRESS_FIELDS
            .iter()
            .filter_map(|field| object.get(*field))
            .map(AddressLike::from)
            .find(|nested| nested.normalize().is_some())
    })
}

/// Reads a byte sequence from a number array, an index-keyed object or a base64 string.
fn bytes_from_value(value: &Value) -> Option<Vec<u8>> {
    match value {
        Value::Array(items) => items
            .iter()
            .map(|item| item.as_u64().and_then(|n| u8::try_from(n).ok()))
            .collect(),
        Value::Object(object) => {
            // Node's Buffer serialises as {"type": "Buffer", "data": [...]}.
            if let Some(data) = object.get("data") {
                return bytes_from_value(data);
            }
            let mut indexed = object
                .iter()
                .map(|(k, v)| {
                    let index = k.parse::<usize>().ok()?;
                    let byte = v.as_u64().and_then(|n| u8::try_from(n).ok())?;
                    Some((index, byte))
                })
                .collect::<Option<Vec<(usize, u8)>>>()?;
            indexed.sort_unstable_by_key(|(index, _)| *index);
            indexed
                .iter()
                .enumerate()
                .all(|(position, (index, _))| position == *index)
                .then(|| indexed.into_iter().map(|(_, byte)| byte).collect())
        }
        Value::String(text) => BASE64_STANDARD.decode(text.trim()).ok(),
        _ => None,
    }
}

fn normalize_text(text: &str) -> Option<String> {
    let trimmed = text.trim();
    if let Ok(address) = Address::from_str(trimmed) {
        return Some(address.as_str());
    }
    BASE64_STANDARD
        .decode(trimmed)
        .ok()
        .and_then(|bytes| normalize_bytes(&bytes))
}

fn normalize_bytes(bytes: &[u8]) -> Option<String> {
    if bytes.len() != ALGORAND_PUBLIC_KEY_BYTE_LENGTH {
        return None;
    }
    Address::try_from(bytes).ok().map(|address| address.as_str())
}

/// Which address wins when the stored address disagrees with the derived one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReconciliationPolicy {
    /// A mismatch is an error.
    #[default]
    Strict,
    /// Warn and use the address derived from the secret phrase.
    PreferDerived,
    /// Warn and use the stored address, provided it is a valid address.
    PreferStored,
}

impl ReconciliationPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReconciliationPolicy::Strict => "strict",
            ReconciliationPolicy::PreferDerived => "prefer-derived",
            ReconciliationPolicy::PreferStored => "prefer-stored",
        }
    }
}

impl Display for ReconciliationPolicy {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReconciliationPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "strict" => Ok(ReconciliationPolicy::Strict),
            "prefer-derived" => Ok(ReconciliationPolicy::PreferDerived),
            "prefer-stored" => Ok(ReconciliationPolicy::PreferStored),
            other => Err(format!(
                "unknown address policy '{}', expected strict, prefer-derived or prefer-stored",
                other
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconciliationStatus {
    Match,
    Mismatch,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reconciliation {
    pub status: ReconciliationStatus,
    /// The stored value after normalisation, when it had a usable form.
    pub stored: Option<String>,
    pub effective: String,
}

impl Reconciliation {
    pub fn is_match(&self) -> bool {
        self.status == ReconciliationStatus::Match
    }
}

/// Compares a stored address against the one derived from the secret phrase.
///
/// An absent stored address is a match. A stored value that cannot be normalised is a
/// mismatch, and `PreferStored` then falls back to the derived address.
pub fn reconcile(
    stored: Option<&AddressLike>,
    derived: &Address,
    policy: ReconciliationPolicy,
) -> Reconciliation {
    let derived = derived.as_str();
    let Some(stored) = stored else {
        return Reconciliation {
            status: ReconciliationStatus::Match,
            stored: None,
            effective: derived,
        };
    };

    let normalized = stored.normalize();
    if normalized.as_deref() == Some(derived.as_str()) {
        return Reconciliation {
            status: ReconciliationStatus::Match,
            stored: normalized,
            effective: derived,
        };
    }

    let effective = match (&normalized, policy) {
        (Some(stored), ReconciliationPolicy::PreferStored) => stored.clone(),
        _ => derived,
    };
    Reconciliation {
        status: ReconciliationStatus::Mismatch,
        stored: normalized,
        effective,
    }
}
