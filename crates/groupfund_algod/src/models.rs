use serde::{Deserialize, Serialize};
use serde_with::{base64::Base64, serde_as};

/// Parameters needed to stamp a transaction, as returned by `/v2/transactions/params`.
#[serde_as]
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct TransactionParams {
    pub consensus_version: String,
    pub fee: u64,
    pub last_round: u64,
    pub genesis_id: String,
    #[serde_as(as = "Base64")]
    pub genesis_hash: Vec<u8>,
    pub min_fee: u64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RawTransactionResponse {
    #[serde(rename = "txId")]
    pub tx_id: String,
}

/// Subset of `/v2/status` the client relies on.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct NodeStatus {
    pub last_round: u64,
    #[serde(default)]
    pub time_since_last_round: u64,
    #[serde(default)]
    pub catchup_time: u64,
}

/// A pending or recently confirmed transaction in JSON form.
///
/// Logs stay base64 and the signed transaction stays untyped so that one bad entry can be
/// reported without discarding the rest of the response.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct PendingTransactionResponse {
    #[serde(default)]
    pub confirmed_round: Option<u64>,
    #[serde(default)]
    pub pool_error: String,
    #[serde(default)]
    pub logs: Option<Vec<serde_json::Value>>,
    #[serde(default)]
    pub inner_txns: Option<Vec<PendingTransactionResponse>>,
    #[serde(default)]
    pub application_index: Option<u64>,
    #[serde(default)]
    pub txn: serde_json::Value,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct AccountInformation {
    pub address: String,
    pub amount: u64,
    #[serde(default)]
    pub min_balance: u64,
    #[serde(default)]
    pub round: u64,
    #[serde(default)]
    pub status: Option<String>,
}
