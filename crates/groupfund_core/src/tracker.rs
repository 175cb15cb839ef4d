//! Submission and bounded confirmation polling.

use crate::address_resolver::AddressLike;
use crate::builder::SignedTransactionGroup;
use crate::error::DepositError;
use base64::{Engine, prelude::BASE64_STANDARD};
use groupfund_algod::{AlgodClient, AlgodError, PendingTransactionResponse};
use serde_json::Value;
use std::num::NonZeroU32;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InnerTransactionType {
    Payment,
    AssetTransfer,
    /// Any other type, carrying the raw tag for the caller to filter on.
    Other(String),
}

impl From<&str> for InnerTransactionType {
    fn from(tag: &str) -> Self {
        match tag {
            "pay" => InnerTransactionType::Payment,
            "axfer" => InnerTransactionType::AssetTransfer,
            other => InnerTransactionType::Other(other.to_string()),
        }
    }
}

/// Uniform view of a transaction the application issued while processing the call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InnerTransaction {
    pub tx_type: InnerTransactionType,
    pub recipient: Option<String>,
    pub amount: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodingLocation {
    Log,
    InnerTransaction,
}

/// An entry that could not be decoded and was left out of the result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodingIssue {
    pub location: DecodingLocation,
    pub index: usize,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmationResult {
    pub tx_id: String,
    pub confirmed_round: u64,
    pub logs: Vec<String>,
    pub inner_transactions: Vec<InnerTransaction>,
    pub decoding_issues: Vec<DecodingIssue>,
}

impl ConfirmationResult {
    /// Builds the result from a confirmed pending-transaction response.
    pub fn from_response(
        tx_id: &str,
        confirmed_round: u64,
        response: &PendingTransactionResponse,
    ) -> Self {
        let mut issues = Vec::new();

        let logs: Vec<String> = response
            .logs
            .iter()
            .flatten()
            .enumerate()
            .filter_map(|(index, entry)| match decode_log(entry) {
                Ok(line) => Some(line),
                Err(message) => {
                    issues.push(DecodingIssue {
                        location: DecodingLocation::Log,
                        index,
                        message,
                    });
                    None
                }
            })
            .collect();

        let inner_transactions: Vec<InnerTransaction> = response
            .inner_txns
            .iter()
            .flatten()
            .enumerate()
            .filter_map(|(index, inner)| match decode_inner(inner) {
                Ok(decoded) => Some(decoded),
                Err(message) => {
                    issues.push(DecodingIssue {
                        location: DecodingLocation::InnerTransaction,
                        index,
                        message,
                    });
                    None
                }
            })
            .collect();

        for issue in &issues {
            log::warn!(
                "Could not decode {:?} #{} of {}: {}",
                issue.location,
                issue.index,
                tx_id,
                issue.message
            );
        }

        ConfirmationResult {
            tx_id: tx_id.to_string(),
            confirmed_round,
            logs,
            inner_transactions,
            decoding_issues: issues,
        }
    }

    /// Inner payments only, the usual place a refund shows up.
    pub fn inner_payments(&self) -> impl Iterator<Item = &InnerTransaction> {
        self.inner_transactions
            .iter()
            .filter(|inner| inner.tx_type == InnerTransactionType::Payment)
    }
}

fn decode_log(entry: &Value) -> Result<String, String> {
    let encoded = entry
        .as_str()
        .ok_or_else(|| format!("expected a base64 string, got {}", entry))?;
    let bytes = BASE64_STANDARD
        .decode(encoded)
        .map_err(|e| format!("invalid base64: {}", e))?;
    String::from_utf8(bytes).map_err(|e| format!("not valid UTF-8: {}", e))
}

fn decode_inner(inner: &PendingTransactionResponse) -> Result<InnerTransaction, String> {
    let txn = inner
        .txn
        .get("txn")
        .ok_or_else(|| "inner transaction has no txn body".to_string())?;
    let tag = txn
        .get("type")
        .and_then(Value::as_str)
        .ok_or_else(|| "inner transaction has no type".to_string())?;
    let tx_type = InnerTransactionType::from(tag);

    let (recipient_field, amount_field) = match tx_type {
        InnerTransactionType::Payment => ("rcv", "amt"),
        InnerTransactionType::AssetTransfer => ("arcv", "aamt"),
        InnerTransactionType::Other(_) => {
            return Ok(InnerTransaction {
                tx_type,
                recipient: None,
                amount: 0,
            });
        }
    };

    let recipient = match txn.get(recipient_field) {
        None | Some(Value::Null) => None,
        Some(value) => Some(
            AddressLike::from(value)
                .normalize()
                .ok_or_else(|| format!("unrecognised {} value {}", recipient_field, value))?,
        ),
    };
    let amount = match txn.get(amount_field) {
        None | Some(Value::Null) => 0,
        Some(value) => value
            .as_u64()
            .ok_or_else(|| format!("{} is not an unsigned integer: {}", amount_field, value))?,
    };

    Ok(InnerTransaction {
        tx_type,
        recipient,
        amount,
    })
}

pub struct ConfirmationTracker {
    algod: Arc<AlgodClient>,
}

impl ConfirmationTracker {
    pub fn new(algod: Arc<AlgodClient>) -> Self {
        ConfirmationTracker { algod }
    }

    /// Submits the whole group in one request and returns the first member's id.
    pub async fn submit(&self, group: &SignedTransactionGroup) -> Result<String, DepositError> {
        let tx_id = group.primary_tx_id()?;
        let encoded = group.encode()?;

        match self.algod.raw_transaction(encoded).await {
            Ok(response) => {
                log::info!(
                    "Submitted {} transaction(s), id {}",
                    group.len(),
                    response.tx_id
                );
                Ok(tx_id)
            }
            Err(error) => Err(classify_submission_error(error)),
        }
    }

    /// Polls once per round until the transaction confirms or `max_rounds` pass.
    pub async fn await_confirmation(
        &self,
        tx_id: &str,
        max_rounds: NonZeroU32,
    ) -> Result<ConfirmationResult, DepositError> {
        let status = self.algod.get_status().await?;
        let start_round = status.last_round + 1;
        let end_round = start_round + u64::from(max_rounds.get());
        let mut current_round = start_round;

        while current_round < end_round {
            match self.algod.pending_transaction_information(tx_id).await {
                Ok(response) => {
                    if !response.pool_error.is_empty() {
                        return Err(DepositError::SubmissionRejected {
                            reason: response.pool_error,
                        });
                    }
                    if let Some(confirmed_round) = response.confirmed_round {
                        log::info!("Transaction {} confirmed in round {}", tx_id, confirmed_round);
                        return Ok(ConfirmationResult::from_response(
                            tx_id,
                            confirmed_round,
                            &response,
                        ));
                    }
                }
                Err(error) if error.is_not_found() => {}
                Err(error) => return Err(error.into()),
            }

            log::debug!("Transaction {} pending at round {}", tx_id, current_round);
            self.algod.wait_for_block(current_round).await?;
            current_round += 1;
        }

        Err(DepositError::ConfirmationTimeout {
            tx_id: tx_id.to_string(),
            rounds: max_rounds.get(),
        })
    }

    pub async fn submit_and_confirm(
        &self,
        group: &SignedTransactionGroup,
        max_rounds: NonZeroU32,
    ) -> Result<ConfirmationResult, DepositError> {
        let tx_id = self.submit(group).await?;
        self.await_confirmation(&tx_id, max_rounds).await
    }
}

fn classify_submission_error(error: AlgodError) -> DepositError {
    if error.is_client_error() {
        let reason = match error {
            AlgodError::Api { message, .. } => message,
            other => other.to_string(),
        };
        log::warn!("Submission rejected: {}", reason);
        DepositError::SubmissionRejected { reason }
    } else {
        error.into()
    }
}
