//! Application call transactions invoke a deployed smart contract.
//!
//! The deposit protocol uses two shapes: a NoOp call carrying a single text argument
//! that names the action (`deposit`, `info`), and an OptIn call with no arguments.

use crate::address::Address;
use crate::utils::{is_empty_vec_opt, is_zero};
use crate::{GroupfundTransactError, MAX_APP_ARGS, MAX_ARGS_SIZE, Transaction, TransactionHeader};
use derive_builder::Builder;
use serde::{Deserialize, Serialize};
use serde_repr::{Deserialize_repr, Serialize_repr};
use serde_with::{Bytes, serde_as, skip_serializing_none};

/// On-completion actions for application transactions.
#[derive(Serialize_repr, Deserialize_repr, Debug, PartialEq, Clone, Copy, Default)]
#[repr(u8)]
pub enum OnApplicationComplete {
    /// Simply call the approval program.
    #[default]
    NoOp = 0,

    /// Allocate local state for the application in the sender's account.
    OptIn = 1,

    /// Deallocate local state for the application from the sender's account.
    CloseOut = 2,

    /// Like CloseOut, but may never fail.
    ClearState = 3,

    /// Replace the approval and clear state programs.
    UpdateApplication = 4,

    /// Delete the application parameters from the creator's balance record.
    DeleteApplication = 5,
}

/// Represents an application call transaction.
#[serde_as]
#[skip_serializing_none]
#[derive(Serialize, Deserialize, Debug, PartialEq, Clone, Builder)]
#[builder(
    name = "ApplicationCallTransactionBuilder",
    setter(strip_option),
    build_fn(name = "build_fields", validate = "Self::validate")
)]
pub struct ApplicationCallTransactionFields {
    /// Common transaction header fields.
    #[serde(flatten)]
    pub header: TransactionHeader,

    /// ID of the application being called.
    #[serde(rename = "apid")]
    #[serde(skip_serializing_if = "is_zero")]
    #[serde(default)]
    pub app_id: u64,

    /// Defines what additional actions occur with the transaction.
    #[serde(rename = "apan")]
    #[serde(skip_serializing_if = "is_default_on_complete")]
    #[serde(default)]
    #[builder(default)]
    pub on_complete: OnApplicationComplete,

    /// Transaction specific arguments available to the approval program.
    #[serde(rename = "apaa")]
    #[serde_as(as = "Option<Vec<Bytes>>")]
    #[serde(skip_serializing_if = "is_empty_vec_opt")]
    #[serde(default)]
    #[builder(default)]
    pub args: Option<Vec<Vec<u8>>>,

    /// Accounts in addition to the sender that the program may access.
    #[serde(rename = "apat")]
    #[serde(skip_serializing_if = "is_empty_vec_opt")]
    #[serde(default)]
    #[builder(default)]
    pub account_references: Option<Vec<Address>>,

    /// Applications in addition to `app_id` that the program may access.
    #[serde(rename = "apfa")]
    #[serde(skip_serializing_if = "is_empty_vec_opt")]
    #[serde(default)]
    #[builder(default)]
    pub app_references: Option<Vec<u64>>,

    /// Assets whose parameters the program may read.
    #[serde(rename = "apas")]
    #[serde(skip_serializing_if = "is_empty_vec_opt")]
    #[serde(default)]
    #[builder(default)]
    pub asset_references: Option<Vec<u64>>,
}

impl ApplicationCallTransactionBuilder {
    pub fn build(&self) -> Result<Transaction, ApplicationCallTransactionBuilderError> {
        self.build_fields().map(Transaction::ApplicationCall)
    }

    fn validate(&self) -> Result<(), String> {
        if let Some(Some(args)) = &self.args {
            validate_args(args).map_err(|e| e.to_string())?;
        }
        Ok(())
    }
}

fn is_default_on_complete(on_complete: &OnApplicationComplete) -> bool {
    matches!(on_complete, OnApplicationComplete::NoOp)
}

/// Checks the argument count and combined size limits enforced by the network.
pub fn validate_args(args: &[Vec<u8>]) -> Result<(), GroupfundTransactError> {
    if args.len() > MAX_APP_ARGS {
        return Err(GroupfundTransactError::InputError {
            message: format!(
                "Application call has {} args, the maximum is {}",
                args.len(),
                MAX_APP_ARGS
            ),
        });
    }
    let total: usize = args.iter().map(Vec::len).sum();
    if total > MAX_ARGS_SIZE {
        return Err(GroupfundTransactError::InputError {
            message: format!(
                "Application call args total {} bytes, the maximum is {}",
                total, MAX_ARGS_SIZE
            ),
        });
    }
    Ok(())
}
