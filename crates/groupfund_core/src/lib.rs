//! Client side of a grouped-deposit Algorand application.
//!
//! The flow is: load a [`SigningIdentity`] from a credential record, build and sign the
//! transaction(s) for an action, submit them and poll for confirmation. [`DepositClient`]
//! wires the pieces together.

pub mod account_loader;
pub mod address_resolver;
pub mod builder;
pub mod client;
pub mod config;
pub mod credentials;
mod error;
pub mod tracker;

pub use account_loader::{AccountLoader, SigningIdentity};
pub use address_resolver::{
    AddressLike, Reconciliation, ReconciliationPolicy, ReconciliationStatus, reconcile,
};
pub use builder::{DEPOSIT_ARG, INFO_ARG, SignedTransactionGroup, TransactionBuilder};
pub use client::{DepositClient, to_micro_units};
pub use config::{AlgoClientConfig, DepositConfig, TokenHeader};
pub use credentials::{
    CredentialRecord, CredentialStore, DeploymentRecord, JsonFileCredentialStore,
    RepairOutcome, repair_credentials,
};
pub use error::DepositError;
pub use groupfund_algod::AccountInformation;
pub use tracker::{
    ConfirmationResult, ConfirmationTracker, DecodingIssue, DecodingLocation, InnerTransaction,
    InnerTransactionType,
};
