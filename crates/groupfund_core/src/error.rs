//! The error kinds surfaced by deposit, opt-in and info operations.

use groupfund_algod::AlgodError;
use groupfund_transact::GroupfundTransactError;
use snafu::Snafu;

#[derive(Debug, Snafu)]
pub enum DepositError {
    #[snafu(display("Invalid credential: {message}"))]
    InvalidCredential { message: String },

    #[snafu(display("Stored address {stored} does not match derived address {derived}"))]
    AddressMismatch { stored: String, derived: String },

    #[snafu(display("Invalid amount: {message}"))]
    InvalidAmount { message: String },

    #[snafu(display("Submission rejected: {reason}"))]
    SubmissionRejected { reason: String },

    #[snafu(display("Transaction {tx_id} unconfirmed after {rounds} rounds"))]
    ConfirmationTimeout { tx_id: String, rounds: u32 },

    #[snafu(display("Invalid application id: {message}"))]
    InvalidApplicationId { message: String },

    #[snafu(display("Invalid configuration: {message}"))]
    InvalidConfig { message: String },

    #[snafu(display("Storage error: {message}"))]
    Storage { message: String },

    #[snafu(display("Network error: {source}"))]
    Network { source: AlgodError },

    #[snafu(display("Transaction error: {source}"))]
    Transaction { source: GroupfundTransactError },
}

impl DepositError {
    /// Whether this is the network's answer to opting in an account that already is.
    pub fn is_already_opted_in(&self) -> bool {
        match self {
            DepositError::SubmissionRejected { reason } => {
                reason.to_lowercase().contains("already opted in")
            }
            _ => false,
        }
    }

    /// A timed out transaction may still confirm later.
    pub fn may_still_confirm(&self) -> bool {
        matches!(self, DepositError::ConfirmationTimeout { .. })
    }
}

impl From<AlgodError> for DepositError {
    fn from(source: AlgodError) -> Self {
        DepositError::Network { source }
    }
}

impl From<GroupfundTransactError> for DepositError {
    fn from(source: GroupfundTransactError) -> Self {
        DepositError::Transaction { source }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(
        "TransactionPool.Remember: transaction ABC: logic eval error: account XYZ has already opted in to app 42",
        true
    )]
    #[case("account XYZ has ALREADY OPTED IN to app 42", true)]
    #[case("overspend (account XYZ, data {_struct:{} Status:Offline MicroAlgos:{Raw:0}})", false)]
    fn test_already_opted_in_detection(#[case] reason: &str, #[case] expected: bool) {
        let err = DepositError::SubmissionRejected {
            reason: reason.to_string(),
        };
        assert_eq!(err.is_already_opted_in(), expected);
    }

    #[test]
    fn test_timeout_is_not_a_rejection() {
        let err = DepositError::ConfirmationTimeout {
            tx_id: "ID".to_string(),
            rounds: 4,
        };
        assert!(!err.is_already_opted_in());
        assert!(err.may_still_confirm());
        assert_eq!(err.to_string(), "Transaction ID unconfirmed after 4 rounds");
    }
}
