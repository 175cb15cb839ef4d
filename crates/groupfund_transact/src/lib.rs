mod address;
pub mod constants;
mod error;
mod keypair_account;
pub mod mnemonic;
mod traits;
mod transactions;
mod utils;

// Re-export all the public items
pub use address::Address;
pub use constants::*;
pub use error::GroupfundTransactError;
pub use keypair_account::{KeyPairAccount, SigningKeyPair};
pub use traits::{AlgorandMsgpack, EstimateTransactionSize, TransactionId, Transactions};
pub use transactions::{
    ApplicationCallTransactionBuilder, ApplicationCallTransactionFields, FeeParams,
    OnApplicationComplete, PaymentTransactionBuilder, PaymentTransactionFields, SignedTransaction,
    Transaction, TransactionHeader, TransactionHeaderBuilder, validate_args,
};
pub use utils::compute_group_id;

#[cfg(test)]
mod tests;

#[cfg(feature = "test_utils")]
pub mod test_utils;
