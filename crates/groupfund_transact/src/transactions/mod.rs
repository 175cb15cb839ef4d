//! Transaction models for the two transaction types the deposit protocol submits,
//! along with fee assignment, grouping and the signed envelope.

mod application_call;
mod common;
mod fees;
mod payment;
mod signed;

pub use application_call::{
    ApplicationCallTransactionBuilder, ApplicationCallTransactionFields, OnApplicationComplete,
    validate_args,
};
pub use common::{TransactionHeader, TransactionHeaderBuilder};
pub use fees::FeeParams;
pub use payment::{PaymentTransactionBuilder, PaymentTransactionFields};
pub use signed::SignedTransaction;

use crate::constants::{ALGORAND_SIGNATURE_ENCODING_INCR, TRANSACTION_DOMAIN_PREFIX};
use crate::error::GroupfundTransactError;
use crate::traits::{AlgorandMsgpack, EstimateTransactionSize, TransactionId, Transactions};
use crate::utils::compute_group_id;
use serde::{Deserialize, Serialize};

/// Enumeration of the supported transaction types.
#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
#[serde(tag = "type")]
pub enum Transaction {
    #[serde(rename = "pay")]
    Payment(PaymentTransactionFields),

    #[serde(rename = "appl")]
    ApplicationCall(ApplicationCallTransactionFields),
}

impl Transaction {
    pub fn header(&self) -> &TransactionHeader {
        match self {
            Transaction::Payment(p) => &p.header,
            Transaction::ApplicationCall(a) => &a.header,
        }
    }

    pub fn header_mut(&mut self) -> &mut TransactionHeader {
        match self {
            Transaction::Payment(p) => &mut p.header,
            Transaction::ApplicationCall(a) => &mut a.header,
        }
    }

    /// Returns a copy with the fee set from the estimated signed size.
    pub fn assign_fee(&self, params: FeeParams) -> Result<Transaction, GroupfundTransactError> {
        let fee = params.fee_for_size(self.estimate_size()?)?;
        let mut tx = self.clone();
        tx.header_mut().fee = Some(fee);
        Ok(tx)
    }
}

impl AlgorandMsgpack for Transaction {
    const PREFIX: &'static [u8] = TRANSACTION_DOMAIN_PREFIX;
}

impl TransactionId for Transaction {}

impl EstimateTransactionSize for Transaction {
    fn estimate_size(&self) -> Result<usize, GroupfundTransactError> {
        Ok(self.encode_raw()?.len() + ALGORAND_SIGNATURE_ENCODING_INCR)
    }
}

impl Transactions for &[Transaction] {
    /// Computes the group id over the transactions in order and stamps it on each of them.
    fn assign_group(self) -> Result<Vec<Transaction>, GroupfundTransactError> {
        let group_id = compute_group_id(self)?;
        Ok(self
            .iter()
            .map(|tx| {
                let mut tx = tx.clone();
                tx.header_mut().group = Some(group_id);
                tx
            })
            .collect())
    }
}
