use crate::error::GroupfundTransactError;

/// How a fee is derived from a transaction's estimated signed size.
#[derive(Debug, Clone, PartialEq)]
pub struct FeeParams {
    pub fee_per_byte: u64,
    /// Floor applied before `extra_fee`.
    pub min_fee: u64,
    pub extra_fee: Option<u64>,
    /// Upper bound on the result, if any.
    pub max_fee: Option<u64>,
}

impl FeeParams {
    pub fn fee_for_size(&self, size: usize) -> Result<u64, GroupfundTransactError> {
        let overflow = || GroupfundTransactError::InputError {
            message: format!("Fee for a {} byte transaction overflows", size),
        };

        let by_size = self
            .fee_per_byte
            .checked_mul(size as u64)
            .ok_or_else(overflow)?;
        let fee = by_size
            .max(self.min_fee)
            .checked_add(self.extra_fee.unwrap_or(0))
            .ok_or_else(overflow)?;

        match self.max_fee {
            Some(max_fee) if fee > max_fee => Err(GroupfundTransactError::InputError {
                message: format!(
                    "Transaction fee {} µALGO is greater than max fee {} µALGO",
                    fee, max_fee
                ),
            }),
            _ => Ok(fee),
        }
    }
}
