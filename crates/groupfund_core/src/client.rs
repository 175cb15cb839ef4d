//! The operations callers use: opt in, deposit and info.

use crate::account_loader::{AccountLoader, SigningIdentity};
use crate::builder::TransactionBuilder;
use crate::config::DepositConfig;
use crate::credentials::CredentialStore;
use crate::error::DepositError;
use crate::tracker::{ConfirmationResult, ConfirmationTracker};
use groupfund_algod::{AccountInformation, AlgodClient};
use groupfund_transact::Address;
use std::sync::Arc;

pub struct DepositClient {
    algod: Arc<AlgodClient>,
    config: DepositConfig,
    builder: TransactionBuilder,
    tracker: ConfirmationTracker,
}

impl DepositClient {
    #[cfg(feature = "default_http_client")]
    pub fn new(config: DepositConfig) -> Result<Self, DepositError> {
        let algod = Arc::new(config.algod.algod_client()?);
        Ok(Self::with_algod(algod, config))
    }

    pub fn with_algod(algod: Arc<AlgodClient>, config: DepositConfig) -> Self {
        DepositClient {
            builder: TransactionBuilder::new(algod.clone(), config.validity_window),
            tracker: ConfirmationTracker::new(algod.clone()),
            algod,
            config,
        }
    }

    pub fn config(&self) -> &DepositConfig {
        &self.config
    }

    pub fn account_loader(&self) -> AccountLoader {
        AccountLoader::new(self.config.reconciliation)
    }

    pub fn load_identity(
        &self,
        store: &dyn CredentialStore,
    ) -> Result<SigningIdentity, DepositError> {
        self.account_loader().load_from_store(store)
    }

    /// Opts the identity in to the application.
    ///
    /// An account that is already opted in fails with `SubmissionRejected`; check
    /// [`DepositError::is_already_opted_in`] to treat that as benign.
    pub async fn opt_in(
        &self,
        identity: &SigningIdentity,
        app_id: u64,
    ) -> Result<ConfirmationResult, DepositError> {
        let group = self.builder.opt_in(identity, app_id).await?;
        self.tracker
            .submit_and_confirm(&group, self.config.max_rounds_to_wait)
            .await
    }

    /// Deposits `amount` whole units into the application as one atomic group.
    pub async fn deposit(
        &self,
        identity: &SigningIdentity,
        app_id: u64,
        amount: f64,
    ) -> Result<ConfirmationResult, DepositError> {
        let micro_units = self.to_micro_units(amount)?;
        log::info!(
            "Depositing {} micro-units from {} into application {}",
            micro_units,
            identity.address(),
            app_id
        );
        let group = self
            .builder
            .deposit_group(identity, app_id, micro_units)
            .await?;
        self.tracker
            .submit_and_confirm(&group, self.config.max_rounds_to_wait)
            .await
    }

    pub async fn info(
        &self,
        identity: &SigningIdentity,
        app_id: u64,
    ) -> Result<ConfirmationResult, DepositError> {
        let group = self.builder.info_call(identity, app_id).await?;
        self.tracker
            .submit_and_confirm(&group, self.config.max_rounds_to_wait)
            .await
    }

    pub async fn account_balance(
        &self,
        address: &Address,
    ) -> Result<AccountInformation, DepositError> {
        Ok(self.algod.account_information(&address.as_str()).await?)
    }

    pub fn to_micro_units(&self, amount: f64) -> Result<u64, DepositError> {
        to_micro_units(amount, self.config.micro_units_per_unit)
    }
}

/// Converts whole units to the smallest unit, rounding to the nearest integer.
pub fn to_micro_units(amount: f64, micro_units_per_unit: u64) -> Result<u64, DepositError> {
    if !amount.is_finite() {
        return Err(DepositError::InvalidAmount {
            message: format!("{} is not a finite number", amount),
        });
    }
    if amount <= 0.0 {
        return Err(DepositError::InvalidAmount {
            message: format!("{} is not greater than zero", amount),
        });
    }

    let micro_units = (amount * micro_units_per_unit as f64).round();
    if micro_units < 1.0 {
        return Err(DepositError::InvalidAmount {
            message: format!("{} rounds to zero micro-units", amount),
        });
    }
    if micro_units >= u64::MAX as f64 {
        return Err(DepositError::InvalidAmount {
            message: format!("{} is too large", amount),
        });
    }
    Ok(micro_units as u64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(1.5, 1_500_000)]
    #[case(0.000001, 1)]
    #[case(2.0, 2_000_000)]
    #[case(0.1 + 0.2, 300_000)]
    fn test_to_micro_units(#[case] amount: f64, #[case] expected: u64) {
        assert_eq!(to_micro_units(amount, 1_000_000).unwrap(), expected);
    }

    #[rstest]
    #[case::zero(0.0)]
    #[case::negative(-1.0)]
    #[case::nan(f64::NAN)]
    #[case::infinite(f64::INFINITY)]
    #[case::rounds_to_zero(0.0000004)]
    #[case::overflow(1e20)]
    fn test_to_micro_units_rejects(#[case] amount: f64) {
        assert!(matches!(
            to_micro_units(amount, 1_000_000).unwrap_err(),
            DepositError::InvalidAmount { .. }
        ));
    }
}
