//! Builds and signs the deposit group and the single-transaction opt-in and info calls.

use crate::account_loader::SigningIdentity;
use crate::error::DepositError;
use groupfund_algod::{AlgodClient, AlgodError, TransactionParams};
use groupfund_transact::{
    Address, AlgorandMsgpack, ApplicationCallTransactionBuilder, Byte32, FeeParams,
    OnApplicationComplete, PaymentTransactionBuilder, SignedTransaction, Transaction,
    TransactionHeader, TransactionHeaderBuilder, TransactionId, Transactions,
};
use std::sync::Arc;

/// Argument naming the deposit action to the application.
pub const DEPOSIT_ARG: &[u8] = b"deposit";
/// Argument naming the info action to the application.
pub const INFO_ARG: &[u8] = b"info";

/// Signed transactions in submission order.
#[derive(Debug, Clone, PartialEq)]
pub struct SignedTransactionGroup {
    /// Present when there is more than one member.
    pub group_id: Option<Byte32>,
    pub transactions: Vec<SignedTransaction>,
}

impl SignedTransactionGroup {
    /// Concatenated signed bytes, ready for submission.
    pub fn encode(&self) -> Result<Vec<u8>, DepositError> {
        let mut encoded = Vec::new();
        for signed in &self.transactions {
            encoded.extend_from_slice(&signed.encode()?);
        }
        Ok(encoded)
    }

    pub fn tx_ids(&self) -> Result<Vec<String>, DepositError> {
        self.transactions
            .iter()
            .map(|signed| signed.id().map_err(DepositError::from))
            .collect()
    }

    /// Id of the first member, the one whose confirmation carries the application's logs.
    pub fn primary_tx_id(&self) -> Result<String, DepositError> {
        let first = self
            .transactions
            .first()
            .ok_or_else(|| input_error("transaction group is empty".to_string()))?;
        Ok(first.id()?)
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }
}

pub struct TransactionBuilder {
    algod: Arc<AlgodClient>,
    validity_window: u64,
}

impl TransactionBuilder {
    pub fn new(algod: Arc<AlgodClient>, validity_window: u64) -> Self {
        TransactionBuilder {
            algod,
            validity_window,
        }
    }

    /// Builds `[application call "deposit", payment to the application address]`.
    pub async fn deposit_group(
        &self,
        identity: &SigningIdentity,
        app_id: u64,
        amount: u64,
    ) -> Result<SignedTransactionGroup, DepositError> {
        validate_app_id(app_id)?;
        validate_amount(amount)?;
        let params = self.params().await?;
        assemble_deposit_group(identity, app_id, amount, &params, self.validity_window)
    }

    pub async fn opt_in(
        &self,
        identity: &SigningIdentity,
        app_id: u64,
    ) -> Result<SignedTransactionGroup, DepositError> {
        validate_app_id(app_id)?;
        let params = self.params().await?;
        assemble_app_call(
            identity,
            app_id,
            OnApplicationComplete::OptIn,
            None,
            &params,
            self.validity_window,
        )
    }

    pub async fn info_call(
        &self,
        identity: &SigningIdentity,
        app_id: u64,
    ) -> Result<SignedTransactionGroup, DepositError> {
        validate_app_id(app_id)?;
        let params = self.params().await?;
        assemble_app_call(
            identity,
            app_id,
            OnApplicationComplete::NoOp,
            Some(INFO_ARG),
            &params,
            self.validity_window,
        )
    }

    async fn params(&self) -> Result<TransactionParams, DepositError> {
        let params = self.algod.transaction_params().await?;
        log::debug!(
            "Using parameters from round {} on {}",
            params.last_round,
            params.genesis_id
        );
        Ok(params)
    }
}

pub fn validate_app_id(app_id: u64) -> Result<(), DepositError> {
    if app_id == 0 {
        return Err(DepositError::InvalidApplicationId {
            message: "application id must be a positive integer".to_string(),
        });
    }
    Ok(())
}

pub fn validate_amount(amount: u64) -> Result<(), DepositError> {
    if amount == 0 {
        return Err(DepositError::InvalidAmount {
            message: "deposit amount must be greater than zero".to_string(),
        });
    }
    Ok(())
}

/// Assembles and signs the deposit group from one parameter snapshot.
pub fn assemble_deposit_group(
    identity: &SigningIdentity,
    app_id: u64,
    amount: u64,
    params: &TransactionParams,
    validity_window: u64,
) -> Result<SignedTransactionGroup, DepositError> {
    validate_app_id(app_id)?;
    validate_amount(amount)?;

    let header = header_from_params(identity.address(), params, validity_window)?;
    let fees = fee_params(params);

    let app_call = ApplicationCallTransactionBuilder::default()
        .header(header.clone())
        .app_id(app_id)
        .on_complete(OnApplicationComplete::NoOp)
        .args(vec![DEPOSIT_ARG.to_vec()])
        .build()
        .map_err(|e| input_error(e.to_string()))?
        .assign_fee(fees.clone())?;

    let payment = PaymentTransactionBuilder::default()
        .header(header)
        .receiver(Address::from_app_id(&app_id))
        .amount(amount)
        .build()
        .map_err(|e| input_error(e.to_string()))?
        .assign_fee(fees)?;

    let grouped = [app_call, payment].as_slice().assign_group()?;
    let group_id = grouped.first().and_then(|tx| tx.header().group);
    let transactions = grouped
        .iter()
        .map(|tx| identity.sign(tx))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(SignedTransactionGroup {
        group_id,
        transactions,
    })
}

/// Assembles and signs a single ungrouped application call.
pub fn assemble_app_call(
    identity: &SigningIdentity,
    app_id: u64,
    on_complete: OnApplicationComplete,
    arg: Option<&[u8]>,
    params: &TransactionParams,
    validity_window: u64,
) -> Result<SignedTransactionGroup, DepositError> {
    validate_app_id(app_id)?;

    let header = header_from_params(identity.address(), params, validity_window)?;
    let mut builder = ApplicationCallTransactionBuilder::default();
    builder
        .header(header)
        .app_id(app_id)
        .on_complete(on_complete);
    if let Some(arg) = arg {
        builder.args(vec![arg.to_vec()]);
    }
    let transaction: Transaction = builder
        .build()
        .map_err(|e| input_error(e.to_string()))?
        .assign_fee(fee_params(params))?;

    Ok(SignedTransactionGroup {
        group_id: None,
        transactions: vec![identity.sign(&transaction)?],
    })
}

fn header_from_params(
    sender: &Address,
    params: &TransactionParams,
    validity_window: u64,
) -> Result<TransactionHeader, DepositError> {
    let genesis_hash: Byte32 = params.genesis_hash.as_slice().try_into().map_err(|_| {
        DepositError::Network {
            source: AlgodError::Decode {
                message: format!(
                    "genesis hash must be 32 bytes, got {}",
                    params.genesis_hash.len()
                ),
            },
        }
    })?;
    let last_valid = params
        .last_round
        .checked_add(validity_window)
        .ok_or_else(|| DepositError::InvalidConfig {
            message: format!(
                "validity window {} overflows round {}",
                validity_window, params.last_round
            ),
        })?;

    TransactionHeaderBuilder::default()
        .sender(sender.clone())
        .first_valid(params.last_round)
        .last_valid(last_valid)
        .genesis_id(params.genesis_id.clone())
        .genesis_hash(genesis_hash)
        .build()
        .map_err(|e| input_error(e.to_string()))
}

fn fee_params(params: &TransactionParams) -> FeeParams {
    FeeParams {
        fee_per_byte: params.fee,
        min_fee: params.min_fee,
        extra_fee: None,
        max_fee: None,
    }
}

fn input_error(message: String) -> DepositError {
    DepositError::Transaction {
        source: groupfund_transact::GroupfundTransactError::InputError { message },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::{Engine, prelude::BASE64_STANDARD};
    use groupfund_transact::mnemonic::from_key;
    use groupfund_transact::test_utils::TESTNET_GENESIS_HASH;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn identity() -> SigningIdentity {
        SigningIdentity::from_secret_phrase(&from_key(&[7u8; 32])).unwrap()
    }

    fn params() -> TransactionParams {
        TransactionParams {
            consensus_version: "future".to_string(),
            fee: 0,
            last_round: 1_000,
            genesis_id: "testnet-v1.0".to_string(),
            genesis_hash: BASE64_STANDARD.decode(TESTNET_GENESIS_HASH).unwrap(),
            min_fee: 1_000,
        }
    }

    #[test]
    fn test_deposit_group_shape() {
        let group = assemble_deposit_group(&identity(), 42, 1_500_000, &params(), 1_000).unwrap();

        assert_eq!(group.len(), 2);
        let group_id = group.group_id.unwrap();
        let [app_call, payment] = [&group.transactions[0], &group.transactions[1]];

        match &app_call.transaction {
            Transaction::ApplicationCall(fields) => {
                assert_eq!(fields.app_id, 42);
                assert_eq!(fields.args, Some(vec![DEPOSIT_ARG.to_vec()]));
            }
            other => panic!("expected app call first, got {:?}", other),
        }
        match &payment.transaction {
            Transaction::Payment(fields) => {
                assert_eq!(
                    fields.receiver.as_str(),
                    "MW6NSXPOT4R6EQCK4VRNZOJSAKSPQ5TXYZQBCJXXYBK4ET4E7R74GVWL2Q"
                );
                assert_eq!(fields.amount, 1_500_000);
            }
            other => panic!("expected payment second, got {:?}", other),
        }

        for signed in &group.transactions {
            let header = signed.transaction.header();
            assert_eq!(header.group, Some(group_id));
            assert_eq!(
                header.sender.as_str(),
                "5JFGYY7CTRJAVPXVKB5RGLWF7GKUO5VOX27HXESCD3VGSFCG2IWAKDM5YU"
            );
            assert_eq!(header.first_valid, 1_000);
            assert_eq!(header.last_valid, 2_000);
            assert_eq!(header.fee, Some(1_000));
            assert!(signed.signature.is_some());
            assert_eq!(signed.auth_address, None);
        }
    }

    #[test]
    fn test_group_encoding_preserves_order() {
        let group = assemble_deposit_group(&identity(), 42, 1, &params(), 10).unwrap();
        let first = group.transactions[0].encode().unwrap();
        let second = group.transactions[1].encode().unwrap();

        let encoded = group.encode().unwrap();

        assert_eq!(encoded, [first, second].concat());
        assert_eq!(group.primary_tx_id().unwrap(), group.tx_ids().unwrap()[0]);
    }

    #[rstest]
    #[case::zero_amount(42, 0)]
    #[case::zero_app(0, 1)]
    fn test_invalid_input_builds_nothing(#[case] app_id: u64, #[case] amount: u64) {
        let err = assemble_deposit_group(&identity(), app_id, amount, &params(), 10).unwrap_err();
        assert!(matches!(
            err,
            DepositError::InvalidAmount { .. } | DepositError::InvalidApplicationId { .. }
        ));
    }

    #[test]
    fn test_opt_in_and_info_are_single_ungrouped_calls() {
        let opt_in = assemble_app_call(
            &identity(),
            42,
            OnApplicationComplete::OptIn,
            None,
            &params(),
            10,
        )
        .unwrap();
        let info = assemble_app_call(
            &identity(),
            42,
            OnApplicationComplete::NoOp,
            Some(INFO_ARG),
            &params(),
            10,
        )
        .unwrap();

        for (group, on_complete, args) in [
            (&opt_in, OnApplicationComplete::OptIn, None),
            (&info, OnApplicationComplete::NoOp, Some(vec![INFO_ARG.to_vec()])),
        ] {
            assert_eq!(group.group_id, None);
            assert_eq!(group.len(), 1);
            match &group.transactions[0].transaction {
                Transaction::ApplicationCall(fields) => {
                    assert_eq!(fields.on_complete, on_complete);
                    assert_eq!(fields.args, args);
                    assert_eq!(fields.header.group, None);
                }
                other => panic!("expected app call, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_overflowing_validity_window_is_config_error() {
        let err = assemble_deposit_group(&identity(), 42, 1, &params(), u64::MAX).unwrap_err();
        assert!(matches!(err, DepositError::InvalidConfig { .. }));

        let err = assemble_app_call(
            &identity(),
            42,
            OnApplicationComplete::OptIn,
            None,
            &params(),
            u64::MAX,
        )
        .unwrap_err();
        assert!(matches!(err, DepositError::InvalidConfig { .. }));
    }

    #[test]
    fn test_environment_validity_window_cannot_overflow() {
        let config = crate::DepositConfig::from_lookup(|name| {
            (name == "GROUPFUND_VALIDITY_WINDOW").then(|| u64::MAX.to_string())
        })
        .unwrap();

        let err = assemble_deposit_group(&identity(), 42, 1, &params(), config.validity_window)
            .unwrap_err();
        assert!(matches!(err, DepositError::InvalidConfig { .. }));
    }

    #[test]
    fn test_bad_genesis_hash_is_network_error() {
        let mut params = params();
        params.genesis_hash = vec![1, 2, 3];
        let err = assemble_deposit_group(&identity(), 42, 1, &params, 10).unwrap_err();
        assert!(matches!(err, DepositError::Network { .. }));
    }
}
