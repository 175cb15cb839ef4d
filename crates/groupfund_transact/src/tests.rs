use crate::{
    ALGORAND_SIGNATURE_BYTE_LENGTH, AlgorandMsgpack, EstimateTransactionSize, MAX_TX_GROUP_SIZE,
    SignedTransaction, Transaction, TransactionId, Transactions, compute_group_id,
    test_utils::{AccountMother, ApplicationCallTransactionMother, TransactionMother},
};
use pretty_assertions::assert_eq;

#[test]
fn test_payment_transaction_encoding() {
    let tx_builder = TransactionMother::simple_payment();
    let payment_tx_fields = tx_builder.build_fields().unwrap();
    let payment_tx = tx_builder.build().unwrap();

    let encoded = payment_tx.encode().unwrap();
    let decoded = Transaction::decode(&encoded).unwrap();
    assert_eq!(decoded, payment_tx);
    assert_eq!(decoded, Transaction::Payment(payment_tx_fields));

    let raw_encoded = payment_tx.encode_raw().unwrap();
    assert_eq!(&encoded[..2], b"TX");
    assert_eq!(encoded.len(), raw_encoded.len() + 2);
    assert_eq!(encoded[2..], raw_encoded);
}

#[test]
fn test_signed_transaction_encoding() {
    let payment_tx = TransactionMother::simple_payment().build().unwrap();

    let signed_tx = SignedTransaction {
        transaction: payment_tx.clone(),
        signature: Some([0; ALGORAND_SIGNATURE_BYTE_LENGTH]),
        auth_address: None,
    };
    let encoded_stx = signed_tx.encode().unwrap();
    let decoded_stx = SignedTransaction::decode(&encoded_stx).unwrap();
    assert_eq!(decoded_stx, signed_tx);
    assert_eq!(decoded_stx.id().unwrap(), payment_tx.id().unwrap());
    assert_eq!(signed_tx.estimate_size().unwrap(), encoded_stx.len());

    let rekeyed = SignedTransaction {
        auth_address: Some(AccountMother::example().address()),
        ..signed_tx
    };
    let decoded_rekeyed = SignedTransaction::decode(&rekeyed.encode().unwrap()).unwrap();
    assert_eq!(decoded_rekeyed, rekeyed);
}

#[test]
fn test_signed_app_call_decodes_to_app_call() {
    let signer = AccountMother::signer();
    let tx = ApplicationCallTransactionMother::deposit_call().build().unwrap();
    let signed = signer.sign_transaction(&tx).unwrap();

    let decoded = SignedTransaction::decode(&signed.encode().unwrap()).unwrap();
    assert!(matches!(decoded.transaction, Transaction::ApplicationCall(_)));
    assert_eq!(decoded, signed);
}

#[test]
fn test_assign_group_stamps_same_id_on_every_member() {
    let txs = TransactionMother::payment_group(2);
    let expected = compute_group_id(&txs).unwrap();

    let grouped = txs.as_slice().assign_group().unwrap();

    assert_eq!(grouped.len(), 2);
    for tx in &grouped {
        assert_eq!(tx.header().group, Some(expected));
    }
    // The group id is computed over the ungrouped ids, so members' ids change.
    assert_ne!(grouped[0].id().unwrap(), txs[0].id().unwrap());
}

#[test]
fn test_group_id_depends_on_order() {
    let txs = TransactionMother::payment_group(2);
    let reversed: Vec<Transaction> = txs.iter().rev().cloned().collect();
    assert_ne!(
        compute_group_id(&txs).unwrap(),
        compute_group_id(&reversed).unwrap()
    );
}

#[test]
fn test_group_limits() {
    let empty: Vec<Transaction> = vec![];
    let err = empty.as_slice().assign_group().unwrap_err();
    assert_eq!(err.to_string(), "Transaction group size cannot be 0");

    let too_many = TransactionMother::payment_group(MAX_TX_GROUP_SIZE + 1);
    let err = too_many.as_slice().assign_group().unwrap_err();
    assert_eq!(
        err.to_string(),
        "Transaction group size exceeds the max limit of 16"
    );

    let full = TransactionMother::payment_group(MAX_TX_GROUP_SIZE);
    assert!(full.as_slice().assign_group().is_ok());
}

#[test]
fn test_already_grouped_transactions_are_rejected() {
    let txs = TransactionMother::payment_group(2);
    let grouped = txs.as_slice().assign_group().unwrap();
    let err = grouped.as_slice().assign_group().unwrap_err();
    assert_eq!(err.to_string(), "Transactions must not already be grouped");
}

#[test]
fn test_fee_estimate_includes_signature_overhead() {
    let tx = TransactionMother::simple_payment().build().unwrap();
    let signed = AccountMother::signer().sign_transaction(&tx).unwrap();
    let estimate = tx.estimate_size().unwrap();
    assert!(estimate >= signed.encode().unwrap().len());
}
