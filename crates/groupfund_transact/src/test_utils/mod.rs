mod application_call;

use crate::{
    Byte32, KeyPairAccount, PaymentTransactionBuilder, SigningKeyPair, Transaction,
    TransactionHeaderBuilder,
};
use base64::{Engine, prelude::BASE64_STANDARD};

pub use application_call::ApplicationCallTransactionMother;

pub const TESTNET_GENESIS_HASH: &str = "SGO1GKSzyE7IEPItTxCByw9x8FmnrCDexi9/cOUJOiI=";

fn genesis_hash(encoded: &str) -> Byte32 {
    BASE64_STANDARD
        .decode(encoded)
        .unwrap()
        .try_into()
        .unwrap()
}

pub struct TransactionHeaderMother {}
impl TransactionHeaderMother {
    /// A TestNet header as a deposit built at round 50659540 would carry.
    pub fn simple_testnet() -> TransactionHeaderBuilder {
        TransactionHeaderBuilder::default()
            .genesis_id(String::from("testnet-v1.0"))
            .genesis_hash(genesis_hash(TESTNET_GENESIS_HASH))
            .fee(1000)
            .sender(AccountMother::account().address())
            .first_valid(50659540)
            .last_valid(50660540)
            .to_owned()
    }

    pub fn example() -> TransactionHeaderBuilder {
        TransactionHeaderBuilder::default()
            .genesis_id(String::from("example"))
            .genesis_hash(genesis_hash("3r2+nRwL99aTROTiOtPEeUQarv2fATkmNliHqfGxNJA="))
            .first_valid(1)
            .last_valid(999)
            .fee(1000)
            .sender(AccountMother::example().address())
            .to_owned()
    }
}

pub struct TransactionMother {}
impl TransactionMother {
    pub fn simple_payment() -> PaymentTransactionBuilder {
        PaymentTransactionBuilder::default()
            .header(TransactionHeaderMother::simple_testnet().build().unwrap())
            .amount(101000)
            .receiver(
                "VXH5UP6JLU2CGIYPUFZ4Z5OTLJCLMA5EXD3YHTMVNDE5P7ILZ324FSYSPQ"
                    .parse()
                    .unwrap(),
            )
            .to_owned()
    }

    pub fn payment_group(number_of_transactions: usize) -> Vec<Transaction> {
        (0..number_of_transactions)
            .map(|i| {
                Self::simple_payment()
                    .header(
                        TransactionHeaderMother::simple_testnet()
                            .note(format!("tx:{}", i).into_bytes())
                            .build()
                            .unwrap(),
                    )
                    .build()
                    .unwrap()
            })
            .collect()
    }
}

pub struct AccountMother {}
impl AccountMother {
    pub fn account() -> KeyPairAccount {
        "RIMARGKZU46OZ77OLPDHHPUJ7YBSHRTCYMQUC64KZCCMESQAFQMYU6SL2Q"
            .parse()
            .unwrap()
    }

    pub fn example() -> KeyPairAccount {
        "ALGOC4J2BCZ33TCKSSAMV5GAXQBMV3HDCHDBSPRBZRNSR7BM2FFDZRFGXA"
            .parse()
            .unwrap()
    }

    /// A deterministic signing key; its secret phrase is `crate::mnemonic::from_key(&[7; 32])`.
    pub fn signer() -> SigningKeyPair {
        SigningKeyPair::from_seed(&[7u8; 32])
    }
}
