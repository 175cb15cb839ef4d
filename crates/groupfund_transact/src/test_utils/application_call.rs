use crate::{
    ApplicationCallTransactionBuilder, OnApplicationComplete,
    test_utils::TransactionHeaderMother,
};

pub struct ApplicationCallTransactionMother {}

impl ApplicationCallTransactionMother {
    pub fn deposit_call() -> ApplicationCallTransactionBuilder {
        ApplicationCallTransactionBuilder::default()
            .header(TransactionHeaderMother::simple_testnet().build().unwrap())
            .app_id(42)
            .on_complete(OnApplicationComplete::NoOp)
            .args(vec![b"deposit".to_vec()])
            .to_owned()
    }

    pub fn opt_in() -> ApplicationCallTransactionBuilder {
        ApplicationCallTransactionBuilder::default()
            .header(TransactionHeaderMother::simple_testnet().build().unwrap())
            .app_id(42)
            .on_complete(OnApplicationComplete::OptIn)
            .to_owned()
    }
}
