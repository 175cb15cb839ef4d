//! Error types for the groupfund transact crate.
//!
//! This module defines the failures that can occur while parsing addresses, deriving keys
//! from secret phrases, and encoding, decoding or grouping transactions.

use snafu::Snafu;

/// Represents errors that can occur during transaction and key operations.
#[derive(Debug, Snafu)]
pub enum GroupfundTransactError {
    #[snafu(display("Error ocurred during encoding: {source}"))]
    EncodingError { source: rmp_serde::encode::Error },

    #[snafu(display("Error ocurred during decoding: {source}"))]
    DecodingError { source: rmp_serde::decode::Error },

    #[snafu(display("Error ocurred during msgpack encoding: {source}"))]
    MsgpackEncodingError { source: rmpv::encode::Error },

    #[snafu(display("Error ocurred during msgpack decoding: {source}"))]
    MsgpackDecodingError { source: rmpv::decode::Error },

    #[snafu(display("{message}"))]
    InputError { message: String },

    #[snafu(display("{message}"))]
    InvalidAddress { message: String },

    #[snafu(display("Invalid mnemonic: {message}"))]
    InvalidMnemonic { message: String },
}

impl From<rmp_serde::encode::Error> for GroupfundTransactError {
    fn from(source: rmp_serde::encode::Error) -> Self {
        GroupfundTransactError::EncodingError { source }
    }
}

impl From<rmp_serde::decode::Error> for GroupfundTransactError {
    fn from(source: rmp_serde::decode::Error) -> Self {
        GroupfundTransactError::DecodingError { source }
    }
}

impl From<rmpv::encode::Error> for GroupfundTransactError {
    fn from(source: rmpv::encode::Error) -> Self {
        GroupfundTransactError::MsgpackEncodingError { source }
    }
}

impl From<rmpv::decode::Error> for GroupfundTransactError {
    fn from(source: rmpv::decode::Error) -> Self {
        GroupfundTransactError::MsgpackDecodingError { source }
    }
}
