//! A small typed client over the algod REST endpoints the deposit flow needs.

mod error;
mod models;

pub use error::AlgodError;
pub use models::{
    AccountInformation, NodeStatus, PendingTransactionResponse, RawTransactionResponse,
    TransactionParams,
};

use groupfund_http_client::{HttpClient, HttpRequest};
use serde::de::DeserializeOwned;
use std::sync::Arc;

#[cfg(feature = "default_client")]
use groupfund_http_client::DefaultHttpClient;

pub struct AlgodClient {
    http_client: Arc<dyn HttpClient>,
}

impl AlgodClient {
    pub fn new(http_client: Arc<dyn HttpClient>) -> Self {
        AlgodClient { http_client }
    }

    #[cfg(feature = "default_client")]
    pub fn testnet() -> Self {
        AlgodClient {
            http_client: Arc::new(DefaultHttpClient::new("https://testnet-api.algonode.cloud")),
        }
    }

    pub async fn transaction_params(&self) -> Result<TransactionParams, AlgodError> {
        self.get_json("/v2/transactions/params".to_string()).await
    }

    pub async fn get_status(&self) -> Result<NodeStatus, AlgodError> {
        self.get_json("/v2/status".to_string()).await
    }

    /// Blocks server side until the node has seen the round after `round`.
    pub async fn wait_for_block(&self, round: u64) -> Result<NodeStatus, AlgodError> {
        self.get_json(format!("/v2/status/wait-for-block-after/{}", round))
            .await
    }

    pub async fn pending_transaction_information(
        &self,
        tx_id: &str,
    ) -> Result<PendingTransactionResponse, AlgodError> {
        self.get_json(format!("/v2/transactions/pending/{}", tx_id))
            .await
    }

    pub async fn account_information(
        &self,
        address: &str,
    ) -> Result<AccountInformation, AlgodError> {
        self.get_json(format!("/v2/accounts/{}", address)).await
    }

    /// Submits one or more concatenated, msgpack-encoded signed transactions.
    pub async fn raw_transaction(
        &self,
        signed_bytes: Vec<u8>,
    ) -> Result<RawTransactionResponse, AlgodError> {
        let request = HttpRequest::post("/v2/transactions", signed_bytes)
            .header("Content-Type", "application/x-binary");
        log::debug!("Submitting {} signed bytes", request.body.as_ref().map_or(0, Vec::len));
        let response = self.http_client.send(request).await?;

        decode("/v2/transactions", &response.body)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: String) -> Result<T, AlgodError> {
        let request = HttpRequest::get(path.as_str()).query("format", "json");
        let response = self.http_client.send(request).await?;

        decode(&path, &response.body)
    }
}

fn decode<T: DeserializeOwned>(path: &str, body: &[u8]) -> Result<T, AlgodError> {
    serde_json::from_slice(body).map_err(|e| {
        log::warn!(
            "Undecodable response from {}: {}",
            path,
            String::from_utf8_lossy(body)
        );
        AlgodError::Decode {
            message: format!("{}: {}", path, e),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use groupfund_http_client::{HttpError, HttpMethod, HttpResponse};
    use pretty_assertions::assert_eq;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingClient {
        body: Vec<u8>,
        calls: Mutex<Vec<HttpRequest>>,
    }

    #[async_trait]
    impl HttpClient for RecordingClient {
        async fn send(&self, request: HttpRequest) -> Result<HttpResponse, HttpError> {
            self.calls.lock().unwrap().push(request);
            Ok(HttpResponse {
                status: 200,
                body: self.body.clone(),
            })
        }
    }

    #[tokio::test]
    async fn test_transaction_params_decode() {
        let http = Arc::new(RecordingClient {
            body: br#"{
                "consensus-version": "future",
                "fee": 0,
                "genesis-hash": "SGO1GKSzyE7IEPItTxCByw9x8FmnrCDexi9/cOUJOiI=",
                "genesis-id": "testnet-v1.0",
                "last-round": 1000,
                "min-fee": 1000
            }"#
            .to_vec(),
            ..Default::default()
        });
        let client = AlgodClient::new(http.clone());

        let params = client.transaction_params().await.unwrap();

        assert_eq!(params.genesis_id, "testnet-v1.0");
        assert_eq!(params.genesis_hash.len(), 32);
        assert_eq!(params.last_round, 1000);
        assert_eq!(params.min_fee, 1000);
        let calls = http.calls.lock().unwrap();
        assert_eq!(calls[0].path, "/v2/transactions/params");
        assert_eq!(
            calls[0].query,
            vec![("format".to_string(), "json".to_string())]
        );
    }

    #[tokio::test]
    async fn test_raw_transaction_posts_binary() {
        let http = Arc::new(RecordingClient {
            body: br#"{"txId":"ABC"}"#.to_vec(),
            ..Default::default()
        });
        let client = AlgodClient::new(http.clone());

        let response = client.raw_transaction(vec![1, 2, 3]).await.unwrap();

        assert_eq!(response.tx_id, "ABC");
        let calls = http.calls.lock().unwrap();
        assert_eq!(calls[0].method, HttpMethod::Post);
        assert_eq!(calls[0].path, "/v2/transactions");
        assert_eq!(calls[0].body, Some(vec![1, 2, 3]));
        assert_eq!(
            calls[0].header_value("Content-Type"),
            Some("application/x-binary")
        );
    }

    #[tokio::test]
    async fn test_malformed_body_is_decode_error() {
        let http = Arc::new(RecordingClient {
            body: b"not json".to_vec(),
            ..Default::default()
        });
        let client = AlgodClient::new(http);

        let err = client.get_status().await.unwrap_err();
        match err {
            AlgodError::Decode { message } => assert!(message.starts_with("/v2/status: ")),
            other => panic!("expected decode error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_pending_response_defaults() {
        let http = Arc::new(RecordingClient {
            body: br#"{"pool-error":"","txn":{"sig":"AA==","txn":{"type":"pay"}}}"#.to_vec(),
            ..Default::default()
        });
        let client = AlgodClient::new(http);

        let pending = client.pending_transaction_information("ID").await.unwrap();
        assert_eq!(pending.confirmed_round, None);
        assert_eq!(pending.logs, None);
        assert!(pending.pool_error.is_empty());
    }
}
