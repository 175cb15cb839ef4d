#![allow(dead_code)]

use async_trait::async_trait;
use base64::{Engine, prelude::BASE64_STANDARD};
use groupfund_algod::{AlgodClient, TransactionParams};
use groupfund_core::{DepositConfig, SigningIdentity};
use groupfund_http_client::{HttpClient, HttpError, HttpMethod, HttpRequest, HttpResponse};
use groupfund_transact::test_utils::TESTNET_GENESIS_HASH;
use groupfund_transact::{AlgorandMsgpack, SignedTransaction, mnemonic};
use serde_json::{Value, json};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, Once};

static INIT_LOGGING: Once = Once::new();

pub fn init_test_logging() {
    INIT_LOGGING.call_once(|| {
        let _ = env_logger::builder()
            .is_test(true)
            .filter_level(log::LevelFilter::Debug)
            .try_init();
    });
}

pub type Scripted = Result<Vec<u8>, (u16, String)>;

struct Route {
    method: HttpMethod,
    path_prefix: String,
    responses: VecDeque<Scripted>,
    repeat_last: bool,
}

/// An in-memory algod: answers requests from scripted responses, in order, per route.
#[derive(Default)]
pub struct ScriptedHttpClient {
    routes: Mutex<Vec<Route>>,
    calls: Mutex<Vec<HttpRequest>>,
}

impl ScriptedHttpClient {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Queues one response for requests whose path starts with `path_prefix`.
    pub fn respond(&self, method: HttpMethod, path_prefix: &str, response: Scripted) -> &Self {
        self.push(method, path_prefix, response, false)
    }

    /// Answers every matching request with the same response.
    pub fn respond_always(
        &self,
        method: HttpMethod,
        path_prefix: &str,
        response: Scripted,
    ) -> &Self {
        self.push(method, path_prefix, response, true)
    }

    fn push(&self, method: HttpMethod, path_prefix: &str, response: Scripted, repeat: bool) -> &Self {
        let mut routes = self.routes.lock().unwrap();
        match routes
            .iter_mut()
            .find(|r| r.method == method && r.path_prefix == path_prefix)
        {
            Some(route) => {
                route.responses.push_back(response);
                route.repeat_last = repeat;
            }
            None => routes.push(Route {
                method,
                path_prefix: path_prefix.to_string(),
                responses: VecDeque::from([response]),
                repeat_last: repeat,
            }),
        }
        drop(routes);
        self
    }

    pub fn calls(&self) -> Vec<HttpRequest> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_to(&self, path_prefix: &str) -> Vec<HttpRequest> {
        self.calls()
            .into_iter()
            .filter(|c| c.path.starts_with(path_prefix))
            .collect()
    }

    /// Installs the usual params and status answers.
    pub fn with_network(self: Arc<Self>, last_round: u64) -> Arc<Self> {
        self.respond_always(
            HttpMethod::Get,
            "/v2/transactions/params",
            ok_json(params_json(last_round)),
        );
        self.respond_always(
            HttpMethod::Get,
            "/v2/status/wait-for-block-after/",
            ok_json(json!({ "last-round": last_round + 1 })),
        );
        self.respond_always(
            HttpMethod::Get,
            "/v2/status",
            ok_json(json!({ "last-round": last_round })),
        );
        self
    }
}

#[async_trait]
impl HttpClient for ScriptedHttpClient {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, HttpError> {
        let method = request.method;
        let path = request.path.clone();
        self.calls.lock().unwrap().push(request);

        let mut routes = self.routes.lock().unwrap();
        // Longest prefix wins so "/v2/status/wait..." is not answered by "/v2/status".
        let route = routes
            .iter_mut()
            .filter(|r| r.method == method && path.starts_with(&r.path_prefix))
            .max_by_key(|r| r.path_prefix.len());

        let scripted = match route {
            Some(route) if route.repeat_last && route.responses.len() == 1 => {
                route.responses.front().cloned()
            }
            Some(route) => route.responses.pop_front(),
            None => None,
        };

        match scripted {
            Some(Ok(body)) => Ok(HttpResponse { status: 200, body }),
            Some(Err((status, message))) => Err(HttpError::StatusError { status, message }),
            None => Err(HttpError::StatusError {
                status: 500,
                message: format!("unscripted request {} {}", method, path),
            }),
        }
    }
}

pub fn ok_json(value: Value) -> Scripted {
    Ok(value.to_string().into_bytes())
}

pub fn status(code: u16, message: &str) -> Scripted {
    Err((code, json!({ "message": message }).to_string()))
}

pub fn params_json(last_round: u64) -> Value {
    json!({
        "consensus-version": "future",
        "fee": 0,
        "genesis-hash": TESTNET_GENESIS_HASH,
        "genesis-id": "testnet-v1.0",
        "last-round": last_round,
        "min-fee": 1000
    })
}

pub fn params(last_round: u64) -> TransactionParams {
    serde_json::from_value(params_json(last_round)).unwrap()
}

pub fn b64(bytes: &[u8]) -> String {
    BASE64_STANDARD.encode(bytes)
}

pub fn secret_phrase() -> String {
    mnemonic::from_key(&[7u8; 32])
}

pub fn identity() -> SigningIdentity {
    SigningIdentity::from_secret_phrase(&secret_phrase()).unwrap()
}

pub fn algod(http: &Arc<ScriptedHttpClient>) -> Arc<AlgodClient> {
    Arc::new(AlgodClient::new(http.clone()))
}

pub fn config() -> DepositConfig {
    DepositConfig::default()
}

/// Splits concatenated signed transactions as posted to `/v2/transactions`.
pub fn split_signed(mut bytes: &[u8]) -> Vec<SignedTransaction> {
    let mut signed = Vec::new();
    while !bytes.is_empty() {
        let value = rmpv::decode::read_value(&mut bytes).unwrap();
        let mut buf = Vec::new();
        rmpv::encode::write_value(&mut buf, &value).unwrap();
        signed.push(SignedTransaction::decode(&buf).unwrap());
    }
    signed
}
