//! The transport seam between the algod client and the network.
//!
//! Everything above this crate talks to algod through [`HttpClient::send`], which lets tests
//! swap in a scripted client. The reqwest-backed [`DefaultHttpClient`] is behind the
//! `default_client` feature.

mod error;
mod request;
#[cfg(feature = "default_client")]
mod reqwest_client;

pub use error::HttpError;
pub use request::{HttpMethod, HttpRequest, HttpResponse};
#[cfg(feature = "default_client")]
pub use reqwest_client::DefaultHttpClient;

use async_trait::async_trait;

/// Sends requests relative to a base URL the implementation knows about.
///
/// Responses outside 2xx come back as [`HttpError::StatusError`] with the body text, so a
/// rejected request can be told apart from one that never reached the node.
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, HttpError>;
}
