//! Transport for subgraph requests
//!
//! The service speaks JSON in and JSON out through [`GraphQLTransport`], so the
//! HTTP client can be swapped (tests use an in-memory indexer).

use crate::Result;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use url::Url;

/// Posts a GraphQL request body and returns the raw response envelope
#[async_trait]
pub trait GraphQLTransport: Send + Sync {
    async fn post(&self, url: &Url, body: Value) -> Result<Value>;
}

/// HTTP transport over reqwest
#[derive(Debug, Clone, Default)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a preconfigured client (timeouts, proxies, headers)
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl GraphQLTransport for HttpTransport {
    async fn post(&self, url: &Url, body: Value) -> Result<Value> {
        let response = self
            .client
            .post(url.clone())
            .json(&body)
            .send()
            .await?
            .error_for_status()?;

        Ok(response.json().await?)
    }
}

#[cfg(test)]
pub(crate) mod fake {
    use super::*;
    use std::sync::Mutex;

    type Responder = Box<dyn Fn(&Value) -> Value + Send + Sync>;

    /// In-memory indexer that records every request
    pub(crate) struct FakeTransport {
        responder: Responder,
        requests: Mutex<Vec<(Url, Value)>>,
    }

    impl FakeTransport {
        pub(crate) fn new(responder: impl Fn(&Value) -> Value + Send + Sync + 'static) -> Self {
            Self {
                responder: Box::new(responder),
                requests: Mutex::new(Vec::new()),
            }
        }

        /// Always answers with the same envelope
        pub(crate) fn fixed(response: Value) -> Self {
            Self::new(move |_| response.clone())
        }

        pub(crate) fn requests(&self) -> Vec<(Url, Value)> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl GraphQLTransport for FakeTransport {
        async fn post(&self, url: &Url, body: Value) -> Result<Value> {
            let response = (self.responder)(&body);
            self.requests.lock().unwrap().push((url.clone(), body));
            Ok(response)
        }
    }
}
