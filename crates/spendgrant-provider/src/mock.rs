//! Scripted in-memory provider for tests
//!
//! Queues responses per method and records every request, so tests can assert
//! both outcomes and exact wire traffic (e.g. "no transaction was submitted").

use crate::{classify_provider_error, WalletProvider};
use async_trait::async_trait;
use serde_json::Value;
use spendgrant_types::Result;
use std::collections::{HashMap, VecDeque};
use tokio::sync::Mutex;

enum Scripted {
    Ok(Value),
    Err { code: i64, message: String },
}

/// Substitute `WalletProvider` backed by scripted responses.
#[derive(Default)]
pub struct MockProvider {
    responses: Mutex<HashMap<String, VecDeque<Scripted>>>,
    requests: Mutex<Vec<(String, Value)>>,
}

impl MockProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful response for `method`. Responses are consumed in
    /// FIFO order; the last one is sticky and replays forever.
    pub async fn on(&self, method: &str, result: Value) {
        self.responses
            .lock()
            .await
            .entry(method.to_string())
            .or_default()
            .push_back(Scripted::Ok(result));
    }

    /// Queue a provider error for `method`.
    pub async fn on_error(&self, method: &str, code: i64, message: &str) {
        self.responses
            .lock()
            .await
            .entry(method.to_string())
            .or_default()
            .push_back(Scripted::Err {
                code,
                message: message.to_string(),
            });
    }

    /// All requests issued so far, in order.
    pub async fn requests(&self) -> Vec<(String, Value)> {
        self.requests.lock().await.clone()
    }

    /// How many times `method` was called.
    pub async fn call_count(&self, method: &str) -> usize {
        self.requests
            .lock()
            .await
            .iter()
            .filter(|(m, _)| m == method)
            .count()
    }
}

#[async_trait]
impl WalletProvider for MockProvider {
    async fn request(&self, method: &str, params: Value) -> Result<Value> {
        self.requests
            .lock()
            .await
            .push((method.to_string(), params));

        let mut responses = self.responses.lock().await;
        let queue = responses
            .get_mut(method)
            .unwrap_or_else(|| panic!("MockProvider: no response scripted for {method}"));
        let scripted = if queue.len() > 1 {
            queue.pop_front().unwrap()
        } else {
            // keep the final response sticky for repeated polling
            match queue.front().expect("scripted queue never left empty") {
                Scripted::Ok(v) => Scripted::Ok(v.clone()),
                Scripted::Err { code, message } => Scripted::Err {
                    code: *code,
                    message: message.clone(),
                },
            }
        };

        match scripted {
            Scripted::Ok(value) => Ok(value),
            Scripted::Err { code, message } => {
                Err(classify_provider_error(method, code, &message))
            }
        }
    }
}
