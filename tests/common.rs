//! Test doubles for the backend seam.
//! `FailingBackend` rejects every call; `ScriptedBackend` answers from a closure
//! and records what was asked.

use async_trait::async_trait;
use ratoncito::adventure::AdventureClient;
use ratoncito::api::{ApiError, Backend};
use ratoncito::config::AdventureConfig;
use serde_json::Value;
use std::sync::{Arc, Mutex};

/// Backend that fails every request like an unreachable host.
pub struct FailingBackend;

#[async_trait]
impl Backend for FailingBackend {
    async fn get(&self, _path: &str) -> Result<Value, ApiError> {
        Err(ApiError::Transport("connection refused".to_string()))
    }

    async fn post(&self, _path: &str, _body: &Value) -> Result<Value, ApiError> {
        Err(ApiError::Transport("connection refused".to_string()))
    }
}

/// One recorded request.
#[derive(Debug, Clone)]
#[allow(dead_code)] // not every test inspects bodies
pub struct Call {
    pub method: &'static str,
    pub path: String,
    pub body: Option<Value>,
}

type Responder = dyn Fn(&str, Option<&Value>) -> Result<Value, ApiError> + Send + Sync;

/// Backend whose answers come from a closure over `(path, body)`.
#[derive(Clone)]
pub struct ScriptedBackend {
    responder: Arc<Responder>,
    calls: Arc<Mutex<Vec<Call>>>,
}

#[allow(dead_code)]
impl ScriptedBackend {
    pub fn new(
        responder: impl Fn(&str, Option<&Value>) -> Result<Value, ApiError> + Send + Sync + 'static,
    ) -> Self {
        Self {
            responder: Arc::new(responder),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn paths(&self) -> Vec<String> {
        self.calls().into_iter().map(|c| c.path).collect()
    }
}

#[async_trait]
impl Backend for ScriptedBackend {
    async fn get(&self, path: &str) -> Result<Value, ApiError> {
        self.calls.lock().unwrap().push(Call {
            method: "GET",
            path: path.to_string(),
            body: None,
        });
        (self.responder)(path, None)
    }

    async fn post(&self, path: &str, body: &Value) -> Result<Value, ApiError> {
        self.calls.lock().unwrap().push(Call {
            method: "POST",
            path: path.to_string(),
            body: Some(body.clone()),
        });
        (self.responder)(path, Some(body))
    }
}

#[allow(dead_code)]
pub fn failing_client() -> AdventureClient<FailingBackend> {
    AdventureClient::new(FailingBackend, AdventureConfig::default())
}

#[allow(dead_code)]
pub fn scripted_client(backend: &ScriptedBackend) -> AdventureClient<ScriptedBackend> {
    AdventureClient::new(backend.clone(), AdventureConfig::default())
}
