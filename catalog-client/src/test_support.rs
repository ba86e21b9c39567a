//! Scripted in-memory `HttpClient` for unit tests

use async_trait::async_trait;
use http::StatusCode;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::oneshot;

use crate::client::http::{FilePart, HttpClient, HttpResult};
use crate::error::HttpError;

#[derive(Debug, Clone)]
struct Reply {
    status: StatusCode,
    body: Value,
}

/// A request the fake received
#[derive(Debug, Clone)]
pub(crate) struct Call {
    pub method: &'static str,
    pub path: String,
    pub body: Option<Value>,
}

#[derive(Debug, Default)]
struct Script {
    /// Current reply per route, repeated until replaced
    replies: HashMap<(&'static str, String), Reply>,
    gates: HashMap<String, oneshot::Receiver<()>>,
    calls: Vec<Call>,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct ScriptedHttp {
    script: Arc<Mutex<Script>>,
}

impl ScriptedHttp {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reply 200 with `body`
    pub fn reply_json(&self, method: &'static str, path: &str, body: Value) {
        self.push(method, path, StatusCode::OK, body);
    }

    /// Reply `status` with an empty body
    pub fn reply_status(&self, method: &'static str, path: &str, status: StatusCode) {
        self.push(method, path, status, Value::Null);
    }

    /// Hold the next request to `path` until the returned sender fires
    pub fn gate(&self, path: &str) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.script.lock().unwrap().gates.insert(path.to_string(), rx);
        tx
    }

    pub fn calls(&self) -> Vec<Call> {
        self.script.lock().unwrap().calls.clone()
    }

    fn push(&self, method: &'static str, path: &str, status: StatusCode, body: Value) {
        self.script
            .lock()
            .unwrap()
            .replies
            .insert((method, path.to_string()), Reply { status, body });
    }

    async fn respond(
        &self,
        method: &'static str,
        path: &str,
        body: Option<Value>,
    ) -> HttpResult<Value> {
        // The reply is fixed when the request arrives; a gate only delays it
        let (reply, gate) = {
            let mut script = self.script.lock().unwrap();
            script.calls.push(Call {
                method,
                path: path.to_string(),
                body,
            });
            let reply = script.replies.get(&(method, path.to_string())).cloned();
            (reply, script.gates.remove(path))
        };
        if let Some(gate) = gate {
            let _ = gate.await;
        }

        match reply {
            None => Err(HttpError::Status {
                status: StatusCode::NOT_FOUND,
                body: format!("no route for {} {}", method, path),
            }),
            Some(reply) if !reply.status.is_success() => Err(HttpError::Status {
                status: reply.status,
                body: if reply.body.is_null() {
                    String::new()
                } else {
                    reply.body.to_string()
                },
            }),
            Some(reply) => Ok(reply.body),
        }
    }

    async fn respond_as<T: DeserializeOwned>(
        &self,
        method: &'static str,
        path: &str,
        body: Option<Value>,
    ) -> HttpResult<T> {
        let value = self.respond(method, path, body).await?;
        serde_json::from_value(value).map_err(|e| HttpError::Decode(e.to_string()))
    }
}

#[async_trait]
impl HttpClient for ScriptedHttp {
    async fn get<T: DeserializeOwned>(&self, path: &str) -> HttpResult<T> {
        self.respond_as("GET", path, None).await
    }

    async fn post<T: DeserializeOwned, B: serde::Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> HttpResult<T> {
        let body = serde_json::to_value(body).map_err(|e| HttpError::Decode(e.to_string()))?;
        self.respond_as("POST", path, Some(body)).await
    }

    async fn put<T: DeserializeOwned, B: serde::Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> HttpResult<T> {
        let body = serde_json::to_value(body).map_err(|e| HttpError::Decode(e.to_string()))?;
        self.respond_as("PUT", path, Some(body)).await
    }

    async fn delete(&self, path: &str) -> HttpResult<()> {
        self.respond("DELETE", path, None).await.map(|_| ())
    }

    async fn upload<T: DeserializeOwned>(&self, path: &str, file: FilePart) -> HttpResult<T> {
        let body = json!({
            "field": file.field,
            "file_name": file.file_name,
            "mime": file.mime,
            "size": file.bytes.len(),
        });
        self.respond_as("POST", path, Some(body)).await
    }
}

/// Product as the API sends it: quoted price, integer availability flag
pub(crate) fn product_json(
    id: i64,
    name: &str,
    price: &str,
    available: i64,
    subcategory_id: i64,
) -> Value {
    json!({
        "id": id,
        "name": name,
        "description": format!("{} description", name),
        "price": price,
        "stock": 10,
        "available": available,
        "img": null,
        "subcategory_id": subcategory_id,
        "created_at": "2024-05-01T10:00:00.000000Z",
        "updated_at": "2024-05-01T10:00:00.000000Z"
    })
}
