//! `sendrawtransaction` JSON-RPC shapes and the broadcaster seam

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// JSON-RPC 1.0 request body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BroadcastRequest {
    pub jsonrpc: String,
    pub id: String,
    pub method: String,
    pub params: Vec<String>,
}

impl BroadcastRequest {
    pub fn send_raw_transaction(raw_hex: impl Into<String>) -> Self {
        Self {
            jsonrpc: "1.0".to_string(),
            id: "sendtx".to_string(),
            method: "sendrawtransaction".to_string(),
            params: vec![raw_hex.into()],
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// Whatever the node answered, unmodified
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BroadcastResponse(pub Value);

impl BroadcastResponse {
    /// `result` member, when present and not null
    pub fn result(&self) -> Option<&Value> {
        self.0.get("result").filter(|v| !v.is_null())
    }

    /// `error` member, when present and not null
    pub fn error(&self) -> Option<&Value> {
        self.0.get("error").filter(|v| !v.is_null())
    }

    pub fn into_inner(self) -> Value {
        self.0
    }
}

/// Transport that submits a request to a node
pub trait Broadcaster {
    fn broadcast(&self, request: &BroadcastRequest) -> anyhow::Result<Value>;
}
