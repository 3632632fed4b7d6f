//! Wire frames exchanged on the bus.
//!
//! A request is `{"id", "pattern", "data"}`; the reply echoes the id and
//! carries either `response` or `err`.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestFrame {
    pub id: String,
    pub pattern: String,
    #[serde(default)]
    pub data: Value,
}

impl RequestFrame {
    pub fn new(pattern: impl Into<String>, data: Value) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            pattern: pattern.into(),
            data,
        }
    }

    pub fn encode(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }

    pub fn decode(bytes: &[u8]) -> Result<Self> {
        Ok(serde_json::from_slice(bytes)?)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplyFrame {
    pub id: String,
    #[serde(default)]
    pub response: Option<Value>,
    #[serde(default)]
    pub err: Option<String>,
}

impl ReplyFrame {
    pub fn response(id: impl Into<String>, response: Value) -> Self {
        Self {
            id: id.into(),
            response: Some(response),
            err: None,
        }
    }

    pub fn error(id: impl Into<String>, err: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            response: None,
            err: Some(err.into()),
        }
    }

    pub fn encode(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }

    pub fn decode(bytes: &[u8]) -> Result<Self> {
        Ok(serde_json::from_slice(bytes)?)
    }
}
