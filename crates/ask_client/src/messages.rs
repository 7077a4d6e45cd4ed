//! Wire messages for the answering service. WebSocket frames are JSON objects
//! discriminated by a `type` field; the HTTP endpoint takes and returns plain
//! JSON bodies.

use serde::{Deserialize, Serialize};

/// Client → server over WebSocket: query message.
#[derive(Debug, Clone, Serialize)]
pub struct QueryMessage<'a> {
    #[serde(rename = "type")]
    pub typ: &'static str,
    pub question: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index: Option<&'a str>,
}

impl<'a> QueryMessage<'a> {
    pub fn new(question: &'a str, index: Option<&'a str>) -> Self {
        Self {
            typ: "query",
            question,
            index,
        }
    }
}

/// One server message received over WebSocket.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    StreamStart,
    StreamChunk {
        chunk: String,
    },
    StreamEnd {
        #[serde(default)]
        sources: Vec<String>,
    },
    Error {
        message: String,
    },
    Status {
        status: String,
        #[serde(default)]
        message: Option<String>,
    },
    /// Non-streaming reply carrying the whole answer at once.
    Response {
        answer: String,
        #[serde(default)]
        sources: Vec<serde_json::Value>,
    },
}

impl ServerMessage {
    pub fn from_text(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}

/// HTTP request body: `{"question": "..."}`.
#[derive(Debug, Clone, Serialize)]
pub struct QuestionRequest<'a> {
    pub question: &'a str,
}

/// HTTP response body: `{"data": "..."}`.
#[derive(Debug, Clone, Deserialize)]
pub struct QuestionResponse {
    pub data: String,
}
