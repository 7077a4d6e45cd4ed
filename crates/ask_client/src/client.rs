//! Answering service clients. `HttpClient` posts the question as JSON;
//! `Client` speaks the streaming WebSocket protocol (STREAM_START,
//! STREAM_CHUNK, STREAM_END).

use async_trait::async_trait;
use futures_util::{SinkExt, StreamExt};
use std::collections::HashSet;
use std::sync::Arc;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::MaybeTlsStream;
use tokio_tungstenite::WebSocketStream;

use crate::config::{EndpointSection, Transport};
use crate::messages::{QueryMessage, QuestionRequest, QuestionResponse, ServerMessage};

/// Answer-fetching operation: maps a question string to an answer string.
#[async_trait]
pub trait AskQuestion: Send + Sync {
    async fn ask(&self, question: &str) -> Result<String, ClientError>;
}

/// Errors raised while asking a question.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("websocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("invalid message: {0}")]
    Json(#[from] serde_json::Error),
    #[error("server error: {0}")]
    Server(String),
    #[error("connection closed before the answer was complete")]
    Closed,
}

/// Events received during a query stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamEvent {
    StreamStart,
    StreamChunk(String),
    StreamEnd(Vec<String>),
    /// Whole answer delivered in one `response` message.
    Answer(String),
    Error(String),
}

type WsStream = WebSocketStream<MaybeTlsStream<tokio::net::TcpStream>>;

fn deduplicate_sources(sources: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    sources
        .into_iter()
        .filter(|source| seen.insert(source.clone()))
        .collect()
}

/// Assemble the answer text out of a finished event stream.
pub fn answer_from_events(events: Vec<StreamEvent>) -> Result<String, ClientError> {
    let mut answer = String::new();
    for event in events {
        match event {
            StreamEvent::StreamStart => {}
            StreamEvent::StreamChunk(chunk) => answer.push_str(&chunk),
            StreamEvent::StreamEnd(_) => return Ok(answer),
            StreamEvent::Answer(full) => return Ok(full),
            StreamEvent::Error(message) => return Err(ClientError::Server(message)),
        }
    }
    Err(ClientError::Closed)
}

/// Connected WebSocket client.
pub struct Client {
    inner: Arc<tokio::sync::Mutex<WsStream>>,
    index: Option<String>,
}

/// Connect to the WebSocket server at `url` (e.g. `ws://localhost:8765`).
pub async fn connect(url: &str) -> Result<Client, ClientError> {
    let (ws_stream, _) = tokio_tungstenite::connect_async(url).await?;
    tracing::info!(url, "connected to answering service");
    Ok(Client {
        inner: Arc::new(tokio::sync::Mutex::new(ws_stream)),
        index: None,
    })
}

impl Client {
    /// Index name sent along with every `ask`.
    pub fn with_index(mut self, index: Option<String>) -> Self {
        self.index = index;
        self
    }

    /// Send a query and collect stream events until STREAM_END, a full
    /// response, ERROR, or close.
    ///
    /// Each of those frames ends the query: the server sends nothing more for
    /// it, so the next query on this connection starts reading fresh frames.
    pub async fn query(
        &self,
        question: &str,
        index: Option<&str>,
    ) -> Result<Vec<StreamEvent>, ClientError> {
        let mut guard = self.inner.lock().await;
        let json = serde_json::to_string(&QueryMessage::new(question, index))?;
        guard.send(Message::Text(json)).await?;

        let mut events = Vec::new();
        while let Some(item) = guard.next().await {
            let text = match item? {
                Message::Text(t) => t,
                Message::Close(_) => break,
                _ => continue,
            };
            match ServerMessage::from_text(&text)? {
                ServerMessage::StreamStart => events.push(StreamEvent::StreamStart),
                ServerMessage::StreamChunk { chunk } => events.push(StreamEvent::StreamChunk(chunk)),
                ServerMessage::StreamEnd { sources } => {
                    events.push(StreamEvent::StreamEnd(deduplicate_sources(sources)));
                    break;
                }
                ServerMessage::Response { answer, .. } => {
                    events.push(StreamEvent::Answer(answer));
                    break;
                }
                ServerMessage::Error { message } => {
                    events.push(StreamEvent::Error(message));
                    break;
                }
                ServerMessage::Status { status, message } => {
                    tracing::debug!(%status, ?message, "server status");
                }
            }
        }
        Ok(events)
    }
}

#[async_trait]
impl AskQuestion for Client {
    async fn ask(&self, question: &str) -> Result<String, ClientError> {
        let events = self.query(question, self.index.as_deref()).await?;
        answer_from_events(events)
    }
}

/// Client for the HTTP endpoint: `POST {"question"}` → `{"data"}`.
pub struct HttpClient {
    http: reqwest::Client,
    url: String,
}

impl HttpClient {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            url: url.into(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl AskQuestion for HttpClient {
    async fn ask(&self, question: &str) -> Result<String, ClientError> {
        tracing::debug!(url = %self.url, "posting question");
        let response = self
            .http
            .post(&self.url)
            .json(&QuestionRequest { question })
            .send()
            .await?
            .error_for_status()?;
        let body: QuestionResponse = response.json().await?;
        Ok(body.data)
    }
}

/// Build the answering client the endpoint section asks for. WebSocket
/// endpoints are connected eagerly.
pub async fn connect_answerer(
    endpoint: &EndpointSection,
) -> Result<Arc<dyn AskQuestion>, ClientError> {
    let url = endpoint.url_or_default();
    match endpoint.transport {
        Transport::Http => Ok(Arc::new(HttpClient::new(url))),
        Transport::WebSocket => {
            let client = connect(&url).await?.with_index(endpoint.index.clone());
            Ok(Arc::new(client))
        }
    }
}
