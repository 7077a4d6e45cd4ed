//! Question form client library (config, answering service transports, form
//! state). Used by the interactive terminal form and the one-shot `ask` CLI.

pub mod client;
pub mod config;
pub mod form;
pub mod logging;
pub mod messages;

pub use client::{
    answer_from_events, connect, connect_answerer, AskQuestion, Client, ClientError, HttpClient,
    StreamEvent,
};
pub use config::{default_config_path, Config, ConfigError, EndpointSection, LogSection, Transport};
pub use form::{FormView, Phase, QuestionForm};
