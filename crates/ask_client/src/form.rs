//! Question form state: input text, in-flight flag, last answer.
//!
//! Idle → (submit) → Loading → (answer arrives) → Idle with answer.
//! Input and submit are disabled while loading, so at most one question is
//! in flight at a time.

use crate::client::{AskQuestion, ClientError};

pub const PLACEHOLDER: &str = "Ask a question...";
pub const BUTTON_LABEL: &str = "Ask";
pub const LOADING_TEXT: &str = "Loading...";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Phase {
    #[default]
    Idle,
    Loading,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuestionForm {
    value: String,
    phase: Phase,
    answer: Option<String>,
    error: Option<String>,
}

/// What a renderer needs to draw the form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormView<'a> {
    pub value: &'a str,
    pub placeholder: &'static str,
    pub button_label: &'static str,
    pub input_disabled: bool,
    pub button_disabled: bool,
    pub loading: Option<&'static str>,
    pub answer: Option<&'a str>,
    pub error: Option<&'a str>,
}

impl QuestionForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_loading(&self) -> bool {
        self.phase == Phase::Loading
    }

    pub fn answer(&self) -> Option<&str> {
        self.answer.as_deref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Replace the input with the control's current value. Returns `false`
    /// (and changes nothing) while a question is in flight.
    pub fn update_text(&mut self, value: impl Into<String>) -> bool {
        if self.is_loading() {
            return false;
        }
        self.value = value.into();
        true
    }

    /// Enter Loading and hand out the question to send. The empty string is
    /// a valid question. Returns `None` if a question is already in flight.
    pub fn submit(&mut self) -> Option<String> {
        if self.is_loading() {
            return None;
        }
        self.phase = Phase::Loading;
        Some(self.value.clone())
    }

    /// Store the answer to the in-flight question and clear the input.
    pub fn resolve(&mut self, answer: String) {
        if !self.is_loading() {
            tracing::warn!("answer arrived with no question in flight, dropping it");
            return;
        }
        self.value.clear();
        self.answer = Some(answer);
        self.error = None;
        self.phase = Phase::Idle;
    }

    /// Leave Loading after a failed request. The typed text is kept so the
    /// question can be sent again.
    pub fn reject(&mut self, message: String) {
        if !self.is_loading() {
            return;
        }
        self.error = Some(message);
        self.phase = Phase::Idle;
    }

    pub fn settle(&mut self, result: Result<String, ClientError>) {
        match result {
            Ok(answer) => self.resolve(answer),
            Err(e) => {
                tracing::warn!(error = %e, "question failed");
                self.reject(e.to_string());
            }
        }
    }

    /// Run a whole submit cycle inline: submit, await the answer, settle.
    /// Does nothing while another question is in flight.
    pub async fn ask_with(&mut self, answerer: &dyn AskQuestion) {
        let Some(question) = self.submit() else {
            return;
        };
        let result = answerer.ask(&question).await;
        self.settle(result);
    }

    pub fn view(&self) -> FormView<'_> {
        let loading = self.is_loading();
        FormView {
            value: &self.value,
            placeholder: PLACEHOLDER,
            button_label: BUTTON_LABEL,
            input_disabled: loading,
            button_disabled: loading,
            loading: loading.then_some(LOADING_TEXT),
            // An empty answer renders nothing.
            answer: self.answer.as_deref().filter(|a| !a.is_empty()),
            error: self.error.as_deref(),
        }
    }
}
