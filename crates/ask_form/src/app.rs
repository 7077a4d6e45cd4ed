//! Interactive form state: key handling and the in-flight request.
//! Key handling and answer delivery are plain methods so tests can drive
//! them without a terminal.

use ask_client::{AskQuestion, ClientError, QuestionForm};
use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::sync::mpsc;

type AnswerResult = Result<String, ClientError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Continue,
    Quit,
}

pub struct App {
    form: QuestionForm,
    answerer: Arc<dyn AskQuestion>,
    runtime: Handle,
    answers_tx: mpsc::UnboundedSender<AnswerResult>,
    answers_rx: mpsc::UnboundedReceiver<AnswerResult>,
}

impl App {
    pub fn new(answerer: Arc<dyn AskQuestion>, runtime: Handle) -> Self {
        let (answers_tx, answers_rx) = mpsc::unbounded_channel();
        Self {
            form: QuestionForm::new(),
            answerer,
            runtime,
            answers_tx,
            answers_rx,
        }
    }

    pub fn form(&self) -> &QuestionForm {
        &self.form
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Control {
        if key.kind != KeyEventKind::Press {
            return Control::Continue;
        }
        match key.code {
            KeyCode::Esc => return Control::Quit,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                return Control::Quit
            }
            _ => {}
        }
        if self.form.is_loading() {
            return Control::Continue;
        }
        match key.code {
            KeyCode::Enter => self.submit(),
            KeyCode::Backspace => {
                let mut value = self.form.value().to_string();
                value.pop();
                self.form.update_text(value);
            }
            KeyCode::Char(c)
                if !key
                    .modifiers
                    .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
            {
                let mut value = self.form.value().to_string();
                value.push(c);
                self.form.update_text(value);
            }
            _ => {}
        }
        Control::Continue
    }

    /// Submit the current text and run the request in the background.
    pub fn submit(&mut self) {
        let Some(question) = self.form.submit() else {
            return;
        };
        tracing::info!(len = question.len(), "submitting question");
        let answerer = Arc::clone(&self.answerer);
        let tx = self.answers_tx.clone();
        self.runtime.spawn(async move {
            let result = answerer.ask(&question).await;
            // Receiver only goes away when the app is shutting down.
            let _ = tx.send(result);
        });
    }

    /// Settle the form with any answer that has arrived. Returns whether the
    /// form changed.
    pub fn poll_answers(&mut self) -> bool {
        let mut changed = false;
        while let Ok(result) = self.answers_rx.try_recv() {
            self.form.settle(result);
            changed = true;
        }
        changed
    }

    /// Wait for the in-flight answer and settle the form with it.
    pub async fn wait_for_answer(&mut self) {
        if let Some(result) = self.answers_rx.recv().await {
            self.form.settle(result);
        }
    }
}
