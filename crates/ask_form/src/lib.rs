//! Interactive terminal question form.

pub mod app;
pub mod view;

use app::{App, Control};
use ask_client::AskQuestion;
use ratatui::crossterm::event::{self, Event};
use ratatui::DefaultTerminal;
use std::sync::Arc;
use std::time::Duration;

const TICK: Duration = Duration::from_millis(50);

/// Take over the terminal and run the form until the user quits.
pub fn run(answerer: Arc<dyn AskQuestion>, runtime: tokio::runtime::Handle) -> std::io::Result<()> {
    let mut terminal = ratatui::init();
    let mut app = App::new(answerer, runtime);
    let result = event_loop(&mut terminal, &mut app);
    ratatui::restore();
    result
}

fn event_loop(terminal: &mut DefaultTerminal, app: &mut App) -> std::io::Result<()> {
    loop {
        app.poll_answers();
        terminal.draw(|frame| view::draw(frame, app.form()))?;

        if event::poll(TICK)? {
            if let Event::Key(key) = event::read()? {
                if app.handle_key(key) == Control::Quit {
                    tracing::info!("quit");
                    return Ok(());
                }
            }
        }
    }
}
