//! Renders the question form: input and button on one row, loading line,
//! answer beneath.

use ask_client::QuestionForm;
use ratatui::layout::{Alignment, Constraint, Layout};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Wrap};
use ratatui::Frame;

const BUTTON_WIDTH: u16 = 9;

pub fn draw(frame: &mut Frame, form: &QuestionForm) {
    let view = form.view();

    let [form_row, loading_row, answer_area] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Length(1),
        Constraint::Min(0),
    ])
    .areas(frame.area());
    let [input_area, button_area] =
        Layout::horizontal([Constraint::Min(10), Constraint::Length(BUTTON_WIDTH)]).areas(form_row);

    let dim = Style::default().fg(Color::DarkGray);

    let input_text = if view.value.is_empty() {
        Line::from(Span::styled(view.placeholder, dim))
    } else {
        Line::from(view.value)
    };
    // Keep the end of a long question (and the cursor) inside the box.
    let typed = u16::try_from(view.value.chars().count()).unwrap_or(u16::MAX);
    let inner_width = input_area.width.saturating_sub(2);
    let scroll_x = typed.saturating_sub(inner_width.saturating_sub(1));
    let input_border = if view.input_disabled { dim } else { Style::default() };
    frame.render_widget(
        Paragraph::new(input_text)
            .scroll((0, scroll_x))
            .block(Block::bordered().border_style(input_border)),
        input_area,
    );

    let button_style = if view.button_disabled {
        dim
    } else {
        Style::default()
            .fg(Color::Black)
            .bg(Color::LightBlue)
            .add_modifier(Modifier::BOLD)
    };
    frame.render_widget(
        Paragraph::new(view.button_label)
            .alignment(Alignment::Center)
            .style(button_style)
            .block(Block::bordered().border_style(button_style)),
        button_area,
    );

    if let Some(loading) = view.loading {
        frame.render_widget(Paragraph::new(loading), loading_row);
    }

    let mut lines = Vec::new();
    if let Some(error) = view.error {
        lines.push(Line::from(Span::styled(
            format!("Error: {}", error),
            Style::default().fg(Color::Red),
        )));
    }
    if let Some(answer) = view.answer {
        lines.extend(answer.lines().map(Line::from));
    }
    if !lines.is_empty() {
        frame.render_widget(
            Paragraph::new(lines).wrap(Wrap { trim: false }),
            answer_area.inner(ratatui::layout::Margin::new(1, 1)),
        );
    }

    if !view.input_disabled {
        let x = input_area.x + 1 + (typed - scroll_x);
        frame.set_cursor_position((x, input_area.y + 1));
    }
}
