//! Text classification panel: one question at a time with numbered options.

use lp_protocol::view_models::TextClassificationView;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, Paragraph, Wrap};
use ratatui::Frame;

pub fn render_classification_panel(frame: &mut Frame, area: Rect, view: &TextClassificationView) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Question navigator
            Constraint::Min(3),    // Question text
            Constraint::Length(view.question.options.len() as u16 + 2),
        ])
        .split(area);

    // One marker per question: filled once answered, highlighted when current.
    let markers: Vec<Span> = view
        .answered
        .iter()
        .enumerate()
        .map(|(i, answered)| {
            let symbol = if *answered { " ● " } else { " ○ " };
            let mut style = Style::default().fg(if *answered {
                Color::Green
            } else {
                Color::DarkGray
            });
            if i == view.question_index {
                style = style.bg(Color::Blue).fg(Color::White);
            }
            Span::styled(symbol, style)
        })
        .collect();
    let navigator = Paragraph::new(Line::from(markers)).block(
        Block::default().borders(Borders::ALL).title(format!(
            "Question {} of {}",
            view.question_index + 1,
            view.question_count
        )),
    );
    frame.render_widget(navigator, chunks[0]);

    let question = Paragraph::new(view.question.text.as_str())
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title("Text"));
    frame.render_widget(question, chunks[1]);

    let items: Vec<ListItem> = view
        .question
        .options
        .iter()
        .enumerate()
        .map(|(i, option)| {
            let chosen = view.selected.as_deref() == Some(option.as_str());
            let marker = if chosen { "(x)" } else { "( )" };
            let style = if chosen {
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            ListItem::new(format!("{} {marker} {option}", i + 1)).style(style)
        })
        .collect();
    let options = List::new(items).block(Block::default().borders(Borders::ALL).title("Options"));
    frame.render_widget(options, chunks[2]);
}
