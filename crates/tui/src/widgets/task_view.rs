//! View of the active task session.
//!
//! Layout, top to bottom: task header, progress gauge, the widget panel and
//! a footer with key hints (or the last rejection).

use lp_protocol::session_models::SessionPhase;
use lp_protocol::view_models::{ImageAnnotationView, WidgetView};
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Gauge, List, ListItem, Paragraph, Wrap};
use ratatui::Frame;

use crate::app::ActiveSession;
use crate::widgets::annotation_canvas::{AnnotationCanvas, HexColor};
use crate::widgets::classification_panel::render_classification_panel;
use crate::widgets::recording_panel::render_recording_panel;

/// Render the session and remember where the annotation canvas landed so
/// mouse input can be mapped back to canvas pixels.
pub fn render_task_view(frame: &mut Frame, area: Rect, session: &mut ActiveSession) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4), // Header
            Constraint::Length(3), // Progress
            Constraint::Min(8),    // Widget
            Constraint::Length(3), // Footer
        ])
        .split(area);

    render_header(frame, chunks[0], session);
    render_progress(frame, chunks[1], session);

    session.canvas_area = match &session.view {
        Some(WidgetView::ImageAnnotation(view)) => Some(render_image_panel(frame, chunks[2], view)),
        Some(WidgetView::AudioRecording(view)) => {
            render_recording_panel(frame, chunks[2], view);
            None
        }
        Some(WidgetView::TextClassification(view)) => {
            render_classification_panel(frame, chunks[2], view);
            None
        }
        None => {
            let loading = Paragraph::new("Loading task...")
                .block(Block::default().borders(Borders::ALL));
            frame.render_widget(loading, chunks[2]);
            None
        }
    };

    render_footer(frame, chunks[3], session);
}

fn render_header(frame: &mut Frame, area: Rect, session: &ActiveSession) {
    let task = &session.task;
    let mut lines = vec![Line::from(vec![
        Span::styled(
            format!("+{:.2} POOL", task.reward),
            Style::default().fg(Color::Green),
        ),
        Span::raw("  "),
        Span::styled(format!("+{} XP", task.xp), Style::default().fg(Color::Cyan)),
    ])];
    if !task.description.is_empty() {
        lines.push(Line::from(task.description.as_str()));
    }

    let header = Paragraph::new(lines).wrap(Wrap { trim: true }).block(
        Block::default()
            .borders(Borders::ALL)
            .title(Span::styled(
                task.title.as_str(),
                Style::default().add_modifier(Modifier::BOLD),
            )),
    );
    frame.render_widget(header, area);
}

fn render_progress(frame: &mut Frame, area: Rect, session: &ActiveSession) {
    let (phase, color) = match session.phase {
        SessionPhase::Collecting => ("In progress", Color::Yellow),
        SessionPhase::EligibleForSubmit => ("Ready to submit (s)", Color::Green),
        SessionPhase::Submitted => ("Submitted", Color::Cyan),
        SessionPhase::Closed => ("Closed", Color::DarkGray),
    };
    let gauge = Gauge::default()
        .block(Block::default().borders(Borders::ALL).title(phase))
        .gauge_style(Style::default().fg(color))
        .ratio((session.progress / 100.0).clamp(0.0, 1.0))
        .label(format!("{:.0}%", session.progress));
    frame.render_widget(gauge, area);
}

/// Returns the inner area of the canvas block.
fn render_image_panel(frame: &mut Frame, area: Rect, view: &ImageAnnotationView) -> Rect {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(22), Constraint::Min(20)])
        .split(area);

    let items: Vec<ListItem> = view
        .labels
        .iter()
        .enumerate()
        .map(|(i, label)| {
            let selected = *label == view.selected_label;
            let marker = if selected { ">" } else { " " };
            let mut style = Style::default();
            if selected {
                style = style.add_modifier(Modifier::BOLD);
                if let Some(color) = HexColor::parse(&view.selected_color) {
                    style = style.fg(color.over(HexColor::BLACK));
                }
            }
            ListItem::new(format!("{marker} {} {label}", i + 1)).style(style)
        })
        .collect();
    let labels = List::new(items).block(Block::default().borders(Borders::ALL).title("Labels"));
    frame.render_widget(labels, columns[0]);

    let images: String = view
        .annotated
        .iter()
        .enumerate()
        .map(|(i, annotated)| match (i == view.image_index, annotated) {
            (true, _) => '◆',
            (false, true) => '●',
            (false, false) => '○',
        })
        .collect();
    let block = Block::default().borders(Borders::ALL).title(format!(
        "Image {} of {} {} {}",
        view.image_index + 1,
        view.image_count,
        view.image_url,
        images
    ));
    let inner = block.inner(columns[1]);
    frame.render_widget(AnnotationCanvas::new(view).block(block), columns[1]);
    inner
}

fn render_footer(frame: &mut Frame, area: Rect, session: &ActiveSession) {
    let hints = match &session.view {
        Some(WidgetView::ImageAnnotation(_)) => {
            "drag: draw  1-9/Tab: label  u: undo  c: clear  ←/→: image  s: submit  Esc: close"
        }
        Some(WidgetView::AudioRecording(_)) => "Space: record/stop  x: reset  s: submit  Esc: close",
        Some(WidgetView::TextClassification(_)) => {
            "1-9: answer  ←/→: question  n: next unanswered  s: submit  Esc: close"
        }
        None => "Esc: close",
    };

    let footer = match &session.notice {
        Some(notice) => Paragraph::new(notice.as_str()).style(Style::default().fg(Color::Red)),
        None => Paragraph::new(hints).style(Style::default().fg(Color::DarkGray)),
    };
    frame.render_widget(footer.block(Block::default().borders(Borders::ALL)), area);
}
