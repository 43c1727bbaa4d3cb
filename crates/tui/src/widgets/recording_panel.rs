//! Audio recording panel: the phrase to read, the take's timer and a live
//! input level meter.

use lp_protocol::audio_models::RecordingState;
use lp_protocol::view_models::AudioRecordingView;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Gauge, Paragraph, Wrap};
use ratatui::Frame;

pub fn render_recording_panel(frame: &mut Frame, area: Rect, view: &AudioRecordingView) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(3),    // Phrase
            Constraint::Length(3), // Timer
            Constraint::Length(3), // Input level
            Constraint::Length(3), // State
        ])
        .split(area);

    let phrase = Paragraph::new(format!("\"{}\"", view.phrase))
        .wrap(Wrap { trim: true })
        .style(Style::default().add_modifier(Modifier::BOLD))
        .block(Block::default().borders(Borders::ALL).title("Read aloud"));
    frame.render_widget(phrase, chunks[0]);

    let ratio = if view.max_duration > 0.0 {
        (view.elapsed_secs / view.max_duration).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let long_enough = view.elapsed_secs >= view.min_duration;
    let timer = Gauge::default()
        .block(Block::default().borders(Borders::ALL).title(format!(
            "Duration (min {:.1}s, max {:.1}s)",
            view.min_duration, view.max_duration
        )))
        .gauge_style(Style::default().fg(if long_enough {
            Color::Green
        } else {
            Color::Yellow
        }))
        .ratio(ratio)
        .label(format!("{:.1}s / {:.1}s", view.elapsed_secs, view.max_duration));
    frame.render_widget(timer, chunks[1]);

    let level = view.input_level.clamp(0.0, 1.0);
    let meter = Gauge::default()
        .block(Block::default().borders(Borders::ALL).title("Input level"))
        .gauge_style(Style::default().fg(if level > 0.8 { Color::Red } else { Color::Cyan }))
        .ratio(level)
        .label(format!("{:.0}%", level * 100.0));
    frame.render_widget(meter, chunks[2]);

    let (state, state_style) = match view.state {
        RecordingState::Idle => ("Ready", Style::default().fg(Color::Gray)),
        RecordingState::Recording => (
            "Recording",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ),
        RecordingState::Recorded => ("Recorded", Style::default().fg(Color::Green)),
    };
    let mut spans = vec![Span::styled(state, state_style)];
    if let Some(bytes) = view.clip_bytes {
        spans.push(Span::raw(format!("  {bytes} bytes captured")));
    }
    if view.state == RecordingState::Recorded && !long_enough {
        spans.push(Span::styled(
            "  too short, press x to record again",
            Style::default().fg(Color::Yellow),
        ));
    }
    let status = Paragraph::new(Line::from(spans))
        .block(Block::default().borders(Borders::ALL).title("Microphone"));
    frame.render_widget(status, chunks[3]);
}
