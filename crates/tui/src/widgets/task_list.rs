//! Task list table.
//!
//! Shows every task of the catalog with its kind, reward and whether it has
//! been completed during this run.

use lp_protocol::task_models::{TaskDefinition, TaskKind};
use ratatui::layout::Constraint;
use ratatui::layout::Rect;
use ratatui::style::Color;
use ratatui::style::Modifier;
use ratatui::style::Style;
use ratatui::widgets::Block;
use ratatui::widgets::Borders;
use ratatui::widgets::Cell;
use ratatui::widgets::Row;
use ratatui::widgets::Table;
use ratatui::widgets::TableState;
use ratatui::Frame;

/// Renders the catalog as a table.
///
/// # Arguments
/// * `tasks` - Tasks in catalog order
/// * `completed` - Ids of tasks submitted during this run
/// * `selected` - Index of the highlighted task
pub fn render_task_list(
    frame: &mut Frame,
    area: Rect,
    tasks: &[TaskDefinition],
    completed: &[String],
    selected: usize,
) {
    let rows: Vec<Row> = tasks
        .iter()
        .map(|task| {
            let (kind, kind_style) = kind_cell(task.kind());
            let done = completed.iter().any(|id| id == &task.id);
            let status = if done {
                Cell::from("Done").style(Style::default().fg(Color::Green))
            } else {
                Cell::from("Open").style(Style::default().fg(Color::Yellow))
            };

            Row::new(vec![
                Cell::from(kind).style(kind_style),
                Cell::from(task.title.clone()),
                Cell::from(format!("{:.2} POOL", task.reward)),
                Cell::from(format!("{} XP", task.xp)),
                status,
            ])
        })
        .collect();

    let header = Row::new(vec![
        Cell::from("Kind"),
        Cell::from("Task"),
        Cell::from("Reward"),
        Cell::from("XP"),
        Cell::from("Status"),
    ])
    .style(
        Style::default()
            .add_modifier(Modifier::BOLD)
            .fg(Color::Cyan),
    );

    let widths = [
        Constraint::Length(6),
        Constraint::Percentage(50),
        Constraint::Length(10),
        Constraint::Length(6),
        Constraint::Length(6),
    ];

    let title = if tasks.is_empty() {
        "Tasks - none found, run `labelpool init`"
    } else {
        "Tasks - Enter to open, q to quit"
    };

    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(title)
                .style(Style::default().fg(Color::White)),
        )
        .row_highlight_style(
            Style::default()
                .bg(Color::Blue)
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol(">> ");

    let mut table_state = TableState::default();
    if !tasks.is_empty() {
        table_state.select(Some(selected));
    }

    frame.render_stateful_widget(table, area, &mut table_state);
}

fn kind_cell(kind: TaskKind) -> (&'static str, Style) {
    match kind {
        TaskKind::Image => ("Image", Style::default().fg(Color::Magenta)),
        TaskKind::Audio => ("Audio", Style::default().fg(Color::LightCyan)),
        TaskKind::Text => ("Text", Style::default().fg(Color::LightYellow)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lp_protocol::task_models::{AudioRecordingConfig, WidgetConfig};
    use ratatui::backend::TestBackend;
    use ratatui::buffer::Buffer;
    use ratatui::Terminal;

    fn task(id: &str, title: &str) -> TaskDefinition {
        TaskDefinition {
            id: id.to_string(),
            title: title.to_string(),
            description: String::new(),
            reward: 0.3,
            xp: 10,
            widget: WidgetConfig::AudioRecording(AudioRecordingConfig {
                phrase_to_record: "Hello".to_string(),
                min_duration: 2.0,
                max_duration: 5.0,
            }),
        }
    }

    fn draw(tasks: &[TaskDefinition], completed: &[String], selected: usize) -> Buffer {
        let backend = TestBackend::new(100, 10);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|frame| {
                let area = frame.area();
                render_task_list(frame, area, tasks, completed, selected);
            })
            .unwrap();
        terminal.backend().buffer().clone()
    }

    fn content(buffer: &Buffer) -> String {
        buffer
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_render_empty_catalog_hints_at_init() {
        let buffer = draw(&[], &[], 0);
        let content = content(&buffer);

        assert!(content.contains("Kind"));
        assert!(content.contains("Reward"));
        assert!(content.contains("labelpool init"));
    }

    #[test]
    fn test_render_tasks_with_status() {
        let tasks = vec![
            task("voice-command", "Record Voice Command"),
            task("voice-2", "Second Recording"),
        ];
        let completed = vec!["voice-2".to_string()];
        let buffer = draw(&tasks, &completed, 0);
        let content = content(&buffer);

        assert!(content.contains("Record Voice Command"));
        assert!(content.contains("0.30 POOL"));
        assert!(content.contains("10 XP"));
        assert!(content.contains("Audio"));
        assert!(content.contains("Open"));
        assert!(content.contains("Done"));
    }

    #[test]
    fn test_render_highlights_selected() {
        let tasks = vec![task("a", "First"), task("b", "Second")];
        let buffer = draw(&tasks, &[], 1);

        let highlighted_row = (0..buffer.area().height).find(|&y| {
            (0..buffer.area().width).any(|x| buffer[(x, y)].bg == Color::Blue)
        });
        let row = highlighted_row.expect("selected task should be highlighted");
        let line: String = (0..buffer.area().width)
            .map(|x| buffer[(x, row)].symbol())
            .collect();
        assert!(line.contains("Second"));
    }
}
