//! Canvas capability and the annotation renderer.
//!
//! The image annotation widget never touches a real canvas. Front-ends
//! implement `Canvas2DSurface` (or replay the commands of a
//! `RecordingSurface`) and call `render_annotation` whenever they receive a
//! new `ImageAnnotationView`.

use lp_protocol::annotation_models::{Point, Rect};
use lp_protocol::view_models::ImageAnnotationView;

const BACKGROUND_COLOR: &str = "#1B0F29";
const GRID_COLOR: &str = "#7F5AF033";
const PLACEHOLDER_COLOR: &str = "#FFFFFF80";
const LABEL_TEXT_COLOR: &str = "#FFFFFF";
const GRID_SIZE: f64 = 20.0;
const BOX_LINE_WIDTH: f64 = 2.0;
const LABEL_PADDING: f64 = 4.0;
const LABEL_HEIGHT: f64 = 20.0;

/// Width of one glyph of the 12px monospace label font.
pub const GLYPH_WIDTH: f64 = 7.0;

/// A 2D drawing target in canvas pixel space.
///
/// Colors are `#RRGGBB` or `#RRGGBBAA` hex strings.
pub trait Canvas2DSurface {
    /// Reset the surface to `width` x `height` pixels, all transparent.
    fn clear(&mut self, width: f64, height: f64);

    fn fill_rect(&mut self, rect: Rect, color: &str);

    fn stroke_rect(&mut self, rect: Rect, color: &str, line_width: f64);

    fn draw_line(&mut self, from: Point, to: Point, color: &str);

    /// Draw `text` with its left edge at `at.x`, vertically centered on `at.y`.
    fn draw_text(&mut self, text: &str, at: Point, color: &str);

    /// Rendered width of `text` in pixels.
    fn measure_text(&self, text: &str) -> f64;
}

/// Paint one frame of the annotation canvas.
pub fn render_annotation<S: Canvas2DSurface + ?Sized>(view: &ImageAnnotationView, surface: &mut S) {
    let (width, height) = (view.canvas_width, view.canvas_height);

    surface.clear(width, height);
    surface.fill_rect(Rect::new(0.0, 0.0, width, height), BACKGROUND_COLOR);

    let mut x = 0.0;
    while x < width {
        surface.draw_line(Point::new(x, 0.0), Point::new(x, height), GRID_COLOR);
        x += GRID_SIZE;
    }
    let mut y = 0.0;
    while y < height {
        surface.draw_line(Point::new(0.0, y), Point::new(width, y), GRID_COLOR);
        y += GRID_SIZE;
    }

    if view.boxes.is_empty() && view.draft.is_none() {
        let text = "Annotation Canvas";
        let hint = "Click and drag to draw boxes";
        surface.draw_text(
            text,
            Point::new((width - surface.measure_text(text)) / 2.0, height / 2.0 - 20.0),
            PLACEHOLDER_COLOR,
        );
        surface.draw_text(
            hint,
            Point::new((width - surface.measure_text(hint)) / 2.0, height / 2.0 + 20.0),
            PLACEHOLDER_COLOR,
        );
    }

    for annotation in &view.boxes {
        surface.stroke_rect(annotation.rect(), &annotation.color, BOX_LINE_WIDTH);

        // Label tab sits just above the box.
        let tab = Rect::new(
            annotation.x,
            annotation.y - 24.0,
            surface.measure_text(&annotation.label) + LABEL_PADDING * 2.0,
            LABEL_HEIGHT,
        );
        surface.fill_rect(tab, &format!("{}CC", annotation.color));
        surface.draw_text(
            &annotation.label,
            Point::new(annotation.x + LABEL_PADDING, annotation.y - 14.0),
            LABEL_TEXT_COLOR,
        );
    }

    if let Some(draft) = view.draft {
        surface.stroke_rect(draft, &view.selected_color, BOX_LINE_WIDTH);
    }
}

/// One call made against a `RecordingSurface`.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear {
        width: f64,
        height: f64,
    },
    FillRect {
        rect: Rect,
        color: String,
    },
    StrokeRect {
        rect: Rect,
        color: String,
        line_width: f64,
    },
    Line {
        from: Point,
        to: Point,
        color: String,
    },
    Text {
        text: String,
        at: Point,
        color: String,
    },
}

/// A surface that records draw calls instead of rasterizing them.
///
/// `clear` discards previously recorded commands, so after a render the
/// surface holds exactly one frame.
#[derive(Debug, Default, Clone)]
pub struct RecordingSurface {
    commands: Vec<DrawCommand>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Rectangles stroked in the current frame.
    pub fn stroked_rects(&self) -> Vec<Rect> {
        self.commands
            .iter()
            .filter_map(|command| match command {
                DrawCommand::StrokeRect { rect, .. } => Some(*rect),
                _ => None,
            })
            .collect()
    }

    /// Text drawn in the current frame.
    pub fn texts(&self) -> Vec<&str> {
        self.commands
            .iter()
            .filter_map(|command| match command {
                DrawCommand::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl Canvas2DSurface for RecordingSurface {
    fn clear(&mut self, width: f64, height: f64) {
        self.commands.clear();
        self.commands.push(DrawCommand::Clear { width, height });
    }

    fn fill_rect(&mut self, rect: Rect, color: &str) {
        self.commands.push(DrawCommand::FillRect {
            rect,
            color: color.to_string(),
        });
    }

    fn stroke_rect(&mut self, rect: Rect, color: &str, line_width: f64) {
        self.commands.push(DrawCommand::StrokeRect {
            rect,
            color: color.to_string(),
            line_width,
        });
    }

    fn draw_line(&mut self, from: Point, to: Point, color: &str) {
        self.commands.push(DrawCommand::Line {
            from,
            to,
            color: color.to_string(),
        });
    }

    fn draw_text(&mut self, text: &str, at: Point, color: &str) {
        self.commands.push(DrawCommand::Text {
            text: text.to_string(),
            at,
            color: color.to_string(),
        });
    }

    fn measure_text(&self, text: &str) -> f64 {
        text.chars().count() as f64 * GLYPH_WIDTH
    }
}
