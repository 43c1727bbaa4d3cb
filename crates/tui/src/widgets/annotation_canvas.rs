//! Annotation canvas rendered with ratatui's braille canvas.
//!
//! The frame is painted by `lp_core::surface::render_annotation` into a
//! `RecordingSurface`, and the recorded commands are replayed here. Canvas
//! space has its origin at the top-left with y growing downwards; ratatui's
//! canvas grows upwards, so every y is flipped against the canvas height.

use lp_core::surface::{render_annotation, DrawCommand, RecordingSurface};
use lp_protocol::annotation_models::Rect as BoxRect;
use lp_protocol::view_models::ImageAnnotationView;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::symbols::Marker;
use ratatui::text::Span;
use ratatui::widgets::canvas::{Canvas, Context, Line, Rectangle};
use ratatui::widgets::{Block, Widget};

/// An `#RRGGBB` or `#RRGGBBAA` color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HexColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl HexColor {
    pub const BLACK: HexColor = HexColor {
        r: 0,
        g: 0,
        b: 0,
        a: 0xFF,
    };

    pub fn parse(value: &str) -> Option<Self> {
        let hex = value.strip_prefix('#')?;
        if !hex.is_ascii() {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
        match hex.len() {
            6 => Some(Self {
                r: channel(0)?,
                g: channel(2)?,
                b: channel(4)?,
                a: 0xFF,
            }),
            8 => Some(Self {
                r: channel(0)?,
                g: channel(2)?,
                b: channel(4)?,
                a: channel(6)?,
            }),
            _ => None,
        }
    }

    /// Composite over an opaque `background`; terminals have no alpha.
    pub fn over(self, background: HexColor) -> Color {
        let alpha = f64::from(self.a) / 255.0;
        let mix = |fg: u8, bg: u8| {
            (f64::from(fg) * alpha + f64::from(bg) * (1.0 - alpha)).round() as u8
        };
        Color::Rgb(
            mix(self.r, background.r),
            mix(self.g, background.g),
            mix(self.b, background.b),
        )
    }
}

/// Map a terminal cell inside `inner` to canvas pixel coordinates.
///
/// Returns the center of the cell, or `None` when the cell lies outside
/// the canvas.
pub fn cell_to_canvas(
    inner: Rect,
    canvas_width: f64,
    canvas_height: f64,
    column: u16,
    row: u16,
) -> Option<(f64, f64)> {
    if inner.width == 0 || inner.height == 0 {
        return None;
    }
    if column < inner.x
        || row < inner.y
        || column >= inner.x + inner.width
        || row >= inner.y + inner.height
    {
        return None;
    }
    let x = (f64::from(column - inner.x) + 0.5) * canvas_width / f64::from(inner.width);
    let y = (f64::from(row - inner.y) + 0.5) * canvas_height / f64::from(inner.height);
    Some((x, y))
}

/// Ratatui widget drawing one image's boxes and the in-progress draft.
pub struct AnnotationCanvas<'a> {
    view: &'a ImageAnnotationView,
    block: Option<Block<'a>>,
}

impl<'a> AnnotationCanvas<'a> {
    pub fn new(view: &'a ImageAnnotationView) -> Self {
        Self { view, block: None }
    }

    pub fn block(mut self, block: Block<'a>) -> Self {
        self.block = Some(block);
        self
    }
}

impl Widget for AnnotationCanvas<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let mut surface = RecordingSurface::new();
        render_annotation(self.view, &mut surface);
        let commands = surface.commands();

        let (width, height) = (self.view.canvas_width, self.view.canvas_height);
        let background = commands
            .iter()
            .find_map(|command| match command {
                DrawCommand::FillRect { color, .. } => HexColor::parse(color),
                _ => None,
            })
            .unwrap_or(HexColor::BLACK);

        let mut canvas = Canvas::default()
            .marker(Marker::Braille)
            .background_color(background.over(HexColor::BLACK))
            .x_bounds([0.0, width])
            .y_bounds([0.0, height])
            .paint(|ctx| replay(ctx, commands, (width, height), background));
        if let Some(block) = self.block {
            canvas = canvas.block(block);
        }
        canvas.render(area, buf);
    }
}

fn replay(
    ctx: &mut Context,
    commands: &[DrawCommand],
    (width, height): (f64, f64),
    background: HexColor,
) {
    let color = |value: &str| {
        HexColor::parse(value)
            .map(|c| c.over(background))
            .unwrap_or(Color::White)
    };

    // Label tabs are filled right before their text; print the text on them.
    let mut tab: Option<Color> = None;
    let mut grid_done = false;

    for command in commands {
        match command {
            DrawCommand::Clear { .. } => {}
            DrawCommand::FillRect { rect, color: fill } => {
                if rect.width >= width && rect.height >= height {
                    // Background, already applied.
                    continue;
                }
                tab = Some(color(fill));
            }
            DrawCommand::Line { from, to, color: stroke } => {
                ctx.draw(&Line::new(
                    from.x,
                    height - from.y,
                    to.x,
                    height - to.y,
                    color(stroke),
                ));
            }
            DrawCommand::StrokeRect { rect, color: stroke, .. } => {
                if !grid_done {
                    ctx.layer();
                    grid_done = true;
                }
                ctx.draw(&flipped(*rect, height, color(stroke)));
            }
            DrawCommand::Text { text, at, color: fg } => {
                let mut style = Style::default().fg(color(fg));
                if let Some(bg) = tab.take() {
                    style = style.bg(bg);
                }
                ctx.print(at.x, height - at.y, Span::styled(text.clone(), style));
            }
        }
    }
}

fn flipped(rect: BoxRect, height: f64, color: Color) -> Rectangle {
    Rectangle {
        x: rect.x,
        y: height - rect.y - rect.height,
        width: rect.width,
        height: rect.height,
        color,
    }
}
