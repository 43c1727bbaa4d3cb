//! Image annotation widget.
//!
//! The contributor draws labeled boxes on each image of a fixed set. A drag
//! that starts inside an existing box moves that box; any other drag draws a
//! new one. The task is complete once every image has at least one box.

use crate::widgets::{Change, TaskWidget, WidgetError, WidgetResult};
use lp_protocol::annotation_models::{AnnotationBox, ImageAnnotationResult, Point, Rect};
use lp_protocol::config_models::GlobalConfig;
use lp_protocol::task_models::ImageAnnotationConfig;
use lp_protocol::view_models::{ImageAnnotationView, WidgetView};

/// Pointer interaction in progress.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Drag {
    /// Dragging out a new box from `start` to `end`.
    Drawing { start: Point, end: Point },

    /// Moving box `index` of the current image. `grab` is the pointer
    /// position relative to the box origin.
    Moving { index: usize, grab: Point },
}

pub struct ImageAnnotationWidget {
    image_urls: Vec<String>,
    labels: Vec<String>,
    selected_label: String,

    /// One box list per image, in insertion order.
    boxes: Vec<Vec<AnnotationBox>>,
    current: usize,
    drag: Option<Drag>,
    settings: GlobalConfig,
    submitted: bool,
}

impl ImageAnnotationWidget {
    pub fn new(config: &ImageAnnotationConfig, settings: &GlobalConfig) -> WidgetResult<Self> {
        if config.image_urls.is_empty() {
            return Err(WidgetError::InvalidConfig(
                "image annotation needs at least one image".to_string(),
            ));
        }

        let selected_label = config
            .objects_to_label
            .first()
            .cloned()
            .unwrap_or_else(|| settings.default_label.clone());

        Ok(Self {
            image_urls: config.image_urls.clone(),
            labels: config.objects_to_label.clone(),
            selected_label,
            boxes: vec![Vec::new(); config.image_urls.len()],
            current: 0,
            drag: None,
            settings: settings.clone(),
            submitted: false,
        })
    }

    pub fn selected_label(&self) -> &str {
        &self.selected_label
    }

    pub fn current_image(&self) -> usize {
        self.current
    }

    pub fn image_count(&self) -> usize {
        self.image_urls.len()
    }

    /// Boxes of the current image.
    pub fn current_boxes(&self) -> &[AnnotationBox] {
        &self.boxes[self.current]
    }

    pub fn boxes_per_image(&self) -> &[Vec<AnnotationBox>] {
        &self.boxes
    }

    fn images_with_boxes(&self) -> usize {
        self.boxes.iter().filter(|list| !list.is_empty()).count()
    }

    /// Rectangle of the box being drawn, normalized.
    pub fn draft(&self) -> Option<Rect> {
        match self.drag {
            Some(Drag::Drawing { start, end }) => Some(Rect::from_corners(start, end)),
            _ => None,
        }
    }

    pub fn select_label(&mut self, label: &str) -> WidgetResult<Change> {
        let allowed = if self.labels.is_empty() {
            label == self.settings.default_label
        } else {
            self.labels.iter().any(|l| l == label)
        };
        if !allowed {
            return Err(WidgetError::UnknownLabel(label.to_string()));
        }
        if self.selected_label == label {
            return Ok(Change::None);
        }
        self.selected_label = label.to_string();
        Ok(Change::View)
    }

    /// Begin a drag. Hit-tests the current image's boxes topmost-first.
    pub fn pointer_down(&mut self, x: f64, y: f64) -> Change {
        let p = Point::new(x, y);
        let hit = self.boxes[self.current]
            .iter()
            .rposition(|b| b.rect().contains(p));

        self.drag = Some(match hit {
            Some(index) => {
                let b = &self.boxes[self.current][index];
                Drag::Moving {
                    index,
                    grab: Point::new(x - b.x, y - b.y),
                }
            }
            None => Drag::Drawing { start: p, end: p },
        });
        Change::View
    }

    pub fn pointer_move(&mut self, x: f64, y: f64) -> Change {
        match &mut self.drag {
            Some(Drag::Drawing { end, .. }) => {
                *end = Point::new(x, y);
                Change::View
            }
            Some(Drag::Moving { index, grab }) => {
                let origin = Point::new(x - grab.x, y - grab.y);
                self.boxes[self.current][*index].move_to(origin);
                Change::State
            }
            None => Change::None,
        }
    }

    /// Finish the drag. A drawn box is kept only if it exceeds the minimum
    /// size on both axes.
    pub fn pointer_up(&mut self) -> Change {
        match self.drag.take() {
            Some(Drag::Drawing { start, end }) => {
                let rect = Rect::from_corners(start, end);
                let min = self.settings.min_box_size;
                if rect.width > min && rect.height > min {
                    let color = self.settings.color_for(&self.selected_label).to_string();
                    self.boxes[self.current].push(AnnotationBox::new(
                        rect,
                        self.selected_label.clone(),
                        color,
                    ));
                    Change::State
                } else {
                    Change::View
                }
            }
            Some(Drag::Moving { .. }) => Change::View,
            None => Change::None,
        }
    }

    /// Remove the most recently added box of the current image.
    pub fn undo(&mut self) -> Change {
        self.drag = None;
        match self.boxes[self.current].pop() {
            Some(_) => Change::State,
            None => Change::None,
        }
    }

    /// Remove every box of the current image.
    pub fn clear(&mut self) -> Change {
        self.drag = None;
        if self.boxes[self.current].is_empty() {
            return Change::None;
        }
        self.boxes[self.current].clear();
        Change::State
    }

    pub fn previous_image(&mut self) -> Change {
        if self.current == 0 {
            return Change::None;
        }
        self.drag = None;
        self.current -= 1;
        Change::View
    }

    pub fn next_image(&mut self) -> Change {
        if self.current + 1 >= self.image_urls.len() {
            return Change::None;
        }
        self.drag = None;
        self.current += 1;
        Change::View
    }

    pub fn submit(&mut self) -> WidgetResult<ImageAnnotationResult> {
        if self.submitted {
            return Err(WidgetError::AlreadySubmitted);
        }
        if !self.can_submit() {
            return Err(WidgetError::NotEligible);
        }
        self.submitted = true;
        self.drag = None;
        Ok(ImageAnnotationResult {
            boxes_per_image: self.boxes.clone(),
        })
    }
}

impl TaskWidget for ImageAnnotationWidget {
    fn progress(&self) -> f64 {
        let total = self.image_urls.len() as f64;
        (100.0 * self.images_with_boxes() as f64 / total).round()
    }

    fn can_submit(&self) -> bool {
        self.images_with_boxes() == self.image_urls.len()
    }

    fn is_submitted(&self) -> bool {
        self.submitted
    }

    fn view(&self) -> WidgetView {
        WidgetView::ImageAnnotation(ImageAnnotationView {
            image_index: self.current,
            image_count: self.image_urls.len(),
            image_url: self.image_urls[self.current].clone(),
            labels: self.labels.clone(),
            selected_label: self.selected_label.clone(),
            selected_color: self.settings.color_for(&self.selected_label).to_string(),
            boxes: self.boxes[self.current].clone(),
            draft: self.draft(),
            annotated: self.boxes.iter().map(|list| !list.is_empty()).collect(),
            canvas_width: self.settings.canvas_width,
            canvas_height: self.settings.canvas_height,
        })
    }
}
