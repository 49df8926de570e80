//! Pixel geometry for a finished layout.
//!
//! Rows are centred within the widest row. Parent lines run from the bottom
//! centre of the parent to the top centre of the child; spouse lines from the
//! right edge of the declaring person to the left edge of the spouse, a
//! quarter of the box height below the top.

use crate::Layout;
use serde::Serialize;
use stamm_core::config::SceneConfig;
use stamm_core::graph::PersonId;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned box, `origin` at the top left.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Rect {
    pub origin: Point,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn right(&self) -> f64 {
        self.origin.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.origin.y + self.height
    }

    pub fn center_x(&self) -> f64 {
        self.origin.x + self.width / 2.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PersonBox {
    pub id: PersonId,
    pub rect: Rect,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Line {
    pub from_id: PersonId,
    pub to_id: PersonId,
    pub start: Point,
    pub end: Point,
}

/// Drawable form of a [`Layout`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Scene {
    pub width: f64,
    pub height: f64,
    /// Boxes in row order, left to right.
    pub boxes: Vec<PersonBox>,
    pub parent_lines: Vec<Line>,
    pub spouse_lines: Vec<Line>,
}

impl Scene {
    pub fn build(layout: &Layout, config: &SceneConfig) -> Self {
        let step_x = config.box_width + config.x_padding;
        let step_y = config.box_height + config.y_padding;

        let widest = layout.rows.iter().map(|r| r.width()).max().unwrap_or(0);
        let width = widest as f64 * step_x + config.scene_padding;
        let height = layout.rows.len() as f64 * step_y + config.scene_padding;

        let mut rects: BTreeMap<&str, Rect> = BTreeMap::new();
        let mut boxes = Vec::with_capacity(layout.positions.len());
        for row in &layout.rows {
            let row_width = row.width() as f64 * step_x;
            let start_x = ((width - row_width) / 2.0).floor().max(config.min_left);
            let y = config.margin + row.level as f64 * step_y;

            for (slot, id) in row.cells.iter().flat_map(|c| c.members()).enumerate() {
                let rect = Rect {
                    origin: Point::new(start_x + slot as f64 * step_x, y),
                    width: config.box_width,
                    height: config.box_height,
                };
                rects.insert(id.as_str(), rect);
                boxes.push(PersonBox {
                    id: id.clone(),
                    rect,
                });
            }
        }

        let parent_lines = layout
            .edges
            .parent_edges
            .iter()
            .filter_map(|e| {
                let parent = rects.get(e.from_id.as_str())?;
                let child = rects.get(e.to_id.as_str())?;
                Some(Line {
                    from_id: e.from_id.clone(),
                    to_id: e.to_id.clone(),
                    start: Point::new(parent.center_x(), parent.bottom()),
                    end: Point::new(child.center_x(), child.origin.y),
                })
            })
            .collect();

        let quarter = config.box_height / 4.0;
        let spouse_lines = layout
            .edges
            .spouse_edges
            .iter()
            .filter_map(|e| {
                let person = rects.get(e.from_id.as_str())?;
                let spouse = rects.get(e.to_id.as_str())?;
                Some(Line {
                    from_id: e.from_id.clone(),
                    to_id: e.to_id.clone(),
                    start: Point::new(person.right(), person.origin.y + quarter),
                    end: Point::new(spouse.origin.x, spouse.origin.y + quarter),
                })
            })
            .collect();

        Self {
            width,
            height,
            boxes,
            parent_lines,
            spouse_lines,
        }
    }

    pub fn find_box(&self, id: &str) -> Option<&PersonBox> {
        self.boxes.iter().find(|b| b.id == id)
    }

    /// Person whose box contains `point`, if any.
    pub fn hit_test(&self, point: Point) -> Option<&PersonId> {
        self.boxes
            .iter()
            .find(|b| {
                point.x >= b.rect.origin.x
                    && point.x <= b.rect.right()
                    && point.y >= b.rect.origin.y
                    && point.y <= b.rect.bottom()
            })
            .map(|b| &b.id)
    }
}
