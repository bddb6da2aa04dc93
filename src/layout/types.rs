use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::ir::BlockId;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const ORIGIN: Point = Point { x: 0.0, y: 0.0 };

    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn offset_by(self, offset: Point) -> Self {
        Self {
            x: self.x + offset.x,
            y: self.y + offset.y,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// One packed interval along a single axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Interval {
    pub left: f32,
    pub center: f32,
    pub right: f32,
    pub size: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IntervalSeries {
    pub intervals: Vec<Interval>,
    pub total_size: f32,
}

/// Absolute geometry of a single block.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockLayout {
    pub top_left: Point,
    pub center: Point,
    pub bottom_right: Point,
    /// Bottom-center; outgoing dependency lines start here.
    pub output: Point,
    pub size: Size,
}

impl BlockLayout {
    pub fn from_top_left(top_left: Point, size: Size) -> Self {
        Self {
            top_left,
            center: Point::new(
                top_left.x + size.width / 2.0,
                top_left.y + size.height / 2.0,
            ),
            bottom_right: Point::new(top_left.x + size.width, top_left.y + size.height),
            output: Point::new(top_left.x + size.width / 2.0, top_left.y + size.height),
            size,
        }
    }
}

/// A dependency edge that crosses a cluster boundary and is drawn as a line.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LineConnectionLayout {
    pub dependency_block_id: BlockId,
    pub dependent_block_id: BlockId,
    /// Where the connector attaches inside the dependent's shape.
    pub endpoint: Point,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgramLayout {
    pub block_layouts: BTreeMap<BlockId, BlockLayout>,
    pub line_connection_layouts: Vec<LineConnectionLayout>,
    /// Vertical extent of each layer, in `Program::layers` order.
    pub layer_intervals: Vec<Interval>,
    pub width: f32,
    pub height: f32,
}

/// A straight line segment, used for drop previews.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Segment {
    pub start: Point,
    pub end: Point,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn block_layout_derives_anchor_points() {
        let layout = BlockLayout::from_top_left(Point::new(-20.0, 10.0), Size::new(40.0, 20.0));
        assert_eq!(layout.center, Point::new(0.0, 20.0));
        assert_eq!(layout.bottom_right, Point::new(20.0, 30.0));
        assert_eq!(layout.output, Point::new(0.0, 30.0));
    }
}
