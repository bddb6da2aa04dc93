use std::collections::BTreeMap;

use super::types::{BlockLayout, Interval, Point, Segment};
use crate::config::LayoutConfig;
use crate::error::LayoutError;
use crate::ir::{BlockId, InsertionLocation};

/// Resolves the drop target for a pointer at `mouse_position`.
///
/// A pointer within `layer_margin` of a layer band lands inside that layer,
/// before the first cluster root whose center lies to its right. Anywhere
/// else it lands between layers, before the first layer that starts below it.
pub fn calculate_insertion_location(
    layer_intervals: &[Interval],
    block_layouts: &BTreeMap<BlockId, BlockLayout>,
    layers: &[Vec<BlockId>],
    mouse_position: Point,
    layer_margin: f32,
) -> Result<InsertionLocation, LayoutError> {
    let y = mouse_position.y;
    let over_layer = layer_intervals.iter().position(|interval| {
        interval.left - layer_margin <= y && y <= interval.right + layer_margin
    });

    let Some(layer_index) = over_layer else {
        let layer_index = layer_intervals
            .iter()
            .position(|interval| y < interval.left - layer_margin)
            .unwrap_or(layers.len());
        return Ok(InsertionLocation::BetweenLayers { layer_index });
    };

    let layer = layers.get(layer_index).map(Vec::as_slice).unwrap_or(&[]);
    let mut index = layer.len();
    for (position, id) in layer.iter().enumerate() {
        let layout = block_layouts
            .get(id)
            .ok_or_else(|| LayoutError::MissingLayout(id.clone()))?;
        if layout.center.x > mouse_position.x {
            index = position;
            break;
        }
    }
    Ok(InsertionLocation::BetweenClustersWithinLayer { layer_index, index })
}

/// The preview line drawn where `location` would put a dropped block.
pub fn insertion_guide(
    location: InsertionLocation,
    layers: &[Vec<BlockId>],
    block_layouts: &BTreeMap<BlockId, BlockLayout>,
    layer_intervals: &[Interval],
    config: &LayoutConfig,
) -> Result<Segment, LayoutError> {
    match location {
        InsertionLocation::BetweenClustersWithinLayer { layer_index, index } => {
            let layer = layers.get(layer_index).map(Vec::as_slice).unwrap_or(&[]);
            let band = layer_intervals.get(layer_index).copied();
            let lookup = |id: &BlockId| {
                block_layouts
                    .get(id)
                    .ok_or_else(|| LayoutError::MissingLayout(id.clone()))
            };
            let x = match (index.checked_sub(1).and_then(|i| layer.get(i)), layer.get(index)) {
                (None, Some(next)) => lookup(next)?.top_left.x - config.cluster_margin,
                (Some(previous), None) => lookup(previous)?.bottom_right.x + config.cluster_margin,
                (Some(previous), Some(next)) => {
                    (lookup(previous)?.bottom_right.x + lookup(next)?.top_left.x) / 2.0
                }
                (None, None) => 0.0,
            };
            let (top, bottom) = match band {
                Some(band) => (
                    band.left - config.layer_margin,
                    band.right + config.layer_margin,
                ),
                None => (0.0, 0.0),
            };
            Ok(Segment {
                start: Point::new(x, top),
                end: Point::new(x, bottom),
            })
        }
        InsertionLocation::BetweenLayers { layer_index } => {
            let y = match (layer_intervals.first(), layer_intervals.last()) {
                (Some(first), Some(last)) => {
                    if layer_index == 0 {
                        first.left - config.cluster_margin
                    } else if layer_index < layer_intervals.len() {
                        (layer_intervals[layer_index - 1].right
                            + layer_intervals[layer_index].left)
                            / 2.0
                    } else {
                        last.right + config.cluster_margin
                    }
                }
                _ => 0.0,
            };
            let half = config.insertion_guide_length / 2.0;
            Ok(Segment {
                start: Point::new(-half, y),
                end: Point::new(half, y),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{Block, Program};
    use crate::layout::calculate_program_layout;

    fn two_layers() -> Program {
        let mut program = Program::new();
        for (id, value) in [("a", 1), ("b", 2), ("c", 3)] {
            program
                .blocks
                .insert(id.into(), Block::integer_literal(value, false));
        }
        program.layers = vec![vec!["a".into()], vec!["b".into(), "c".into()]];
        program
    }

    fn resolve(program: &Program, x: f32, y: f32) -> InsertionLocation {
        let config = LayoutConfig::default();
        let layout = calculate_program_layout(program, &config).unwrap();
        calculate_insertion_location(
            &layout.layer_intervals,
            &layout.block_layouts,
            &program.layers,
            Point::new(x, y),
            config.layer_margin,
        )
        .unwrap()
    }

    #[test]
    fn no_layers_means_first_layer() {
        let location = calculate_insertion_location(
            &[],
            &BTreeMap::new(),
            &[],
            Point::new(3.0, 4.0),
            20.0,
        )
        .unwrap();
        assert_eq!(location, InsertionLocation::BetweenLayers { layer_index: 0 });
    }

    #[test]
    fn pointer_inside_a_layer_picks_cluster_slot() {
        let program = two_layers();
        let config = LayoutConfig::default();
        let layout = calculate_program_layout(&program, &config).unwrap();
        let band = layout.layer_intervals[1];
        let b = layout.block_layouts[&BlockId::from("b")];
        let c = layout.block_layouts[&BlockId::from("c")];

        assert_eq!(
            resolve(&program, b.center.x - 1.0, band.center),
            InsertionLocation::BetweenClustersWithinLayer {
                layer_index: 1,
                index: 0
            }
        );
        assert_eq!(
            resolve(&program, (b.center.x + c.center.x) / 2.0, band.left - 5.0),
            InsertionLocation::BetweenClustersWithinLayer {
                layer_index: 1,
                index: 1
            }
        );
        assert_eq!(
            resolve(&program, c.center.x + 1.0, band.right + 20.0),
            InsertionLocation::BetweenClustersWithinLayer {
                layer_index: 1,
                index: 2
            }
        );
    }

    #[test]
    fn pointer_outside_layers_lands_between_them() {
        let program = two_layers();
        let layout = calculate_program_layout(&program, &LayoutConfig::default()).unwrap();
        let first = layout.layer_intervals[0];
        let second = layout.layer_intervals[1];

        assert_eq!(
            resolve(&program, 0.0, first.left - 21.0),
            InsertionLocation::BetweenLayers { layer_index: 0 }
        );
        assert_eq!(
            resolve(&program, 0.0, (first.right + second.left) / 2.0),
            InsertionLocation::BetweenLayers { layer_index: 1 }
        );
        assert_eq!(
            resolve(&program, 0.0, second.right + 21.0),
            InsertionLocation::BetweenLayers { layer_index: 2 }
        );
    }

    #[test]
    fn missing_layouts_are_reported() {
        let program = two_layers();
        let layout = calculate_program_layout(&program, &LayoutConfig::default()).unwrap();
        let result = calculate_insertion_location(
            &layout.layer_intervals,
            &BTreeMap::new(),
            &program.layers,
            Point::new(0.0, layout.layer_intervals[0].center),
            20.0,
        );
        assert_eq!(result, Err(LayoutError::MissingLayout("a".into())));
    }

    #[test]
    fn guides_sit_between_neighbours() {
        let program = two_layers();
        let config = LayoutConfig::default();
        let layout = calculate_program_layout(&program, &config).unwrap();
        let b = layout.block_layouts[&BlockId::from("b")];
        let c = layout.block_layouts[&BlockId::from("c")];
        let band = layout.layer_intervals[1];
        let guide = |location| {
            insertion_guide(
                location,
                &program.layers,
                &layout.block_layouts,
                &layout.layer_intervals,
                &config,
            )
            .unwrap()
        };

        let before = guide(InsertionLocation::BetweenClustersWithinLayer {
            layer_index: 1,
            index: 0,
        });
        assert_eq!(before.start, Point::new(b.top_left.x - 20.0, band.left - 20.0));
        assert_eq!(before.end, Point::new(b.top_left.x - 20.0, band.right + 20.0));

        let between = guide(InsertionLocation::BetweenClustersWithinLayer {
            layer_index: 1,
            index: 1,
        });
        assert_eq!(between.start.x, (b.bottom_right.x + c.top_left.x) / 2.0);

        let after = guide(InsertionLocation::BetweenClustersWithinLayer {
            layer_index: 1,
            index: 2,
        });
        assert_eq!(after.start.x, c.bottom_right.x + 20.0);

        let middle = guide(InsertionLocation::BetweenLayers { layer_index: 1 });
        let y = (layout.layer_intervals[0].right + band.left) / 2.0;
        assert_eq!(middle.start, Point::new(-100.0, y));
        assert_eq!(middle.end, Point::new(100.0, y));

        let last = guide(InsertionLocation::BetweenLayers { layer_index: 2 });
        assert_eq!(last.start.y, band.right + 20.0);
    }

    #[test]
    fn guide_without_layers_is_at_origin() {
        let segment = insertion_guide(
            InsertionLocation::BetweenLayers { layer_index: 0 },
            &[],
            &BTreeMap::new(),
            &[],
            &LayoutConfig::default(),
        )
        .unwrap();
        assert_eq!(segment.start, Point::new(-100.0, 0.0));
    }
}
