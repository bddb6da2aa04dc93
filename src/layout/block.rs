use super::intervals::layout_intervals_in_series;
use super::types::{Point, Size};
use crate::config::LayoutConfig;
use crate::ir::{Block, BlockKind};

/// Intrinsic geometry of a block, computed from the sizes of its
/// dependencies.
#[derive(Debug, Clone, PartialEq)]
pub struct BlockGeometry {
    pub size: Size,
    /// Top-left of each dependency relative to this block's top-left, in
    /// `Block::dependencies` order.
    pub dependencies_offsets: Vec<Point>,
}

/// `dependency_sizes` must line up with `block.dependencies()`; non-nested
/// dependencies are passed as `config.placeholder_size`.
pub fn calculate_block_geometry(
    block: &Block,
    dependency_sizes: &[Size],
    config: &LayoutConfig,
) -> BlockGeometry {
    match &block.kind {
        BlockKind::IntegerLiteral { .. } => BlockGeometry {
            size: config.integer_literal_size,
            dependencies_offsets: Vec::new(),
        },
        BlockKind::Reference { .. } => BlockGeometry {
            size: config.reference_size,
            dependencies_offsets: Vec::new(),
        },
        BlockKind::FunctionCall { .. } => stack_vertically(dependency_sizes, config),
        BlockKind::Array { .. } => row_horizontally(dependency_sizes, config),
    }
}

fn stack_vertically(sizes: &[Size], config: &LayoutConfig) -> BlockGeometry {
    let heights: Vec<f32> = sizes.iter().map(|size| size.height).collect();
    let series = layout_intervals_in_series(
        &heights,
        config.function_call_gap,
        Some(config.function_call_padding),
        false,
    );
    let widest = sizes.iter().map(|size| size.width).fold(0.0f32, f32::max);
    let width = widest + config.function_call_margin;
    let dependencies_offsets = sizes
        .iter()
        .zip(&series.intervals)
        .map(|(size, interval)| Point::new((width - size.width) / 2.0, interval.left))
        .collect();
    BlockGeometry {
        size: Size::new(width, series.total_size),
        dependencies_offsets,
    }
}

fn row_horizontally(sizes: &[Size], config: &LayoutConfig) -> BlockGeometry {
    let widths: Vec<f32> = sizes.iter().map(|size| size.width).collect();
    let series = layout_intervals_in_series(
        &widths,
        config.array_gap,
        Some(config.array_padding),
        false,
    );
    let tallest = sizes.iter().map(|size| size.height).fold(0.0f32, f32::max);
    let height = tallest + config.array_margin;
    let dependencies_offsets = sizes
        .iter()
        .zip(&series.intervals)
        .map(|(size, interval)| Point::new(interval.left, (height - size.height) / 2.0))
        .collect();
    BlockGeometry {
        size: Size::new(series.total_size, height),
        dependencies_offsets,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leaves_have_fixed_sizes() {
        let config = LayoutConfig::default();
        let literal = calculate_block_geometry(&Block::integer_literal(10, false), &[], &config);
        assert_eq!(literal.size, Size::new(40.0, 20.0));
        assert!(literal.dependencies_offsets.is_empty());
        let reference = calculate_block_geometry(&Block::reference("plus", true), &[], &config);
        assert_eq!(reference.size, Size::new(80.0, 20.0));
    }

    #[test]
    fn function_call_stacks_function_over_argument() {
        let config = LayoutConfig::default();
        let block = Block::function_call("f", "x", false);
        let geometry = calculate_block_geometry(
            &block,
            &[Size::new(40.0, 20.0), Size::new(40.0, 20.0)],
            &config,
        );
        let gap = config.function_call_gap;
        let padding = config.function_call_padding;
        assert_eq!(geometry.size.height, 20.0 + 20.0 + gap + 2.0 * padding);
        assert_eq!(geometry.size.width, 40.0 + config.function_call_margin);
        assert_eq!(
            geometry.dependencies_offsets,
            vec![Point::new(10.0, 10.0), Point::new(10.0, 50.0)]
        );
    }

    #[test]
    fn function_call_centers_narrower_dependency() {
        let config = LayoutConfig::default();
        let block = Block::function_call("f", "x", false);
        let geometry = calculate_block_geometry(
            &block,
            &[Size::new(80.0, 20.0), config.placeholder_size],
            &config,
        );
        assert_eq!(geometry.size, Size::new(100.0, 70.0));
        assert_eq!(geometry.dependencies_offsets[0], Point::new(10.0, 10.0));
        assert_eq!(geometry.dependencies_offsets[1], Point::new(45.0, 50.0));
    }

    #[test]
    fn array_lays_elements_side_by_side() {
        let config = LayoutConfig::default();
        let block = Block::array(["a", "b", "c"], true);
        let geometry = calculate_block_geometry(
            &block,
            &[
                config.placeholder_size,
                Size::new(40.0, 20.0),
                Size::new(80.0, 20.0),
            ],
            &config,
        );
        assert_eq!(geometry.size, Size::new(10.0 + 10.0 + 10.0 + 40.0 + 10.0 + 80.0 + 10.0, 40.0));
        assert_eq!(
            geometry.dependencies_offsets,
            vec![
                Point::new(10.0, 15.0),
                Point::new(30.0, 10.0),
                Point::new(80.0, 10.0),
            ]
        );
    }

    #[test]
    fn empty_array_is_padding_and_margin() {
        let config = LayoutConfig::default();
        let geometry = calculate_block_geometry(&Block::array(Vec::<&str>::new(), true), &[], &config);
        assert_eq!(geometry.size, Size::new(20.0, 20.0));
        assert!(geometry.dependencies_offsets.is_empty());
    }
}
