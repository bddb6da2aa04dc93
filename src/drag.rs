use std::collections::BTreeSet;

use tracing::debug;

use crate::config::LayoutConfig;
use crate::edit::{is_no_op_move, move_block_to_new_location_as_cluster_root};
use crate::error::{DropError, LayoutError};
use crate::ir::{BlockId, Program};
use crate::layout::graph::descendants_topologically_sorted;
use crate::layout::{Point, ProgramLayout, calculate_insertion_location, nested_block_owners};

/// The blocks that move on screen when `block_id` is dragged: the block and
/// everything nested inside it.
pub fn dragged_block_ids(program: &Program, block_id: &BlockId) -> BTreeSet<BlockId> {
    let nested_graph = program.nested_dependency_graph();
    descendants_topologically_sorted(&nested_graph, block_id, true)
        .into_iter()
        .collect()
}

/// The cluster root whose shape contains `block_id`, found by following
/// [`nested_block_owners`] upwards. A nested block no layered cluster reaches
/// is its own answer.
pub fn cluster_root_of(program: &Program, block_id: &BlockId) -> Result<BlockId, LayoutError> {
    let owners = nested_block_owners(program)?;
    let mut current = block_id.clone();
    loop {
        let block = program
            .blocks
            .get(&current)
            .ok_or_else(|| LayoutError::UnknownBlock(current.clone()))?;
        if !block.nested {
            return Ok(current);
        }
        match owners.get(&current) {
            Some((owner, _)) => current = owner.clone(),
            None => return Ok(current),
        }
    }
}

/// Resolves where a drop at `mouse_position` lands and applies it.
///
/// Returns `None` when the drop would leave `block_id` where it already is.
pub fn apply_drop(
    program: &Program,
    block_id: &BlockId,
    mouse_position: Point,
    layout: &ProgramLayout,
    config: &LayoutConfig,
) -> Result<Option<Program>, DropError> {
    let location = calculate_insertion_location(
        &layout.layer_intervals,
        &layout.block_layouts,
        &program.layers,
        mouse_position,
        config.layer_margin,
    )?;
    if is_no_op_move(&program.layers, block_id, location) {
        debug!(block = %block_id, ?location, "drop suppressed, block already there");
        return Ok(None);
    }
    let edited = move_block_to_new_location_as_cluster_root(program, block_id, location)?;
    Ok(Some(edited))
}
