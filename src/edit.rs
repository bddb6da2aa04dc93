//! Structural edits to a `Program`.
//!
//! Edits go through a [`ProgramDraft`], which owns the program while it is
//! being changed. Every edit checks its arguments before touching anything,
//! so a rejected edit leaves the draft as it was.

use tracing::debug;

use crate::error::EditError;
use crate::ir::{BlockId, InsertionLocation, Program};

/// A program being edited. Layers never stay empty between edits, so layer
/// indices passed to a chained edit refer to the layers as the previous edit
/// left them.
#[derive(Debug, Clone)]
pub struct ProgramDraft {
    program: Program,
}

impl Program {
    pub fn edit(self) -> ProgramDraft {
        ProgramDraft { program: self }
    }
}

impl ProgramDraft {
    pub fn program(&self) -> &Program {
        &self.program
    }

    /// Turns `block_id` into a cluster root at `location`, taking it out of
    /// the layer it occupied before, if any.
    ///
    /// `location` refers to the layers as they are before the block is taken
    /// out; a target later in the same layer is shifted left to account for
    /// the removal. A layer emptied by taking the block out is dropped right
    /// away, so the next edit on the draft sees the compacted layer indices.
    pub fn move_block_to_new_location_as_cluster_root(
        &mut self,
        block_id: &BlockId,
        location: InsertionLocation,
    ) -> Result<&mut Self, EditError> {
        if !self.program.blocks.contains_key(block_id) {
            return Err(EditError::UnknownBlock(block_id.clone()));
        }
        let removed = self.program.layer_position(block_id);
        let mut layers = self.program.layers.clone();
        let mut target = location;
        if let Some((layer_index, index)) = removed {
            layers[layer_index].remove(index);
            target = adjust_location_after_removal(target, layer_index, index);
            if layers[layer_index].is_empty() {
                layers.remove(layer_index);
                target = adjust_location_after_layer_removal(target, layer_index)?;
            }
        }
        check_location(&layers, target)?;

        match target {
            InsertionLocation::BetweenLayers { layer_index } => {
                layers.insert(layer_index, vec![block_id.clone()]);
            }
            InsertionLocation::BetweenClustersWithinLayer { layer_index, index } => {
                layers[layer_index].insert(index, block_id.clone());
            }
        }
        self.program.layers = layers;
        if let Some(block) = self.program.blocks.get_mut(block_id) {
            block.nested = false;
        }
        debug!(block = %block_id, ?removed, ?location, ?target, "moved block to new cluster root slot");
        Ok(self)
    }

    /// Hands the program back, without any empty layers it started with.
    pub fn finish(mut self) -> Program {
        self.program.layers.retain(|layer| !layer.is_empty());
        self.program
    }
}

fn adjust_location_after_removal(
    location: InsertionLocation,
    removed_layer: usize,
    removed_index: usize,
) -> InsertionLocation {
    match location {
        InsertionLocation::BetweenClustersWithinLayer { layer_index, index }
            if layer_index == removed_layer && index > removed_index =>
        {
            InsertionLocation::BetweenClustersWithinLayer {
                layer_index,
                index: index - 1,
            }
        }
        _ => location,
    }
}

/// Re-targets `location` once the layer at `removed_layer` is gone. A target
/// inside that layer becomes a new layer in its place.
fn adjust_location_after_layer_removal(
    location: InsertionLocation,
    removed_layer: usize,
) -> Result<InsertionLocation, EditError> {
    let location = match location {
        InsertionLocation::BetweenLayers { layer_index } if layer_index > removed_layer => {
            InsertionLocation::BetweenLayers {
                layer_index: layer_index - 1,
            }
        }
        InsertionLocation::BetweenClustersWithinLayer { layer_index, index }
            if layer_index == removed_layer =>
        {
            if index > 0 {
                return Err(EditError::IndexOutOfRange {
                    layer_index,
                    index,
                    len: 0,
                });
            }
            InsertionLocation::BetweenLayers {
                layer_index: removed_layer,
            }
        }
        InsertionLocation::BetweenClustersWithinLayer { layer_index, index }
            if layer_index > removed_layer =>
        {
            InsertionLocation::BetweenClustersWithinLayer {
                layer_index: layer_index - 1,
                index,
            }
        }
        _ => location,
    };
    Ok(location)
}

fn check_location(layers: &[Vec<BlockId>], location: InsertionLocation) -> Result<(), EditError> {
    let layer_count = layers.len();
    match location {
        InsertionLocation::BetweenLayers { layer_index } => {
            if layer_index > layer_count {
                return Err(EditError::LayerOutOfRange {
                    layer_index,
                    layer_count,
                });
            }
        }
        InsertionLocation::BetweenClustersWithinLayer { layer_index, index } => {
            let Some(layer) = layers.get(layer_index) else {
                return Err(EditError::LayerOutOfRange {
                    layer_index,
                    layer_count,
                });
            };
            if index > layer.len() {
                return Err(EditError::IndexOutOfRange {
                    layer_index,
                    index,
                    len: layer.len(),
                });
            }
        }
    }
    Ok(())
}

/// Returns a copy of `program` with `block_id` moved to `location` as a
/// cluster root. Callers normally check [`is_no_op_move`] first.
pub fn move_block_to_new_location_as_cluster_root(
    program: &Program,
    block_id: &BlockId,
    location: InsertionLocation,
) -> Result<Program, EditError> {
    let mut draft = program.clone().edit();
    draft.move_block_to_new_location_as_cluster_root(block_id, location)?;
    Ok(draft.finish())
}

/// True when dropping `block_id` at `location` would put it back where it
/// already is: its own slot or the slot right after it.
pub fn is_no_op_move(layers: &[Vec<BlockId>], block_id: &BlockId, location: InsertionLocation) -> bool {
    let InsertionLocation::BetweenClustersWithinLayer { layer_index, index } = location else {
        return false;
    };
    layers
        .get(layer_index)
        .and_then(|layer| layer.iter().position(|id| id == block_id))
        .is_some_and(|current| index == current || index == current + 1)
}
