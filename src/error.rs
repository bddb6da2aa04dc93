use std::fmt;

use thiserror::Error;

use crate::ir::BlockId;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError<K: fmt::Debug + fmt::Display> {
    #[error("dependency cycle through `{node}`")]
    Cycle { node: K },
}

/// A structural invariant of a `Program` that does not hold.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProgramError {
    #[error("block `{block}` depends on unknown block `{dependency}`")]
    UnknownDependency { block: BlockId, dependency: BlockId },
    #[error("layer {layer_index} lists unknown block `{block}`")]
    UnknownLayerEntry { layer_index: usize, block: BlockId },
    #[error("layer {layer_index} lists nested block `{block}`")]
    NestedLayerEntry { layer_index: usize, block: BlockId },
    #[error("cluster root `{block}` appears in more than one layer slot")]
    DuplicateLayerEntry { block: BlockId },
    #[error("cluster root `{block}` is not in any layer")]
    UnlayeredClusterRoot { block: BlockId },
    #[error("layer {layer_index} is empty")]
    EmptyLayer { layer_index: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayoutError {
    #[error("unknown block `{0}`")]
    UnknownBlock(BlockId),
    #[error("nested dependencies of `{0}` form a cycle")]
    CyclicDependency(BlockId),
    #[error("layer entry `{0}` is not a cluster root")]
    NotAClusterRoot(BlockId),
    #[error("no layout for block `{0}`")]
    MissingLayout(BlockId),
    #[error("block `{block}` has no dependency at index {index}")]
    NoSuchDependency { block: BlockId, index: usize },
}

impl From<GraphError<BlockId>> for LayoutError {
    fn from(err: GraphError<BlockId>) -> Self {
        match err {
            GraphError::Cycle { node } => LayoutError::CyclicDependency(node),
        }
    }
}

/// Rejected edits; the program is left untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditError {
    #[error("unknown block `{0}`")]
    UnknownBlock(BlockId),
    #[error("layer index {layer_index} out of range for {layer_count} layers")]
    LayerOutOfRange {
        layer_index: usize,
        layer_count: usize,
    },
    #[error("index {index} out of range for layer {layer_index} with {len} clusters")]
    IndexOutOfRange {
        layer_index: usize,
        index: usize,
        len: usize,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DropError {
    #[error(transparent)]
    Layout(#[from] LayoutError),
    #[error(transparent)]
    Edit(#[from] EditError),
}
