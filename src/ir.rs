use std::borrow::Borrow;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ProgramError;
use crate::layout::graph::Graph;

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockId(String);

impl BlockId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for BlockId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for BlockId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl Borrow<str> for BlockId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum BlockKind {
    #[serde(rename = "IntegerLiteralBlock")]
    IntegerLiteral { value: i64 },
    #[serde(rename = "ReferenceBlock")]
    Reference { name: String },
    #[serde(rename = "FunctionCallBlock", rename_all = "camelCase")]
    FunctionCall {
        function_block_id: BlockId,
        argument_block_id: BlockId,
    },
    #[serde(rename = "ArrayBlock", rename_all = "camelCase")]
    Array { element_block_ids: Vec<BlockId> },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    #[serde(flatten)]
    pub kind: BlockKind,
    /// Drawn inside the shape of the block that depends on it rather than as
    /// a cluster root of its own.
    pub nested: bool,
}

impl Block {
    pub fn integer_literal(value: i64, nested: bool) -> Self {
        Self {
            kind: BlockKind::IntegerLiteral { value },
            nested,
        }
    }

    pub fn reference(name: impl Into<String>, nested: bool) -> Self {
        Self {
            kind: BlockKind::Reference { name: name.into() },
            nested,
        }
    }

    pub fn function_call(
        function_block_id: impl Into<BlockId>,
        argument_block_id: impl Into<BlockId>,
        nested: bool,
    ) -> Self {
        Self {
            kind: BlockKind::FunctionCall {
                function_block_id: function_block_id.into(),
                argument_block_id: argument_block_id.into(),
            },
            nested,
        }
    }

    pub fn array<I, T>(element_block_ids: I, nested: bool) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<BlockId>,
    {
        Self {
            kind: BlockKind::Array {
                element_block_ids: element_block_ids.into_iter().map(Into::into).collect(),
            },
            nested,
        }
    }

    /// Ids this block references, in layout order.
    pub fn dependencies(&self) -> Vec<&BlockId> {
        match &self.kind {
            BlockKind::IntegerLiteral { .. } | BlockKind::Reference { .. } => Vec::new(),
            BlockKind::FunctionCall {
                function_block_id,
                argument_block_id,
            } => vec![function_block_id, argument_block_id],
            BlockKind::Array { element_block_ids } => element_block_ids.iter().collect(),
        }
    }

    /// Text shown inside the block, if any.
    pub fn label(&self) -> Option<String> {
        match &self.kind {
            BlockKind::IntegerLiteral { value } => Some(value.to_string()),
            BlockKind::Reference { name } => Some(name.clone()),
            BlockKind::FunctionCall { .. } | BlockKind::Array { .. } => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Program {
    pub blocks: BTreeMap<BlockId, Block>,
    /// Cluster roots, one list per layer, top to bottom and left to right.
    pub layers: Vec<Vec<BlockId>>,
}

impl Program {
    pub fn new() -> Self {
        Self::default()
    }

    /// The fixed graph the editor opens with.
    pub fn demo() -> Self {
        let blocks = [
            ("block1", Block::integer_literal(10, false)),
            ("block2", Block::integer_literal(20, true)),
            ("block3", Block::integer_literal(30, true)),
            ("block4", Block::reference("plus", true)),
            (
                "block5",
                Block::array(["block1", "block1", "block2", "block3"], true),
            ),
            ("block6", Block::function_call("block4", "block5", false)),
            ("block7", Block::integer_literal(40, true)),
            ("block8", Block::reference("times", true)),
            (
                "block9",
                Block::array(["block6", "block14", "block7", "block1"], true),
            ),
            ("block10", Block::function_call("block8", "block9", false)),
            ("block11", Block::integer_literal(50, false)),
            ("block12", Block::function_call("block13", "block11", false)),
            ("block13", Block::reference("negative", true)),
            ("block14", Block::reference("foo", false)),
        ];
        let layers = vec![
            vec!["block1"],
            vec!["block6", "block14", "block11"],
            vec!["block10", "block12"],
        ];
        Self {
            blocks: blocks
                .into_iter()
                .map(|(id, block)| (BlockId::from(id), block))
                .collect(),
            layers: layers
                .into_iter()
                .map(|layer| layer.into_iter().map(BlockId::from).collect())
                .collect(),
        }
    }

    pub fn block(&self, id: &BlockId) -> Option<&Block> {
        self.blocks.get(id)
    }

    /// Every block mapped to all of its dependencies.
    pub fn dependency_graph(&self) -> Graph<BlockId> {
        self.blocks
            .iter()
            .map(|(id, block)| {
                (
                    id.clone(),
                    block.dependencies().into_iter().cloned().collect(),
                )
            })
            .collect()
    }

    /// Every block mapped to the dependencies drawn inside it. Unknown
    /// dependencies are left out.
    pub fn nested_dependency_graph(&self) -> Graph<BlockId> {
        self.blocks
            .iter()
            .map(|(id, block)| {
                let nested = block
                    .dependencies()
                    .into_iter()
                    .filter(|dependency| self.blocks.get(*dependency).is_some_and(|b| b.nested))
                    .cloned()
                    .collect();
                (id.clone(), nested)
            })
            .collect()
    }

    /// Position of a cluster root within `layers`.
    pub fn layer_position(&self, id: &BlockId) -> Option<(usize, usize)> {
        self.layers.iter().enumerate().find_map(|(layer_index, layer)| {
            layer
                .iter()
                .position(|entry| entry == id)
                .map(|index| (layer_index, index))
        })
    }

    /// Checks dependency existence and the layer invariants, reporting the
    /// first violation found.
    pub fn validate(&self) -> Result<(), ProgramError> {
        for (id, block) in &self.blocks {
            for dependency in block.dependencies() {
                if !self.blocks.contains_key(dependency) {
                    return Err(ProgramError::UnknownDependency {
                        block: id.clone(),
                        dependency: dependency.clone(),
                    });
                }
            }
        }

        let mut layered: BTreeSet<&BlockId> = BTreeSet::new();
        for (layer_index, layer) in self.layers.iter().enumerate() {
            if layer.is_empty() {
                return Err(ProgramError::EmptyLayer { layer_index });
            }
            for id in layer {
                let Some(block) = self.blocks.get(id) else {
                    return Err(ProgramError::UnknownLayerEntry {
                        layer_index,
                        block: id.clone(),
                    });
                };
                if block.nested {
                    return Err(ProgramError::NestedLayerEntry {
                        layer_index,
                        block: id.clone(),
                    });
                }
                if !layered.insert(id) {
                    return Err(ProgramError::DuplicateLayerEntry { block: id.clone() });
                }
            }
        }

        if let Some((id, _)) = self
            .blocks
            .iter()
            .find(|(id, block)| !block.nested && !layered.contains(id))
        {
            return Err(ProgramError::UnlayeredClusterRoot { block: id.clone() });
        }
        Ok(())
    }
}

/// Where a dragged block lands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum InsertionLocation {
    /// A new layer inserted before `layer_index` (or after the last one).
    #[serde(rename_all = "camelCase")]
    BetweenLayers { layer_index: usize },
    /// Inside layer `layer_index`, before the cluster at `index`.
    #[serde(rename_all = "camelCase")]
    BetweenClustersWithinLayer { layer_index: usize, index: usize },
}

impl InsertionLocation {
    pub fn layer_index(&self) -> usize {
        match *self {
            InsertionLocation::BetweenLayers { layer_index }
            | InsertionLocation::BetweenClustersWithinLayer { layer_index, .. } => layer_index,
        }
    }
}
