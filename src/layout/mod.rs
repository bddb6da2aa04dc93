//! Program layout: block sizes bottom-up per cluster, cluster roots packed
//! into layers, absolute positions pushed top-down, and a line connection
//! for every dependency that is not nested.

use std::collections::{BTreeMap, BTreeSet};

use tracing::{debug, trace};

use crate::config::LayoutConfig;
use crate::error::LayoutError;
use crate::ir::{BlockId, Program};

mod block;
pub mod graph;
mod insertion;
mod intervals;
mod types;

pub use block::{BlockGeometry, calculate_block_geometry};
pub use insertion::{calculate_insertion_location, insertion_guide};
pub use intervals::layout_intervals_in_series;
pub use types::*;

use graph::{Graph, checked_descendants_topologically_sorted, find_roots};

impl ProgramLayout {
    pub fn block_layout(&self, id: &BlockId) -> Result<&BlockLayout, LayoutError> {
        self.block_layouts
            .get(id)
            .ok_or_else(|| LayoutError::MissingLayout(id.clone()))
    }
}

pub fn calculate_program_layout(
    program: &Program,
    config: &LayoutConfig,
) -> Result<ProgramLayout, LayoutError> {
    let geometries = calculate_cluster_geometries(program, config)?;
    let placement = Placement {
        program,
        geometries: &geometries,
        owners: nested_block_owners(program)?,
        nested_graph: program.nested_dependency_graph(),
        config,
    };

    let mut rows: Vec<(Vec<f32>, Vec<Interval>)> = Vec::with_capacity(program.layers.len());
    let mut layer_heights = Vec::with_capacity(program.layers.len());
    let mut width = 0.0f32;
    for layer in &program.layers {
        let mut widths = Vec::with_capacity(layer.len());
        let mut heights = Vec::with_capacity(layer.len());
        for id in layer {
            let size = cluster_root_size(program, &geometries, id)?;
            widths.push(size.width);
            heights.push(size.height);
        }
        let series = layout_intervals_in_series(&widths, config.cluster_gap, None, true);
        width = width.max(series.total_size);
        layer_heights.push(heights.iter().copied().fold(0.0f32, f32::max));
        rows.push((heights, series.intervals));
    }
    let layer_series = layout_intervals_in_series(&layer_heights, config.layer_gap, None, true);

    let mut top_lefts: BTreeMap<BlockId, Point> = BTreeMap::new();
    let mut line_connection_layouts = Vec::new();
    for ((layer, (heights, intervals)), layer_interval) in program
        .layers
        .iter()
        .zip(&rows)
        .zip(&layer_series.intervals)
    {
        for ((id, height), interval) in layer.iter().zip(heights).zip(intervals) {
            let top_left = Point::new(interval.left, layer_interval.center - height / 2.0);
            placement.place_cluster(id, top_left, &mut top_lefts, &mut line_connection_layouts)?;
        }
    }

    let block_layouts: BTreeMap<BlockId, BlockLayout> = top_lefts
        .into_iter()
        .filter_map(|(id, top_left)| {
            let size = geometries.get(&id)?.size;
            Some((id, BlockLayout::from_top_left(top_left, size)))
        })
        .collect();

    debug!(
        blocks = program.blocks.len(),
        placed = block_layouts.len(),
        layers = program.layers.len(),
        lines = line_connection_layouts.len(),
        "program layout computed"
    );

    Ok(ProgramLayout {
        block_layouts,
        line_connection_layouts,
        layer_intervals: layer_series.intervals,
        width,
        height: layer_series.total_size,
    })
}

/// Sizes and dependency offsets for every block reachable from a cluster
/// root, computed dependencies first.
fn calculate_cluster_geometries(
    program: &Program,
    config: &LayoutConfig,
) -> Result<BTreeMap<BlockId, BlockGeometry>, LayoutError> {
    let nested_graph = program.nested_dependency_graph();
    let cluster_roots = find_roots(&nested_graph);
    let mut geometries: BTreeMap<BlockId, BlockGeometry> = BTreeMap::new();

    for root in &cluster_roots {
        let ordered = checked_descendants_topologically_sorted(&nested_graph, root)?;
        trace!(root = %root, blocks = ordered.len(), "sizing cluster");
        for id in ordered {
            if geometries.contains_key(&id) {
                continue;
            }
            let block = program
                .blocks
                .get(&id)
                .ok_or_else(|| LayoutError::UnknownBlock(id.clone()))?;
            let dependency_sizes = block
                .dependencies()
                .into_iter()
                .map(|dependency| {
                    let dependency_block = program
                        .blocks
                        .get(dependency)
                        .ok_or_else(|| LayoutError::UnknownBlock(dependency.clone()))?;
                    if !dependency_block.nested {
                        return Ok(config.placeholder_size);
                    }
                    geometries
                        .get(dependency)
                        .map(|geometry| geometry.size)
                        .ok_or_else(|| LayoutError::MissingLayout(dependency.clone()))
                })
                .collect::<Result<Vec<_>, _>>()?;
            let geometry = calculate_block_geometry(block, &dependency_sizes, config);
            geometries.insert(id, geometry);
        }
    }
    Ok(geometries)
}

fn cluster_root_size(
    program: &Program,
    geometries: &BTreeMap<BlockId, BlockGeometry>,
    id: &BlockId,
) -> Result<Size, LayoutError> {
    let block = program
        .blocks
        .get(id)
        .ok_or_else(|| LayoutError::UnknownBlock(id.clone()))?;
    if block.nested {
        return Err(LayoutError::NotAClusterRoot(id.clone()));
    }
    geometries
        .get(id)
        .map(|geometry| geometry.size)
        .ok_or_else(|| LayoutError::MissingLayout(id.clone()))
}

/// The dependent that draws each nested block, with the dependency slot the
/// block fills in it.
///
/// Clusters are walked in layer order and a block shared between clusters
/// stays with the first cluster that reaches it. Within a cluster, blocks are
/// visited top-down (reversed depth-first post-order) and a shared block goes
/// to the dependent visited last, which is the one the depth-first walk from
/// the root finished first. A dependent listing the block twice keeps the
/// later slot.
pub fn nested_block_owners(
    program: &Program,
) -> Result<BTreeMap<BlockId, (BlockId, usize)>, LayoutError> {
    let nested_graph = program.nested_dependency_graph();
    let mut owners = BTreeMap::new();
    let mut claimed: BTreeSet<BlockId> = BTreeSet::new();

    for root in program.layers.iter().flatten() {
        let order = top_down_order(&nested_graph, root)?;
        let mut cluster_owners = BTreeMap::new();
        for id in &order {
            if claimed.contains(id) {
                continue;
            }
            let block = program
                .blocks
                .get(id)
                .ok_or_else(|| LayoutError::UnknownBlock(id.clone()))?;
            for (index, dependency) in block.dependencies().into_iter().enumerate() {
                let nested = program
                    .blocks
                    .get(dependency)
                    .ok_or_else(|| LayoutError::UnknownBlock(dependency.clone()))?
                    .nested;
                if nested && !claimed.contains(dependency) {
                    cluster_owners.insert(dependency.clone(), (id.clone(), index));
                }
            }
        }
        claimed.extend(order);
        owners.extend(cluster_owners);
    }
    Ok(owners)
}

fn top_down_order(nested_graph: &Graph<BlockId>, root: &BlockId) -> Result<Vec<BlockId>, LayoutError> {
    let mut order = checked_descendants_topologically_sorted(nested_graph, root)?;
    order.reverse();
    Ok(order)
}

struct Placement<'a> {
    program: &'a Program,
    geometries: &'a BTreeMap<BlockId, BlockGeometry>,
    owners: BTreeMap<BlockId, (BlockId, usize)>,
    nested_graph: Graph<BlockId>,
    config: &'a LayoutConfig,
}

impl Placement<'_> {
    fn offset_in(&self, owner: &BlockId, index: usize) -> Result<Point, LayoutError> {
        self.geometries
            .get(owner)
            .ok_or_else(|| LayoutError::MissingLayout(owner.clone()))?
            .dependencies_offsets
            .get(index)
            .copied()
            .ok_or_else(|| LayoutError::NoSuchDependency {
                block: owner.clone(),
                index,
            })
    }

    /// Positions a cluster root and everything nested in it, each nested
    /// block inside the dependent [`nested_block_owners`] assigns it to.
    /// Blocks already placed by an earlier cluster are left where they are.
    fn place_cluster(
        &self,
        root: &BlockId,
        root_top_left: Point,
        top_lefts: &mut BTreeMap<BlockId, Point>,
        line_connection_layouts: &mut Vec<LineConnectionLayout>,
    ) -> Result<(), LayoutError> {
        let stub_center = Point::new(
            self.config.placeholder_size.width / 2.0,
            self.config.placeholder_size.height / 2.0,
        );

        for id in top_down_order(&self.nested_graph, root)? {
            if top_lefts.contains_key(&id) {
                continue;
            }
            let top_left = if id == *root {
                root_top_left
            } else {
                let (owner, index) = self
                    .owners
                    .get(&id)
                    .ok_or_else(|| LayoutError::MissingLayout(id.clone()))?;
                let owner_top_left = top_lefts
                    .get(owner)
                    .copied()
                    .ok_or_else(|| LayoutError::MissingLayout(owner.clone()))?;
                owner_top_left.offset_by(self.offset_in(owner, *index)?)
            };
            top_lefts.insert(id.clone(), top_left);

            let block = self
                .program
                .blocks
                .get(&id)
                .ok_or_else(|| LayoutError::UnknownBlock(id.clone()))?;
            for (index, dependency) in block.dependencies().into_iter().enumerate() {
                let nested = self
                    .program
                    .blocks
                    .get(dependency)
                    .ok_or_else(|| LayoutError::UnknownBlock(dependency.clone()))?
                    .nested;
                if !nested {
                    line_connection_layouts.push(LineConnectionLayout {
                        dependency_block_id: dependency.clone(),
                        dependent_block_id: id.clone(),
                        endpoint: top_left
                            .offset_by(self.offset_in(&id, index)?)
                            .offset_by(stub_center),
                    });
                }
            }
        }
        Ok(())
    }
}
