//! Layout engine for block-based dataflow programs.
//!
//! A [`Program`] is a set of typed blocks plus an ordered list of layers of
//! cluster roots. [`calculate_program_layout`] turns it into absolute block
//! geometry and line connections; [`calculate_insertion_location`] and
//! [`move_block_to_new_location_as_cluster_root`] drive drag-and-drop
//! reorganization.

#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod drag;
pub mod edit;
pub mod error;
pub mod ir;
pub mod layout;
pub mod layout_dump;

#[cfg(feature = "cli")]
pub use cli::run;
pub use config::{Config, LayoutConfig, load_config};
pub use drag::{apply_drop, cluster_root_of, dragged_block_ids};
pub use edit::{ProgramDraft, is_no_op_move, move_block_to_new_location_as_cluster_root};
pub use error::{DropError, EditError, GraphError, LayoutError, ProgramError};
pub use ir::{Block, BlockId, BlockKind, InsertionLocation, Program};
pub use layout::{
    BlockLayout, LineConnectionLayout, Point, ProgramLayout, Size, calculate_insertion_location,
    calculate_program_layout, insertion_guide, nested_block_owners,
};
