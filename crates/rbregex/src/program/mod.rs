// Compiled pattern program: node arena, metadata and capture table.

mod capture_table;
mod node;

pub use capture_table::CaptureTable;
pub use node::{AssertKind, LookKind, Node, NodeId, Program, ProgramMeta};
