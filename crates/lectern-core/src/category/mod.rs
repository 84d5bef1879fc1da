// ── Category hierarchy ──

pub mod manager;
pub mod tree;

pub use manager::{CategoryManager, CategoryState};
pub use tree::{CategoryTree, ParentOption};
