//! Batch renaming for a single folder.
//!
//! This module handles:
//! - Planning renames for a list of filenames
//! - Applying (or previewing) them with per-file error isolation

pub mod apply;
pub mod plan;

pub use apply::{ConflictPolicy, RenameOptions, RenameSummary, Renamer, list_files};
pub use plan::{PlannedRename, RenameInstruction, plan_rename, plan_renames};
