//! file-renamer - batch-rename files in a folder with `*` wildcard patterns.
//!
//! This library provides the core functionality, including:
//! - Compiling wildcard patterns and capturing wildcard text
//! - Generating new names from a replacement pattern
//! - Planning and applying renames for one folder
//! - Config file discovery and named presets
//!
//! # Example
//!
//! ```no_run
//! use renamer_cli::rename::{RenameOptions, Renamer};
//!
//! let options = RenameOptions {
//!     dry_run: true,
//!     ..RenameOptions::new("img_*.jpg", "photo_*.jpg")
//! };
//! let renamer = Renamer::new(options).unwrap();
//! let summary = renamer.execute(&mut std::io::stdout()).unwrap();
//! println!("{} files would be renamed", summary.processed);
//! ```

pub mod config;
pub mod error;
pub mod logging;
pub mod pattern;
pub mod rename;

pub use error::{RenamerError, Result};
