use crate::error::{RenamerError, Result};
use crate::pattern::{CompiledMatcher, WildcardPattern};
use crate::rename::plan::{PlannedRename, RenameInstruction, plan_renames};
use serde::Deserialize;
use std::collections::HashSet;
use std::fmt;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// What to do when a generated name is already taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConflictPolicy {
	/// Leave the source file alone and report an error.
	#[default]
	Skip,

	/// Rename anyway, replacing whatever the platform rename replaces.
	Overwrite,
}

impl ConflictPolicy {
	pub fn as_str(&self) -> &'static str {
		match self {
			ConflictPolicy::Skip => "skip",
			ConflictPolicy::Overwrite => "overwrite",
		}
	}
}

impl fmt::Display for ConflictPolicy {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for ConflictPolicy {
	type Err = String;

	fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
		match s.to_lowercase().as_str() {
			"skip" => Ok(ConflictPolicy::Skip),
			"overwrite" => Ok(ConflictPolicy::Overwrite),
			_ => Err(format!("Unknown conflict policy: {s} (expected 'skip' or 'overwrite')")),
		}
	}
}

/// Settings for one rename run.
#[derive(Debug, Clone)]
pub struct RenameOptions {
	/// Folder whose entries are renamed.
	pub folder: PathBuf,

	/// Pattern the current filenames must match.
	pub from: String,

	/// Pattern the new filenames are generated from.
	pub to: String,

	/// Report what would happen without touching the filesystem.
	pub dry_run: bool,

	/// How to handle targets that already exist.
	pub on_conflict: ConflictPolicy,
}

impl RenameOptions {
	pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
		RenameOptions {
			folder: PathBuf::from("."),
			from: from.into(),
			to: to.into(),
			dry_run: false,
			on_conflict: ConflictPolicy::default(),
		}
	}
}

/// Counts reported at the end of a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenameSummary {
	/// Files renamed, or that would be renamed in a dry run.
	pub processed: usize,

	/// Matched files for which no new name could be generated.
	pub warnings: usize,

	/// Files whose rename failed or was refused.
	pub errors: usize,

	/// Matched files whose new name equals the old one.
	pub unchanged: usize,
}

/// Batch renamer for a single folder.
#[derive(Debug)]
pub struct Renamer {
	options: RenameOptions,
	matcher: CompiledMatcher,
	new_pattern: WildcardPattern,
}

impl Renamer {
	/// Compile the old pattern. Fails before any file is touched.
	pub fn new(options: RenameOptions) -> Result<Self> {
		let matcher = CompiledMatcher::compile(&options.from)?;
		let new_pattern = WildcardPattern::parse(&options.to);

		Ok(Renamer {
			options,
			matcher,
			new_pattern,
		})
	}

	pub fn options(&self) -> &RenameOptions {
		&self.options
	}

	/// List the folder and plan renames for every matching file.
	pub fn plan(&self) -> Result<Vec<PlannedRename>> {
		let files = list_files(&self.options.folder)?;
		log::debug!(
			"{} files in '{}'",
			files.len(),
			self.options.folder.display()
		);
		Ok(plan_renames(&files, &self.matcher, &self.new_pattern))
	}

	/// Run the batch, writing progress lines to `out`.
	///
	/// Per-file problems are reported and skipped; only pattern, folder
	/// and output failures abort the run.
	pub fn execute<W: Write>(&self, out: &mut W) -> Result<RenameSummary> {
		let planned = self.plan()?;
		let mut summary = RenameSummary::default();
		let mut batch = BatchTargets::default();

		for entry in planned {
			match entry {
				PlannedRename::Rename(instruction) => {
					match self.apply(&instruction, &mut batch) {
						Ok(()) => {
							let verb = if self.options.dry_run {
								"Would rename"
							} else {
								"Renamed"
							};
							emit(
								out,
								format_args!(
									"{}: {} -> {}",
									verb, instruction.source, instruction.target
								),
							)?;
							summary.processed += 1;
						}
						Err(e) => {
							log::debug!("rename of '{}' failed: {:?}", instruction.source, e);
							emit(
								out,
								format_args!(
									"Error renaming '{}' to '{}': {}",
									instruction.source, instruction.target, e
								),
							)?;
							summary.errors += 1;
						}
					}
				}
				PlannedRename::Unchanged(source) => {
					emit(out, format_args!("Skipping '{}': name unchanged", source))?;
					summary.unchanged += 1;
				}
				PlannedRename::Skipped { source, error } => {
					emit(
						out,
						format_args!("Warning: cannot generate new name for '{}': {}", source, error),
					)?;
					summary.warnings += 1;
				}
			}
		}

		if summary.processed == 0 {
			emit(
				out,
				format_args!(
					"No files matching pattern '{}' found in '{}'",
					self.options.from,
					self.options.folder.display()
				),
			)?;
		} else {
			let action = if self.options.dry_run {
				"would be renamed"
			} else {
				"renamed"
			};
			emit(
				out,
				format_args!("\nTotal: {} files {}", summary.processed, action),
			)?;
		}

		Ok(summary)
	}

	/// Perform (or, in a dry run, simulate) one rename.
	fn apply(&self, instruction: &RenameInstruction, batch: &mut BatchTargets) -> Result<()> {
		let from = self.options.folder.join(&instruction.source);
		let to = self.options.folder.join(&instruction.target);

		if self.options.on_conflict == ConflictPolicy::Skip
			&& batch.is_taken(&instruction.target, &to)
		{
			return Err(RenamerError::TargetExists { target: to });
		}

		if !self.options.dry_run {
			std::fs::rename(&from, &to).map_err(|source| RenamerError::RenameFailed {
				from: from.clone(),
				to: to.clone(),
				source,
			})?;
		}

		batch.record(instruction);
		Ok(())
	}
}

/// Names claimed and vacated so far in the current batch.
///
/// Dry runs never touch the disk, so this is what keeps their conflict
/// reports identical to a real run.
#[derive(Debug, Default)]
struct BatchTargets {
	claimed: HashSet<String>,
	vacated: HashSet<String>,
}

impl BatchTargets {
	fn is_taken(&self, target: &str, target_path: &Path) -> bool {
		if self.claimed.contains(target) {
			return true;
		}
		let on_disk = std::fs::symlink_metadata(target_path).is_ok();
		on_disk && !self.vacated.contains(target)
	}

	fn record(&mut self, instruction: &RenameInstruction) {
		self.vacated.remove(&instruction.target);
		self.claimed.insert(instruction.target.clone());
		self.vacated.insert(instruction.source.clone());
		self.claimed.remove(&instruction.source);
	}
}

/// List the names of the non-directory entries in `folder`, sorted.
///
/// Names that are not valid UTF-8 cannot be matched against a pattern and
/// are left out.
pub fn list_files(folder: &Path) -> Result<Vec<String>> {
	let unreadable = |source| RenamerError::DirectoryUnreadable {
		path: folder.to_path_buf(),
		source,
	};

	let mut names = Vec::new();
	for entry in std::fs::read_dir(folder).map_err(unreadable)? {
		let entry = entry.map_err(unreadable)?;

		match entry.file_type() {
			Ok(file_type) if file_type.is_dir() => continue,
			Ok(_) => {}
			Err(e) => {
				log::debug!("skipping '{}': {}", entry.path().display(), e);
				continue;
			}
		}

		match entry.file_name().into_string() {
			Ok(name) => names.push(name),
			Err(raw) => log::debug!("skipping non UTF-8 filename {:?}", raw),
		}
	}

	names.sort();
	Ok(names)
}

fn emit<W: Write>(out: &mut W, line: fmt::Arguments<'_>) -> Result<()> {
	writeln!(out, "{}", line).map_err(|source| RenamerError::OutputFailed { source })
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::fs;

	fn touch(dir: &Path, names: &[&str]) {
		for name in names {
			fs::write(dir.join(name), name).unwrap();
		}
	}

	fn run(options: RenameOptions) -> (RenameSummary, String) {
		let renamer = Renamer::new(options).unwrap();
		let mut out = Vec::new();
		let summary = renamer.execute(&mut out).unwrap();
		(summary, String::from_utf8(out).unwrap())
	}

	fn options(dir: &Path, from: &str, to: &str) -> RenameOptions {
		RenameOptions {
			folder: dir.to_path_buf(),
			..RenameOptions::new(from, to)
		}
	}

	#[test]
	fn test_conflict_policy_from_str() {
		assert_eq!(ConflictPolicy::from_str("skip").unwrap(), ConflictPolicy::Skip);
		assert_eq!(
			ConflictPolicy::from_str("Overwrite").unwrap(),
			ConflictPolicy::Overwrite
		);
		assert!(ConflictPolicy::from_str("merge").is_err());
		assert_eq!(ConflictPolicy::default(), ConflictPolicy::Skip);
		assert_eq!(ConflictPolicy::Overwrite.to_string(), "overwrite");
	}

	#[test]
	fn test_list_files_sorted_without_dirs() {
		let temp_dir = tempfile::tempdir().unwrap();
		touch(temp_dir.path(), &["b.txt", "a.txt"]);
		fs::create_dir(temp_dir.path().join("a_dir.txt")).unwrap();

		let files = list_files(temp_dir.path()).unwrap();
		assert_eq!(files, vec!["a.txt", "b.txt"]);
	}

	#[test]
	fn test_list_files_missing_folder() {
		let temp_dir = tempfile::tempdir().unwrap();
		let missing = temp_dir.path().join("missing");

		match list_files(&missing).unwrap_err() {
			RenamerError::DirectoryUnreadable { path, .. } => assert_eq!(path, missing),
			other => panic!("Expected DirectoryUnreadable error, got {other:?}"),
		}
	}

	#[test]
	fn test_missing_folder_is_fatal() {
		let temp_dir = tempfile::tempdir().unwrap();
		let renamer = Renamer::new(options(&temp_dir.path().join("missing"), "a_*", "b_*")).unwrap();

		let mut out = Vec::new();
		let result = renamer.execute(&mut out);
		assert!(matches!(result, Err(RenamerError::DirectoryUnreadable { .. })));
		assert!(out.is_empty());
	}

	#[test]
	fn test_dry_run_reports_without_renaming() {
		let temp_dir = tempfile::tempdir().unwrap();
		touch(temp_dir.path(), &["a_1.txt", "a_2.txt", "b.txt"]);

		let (summary, output) = run(RenameOptions {
			dry_run: true,
			..options(temp_dir.path(), "a_*.txt", "z_*.txt")
		});

		assert_eq!(summary.processed, 2);
		assert_eq!(
			output,
			"Would rename: a_1.txt -> z_1.txt\n\
			 Would rename: a_2.txt -> z_2.txt\n\
			 \n\
			 Total: 2 files would be renamed\n"
		);
		assert_eq!(
			list_files(temp_dir.path()).unwrap(),
			vec!["a_1.txt", "a_2.txt", "b.txt"]
		);
	}

	#[test]
	fn test_execute_renames_files() {
		let temp_dir = tempfile::tempdir().unwrap();
		touch(temp_dir.path(), &["img_1.jpg", "img_2.jpg", "notes.txt"]);

		let (summary, output) = run(options(temp_dir.path(), "img_*.jpg", "photo_*.jpg"));

		assert_eq!(summary.processed, 2);
		assert!(output.contains("Renamed: img_1.jpg -> photo_1.jpg"));
		assert!(output.ends_with("\nTotal: 2 files renamed\n"));
		assert_eq!(
			list_files(temp_dir.path()).unwrap(),
			vec!["notes.txt", "photo_1.jpg", "photo_2.jpg"]
		);
		assert_eq!(
			fs::read_to_string(temp_dir.path().join("photo_1.jpg")).unwrap(),
			"img_1.jpg"
		);
	}

	#[test]
	fn test_zero_matches() {
		let temp_dir = tempfile::tempdir().unwrap();
		touch(temp_dir.path(), &["b.txt"]);

		let (summary, output) = run(options(temp_dir.path(), "a_*.txt", "z_*.txt"));

		assert_eq!(summary, RenameSummary::default());
		assert!(output.starts_with("No files matching pattern 'a_*.txt' found in '"));
		assert!(!output.contains("Total"));
	}

	#[test]
	fn test_mismatch_is_warning_and_batch_continues() {
		let temp_dir = tempfile::tempdir().unwrap();
		touch(temp_dir.path(), &["a_1_b_2"]);

		let (summary, output) = run(options(temp_dir.path(), "a_*_b_*", "x_*"));

		assert_eq!(summary.warnings, 1);
		assert_eq!(summary.processed, 0);
		assert!(output.contains(
			"Warning: cannot generate new name for 'a_1_b_2': pattern mismatch: \
			 old pattern has 2 wildcards but new pattern has 1"
		));
		assert!(temp_dir.path().join("a_1_b_2").exists());
	}

	#[test]
	fn test_unchanged_names_are_not_counted() {
		let temp_dir = tempfile::tempdir().unwrap();
		touch(temp_dir.path(), &["keep_1.txt"]);

		let (summary, output) = run(options(temp_dir.path(), "keep_*.txt", "keep_*.txt"));

		assert_eq!(summary.unchanged, 1);
		assert_eq!(summary.processed, 0);
		assert!(output.contains("Skipping 'keep_1.txt': name unchanged"));
	}

	#[test]
	fn test_skip_policy_refuses_existing_target() {
		let temp_dir = tempfile::tempdir().unwrap();
		touch(temp_dir.path(), &["a_1.txt", "a_2.txt", "z_1.txt"]);

		let (summary, output) = run(options(temp_dir.path(), "a_*.txt", "z_*.txt"));

		assert_eq!(summary.processed, 1);
		assert_eq!(summary.errors, 1);
		assert!(output.contains("Error renaming 'a_1.txt' to 'z_1.txt': target already exists"));
		assert!(output.contains("Renamed: a_2.txt -> z_2.txt"));
		assert_eq!(
			fs::read_to_string(temp_dir.path().join("z_1.txt")).unwrap(),
			"z_1.txt"
		);
	}

	#[test]
	fn test_skip_policy_refuses_batch_duplicates() {
		// Greedy splitting maps both names onto "a_b_c".
		for dry_run in [true, false] {
			let temp_dir = tempfile::tempdir().unwrap();
			touch(temp_dir.path(), &["a.b_c", "a_b.c"]);

			let (summary, output) = run(RenameOptions {
				dry_run,
				..options(temp_dir.path(), "*.*", "*_*")
			});

			assert_eq!(summary.processed, 1, "{output}");
			assert_eq!(summary.errors, 1, "{output}");
			assert!(output.contains("a.b_c -> a_b_c"));
			assert!(output.contains("Error renaming 'a_b.c' to 'a_b_c': target already exists"));
		}
	}

	#[test]
	fn test_vacated_names_can_be_reused() {
		// f_1 -> 1 frees "f_1" for f_f_1 -> f_1.
		for dry_run in [true, false] {
			let temp_dir = tempfile::tempdir().unwrap();
			touch(temp_dir.path(), &["f_1", "f_f_1"]);

			let (summary, output) = run(RenameOptions {
				dry_run,
				..options(temp_dir.path(), "f_*", "*")
			});
			assert_eq!(summary.processed, 2, "{output}");
			assert_eq!(summary.errors, 0, "{output}");
		}
	}

	#[test]
	fn test_overwrite_policy_replaces_target() {
		let temp_dir = tempfile::tempdir().unwrap();
		touch(temp_dir.path(), &["a_1.txt", "z_1.txt"]);

		let (summary, _) = run(RenameOptions {
			on_conflict: ConflictPolicy::Overwrite,
			..options(temp_dir.path(), "a_*.txt", "z_*.txt")
		});

		assert_eq!(summary.processed, 1);
		assert_eq!(list_files(temp_dir.path()).unwrap(), vec!["z_1.txt"]);
		assert_eq!(
			fs::read_to_string(temp_dir.path().join("z_1.txt")).unwrap(),
			"a_1.txt"
		);
	}
}
