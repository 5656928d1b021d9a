use crate::{Error, Result};
use diffy::Patch;
use simple_fs::{SPath, ensure_file_dir, read_to_string};
use std::fs;

/// One file's worth of a unified diff: its header names plus the parsed hunks.
/// `old_file != new_file` signals a rename.
pub struct FilePatch<'a> {
	pub old_file: String,
	pub new_file: String,
	pub patch: Patch<'a, str>,
}

/// Splits a (possibly multi-file) unified diff into per-file patches, in the
/// order they appear in the input.
///
/// A file section starts at a `--- ` header immediately followed by a `+++ `
/// header; preamble lines between sections (`diff --git`, `Index:`) are
/// dropped. Header names keep whatever the patch wrote, minus a leading
/// `a/` or `b/` strip prefix.
pub fn parse_patch_set(input: &str) -> Result<Vec<FilePatch<'_>>> {
	// -- Find the byte offset of each file section header pair
	let mut starts: Vec<usize> = Vec::new();
	let mut offset = 0;
	let mut lines = input.split_inclusive('\n').peekable();
	while let Some(line) = lines.next() {
		if line.starts_with("--- ")
			&& lines.peek().is_some_and(|next| next.starts_with("+++ "))
		{
			starts.push(offset);
		}
		offset += line.len();
	}

	if starts.is_empty() {
		return Err(Error::custom("no file sections found in patch set"));
	}

	// -- Parse each section
	let mut patches = Vec::with_capacity(starts.len());
	for (i, &start) in starts.iter().enumerate() {
		let end = starts.get(i + 1).copied().unwrap_or(input.len());
		let chunk = trim_section(&input[start..end]);
		let patch = Patch::from_str(chunk)?;

		let old_file = header_file_name(patch.original())?;
		let new_file = header_file_name(patch.modified())?;

		patches.push(FilePatch {
			old_file,
			new_file,
			patch,
		});
	}

	Ok(patches)
}

/// Applies each file patch of `patch_set` under `base_dir`, in order.
///
/// Failure is fatal per invocation: the first failing file aborts the run and
/// earlier files' writes stay in place. There is no rollback; recovering a
/// half-patched tree is the caller's backup's job.
pub fn apply_patch_set(base_dir: &SPath, patch_set: &[FilePatch<'_>]) -> Result<()> {
	for file_patch in patch_set {
		apply_file_patch(base_dir, file_patch)?;
	}
	Ok(())
}

fn apply_file_patch(base_dir: &SPath, file_patch: &FilePatch<'_>) -> Result<()> {
	let old_path = base_dir.join(&file_patch.old_file);
	let source = read_to_string(&old_path)?;

	// A context mismatch (file drifted, or already patched) surfaces as
	// HunkApplyFailed naming the file the patch was written against.
	let patched = diffy::apply(&source, &file_patch.patch)
		.map_err(|_| Error::HunkApplyFailed(file_patch.old_file.clone()))?;

	let new_path = base_dir.join(&file_patch.new_file);
	ensure_file_dir(&new_path)?;
	fs::write(new_path.std_path(), patched)?;

	// Rename semantics. The old file goes away only after the new content is
	// written, so a failed apply never loses the original.
	if file_patch.old_file != file_patch.new_file {
		fs::remove_file(old_path.std_path())?;
	}

	Ok(())
}

// region:    --- Support

fn header_file_name(name: Option<&str>) -> Result<String> {
	let name = name.ok_or_else(|| Error::custom("patch section has no file name header"))?;
	let name = name.strip_prefix("a/").or_else(|| name.strip_prefix("b/")).unwrap_or(name);
	Ok(name.to_string())
}

/// Drops trailing preamble lines that belong to the next file section.
fn trim_section(chunk: &str) -> &str {
	let mut end = chunk.len();
	for line in chunk.split_inclusive('\n').rev() {
		if line.starts_with("diff ") || line.starts_with("Index: ") {
			end -= line.len();
		} else {
			break;
		}
	}
	&chunk[..end]
}

// endregion: --- Support
