//! Tests for multi-file patch-set parsing and application.

use bundlepatch::{Error, apply_patch_set, parse_patch_set};
use simple_fs::read_to_string;

mod test_support;

type Result<T> = core::result::Result<T, Box<dyn std::error::Error>>; // For tests.

#[test]
fn test_diff_apply_round_trip() -> Result<()> {
	// -- Setup & Fixtures
	let base_dir = test_support::new_out_dir_path("diff_round_trip")?;
	let original = "line 1\nline 2\nline 3\n";
	let modified = "line 1\nline two\nline 3\nline 4\n";
	test_support::write_file(&base_dir, "notes.txt", original)?;

	let patch_text = diffy::create_patch(original, modified)
		.to_string()
		.replace("--- original", "--- notes.txt")
		.replace("+++ modified", "+++ notes.txt");

	// -- Exec
	let patch_set = parse_patch_set(&patch_text)?;
	apply_patch_set(&base_dir, &patch_set)?;

	// -- Check
	let content = read_to_string(&base_dir.join("notes.txt"))?;
	assert_eq!(content, modified);

	Ok(())
}

#[test]
fn test_diff_apply_rename() -> Result<()> {
	// -- Setup & Fixtures
	let base_dir = test_support::new_out_dir_path("diff_rename")?;
	test_support::write_file(&base_dir, "old.txt", "alpha\n")?;

	let patch_text = "--- old.txt\n+++ new.txt\n@@ -1,1 +1,1 @@\n-alpha\n+beta\n";

	// -- Exec
	let patch_set = parse_patch_set(patch_text)?;
	apply_patch_set(&base_dir, &patch_set)?;

	// -- Check
	assert!(!base_dir.join("old.txt").exists(), "old file should be gone after rename");
	let content = read_to_string(&base_dir.join("new.txt"))?;
	assert_eq!(content, "beta\n");

	Ok(())
}

#[test]
fn test_diff_apply_failed_hunk_keeps_old_file() -> Result<()> {
	// -- Setup & Fixtures
	// The file content does not match the hunk context, so the apply must
	// fail and the rename must not have happened.
	let base_dir = test_support::new_out_dir_path("diff_failed_hunk")?;
	test_support::write_file(&base_dir, "old.txt", "something else entirely\n")?;

	let patch_text = "--- old.txt\n+++ new.txt\n@@ -1,1 +1,1 @@\n-alpha\n+beta\n";

	// -- Exec
	let patch_set = parse_patch_set(patch_text)?;
	let res = apply_patch_set(&base_dir, &patch_set);

	// -- Check
	match res {
		Err(Error::HunkApplyFailed(file)) => assert_eq!(file, "old.txt"),
		other => panic!("Expected HunkApplyFailed, got: {other:?}"),
	}
	assert!(base_dir.join("old.txt").exists(), "old file must survive a failed apply");
	assert!(!base_dir.join("new.txt").exists());

	Ok(())
}

#[test]
fn test_diff_apply_multi_file_set() -> Result<()> {
	// -- Setup & Fixtures
	let base_dir = test_support::new_out_dir_path("diff_multi_file")?;
	test_support::write_file(&base_dir, "a.txt", "one\ntwo\n")?;
	test_support::write_file(&base_dir, "sub/b.txt", "red\nblue\n")?;

	let patch_text = concat!(
		"--- a.txt\n+++ a.txt\n@@ -1,2 +1,2 @@\n one\n-two\n+TWO\n",
		"--- sub/b.txt\n+++ sub/b.txt\n@@ -1,2 +1,2 @@\n-red\n+green\n blue\n",
	);

	// -- Exec
	let patch_set = parse_patch_set(patch_text)?;
	apply_patch_set(&base_dir, &patch_set)?;

	// -- Check
	assert_eq!(patch_set.len(), 2);
	assert_eq!(read_to_string(&base_dir.join("a.txt"))?, "one\nTWO\n");
	assert_eq!(read_to_string(&base_dir.join("sub/b.txt"))?, "green\nblue\n");

	Ok(())
}

#[test]
fn test_diff_parse_strips_git_prefixes() -> Result<()> {
	// -- Setup & Fixtures
	let patch_text = "diff --git a/file.txt b/file.txt\n--- a/file.txt\n+++ b/file.txt\n@@ -1,1 +1,1 @@\n-x\n+y\n";

	// -- Exec
	let patch_set = parse_patch_set(patch_text)?;

	// -- Check
	assert_eq!(patch_set.len(), 1);
	assert_eq!(patch_set[0].old_file, "file.txt");
	assert_eq!(patch_set[0].new_file, "file.txt");

	Ok(())
}

#[test]
fn test_diff_parse_rejects_empty_set() -> Result<()> {
	// -- Exec
	let res = parse_patch_set("not a patch at all\n");

	// -- Check
	assert!(res.is_err(), "Expected an error for an input with no file sections");

	Ok(())
}
