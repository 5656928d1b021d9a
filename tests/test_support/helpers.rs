use super::TestResult;
use simple_fs::SPath;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

pub fn new_out_dir_path(prefix: &str) -> TestResult<SPath> {
	let now_ms = SystemTime::now().duration_since(UNIX_EPOCH)?.as_millis();
	let dir = PathBuf::from("tests/.out").join(format!("{prefix}_{now_ms}"));
	std::fs::create_dir_all(&dir)?;
	let dir = SPath::try_from(dir)?;

	Ok(dir)
}

/// Writes `content` at `rel_path` under `base_dir`, creating parent dirs.
pub fn write_file(base_dir: &SPath, rel_path: &str, content: &str) -> TestResult<SPath> {
	let path = base_dir.join(rel_path);
	if let Some(parent) = path.std_path().parent() {
		std::fs::create_dir_all(parent)?;
	}
	std::fs::write(path.std_path(), content)?;

	Ok(path)
}
