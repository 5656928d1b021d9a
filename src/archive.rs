use crate::Result;
use simple_fs::SPath;

/// Capability over the application's packed archive format.
///
/// The patcher treats pack and unpack as an opaque external capability and
/// never reimplements the archive format itself. Embedders provide whatever
/// codec matches the target application (asar, tar, a plain directory copy
/// for tests).
pub trait ArchiveCodec {
	/// Extracts the full archive into `dest_dir`.
	fn extract_all(&self, archive: &SPath, dest_dir: &SPath) -> Result<()>;

	/// Packs `src_dir` back into `archive`.
	fn create_package(&self, src_dir: &SPath, archive: &SPath) -> Result<()>;
}
