// region:    --- Modules

mod archive;
mod diff_patch;
mod error;
mod matcher;
mod patcher;
mod rules;
mod text_patch;

pub use archive::*;
pub use diff_patch::*;
pub use error::*;
pub use matcher::*;
pub use patcher::*;
pub use rules::*;
pub use text_patch::*;

// endregion: --- Modules
