//! First-run extraction of the bundled engine natives into a per-user,
//! version-scoped cache directory.

mod error;
mod expander;
mod manifest;
mod permissions;
mod platform;
mod resources;

pub use error::ExpandError;
pub use expander::{default_cache_root, Installation, NativeExpander, CACHE_DIR_NAME};
pub use manifest::{Manifest, ManifestError, VERSION_KEY};
pub use permissions::make_executable;
pub use platform::PlatformKey;
pub use resources::{open_bundle, ArchiveBundle, DirectoryBundle, ResourceBundle};
