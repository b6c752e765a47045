use std::{
    ffi::OsStr,
    fs::{self, File},
    io::{self, BufWriter, Write},
    path::{Path, PathBuf},
    time::{Duration, SystemTime},
};

use tracing::{debug, info, warn};

use crate::{
    error::ExpandError,
    manifest::{relative_path, Manifest},
    permissions::make_executable,
    platform::PlatformKey,
    resources::ResourceBundle,
};

/// Name of the per-user cache directory under the home directory.
pub const CACHE_DIR_NAME: &str = ".swtcef";

#[cfg(not(target_os = "windows"))]
const DEFAULT_HELPER_EXECUTABLE: &str = "swtcef_helper";
#[cfg(target_os = "windows")]
const DEFAULT_HELPER_EXECUTABLE: &str = "swtcef_helper.exe";

/// Staging directories untouched for this long belong to a dead extraction.
const DEFAULT_STALE_STAGING_AGE: Duration = Duration::from_secs(60 * 60);

/// `<user-home>/.swtcef`
pub fn default_cache_root() -> Result<PathBuf, ExpandError> {
    dirs::home_dir()
        .map(|home| home.join(CACHE_DIR_NAME))
        .ok_or(ExpandError::NoHomeDirectory)
}

/// Natives of one engine version, committed to the cache.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Installation {
    pub version: String,
    /// `<cache-root>/<version>`
    pub install_dir: PathBuf,
    /// `<install-dir>/<bundle-folder>`, the directory holding the engine
    /// shared library.
    pub library_dir: PathBuf,
}

/// Unpacks the native bundle of a platform into a version-scoped cache
/// directory, once per version.
pub struct NativeExpander<B: ResourceBundle> {
    bundle: B,
    cache_root: PathBuf,
    helper_executable: String,
    stale_staging_age: Duration,
}

impl<B: ResourceBundle> NativeExpander<B> {
    pub fn new(bundle: B, cache_root: impl Into<PathBuf>) -> Self {
        Self {
            bundle,
            cache_root: cache_root.into(),
            helper_executable: DEFAULT_HELPER_EXECUTABLE.to_string(),
            stale_staging_age: DEFAULT_STALE_STAGING_AGE,
        }
    }

    /// File name marked executable after extraction.
    pub fn with_helper_executable(mut self, name: impl Into<String>) -> Self {
        self.helper_executable = name.into();
        self
    }

    /// Minimum age before a leftover staging directory of the same version
    /// is removed.
    pub fn with_stale_staging_age(mut self, age: Duration) -> Self {
        self.stale_staging_age = age;
        self
    }

    pub fn cache_root(&self) -> &Path {
        &self.cache_root
    }

    pub fn expand(&self) -> Result<Installation, ExpandError> {
        self.expand_for(&PlatformKey::detect())
    }

    /// Returns the installation for `platform`, extracting it first if this
    /// version is not in the cache yet.
    ///
    /// An existing install directory is trusted as is. Fresh extractions are
    /// written to a staging directory and renamed into place, so a committed
    /// install directory is always complete.
    pub fn expand_for(&self, platform: &PlatformKey) -> Result<Installation, ExpandError> {
        let bundle_folder = platform.bundle_folder();
        info!(bundle_folder = %bundle_folder, "Resolving native bundle");

        let manifest = self.load_manifest(platform)?;
        let install_dir = self.cache_root.join(manifest.version());
        let installation = Installation {
            version: manifest.version().to_string(),
            library_dir: install_dir.join(&bundle_folder),
            install_dir,
        };

        if installation.install_dir.exists() {
            debug!(
                install_dir = %installation.install_dir.display(),
                "Natives already expanded"
            );
            return Ok(installation);
        }

        self.extract(&manifest, &installation)?;
        Ok(installation)
    }

    fn load_manifest(&self, platform: &PlatformKey) -> Result<Manifest, ExpandError> {
        let path = platform.manifest_path();
        let bytes = self
            .bundle
            .read_resource(&path)
            .map_err(|source| ExpandError::ReadResource {
                path: path.clone(),
                source,
            })?
            .ok_or_else(|| ExpandError::MissingManifest {
                path: format!("/{path}"),
            })?;

        Manifest::from_bytes(&bytes).map_err(|source| ExpandError::InvalidManifest {
            path: format!("/{path}"),
            source,
        })
    }

    fn extract(&self, manifest: &Manifest, installation: &Installation) -> Result<(), ExpandError> {
        fs::create_dir_all(&self.cache_root).map_err(|source| ExpandError::Write {
            path: self.cache_root.clone(),
            source,
        })?;

        let staging_prefix = format!(".{}-", manifest.version());
        self.remove_stale_staging(&staging_prefix);

        // Removed on drop, so a failed extraction leaves nothing behind.
        let staging = tempfile::Builder::new()
            .prefix(&staging_prefix)
            .tempdir_in(&self.cache_root)
            .map_err(|source| ExpandError::Write {
                path: self.cache_root.clone(),
                source,
            })?;
        debug!(staging = %staging.path().display(), "Extracting natives");

        for (name, path) in manifest.files() {
            let destination = staging.path().join(relative_path(path));
            let bytes = self.copy_file(path, &destination)?;
            debug!(name, path, bytes, "Extracted native file");
        }

        match fs::rename(staging.path(), &installation.install_dir) {
            Ok(()) => {
                info!(
                    install_dir = %installation.install_dir.display(),
                    files = manifest.len(),
                    "Expanded natives"
                );
                Ok(())
            }
            Err(_) if installation.install_dir.exists() => {
                info!(
                    install_dir = %installation.install_dir.display(),
                    "Natives were expanded by another process"
                );
                Ok(())
            }
            Err(source) => Err(ExpandError::Commit {
                path: installation.install_dir.clone(),
                source,
            }),
        }
    }

    /// Removes staging directories left by extractions that never finished,
    /// e.g. because the process was killed.
    fn remove_stale_staging(&self, prefix: &str) {
        let Ok(entries) = fs::read_dir(&self.cache_root) else {
            return;
        };
        let now = SystemTime::now();

        for entry in entries.flatten() {
            let is_staging = entry
                .file_name()
                .to_str()
                .is_some_and(|name| name.starts_with(prefix));
            let Ok(metadata) = entry.metadata() else {
                continue;
            };
            if !is_staging || !metadata.is_dir() {
                continue;
            }
            let stale = metadata
                .modified()
                .ok()
                .and_then(|modified| now.duration_since(modified).ok())
                .is_some_and(|age| age >= self.stale_staging_age);
            if !stale {
                continue;
            }

            let path = entry.path();
            match fs::remove_dir_all(&path) {
                Ok(()) => debug!(path = %path.display(), "Removed stale staging directory"),
                Err(err) => warn!(
                    path = %path.display(),
                    %err,
                    "Failed to remove stale staging directory"
                ),
            }
        }
    }

    fn copy_file(&self, resource: &str, destination: &Path) -> Result<u64, ExpandError> {
        let write_error = |source: io::Error| ExpandError::Write {
            path: destination.to_path_buf(),
            source,
        };

        if let Some(parent) = destination.parent() {
            fs::create_dir_all(parent).map_err(write_error)?;
        }
        let mut writer = BufWriter::new(File::create(destination).map_err(write_error)?);
        let bytes = self.stream_resource(resource, &mut writer, destination)?;
        writer.flush().map_err(write_error)?;
        drop(writer);

        if destination.file_name() == Some(OsStr::new(&self.helper_executable)) {
            if let Err(err) = make_executable(destination) {
                warn!(
                    path = %destination.display(),
                    %err,
                    "Failed to mark helper as executable"
                );
            }
        }

        Ok(bytes)
    }

    /// Copies one bundled resource into `writer`, telling failures of the
    /// bundle apart from failures of the destination.
    fn stream_resource(
        &self,
        resource: &str,
        writer: &mut dyn Write,
        destination: &Path,
    ) -> Result<u64, ExpandError> {
        let mut writer = WriteErrorTracker {
            inner: writer,
            error: None,
        };
        match self.bundle.copy_resource(resource, &mut writer) {
            Ok(Some(bytes)) => Ok(bytes),
            Ok(None) => Err(ExpandError::MissingBundledFile {
                path: resource.to_string(),
            }),
            Err(err) => match writer.error.take() {
                Some(source) => Err(ExpandError::Write {
                    path: destination.to_path_buf(),
                    source,
                }),
                None => Err(ExpandError::ReadResource {
                    path: resource.to_string(),
                    source: err,
                }),
            },
        }
    }
}

/// Keeps the first error returned by the wrapped writer. The bundle only sees
/// a copy of it.
struct WriteErrorTracker<'a> {
    inner: &'a mut dyn Write,
    error: Option<io::Error>,
}

impl WriteErrorTracker<'_> {
    fn track<T>(&mut self, result: io::Result<T>) -> io::Result<T> {
        result.map_err(|err| {
            if err.kind() == io::ErrorKind::Interrupted {
                return err;
            }
            let copy = io::Error::new(err.kind(), err.to_string());
            self.error.get_or_insert(err);
            copy
        })
    }
}

impl Write for WriteErrorTracker<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let result = self.inner.write(buf);
        self.track(result)
    }

    fn flush(&mut self) -> io::Result<()> {
        let result = self.inner.flush();
        self.track(result)
    }
}
