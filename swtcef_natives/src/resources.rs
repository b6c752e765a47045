use std::{
    fs::File,
    io::{self, Write},
    path::{Path, PathBuf},
    sync::Mutex,
};

use zip::{result::ZipError, ZipArchive};

use crate::manifest::relative_path;

/// Read-only set of bundled resources addressed by `/`-separated paths.
/// A leading `/` is ignored.
pub trait ResourceBundle {
    /// Streams the resource into `writer`. `Ok(None)` means there is no
    /// such resource.
    fn copy_resource(&self, path: &str, writer: &mut dyn Write) -> io::Result<Option<u64>>;

    fn read_resource(&self, path: &str) -> io::Result<Option<Vec<u8>>> {
        let mut buffer = Vec::new();
        Ok(self.copy_resource(path, &mut buffer)?.map(|_| buffer))
    }
}

impl<B: ResourceBundle + ?Sized> ResourceBundle for &B {
    fn copy_resource(&self, path: &str, writer: &mut dyn Write) -> io::Result<Option<u64>> {
        (**self).copy_resource(path, writer)
    }
}

impl<B: ResourceBundle + ?Sized> ResourceBundle for Box<B> {
    fn copy_resource(&self, path: &str, writer: &mut dyn Write) -> io::Result<Option<u64>> {
        (**self).copy_resource(path, writer)
    }
}

/// Resources laid out as plain files under a root directory.
#[derive(Debug, Clone)]
pub struct DirectoryBundle {
    root: PathBuf,
}

impl DirectoryBundle {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl ResourceBundle for DirectoryBundle {
    fn copy_resource(&self, path: &str, writer: &mut dyn Write) -> io::Result<Option<u64>> {
        let path = self.root.join(relative_path(path));
        let mut file = match File::open(&path) {
            Ok(file) => file,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err),
        };
        if file.metadata()?.is_dir() {
            return Ok(None);
        }
        io::copy(&mut file, writer).map(Some)
    }
}

/// Resources packed into a zip archive.
pub struct ArchiveBundle {
    path: PathBuf,
    archive: Mutex<ZipArchive<File>>,
}

impl ArchiveBundle {
    pub fn open(path: impl Into<PathBuf>) -> io::Result<Self> {
        let path = path.into();
        let archive = ZipArchive::new(File::open(&path)?).map_err(zip_to_io)?;
        Ok(Self {
            path,
            archive: Mutex::new(archive),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ResourceBundle for ArchiveBundle {
    fn copy_resource(&self, path: &str, writer: &mut dyn Write) -> io::Result<Option<u64>> {
        let name = path.trim_start_matches('/');
        let mut archive = self
            .archive
            .lock()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "resource archive lock poisoned"))?;
        let mut entry = match archive.by_name(name) {
            Ok(entry) => entry,
            Err(ZipError::FileNotFound) => return Ok(None),
            Err(err) => return Err(zip_to_io(err)),
        };
        if entry.is_dir() {
            return Ok(None);
        }
        io::copy(&mut entry, writer).map(Some)
    }
}

fn zip_to_io(err: ZipError) -> io::Error {
    match err {
        ZipError::Io(err) => err,
        err => io::Error::new(io::ErrorKind::InvalidData, err),
    }
}

/// Opens a resource bundle: a directory as [`DirectoryBundle`], any other
/// file as [`ArchiveBundle`].
pub fn open_bundle(path: &Path) -> io::Result<Box<dyn ResourceBundle>> {
    if path.is_dir() {
        Ok(Box::new(DirectoryBundle::new(path)))
    } else {
        Ok(Box::new(ArchiveBundle::open(path)?))
    }
}

#[cfg(test)]
mod tests {
    use std::{
        fs::{self, File},
        io::Write,
    };

    use zip::{write::FileOptions, ZipWriter};

    use super::{open_bundle, ArchiveBundle, DirectoryBundle, ResourceBundle};

    #[test]
    fn directory_bundle_streams_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("linux-x86_64")).unwrap();
        fs::write(dir.path().join("linux-x86_64/libcef.so"), b"\x7fELF").unwrap();
        let bundle = DirectoryBundle::new(dir.path());

        let mut out = Vec::new();
        let copied = bundle
            .copy_resource("/linux-x86_64/libcef.so", &mut out)
            .unwrap();

        assert_eq!(copied, Some(4));
        assert_eq!(out, b"\x7fELF");
        assert_eq!(bundle.read_resource("linux-x86_64/missing.so").unwrap(), None);
        assert_eq!(bundle.read_resource("linux-x86_64").unwrap(), None);
    }

    #[test]
    fn archive_bundle_reads_entries() {
        let dir = tempfile::tempdir().unwrap();
        let archive_path = dir.path().join("natives.jar");
        let mut writer = ZipWriter::new(File::create(&archive_path).unwrap());
        writer
            .start_file("osx-x86_64/files.properties", FileOptions::default())
            .unwrap();
        writer.write_all(b"cefVersion=1\n").unwrap();
        writer.finish().unwrap();

        let bundle = ArchiveBundle::open(&archive_path).unwrap();

        assert_eq!(
            bundle.read_resource("/osx-x86_64/files.properties").unwrap(),
            Some(b"cefVersion=1\n".to_vec())
        );
        assert_eq!(bundle.read_resource("osx-x86_64/libcef.dylib").unwrap(), None);
    }

    #[test]
    fn open_bundle_picks_implementation_by_path_kind() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("hello.txt"), b"hi").unwrap();

        let bundle = open_bundle(dir.path()).unwrap();
        assert_eq!(bundle.read_resource("hello.txt").unwrap(), Some(b"hi".to_vec()));

        let not_an_archive = dir.path().join("hello.txt");
        assert!(open_bundle(&not_an_archive).is_err());
    }
}
