use std::{io, path::Path};

/// Marks `path` as executable (`rwxr-xr-x`).
#[cfg(unix)]
pub fn make_executable(path: &Path) -> io::Result<()> {
    use std::{fs, os::unix::fs::PermissionsExt};

    let mut permissions = fs::metadata(path)?.permissions();
    permissions.set_mode(0o755);
    fs::set_permissions(path, permissions)
}

/// No executable bit to set.
#[cfg(not(unix))]
pub fn make_executable(_path: &Path) -> io::Result<()> {
    Ok(())
}
