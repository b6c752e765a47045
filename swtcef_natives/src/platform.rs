use std::fmt;

/// OS and CPU architecture pair selecting a native bundle.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PlatformKey {
    os: String,
    arch: String,
}

impl PlatformKey {
    pub fn new(os: impl Into<String>, arch: impl Into<String>) -> Self {
        Self {
            os: os.into(),
            arch: arch.into(),
        }
    }

    /// Key of the host this binary was built for.
    pub fn detect() -> Self {
        Self::new(
            normalize_os(std::env::consts::OS),
            normalize_arch(std::env::consts::ARCH),
        )
    }

    pub fn os(&self) -> &str {
        &self.os
    }

    pub fn arch(&self) -> &str {
        &self.arch
    }

    pub fn bundle_folder(&self) -> String {
        format!("{}-{}", self.os, self.arch)
    }

    /// Resource path of the file manifest for this bundle.
    pub fn manifest_path(&self) -> String {
        format!("{}/files.properties", self.bundle_folder())
    }
}

impl fmt::Display for PlatformKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.os, self.arch)
    }
}

fn normalize_os(os: &str) -> &str {
    match os {
        "macos" => "osx",
        other => other,
    }
}

fn normalize_arch(arch: &str) -> &str {
    match arch {
        "x86" => "x86_32",
        "aarch64" => "aarch_64",
        "arm" => "arm_32",
        "powerpc64" => "ppc_64",
        "s390x" => "s390_64",
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::{normalize_arch, normalize_os, PlatformKey};

    #[test]
    fn bundle_folder_joins_os_and_arch() {
        let key = PlatformKey::new("linux", "x86_64");

        assert_eq!(key.bundle_folder(), "linux-x86_64");
        assert_eq!(key.manifest_path(), "linux-x86_64/files.properties");
        assert_eq!(key.to_string(), key.bundle_folder());
    }

    #[test]
    fn host_names_are_normalized() {
        assert_eq!(normalize_os("macos"), "osx");
        assert_eq!(normalize_os("windows"), "windows");
        assert_eq!(normalize_arch("aarch64"), "aarch_64");
        assert_eq!(normalize_arch("x86"), "x86_32");
        assert_eq!(normalize_arch("x86_64"), "x86_64");
    }

    #[test]
    fn detection_is_deterministic() {
        assert_eq!(PlatformKey::detect(), PlatformKey::detect());
    }
}
