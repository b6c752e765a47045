use std::{
    collections::BTreeMap,
    path::{Component, Path, PathBuf},
};

/// Reserved manifest key holding the engine version.
pub const VERSION_KEY: &str = "cefVersion";

/// Per-platform list of bundled files plus the engine version they belong to.
///
/// The manifest is a properties file; every key except [`VERSION_KEY`] maps
/// a logical name to a `/`-separated path, used both as the resource path
/// inside the bundle and as the destination relative to the install
/// directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Manifest {
    version: String,
    files: BTreeMap<String, String>,
}

impl Manifest {
    pub fn parse(text: &str) -> Result<Self, ManifestError> {
        let mut entries = parse_properties(text)?;
        let version = entries
            .remove(VERSION_KEY)
            .ok_or(ManifestError::MissingVersion)?;
        validate_version(&version)?;

        for (name, path) in &entries {
            validate_entry_path(name, path)?;
        }

        Ok(Self {
            version,
            files: entries,
        })
    }

    /// Decodes manifest bytes as ISO-8859-1, the properties file encoding.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ManifestError> {
        let text: String = bytes.iter().map(|&byte| byte as char).collect();
        Self::parse(&text)
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    /// Logical name and relative path of every file to extract.
    pub fn files(&self) -> impl Iterator<Item = (&str, &str)> {
        self.files
            .iter()
            .map(|(name, path)| (name.as_str(), path.as_str()))
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

/// Converts a validated `/`-separated manifest path to a relative path.
pub(crate) fn relative_path(path: &str) -> PathBuf {
    path.split('/').filter(|part| !part.is_empty()).collect()
}

fn validate_version(version: &str) -> Result<(), ManifestError> {
    let invalid = version.is_empty()
        || version == "."
        || version == ".."
        || version.contains(['/', '\\'])
        || Path::new(version).is_absolute();
    if invalid {
        return Err(ManifestError::InvalidVersion(version.to_string()));
    }
    Ok(())
}

fn validate_entry_path(name: &str, path: &str) -> Result<(), ManifestError> {
    let invalid_entry = || ManifestError::InvalidEntryPath {
        name: name.to_string(),
        path: path.to_string(),
    };

    if path.starts_with('/') || path.contains('\\') {
        return Err(invalid_entry());
    }
    let relative = relative_path(path);
    if relative.as_os_str().is_empty() {
        return Err(invalid_entry());
    }
    let only_normal = relative
        .components()
        .all(|component| matches!(component, Component::Normal(_)));
    if !only_normal {
        return Err(invalid_entry());
    }
    Ok(())
}

/// Parses properties text. Later duplicates of a key win.
pub(crate) fn parse_properties(text: &str) -> Result<BTreeMap<String, String>, ManifestError> {
    let mut entries = BTreeMap::new();
    for (line_number, line) in logical_lines(text) {
        let (key, value) = split_key_value(&line);
        let key = unescape(key, line_number)?;
        let value = unescape(value, line_number)?;
        entries.insert(key, value);
    }
    Ok(entries)
}

fn is_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\x0c')
}

/// Joins continued lines and drops comments and blank lines. Yields the
/// 1-based number of the line each logical line starts on.
fn logical_lines(text: &str) -> Vec<(usize, String)> {
    let normalized = text.replace("\r\n", "\n").replace('\r', "\n");
    let mut lines = Vec::new();
    let mut current: Option<(usize, String)> = None;

    for (index, natural) in normalized.split('\n').enumerate() {
        let trimmed = natural.trim_start_matches(is_whitespace);
        let (start, mut logical) = match current.take() {
            Some(continued) => continued,
            None => {
                if trimmed.is_empty() || trimmed.starts_with(['#', '!']) {
                    continue;
                }
                (index + 1, String::new())
            }
        };

        let trailing_backslashes = trimmed.chars().rev().take_while(|&c| c == '\\').count();
        if trailing_backslashes % 2 == 1 {
            logical.push_str(&trimmed[..trimmed.len() - 1]);
            current = Some((start, logical));
        } else {
            logical.push_str(trimmed);
            lines.push((start, logical));
        }
    }
    if let Some(unterminated) = current {
        lines.push(unterminated);
    }

    lines
}

fn split_key_value(line: &str) -> (&str, &str) {
    let mut escaped = false;
    let mut key_end = line.len();
    for (index, c) in line.char_indices() {
        if escaped {
            escaped = false;
        } else if c == '\\' {
            escaped = true;
        } else if c == '=' || c == ':' || is_whitespace(c) {
            key_end = index;
            break;
        }
    }

    let key = &line[..key_end];
    let rest = line[key_end..].trim_start_matches(is_whitespace);
    let rest = rest
        .strip_prefix(['=', ':'])
        .map(|rest| rest.trim_start_matches(is_whitespace))
        .unwrap_or(rest);
    (key, rest)
}

fn unescape(raw: &str, line: usize) -> Result<String, ManifestError> {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('t') => out.push('\t'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('f') => out.push('\x0c'),
            Some('u') => {
                let hex: String = chars.by_ref().take(4).collect();
                let decoded = (hex.len() == 4)
                    .then(|| u32::from_str_radix(&hex, 16).ok())
                    .flatten()
                    .and_then(char::from_u32)
                    .ok_or(ManifestError::InvalidEscape { line })?;
                out.push(decoded);
            }
            Some(other) => out.push(other),
            None => {}
        }
    }
    Ok(out)
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ManifestError {
    #[error("Manifest has no \"cefVersion\" entry")]
    MissingVersion,

    #[error("Manifest version \"{0}\" is not a valid directory name")]
    InvalidVersion(String),

    #[error("Manifest entry \"{name}\" has invalid path \"{path}\"")]
    InvalidEntryPath { name: String, path: String },

    #[error("Malformed \\uXXXX escape on line {line}")]
    InvalidEscape { line: usize },
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::{parse_properties, relative_path, Manifest, ManifestError};

    const LINUX_MANIFEST: &str = "\
# generated by the natives build
cefVersion=3.3029.1619
libcef=linux-x86_64/libcef.so
helper = linux-x86_64/swtcef_helper
locale_en : linux-x86_64/locales/en-US.pak
icudtl linux-x86_64/icudtl.dat
";

    #[test]
    fn parses_version_and_files() {
        let manifest = Manifest::parse(LINUX_MANIFEST).unwrap();

        assert_eq!(manifest.version(), "3.3029.1619");
        assert_eq!(manifest.len(), 4);
        let files: Vec<_> = manifest.files().collect();
        assert_eq!(
            files,
            vec![
                ("helper", "linux-x86_64/swtcef_helper"),
                ("icudtl", "linux-x86_64/icudtl.dat"),
                ("libcef", "linux-x86_64/libcef.so"),
                ("locale_en", "linux-x86_64/locales/en-US.pak"),
            ]
        );
    }

    #[test]
    fn version_entry_is_required() {
        let result = Manifest::parse("libcef=linux-x86_64/libcef.so\n");
        assert_eq!(result, Err(ManifestError::MissingVersion));
    }

    #[test]
    fn version_must_be_a_single_directory_name() {
        for version in ["", "..", "3/4", "..\\up"] {
            let result = Manifest::parse(&format!("cefVersion={version}\n"));
            assert!(
                matches!(result, Err(ManifestError::InvalidVersion(_))),
                "accepted version {version:?}"
            );
        }
    }

    #[test]
    fn entries_escaping_the_install_dir_are_rejected() {
        for path in ["../evil.so", "/etc/passwd", "linux/../../evil", "dir\\file", ""] {
            let text = format!("cefVersion=1\nlib={path}\n");
            assert!(
                matches!(
                    Manifest::parse(&text),
                    Err(ManifestError::InvalidEntryPath { .. })
                ),
                "accepted path {path:?}"
            );
        }
    }

    #[test]
    fn continuation_lines_and_escapes() {
        let entries = parse_properties(
            "long = first\\\n       second\r\nspaced\\ key=a\\tb\n! comment \\\nunicode=\\u0041\\=\n",
        )
        .unwrap();

        assert_eq!(entries["long"], "firstsecond");
        assert_eq!(entries["spaced key"], "a\tb");
        assert_eq!(entries["unicode"], "A=");
        assert_eq!(entries.len(), 3);
    }

    #[test]
    fn malformed_unicode_escape_reports_line() {
        let result = parse_properties("cefVersion=1\n\nbad=\\u12\n");
        assert_eq!(result, Err(ManifestError::InvalidEscape { line: 3 }));
    }

    #[test]
    fn latin1_bytes_decode_to_chars() {
        let manifest = Manifest::from_bytes(b"cefVersion=1\nname=dir/caf\xe9.pak\n").unwrap();
        assert_eq!(manifest.files().next(), Some(("name", "dir/café.pak")));
    }

    #[test]
    fn relative_path_splits_on_slashes() {
        assert_eq!(
            relative_path("linux-x86_64/locales/en-US.pak"),
            ["linux-x86_64", "locales", "en-US.pak"]
                .iter()
                .collect::<PathBuf>()
        );
    }
}
