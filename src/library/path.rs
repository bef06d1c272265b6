//! Library-relative paths

use crate::error::{Error, Result};
use std::fmt;

/// A validated path relative to the library root.
///
/// Empty means the root itself. Segments are joined with `/`; `\` is accepted
/// as a separator on input. `.` and `..` segments are rejected so a request
/// can never address anything outside the root folder.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LibraryPath {
    segments: Vec<String>,
}

impl LibraryPath {
    /// The library root
    pub fn root() -> Self {
        Self::default()
    }

    /// Parse a user-supplied relative path (e.g. the `path` query parameter)
    ///
    /// ```
    /// use cinesphere::library::LibraryPath;
    ///
    /// let path = LibraryPath::parse("/Series/Alien Earth/").unwrap();
    /// assert_eq!(path.as_string(), "Series/Alien Earth");
    /// assert!(LibraryPath::parse("Series/../..").is_err());
    /// ```
    pub fn parse(raw: &str) -> Result<Self> {
        let mut segments = Vec::new();

        for segment in raw.split(['/', '\\']) {
            match segment {
                s if s.trim().is_empty() => continue,
                "." | ".." => return Err(Error::InvalidPath(raw.to_string())),
                s if s.chars().any(char::is_control) => {
                    return Err(Error::InvalidPath(raw.to_string()));
                }
                s => segments.push(s.to_string()),
            }
        }

        Ok(Self { segments })
    }

    /// Whether this is the library root
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Append a child segment (a drive item name)
    #[must_use]
    pub fn child(&self, name: &str) -> Self {
        let mut segments = self.segments.clone();
        segments.push(name.to_string());
        Self { segments }
    }

    /// The relative path as `a/b/c` (empty for the root)
    pub fn as_string(&self) -> String {
        self.segments.join("/")
    }

    /// The full drive path: `root` for the library root, `root/relative` otherwise
    pub fn full_path(&self, root: &str) -> String {
        if self.is_root() {
            root.to_string()
        } else {
            format!("{}/{}", root, self.as_string())
        }
    }
}

impl fmt::Display for LibraryPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_string())
    }
}
