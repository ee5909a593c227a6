//! Request line parsing and selector sanitization.
//!
//! Selectors are normalized lexically and never touch the filesystem. A
//! sanitized [`Selector`] has no empty, `.` or `..` segments, so joining it
//! onto the server root can only name the root or something beneath it.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::{GopherError, GopherResult};

/// A parsed request line: `<selector>[TAB<query>]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub selector: Selector,
    /// Search string after the first tab. Carried along but not used for
    /// file serving.
    pub query: Option<String>,
}

impl Request {
    /// Parses one request line. Trailing CR/LF is stripped.
    pub fn parse(line: &str) -> GopherResult<Self> {
        let line = line.trim_end_matches(['\r', '\n']);
        let (selector, query) = match line.split_once('\t') {
            Some((selector, query)) => (selector, Some(query.to_string())),
            None => (line, None),
        };

        Ok(Self {
            selector: Selector::sanitize(selector)?,
            query,
        })
    }

    /// Parses raw bytes read off the wire. Non UTF-8 input is malformed.
    pub fn from_bytes(line: &[u8]) -> GopherResult<Self> {
        let line = std::str::from_utf8(line).map_err(|_| GopherError::BadSelector)?;
        Self::parse(line)
    }
}

/// A sanitized selector, relative to the server root. The root itself is
/// the empty selector.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Selector(String);

impl Selector {
    pub fn root() -> Self {
        Self::default()
    }

    /// Normalizes `raw` lexically, resolving `.` and `..` and collapsing
    /// repeated separators.
    ///
    /// A leading separator anchors the path at the root, where `..` cannot
    /// climb any further (`/../etc` becomes `etc`). A relative path whose
    /// normalized form still starts with `..` is rejected, as is any input
    /// containing a NUL byte.
    pub fn sanitize(raw: &str) -> GopherResult<Self> {
        if raw.contains('\0') {
            return Err(GopherError::BadSelector);
        }

        let rooted = raw.starts_with(is_separator);
        let mut segments: Vec<&str> = Vec::new();

        for segment in raw.split(is_separator) {
            match segment {
                "" | "." => {}
                ".." => {
                    if segments.last().is_some_and(|last| *last != "..") {
                        segments.pop();
                    } else if !rooted {
                        segments.push("..");
                    }
                }
                segment => segments.push(segment),
            }
        }

        if segments.first() == Some(&"..") {
            return Err(GopherError::BadSelector);
        }

        Ok(Self(segments.join("/")))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('/').filter(|s| !s.is_empty())
    }

    /// The filesystem path this selector names under `root`.
    pub fn to_path(&self, root: &Path) -> PathBuf {
        let mut path = root.to_path_buf();
        for segment in self.segments() {
            path.push(segment);
        }
        path
    }

    /// Selector for an entry of this directory: `<self>/<name>`.
    pub fn child(&self, name: &str) -> String {
        format!("{}/{}", self.0, name)
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_root() {
            f.write_str("/")
        } else {
            f.write_str(&self.0)
        }
    }
}

fn is_separator(c: char) -> bool {
    c == '/' || (cfg!(windows) && c == '\\')
}
