//! Where a document comes from.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;

static URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(https?|ftp)://[^\s/$.?#].[^\s]*$").expect("valid URL regex"));

/// `http`, `https` or `ftp` with a host.
pub fn is_url(input: &str) -> bool {
    URL.is_match(input)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentSource {
    Remote(String),
    Local(PathBuf),
}

impl DocumentSource {
    pub fn parse(input: &str) -> Self {
        if is_url(input) {
            Self::Remote(input.to_string())
        } else {
            Self::Local(PathBuf::from(input))
        }
    }

    /// A `dependencies` entry that names another document rather than a
    /// package: a URL or an absolute path.
    pub fn from_dependency(entry: &str) -> Option<Self> {
        if is_url(entry) || Path::new(entry).is_absolute() {
            Some(Self::parse(entry))
        } else {
            None
        }
    }

    /// Identity used for the visited set.
    pub fn key(&self) -> String {
        match self {
            Self::Remote(url) => url.clone(),
            Self::Local(path) => path.to_string_lossy().into_owned(),
        }
    }
}

impl fmt::Display for DocumentSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Remote(url) => f.write_str(url),
            Self::Local(path) => write!(f, "{}", path.display()),
        }
    }
}
