use std::{
  fs,
  io,
  path::PathBuf,
};

use hyperdoc_index::IndexError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, SourceError>;

#[derive(Debug, Error)]
pub enum SourceError {
  #[error("could not read resource '{name}'")]
  Read {
    name:   String,
    #[source]
    source: io::Error,
  },

  #[error(transparent)]
  Index(#[from] IndexError),
}

/// Where help content comes from.
///
/// The help system itself never touches the filesystem directly; hosts
/// provide a source that can enumerate index files and read resources by
/// their forward-slash relative name.
pub trait IndexSource {
  /// All help index files visible to this source, as relative paths.
  fn find_indexes(&self) -> Vec<String>;

  /// Read a resource by relative path.
  fn read_resource(&self, name: &str) -> io::Result<String>;
}

/// Read a resource and normalize its line endings to `\n`.
pub fn read_normalized(source: &dyn IndexSource, name: &str) -> Result<String> {
  let text = source.read_resource(name).map_err(|source| SourceError::Read {
    name: name.to_string(),
    source,
  })?;
  Ok(text.replace("\r\n", "\n").replace('\r', "\n"))
}

/// An [`IndexSource`] backed by directories on disk.
///
/// Each root is scanned recursively for files named `index_name`; resource
/// names are resolved against the roots in order, first hit wins.
#[derive(Debug, Clone)]
pub struct DirectorySource {
  roots:      Vec<PathBuf>,
  index_name: String,
}

impl DirectorySource {
  pub const DEFAULT_INDEX_NAME: &'static str = "hyperdoc.json";

  pub fn new(roots: Vec<PathBuf>) -> Self {
    Self {
      roots,
      index_name: Self::DEFAULT_INDEX_NAME.to_string(),
    }
  }

  pub fn with_index_name(mut self, name: impl Into<String>) -> Self {
    self.index_name = name.into();
    self
  }

  fn scan_dir(&self, dir: &PathBuf, prefix: &str, found: &mut Vec<String>) {
    let entries = match fs::read_dir(dir) {
      Ok(entries) => entries,
      Err(err) => {
        log::warn!("skipping unreadable directory {}: {err}", dir.display());
        return;
      },
    };

    for entry in entries.flatten() {
      let name = entry.file_name();
      let Some(name) = name.to_str() else { continue };
      let rel = if prefix.is_empty() {
        name.to_string()
      } else {
        format!("{prefix}/{name}")
      };

      let path = entry.path();
      if path.is_dir() {
        self.scan_dir(&path, &rel, found);
      } else if name == self.index_name {
        found.push(rel);
      }
    }
  }
}

impl IndexSource for DirectorySource {
  fn find_indexes(&self) -> Vec<String> {
    let mut found = Vec::new();
    for root in &self.roots {
      self.scan_dir(root, "", &mut found);
    }
    found.sort();
    found.dedup();
    found
  }

  fn read_resource(&self, name: &str) -> io::Result<String> {
    let mut last_err = io::Error::new(io::ErrorKind::NotFound, "no source roots");
    for root in &self.roots {
      match fs::read_to_string(root.join(name)) {
        Ok(text) => return Ok(text),
        Err(err) => last_err = err,
      }
    }
    Err(last_err)
  }
}
