use std::collections::{
  BTreeSet,
  HashMap,
};

use hyperdoc_index::{
  HelpIndex,
  paths,
};

use crate::source::{
  IndexSource,
  Result,
  read_normalized,
};

/// How a package-name collision between two index files is settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ConflictOutcome {
  KeepExisting,
  UseNew,
  Broken,
}

/// An index file is canonical for its package when it lives under a
/// top-level directory named after the package.
fn is_canonical(index: &HelpIndex) -> bool {
  paths::first_component(&index.index_file) == index.package
}

fn resolve_conflict(existing: &HelpIndex, new: &HelpIndex) -> ConflictOutcome {
  match (is_canonical(existing), is_canonical(new)) {
    (true, false) => ConflictOutcome::KeepExisting,
    (false, true) => ConflictOutcome::UseNew,
    // Neither index has a stronger claim; the later scan wins so authors
    // see their most recently added copy.
    (false, false) => ConflictOutcome::UseNew,
    // Two canonical indexes for one package is unresolvable.
    (true, true) => ConflictOutcome::Broken,
  }
}

/// The set of loaded help indexes, keyed by package name.
///
/// Loading is lazy: nothing is scanned until [`HelpRegistry::ensure_loaded`]
/// runs, and [`HelpRegistry::invalidate`] arms the next access to rescan.
#[derive(Debug, Default)]
pub struct HelpRegistry {
  indexes: HashMap<String, HelpIndex>,
  loaded:  bool,
}

impl HelpRegistry {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn get(&self, package: &str) -> Option<&HelpIndex> {
    self.indexes.get(package)
  }

  /// Package names with loaded help, sorted.
  pub fn packages(&self) -> Vec<&str> {
    let mut names: Vec<&str> = self.indexes.keys().map(String::as_str).collect();
    names.sort_unstable();
    names
  }

  pub fn len(&self) -> usize {
    self.indexes.len()
  }

  pub fn is_empty(&self) -> bool {
    self.indexes.is_empty()
  }

  pub fn is_loaded(&self) -> bool {
    self.loaded
  }

  /// Drop the loaded indexes; the next [`HelpRegistry::ensure_loaded`]
  /// rescans from scratch.
  pub fn invalidate(&mut self) {
    self.indexes.clear();
    self.loaded = false;
  }

  /// Scan and load all indexes, unless they are already loaded.
  pub fn ensure_loaded(&mut self, source: &dyn IndexSource) {
    if !self.loaded {
      self.indexes = scan(source);
      self.loaded = true;
    }
  }

  /// Reload help indexes from the source.
  ///
  /// With a package name, only that package's index file is re-read; this
  /// also handles the index renaming its package. Without one, the whole
  /// source is rescanned and the loaded set replaced wholesale.
  pub fn reload(&mut self, source: &dyn IndexSource, package: Option<&str>) -> Result<()> {
    let Some(package) = package else {
      self.indexes = scan(source);
      self.loaded = true;
      return Ok(());
    };

    let Some(existing) = self.indexes.get(package) else {
      log::warn!("package '{package}' is not loaded; rescanning all help indexes");
      self.indexes = scan(source);
      self.loaded = true;
      return Ok(());
    };

    let index_file = existing.index_file.clone();
    let text = read_normalized(source, &index_file)?;
    let index = hyperdoc_index::load(&text, &index_file)?;

    self.indexes.remove(package);
    if let Some(existing) = self.indexes.get(&index.package) {
      log::warn!(
        "reloaded index for '{package}' now claims package '{}', replacing the index from '{}'",
        index.package, existing.index_file
      );
    }
    self.indexes.insert(index.package.clone(), index);
    Ok(())
  }
}

/// Load every index file the source can find, resolving package-name
/// conflicts. Indexes that fail to load are skipped with a warning, as are
/// packages with two canonical index files.
fn scan(source: &dyn IndexSource) -> HashMap<String, HelpIndex> {
  let mut indexes: HashMap<String, HelpIndex> = HashMap::new();
  let mut broken: BTreeSet<String> = BTreeSet::new();

  for index_file in source.find_indexes() {
    let index = match read_normalized(source, &index_file)
      .and_then(|text| Ok(hyperdoc_index::load(&text, &index_file)?))
    {
      Ok(index) => index,
      Err(err) => {
        log::warn!("unable to load help index '{index_file}': {err}");
        continue;
      },
    };

    if broken.contains(&index.package) {
      log::warn!(
        "ignoring help index '{index_file}' for broken package '{}'",
        index.package
      );
      continue;
    }

    match indexes.get(&index.package) {
      None => {
        indexes.insert(index.package.clone(), index);
      },
      Some(existing) => match resolve_conflict(existing, &index) {
        ConflictOutcome::KeepExisting => {
          log::warn!(
            "ignoring non-canonical help index '{index_file}' for package '{}'",
            index.package
          );
        },
        ConflictOutcome::UseNew => {
          log::warn!(
            "help index '{index_file}' supersedes '{}' for package '{}'",
            existing.index_file, index.package
          );
          indexes.insert(index.package.clone(), index);
        },
        ConflictOutcome::Broken => {
          log::warn!(
            "package '{}' has multiple canonical help indexes; disabling its help",
            index.package
          );
          broken.insert(index.package.clone());
          indexes.remove(&index.package);
        },
      },
    }
  }

  indexes
}

/// Read a help document through an index, resolving the file against the
/// package's document root.
pub fn load_help_file(
  index: &HelpIndex,
  source: &dyn IndexSource,
  file: &str,
) -> Result<String> {
  read_normalized(source, &paths::join(&index.doc_root, file))
}

#[cfg(test)]
mod tests {
  use std::fs;

  use tempfile::TempDir;

  use crate::source::DirectorySource;

  use super::*;

  fn write(dir: &TempDir, rel: &str, text: &str) {
    let path = dir.path().join(rel);
    if let Some(parent) = path.parent() {
      fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, text).unwrap();
  }

  fn index_json(package: &str) -> String {
    format!(
      r#"{{ "package": "{package}", "help_files": {{ "intro.txt": ["Intro", "intro"] }} }}"#
    )
  }

  #[test]
  fn test_ensure_loaded_scans_once() {
    let dir = TempDir::new().unwrap();
    write(&dir, "PkgA/hyperdoc.json", &index_json("PkgA"));
    write(&dir, "PkgB/hyperdoc.json", &index_json("PkgB"));
    let source = DirectorySource::new(vec![dir.path().to_path_buf()]);

    let mut registry = HelpRegistry::new();
    assert!(!registry.is_loaded());
    registry.ensure_loaded(&source);
    assert!(registry.is_loaded());
    assert_eq!(registry.packages(), ["PkgA", "PkgB"]);

    // A second call does not rescan; new files stay invisible until a
    // reload or invalidation.
    write(&dir, "PkgC/hyperdoc.json", &index_json("PkgC"));
    registry.ensure_loaded(&source);
    assert_eq!(registry.len(), 2);

    registry.invalidate();
    registry.ensure_loaded(&source);
    assert_eq!(registry.len(), 3);
  }

  #[test]
  fn test_broken_index_skipped() {
    let dir = TempDir::new().unwrap();
    write(&dir, "PkgA/hyperdoc.json", &index_json("PkgA"));
    write(&dir, "PkgB/hyperdoc.json", "{ not json");
    let source = DirectorySource::new(vec![dir.path().to_path_buf()]);

    let mut registry = HelpRegistry::new();
    registry.ensure_loaded(&source);
    assert_eq!(registry.packages(), ["PkgA"]);
  }

  #[test]
  fn test_canonical_index_wins() {
    let dir = TempDir::new().unwrap();
    write(&dir, "PkgA/hyperdoc.json", &index_json("PkgA"));
    write(&dir, "Other/hyperdoc.json", &index_json("PkgA"));
    let source = DirectorySource::new(vec![dir.path().to_path_buf()]);

    let mut registry = HelpRegistry::new();
    registry.ensure_loaded(&source);
    let index = registry.get("PkgA").unwrap();
    assert_eq!(index.index_file, "PkgA/hyperdoc.json");
  }

  #[test]
  fn test_duplicate_canonical_disables_package() {
    let dir = TempDir::new().unwrap();
    write(&dir, "PkgA/hyperdoc.json", &index_json("PkgA"));
    write(&dir, "PkgA/help/hyperdoc.json", &index_json("PkgA"));
    write(&dir, "PkgB/hyperdoc.json", &index_json("PkgB"));
    let source = DirectorySource::new(vec![dir.path().to_path_buf()]);

    let mut registry = HelpRegistry::new();
    registry.ensure_loaded(&source);
    assert_eq!(registry.packages(), ["PkgB"]);
  }

  #[test]
  fn test_reload_single_package() {
    let dir = TempDir::new().unwrap();
    write(&dir, "PkgA/hyperdoc.json", &index_json("PkgA"));
    let source = DirectorySource::new(vec![dir.path().to_path_buf()]);

    let mut registry = HelpRegistry::new();
    registry.ensure_loaded(&source);
    assert!(registry.get("PkgA").unwrap().resolve("extra").is_none());

    write(
      &dir,
      "PkgA/hyperdoc.json",
      r#"{ "package": "PkgA", "help_files": { "intro.txt": ["Intro", "intro", "extra"] } }"#,
    );
    registry.reload(&source, Some("PkgA")).unwrap();
    assert!(registry.get("PkgA").unwrap().resolve("extra").is_some());
  }

  #[test]
  fn test_reload_renamed_package() {
    let dir = TempDir::new().unwrap();
    write(&dir, "PkgA/hyperdoc.json", &index_json("PkgA"));
    let source = DirectorySource::new(vec![dir.path().to_path_buf()]);

    let mut registry = HelpRegistry::new();
    registry.ensure_loaded(&source);

    write(&dir, "PkgA/hyperdoc.json", &index_json("Renamed"));
    registry.reload(&source, Some("PkgA")).unwrap();
    assert_eq!(registry.packages(), ["Renamed"]);
  }

  #[test]
  fn test_reload_rename_onto_loaded_package() {
    let dir = TempDir::new().unwrap();
    write(&dir, "PkgA/hyperdoc.json", &index_json("PkgA"));
    write(&dir, "PkgB/hyperdoc.json", &index_json("PkgB"));
    let source = DirectorySource::new(vec![dir.path().to_path_buf()]);

    let mut registry = HelpRegistry::new();
    registry.ensure_loaded(&source);
    assert_eq!(registry.packages(), ["PkgA", "PkgB"]);

    // PkgA's index renames itself to a name another package already owns;
    // the reloaded index takes over that name.
    write(&dir, "PkgA/hyperdoc.json", &index_json("PkgB"));
    registry.reload(&source, Some("PkgA")).unwrap();
    assert_eq!(registry.packages(), ["PkgB"]);
    assert_eq!(
      registry.get("PkgB").unwrap().index_file,
      "PkgA/hyperdoc.json"
    );
  }

  #[test]
  fn test_load_help_file_resolves_doc_root() {
    let dir = TempDir::new().unwrap();
    write(
      &dir,
      "PkgA/hyperdoc.json",
      r#"{ "package": "PkgA", "doc_root": "help", "help_files": { "intro.txt": ["Intro"] } }"#,
    );
    write(&dir, "PkgA/help/intro.txt", "hello\r\nworld\n");
    let source = DirectorySource::new(vec![dir.path().to_path_buf()]);

    let mut registry = HelpRegistry::new();
    registry.ensure_loaded(&source);
    let index = registry.get("PkgA").unwrap();
    assert_eq!(
      load_help_file(index, &source, "intro.txt").unwrap(),
      "hello\nworld\n"
    );
  }
}
