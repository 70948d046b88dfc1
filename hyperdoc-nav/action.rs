use hyperdoc_index::{
  HelpIndex,
  TopicKind,
};
use hyperdoc_text::{
  ProcessOptions,
  ProcessedDocument,
  process_document,
};
use thiserror::Error;

use crate::{
  registry::{
    HelpRegistry,
    load_help_file,
  },
  source::{
    IndexSource,
    SourceError,
  },
};

pub type Result<T> = std::result::Result<T, NavError>;

#[derive(Debug, Error)]
pub enum NavError {
  #[error("no help is available for package '{0}'")]
  UnknownPackage(String),

  #[error("package '{package}' has no topic '{topic}'")]
  UnknownTopic { package: String, topic: String },

  #[error(transparent)]
  Source(#[from] SourceError),
}

/// What the host should do to display a resolved topic.
///
/// The help system never opens anything itself; it resolves the topic and
/// hands back an instruction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationAction {
  /// Open the URL in an external browser.
  OpenUrl(String),

  /// Open a file that ships inside a package, by its package path.
  OpenPackageFile(String),

  /// Show a help document and focus the topic's anchor within it.
  ShowDocument {
    package: String,
    file:    String,
    topic:   String,
  },
}

/// Resolve a topic in a package and decide how to display it.
pub fn show_topic(registry: &HelpRegistry, package: &str, topic: &str) -> Result<NavigationAction> {
  let index = registry
    .get(package)
    .ok_or_else(|| NavError::UnknownPackage(package.to_string()))?;

  let entry = index.resolve(topic).ok_or_else(|| NavError::UnknownTopic {
    package: package.to_string(),
    topic:   topic.to_string(),
  })?;

  Ok(match index.classify(entry) {
    TopicKind::Url => NavigationAction::OpenUrl(entry.file.clone()),
    TopicKind::PackageFile => NavigationAction::OpenPackageFile(entry.file.clone()),
    TopicKind::Document => NavigationAction::ShowDocument {
      package: index.package.clone(),
      file:    entry.file.clone(),
      topic:   entry.topic.clone(),
    },
  })
}

/// Load a help document through its index and post-process it for display.
pub fn load_document(
  index: &HelpIndex,
  source: &dyn IndexSource,
  file: &str,
  options: &ProcessOptions,
) -> Result<ProcessedDocument> {
  let text = load_help_file(index, source, file)?;
  Ok(process_document(file, &text, options))
}
