use std::collections::{
  BTreeSet,
  HashMap,
};

use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use crate::{
  index::HelpIndex,
  paths,
  toc,
  topic::{
    TopicEntry,
    normalize_key,
  },
};

/// Result type for index loading.
pub type Result<T> = std::result::Result<T, IndexError>;

/// Errors that fail an index load outright.
///
/// Everything else the loader encounters (duplicate topics, colliding
/// aliases, invalid externals, unknown top-level keys, unresolvable TOC
/// references) is a warning: the offending piece is dropped and the load
/// succeeds.
#[derive(Debug, Error)]
pub enum IndexError {
  #[error("invalid help index in '{file}': {source}")]
  Json {
    file:   String,
    #[source]
    source: serde_json::Error,
  },
  #[error("help index '{0}' does not declare a package name")]
  MissingPackage(String),
  #[error("help source '{entry}' in '{file}' does not start with a title")]
  MissingTitle { file: String, entry: String },
}

/// The raw JSON shape of a package's help index.
#[derive(Debug, Deserialize)]
struct RawIndex {
  package:         Option<String>,
  description:     Option<String>,
  doc_root:        Option<String>,
  default_caption: Option<String>,
  #[serde(default)]
  help_files:      IndexMap<String, RawSource>,
  help_contents:   Option<Vec<RawTocEntry>>,
  #[serde(default)]
  externals:       IndexMap<String, RawSource>,
  /// Unknown top-level keys: warned about, never fatal.
  #[serde(flatten)]
  unknown:         IndexMap<String, Value>,
}

/// A `help_files`/`externals` value: the document title followed by topic
/// declarations.
#[derive(Debug, Deserialize)]
#[serde(transparent)]
struct RawSource(Vec<RawTopicDecl>);

impl RawSource {
  fn title(&self) -> Option<&str> {
    match self.0.first() {
      Some(RawTopicDecl::Name(title)) => Some(title),
      _ => None,
    }
  }
}

/// The three declaration forms a topic may take inside a help source entry.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawTopicDecl {
  /// `true`: the document is its own topic.
  Implicit(bool),
  /// A bare string: a topic whose caption is itself.
  Name(String),
  /// The full form.
  Topic {
    topic:   String,
    #[serde(default)]
    caption: Option<String>,
    #[serde(default)]
    aliases: Vec<String>,
  },
}

/// A `help_contents` entry: a bare topic string or a node object.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum RawTocEntry {
  Name(String),
  Node {
    topic:    String,
    #[serde(default)]
    caption:  Option<String>,
    #[serde(default)]
    children: Vec<RawTocEntry>,
  },
}

fn is_url_like(target: &str) -> bool {
  target.starts_with("http://") || target.starts_with("https://")
}

/// Substitute the `{topic}` / `{source}` / `{package}` placeholders of a
/// declared `default_caption` template.
fn apply_caption_template(template: &str, topic: &str, source: &str, package: &str) -> String {
  template
    .replace("{topic}", topic)
    .replace("{source}", source)
    .replace("{package}", package)
}

/// Import the topics and aliases declared by a set of help sources.
///
/// Duplicate keys keep the earlier declaration; collisions between the topic
/// and alias namespaces keep whichever registered first. `registered` holds
/// the topics an earlier import pass already claimed, so a later pass cannot
/// shadow them with either a topic or an alias. For externals, keys that are
/// neither URLs nor `Packages/` paths are discarded.
fn import_topics(
  package: &str,
  index_file: &str,
  sources: &IndexMap<String, RawSource>,
  caption_template: Option<&str>,
  external: bool,
  topics: &mut HashMap<String, TopicEntry>,
  registered: &HashMap<String, TopicEntry>,
  aliases: &mut HashMap<String, String>,
) -> Result<()> {
  for (source_name, source) in sources {
    if external && !is_url_like(source_name) && !source_name.starts_with("Packages/") {
      log::warn!("discarding invalid external '{source_name}' in {package}");
      continue;
    }

    let Some(title) = source.title() else {
      return Err(IndexError::MissingTitle {
        file:  index_file.to_string(),
        entry: source_name.clone(),
      });
    };
    let title = title.to_string();

    for decl in &source.0[1..] {
      let (raw_topic, caption, alias_list): (String, Option<String>, &[String]) = match decl {
        RawTopicDecl::Implicit(true) => (source_name.clone(), None, &[]),
        RawTopicDecl::Implicit(false) => {
          log::warn!("ignoring 'false' topic declaration in {package}:{source_name}");
          continue;
        },
        RawTopicDecl::Name(name) => (name.clone(), Some(name.clone()), &[]),
        RawTopicDecl::Topic {
          topic,
          caption,
          aliases,
        } => (topic.clone(), caption.clone(), aliases.as_slice()),
      };

      // Caption default order: explicit, then the package's declared
      // template, then the document title. Externals always fall back to
      // the title.
      let caption = caption.unwrap_or_else(|| {
        match caption_template {
          Some(template) if !external => {
            apply_caption_template(template, &raw_topic, source_name, package)
          },
          _ => title.clone(),
        }
      });

      let name = normalize_key(&raw_topic);
      if topics.contains_key(&name) || registered.contains_key(&name) {
        log::warn!("skipping duplicate topic '{name}' in {package}:{source_name}");
      } else if aliases.contains_key(&name) {
        log::warn!("topic '{name}' is already an alias in {package}:{source_name}");
      } else {
        topics.insert(name.clone(), TopicEntry {
          topic: name.clone(),
          caption,
          file: source_name.clone(),
        });
      }

      for alias in alias_list {
        let alias = normalize_key(alias);
        if topics.contains_key(&alias) || registered.contains_key(&alias) {
          log::warn!("alias '{alias}' is already a topic in {package}:{source_name}");
        } else if aliases.contains_key(&alias) {
          log::warn!("skipping duplicate alias '{alias}' in {package}:{source_name}");
        } else {
          aliases.insert(alias, name.clone());
        }
      }
    }

    // Every help source is reachable by its own (folded) file name, even
    // when it declares no topics at all.
    if !external {
      let name = normalize_key(source_name);
      topics.entry(name.clone()).or_insert_with(|| {
        TopicEntry {
          topic:   name,
          caption: title,
          file:    source_name.clone(),
        }
      });
    }
  }

  Ok(())
}

/// Load a help index from its raw JSON text.
///
/// `index_file` is the resource the text came from; its first path component
/// is the containing package directory, used to resolve a declared
/// `doc_root`. Loading the same text twice yields structurally equal
/// indexes.
pub fn load(text: &str, index_file: &str) -> Result<HelpIndex> {
  let raw: RawIndex = serde_json::from_str(text).map_err(|source| {
    IndexError::Json {
      file: index_file.to_string(),
      source,
    }
  })?;

  let package = raw
    .package
    .ok_or_else(|| IndexError::MissingPackage(index_file.to_string()))?;

  for key in raw.unknown.keys() {
    log::warn!("ignoring unknown key '{key}' in help index '{index_file}'");
  }

  let description = raw
    .description
    .unwrap_or_else(|| format!("Help for {package}"));

  // A declared doc root is relative to the containing package directory;
  // without one the documents live next to the index.
  let doc_root = match &raw.doc_root {
    Some(root) => paths::join(paths::first_component(index_file), root),
    None => paths::parent(index_file).to_string(),
  };

  let mut topics = HashMap::new();
  let mut aliases = HashMap::new();
  let no_registered = HashMap::new();
  import_topics(
    &package,
    index_file,
    &raw.help_files,
    raw.default_caption.as_deref(),
    false,
    &mut topics,
    &no_registered,
    &mut aliases,
  )?;

  // Externals import last and see the already-registered topics, so an
  // external topic or alias that collides with one is discarded and never
  // contributes its target to the URL or package-file sets.
  let mut external_topics = HashMap::new();
  import_topics(
    &package,
    index_file,
    &raw.externals,
    raw.default_caption.as_deref(),
    true,
    &mut external_topics,
    &topics,
    &mut aliases,
  )?;

  let mut urls = BTreeSet::new();
  let mut package_files = BTreeSet::new();
  for (name, entry) in external_topics {
    if is_url_like(&entry.file) {
      urls.insert(entry.file.clone());
    } else {
      package_files.insert(entry.file.clone());
    }
    topics.insert(name, entry);
  }

  let mut file_names: Vec<&String> = raw.help_files.keys().collect();
  file_names.sort();
  let mut files = IndexMap::new();
  for name in file_names {
    if let Some(title) = raw.help_files[name].title() {
      files.insert(name.clone(), title.to_string());
    }
  }

  let toc = match &raw.help_contents {
    Some(entries) => toc::expand(entries, &topics, &aliases, &package),
    None => toc::default_toc(&topics),
  };

  Ok(HelpIndex {
    package,
    index_file: index_file.to_string(),
    description,
    doc_root,
    topics,
    aliases,
    files,
    package_files,
    urls,
    toc,
  })
}
