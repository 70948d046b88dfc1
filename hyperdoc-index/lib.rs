//! Help-package index model: loading, topic resolution and table-of-contents
//! expansion.
//!
//! A help package declares its topics in a JSON index (see [`load`]). Loading
//! normalizes every topic and alias key with a single rule (lowercase,
//! collapsed whitespace) so that lookups are case- and spacing-insensitive,
//! and degrades gracefully: duplicate topics, colliding aliases, invalid
//! externals and unresolvable TOC references are logged and dropped rather
//! than failing the load.
//!
//! Nothing in this crate touches a host editor. Resolution only classifies a
//! topic ([`TopicKind`]); acting on the classification is the caller's job.

pub mod index;
pub mod load;
pub mod paths;
pub mod toc;
pub mod topic;

pub use index::{
  HelpIndex,
  TopicKind,
};
pub use load::{
  IndexError,
  Result,
  load,
};
pub use toc::TocNode;
pub use topic::{
  TopicEntry,
  normalize_key,
};
