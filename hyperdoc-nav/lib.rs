//! Help navigation: the loaded-index registry, topic dispatch and per-view
//! history.
//!
//! This crate ties the index model to a host. Hosts supply an
//! [`IndexSource`] saying where help content lives; the [`HelpRegistry`]
//! scans it lazily and keeps one [`HelpIndex`](hyperdoc_index::HelpIndex)
//! per package. [`show_topic`] resolves a topic and answers with a
//! [`NavigationAction`] telling the host what to open; [`History`] tracks
//! where the reader has been, browser style.

pub mod action;
pub mod history;
pub mod registry;
pub mod source;

pub use action::{
  NavError,
  NavigationAction,
  load_document,
  show_topic,
};
pub use history::{
  Direction,
  History,
  HistoryEntry,
  HistoryError,
};
pub use registry::{
  HelpRegistry,
  load_help_file,
};
pub use source::{
  DirectorySource,
  IndexSource,
  SourceError,
  read_normalized,
};
