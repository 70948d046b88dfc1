//! Help-document text post-processing.
//!
//! Help documents are plain text with a light markup layer: an optional
//! structured first line (the header), `<* ... *>` authoring comments,
//! `*anchor*` anchors (plus the `*|anchor|*` hidden form) and `|link|`
//! links. [`process_document`] turns authored text into display text (header
//! expanded, comments stripped, markup rewritten to its display form) while
//! recording the byte span of every anchor and link so a host can place
//! cursors and regions without re-parsing.

pub mod header;
pub mod markup;

pub use header::{
  DEFAULT_DATE_FORMAT,
  DEFAULT_HEADER_WIDTH,
  HeaderInfo,
  parse_header,
};
pub use markup::{
  Anchor,
  Link,
  LinkParts,
  ProcessOptions,
  ProcessedDocument,
  parse_anchor_body,
  parse_link_body,
  process_document,
  strip_comments,
};
