use std::ops::Range;

use hyperdoc_index::normalize_key;

use crate::header::{
  self,
  DEFAULT_DATE_FORMAT,
  DEFAULT_HEADER_WIDTH,
  HeaderInfo,
};

/// How [`process_document`] should render the header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessOptions {
  pub header_width: usize,
  pub date_format:  String,
}

impl Default for ProcessOptions {
  fn default() -> Self {
    Self {
      header_width: DEFAULT_HEADER_WIDTH,
      date_format:  DEFAULT_DATE_FORMAT.to_string(),
    }
  }
}

/// An anchor located in processed document text.
///
/// `span` is the byte range of the display text within
/// [`ProcessedDocument::text`]; for a hidden anchor with no display text the
/// range is empty but still marks the anchor's position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Anchor {
  /// Normalized topic id the anchor answers to.
  pub topic:  String,
  pub text:   String,
  pub hidden: bool,
  pub span:   Range<usize>,
}

/// A link located in processed document text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
  /// Explicit target package, when the link names one.
  pub package: Option<String>,
  pub topic:   String,
  pub text:    String,
  pub broken:  bool,
  pub span:    Range<usize>,
}

/// The parsed body of a well-formed link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkParts {
  pub package: Option<String>,
  pub topic:   String,
  pub text:    String,
}

/// A help document after post-processing: display text plus the location of
/// every anchor and link within it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessedDocument {
  pub file:    String,
  pub header:  Option<HeaderInfo>,
  pub text:    String,
  pub anchors: Vec<Anchor>,
  pub links:   Vec<Link>,
}

impl ProcessedDocument {
  /// Find the anchor for a topic id. The query is normalized with the same
  /// rule as topic keys.
  pub fn anchor(&self, topic: &str) -> Option<&Anchor> {
    let key = normalize_key(topic);
    self.anchors.iter().find(|anchor| anchor.topic == key)
  }
}

/// Split an anchor body into its topic id and display text.
///
/// A body of `id:text` anchors `text` under `id`; a body with no `:` is both
/// at once; an empty id falls back to the text.
pub fn parse_anchor_body(body: &str) -> (String, String) {
  let (id, text) = match body.find(':') {
    Some(pos) => {
      let id = &body[..pos];
      let text = &body[pos + 1..];
      if id.is_empty() { (text, text) } else { (id, text) }
    },
    None => (body, body),
  };
  (normalize_key(id), text.trim().to_string())
}

/// Split a link body into package, topic and display text.
///
/// A bare body is its own topic and text. The full form is
/// `package:topic:text` (the package may be empty to mean "current", the
/// topic may be empty to reuse the text). A two-part body is malformed and
/// yields `None`.
pub fn parse_link_body(body: &str) -> Option<LinkParts> {
  let parts: Vec<&str> = body.split(':').collect();
  match parts.len() {
    1 => {
      let text = body.trim_end();
      Some(LinkParts {
        package: None,
        topic:   text.to_string(),
        text:    text.to_string(),
      })
    },
    2 => None,
    _ => {
      let text = parts[2..].join(":").trim().to_string();
      let topic = if parts[1].is_empty() {
        text.clone()
      } else {
        parts[1].trim().to_string()
      };
      let package = if parts[0].is_empty() {
        None
      } else {
        Some(parts[0].to_string())
      };
      Some(LinkParts {
        package,
        topic,
        text,
      })
    },
  }
}

/// Remove every `<* ... *>` authoring comment from `text`.
///
/// Comments may span lines. A line left with no content at all disappears
/// together with its newline, so comment-only lines leave no blank holes.
/// Fenced code blocks (``` fences) are copied through untouched.
pub fn strip_comments(text: &str) -> String {
  let mut out = String::new();
  let mut in_comment = false;
  let mut in_fence = false;
  let mut emitted_any = false;

  for line in text.split('\n') {
    if !in_comment && line.trim_start().starts_with("```") {
      in_fence = !in_fence;
      if emitted_any {
        out.push('\n');
      }
      out.push_str(line);
      emitted_any = true;
      continue;
    }
    if in_fence {
      if emitted_any {
        out.push('\n');
      }
      out.push_str(line);
      emitted_any = true;
      continue;
    }

    let mut rendered = String::new();
    let mut i = 0;
    while i < line.len() {
      let rest = &line[i..];
      if in_comment {
        match rest.find("*>") {
          Some(pos) => {
            i += pos + 2;
            in_comment = false;
          },
          None => i = line.len(),
        }
        continue;
      }
      if rest.starts_with("<*") {
        in_comment = true;
        i += 2;
        continue;
      }
      let Some(ch) = rest.chars().next() else { break };
      rendered.push(ch);
      i += ch.len_utf8();
    }

    if rendered.is_empty() && !line.is_empty() {
      continue;
    }
    if emitted_any {
      out.push('\n');
    }
    out.push_str(&rendered);
    emitted_any = true;
  }

  out
}

/// Post-process authored help text into its display form.
///
/// Expands a structured header line when present, strips authoring comments,
/// rewrites anchors and links to their display text and records their byte
/// spans against the resulting text. Markup is line-scoped; fenced code
/// blocks are passed through verbatim.
pub fn process_document(file: &str, text: &str, options: &ProcessOptions) -> ProcessedDocument {
  let mut out = String::new();
  let mut anchors: Vec<Anchor> = Vec::new();
  let mut links: Vec<Link> = Vec::new();
  let mut header = None;

  let mut in_comment = false;
  let mut in_fence = false;
  let mut emitted_any = false;

  for (line_no, line) in text.split('\n').enumerate() {
    if line_no == 0 {
      if let Some(info) = header::parse_header(file, line) {
        out.push_str(&info.expand(options.header_width, &options.date_format));
        header = Some(info);
        emitted_any = true;
        continue;
      }
    }

    if !in_comment && line.trim_start().starts_with("```") {
      in_fence = !in_fence;
      if emitted_any {
        out.push('\n');
      }
      out.push_str(line);
      emitted_any = true;
      continue;
    }
    if in_fence {
      if emitted_any {
        out.push('\n');
      }
      out.push_str(line);
      emitted_any = true;
      continue;
    }

    // Spans are recorded relative to the rendered line, then shifted once
    // the line's final position in the output is known.
    let mut rendered = String::new();
    let mut line_anchors: Vec<Anchor> = Vec::new();
    let mut line_links: Vec<Link> = Vec::new();

    let mut i = 0;
    while i < line.len() {
      let rest = &line[i..];

      if in_comment {
        match rest.find("*>") {
          Some(pos) => {
            i += pos + 2;
            in_comment = false;
          },
          None => i = line.len(),
        }
        continue;
      }

      if rest.starts_with("<*") {
        in_comment = true;
        i += 2;
        continue;
      }

      // Hidden anchor: `*|body|*`. Checked before the normal form so the
      // leading `*|` is not mistaken for an anchor star.
      if rest.starts_with("*|") {
        if let Some(end) = rest[2..].find("|*") {
          let body = &rest[2..2 + end];
          let (topic, text) = parse_anchor_body(body);
          let start = rendered.len();
          rendered.push_str(&text);
          line_anchors.push(Anchor {
            topic,
            text,
            hidden: true,
            span: start..rendered.len(),
          });
          i += end + 4;
          continue;
        }
      }

      if rest.starts_with('*') {
        if let Some(end) = rest[1..].find('*') {
          if end > 0 {
            let body = &rest[1..1 + end];
            let (topic, text) = parse_anchor_body(body);
            let start = rendered.len();
            rendered.push_str(&text);
            line_anchors.push(Anchor {
              topic,
              text,
              hidden: false,
              span: start..rendered.len(),
            });
            i += end + 2;
            continue;
          }
        }
      }

      if rest.starts_with('|') {
        if let Some(end) = rest[1..].find('|') {
          if end > 0 {
            let body = &rest[1..1 + end];
            let start = rendered.len();
            match parse_link_body(body) {
              Some(parts) => {
                rendered.push_str(&parts.text);
                line_links.push(Link {
                  package: parts.package,
                  topic:   parts.topic,
                  text:    parts.text,
                  broken:  false,
                  span:    start..rendered.len(),
                });
              },
              None => {
                // Malformed links keep their raw body and are flagged so
                // the host can style them as broken.
                rendered.push_str(body);
                line_links.push(Link {
                  package: None,
                  topic:   String::new(),
                  text:    body.to_string(),
                  broken:  true,
                  span:    start..rendered.len(),
                });
              },
            }
            i += end + 2;
            continue;
          }
        }
      }

      let Some(ch) = rest.chars().next() else { break };
      rendered.push(ch);
      i += ch.len_utf8();
    }

    // A line whose content was entirely comment matter disappears with its
    // newline; lines that still carry an anchor or link keep their place
    // even when they render to nothing.
    if rendered.is_empty()
      && line_anchors.is_empty()
      && line_links.is_empty()
      && !line.is_empty()
    {
      continue;
    }

    if emitted_any {
      out.push('\n');
    }
    let base = out.len();
    out.push_str(&rendered);
    for mut anchor in line_anchors {
      anchor.span = anchor.span.start + base..anchor.span.end + base;
      anchors.push(anchor);
    }
    for mut link in line_links {
      link.span = link.span.start + base..link.span.end + base;
      links.push(link);
    }
    emitted_any = true;
  }

  ProcessedDocument {
    file: file.to_string(),
    header,
    text: out,
    anchors,
    links,
  }
}
