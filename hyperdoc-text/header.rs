use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;

/// Width of the expanded header, unless the host asks for another.
pub const DEFAULT_HEADER_WIDTH: usize = 80;

/// Date display format used when the host has no preference.
pub const DEFAULT_DATE_FORMAT: &str = "%Y-%m-%d";

static HEADER_PREFIX: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"^%hyperdoc(\b|$)").unwrap());
static HEADER_KEYPAIR: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r#"\b([a-z]+)\b="([^"]*)""#).unwrap());

/// The parsed contents of a help document's structured header line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderInfo {
  /// The help file the header belongs to.
  pub file:  String,
  pub title: String,
  pub date:  Option<NaiveDate>,
}

/// Parse the first line of a help document.
///
/// Returns `None` when the line is not a header (no `%hyperdoc` prefix).
/// Unknown keys and unparsable dates are warned about and ignored; a header
/// with no title gets a placeholder.
pub fn parse_header(file: &str, first_line: &str) -> Option<HeaderInfo> {
  if !HEADER_PREFIX.is_match(first_line) {
    return None;
  }

  let mut title = String::from("No Title Provided");
  let mut date = None;

  for capture in HEADER_KEYPAIR.captures_iter(first_line) {
    let (key, value) = (&capture[1], &capture[2]);
    match key {
      "title" => title = value.to_string(),
      "date" => {
        match NaiveDate::parse_from_str(value, "%Y-%m-%d") {
          Ok(parsed) => date = Some(parsed),
          Err(_) => log::warn!("ignoring invalid file date '{value}' in '{file}'"),
        }
      },
      _ => log::warn!("ignoring unknown header key '{key}' in '{file}'"),
    }
  }

  Some(HeaderInfo {
    file: file.to_string(),
    title,
    date,
  })
}

impl HeaderInfo {
  /// Render the user-facing header this line becomes: an anchor target for
  /// the file name, the title centered in the remaining width (truncated
  /// with `…` when it does not fit), the date, and a full-width rule.
  ///
  /// The result is two lines with no trailing newline.
  pub fn expand(&self, width: usize, date_format: &str) -> String {
    let file_target = format!("*{}*", self.file);
    let date_str = match self.date {
      Some(date) => date.format(date_format).to_string(),
      None => String::from("Not Available"),
    };

    // Two spaces of gutter on either side of the title.
    let max_title_len = width
      .saturating_sub(file_target.chars().count())
      .saturating_sub(date_str.chars().count())
      .saturating_sub(4);
    let title = truncate(&self.title, max_title_len);

    format!(
      "{}  {}  {}\n{}",
      file_target,
      center(&title, max_title_len),
      date_str,
      "=".repeat(width)
    )
  }
}

fn truncate(text: &str, max_len: usize) -> String {
  if text.chars().count() <= max_len {
    return text.to_string();
  }
  let kept: String = text.chars().take(max_len.saturating_sub(1)).collect();
  format!("{kept}\u{2026}")
}

fn center(text: &str, width: usize) -> String {
  let len = text.chars().count();
  if len >= width {
    return text.to_string();
  }
  let left = (width - len) / 2;
  let right = width - len - left;
  format!("{}{}{}", " ".repeat(left), text, " ".repeat(right))
}
