use std::fmt;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, HistoryError>;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum HistoryError {
  #[error("no history entry {0} of the current position")]
  AtBoundary(Direction),

  #[error("history index {index} out of bounds (len {len})")]
  OutOfBounds { index: usize, len: usize },

  #[error("already at history entry {0}")]
  AlreadyCurrent(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
  Back,
  Forward,
}

impl fmt::Display for Direction {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Direction::Back => write!(f, "backwards"),
      Direction::Forward => write!(f, "forwards"),
    }
  }
}

/// A snapshot of where the reader was in a help document.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEntry {
  pub package:  String,
  pub file:     String,
  /// Scroll position of the view, in host units.
  pub viewport: (f64, f64),
  /// Caret location as a byte span.
  pub caret:    (usize, usize),
}

impl HistoryEntry {
  pub fn new(package: impl Into<String>, file: impl Into<String>) -> Self {
    Self {
      package:  package.into(),
      file:     file.into(),
      viewport: (0.0, 0.0),
      caret:    (0, 0),
    }
  }
}

/// Linear navigation history over help documents.
///
/// The history is a list of entries with a cursor. Navigating moves the
/// cursor; pushing a new entry from anywhere but the tip discards the
/// entries ahead of the cursor first, the way a browser does.
#[derive(Debug, Clone)]
pub struct History {
  entries: Vec<HistoryEntry>,
  current: usize,
}

impl History {
  /// A history starts non-empty: the document being viewed is entry zero.
  pub fn new(initial: HistoryEntry) -> Self {
    Self {
      entries: vec![initial],
      current: 0,
    }
  }

  pub fn current(&self) -> &HistoryEntry {
    &self.entries[self.current]
  }

  pub fn position(&self) -> usize {
    self.current
  }

  pub fn len(&self) -> usize {
    self.entries.len()
  }

  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }

  pub fn entries(&self) -> &[HistoryEntry] {
    &self.entries
  }

  pub fn at_tip(&self) -> bool {
    self.current + 1 == self.entries.len()
  }

  /// Update the current entry in place, typically to save the viewport and
  /// caret before navigating away.
  pub fn record_current(&mut self, entry: HistoryEntry) {
    self.entries[self.current] = entry;
  }

  /// Append a new entry after the current position and move to it. Entries
  /// ahead of the current position are dropped.
  pub fn push(&mut self, entry: HistoryEntry) {
    self.entries.truncate(self.current + 1);
    self.entries.push(entry);
    self.current += 1;
  }

  pub fn navigate(&mut self, direction: Direction) -> Result<&HistoryEntry> {
    match direction {
      Direction::Back => {
        if self.current == 0 {
          return Err(HistoryError::AtBoundary(direction));
        }
        self.current -= 1;
      },
      Direction::Forward => {
        if self.at_tip() {
          return Err(HistoryError::AtBoundary(direction));
        }
        self.current += 1;
      },
    }
    Ok(&self.entries[self.current])
  }

  pub fn back(&mut self) -> Result<&HistoryEntry> {
    self.navigate(Direction::Back)
  }

  pub fn forward(&mut self) -> Result<&HistoryEntry> {
    self.navigate(Direction::Forward)
  }

  /// Jump straight to an entry by index.
  pub fn jump_to(&mut self, index: usize) -> Result<&HistoryEntry> {
    if index >= self.entries.len() {
      return Err(HistoryError::OutOfBounds {
        index,
        len: self.entries.len(),
      });
    }
    if index == self.current {
      return Err(HistoryError::AlreadyCurrent(index));
    }
    self.current = index;
    Ok(&self.entries[self.current])
  }

  /// Forget everything except the current entry.
  pub fn clear(&mut self) {
    let current = self.entries.swap_remove(self.current);
    self.entries.clear();
    self.entries.push(current);
    self.current = 0;
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn entry(file: &str) -> HistoryEntry {
    HistoryEntry::new("Pkg", file)
  }

  #[test]
  fn test_new_history() {
    let history = History::new(entry("a.txt"));
    assert_eq!(history.len(), 1);
    assert_eq!(history.position(), 0);
    assert_eq!(history.current().file, "a.txt");
    assert!(history.at_tip());
  }

  #[test]
  fn test_push_advances() {
    let mut history = History::new(entry("a.txt"));
    history.push(entry("b.txt"));
    history.push(entry("c.txt"));
    assert_eq!(history.len(), 3);
    assert_eq!(history.position(), 2);
    assert_eq!(history.current().file, "c.txt");
  }

  #[test]
  fn test_push_truncates_forward_entries() {
    let mut history = History::new(entry("a.txt"));
    history.push(entry("b.txt"));
    history.push(entry("c.txt"));
    history.back().unwrap();
    assert_eq!(history.current().file, "b.txt");

    history.push(entry("d.txt"));
    assert_eq!(history.len(), 3);
    assert_eq!(history.position(), 2);
    let files: Vec<&str> = history.entries().iter().map(|e| e.file.as_str()).collect();
    assert_eq!(files, ["a.txt", "b.txt", "d.txt"]);
  }

  #[test]
  fn test_navigate_round_trip() {
    let mut history = History::new(entry("a.txt"));
    history.push(entry("b.txt"));

    assert_eq!(history.back().unwrap().file, "a.txt");
    assert_eq!(history.forward().unwrap().file, "b.txt");
  }

  #[test]
  fn test_navigate_boundaries() {
    let mut history = History::new(entry("a.txt"));
    assert_eq!(
      history.back().unwrap_err(),
      HistoryError::AtBoundary(Direction::Back)
    );
    assert_eq!(
      history.forward().unwrap_err(),
      HistoryError::AtBoundary(Direction::Forward)
    );
    // A failed navigation leaves the position untouched.
    assert_eq!(history.position(), 0);
  }

  #[test]
  fn test_jump_to() {
    let mut history = History::new(entry("a.txt"));
    history.push(entry("b.txt"));
    history.push(entry("c.txt"));

    assert_eq!(history.jump_to(0).unwrap().file, "a.txt");
    assert_eq!(
      history.jump_to(0).unwrap_err(),
      HistoryError::AlreadyCurrent(0)
    );
    assert_eq!(
      history.jump_to(9).unwrap_err(),
      HistoryError::OutOfBounds { index: 9, len: 3 }
    );
  }

  #[test]
  fn test_clear_keeps_current() {
    let mut history = History::new(entry("a.txt"));
    history.push(entry("b.txt"));
    history.push(entry("c.txt"));
    history.back().unwrap();

    history.clear();
    assert_eq!(history.len(), 1);
    assert_eq!(history.position(), 0);
    assert_eq!(history.current().file, "b.txt");
  }

  #[test]
  fn test_record_current() {
    let mut history = History::new(entry("a.txt"));
    let mut updated = entry("a.txt");
    updated.viewport = (0.0, 120.0);
    updated.caret = (10, 14);
    history.record_current(updated.clone());
    assert_eq!(history.current(), &updated);
  }
}
