//! Page model
//!
//! A page is a title plus an opaque body. Titles are validated on
//! construction so every `Title` in the program is safe to use as a file name.

use std::fmt;

use thiserror::Error;

/// Invalid page title
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TitleError {
    #[error("page title is empty")]
    Empty,
    #[error("page title contains invalid character {0:?}")]
    InvalidChar(char),
}

/// Validated page title, one or more ASCII letters or digits
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Title(String);

impl Title {
    pub fn parse(raw: &str) -> Result<Self, TitleError> {
        if raw.is_empty() {
            return Err(TitleError::Empty);
        }
        if let Some(c) = raw.chars().find(|c| !c.is_ascii_alphanumeric()) {
            return Err(TitleError::InvalidChar(c));
        }
        Ok(Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Name of the backing file inside the data directory
    pub fn file_name(&self) -> String {
        format!("{}.txt", self.0)
    }
}

impl fmt::Display for Title {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Title {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A wiki page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub title: Title,
    pub body: Vec<u8>,
}

impl Page {
    pub fn new(title: Title, body: impl Into<Vec<u8>>) -> Self {
        Self {
            title,
            body: body.into(),
        }
    }

    /// Empty page shown when nothing has been saved under `title` yet
    pub fn placeholder(title: Title) -> Self {
        Self {
            title,
            body: Vec::new(),
        }
    }

    /// Body as text, invalid UTF-8 replaced
    pub fn body_text(&self) -> std::borrow::Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_accepts_alphanumeric() {
        for raw in ["FrontPage", "a", "Page2", "123", "ABCxyz09"] {
            let title = Title::parse(raw).unwrap();
            assert_eq!(title.as_str(), raw);
        }
    }

    #[test]
    fn test_title_rejects_empty() {
        assert_eq!(Title::parse(""), Err(TitleError::Empty));
    }

    #[test]
    fn test_title_rejects_punctuation_and_separators() {
        assert_eq!(Title::parse("../etc"), Err(TitleError::InvalidChar('.')));
        assert_eq!(Title::parse("a/b"), Err(TitleError::InvalidChar('/')));
        assert_eq!(Title::parse("with space"), Err(TitleError::InvalidChar(' ')));
        assert_eq!(Title::parse("dash-ed"), Err(TitleError::InvalidChar('-')));
        // Non-ASCII letters are outside the class
        assert_eq!(Title::parse("Caf\u{e9}"), Err(TitleError::InvalidChar('\u{e9}')));
    }

    #[test]
    fn test_file_name() {
        let title = Title::parse("Test").unwrap();
        assert_eq!(title.file_name(), "Test.txt");
    }

    #[test]
    fn test_placeholder_is_empty() {
        let page = Page::placeholder(Title::parse("Missing").unwrap());
        assert_eq!(page.title.as_str(), "Missing");
        assert!(page.body.is_empty());
        assert_eq!(page.body_text(), "");
    }
}
