//! Wiki path matching
//!
//! Title-taking routes have the exact shape `/<action>/<title>`. Anything
//! else is rejected and answered with 404 by the caller.

use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;

static VALID_PATH: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^/(view|edit|save)/([A-Za-z0-9]+)$").expect("valid path pattern")
});

/// Action selected by the first path segment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    View,
    Edit,
    Save,
}

impl Action {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::View => "view",
            Self::Edit => "edit",
            Self::Save => "save",
        }
    }

    fn from_segment(segment: &str) -> Option<Self> {
        match segment {
            "view" => Some(Self::View),
            "edit" => Some(Self::Edit),
            "save" => Some(Self::Save),
            _ => None,
        }
    }

    /// Route for this action on `title`, e.g. `/edit/FrontPage`
    pub fn path_for(self, title: &str) -> String {
        format!("/{}/{title}", self.as_str())
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Split a request path into action and raw title, or reject it
pub fn match_path(path: &str) -> Option<(Action, &str)> {
    let caps = VALID_PATH.captures(path)?;
    let action = Action::from_segment(caps.get(1)?.as_str())?;
    Some((action, caps.get(2)?.as_str()))
}
