//! Layout fragments and terminal content.
//!
//! # Responsibilities
//! - Represent a layout as a pre/post string pair
//! - Compose fragments (outer wraps inner)
//! - Fill a fragment with final content
//! - Split a rendered layout template at its outlet marker
//!
//! # Design Decisions
//! - `compose` is associative with `LayoutFragment::identity()` as its unit
//! - The post half composes in reverse order, so the root's post ends up last
//! - An outlet must appear exactly once; a pair can only place the child once

use std::fmt;

use thiserror::Error;

/// Marker a layout template emits where child content belongs.
pub const DEFAULT_OUTLET: &str = "<temploco-outlet></temploco-outlet>";

/// Errors produced when splitting a rendered layout at its outlet.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OutletError {
    #[error("layout does not contain the outlet marker `{0}`")]
    Missing(String),

    #[error("layout contains the outlet marker `{0}` more than once")]
    Repeated(String),
}

/// A prefix/suffix wrapper contributed by a layout route.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct LayoutFragment {
    pre: String,
    post: String,
}

impl LayoutFragment {
    pub fn new(pre: impl Into<String>, post: impl Into<String>) -> Self {
        Self {
            pre: pre.into(),
            post: post.into(),
        }
    }

    /// The empty wrapper. Composing with it on either side is a no-op.
    pub fn identity() -> Self {
        Self::default()
    }

    /// Split a rendered layout around the single occurrence of `marker`.
    pub fn from_outlet(rendered: &str, marker: &str) -> Result<Self, OutletError> {
        let mut hits = rendered.match_indices(marker);
        match (hits.next(), hits.next()) {
            (None, _) => Err(OutletError::Missing(marker.to_string())),
            (Some((at, _)), None) => Ok(Self::new(
                &rendered[..at],
                &rendered[at + marker.len()..],
            )),
            (Some(_), Some(_)) => Err(OutletError::Repeated(marker.to_string())),
        }
    }

    pub fn pre(&self) -> &str {
        &self.pre
    }

    pub fn post(&self) -> &str {
        &self.post
    }

    pub fn is_identity(&self) -> bool {
        self.pre.is_empty() && self.post.is_empty()
    }

    /// Wrap `inner` inside `self`.
    pub fn compose(&self, inner: &LayoutFragment) -> LayoutFragment {
        let mut pre = String::with_capacity(self.pre.len() + inner.pre.len());
        pre.push_str(&self.pre);
        pre.push_str(&inner.pre);

        let mut post = String::with_capacity(inner.post.len() + self.post.len());
        post.push_str(&inner.post);
        post.push_str(&self.post);

        LayoutFragment { pre, post }
    }

    /// Place `content` between the two halves.
    pub fn fill(&self, content: &str) -> String {
        let mut out = String::with_capacity(self.pre.len() + content.len() + self.post.len());
        out.push_str(&self.pre);
        out.push_str(content);
        out.push_str(&self.post);
        out
    }

    pub fn fill_content(&self, content: &ContentValue) -> ContentValue {
        ContentValue(self.fill(content.as_str()))
    }
}

/// Final body text produced by a leaf view.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ContentValue(String);

impl ContentValue {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl From<String> for ContentValue {
    fn from(text: String) -> Self {
        Self(text)
    }
}

impl From<&str> for ContentValue {
    fn from(text: &str) -> Self {
        Self(text.to_string())
    }
}

impl fmt::Display for ContentValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
