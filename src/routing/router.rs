//! Route lookup, dispatch and reverse URL generation.
//!
//! # Responsibilities
//! - Store compiled dispatch entries and the route-name index
//! - Match a request path to its entry and parameters
//! - Hand matched requests to the resolver
//! - Build literal paths from route names
//!
//! # Design Decisions
//! - Immutable after construction (thread-safe without locks)
//! - O(n) pattern scan in declaration order, first match wins
//! - Explicit NotFound rather than silent default

use std::collections::HashMap;
use std::fmt;

use crate::layout::RenderedResponse;
use crate::routing::compiler::DispatchEntry;
use crate::routing::error::{ResolveError, ReverseError};
use crate::routing::handler::{PathParams, RequestContext};
use crate::routing::pattern::Segment;
use crate::routing::resolver;

/// Result of a successful dispatch.
#[derive(Debug)]
pub struct Dispatched {
    /// Route name, or its pattern when unnamed.
    pub route: String,
    pub response: RenderedResponse,
}

/// The compiled, read-only dispatch table.
pub struct RouterTable {
    entries: Vec<DispatchEntry>,
    names: HashMap<String, usize>,
}

impl RouterTable {
    pub(crate) fn new(entries: Vec<DispatchEntry>, names: HashMap<String, usize>) -> Self {
        Self { entries, names }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> impl Iterator<Item = &DispatchEntry> {
        self.entries.iter()
    }

    /// Look up a named route.
    pub fn get(&self, name: &str) -> Option<&DispatchEntry> {
        self.names.get(name).map(|&at| &self.entries[at])
    }

    /// Find the first entry whose pattern matches `path`.
    pub fn match_path(&self, path: &str) -> Option<(&DispatchEntry, PathParams)> {
        self.entries
            .iter()
            .find_map(|entry| entry.pattern().matches(path).map(|params| (entry, params)))
    }

    /// Match `ctx.path` and resolve it into a rendered response.
    pub fn dispatch(&self, ctx: &RequestContext) -> Result<Dispatched, ResolveError> {
        let (entry, params) = self
            .match_path(&ctx.path)
            .ok_or_else(|| ResolveError::NotFound {
                path: ctx.path.clone(),
            })?;

        tracing::debug!(
            route = %entry.label(),
            path = %ctx.path,
            params = params.len(),
            "Route matched"
        );

        let response = resolver::resolve(entry, ctx, &params)?;
        Ok(Dispatched {
            route: entry.label().to_string(),
            response,
        })
    }

    /// Substitute `params` into the pattern of the route called `name`.
    ///
    /// Parameters the pattern does not use are ignored.
    pub fn reverse<I, K, V>(&self, name: &str, params: I) -> Result<String, ReverseError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: ToString,
    {
        let entry = self
            .get(name)
            .ok_or_else(|| ReverseError::RouteNotFound(name.to_string()))?;

        let supplied: HashMap<String, String> = params
            .into_iter()
            .map(|(key, value)| (key.as_ref().to_string(), value.to_string()))
            .collect();

        let mut path = String::new();
        for segment in entry.pattern().segments() {
            match segment {
                Segment::Literal(literal) => path.push_str(literal),
                Segment::Param { name: param, kind } => {
                    let value =
                        supplied
                            .get(param)
                            .ok_or_else(|| ReverseError::MissingParameter {
                                route: name.to_string(),
                                name: param.clone(),
                            })?;
                    if !kind.reversible(value) {
                        return Err(ReverseError::InvalidParameter {
                            route: name.to_string(),
                            name: param.clone(),
                            kind: kind.as_str(),
                            value: value.clone(),
                        });
                    }
                    path.push_str(value);
                }
            }
        }
        Ok(path)
    }
}

impl fmt::Debug for RouterTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouterTable")
            .field("entries", &self.entries)
            .finish()
    }
}
