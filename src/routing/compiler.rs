//! Route tree compilation.
//!
//! # Responsibilities
//! - Walk the route tree depth-first, once, at startup
//! - Build each view's full path pattern and ancestor layout chain
//! - Record how many parameters each layout may see
//! - Reject malformed trees before any request is served
//!
//! # Design Decisions
//! - Children are visited in declaration order; first match wins later
//! - A `/` at a segment join is never doubled
//! - Every full pattern is anchored at `/`
//! - All tree-derived data is precomputed so requests never walk the tree

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::routing::error::CompileError;
use crate::routing::handler::{LayoutHandler, ViewHandler};
use crate::routing::node::RouteNode;
use crate::routing::pattern::PathPattern;
use crate::routing::router::RouterTable;

/// Which path parameters an ancestor layout is allowed to see.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutScope {
    /// Only parameters captured at or above the layout's own depth.
    #[default]
    Strict,
    /// Every parameter of the matched path.
    Full,
}

#[derive(Debug, Clone, Default)]
pub struct CompileOptions {
    pub layout_scope: LayoutScope,
}

/// A layout handler in a dispatch chain.
#[derive(Clone)]
pub(crate) struct LayoutLink {
    pub(crate) handler: Arc<dyn LayoutHandler>,
    pub(crate) depth: usize,
    /// Number of leading path parameters in scope for this handler.
    pub(crate) visible: usize,
}

/// One addressable route: its pattern, layout chain and view.
pub struct DispatchEntry {
    pattern: PathPattern,
    layouts: Vec<LayoutLink>,
    view: Arc<dyn ViewHandler>,
    name: Option<String>,
}

impl DispatchEntry {
    pub fn pattern(&self) -> &PathPattern {
        &self.pattern
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// The route name, or the pattern for unnamed routes.
    pub fn label(&self) -> &str {
        self.name.as_deref().unwrap_or_else(|| self.pattern.as_str())
    }

    pub fn layout_count(&self) -> usize {
        self.layouts.len()
    }

    /// Depth of each layout in the chain, root first.
    pub fn layout_depths(&self) -> impl Iterator<Item = usize> + '_ {
        self.layouts.iter().map(|link| link.depth)
    }

    pub(crate) fn layouts(&self) -> &[LayoutLink] {
        &self.layouts
    }

    pub(crate) fn view(&self) -> &dyn ViewHandler {
        self.view.as_ref()
    }
}

impl fmt::Debug for DispatchEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DispatchEntry")
            .field("pattern", &self.pattern.as_str())
            .field("name", &self.name)
            .field("layouts", &self.layouts.len())
            .finish()
    }
}

/// Compiles a route tree into an immutable [`RouterTable`].
#[derive(Debug, Clone, Default)]
pub struct RouteCompiler {
    options: CompileOptions,
}

impl RouteCompiler {
    pub fn new(options: CompileOptions) -> Self {
        Self { options }
    }

    pub fn compile(&self, root: &RouteNode) -> Result<RouterTable, CompileError> {
        let mut walk = Walk {
            scope: self.options.layout_scope,
            entries: Vec::new(),
            index: HashMap::new(),
            seen_names: HashSet::new(),
        };
        walk.visit(root, 0, "", &[], &[])?;

        tracing::info!(
            routes = walk.entries.len(),
            names = walk.index.len(),
            layout_scope = ?self.options.layout_scope,
            "Route table compiled"
        );

        Ok(RouterTable::new(walk.entries, walk.index))
    }
}

struct Walk {
    scope: LayoutScope,
    entries: Vec<DispatchEntry>,
    index: HashMap<String, usize>,
    seen_names: HashSet<String>,
}

impl Walk {
    fn visit(
        &mut self,
        node: &RouteNode,
        depth: usize,
        prefix: &str,
        chain: &[LayoutLink],
        params: &[String],
    ) -> Result<(), CompileError> {
        let path = join_segment(prefix, &node.path);

        let own = PathPattern::parse(&node.path).map_err(|source| CompileError::InvalidPattern {
            path: anchor(&path),
            source,
        })?;
        let mut params = params.to_vec();
        for name in own.param_names() {
            if params.iter().any(|seen| seen == name) {
                return Err(CompileError::DuplicateParameter {
                    name: name.to_string(),
                    path: anchor(&path),
                });
            }
            params.push(name.to_string());
        }

        if let Some(name) = &node.name {
            if !self.seen_names.insert(name.clone()) {
                return Err(CompileError::DuplicateRouteName { name: name.clone() });
            }
        }

        let mut chain = chain.to_vec();
        if let Some(handler) = &node.layout {
            chain.push(LayoutLink {
                handler: Arc::clone(handler),
                depth,
                visible: params.len(),
            });
        }

        match (&node.view, node.children.is_empty()) {
            (Some(_), false) => Err(CompileError::AmbiguousRoute { path: anchor(&path) }),
            (None, false) => {
                if let Some(name) = &node.name {
                    tracing::warn!(
                        route = %name,
                        path = %anchor(&path),
                        "Name on a branch route is reserved but cannot be reversed"
                    );
                }
                for child in &node.children {
                    self.visit(child, depth + 1, &path, &chain, &params)?;
                }
                Ok(())
            }
            (Some(view), true) => {
                self.emit(anchor(&path), chain, Arc::clone(view), node.name.clone())
            }
            (None, true) => {
                if node.name.is_some() || node.layout.is_none() {
                    return Err(CompileError::UnreachableRoute { path: anchor(&path) });
                }
                tracing::debug!(path = %anchor(&path), "Skipping layout-only route without descendants");
                Ok(())
            }
        }
    }

    fn emit(
        &mut self,
        path: String,
        mut layouts: Vec<LayoutLink>,
        view: Arc<dyn ViewHandler>,
        name: Option<String>,
    ) -> Result<(), CompileError> {
        let pattern = PathPattern::parse(&path)
            .map_err(|source| CompileError::InvalidPattern { path, source })?;

        if self.scope == LayoutScope::Full {
            let total = pattern.param_count();
            for link in &mut layouts {
                link.visible = total;
            }
        }

        tracing::debug!(
            route = name.as_deref().unwrap_or("-"),
            pattern = %pattern.as_str(),
            layouts = layouts.len(),
            "Route compiled"
        );

        if let Some(name) = &name {
            self.index.insert(name.clone(), self.entries.len());
        }
        self.entries.push(DispatchEntry {
            pattern,
            layouts,
            view,
            name,
        });
        Ok(())
    }
}

fn join_segment(prefix: &str, segment: &str) -> String {
    match segment.strip_prefix('/') {
        Some(tail) if prefix.ends_with('/') => format!("{prefix}{tail}"),
        _ => format!("{prefix}{segment}"),
    }
}

fn anchor(path: &str) -> String {
    if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{path}")
    }
}
