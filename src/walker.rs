// Copyright 2025 Cowboy AI, LLC.

//! Depth-first subtree traversal
//!
//! ```text
//! A            yields: A, B, D, E, C
//! ├── B
//! │   ├── D
//! │   └── E
//! └── C
//! ```
//!
//! Traversal keeps an explicit stack of pending elements, so tree depth never
//! grows the call stack. Children are requested from the host only when their
//! parent is yielded.

use crate::config::ScanLimits;
use crate::host::ModelHost;
use crate::model::Element;

/// Lazy pre-order walk over an element and all of its descendants
pub struct SubtreeWalker<'h, H: ModelHost + ?Sized> {
    host: &'h H,
    root: Element,
    stack: Vec<Element>,
    limit: Option<usize>,
    yielded: usize,
}

impl<'h, H: ModelHost + ?Sized> SubtreeWalker<'h, H> {
    /// Walk `root` and everything below it
    pub fn new(host: &'h H, root: Element) -> Self {
        Self {
            host,
            stack: vec![root.clone()],
            root,
            limit: None,
            yielded: 0,
        }
    }

    /// Stop after `limit` elements (the root counts); `None` walks everything
    pub fn with_limit(mut self, limit: Option<usize>) -> Self {
        self.limit = limit;
        self
    }

    /// A fresh walk over the same subtree
    pub fn restart(&self) -> Self {
        Self::new(self.host, self.root.clone()).with_limit(self.limit)
    }

    /// Number of elements yielded so far
    pub fn yielded(&self) -> usize {
        self.yielded
    }
}

impl<H: ModelHost + ?Sized> Clone for SubtreeWalker<'_, H> {
    fn clone(&self) -> Self {
        Self {
            host: self.host,
            root: self.root.clone(),
            stack: self.stack.clone(),
            limit: self.limit,
            yielded: self.yielded,
        }
    }
}

impl<H: ModelHost + ?Sized> Iterator for SubtreeWalker<'_, H> {
    type Item = Element;

    fn next(&mut self) -> Option<Self::Item> {
        if self.limit.is_some_and(|limit| self.yielded >= limit) {
            return None;
        }

        let element = self.stack.pop()?;
        if let Some(children) = self.host.children(&element) {
            self.stack.extend(children.into_iter().rev());
        }
        self.yielded += 1;
        Some(element)
    }
}

/// Walk several roots in order, honouring both scan caps
pub fn walk_roots<'h, H: ModelHost + ?Sized>(
    host: &'h H,
    roots: &'h [Element],
    limits: ScanLimits,
) -> impl Iterator<Item = Element> + 'h {
    roots
        .iter()
        .take(limits.max_roots.unwrap_or(usize::MAX))
        .flat_map(move |root| {
            SubtreeWalker::new(host, root.clone()).with_limit(limits.max_descendants_per_root)
        })
}
