// Copyright 2025 the Strewn Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Bookkeeping for placed labels.

use strewn_view_tree::{Color, Tree};
use tracing::debug;

use crate::attach::AttachmentManager;
use crate::decorator::Decorator;
use crate::geometry::IntRect;
use crate::region::Region;

/// Stable identifier of a placed label.
///
/// Handles are never reused, so a handle from before a [`LabelRegistry::clear`] simply stops
/// resolving.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LabelHandle(u64);

/// A placed label.
#[derive(Clone, Debug, PartialEq)]
pub struct LabelRecord {
    /// Text shown by the label.
    pub message: String,
    /// Background fill the label was created with.
    pub background: Color,
    /// Horizontal offset from the container origin, in pixels.
    pub x: i32,
    /// Vertical offset from the container origin, in pixels.
    pub y: i32,
    /// Region the label was sampled from. A degenerate placement keeps the selected region
    /// even though the label sits at the container origin.
    pub region: Region,
    /// The attached decorator.
    pub decorator: Decorator,
}

impl LabelRecord {
    /// The label's anchor point as a zero-area rectangle in the container's coordinate space.
    pub fn absolute(&self, container: IntRect) -> IntRect {
        IntRect::point(container.left + self.x, container.top + self.y)
    }
}

/// Ordered collection of the labels placed in the current session.
#[derive(Clone, Debug, Default)]
pub struct LabelRegistry {
    records: Vec<(LabelHandle, LabelRecord)>,
    next: u64,
}

impl LabelRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a placed label.
    pub fn register(&mut self, record: LabelRecord) -> LabelHandle {
        let handle = LabelHandle(self.next);
        self.next += 1;
        self.records.push((handle, record));
        handle
    }

    /// Look up a label.
    pub fn get(&self, handle: LabelHandle) -> Option<&LabelRecord> {
        self.records
            .iter()
            .find(|(h, _)| *h == handle)
            .map(|(_, r)| r)
    }

    /// Labels in placement order.
    pub fn records(&self) -> impl ExactSizeIterator<Item = (LabelHandle, &LabelRecord)> + '_ {
        self.records.iter().map(|(h, r)| (*h, r))
    }

    /// Number of labels.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether no label is placed.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Detach every label's decorator through `manager` and forget all records.
    ///
    /// Returns the number of records dropped; clearing an empty registry does nothing.
    pub fn clear(&mut self, tree: &mut Tree, manager: &mut AttachmentManager) -> usize {
        if self.records.is_empty() {
            return 0;
        }
        let cleared = self.records.len();
        for (_, record) in self.records.drain(..) {
            manager.detach(tree, record.decorator);
        }
        debug!(cleared, "cleared labels");
        cleared
    }
}
