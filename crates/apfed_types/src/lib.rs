/*
 * SPDX-FileCopyrightText: 2026 RedHunt07 - FEDI3 Project
 * SPDX-License-Identifier: AGPL-3.0-only
 */

//! Wire-level projection types shared by the federation dispatch core and
//! whatever transport crate embeds it. These are plain data: no dispatch
//! logic lives here, the same way `RelayHttpRequest`/`RelayHttpResponse`
//! carried only bytes-on-the-wire shapes for the relay protocol.

use serde::Serialize;

/// One page returned by a collection dispatcher, before it has been
/// wrapped in `OrderedCollectionPage` and given `prev`/`next`/`partOf`.
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub prev_cursor: Option<String>,
    pub next_cursor: Option<String>,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>) -> Self {
        Self {
            items,
            prev_cursor: None,
            next_cursor: None,
        }
    }

    pub fn with_cursors(mut self, prev: Option<String>, next: Option<String>) -> Self {
        self.prev_cursor = prev;
        self.next_cursor = next;
        self
    }
}

/// Summary form of a collection: either the degenerate inline form (no
/// cursoring offered, `items` populated directly) or the cursoring summary
/// (`first`/`last` links, no `items`).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderedCollection<T> {
    #[serde(rename = "@context")]
    pub context: &'static str,
    #[serde(rename = "type")]
    pub kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_items: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<T>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last: Option<String>,
}

impl<T> OrderedCollection<T> {
    pub const AS_CONTEXT: &'static str = "https://www.w3.org/ns/activitystreams";

    pub fn inline(items: Vec<T>, total_items: Option<u64>) -> Self {
        Self {
            context: Self::AS_CONTEXT,
            kind: "OrderedCollection",
            total_items,
            items: Some(items),
            first: None,
            last: None,
        }
    }

    /// `total_items` is `None` when the counter callback is absent or
    /// itself returns null. An unconditional `Number(totalItems)` coercion
    /// would yield `NaN` in that case; this omits the field instead.
    pub fn summary(total_items: Option<u64>, first: String, last: Option<String>) -> Self {
        Self {
            context: Self::AS_CONTEXT,
            kind: "OrderedCollection",
            total_items,
            items: None,
            first: Some(first),
            last,
        }
    }
}

/// A specific, concrete page of a collection.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderedCollectionPage<T> {
    #[serde(rename = "@context")]
    pub context: &'static str,
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub items: Vec<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prev: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next: Option<String>,
    pub part_of: String,
}

impl<T> OrderedCollectionPage<T> {
    pub fn new(items: Vec<T>, prev: Option<String>, next: Option<String>, part_of: String) -> Self {
        Self {
            context: OrderedCollection::<T>::AS_CONTEXT,
            kind: "OrderedCollectionPage",
            items,
            prev,
            next,
            part_of,
        }
    }
}

/// A projected collection item: the dispatcher's raw item normalized per
/// the item-projection rule (object/link/URL kept as-is, other entities
/// reduced to their `id`).
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum ProjectedItem<T> {
    Value(T),
    Id(String),
}
