/*
 * SPDX-FileCopyrightText: 2026 RedHunt07 - FEDI3 Project
 * SPDX-License-Identifier: AGPL-3.0-only
 */

//! Collection responder and item projection. Produces either a cursoring
//! or inline `OrderedCollection` summary, or a concrete
//! `OrderedCollectionPage`, with stable `prev`/`next`/`partOf` link
//! rewriting and a filter contract that warns at most once per response
//! when it silently drops items.

use std::sync::Arc;

use apfed_types::{OrderedCollection, OrderedCollectionPage, ProjectedItem};
use axum::response::Response;
use serde::Serialize;

use crate::collaborators::{AuthorizePredicate, CollectionDispatcher, CounterCallback, CursorCallback, FallbackResponder};
use crate::context::RequestContext;
use crate::negotiate::accepts_json_ld;
use crate::respond::json_ld_response;
use crate::types::FederationTypes;

/// What an item's shape requires of it for projection purposes.
/// `Object`/`Link`/raw URL values pass through unprojected; anything else
/// reduces to its `id`, or is dropped if it has none.
pub trait CollectionItem: Send + Sync {
    fn is_passthrough(&self) -> bool;
    fn id(&self) -> Option<&str>;
}

/// Project and filter a dispatcher's raw page of items. At most one
/// `tracing::warn!` is emitted per call, the first time the filter drops
/// an item.
fn project_and_filter<I: CollectionItem>(
    items: Vec<I>,
    filter: Option<&(dyn Fn(&I) -> bool + Send + Sync)>,
    collection_name: &str,
) -> Vec<ProjectedItem<I>> {
    let mut warned = false;
    let mut out = Vec::with_capacity(items.len());
    for item in items {
        if let Some(f) = filter {
            if !f(&item) {
                if !warned {
                    tracing::warn!(
                        collection = collection_name,
                        "collection apparently does not implement filtering; may result in large payload"
                    );
                    warned = true;
                }
                continue;
            }
        }
        if item.is_passthrough() {
            out.push(ProjectedItem::Value(item));
        } else if let Some(id) = item.id() {
            out.push(ProjectedItem::Id(id.to_string()));
        }
    }
    out
}

fn url_with_cursor(base: &url::Url, cursor: &str) -> String {
    let mut out = base.clone();
    let pairs: Vec<(String, String)> = out
        .query_pairs()
        .into_owned()
        .filter(|(k, _)| k != "cursor")
        .collect();
    out.query_pairs_mut()
        .clear()
        .extend_pairs(pairs)
        .append_pair("cursor", cursor);
    out.to_string()
}

fn url_without_cursor(base: &url::Url) -> String {
    let mut out = base.clone();
    let pairs: Vec<(String, String)> = out
        .query_pairs()
        .into_owned()
        .filter(|(k, _)| k != "cursor")
        .collect();
    if pairs.is_empty() {
        out.set_query(None);
    } else {
        out.query_pairs_mut().clear().extend_pairs(pairs);
    }
    out.to_string()
}

#[derive(Serialize)]
#[serde(untagged)]
enum CollectionPayload<I: Serialize> {
    Collection(OrderedCollection<ProjectedItem<I>>),
    Page(OrderedCollectionPage<ProjectedItem<I>>),
}

/// Registration for one actor-scoped collection endpoint (followers,
/// following, outbox, etc). `name` is used only for diagnostics.
pub struct CollectionEndpoint<T: FederationTypes> {
    pub name: &'static str,
    pub dispatcher: Option<Arc<dyn CollectionDispatcher<T>>>,
    pub first_cursor: Option<Arc<dyn CursorCallback<T>>>,
    pub last_cursor: Option<Arc<dyn CursorCallback<T>>>,
    pub counter: Option<Arc<dyn CounterCallback<T>>>,
    pub authorize: Option<Arc<dyn AuthorizePredicate<T, str>>>,
    pub on_not_found: Arc<dyn FallbackResponder<T>>,
    pub on_not_acceptable: Arc<dyn FallbackResponder<T>>,
    pub on_unauthorized: Arc<dyn FallbackResponder<T>>,
}

impl<T: FederationTypes> CollectionEndpoint<T> {
    pub async fn respond(
        &self,
        ctx: &RequestContext<T>,
        handle: &str,
        filter: Option<&T::Filter>,
        item_filter: Option<&(dyn Fn(&T::Item) -> bool + Send + Sync)>,
    ) -> anyhow::Result<Response> {
        let Some(dispatcher) = self.dispatcher.as_ref() else {
            return Ok(self.on_not_found.respond(ctx).await);
        };

        let cursor = ctx
            .request_url
            .query_pairs()
            .find(|(k, _)| k == "cursor")
            .map(|(_, v)| v.into_owned());

        let payload = match cursor {
            None => {
                let first = match self.first_cursor.as_ref() {
                    Some(cb) => cb.cursor(ctx, handle).await?,
                    None => None,
                };
                let total_items = match self.counter.as_ref() {
                    Some(cb) => cb.count(ctx, handle).await?,
                    None => None,
                };

                match first {
                    None => {
                        let Some(page) = dispatcher.dispatch(ctx, handle, None, filter).await? else {
                            return Ok(self.on_not_found.respond(ctx).await);
                        };
                        let items = project_and_filter(page.items, item_filter, self.name);
                        CollectionPayload::Collection(OrderedCollection::inline(items, total_items))
                    }
                    Some(first) => {
                        let last = match self.last_cursor.as_ref() {
                            Some(cb) => cb.cursor(ctx, handle).await?,
                            None => None,
                        };
                        let first_url = url_with_cursor(&ctx.request_url, &first);
                        let last_url = last.map(|c| url_with_cursor(&ctx.request_url, &c));
                        CollectionPayload::Collection(OrderedCollection::summary(total_items, first_url, last_url))
                    }
                }
            }
            Some(cursor) => {
                let Some(page) = dispatcher.dispatch(ctx, handle, Some(&cursor), filter).await? else {
                    return Ok(self.on_not_found.respond(ctx).await);
                };
                let items = project_and_filter(page.items, item_filter, self.name);
                let prev = page.prev_cursor.as_deref().map(|c| url_with_cursor(&ctx.request_url, c));
                let next = page.next_cursor.as_deref().map(|c| url_with_cursor(&ctx.request_url, c));
                let part_of = url_without_cursor(&ctx.request_url);
                CollectionPayload::Page(OrderedCollectionPage::new(items, prev, next, part_of))
            }
        };

        if !accepts_json_ld(ctx.headers()) {
            return Ok(self.on_not_acceptable.respond(ctx).await);
        }

        if let Some(authorize) = self.authorize.as_ref() {
            let signer = ctx.resolve_signer().await?;
            let (key, owner) = match signer {
                Some(s) => (Some(&s.key), Some(&s.owner)),
                None => (None, None),
            };
            if !authorize.authorize(ctx, key, owner, handle).await? {
                return Ok(self.on_unauthorized.respond(ctx).await);
            }
        }

        json_ld_response(&payload, true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collaborators::{FnCollectionDispatcher, FnCounterCallback, FnCursorCallback, FnFallbackResponder};
    use apfed_types::Page;
    use axum::body::Body;
    use http::StatusCode;

    #[derive(Debug)]
    struct TestTypes;

    #[derive(Serialize, Clone)]
    struct Item {
        url: String,
        id: Option<String>,
        passthrough: bool,
    }

    impl CollectionItem for Item {
        fn is_passthrough(&self) -> bool {
            self.passthrough
        }
        fn id(&self) -> Option<&str> {
            self.id.as_deref()
        }
    }

    impl FederationTypes for TestTypes {
        type Data = ();
        type Actor = ();
        type Object = ();
        type Item = Item;
        type Filter = ();
        type Key = ();
    }

    fn passthrough(url: &str) -> Item {
        Item { url: url.to_string(), id: None, passthrough: true }
    }

    fn not_found() -> Arc<dyn FallbackResponder<TestTypes>> {
        Arc::new(FnFallbackResponder(|_ctx: &RequestContext<TestTypes>| async {
            Response::builder().status(StatusCode::NOT_FOUND).body(Body::empty()).unwrap()
        }))
    }
    fn not_acceptable() -> Arc<dyn FallbackResponder<TestTypes>> {
        Arc::new(FnFallbackResponder(|_ctx: &RequestContext<TestTypes>| async {
            Response::builder().status(StatusCode::NOT_ACCEPTABLE).body(Body::empty()).unwrap()
        }))
    }
    fn unauthorized() -> Arc<dyn FallbackResponder<TestTypes>> {
        Arc::new(FnFallbackResponder(|_ctx: &RequestContext<TestTypes>| async {
            Response::builder().status(StatusCode::UNAUTHORIZED).body(Body::empty()).unwrap()
        }))
    }

    #[test]
    fn projection_drops_ownerless_entities_and_reduces_others_to_id() {
        let items = vec![
            passthrough("https://e/u1"),
            Item { url: String::new(), id: Some("https://e/o2".into()), passthrough: false },
            Item { url: String::new(), id: None, passthrough: false },
        ];
        let out = project_and_filter(items, None, "outbox");
        assert_eq!(out.len(), 2);
        matches!(out[0], ProjectedItem::Value(_));
        matches!(&out[1], ProjectedItem::Id(id) if id == "https://e/o2");
    }

    #[tokio::test]
    async fn summary_with_cursoring_builds_first_and_last_links() {
        let dispatcher = Arc::new(FnCollectionDispatcher(
            |_ctx: &RequestContext<TestTypes>, _handle: &str, _cursor: Option<&str>, _filter: Option<&()>| async {
                Ok(Some(Page::new(vec![])))
            },
        ));
        let first = Arc::new(FnCursorCallback(|_ctx: &RequestContext<TestTypes>, _h: &str| async { Ok(Some("c0".to_string())) }));
        let last = Arc::new(FnCursorCallback(|_ctx: &RequestContext<TestTypes>, _h: &str| async { Ok(Some("c9".to_string())) }));
        let counter = Arc::new(FnCounterCallback(|_ctx: &RequestContext<TestTypes>, _h: &str| async { Ok(Some(42)) }));

        let endpoint = CollectionEndpoint {
            name: "outbox",
            dispatcher: Some(dispatcher),
            first_cursor: Some(first),
            last_cursor: Some(last),
            counter: Some(counter),
            authorize: None,
            on_not_found: not_found(),
            on_not_acceptable: not_acceptable(),
            on_unauthorized: unauthorized(),
        };
        let ctx = RequestContext::<TestTypes>::new((), "https://h/x?a=1".parse().unwrap(), None);
        let resp = endpoint.respond(&ctx, "alice", None, None).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let body = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let v: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(v["totalItems"], 42);
        assert_eq!(v["first"], "https://h/x?a=1&cursor=c0");
        assert_eq!(v["last"], "https://h/x?a=1&cursor=c9");
        assert!(v.get("items").is_none());
    }

    #[tokio::test]
    async fn page_request_builds_prev_next_partof() {
        let dispatcher = Arc::new(FnCollectionDispatcher(
            |_ctx: &RequestContext<TestTypes>, _handle: &str, _cursor: Option<&str>, _filter: Option<&()>| async {
                Ok(Some(
                    Page::new(vec![passthrough("u1")]).with_cursors(Some("p4".into()), Some("p6".into())),
                ))
            },
        ));
        let endpoint = CollectionEndpoint {
            name: "outbox",
            dispatcher: Some(dispatcher),
            first_cursor: None,
            last_cursor: None,
            counter: None,
            authorize: None,
            on_not_found: not_found(),
            on_not_acceptable: not_acceptable(),
            on_unauthorized: unauthorized(),
        };
        let ctx = RequestContext::<TestTypes>::new((), "https://h/x?cursor=p5".parse().unwrap(), None);
        let resp = endpoint.respond(&ctx, "alice", None, None).await.unwrap();
        let body = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let v: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(v["partOf"], "https://h/x");
        assert_eq!(v["prev"], "https://h/x?cursor=p4");
        assert_eq!(v["next"], "https://h/x?cursor=p6");
    }

    #[tokio::test]
    async fn missing_dispatcher_is_not_found() {
        let endpoint = CollectionEndpoint::<TestTypes> {
            name: "outbox",
            dispatcher: None,
            first_cursor: None,
            last_cursor: None,
            counter: None,
            authorize: None,
            on_not_found: not_found(),
            on_not_acceptable: not_acceptable(),
            on_unauthorized: unauthorized(),
        };
        let ctx = RequestContext::<TestTypes>::new((), "https://h/x".parse().unwrap(), None);
        let resp = endpoint.respond(&ctx, "alice", None, None).await.unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}
