/*
 * SPDX-FileCopyrightText: 2026 RedHunt07 - FEDI3 Project
 * SPDX-License-Identifier: AGPL-3.0-only
 */

//! Object responder: analogous to the actor responder with two
//! differences. The dispatch key is an arbitrary route-parameter map
//! instead of a single handle, and there is no context-level slot for it
//! (unlike the actor dispatcher, which doubles as the context's
//! handle-resolver), so the dispatcher is carried on the endpoint itself.

use std::collections::HashMap;
use std::sync::Arc;

use axum::response::Response;

use crate::collaborators::{AuthorizePredicate, FallbackResponder, ObjectDispatcher};
use crate::context::RequestContext;
use crate::negotiate::accepts_json_ld;
use crate::respond::respond_with_object;
use crate::types::FederationTypes;

pub struct ObjectEndpoint<T: FederationTypes> {
    pub dispatcher: Option<Arc<dyn ObjectDispatcher<T>>>,
    pub authorize: Option<Arc<dyn AuthorizePredicate<T, HashMap<String, String>>>>,
    pub on_not_found: Arc<dyn FallbackResponder<T>>,
    pub on_not_acceptable: Arc<dyn FallbackResponder<T>>,
    pub on_unauthorized: Arc<dyn FallbackResponder<T>>,
}

impl<T: FederationTypes> ObjectEndpoint<T> {
    pub async fn respond(
        &self,
        ctx: &RequestContext<T>,
        params: &HashMap<String, String>,
    ) -> anyhow::Result<Response> {
        let Some(dispatcher) = self.dispatcher.as_ref() else {
            return Ok(self.on_not_found.respond(ctx).await);
        };

        let Some(object) = dispatcher.dispatch(ctx, params).await? else {
            return Ok(self.on_not_found.respond(ctx).await);
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
            if !authorize.authorize(ctx, key, owner, params).await? {
                return Ok(self.on_unauthorized.respond(ctx).await);
            }
        }

        respond_with_object(&object).map(|mut resp| {
            resp.headers_mut()
                .insert(http::header::VARY, http::HeaderValue::from_static("Accept"));
            resp
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collaborators::{FnFallbackResponder, FnObjectDispatcher};
    use axum::body::Body;
    use http::StatusCode;
    use serde::Serialize;

    #[derive(Debug)]
    struct TestTypes;

    #[derive(Serialize, Clone)]
    struct Note {
        id: String,
    }

    impl FederationTypes for TestTypes {
        type Data = ();
        type Actor = ();
        type Object = Note;
        type Item = ();
        type Filter = ();
        type Key = ();
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

    #[tokio::test]
    async fn no_dispatcher_is_not_found() {
        let endpoint = ObjectEndpoint::<TestTypes> {
            dispatcher: None,
            authorize: None,
            on_not_found: not_found(),
            on_not_acceptable: not_acceptable(),
            on_unauthorized: unauthorized(),
        };
        let ctx = RequestContext::new((), "https://e/notes/1".parse().unwrap(), None);
        let resp = endpoint.respond(&ctx, &HashMap::new()).await.unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn found_object_serializes_with_vary() {
        let dispatcher = Arc::new(FnObjectDispatcher(
            |_ctx: &RequestContext<TestTypes>, params: &HashMap<String, String>| {
                let id = params.get("id").cloned().unwrap_or_default();
                async move { Ok(Some(Note { id })) }
            },
        ));
        let endpoint = ObjectEndpoint {
            dispatcher: Some(dispatcher),
            authorize: None,
            on_not_found: not_found(),
            on_not_acceptable: not_acceptable(),
            on_unauthorized: unauthorized(),
        };
        let ctx = RequestContext::<TestTypes>::new((), "https://e/notes/1".parse().unwrap(), None);
        let mut params = HashMap::new();
        params.insert("id".to_string(), "https://e/notes/1".to_string());
        let resp = endpoint.respond(&ctx, &params).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers().get(http::header::VARY).unwrap(), "Accept");
    }
}
