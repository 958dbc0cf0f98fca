/*
 * SPDX-FileCopyrightText: 2026 RedHunt07 - FEDI3 Project
 * SPDX-License-Identifier: AGPL-3.0-only
 */

//! Actor responder: resolve a handle to an actor via the context's
//! handle-resolver, negotiate, authorize, serialize. The
//! 404-vs-406-vs-401 precedence is hardcoded.

use std::sync::Arc;

use axum::response::Response;

use crate::collaborators::{AuthorizePredicate, FallbackResponder};
use crate::context::RequestContext;
use crate::negotiate::accepts_json_ld;
use crate::respond::respond_with_object;
use crate::types::FederationTypes;

/// Registration for one actor endpoint. The dispatcher itself lives on
/// `RequestContext::actor_dispatcher`.
pub struct ActorEndpoint<T: FederationTypes> {
    pub authorize: Option<Arc<dyn AuthorizePredicate<T, str>>>,
    pub on_not_found: Arc<dyn FallbackResponder<T>>,
    pub on_not_acceptable: Arc<dyn FallbackResponder<T>>,
    pub on_unauthorized: Arc<dyn FallbackResponder<T>>,
}

impl<T: FederationTypes> ActorEndpoint<T> {
    pub async fn respond(&self, ctx: &RequestContext<T>, handle: &str) -> anyhow::Result<Response> {
        let Some(dispatcher) = ctx.actor_dispatcher.as_ref() else {
            return Ok(self.on_not_found.respond(ctx).await);
        };

        let Some(actor) = dispatcher.dispatch(ctx, handle).await? else {
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
            if !authorize.authorize(ctx, key, owner, handle).await? {
                return Ok(self.on_unauthorized.respond(ctx).await);
            }
        }

        respond_with_object(&actor).map(|mut resp| {
            resp.headers_mut()
                .insert(http::header::VARY, http::HeaderValue::from_static("Accept"));
            resp
        })
    }
}
