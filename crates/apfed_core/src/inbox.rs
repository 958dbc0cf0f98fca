/*
 * SPDX-FileCopyrightText: 2026 RedHunt07 - FEDI3 Project
 * SPDX-License-Identifier: AGPL-3.0-only
 */

//! Inbox pipeline: authentication, deduplication, and typed dispatch for
//! signed activity POSTs. Mirrors the stage order of
//! `fedi3_core::ap::inbox`, driven through the collaborator traits instead
//! of a single concrete `ApState`.

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::response::Response;
use http::StatusCode;

use crate::activity::{ActivityObject, ListenerRegistry};
use crate::collaborators::{
    ActivityParser, ActorDispatcher, ErrorHandler, FallbackResponder, KeyOwnershipPredicate,
    KeyValueStore, ProofVerifier,
};
use crate::context::RequestContext;
use crate::types::FederationTypes;

/// Default idempotency TTL.
pub const IDEMPOTENCY_TTL: Duration = Duration::from_secs(24 * 60 * 60);

fn plain_text(status: StatusCode, body: &str) -> Response {
    let mut resp = Response::new(Body::from(body.to_string()));
    *resp.status_mut() = status;
    resp
}

fn empty(status: StatusCode) -> Response {
    let mut resp = Response::new(Body::empty());
    *resp.status_mut() = status;
    resp
}

/// Registration for one inbox endpoint. The shared inbox (`handle: None`
/// at call time) and every actor-scoped inbox share the same
/// `InboxEndpoint`, differing only in the `handle` passed to
/// [`InboxEndpoint::handle`].
pub struct InboxEndpoint<T: FederationTypes> {
    pub kv_store: Arc<dyn KeyValueStore>,
    pub idempotency_prefix: String,
    pub idempotency_ttl: Duration,
    pub listeners: ListenerRegistry<T>,
    pub activity_parser: Arc<dyn ActivityParser<T>>,
    pub proof_verifier: Option<Arc<dyn ProofVerifier<T>>>,
    pub key_ownership: Arc<dyn KeyOwnershipPredicate<T>>,
    pub error_handler: Option<Arc<dyn ErrorHandler<T>>>,
    pub on_not_found: Arc<dyn FallbackResponder<T>>,
}

impl<T: FederationTypes> InboxEndpoint<T> {
    async fn notify_error(&self, ctx: &RequestContext<T>, error: anyhow::Error) {
        if let Some(handler) = self.error_handler.as_ref() {
            handler.handle(ctx, &error).await;
        }
    }

    /// Runs the full inbox pipeline. `handle` is `None` for the shared
    /// inbox, `Some(h)` for an actor-scoped one.
    pub async fn handle(&self, ctx: &RequestContext<T>, handle: Option<&str>) -> anyhow::Result<Response> {
        // Stage 1: configuration sanity.
        let Some(dispatcher) = ctx.actor_dispatcher.as_ref() else {
            tracing::warn!("inbox request received with no actor dispatcher configured");
            return Ok(self.on_not_found.respond(ctx).await);
        };
        if let Some(h) = handle {
            if dispatcher.dispatch(ctx, h).await?.is_none() {
                tracing::warn!(handle = h, "inbox request for unknown actor");
                return Ok(self.on_not_found.respond(ctx).await);
            }
        }

        // Stage 2: body parse.
        let raw: serde_json::Value = match serde_json::from_slice(ctx.body()) {
            Ok(v) => v,
            Err(e) => {
                self.notify_error(ctx, anyhow::Error::new(e).context("inbox body is not valid JSON")).await;
                return Ok(plain_text(StatusCode::BAD_REQUEST, "Invalid JSON."));
            }
        };

        // Stage 3: activity extraction via embedded proof, if configured.
        let mut via_proof = false;
        let mut activity: Option<Box<dyn ActivityObject>> = None;
        if let Some(verifier) = self.proof_verifier.as_ref() {
            match verifier.verify(ctx, &raw).await {
                Ok(Some(a)) => {
                    activity = Some(a);
                    via_proof = true;
                }
                Ok(None) => {}
                Err(e) => {
                    self.notify_error(ctx, e.context("embedded proof verification raised")).await;
                    return Ok(plain_text(StatusCode::BAD_REQUEST, "Invalid activity."));
                }
            }
        }

        // Stage 4: HTTP-signature fallback.
        let signer = if activity.is_none() {
            let signer = match ctx.resolve_signer().await {
                Ok(Some(s)) => s,
                Ok(None) => {
                    tracing::warn!("inbox request has no valid HTTP signature");
                    return Ok(plain_text(
                        StatusCode::UNAUTHORIZED,
                        "Failed to verify the request signature.",
                    ));
                }
                Err(e) => {
                    tracing::warn!(error = %e, "inbox request signature verification errored");
                    return Ok(plain_text(
                        StatusCode::UNAUTHORIZED,
                        "Failed to verify the request signature.",
                    ));
                }
            };
            match self.activity_parser.parse(ctx, &raw).await {
                Ok(a) => activity = Some(a),
                Err(e) => {
                    self.notify_error(ctx, e.context("activity deserialization failed")).await;
                    return Ok(plain_text(StatusCode::BAD_REQUEST, "Invalid activity."));
                }
            }
            Some(signer)
        } else {
            None
        };
        let activity = activity.expect("set on either the proof or the signature path above");

        // Stage 5: idempotency check.
        let idem_key = activity
            .id()
            .map(|id| vec![self.idempotency_prefix.clone(), id.to_string()]);
        if let Some(key) = idem_key.as_ref() {
            if self.kv_store.get(key).await?.unwrap_or(false) {
                let id = activity.id().expect("idem_key is only set when id() is Some");
                return Ok(plain_text(
                    StatusCode::ACCEPTED,
                    &format!("Activity <{id}> has already been processed."),
                ));
            }
        }

        // Stage 6: actor presence.
        let Some(_actor_id) = activity.actor_id() else {
            tracing::warn!("inbox activity is missing an actorId");
            return Ok(plain_text(StatusCode::BAD_REQUEST, "Missing actor."));
        };

        // Stage 7: key-actor binding, only on the HTTP-signature path.
        if let Some(signer) = signer {
            if !via_proof && !self.key_ownership.owns(activity.as_ref(), &signer.key, ctx).await? {
                tracing::warn!("inbox activity's actor does not own the signing key");
                return Ok(plain_text(
                    StatusCode::UNAUTHORIZED,
                    "The signer and the actor do not match.",
                ));
            }
        }

        // Stage 8: listener resolution.
        let Some(listener) = self.listeners.resolve(activity.as_ref()) else {
            tracing::warn!(class = activity.class_name(), "unsupported activity type, ignoring");
            return Ok(empty(StatusCode::ACCEPTED));
        };

        // Stage 9: dispatch.
        if let Err(e) = listener.handle(ctx, activity.as_ref()).await {
            self.notify_error(ctx, e.context("inbox listener failed")).await;
            return Ok(plain_text(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error."));
        }

        // Stage 10: commit.
        if let Some(key) = idem_key.as_ref() {
            self.kv_store.set(key, true, self.idempotency_ttl).await?;
        }
        tracing::debug!(class = activity.class_name(), "inbox activity dispatched");
        Ok(empty(StatusCode::ACCEPTED))
    }
}
