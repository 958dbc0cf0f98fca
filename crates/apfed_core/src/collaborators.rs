/*
 * SPDX-FileCopyrightText: 2026 RedHunt07 - FEDI3 Project
 * SPDX-License-Identifier: AGPL-3.0-only
 */

//! The external-collaborator seams. None of these are implemented here;
//! the ActivityStreams vocabulary, HTTP-signature primitives, JSON-LD
//! proof verification, key-value store, and document loader stay out of
//! tree. This module only declares the traits the dispatch core calls
//! through, plus thin closure adapters so a `FederationConfigBuilder` can
//! be wired up with `async move { .. }` blocks instead of named types,
//! the same trade `fedi3_core::object_fetch::ObjectFetchWorker` makes by
//! taking plain closures for its retry bodies.

use std::collections::HashMap;
use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use axum::response::Response;
use http::{HeaderMap, Method, Uri};

use crate::activity::ActivityObject;
use crate::context::RequestContext;
use crate::types::FederationTypes;

/// One of the three caller-supplied fallback responses a responder falls
/// back to (`onNotFound`/`onNotAcceptable`/`onUnauthorized`). Modeled as a
/// collaborator rather than a bare closure type so it can be stored behind
/// `Arc<dyn ..>` in a `FederationConfig` alongside the rest.
#[async_trait]
pub trait FallbackResponder<T: FederationTypes>: Send + Sync {
    async fn respond(&self, ctx: &RequestContext<T>) -> Response;
}

pub struct FnFallbackResponder<F>(pub F);

#[async_trait]
impl<T, F, Fut> FallbackResponder<T> for FnFallbackResponder<F>
where
    T: FederationTypes,
    F: Fn(&RequestContext<T>) -> Fut + Send + Sync,
    Fut: Future<Output = Response> + Send,
{
    async fn respond(&self, ctx: &RequestContext<T>) -> Response {
        (self.0)(ctx).await
    }
}

/// `(context, handle) -> actor | null`.
#[async_trait]
pub trait ActorDispatcher<T: FederationTypes>: Send + Sync {
    async fn dispatch(&self, ctx: &RequestContext<T>, handle: &str) -> anyhow::Result<Option<T::Actor>>;
}

pub struct FnActorDispatcher<F>(pub F);

#[async_trait]
impl<T, F, Fut> ActorDispatcher<T> for FnActorDispatcher<F>
where
    T: FederationTypes,
    F: Fn(&RequestContext<T>, &str) -> Fut + Send + Sync,
    Fut: Future<Output = anyhow::Result<Option<T::Actor>>> + Send,
{
    async fn dispatch(&self, ctx: &RequestContext<T>, handle: &str) -> anyhow::Result<Option<T::Actor>> {
        (self.0)(ctx, handle).await
    }
}

/// `(context, paramMap) -> object | null`.
#[async_trait]
pub trait ObjectDispatcher<T: FederationTypes>: Send + Sync {
    async fn dispatch(
        &self,
        ctx: &RequestContext<T>,
        params: &HashMap<String, String>,
    ) -> anyhow::Result<Option<T::Object>>;
}

pub struct FnObjectDispatcher<F>(pub F);

#[async_trait]
impl<T, F, Fut> ObjectDispatcher<T> for FnObjectDispatcher<F>
where
    T: FederationTypes,
    F: Fn(&RequestContext<T>, &HashMap<String, String>) -> Fut + Send + Sync,
    Fut: Future<Output = anyhow::Result<Option<T::Object>>> + Send,
{
    async fn dispatch(
        &self,
        ctx: &RequestContext<T>,
        params: &HashMap<String, String>,
    ) -> anyhow::Result<Option<T::Object>> {
        (self.0)(ctx, params).await
    }
}

/// `(context, handle, cursor|null, filter) -> Page | null`.
#[async_trait]
pub trait CollectionDispatcher<T: FederationTypes>: Send + Sync {
    async fn dispatch(
        &self,
        ctx: &RequestContext<T>,
        handle: &str,
        cursor: Option<&str>,
        filter: Option<&T::Filter>,
    ) -> anyhow::Result<Option<apfed_types::Page<T::Item>>>;
}

pub struct FnCollectionDispatcher<F>(pub F);

#[async_trait]
impl<T, F, Fut> CollectionDispatcher<T> for FnCollectionDispatcher<F>
where
    T: FederationTypes,
    F: Fn(&RequestContext<T>, &str, Option<&str>, Option<&T::Filter>) -> Fut + Send + Sync,
    Fut: Future<Output = anyhow::Result<Option<apfed_types::Page<T::Item>>>> + Send,
{
    async fn dispatch(
        &self,
        ctx: &RequestContext<T>,
        handle: &str,
        cursor: Option<&str>,
        filter: Option<&T::Filter>,
    ) -> anyhow::Result<Option<apfed_types::Page<T::Item>>> {
        (self.0)(ctx, handle, cursor, filter).await
    }
}

/// `(context, handle) -> string | null`, used for both first- and
/// last-cursor callbacks.
#[async_trait]
pub trait CursorCallback<T: FederationTypes>: Send + Sync {
    async fn cursor(&self, ctx: &RequestContext<T>, handle: &str) -> anyhow::Result<Option<String>>;
}

pub struct FnCursorCallback<F>(pub F);

#[async_trait]
impl<T, F, Fut> CursorCallback<T> for FnCursorCallback<F>
where
    T: FederationTypes,
    F: Fn(&RequestContext<T>, &str) -> Fut + Send + Sync,
    Fut: Future<Output = anyhow::Result<Option<String>>> + Send,
{
    async fn cursor(&self, ctx: &RequestContext<T>, handle: &str) -> anyhow::Result<Option<String>> {
        (self.0)(ctx, handle).await
    }
}

/// `(context, handle) -> number | bigint | null`.
#[async_trait]
pub trait CounterCallback<T: FederationTypes>: Send + Sync {
    async fn count(&self, ctx: &RequestContext<T>, handle: &str) -> anyhow::Result<Option<u64>>;
}

pub struct FnCounterCallback<F>(pub F);

#[async_trait]
impl<T, F, Fut> CounterCallback<T> for FnCounterCallback<F>
where
    T: FederationTypes,
    F: Fn(&RequestContext<T>, &str) -> Fut + Send + Sync,
    Fut: Future<Output = anyhow::Result<Option<u64>>> + Send,
{
    async fn count(&self, ctx: &RequestContext<T>, handle: &str) -> anyhow::Result<Option<u64>> {
        (self.0)(ctx, handle).await
    }
}

/// The resolved signing key and its owning actor, as surfaced by the
/// per-request signature cache. Both fields are opaque to the core.
pub struct VerifiedSigner<T: FederationTypes> {
    pub key: T::Key,
    pub owner: T::Actor,
}

/// `(context, key, keyOwner, [handle|paramMap]) -> bool`, where key and
/// keyOwner may be absent for unsigned requests.
#[async_trait]
pub trait AuthorizePredicate<T: FederationTypes, Target: Send + Sync + ?Sized>: Send + Sync {
    async fn authorize(
        &self,
        ctx: &RequestContext<T>,
        key: Option<&T::Key>,
        key_owner: Option<&T::Actor>,
        target: &Target,
    ) -> anyhow::Result<bool>;
}

pub struct FnAuthorizePredicate<F>(pub F);

#[async_trait]
impl<T, Target, F, Fut> AuthorizePredicate<T, Target> for FnAuthorizePredicate<F>
where
    T: FederationTypes,
    Target: Send + Sync + ?Sized,
    F: Fn(&RequestContext<T>, Option<&T::Key>, Option<&T::Actor>, &Target) -> Fut + Send + Sync,
    Fut: Future<Output = anyhow::Result<bool>> + Send,
{
    async fn authorize(
        &self,
        ctx: &RequestContext<T>,
        key: Option<&T::Key>,
        key_owner: Option<&T::Actor>,
        target: &Target,
    ) -> anyhow::Result<bool> {
        (self.0)(ctx, key, key_owner, target).await
    }
}

/// `(context, activity) -> void`, may fail; errors become 500s from the
/// inbox pipeline.
#[async_trait]
pub trait InboxListener<T: FederationTypes>: Send + Sync {
    async fn handle(&self, ctx: &RequestContext<T>, activity: &dyn ActivityObject) -> anyhow::Result<()>;
}

pub struct FnInboxListener<F>(pub F);

#[async_trait]
impl<T, F, Fut> InboxListener<T> for FnInboxListener<F>
where
    T: FederationTypes,
    F: Fn(&RequestContext<T>, &dyn ActivityObject) -> Fut + Send + Sync,
    Fut: Future<Output = anyhow::Result<()>> + Send,
{
    async fn handle(&self, ctx: &RequestContext<T>, activity: &dyn ActivityObject) -> anyhow::Result<()> {
        (self.0)(ctx, activity).await
    }
}

/// `(context, error) -> void`, best-effort, must never itself fail.
#[async_trait]
pub trait ErrorHandler<T: FederationTypes>: Send + Sync {
    async fn handle(&self, ctx: &RequestContext<T>, error: &anyhow::Error);
}

pub struct FnErrorHandler<F>(pub F);

#[async_trait]
impl<T, F, Fut> ErrorHandler<T> for FnErrorHandler<F>
where
    T: FederationTypes,
    F: Fn(&RequestContext<T>, &anyhow::Error) -> Fut + Send + Sync,
    Fut: Future<Output = ()> + Send,
{
    async fn handle(&self, ctx: &RequestContext<T>, error: &anyhow::Error) {
        (self.0)(ctx, error).await
    }
}

/// Given a request and a time window, returns the key that signed it
/// together with its resolved owning actor, or `None` if unsigned.
/// Resolving a key to its owning actor is bundled into the same call, the
/// way `fedi3_core::http_sig::KeyResolver::resolve_actor_summary_for_key_id`
/// fetches the actor document to get at its `publicKeyPem` in one call. A
/// conforming implementation may additionally verify a `Digest` header
/// against the raw body the way `fedi3_core::http_sig::verify_digest_if_present`
/// does, even though that is not itself part of the HTTP Signature draft.
#[async_trait]
pub trait SignatureVerifier<T: FederationTypes>: Send + Sync {
    async fn verify(
        &self,
        method: &Method,
        uri: &Uri,
        headers: &HeaderMap,
        body: &[u8],
        window: Duration,
    ) -> anyhow::Result<Option<VerifiedSigner<T>>>;
}

/// Given the raw JSON and the context, returns a verified instance, `None`
/// if there is no embedded proof present, or fails on a malformed proof.
#[async_trait]
pub trait ProofVerifier<T: FederationTypes>: Send + Sync {
    async fn verify(
        &self,
        ctx: &RequestContext<T>,
        raw: &serde_json::Value,
    ) -> anyhow::Result<Option<Box<dyn ActivityObject>>>;
}

/// Plain JSON-LD deserialization of an activity, with no signature or proof
/// validation performed; used only once the HTTP signature has already
/// authenticated the request. Fails if `raw` does not parse as a
/// recognizable activity.
#[async_trait]
pub trait ActivityParser<T: FederationTypes>: Send + Sync {
    async fn parse(
        &self,
        ctx: &RequestContext<T>,
        raw: &serde_json::Value,
    ) -> anyhow::Result<Box<dyn ActivityObject>>;
}

/// `(activity, key, context) -> bool`.
#[async_trait]
pub trait KeyOwnershipPredicate<T: FederationTypes>: Send + Sync {
    async fn owns(&self, activity: &dyn ActivityObject, key: &T::Key, ctx: &RequestContext<T>) -> anyhow::Result<bool>;
}

/// `get`/`set` with TTL. Keys are arrays of strings; the idempotency
/// record uses a two-element key `[prefix, iri]`.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &[String]) -> anyhow::Result<Option<bool>>;
    async fn set(&self, key: &[String], value: bool, ttl: Duration) -> anyhow::Result<()>;
}

/// Used indirectly during JSON-LD serialization/compaction.
#[async_trait]
pub trait DocumentLoader: Send + Sync {
    async fn load(&self, url: &str) -> anyhow::Result<serde_json::Value>;
}
