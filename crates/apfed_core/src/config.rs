/*
 * SPDX-FileCopyrightText: 2026 RedHunt07 - FEDI3 Project
 * SPDX-License-Identifier: AGPL-3.0-only
 */

//! The immutable registration record every deployment builds once and
//! borrows from every request. `FederationConfig` is that record, built
//! once via `FederationConfigBuilder` the way `fedi3_core::ap::ApState` is
//! built once at startup and then wrapped in an `Arc` by the embedding
//! binary and handed to every handler. This crate stops short of doing
//! the `Arc` wrapping itself; that, and the HTTP router, are the
//! embedder's job.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use crate::actor::ActorEndpoint;
use crate::collaborators::{ActorDispatcher, DocumentLoader, SignatureVerifier};
use crate::collection::CollectionEndpoint;
use crate::context::RequestContext;
use crate::inbox::InboxEndpoint;
use crate::object::ObjectEndpoint;
use crate::types::FederationTypes;

/// Default HTTP-signature freshness window, matching the 300s default
/// `fedi3_core::ap::ApState::max_date_skew` is constructed with in its
/// binary-level defaults.
pub const DEFAULT_SIGNATURE_WINDOW: Duration = Duration::from_secs(300);

/// Everything a deployment registers once, at server build time, and then
/// never mutates again.
pub struct FederationConfig<T: FederationTypes> {
    pub actor_dispatcher: Option<Arc<dyn ActorDispatcher<T>>>,
    pub document_loader: Option<Arc<dyn DocumentLoader>>,
    pub signature_verifier: Option<Arc<dyn SignatureVerifier<T>>>,
    pub signature_window: Duration,
    pub actor: Option<ActorEndpoint<T>>,
    pub object: Option<ObjectEndpoint<T>>,
    pub collections: HashMap<&'static str, CollectionEndpoint<T>>,
    pub inbox: Option<InboxEndpoint<T>>,
}

impl<T: FederationTypes> FederationConfig<T> {
    /// Builds the per-request [`RequestContext`] every responder and the
    /// inbox pipeline are handed, wiring in the collaborators this config
    /// was registered with. The raw wire request is attached separately via
    /// `RequestContext::with_request`, since a bare URL is all most
    /// responders need.
    pub fn context_for(&self, data: T::Data, request_url: url::Url) -> RequestContext<T> {
        let mut ctx = RequestContext::new(data, request_url, self.actor_dispatcher.clone());
        if let Some(loader) = self.document_loader.clone() {
            ctx = ctx.with_document_loader(loader);
        }
        if let Some(verifier) = self.signature_verifier.clone() {
            ctx = ctx.with_signature_verifier(verifier, self.signature_window);
        }
        ctx
    }
}

/// Accumulates registrations via `with_*` methods; `build()` freezes them
/// into a [`FederationConfig`]. Mirrors how `ApConfig`/`ApState` in
/// `fedi3_core::ap` are assembled field-by-field by the embedding binary
/// before the server starts accepting requests.
pub struct FederationConfigBuilder<T: FederationTypes> {
    actor_dispatcher: Option<Arc<dyn ActorDispatcher<T>>>,
    document_loader: Option<Arc<dyn DocumentLoader>>,
    signature_verifier: Option<Arc<dyn SignatureVerifier<T>>>,
    signature_window: Duration,
    actor: Option<ActorEndpoint<T>>,
    object: Option<ObjectEndpoint<T>>,
    collections: HashMap<&'static str, CollectionEndpoint<T>>,
    inbox: Option<InboxEndpoint<T>>,
}

impl<T: FederationTypes> FederationConfigBuilder<T> {
    pub fn new() -> Self {
        Self {
            actor_dispatcher: None,
            document_loader: None,
            signature_verifier: None,
            signature_window: DEFAULT_SIGNATURE_WINDOW,
            actor: None,
            object: None,
            collections: HashMap::new(),
            inbox: None,
        }
    }

    pub fn with_actor_dispatcher(mut self, dispatcher: Arc<dyn ActorDispatcher<T>>) -> Self {
        self.actor_dispatcher = Some(dispatcher);
        self
    }

    pub fn with_document_loader(mut self, loader: Arc<dyn DocumentLoader>) -> Self {
        self.document_loader = Some(loader);
        self
    }

    pub fn with_signature_verifier(mut self, verifier: Arc<dyn SignatureVerifier<T>>, window: Duration) -> Self {
        self.signature_verifier = Some(verifier);
        self.signature_window = window;
        self
    }

    pub fn with_actor_endpoint(mut self, endpoint: ActorEndpoint<T>) -> Self {
        self.actor = Some(endpoint);
        self
    }

    pub fn with_object_endpoint(mut self, endpoint: ObjectEndpoint<T>) -> Self {
        self.object = Some(endpoint);
        self
    }

    pub fn with_collection(mut self, name: &'static str, endpoint: CollectionEndpoint<T>) -> Self {
        self.collections.insert(name, endpoint);
        self
    }

    pub fn with_inbox(mut self, endpoint: InboxEndpoint<T>) -> Self {
        self.inbox = Some(endpoint);
        self
    }

    pub fn build(self) -> FederationConfig<T> {
        FederationConfig {
            actor_dispatcher: self.actor_dispatcher,
            document_loader: self.document_loader,
            signature_verifier: self.signature_verifier,
            signature_window: self.signature_window,
            actor: self.actor,
            object: self.object,
            collections: self.collections,
            inbox: self.inbox,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collaborators::FnActorDispatcher;

    #[derive(Debug)]
    struct TestTypes;

    impl FederationTypes for TestTypes {
        type Data = ();
        type Actor = ();
        type Object = ();
        type Item = ();
        type Filter = ();
        type Key = ();
    }

    #[test]
    fn builder_defaults_to_default_signature_window() {
        let config = FederationConfigBuilder::<TestTypes>::new().build();
        assert_eq!(config.signature_window, DEFAULT_SIGNATURE_WINDOW);
        assert!(config.actor_dispatcher.is_none());
        assert!(config.collections.is_empty());
    }

    #[test]
    fn context_for_carries_registered_actor_dispatcher() {
        let dispatcher = Arc::new(FnActorDispatcher(|_ctx: &RequestContext<TestTypes>, _h: &str| async { Ok(Some(())) }));
        let config = FederationConfigBuilder::<TestTypes>::new()
            .with_actor_dispatcher(dispatcher)
            .build();
        let ctx = config.context_for((), "https://e/@alice".parse().unwrap());
        assert!(ctx.actor_dispatcher.is_some());
    }

    #[test]
    fn collections_are_keyed_by_registration_name() {
        use crate::collaborators::FnFallbackResponder;
        use axum::body::Body;
        use axum::response::Response;

        let endpoint = CollectionEndpoint::<TestTypes> {
            name: "outbox",
            dispatcher: None,
            first_cursor: None,
            last_cursor: None,
            counter: None,
            authorize: None,
            on_not_found: Arc::new(FnFallbackResponder(|_ctx: &RequestContext<TestTypes>| async {
                Response::builder().status(http::StatusCode::NOT_FOUND).body(Body::empty()).unwrap()
            })),
            on_not_acceptable: Arc::new(FnFallbackResponder(|_ctx: &RequestContext<TestTypes>| async {
                Response::builder().status(http::StatusCode::NOT_ACCEPTABLE).body(Body::empty()).unwrap()
            })),
            on_unauthorized: Arc::new(FnFallbackResponder(|_ctx: &RequestContext<TestTypes>| async {
                Response::builder().status(http::StatusCode::UNAUTHORIZED).body(Body::empty()).unwrap()
            })),
        };
        let config = FederationConfigBuilder::<TestTypes>::new()
            .with_collection("outbox", endpoint)
            .build();
        assert!(config.collections.contains_key("outbox"));
    }
}
