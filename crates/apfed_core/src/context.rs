/*
 * SPDX-FileCopyrightText: 2026 RedHunt07 - FEDI3 Project
 * SPDX-License-Identifier: AGPL-3.0-only
 */

//! The per-request bag every responder and the inbox pipeline carries
//! around. Signature verification is memoized behind a `OnceCell` so that
//! an authorize predicate and a key-ownership predicate asking about the
//! same request both trigger at most one `SignatureVerifier` call,
//! mirroring how `fedi3_core::ap::ApState::verify_signature_if_present`
//! is only ever called once per inbound POST and the result threaded
//! onward.

use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use http::{HeaderMap, Method, Uri};
use tokio::sync::OnceCell;

use crate::collaborators::{ActorDispatcher, DocumentLoader, SignatureVerifier, VerifiedSigner};
use crate::types::FederationTypes;

/// Carries the deployment's opaque `Data`, the request's own URL, and the
/// handful of collaborators a responder may need mid-flight. Constructed
/// once per inbound request; does not outlive the request it was built for.
pub struct RequestContext<T: FederationTypes> {
    pub request_url: url::Url,
    pub data: T::Data,
    pub document_loader: Option<Arc<dyn DocumentLoader>>,
    pub actor_dispatcher: Option<Arc<dyn ActorDispatcher<T>>>,

    raw_method: Method,
    raw_uri: Uri,
    raw_headers: HeaderMap,
    raw_body: Bytes,
    signature_verifier: Option<Arc<dyn SignatureVerifier<T>>>,
    signature_window: Duration,
    signer: OnceCell<Option<VerifiedSigner<T>>>,
}

impl<T: FederationTypes> RequestContext<T> {
    pub fn new(
        data: T::Data,
        request_url: url::Url,
        actor_dispatcher: Option<Arc<dyn ActorDispatcher<T>>>,
    ) -> Self {
        Self {
            request_url,
            data,
            document_loader: None,
            actor_dispatcher,
            raw_method: Method::GET,
            raw_uri: Uri::default(),
            raw_headers: HeaderMap::new(),
            raw_body: Bytes::new(),
            signature_verifier: None,
            signature_window: Duration::from_secs(300),
            signer: OnceCell::new(),
        }
    }

    pub fn with_document_loader(mut self, loader: Arc<dyn DocumentLoader>) -> Self {
        self.document_loader = Some(loader);
        self
    }

    /// Attaches the raw wire request, needed if a `SignatureVerifier` is
    /// ever asked to resolve the signer from the request and its time
    /// window.
    pub fn with_request(mut self, method: Method, uri: Uri, headers: HeaderMap, body: Bytes) -> Self {
        self.raw_method = method;
        self.raw_uri = uri;
        self.raw_headers = headers;
        self.raw_body = body;
        self
    }

    pub fn with_signature_verifier(mut self, verifier: Arc<dyn SignatureVerifier<T>>, window: Duration) -> Self {
        self.signature_verifier = Some(verifier);
        self.signature_window = window;
        self
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.raw_headers
    }

    pub fn body(&self) -> &[u8] {
        &self.raw_body
    }

    /// Resolve (and cache) the signer of the current request: a late-binding
    /// handle for the currently-verified HTTP-signature key and its owning
    /// actor. Returns `None` if no verifier is configured or the request is
    /// unsigned. Safe to call from more than one collaborator in the same
    /// request: only the first call actually invokes the verifier.
    pub async fn resolve_signer(&self) -> anyhow::Result<Option<&VerifiedSigner<T>>> {
        let Some(verifier) = self.signature_verifier.as_ref() else {
            return Ok(None);
        };
        let slot = self
            .signer
            .get_or_try_init(|| {
                verifier.verify(
                    &self.raw_method,
                    &self.raw_uri,
                    &self.raw_headers,
                    &self.raw_body,
                    self.signature_window,
                )
            })
            .await?;
        Ok(slot.as_ref())
    }
}
