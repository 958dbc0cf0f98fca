/*
 * SPDX-FileCopyrightText: 2026 RedHunt07 - FEDI3 Project
 * SPDX-License-Identifier: AGPL-3.0-only
 */

//! Object response helpers: the last mile every responder shares once it
//! has a serializable value in hand. Centralized here rather than
//! repeated per call site, the way `fedi3_core::ap` factors its own
//! security/cache headers into one helper used by every handler.

use axum::body::Body;
use axum::response::Response;
use http::header::{CONTENT_TYPE, VARY};
use http::StatusCode;
use serde::Serialize;

use crate::negotiate::{accepts_json_ld, AS_MEDIA_TYPE};

/// Builds a `200` JSON-LD response. `vary` controls whether `Vary: Accept`
/// is attached: responders that ran content negotiation set it; the bare
/// `respond_with_object` helper does not.
pub fn json_ld_response(payload: &impl Serialize, vary: bool) -> anyhow::Result<Response> {
    let body = serde_json::to_vec(payload)?;
    let mut builder = Response::builder()
        .status(StatusCode::OK)
        .header(CONTENT_TYPE, AS_MEDIA_TYPE);
    if vary {
        builder = builder.header(VARY, "Accept");
    }
    Ok(builder.body(Body::from(body))?)
}

/// Serializes and emits `object` with no negotiation, no `Vary`. `object`
/// is expected to already be in its final, compacted JSON-LD shape: the
/// actor/object dispatchers are handed the request's `document_loader`
/// (`RequestContext::document_loader`) before they ever produce a `T::Actor`
/// or `T::Object`, so compaction against the configured loader happens
/// there, not in this helper.
pub fn respond_with_object(object: &impl Serialize) -> anyhow::Result<Response> {
    json_ld_response(object, false)
}

/// Result of `respond_with_object_if_acceptable`: either a response, or
/// the "none" sentinel for clients that did not ask for JSON-LD.
pub enum ObjectResponseOutcome {
    Response(Response),
    NotAcceptable,
}

/// Negotiates and, if acceptable, serializes and emits `object` with
/// `Vary: Accept` set.
pub fn respond_with_object_if_acceptable(
    object: &impl Serialize,
    headers: &http::HeaderMap,
) -> anyhow::Result<ObjectResponseOutcome> {
    if !accepts_json_ld(headers) {
        return Ok(ObjectResponseOutcome::NotAcceptable);
    }
    Ok(ObjectResponseOutcome::Response(json_ld_response(object, true)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn respond_with_object_has_no_vary() {
        let resp = respond_with_object(&serde_json::json!({"type": "Note"})).unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers().get(CONTENT_TYPE).unwrap(), AS_MEDIA_TYPE);
        assert!(resp.headers().get(VARY).is_none());
    }

    #[test]
    fn if_acceptable_sets_vary_on_success() {
        let mut headers = http::HeaderMap::new();
        headers.insert(http::header::ACCEPT, "application/activity+json".parse().unwrap());
        match respond_with_object_if_acceptable(&serde_json::json!({"type": "Note"}), &headers).unwrap() {
            ObjectResponseOutcome::Response(resp) => {
                assert_eq!(resp.headers().get(VARY).unwrap(), "Accept");
            }
            ObjectResponseOutcome::NotAcceptable => panic!("expected a response"),
        }
    }

    #[test]
    fn if_acceptable_returns_sentinel_for_html() {
        let mut headers = http::HeaderMap::new();
        headers.insert(http::header::ACCEPT, "text/html".parse().unwrap());
        match respond_with_object_if_acceptable(&serde_json::json!({"type": "Note"}), &headers).unwrap() {
            ObjectResponseOutcome::NotAcceptable => {}
            ObjectResponseOutcome::Response(_) => panic!("expected the none sentinel"),
        }
    }
}
