/*
 * SPDX-FileCopyrightText: 2026 RedHunt07 - FEDI3 Project
 * SPDX-License-Identifier: AGPL-3.0-only
 */

//! Content negotiation between ActivityStreams JSON-LD and HTML clients.
//! Mirrors the `Accept`-header bookkeeping `fedi3_core::ap` performs ad hoc
//! on `verify_signature_if_present`'s caller, pulled into its own parseable
//! unit.

use http::HeaderMap;

pub const AS_MEDIA_TYPE: &str = "application/activity+json";

const JSON_LD_TYPES: &[&str] = &[
    "application/activity+json",
    "application/ld+json",
    "application/json",
];

struct Preference {
    media_type: String,
    q: f32,
}

fn parse_accept(headers: &HeaderMap) -> Option<Vec<Preference>> {
    let raw = headers.get(http::header::ACCEPT)?.to_str().ok()?;
    let mut prefs: Vec<Preference> = raw
        .split(',')
        .filter_map(|part| {
            let part = part.trim();
            if part.is_empty() {
                return None;
            }
            let mut segments = part.split(';');
            let media_type = segments.next()?.trim().to_ascii_lowercase();
            let q = segments
                .filter_map(|seg| seg.trim().strip_prefix("q="))
                .filter_map(|v| v.parse::<f32>().ok())
                .next()
                .unwrap_or(1.0);
            Some(Preference { media_type, q })
        })
        .collect();
    if prefs.is_empty() {
        return None;
    }
    // Stable sort: ties keep the header's own declaration order, matching
    // how most HTTP stacks resolve `Accept` ambiguity.
    prefs.sort_by(|a, b| b.q.partial_cmp(&a.q).unwrap_or(std::cmp::Ordering::Equal));
    Some(prefs)
}

/// Does this request's `Accept` header prefer ActivityStreams JSON-LD over HTML?
pub fn accepts_json_ld(headers: &HeaderMap) -> bool {
    let Some(prefs) = parse_accept(headers) else {
        // No parseable Accept header: clients that do not negotiate get JSON-LD.
        return true;
    };
    let top = &prefs[0].media_type;
    if top == "text/html" || top == "application/xhtml+xml" {
        return false;
    }
    prefs
        .iter()
        .any(|p| JSON_LD_TYPES.contains(&p.media_type.as_str()))
}
