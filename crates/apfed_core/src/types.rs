/*
 * SPDX-FileCopyrightText: 2026 RedHunt07 - FEDI3 Project
 * SPDX-License-Identifier: AGPL-3.0-only
 */

//! Binds the handful of entity types a federation server must supply
//! (Actor, Object, the collection item/filter types, the HTTP-signature
//! key type) into one associated-type bundle, the way
//! `fedi3_core::ap::ApState` gathers every per-deployment subsystem into a
//! single struct threaded through every handler instead of growing each
//! handler's parameter list without bound.

/// Deployment-supplied entity types. `Actor` and `Object` are opaque
/// vocabulary entities; this crate only needs them to be cheap to hand
/// around and serializable to JSON-LD.
pub trait FederationTypes: Sized + Send + Sync + 'static {
    /// Opaque user-supplied context data threaded through all callbacks.
    type Data: Send + Sync;
    /// An actor, identified by handle.
    type Actor: Send + Sync + serde::Serialize;
    /// An object, identified by a route-parameter map.
    type Object: Send + Sync + serde::Serialize;
    /// A raw collection item, before projection.
    type Item: Send + Sync + serde::Serialize + crate::collection::CollectionItem;
    /// The filter value threaded opaquely through collection callbacks.
    type Filter: Send + Sync;
    /// The cryptographic key type a `SignatureVerifier` resolves to.
    type Key: Send + Sync;
}
