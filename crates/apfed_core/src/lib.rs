/*
 * SPDX-FileCopyrightText: 2026 RedHunt07 - FEDI3 Project
 * SPDX-License-Identifier: AGPL-3.0-only
 */

//! The HTTP-request dispatch core of an ActivityPub federation server:
//! content negotiation, the actor/object/collection responders, and the
//! signed inbox ingestion pipeline. The ActivityStreams vocabulary, the
//! HTTP-signature primitives, JSON-LD proof verification, and the
//! key-value store are all external collaborators a deployment supplies
//! through the traits in [`collaborators`]. This crate owns only the
//! dispatch shape around them.

pub mod activity;
pub mod actor;
pub mod collaborators;
pub mod collection;
pub mod config;
pub mod context;
pub mod inbox;
pub mod negotiate;
pub mod object;
pub mod respond;
pub mod types;

pub use activity::{ActivityObject, ListenerRegistry, ACTIVITY_ROOT};
pub use actor::ActorEndpoint;
pub use collection::CollectionEndpoint;
pub use config::{FederationConfig, FederationConfigBuilder};
pub use context::RequestContext;
pub use inbox::InboxEndpoint;
pub use negotiate::accepts_json_ld;
pub use object::ObjectEndpoint;
pub use respond::{respond_with_object, respond_with_object_if_acceptable, ObjectResponseOutcome};
pub use types::FederationTypes;
