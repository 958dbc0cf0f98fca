/*
 * SPDX-FileCopyrightText: 2026 RedHunt07 - FEDI3 Project
 * SPDX-License-Identifier: AGPL-3.0-only
 */

//! Activity class identity and ancestor-chain listener resolution.
//!
//! Dynamic prototype walking is replaced with a static ancestor list per
//! concrete activity type, ending at the `Activity` root; the listener
//! map is probed along that list, first hit wins.

use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;

use crate::collaborators::InboxListener;
use crate::types::FederationTypes;

/// Name of the root class every listener walk eventually reaches if no
/// more specific registration exists.
pub const ACTIVITY_ROOT: &str = "Activity";

/// A parsed, typed ActivityStreams activity. The vocabulary itself is an
/// external collaborator; this crate only needs enough of the shape to
/// route and dedupe.
pub trait ActivityObject: Any + Send + Sync {
    /// The activity's own IRI, if it has one.
    fn id(&self) -> Option<&str>;

    /// The actor that performed the activity, if present. A missing
    /// `actorId` is a `400`, not a panic-worthy invariant violation.
    fn actor_id(&self) -> Option<&str>;

    /// This activity's most specific registered class name.
    fn class_name(&self) -> &'static str;

    /// Ancestor chain from `class_name()` up to and including
    /// [`ACTIVITY_ROOT`], inclusive of `class_name()` itself at index 0.
    fn ancestor_chain(&self) -> &'static [&'static str];

    fn as_any(&self) -> &dyn Any;
}

/// A type-erased listener registry keyed by activity class name. Populated
/// once at server build time and read-only thereafter.
pub struct ListenerRegistry<T: FederationTypes> {
    listeners: HashMap<&'static str, Arc<dyn InboxListener<T>>>,
}

impl<T: FederationTypes> Default for ListenerRegistry<T> {
    fn default() -> Self {
        Self {
            listeners: HashMap::new(),
        }
    }
}

impl<T: FederationTypes> ListenerRegistry<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, class_name: &'static str, listener: Arc<dyn InboxListener<T>>) {
        self.listeners.insert(class_name, listener);
    }

    /// Walk `activity`'s ancestor chain and return the first registered
    /// listener, or `None` if the walk reaches [`ACTIVITY_ROOT`] (or runs
    /// off the end of a malformed chain) without a hit.
    pub fn resolve(&self, activity: &dyn ActivityObject) -> Option<&Arc<dyn InboxListener<T>>> {
        for class_name in activity.ancestor_chain() {
            if let Some(listener) = self.listeners.get(class_name) {
                return Some(listener);
            }
        }
        None
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;
    use crate::context::RequestContext;
    use crate::types::FederationTypes;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

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

    struct CountingListener(Arc<AtomicUsize>);

    #[async_trait]
    impl InboxListener<TestTypes> for CountingListener {
        async fn handle(
            &self,
            _ctx: &RequestContext<TestTypes>,
            _activity: &dyn ActivityObject,
        ) -> anyhow::Result<()> {
            self.0.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    #[tokio::test]
    async fn exact_class_match_wins() {
        let mut registry = ListenerRegistry::<TestTypes>::new();
        let hits = Arc::new(AtomicUsize::new(0));
        registry.register("Create", Arc::new(CountingListener(hits.clone())));
        let activity = create(Some("https://e/a/2"), "https://e/@bob");
        let listener = registry.resolve(&activity).expect("should resolve");
        let ctx = RequestContext::new((), "https://e/inbox".parse().unwrap(), None);
        listener.handle(&ctx, &activity).await.unwrap();
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn falls_back_to_activity_root() {
        let mut registry = ListenerRegistry::<TestTypes>::new();
        let hits = Arc::new(AtomicUsize::new(0));
        registry.register(ACTIVITY_ROOT, Arc::new(CountingListener(hits.clone())));
        let activity = announce(None, "https://e/@bob");
        let listener = registry.resolve(&activity).expect("should resolve via root");
        let ctx = RequestContext::new((), "https://e/inbox".parse().unwrap(), None);
        listener.handle(&ctx, &activity).await.unwrap();
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn no_registration_resolves_to_none() {
        let registry = ListenerRegistry::<TestTypes>::new();
        let activity = announce(None, "https://e/@bob");
        assert!(registry.resolve(&activity).is_none());
    }
}
