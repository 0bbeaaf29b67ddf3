//! Listener registry shared by the identity provider adapters.
//!
//! Adapters publish every auth-state change here. Listeners registered after
//! the first publication receive the current state immediately; listeners
//! registered before it wait for it. Delivery happens under the registry
//! lock, so listeners observe changes in publication order and must not
//! call back into the broadcaster.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, PoisonError, Weak};

use tracing::debug;

use crate::domain::AuthenticatedUser;
use crate::domain::ports::{AuthStateListener, AuthSubscription};

#[derive(Default)]
struct Registry {
    next_id: u64,
    listeners: BTreeMap<u64, AuthStateListener>,
    current: Option<Option<AuthenticatedUser>>,
}

/// Fan-out of auth-state notifications to scoped listeners.
#[derive(Clone, Default)]
pub struct AuthStateBroadcaster {
    registry: Arc<Mutex<Registry>>,
}

impl AuthStateBroadcaster {
    /// Broadcaster that has not published yet.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `listener`; replay the current state if one is known.
    pub fn subscribe(&self, listener: AuthStateListener) -> AuthSubscription {
        let id = {
            let mut registry = self.lock();
            let id = registry.next_id;
            registry.next_id += 1;
            if let Some(current) = &registry.current {
                listener(current.clone());
            }
            registry.listeners.insert(id, listener);
            id
        };
        debug!(listener = id, "auth-state listener registered");

        let registry: Weak<Mutex<Registry>> = Arc::downgrade(&self.registry);
        AuthSubscription::new(move || {
            if let Some(registry) = registry.upgrade() {
                registry
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .listeners
                    .remove(&id);
                debug!(listener = id, "auth-state listener released");
            }
        })
    }

    /// Record `user` as the current state and notify every listener.
    pub fn publish(&self, user: Option<AuthenticatedUser>) {
        let mut registry = self.lock();
        registry.current = Some(user.clone());
        for listener in registry.listeners.values() {
            listener(user.clone());
        }
    }

    /// Current state, or `None` before the first publication.
    #[must_use]
    pub fn current(&self) -> Option<Option<AuthenticatedUser>> {
        self.lock().current.clone()
    }

    /// Number of registered listeners.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.lock().listeners.len()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Registry> {
        self.registry.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::UserId;
    use rstest::rstest;

    fn user() -> AuthenticatedUser {
        AuthenticatedUser {
            user_id: UserId::new("uid-summer").expect("valid id"),
            email: "summer@smith.test".to_owned(),
            email_verified: true,
        }
    }

    fn recorder() -> (AuthStateListener, Arc<Mutex<Vec<Option<AuthenticatedUser>>>>) {
        let seen: Arc<Mutex<Vec<Option<AuthenticatedUser>>>> = Arc::default();
        let sink = Arc::clone(&seen);
        let listener: AuthStateListener = Arc::new(move |user| {
            sink.lock().expect("recorder lock").push(user);
        });
        (listener, seen)
    }

    #[rstest]
    fn unprimed_broadcaster_does_not_replay() {
        let broadcaster = AuthStateBroadcaster::new();
        let (listener, seen) = recorder();
        let _subscription = broadcaster.subscribe(listener);
        assert!(seen.lock().expect("recorder lock").is_empty());
    }

    #[rstest]
    fn late_subscribers_receive_current_state() {
        let broadcaster = AuthStateBroadcaster::new();
        broadcaster.publish(Some(user()));
        let (listener, seen) = recorder();
        let _subscription = broadcaster.subscribe(listener);
        assert_eq!(*seen.lock().expect("recorder lock"), vec![Some(user())]);
    }

    #[rstest]
    fn publications_arrive_in_order() {
        let broadcaster = AuthStateBroadcaster::new();
        let (listener, seen) = recorder();
        let _subscription = broadcaster.subscribe(listener);
        broadcaster.publish(None);
        broadcaster.publish(Some(user()));
        broadcaster.publish(None);
        assert_eq!(
            *seen.lock().expect("recorder lock"),
            vec![None, Some(user()), None]
        );
    }

    #[rstest]
    fn released_listeners_stop_receiving() {
        let broadcaster = AuthStateBroadcaster::new();
        let (listener, seen) = recorder();
        let subscription = broadcaster.subscribe(listener);
        assert_eq!(broadcaster.listener_count(), 1);

        drop(subscription);
        broadcaster.publish(Some(user()));

        assert_eq!(broadcaster.listener_count(), 0);
        assert!(seen.lock().expect("recorder lock").is_empty());
    }
}
