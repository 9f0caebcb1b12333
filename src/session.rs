use std::{
    collections::HashMap,
    fmt::Display,
    sync::{Arc, Mutex, Weak},
};

type Callback = Arc<dyn Fn(Option<&str>) + Send + Sync>;

#[derive(Default)]
struct ObserverState {
    user_id: Option<String>,
    callbacks: HashMap<u64, Callback>,
    next_id: u64,
}

/// Wraps the identity provider's session stream. Holds the current
/// user-id-or-none and notifies subscribers on every change.
///
/// The provider adapter feeds sign-in/sign-out events in through
/// [`set_session`](Self::set_session) / [`clear_session`](Self::clear_session);
/// everything else reads through [`current_user_id`](Self::current_user_id) or
/// subscribes. An absent user is a valid state, not a failure.
#[derive(Default)]
pub struct SessionObserver {
    inner: Arc<Mutex<ObserverState>>,
}

impl SessionObserver {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn current_user_id(&self) -> Option<String> {
        self.inner.lock().expect("session state poisoned").user_id.clone()
    }

    /// Register a callback, invoking it immediately with the current value
    /// and again on every subsequent change. Dropping the returned
    /// [`Subscription`] unregisters it.
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(Option<&str>) + Send + Sync + 'static,
    {
        let callback: Callback = Arc::new(callback);
        let (id, current) = {
            let mut state = self.inner.lock().expect("session state poisoned");
            let id = state.next_id;
            state.next_id += 1;
            state.callbacks.insert(id, callback.clone());
            (id, state.user_id.clone())
        };
        // Invoked outside the lock so a callback may subscribe or read back.
        callback(current.as_deref());
        Subscription {
            inner: Arc::downgrade(&self.inner),
            id,
        }
    }

    /// Provider fired a sign-in event.
    pub fn set_session(&self, user_id: impl Into<String>) {
        self.update(Some(user_id.into()));
    }

    /// Provider fired a sign-out event.
    pub fn clear_session(&self) {
        self.update(None);
    }

    /// The provider's underlying connection failed. The session is treated as
    /// unknown until the provider recovers and fires again; the error is
    /// logged and never surfaced.
    pub fn provider_error(&self, error: impl Display) {
        tracing::warn!(%error, "identity provider connection failed; session treated as signed out");
        self.update(None);
    }

    fn update(&self, user_id: Option<String>) {
        let (current, callbacks) = {
            let mut state = self.inner.lock().expect("session state poisoned");
            state.user_id = user_id;
            (
                state.user_id.clone(),
                state.callbacks.values().cloned().collect::<Vec<_>>(),
            )
        };
        for callback in callbacks {
            callback(current.as_deref());
        }
    }
}

/// Subscription handle returned by [`SessionObserver::subscribe`].
/// Unsubscribes when dropped.
pub struct Subscription {
    inner: Weak<Mutex<ObserverState>>,
    id: u64,
}

impl Subscription {
    /// Explicit alternative to dropping the handle.
    pub fn unsubscribe(self) {}
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(inner) = self.inner.upgrade() {
            if let Ok(mut state) = inner.lock() {
                state.callbacks.remove(&self.id);
            }
        }
    }
}
