//! # Session model and the session stream
//!
//! [`Session`] is what the identity provider hands back after a successful sign-in:
//! the uid and the two display fields the UI uses, plus the [`Credential`] needed to
//! call Firestore and to restore the session after a reload.
//!
//! [`SessionHub`] is the push stream every provider publishes into. It holds the
//! best-known session and a list of listeners:
//!
//! - [`publish`](SessionHub::publish) stores the new value, marks the hub resolved and
//!   calls every listener in subscription order.
//! - [`subscribe`](SessionHub::subscribe) registers a listener. If the hub is already
//!   resolved the listener is called straight away with the current value; otherwise
//!   its first call is the provider's initial resolution.
//! - The returned [`Subscription`] removes the listener when dropped, so a component
//!   that owns it stops receiving updates when it goes away.
//! - [`hold`](SessionHub::hold) defers delivery. While any [`Hold`] is alive, published
//!   values are buffered and only the last one is delivered when the final hold drops.
//!   Multi-step sign-ins hold the hub so listeners never see a session whose
//!   follow-up writes are still in flight.
//!
//! The hub is single-threaded (`Rc<RefCell<_>>`): sessions change only on the UI
//! event loop.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use serde::{Deserialize, Serialize};

/// Tokens issued by the identity provider.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Credential {
    pub id_token: String,
    pub refresh_token: String,
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential").finish_non_exhaustive()
    }
}

/// The currently authenticated identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub uid: String,
    pub display_name: Option<String>,
    pub email: Option<String>,
    pub credential: Credential,
}

impl Session {
    pub fn new(
        uid: impl Into<String>,
        display_name: Option<String>,
        email: Option<String>,
        credential: Credential,
    ) -> Self {
        Self {
            uid: uid.into(),
            display_name: display_name.filter(|n| !n.is_empty()),
            email: email.filter(|e| !e.is_empty()),
            credential,
        }
    }

    pub fn id_token(&self) -> &str {
        &self.credential.id_token
    }

    /// Name shown in the navigation bar, falling back to email, then uid.
    pub fn display_label(&self) -> &str {
        self.display_name
            .as_deref()
            .or(self.email.as_deref())
            .unwrap_or(&self.uid)
    }
}

type Listener = Rc<dyn Fn(Option<Session>)>;

#[derive(Default)]
struct HubState {
    current: Option<Session>,
    resolved: bool,
    next_id: u64,
    listeners: Vec<(u64, Listener)>,
    holds: usize,
    pending: Option<Option<Session>>,
}

/// Push stream of session changes.
#[derive(Clone, Default)]
pub struct SessionHub {
    state: Rc<RefCell<HubState>>,
}

impl std::fmt::Debug for SessionHub {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("SessionHub")
            .field("current", &state.current)
            .field("resolved", &state.resolved)
            .field("listeners", &state.listeners.len())
            .finish()
    }
}

impl SessionHub {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<Session> {
        self.state.borrow().current.clone()
    }

    /// Whether the provider has settled its initial state.
    #[cfg(test)]
    pub(crate) fn is_resolved(&self) -> bool {
        self.state.borrow().resolved
    }

    #[cfg(test)]
    pub(crate) fn listener_count(&self) -> usize {
        self.state.borrow().listeners.len()
    }

    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(Option<Session>) + 'static,
    {
        let listener: Listener = Rc::new(listener);
        let (id, initial) = {
            let mut state = self.state.borrow_mut();
            let id = state.next_id;
            state.next_id += 1;
            state.listeners.push((id, listener.clone()));
            (id, state.resolved.then(|| state.current.clone()))
        };

        // Called outside the borrow so the listener may touch the hub.
        if let Some(session) = initial {
            listener(session);
        }

        Subscription {
            state: Rc::downgrade(&self.state),
            id,
        }
    }

    /// Buffer publications until the returned [`Hold`] is dropped.
    pub fn hold(&self) -> Hold {
        self.state.borrow_mut().holds += 1;
        Hold {
            state: Rc::downgrade(&self.state),
        }
    }

    pub fn publish(&self, session: Option<Session>) {
        let listeners: Vec<Listener> = {
            let mut state = self.state.borrow_mut();
            if state.holds > 0 {
                state.pending = Some(session);
                return;
            }
            state.current = session.clone();
            state.resolved = true;
            state.listeners.iter().map(|(_, l)| l.clone()).collect()
        };

        tracing::debug!(
            uid = session.as_ref().map(|s| s.uid.as_str()),
            listeners = listeners.len(),
            "session changed"
        );

        for listener in listeners {
            listener(session.clone());
        }
    }
}

/// Keeps a listener registered on a [`SessionHub`]; dropping it unsubscribes.
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    state: Weak<RefCell<HubState>>,
    id: u64,
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(state) = self.state.upgrade() {
            state.borrow_mut().listeners.retain(|(id, _)| *id != self.id);
        }
    }
}

/// Defers session delivery on a [`SessionHub`]; dropping the last one flushes it.
#[must_use = "dropping a Hold releases it immediately"]
pub struct Hold {
    state: Weak<RefCell<HubState>>,
}

impl std::fmt::Debug for Hold {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Hold").finish_non_exhaustive()
    }
}

impl Drop for Hold {
    fn drop(&mut self) {
        let Some(state) = self.state.upgrade() else {
            return;
        };
        let pending = {
            let mut inner = state.borrow_mut();
            inner.holds -= 1;
            if inner.holds > 0 {
                return;
            }
            inner.pending.take()
        };
        if let Some(session) = pending {
            SessionHub { state }.publish(session);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(uid: &str, name: Option<&str>) -> Session {
        Session::new(
            uid,
            name.map(str::to_string),
            Some(format!("{uid}@example.com")),
            Credential {
                id_token: "id".to_string(),
                refresh_token: "refresh".to_string(),
            },
        )
    }

    fn recorder() -> (Rc<RefCell<Vec<Option<String>>>>, impl Fn(Option<Session>)) {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        (seen, move |s: Option<Session>| {
            sink.borrow_mut().push(s.map(|s| s.uid))
        })
    }

    #[test]
    fn test_unresolved_hub_defers_first_call() {
        let hub = SessionHub::new();
        let (seen, listener) = recorder();
        let _sub = hub.subscribe(listener);
        assert!(seen.borrow().is_empty());

        hub.publish(None);
        assert_eq!(*seen.borrow(), vec![None]);
    }

    #[test]
    fn test_resolved_hub_calls_immediately() {
        let hub = SessionHub::new();
        hub.publish(Some(session("u1", None)));

        let (seen, listener) = recorder();
        let _sub = hub.subscribe(listener);
        assert_eq!(*seen.borrow(), vec![Some("u1".to_string())]);
    }

    #[test]
    fn test_changes_delivered_in_order_without_dedup() {
        let hub = SessionHub::new();
        let (seen, listener) = recorder();
        let _sub = hub.subscribe(listener);

        hub.publish(None);
        hub.publish(Some(session("u1", None)));
        hub.publish(Some(session("u1", None)));
        hub.publish(None);

        assert_eq!(
            *seen.borrow(),
            vec![None, Some("u1".to_string()), Some("u1".to_string()), None]
        );
    }

    #[test]
    fn test_drop_unsubscribes() {
        let hub = SessionHub::new();
        let (seen, listener) = recorder();
        let sub = hub.subscribe(listener);
        assert_eq!(hub.listener_count(), 1);

        drop(sub);
        assert_eq!(hub.listener_count(), 0);

        hub.publish(Some(session("u1", None)));
        assert!(seen.borrow().is_empty());
    }

    #[test]
    fn test_subscription_outliving_hub() {
        let hub = SessionHub::new();
        let sub = hub.subscribe(|_| {});
        drop(hub);
        drop(sub);
    }

    #[test]
    fn test_listener_may_subscribe_during_publish() {
        let hub = SessionHub::new();
        let inner = Rc::new(RefCell::new(Vec::new()));
        let hub2 = hub.clone();
        let inner2 = inner.clone();
        let _sub = hub.subscribe(move |_| {
            inner2.borrow_mut().push(hub2.subscribe(|_| {}));
        });

        hub.publish(None);
        assert_eq!(inner.borrow().len(), 1);
        assert_eq!(hub.listener_count(), 2);
    }

    #[test]
    fn test_hold_delivers_last_value_on_release() {
        let hub = SessionHub::new();
        let (seen, listener) = recorder();
        let _sub = hub.subscribe(listener);

        let hold = hub.hold();
        hub.publish(Some(session("u1", None)));
        hub.publish(Some(session("u1", Some("Alice"))));
        assert!(seen.borrow().is_empty());
        assert!(!hub.is_resolved());

        drop(hold);
        assert_eq!(*seen.borrow(), vec![Some("u1".to_string())]);
        assert_eq!(
            hub.current().and_then(|s| s.display_name),
            Some("Alice".to_string())
        );
    }

    #[test]
    fn test_nested_holds_flush_once() {
        let hub = SessionHub::new();
        let (seen, listener) = recorder();
        let _sub = hub.subscribe(listener);

        let outer = hub.hold();
        let inner = hub.hold();
        hub.publish(None);
        drop(inner);
        assert!(seen.borrow().is_empty());

        drop(outer);
        assert_eq!(*seen.borrow(), vec![None]);
    }

    #[test]
    fn test_hold_without_publish_is_silent() {
        let hub = SessionHub::new();
        let (seen, listener) = recorder();
        let _sub = hub.subscribe(listener);

        drop(hub.hold());
        assert!(seen.borrow().is_empty());

        hub.publish(None);
        assert_eq!(*seen.borrow(), vec![None]);
    }

    #[test]
    fn test_display_label_fallbacks() {
        assert_eq!(session("u1", Some("Alice")).display_label(), "Alice");
        assert_eq!(session("u1", None).display_label(), "u1@example.com");
        assert_eq!(session("u1", Some("")).display_label(), "u1@example.com");

        let mut anonymous = session("u1", None);
        anonymous.email = None;
        assert_eq!(anonymous.display_label(), "u1");
    }

    #[test]
    fn test_credential_debug_is_redacted() {
        let rendered = format!("{:?}", session("u1", None));
        assert!(!rendered.contains("refresh"));
    }
}
