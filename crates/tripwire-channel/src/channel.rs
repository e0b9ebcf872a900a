//! The channel side of the host contract: who is being invoked, and with what.

use serde_json::{Map, Value};
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// Payload key naming the action being invoked.
pub const ACTION_KEY: &str = "action";

static NULL: Value = Value::Null;

/// A persistent bidirectional endpoint managed by the host.
pub trait Channel: Send + Sync + 'static {
    /// Host connection object this channel belongs to.
    type Connection: Any + Send + Sync;

    fn connection(&self) -> Arc<Self::Connection>;

    /// Runtime type identity reported as the notice `component`.
    ///
    /// Defaults to the unqualified type name (`ChatChannel`).
    fn component(&self) -> &'static str {
        short_type_name(std::any::type_name::<Self>())
    }
}

fn short_type_name(full: &'static str) -> &'static str {
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}

// ---------------------------------------------------------------------------
// Invocation
// ---------------------------------------------------------------------------

/// Which kind of channel action is being dispatched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKind {
    Subscribe,
    Unsubscribe,
    /// A client-initiated remote action.
    Perform,
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionKind::Subscribe => write!(f, "subscribe"),
            ActionKind::Unsubscribe => write!(f, "unsubscribe"),
            ActionKind::Perform => write!(f, "perform"),
        }
    }
}

/// One action dispatch: its kind and the payload mapping it was invoked with.
///
/// Lifecycle invocations carry a synthetic payload whose `action` entry is
/// the lifecycle name, so every invocation reports an action.
#[derive(Debug, Clone, PartialEq)]
pub struct Invocation {
    kind: ActionKind,
    payload: Map<String, Value>,
}

impl Invocation {
    pub fn subscribe() -> Self {
        Self::lifecycle(ActionKind::Subscribe)
    }

    pub fn unsubscribe() -> Self {
        Self::lifecycle(ActionKind::Unsubscribe)
    }

    /// A remote action. The payload is taken as sent by the client; it should
    /// carry an `action` entry.
    pub fn perform(payload: Map<String, Value>) -> Self {
        Self {
            kind: ActionKind::Perform,
            payload,
        }
    }

    fn lifecycle(kind: ActionKind) -> Self {
        let mut payload = Map::new();
        payload.insert(ACTION_KEY.to_string(), Value::String(kind.to_string()));
        Self { kind, payload }
    }

    pub fn kind(&self) -> ActionKind {
        self.kind
    }

    pub fn payload(&self) -> &Map<String, Value> {
        &self.payload
    }

    /// The raw `action` entry, `Null` when the payload has none.
    pub fn action_value(&self) -> &Value {
        self.payload.get(ACTION_KEY).unwrap_or(&NULL)
    }

    pub fn action(&self) -> Option<&str> {
        self.action_value().as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct Conn;
    struct ChatChannel;

    impl Channel for ChatChannel {
        type Connection = Conn;

        fn connection(&self) -> Arc<Conn> {
            Arc::new(Conn)
        }
    }

    #[test]
    fn component_defaults_to_short_type_name() {
        assert_eq!(ChatChannel.component(), "ChatChannel");
        assert_eq!(short_type_name("a::b::Wrapper<c::D>"), "Wrapper");
        assert_eq!(short_type_name("Plain"), "Plain");
    }

    #[test]
    fn lifecycle_invocations_name_their_action() {
        assert_eq!(Invocation::subscribe().action(), Some("subscribe"));
        assert_eq!(Invocation::unsubscribe().action(), Some("unsubscribe"));
        assert_eq!(Invocation::subscribe().kind(), ActionKind::Subscribe);
    }

    #[test]
    fn perform_keeps_payload() {
        let payload = json!({"action": "speak", "msg": "hi"}).as_object().cloned().unwrap();
        let invocation = Invocation::perform(payload.clone());
        assert_eq!(invocation.kind(), ActionKind::Perform);
        assert_eq!(invocation.action(), Some("speak"));
        assert_eq!(invocation.payload(), &payload);
    }

    #[test]
    fn missing_action_is_null() {
        let invocation = Invocation::perform(Map::new());
        assert_eq!(invocation.action_value(), &Value::Null);
        assert_eq!(invocation.action(), None);
    }
}
