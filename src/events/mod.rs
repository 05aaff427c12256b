//! Packet events and their ordered, failure-isolated dispatch.
//!
//! The protocol layer raises a [`PacketEvent`] whenever a packet is received
//! or about to be sent; gameplay code subscribes by event name. Delivery is
//! synchronous on the raising thread and follows registration order. A
//! listener that errors never blocks the listeners behind it - every failure
//! is collected into the [`DispatchReport`] so the caller can decide whether
//! it is connection-fatal. There is no retry, no queue, no persistence.

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use tracing::warn;

/// Wire-stable name raised after a packet has been decoded. Other layers key
/// off this string; changing it is a protocol migration.
pub const PACKET_RECEIVE: &str = "packet_receive";
/// Wire-stable name raised around packet transmission.
pub const PACKET_SEND: &str = "packet_send";

/// Opaque handle to the connection that produced an event. The core carries
/// it but never inspects it; the protocol layer downcasts it back on the
/// other side of the bus.
#[derive(Clone)]
pub struct ProtocolRef(Arc<dyn Any + Send + Sync>);

impl ProtocolRef {
    pub fn new<T: Any + Send + Sync>(connection: T) -> Self {
        Self(Arc::new(connection))
    }

    pub fn downcast_ref<T: Any + Send + Sync>(&self) -> Option<&T> {
        self.0.downcast_ref()
    }
}

impl fmt::Debug for ProtocolRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ProtocolRef(..)")
    }
}

/// Immutable named envelope delivered to listeners. Exists only for the
/// duration of the dispatch call that created it.
#[derive(Debug, Clone)]
pub struct PacketEvent {
    name: &'static str,
    protocol: ProtocolRef,
}

impl PacketEvent {
    /// An inbound packet finished decoding on `protocol`.
    pub fn received(protocol: ProtocolRef) -> Self {
        Self {
            name: PACKET_RECEIVE,
            protocol,
        }
    }

    /// An outbound packet is being transmitted on `protocol`.
    pub fn sent(protocol: ProtocolRef) -> Self {
        Self {
            name: PACKET_SEND,
            protocol,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn protocol(&self) -> &ProtocolRef {
        &self.protocol
    }
}

type ListenerFn = Box<dyn Fn(&PacketEvent) -> anyhow::Result<()> + Send + Sync>;

struct RegisteredListener {
    name: String,
    callback: ListenerFn,
}

/// One listener's dispatch-time error, isolated from its neighbors.
#[derive(Debug)]
pub struct ListenerFailure {
    pub listener: String,
    pub error: anyhow::Error,
}

/// Outcome of a single `emit` call.
#[derive(Debug, Default)]
pub struct DispatchReport {
    /// Listeners invoked, failed ones included.
    pub delivered: usize,
    pub failures: Vec<ListenerFailure>,
}

impl DispatchReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Name-keyed listener registry with fire-and-forget dispatch.
#[derive(Default)]
pub struct EventBus {
    listeners: HashMap<String, Vec<RegisteredListener>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `callback` for `event`. Listeners run in registration order;
    /// `listener_name` identifies the subscriber in failure reports.
    pub fn subscribe(
        &mut self,
        event: &str,
        listener_name: impl Into<String>,
        callback: impl Fn(&PacketEvent) -> anyhow::Result<()> + Send + Sync + 'static,
    ) {
        self.listeners
            .entry(event.to_string())
            .or_default()
            .push(RegisteredListener {
                name: listener_name.into(),
                callback: Box::new(callback),
            });
    }

    /// Drop every listener registered under `listener_name` for `event`.
    /// Returns `true` when something was removed.
    pub fn unsubscribe(&mut self, event: &str, listener_name: &str) -> bool {
        let Some(list) = self.listeners.get_mut(event) else {
            return false;
        };
        let before = list.len();
        list.retain(|l| l.name != listener_name);
        list.len() != before
    }

    pub fn listener_count(&self, event: &str) -> usize {
        self.listeners.get(event).map_or(0, Vec::len)
    }

    /// Deliver `event` synchronously to every listener subscribed to its
    /// name, in registration order, on the calling thread.
    pub fn emit(&self, event: &PacketEvent) -> DispatchReport {
        let mut report = DispatchReport::default();
        let Some(list) = self.listeners.get(event.name()) else {
            return report;
        };
        for listener in list {
            report.delivered += 1;
            if let Err(error) = (listener.callback)(event) {
                warn!(
                    event = event.name(),
                    listener = %listener.name,
                    %error,
                    "listener failed during dispatch"
                );
                report.failures.push(ListenerFailure {
                    listener: listener.name.clone(),
                    error,
                });
            }
        }
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;
    use parking_lot::Mutex;

    #[derive(Debug, PartialEq, Eq)]
    struct FakeConnection(u32);

    #[test]
    fn test_event_names_are_wire_stable() {
        let conn = ProtocolRef::new(FakeConnection(1));
        assert_eq!(PacketEvent::received(conn.clone()).name(), "packet_receive");
        assert_eq!(PacketEvent::sent(conn).name(), "packet_send");
    }

    #[test]
    fn test_protocol_ref_round_trips_opaquely() {
        let event = PacketEvent::received(ProtocolRef::new(FakeConnection(7)));
        let conn = event.protocol().downcast_ref::<FakeConnection>();
        assert_eq!(conn, Some(&FakeConnection(7)));
        assert!(event.protocol().downcast_ref::<String>().is_none());
    }

    #[test]
    fn test_emit_respects_registration_order() {
        let order = Arc::new(Mutex::new(Vec::new()));
        let mut bus = EventBus::new();
        for tag in ["first", "second", "third"] {
            let order = Arc::clone(&order);
            bus.subscribe(PACKET_RECEIVE, tag, move |_| {
                order.lock().push(tag);
                Ok(())
            });
        }

        let report = bus.emit(&PacketEvent::received(ProtocolRef::new(FakeConnection(1))));
        assert!(report.is_clean());
        assert_eq!(report.delivered, 3);
        assert_eq!(*order.lock(), vec!["first", "second", "third"]);
    }

    #[test]
    fn test_failure_is_isolated_and_reported() {
        let ran = Arc::new(Mutex::new(Vec::new()));
        let mut bus = EventBus::new();

        bus.subscribe(PACKET_RECEIVE, "broken", |_| Err(anyhow!("listener blew up")));
        {
            let ran = Arc::clone(&ran);
            bus.subscribe(PACKET_RECEIVE, "survivor", move |_| {
                ran.lock().push("survivor");
                Ok(())
            });
        }

        let report = bus.emit(&PacketEvent::received(ProtocolRef::new(FakeConnection(1))));
        assert_eq!(report.delivered, 2);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].listener, "broken");
        assert_eq!(*ran.lock(), vec!["survivor"], "later listener still ran");
    }

    #[test]
    fn test_emit_with_no_listeners_is_a_noop() {
        let bus = EventBus::new();
        let report = bus.emit(&PacketEvent::sent(ProtocolRef::new(FakeConnection(1))));
        assert_eq!(report.delivered, 0);
        assert!(report.is_clean());
    }

    #[test]
    fn test_listeners_are_name_scoped() {
        let hits = Arc::new(Mutex::new(0u32));
        let mut bus = EventBus::new();
        {
            let hits = Arc::clone(&hits);
            bus.subscribe(PACKET_SEND, "send_only", move |_| {
                *hits.lock() += 1;
                Ok(())
            });
        }

        bus.emit(&PacketEvent::received(ProtocolRef::new(FakeConnection(1))));
        assert_eq!(*hits.lock(), 0, "receive must not reach a send listener");

        bus.emit(&PacketEvent::sent(ProtocolRef::new(FakeConnection(1))));
        assert_eq!(*hits.lock(), 1);
    }

    #[test]
    fn test_unsubscribe() {
        let mut bus = EventBus::new();
        bus.subscribe(PACKET_RECEIVE, "temp", |_| Ok(()));
        assert_eq!(bus.listener_count(PACKET_RECEIVE), 1);
        assert!(bus.unsubscribe(PACKET_RECEIVE, "temp"));
        assert!(!bus.unsubscribe(PACKET_RECEIVE, "temp"));
        assert_eq!(bus.listener_count(PACKET_RECEIVE), 0);
    }
}
