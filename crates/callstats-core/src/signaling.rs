//! Inbound contract of a signaling engine, as seen by an observer.
//!
//! The engine owns users, rooms and namespaces. Observers only ever see them
//! through these traits and attach to their channels; nothing here lets an
//! observer mutate an entity.
//!
//! Room and namespace grouping are optional capabilities: an engine that has
//! no notion of rooms returns `None` from [`Signaling::rooms`].

use std::sync::Arc;

use crate::event::EventChannel;

/// A connected participant.
pub trait User: Send + Sync {
    /// Terminal event: the user disconnected.
    fn left(&self) -> &EventChannel<()>;
}

/// A room grouping connected users.
pub trait Room: Send + Sync {
    fn peer_count(&self) -> usize;
    /// Emits the new peer-set size whenever membership changes.
    fn peers_changed(&self) -> &EventChannel<usize>;
    /// Terminal event.
    fn closed(&self) -> &EventChannel<()>;
}

/// A signaling namespace with its subscribed users, registered users and
/// child rooms.
pub trait Namespace: Send + Sync {
    fn subscribed_count(&self) -> usize;
    fn registered_count(&self) -> usize;
    fn room_count(&self) -> usize;
    fn subscribed_changed(&self) -> &EventChannel<usize>;
    fn registered_changed(&self) -> &EventChannel<usize>;
    fn rooms_changed(&self) -> &EventChannel<usize>;
    /// Terminal event.
    fn closed(&self) -> &EventChannel<()>;
}

pub trait RoomRegistry: Send + Sync {
    fn new_room(&self) -> &EventChannel<Arc<dyn Room>>;
}

pub trait NamespaceRegistry: Send + Sync {
    fn new_namespace(&self) -> &EventChannel<Arc<dyn Namespace>>;
}

/// Top-level signaling engine.
pub trait Signaling: Send + Sync {
    fn new_user(&self) -> &EventChannel<Arc<dyn User>>;

    /// Room-grouping capability, if the engine has one.
    fn rooms(&self) -> Option<&dyn RoomRegistry> {
        None
    }

    /// Namespace-grouping capability, if the engine has one.
    fn namespaces(&self) -> Option<&dyn NamespaceRegistry> {
        None
    }
}
