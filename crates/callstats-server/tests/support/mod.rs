//! Test doubles for the signaling contract.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use callstats_core::event::EventChannel;
use callstats_core::signaling::{Namespace, NamespaceRegistry, Room, RoomRegistry, Signaling, User};

#[derive(Default)]
pub struct FakeUser {
    pub left: EventChannel<()>,
}

impl User for FakeUser {
    fn left(&self) -> &EventChannel<()> {
        &self.left
    }
}

#[derive(Default)]
pub struct FakeRoom {
    peers: AtomicUsize,
    pub peers_changed: EventChannel<usize>,
    pub closed: EventChannel<()>,
}

impl FakeRoom {
    pub fn with_peers(n: usize) -> Self {
        let room = Self::default();
        room.peers.store(n, Ordering::SeqCst);
        room
    }

    pub fn set_peers(&self, n: usize) {
        self.peers.store(n, Ordering::SeqCst);
        self.peers_changed.emit(&n);
    }

    pub fn close(&self) {
        self.closed.emit(&());
    }
}

impl Room for FakeRoom {
    fn peer_count(&self) -> usize {
        self.peers.load(Ordering::SeqCst)
    }
    fn peers_changed(&self) -> &EventChannel<usize> {
        &self.peers_changed
    }
    fn closed(&self) -> &EventChannel<()> {
        &self.closed
    }
}

#[derive(Default)]
pub struct FakeNamespace {
    subscribed: AtomicUsize,
    registered: AtomicUsize,
    rooms: AtomicUsize,
    pub subscribed_changed: EventChannel<usize>,
    pub registered_changed: EventChannel<usize>,
    pub rooms_changed: EventChannel<usize>,
    pub closed: EventChannel<()>,
}

impl FakeNamespace {
    pub fn with_sizes(subscribed: usize, registered: usize, rooms: usize) -> Self {
        let ns = Self::default();
        ns.subscribed.store(subscribed, Ordering::SeqCst);
        ns.registered.store(registered, Ordering::SeqCst);
        ns.rooms.store(rooms, Ordering::SeqCst);
        ns
    }

    pub fn set_subscribed(&self, n: usize) {
        self.subscribed.store(n, Ordering::SeqCst);
        self.subscribed_changed.emit(&n);
    }

    pub fn set_registered(&self, n: usize) {
        self.registered.store(n, Ordering::SeqCst);
        self.registered_changed.emit(&n);
    }

    pub fn set_rooms(&self, n: usize) {
        self.rooms.store(n, Ordering::SeqCst);
        self.rooms_changed.emit(&n);
    }

    pub fn listener_count(&self) -> usize {
        self.subscribed_changed.listener_count()
            + self.registered_changed.listener_count()
            + self.rooms_changed.listener_count()
            + self.closed.listener_count()
    }
}

impl Namespace for FakeNamespace {
    fn subscribed_count(&self) -> usize {
        self.subscribed.load(Ordering::SeqCst)
    }
    fn registered_count(&self) -> usize {
        self.registered.load(Ordering::SeqCst)
    }
    fn room_count(&self) -> usize {
        self.rooms.load(Ordering::SeqCst)
    }
    fn subscribed_changed(&self) -> &EventChannel<usize> {
        &self.subscribed_changed
    }
    fn registered_changed(&self) -> &EventChannel<usize> {
        &self.registered_changed
    }
    fn rooms_changed(&self) -> &EventChannel<usize> {
        &self.rooms_changed
    }
    fn closed(&self) -> &EventChannel<()> {
        &self.closed
    }
}

#[derive(Default)]
pub struct FakeRooms {
    pub new_room: EventChannel<Arc<dyn Room>>,
}

impl RoomRegistry for FakeRooms {
    fn new_room(&self) -> &EventChannel<Arc<dyn Room>> {
        &self.new_room
    }
}

#[derive(Default)]
pub struct FakeNamespaces {
    pub new_namespace: EventChannel<Arc<dyn Namespace>>,
}

impl NamespaceRegistry for FakeNamespaces {
    fn new_namespace(&self) -> &EventChannel<Arc<dyn Namespace>> {
        &self.new_namespace
    }
}

/// Signaling double with optional room / namespace capabilities.
#[derive(Default)]
pub struct FakeSignaling {
    pub new_user: EventChannel<Arc<dyn User>>,
    pub rooms: Option<FakeRooms>,
    pub namespaces: Option<FakeNamespaces>,
}

impl FakeSignaling {
    pub fn users_only() -> Self {
        Self::default()
    }

    pub fn with_rooms() -> Self {
        Self {
            rooms: Some(FakeRooms::default()),
            ..Self::default()
        }
    }

    pub fn full() -> Self {
        Self {
            rooms: Some(FakeRooms::default()),
            namespaces: Some(FakeNamespaces::default()),
            ..Self::default()
        }
    }

    pub fn user(&self) -> Arc<FakeUser> {
        let user = Arc::new(FakeUser::default());
        let as_user: Arc<dyn User> = user.clone();
        self.new_user.emit(&as_user);
        user
    }

    pub fn room(&self, peers: usize) -> Arc<FakeRoom> {
        let room = Arc::new(FakeRoom::with_peers(peers));
        if let Some(rooms) = &self.rooms {
            let as_room: Arc<dyn Room> = room.clone();
            rooms.new_room.emit(&as_room);
        }
        room
    }

    pub fn namespace(&self, subscribed: usize, registered: usize, rooms: usize) -> Arc<FakeNamespace> {
        let ns = Arc::new(FakeNamespace::with_sizes(subscribed, registered, rooms));
        if let Some(namespaces) = &self.namespaces {
            let as_ns: Arc<dyn Namespace> = ns.clone();
            namespaces.new_namespace.emit(&as_ns);
        }
        ns
    }
}

impl Signaling for FakeSignaling {
    fn new_user(&self) -> &EventChannel<Arc<dyn User>> {
        &self.new_user
    }

    fn rooms(&self) -> Option<&dyn RoomRegistry> {
        self.rooms.as_ref().map(|r| r as &dyn RoomRegistry)
    }

    fn namespaces(&self) -> Option<&dyn NamespaceRegistry> {
        self.namespaces.as_ref().map(|n| n as &dyn NamespaceRegistry)
    }
}

/// Value of an unlabelled sample line (`name value`) in a text exposition.
pub fn sample(text: &str, series: &str) -> Option<f64> {
    text.lines()
        .filter(|l| !l.starts_with('#'))
        .find_map(|l| {
            let (name, value) = l.rsplit_once(' ')?;
            (name == series).then(|| value.parse().ok()).flatten()
        })
}
