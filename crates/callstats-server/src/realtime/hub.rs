//! Peers and rooms of the reference hub.
//!
//! Room sizes are read through [`Membership`], the same view peak trackers
//! seed from.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use dashmap::mapref::entry::Entry;
use dashmap::{DashMap, DashSet};
use tracing::debug;

use callstats_core::event::EventChannel;
use callstats_core::signaling::{Room, RoomRegistry, Signaling, User};

use crate::stats::{Membership, PeakTracker};

/// One connected peer.
pub struct Peer {
    id: String,
    rooms: DashSet<String>,
    left: EventChannel<()>,
}

impl Peer {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn rooms(&self) -> Vec<String> {
        self.rooms.iter().map(|r| r.key().clone()).collect()
    }
}

impl User for Peer {
    fn left(&self) -> &EventChannel<()> {
        &self.left
    }
}

/// A room and its peer set.
pub struct HubRoom {
    name: String,
    peers: DashSet<String>,
    peers_changed: EventChannel<usize>,
    closed: EventChannel<()>,
}

impl HubRoom {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            peers: DashSet::new(),
            peers_changed: EventChannel::new(),
            closed: EventChannel::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn peers(&self) -> Vec<String> {
        self.peers.iter().map(|p| p.key().clone()).collect()
    }

    /// Peak tracker seeded from the current peer set.
    pub fn peak_tracker(&self) -> PeakTracker {
        PeakTracker::bind(&self.peers)
    }
}

impl Room for HubRoom {
    fn peer_count(&self) -> usize {
        self.peers.member_count()
    }

    fn peers_changed(&self) -> &EventChannel<usize> {
        &self.peers_changed
    }

    fn closed(&self) -> &EventChannel<()> {
        &self.closed
    }
}

/// Room registry: room_key -> room. A room exists while it has peers.
#[derive(Default)]
pub struct RoomDirectory {
    rooms: DashMap<String, Arc<HubRoom>>,
    new_room: EventChannel<Arc<dyn Room>>,
}

impl RoomDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, room_key: &str) -> Option<Arc<HubRoom>> {
        self.rooms.get(room_key).map(|r| Arc::clone(r.value()))
    }

    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }

    /// Add `peer` to `room_key`, creating the room on first join.
    ///
    /// Membership changes happen under the room's shard lock; events are
    /// emitted after it is released.
    pub fn join(&self, room_key: &str, peer: &Peer) {
        let (room, created, inserted) = match self.rooms.entry(room_key.to_string()) {
            Entry::Occupied(e) => {
                let room = Arc::clone(e.get());
                let inserted = room.peers.insert(peer.id.clone());
                (room, false, inserted)
            }
            Entry::Vacant(e) => {
                let room = Arc::new(HubRoom::new(room_key));
                let slot = e.insert(Arc::clone(&room));
                let inserted = slot.peers.insert(peer.id.clone());
                (room, true, inserted)
            }
        };
        peer.rooms.insert(room_key.to_string());

        if created {
            debug!(room = room_key, "room opened");
            let as_room: Arc<dyn Room> = room.clone();
            self.new_room.emit(&as_room);
        }
        if inserted {
            room.peers_changed.emit(&room.peer_count());
        }
    }

    /// Remove `peer` from `room_key`; the room closes when its last peer leaves.
    pub fn leave(&self, room_key: &str, peer: &Peer) {
        peer.rooms.remove(room_key);

        let Some(room) = self.get(room_key) else { return; };
        let removed = {
            // read guard: a concurrent join into this room waits for the removal
            let _shard = self.rooms.get(room_key);
            room.peers.remove(&peer.id).is_some()
        };
        if !removed {
            return;
        }
        room.peers_changed.emit(&room.peer_count());

        let closed = self
            .rooms
            .remove_if(room_key, |_, r| Arc::ptr_eq(r, &room) && r.peers.is_empty())
            .is_some();
        if closed {
            debug!(room = room_key, "room closed");
            room.closed.emit(&());
        }
    }
}

impl RoomRegistry for RoomDirectory {
    fn new_room(&self) -> &EventChannel<Arc<dyn Room>> {
        &self.new_room
    }
}

/// Peers plus rooms, observable through [`Signaling`].
#[derive(Default)]
pub struct SignalingHub {
    peers: DashMap<String, Arc<Peer>>,
    rooms: RoomDirectory,
    new_user: EventChannel<Arc<dyn User>>,
    seq: AtomicU64,
}

impl SignalingHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a peer under a fresh id and announce it.
    pub fn connect(&self) -> Arc<Peer> {
        let n = self.seq.fetch_add(1, Ordering::Relaxed) + 1;
        let peer = Arc::new(Peer {
            id: format!("peer-{n}"),
            rooms: DashSet::new(),
            left: EventChannel::new(),
        });
        self.peers.insert(peer.id.clone(), Arc::clone(&peer));
        debug!(peer = %peer.id, "peer connected");

        let as_user: Arc<dyn User> = peer.clone();
        self.new_user.emit(&as_user);
        peer
    }

    pub fn join(&self, room_key: &str, peer: &Peer) {
        self.rooms.join(room_key, peer);
    }

    pub fn leave(&self, room_key: &str, peer: &Peer) {
        self.rooms.leave(room_key, peer);
    }

    /// Leave every room, then announce departure. Idempotent.
    pub fn disconnect(&self, peer: &Peer) {
        for room in peer.rooms() {
            self.rooms.leave(&room, peer);
        }
        if self.peers.remove(&peer.id).is_some() {
            debug!(peer = %peer.id, "peer left");
            peer.left.emit(&());
        }
    }

    pub fn peer_count(&self) -> usize {
        self.peers.len()
    }

    pub fn room_directory(&self) -> &RoomDirectory {
        &self.rooms
    }
}

impl Signaling for SignalingHub {
    fn new_user(&self) -> &EventChannel<Arc<dyn User>> {
        &self.new_user
    }

    fn rooms(&self) -> Option<&dyn RoomRegistry> {
        Some(&self.rooms)
    }
}
