//! Event channel subscribe / cancel / one-shot semantics.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;

use callstats_core::event::{EventChannel, Subscription};

#[test]
fn repeating_listener_sees_every_emission_in_order() {
    let ch = EventChannel::<usize>::new();
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let _sub = ch.on(move |n| sink.lock().unwrap().push(*n));

    for n in [3, 2, 5, 1] {
        ch.emit(&n);
    }
    assert_eq!(*seen.lock().unwrap(), vec![3, 2, 5, 1]);
}

#[test]
fn cancel_detaches_listener() {
    let ch = EventChannel::<()>::new();
    let hits = Arc::new(AtomicUsize::new(0));
    let h = Arc::clone(&hits);
    let sub = ch.on(move |_| {
        h.fetch_add(1, Ordering::SeqCst);
    });

    ch.emit(&());
    sub.cancel();
    ch.emit(&());

    assert_eq!(hits.load(Ordering::SeqCst), 1);
    assert_eq!(ch.listener_count(), 0);
}

#[test]
fn dropping_subscription_detaches_listener() {
    let ch = EventChannel::<()>::new();
    {
        let _sub = ch.on(|_| {});
        assert_eq!(ch.listener_count(), 1);
    }
    assert_eq!(ch.listener_count(), 0);
}

#[test]
fn disarmed_subscription_stays_attached() {
    let ch = EventChannel::<()>::new();
    let hits = Arc::new(AtomicUsize::new(0));
    let h = Arc::clone(&hits);
    ch.on(move |_| {
        h.fetch_add(1, Ordering::SeqCst);
    })
    .disarm();

    ch.emit(&());
    ch.emit(&());
    assert_eq!(hits.load(Ordering::SeqCst), 2);
}

#[test]
fn once_fires_a_single_time() {
    let ch = EventChannel::<()>::new();
    let hits = Arc::new(AtomicUsize::new(0));
    let h = Arc::clone(&hits);
    ch.once(move |_| {
        h.fetch_add(1, Ordering::SeqCst);
    })
    .disarm();

    ch.emit(&());
    ch.emit(&());
    assert_eq!(hits.load(Ordering::SeqCst), 1);
    assert_eq!(ch.listener_count(), 0);
}

#[test]
fn once_is_exactly_once_under_concurrent_emit() {
    let ch = Arc::new(EventChannel::<()>::new());
    let hits = Arc::new(AtomicUsize::new(0));
    let h = Arc::clone(&hits);
    ch.once(move |_| {
        h.fetch_add(1, Ordering::SeqCst);
    })
    .disarm();

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let ch = Arc::clone(&ch);
            thread::spawn(move || ch.emit(&()))
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }
    assert_eq!(hits.load(Ordering::SeqCst), 1);
}

#[test]
fn listener_may_cancel_subscriptions_while_dispatching() {
    let change = Arc::new(EventChannel::<usize>::new());
    let terminal = EventChannel::<()>::new();
    let hits = Arc::new(AtomicUsize::new(0));

    let h = Arc::clone(&hits);
    let change_sub = change.on(move |_| {
        h.fetch_add(1, Ordering::SeqCst);
    });
    let held: Mutex<Option<Subscription>> = Mutex::new(Some(change_sub));
    terminal
        .once(move |_| {
            if let Some(sub) = held.lock().unwrap().take() {
                sub.cancel();
            }
        })
        .disarm();

    change.emit(&1);
    terminal.emit(&());
    change.emit(&2);

    assert_eq!(hits.load(Ordering::SeqCst), 1);
    assert_eq!(change.listener_count(), 0);
}

#[test]
fn subscription_outliving_channel_is_harmless() {
    let sub = {
        let ch = EventChannel::<()>::new();
        ch.on(|_| {})
    };
    sub.cancel();
}
