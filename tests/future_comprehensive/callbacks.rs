//! Callback Tests
//!
//! Tests for the register-any-time contract:
//! - callbacks registered before completion fire once
//! - callbacks registered after completion fire once, immediately
//! - callbacks of the same kind keep subscription order

use crate::*;
use parking_lot::Mutex;
use std::sync::mpsc;
use std::thread;

#[test]
fn on_success_before_completion() {
    init_tracing();
    let (producer, future) = promise::<String, String>();
    let (tx, rx) = mpsc::channel();

    future.on_success(move |v| tx.send(v).unwrap());
    producer.succeed("ok".to_string()).unwrap();

    assert_eq!(recv_exactly(&rx, 1), vec!["ok".to_string()]);
}

#[test]
fn on_success_after_completion() {
    let (producer, future) = promise::<String, String>();
    producer.succeed("ok".to_string()).unwrap();

    let (tx, rx) = mpsc::channel();
    future.on_success(move |v| tx.send(v).unwrap());

    assert_eq!(recv_exactly(&rx, 1), vec!["ok".to_string()]);
}

#[test]
fn both_early_and_late_subscribers_receive_value() {
    // Regression check against "last subscriber wins" semantics: every
    // registered callback must run, not just the most recent one.
    let (producer, future) = promise::<&'static str, String>();
    let (tx, rx) = mpsc::channel();

    let first = tx.clone();
    future.on_success(move |v| first.send(("first", v)).unwrap());
    let second = tx.clone();
    future.on_success(move |v| second.send(("second", v)).unwrap());
    producer.succeed("suceeded!").unwrap();
    let third = tx;
    future.on_success(move |v| third.send(("third", v)).unwrap());

    let mut got = recv_exactly(&rx, 3);
    got.sort();
    assert_eq!(
        got,
        vec![
            ("first", "suceeded!"),
            ("second", "suceeded!"),
            ("third", "suceeded!"),
        ]
    );
}

#[test]
fn on_fail_receives_error() {
    let (producer, future) = promise::<u32, String>();
    let (tx, rx) = mpsc::channel();
    let late_tx = tx.clone();

    future.on_fail(move |e| tx.send(e).unwrap());
    producer.fail("timeout upstream".to_string()).unwrap();
    future.on_fail(move |e| late_tx.send(e).unwrap());

    assert_eq!(
        recv_exactly(&rx, 2),
        vec!["timeout upstream".to_string(), "timeout upstream".to_string()]
    );
}

#[test]
fn on_complete_fires_for_success_and_failure() {
    let (ok_producer, ok_future) = promise::<u32, String>();
    let (err_producer, err_future) = promise::<u32, String>();
    let (tx, rx) = mpsc::channel();

    let ok_tx = tx.clone();
    ok_future.on_complete(move |r| ok_tx.send(r).unwrap());
    err_future.on_complete(move |r| tx.send(r).unwrap());

    ok_producer.succeed(1).unwrap();
    err_producer.fail("e".to_string()).unwrap();

    let mut got = recv_exactly(&rx, 2);
    got.sort();
    assert_eq!(got, vec![Ok(1), Err("e".to_string())]);
}

#[test]
fn success_does_not_fire_failure_callbacks() {
    let (producer, future) = promise::<u32, String>();
    let (tx, rx) = mpsc::channel::<String>();

    future.on_fail(move |e| tx.send(e).unwrap());
    producer.succeed(1).unwrap();

    // Sender dropped with the discarded callback.
    assert_eq!(
        rx.recv_timeout(SOON),
        Err(mpsc::RecvTimeoutError::Disconnected)
    );
}

#[test]
fn same_kind_order_is_subscription_order() {
    let producer = Promise::<u32, String>::builder()
        .label("ordered")
        .build();
    let future = producer.future();
    let order = Arc::new(Mutex::new(Vec::new()));
    let (tx, rx) = mpsc::channel();

    for i in 0..20 {
        let order = Arc::clone(&order);
        let tx = tx.clone();
        future.on_success(move |_| {
            order.lock().push(i);
            tx.send(()).unwrap();
        });
    }
    producer.succeed(0).unwrap();

    recv_exactly(&rx, 20);
    assert_eq!(*order.lock(), (0..20).collect::<Vec<_>>());
}

#[test]
fn callback_runs_off_completing_thread() {
    let (producer, future) = promise::<u32, String>();
    let (tx, rx) = mpsc::channel();
    future.on_complete(move |_| tx.send(thread::current().id()).unwrap());

    producer.succeed(1).unwrap();
    let callback_thread = recv_exactly(&rx, 1).remove(0);
    assert_ne!(callback_thread, thread::current().id());
}

#[test]
fn slow_callback_does_not_block_producer() {
    let (producer, future) = promise::<u32, String>();
    let (release_tx, release_rx) = mpsc::channel::<()>();
    let (done_tx, done_rx) = mpsc::channel();

    future.on_success(move |_| {
        release_rx.recv().unwrap();
        done_tx.send(()).unwrap();
    });

    // succeed() returns while the callback is still parked.
    producer.succeed(1).unwrap();
    assert_eq!(future.get(), Ok(1));

    release_tx.send(()).unwrap();
    recv_exactly(&done_rx, 1);
}

#[test]
fn panicking_callback_does_not_poison_cell() {
    init_tracing();
    let (producer, future) = promise::<u32, String>();
    let (tx, rx) = mpsc::channel();

    future.on_success(|_| panic!("callback bug"));
    future.on_success(move |v| tx.send(v).unwrap());
    producer.succeed(9).unwrap();

    assert_eq!(recv_exactly(&rx, 1), vec![9]);
    assert_eq!(future.get(), Ok(9));
}

#[test]
fn custom_spawner_receives_callbacks() {
    let spawned = Arc::new(Mutex::new(0usize));
    let counter = Arc::clone(&spawned);
    let spawner: Arc<dyn Spawn> = Arc::new(move |task: Task| {
        *counter.lock() += 1;
        thread::spawn(task);
    });

    let producer = Promise::<u32, String>::builder().spawner(spawner).build();
    let future = producer.future();
    let (tx, rx) = mpsc::channel();
    let complete_tx = tx.clone();
    future.on_success(move |v| tx.send(v).unwrap());
    future.on_complete(move |r| complete_tx.send(r.unwrap()).unwrap());

    producer.succeed(4).unwrap();
    recv_exactly(&rx, 2);
    // One task per callback group.
    assert_eq!(*spawned.lock(), 2);
}
