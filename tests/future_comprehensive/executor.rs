//! Executor Tests
//!
//! Tests for `run` and friends: synchronous work in, a future out.

use crate::*;
use manana::{run_on, run_with_signal_on, ThreadSpawner};
use std::sync::mpsc;
use std::thread;

#[test]
fn run_success() {
    init_tracing();
    let future = run(|| Ok::<_, String>("result".to_string()));
    assert_eq!(future.get_timeout(SOON), Ok("result".to_string()));
}

#[test]
fn run_failure() {
    let future = run(|| Err::<u32, _>("permission denied".to_string()));
    assert_eq!(
        future.get_timeout(SOON),
        Err(WaitError::Failed("permission denied".to_string()))
    );
}

#[test]
fn run_returns_before_work_finishes() {
    let (release_tx, release_rx) = mpsc::channel::<()>();
    let future = run(move || {
        release_rx.recv().unwrap();
        Ok::<u32, String>(1)
    });

    assert!(!future.is_completed());
    release_tx.send(()).unwrap();
    assert_eq!(future.get_timeout(SOON), Ok(1));
}

#[test]
fn run_panic_cancels_future() {
    init_tracing();
    let future = run(|| -> std::result::Result<u32, String> { panic!("worker exploded") });
    assert_eq!(future.get_timeout(SOON), Err(WaitError::Canceled));
}

#[test]
fn run_callbacks_fire() {
    let future = run(|| Ok::<u32, String>(6));
    let (tx, rx) = mpsc::channel();
    future.on_success(move |v| tx.send(v).unwrap());
    assert_eq!(recv_exactly(&rx, 1), vec![6]);
}

#[test]
fn run_with_signal_stops_on_cancel() {
    let (started_tx, started_rx) = mpsc::channel();
    let (stopped_tx, stopped_rx) = mpsc::channel();

    let future = run_with_signal(move |signal| {
        started_tx.send(()).unwrap();
        signal.wait();
        stopped_tx.send(()).unwrap();
        Ok::<u32, String>(0)
    });

    recv_exactly(&started_rx, 1);
    future.cancel().unwrap();
    recv_exactly(&stopped_rx, 1);

    // The late result was discarded.
    assert_eq!(future.get_timeout(SOON), Err(WaitError::Canceled));
}

#[test]
fn run_with_signal_polls_signal() {
    let future = run_with_signal(|signal| {
        let mut rounds = 0u32;
        while !signal.is_canceled() && rounds < 5 {
            rounds += 1;
            thread::sleep(Duration::from_millis(1));
        }
        Ok::<u32, String>(rounds)
    });
    assert_eq!(future.get_timeout(SOON), Ok(5));
}

#[test]
fn run_on_named_threads() {
    let spawner = Arc::new(
        ThreadSpawner::builder()
            .name_prefix("manana-io")
            .build(),
    );
    let shared: Arc<dyn Spawn> = spawner.clone();
    let future = run_on(shared, || {
        Ok::<_, String>(thread::current().name().map(str::to_string))
    });

    let name = future.get_timeout(SOON).unwrap().unwrap();
    assert!(name.starts_with("manana-io-"), "unexpected thread name {name}");
    assert!(spawner.spawned() >= 1);
}

#[test]
fn run_on_inline_spawner_completes_synchronously() {
    let future = run_with_signal_on(inline_spawner(), |signal| {
        assert!(!signal.is_canceled());
        Ok::<u32, String>(42)
    });
    assert_eq!(future.try_get(), Some(Ok(42)));
}
