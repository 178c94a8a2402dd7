//! Timeout Tests
//!
//! A bounded wait reports Timeout without touching the cell; a later wait
//! still sees the real outcome.

use crate::*;
use std::thread;
use std::time::Instant;

#[test]
fn get_timeout_expires_before_completion() {
    init_tracing();
    let (producer, future) = promise::<u32, String>();
    let completer = thread::spawn(move || {
        thread::sleep(Duration::from_millis(500));
        producer.succeed(10).unwrap();
    });

    let started = Instant::now();
    assert_eq!(
        future.get_timeout(Duration::from_millis(100)),
        Err(WaitError::Timeout)
    );
    assert!(started.elapsed() >= Duration::from_millis(100));
    assert_eq!(future.status(), FutureStatus::Pending);

    // The cell is untouched, so an unbounded wait still gets the value.
    assert_eq!(future.get(), Ok(10));
    completer.join().unwrap();
}

#[test]
fn get_timeout_returns_early_on_completion() {
    let (producer, future) = promise::<u32, String>();
    let completer = thread::spawn(move || {
        thread::sleep(Duration::from_millis(20));
        producer.succeed(3).unwrap();
    });

    let started = Instant::now();
    assert_eq!(future.get_timeout(SOON), Ok(3));
    assert!(started.elapsed() < SOON);
    completer.join().unwrap();
}

#[test]
fn get_timeout_on_completed_future() {
    let (producer, future) = promise::<u32, String>();
    producer.fail("bad".to_string()).unwrap();

    assert_eq!(
        future.get_timeout(Duration::ZERO),
        Err(WaitError::Failed("bad".to_string()))
    );
}

#[test]
fn zero_timeout_on_pending_future() {
    let (_producer, future) = promise::<u32, String>();
    assert_eq!(future.get_timeout(Duration::ZERO), Err(WaitError::Timeout));
    assert!(!future.is_completed());
}

#[test]
fn huge_timeout_behaves_like_get() {
    let (producer, future) = promise::<u32, String>();
    producer.succeed(1).unwrap();
    assert_eq!(future.get_timeout(Duration::MAX), Ok(1));
}

#[test]
fn timeout_maps_to_facade_error() {
    let (_producer, future) = promise::<u32, String>();
    let err: Error = future.get_timeout(Duration::from_millis(1)).unwrap_err().into();
    assert!(err.is_timeout());
}
