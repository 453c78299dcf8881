//! Shared helpers for integration tests

use eventual::{Promise, PromiseError};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

/// A promise whose producer resolves with `value` from a background thread
/// after `delay`. The thread is spawned only once the chain is armed.
#[allow(dead_code)]
pub fn resolve_later<T: Clone + Send + 'static>(value: T, delay: Duration) -> Promise<T> {
    Promise::new(move |resolve, _reject| {
        thread::spawn(move || {
            thread::sleep(delay);
            resolve(value);
        });
    })
}

/// A promise whose producer rejects with `error` from a background thread
/// after `delay`.
#[allow(dead_code)]
pub fn reject_later<T: Clone + Send + 'static>(error: PromiseError, delay: Duration) -> Promise<T> {
    Promise::new(move |_resolve, reject| {
        thread::spawn(move || {
            thread::sleep(delay);
            reject(error);
        });
    })
}

/// Block until `promise` fulfills, with a timeout guard.
#[allow(dead_code)]
pub fn wait_for<T: Clone + Send + 'static>(promise: &Promise<T>) -> T {
    let (tx, rx) = mpsc::channel();
    promise.then(move |value| {
        let _ = tx.send(value);
    });
    rx.recv_timeout(Duration::from_secs(2))
        .expect("promise did not fulfill in time")
}

/// Block until `promise` rejects, with a timeout guard.
#[allow(dead_code)]
pub fn wait_for_error<T: Clone + Send + 'static>(promise: &Promise<T>) -> PromiseError {
    let (tx, rx) = mpsc::channel();
    promise.on_error(move |error| {
        let _ = tx.send(error);
    });
    rx.recv_timeout(Duration::from_secs(2))
        .expect("promise did not reject in time")
}
