//! Combinators over collections of promises.
//!
//! Each combinator is itself a lazy promise: subscribing to its result arms
//! its producer, which in turn observes (and therefore arms) every input
//! chain. First-settlement-wins races between inputs are resolved by the
//! shared once-only resolve/reject adapters.

use super::root::once;
use super::Promise;
use crate::error::PromiseError;
use std::sync::{Arc, Mutex};

/// The outcome of one input to [`Promise::all_settled`].
#[derive(Debug, Clone, PartialEq)]
pub enum Settlement<T> {
    /// The input fulfilled with this value.
    Fulfilled(T),
    /// The input rejected with this error.
    Rejected(PromiseError),
}

/// Order-preserving accumulator for combinators that wait on every input.
struct Gather<U> {
    slots: Vec<Option<U>>,
    remaining: usize,
}

impl<U> Gather<U> {
    fn new(len: usize) -> Self {
        Gather {
            slots: (0..len).map(|_| None).collect(),
            remaining: len,
        }
    }

    /// Record one input's outcome; returns the collected results once every
    /// input has reported.
    fn record(&mut self, index: usize, value: U) -> Option<Vec<U>> {
        self.slots[index] = Some(value);
        self.remaining -= 1;
        if self.remaining == 0 {
            Some(self.slots.drain(..).flatten().collect())
        } else {
            None
        }
    }
}

impl<T: Clone + Send + 'static> Promise<T> {
    /// Resolve with every input's value, in input order, once all inputs
    /// fulfill; reject with the first rejection. An empty input resolves
    /// with an empty vector.
    pub fn all(promises: Vec<Promise<T>>) -> Promise<Vec<T>> {
        Promise::<Vec<T>>::new(move |resolve, reject| {
            if promises.is_empty() {
                resolve(Vec::new());
                return;
            }
            let gathered = Arc::new(Mutex::new(Gather::new(promises.len())));
            let resolve = once(resolve);
            let reject = once(reject);
            for (index, promise) in promises.into_iter().enumerate() {
                let gathered = Arc::clone(&gathered);
                let resolve = resolve.clone();
                let reject = reject.clone();
                promise
                    .then(move |value| {
                        let complete = gathered.lock().unwrap().record(index, value);
                        if let Some(values) = complete {
                            resolve(values);
                        }
                    })
                    .on_error(move |error| reject(error));
            }
        })
    }

    /// Settle exactly like the first input to settle, value or error. An
    /// empty input never settles.
    pub fn race(promises: Vec<Promise<T>>) -> Promise<T> {
        Promise::new(move |resolve, reject| {
            let resolve = once(resolve);
            let reject = once(reject);
            for promise in promises {
                let resolve = resolve.clone();
                let reject = reject.clone();
                promise
                    .then(move |value| resolve(value))
                    .on_error(move |error| reject(error));
            }
        })
    }

    /// Resolve with the first fulfillment. If every input rejects (or the
    /// input is empty), reject with [`PromiseError::Aggregate`] carrying the
    /// rejection reasons in input order.
    pub fn any(promises: Vec<Promise<T>>) -> Promise<T> {
        Promise::new(move |resolve, reject| {
            if promises.is_empty() {
                reject(PromiseError::Aggregate(Vec::new()));
                return;
            }
            let gathered = Arc::new(Mutex::new(Gather::new(promises.len())));
            let resolve = once(resolve);
            let reject = once(reject);
            for (index, promise) in promises.into_iter().enumerate() {
                let gathered = Arc::clone(&gathered);
                let resolve = resolve.clone();
                let reject = reject.clone();
                promise
                    .then(move |value| resolve(value))
                    .on_error(move |error| {
                        let complete = gathered.lock().unwrap().record(index, error);
                        if let Some(errors) = complete {
                            reject(PromiseError::Aggregate(errors));
                        }
                    });
            }
        })
    }

    /// Resolve once every input has settled, with one [`Settlement`] per
    /// input in input order. Never rejects.
    pub fn all_settled(promises: Vec<Promise<T>>) -> Promise<Vec<Settlement<T>>> {
        Promise::<Vec<Settlement<T>>>::new(move |resolve, _reject| {
            if promises.is_empty() {
                resolve(Vec::new());
                return;
            }
            let gathered = Arc::new(Mutex::new(Gather::new(promises.len())));
            let resolve = once(resolve);
            for (index, promise) in promises.into_iter().enumerate() {
                let record = {
                    let gathered = Arc::clone(&gathered);
                    let resolve = resolve.clone();
                    move |settlement: Settlement<T>| {
                        let complete = gathered.lock().unwrap().record(index, settlement);
                        if let Some(settlements) = complete {
                            resolve(settlements);
                        }
                    }
                };
                let on_success = record.clone();
                promise
                    .then(move |value| on_success(Settlement::Fulfilled(value)))
                    .on_error(move |error| record(Settlement::Rejected(error)));
            }
        })
    }
}
