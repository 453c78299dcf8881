//! Eventual: a chainable deferred-value (promise) primitive
//!
//! A [`Promise<T>`] represents the eventual result of an asynchronous
//! operation and lets consumers compose chains of transformations, error
//! handlers, progress notifications, and cleanup actions without blocking.
//! The producer supplied at construction runs lazily: nothing happens until
//! some link of the chain is observed, and then the original producer runs
//! exactly once no matter how many links exist.
//!
//! # Features
//!
//! - **Settle-once state machine**: pending, fulfilled, or rejected, with a
//!   single mutex-guarded transition; late or duplicate settlements are
//!   ignored, never fatal
//! - **Uniform chaining**: callbacks registered before and after settlement
//!   take the same branch logic, so observation order never changes outcomes
//! - **Lazy chain start**: one shared root trigger per chain, armed by the
//!   first chaining call anywhere in the chain
//! - **Concurrency-agnostic**: no threads are spawned and no scheduler is
//!   imposed; producers settle from whatever context they like, including
//!   other threads
//!
//! # Quick Start
//!
//! ```
//! use eventual::Promise;
//!
//! let fetch = Promise::new(|resolve, _reject| {
//!     // Real producers would hand these capabilities to a timer, a
//!     // network callback, or a worker thread.
//!     resolve(42);
//! });
//!
//! let label = fetch.then(|n: i32| n + 1).then(|n| n.to_string());
//! assert_eq!(label.value(), Some("43".to_string()));
//!
//! let recovered = Promise::<i32>::rejected("timeout")
//!     .on_error(|e| eprintln!("failed: {e}"))
//!     .finally(|| "done");
//! assert_eq!(recovered.value(), Some("done"));
//! ```
//!
//! # Module Overview
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`promise`] | The [`Promise`] state machine, chaining operations, and combinators |
//! | [`error`](PromiseError) | The opaque [`PromiseError`] carried through chains |

// The callback queues and producer signatures are boxed trait objects, which
// trips clippy's type_complexity lint on internal plumbing.
#![allow(clippy::type_complexity)]

pub mod promise;

mod error;

pub use error::{PromiseError, Result};
pub use promise::{
    EmptyPromise, Promise, PromiseState, Reject, ReportProgress, Resolve, Settlement,
};

/// Eventual version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
