//! The promise state machine and chaining protocol.
//!
//! A [`Promise<T>`] represents a value that becomes available at most once,
//! or fails. Its producer runs lazily: constructing a promise does nothing
//! until the chain is observed, at which point the chain's shared root
//! trigger runs the original producer exactly once (see [`root`] for the
//! cell that makes this work across derived promises).
//!
//! Settlement is a single mutex-guarded settle-once transition. Callback
//! queues are drained exactly once, in registration order, with the lock
//! released before any callback runs, so a continuation that settles another
//! promise never re-enters the transition that invoked it. The same branch
//! logic applies whether a source is observed before or after it settles.

mod combinators;
mod root;

pub use combinators::Settlement;

use crate::error::PromiseError;
use root::{once, ChainRoot};
use std::sync::{Arc, Mutex};
use tracing::trace;

/// Resolve capability handed to a producer. Consumes itself on call, so a
/// producer can fulfill its promise at most once by construction.
pub type Resolve<T> = Box<dyn FnOnce(T) + Send>;

/// Reject capability handed to a producer. Consumes itself on call.
pub type Reject = Box<dyn FnOnce(PromiseError) + Send>;

/// Progress-report capability handed to a producer. May be called any number
/// of times; producers are expected to stop reporting once they settle.
pub type ReportProgress = Box<dyn Fn(f64) + Send>;

/// A promise carrying no value, as produced by [`Promise::on_error`] and
/// [`Promise::progress`].
pub type EmptyPromise = Promise<()>;

type SuccessCallback<T> = Box<dyn FnOnce(T) + Send>;
type FailureCallback = Box<dyn FnOnce(PromiseError) + Send>;
type ProgressCallback = Box<dyn FnMut(f64) + Send>;
type Deferred = Option<Box<dyn FnOnce() + Send>>;

/// The caller-supplied function that performs the actual asynchronous work.
enum Producer<T> {
    Plain(Box<dyn FnOnce(Resolve<T>, Reject) + Send>),
    WithProgress(Box<dyn FnOnce(Resolve<T>, Reject, ReportProgress) + Send>),
}

/// Externally observable promise state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromiseState {
    /// Not yet settled.
    Pending,
    /// Settled with a value.
    Fulfilled,
    /// Settled with an error.
    Rejected,
}

/// Internal state, holding the settled payload. Monotonic: once it leaves
/// `Pending` it never changes again.
enum State<T> {
    Pending,
    Fulfilled(T),
    Rejected(PromiseError),
}

struct Shared<T> {
    state: State<T>,
    last_progress: Option<f64>,
    on_fulfilled: Vec<SuccessCallback<T>>,
    on_rejected: Vec<FailureCallback>,
    on_progress: Vec<ProgressCallback>,
    producer: Option<Producer<T>>,
    started: bool,
}

impl<T: Clone> Shared<T> {
    /// Owned snapshot of a settled state, `None` while pending.
    fn snapshot(&self) -> Option<Result<T, PromiseError>> {
        match &self.state {
            State::Pending => None,
            State::Fulfilled(value) => Some(Ok(value.clone())),
            State::Rejected(error) => Some(Err(error.clone())),
        }
    }
}

type SharedHandle<T> = Arc<Mutex<Shared<T>>>;

/// A value of type `T` that becomes available at most once, or fails.
///
/// Promises are cheap cloneable handles; every clone observes the same
/// shared state cell. Chaining operations ([`then`](Promise::then),
/// [`and_then`](Promise::and_then), [`on_error`](Promise::on_error),
/// [`finally`](Promise::finally), [`progress`](Promise::progress)) each
/// return a new derived promise wired to its source, and the first chaining
/// call anywhere in a chain runs the original producer exactly once.
///
/// # Example
///
/// ```
/// use eventual::Promise;
///
/// let p = Promise::new(|resolve, _reject| resolve(6));
/// let doubled = p.then(|n: i32| n * 2);
/// assert_eq!(doubled.value(), Some(12));
/// ```
pub struct Promise<T> {
    shared: SharedHandle<T>,
    root: Arc<ChainRoot>,
}

impl<T> Clone for Promise<T> {
    fn clone(&self) -> Self {
        Promise {
            shared: Arc::clone(&self.shared),
            root: Arc::clone(&self.root),
        }
    }
}

impl<T: Clone + Send + 'static> Promise<T> {
    /// Create a promise from a producer taking resolve and reject
    /// capabilities.
    ///
    /// The producer is not invoked here; it runs once, later, when the chain
    /// is first observed (or on an explicit [`start`](Promise::start) /
    /// [`arm`](Promise::arm)). It must eventually call one of its two
    /// capabilities; each consumes itself, and a late settlement racing an
    /// earlier one is ignored rather than being an error.
    pub fn new<F>(producer: F) -> Self
    where
        F: FnOnce(Resolve<T>, Reject) + Send + 'static,
    {
        Self::from_producer(Producer::Plain(Box::new(producer)))
    }

    /// Create a promise from a producer that also reports progress.
    ///
    /// The progress capability may be called any number of times before
    /// settlement; each report reaches every progress observer registered on
    /// the chain at that moment.
    pub fn with_progress<F>(producer: F) -> Self
    where
        F: FnOnce(Resolve<T>, Reject, ReportProgress) + Send + 'static,
    {
        Self::from_producer(Producer::WithProgress(Box::new(producer)))
    }

    /// A promise already fulfilled with `value`.
    pub fn resolved(value: T) -> Self {
        Self::born_settled(State::Fulfilled(value))
    }

    /// A promise already rejected with `error`.
    pub fn rejected(error: impl Into<PromiseError>) -> Self {
        Self::born_settled(State::Rejected(error.into()))
    }

    fn from_producer(producer: Producer<T>) -> Self {
        let shared = Arc::new(Mutex::new(Shared {
            state: State::Pending,
            last_progress: None,
            on_fulfilled: Vec::new(),
            on_rejected: Vec::new(),
            on_progress: Vec::new(),
            producer: Some(producer),
            started: false,
        }));
        let root = {
            let shared = Arc::clone(&shared);
            ChainRoot::new(Box::new(move || Self::start_shared(&shared)))
        };
        Promise {
            shared,
            root: Arc::new(root),
        }
    }

    fn born_settled(state: State<T>) -> Self {
        let shared = Arc::new(Mutex::new(Shared {
            state,
            last_progress: None,
            on_fulfilled: Vec::new(),
            on_rejected: Vec::new(),
            on_progress: Vec::new(),
            producer: None,
            started: true,
        }));
        Promise {
            shared,
            root: Arc::new(ChainRoot::armed()),
        }
    }

    /// A derived promise sharing the source's chain root.
    fn derived(root: Arc<ChainRoot>, producer: Producer<T>) -> Self {
        let shared = Arc::new(Mutex::new(Shared {
            state: State::Pending,
            last_progress: None,
            on_fulfilled: Vec::new(),
            on_rejected: Vec::new(),
            on_progress: Vec::new(),
            producer: Some(producer),
            started: false,
        }));
        Promise { shared, root }
    }

    /// Fire the chain's root trigger, running the original producer exactly
    /// once no matter how many links exist or which link is observed first.
    ///
    /// Every chaining operation arms its receiver, so well-behaved consumers
    /// never need to call this; it is the explicit form for kicking off a
    /// chain without attaching a terminal observer.
    pub fn arm(&self) {
        self.root.arm();
    }

    /// Run this promise's producer if it has not run yet. Repeated calls are
    /// no-ops: the producer's side effects never repeat.
    pub fn start(&self) {
        Self::start_shared(&self.shared);
    }

    fn start_shared(shared: &SharedHandle<T>) {
        let producer = {
            let mut s = shared.lock().unwrap();
            if s.started {
                return;
            }
            s.started = true;
            s.producer.take()
        };
        let Some(producer) = producer else { return };
        trace!("starting promise producer");

        let resolve: Resolve<T> = {
            let shared = Arc::clone(shared);
            Box::new(move |value| Self::settle_fulfilled(&shared, value))
        };
        let reject: Reject = {
            let shared = Arc::clone(shared);
            Box::new(move |error| Self::settle_rejected(&shared, error))
        };
        match producer {
            Producer::Plain(run) => run(resolve, reject),
            Producer::WithProgress(run) => {
                let report: ReportProgress = {
                    let shared = Arc::clone(shared);
                    Box::new(move |value| Self::notify_progress(&shared, value))
                };
                run(resolve, reject, report)
            }
        }
    }

    /// The settle-once transition to `Fulfilled`. The success queue is
    /// drained in registration order with the lock released; the failure
    /// queue is discarded. Late calls are ignored.
    fn settle_fulfilled(shared: &SharedHandle<T>, value: T) {
        let callbacks = {
            let mut s = shared.lock().unwrap();
            if !matches!(s.state, State::Pending) {
                trace!("ignoring settlement of an already-settled promise");
                return;
            }
            s.state = State::Fulfilled(value.clone());
            s.on_rejected.clear();
            std::mem::take(&mut s.on_fulfilled)
        };
        trace!(callbacks = callbacks.len(), "promise fulfilled");
        for callback in callbacks {
            callback(value.clone());
        }
    }

    /// The settle-once transition to `Rejected`, symmetric to
    /// [`settle_fulfilled`](Self::settle_fulfilled).
    fn settle_rejected(shared: &SharedHandle<T>, error: PromiseError) {
        let callbacks = {
            let mut s = shared.lock().unwrap();
            if !matches!(s.state, State::Pending) {
                trace!("ignoring settlement of an already-settled promise");
                return;
            }
            s.state = State::Rejected(error.clone());
            s.on_fulfilled.clear();
            std::mem::take(&mut s.on_rejected)
        };
        trace!(callbacks = callbacks.len(), error = %error, "promise rejected");
        for callback in callbacks {
            callback(error.clone());
        }
    }

    /// Record and fan out a progress report. Valid in any state. Observers
    /// run with the lock released; any observer registered during a
    /// notification is delivered from the next report onward.
    fn notify_progress(shared: &SharedHandle<T>, value: f64) {
        let mut observers = {
            let mut s = shared.lock().unwrap();
            s.last_progress = Some(value);
            std::mem::take(&mut s.on_progress)
        };
        for observer in observers.iter_mut() {
            observer(value);
        }
        let mut s = shared.lock().unwrap();
        let registered_meanwhile = std::mem::take(&mut s.on_progress);
        s.on_progress = observers;
        s.on_progress.extend(registered_meanwhile);
    }

    /// Current state of this promise.
    pub fn state(&self) -> PromiseState {
        match self.shared.lock().unwrap().state {
            State::Pending => PromiseState::Pending,
            State::Fulfilled(_) => PromiseState::Fulfilled,
            State::Rejected(_) => PromiseState::Rejected,
        }
    }

    /// Whether this promise has not settled yet.
    pub fn is_pending(&self) -> bool {
        self.state() == PromiseState::Pending
    }

    /// Whether this promise settled with a value.
    pub fn is_fulfilled(&self) -> bool {
        self.state() == PromiseState::Fulfilled
    }

    /// Whether this promise settled with an error.
    pub fn is_rejected(&self) -> bool {
        self.state() == PromiseState::Rejected
    }

    /// The fulfillment value, if settled with one.
    pub fn value(&self) -> Option<T> {
        match &self.shared.lock().unwrap().state {
            State::Fulfilled(value) => Some(value.clone()),
            _ => None,
        }
    }

    /// The rejection error, if settled with one.
    pub fn error(&self) -> Option<PromiseError> {
        match &self.shared.lock().unwrap().state {
            State::Rejected(error) => Some(error.clone()),
            _ => None,
        }
    }

    /// The most recent progress report, if any was made.
    pub fn last_progress(&self) -> Option<f64> {
        self.shared.lock().unwrap().last_progress
    }

    /// Transform the fulfillment value, producing a derived promise.
    ///
    /// The derived promise resolves with `transform(value)` when this one
    /// fulfills, and rejects with the same error when this one rejects.
    /// Progress reports are forwarded to the derived promise. The branch
    /// taken is the same whether this promise settles before or after the
    /// call.
    pub fn then<X, F>(&self, transform: F) -> Promise<X>
    where
        X: Clone + Send + 'static,
        F: FnOnce(T) -> X + Send + 'static,
    {
        self.arm();
        self.start();
        let source = Arc::clone(&self.shared);
        let child = Promise::derived(
            Arc::clone(&self.root),
            Producer::WithProgress(Box::new(move |resolve, reject, report| {
                let deferred: Deferred = {
                    let mut s = source.lock().unwrap();
                    s.on_progress.push(Box::new(move |value| report(value)));
                    match s.snapshot() {
                        None => {
                            s.on_fulfilled
                                .push(Box::new(move |value| resolve(transform(value))));
                            s.on_rejected.push(reject);
                            None
                        }
                        Some(Ok(value)) => Some(Box::new(move || resolve(transform(value)))),
                        Some(Err(error)) => Some(Box::new(move || reject(error))),
                    }
                };
                if let Some(run) = deferred {
                    run();
                }
            })),
        );
        child.start();
        child
    }

    /// Chain an operation that itself returns a promise, flattening the
    /// result.
    ///
    /// When this promise fulfills, `next(value)` builds an inner promise and
    /// the derived promise mirrors the inner outcome; an inner rejection
    /// propagates as the derived promise's rejection. When this promise
    /// rejects, `next` never runs and the error passes straight through.
    pub fn and_then<X, F>(&self, next: F) -> Promise<X>
    where
        X: Clone + Send + 'static,
        F: FnOnce(T) -> Promise<X> + Send + 'static,
    {
        self.arm();
        self.start();
        let source = Arc::clone(&self.shared);
        let child = Promise::derived(
            Arc::clone(&self.root),
            Producer::Plain(Box::new(move |resolve, reject| {
                let reject = once(reject);
                let deferred: Deferred = {
                    let mut s = source.lock().unwrap();
                    match s.snapshot() {
                        None => {
                            let fail = reject.clone();
                            s.on_fulfilled.push(Box::new(move |value| {
                                subscribe_inner(next(value), resolve, reject)
                            }));
                            s.on_rejected.push(Box::new(move |error| fail(error)));
                            None
                        }
                        Some(Ok(value)) => Some(Box::new(move || {
                            subscribe_inner(next(value), resolve, reject)
                        })),
                        Some(Err(error)) => Some(Box::new(move || reject(error))),
                    }
                };
                if let Some(run) = deferred {
                    run();
                }
            })),
        );
        child.start();
        child
    }

    /// Sugar for chaining to an existing promise, ignoring this one's value.
    pub fn chain<X>(&self, next: Promise<X>) -> Promise<X>
    where
        X: Clone + Send + 'static,
    {
        self.and_then(move |_| next)
    }

    /// Observe a rejection. The handler runs at most once, with the chain's
    /// error; the derived promise resolves with no value on both paths, so
    /// an observed error is considered handled and the chain continues
    /// non-failing.
    ///
    /// On a source that fulfills (or already has), the handler is never
    /// invoked and the derived promise simply resolves.
    pub fn on_error<F>(&self, handler: F) -> EmptyPromise
    where
        F: FnOnce(PromiseError) + Send + 'static,
    {
        self.arm();
        self.start();
        let source = Arc::clone(&self.shared);
        let child = Promise::derived(
            Arc::clone(&self.root),
            Producer::WithProgress(Box::new(move |resolve, _reject, report| {
                let resolve = once(resolve);
                let deferred: Deferred = {
                    let mut s = source.lock().unwrap();
                    s.on_progress.push(Box::new(move |value| report(value)));
                    match s.snapshot() {
                        None => {
                            let settle = resolve.clone();
                            s.on_rejected.push(Box::new(move |error| {
                                handler(error);
                                settle(());
                            }));
                            s.on_fulfilled.push(Box::new(move |_| resolve(())));
                            None
                        }
                        Some(Err(error)) => Some(Box::new(move || {
                            handler(error);
                            resolve(());
                        })),
                        Some(Ok(_)) => Some(Box::new(move || resolve(()))),
                    }
                };
                if let Some(run) = deferred {
                    run();
                }
            })),
        );
        child.start();
        child
    }

    /// Run a cleanup action on either outcome. The action runs exactly once
    /// per settlement, after stages registered earlier on the same source;
    /// errors do not propagate past it. The derived promise resolves with
    /// the action's result on both paths.
    pub fn finally<X, F>(&self, action: F) -> Promise<X>
    where
        X: Clone + Send + 'static,
        F: FnOnce() -> X + Send + 'static,
    {
        self.arm();
        self.start();
        let source = Arc::clone(&self.shared);
        let child = Promise::derived(
            Arc::clone(&self.root),
            Producer::WithProgress(Box::new(move |resolve, _reject, report| {
                let settle = once(move |_: ()| resolve(action()));
                let deferred: Deferred = {
                    let mut s = source.lock().unwrap();
                    s.on_progress.push(Box::new(move |value| report(value)));
                    match s.snapshot() {
                        None => {
                            let on_success = settle.clone();
                            s.on_fulfilled.push(Box::new(move |_| on_success(())));
                            s.on_rejected.push(Box::new(move |_| settle(())));
                            None
                        }
                        Some(_) => Some(Box::new(move || settle(()))),
                    }
                };
                if let Some(run) = deferred {
                    run();
                }
            })),
        );
        child.start();
        child
    }

    /// Observe progress reports. Every report reaches both the observer and
    /// the derived promise's own progress sink; the derived promise then
    /// mirrors the source's settlement, resolving with no value or
    /// re-rejecting with the source's error.
    ///
    /// Observers registered after settlement receive nothing: progress
    /// reporting stops once a promise settles, and reports are not replayed.
    pub fn progress<F>(&self, mut observer: F) -> EmptyPromise
    where
        F: FnMut(f64) + Send + 'static,
    {
        self.arm();
        self.start();
        let source = Arc::clone(&self.shared);
        let child = Promise::derived(
            Arc::clone(&self.root),
            Producer::WithProgress(Box::new(move |resolve, reject, report| {
                let deferred: Deferred = {
                    let mut s = source.lock().unwrap();
                    s.on_progress.push(Box::new(move |value| {
                        observer(value);
                        report(value);
                    }));
                    match s.snapshot() {
                        None => {
                            s.on_fulfilled.push(Box::new(move |_| resolve(())));
                            s.on_rejected.push(reject);
                            None
                        }
                        Some(Ok(_)) => Some(Box::new(move || resolve(()))),
                        Some(Err(error)) => Some(Box::new(move || reject(error))),
                    }
                };
                if let Some(run) = deferred {
                    run();
                }
            })),
        );
        child.start();
        child
    }
}

/// Subscribe a derived promise to the inner promise returned by an
/// `and_then` operation: the inner outcome settles the derived promise, and
/// observing the inner promise arms its chain.
fn subscribe_inner<X>(
    inner: Promise<X>,
    resolve: Resolve<X>,
    reject: impl Fn(PromiseError) + Send + 'static,
) where
    X: Clone + Send + 'static,
{
    inner
        .then(move |value| resolve(value))
        .on_error(move |error| reject(error));
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    type ResolveSlot<T> = Arc<Mutex<Option<Resolve<T>>>>;
    type RejectSlot = Arc<Mutex<Option<Reject>>>;

    fn counted_producer(runs: Arc<AtomicUsize>) -> Promise<i32> {
        Promise::new(move |resolve, _reject| {
            runs.fetch_add(1, Ordering::SeqCst);
            resolve(7);
        })
    }

    /// A promise whose producer parks its capabilities for the test to
    /// settle by hand. The slots fill once the chain is armed.
    fn externally_settled<T: Clone + Send + 'static>() -> (Promise<T>, ResolveSlot<T>, RejectSlot) {
        let resolve_slot: ResolveSlot<T> = Arc::new(Mutex::new(None));
        let reject_slot: RejectSlot = Arc::new(Mutex::new(None));
        let (out_resolve, out_reject) = (Arc::clone(&resolve_slot), Arc::clone(&reject_slot));
        let promise = Promise::new(move |resolve, reject| {
            *out_resolve.lock().unwrap() = Some(resolve);
            *out_reject.lock().unwrap() = Some(reject);
        });
        (promise, resolve_slot, reject_slot)
    }

    #[test]
    fn test_producer_is_lazy_until_first_chain_call() {
        let runs = Arc::new(AtomicUsize::new(0));
        let p = counted_producer(Arc::clone(&runs));

        assert_eq!(runs.load(Ordering::SeqCst), 0);
        assert!(p.is_pending());

        p.then(|n| n);
        assert_eq!(runs.load(Ordering::SeqCst), 1);
        assert!(p.is_fulfilled());
    }

    #[test]
    fn test_arm_runs_producer_exactly_once() {
        let runs = Arc::new(AtomicUsize::new(0));
        let p = counted_producer(Arc::clone(&runs));

        p.arm();
        p.arm();
        assert_eq!(runs.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_start_is_idempotent() {
        let runs = Arc::new(AtomicUsize::new(0));
        let p = counted_producer(Arc::clone(&runs));

        p.start();
        p.start();
        assert_eq!(runs.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_first_settlement_wins() {
        let p = Promise::new(|resolve, reject| {
            resolve(1);
            reject(PromiseError::failed("too late"));
        });
        p.start();

        assert_eq!(p.value(), Some(1));
        assert_eq!(p.error(), None);
        assert!(p.is_fulfilled());
    }

    #[test]
    fn test_rejection_then_resolution_keeps_rejection() {
        let p = Promise::new(|resolve, reject| {
            reject(PromiseError::failed("boom"));
            resolve(2);
        });
        p.start();

        assert_eq!(p.error(), Some(PromiseError::failed("boom")));
        assert_eq!(p.value(), None);
    }

    #[test]
    fn test_then_before_and_after_settlement_agree() {
        // Registered before settlement.
        let (pending, resolve_slot, _) = externally_settled::<i32>();
        let early = pending.then(|n| n + 1);
        let resolve = resolve_slot.lock().unwrap().take().unwrap();
        resolve(41);

        // Registered after settlement.
        let late = Promise::resolved(41).then(|n| n + 1);

        assert_eq!(early.value(), Some(42));
        assert_eq!(late.value(), Some(42));
    }

    #[test]
    fn test_callbacks_fire_in_registration_order() {
        let (pending, resolve_slot, _) = externally_settled::<i32>();
        let order = Arc::new(Mutex::new(Vec::new()));

        let first = Arc::clone(&order);
        pending.then(move |_| first.lock().unwrap().push("first"));
        let second = Arc::clone(&order);
        pending.then(move |_| second.lock().unwrap().push("second"));

        let resolve = resolve_slot.lock().unwrap().take().unwrap();
        resolve(0);

        assert_eq!(*order.lock().unwrap(), vec!["first", "second"]);
    }

    #[test]
    fn test_on_error_on_fulfilled_source_skips_handler() {
        let invoked = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&invoked);

        let eased = Promise::resolved(9).on_error(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        assert!(eased.is_fulfilled());
        assert_eq!(invoked.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_on_error_pending_then_fulfilled_skips_handler() {
        let (pending, resolve_slot, _) = externally_settled::<i32>();
        let invoked = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&invoked);

        let eased = pending.on_error(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        let resolve = resolve_slot.lock().unwrap().take().unwrap();
        resolve(9);

        assert!(eased.is_fulfilled());
        assert_eq!(invoked.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_finally_runs_once_on_success_and_on_failure() {
        let cleanups = Arc::new(AtomicUsize::new(0));

        let on_success = Arc::clone(&cleanups);
        let done = Promise::resolved(1).finally(move || {
            on_success.fetch_add(1, Ordering::SeqCst);
        });
        assert!(done.is_fulfilled());

        let on_failure = Arc::clone(&cleanups);
        let done = Promise::<i32>::rejected("boom").finally(move || {
            on_failure.fetch_add(1, Ordering::SeqCst);
        });
        assert!(done.is_fulfilled());

        assert_eq!(cleanups.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_rejected_constructor_carries_error_through_then() {
        let p = Promise::<i32>::rejected("nope");
        let child = p.then(|n| n * 2);

        assert_eq!(child.error(), Some(PromiseError::failed("nope")));
    }

    #[test]
    fn test_progress_updates_last_progress() {
        let p = Promise::<i32>::with_progress(|resolve, _reject, report| {
            report(0.25);
            report(0.75);
            resolve(1);
        });
        p.start();

        assert_eq!(p.last_progress(), Some(0.75));
        assert_eq!(p.value(), Some(1));
    }

    #[test]
    fn test_late_progress_observer_receives_nothing() {
        let p = Promise::<i32>::with_progress(|resolve, _reject, report| {
            report(0.5);
            resolve(1);
        });
        p.start();

        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        p.progress(move |value| sink.lock().unwrap().push(value));

        assert!(seen.lock().unwrap().is_empty());
        assert_eq!(p.last_progress(), Some(0.5));
    }
}
