//! The shared chain-root cell behind lazy chain start.

use std::sync::{Arc, Mutex};

type StartFn = Box<dyn FnOnce() + Send>;

/// The start trigger for the first promise of a chain.
///
/// Every promise holds an `Arc<ChainRoot>`. A promise derived by a chaining
/// operation inherits its source's cell, so one chain shares one trigger no
/// matter how many links exist. The trigger is taken the first time any link
/// is armed and can never fire twice; the cell lives as long as the chain,
/// not any individual promise.
pub(crate) struct ChainRoot {
    trigger: Mutex<Option<StartFn>>,
}

impl ChainRoot {
    pub(crate) fn new(trigger: StartFn) -> Self {
        ChainRoot {
            trigger: Mutex::new(Some(trigger)),
        }
    }

    /// A root with nothing left to fire, for promises born settled.
    pub(crate) fn armed() -> Self {
        ChainRoot {
            trigger: Mutex::new(None),
        }
    }

    /// Fire the original producer's start trigger, at most once per chain.
    pub(crate) fn arm(&self) {
        let trigger = self.trigger.lock().unwrap().take();
        if let Some(start) = trigger {
            start();
        }
    }
}

/// Adapt a one-shot continuation into a cloneable callback that runs the
/// action on the first call and ignores the rest.
///
/// Used wherever a single settle action must be reachable from both the
/// success and failure branches of a source promise, and by combinators where
/// whichever input settles first consumes the shared resolve/reject.
pub(crate) fn once<A, F>(action: F) -> impl Fn(A) + Clone + Send + 'static
where
    A: Send + 'static,
    F: FnOnce(A) + Send + 'static,
{
    let slot = Arc::new(Mutex::new(Some(action)));
    move |arg| {
        let action = slot.lock().unwrap().take();
        if let Some(action) = action {
            action(arg);
        }
    }
}
