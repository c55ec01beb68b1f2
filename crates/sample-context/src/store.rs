use crate::{Action, ContextError, Reducer, Signal, SubId, signal};

/// State cell bound to a reducer. Clones share the same cell.
pub struct Store<R: Reducer> {
    state: Signal<R::State>,
}

impl<R: Reducer> Clone for Store<R> {
    fn clone(&self) -> Self {
        Self {
            state: self.state.clone(),
        }
    }
}

impl<R: Reducer> Store<R> {
    pub fn new(initial: R::State) -> Self {
        Self {
            state: signal(initial),
        }
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> R::State {
        self.state.get()
    }

    /// Applies `action` and commits the result before returning, then
    /// delivers the new state to subscribers.
    pub fn dispatch(&self, action: R::Action) {
        log::debug!("dispatch {action:?}");
        let next = self.state.with(|s| R::reduce(s, action));
        self.state.set(next);
    }

    pub fn dispatcher(&self) -> Dispatch<R> {
        Dispatch {
            store: self.clone(),
        }
    }

    pub fn subscribe(&self, f: impl Fn(&R::State) + 'static) -> SubId {
        self.state.subscribe(f)
    }

    pub fn unsubscribe(&self, id: SubId) -> bool {
        self.state.unsubscribe(id)
    }

    pub fn subscriber_count(&self) -> usize {
        self.state.subscriber_count()
    }

    pub fn ptr_eq(&self, other: &Self) -> bool {
        self.state.ptr_eq(&other.state)
    }
}

/// Actions that can be decoded from their JSON wire form.
pub trait WireAction: Sized {
    fn decode(json: &str) -> Result<Self, ContextError>;
}

impl WireAction for Action {
    fn decode(json: &str) -> Result<Self, ContextError> {
        Action::from_json(json)
    }
}

/// Handle used by descendants to request transitions.
///
/// Every handle obtained from the same provider drives the same store, so it
/// is safe to keep one in a callback across renders.
pub struct Dispatch<R: Reducer> {
    store: Store<R>,
}

impl<R: Reducer> Clone for Dispatch<R> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
        }
    }
}

impl<R: Reducer> Dispatch<R> {
    pub fn dispatch(&self, action: R::Action) {
        self.store.dispatch(action);
    }

    /// Wraps the handle into a plain callback.
    pub fn callback(&self) -> impl Fn(R::Action) + 'static {
        let store = self.store.clone();
        move |action| store.dispatch(action)
    }

    pub fn ptr_eq(&self, other: &Self) -> bool {
        self.store.ptr_eq(&other.store)
    }
}

impl<R: Reducer> Dispatch<R>
where
    R::Action: WireAction,
{
    /// Decodes and dispatches one wire action. On error nothing is applied.
    pub fn dispatch_json(&self, json: &str) -> Result<(), ContextError> {
        match <R::Action as WireAction>::decode(json) {
            Ok(action) => {
                self.store.dispatch(action);
                Ok(())
            }
            Err(e) => {
                log::warn!("rejected action {json}: {e}");
                Err(e)
            }
        }
    }
}
