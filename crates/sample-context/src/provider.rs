//! # Providers and accessors
//!
//! A [`Provider`] owns one [`Store`] and a [`Scope`]. While
//! [`Provider::provide`] runs, the store's state and a dispatch handle are
//! visible to everything called inside it through the `use_*` accessors:
//!
//! ```rust
//! use sample_context::*;
//!
//! fn Counter() -> String {
//!     let state = use_sample_state();
//!     format!("{} ({})", state.count, state.color)
//! }
//!
//! let provider = SampleProvider::new();
//! provider.provide(|| {
//!     use_sample_dispatch().dispatch(Action::SetCount { count: 3 });
//!     assert_eq!(Counter(), "3 (red)");
//! });
//! ```
//!
//! The same provider can be used as a plain handle when threading it through
//! call chains is preferable to ambient lookup:
//!
//! ```rust
//! use sample_context::*;
//!
//! let provider = SampleProvider::new();
//! provider.dispatch().dispatch(Action::ToggleGood);
//! assert!(!provider.state().is_good);
//! ```

use std::cell::{Cell, RefCell};

use crate::locals::{local, set_local, with_locals_frame};
use crate::scope::{Scope, current_scope};
use crate::{ContextError, Dispatch, Reducer, SampleReducer, SampleState, Store, SubId};

struct StateContext<R: Reducer>(Store<R>);

impl<R: Reducer> Clone for StateContext<R> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

struct DispatchContext<R: Reducer>(Dispatch<R>);

impl<R: Reducer> Clone for DispatchContext<R> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

pub struct Provider<R: Reducer> {
    store: Store<R>,
    scope: Scope,
    // child of `scope` for the latest `provide` round
    round: RefCell<Option<Scope>>,
    depth: Cell<usize>,
}

pub type SampleProvider = Provider<SampleReducer>;
pub type SampleDispatch = Dispatch<SampleReducer>;

impl<R: Reducer> Default for Provider<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Reducer> Provider<R> {
    pub fn new() -> Self {
        Self::with_initial_state(R::initial_state())
    }

    pub fn with_initial_state(state: R::State) -> Self {
        Self {
            store: Store::new(state),
            scope: Scope::new(),
            round: RefCell::new(None),
            depth: Cell::new(0),
        }
    }

    /// Runs `children` with this provider's state and dispatch in scope.
    ///
    /// Each outermost call starts a fresh round: observers registered by the
    /// previous round are removed first, so re-running the same subtree does
    /// not pile up subscriptions. Calls nested inside a running round share
    /// that round.
    pub fn provide<T>(&self, children: impl FnOnce() -> T) -> T {
        struct Depth<'a>(&'a Cell<usize>);
        impl Drop for Depth<'_> {
            fn drop(&mut self) {
                self.0.set(self.0.get() - 1);
            }
        }

        let round = self.enter_round();
        self.depth.set(self.depth.get() + 1);
        let _depth = Depth(&self.depth);

        with_locals_frame(|| {
            log::trace!("enter {}", R::STATE_CONTEXT);
            set_local(StateContext(self.store.clone()));
            set_local(DispatchContext(self.store.dispatcher()));
            let out = round.run(children);
            log::trace!("leave {}", R::STATE_CONTEXT);
            out
        })
    }

    fn enter_round(&self) -> Scope {
        let mut round = self.round.borrow_mut();
        if self.depth.get() > 0
            && let Some(current) = round.as_ref()
        {
            return current.clone();
        }
        if let Some(previous) = round.take() {
            previous.dispose();
        }
        let next = self.scope.child();
        *round = Some(next.clone());
        next
    }

    pub fn state(&self) -> R::State {
        self.store.state()
    }

    pub fn dispatch(&self) -> Dispatch<R> {
        self.store.dispatcher()
    }

    pub fn store(&self) -> &Store<R> {
        &self.store
    }

    pub fn scope(&self) -> &Scope {
        &self.scope
    }

    /// Tears the subtree down: scope-bound observers are removed and their
    /// cleanups run. Outstanding dispatch handles keep working.
    pub fn dispose(&self) {
        self.scope.dispose();
    }
}

pub fn try_use_state<R: Reducer>() -> Result<R::State, ContextError> {
    local::<StateContext<R>>()
        .map(|ctx| ctx.0.state())
        .ok_or_else(|| ContextError::missing(R::STATE_CONTEXT))
}

pub fn try_use_dispatch<R: Reducer>() -> Result<Dispatch<R>, ContextError> {
    local::<DispatchContext<R>>()
        .map(|ctx| ctx.0)
        .ok_or_else(|| ContextError::missing(R::DISPATCH_CONTEXT))
}

/// Current state of the nearest provider for `R`.
///
/// # Panics
/// If called outside every such provider.
pub fn use_state<R: Reducer>() -> R::State {
    match try_use_state::<R>() {
        Ok(state) => state,
        Err(e) => panic!("{e}"),
    }
}

/// Dispatch handle of the nearest provider for `R`.
///
/// # Panics
/// If called outside every such provider.
pub fn use_dispatch<R: Reducer>() -> Dispatch<R> {
    match try_use_dispatch::<R>() {
        Ok(dispatch) => dispatch,
        Err(e) => panic!("{e}"),
    }
}

/// Calls `f` with every state committed by the nearest provider from now on.
///
/// The subscription is removed when the current scope is disposed. Inside a
/// scope that is already disposed nothing is subscribed and
/// [`ContextError::ScopeDisposed`] is returned.
pub fn observe_state<R: Reducer>(
    f: impl Fn(&R::State) + 'static,
) -> Result<SubId, ContextError> {
    let store = local::<StateContext<R>>()
        .map(|ctx| ctx.0)
        .ok_or_else(|| ContextError::missing(R::STATE_CONTEXT))?;
    let scope = current_scope();
    if scope.as_ref().is_some_and(Scope::is_disposed) {
        return Err(ContextError::ScopeDisposed {
            context: R::STATE_CONTEXT,
        });
    }
    let id = store.subscribe(f);
    if let Some(scope) = scope {
        scope.add_disposer(move || {
            store.unsubscribe(id);
        });
    }
    Ok(id)
}

pub fn use_sample_state() -> SampleState {
    use_state::<SampleReducer>()
}

pub fn try_use_sample_state() -> Result<SampleState, ContextError> {
    try_use_state::<SampleReducer>()
}

pub fn use_sample_dispatch() -> SampleDispatch {
    use_dispatch::<SampleReducer>()
}

pub fn try_use_sample_dispatch() -> Result<SampleDispatch, ContextError> {
    try_use_dispatch::<SampleReducer>()
}

pub fn observe_sample_state(
    f: impl Fn(&SampleState) + 'static,
) -> Result<SubId, ContextError> {
    observe_state::<SampleReducer>(f)
}
