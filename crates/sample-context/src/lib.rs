//! # State, Actions, and Providers
//!
//! `sample-context` is a small state container for component code. There are
//! three pieces:
//!
//! - `SampleState` — the record being shared (`count`, `text`, `color`,
//!   `is_good`).
//! - `SampleReducer` — the pure transition table driven by `Action`s.
//! - `SampleProvider` — owns the state for a subtree and hands out state
//!   snapshots and a dispatch handle to everything composed inside it.
//!
//! ## Reading and dispatching
//!
//! ```rust
//! use sample_context::*;
//!
//! let provider = SampleProvider::new();
//! provider.provide(|| {
//!     let dispatch = use_sample_dispatch();
//!     dispatch.dispatch(Action::SetCount { count: 5 });
//!     dispatch.dispatch(Action::SetText { text: "world".into() });
//!     dispatch.dispatch(Action::ToggleGood);
//!     dispatch.dispatch(Action::SetColor { color: Color::Yellow });
//!
//!     let state = use_sample_state();
//!     assert_eq!(state.count, 5);
//!     assert_eq!(state.text, "world");
//!     assert_eq!(state.color, Color::Yellow);
//!     assert!(!state.is_good);
//! });
//! ```
//!
//! Calling `use_sample_state()` or `use_sample_dispatch()` outside a provider
//! panics; the `try_*` variants return `ContextError::MissingProvider`
//! instead.
//!
//! ## Wire actions
//!
//! Actions arriving as JSON are decoded with `Action::from_json` or sent
//! straight through `SampleDispatch::dispatch_json`. An unknown `type` tag is
//! rejected with `ContextError::UnhandledAction` and leaves the state alone:
//!
//! ```rust
//! use sample_context::*;
//!
//! let provider = SampleProvider::new();
//! let dispatch = provider.dispatch();
//! dispatch.dispatch_json(r#"{"type":"SET_COLOR","color":"orange"}"#).unwrap();
//! assert!(dispatch.dispatch_json(r#"{"type":"RESET"}"#).is_err());
//! assert_eq!(provider.state().color, Color::Orange);
//! ```
//!
//! ## Observing changes
//!
//! `observe_sample_state` subscribes to every committed state of the nearest
//! provider. The subscription belongs to the current scope and is removed by
//! `SampleProvider::dispose`.

pub mod action;
pub mod color;
pub mod error;
pub mod locals;
pub mod prelude;
pub mod provider;
pub mod scope;
pub mod signal;
pub mod state;
pub mod store;
mod tests;

pub use action::*;
pub use color::*;
pub use error::*;
pub use provider::*;
pub use scope::{Scope, current_scope, scoped_effect};
pub use signal::*;
pub use state::*;
pub use store::*;
