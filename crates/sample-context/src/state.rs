use serde::{Deserialize, Serialize};

use crate::{Action, Color};

/// The record held by a [`SampleProvider`](crate::SampleProvider).
///
/// All four fields are always present; readers get clones, and only the
/// provider's store replaces the value.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SampleState {
    pub count: i64,
    pub text: String,
    pub color: Color,
    pub is_good: bool,
}

impl Default for SampleState {
    fn default() -> Self {
        Self {
            count: 0,
            text: "hello".to_string(),
            color: Color::Red,
            is_good: true,
        }
    }
}

/// A pure `(state, action) -> state` transition table.
pub trait Reducer: 'static {
    type State: Clone + 'static;
    type Action: std::fmt::Debug + 'static;

    /// Named in the error raised when the state accessor finds no provider.
    const STATE_CONTEXT: &'static str = "state provider";
    /// Named in the error raised when the dispatch accessor finds no provider.
    const DISPATCH_CONTEXT: &'static str = "dispatch context";

    fn initial_state() -> Self::State;
    /// Computes the next state. Must not depend on anything but its inputs.
    fn reduce(state: &Self::State, action: Self::Action) -> Self::State;
}

pub struct SampleReducer;

impl Reducer for SampleReducer {
    type State = SampleState;
    type Action = Action;

    const STATE_CONTEXT: &'static str = "SampleProvider";
    const DISPATCH_CONTEXT: &'static str = "SampleDispatchContext";

    fn initial_state() -> SampleState {
        SampleState::default()
    }

    fn reduce(state: &SampleState, action: Action) -> SampleState {
        match action {
            Action::SetCount { count } => SampleState {
                count,
                ..state.clone()
            },
            Action::SetText { text } => SampleState {
                text,
                ..state.clone()
            },
            Action::SetColor { color } => SampleState {
                color,
                ..state.clone()
            },
            Action::ToggleGood => SampleState {
                is_good: !state.is_good,
                ..state.clone()
            },
        }
    }
}
