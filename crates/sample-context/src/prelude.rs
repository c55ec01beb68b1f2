pub use crate::action::Action;
pub use crate::color::Color;
pub use crate::error::ContextError;
pub use crate::provider::{
    Provider, SampleDispatch, SampleProvider, observe_sample_state, observe_state,
    try_use_dispatch, try_use_sample_dispatch, try_use_sample_state, try_use_state,
    use_dispatch, use_sample_dispatch, use_sample_state, use_state,
};
pub use crate::scope::{Scope, current_scope, scoped_effect};
pub use crate::state::{Reducer, SampleReducer, SampleState};
pub use crate::store::{Dispatch, Store, WireAction};
