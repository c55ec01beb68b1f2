//! # Provider locals
//!
//! Values handed down to a subtree live in a thread‑local stack of frames.
//! A provider pushes a frame, stores its values in it, runs the subtree, and
//! pops the frame again on the way out (also on unwind). Lookups walk the
//! stack from the top, so the nearest enclosing provider wins.
//!
//! ```rust
//! use sample_context::locals::{local, with_local};
//!
//! #[derive(Clone, Debug, PartialEq)]
//! struct Greeting(&'static str);
//!
//! assert_eq!(local::<Greeting>(), None);
//! with_local(Greeting("outer"), || {
//!     with_local(Greeting("inner"), || {
//!         assert_eq!(local::<Greeting>(), Some(Greeting("inner")));
//!     });
//!     assert_eq!(local::<Greeting>(), Some(Greeting("outer")));
//! });
//! ```

use std::any::{Any, TypeId};
use std::cell::RefCell;
use std::collections::HashMap;

thread_local! {
    static LOCALS_STACK: RefCell<Vec<HashMap<TypeId, Box<dyn Any>>>> = RefCell::new(Vec::new());
}

pub(crate) fn with_locals_frame<R>(f: impl FnOnce() -> R) -> R {
    // Non-panicking frame guard (ensures pop on unwind)
    struct Guard;
    impl Drop for Guard {
        fn drop(&mut self) {
            LOCALS_STACK.with(|st| {
                st.borrow_mut().pop();
            });
        }
    }
    LOCALS_STACK.with(|st| st.borrow_mut().push(HashMap::new()));
    let _guard = Guard;
    f()
}

/// Stores `value` in the innermost frame. Only valid inside `with_locals_frame`.
pub(crate) fn set_local<T: 'static>(value: T) {
    LOCALS_STACK.with(|st| {
        if let Some(top) = st.borrow_mut().last_mut() {
            top.insert(TypeId::of::<T>(), Box::new(value));
        } else {
            log::warn!(
                "set_local::<{}> called with no open frame; value dropped",
                std::any::type_name::<T>()
            );
        }
    });
}

/// Runs `f` with `value` visible to [`local`] for the duration of the call.
pub fn with_local<T: 'static, R>(value: T, f: impl FnOnce() -> R) -> R {
    with_locals_frame(|| {
        set_local(value);
        f()
    })
}

/// Nearest value of type `T`, if any enclosing frame provides one.
pub fn local<T: Clone + 'static>() -> Option<T> {
    LOCALS_STACK.with(|st| {
        for frame in st.borrow().iter().rev() {
            if let Some(v) = frame.get(&TypeId::of::<T>())
                && let Some(t) = v.downcast_ref::<T>()
            {
                return Some(t.clone());
            }
        }
        None
    })
}

/// Number of open frames on this thread.
pub fn locals_depth() -> usize {
    LOCALS_STACK.with(|st| st.borrow().len())
}
