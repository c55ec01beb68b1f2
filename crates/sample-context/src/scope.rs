use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

thread_local! {
    static CURRENT_SCOPE: RefCell<Option<Weak<ScopeInner>>> = const { RefCell::new(None) };
}

/// Lifetime of a provider's subtree.
///
/// Cleanups registered while the subtree runs are executed once, either by
/// [`Scope::dispose`] or when the last handle to the scope is dropped.
pub struct Scope {
    inner: Rc<ScopeInner>,
}

struct ScopeInner {
    disposers: RefCell<Vec<Box<dyn FnOnce()>>>,
    children: RefCell<Vec<Scope>>,
    disposed: Cell<bool>,
}

impl Default for Scope {
    fn default() -> Self {
        Self::new()
    }
}

impl Scope {
    pub fn new() -> Self {
        Self {
            inner: Rc::new(ScopeInner {
                disposers: RefCell::new(Vec::new()),
                children: RefCell::new(Vec::new()),
                disposed: Cell::new(false),
            }),
        }
    }

    /// Runs `f` with this scope as the current one, restoring the previous
    /// scope afterwards.
    pub fn run<R>(&self, f: impl FnOnce() -> R) -> R {
        struct Restore(Option<Weak<ScopeInner>>);
        impl Drop for Restore {
            fn drop(&mut self) {
                let prev = self.0.take();
                CURRENT_SCOPE.with(|current| *current.borrow_mut() = prev);
            }
        }
        let prev = CURRENT_SCOPE.with(|current| {
            current
                .borrow_mut()
                .replace(Rc::downgrade(&self.inner))
        });
        let _restore = Restore(prev);
        f()
    }

    /// Registers a cleanup. On an already disposed scope it runs immediately.
    pub fn add_disposer(&self, disposer: impl FnOnce() + 'static) {
        if self.inner.disposed.get() {
            disposer();
            return;
        }
        self.inner.disposers.borrow_mut().push(Box::new(disposer));
    }

    /// New scope disposed together with this one. Children of a disposed
    /// scope start out disposed.
    pub fn child(&self) -> Scope {
        let child = Scope::new();
        if self.is_disposed() {
            child.dispose();
            return child;
        }
        let mut children = self.inner.children.borrow_mut();
        children.retain(|c| !c.is_disposed());
        children.push(child.clone());
        child
    }

    pub fn is_disposed(&self) -> bool {
        self.inner.disposed.get()
    }

    pub fn dispose(&self) {
        self.inner.dispose();
    }
}

impl ScopeInner {
    fn dispose(&self) {
        if self.disposed.replace(true) {
            return;
        }
        // Dispose children first
        let children = std::mem::take(&mut *self.children.borrow_mut());
        for child in children {
            child.dispose();
        }

        let disposers = std::mem::take(&mut *self.disposers.borrow_mut());
        log::trace!("scope disposed ({} cleanups)", disposers.len());
        for disposer in disposers.into_iter().rev() {
            disposer();
        }
    }
}

impl Clone for Scope {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

pub fn current_scope() -> Option<Scope> {
    CURRENT_SCOPE.with(|current| {
        current
            .borrow()
            .as_ref()
            .and_then(|weak| weak.upgrade().map(|inner| Scope { inner }))
    })
}

/// Runs `f` now and ties the cleanup it returns to the current scope.
/// Outside any scope the cleanup is dropped without running.
pub fn scoped_effect<F>(f: F)
where
    F: FnOnce() -> Box<dyn FnOnce()> + 'static,
{
    let cleanup = f();
    if let Some(scope) = current_scope() {
        scope.add_disposer(cleanup);
    }
}

impl Drop for ScopeInner {
    fn drop(&mut self) {
        self.dispose();
    }
}
