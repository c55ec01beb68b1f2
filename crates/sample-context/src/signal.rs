use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

pub type SubId = usize;

/// Observable value shared through `Rc`.
///
/// Subscribers run after the internal borrow is released, so they may read
/// the signal or write to it again. Writes made while subscribers are running
/// are committed immediately and delivered once the current round finishes,
/// which keeps delivery in commit order.
#[derive(Clone)]
pub struct Signal<T: 'static>(Rc<RefCell<Inner<T>>>);

struct Inner<T> {
    value: T,
    subs: Vec<(SubId, Rc<dyn Fn(&T)>)>,
    next_sub: SubId,
    notifying: bool,
    pending: VecDeque<T>,
}

impl<T> Signal<T> {
    pub fn new(value: T) -> Self {
        Self(Rc::new(RefCell::new(Inner {
            value,
            subs: Vec::new(),
            next_sub: 0,
            notifying: false,
            pending: VecDeque::new(),
        })))
    }
    pub fn get(&self) -> T
    where
        T: Clone,
    {
        self.0.borrow().value.clone()
    }
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.0.borrow().value)
    }
    pub fn subscribe(&self, f: impl Fn(&T) + 'static) -> SubId {
        let mut inner = self.0.borrow_mut();
        let id = inner.next_sub;
        inner.next_sub += 1;
        inner.subs.push((id, Rc::new(f)));
        id
    }
    /// Returns false if `id` was not subscribed.
    pub fn unsubscribe(&self, id: SubId) -> bool {
        let mut inner = self.0.borrow_mut();
        let before = inner.subs.len();
        inner.subs.retain(|(sid, _)| *sid != id);
        inner.subs.len() != before
    }
    pub fn subscriber_count(&self) -> usize {
        self.0.borrow().subs.len()
    }
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl<T: Clone> Signal<T> {
    pub fn set(&self, v: T) {
        self.0.borrow_mut().value = v;
        self.notify();
    }

    fn notify(&self) {
        let first = {
            let mut inner = self.0.borrow_mut();
            let snapshot = inner.value.clone();
            if inner.notifying {
                inner.pending.push_back(snapshot);
                return;
            }
            inner.notifying = true;
            snapshot
        };

        // Resets the round even if a subscriber unwinds.
        struct Round<'a, T>(&'a RefCell<Inner<T>>);
        impl<T> Drop for Round<'_, T> {
            fn drop(&mut self) {
                let mut inner = self.0.borrow_mut();
                inner.notifying = false;
                inner.pending.clear();
            }
        }
        let _round = Round(&self.0);

        let mut next = Some(first);
        while let Some(value) = next {
            let subs: Vec<Rc<dyn Fn(&T)>> =
                self.0.borrow().subs.iter().map(|(_, s)| s.clone()).collect();
            for s in subs {
                s(&value);
            }
            next = self.0.borrow_mut().pending.pop_front();
        }
    }
}

pub fn signal<T>(t: T) -> Signal<T> {
    Signal::new(t)
}
