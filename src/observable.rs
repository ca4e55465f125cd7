//! Latest-value publish/subscribe cell.
//!
//! A [`Subject`] holds its value in a `tokio::sync::watch` channel. Each
//! listener owns a receiver; it is called with the current value right away,
//! then synchronously from [`Subject::next`] whenever its receiver has an
//! unseen version. Everything runs on the caller's thread, no runtime needed.

use std::cell::RefCell;
use std::rc::{Rc, Weak};
use tokio::sync::watch;

struct Watcher<T> {
    rx: watch::Receiver<T>,
    listener: Box<dyn FnMut(&T)>,
}

impl<T: Clone> Watcher<T> {
    fn emit(&mut self) {
        // Clone out so the channel's read lock is not held inside the listener
        let value = self.rx.borrow_and_update().clone();
        (self.listener)(&value);
    }
}

struct Watchers<T> {
    next_id: u64,
    entries: Vec<(u64, Rc<RefCell<Watcher<T>>>)>,
}

pub struct Subject<T> {
    tx: watch::Sender<T>,
    watchers: Rc<RefCell<Watchers<T>>>,
}

impl<T: Clone + 'static> Subject<T> {
    pub fn new(value: T) -> Self {
        let (tx, _) = watch::channel(value);
        Subject {
            tx,
            watchers: Rc::new(RefCell::new(Watchers {
                next_id: 0,
                entries: vec![],
            })),
        }
    }

    pub fn get(&self) -> watch::Ref<'_, T> {
        self.tx.borrow()
    }

    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: FnMut(&T) + 'static,
    {
        let id = {
            let mut watchers = self.watchers.borrow_mut();
            let id = watchers.next_id;
            watchers.next_id += 1;
            id
        };
        let mut watcher = Watcher {
            rx: self.tx.subscribe(),
            listener: Box::new(listener),
        };
        watcher.emit();
        self.watchers
            .borrow_mut()
            .entries
            .push((id, Rc::new(RefCell::new(watcher))));

        let weak: Weak<RefCell<Watchers<T>>> = Rc::downgrade(&self.watchers);
        Subscription {
            cancel: Some(Box::new(move || {
                if let Some(watchers) = weak.upgrade() {
                    watchers.borrow_mut().entries.retain(|(i, _)| *i != id);
                }
            })),
        }
    }

    /// Replaces the value and notifies every listener.
    pub fn next(&mut self, value: T) {
        self.tx.send_replace(value);
        // Listeners may subscribe or unsubscribe while being notified
        let current: Vec<Rc<RefCell<Watcher<T>>>> =
            self.watchers.borrow().entries.iter().map(|(_, w)| w.clone()).collect();
        for watcher in current {
            let mut watcher = watcher.borrow_mut();
            if watcher.rx.has_changed().unwrap_or(false) {
                watcher.emit();
            }
        }
    }

    pub fn listener_count(&self) -> usize {
        self.watchers.borrow().entries.len()
    }
}

/// Handle returned by [`Subject::subscribe`]. Dropping it unsubscribes.
#[must_use = "dropping a Subscription unsubscribes the listener"]
pub struct Subscription {
    cancel: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    pub fn unsubscribe(mut self) {
        self.cancel_now();
    }

    fn cancel_now(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.cancel_now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn emits_current_value_on_subscribe() {
        let subject = Subject::new(3);
        let seen = Rc::new(RefCell::new(vec![]));
        let sink = seen.clone();
        let _sub = subject.subscribe(move |v| sink.borrow_mut().push(*v));
        assert_eq!(*seen.borrow(), vec![3]);
    }

    #[test]
    fn emits_every_update_in_order() {
        let mut subject = Subject::new(0);
        let seen = Rc::new(RefCell::new(vec![]));
        let sink = seen.clone();
        let _sub = subject.subscribe(move |v| sink.borrow_mut().push(*v));
        subject.next(1);
        subject.next(2);
        assert_eq!(*seen.borrow(), vec![0, 1, 2]);
        assert_eq!(*subject.get(), 2);
    }

    #[test]
    fn resending_the_same_value_still_notifies() {
        let mut subject = Subject::new(vec![1]);
        let count = Rc::new(RefCell::new(0));
        let sink = count.clone();
        let _sub = subject.subscribe(move |_| *sink.borrow_mut() += 1);
        subject.next(vec![1]);
        assert_eq!(*count.borrow(), 2);
    }

    #[test]
    fn dropped_subscription_stops_notifications() {
        let mut subject = Subject::new(0);
        let seen = Rc::new(RefCell::new(vec![]));
        let sink = seen.clone();
        let sub = subject.subscribe(move |v| sink.borrow_mut().push(*v));
        assert_eq!(subject.listener_count(), 1);
        drop(sub);
        assert_eq!(subject.listener_count(), 0);
        subject.next(5);
        assert_eq!(*seen.borrow(), vec![0]);
    }

    #[test]
    fn explicit_unsubscribe_only_removes_its_listener() {
        let mut subject = Subject::new(0);
        let a = Rc::new(RefCell::new(0));
        let b = Rc::new(RefCell::new(0));
        let (sa, sb) = (a.clone(), b.clone());
        let first = subject.subscribe(move |v| *sa.borrow_mut() = *v);
        let _second = subject.subscribe(move |v| *sb.borrow_mut() = *v);
        first.unsubscribe();
        subject.next(9);
        assert_eq!(*a.borrow(), 0);
        assert_eq!(*b.borrow(), 9);
    }

    #[test]
    fn subscription_outliving_subject_is_harmless() {
        let subject = Subject::new(1);
        let sub = subject.subscribe(|_| {});
        drop(subject);
        drop(sub);
    }
}
