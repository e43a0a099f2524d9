//! Observable value with an explicit subscriber list.
//!
//! # Invariants
//! - Observers run after every mutation, in subscription order.
//! - Observers are invoked outside the value lock, with a snapshot, so an
//!   observer may read the same `Published` without deadlocking.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

pub type SubscriptionId = u64;

type Observer<T> = Arc<dyn Fn(&T) + Send + Sync>;

pub struct Published<T> {
    value: Mutex<T>,
    observers: Mutex<Vec<(SubscriptionId, Observer<T>)>>,
    next_id: AtomicU64,
}

impl<T: Clone> Published<T> {
    pub fn new(value: T) -> Self {
        Self {
            value: Mutex::new(value),
            observers: Mutex::new(Vec::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Returns a snapshot of the current value.
    pub fn get(&self) -> T {
        self.value
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Reads the current value without cloning it.
    pub fn with<R>(&self, read: impl FnOnce(&T) -> R) -> R {
        let guard = self.value.lock().unwrap_or_else(PoisonError::into_inner);
        read(&guard)
    }

    pub fn set(&self, value: T) {
        self.update(|current| *current = value);
    }

    /// Mutates the value in place, then notifies observers.
    pub fn update<R>(&self, mutate: impl FnOnce(&mut T) -> R) -> R {
        let (result, snapshot) = {
            let mut guard = self.value.lock().unwrap_or_else(PoisonError::into_inner);
            let result = mutate(&mut guard);
            (result, guard.clone())
        };
        self.notify(&snapshot);
        result
    }

    pub fn subscribe(&self, observer: impl Fn(&T) + Send + Sync + 'static) -> SubscriptionId {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.observers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((id, Arc::new(observer)));
        id
    }

    /// Removes one observer. Returns `false` when the id is unknown.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut observers = self
            .observers
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let before = observers.len();
        observers.retain(|(observer_id, _)| *observer_id != id);
        observers.len() != before
    }

    pub fn subscriber_count(&self) -> usize {
        self.observers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    fn notify(&self, snapshot: &T) {
        let observers: Vec<Observer<T>> = self
            .observers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(_, observer)| Arc::clone(observer))
            .collect();
        for observer in observers {
            observer(snapshot);
        }
    }
}

impl<T: Clone + Default> Default for Published<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

#[cfg(test)]
mod tests {
    use super::Published;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn observers_see_every_mutation_until_unsubscribed() {
        let published = Published::new(Vec::<u32>::new());
        let seen = Arc::new(AtomicUsize::new(0));
        let seen_in_observer = Arc::clone(&seen);
        let id = published.subscribe(move |values: &Vec<u32>| {
            seen_in_observer.store(values.len(), Ordering::SeqCst);
        });

        published.update(|values| values.push(1));
        published.update(|values| values.push(2));
        assert_eq!(seen.load(Ordering::SeqCst), 2);

        assert!(published.unsubscribe(id));
        published.update(|values| values.push(3));
        assert_eq!(seen.load(Ordering::SeqCst), 2);
        assert_eq!(published.get(), vec![1, 2, 3]);
        assert!(!published.unsubscribe(id));
    }

    #[test]
    fn observer_can_read_the_same_value() {
        let published = Arc::new(Published::new(0_i32));
        let reader = Arc::clone(&published);
        let mirrored = Arc::new(AtomicUsize::new(0));
        let mirrored_in_observer = Arc::clone(&mirrored);
        published.subscribe(move |_| {
            let current = usize::try_from(reader.get()).unwrap();
            mirrored_in_observer.store(current, Ordering::SeqCst);
        });

        published.set(7);
        assert_eq!(mirrored.load(Ordering::SeqCst), 7);
    }
}
