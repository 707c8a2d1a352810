//! Delegate - multi-subscriber synchronous notification point
//!
//! Subscribers run in registration order, on the caller's stack, at the moment
//! the owner fires. The payload is passed by `&mut` so a subscriber can answer
//! back (e.g. suppress a resolution).

pub struct Delegate<T> {
    subscribers: Vec<Box<dyn FnMut(&mut T)>>,
}

impl<T> Delegate<T> {
    pub fn new() -> Self {
        Self { subscribers: Vec::new() }
    }

    pub fn subscribe<F>(&mut self, f: F)
    where
        F: FnMut(&mut T) + 'static,
    {
        self.subscribers.push(Box::new(f));
    }

    pub fn fire(&mut self, args: &mut T) {
        for subscriber in self.subscribers.iter_mut() {
            subscriber(args);
        }
    }

    pub fn len(&self) -> usize {
        self.subscribers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscribers.is_empty()
    }

    pub fn clear(&mut self) {
        self.subscribers.clear();
    }
}

impl<T> Default for Delegate<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> std::fmt::Debug for Delegate<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Delegate")
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}
