//! One-shot listener slot
//!
//! `subscribe` arms the slot, `fire` hands the listener back exactly once and
//! disarms the slot in the same step. Re-arming for the next cycle is the
//! subscriber's job.

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OneShot<L> {
    listener: Option<L>,
}

impl<L> Default for OneShot<L> {
    fn default() -> Self {
        Self { listener: None }
    }
}

impl<L> OneShot<L> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm with a listener, replacing any previous one
    pub fn subscribe(&mut self, listener: L) {
        self.listener = Some(listener);
    }

    /// Disarm without firing
    pub fn unsubscribe(&mut self) -> Option<L> {
        self.listener.take()
    }

    /// Fire: returns the listener and disarms. `None` if not armed.
    pub fn fire(&mut self) -> Option<L> {
        self.listener.take()
    }

    #[inline]
    pub fn is_armed(&self) -> bool {
        self.listener.is_some()
    }
}
