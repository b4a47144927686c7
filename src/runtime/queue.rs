//! Unscheduled event queue: a bounded FIFO that callers pull explicitly.

use super::EventHandle;
use std::collections::VecDeque;

/// Configuration for [`crate::runtime::EventRuntime::queue_create`].
#[derive(Clone, Copy, Debug)]
pub struct QueueConfig {
    pub name: &'static str,
    /// Maximum number of events the queue holds at once.
    pub capacity: usize,
}

#[derive(Debug)]
pub(crate) struct Queue {
    name: &'static str,
    capacity: usize,
    events: VecDeque<EventHandle>,
}

impl Queue {
    pub(crate) fn new(cfg: QueueConfig) -> Self {
        Self {
            name: cfg.name,
            capacity: cfg.capacity,
            events: VecDeque::with_capacity(cfg.capacity),
        }
    }

    #[inline]
    pub(crate) fn try_push(&mut self, ev: EventHandle) -> bool {
        if self.events.len() >= self.capacity {
            return false;
        }
        self.events.push_back(ev);
        true
    }

    #[inline]
    pub(crate) fn pop(&mut self) -> Option<EventHandle> {
        self.events.pop_front()
    }

    pub(crate) fn len(&self) -> usize {
        self.events.len()
    }

    pub(crate) fn name(&self) -> &'static str {
        self.name
    }
}
