//! Fixed-size event pool with a small per-pool allocation cache.
//!
//! A pool hands out preallocated slot indices LIFO. Frees land in a bounded
//! cache first so hot alloc/free cycles stay on recently used slots; the
//! shared free stack absorbs the overflow.

use super::EventType;

/// Cache depth used when the configuration does not request one.
pub const DEFAULT_CACHE_SIZE: usize = 32;

/// Configuration for [`crate::runtime::EventRuntime::pool_create`].
#[derive(Clone, Copy, Debug)]
pub struct PoolConfig {
    pub name: &'static str,
    /// Type of every event in the pool.
    pub event_type: EventType,
    /// Payload capacity in bytes; entry capacity for vector pools.
    pub buf_size: u32,
    /// Number of events preallocated at creation.
    pub num_events: usize,
    /// User-area bytes carried by every event.
    pub uarea_size: usize,
    /// Allocation cache depth, `None` for the pool default.
    pub cache_size: Option<u32>,
}

#[derive(Debug)]
pub(crate) struct Pool {
    name: &'static str,
    event_type: EventType,
    buf_size: u32,
    num_events: usize,
    free: Vec<u32>,
    cache: Vec<u32>,
    cache_size: usize,
}

impl Pool {
    pub(crate) fn new(cfg: PoolConfig, free: Vec<u32>) -> Self {
        let cache_size = cfg
            .cache_size
            .map_or(DEFAULT_CACHE_SIZE, |c| c as usize)
            .min(cfg.num_events);
        Self {
            name: cfg.name,
            event_type: cfg.event_type,
            buf_size: cfg.buf_size,
            num_events: cfg.num_events,
            free,
            cache: Vec::with_capacity(cache_size),
            cache_size,
        }
    }

    #[inline]
    pub(crate) fn take_slot(&mut self) -> Option<u32> {
        self.cache.pop().or_else(|| self.free.pop())
    }

    #[inline]
    pub(crate) fn put_slot(&mut self, index: u32) {
        if self.cache.len() < self.cache_size {
            self.cache.push(index);
        } else {
            self.free.push(index);
        }
    }

    pub(crate) fn available(&self) -> usize {
        self.free.len() + self.cache.len()
    }

    pub(crate) fn num_events(&self) -> usize {
        self.num_events
    }

    pub(crate) fn name(&self) -> &'static str {
        self.name
    }

    pub(crate) fn event_type(&self) -> EventType {
        self.event_type
    }

    pub(crate) fn buf_size(&self) -> u32 {
        self.buf_size
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pool_with(cache_size: Option<u32>) -> Pool {
        Pool::new(
            PoolConfig {
                name: "p",
                event_type: EventType::Sw,
                buf_size: 8,
                num_events: 4,
                uarea_size: 0,
                cache_size,
            },
            vec![3, 2, 1, 0],
        )
    }

    #[test]
    fn slots_come_back_lifo() {
        let mut pool = pool_with(None);
        let a = pool.take_slot().unwrap();
        let b = pool.take_slot().unwrap();
        assert_ne!(a, b);

        pool.put_slot(a);
        pool.put_slot(b);
        assert_eq!(pool.take_slot(), Some(b));
        assert_eq!(pool.take_slot(), Some(a));
    }

    #[test]
    fn zero_cache_falls_through_to_free_stack() {
        let mut pool = pool_with(Some(0));
        let a = pool.take_slot().unwrap();
        pool.put_slot(a);
        assert_eq!(pool.cache.len(), 0);
        assert_eq!(pool.available(), 4);
    }

    #[test]
    fn exhaustion_returns_none() {
        let mut pool = pool_with(None);
        for _ in 0..4 {
            assert!(pool.take_slot().is_some());
        }
        assert_eq!(pool.take_slot(), None);
        assert_eq!(pool.available(), 0);
    }
}
