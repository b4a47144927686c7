//! In-process event runtime backing the benchmark fixtures.
//!
//! The runtime is a capability-style resource manager: fixed-size pools of
//! typed events, opaque `Copy` handles with explicit free, and unscheduled
//! (caller-pulled) FIFO queues. The benchmark engine never touches this
//! module directly; fixtures consume it through [`EventRuntime`].
//!
//! Handles are reference counted. `free` drops one reference and returns the
//! slot to its pool when the last reference goes; `event_ref` adds a
//! reference without copying, `event_clone` allocates a fresh event and
//! copies payload and user area.

use std::num::NonZeroU32;
use thiserror::Error;
use tracing::debug;

pub mod pool;
pub mod queue;

pub use pool::PoolConfig;
pub use queue::QueueConfig;

use pool::Pool;
use queue::Queue;

/// Event type tag carried by every pool and event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EventType {
    /// Plain software event.
    Sw,
    /// Packet-style event.
    Packet,
    /// Vector container holding other event handles.
    Vector,
}

/// Opaque handle to an allocated event. Niche-optimized so tables of
/// `Option<EventHandle>` cost nothing over raw handles.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EventHandle(NonZeroU32);

impl EventHandle {
    #[inline]
    fn from_index(index: u32) -> Option<Self> {
        NonZeroU32::new(index.checked_add(1)?).map(EventHandle)
    }

    #[inline]
    fn index(self) -> usize {
        (self.0.get() - 1) as usize
    }
}

/// Identifier of a created pool.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PoolId(pub(crate) u32);

/// Identifier of a created queue.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct QueueId(pub(crate) u32);

/// User-area metadata snapshot, see [`EventRuntime::uarea_info`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UareaInfo {
    pub len: usize,
    pub id: Option<u16>,
}

/// Vector container metadata snapshot, see [`EventRuntime::vector_info`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VectorInfo {
    pub size: usize,
    pub max_size: usize,
}

/// Errors surfaced by runtime management operations.
///
/// Data-path operations (`alloc`, `dequeue`) signal transient shortage with
/// `Option`/partial counts instead; callers apply their own retry policy.
#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("invalid pool configuration: {0}")]
    InvalidPoolConfig(&'static str),
    #[error("pool {0:?} does not exist")]
    UnknownPool(PoolId),
    #[error("pool '{name}' still has {outstanding} events allocated")]
    PoolBusy {
        name: &'static str,
        outstanding: usize,
    },
    #[error("invalid queue configuration: {0}")]
    InvalidQueueConfig(&'static str),
    #[error("queue {0:?} does not exist")]
    UnknownQueue(QueueId),
    #[error("queue '{0}' is full")]
    QueueFull(&'static str),
}

/// Vector container storage: a fixed table plus the declared entry count.
#[derive(Debug)]
struct VectorBody {
    tbl: Box<[Option<EventHandle>]>,
    len: usize,
    max: usize,
}

#[derive(Debug)]
struct Slot {
    pool: PoolId,
    allocated: bool,
    event_type: EventType,
    size: u32,
    refs: u32,
    uarea_id: Option<u16>,
    uarea: Box<[u8]>,
    payload: Box<[u8]>,
    vector: Option<VectorBody>,
}

/// The runtime facade: owns every pool, queue and event slot.
#[derive(Debug, Default)]
pub struct EventRuntime {
    slots: Vec<Slot>,
    pools: Vec<Option<Pool>>,
    queues: Vec<Option<Queue>>,
}

impl EventRuntime {
    pub fn new() -> Self {
        Self::default()
    }

    // --- pool management -------------------------------------------------

    /// Create a pool and preallocate its event slots.
    pub fn pool_create(&mut self, cfg: PoolConfig) -> Result<PoolId, RuntimeError> {
        if cfg.num_events == 0 {
            return Err(RuntimeError::InvalidPoolConfig("num_events must be > 0"));
        }
        if cfg.buf_size == 0 {
            return Err(RuntimeError::InvalidPoolConfig("buf_size must be > 0"));
        }

        let id = PoolId(self.pools.len() as u32);
        let base = self.slots.len() as u32;
        for _ in 0..cfg.num_events {
            self.slots.push(Slot {
                pool: id,
                allocated: false,
                event_type: cfg.event_type,
                size: 0,
                refs: 0,
                uarea_id: None,
                uarea: vec![0u8; cfg.uarea_size].into_boxed_slice(),
                payload: match cfg.event_type {
                    EventType::Vector => Box::default(),
                    _ => vec![0u8; cfg.buf_size as usize].into_boxed_slice(),
                },
                vector: match cfg.event_type {
                    EventType::Vector => Some(VectorBody {
                        tbl: vec![None; cfg.buf_size as usize].into_boxed_slice(),
                        len: 0,
                        max: cfg.buf_size as usize,
                    }),
                    _ => None,
                },
            });
        }
        let slot_ids = (base..base + cfg.num_events as u32).rev().collect();
        debug!(
            name = cfg.name,
            num_events = cfg.num_events,
            buf_size = cfg.buf_size,
            "created event pool"
        );
        self.pools.push(Some(Pool::new(cfg, slot_ids)));
        Ok(id)
    }

    /// Delete a pool. Fails while any of its events are still allocated.
    pub fn pool_delete(&mut self, id: PoolId) -> Result<(), RuntimeError> {
        let pool = self
            .pools
            .get(id.0 as usize)
            .and_then(Option::as_ref)
            .ok_or(RuntimeError::UnknownPool(id))?;
        let outstanding = pool.num_events() - pool.available();
        if outstanding > 0 {
            return Err(RuntimeError::PoolBusy {
                name: pool.name(),
                outstanding,
            });
        }
        debug!(name = pool.name(), "deleted event pool");
        self.pools[id.0 as usize] = None;
        Ok(())
    }

    /// Number of events currently free in the pool.
    pub fn pool_available(&self, id: PoolId) -> usize {
        self.pools
            .get(id.0 as usize)
            .and_then(Option::as_ref)
            .map_or(0, Pool::available)
    }

    // --- queue management ------------------------------------------------

    /// Create an unscheduled FIFO queue.
    pub fn queue_create(&mut self, cfg: QueueConfig) -> Result<QueueId, RuntimeError> {
        if cfg.capacity == 0 {
            return Err(RuntimeError::InvalidQueueConfig("capacity must be > 0"));
        }
        let id = QueueId(self.queues.len() as u32);
        debug!(name = cfg.name, capacity = cfg.capacity, "created queue");
        self.queues.push(Some(Queue::new(cfg)));
        Ok(id)
    }

    /// Delete a queue, freeing any events still enqueued. Returns how many
    /// leftovers were drained.
    pub fn queue_delete(&mut self, id: QueueId) -> Result<usize, RuntimeError> {
        self.queues
            .get(id.0 as usize)
            .and_then(Option::as_ref)
            .ok_or(RuntimeError::UnknownQueue(id))?;
        let mut drained = 0;
        while let Some(ev) = self.queue_mut(id).and_then(Queue::pop) {
            self.free(ev);
            drained += 1;
        }
        self.queues[id.0 as usize] = None;
        Ok(drained)
    }

    /// Number of events currently enqueued.
    pub fn queue_len(&self, id: QueueId) -> usize {
        self.queues
            .get(id.0 as usize)
            .and_then(Option::as_ref)
            .map_or(0, Queue::len)
    }

    // --- allocation ------------------------------------------------------

    /// Allocate one event of `size` bytes (entries for vector pools).
    /// Returns `None` on pool exhaustion or a size/type mismatch.
    pub fn alloc(&mut self, pool: PoolId, size: u32, ty: EventType) -> Option<EventHandle> {
        let p = self.pools.get_mut(pool.0 as usize)?.as_mut()?;
        if ty != p.event_type() || size == 0 || size > p.buf_size() {
            return None;
        }
        let index = p.take_slot()?;
        let handle = EventHandle::from_index(index)?;
        let slot = &mut self.slots[index as usize];
        slot.allocated = true;
        slot.size = size;
        slot.refs = 1;
        slot.event_type = ty;
        if let Some(v) = slot.vector.as_mut() {
            v.len = 0;
            v.max = size as usize;
        }
        Some(handle)
    }

    /// Burst allocation: fill `out` front to back, stopping at the first
    /// shortage. Returns the number of events actually allocated; entries
    /// past that count are left untouched.
    pub fn alloc_multi(
        &mut self,
        pool: PoolId,
        size: u32,
        ty: EventType,
        out: &mut [Option<EventHandle>],
    ) -> usize {
        let mut num = 0;
        for entry in out.iter_mut() {
            match self.alloc(pool, size, ty) {
                Some(ev) => {
                    *entry = Some(ev);
                    num += 1;
                }
                None => break,
            }
        }
        num
    }

    /// Drop one reference; the slot returns to its pool when the last
    /// reference goes.
    pub fn free(&mut self, ev: EventHandle) {
        let index = ev.index();
        let slot = &mut self.slots[index];
        // Tolerates stale handles: a failed run can leave the same event in
        // both a scratch table and a queue, and shutdown drains both.
        if !slot.allocated {
            return;
        }
        slot.refs = slot.refs.saturating_sub(1);
        if slot.refs > 0 {
            return;
        }
        slot.allocated = false;
        slot.uarea_id = None;
        if let Some(v) = slot.vector.as_mut() {
            v.len = 0;
        }
        let pool = slot.pool;
        if let Some(p) = self.pools.get_mut(pool.0 as usize).and_then(Option::as_mut) {
            p.put_slot(index as u32);
        }
    }

    /// Burst free: frees and clears every present entry, returning the count.
    pub fn free_multi(&mut self, tbl: &mut [Option<EventHandle>]) -> usize {
        let mut num = 0;
        for entry in tbl.iter_mut() {
            if let Some(ev) = entry.take() {
                self.free(ev);
                num += 1;
            }
        }
        num
    }

    // --- metadata accessors ----------------------------------------------

    #[inline]
    fn slot(&self, ev: EventHandle) -> &Slot {
        let slot = &self.slots[ev.index()];
        debug_assert!(slot.allocated, "access through a stale event handle");
        slot
    }

    #[inline]
    fn slot_mut(&mut self, ev: EventHandle) -> &mut Slot {
        let slot = &mut self.slots[ev.index()];
        debug_assert!(slot.allocated, "access through a stale event handle");
        slot
    }

    /// Allocated size of the event in bytes (entries for vectors).
    #[inline]
    pub fn event_size(&self, ev: EventHandle) -> u32 {
        self.slot(ev).size
    }

    #[inline]
    pub fn event_type(&self, ev: EventHandle) -> EventType {
        self.slot(ev).event_type
    }

    #[inline]
    pub fn set_event_type(&mut self, ev: EventHandle, ty: EventType) {
        self.slot_mut(ev).event_type = ty;
    }

    /// Pool the event was allocated from.
    #[inline]
    pub fn event_pool(&self, ev: EventHandle) -> PoolId {
        self.slot(ev).pool
    }

    /// Event payload bytes.
    #[inline]
    pub fn payload(&self, ev: EventHandle) -> &[u8] {
        let slot = self.slot(ev);
        &slot.payload[..slot.size as usize]
    }

    #[inline]
    pub fn payload_mut(&mut self, ev: EventHandle) -> &mut [u8] {
        let slot = self.slot_mut(ev);
        &mut slot.payload[..slot.size as usize]
    }

    /// Per-event user area.
    #[inline]
    pub fn uarea(&self, ev: EventHandle) -> &[u8] {
        &self.slot(ev).uarea
    }

    #[inline]
    pub fn uarea_mut(&mut self, ev: EventHandle) -> &mut [u8] {
        &mut self.slot_mut(ev).uarea
    }

    /// Opaque user tag, `None` until set.
    #[inline]
    pub fn uarea_id(&self, ev: EventHandle) -> Option<u16> {
        self.slot(ev).uarea_id
    }

    #[inline]
    pub fn uarea_id_set(&mut self, ev: EventHandle, id: u16) {
        self.slot_mut(ev).uarea_id = Some(id);
    }

    /// Combined user-area metadata in one lookup.
    #[inline]
    pub fn uarea_info(&self, ev: EventHandle) -> UareaInfo {
        let slot = self.slot(ev);
        UareaInfo {
            len: slot.uarea.len(),
            id: slot.uarea_id,
        }
    }

    /// Burst type lookup; stops at the first absent handle. Returns the
    /// number of entries written to `out`.
    pub fn event_type_multi(
        &self,
        evs: &[Option<EventHandle>],
        out: &mut [EventType],
    ) -> usize {
        let n = evs.len().min(out.len());
        for i in 0..n {
            match evs[i] {
                Some(ev) => out[i] = self.event_type(ev),
                None => return i,
            }
        }
        n
    }

    /// Length of the leading run of events sharing the first entry's type,
    /// together with that type. `None` when the first entry is absent.
    pub fn same_type_multi(
        &self,
        evs: &[Option<EventHandle>],
    ) -> Option<(EventType, usize)> {
        let first = evs.first().copied().flatten()?;
        let ty = self.event_type(first);
        let mut num = 1;
        for entry in &evs[1..] {
            match entry {
                Some(ev) if self.event_type(*ev) == ty => num += 1,
                _ => break,
            }
        }
        Some((ty, num))
    }

    // --- references and clones -------------------------------------------

    /// Add a reference to the event. The returned handle must be freed
    /// separately.
    #[inline]
    pub fn event_ref(&mut self, ev: EventHandle) -> EventHandle {
        self.slot_mut(ev).refs += 1;
        ev
    }

    /// True when more than one reference to the event exists.
    #[inline]
    pub fn has_ref(&self, ev: EventHandle) -> bool {
        self.slot(ev).refs > 1
    }

    /// Allocate a new event and copy payload, user area and user tag from
    /// `ev`. `pool` defaults to the source event's pool.
    pub fn event_clone(&mut self, ev: EventHandle, pool: Option<PoolId>) -> Option<EventHandle> {
        let src = ev.index();
        let (src_pool, ty, size, uarea_id) = {
            let slot = self.slot(ev);
            (slot.pool, slot.event_type, slot.size, slot.uarea_id)
        };
        let clone = self.alloc(pool.unwrap_or(src_pool), size, ty)?;
        let dst = clone.index();
        let (src_slot, dst_slot) = two_slots(&mut self.slots, src, dst);
        let n = size as usize;
        if ty != EventType::Vector {
            dst_slot.payload[..n].copy_from_slice(&src_slot.payload[..n]);
        }
        let ua = src_slot.uarea.len().min(dst_slot.uarea.len());
        dst_slot.uarea[..ua].copy_from_slice(&src_slot.uarea[..ua]);
        dst_slot.uarea_id = uarea_id;
        Some(clone)
    }

    // --- vector containers -----------------------------------------------

    #[inline]
    fn vector_body(&self, ev: EventHandle) -> Option<&VectorBody> {
        self.slot(ev).vector.as_ref()
    }

    /// Declared entries of the vector container.
    #[inline]
    pub fn vector_tbl(&self, ev: EventHandle) -> &[Option<EventHandle>] {
        self.vector_body(ev).map_or(&[], |v| &v.tbl[..v.len])
    }

    /// Mutable view over the full table for packing events in; pair with
    /// [`EventRuntime::vector_size_set`] to declare how many are valid.
    #[inline]
    pub fn vector_tbl_mut(&mut self, ev: EventHandle) -> &mut [Option<EventHandle>] {
        match self.slot_mut(ev).vector.as_mut() {
            Some(v) => &mut v.tbl[..v.max],
            None => &mut [],
        }
    }

    #[inline]
    pub fn vector_size(&self, ev: EventHandle) -> usize {
        self.vector_body(ev).map_or(0, |v| v.len)
    }

    #[inline]
    pub fn vector_max_size(&self, ev: EventHandle) -> usize {
        self.vector_body(ev).map_or(0, |v| v.max)
    }

    /// Declare the number of valid entries, clamped to the allocated size.
    #[inline]
    pub fn vector_size_set(&mut self, ev: EventHandle, size: usize) {
        if let Some(v) = self.slot_mut(ev).vector.as_mut() {
            v.len = size.min(v.max);
        }
    }

    #[inline]
    pub fn vector_info(&self, ev: EventHandle) -> VectorInfo {
        let body = self.vector_body(ev);
        VectorInfo {
            size: body.map_or(0, |v| v.len),
            max_size: body.map_or(0, |v| v.max),
        }
    }

    /// Free the vector container itself; events referenced by its table are
    /// untouched and stay owned by the caller.
    #[inline]
    pub fn vector_free(&mut self, ev: EventHandle) {
        self.free(ev);
    }

    // --- unscheduled queue data path -------------------------------------

    #[inline]
    fn queue_mut(&mut self, id: QueueId) -> Option<&mut Queue> {
        self.queues.get_mut(id.0 as usize)?.as_mut()
    }

    /// Enqueue one event.
    pub fn send(&mut self, ev: EventHandle, queue: QueueId) -> Result<(), RuntimeError> {
        let q = self
            .queue_mut(queue)
            .ok_or(RuntimeError::UnknownQueue(queue))?;
        if !q.try_push(ev) {
            return Err(RuntimeError::QueueFull(q.name()));
        }
        Ok(())
    }

    /// Burst enqueue: stops at the first absent entry or a full queue.
    /// Returns the number of events enqueued.
    pub fn send_multi(&mut self, evs: &[Option<EventHandle>], queue: QueueId) -> usize {
        let Some(q) = self.queue_mut(queue) else {
            return 0;
        };
        let mut num = 0;
        for entry in evs {
            match entry {
                Some(ev) if q.try_push(*ev) => num += 1,
                _ => break,
            }
        }
        num
    }

    /// Dequeue one event; `None` when the queue is empty.
    pub fn dequeue(&mut self, queue: QueueId) -> Option<EventHandle> {
        self.queue_mut(queue)?.pop()
    }

    /// Burst dequeue into `out`; returns the number of events written.
    pub fn dequeue_multi(
        &mut self,
        queue: QueueId,
        out: &mut [Option<EventHandle>],
    ) -> usize {
        let Some(q) = self.queue_mut(queue) else {
            return 0;
        };
        let mut num = 0;
        for entry in out.iter_mut() {
            match q.pop() {
                Some(ev) => {
                    *entry = Some(ev);
                    num += 1;
                }
                None => break,
            }
        }
        num
    }
}

/// Disjoint mutable access to two distinct slots.
fn two_slots(slots: &mut [Slot], a: usize, b: usize) -> (&mut Slot, &mut Slot) {
    debug_assert_ne!(a, b);
    if a < b {
        let (lo, hi) = slots.split_at_mut(b);
        (&mut lo[a], &mut hi[0])
    } else {
        let (lo, hi) = slots.split_at_mut(a);
        (&mut hi[0], &mut lo[b])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_runtime() -> (EventRuntime, PoolId) {
        let mut rt = EventRuntime::new();
        let pool = rt
            .pool_create(PoolConfig {
                name: "test-pool",
                event_type: EventType::Sw,
                buf_size: 64,
                num_events: 4,
                uarea_size: 8,
                cache_size: None,
            })
            .unwrap();
        (rt, pool)
    }

    #[test]
    fn alloc_free_roundtrip() {
        let (mut rt, pool) = small_runtime();
        assert_eq!(rt.pool_available(pool), 4);

        let ev = rt.alloc(pool, 64, EventType::Sw).unwrap();
        assert_eq!(rt.pool_available(pool), 3);
        assert_eq!(rt.event_size(ev), 64);
        assert_eq!(rt.event_type(ev), EventType::Sw);
        assert_eq!(rt.event_pool(ev), pool);

        rt.free(ev);
        assert_eq!(rt.pool_available(pool), 4);
    }

    #[test]
    fn alloc_rejects_mismatched_requests() {
        let (mut rt, pool) = small_runtime();
        assert!(rt.alloc(pool, 65, EventType::Sw).is_none());
        assert!(rt.alloc(pool, 0, EventType::Sw).is_none());
        assert!(rt.alloc(pool, 64, EventType::Packet).is_none());
    }

    #[test]
    fn alloc_multi_reports_partial_success() {
        let (mut rt, pool) = small_runtime();
        let mut tbl = vec![None; 8];
        assert_eq!(rt.alloc_multi(pool, 64, EventType::Sw, &mut tbl), 4);
        assert!(tbl[..4].iter().all(Option::is_some));
        assert!(tbl[4..].iter().all(Option::is_none));
        assert_eq!(rt.alloc_multi(pool, 64, EventType::Sw, &mut tbl[4..]), 0);

        assert_eq!(rt.free_multi(&mut tbl), 4);
        assert_eq!(rt.pool_available(pool), 4);
    }

    #[test]
    fn references_keep_events_alive() {
        let (mut rt, pool) = small_runtime();
        let ev = rt.alloc(pool, 32, EventType::Sw).unwrap();
        assert!(!rt.has_ref(ev));

        let dup = rt.event_ref(ev);
        assert!(rt.has_ref(ev));
        rt.free(dup);
        assert!(!rt.has_ref(ev));
        assert_eq!(rt.pool_available(pool), 3);

        rt.free(ev);
        assert_eq!(rt.pool_available(pool), 4);
    }

    #[test]
    fn clone_copies_payload_and_uarea() {
        let (mut rt, pool) = small_runtime();
        let ev = rt.alloc(pool, 16, EventType::Sw).unwrap();
        rt.payload_mut(ev).copy_from_slice(&[7u8; 16]);
        rt.uarea_mut(ev).copy_from_slice(&[3u8; 8]);
        rt.uarea_id_set(ev, 42);

        let clone = rt.event_clone(ev, None).unwrap();
        assert_ne!(ev, clone);
        assert_eq!(rt.payload(clone), &[7u8; 16]);
        assert_eq!(rt.uarea(clone), &[3u8; 8]);
        assert_eq!(rt.uarea_id(clone), Some(42));
        assert!(!rt.has_ref(clone));
    }

    #[test]
    fn uarea_id_cleared_on_final_free() {
        let (mut rt, pool) = small_runtime();
        let ev = rt.alloc(pool, 16, EventType::Sw).unwrap();
        rt.uarea_id_set(ev, 9);
        assert_eq!(rt.uarea_info(ev), UareaInfo { len: 8, id: Some(9) });
        rt.free(ev);

        let ev = rt.alloc(pool, 16, EventType::Sw).unwrap();
        assert_eq!(rt.uarea_id(ev), None);
        rt.free(ev);
    }

    #[test]
    fn type_multi_stops_at_gap() {
        let (mut rt, pool) = small_runtime();
        let mut tbl = vec![None; 4];
        rt.alloc_multi(pool, 16, EventType::Sw, &mut tbl);
        tbl[2] = None;

        let mut types = vec![EventType::Packet; 4];
        assert_eq!(rt.event_type_multi(&tbl, &mut types), 2);
        assert_eq!(types[0], EventType::Sw);
        assert_eq!(types[1], EventType::Sw);

        let (ty, num) = rt.same_type_multi(&tbl).unwrap();
        assert_eq!(ty, EventType::Sw);
        assert_eq!(num, 2);
    }

    #[test]
    fn queue_preserves_fifo_order() {
        let (mut rt, pool) = small_runtime();
        let queue = rt
            .queue_create(QueueConfig {
                name: "q",
                capacity: 4,
            })
            .unwrap();

        let a = rt.alloc(pool, 16, EventType::Sw).unwrap();
        let b = rt.alloc(pool, 16, EventType::Sw).unwrap();
        rt.send(a, queue).unwrap();
        rt.send(b, queue).unwrap();
        assert_eq!(rt.queue_len(queue), 2);

        assert_eq!(rt.dequeue(queue), Some(a));
        assert_eq!(rt.dequeue(queue), Some(b));
        assert_eq!(rt.dequeue(queue), None);
        rt.free(a);
        rt.free(b);
    }

    #[test]
    fn queue_full_is_an_error() {
        let (mut rt, pool) = small_runtime();
        let queue = rt
            .queue_create(QueueConfig {
                name: "q",
                capacity: 1,
            })
            .unwrap();
        let a = rt.alloc(pool, 16, EventType::Sw).unwrap();
        let b = rt.alloc(pool, 16, EventType::Sw).unwrap();
        rt.send(a, queue).unwrap();
        assert!(matches!(
            rt.send(b, queue),
            Err(RuntimeError::QueueFull("q"))
        ));
        rt.free(b);
    }

    #[test]
    fn queue_delete_drains_leftovers() {
        let (mut rt, pool) = small_runtime();
        let queue = rt
            .queue_create(QueueConfig {
                name: "q",
                capacity: 4,
            })
            .unwrap();
        let mut tbl = vec![None; 3];
        rt.alloc_multi(pool, 16, EventType::Sw, &mut tbl);
        assert_eq!(rt.send_multi(&tbl, queue), 3);

        assert_eq!(rt.queue_delete(queue).unwrap(), 3);
        assert_eq!(rt.pool_available(pool), 4);
    }

    #[test]
    fn pool_delete_requires_all_events_back() {
        let (mut rt, pool) = small_runtime();
        let ev = rt.alloc(pool, 16, EventType::Sw).unwrap();
        assert!(matches!(
            rt.pool_delete(pool),
            Err(RuntimeError::PoolBusy { outstanding: 1, .. })
        ));
        rt.free(ev);
        rt.pool_delete(pool).unwrap();
        assert!(matches!(
            rt.pool_delete(pool),
            Err(RuntimeError::UnknownPool(_))
        ));
    }

    #[test]
    fn vector_declared_size_rules() {
        let mut rt = EventRuntime::new();
        let pool = rt
            .pool_create(PoolConfig {
                name: "vec-pool",
                event_type: EventType::Vector,
                buf_size: 8,
                num_events: 2,
                uarea_size: 8,
                cache_size: None,
            })
            .unwrap();
        let sw_pool = rt
            .pool_create(PoolConfig {
                name: "sw-pool",
                event_type: EventType::Sw,
                buf_size: 16,
                num_events: 2,
                uarea_size: 8,
                cache_size: None,
            })
            .unwrap();

        let vec = rt.alloc(pool, 4, EventType::Vector).unwrap();
        assert_eq!(rt.vector_size(vec), 0);
        assert_eq!(rt.vector_max_size(vec), 4);
        assert!(rt.vector_tbl(vec).is_empty());

        let item = rt.alloc(sw_pool, 16, EventType::Sw).unwrap();
        rt.vector_tbl_mut(vec)[0] = Some(item);
        rt.vector_size_set(vec, 1);
        assert_eq!(rt.vector_tbl(vec), &[Some(item)]);
        assert_eq!(
            rt.vector_info(vec),
            VectorInfo {
                size: 1,
                max_size: 4
            }
        );

        // Declared size saturates at the allocated capacity.
        rt.vector_size_set(vec, 99);
        assert_eq!(rt.vector_size(vec), 4);

        rt.vector_free(vec);
        // The packed event survives the container.
        assert_eq!(rt.event_size(item), 16);
        rt.free(item);
    }
}
