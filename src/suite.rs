//! The benchmark catalog and its fixture bodies.
//!
//! Fixtures operate on [`BenchState`]: shared scratch tables of event
//! handles and accessor outputs, sized for the widest catalog entry, plus
//! the pools and the unscheduled queue they exercise. Setup populates the
//! tables through the runtime, the measured operation performs
//! [`REPEAT_COUNT`] primitive calls against them, and teardown returns every
//! acquired event so the next round starts from a clean slate. Fixtures
//! never touch the timing source; instrumentation belongs to the engine.

use anyhow::{bail, Context, Result};
use std::hint::black_box;
use tracing::debug;

use crate::bench::{BenchInfo, REPEAT_COUNT};
use crate::cli::Config;
use crate::runtime::{
    EventHandle, EventRuntime, EventType, PoolConfig, PoolId, QueueConfig, QueueId,
};

/// User area size in bytes.
pub const UAREA_SIZE: usize = 8;

/// Maximum number of retries for populating scratch tables.
pub const MAX_RETRY: u32 = 1024;

/// Scratch state shared by every fixture for the lifetime of one run.
pub struct BenchState {
    rt: EventRuntime,
    sw_pool: PoolId,
    packet_pool: PoolId,
    vector_pool: PoolId,
    unsched_queue: QueueId,

    burst_size: usize,
    event_size: u32,
    vector_size: usize,

    event_tbl: Vec<Option<EventHandle>>,
    event2_tbl: Vec<Option<EventHandle>>,
    addr_tbl: Vec<usize>,
    u16_tbl: Vec<u16>,
    u32_tbl: Vec<u32>,
    type_tbl: Vec<EventType>,
    pool_tbl: Vec<Option<PoolId>>,
}

impl BenchState {
    /// Create the pools, the unscheduled queue and the scratch tables.
    ///
    /// Pools hold `max(2, burst_size) * REPEAT_COUNT` events: burst entries
    /// need `burst_size` events per repeat, clone and reference entries need
    /// two.
    pub fn new(config: &Config) -> Result<Self> {
        let mut rt = EventRuntime::new();
        let max_events = config.burst_size.max(2) * REPEAT_COUNT;

        let sw_pool = rt
            .pool_create(PoolConfig {
                name: "sw-event-pool",
                event_type: EventType::Sw,
                buf_size: config.event_size,
                num_events: max_events,
                uarea_size: UAREA_SIZE,
                cache_size: config.cache_size,
            })
            .context("creating the sw event pool failed")?;

        let packet_pool = rt
            .pool_create(PoolConfig {
                name: "packet-pool",
                event_type: EventType::Packet,
                buf_size: config.event_size,
                num_events: max_events,
                uarea_size: UAREA_SIZE,
                cache_size: config.cache_size,
            })
            .context("creating the packet pool failed")?;

        let vector_pool = rt
            .pool_create(PoolConfig {
                name: "vector-pool",
                event_type: EventType::Vector,
                buf_size: config.vector_size as u32,
                num_events: max_events,
                uarea_size: UAREA_SIZE,
                cache_size: config.cache_size,
            })
            .context("creating the vector pool failed")?;

        let unsched_queue = rt
            .queue_create(QueueConfig {
                name: "unsched-queue",
                capacity: config.burst_size * REPEAT_COUNT,
            })
            .context("creating the unscheduled queue failed")?;

        Ok(Self {
            rt,
            sw_pool,
            packet_pool,
            vector_pool,
            unsched_queue,
            burst_size: config.burst_size,
            event_size: config.event_size,
            vector_size: config.vector_size,
            event_tbl: vec![None; max_events],
            event2_tbl: vec![None; max_events],
            addr_tbl: vec![0; max_events],
            u16_tbl: vec![0; max_events],
            u32_tbl: vec![0; max_events],
            type_tbl: vec![EventType::Sw; max_events],
            pool_tbl: vec![None; max_events],
        })
    }

    /// Tear the runtime resources down: free stray scratch events, drain the
    /// queue and delete pools and queue.
    pub fn release(&mut self) -> Result<()> {
        free_tbl(&mut self.rt, &mut self.event_tbl);
        free_tbl(&mut self.rt, &mut self.event2_tbl);
        let drained = self.rt.queue_delete(self.unsched_queue)?;
        if drained > 0 {
            debug!(drained, "drained leftover events from the unscheduled queue");
        }
        self.rt.pool_delete(self.sw_pool)?;
        self.rt.pool_delete(self.packet_pool)?;
        self.rt.pool_delete(self.vector_pool)?;
        Ok(())
    }
}

// --- scratch table helpers ------------------------------------------------

/// Fill `tbl` with freshly allocated events, retrying transient shortage up
/// to [`MAX_RETRY`] times before giving up.
fn alloc_into(
    rt: &mut EventRuntime,
    tbl: &mut [Option<EventHandle>],
    pool: PoolId,
    ty: EventType,
    size: u32,
) -> Result<()> {
    let mut filled = 0;
    let mut retries = 0;
    while filled < tbl.len() {
        let num = rt.alloc_multi(pool, size, ty, &mut tbl[filled..]);
        if num == 0 {
            retries += 1;
            if retries > MAX_RETRY {
                bail!("allocating test events failed after {} retries", MAX_RETRY);
            }
            continue;
        }
        retries = 0;
        filled += num;
    }
    Ok(())
}

/// Free and clear every present entry.
fn free_tbl(rt: &mut EventRuntime, tbl: &mut [Option<EventHandle>]) {
    for entry in tbl.iter_mut() {
        if let Some(ev) = entry.take() {
            rt.free(ev);
        }
    }
}

/// Tag the first `num` test events with their table index.
fn init_test_events(s: &mut BenchState, num: usize) -> Result<()> {
    for i in 0..num {
        let Some(ev) = s.event_tbl[i] else {
            bail!("test event table not fully populated");
        };
        s.rt.uarea_id_set(ev, i as u16);
    }
    Ok(())
}

// --- fixture setup --------------------------------------------------------

fn create_sw_events(s: &mut BenchState) -> Result<()> {
    let (pool, size) = (s.sw_pool, s.event_size);
    alloc_into(
        &mut s.rt,
        &mut s.event_tbl[..REPEAT_COUNT],
        pool,
        EventType::Sw,
        size,
    )?;
    init_test_events(s, REPEAT_COUNT)
}

fn create_sw_events_multi(s: &mut BenchState) -> Result<()> {
    let (pool, size) = (s.sw_pool, s.event_size);
    let num = REPEAT_COUNT * s.burst_size;
    alloc_into(
        &mut s.rt,
        &mut s.event_tbl[..num],
        pool,
        EventType::Sw,
        size,
    )?;
    init_test_events(s, num)
}

fn create_packets(s: &mut BenchState) -> Result<()> {
    let (pool, size) = (s.packet_pool, s.event_size);
    alloc_into(
        &mut s.rt,
        &mut s.event_tbl[..REPEAT_COUNT],
        pool,
        EventType::Packet,
        size,
    )?;
    init_test_events(s, REPEAT_COUNT)
}

fn create_packets_multi(s: &mut BenchState) -> Result<()> {
    let (pool, size) = (s.packet_pool, s.event_size);
    let num = REPEAT_COUNT * s.burst_size;
    alloc_into(
        &mut s.rt,
        &mut s.event_tbl[..num],
        pool,
        EventType::Packet,
        size,
    )?;
    init_test_events(s, num)
}

fn create_vectors(s: &mut BenchState) -> Result<()> {
    let (pool, size) = (s.vector_pool, s.vector_size as u32);
    alloc_into(
        &mut s.rt,
        &mut s.event_tbl[..REPEAT_COUNT],
        pool,
        EventType::Vector,
        size,
    )?;
    init_test_events(s, REPEAT_COUNT)
}

fn create_vectors_multi(s: &mut BenchState) -> Result<()> {
    let (pool, size) = (s.vector_pool, s.vector_size as u32);
    let num = REPEAT_COUNT * s.burst_size;
    alloc_into(
        &mut s.rt,
        &mut s.event_tbl[..num],
        pool,
        EventType::Vector,
        size,
    )?;
    init_test_events(s, num)
}

fn create_send_unsched_events(s: &mut BenchState) -> Result<()> {
    create_sw_events(s)?;
    if unsched_send(s) == 0 {
        bail!("priming the unscheduled queue failed");
    }
    Ok(())
}

fn create_send_unsched_events_multi(s: &mut BenchState) -> Result<()> {
    create_sw_events_multi(s)?;
    if unsched_send_multi(s) == 0 {
        bail!("priming the unscheduled queue failed");
    }
    Ok(())
}

// --- fixture teardown -----------------------------------------------------

fn free_events(s: &mut BenchState) {
    free_tbl(&mut s.rt, &mut s.event_tbl[..REPEAT_COUNT]);
}

fn free_events_multi(s: &mut BenchState) {
    let num = REPEAT_COUNT * s.burst_size;
    free_tbl(&mut s.rt, &mut s.event_tbl[..num]);
}

fn free_vectors(s: &mut BenchState) {
    // Restore the declared size after the event_vector_size_set entry.
    for i in 0..REPEAT_COUNT {
        if let Some(ev) = s.event_tbl[i] {
            s.rt.vector_size_set(ev, 0);
        }
    }
    free_events(s);
}

fn free_clone_events(s: &mut BenchState) {
    free_tbl(&mut s.rt, &mut s.event_tbl[..REPEAT_COUNT]);
    free_tbl(&mut s.rt, &mut s.event2_tbl[..REPEAT_COUNT]);
}

fn unsched_dequeue_free(s: &mut BenchState) {
    let _ = unsched_dequeue(s);
    free_events(s);
}

fn unsched_dequeue_free_multi(s: &mut BenchState) {
    let _ = unsched_dequeue_multi(s);
    free_events_multi(s);
}

// --- measured operations --------------------------------------------------

fn alloc_repeat(s: &mut BenchState, pool: PoolId, ty: EventType, size: u32) -> u64 {
    for i in 0..REPEAT_COUNT {
        s.event_tbl[i] = s.rt.alloc(pool, size, ty);
    }
    REPEAT_COUNT as u64
}

fn event_sw_alloc(s: &mut BenchState) -> u64 {
    let (pool, size) = (s.sw_pool, s.event_size);
    alloc_repeat(s, pool, EventType::Sw, size)
}

fn event_pkt_alloc(s: &mut BenchState) -> u64 {
    let (pool, size) = (s.packet_pool, s.event_size);
    alloc_repeat(s, pool, EventType::Packet, size)
}

fn event_vector_alloc(s: &mut BenchState) -> u64 {
    let (pool, size) = (s.vector_pool, s.vector_size as u32);
    alloc_repeat(s, pool, EventType::Vector, size)
}

fn alloc_multi_repeat(s: &mut BenchState, pool: PoolId, ty: EventType, size: u32) -> u64 {
    let burst = s.burst_size;
    let mut num = 0;
    for i in 0..REPEAT_COUNT {
        let tbl = &mut s.event_tbl[i * burst..(i + 1) * burst];
        num += s.rt.alloc_multi(pool, size, ty, tbl) as u64;
    }
    num
}

fn event_sw_alloc_multi(s: &mut BenchState) -> u64 {
    let (pool, size) = (s.sw_pool, s.event_size);
    alloc_multi_repeat(s, pool, EventType::Sw, size)
}

fn event_pkt_alloc_multi(s: &mut BenchState) -> u64 {
    let (pool, size) = (s.packet_pool, s.event_size);
    alloc_multi_repeat(s, pool, EventType::Packet, size)
}

fn event_vector_alloc_multi(s: &mut BenchState) -> u64 {
    let (pool, size) = (s.vector_pool, s.vector_size as u32);
    alloc_multi_repeat(s, pool, EventType::Vector, size)
}

fn event_free(s: &mut BenchState) -> u64 {
    for i in 0..REPEAT_COUNT {
        let Some(ev) = s.event_tbl[i].take() else {
            return 0;
        };
        s.rt.free(ev);
    }
    REPEAT_COUNT as u64
}

fn event_free_multi(s: &mut BenchState) -> u64 {
    let burst = s.burst_size;
    for i in 0..REPEAT_COUNT {
        let tbl = &mut s.event_tbl[i * burst..(i + 1) * burst];
        if s.rt.free_multi(tbl) != burst {
            return 0;
        }
    }
    REPEAT_COUNT as u64
}

fn event_vector_free(s: &mut BenchState) -> u64 {
    for i in 0..REPEAT_COUNT {
        let Some(ev) = s.event_tbl[i].take() else {
            return 0;
        };
        s.rt.vector_free(ev);
    }
    REPEAT_COUNT as u64
}

fn alloc_free_repeat(s: &mut BenchState, pool: PoolId, ty: EventType, size: u32) -> u64 {
    for _ in 0..REPEAT_COUNT {
        if let Some(ev) = s.rt.alloc(pool, size, ty) {
            s.rt.free(ev);
        }
    }
    REPEAT_COUNT as u64
}

fn event_sw_alloc_free(s: &mut BenchState) -> u64 {
    let (pool, size) = (s.sw_pool, s.event_size);
    alloc_free_repeat(s, pool, EventType::Sw, size)
}

fn event_pkt_alloc_free(s: &mut BenchState) -> u64 {
    let (pool, size) = (s.packet_pool, s.event_size);
    alloc_free_repeat(s, pool, EventType::Packet, size)
}

fn event_vector_alloc_free(s: &mut BenchState) -> u64 {
    let (pool, size) = (s.vector_pool, s.vector_size as u32);
    alloc_free_repeat(s, pool, EventType::Vector, size)
}

fn alloc_free_multi_repeat(s: &mut BenchState, pool: PoolId, ty: EventType, size: u32) -> u64 {
    let burst = s.burst_size;
    for _ in 0..REPEAT_COUNT {
        let tbl = &mut s.event_tbl[..burst];
        let num = s.rt.alloc_multi(pool, size, ty, tbl);
        if num > 0 {
            s.rt.free_multi(&mut s.event_tbl[..num]);
        }
    }
    REPEAT_COUNT as u64
}

fn event_sw_alloc_free_multi(s: &mut BenchState) -> u64 {
    let (pool, size) = (s.sw_pool, s.event_size);
    alloc_free_multi_repeat(s, pool, EventType::Sw, size)
}

fn event_pkt_alloc_free_multi(s: &mut BenchState) -> u64 {
    let (pool, size) = (s.packet_pool, s.event_size);
    alloc_free_multi_repeat(s, pool, EventType::Packet, size)
}

fn event_vector_alloc_free_multi(s: &mut BenchState) -> u64 {
    let (pool, size) = (s.vector_pool, s.vector_size as u32);
    alloc_free_multi_repeat(s, pool, EventType::Vector, size)
}

fn unsched_send(s: &mut BenchState) -> u64 {
    let queue = s.unsched_queue;
    for i in 0..REPEAT_COUNT {
        let Some(ev) = s.event_tbl[i] else {
            return 0;
        };
        if s.rt.send(ev, queue).is_err() {
            return 0;
        }
    }
    REPEAT_COUNT as u64
}

fn unsched_send_multi(s: &mut BenchState) -> u64 {
    let queue = s.unsched_queue;
    let burst = s.burst_size;
    let mut num = 0;
    for i in 0..REPEAT_COUNT {
        num += s.rt.send_multi(&s.event_tbl[i * burst..(i + 1) * burst], queue) as u64;
    }
    if num != (burst * REPEAT_COUNT) as u64 {
        return 0;
    }
    num
}

fn unsched_dequeue(s: &mut BenchState) -> u64 {
    let queue = s.unsched_queue;
    for i in 0..REPEAT_COUNT {
        s.event_tbl[i] = s.rt.dequeue(queue);
        if s.event_tbl[i].is_none() {
            return 0;
        }
    }
    REPEAT_COUNT as u64
}

fn unsched_dequeue_multi(s: &mut BenchState) -> u64 {
    let queue = s.unsched_queue;
    let burst = s.burst_size;
    let mut num = 0;
    for i in 0..REPEAT_COUNT {
        let tbl = &mut s.event_tbl[i * burst..(i + 1) * burst];
        num += s.rt.dequeue_multi(queue, tbl) as u64;
    }
    if num != (burst * REPEAT_COUNT) as u64 {
        return 0;
    }
    num
}

fn unsched_send_dequeue(s: &mut BenchState) -> u64 {
    let queue = s.unsched_queue;
    for i in 0..REPEAT_COUNT {
        let Some(ev) = s.event_tbl[i] else {
            return 0;
        };
        if s.rt.send(ev, queue).is_err() {
            return 0;
        }
        s.event_tbl[i] = s.rt.dequeue(queue);
        if s.event_tbl[i].is_none() {
            return 0;
        }
    }
    REPEAT_COUNT as u64
}

fn unsched_send_dequeue_multi(s: &mut BenchState) -> u64 {
    let queue = s.unsched_queue;
    let burst = s.burst_size;
    let mut num_sent = 0;
    let mut num_deq = 0;
    for i in 0..REPEAT_COUNT {
        num_sent += s.rt.send_multi(&s.event_tbl[i * burst..(i + 1) * burst], queue);
        let tbl = &mut s.event_tbl[i * burst..(i + 1) * burst];
        num_deq += s.rt.dequeue_multi(queue, tbl);
    }
    if num_sent != burst * REPEAT_COUNT || num_deq != burst * REPEAT_COUNT {
        return 0;
    }
    num_deq as u64
}

fn event_clone(s: &mut BenchState) -> u64 {
    for i in 0..REPEAT_COUNT {
        let Some(ev) = s.event_tbl[i] else {
            return 0;
        };
        s.event2_tbl[i] = s.rt.event_clone(ev, None);
    }
    REPEAT_COUNT as u64
}

fn event_has_ref(s: &mut BenchState) -> u64 {
    let mut refs = 0;
    for i in 0..REPEAT_COUNT {
        let Some(ev) = s.event_tbl[i] else {
            return 0;
        };
        refs += u64::from(s.rt.has_ref(ev));
    }
    u64::from(refs == 0)
}

fn event_ref(s: &mut BenchState) -> u64 {
    for i in 0..REPEAT_COUNT {
        let Some(ev) = s.event_tbl[i] else {
            return 0;
        };
        s.event2_tbl[i] = Some(s.rt.event_ref(ev));
    }
    REPEAT_COUNT as u64
}

fn event_payload(s: &mut BenchState) -> u64 {
    for i in 0..REPEAT_COUNT {
        let Some(ev) = s.event_tbl[i] else {
            return 0;
        };
        s.addr_tbl[i] = s.rt.payload(ev).as_ptr() as usize;
    }
    REPEAT_COUNT as u64
}

fn event_uarea_get(s: &mut BenchState) -> u64 {
    for i in 0..REPEAT_COUNT {
        let Some(ev) = s.event_tbl[i] else {
            return 0;
        };
        s.addr_tbl[i] = s.rt.uarea(ev).as_ptr() as usize;
    }
    REPEAT_COUNT as u64
}

fn event_uarea_get_size(s: &mut BenchState) -> u64 {
    let mut size = 0;
    for i in 0..REPEAT_COUNT {
        let Some(ev) = s.event_tbl[i] else {
            return 0;
        };
        let uarea = s.rt.uarea(ev);
        s.addr_tbl[i] = uarea.as_ptr() as usize;
        size = uarea.len();
    }
    size as u64
}

fn event_uarea_id_get(s: &mut BenchState) -> u64 {
    let mut set = 0;
    for i in 0..REPEAT_COUNT {
        let Some(ev) = s.event_tbl[i] else {
            return 0;
        };
        if let Some(id) = s.rt.uarea_id(ev) {
            s.u16_tbl[i] = id;
            set += 1;
        }
    }
    set
}

fn event_uarea_id_set(s: &mut BenchState) -> u64 {
    for i in 0..REPEAT_COUNT {
        let Some(ev) = s.event_tbl[i] else {
            return 0;
        };
        s.rt.uarea_id_set(ev, i as u16);
    }
    REPEAT_COUNT as u64
}

fn event_uarea_info(s: &mut BenchState) -> u64 {
    for i in 0..REPEAT_COUNT {
        let Some(ev) = s.event_tbl[i] else {
            return 0;
        };
        black_box(s.rt.uarea_info(ev));
    }
    REPEAT_COUNT as u64
}

fn event_get_size(s: &mut BenchState) -> u64 {
    for i in 0..REPEAT_COUNT {
        let Some(ev) = s.event_tbl[i] else {
            return 0;
        };
        s.u32_tbl[i] = s.rt.event_size(ev);
    }
    REPEAT_COUNT as u64
}

fn event_get_type(s: &mut BenchState) -> u64 {
    for i in 0..REPEAT_COUNT {
        let Some(ev) = s.event_tbl[i] else {
            return 0;
        };
        s.type_tbl[i] = s.rt.event_type(ev);
    }
    REPEAT_COUNT as u64
}

fn event_get_type_multi(s: &mut BenchState) -> u64 {
    let burst = s.burst_size;
    let mut num = 0;
    for i in 0..REPEAT_COUNT {
        num += s.rt.event_type_multi(
            &s.event_tbl[i * burst..(i + 1) * burst],
            &mut s.type_tbl[i * burst..(i + 1) * burst],
        ) as u64;
    }
    num
}

fn event_same_type_multi(s: &mut BenchState) -> u64 {
    let burst = s.burst_size;
    let mut num = 0;
    for i in 0..REPEAT_COUNT {
        match s.rt.same_type_multi(&s.event_tbl[i * burst..(i + 1) * burst]) {
            Some((ty, n)) => {
                s.type_tbl[i] = ty;
                num += n as u64;
            }
            None => return 0,
        }
    }
    num
}

fn event_set_type(s: &mut BenchState) -> u64 {
    for i in 0..REPEAT_COUNT {
        let Some(ev) = s.event_tbl[i] else {
            return 0;
        };
        s.rt.set_event_type(ev, EventType::Sw);
    }
    REPEAT_COUNT as u64
}

fn event_get_pool(s: &mut BenchState) -> u64 {
    for i in 0..REPEAT_COUNT {
        let Some(ev) = s.event_tbl[i] else {
            return 0;
        };
        s.pool_tbl[i] = Some(s.rt.event_pool(ev));
    }
    REPEAT_COUNT as u64
}

fn event_vector_tbl(s: &mut BenchState) -> u64 {
    let mut entries = 0;
    for i in 0..REPEAT_COUNT {
        let Some(ev) = s.event_tbl[i] else {
            return 0;
        };
        entries += s.rt.vector_tbl(ev).len() as u64;
    }
    // Fresh test vectors are empty.
    u64::from(entries == 0)
}

fn event_vector_size(s: &mut BenchState) -> u64 {
    let mut entries = 0;
    for i in 0..REPEAT_COUNT {
        let Some(ev) = s.event_tbl[i] else {
            return 0;
        };
        entries += s.rt.vector_size(ev) as u64;
    }
    u64::from(entries == 0)
}

fn event_vector_max_size(s: &mut BenchState) -> u64 {
    let mut capacity = 0;
    for i in 0..REPEAT_COUNT {
        let Some(ev) = s.event_tbl[i] else {
            return 0;
        };
        capacity += s.rt.vector_max_size(ev) as u64;
    }
    capacity
}

fn event_vector_size_set(s: &mut BenchState) -> u64 {
    for i in 0..REPEAT_COUNT {
        let Some(ev) = s.event_tbl[i] else {
            return 0;
        };
        // Declares entries that were never packed; free_vectors resets it.
        s.rt.vector_size_set(ev, 1);
    }
    REPEAT_COUNT as u64
}

fn event_vector_info(s: &mut BenchState) -> u64 {
    for i in 0..REPEAT_COUNT {
        let Some(ev) = s.event_tbl[i] else {
            return 0;
        };
        black_box(s.rt.vector_info(ev));
    }
    REPEAT_COUNT as u64
}

/// The benchmark catalog, in declaration order.
pub fn suite() -> Vec<BenchInfo<BenchState>> {
    vec![
        BenchInfo::new("event_sw_alloc", event_sw_alloc)
            .term(free_events)
            .desc("event_alloc(sw)"),
        BenchInfo::new("event_pkt_alloc", event_pkt_alloc)
            .term(free_events)
            .desc("event_alloc(pkt)"),
        BenchInfo::new("event_vector_alloc", event_vector_alloc)
            .term(free_events)
            .desc("event_alloc(vect)"),
        BenchInfo::new("event_sw_alloc_multi", event_sw_alloc_multi)
            .term(free_events_multi)
            .desc("event_alloc_multi(sw)"),
        BenchInfo::new("event_pkt_alloc_multi", event_pkt_alloc_multi)
            .term(free_events_multi)
            .desc("event_alloc_multi(pkt)"),
        BenchInfo::new("event_vector_alloc_multi", event_vector_alloc_multi)
            .term(free_events_multi)
            .desc("event_alloc_multi(vect)"),
        BenchInfo::new("event_free", event_free)
            .init(create_sw_events)
            .desc("event_free(sw)"),
        BenchInfo::new("event_free", event_free)
            .init(create_packets)
            .desc("event_free(pkt)"),
        BenchInfo::new("event_free", event_free)
            .init(create_vectors)
            .desc("event_free(vect)"),
        BenchInfo::new("event_free_multi", event_free_multi)
            .init(create_sw_events_multi)
            .desc("event_free_multi(sw)"),
        BenchInfo::new("event_free_multi", event_free_multi)
            .init(create_packets_multi)
            .desc("event_free_multi(pkt)"),
        BenchInfo::new("event_free_multi", event_free_multi)
            .init(create_vectors_multi)
            .desc("event_free_multi(vect)"),
        BenchInfo::new("event_vector_free", event_vector_free).init(create_vectors),
        BenchInfo::new("event_sw_alloc_free", event_sw_alloc_free)
            .desc("event_alloc_free(sw)"),
        BenchInfo::new("event_pkt_alloc_free", event_pkt_alloc_free)
            .desc("event_alloc_free(pkt)"),
        BenchInfo::new("event_vector_alloc_free", event_vector_alloc_free)
            .desc("event_alloc_free(vect)"),
        BenchInfo::new("event_sw_alloc_free_multi", event_sw_alloc_free_multi)
            .desc("event_alloc_free_multi(sw)"),
        BenchInfo::new("event_pkt_alloc_free_multi", event_pkt_alloc_free_multi)
            .desc("event_alloc_free_multi(pkt)"),
        BenchInfo::new("event_vector_alloc_free_multi", event_vector_alloc_free_multi)
            .desc("event_alloc_free_multi(vect)"),
        BenchInfo::new("unsched_send", unsched_send)
            .init(create_sw_events)
            .term(unsched_dequeue_free)
            .desc("event_send(unsched-q)"),
        BenchInfo::new("unsched_send_multi", unsched_send_multi)
            .init(create_sw_events_multi)
            .term(unsched_dequeue_free_multi)
            .desc("event_send_multi(unsched-q)"),
        BenchInfo::new("unsched_dequeue", unsched_dequeue)
            .init(create_send_unsched_events)
            .term(free_events)
            .desc("queue_dequeue(unsched-q)"),
        BenchInfo::new("unsched_dequeue_multi", unsched_dequeue_multi)
            .init(create_send_unsched_events_multi)
            .term(free_events_multi)
            .desc("queue_dequeue_multi(unsched-q)"),
        BenchInfo::new("unsched_send_dequeue", unsched_send_dequeue)
            .init(create_sw_events)
            .term(free_events)
            .desc("event_send_dequeue(unsched-q)"),
        BenchInfo::new("unsched_send_dequeue_multi", unsched_send_dequeue_multi)
            .init(create_sw_events_multi)
            .term(free_events_multi)
            .desc("event_send_dequeue_multi(unsched-q)"),
        BenchInfo::new("event_clone", event_clone)
            .init(create_sw_events)
            .term(free_clone_events)
            .desc("event_clone(sw)"),
        BenchInfo::new("event_clone", event_clone)
            .init(create_packets)
            .term(free_clone_events)
            .desc("event_clone(pkt)"),
        BenchInfo::new("event_has_ref", event_has_ref)
            .init(create_packets)
            .term(free_events)
            .desc("event_has_ref(pkt)"),
        BenchInfo::new("event_ref", event_ref)
            .init(create_packets)
            .term(free_clone_events)
            .desc("event_ref(pkt)"),
        BenchInfo::new("event_payload", event_payload)
            .init(create_sw_events)
            .term(free_events)
            .desc("event_payload(sw)"),
        BenchInfo::new("event_payload", event_payload)
            .init(create_packets)
            .term(free_events)
            .desc("event_payload(pkt)"),
        BenchInfo::new("event_uarea_get", event_uarea_get)
            .init(create_sw_events)
            .term(free_events)
            .desc("event_uarea_get(sw)"),
        BenchInfo::new("event_uarea_get", event_uarea_get)
            .init(create_packets)
            .term(free_events)
            .desc("event_uarea_get(pkt)"),
        BenchInfo::new("event_uarea_get_size", event_uarea_get_size)
            .init(create_sw_events)
            .term(free_events)
            .desc("event_uarea_get(sw, size)"),
        BenchInfo::new("event_uarea_get_size", event_uarea_get_size)
            .init(create_packets)
            .term(free_events)
            .desc("event_uarea_get(pkt, size)"),
        BenchInfo::new("event_uarea_id_get", event_uarea_id_get)
            .init(create_sw_events)
            .term(free_events)
            .desc("event_uarea_id_get(sw)"),
        BenchInfo::new("event_uarea_id_get", event_uarea_id_get)
            .init(create_packets)
            .term(free_events)
            .desc("event_uarea_id_get(pkt)"),
        BenchInfo::new("event_uarea_id_set", event_uarea_id_set)
            .init(create_sw_events)
            .term(free_events)
            .desc("event_uarea_id_set(sw)"),
        BenchInfo::new("event_uarea_id_set", event_uarea_id_set)
            .init(create_packets)
            .term(free_events)
            .desc("event_uarea_id_set(pkt)"),
        BenchInfo::new("event_uarea_info", event_uarea_info)
            .init(create_sw_events)
            .term(free_events)
            .desc("event_uarea_info(sw)"),
        BenchInfo::new("event_uarea_info", event_uarea_info)
            .init(create_packets)
            .term(free_events)
            .desc("event_uarea_info(pkt)"),
        BenchInfo::new("event_get_size", event_get_size)
            .init(create_sw_events)
            .term(free_events)
            .desc("event_get_size(sw)"),
        BenchInfo::new("event_get_size", event_get_size)
            .init(create_packets)
            .term(free_events)
            .desc("event_get_size(pkt)"),
        BenchInfo::new("event_get_type", event_get_type)
            .init(create_sw_events)
            .term(free_events)
            .desc("event_get_type(sw)"),
        BenchInfo::new("event_get_type", event_get_type)
            .init(create_packets)
            .term(free_events)
            .desc("event_get_type(pkt)"),
        BenchInfo::new("event_get_type_multi", event_get_type_multi)
            .init(create_sw_events_multi)
            .term(free_events_multi)
            .desc("event_get_type_multi(sw)"),
        BenchInfo::new("event_get_type_multi", event_get_type_multi)
            .init(create_packets_multi)
            .term(free_events_multi)
            .desc("event_get_type_multi(pkt)"),
        BenchInfo::new("event_same_type_multi", event_same_type_multi)
            .init(create_sw_events_multi)
            .term(free_events_multi)
            .desc("event_same_type_multi(sw)"),
        BenchInfo::new("event_same_type_multi", event_same_type_multi)
            .init(create_packets_multi)
            .term(free_events_multi)
            .desc("event_same_type_multi(pkt)"),
        BenchInfo::new("event_set_type", event_set_type)
            .init(create_sw_events)
            .term(free_events)
            .desc("event_set_type(sw)"),
        BenchInfo::new("event_set_type", event_set_type)
            .init(create_packets)
            .term(free_events)
            .desc("event_set_type(pkt)"),
        BenchInfo::new("event_get_pool", event_get_pool)
            .init(create_sw_events)
            .term(free_events)
            .desc("event_get_pool(sw)"),
        BenchInfo::new("event_get_pool", event_get_pool)
            .init(create_packets)
            .term(free_events)
            .desc("event_get_pool(pkt)"),
        BenchInfo::new("event_vector_tbl", event_vector_tbl)
            .init(create_vectors)
            .term(free_events),
        BenchInfo::new("event_vector_size", event_vector_size)
            .init(create_vectors)
            .term(free_events),
        BenchInfo::new("event_vector_max_size", event_vector_max_size)
            .init(create_vectors)
            .term(free_events),
        BenchInfo::new("event_vector_size_set", event_vector_size_set)
            .init(create_vectors)
            .term(free_vectors),
        BenchInfo::new("event_vector_info", event_vector_info)
            .init(create_vectors)
            .term(free_vectors),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timer::TimingMode;

    fn test_config(burst_size: usize) -> Config {
        Config {
            time: TimingMode::Cycles,
            rounds: 1,
            bench_idx: None,
            burst_size,
            event_size: 64,
            vector_size: 4,
            cache_size: None,
        }
    }

    #[test]
    fn suite_is_complete_and_ordered() {
        let suite = suite();
        assert_eq!(suite.len(), 58);
        assert_eq!(suite[0].label(), "event_alloc(sw)");
        assert_eq!(suite[12].label(), "event_vector_free");
        assert_eq!(suite[57].label(), "event_vector_info");

        let mut labels: Vec<_> = suite.iter().map(|b| b.label()).collect();
        labels.sort_unstable();
        labels.dedup();
        assert_eq!(labels.len(), 58, "catalog labels must be unique");
    }

    #[test]
    fn state_round_trips_through_release() {
        let mut state = BenchState::new(&test_config(2)).unwrap();
        create_sw_events(&mut state).unwrap();
        free_events(&mut state);
        state.release().unwrap();
    }

    #[test]
    fn alloc_fixture_populates_the_table() {
        let mut state = BenchState::new(&test_config(1)).unwrap();
        assert_eq!(event_sw_alloc(&mut state), REPEAT_COUNT as u64);
        assert!(state.event_tbl[..REPEAT_COUNT].iter().all(Option::is_some));
        free_events(&mut state);
        assert_eq!(state.rt.pool_available(state.sw_pool), 2 * REPEAT_COUNT);
    }

    #[test]
    fn multi_fixture_accounts_for_every_primitive_call() {
        let burst = 8;
        let mut state = BenchState::new(&test_config(burst)).unwrap();
        // One measured invocation performs burst_size allocations per repeat.
        assert_eq!(
            event_sw_alloc_multi(&mut state),
            (burst * REPEAT_COUNT) as u64
        );
        free_events_multi(&mut state);
        assert_eq!(
            state.rt.pool_available(state.sw_pool),
            burst * REPEAT_COUNT
        );
    }

    #[test]
    fn free_fixture_fails_on_an_unpopulated_table() {
        let mut state = BenchState::new(&test_config(1)).unwrap();
        assert_eq!(event_free(&mut state), 0);
    }

    #[test]
    fn send_then_dequeue_preserves_the_working_set() {
        let mut state = BenchState::new(&test_config(2)).unwrap();
        create_sw_events(&mut state).unwrap();
        assert_eq!(unsched_send(&mut state), REPEAT_COUNT as u64);
        assert_eq!(state.rt.queue_len(state.unsched_queue), REPEAT_COUNT);
        assert_eq!(unsched_dequeue(&mut state), REPEAT_COUNT as u64);
        assert_eq!(state.rt.queue_len(state.unsched_queue), 0);
        free_events(&mut state);
        state.release().unwrap();
    }

    #[test]
    fn dequeue_from_an_empty_queue_is_a_failure() {
        let mut state = BenchState::new(&test_config(1)).unwrap();
        assert_eq!(unsched_dequeue(&mut state), 0);
    }

    #[test]
    fn clone_and_ref_teardown_returns_everything() {
        let mut state = BenchState::new(&test_config(1)).unwrap();
        create_packets(&mut state).unwrap();
        assert_eq!(event_ref(&mut state), REPEAT_COUNT as u64);
        free_clone_events(&mut state);
        assert_eq!(
            state.rt.pool_available(state.packet_pool),
            2 * REPEAT_COUNT
        );

        create_packets(&mut state).unwrap();
        assert_eq!(event_clone(&mut state), REPEAT_COUNT as u64);
        free_clone_events(&mut state);
        assert_eq!(
            state.rt.pool_available(state.packet_pool),
            2 * REPEAT_COUNT
        );
    }

    #[test]
    fn has_ref_sees_fresh_events_as_unreferenced() {
        let mut state = BenchState::new(&test_config(1)).unwrap();
        create_packets(&mut state).unwrap();
        assert_eq!(event_has_ref(&mut state), 1);
        free_events(&mut state);
    }

    #[test]
    fn vector_fixtures_round_trip() {
        let mut state = BenchState::new(&test_config(1)).unwrap();
        create_vectors(&mut state).unwrap();
        assert_eq!(event_vector_tbl(&mut state), 1);
        assert_eq!(event_vector_size(&mut state), 1);
        assert_eq!(
            event_vector_max_size(&mut state),
            (4 * REPEAT_COUNT) as u64
        );
        assert_eq!(event_vector_size_set(&mut state), REPEAT_COUNT as u64);
        // Declared sizes are now nonzero until the teardown resets them.
        assert_eq!(event_vector_size(&mut state), 0);
        free_vectors(&mut state);
        state.release().unwrap();
    }

    #[test]
    fn retry_ceiling_escalates_to_a_fixture_error() {
        let mut state = BenchState::new(&test_config(1)).unwrap();
        // Occupy the whole sw pool so further setup cannot make progress.
        let total = state.rt.pool_available(state.sw_pool);
        let mut hoard = vec![None; total];
        let (pool, size) = (state.sw_pool, state.event_size);
        assert_eq!(
            state
                .rt
                .alloc_multi(pool, size, EventType::Sw, &mut hoard),
            total
        );

        let err = create_sw_events(&mut state).unwrap_err();
        assert!(err.to_string().contains("retries"));

        state.rt.free_multi(&mut hoard);
        state.release().unwrap();
    }

    #[test]
    fn uarea_fixtures_see_the_tagged_ids() {
        let mut state = BenchState::new(&test_config(1)).unwrap();
        create_sw_events(&mut state).unwrap();
        assert_eq!(event_uarea_id_get(&mut state), REPEAT_COUNT as u64);
        assert_eq!(event_uarea_get_size(&mut state), UAREA_SIZE as u64);
        assert_eq!(state.u16_tbl[7], 7);
        free_events(&mut state);
    }
}
