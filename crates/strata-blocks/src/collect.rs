//! World collection through a scoped worker pool.
//!
//! Workers only query a [`BlockSource`]; they never touch an index. Each
//! batch result travels back over a bounded channel tagged with its batch
//! number, and the calling thread reassembles batches in submission order
//! before merging. The merged result is therefore identical to a sequential
//! walk over the same positions, regardless of how batches were scheduled.

use std::thread;
use std::time::Instant;

use crossbeam_channel::bounded;
use rustc_hash::FxHashMap;
use strata_pos::BlockPos;
use tracing::{debug, info};

use crate::error::BlockListError;
use crate::index::BlockListIndex;
use crate::ordered::OrderedBlockIndex;
use crate::state::{BlockSample, BlockState, BlockTag};

/// Default number of positions handed to a worker at once.
pub const DEFAULT_BATCH_SIZE: usize = 256;

/// Default capacity of the task and result channels.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 64;

/// Anything that can report the block at a position.
///
/// `None` means "nothing worth recording here" (air, unloaded, filtered out).
pub trait BlockSource: Sync {
    fn sample(&self, pos: BlockPos) -> Option<BlockSample>;
}

impl<F> BlockSource for F
where
    F: Fn(BlockPos) -> Option<BlockSample> + Sync,
{
    fn sample(&self, pos: BlockPos) -> Option<BlockSample> {
        self(pos)
    }
}

// ---------------------------------------------------------------------------
// MemoryWorld
// ---------------------------------------------------------------------------

/// A sparse in-memory world.
#[derive(Clone, Debug, Default)]
pub struct MemoryWorld {
    blocks: FxHashMap<BlockPos, BlockSample>,
}

impl MemoryWorld {
    pub fn new() -> Self {
        Self::default()
    }

    /// Places `state` at `pos`, returning what was there.
    pub fn set(&mut self, pos: BlockPos, state: BlockState) -> Option<BlockSample> {
        self.blocks.insert(pos, BlockSample::new(state))
    }

    pub fn set_tagged(&mut self, pos: BlockPos, state: BlockState, tag: BlockTag) -> Option<BlockSample> {
        self.blocks.insert(pos, BlockSample::tagged(state, tag))
    }

    pub fn remove(&mut self, pos: BlockPos) -> Option<BlockSample> {
        self.blocks.remove(&pos)
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Occupied positions in unspecified order.
    pub fn positions(&self) -> impl Iterator<Item = BlockPos> + '_ {
        self.blocks.keys().copied()
    }
}

impl BlockSource for MemoryWorld {
    fn sample(&self, pos: BlockPos) -> Option<BlockSample> {
        self.blocks.get(&pos).cloned()
    }
}

// ---------------------------------------------------------------------------
// Collector
// ---------------------------------------------------------------------------

/// Samples a [`BlockSource`] over many positions with a pool of threads.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Collector {
    threads: usize,
    batch_size: usize,
    channel_capacity: usize,
}

impl Default for Collector {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl Collector {
    /// Creates a collector.
    ///
    /// `threads == 0` uses one thread per logical CPU. Batch size and channel
    /// capacity are raised to at least 1.
    pub fn new(threads: usize, batch_size: usize, channel_capacity: usize) -> Self {
        let threads = if threads == 0 { num_cpus::get() } else { threads };
        Self {
            threads,
            batch_size: batch_size.max(1),
            channel_capacity: channel_capacity.max(1),
        }
    }

    /// One thread per logical CPU with default batching.
    pub fn with_defaults() -> Self {
        Self::new(0, DEFAULT_BATCH_SIZE, DEFAULT_CHANNEL_CAPACITY)
    }

    pub fn threads(&self) -> usize {
        self.threads
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    pub fn channel_capacity(&self) -> usize {
        self.channel_capacity
    }

    /// Samples every position, returning the non-empty results in input order.
    ///
    /// Runs inline when there is a single thread or a single batch.
    pub fn sample_all<S>(&self, source: &S, positions: &[BlockPos]) -> Result<Vec<(BlockPos, BlockSample)>, BlockListError>
    where
        S: BlockSource + ?Sized,
    {
        let batches: Vec<&[BlockPos]> = positions.chunks(self.batch_size).collect();
        if self.threads <= 1 || batches.len() <= 1 {
            return Ok(sample_batch(source, positions));
        }

        let batch_count = batches.len();
        let workers = self.threads.min(batch_count);
        let (task_tx, task_rx) = bounded::<(usize, &[BlockPos])>(self.channel_capacity);
        let (result_tx, result_rx) = bounded::<(usize, Vec<(BlockPos, BlockSample)>)>(self.channel_capacity);

        thread::scope(|scope| -> Result<_, BlockListError> {
            for i in 0..workers {
                let tasks = task_rx.clone();
                let results = result_tx.clone();
                thread::Builder::new()
                    .name(format!("block-sampler-{i}"))
                    .spawn_scoped(scope, move || {
                        for (batch, slice) in tasks {
                            if results.send((batch, sample_batch(source, slice))).is_err() {
                                break;
                            }
                        }
                    })?;
            }
            drop(task_rx);
            drop(result_tx);

            thread::Builder::new()
                .name("block-feeder".into())
                .spawn_scoped(scope, move || {
                    for task in batches.into_iter().enumerate() {
                        if task_tx.send(task).is_err() {
                            break;
                        }
                    }
                })?;

            let mut ordered: Vec<Option<Vec<(BlockPos, BlockSample)>>> = (0..batch_count).map(|_| None).collect();
            for (batch, samples) in result_rx {
                ordered[batch] = Some(samples);
            }
            debug!(workers, batches = batch_count, "sampling finished");
            Ok(ordered.into_iter().flatten().flatten().collect())
        })
    }

    /// Collects the state at every position that has one.
    pub fn collect_states<S>(&self, source: &S, positions: &[BlockPos]) -> Result<FxHashMap<BlockPos, BlockState>, BlockListError>
    where
        S: BlockSource + ?Sized,
    {
        let start = Instant::now();
        let states: FxHashMap<_, _> = self
            .sample_all(source, positions)?
            .into_iter()
            .map(|(pos, sample)| (pos, sample.state))
            .collect();
        info!(
            queried = positions.len(),
            found = states.len(),
            elapsed_us = start.elapsed().as_micros() as u64,
            "collected block states"
        );
        Ok(states)
    }

    /// Collects positions grouped by state, keeping each group's latest tag.
    pub fn collect_index<S>(&self, source: &S, positions: &[BlockPos]) -> Result<BlockListIndex, BlockListError>
    where
        S: BlockSource + ?Sized,
    {
        let start = Instant::now();
        let mut index = BlockListIndex::new();
        for (pos, sample) in self.sample_all(source, positions)? {
            index.put_tagged(&sample.state, sample.tag, pos);
        }
        info!(
            queried = positions.len(),
            found = index.position_count(),
            groups = index.len(),
            elapsed_us = start.elapsed().as_micros() as u64,
            "collected block index"
        );
        Ok(index)
    }

    /// Collects positions in input order.
    pub fn collect_ordered<S>(&self, source: &S, positions: &[BlockPos]) -> Result<OrderedBlockIndex, BlockListError>
    where
        S: BlockSource + ?Sized,
    {
        let start = Instant::now();
        let samples = self.sample_all(source, positions)?;
        let mut ordered = OrderedBlockIndex::with_capacity(samples.len());
        for (pos, sample) in samples {
            ordered.put_tagged(&sample.state, sample.tag, pos);
        }
        info!(
            queried = positions.len(),
            found = ordered.len(),
            palette = ordered.palette_len(),
            elapsed_us = start.elapsed().as_micros() as u64,
            "collected ordered blocks"
        );
        Ok(ordered)
    }
}

fn sample_batch<S>(source: &S, positions: &[BlockPos]) -> Vec<(BlockPos, BlockSample)>
where
    S: BlockSource + ?Sized,
{
    positions
        .iter()
        .filter_map(|&pos| source.sample(pos).map(|sample| (pos, sample)))
        .collect()
}
