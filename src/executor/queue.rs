//! Ordered Batch Queue
//!
//! A binary min-heap whose ordering policy is supplied as a key function rather
//! than baked into the element type. The scheduler instantiates it with
//! [`batch_order_key`]: `(priority rank, submission instant)` ascending.
//!
//! ## Guarantees
//! - `push` and `pop_min` are `O(log n)`.
//! - Elements with equal keys come out in insertion order, so the batches of a
//!   single submission keep their original order.
//! - The queue never touches the elements it stores.

use super::types::Batch;

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::sync::Arc;
use tokio::time::Instant;

/// Ordering key of a queued batch.
pub type BatchOrderKey = (u8, Instant);

/// The queue the scheduler drains.
pub type BatchQueue = OrderedHeap<Arc<Batch>, BatchOrderKey>;

/// Key function for [`BatchQueue`]: lower priority rank first, then earlier submission.
pub fn batch_order_key(batch: &Arc<Batch>) -> BatchOrderKey {
    (batch.priority.rank(), batch.created_at)
}

impl BatchQueue {
    pub fn for_batches() -> Self {
        OrderedHeap::new(batch_order_key)
    }
}

struct HeapEntry<K, T> {
    key: K,
    seq: u64,
    item: T,
}

impl<K: Ord, T> PartialEq for HeapEntry<K, T> {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key && self.seq == other.seq
    }
}

impl<K: Ord, T> Eq for HeapEntry<K, T> {}

impl<K: Ord, T> PartialOrd for HeapEntry<K, T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<K: Ord, T> Ord for HeapEntry<K, T> {
    // Reversed: BinaryHeap is a max-heap, we want the smallest (key, seq) on top.
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .key
            .cmp(&self.key)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// Min-heap ordered by `key_fn(item)`, FIFO among equal keys.
pub struct OrderedHeap<T, K> {
    heap: BinaryHeap<HeapEntry<K, T>>,
    key_fn: fn(&T) -> K,
    next_seq: u64,
}

impl<T, K: Ord> OrderedHeap<T, K> {
    pub fn new(key_fn: fn(&T) -> K) -> Self {
        Self {
            heap: BinaryHeap::new(),
            key_fn,
            next_seq: 0,
        }
    }

    pub fn push(&mut self, item: T) {
        let key = (self.key_fn)(&item);
        let seq = self.next_seq;
        self.next_seq += 1;
        self.heap.push(HeapEntry { key, seq, item });
    }

    /// Removes the element with the smallest key. `None` when empty; never waits.
    pub fn pop_min(&mut self) -> Option<T> {
        self.heap.pop().map(|entry| entry.item)
    }

    pub fn peek_min(&self) -> Option<&T> {
        self.heap.peek().map(|entry| &entry.item)
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}
