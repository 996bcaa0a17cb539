//! Two-segment LRU buffer cache.
//!
//! Residents are partitioned into a probationary left segment (L) holding
//! buffers accessed once and a protected right segment (R) holding buffers
//! accessed again. First accesses enter the front of L; a re-access moves
//! the buffer to the front of R. When R is full its tail is demoted back to
//! the front of L rather than evicted. Eviction takes the tail of L, falling
//! back to the tail of R when L is empty.
//!
//! Splitting residents this way keeps a one-shot scan from flooding out hot
//! buffers: the scan churns through L while re-accessed buffers sit in R.
//!
//! Each segment is an unbounded [`lru::LruCache`] keyed by sector, which
//! doubles as the sector index: membership is O(1), and front/tail
//! manipulation matches the recency order the policy needs.

use lru::LruCache;

use crate::event::OpKind;

/// One cached disk block. The dirty bit is bookkeeping only; write-back is
/// not simulated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Buffer {
    pub sector: u64,
    pub dirty: bool,
}

/// Segment a buffer lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment {
    Left,
    Right,
}

impl std::fmt::Display for Segment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Left => write!(f, "left"),
            Self::Right => write!(f, "right"),
        }
    }
}

/// What a single [`BufferCache::access`] did, for statistics and tracing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheAccess {
    /// The sector was resident.
    pub hit: bool,
    /// A fresh buffer was allocated (miss with spare capacity).
    pub allocated: bool,
    /// A resident buffer was pushed out to make room, and from where.
    pub evicted: Option<(u64, Segment)>,
    /// R overflowed and this sector moved back to the front of L.
    pub demoted: Option<u64>,
}

/// Buffer cache with the two-segment LRU policy.
#[derive(Debug)]
pub struct BufferCache {
    total_buffers: usize,
    max_right_segment: usize,
    left: LruCache<u64, Buffer>,
    right: LruCache<u64, Buffer>,
}

impl BufferCache {
    /// `total_buffers` bounds L + R; `max_right_segment` bounds R alone and
    /// must be smaller than `total_buffers`.
    pub fn new(total_buffers: usize, max_right_segment: usize) -> Self {
        Self {
            total_buffers,
            max_right_segment,
            left: LruCache::unbounded(),
            right: LruCache::unbounded(),
        }
    }

    pub fn total_buffers(&self) -> usize {
        self.total_buffers
    }

    pub fn max_right_segment(&self) -> usize {
        self.max_right_segment
    }

    /// Resident buffer count across both segments.
    pub fn len(&self) -> usize {
        self.left.len() + self.right.len()
    }

    pub fn is_empty(&self) -> bool {
        self.left.is_empty() && self.right.is_empty()
    }

    pub fn left_len(&self) -> usize {
        self.left.len()
    }

    pub fn right_len(&self) -> usize {
        self.right.len()
    }

    /// Whether a buffer for `sector` is resident.
    pub fn contains(&self, sector: u64) -> bool {
        self.left.contains(&sector) || self.right.contains(&sector)
    }

    /// Resident buffer for `sector`, without touching recency.
    pub fn buffer(&self, sector: u64) -> Option<&Buffer> {
        self.left.peek(&sector).or_else(|| self.right.peek(&sector))
    }

    /// Left-segment sectors, most recent first.
    pub fn left_sectors(&self) -> Vec<u64> {
        self.left.iter().map(|(s, _)| *s).collect()
    }

    /// Right-segment sectors, most recent first.
    pub fn right_sectors(&self) -> Vec<u64> {
        self.right.iter().map(|(s, _)| *s).collect()
    }

    /// Look up `sector`, updating segments per the two-segment policy.
    ///
    /// A hit leaves the resident set unchanged and promotes the buffer to
    /// the front of R. A miss installs a buffer at the front of L, evicting
    /// the tail of L (or of R when L is empty) once the pool is full.
    pub fn access(&mut self, sector: u64, op: OpKind) -> CacheAccess {
        let resident = self
            .left
            .pop(&sector)
            .or_else(|| self.right.pop(&sector));

        let outcome = if let Some(mut buf) = resident {
            if op == OpKind::Write {
                buf.dirty = true;
            }
            let demoted = self.push_right(sector, buf);
            CacheAccess {
                hit: true,
                allocated: false,
                evicted: None,
                demoted,
            }
        } else {
            let mut allocated = false;
            let mut evicted = None;
            if self.len() < self.total_buffers {
                allocated = true;
            } else if let Some((old, _)) = self.left.pop_lru() {
                evicted = Some((old, Segment::Left));
            } else if let Some((old, _)) = self.right.pop_lru() {
                // L is empty: the protected segment has to give a buffer up.
                evicted = Some((old, Segment::Right));
            }
            let buf = Buffer {
                sector,
                dirty: op == OpKind::Write,
            };
            self.left.put(sector, buf);
            CacheAccess {
                hit: false,
                allocated,
                evicted,
                demoted: None,
            }
        };

        debug_assert!(self.right.len() <= self.max_right_segment);
        debug_assert!(self.len() <= self.total_buffers);
        outcome
    }

    /// Insert at the front of R, demoting R's tail to the front of L when R
    /// is at capacity. Returns the demoted sector, if any.
    fn push_right(&mut self, sector: u64, buf: Buffer) -> Option<u64> {
        let mut demoted = None;
        if self.right.len() >= self.max_right_segment {
            if let Some((old, old_buf)) = self.right.pop_lru() {
                self.left.put(old, old_buf);
                demoted = Some(old);
            }
        }
        self.right.put(sector, buf);
        demoted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read(cache: &mut BufferCache, sector: u64) -> CacheAccess {
        cache.access(sector, OpKind::Read)
    }

    // -----------------------------------------------------------------------
    // Hit / miss basics
    // -----------------------------------------------------------------------

    #[test]
    fn test_first_access_misses_into_left() {
        let mut cache = BufferCache::new(4, 2);
        let outcome = read(&mut cache, 100);
        assert!(!outcome.hit);
        assert!(outcome.allocated);
        assert_eq!(outcome.evicted, None);
        assert_eq!(cache.left_sectors(), vec![100]);
        assert!(cache.right_sectors().is_empty());
    }

    #[test]
    fn test_reaccess_hits_and_promotes() {
        let mut cache = BufferCache::new(4, 2);
        read(&mut cache, 100);
        let outcome = read(&mut cache, 100);
        assert!(outcome.hit);
        assert!(cache.left_sectors().is_empty());
        assert_eq!(cache.right_sectors(), vec![100]);
    }

    #[test]
    fn test_hit_idempotence_same_buffer() {
        let mut cache = BufferCache::new(4, 2);
        read(&mut cache, 7);
        let second = read(&mut cache, 7);
        assert!(second.hit);
        // Exactly one resident buffer for the sector, now in R.
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.buffer(7).map(|b| b.sector), Some(7));
    }

    #[test]
    fn test_write_marks_dirty() {
        let mut cache = BufferCache::new(4, 2);
        cache.access(9, OpKind::Write);
        assert!(cache.buffer(9).is_some_and(|b| b.dirty));
        read(&mut cache, 9);
        assert!(cache.buffer(9).is_some_and(|b| b.dirty));
    }

    // -----------------------------------------------------------------------
    // Promotion / demotion
    // -----------------------------------------------------------------------

    #[test]
    fn test_promotion_sequence_a_b_c_a_b() {
        // total=4, right cap=2; access A B C A B leaves R=[B,A], L=[C].
        let (a, b, c) = (1, 2, 3);
        let mut cache = BufferCache::new(4, 2);
        read(&mut cache, a);
        read(&mut cache, b);
        read(&mut cache, c);
        read(&mut cache, a);
        read(&mut cache, b);

        assert_eq!(cache.right_sectors(), vec![b, a]);
        assert_eq!(cache.left_sectors(), vec![c]);
        assert!(cache.contains(a) && cache.contains(b) && cache.contains(c));
        assert_eq!(cache.len(), 3);
    }

    #[test]
    fn test_right_overflow_demotes_to_left_front() {
        let mut cache = BufferCache::new(4, 1);
        read(&mut cache, 1);
        read(&mut cache, 2);
        read(&mut cache, 1); // R=[1]
        let outcome = read(&mut cache, 2); // R full: 1 demoted, R=[2]
        assert!(outcome.hit);
        assert_eq!(outcome.demoted, Some(1));
        assert_eq!(cache.right_sectors(), vec![2]);
        assert_eq!(cache.left_sectors(), vec![1]);
    }

    // -----------------------------------------------------------------------
    // Eviction
    // -----------------------------------------------------------------------

    #[test]
    fn test_eviction_takes_left_tail() {
        let mut cache = BufferCache::new(2, 1);
        read(&mut cache, 1);
        read(&mut cache, 2); // L=[2,1]
        let outcome = read(&mut cache, 3);
        assert_eq!(outcome.evicted, Some((1, Segment::Left)));
        assert_eq!(cache.left_sectors(), vec![3, 2]);
        assert!(!cache.contains(1));
    }

    #[test]
    fn test_eviction_falls_back_to_right_when_left_empty() {
        // Fill the pool, promote everything into R, then miss.
        let mut cache = BufferCache::new(2, 2);
        read(&mut cache, 1);
        read(&mut cache, 2);
        read(&mut cache, 1); // R=[1]
        read(&mut cache, 2); // R=[2,1], L empty
        let outcome = read(&mut cache, 3);
        assert_eq!(outcome.evicted, Some((1, Segment::Right)));
        assert_eq!(cache.left_sectors(), vec![3]);
        assert_eq!(cache.right_sectors(), vec![2]);
    }

    #[test]
    fn test_capacity_never_exceeded() {
        let mut cache = BufferCache::new(3, 1);
        for sector in 0..20 {
            read(&mut cache, sector);
            read(&mut cache, sector / 2);
            assert!(cache.len() <= 3);
            assert!(cache.right_len() <= 1);
        }
    }

    #[test]
    fn test_evicted_sector_leaves_the_index() {
        let mut cache = BufferCache::new(2, 1);
        read(&mut cache, 10);
        read(&mut cache, 11);
        read(&mut cache, 12); // evicts 10
        assert!(!cache.contains(10));
        assert!(cache.buffer(10).is_none());
        // A later access to the evicted sector misses again.
        assert!(!read(&mut cache, 10).hit);
    }
}
