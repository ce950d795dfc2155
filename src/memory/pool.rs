use std::fmt;

use thiserror::Error;

/// Lifetime class of a pooled allocation.
///
/// Every allocation belongs to exactly one bucket, and a whole bucket can be
/// released at once with [`Pool::release_all`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Bucket {
    /// Values owned by a variable slot. Released one by one when the slot is
    /// overwritten or its table is destroyed.
    Persistent,
    /// Intermediate results of the statement currently being evaluated.
    /// Released in bulk once the statement is finished.
    Scratch,
}

impl Bucket {
    const COUNT: usize = 2;

    const fn index(self) -> usize {
        match self {
            Self::Persistent => 0,
            Self::Scratch => 1,
        }
    }
}

impl fmt::Display for Bucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Persistent => write!(f, "persistent"),
            Self::Scratch => write!(f, "scratch"),
        }
    }
}

/// A reference to a pooled value.
///
/// Handles are plain copyable indices. The generation counter makes a handle
/// that outlived its allocation detectable: using or releasing it again is
/// reported as a [`PoolError`] instead of touching whatever reuses the slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Handle {
    index:      usize,
    generation: u32,
    bucket:     Bucket,
}

impl Handle {
    /// The bucket this handle was allocated in.
    #[must_use]
    pub const fn bucket(&self) -> Bucket {
        self.bucket
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}@{} ({})", self.index, self.generation, self.bucket)
    }
}

/// Guard check failures reported by the pool.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PoolError {
    /// The handle's allocation was already released (double release or use
    /// after release).
    #[error("stale handle {0}: the value was already released")]
    Stale(Handle),
    /// The handle was presented together with a bucket it does not belong to.
    #[error("handle {handle} does not belong to the {expected} bucket")]
    WrongBucket {
        /// The offending handle.
        handle:   Handle,
        /// The bucket the caller claimed.
        expected: Bucket,
    },
}

enum Slot<T> {
    Vacant { generation: u32 },
    Occupied {
        generation: u32,
        bucket:     Bucket,
        /// Position of this slot inside its bucket's member list.
        position:   usize,
        value:      T,
    },
}

impl<T> Slot<T> {
    const fn generation(&self) -> u32 {
        match self {
            Self::Vacant { generation } | Self::Occupied { generation, .. } => *generation,
        }
    }
}

/// A bucketed allocator for values of type `T`.
///
/// Values live in a slot vector; released slots are recycled through a free
/// list with a bumped generation. Each bucket keeps the list of its live slots
/// so that releasing a whole bucket costs time proportional to its size.
///
/// # Example
/// ```
/// use mpcalc::memory::pool::{Bucket, Pool};
///
/// let mut pool = Pool::new();
/// let kept = pool.allocate(Bucket::Persistent, 1);
/// let temp = pool.allocate(Bucket::Scratch, 2);
///
/// assert_eq!(pool.release_all(Bucket::Scratch), 1);
/// assert!(pool.get(temp).is_err());
/// assert_eq!(*pool.get(kept).unwrap(), 1);
/// ```
pub struct Pool<T> {
    slots:       Vec<Slot<T>>,
    free:        Vec<usize>,
    members:     [Vec<usize>; Bucket::COUNT],
    allocations: u64,
}

impl<T> Default for Pool<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Pool<T> {
    /// Creates an empty pool.
    #[must_use]
    pub const fn new() -> Self {
        Self { slots:       Vec::new(),
               free:        Vec::new(),
               members:     [Vec::new(), Vec::new()],
               allocations: 0, }
    }

    /// Stores `value` in `bucket` and returns its handle.
    pub fn allocate(&mut self, bucket: Bucket, value: T) -> Handle {
        let members = &mut self.members[bucket.index()];
        let position = members.len();

        let (index, generation) = if let Some(index) = self.free.pop() {
            let generation = self.slots[index].generation();
            self.slots[index] = Slot::Occupied { generation,
                                                 bucket,
                                                 position,
                                                 value };
            (index, generation)
        } else {
            let index = self.slots.len();
            self.slots.push(Slot::Occupied { generation: 0,
                                             bucket,
                                             position,
                                             value });
            (index, 0)
        };

        members.push(index);
        self.allocations += 1;

        Handle { index,
                 generation,
                 bucket }
    }

    /// Returns the value behind `handle`.
    pub fn get(&self, handle: Handle) -> Result<&T, PoolError> {
        match self.slots.get(handle.index) {
            Some(Slot::Occupied { generation, value, .. }) if *generation == handle.generation => {
                Ok(value)
            },
            _ => Err(PoolError::Stale(handle)),
        }
    }

    /// Releases a single allocation and returns its value.
    ///
    /// Releasing the same handle twice fails with [`PoolError::Stale`] and
    /// leaves the pool untouched.
    pub fn release(&mut self, handle: Handle) -> Result<T, PoolError> {
        let Some(slot) = self.slots.get_mut(handle.index) else {
            return Err(PoolError::Stale(handle));
        };
        match slot {
            Slot::Occupied { generation, bucket, .. } if *generation == handle.generation => {
                if *bucket != handle.bucket {
                    return Err(PoolError::WrongBucket { handle,
                                                        expected: *bucket });
                }
            },
            _ => {
                tracing::warn!(%handle, "rejected release of a stale handle");
                return Err(PoolError::Stale(handle));
            },
        }

        let next = Slot::Vacant { generation: handle.generation.wrapping_add(1) };
        let Slot::Occupied { bucket, position, value, .. } = std::mem::replace(slot, next) else {
            return Err(PoolError::Stale(handle));
        };
        self.free.push(handle.index);
        self.unlink(bucket, position);

        Ok(value)
    }

    /// Releases `handle`, which the caller asserts lives in `bucket`.
    pub fn release_from(&mut self, bucket: Bucket, handle: Handle) -> Result<T, PoolError> {
        if handle.bucket != bucket {
            tracing::warn!(%handle, %bucket, "rejected release against the wrong bucket");
            return Err(PoolError::WrongBucket { handle,
                                                expected: bucket });
        }
        self.release(handle)
    }

    /// Releases every allocation in `bucket` and returns how many there were.
    pub fn release_all(&mut self, bucket: Bucket) -> usize {
        let members = std::mem::take(&mut self.members[bucket.index()]);
        let count = members.len();

        for index in members {
            let generation = self.slots[index].generation();
            self.slots[index] = Slot::Vacant { generation: generation.wrapping_add(1) };
            self.free.push(index);
        }

        tracing::trace!(%bucket, count, "released bucket");
        count
    }

    /// Number of live allocations in `bucket`.
    #[must_use]
    pub fn live(&self, bucket: Bucket) -> usize {
        self.members[bucket.index()].len()
    }

    /// Total number of allocations made over the pool's lifetime.
    #[must_use]
    pub const fn allocations(&self) -> u64 {
        self.allocations
    }

    fn unlink(&mut self, bucket: Bucket, position: usize) {
        let members = &mut self.members[bucket.index()];
        members.swap_remove(position);

        if let Some(&moved) = members.get(position)
           && let Slot::Occupied { position: moved_position, .. } = &mut self.slots[moved]
        {
            *moved_position = position;
        }
    }
}
