use crate::{
    allocator::{Resource, ResourceAllocator},
    descriptor::Descriptor,
    key::PoolKey,
};
use alloc::{collections::BTreeMap, vec::Vec};
use core::{fmt, mem};

/// An idle resource together with the descriptor it was allocated for.
struct Idle<D, R> {
    desc: D,
    resource: R,
}

/// A keyed store of idle resources of one kind.
///
/// Each key maps to a last-in-first-out list, so the most recently released
/// (and most likely cache-hot) resource is handed out first. The pool owns the
/// allocator for its kind and is the only place idle resources are destroyed.
///
/// The pool is a plain key-to-bag store: [`push`](Self::push) does not check
/// that a resource was really shaped like its key.
pub struct ResourcePool<A: ResourceAllocator> {
    allocator: A,
    free: BTreeMap<PoolKey, Vec<Idle<A::Descriptor, A::Resource>>>,
}

impl<A: ResourceAllocator> ResourcePool<A> {
    /// Creates an empty pool around `allocator`.
    pub fn new(allocator: A) -> Self {
        ResourcePool {
            allocator,
            free: BTreeMap::new(),
        }
    }

    /// Borrows the allocator.
    pub fn allocator(&self) -> &A {
        &self.allocator
    }

    /// Mutably borrows the allocator.
    pub fn allocator_mut(&mut self) -> &mut A {
        &mut self.allocator
    }

    /// Kind name of the pooled resources.
    pub fn type_name(&self) -> &'static str {
        A::TYPE_NAME
    }

    /// Removes and returns the most recently pushed idle resource for `key`.
    ///
    /// Returns `None` without side effects if nothing is idle under `key`.
    pub fn pull(&mut self, key: PoolKey) -> Option<A::Resource> {
        self.free
            .get_mut(&key)
            .and_then(Vec::pop)
            .map(|idle| idle.resource)
    }

    /// Like [`Self::pull`], but skips idle resources whose descriptor is not
    /// compatible with `desc`.
    ///
    /// Among the compatible resources the most recently pushed one wins, and
    /// the relative order of the others is kept.
    pub fn pull_matching(&mut self, key: PoolKey, desc: &A::Descriptor) -> Option<A::Resource> {
        let list = self.free.get_mut(&key)?;
        let pos = list.iter().rposition(|idle| idle.desc.is_compatible(desc))?;
        Some(list.remove(pos).resource)
    }

    /// Appends `resource` to the idle list for `key`.
    pub fn push(&mut self, key: PoolKey, desc: A::Descriptor, resource: A::Resource) {
        self.free
            .entry(key)
            .or_default()
            .push(Idle { desc, resource });
    }

    /// Creates a fresh resource through the allocator, bypassing the idle lists.
    pub fn allocate(&mut self, desc: &A::Descriptor) -> Result<A::Resource, A::Error> {
        self.allocator.allocate(desc)
    }

    /// Checks whether the resource with identity `id` is idle under `key`.
    pub fn contains(&self, key: PoolKey, id: <A::Resource as Resource>::Id) -> bool {
        self.free
            .get(&key)
            .is_some_and(|list| list.iter().any(|idle| idle.resource.id() == id))
    }

    /// Releases every idle resource through the allocator and empties the pool.
    ///
    /// Resources currently held by callers are not visited. Returns the number
    /// of resources released. Calling this again on an empty pool does nothing.
    pub fn dispose_all(&mut self) -> usize {
        let mut released = 0;
        for (key, list) in mem::take(&mut self.free) {
            for idle in list {
                log::trace!(
                    "releasing {} {:?} ({}) under key {}",
                    A::TYPE_NAME,
                    idle.resource.id(),
                    idle.resource.name().unwrap_or("unnamed"),
                    key
                );
                self.allocator.release(idle.resource);
                released += 1;
            }
        }
        if released > 0 {
            log::debug!("disposed {} idle {} resources", released, A::TYPE_NAME);
        }
        released
    }

    /// Gets the number of idle resources across all keys.
    pub fn len(&self) -> usize {
        self.free.values().map(Vec::len).sum()
    }

    /// Checks if no resource is idle.
    pub fn is_empty(&self) -> bool {
        self.free.values().all(Vec::is_empty)
    }

    /// Gets the number of idle resources under `key`.
    pub fn idle_count(&self, key: PoolKey) -> usize {
        self.free.get(&key).map_or(0, Vec::len)
    }

    /// Gets the number of keys with at least one idle resource.
    pub fn key_count(&self) -> usize {
        self.free.values().filter(|list| !list.is_empty()).count()
    }
}

/// Dropping the pool disposes whatever is still idle.
impl<A: ResourceAllocator> Drop for ResourcePool<A> {
    fn drop(&mut self) {
        self.dispose_all();
    }
}

impl<A: ResourceAllocator> fmt::Debug for ResourcePool<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourcePool")
            .field("kind", &A::TYPE_NAME)
            .field("keys", &self.key_count())
            .field("idle", &self.len())
            .finish()
    }
}
