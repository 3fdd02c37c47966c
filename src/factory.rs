use crate::{
    allocator::{BufferAllocator, Resource, ResourceAllocator, TextureAllocator},
    descriptor::{BufferDescriptor, Descriptor, TextureDescriptor},
    error::{AllocError, ReleaseError},
    handle::{BufferRef, PoolRef, TextureRef},
    key::PoolKey,
    pool::ResourcePool,
};
use alloc::{collections::BTreeMap, format};
use core::fmt;

/// How a pool key is trusted when pulling idle resources.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum KeyPolicy {
    /// Any resource idle under the key is handed out. Two descriptors whose
    /// keys collide can receive each other's resources.
    HashOnly,
    /// Idle resources are only handed out if the descriptor they were
    /// allocated for is compatible with the requested one. On a collision the
    /// pool is bypassed and a fresh resource is allocated.
    #[default]
    Verified,
}

/// Options for a [`ResourceFactory`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FactoryConfig {
    /// Key trust policy for both pools.
    pub key_policy: KeyPolicy,
}

impl FactoryConfig {
    /// Sets the key trust policy.
    pub fn with_key_policy(mut self, key_policy: KeyPolicy) -> Self {
        self.key_policy = key_policy;
        self
    }
}

/// Counters for one resource kind. They are never cleared by
/// [`ResourceFactory::reset`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PoolStats {
    /// Requests served from an idle list.
    pub hits: u64,
    /// Requests that went to the allocator.
    pub misses: u64,
    /// Resources returned to an idle list.
    pub releases: u64,
}

struct Checkout<D> {
    key: PoolKey,
    desc: D,
}

type CheckoutMap<A> = BTreeMap<
    <<A as ResourceAllocator>::Resource as Resource>::Id,
    Checkout<<A as ResourceAllocator>::Descriptor>,
>;

/// Pool, reverse map and counters for one resource kind.
struct Lane<A: ResourceAllocator> {
    pool: ResourcePool<A>,
    checkouts: CheckoutMap<A>,
    stats: PoolStats,
}

impl<A: ResourceAllocator> Lane<A> {
    fn new(allocator: A) -> Self {
        Lane {
            pool: ResourcePool::new(allocator),
            checkouts: BTreeMap::new(),
            stats: PoolStats::default(),
        }
    }

    /// Pulls an idle resource for `desc` or allocates a fresh one.
    fn acquire(
        &mut self,
        policy: KeyPolicy,
        desc: &A::Descriptor,
    ) -> Result<(PoolKey, A::Resource), AllocError<A::Error>> {
        let key = desc.pool_key();
        let pulled = match policy {
            KeyPolicy::HashOnly => self.pool.pull(key),
            KeyPolicy::Verified => self.pool.pull_matching(key, desc),
        };
        let resource = match pulled {
            Some(resource) => {
                log::trace!("reusing {} {:?} for key {}", A::TYPE_NAME, resource.id(), key);
                self.stats.hits += 1;
                resource
            }
            None => {
                let resource = self
                    .pool
                    .allocate(desc)
                    .map_err(|source| AllocError::Device {
                        kind: A::TYPE_NAME,
                        key,
                        source,
                    })?;
                log::debug!("allocated {} {:?} for key {}", A::TYPE_NAME, resource.id(), key);
                self.stats.misses += 1;
                resource
            }
        };
        Ok((key, resource))
    }

    /// Acquires a resource and records it in the reverse map.
    fn check_out(
        &mut self,
        policy: KeyPolicy,
        desc: &A::Descriptor,
    ) -> Result<A::Resource, AllocError<A::Error>> {
        let (key, resource) = self.acquire(policy, desc)?;
        let checkout = Checkout {
            key,
            desc: desc.clone(),
        };
        if let Some(stale) = self.checkouts.insert(resource.id(), checkout) {
            log::warn!(
                "{} {:?} handed out while already checked out under key {}",
                A::TYPE_NAME,
                resource.id(),
                stale.key
            );
        }
        Ok(resource)
    }

    /// Returns a resource obtained through [`Self::check_out`] to its pool.
    fn check_in(&mut self, resource: A::Resource) -> Result<(), ReleaseError<A::Resource>> {
        let id = resource.id();
        let Some(checkout) = self.checkouts.remove(&id) else {
            log::error!("release of unknown {} {:?}", A::TYPE_NAME, id);
            return Err(ReleaseError::UnknownResource {
                kind: A::TYPE_NAME,
                id: format!("{id:?}"),
                resource,
            });
        };
        self.give_back(checkout.key, checkout.desc, resource);
        Ok(())
    }

    fn give_back(&mut self, key: PoolKey, desc: A::Descriptor, resource: A::Resource) {
        log::trace!("returning {} {:?} to key {}", A::TYPE_NAME, resource.id(), key);
        self.pool.push(key, desc, resource);
        self.stats.releases += 1;
    }

    /// Destroys a resource through the allocator instead of pooling it.
    fn destroy(&mut self, resource: A::Resource) {
        let id = resource.id();
        if self.checkouts.remove(&id).is_some() {
            log::trace!("dropping checkout of {} {:?}", A::TYPE_NAME, id);
        }
        log::debug!("destroying {} {:?}", A::TYPE_NAME, id);
        self.pool.allocator_mut().release(resource);
    }

    /// Forgets every checkout and returns how many were dropped.
    fn reset(&mut self) -> usize {
        let forgotten = self.checkouts.len();
        self.checkouts.clear();
        forgotten
    }

    fn dispose_all(&mut self) {
        if !self.checkouts.is_empty() {
            log::warn!(
                "disposing {} pool with {} resources still checked out",
                A::TYPE_NAME,
                self.checkouts.len()
            );
        }
        self.pool.dispose_all();
    }
}

/// Hands out pooled buffers and textures, allocating only on a miss.
///
/// Two call shapes share one pull-or-allocate path:
///
/// * handle mode: [`pull_buffer`](Self::pull_buffer) returns a [`BufferRef`]
///   carrying its pool key, and [`push_buffer`](Self::push_buffer) takes it
///   back. Nothing is recorded between the two calls.
/// * identity mode: [`allocate_buffer`](Self::allocate_buffer) returns the bare
///   resource and remembers its key by identity until
///   [`release_buffer`](Self::release_buffer).
///
/// Textures have the same pairs. The owner calls [`reset`](Self::reset)
/// between frames and [`dispose_all`](Self::dispose_all) at teardown.
pub struct ResourceFactory<B: BufferAllocator, T: TextureAllocator> {
    config: FactoryConfig,
    buffers: Lane<B>,
    textures: Lane<T>,
}

impl<B: BufferAllocator, T: TextureAllocator> ResourceFactory<B, T> {
    /// Creates a factory with the default [`FactoryConfig`].
    pub fn new(buffers: B, textures: T) -> Self {
        Self::with_config(FactoryConfig::default(), buffers, textures)
    }

    /// Creates a factory with empty pools around the given allocators.
    pub fn with_config(config: FactoryConfig, buffers: B, textures: T) -> Self {
        ResourceFactory {
            config,
            buffers: Lane::new(buffers),
            textures: Lane::new(textures),
        }
    }

    /// Gets the active configuration.
    pub fn config(&self) -> &FactoryConfig {
        &self.config
    }

    /// Pulls or allocates a buffer and returns it with its pool key.
    pub fn pull_buffer(
        &mut self,
        desc: &BufferDescriptor,
    ) -> Result<BufferRef<B::Resource>, AllocError<B::Error>> {
        let (key, buffer) = self.buffers.acquire(self.config.key_policy, desc)?;
        Ok(PoolRef::new(key, desc.clone(), buffer))
    }

    /// Returns a buffer obtained from [`Self::pull_buffer`] to its pool.
    pub fn push_buffer(&mut self, handle: BufferRef<B::Resource>) {
        let (key, desc, buffer) = handle.into_parts();
        self.buffers.give_back(key, desc, buffer);
    }

    /// Pulls or allocates a texture and returns it with its pool key.
    pub fn pull_texture(
        &mut self,
        desc: &TextureDescriptor,
    ) -> Result<TextureRef<T::Resource>, AllocError<T::Error>> {
        let (key, texture) = self.textures.acquire(self.config.key_policy, desc)?;
        Ok(PoolRef::new(key, desc.clone(), texture))
    }

    /// Returns a texture obtained from [`Self::pull_texture`] to its pool.
    pub fn push_texture(&mut self, handle: TextureRef<T::Resource>) {
        let (key, desc, texture) = handle.into_parts();
        self.textures.give_back(key, desc, texture);
    }

    /// Pulls or allocates a buffer and remembers its key until it is released.
    pub fn allocate_buffer(
        &mut self,
        desc: &BufferDescriptor,
    ) -> Result<B::Resource, AllocError<B::Error>> {
        self.buffers.check_out(self.config.key_policy, desc)
    }

    /// Returns a buffer obtained from [`Self::allocate_buffer`] to its pool.
    ///
    /// Fails, handing the buffer back, if it was not checked out through this
    /// factory since the last [`reset`](Self::reset). No pool is touched then.
    pub fn release_buffer(&mut self, buffer: B::Resource) -> Result<(), ReleaseError<B::Resource>> {
        self.buffers.check_in(buffer)
    }

    /// Pulls or allocates a texture and remembers its key until it is released.
    pub fn allocate_texture(
        &mut self,
        desc: &TextureDescriptor,
    ) -> Result<T::Resource, AllocError<T::Error>> {
        self.textures.check_out(self.config.key_policy, desc)
    }

    /// Returns a texture obtained from [`Self::allocate_texture`] to its pool.
    ///
    /// Fails, handing the texture back, if it was not checked out through this
    /// factory since the last [`reset`](Self::reset). No pool is touched then.
    pub fn release_texture(
        &mut self,
        texture: T::Resource,
    ) -> Result<(), ReleaseError<T::Resource>> {
        self.textures.check_in(texture)
    }

    /// Releases a buffer through the buffer allocator without pooling it.
    ///
    /// This is the way out for a buffer [`Self::release_buffer`] rejected,
    /// recovered with [`ReleaseError::into_resource`]. A buffer still checked
    /// out in identity mode is forgotten as well.
    pub fn destroy_buffer(&mut self, buffer: B::Resource) {
        self.buffers.destroy(buffer);
    }

    /// Releases a texture through the texture allocator without pooling it.
    ///
    /// The texture counterpart of [`Self::destroy_buffer`].
    pub fn destroy_texture(&mut self, texture: T::Resource) {
        self.textures.destroy(texture);
    }

    /// Forgets which resources were handed out in identity mode.
    ///
    /// Idle resources stay pooled. Resources still checked out can no longer be
    /// released through this factory; their holder hands them to
    /// [`Self::destroy_buffer`] or [`Self::destroy_texture`] instead.
    pub fn reset(&mut self) {
        let buffers = self.buffers.reset();
        let textures = self.textures.reset();
        if buffers + textures > 0 {
            log::debug!(
                "reset forgot {} buffer and {} texture checkouts",
                buffers,
                textures
            );
        }
    }

    /// Releases every idle buffer and texture through their allocators.
    ///
    /// Resources still checked out are not visited.
    pub fn dispose_all(&mut self) {
        self.buffers.dispose_all();
        self.textures.dispose_all();
    }

    /// Borrows the buffer pool.
    pub fn buffer_pool(&self) -> &ResourcePool<B> {
        &self.buffers.pool
    }

    /// Borrows the texture pool.
    pub fn texture_pool(&self) -> &ResourcePool<T> {
        &self.textures.pool
    }

    /// Counters for buffer requests.
    pub fn buffer_stats(&self) -> PoolStats {
        self.buffers.stats
    }

    /// Counters for texture requests.
    pub fn texture_stats(&self) -> PoolStats {
        self.textures.stats
    }

    /// Number of buffers checked out in identity mode.
    pub fn outstanding_buffers(&self) -> usize {
        self.buffers.checkouts.len()
    }

    /// Number of textures checked out in identity mode.
    pub fn outstanding_textures(&self) -> usize {
        self.textures.checkouts.len()
    }
}

impl<B: BufferAllocator, T: TextureAllocator> fmt::Debug for ResourceFactory<B, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceFactory")
            .field("config", &self.config)
            .field("buffers", &self.buffers.pool)
            .field("textures", &self.textures.pool)
            .field("outstanding_buffers", &self.buffers.checkouts.len())
            .field("outstanding_textures", &self.textures.checkouts.len())
            .finish()
    }
}
