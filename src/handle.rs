use crate::{
    descriptor::{BufferDescriptor, TextureDescriptor},
    key::PoolKey,
};
use core::{
    fmt,
    ops::{Deref, DerefMut},
};

/// A resource checked out in handle mode, paired with the key it returns under.
///
/// Give it back with [`ResourceFactory::push_buffer`] or
/// [`ResourceFactory::push_texture`]. Dropping the handle drops the resource
/// without returning it to the pool.
///
/// [`ResourceFactory::push_buffer`]: crate::ResourceFactory::push_buffer
/// [`ResourceFactory::push_texture`]: crate::ResourceFactory::push_texture
pub struct PoolRef<D, R> {
    key: PoolKey,
    desc: D,
    resource: R,
}

/// A pooled buffer handle.
pub type BufferRef<R> = PoolRef<BufferDescriptor, R>;

/// A pooled texture handle.
pub type TextureRef<R> = PoolRef<TextureDescriptor, R>;

impl<D, R> PoolRef<D, R> {
    pub(crate) fn new(key: PoolKey, desc: D, resource: R) -> Self {
        PoolRef {
            key,
            desc,
            resource,
        }
    }

    pub(crate) fn into_parts(self) -> (PoolKey, D, R) {
        (self.key, self.desc, self.resource)
    }

    /// Key the resource will be pushed back under.
    pub fn key(&self) -> PoolKey {
        self.key
    }

    /// Descriptor the resource was requested with.
    pub fn descriptor(&self) -> &D {
        &self.desc
    }

    /// Consumes the handle and returns the resource, without returning it to
    /// the pool.
    ///
    /// The factory keeps no record of handle-mode resources, so the result can
    /// not be passed to the identity-mode release methods either.
    pub fn into_inner(self) -> R {
        self.resource
    }
}

impl<D, R> Deref for PoolRef<D, R> {
    type Target = R;
    #[inline(always)]
    fn deref(&self) -> &Self::Target {
        &self.resource
    }
}

impl<D, R> DerefMut for PoolRef<D, R> {
    #[inline(always)]
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.resource
    }
}

impl<D, R: fmt::Debug> fmt::Debug for PoolRef<D, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PoolRef")
            .field("key", &self.key)
            .field("resource", &self.resource)
            .finish()
    }
}

impl<D, R> AsRef<R> for PoolRef<D, R> {
    #[inline(always)]
    fn as_ref(&self) -> &R {
        self
    }
}
