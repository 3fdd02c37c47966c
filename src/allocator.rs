use crate::descriptor::{BufferDescriptor, Descriptor, TextureDescriptor};
use core::fmt;

/// An externally allocated object that can be recycled through a pool.
///
/// The identity returned by [`Resource::id`] must stay the same for the whole
/// life of the object and must differ from every other live object of the same
/// kind. It is how the factory finds the pool key of a resource released by
/// value.
pub trait Resource {
    /// Identity type, usually the device handle.
    type Id: Copy + Ord + fmt::Debug;

    /// Returns the identity of this resource.
    fn id(&self) -> Self::Id;

    /// Human readable name, used only in diagnostics.
    ///
    /// By default, resources are unnamed.
    #[inline(always)]
    fn name(&self) -> Option<&str> {
        None
    }
}

/// A trait defining the interface to the device API for one resource kind.
///
/// The pool calls [`allocate`](Self::allocate) on a miss and
/// [`release`](Self::release) when idle resources are disposed. Nothing else in
/// this crate creates or destroys device objects.
pub trait ResourceAllocator {
    /// Shape description accepted by [`Self::allocate`].
    type Descriptor: Descriptor;

    /// The device object this allocator produces.
    type Resource: Resource;

    /// Failure reported by the device.
    type Error;

    /// Kind name used in logs and errors, such as `"Buffer"`.
    const TYPE_NAME: &'static str;

    /// Creates a new device object shaped like `desc`.
    fn allocate(&mut self, desc: &Self::Descriptor) -> Result<Self::Resource, Self::Error>;

    /// Destroys a device object.
    fn release(&mut self, resource: Self::Resource);
}

/// A [`ResourceAllocator`] producing buffers.
///
/// Blanket-implemented for every allocator whose descriptor is
/// [`BufferDescriptor`].
pub trait BufferAllocator: ResourceAllocator<Descriptor = BufferDescriptor> {}

impl<A: ResourceAllocator<Descriptor = BufferDescriptor>> BufferAllocator for A {}

/// A [`ResourceAllocator`] producing textures.
///
/// Blanket-implemented for every allocator whose descriptor is
/// [`TextureDescriptor`].
pub trait TextureAllocator: ResourceAllocator<Descriptor = TextureDescriptor> {}

impl<A: ResourceAllocator<Descriptor = TextureDescriptor>> TextureAllocator for A {}
