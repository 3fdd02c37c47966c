use crate::key::PoolKey;
use alloc::string::String;

/// Error returned when a resource could not be produced.
#[derive(Debug, thiserror::Error)]
pub enum AllocError<E> {
    /// The device refused to create the resource. The pool is unchanged.
    #[error("{kind} allocation failed for key {key}")]
    Device {
        /// Kind name of the allocator.
        kind: &'static str,
        /// Key the resource was requested under.
        key: PoolKey,
        /// Error reported by the device.
        #[source]
        source: E,
    },
}

impl<E> AllocError<E> {
    /// Kind name of the allocator that failed.
    pub fn kind(&self) -> &'static str {
        match self {
            AllocError::Device { kind, .. } => *kind,
        }
    }

    /// Returns the device error.
    pub fn into_source(self) -> E {
        match self {
            AllocError::Device { source, .. } => source,
        }
    }
}

/// Error returned when a resource could not be given back to its pool.
///
/// The resource is handed back inside the error so it is never dropped behind
/// the caller's back. Pass it to [`ResourceFactory::destroy_buffer`] or
/// [`ResourceFactory::destroy_texture`] to free it on the device.
///
/// [`ResourceFactory::destroy_buffer`]: crate::ResourceFactory::destroy_buffer
/// [`ResourceFactory::destroy_texture`]: crate::ResourceFactory::destroy_texture
#[derive(Debug, thiserror::Error)]
pub enum ReleaseError<R> {
    /// The factory holds no record of this resource: it was never produced
    /// here, was already released, or was checked out before the last reset.
    #[error("release of unknown {kind} resource {id}")]
    UnknownResource {
        /// Kind name of the pool.
        kind: &'static str,
        /// Debug rendering of the resource identity.
        id: String,
        /// The rejected resource.
        resource: R,
    },
}

impl<R> ReleaseError<R> {
    /// Kind name of the pool that rejected the resource.
    pub fn kind(&self) -> &'static str {
        match self {
            ReleaseError::UnknownResource { kind, .. } => *kind,
        }
    }

    /// Returns the rejected resource.
    pub fn into_resource(self) -> R {
        match self {
            ReleaseError::UnknownResource { resource, .. } => resource,
        }
    }
}
