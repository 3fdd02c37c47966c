#![allow(dead_code)]

use respool::*;
use std::{
    cell::{Cell, RefCell},
    marker::PhantomData,
    rc::Rc,
};

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("out of device memory")]
pub struct OutOfMemory;

/// Records every call the pools make into the fake device.
#[derive(Debug, Default)]
pub struct DeviceLog {
    pub allocated: RefCell<Vec<u32>>,
    pub released: RefCell<Vec<u32>>,
    pub fail: Cell<bool>,
}

impl DeviceLog {
    pub fn allocations(&self) -> usize {
        self.allocated.borrow().len()
    }

    pub fn released(&self) -> Vec<u32> {
        self.released.borrow().clone()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FakeResource {
    pub id: u32,
    pub name: String,
}

impl FakeResource {
    pub fn foreign(id: u32) -> Self {
        FakeResource {
            id,
            name: String::new(),
        }
    }
}

impl Resource for FakeResource {
    type Id = u32;

    fn id(&self) -> u32 {
        self.id
    }

    fn name(&self) -> Option<&str> {
        Some(&self.name)
    }
}

pub struct FakeAllocator<D> {
    next_id: u32,
    log: Rc<DeviceLog>,
    _desc: PhantomData<D>,
}

impl<D> FakeAllocator<D> {
    pub fn new(first_id: u32) -> (Self, Rc<DeviceLog>) {
        let log = Rc::new(DeviceLog::default());
        let allocator = FakeAllocator {
            next_id: first_id,
            log: log.clone(),
            _desc: PhantomData,
        };
        (allocator, log)
    }

    fn create(&mut self, name: &str) -> Result<FakeResource, OutOfMemory> {
        if self.log.fail.get() {
            return Err(OutOfMemory);
        }
        let id = self.next_id;
        self.next_id += 1;
        self.log.allocated.borrow_mut().push(id);
        Ok(FakeResource {
            id,
            name: name.to_owned(),
        })
    }

    fn destroy(&mut self, resource: FakeResource) {
        self.log.released.borrow_mut().push(resource.id);
    }
}

impl ResourceAllocator for FakeAllocator<BufferDescriptor> {
    type Descriptor = BufferDescriptor;
    type Resource = FakeResource;
    type Error = OutOfMemory;
    const TYPE_NAME: &'static str = "Buffer";

    fn allocate(&mut self, desc: &BufferDescriptor) -> Result<FakeResource, OutOfMemory> {
        self.create(&desc.name)
    }

    fn release(&mut self, resource: FakeResource) {
        self.destroy(resource);
    }
}

impl ResourceAllocator for FakeAllocator<TextureDescriptor> {
    type Descriptor = TextureDescriptor;
    type Resource = FakeResource;
    type Error = OutOfMemory;
    const TYPE_NAME: &'static str = "Texture";

    fn allocate(&mut self, desc: &TextureDescriptor) -> Result<FakeResource, OutOfMemory> {
        self.create(&desc.name)
    }

    fn release(&mut self, resource: FakeResource) {
        self.destroy(resource);
    }
}

pub type BufferPool = ResourcePool<FakeAllocator<BufferDescriptor>>;

pub type Factory =
    ResourceFactory<FakeAllocator<BufferDescriptor>, FakeAllocator<TextureDescriptor>>;

pub fn buffer_pool() -> (BufferPool, Rc<DeviceLog>) {
    let (allocator, log) = FakeAllocator::new(1);
    (ResourcePool::new(allocator), log)
}

pub struct Harness {
    pub factory: Factory,
    pub buffers: Rc<DeviceLog>,
    pub textures: Rc<DeviceLog>,
}

pub fn harness(config: FactoryConfig) -> Harness {
    let (buffer_allocator, buffers) = FakeAllocator::new(1);
    let (texture_allocator, textures) = FakeAllocator::new(1000);
    Harness {
        factory: ResourceFactory::with_config(config, buffer_allocator, texture_allocator),
        buffers,
        textures,
    }
}
