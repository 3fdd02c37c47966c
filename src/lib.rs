#![no_std]
#![doc = include_str!("../README.md")]
#![warn(missing_docs, missing_debug_implementations)]
extern crate alloc;
mod allocator;
mod descriptor;
mod error;
mod factory;
mod handle;
mod key;
mod pool;

pub use allocator::*;
pub use descriptor::*;
pub use error::*;
pub use factory::*;
pub use handle::*;
pub use key::*;
pub use pool::*;
