mod common;

use common::*;
use respool::*;

#[test]
fn test_pull_empty() {
    let (mut pool, log) = buffer_pool();
    assert!(pool.pull(PoolKey(20)).is_none());
    assert!(pool.is_empty());
    assert_eq!(pool.key_count(), 0);
    assert_eq!(log.allocations(), 0);
}

#[test]
fn test_push_then_pull_is_lifo() {
    let (mut pool, _log) = buffer_pool();
    let desc = BufferDescriptor::new(16, 4);
    let key = desc.pool_key();
    let first = pool.allocate(&desc).unwrap();
    let second = pool.allocate(&desc).unwrap();
    pool.push(key, desc.clone(), first.clone());
    pool.push(key, desc.clone(), second.clone());
    assert_eq!(pool.idle_count(key), 2);

    assert_eq!(pool.pull(key), Some(second));
    assert_eq!(pool.pull(key), Some(first));
    assert_eq!(pool.pull(key), None);
    assert!(pool.is_empty());
}

#[test]
fn test_keys_are_independent() {
    let (mut pool, _log) = buffer_pool();
    let small = BufferDescriptor::new(16, 4);
    let large = BufferDescriptor::new(1024, 16);
    let buffer = pool.allocate(&small).unwrap();
    pool.push(small.pool_key(), small.clone(), buffer);
    assert!(pool.pull(large.pool_key()).is_none());
    assert_eq!(pool.idle_count(small.pool_key()), 1);
    assert_eq!(pool.key_count(), 1);
}

#[test]
fn test_pull_matching_skips_collisions() {
    let (mut pool, _log) = buffer_pool();
    let wide = BufferDescriptor::new(16, 4);
    let narrow = BufferDescriptor::new(4, 16);
    let key = wide.pool_key();
    let a = pool.allocate(&wide).unwrap();
    let b = pool.allocate(&narrow).unwrap();
    pool.push(key, wide.clone(), a.clone());
    pool.push(key, narrow.clone(), b.clone());

    assert_eq!(pool.pull_matching(key, &wide), Some(a));
    assert_eq!(pool.pull_matching(key, &wide), None);
    assert_eq!(pool.idle_count(key), 1);
    assert_eq!(pool.pull(key), Some(b));
}

#[test]
fn test_pull_matching_prefers_latest() {
    let (mut pool, _log) = buffer_pool();
    let desc = BufferDescriptor::new(8, 8);
    let other = BufferDescriptor::new(2, 14);
    let key = desc.pool_key();
    let old = pool.allocate(&desc).unwrap();
    let blocker = pool.allocate(&other).unwrap();
    let recent = pool.allocate(&desc).unwrap();
    pool.push(key, desc.clone(), old.clone());
    pool.push(key, desc.clone(), recent.clone());
    pool.push(key, other.clone(), blocker.clone());

    assert_eq!(pool.pull_matching(key, &desc), Some(recent));
    assert_eq!(pool.pull(key), Some(blocker));
    assert_eq!(pool.pull(key), Some(old));
}

#[test]
fn test_contains() {
    let (mut pool, _log) = buffer_pool();
    let desc = BufferDescriptor::new(16, 4);
    let buffer = pool.allocate(&desc).unwrap();
    let id = buffer.id();
    assert!(!pool.contains(desc.pool_key(), id));
    pool.push(desc.pool_key(), desc.clone(), buffer);
    assert!(pool.contains(desc.pool_key(), id));
    assert!(!pool.contains(PoolKey(0), id));
}

#[test]
fn test_dispose_all_releases_once() {
    let (mut pool, log) = buffer_pool();
    let small = BufferDescriptor::new(16, 4);
    let large = BufferDescriptor::new(256, 4);
    for desc in [&small, &small, &large] {
        let buffer = pool.allocate(desc).unwrap();
        pool.push(desc.pool_key(), desc.clone(), buffer);
    }
    let held = pool.allocate(&small).unwrap();

    assert_eq!(pool.dispose_all(), 3);
    assert!(pool.is_empty());
    let mut released = log.released();
    released.sort_unstable();
    assert_eq!(released, vec![1, 2, 3]);
    assert!(!released.contains(&held.id));

    assert_eq!(pool.dispose_all(), 0);
    assert_eq!(log.released().len(), 3);
}

#[test]
fn test_drop_disposes_idle() {
    let (mut pool, log) = buffer_pool();
    let desc = BufferDescriptor::new(16, 4);
    let buffer = pool.allocate(&desc).unwrap();
    pool.push(desc.pool_key(), desc, buffer);
    drop(pool);
    assert_eq!(log.released(), vec![1]);
}

#[test]
fn test_debug_and_type_name() {
    let (pool, _log) = buffer_pool();
    assert_eq!(pool.type_name(), "Buffer");
    assert_eq!(
        format!("{pool:?}"),
        "ResourcePool { kind: \"Buffer\", keys: 0, idle: 0 }"
    );
}
