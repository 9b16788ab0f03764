//! Tests for concurrent registration and checks
//!
//! Epoch arithmetic stays exact, racing cycles admit one side, and readers
//! never observe a stale negative answer after a completed registration.

use std::sync::{Arc, Barrier};
use std::thread;

use tola_abc::prelude::*;

fn group(rt: &Runtime, name: &str) -> TypeRef {
    TypeBuilder::new(name).abstract_base().build(rt).unwrap()
}

const THREADS: usize = 8;
const PER_THREAD: usize = 25;

#[test]
fn test_concurrent_registrations_are_all_counted() {
    let rt = Runtime::new();
    let g = group(&rt, "Shared");

    let handles: Vec<_> = (0..THREADS)
        .map(|i| {
            let rt = rt.clone();
            let g = g.clone();
            thread::spawn(move || {
                let mut members = Vec::new();
                for j in 0..PER_THREAD {
                    let t = TypeBuilder::new(format!("T{i}_{j}")).build(&rt).unwrap();
                    g.register(&t).unwrap();
                    assert!(g.subclass_check(&t).unwrap());
                    members.push(t);
                }
                members
            })
        })
        .collect();

    let members: Vec<TypeRef> = handles.into_iter().flat_map(|h| h.join().unwrap()).collect();
    assert_eq!(rt.cache_token().value(), (THREADS * PER_THREAD) as u64);
    assert_eq!(g.dump_registry().unwrap().registry.len(), THREADS * PER_THREAD);
    for t in &members {
        assert!(g.subclass_check(t).unwrap());
    }
}

#[test]
fn test_racing_cycle_admits_exactly_one_side() {
    for round in 0..50 {
        let rt = Runtime::new();
        let a = group(&rt, "A");
        let b = group(&rt, "B");
        let barrier = Arc::new(Barrier::new(2));

        let spawn = |target: TypeRef, member: TypeRef| {
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                target.register(&member).is_ok()
            })
        };
        let ab = spawn(a.clone(), b.clone());
        let ba = spawn(b.clone(), a.clone());
        let (ab, ba) = (ab.join().unwrap(), ba.join().unwrap());

        assert!(ab ^ ba, "round {round}: both or neither registration succeeded");
        assert_eq!(rt.cache_token().value(), 1);
        assert_ne!(a.subclass_check(&b).unwrap(), b.subclass_check(&a).unwrap());
    }
}

#[test]
fn test_readers_see_completed_registrations() {
    let rt = Runtime::new();
    let g = group(&rt, "G");
    let members: Vec<_> = (0..PER_THREAD)
        .map(|i| TypeBuilder::new(format!("M{i}")).build(&rt).unwrap())
        .collect();

    // Prime the negative cache for every candidate.
    for t in &members {
        assert!(!g.subclass_check(t).unwrap());
    }

    let readers: Vec<_> = (0..THREADS)
        .map(|_| {
            let g = g.clone();
            let members = members.clone();
            thread::spawn(move || {
                for _ in 0..20 {
                    for t in &members {
                        g.subclass_check(t).unwrap();
                    }
                }
            })
        })
        .collect();

    for t in &members {
        g.register(t).unwrap();
        // A registration that has returned is visible to every later check.
        assert!(g.subclass_check(t).unwrap());
    }
    for reader in readers {
        reader.join().unwrap();
    }
    for t in &members {
        assert!(g.subclass_check(t).unwrap());
    }
}

#[test]
fn test_checks_across_many_groups_do_not_deadlock() {
    let rt = Runtime::new();
    let groups: Vec<_> = (0..6).map(|i| group(&rt, &format!("G{i}"))).collect();
    for pair in groups.windows(2) {
        pair[0].register(&pair[1]).unwrap();
    }
    let leaf = TypeBuilder::new("Leaf").base(&groups[5]).build(&rt).unwrap();

    let handles: Vec<_> = (0..THREADS)
        .map(|i| {
            let groups = groups.clone();
            let leaf = leaf.clone();
            thread::spawn(move || {
                for round in 0..50 {
                    let g = &groups[(i + round) % groups.len()];
                    assert!(g.subclass_check(&leaf).unwrap());
                    g.clear_caches().unwrap();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }
}
