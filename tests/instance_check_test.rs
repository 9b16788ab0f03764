//! Tests for the instance check
//!
//! Fast paths and the reported-class / concrete-type divergence of proxies,
//! in both orders.

use tola_abc::prelude::*;

fn group(rt: &Runtime, name: &str) -> TypeRef {
    TypeBuilder::new(name).abstract_base().build(rt).unwrap()
}

fn plain(rt: &Runtime, name: &str) -> TypeRef {
    TypeBuilder::new(name).build(rt).unwrap()
}

// =============================================================================
// 1. Ordinary Instances
// =============================================================================

#[test]
fn test_instance_of_registered_type() {
    let rt = Runtime::new();
    let g = group(&rt, "G");
    let t = plain(&rt, "T");
    let obj = t.instantiate().unwrap();

    assert!(!g.instance_check(&obj).unwrap());
    g.register(&t).unwrap();
    assert!(g.instance_check(&obj).unwrap());
    assert!(is_instance(&obj, &g).unwrap());
}

#[test]
fn test_instance_of_subclass() {
    let rt = Runtime::new();
    let g = group(&rt, "G");
    let child = TypeBuilder::new("Child").base(&g).build(&rt).unwrap();
    let obj = child.instantiate().unwrap();

    assert!(g.instance_check(&obj).unwrap());
    assert!(child.instance_check(&obj).unwrap());
}

#[test]
fn test_instance_check_against_plain_type() {
    let rt = Runtime::new();
    let base = plain(&rt, "Base");
    let child = TypeBuilder::new("Child").base(&base).build(&rt).unwrap();
    let other = plain(&rt, "Other");

    assert!(base.instance_check(&child.instantiate().unwrap()).unwrap());
    assert!(!base.instance_check(&other.instantiate().unwrap()).unwrap());
}

#[test]
fn test_current_negative_cache_answers_directly() {
    let rt = Runtime::new();
    let g = group(&rt, "G");
    let t = plain(&rt, "T");
    let obj = t.instantiate().unwrap();

    assert!(!g.subclass_check(&t).unwrap());
    assert_eq!(g.dump_registry().unwrap().negative_cache, ["T"]);
    assert!(!g.instance_check(&obj).unwrap());
}

#[test]
fn test_stale_negative_cache_is_not_trusted() {
    let rt = Runtime::new();
    let g = group(&rt, "G");
    let h = group(&rt, "H");
    let t = plain(&rt, "T");
    let obj = t.instantiate().unwrap();

    assert!(!g.instance_check(&obj).unwrap());
    h.register(&t).unwrap();
    g.register(&h).unwrap();
    assert!(g.instance_check(&obj).unwrap());
}

#[test]
fn test_positive_cache_fast_path() {
    let rt = Runtime::new();
    let g = group(&rt, "G");
    let t = plain(&rt, "T");
    g.register(&t).unwrap();
    let obj = t.instantiate().unwrap();

    assert!(g.instance_check(&obj).unwrap());
    assert_eq!(g.dump_registry().unwrap().cache, ["T"]);

    // Cached by exact class: the registry is no longer consulted.
    g.clear_registry().unwrap();
    assert!(g.instance_check(&obj).unwrap());
}

// =============================================================================
// 2. Proxies
// =============================================================================

#[test]
fn test_proxy_reporting_a_member_class() {
    let rt = Runtime::new();
    let g = group(&rt, "G");
    let member = plain(&rt, "Member");
    let proxy_type = plain(&rt, "Proxy");
    g.register(&member).unwrap();

    let obj = proxy_type.instantiate().unwrap().with_class(&member);
    assert!(obj.is_proxied());
    assert!(g.instance_check(&obj).unwrap());
}

#[test]
fn test_proxy_whose_concrete_type_is_the_member() {
    let rt = Runtime::new();
    let g = group(&rt, "G");
    let member = plain(&rt, "Member");
    let disguise = plain(&rt, "Disguise");
    g.register(&member).unwrap();

    let obj = member.instantiate().unwrap().with_class(&disguise);
    assert!(g.instance_check(&obj).unwrap());
    assert_eq!(g.dump_registry().unwrap().negative_cache, ["Disguise"]);
}

#[test]
fn test_proxy_bypasses_negative_cache_of_reported_class() {
    let rt = Runtime::new();
    let g = group(&rt, "G");
    let member = plain(&rt, "Member");
    let disguise = plain(&rt, "Disguise");
    g.register(&member).unwrap();

    // Disguise is a current negative entry, but the concrete type still counts.
    assert!(!g.subclass_check(&disguise).unwrap());
    let obj = member.instantiate().unwrap().with_class(&disguise);
    assert!(g.instance_check(&obj).unwrap());
}

#[test]
fn test_proxy_with_neither_side_a_member() {
    let rt = Runtime::new();
    let g = group(&rt, "G");
    let a = plain(&rt, "A");
    let b = plain(&rt, "B");

    let obj = a.instantiate().unwrap().with_class(&b);
    assert!(!g.instance_check(&obj).unwrap());
    assert_eq!(g.dump_registry().unwrap().negative_cache, ["A", "B"]);
}

#[test]
fn test_instance_debug_shows_proxy() {
    let rt = Runtime::new();
    let a = plain(&rt, "A");
    let b = plain(&rt, "B");

    assert_eq!(format!("{:?}", a.instantiate().unwrap()), "<A object>");
    assert_eq!(format!("{:?}", a.instantiate().unwrap().with_class(&b)), "<A object as B>");
}
