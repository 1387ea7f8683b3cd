mod common;

use common::CountingDecls;
use genscope_api::GenericDecl;
use genscope_core::{Scope, ScopeConfig, ScopeFactory};
use std::sync::Arc;
use std::thread;

const THREADS: usize = 8;

fn nested_fixture() -> (Arc<CountingDecls>, genscope_api::ClassId, GenericDecl) {
    let mut decls = CountingDecls::new();
    let outer = decls.class("Outer", &["T"]);
    let m = decls.method(outer, "m", &["U"]);
    let local = decls.class("Local", &["V"]);
    decls.nest_in_method(local, m);
    (Arc::new(decls), local, GenericDecl::Class(outer))
}

#[test]
fn test_concurrent_lookups_agree_on_one_enclosing_scope() {
    let (decls, local, outer) = nested_fixture();
    let factory = ScopeFactory::new(decls.clone());
    let scope = factory.class_scope(local);

    let results: Vec<_> = thread::scope(|s| {
        let handles: Vec<_> = (0..THREADS)
            .map(|_| s.spawn(|| (scope.lookup("T"), scope.enclosing().cloned())))
            .collect();
        handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .collect()
    });

    let observed = scope.enclosing().unwrap();
    for (found, enclosing) in &results {
        assert_eq!(found.as_ref().map(|tv| tv.owner), Some(outer));
        // Every thread sees the one value that won the slot.
        assert!(enclosing.as_ref().unwrap().same_instance(observed));
    }
}

#[test]
fn test_concurrent_lookups_without_sharing_still_converge() {
    let (decls, local, outer) = nested_fixture();
    let factory = ScopeFactory::with_config(
        decls.clone(),
        &ScopeConfig {
            share_scopes: false,
        },
    );
    let scope = factory.class_scope(local);

    thread::scope(|s| {
        for _ in 0..THREADS {
            s.spawn(|| {
                for name in ["T", "U", "V"] {
                    assert!(scope.lookup(name).is_some());
                }
                assert_eq!(scope.lookup("W"), None);
            });
        }
    });

    let before = decls.navigations();
    assert_eq!(scope.lookup("T").map(|tv| tv.owner), Some(outer));
    assert_eq!(decls.navigations(), before);
}

#[test]
fn test_shared_factory_hands_out_one_scope_under_contention() {
    let (decls, local, _) = nested_fixture();
    let factory = ScopeFactory::new(decls);

    let scopes: Vec<Scope> = thread::scope(|s| {
        let handles: Vec<_> = (0..THREADS)
            .map(|_| s.spawn(|| factory.class_scope(local)))
            .collect();
        handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .collect()
    });

    for scope in &scopes[1..] {
        assert!(scope.same_instance(&scopes[0]));
    }
    assert_eq!(factory.live_scopes(), 1);
}
