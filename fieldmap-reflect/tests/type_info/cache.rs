use std::sync::{Arc, Barrier};
use std::thread;

use fieldmap::{DynKeyed, Keyed};
use fieldmap_reflect::{NameCase, TypeInfo, TypeInfoCache, TypeInfoError};
use fieldmap_testhelpers::test;

#[derive(Keyed)]
#[allow(dead_code)]
struct Request {
    method: String,
    path: String,
    #[keyed(rename = "Content-Type")]
    content_type: Option<String>,
}

#[derive(Keyed)]
#[allow(dead_code)]
struct SignedRequest {
    #[keyed(parent)]
    request: Request,
    signature: Vec<u8>,
    nonce: u64,
}

#[derive(Keyed)]
#[allow(dead_code)]
enum Method {
    Get,
    Post,
}

#[test]
fn same_type_and_case_share_one_instance() {
    let cache = TypeInfoCache::new();
    for case in [NameCase::Sensitive, NameCase::Insensitive] {
        let first = cache.resolve_of::<Request>(case).unwrap();
        let second = cache.resolve_of::<Request>(case).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    let sensitive = cache.resolve_of::<Request>(NameCase::Sensitive).unwrap();
    let insensitive = cache.resolve_of::<Request>(NameCase::Insensitive).unwrap();
    assert!(!Arc::ptr_eq(&sensitive, &insensitive));
    assert_eq!(
        sensitive.keys().collect::<Vec<_>>(),
        ["Content-Type", "method", "path"]
    );
    assert_eq!(
        insensitive.keys().collect::<Vec<_>>(),
        ["content-type", "method", "path"]
    );
    assert_eq!(cache.len(NameCase::Sensitive), 1);
    assert_eq!(cache.len(NameCase::Insensitive), 1);
}

#[test]
fn global_cache_backs_type_info_of() {
    let a = TypeInfo::of::<Request>(NameCase::Sensitive).unwrap();
    let b = TypeInfoCache::global()
        .resolve(Request::SHAPE, NameCase::Sensitive)
        .unwrap();
    assert!(Arc::ptr_eq(&a, &b));
    assert!(TypeInfoCache::global().contains(Request::SHAPE, NameCase::Sensitive));
}

#[test]
fn separate_caches_do_not_share() {
    let one = TypeInfoCache::new();
    let two = TypeInfoCache::new();
    let a = one.resolve_of::<Request>(NameCase::Sensitive).unwrap();
    let b = two.resolve_of::<Request>(NameCase::Sensitive).unwrap();
    assert!(!Arc::ptr_eq(&a, &b));
    assert_eq!(a.names(), b.names());
}

#[test]
fn resolving_a_subtype_caches_its_ancestor() {
    let cache = TypeInfoCache::new();
    assert!(cache.is_empty());
    let info = cache.resolve_of::<SignedRequest>(NameCase::Sensitive).unwrap();
    assert!(cache.contains(Request::SHAPE, NameCase::Sensitive));
    assert!(!cache.contains(Request::SHAPE, NameCase::Insensitive));
    assert_eq!(
        info.keys().collect::<Vec<_>>(),
        ["Content-Type", "method", "nonce", "path", "signature"]
    );
}

#[test]
fn runtime_type_resolves_like_the_static_one() {
    let cache = TypeInfoCache::new();
    let value: Box<dyn DynKeyed> = Box::new(Request {
        method: "GET".into(),
        path: "/".into(),
        content_type: None,
    });
    let by_value = cache.resolve_dyn(&*value, NameCase::Sensitive).unwrap();
    let by_type = cache.resolve_of::<Request>(NameCase::Sensitive).unwrap();
    assert!(Arc::ptr_eq(&by_value, &by_type));
}

#[test]
fn absent_type_resolves_to_absent_info() {
    let cache = TypeInfoCache::new();
    assert!(cache.resolve_optional(None, NameCase::Sensitive).unwrap().is_none());
    let some = cache
        .resolve_optional(Some(Request::SHAPE), NameCase::Sensitive)
        .unwrap();
    assert!(some.is_some());
}

#[test]
fn failures_are_not_cached() {
    let cache = TypeInfoCache::new();
    for _ in 0..2 {
        let err = cache.resolve_of::<Method>(NameCase::Insensitive).unwrap_err();
        assert_eq!(err, TypeInfoError::CaseInsensitiveEnum { type_name: "Method" });
    }
    assert!(!cache.contains(Method::SHAPE, NameCase::Insensitive));
    assert!(cache.resolve_of::<Method>(NameCase::Sensitive).is_ok());
}

#[test]
fn racing_first_resolution_converges_on_one_instance() {
    const THREADS: usize = 16;

    let cache = TypeInfoCache::new();
    let barrier = Barrier::new(THREADS);

    let infos: Vec<Arc<TypeInfo>> = thread::scope(|scope| {
        let handles: Vec<_> = (0..THREADS)
            .map(|i| {
                let cache = &cache;
                let barrier = &barrier;
                scope.spawn(move || {
                    barrier.wait();
                    let case = NameCase::from_ignore_case(i % 2 == 1);
                    (case, cache.resolve_of::<SignedRequest>(case).unwrap())
                })
            })
            .collect();
        handles
            .into_iter()
            .map(|handle| handle.join().unwrap())
            .filter(|(case, _)| *case == NameCase::Insensitive)
            .map(|(_, info)| info)
            .collect()
    });

    let settled = cache
        .resolve_of::<SignedRequest>(NameCase::Insensitive)
        .unwrap();
    assert_eq!(infos.len(), THREADS / 2);
    for info in &infos {
        assert!(Arc::ptr_eq(info, &settled));
    }
    assert_eq!(cache.len(NameCase::Sensitive), 2);
    assert_eq!(cache.len(NameCase::Insensitive), 2);
}
