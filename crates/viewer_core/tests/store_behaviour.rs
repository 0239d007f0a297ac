use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;
use std::sync::Once;

use pretty_assertions::assert_eq;
use viewer_core::{
    viewer_store, Diagnostic, FieldValue, ReactiveStore, StoreError, DOCX_PATH, HTML, MESSAGES,
};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(viewer_logging::initialize_for_tests);
}

#[test]
fn set_then_get_returns_value_for_every_field() {
    init_logging();
    let store = viewer_store();

    let path = FieldValue::Path(PathBuf::from("/tmp/report.docx"));
    let html = FieldValue::Html("<p>Hello</p>".to_string());
    let messages = FieldValue::Messages(vec![Diagnostic::warning("unrecognised style")]);

    store.set(DOCX_PATH, path.clone()).unwrap();
    store.set(HTML, html.clone()).unwrap();
    store.set(MESSAGES, messages.clone()).unwrap();

    assert_eq!(store.get(DOCX_PATH).unwrap(), path);
    assert_eq!(store.get(HTML).unwrap(), html);
    assert_eq!(store.get(MESSAGES).unwrap(), messages);
}

#[test]
fn undeclared_field_is_rejected_by_every_accessor() {
    init_logging();
    let store = viewer_store();

    assert!(matches!(
        store.get("title"),
        Err(StoreError::UnknownField { field }) if field == "title"
    ));
    assert!(matches!(
        store.set("title", FieldValue::Empty),
        Err(StoreError::UnknownField { .. })
    ));
    assert!(matches!(
        store.on_change("title", |_| Ok(())),
        Err(StoreError::UnknownField { .. })
    ));
    assert!(!store.has_field("title"));
}

#[test]
fn listeners_run_once_each_in_registration_order() {
    init_logging();
    let store: ReactiveStore<i32> = ReactiveStore::new(["count"]);
    let calls = Rc::new(RefCell::new(Vec::new()));

    for id in 0..3 {
        let calls = calls.clone();
        store
            .on_change("count", move |value| {
                calls.borrow_mut().push((id, *value));
                Ok(())
            })
            .unwrap();
    }

    store.set("count", 7).unwrap();

    assert_eq!(*calls.borrow(), vec![(0, 7), (1, 7), (2, 7)]);
}

#[test]
fn registering_does_not_notify_with_current_value() {
    init_logging();
    let store: ReactiveStore<i32> = ReactiveStore::new(["count"]);
    store.set("count", 3).unwrap();

    let calls = Rc::new(RefCell::new(0));
    let counter = calls.clone();
    store
        .on_change("count", move |_| {
            *counter.borrow_mut() += 1;
            Ok(())
        })
        .unwrap();

    assert_eq!(*calls.borrow(), 0);
}

#[test]
fn same_listener_registered_twice_runs_twice() {
    init_logging();
    let store: ReactiveStore<i32> = ReactiveStore::new(["count"]);
    let calls = Rc::new(RefCell::new(0));

    let counter = calls.clone();
    let listener = move |_: &i32| {
        *counter.borrow_mut() += 1;
        Ok(())
    };
    store.on_change("count", listener.clone()).unwrap();
    store.on_change("count", listener).unwrap();

    store.set("count", 1).unwrap();
    assert_eq!(*calls.borrow(), 2);
    assert_eq!(store.listener_count("count").unwrap(), 2);
}

#[test]
fn listeners_only_fire_for_their_own_field() {
    init_logging();
    let store: ReactiveStore<i32> = ReactiveStore::new(["a", "b"]);
    let calls = Rc::new(RefCell::new(Vec::new()));

    let seen = calls.clone();
    store
        .on_change("a", move |value| {
            seen.borrow_mut().push(*value);
            Ok(())
        })
        .unwrap();

    store.set("b", 5).unwrap();
    store.set("a", 6).unwrap();

    assert_eq!(*calls.borrow(), vec![6]);
}

#[test]
fn failing_listener_propagates_and_stops_later_listeners() {
    init_logging();
    let store: ReactiveStore<i32> = ReactiveStore::new(["count"]);
    let later_calls = Rc::new(RefCell::new(0));

    store
        .on_change("count", |value| anyhow::bail!("rejected {value}"))
        .unwrap();
    let counter = later_calls.clone();
    store
        .on_change("count", move |_| {
            *counter.borrow_mut() += 1;
            Ok(())
        })
        .unwrap();

    let err = store.set("count", 9).unwrap_err();
    match err {
        StoreError::Listener { field, source } => {
            assert_eq!(field, "count");
            assert_eq!(source.to_string(), "rejected 9");
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(*later_calls.borrow(), 0);
    // The value was stored before notification started.
    assert_eq!(store.get("count").unwrap(), 9);
}
