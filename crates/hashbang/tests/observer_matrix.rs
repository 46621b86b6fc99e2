use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use hashbang::{
    parse_path, Config, EventSet, Filter, Hashbang, ManualClock, MemoryHistory, ObserveOptions,
};
use serde_json::{json, Value};

type Calls = Rc<RefCell<Vec<(Option<Value>, Option<Value>)>>>;

fn recorder() -> (Calls, impl FnMut(Option<&Value>, Option<&Value>) + 'static) {
    let calls: Calls = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&calls);
    (calls, move |new: Option<&Value>, old: Option<&Value>| {
        sink.borrow_mut().push((new.cloned(), old.cloned()));
    })
}

fn installed(fragment: &str) -> (Hashbang<MemoryHistory>, MemoryHistory, ManualClock) {
    let history = MemoryHistory::new(fragment);
    let clock = ManualClock::new();
    let store = Hashbang::install_with_clock(history.clone(), Config::default(), clock.clone()).unwrap();
    (store, history, clock)
}

fn settle(store: &mut Hashbang<MemoryHistory>, clock: &ManualClock) {
    clock.advance(Duration::from_millis(50));
    store.run_timers();
}

#[test]
fn pattern_filter_on_nested_path() {
    let (mut store, _, clock) = installed("#!mod[id]=1&mod[name]=foo");
    let (calls, callback) = recorder();
    let options = ObserveOptions::new().with_filter(Filter::pattern(r"^\d+$").unwrap());
    store.observe_with(parse_path("mod.id"), callback, options);

    store.at(&parse_path("mod.name")).set(json!("bar")).unwrap();
    settle(&mut store, &clock);
    assert!(calls.borrow().is_empty(), "sibling change reached the observer");

    store.at(&parse_path("mod.id")).set(json!("abc")).unwrap();
    settle(&mut store, &clock);
    assert!(calls.borrow().is_empty(), "filter let a non-numeric id through");

    store.at(&parse_path("mod.id")).set(json!("7")).unwrap();
    settle(&mut store, &clock);
    assert_eq!(*calls.borrow(), vec![(Some(json!("7")), Some(json!("abc")))]);
}

#[test]
fn observer_sees_external_changes_and_removal() {
    let (mut store, history, _) = installed("#!q=a");
    let (calls, callback) = recorder();
    store.observe(parse_path("q"), callback);

    history.navigate("#!q=b");
    store.handle_external_change();
    history.navigate("#!other=1");
    store.handle_external_change();

    assert_eq!(
        *calls.borrow(),
        vec![
            (Some(json!("b")), Some(json!("a"))),
            (None, Some(json!("b"))),
        ]
    );
}

#[test]
fn observers_attached_before_start_hear_initialized() {
    let history = MemoryHistory::new("#!user[name]=ann");
    let mut store = Hashbang::with_clock(history, Config::default(), ManualClock::new()).unwrap();
    let (calls, callback) = recorder();
    let options = ObserveOptions::new().with_events(EventSet::INITIALIZED);
    store.observe_with(parse_path("user"), callback, options);

    store.start();
    assert_eq!(*calls.borrow(), vec![(Some(json!({"name": "ann"})), None)]);
}

#[test]
fn immediate_only_observer_runs_once_and_is_dropped() {
    let (mut store, _, clock) = installed("#!a=1");
    let (calls, callback) = recorder();
    let id = store.observe_with(
        parse_path("a"),
        callback,
        ObserveOptions::new().with_events(EventSet::IMMEDIATE),
    );
    assert_eq!(*calls.borrow(), vec![(Some(json!("1")), None)]);
    assert!(!store.observers().contains(id));

    store.root().insert("a", json!("2")).unwrap();
    settle(&mut store, &clock);
    assert_eq!(calls.borrow().len(), 1);
}

#[test]
fn immediate_with_lifecycle_events_stays_registered() {
    let (mut store, _, clock) = installed("#!a=1");
    let (calls, callback) = recorder();
    let events = EventSet::IMMEDIATE | EventSet::UPDATED_INTERNALLY;
    store.observe_with(parse_path("a"), callback, ObserveOptions::new().with_events(events));

    store.root().insert("a", json!("2")).unwrap();
    settle(&mut store, &clock);
    assert_eq!(
        *calls.borrow(),
        vec![(Some(json!("1")), None), (Some(json!("2")), Some(json!("1")))]
    );
}

#[test]
fn once_observer_is_removed_after_first_call() {
    let (mut store, _, clock) = installed("#!n=0");
    let (calls, callback) = recorder();
    let id = store.observe_with(parse_path("n"), callback, ObserveOptions::new().once());

    for n in 1..=3 {
        store.root().insert("n", json!(n.to_string())).unwrap();
        settle(&mut store, &clock);
    }
    assert_eq!(calls.borrow().len(), 1);
    assert!(!store.observers().contains(id));
}

#[test]
fn event_set_restricts_evaluation() {
    let (mut store, history, clock) = installed("#!a=1");
    let (calls, callback) = recorder();
    let options = ObserveOptions::new().with_events(EventSet::UPDATED_EXTERNALLY);
    store.observe_with(parse_path("a"), callback, options);

    store.root().insert("a", json!("2")).unwrap();
    settle(&mut store, &clock);
    assert!(calls.borrow().is_empty());

    history.navigate("#!a=3");
    store.handle_external_change();
    assert_eq!(*calls.borrow(), vec![(Some(json!("3")), Some(json!("1")))]);
}

#[test]
fn predicate_filter_sees_old_and_new() {
    let (mut store, _, clock) = installed("#!count=1");
    let (calls, callback) = recorder();
    let grew = Filter::predicate(|new, old| {
        let num = |v: Option<&Value>| v.and_then(Value::as_str).and_then(|s| s.parse::<i64>().ok());
        matches!((num(new), num(old)), (Some(n), Some(o)) if n > o)
    });
    store.observe_with(parse_path("count"), callback, ObserveOptions::new().with_filter(grew));

    for count in ["0", "5"] {
        store.root().insert("count", json!(count)).unwrap();
        settle(&mut store, &clock);
    }
    assert_eq!(*calls.borrow(), vec![(Some(json!("5")), Some(json!("0")))]);
}

#[test]
fn unobserve_with_wildcard_path() {
    let (mut store, _, _) = installed("#!m[a]=1");
    let (_, callback) = recorder();
    let id = store.observe(parse_path("m.a"), callback);

    assert!(!store.unobserve(Some(&parse_path("m.b")), id));
    assert!(store.unobserve(Some(&parse_path("m.")), id));
    assert!(!store.unobserve(None, id));
    assert!(store.observers().is_empty());
}
