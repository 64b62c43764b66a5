//! The global handler owns process-wide state, so the whole lifecycle is
//! exercised from a single test.

use guarded_call::{GlobalHandler, make_exception_event};
use parking_lot::Mutex;
use std::sync::Arc;

#[test]
fn global_handler_lifecycle() {
    let seen = Arc::new(Mutex::new(Vec::<String>::new()));

    let recorder = {
        let seen = seen.clone();
        make_exception_event(move |exception| {
            seen.lock().push(exception.description().to_owned());
            true
        })
    };

    let handler = GlobalHandler::attach(recorder).unwrap();

    // Only one handler at a time
    assert!(GlobalHandler::attach(make_exception_event(|_| false)).is_err());

    // A guard intercepting on this thread keeps the event away from the
    // global handler entirely.
    let mut caught = false;
    guarded_call::try_catch(|| panic!("guarded"), |_exception| caught = true);
    assert!(caught);
    assert!(seen.lock().is_empty());

    // An unguarded raise, even on another thread, reaches the handler.
    let join = std::thread::spawn(|| panic!("unguarded boom")).join();
    assert!(join.is_err());
    assert_eq!(*seen.lock(), ["unguarded boom"]);

    handler.detach();

    // Detaching frees the slot for a new handler, as does dropping one.
    let handler = GlobalHandler::attach(make_exception_event(|_exception| true)).unwrap();
    drop(handler);

    assert!(GlobalHandler::attach(make_exception_event(|_exception| true)).is_ok());
}
