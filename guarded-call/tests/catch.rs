
use shared::GriefFlavor;

#[test]
fn intercepts_static_message() {
    shared::intercepts_grief(GriefFlavor::StaticMessage);
}

#[test]
fn intercepts_formatted_message() {
    shared::intercepts_grief(GriefFlavor::FormattedMessage);
}

#[test]
fn intercepts_opaque_payload() {
    shared::intercepts_grief(GriefFlavor::OpaquePayload);
}

#[test]
fn intercepts_raised_exception() {
    shared::intercepts_grief(GriefFlavor::RaisedException);
}

#[test]
fn normal_body_skips_handler() {
    let mut called = false;
    let mut finally = false;

    guarded_call::try_catch_finally(|| {}, |_exception| called = true, || finally = true);

    assert!(!called);
    assert!(finally);
}

#[test]
fn captures_message() {
    let mut received = None;
    let mut finally = false;

    guarded_call::try_catch_finally(
        || panic!("boom"),
        |exception| received = Some(exception.description().to_owned()),
        || finally = true,
    );

    assert_eq!(received.as_deref(), Some("boom"));
    assert!(finally);
}

#[test]
fn omitted_cleanup_is_not_an_error() {
    let mut called = false;

    guarded_call::try_catch(|| panic!("boom"), |exception| {
        called = true;
        assert_eq!(exception.description(), "boom");
    });
    assert!(called);

    guarded_call::try_catch(|| {}, |_exception| panic!("body completed normally"));
}

#[test]
fn handler_can_downcast_payload() {
    use grief_generator::{GriefPayload, PAYLOAD_CODE};

    let mut payload = None;

    guarded_call::try_catch(
        || grief_generator::raise_exception(),
        |exception| payload = exception.downcast_ref::<GriefPayload>().copied(),
    );

    assert_eq!(payload, Some(GriefPayload { code: PAYLOAD_CODE }));
}

#[test]
fn nested_guards_do_not_interfere() {
    let mut outer_called = false;
    let mut inner_message = None;
    let mut after_inner = false;

    guarded_call::try_catch(
        || {
            guarded_call::try_catch(
                || panic!("inner"),
                |exception| inner_message = Some(exception.description().to_owned()),
            );
            after_inner = true;
        },
        |_exception| outer_called = true,
    );

    assert_eq!(inner_message.as_deref(), Some("inner"));
    assert!(after_inner);
    assert!(!outer_called);
}
