// crates/glossa-core/tests/default_methods.rs
// ============================================================================
// Module: Default Method Tests
// Description: Delegation of default-bodied methods and the escape hatch.
// Purpose: Validate that bodies run verbatim and bypass the pipeline.
// Dependencies: glossa-core
// ============================================================================

//! ## Overview
//! Default bodies run through the process-wide invocation strategy; their
//! results and failures reach the caller unchanged.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only output and panic-based assertions are permitted."
)]

mod common;

use std::sync::atomic::Ordering;

use common::Player;
use glossa_core::Arguments;
use glossa_core::DefaultCall;
use glossa_core::DispatchError;
use glossa_core::InvocationStrategy;
use glossa_core::LookupInvocation;
use glossa_core::MethodSignature;
use glossa_core::Outcome;
use glossa_core::ReturnKind;
use glossa_core::UnboundInvocation;
use glossa_core::arguments;
use glossa_core::capability;

/// Tests default body result is returned verbatim.
#[test]
fn default_body_result_is_returned_verbatim() {
    let (localizer, probe) = common::fixture();

    let value = localizer.proxy().call("greet", None).expect("greet").into_value().expect("value");

    assert_eq!(value.downcast_ref::<String>().map(String::as_str), Some("hi"));
    assert_eq!(probe.total(), 0);
}

/// Tests default body sees normalized arguments.
#[test]
fn default_body_sees_normalized_arguments() {
    let (localizer, _) = common::fixture();
    let proxy = localizer.proxy();

    let absent = proxy.call("echo_count", None).expect("absent").into_value().expect("value");
    let given =
        proxy.call("echo_count", Some(arguments![9_u8])).expect("given").into_value().expect("value");

    assert_eq!(absent.downcast_ref::<usize>(), Some(&0));
    assert_eq!(given.downcast_ref::<usize>(), Some(&1));
}

/// Tests default body error propagates unchanged.
#[test]
fn default_body_error_propagates_unchanged() {
    let (localizer, probe) = common::fixture();

    let err = localizer.proxy().call("explode", None).unwrap_err();

    match err {
        DispatchError::Body(inner) => {
            let io = inner.downcast_ref::<std::io::Error>().expect("io error");
            assert_eq!(io.to_string(), "body exploded");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(probe.total(), 0);
}

/// Tests default body can call back through the proxy.
#[test]
fn default_body_can_call_back_through_the_proxy() {
    let (localizer, probe) = common::fixture();
    let grace = Player::new("grace");

    let outcome =
        localizer.proxy().call("announce", Some(arguments![grace.clone()])).expect("announce");

    assert!(matches!(outcome, Outcome::Value(None)));
    assert_eq!(probe.deliveries(), vec![(grace, "Welcome, grace!".to_string())]);
    assert_eq!(probe.send.load(Ordering::SeqCst), 1);
}

/// Tests strategies agree on contract bodies.
#[test]
fn strategies_agree_on_contract_bodies() {
    let (localizer, _) = common::fixture();
    let proxy = localizer.proxy();
    let greet = common::method(&localizer, "greet");
    let args = Arguments::empty();

    for strategy in [&UnboundInvocation as &dyn InvocationStrategy, &LookupInvocation as &dyn InvocationStrategy] {
        let value = strategy
            .invoke(DefaultCall {
                contract: localizer.contract(),
                method: &greet,
                proxy: &proxy,
                args: &args,
            })
            .expect("greet")
            .expect("value");
        assert_eq!(value.downcast_ref::<String>().map(String::as_str), Some("hi"));
    }
}

/// Tests both strategies reject signatures the contract does not declare.
#[test]
fn both_strategies_reject_signatures_the_contract_does_not_declare() {
    let (localizer, probe) = common::fixture();
    let proxy = localizer.proxy();
    let stranger = MethodSignature::new("wave", ReturnKind::Text).with_default(|_, _| Ok(None));
    let args = Arguments::empty();
    let call = DefaultCall {
        contract: localizer.contract(),
        method: &stranger,
        proxy: &proxy,
        args: &args,
    };
    let strategies = [&LookupInvocation as &dyn InvocationStrategy, &UnboundInvocation];

    for strategy in strategies {
        assert!(matches!(
            strategy.invoke(call),
            Err(DispatchError::DefaultBodyUnavailable { .. })
        ));
    }
    assert_eq!(probe.total(), 0);
}

/// Tests proxy rejects undeclared default bodied methods.
#[test]
fn proxy_rejects_undeclared_default_bodied_methods() {
    let (localizer, probe) = common::fixture();
    let stranger = MethodSignature::new("wave", ReturnKind::Text)
        .with_default(|_, _| Ok(Some(glossa_core::Argument::new(String::from("hi")))));

    let err = localizer.proxy().invoke(&stranger, None).unwrap_err();

    assert!(matches!(
        err,
        DispatchError::UnknownMethod { ref contract, ref method }
            if contract == "Greetings" && method.starts_with("wave(")
    ));
    assert_eq!(probe.total(), 0);
}

/// Tests localizer uses the process strategy.
#[test]
fn localizer_uses_the_process_strategy() {
    let (first, _) = common::fixture();
    let (second, _) = common::fixture();

    assert_eq!(first.invocation_kind(), capability::selected_kind());
    assert_eq!(first.invocation_kind(), second.invocation_kind());
}

// ============================================================================
// SECTION: Escape Hatch
// ============================================================================

/// Tests controller accessor returns the localizer.
#[test]
fn controller_accessor_returns_the_localizer() {
    let (localizer, probe) = common::fixture();

    let controller = localizer
        .proxy()
        .call("localizer", None)
        .expect("localizer")
        .into_controller()
        .expect("controller");

    assert!(controller.same_controller(&localizer));
    assert_eq!(controller.id(), localizer.id());
    assert_eq!(probe.total(), 0);
}

/// Tests controller accessor ignores arguments.
#[test]
fn controller_accessor_ignores_arguments() {
    let (localizer, probe) = common::fixture();

    let outcome =
        localizer.proxy().call("localizer", Some(arguments![Player::new("h")])).expect("localizer");

    assert!(matches!(
        outcome,
        Outcome::Controller(ref controller) if controller.same_controller(&localizer)
    ));
    assert_eq!(probe.total(), 0);
}
