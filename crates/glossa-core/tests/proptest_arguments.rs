// crates/glossa-core/tests/proptest_arguments.rs
// ============================================================================
// Module: Argument Property Tests
// Description: Property checks for argument normalization and identity.
// Purpose: Exercise dispatch over arbitrary argument values.
// Dependencies: glossa-core, proptest
// ============================================================================

//! ## Overview
//! Property-based checks that rendering depends only on argument values and
//! that proxy identity is stable.

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

use common::Player;
use glossa_core::Arguments;
use glossa_core::arguments;
use proptest::prelude::*;

proptest! {
    /// Tests rendered score reflects arguments.
    #[test]
    fn rendered_score_reflects_arguments(name in "[a-z]{1,12}", points in any::<i64>()) {
        let (localizer, probe) = common::fixture();
        let rendered = localizer
            .proxy()
            .call("score", Some(arguments![Player::new(&name), points]))
            .expect("score")
            .into_rendered()
            .expect("rendered");

        prop_assert_eq!(rendered, format!("{name} scored {points}"));
        prop_assert!(probe.deliveries().is_empty());
    }

    /// Tests normalization preserves arguments.
    #[test]
    fn normalization_preserves_arguments(values in proptest::collection::vec(any::<u32>(), 0..8)) {
        let args: Arguments = values.iter().copied().map(glossa_core::Argument::new).collect();
        let normalized = Arguments::normalize(Some(args.clone()));

        prop_assert_eq!(normalized.len(), values.len());
        prop_assert_eq!(normalized.is_shared_empty(), values.is_empty());
        for (index, value) in values.iter().enumerate() {
            prop_assert_eq!(normalized.get(index).and_then(|a| a.downcast_ref::<u32>()), Some(value));
        }
    }

    /// Tests proxy count never changes identity.
    #[test]
    fn proxy_count_never_changes_identity(count in 1usize..16) {
        let (localizer, _) = common::fixture();
        let proxies: Vec<_> = (0..count).map(|_| localizer.proxy()).collect();

        for proxy in &proxies {
            prop_assert_eq!(proxy.hash_code(), localizer.hash_code());
            prop_assert_eq!(proxy, &proxies[0]);
        }
    }
}
