//! Property-based tests for the interference checker using proptest.
//!
//! These tests verify invariants that should hold for *any* schedule, not just
//! the fixed scenarios in `interference_tests.rs`.

use alarm_guard::{Alarm, GuardConfig, InterferenceChecker, Repetition};
use chrono::{Duration, NaiveDate, NaiveDateTime};
use proptest::prelude::*;

// ---------------------------------------------------------------------------
// Strategies
// ---------------------------------------------------------------------------

/// Generate a minute-precise start in the 2024-2026 range.
/// Day is capped at 28 to avoid invalid month/day combos.
fn arb_start() -> impl Strategy<Value = NaiveDateTime> {
    (2024i32..=2026, 1u32..=12, 1u32..=28, 0u32..=23, 0u32..=59).prop_map(|(y, m, d, h, min)| {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    })
}

/// Light-alarm lead-in between 0 and 2 hours.
fn arb_light() -> impl Strategy<Value = Duration> {
    (0i64..=120).prop_map(Duration::minutes)
}

fn arb_repetition() -> impl Strategy<Value = Repetition> {
    prop_oneof![
        Just(Repetition::None),
        Just(Repetition::Daily),
        Just(Repetition::Weekly),
        Just(Repetition::Monthly),
    ]
}

/// Repetitions whose steps are fixed lengths, so translating the anchor
/// translates every occurrence by the same amount.
fn arb_fixed_step_repetition() -> impl Strategy<Value = Repetition> {
    prop_oneof![
        Just(Repetition::None),
        Just(Repetition::Daily),
        Just(Repetition::Weekly),
    ]
}

/// Offset of a proposal relative to a scheduled alarm, within three days.
fn arb_offset() -> impl Strategy<Value = Duration> {
    (-4320i64..=4320).prop_map(Duration::minutes)
}

fn arb_alarm() -> impl Strategy<Value = Alarm> {
    (arb_start(), arb_light(), any::<bool>(), arb_repetition()).prop_map(
        |(start, light, enabled, repetition)| {
            Alarm::new(start)
                .with_light_alarm(light)
                .unwrap()
                .light_alarm_enabled(enabled)
                .repeating(repetition)
        },
    )
}

fn config() -> ProptestConfig {
    ProptestConfig {
        cases: 256,
        ..ProptestConfig::default()
    }
}

fn checker() -> InterferenceChecker {
    InterferenceChecker::new(GuardConfig::default())
}

// ---------------------------------------------------------------------------
// Property 1: Verdict is invariant under translating everything together
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn translation_symmetry(
        anchor in arb_start(),
        scheduled_light in arb_light(),
        repetition in arb_fixed_step_repetition(),
        offset in arb_offset(),
        proposed_light in arb_light(),
        shift_minutes in -100_000i64..=100_000,
    ) {
        let shift = Duration::minutes(shift_minutes);
        let alarm = Alarm::new(anchor)
            .with_light_alarm(scheduled_light)
            .unwrap()
            .repeating(repetition);
        let moved = alarm.rescheduled(anchor + shift);

        let before = checker().interferes(anchor + offset, proposed_light, &[alarm], None);
        let after = checker().interferes(anchor + offset + shift, proposed_light, &[moved], None);
        prop_assert_eq!(before, after);
    }
}

// ---------------------------------------------------------------------------
// Property 2: Calling twice gives the same answer
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn idempotent(
        scheduled in prop::collection::vec(arb_alarm(), 0..6),
        start in arb_start(),
        light in arb_light(),
    ) {
        let c = checker();
        let first = c.interferes(start, light, &scheduled, None);
        let second = c.interferes(start, light, &scheduled, None);
        prop_assert_eq!(first, second);
        prop_assert_eq!(first, c.first_conflict(start, light, &scheduled, None).is_some());
        prop_assert_eq!(first, !c.conflicts(start, light, &scheduled, None).is_empty());
    }
}

// ---------------------------------------------------------------------------
// Property 3: An alarm never conflicts with itself while being edited,
// but an identical twin with a different id always does
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn self_exclusion(alarm in arb_alarm(), proposed_light in arb_light()) {
        let id = alarm.id();
        let twin = alarm.clone().with_id(alarm_guard::AlarmId::new());

        prop_assert!(!checker().interferes(alarm.start(), proposed_light, &[alarm.clone()], Some(&id)));
        prop_assert!(checker().interferes(alarm.start(), proposed_light, &[alarm, twin], Some(&id)));
    }
}

// ---------------------------------------------------------------------------
// Property 4: Buffer boundary is exact for any configured buffer
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn buffer_boundary(t in arb_start(), buffer_minutes in 1i64..=30) {
        let buffer = Duration::minutes(buffer_minutes);
        let c = InterferenceChecker::new(GuardConfig::default().with_buffer(buffer));
        let scheduled = [Alarm::new(t)];

        prop_assert!(!c.interferes(t + buffer, Duration::zero(), &scheduled, None));
        prop_assert!(c.interferes(t + buffer - Duration::minutes(1), Duration::zero(), &scheduled, None));
        prop_assert!(!c.interferes(t - buffer, Duration::zero(), &scheduled, None));
        prop_assert!(c.interferes(t - buffer + Duration::minutes(1), Duration::zero(), &scheduled, None));
    }
}

// ---------------------------------------------------------------------------
// Property 5: A proposal spanning the whole buffer window always collides
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn exact_collision_detected(alarm in arb_alarm()) {
        let buffer = GuardConfig::default().alarm_start_buffer;
        let t = alarm.start();
        // Requested range runs from T - buffer through T + buffer.
        prop_assert!(checker().interferes(t + buffer, buffer * 2, &[alarm], None));
    }
}

// ---------------------------------------------------------------------------
// Property 6: Nothing is generated beyond the horizon
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn horizon_cutoff(
        anchor in arb_start(),
        scheduled_light in arb_light(),
        repetition in arb_repetition(),
        proposed_light in arb_light(),
        extra_minutes in 0i64..=100_000,
    ) {
        let alarm = Alarm::new(anchor)
            .with_light_alarm(scheduled_light)
            .unwrap()
            .repeating(repetition);
        // Beyond 53 weeks, 366 days and 12 months, plus room for both lead-ins.
        let proposed = anchor + Duration::days(372) + Duration::hours(5) + Duration::minutes(extra_minutes);

        prop_assert!(!checker().interferes(proposed, proposed_light, &[alarm], None));
    }
}
