#![allow(clippy::unwrap_used)]

// Property-based checks of emission order and early stop.

use proptest::prelude::*;
use yielder::prelude::*;

fn replay(values: Vec<u16>, stop_at: Option<usize>) -> Yielderable<u16, impl Sequence<u16>> {
    from_fn(move |y| {
        for (index, value) in values.iter().enumerate() {
            if Some(index) == stop_at {
                return y.stop();
            }
            y.emit(*value)?;
        }
        Ok(())
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Property: values arrive in emission order, cut off exactly at the stop point
    #[test]
    fn consumer_sees_emission_prefix(
        values in prop::collection::vec(any::<u16>(), 0..40),
        stop_at in prop::option::of(0..50_usize),
    ) {
        let expected: Vec<u16> = match stop_at {
            Some(stop) => values.iter().copied().take(stop).collect(),
            None => values.clone(),
        };
        let stopped = matches!(stop_at, Some(stop) if stop < values.len());

        let seq = replay(values, stop_at);
        let mut iter = seq.iter();
        let seen: Vec<u16> = iter.by_ref().collect();

        prop_assert_eq!(seen, expected);
        let finish = if stopped { Finish::Stopped } else { Finish::Completed };
        prop_assert_eq!(iter.finish(), Some(finish));
    }

    /// Property: every iteration of the same definition starts over
    #[test]
    fn iterations_are_independent(
        values in prop::collection::vec(any::<u16>(), 1..20),
        partial in 0..20_usize,
    ) {
        let seq = replay(values.clone(), None);

        let mut abandoned = seq.iter();
        for _ in 0..partial.min(values.len()) {
            abandoned.take_next().unwrap();
        }

        let fresh: Vec<u16> = seq.iter().collect();
        prop_assert_eq!(fresh, values);
    }
}
