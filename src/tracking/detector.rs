// src/tracking/detector.rs
use crate::types::{FocusSample, ProbeOutcome};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition<'a> {
    /// Probe had nothing to report; keep whatever is open.
    Ignore,
    /// Same application and window as the open interval.
    Continue,
    /// First known sample, nothing open yet.
    Begin(&'a FocusSample),
    /// Application or window label changed.
    Switch(&'a FocusSample),
}

impl Transition<'_> {
    pub fn opens_interval(&self) -> bool {
        matches!(self, Transition::Begin(_) | Transition::Switch(_))
    }
}

/// Compares the newest probe result with the sample that opened the current
/// interval. Both fields must match exactly for the activity to continue, so
/// a browser tab change inside the same browser is a switch.
pub fn detect<'a>(current: Option<&FocusSample>, outcome: &'a ProbeOutcome) -> Transition<'a> {
    let Some(sample) = outcome.sample() else {
        return Transition::Ignore;
    };
    match current {
        None => Transition::Begin(sample),
        Some(open) if open == sample => Transition::Continue,
        Some(_) => Transition::Switch(sample),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::unavailable;
    use proptest::prelude::*;

    #[test]
    fn first_known_sample_begins() {
        let outcome = ProbeOutcome::known("VSCode", "VSCode - main.py");
        assert_eq!(detect(None, &outcome), Transition::Begin(outcome.sample().unwrap()));
    }

    #[test]
    fn identical_sample_continues() {
        let open = FocusSample::new("VSCode", "VSCode - main.py");
        let outcome = ProbeOutcome::known("VSCode", "VSCode - main.py");
        assert_eq!(detect(Some(&open), &outcome), Transition::Continue);
    }

    #[test]
    fn label_change_within_same_app_switches() {
        let open = FocusSample::new("Google Chrome", "Chrome - https://docs.rs");
        let outcome = ProbeOutcome::known("Google Chrome", "Chrome - https://youtube.com");
        assert!(matches!(detect(Some(&open), &outcome), Transition::Switch(_)));
    }

    #[test]
    fn unknown_sample_is_ignored_with_or_without_open_interval() {
        let open = FocusSample::new("A", "A");
        assert_eq!(detect(Some(&open), &unavailable()), Transition::Ignore);
        assert_eq!(detect(None, &unavailable()), Transition::Ignore);
    }

    fn outcome_strategy() -> impl Strategy<Value = ProbeOutcome> {
        prop_oneof![
            1 => Just(unavailable()),
            4 => (0..3u8, 0..2u8).prop_map(|(app, win)| {
                ProbeOutcome::known(format!("app{app}"), format!("win{win}"))
            }),
        ]
    }

    proptest! {
        #[test]
        fn opened_intervals_match_changes_among_known_samples(
            outcomes in prop::collection::vec(outcome_strategy(), 0..60)
        ) {
            let mut current: Option<FocusSample> = None;
            let mut opened = 0usize;
            for outcome in &outcomes {
                let transition = detect(current.as_ref(), outcome);
                if transition.opens_interval() {
                    opened += 1;
                }
                if let Transition::Begin(s) | Transition::Switch(s) = transition {
                    current = Some(s.clone());
                }
            }

            let known: Vec<&FocusSample> =
                outcomes.iter().filter_map(ProbeOutcome::sample).collect();
            let expected = known
                .iter()
                .enumerate()
                .filter(|(i, s)| *i == 0 || known[i - 1] != **s)
                .count();
            prop_assert_eq!(opened, expected);
        }
    }
}
