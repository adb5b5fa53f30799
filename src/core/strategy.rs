//! Gap-detection strategies.
//!
//! A [`DeltaStrategy`] is fed every detected timestamp in arrival order and
//! answers one question per call: is the gap since the previous timestamp
//! large enough to separate? Its state lives only inside the value and starts
//! fresh for every run.
//!
//! | Variant | Decision |
//! |---------|----------|
//! | [`FixedThreshold`] | `delta > limit` |
//! | [`AdaptiveThreshold`] | always `false` (experimental, see below) |
//!
//! # Known limitations
//!
//! Deltas are signed. Out-of-order lines and clock-only timestamps wrapping
//! past midnight produce negative deltas, which never exceed a non-negative
//! threshold and therefore never separate. A negative threshold is allowed
//! and makes every timestamp after the first separate, unless it steps back
//! further than the threshold.
//!
//! The adaptive strategy tracks an exponential moving average of gaps but
//! does not yet act on it: its decision is always `false`, so selecting it
//! suppresses every separator.

use chrono::TimeDelta;
use tracing::{debug, trace, warn};

use crate::config::{DeltaConfig, StrategyKind};
use crate::parsing::ParsedInstant;

/// Smoothing factor of the adaptive moving average.
pub const ADAPTIVE_SMOOTHING: f64 = 0.1;

fn delta_nanos(delta: TimeDelta) -> f64 {
    delta
        .num_nanoseconds()
        .map_or_else(|| delta.num_milliseconds() as f64 * 1e6, |n| n as f64)
}

/// Separates when the gap exceeds a fixed limit.
#[derive(Debug, Clone)]
pub struct FixedThreshold {
    limit: TimeDelta,
    previous: Option<ParsedInstant>,
    observations: usize,
}

impl FixedThreshold {
    /// Creates a strategy that separates gaps strictly longer than `limit`.
    pub fn new(limit: TimeDelta) -> Self {
        Self {
            limit,
            previous: None,
            observations: 0,
        }
    }

    /// The configured limit.
    pub fn limit(&self) -> TimeDelta {
        self.limit
    }

    /// Records `instant`; `true` if it lies more than the limit after the
    /// previous one.
    pub fn decide(&mut self, instant: ParsedInstant) -> bool {
        self.observations += 1;
        let Some(previous) = self.previous.replace(instant) else {
            return false;
        };

        let delta = instant - previous;
        let large = delta > self.limit;
        if large {
            trace!(delta_ms = delta.num_milliseconds(), "gap exceeds threshold");
        }
        large
    }
}

/// Tracks an exponential moving average of gaps.
///
/// The average is reported in debug diagnostics but is not yet used as a
/// threshold: [`decide`](Self::decide) always returns `false`.
#[derive(Debug, Clone, Default)]
pub struct AdaptiveThreshold {
    previous: Option<ParsedInstant>,
    observations: usize,
    // Nanoseconds; set from the second observation on.
    running_mean: Option<f64>,
}

impl AdaptiveThreshold {
    /// Creates a strategy with no observations and no average.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current moving average, available after two observations.
    pub fn running_mean(&self) -> Option<TimeDelta> {
        self.running_mean
            .map(|mean| TimeDelta::nanoseconds(mean.round() as i64))
    }

    /// Records `instant` and folds its gap into the average. Always `false`.
    pub fn decide(&mut self, instant: ParsedInstant) -> bool {
        self.observations += 1;
        let Some(previous) = self.previous.replace(instant) else {
            return false;
        };

        let delta = delta_nanos(instant - previous);
        let mean = match self.running_mean {
            None => delta,
            Some(mean) => mean + (delta - mean) * ADAPTIVE_SMOOTHING,
        };
        self.running_mean = Some(mean);

        debug!(
            delta_ms = delta / 1e6,
            mean_ms = mean / 1e6,
            "adaptive threshold update"
        );
        false
    }
}

/// The gap-detection policy for one run.
#[derive(Debug, Clone)]
pub enum DeltaStrategy {
    /// See [`FixedThreshold`].
    Fixed(FixedThreshold),
    /// See [`AdaptiveThreshold`].
    Adaptive(AdaptiveThreshold),
}

impl DeltaStrategy {
    /// Fixed strategy with the given limit.
    pub fn fixed(limit: TimeDelta) -> Self {
        DeltaStrategy::Fixed(FixedThreshold::new(limit))
    }

    /// Adaptive strategy. Never separates.
    pub fn adaptive() -> Self {
        DeltaStrategy::Adaptive(AdaptiveThreshold::new())
    }

    /// Builds the strategy selected by `config`.
    pub fn from_config(config: &DeltaConfig) -> Self {
        match config.strategy {
            StrategyKind::Fixed => Self::fixed(config.threshold),
            StrategyKind::Adaptive => {
                warn!("adaptive threshold is experimental and never inserts separators");
                Self::adaptive()
            }
        }
    }

    /// Records `instant` and returns `true` if the gap since the previous
    /// instant calls for a separator.
    pub fn decide(&mut self, instant: ParsedInstant) -> bool {
        match self {
            DeltaStrategy::Fixed(fixed) => fixed.decide(instant),
            DeltaStrategy::Adaptive(adaptive) => adaptive.decide(instant),
        }
    }

    /// Which variant this is.
    pub fn kind(&self) -> StrategyKind {
        match self {
            DeltaStrategy::Fixed(_) => StrategyKind::Fixed,
            DeltaStrategy::Adaptive(_) => StrategyKind::Adaptive,
        }
    }

    /// Number of instants seen so far.
    pub fn observations(&self) -> usize {
        match self {
            DeltaStrategy::Fixed(fixed) => fixed.observations,
            DeltaStrategy::Adaptive(adaptive) => adaptive.observations,
        }
    }

    /// The most recent instant, if any.
    pub fn previous(&self) -> Option<ParsedInstant> {
        match self {
            DeltaStrategy::Fixed(fixed) => fixed.previous,
            DeltaStrategy::Adaptive(adaptive) => adaptive.previous,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime};

    fn at_ms(ms: u32) -> ParsedInstant {
        let time = NaiveTime::from_hms_milli_opt(12, 0, 0, 0).unwrap()
            + TimeDelta::milliseconds(i64::from(ms));
        NaiveDate::default().and_time(time)
    }

    // =========================================================================
    // Fixed
    // =========================================================================

    #[test]
    fn test_fixed_first_call_never_separates() {
        let mut strategy = DeltaStrategy::fixed(TimeDelta::zero());
        assert!(!strategy.decide(at_ms(0)));
        assert_eq!(strategy.observations(), 1);
        assert_eq!(strategy.previous(), Some(at_ms(0)));
    }

    #[test]
    fn test_fixed_strictly_greater() {
        let mut strategy = DeltaStrategy::fixed(TimeDelta::milliseconds(100));
        strategy.decide(at_ms(0));
        assert!(!strategy.decide(at_ms(100)), "equal to limit must not separate");
        assert!(strategy.decide(at_ms(201)));
        assert!(!strategy.decide(at_ms(250)));
    }

    #[test]
    fn test_fixed_negative_delta_updates_previous() {
        let mut strategy = DeltaStrategy::fixed(TimeDelta::milliseconds(100));
        strategy.decide(at_ms(5_000));
        assert!(!strategy.decide(at_ms(0)));
        assert_eq!(strategy.previous(), Some(at_ms(0)));
        // Measured from the out-of-order instant, not the earlier maximum.
        assert!(strategy.decide(at_ms(500)));
    }

    #[test]
    fn test_fixed_midnight_wraparound_does_not_separate() {
        let mut strategy = DeltaStrategy::fixed(TimeDelta::milliseconds(100));
        let before = NaiveDate::default().and_hms_opt(23, 59, 59).unwrap();
        let after = NaiveDate::default().and_hms_opt(0, 0, 5).unwrap();
        strategy.decide(before);
        assert!(!strategy.decide(after));
    }

    #[test]
    fn test_fixed_negative_limit_separates_after_first() {
        let mut strategy = DeltaStrategy::fixed(TimeDelta::seconds(-5));
        assert!(!strategy.decide(at_ms(0)), "first instant has nothing to compare");
        assert!(strategy.decide(at_ms(0)), "zero gap exceeds a negative limit");
        assert!(strategy.decide(at_ms(10)));
        assert!(strategy.decide(at_ms(5)), "small step back is still above -5s");
    }

    #[test]
    fn test_fixed_negative_limit_long_step_back() {
        let mut strategy = DeltaStrategy::fixed(TimeDelta::seconds(-5));
        strategy.decide(at_ms(10_000));
        assert!(!strategy.decide(at_ms(0)), "a 10s step back is below -5s");
    }

    #[test]
    fn test_fixed_limit_accessor() {
        let fixed = FixedThreshold::new(TimeDelta::milliseconds(250));
        assert_eq!(fixed.limit(), TimeDelta::milliseconds(250));
    }

    // =========================================================================
    // Adaptive
    // =========================================================================

    #[test]
    fn test_adaptive_mean_progression() {
        let mut adaptive = AdaptiveThreshold::new();
        assert!(!adaptive.decide(at_ms(0)));
        assert_eq!(adaptive.running_mean(), None);

        assert!(!adaptive.decide(at_ms(100)));
        assert_eq!(adaptive.running_mean(), Some(TimeDelta::milliseconds(100)));

        // 100 + (1100 - 100) * 0.1 = 200
        assert!(!adaptive.decide(at_ms(1_200)));
        assert_eq!(adaptive.running_mean(), Some(TimeDelta::milliseconds(200)));
    }

    #[test]
    fn test_adaptive_never_separates() {
        let mut strategy = DeltaStrategy::adaptive();
        let mut t = 0;
        for step in [10, 60_000, 1, 3_600_000, 5] {
            t += step;
            assert!(!strategy.decide(at_ms(t)));
        }
        assert_eq!(strategy.observations(), 5);
    }

    // =========================================================================
    // Construction
    // =========================================================================

    #[test]
    fn test_from_config() {
        let fixed = DeltaStrategy::from_config(&DeltaConfig::default());
        assert_eq!(fixed.kind(), StrategyKind::Fixed);

        let adaptive = DeltaStrategy::from_config(&DeltaConfig::new().with_adaptive(true));
        assert_eq!(adaptive.kind(), StrategyKind::Adaptive);
        assert_eq!(adaptive.observations(), 0);
        assert_eq!(adaptive.previous(), None);
    }
}
