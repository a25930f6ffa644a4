//! Pure stepping math for the cosmetic animations (score / stat counters,
//! staggered card reveal). Timers live in [`crate::dom`]; this module only
//! decides what value each tick shows.

/// Discrete count-up from 0 to `target` in `steps` ticks.
///
/// Tick `k` (1-based) shows `floor(target * k / steps)`; the final tick always
/// shows exactly `target`.
#[derive(Clone, Debug)]
pub struct CountUp {
    target: u64,
    steps: u32,
    tick: u32,
}

impl CountUp {
    pub fn new(target: u64, steps: u32) -> Self {
        Self { target, steps: steps.max(1), tick: 0 }
    }

    /// Delay between ticks so the whole run lasts `duration_ms`.
    pub fn interval_ms(duration_ms: u32, steps: u32) -> u32 {
        duration_ms / steps.max(1)
    }
}

impl Iterator for CountUp {
    type Item = u64;

    fn next(&mut self) -> Option<u64> {
        if self.tick >= self.steps {
            return None;
        }
        self.tick += 1;
        Some(self.target * u64::from(self.tick) / u64::from(self.steps))
    }
}

/// Delay before card `index` fades in after a render pass.
pub fn card_reveal_delay_ms(index: usize, kickoff_ms: u32, stagger_ms: u32) -> u32 {
    let idx = u32::try_from(index).unwrap_or(u32::MAX);
    kickoff_ms.saturating_add(idx.saturating_mul(stagger_ms))
}

/// Parse a stat counter's final text. Non-numeric text (e.g. `∞`) is not
/// animated.
pub fn parse_stat_target(text: &str) -> Option<u64> {
    text.trim().parse::<u64>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn count_up_ends_on_target() {
        let frames: Vec<u64> = CountUp::new(3, 30).collect();
        assert_eq!(frames.len(), 30);
        assert_eq!(*frames.last().unwrap(), 3);
        assert!(frames.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(frames[0], 0);
    }

    #[test]
    fn count_up_zero_target_and_zero_steps() {
        assert_eq!(CountUp::new(0, 4).collect::<Vec<_>>(), vec![0, 0, 0, 0]);
        assert_eq!(CountUp::new(7, 0).collect::<Vec<_>>(), vec![7]);
    }

    #[test]
    fn interval_splits_duration() {
        assert_eq!(CountUp::interval_ms(1500, 30), 50);
        assert_eq!(CountUp::interval_ms(2000, 60), 33);
    }

    #[test]
    fn stagger_delay_grows_per_card() {
        assert_eq!(card_reveal_delay_ms(0, 10, 50), 10);
        assert_eq!(card_reveal_delay_ms(4, 10, 50), 210);
    }

    #[test]
    fn stat_target_skips_infinity() {
        assert_eq!(parse_stat_target(" 150 "), Some(150));
        assert_eq!(parse_stat_target("∞"), None);
        assert_eq!(parse_stat_target("24/7"), None);
    }
}
