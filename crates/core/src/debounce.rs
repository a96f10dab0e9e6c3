//! Commit delay for cart quantity inputs.
//!
//! A quantity change is held back briefly so that a customer typing "12"
//! does not first commit "1". The delay grows with signals that more input is
//! coming (multi-digit entry, fast keystrokes, touch keyboards) and shrinks
//! for stepper clicks and deliberate typing. It is always within
//! `0..=MAX_DELAY_MS`.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Upper bound for the commit delay.
pub const MAX_DELAY_MS: u64 = 200;

const STEPPER_BASE_MS: i64 = 60;
const TYPED_BASE_MS: i64 = 120;
const MULTI_DIGIT_BONUS_MS: i64 = 40;
const MOBILE_BONUS_MS: i64 = 30;
const FAST_TYPING_BONUS_MS: i64 = 30;
const SLOW_TYPING_RELIEF_MS: i64 = 40;
const LARGE_CHANGE_BONUS_MS: i64 = 20;

const FAST_KEYSTROKE_MS: u64 = 150;
const SLOW_KEYSTROKE_MS: u64 = 600;
const LARGE_CHANGE: u64 = 10;

/// Kind of device the change came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Device {
    #[default]
    Desktop,
    Mobile,
}

/// A pending quantity change and the signals around it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuantityInput {
    /// Quantity currently committed on the cart line.
    pub previous: u32,
    /// Quantity the customer asked for.
    pub requested: u32,
    /// Number of characters in the input field.
    pub input_len: usize,
    /// Device the change came from.
    pub device: Device,
    /// Milliseconds since the previous keystroke, if known.
    pub keystroke_interval_ms: Option<u64>,
}

/// How long to wait before committing `input`.
#[must_use]
pub fn commit_delay(input: &QuantityInput) -> Duration {
    Duration::from_millis(commit_delay_ms(input))
}

fn commit_delay_ms(input: &QuantityInput) -> u64 {
    if input.requested == 0 {
        return 0;
    }

    let delta = u64::from(input.requested.abs_diff(input.previous));

    let mut delay = if delta == 1 && input.input_len <= 1 {
        STEPPER_BASE_MS
    } else {
        TYPED_BASE_MS
    };

    if input.input_len >= 2 {
        delay += MULTI_DIGIT_BONUS_MS;
    }

    if input.device == Device::Mobile {
        delay += MOBILE_BONUS_MS;
    }

    match input.keystroke_interval_ms {
        Some(ms) if ms < FAST_KEYSTROKE_MS => delay += FAST_TYPING_BONUS_MS,
        Some(ms) if ms > SLOW_KEYSTROKE_MS => delay -= SLOW_TYPING_RELIEF_MS,
        _ => {}
    }

    if delta >= LARGE_CHANGE {
        delay += LARGE_CHANGE_BONUS_MS;
    }

    u64::try_from(delay).map_or(0, |ms| ms.min(MAX_DELAY_MS))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(previous: u32, requested: u32, input_len: usize) -> QuantityInput {
        QuantityInput {
            previous,
            requested,
            input_len,
            device: Device::Desktop,
            keystroke_interval_ms: None,
        }
    }

    #[test]
    fn test_removal_commits_immediately() {
        assert_eq!(commit_delay(&input(5, 0, 1)), Duration::ZERO);
    }

    #[test]
    fn test_stepper_click_is_quick() {
        assert_eq!(commit_delay(&input(2, 3, 1)), Duration::from_millis(60));
    }

    #[test]
    fn test_typed_single_digit() {
        assert_eq!(commit_delay(&input(1, 5, 1)), Duration::from_millis(120));
    }

    #[test]
    fn test_multi_digit_typing_waits_longer() {
        assert_eq!(commit_delay(&input(1, 12, 2)), Duration::from_millis(180));
    }

    #[test]
    fn test_mobile_fast_typing_is_clamped() {
        let q = QuantityInput {
            previous: 1,
            requested: 25,
            input_len: 2,
            device: Device::Mobile,
            keystroke_interval_ms: Some(80),
        };
        // 120 + 40 + 30 + 30 + 20 = 240, clamped
        assert_eq!(commit_delay(&q), Duration::from_millis(MAX_DELAY_MS));
    }

    #[test]
    fn test_slow_typing_shortens_delay() {
        let q = QuantityInput {
            keystroke_interval_ms: Some(900),
            ..input(2, 3, 1)
        };
        assert_eq!(commit_delay(&q), Duration::from_millis(20));
    }

    #[test]
    fn test_delay_always_in_bounds() {
        for previous in [0, 1, 5, 50] {
            for requested in [0, 1, 2, 9, 10, 99] {
                for input_len in [0, 1, 2, 3] {
                    for device in [Device::Desktop, Device::Mobile] {
                        for interval in [None, Some(10), Some(300), Some(5000)] {
                            let q = QuantityInput {
                                previous,
                                requested,
                                input_len,
                                device,
                                keystroke_interval_ms: interval,
                            };
                            assert!(commit_delay(&q) <= Duration::from_millis(MAX_DELAY_MS));
                        }
                    }
                }
            }
        }
    }
}
