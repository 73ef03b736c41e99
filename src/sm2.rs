// Copyright 2025 Fernando Borretti
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! The SM-2 review spacing rule.

use crate::calendar::Calendar;
use crate::types::card_state::CardState;
use crate::types::card_state::MIN_EASINESS;
use crate::types::quality::Quality;
use crate::types::timestamp::Timestamp;

/// The change in easiness factor for a successful review of the given
/// quality: +0.1 for a perfect recall, 0.0 at 4, -0.14 at 3.
pub fn easiness_delta(quality: Quality) -> f64 {
    let miss = (Quality::MAX.value() - quality.value()) as f64;
    0.1 - miss * (0.08 + miss * 0.02)
}

/// The easiness factor after a successful review, floored at 1.3.
pub fn next_easiness(easiness_factor: f64, quality: Quality) -> f64 {
    (easiness_factor + easiness_delta(quality)).max(MIN_EASINESS)
}

/// The interval in days for a card that has just reached `repetitions`
/// consecutive successes.
pub fn next_interval(repetitions: u32, previous_interval: u32, easiness_factor: f64) -> u32 {
    let days = match repetitions {
        0 | 1 => 1.0,
        2 => (1.0 * easiness_factor).round(),
        _ => (previous_interval as f64 * easiness_factor).round(),
    };
    // Float-to-int casts saturate, so huge intervals pin at u32::MAX.
    (days as u32).max(1)
}

/// Computes a card's next state after a review of quality `quality` at
/// instant `now`.
///
/// A failed recall (quality below 3) resets the repetition count and the
/// interval but leaves the easiness factor alone.
pub fn schedule(
    calendar: &Calendar,
    state: &CardState,
    quality: Quality,
    now: Timestamp,
) -> CardState {
    let (easiness_factor, repetitions, interval) = if quality.is_passing() {
        let easiness_factor = next_easiness(state.easiness_factor, quality);
        let repetitions = state.repetitions.saturating_add(1);
        let interval = next_interval(repetitions, state.interval, easiness_factor);
        (easiness_factor, repetitions, interval)
    } else {
        (state.easiness_factor, 0, 1)
    };
    let today = calendar.day_of(now);
    CardState {
        easiness_factor,
        repetitions,
        interval,
        due_day: calendar.add_days(today, interval as i64),
    }
}
