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

use crate::types::day::DayId;
use crate::types::progress::UserProgress;

/// What a review did to the streak.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum StreakChange {
    /// Another review on the day the streak was last updated.
    SameDay,
    /// The first review on the day after the last review day.
    Continued,
    /// The first review after a gap, or the first review ever.
    Reset,
}

/// Classifies a review on `review_day` against the last review day.
pub fn classify(last_review_day: Option<DayId>, review_day: DayId) -> StreakChange {
    match last_review_day {
        Some(last) if last == review_day => StreakChange::SameDay,
        Some(last) if last == review_day.yesterday() => StreakChange::Continued,
        _ => StreakChange::Reset,
    }
}

/// Records one review on `review_day`, returning the updated progress.
///
/// The day's tally always goes up by one. The streak only moves on the first
/// review of a new day: it grows by one if the previous review was
/// yesterday, and restarts at one otherwise.
///
/// There is no current-instant argument: the rule only looks at the review
/// day, which the caller has already derived from its instant.
pub fn record_review(progress: &UserProgress, review_day: DayId) -> UserProgress {
    let mut next = progress.clone();
    *next.review_history.entry(review_day).or_insert(0) += 1;
    match classify(progress.last_review_day, review_day) {
        StreakChange::SameDay => {}
        StreakChange::Continued => {
            next.current_streak = progress.current_streak.saturating_add(1);
            next.last_review_day = Some(review_day);
        }
        StreakChange::Reset => {
            if let Some(last) = progress.last_review_day {
                if review_day < last {
                    log::warn!(
                        "Review on {review_day} predates the last review on {last}; restarting streak."
                    );
                }
            }
            next.current_streak = 1;
            next.last_review_day = Some(review_day);
        }
    }
    next
}
