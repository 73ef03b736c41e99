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

//! Figures derived from a user's review history.

use serde::Serialize;

use crate::types::day::DayId;
use crate::types::progress::UserProgress;

/// The number of days shown in a year heatmap: 53 weeks.
pub const HEATMAP_DAYS: u32 = 371;

/// The streak as it stands on `today`.
///
/// The stored streak is only updated when a review happens, so a streak that
/// was broken by missing yesterday still shows its old value until then.
/// This reports zero in that case.
pub fn effective_streak(progress: &UserProgress, today: DayId) -> u32 {
    match progress.last_review_day {
        Some(last) if last == today || last == today.yesterday() => progress.current_streak,
        _ => 0,
    }
}

pub fn total_reviews(progress: &UserProgress) -> u64 {
    progress.review_history.values().map(|&n| n as u64).sum()
}

pub fn active_days(progress: &UserProgress) -> usize {
    progress.review_history.values().filter(|&&n| n > 0).count()
}

/// The longest run of consecutive days with at least one review.
pub fn longest_streak(progress: &UserProgress) -> u32 {
    let mut longest = 0;
    let mut run = 0;
    let mut previous: Option<DayId> = None;
    for (&day, &count) in progress.review_history.iter() {
        if count == 0 {
            continue;
        }
        run = match previous {
            Some(prev) if prev == day.yesterday() => run + 1,
            _ => 1,
        };
        longest = longest.max(run);
        previous = Some(day);
    }
    longest
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize)]
pub struct HeatmapCell {
    pub day: DayId,
    pub count: u32,
}

/// One cell per day for the `days` days ending on `end`, oldest first.
/// Days without reviews get a zero count.
pub fn history_window(progress: &UserProgress, end: DayId, days: u32) -> Vec<HeatmapCell> {
    let start = end.add_days(1 - days as i64);
    (0..days as i64)
        .map(|offset| {
            let day = start.add_days(offset);
            HeatmapCell {
                day,
                count: progress.reviews_on(day),
            }
        })
        .collect()
}
