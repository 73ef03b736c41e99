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

use std::collections::BTreeMap;

use serde::Serialize;

use crate::error::Fallible;
use crate::error::fail;
use crate::types::day::DayId;

/// A user's review activity: the running streak and a per-day tally.
#[derive(Clone, PartialEq, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProgress {
    /// Consecutive anchor-timezone days with at least one review.
    pub current_streak: u32,
    /// The day of the most recent review that updated the streak.
    pub last_review_day: Option<DayId>,
    /// Reviews performed on each day.
    pub review_history: BTreeMap<DayId, u32>,
}

impl UserProgress {
    pub fn reviews_on(&self, day: DayId) -> u32 {
        self.review_history.get(&day).copied().unwrap_or(0)
    }

    /// Checks the streak invariants: the streak is zero exactly when there
    /// is no last review day, and the last review day has a history entry.
    pub fn validate(&self) -> Fallible<()> {
        match self.last_review_day {
            None => {
                if self.current_streak != 0 {
                    return fail(format!(
                        "malformed progress: streak of {} with no review day",
                        self.current_streak
                    ));
                }
            }
            Some(day) => {
                if self.current_streak == 0 {
                    return fail(format!(
                        "malformed progress: last reviewed on {day} but streak is zero"
                    ));
                }
                if self.reviews_on(day) == 0 {
                    return fail(format!(
                        "malformed progress: no reviews recorded on last review day {day}"
                    ));
                }
            }
        }
        Ok(())
    }
}
