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

use serde::Serialize;

use crate::error::Fallible;
use crate::error::fail;
use crate::types::day::DayId;

/// The easiness factor given to new cards.
pub const DEFAULT_EASINESS: f64 = 2.5;

/// The easiness factor never drops below this.
pub const MIN_EASINESS: f64 = 1.3;

/// A card's repetition state: the four fields the scheduler reads and
/// writes. Each review produces a new value; nothing is mutated in place.
#[derive(Clone, Copy, PartialEq, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CardState {
    /// Multiplier controlling how fast intervals grow.
    pub easiness_factor: f64,
    /// Consecutive successful reviews since the last failure.
    pub repetitions: u32,
    /// Days between the last review and the due day.
    pub interval: u32,
    /// The day the card becomes eligible for review.
    pub due_day: DayId,
}

impl CardState {
    /// The state of a freshly logged card: due on the day it was created.
    pub fn new(created_on: DayId) -> Self {
        Self {
            easiness_factor: DEFAULT_EASINESS,
            repetitions: 0,
            interval: 1,
            due_day: created_on,
        }
    }

    pub fn is_due(&self, today: DayId) -> bool {
        self.due_day <= today
    }

    /// Rejects states that cannot have come out of the scheduler.
    pub fn validate(&self) -> Fallible<()> {
        if !self.easiness_factor.is_finite() || self.easiness_factor < MIN_EASINESS {
            return fail(format!(
                "malformed card state: easiness factor {} is below {MIN_EASINESS}",
                self.easiness_factor
            ));
        }
        if self.interval < 1 {
            return fail("malformed card state: interval must be at least one day");
        }
        Ok(())
    }
}
