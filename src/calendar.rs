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

use chrono::FixedOffset;
use chrono::NaiveDateTime;
use chrono::NaiveTime;
use chrono::TimeDelta;

use crate::error::Fallible;
use crate::types::day::DayId;
use crate::types::timestamp::Timestamp;

/// The default anchor offset, UTC+05:30.
pub const DEFAULT_ANCHOR_OFFSET: &str = "+05:30";

const DEFAULT_ANCHOR_SECONDS: i32 = 5 * 3600 + 30 * 60;

/// Maps instants to calendar days under one fixed UTC offset.
///
/// The offset is fixed, not a named zone, so there are no daylight saving
/// transitions and every day is exactly 24 hours long. The host's local
/// timezone is never consulted.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Calendar {
    offset: FixedOffset,
}

impl Calendar {
    pub fn new(offset: FixedOffset) -> Self {
        Self { offset }
    }

    /// Parses an offset like `+05:30` or `-08:00`.
    pub fn from_offset_str(s: &str) -> Fallible<Self> {
        let offset: FixedOffset = s.trim().parse()?;
        Ok(Self::new(offset))
    }

    pub fn offset(&self) -> FixedOffset {
        self.offset
    }

    /// The anchor-time calendar day containing `instant`.
    pub fn day_of(&self, instant: Timestamp) -> DayId {
        let local = instant.into_inner().with_timezone(&self.offset);
        DayId::new(local.date_naive())
    }

    /// The instant of 00:00:00 anchor-time on `day`.
    ///
    /// Saturates at the ends of the representable range, like
    /// `DayId::add_days`.
    pub fn start_of(&self, day: DayId) -> Timestamp {
        let midnight = day.into_inner().and_time(NaiveTime::MIN);
        let offset = TimeDelta::seconds(self.offset.local_minus_utc() as i64);
        let utc = midnight
            .checked_sub_signed(offset)
            .unwrap_or(if offset > TimeDelta::zero() {
                NaiveDateTime::MIN
            } else {
                NaiveDateTime::MAX
            });
        Timestamp::new(utc.and_utc())
    }

    /// The instant of 00:00:00 anchor-time on the day containing `instant`.
    pub fn start_of_day(&self, instant: Timestamp) -> Timestamp {
        self.start_of(self.day_of(instant))
    }

    pub fn add_days(&self, day: DayId, n: i64) -> DayId {
        day.add_days(n)
    }

    pub fn yesterday(&self, day: DayId) -> DayId {
        day.yesterday()
    }

    /// True if `day` has not started yet at `reference`.
    pub fn is_strictly_future(&self, day: DayId, reference: Timestamp) -> bool {
        self.start_of(day) > reference
    }
}

impl Default for Calendar {
    fn default() -> Self {
        // The offset is well within ±24h.
        match FixedOffset::east_opt(DEFAULT_ANCHOR_SECONDS) {
            Some(offset) => Self::new(offset),
            None => unreachable!(),
        }
    }
}
