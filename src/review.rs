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

use crate::calendar::Calendar;
use crate::error::Fallible;
use crate::sm2::schedule;
use crate::streak::record_review;
use crate::types::card_state::CardState;
use crate::types::progress::UserProgress;
use crate::types::quality::Quality;
use crate::types::timestamp::Timestamp;

/// Runs one review transaction: reschedules the card and records the review
/// against the user's streak.
///
/// Nothing is written anywhere. The caller persists both results together,
/// and if its snapshot turns out to be stale, re-reads and calls this again.
pub fn review(
    calendar: &Calendar,
    card: &CardState,
    progress: &UserProgress,
    quality: i64,
    now: Timestamp,
) -> Fallible<(CardState, UserProgress)> {
    let quality = Quality::new(quality)?;
    card.validate()?;
    progress.validate()?;

    let new_card = schedule(calendar, card, quality, now);
    let review_day = calendar.day_of(now);
    let new_progress = record_review(progress, review_day);

    log::debug!(
        "q={} EF={:.2} reps={} interval={}d due={}",
        quality,
        new_card.easiness_factor,
        new_card.repetitions,
        new_card.interval,
        new_card.due_day
    );
    log::debug!(
        "day={} streak {} -> {} ({} reviews today)",
        review_day,
        progress.current_streak,
        new_progress.current_streak,
        new_progress.reviews_on(review_day)
    );

    Ok((new_card, new_progress))
}
