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

use crate::collection::Collection;
use crate::db::Commit;
use crate::db::ReviewCommit;
use crate::error::Fallible;
use crate::error::fail;
use crate::review::review;
use crate::types::card_id::CardId;
use crate::types::card_state::CardState;
use crate::types::quality::Quality;
use crate::types::timestamp::Timestamp;

/// How many times to recompute a review whose snapshot went stale.
const MAX_ATTEMPTS: usize = 5;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewReport {
    pub card_id: CardId,
    pub card: CardState,
    pub current_streak: u32,
    pub reviews_today: u32,
}

pub fn review_command(
    directory: Option<String>,
    user: Option<String>,
    card_id: String,
    quality: i64,
) -> Fallible<()> {
    let quality = Quality::new(quality)?;
    let card_id = CardId::from_hex(card_id.trim())?;
    let mut coll = Collection::new(directory, user)?;
    let report = review_card(&mut coll, card_id, quality, Timestamp::now())?;
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

/// Reviews a card and persists the result, recomputing from fresh state if
/// another writer changed the card or the user's progress in the meantime.
pub fn review_card(
    coll: &mut Collection,
    card_id: CardId,
    quality: Quality,
    now: Timestamp,
) -> Fallible<ReviewReport> {
    let calendar = coll.config.calendar;
    let user = coll.config.user.clone();
    for attempt in 1..=MAX_ATTEMPTS {
        let card = coll.db.card(&user, card_id)?;
        let progress = coll.db.progress(&user)?;
        let (new_card, new_progress) = review(
            &calendar,
            &card.value.state,
            &progress.value,
            quality.value() as i64,
            now,
        )?;
        let commit = ReviewCommit {
            user: &user,
            card: &card,
            new_card: &new_card,
            progress: &progress,
            new_progress: &new_progress,
            quality,
            reviewed_at: now,
        };
        match coll.db.commit_review(commit)? {
            Commit::Applied => {
                log::debug!("{} reviewed: q={quality}", card_id.short());
                let today = calendar.day_of(now);
                return Ok(ReviewReport {
                    card_id,
                    card: new_card,
                    current_streak: new_progress.current_streak,
                    reviews_today: new_progress.reviews_on(today),
                });
            }
            Commit::Stale => {
                log::warn!(
                    "Stale snapshot for card {} (attempt {attempt}/{MAX_ATTEMPTS}), retrying.",
                    card_id.short()
                );
            }
        }
    }
    fail(format!(
        "could not record review of {card_id}: state kept changing underneath"
    ))
}
