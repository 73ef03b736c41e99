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

use crate::collection::Collection;
use crate::db::CardRecord;
use crate::error::Fallible;
use crate::types::timestamp::Timestamp;

pub fn due_command(directory: Option<String>, user: Option<String>) -> Fallible<()> {
    let coll = Collection::new(directory, user)?;
    let cards = due_cards(&coll, Timestamp::now())?;
    if cards.is_empty() {
        println!("No cards due today.");
        return Ok(());
    }
    for card in cards {
        println!(
            "{}  {}  [{}] {}",
            card.card_id, card.state.due_day, card.folder, card.question
        );
    }
    Ok(())
}

/// The cards due on the anchor-time day containing `now`.
pub fn due_cards(coll: &Collection, now: Timestamp) -> Fallible<Vec<CardRecord>> {
    let today = coll.config.calendar.day_of(now);
    coll.db.due_cards(&coll.config.user, today)
}
