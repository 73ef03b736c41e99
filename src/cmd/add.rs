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
use crate::error::Fallible;
use crate::types::card_id::CardId;
use crate::types::timestamp::Timestamp;

pub fn add_command(
    directory: Option<String>,
    user: Option<String>,
    folder: String,
    question: String,
    answer: String,
) -> Fallible<()> {
    let mut coll = Collection::new(directory, user)?;
    let card_id = add_card(&mut coll, &folder, &question, &answer, Timestamp::now())?;
    println!("{card_id}");
    Ok(())
}

/// Logs a card that is due on the day it was added.
pub fn add_card(
    coll: &mut Collection,
    folder: &str,
    question: &str,
    answer: &str,
    now: Timestamp,
) -> Fallible<CardId> {
    let today = coll.config.calendar.day_of(now);
    let user = coll.config.user.clone();
    coll.db.add_card(&user, folder, question, answer, now, today)
}
