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
use crate::db::ReviewLogEntry;
use crate::error::Fallible;
use crate::types::card_id::CardId;

pub fn history_command(
    directory: Option<String>,
    user: Option<String>,
    card_id: String,
) -> Fallible<()> {
    let card_id = CardId::from_hex(card_id.trim())?;
    let coll = Collection::new(directory, user)?;
    let entries = card_history(&coll, card_id)?;
    println!("{}", serde_json::to_string_pretty(&entries)?);
    Ok(())
}

/// A card's review log, oldest first. Fails if the card does not exist.
pub fn card_history(coll: &Collection, card_id: CardId) -> Fallible<Vec<ReviewLogEntry>> {
    let user = &coll.config.user;
    // Distinguish an unknown card from one that was never reviewed.
    coll.db.card(user, card_id)?;
    coll.db.reviews(user, card_id)
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use chrono::Utc;
    use tempfile::tempdir;

    use super::*;
    use crate::cmd::add::add_card;
    use crate::cmd::review::review_card;
    use crate::types::quality::Quality;
    use crate::types::timestamp::Timestamp;

    fn noon(d: u32) -> Timestamp {
        Timestamp::new(Utc.with_ymd_and_hms(2025, 8, d, 6, 30, 0).unwrap())
    }

    #[test]
    fn test_card_history() -> Fallible<()> {
        let dir = tempdir()?;
        let mut coll = Collection::new(Some(dir.path().display().to_string()), None)?;
        let id = add_card(&mut coll, "geo", "Capital of France?", "Paris", noon(1))?;
        assert!(card_history(&coll, id)?.is_empty());
        review_card(&mut coll, id, Quality::new(4)?, noon(1))?;
        review_card(&mut coll, id, Quality::new(1)?, noon(3))?;

        let history = card_history(&coll, id)?;
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].reviewed_at, noon(1));
        assert_eq!(history[1].quality, Quality::new(1)?);
        assert_eq!(history[1].state.repetitions, 0);

        let json = serde_json::to_value(&history)?;
        assert_eq!(json[0]["reviewedAt"], "2025-08-01T06:30:00+00:00");
        assert_eq!(json[0]["quality"], 4);
        assert_eq!(json[1]["state"]["dueDay"], "2025-08-04");
        Ok(())
    }

    #[test]
    fn test_history_of_unknown_card() -> Fallible<()> {
        let dir = tempdir()?;
        let coll = Collection::new(Some(dir.path().display().to_string()), None)?;
        assert!(card_history(&coll, CardId::of_content("x", "y", "z")).is_err());
        Ok(())
    }
}
