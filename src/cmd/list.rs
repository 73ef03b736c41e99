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

pub fn list_command(
    directory: Option<String>,
    user: Option<String>,
    folder: Option<String>,
) -> Fallible<()> {
    let coll = Collection::new(directory, user)?;
    let cards = list_cards(&coll, folder.as_deref())?;
    if cards.is_empty() {
        println!("No cards.");
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

/// All of the user's cards, optionally restricted to one folder.
pub fn list_cards(coll: &Collection, folder: Option<&str>) -> Fallible<Vec<CardRecord>> {
    let folder = folder.map(str::trim);
    coll.db.cards(&coll.config.user, folder)
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use chrono::Utc;
    use tempfile::tempdir;

    use super::*;
    use crate::cmd::add::add_card;
    use crate::types::timestamp::Timestamp;

    #[test]
    fn test_list_cards() -> Fallible<()> {
        let dir = tempdir()?;
        let path = Some(dir.path().display().to_string());
        let now = Timestamp::new(Utc.with_ymd_and_hms(2025, 8, 1, 6, 30, 0).unwrap());
        let mut coll = Collection::new(path.clone(), None)?;
        let a = add_card(&mut coll, "geo", "Capital of France?", "Paris", now)?;
        let b = add_card(&mut coll, "chem", "Symbol for gold?", "Au", now)?;
        let mut other = Collection::new(path, Some("bob".to_string()))?;
        add_card(&mut other, "geo", "Capital of Peru?", "Lima", now)?;

        let all: Vec<_> = list_cards(&coll, None)?.into_iter().map(|c| c.card_id).collect();
        assert_eq!(all, vec![b, a]);
        let geo: Vec<_> = list_cards(&coll, Some(" geo "))?
            .into_iter()
            .map(|c| c.card_id)
            .collect();
        assert_eq!(geo, vec![a]);
        assert!(list_cards(&coll, Some("art"))?.is_empty());
        Ok(())
    }
}
