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
use crate::db::CardEdit;
use crate::error::Fallible;
use crate::error::fail;
use crate::types::card_id::CardId;

pub fn edit_command(
    directory: Option<String>,
    user: Option<String>,
    card_id: String,
    edit: CardEdit,
) -> Fallible<()> {
    let card_id = CardId::from_hex(card_id.trim())?;
    let mut coll = Collection::new(directory, user)?;
    let new_id = edit_card(&mut coll, card_id, edit)?;
    println!("{new_id}");
    Ok(())
}

pub fn delete_command(
    directory: Option<String>,
    user: Option<String>,
    card_id: String,
) -> Fallible<()> {
    let card_id = CardId::from_hex(card_id.trim())?;
    let mut coll = Collection::new(directory, user)?;
    delete_card(&mut coll, card_id)?;
    println!("Deleted {card_id}");
    Ok(())
}

/// Changes a card's folder or text, returning its new id.
pub fn edit_card(coll: &mut Collection, card_id: CardId, edit: CardEdit) -> Fallible<CardId> {
    if edit.folder.is_none() && edit.question.is_none() && edit.answer.is_none() {
        return fail("nothing to edit: pass --folder, --question, or --answer.");
    }
    let user = coll.config.user.clone();
    coll.db.edit_card(&user, card_id, edit)
}

pub fn delete_card(coll: &mut Collection, card_id: CardId) -> Fallible<()> {
    let user = coll.config.user.clone();
    coll.db.delete_card(&user, card_id)
}
