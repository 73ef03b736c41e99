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
use crate::db::FolderSummary;
use crate::error::Fallible;

pub fn folders_command(directory: Option<String>, user: Option<String>) -> Fallible<()> {
    let coll = Collection::new(directory, user)?;
    let folders = list_folders(&coll)?;
    if folders.is_empty() {
        println!("No folders.");
        return Ok(());
    }
    for folder in folders {
        println!("{}  {}", folder.name, folder.card_count);
    }
    Ok(())
}

pub fn list_folders(coll: &Collection) -> Fallible<Vec<FolderSummary>> {
    coll.db.folders(&coll.config.user)
}
