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

use clap::Parser;

use crate::cmd::add::add_command;
use crate::cmd::due::due_command;
use crate::cmd::edit::delete_command;
use crate::cmd::edit::edit_command;
use crate::cmd::folders::folders_command;
use crate::cmd::history::history_command;
use crate::cmd::list::list_command;
use crate::cmd::review::review_command;
use crate::cmd::stats::StatsFormat;
use crate::cmd::stats::stats_command;
use crate::db::CardEdit;
use crate::error::Fallible;

#[derive(Parser)]
#[command(version, about, long_about = None)]
enum Command {
    /// Log a new card. Prints the card's id.
    Add {
        /// The folder to file the card under.
        folder: String,
        /// The question side.
        question: String,
        /// The answer side.
        answer: String,
        /// Path to the collection directory. Defaults to the current directory.
        #[arg(long)]
        directory: Option<String>,
        /// The user to act as. Overrides `recall.toml`.
        #[arg(long)]
        user: Option<String>,
    },
    /// List the cards due today.
    Due {
        /// Path to the collection directory. Defaults to the current directory.
        #[arg(long)]
        directory: Option<String>,
        /// The user to act as. Overrides `recall.toml`.
        #[arg(long)]
        user: Option<String>,
    },
    /// List all cards.
    List {
        /// Only list cards in this folder.
        #[arg(long)]
        folder: Option<String>,
        /// Path to the collection directory. Defaults to the current directory.
        #[arg(long)]
        directory: Option<String>,
        /// The user to act as. Overrides `recall.toml`.
        #[arg(long)]
        user: Option<String>,
    },
    /// Change a card's folder, question, or answer. Prints the card's new id.
    Edit {
        /// The card's id.
        card_id: String,
        /// The new folder.
        #[arg(long)]
        folder: Option<String>,
        /// The new question side.
        #[arg(long)]
        question: Option<String>,
        /// The new answer side.
        #[arg(long)]
        answer: Option<String>,
        /// Path to the collection directory. Defaults to the current directory.
        #[arg(long)]
        directory: Option<String>,
        /// The user to act as. Overrides `recall.toml`.
        #[arg(long)]
        user: Option<String>,
    },
    /// Delete a card and its review log.
    Delete {
        /// The card's id.
        card_id: String,
        /// Path to the collection directory. Defaults to the current directory.
        #[arg(long)]
        directory: Option<String>,
        /// The user to act as. Overrides `recall.toml`.
        #[arg(long)]
        user: Option<String>,
    },
    /// List folders with their card counts.
    Folders {
        /// Path to the collection directory. Defaults to the current directory.
        #[arg(long)]
        directory: Option<String>,
        /// The user to act as. Overrides `recall.toml`.
        #[arg(long)]
        user: Option<String>,
    },
    /// Print a card's review log as JSON.
    History {
        /// The card's id.
        card_id: String,
        /// Path to the collection directory. Defaults to the current directory.
        #[arg(long)]
        directory: Option<String>,
        /// The user to act as. Overrides `recall.toml`.
        #[arg(long)]
        user: Option<String>,
    },
    /// Record a review of a card.
    Review {
        /// The card's id, as printed by `add` or `due`.
        card_id: String,
        /// How well you recalled it, from 0 (blackout) to 5 (perfect).
        #[arg(allow_negative_numbers = true)]
        quality: i64,
        /// Path to the collection directory. Defaults to the current directory.
        #[arg(long)]
        directory: Option<String>,
        /// The user to act as. Overrides `recall.toml`.
        #[arg(long)]
        user: Option<String>,
    },
    /// Print streak and review statistics.
    Stats {
        /// Path to the collection directory. Defaults to the current directory.
        #[arg(long)]
        directory: Option<String>,
        /// The user to act as. Overrides `recall.toml`.
        #[arg(long)]
        user: Option<String>,
        /// Which output format to use.
        #[arg(long, default_value_t = StatsFormat::Text)]
        format: StatsFormat,
    },
}

pub fn entrypoint() -> Fallible<()> {
    let cli: Command = Command::parse();
    match cli {
        Command::Add {
            folder,
            question,
            answer,
            directory,
            user,
        } => add_command(directory, user, folder, question, answer),
        Command::Due { directory, user } => due_command(directory, user),
        Command::List {
            folder,
            directory,
            user,
        } => list_command(directory, user, folder),
        Command::Edit {
            card_id,
            folder,
            question,
            answer,
            directory,
            user,
        } => {
            let edit = CardEdit {
                folder,
                question,
                answer,
            };
            edit_command(directory, user, card_id, edit)
        }
        Command::Delete {
            card_id,
            directory,
            user,
        } => delete_command(directory, user, card_id),
        Command::Folders { directory, user } => folders_command(directory, user),
        Command::History {
            card_id,
            directory,
            user,
        } => history_command(directory, user, card_id),
        Command::Review {
            card_id,
            quality,
            directory,
            user,
        } => review_command(directory, user, card_id, quality),
        Command::Stats {
            directory,
            user,
            format,
        } => stats_command(directory, user, format),
    }
}
