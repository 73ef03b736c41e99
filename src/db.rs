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

use std::collections::BTreeMap;
use std::time::Duration;

use rusqlite::Connection;
use rusqlite::OptionalExtension;
use rusqlite::Row;
use rusqlite::Transaction;
use rusqlite::TransactionBehavior;
use rusqlite::config::DbConfig;
use serde::Serialize;

use crate::error::Fallible;
use crate::error::fail;
use crate::types::card_id::CardId;
use crate::types::card_state::CardState;
use crate::types::day::DayId;
use crate::types::progress::UserProgress;
use crate::types::quality::Quality;
use crate::types::timestamp::Timestamp;

/// How long a writer waits on another connection's lock.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

pub struct Database {
    conn: Connection,
}

/// A value read from the database, with the row version it was read at.
#[derive(Clone, Debug)]
pub struct Snapshot<T> {
    pub value: T,
    pub version: i64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct CardRecord {
    pub card_id: CardId,
    pub folder: String,
    pub question: String,
    pub answer: String,
    pub state: CardState,
}

/// New values for a card's text. `None` keeps the current value.
#[derive(Default)]
pub struct CardEdit {
    pub folder: Option<String>,
    pub question: Option<String>,
    pub answer: Option<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct FolderSummary {
    pub name: String,
    pub card_count: usize,
}

/// One row of a card's review log.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewLogEntry {
    pub reviewed_at: Timestamp,
    pub quality: Quality,
    /// The card's state after the review.
    pub state: CardState,
}

/// Everything needed to persist one review.
pub struct ReviewCommit<'a> {
    pub user: &'a str,
    pub card: &'a Snapshot<CardRecord>,
    pub new_card: &'a CardState,
    pub progress: &'a Snapshot<UserProgress>,
    pub new_progress: &'a UserProgress,
    pub quality: Quality,
    pub reviewed_at: Timestamp,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Commit {
    Applied,
    /// Another writer got there first. Nothing was written.
    Stale,
}

impl Database {
    pub fn new(database_path: &str) -> Fallible<Self> {
        let mut conn = Connection::open(database_path)?;
        conn.set_db_config(DbConfig::SQLITE_DBCONFIG_ENABLE_FKEY, true)?;
        conn.busy_timeout(BUSY_TIMEOUT)?;
        {
            let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
            if !probe_schema_exists(&tx)? {
                tx.execute_batch(include_str!("schema.sql"))?;
            }
            tx.commit()?;
        }
        Ok(Self { conn })
    }

    /// Log a new card, due on `today`.
    ///
    /// If the user already has a card with the same content, returns an error.
    pub fn add_card(
        &mut self,
        user: &str,
        folder: &str,
        question: &str,
        answer: &str,
        added_at: Timestamp,
        today: DayId,
    ) -> Fallible<CardId> {
        let (folder, question, answer) = (folder.trim(), question.trim(), answer.trim());
        if folder.is_empty() || question.is_empty() || answer.is_empty() {
            return fail("folder, question, and answer must not be empty.");
        }
        let card_id = CardId::of_content(folder, question, answer);
        let state = CardState::new(today);
        let tx = self.conn.transaction()?;
        if card_exists(&tx, user, card_id)? {
            return fail(format!("card already exists: {card_id}"));
        }
        upsert_folder(&tx, user, folder)?;
        let sql = "insert into cards (user_name, card_id, folder, question, answer, added_at, easiness_factor, repetitions, interval_days, due_day, version) values (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, 1);";
        tx.execute(
            sql,
            (
                user,
                card_id,
                folder,
                question,
                answer,
                added_at,
                state.easiness_factor,
                state.repetitions,
                state.interval,
                state.due_day,
            ),
        )?;
        tx.commit()?;
        log::debug!("Added card {} to {folder}", card_id.short());
        Ok(card_id)
    }

    /// Read a card and its version.
    ///
    /// If the user has no card with the given id, returns an error.
    pub fn card(&self, user: &str, card_id: CardId) -> Fallible<Snapshot<CardRecord>> {
        let sql = "select card_id, folder, question, answer, easiness_factor, repetitions, interval_days, due_day, version from cards where user_name = ? and card_id = ?;";
        let snapshot = self
            .conn
            .query_row(sql, (user, card_id), |row| {
                Ok(Snapshot {
                    value: read_card(row)?,
                    version: row.get(8)?,
                })
            })
            .optional()?;
        match snapshot {
            Some(snapshot) => Ok(snapshot),
            None => fail(format!("no such card: {card_id}")),
        }
    }

    pub fn card_count(&self, user: &str) -> Fallible<usize> {
        let sql = "select count(*) from cards where user_name = ?;";
        let count: i64 = self.conn.query_row(sql, [user], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// All of the user's cards, or only those in `folder`, ordered by
    /// folder and due day.
    pub fn cards(&self, user: &str, folder: Option<&str>) -> Fallible<Vec<CardRecord>> {
        let sql = "select card_id, folder, question, answer, easiness_factor, repetitions, interval_days, due_day from cards where user_name = ? and (? is null or folder = ?) order by folder, due_day, card_id;";
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query((user, folder, folder))?;
        let mut cards = Vec::new();
        while let Some(row) = rows.next()? {
            cards.push(read_card(row)?);
        }
        Ok(cards)
    }

    /// Change a card's text or folder. The card is re-keyed under the hash
    /// of its new content; its repetition state and review log carry over.
    ///
    /// Returns the card's new id. Fails if the card does not exist, or if
    /// the new content collides with another card.
    pub fn edit_card(&mut self, user: &str, card_id: CardId, edit: CardEdit) -> Fallible<CardId> {
        let current = self.card(user, card_id)?.value;
        let folder = edit.folder.unwrap_or(current.folder);
        let question = edit.question.unwrap_or(current.question);
        let answer = edit.answer.unwrap_or(current.answer);
        let (folder, question, answer) = (folder.trim(), question.trim(), answer.trim());
        if folder.is_empty() || question.is_empty() || answer.is_empty() {
            return fail("folder, question, and answer must not be empty.");
        }
        let new_id = CardId::of_content(folder, question, answer);
        let tx = self.conn.transaction()?;
        if new_id != card_id && card_exists(&tx, user, new_id)? {
            return fail(format!("card already exists: {new_id}"));
        }
        upsert_folder(&tx, user, folder)?;
        let sql = "update cards set card_id = ?, folder = ?, question = ?, answer = ?, version = version + 1 where user_name = ? and card_id = ?;";
        tx.execute(sql, (new_id, folder, question, answer, user, card_id))?;
        tx.commit()?;
        log::debug!("Edited card {} -> {}", card_id.short(), new_id.short());
        Ok(new_id)
    }

    /// Delete a card and its review log. The user's streak and review
    /// history are left alone.
    pub fn delete_card(&mut self, user: &str, card_id: CardId) -> Fallible<()> {
        let sql = "delete from cards where user_name = ? and card_id = ?;";
        let deleted = self.conn.execute(sql, (user, card_id))?;
        if deleted == 0 {
            return fail(format!("no such card: {card_id}"));
        }
        log::debug!("Deleted card {}", card_id.short());
        Ok(())
    }

    /// The user's folders with how many cards each holds. Folders outlive
    /// their cards.
    pub fn folders(&self, user: &str) -> Fallible<Vec<FolderSummary>> {
        let sql = "select f.name, count(c.card_id) from folders f left outer join cards c on c.user_name = f.user_name and c.folder = f.name where f.user_name = ? group by f.name order by f.name;";
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query([user])?;
        let mut folders = Vec::new();
        while let Some(row) = rows.next()? {
            let card_count: i64 = row.get(1)?;
            folders.push(FolderSummary {
                name: row.get(0)?,
                card_count: card_count as usize,
            });
        }
        Ok(folders)
    }

    /// A card's reviews, oldest first.
    pub fn reviews(&self, user: &str, card_id: CardId) -> Fallible<Vec<ReviewLogEntry>> {
        let sql = "select reviewed_at, quality, easiness_factor, repetitions, interval_days, due_day from reviews where user_name = ? and card_id = ? order by reviewed_at, review_id;";
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query((user, card_id))?;
        let mut reviews = Vec::new();
        while let Some(row) = rows.next()? {
            reviews.push(ReviewLogEntry {
                reviewed_at: row.get(0)?,
                quality: row.get(1)?,
                state: CardState {
                    easiness_factor: row.get(2)?,
                    repetitions: row.get(3)?,
                    interval: row.get(4)?,
                    due_day: row.get(5)?,
                },
            });
        }
        Ok(reviews)
    }

    /// The user's cards with a due day on or before `today`, most overdue
    /// first.
    pub fn due_cards(&self, user: &str, today: DayId) -> Fallible<Vec<CardRecord>> {
        let sql = "select card_id, folder, question, answer, easiness_factor, repetitions, interval_days, due_day from cards where user_name = ? and due_day <= ? order by due_day, card_id;";
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query((user, today))?;
        let mut cards = Vec::new();
        while let Some(row) = rows.next()? {
            cards.push(read_card(row)?);
        }
        Ok(cards)
    }

    /// Read a user's progress and its version. A user who has never
    /// reviewed gets empty progress at version zero.
    pub fn progress(&self, user: &str) -> Fallible<Snapshot<UserProgress>> {
        // One read transaction, so the streak and the history agree.
        let tx = self.conn.unchecked_transaction()?;
        let sql = "select current_streak, last_review_day, version from progress where user_name = ?;";
        let row: Option<(u32, Option<DayId>, i64)> = tx
            .query_row(sql, [user], |row| {
                Ok((row.get(0)?, row.get(1)?, row.get(2)?))
            })
            .optional()?;
        let (current_streak, last_review_day, version) = row.unwrap_or((0, None, 0));
        let mut review_history = BTreeMap::new();
        {
            let mut stmt =
                tx.prepare("select day, review_count from review_history where user_name = ?;")?;
            let mut rows = stmt.query([user])?;
            while let Some(row) = rows.next()? {
                let day: DayId = row.get(0)?;
                let count: u32 = row.get(1)?;
                review_history.insert(day, count);
            }
        }
        tx.commit()?;
        Ok(Snapshot {
            value: UserProgress {
                current_streak,
                last_review_day,
                review_history,
            },
            version,
        })
    }

    /// Persist a review atomically, provided neither the card nor the
    /// progress record changed since their snapshots were read.
    pub fn commit_review(&mut self, commit: ReviewCommit) -> Fallible<Commit> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        if !update_card(&tx, &commit)? || !update_progress(&tx, &commit)? {
            // Dropping the transaction rolls it back.
            return Ok(Commit::Stale);
        }
        update_history(&tx, &commit)?;
        insert_review(&tx, &commit)?;
        tx.commit()?;
        Ok(Commit::Applied)
    }
}

fn read_card(row: &Row) -> rusqlite::Result<CardRecord> {
    Ok(CardRecord {
        card_id: row.get(0)?,
        folder: row.get(1)?,
        question: row.get(2)?,
        answer: row.get(3)?,
        state: CardState {
            easiness_factor: row.get(4)?,
            repetitions: row.get(5)?,
            interval: row.get(6)?,
            due_day: row.get(7)?,
        },
    })
}

fn card_exists(tx: &Transaction, user: &str, card_id: CardId) -> Fallible<bool> {
    let sql = "select count(*) from cards where user_name = ? and card_id = ?;";
    let count: i64 = tx.query_row(sql, (user, card_id), |row| row.get(0))?;
    Ok(count > 0)
}

fn upsert_folder(tx: &Transaction, user: &str, folder: &str) -> Fallible<()> {
    let sql = "insert into folders (user_name, name) values (?, ?) on conflict (user_name, name) do nothing;";
    tx.execute(sql, (user, folder))?;
    Ok(())
}

fn update_card(tx: &Transaction, commit: &ReviewCommit) -> Fallible<bool> {
    let sql = "update cards set easiness_factor = ?, repetitions = ?, interval_days = ?, due_day = ?, version = version + 1 where user_name = ? and card_id = ? and version = ?;";
    let state = commit.new_card;
    let changed = tx.execute(
        sql,
        (
            state.easiness_factor,
            state.repetitions,
            state.interval,
            state.due_day,
            commit.user,
            commit.card.value.card_id,
            commit.card.version,
        ),
    )?;
    Ok(changed == 1)
}

fn update_progress(tx: &Transaction, commit: &ReviewCommit) -> Fallible<bool> {
    let progress = commit.new_progress;
    let changed = if commit.progress.version == 0 {
        let sql = "insert into progress (user_name, current_streak, last_review_day, version) values (?, ?, ?, 1) on conflict (user_name) do nothing;";
        tx.execute(
            sql,
            (
                commit.user,
                progress.current_streak,
                progress.last_review_day,
            ),
        )?
    } else {
        let sql = "update progress set current_streak = ?, last_review_day = ?, version = version + 1 where user_name = ? and version = ?;";
        tx.execute(
            sql,
            (
                progress.current_streak,
                progress.last_review_day,
                commit.user,
                commit.progress.version,
            ),
        )?
    };
    Ok(changed == 1)
}

/// Writes only the days whose counts changed.
fn update_history(tx: &Transaction, commit: &ReviewCommit) -> Fallible<()> {
    let before = &commit.progress.value.review_history;
    let sql = "insert into review_history (user_name, day, review_count) values (?, ?, ?) on conflict (user_name, day) do update set review_count = excluded.review_count;";
    for (day, count) in commit.new_progress.review_history.iter() {
        if before.get(day) != Some(count) {
            tx.execute(sql, (commit.user, day, count))?;
        }
    }
    Ok(())
}

fn insert_review(tx: &Transaction, commit: &ReviewCommit) -> Fallible<()> {
    let sql = "insert into reviews (user_name, card_id, reviewed_at, quality, easiness_factor, repetitions, interval_days, due_day) values (?, ?, ?, ?, ?, ?, ?, ?);";
    let state = commit.new_card;
    tx.execute(
        sql,
        (
            commit.user,
            commit.card.value.card_id,
            commit.reviewed_at,
            commit.quality,
            state.easiness_factor,
            state.repetitions,
            state.interval,
            state.due_day,
        ),
    )?;
    Ok(())
}

fn probe_schema_exists(tx: &Transaction) -> Fallible<bool> {
    let sql = "select count(*) from sqlite_master where type='table' AND name=?;";
    let count: i64 = tx.query_row(sql, ["cards"], |row| row.get(0))?;
    Ok(count > 0)
}

#[cfg(test)]
mod tests {
    use chrono::Datelike;
    use chrono::TimeZone;
    use chrono::Utc;
    use tempfile::TempDir;
    use tempfile::tempdir;

    use super::*;
    use crate::calendar::Calendar;
    use crate::review::review;
    use crate::sm2::easiness_delta;

    const USER: &str = "alice";

    fn open(dir: &TempDir) -> Fallible<Database> {
        let path = dir.path().join("recall.db");
        Database::new(path.to_str().unwrap())
    }

    fn noon(d: u32) -> Timestamp {
        Timestamp::new(Utc.with_ymd_and_hms(2025, 7, d, 6, 30, 0).unwrap())
    }

    fn day(d: u32) -> DayId {
        DayId::from_ymd(2025, 7, d).unwrap()
    }

    /// Reads fresh snapshots, reviews, and commits.
    fn review_once(
        db: &mut Database,
        card_id: CardId,
        quality: i64,
        now: Timestamp,
    ) -> Fallible<Commit> {
        let calendar = Calendar::default();
        let card = db.card(USER, card_id)?;
        let progress = db.progress(USER)?;
        let (new_card, new_progress) =
            review(&calendar, &card.value.state, &progress.value, quality, now)?;
        db.commit_review(ReviewCommit {
            user: USER,
            card: &card,
            new_card: &new_card,
            progress: &progress,
            new_progress: &new_progress,
            quality: Quality::new(quality)?,
            reviewed_at: now,
        })
    }

    #[test]
    fn test_reopen_existing_database() -> Fallible<()> {
        let dir = tempdir()?;
        let mut db = open(&dir)?;
        db.add_card(USER, "geo", "Capital of France?", "Paris", noon(1), day(1))?;
        drop(db);
        let db = open(&dir)?;
        assert_eq!(db.card_count(USER)?, 1);
        Ok(())
    }

    #[test]
    fn test_add_card() -> Fallible<()> {
        let dir = tempdir()?;
        let mut db = open(&dir)?;
        let id = db.add_card(USER, "geo", " Capital of France? ", "Paris", noon(1), day(1))?;
        assert_eq!(id, CardId::of_content("geo", "Capital of France?", "Paris"));
        let card = db.card(USER, id)?;
        assert_eq!(card.version, 1);
        assert_eq!(card.value.question, "Capital of France?");
        assert_eq!(card.value.state, CardState::new(day(1)));
        Ok(())
    }

    #[test]
    fn test_add_duplicate_card() -> Fallible<()> {
        let dir = tempdir()?;
        let mut db = open(&dir)?;
        db.add_card(USER, "geo", "Capital of France?", "Paris", noon(1), day(1))?;
        let result = db.add_card(USER, "geo", "Capital of France?", "Paris", noon(2), day(2));
        assert!(result.is_err());
        // Another user may hold the same card.
        db.add_card("bob", "geo", "Capital of France?", "Paris", noon(1), day(1))?;
        Ok(())
    }

    #[test]
    fn test_add_empty_card() -> Fallible<()> {
        let dir = tempdir()?;
        let mut db = open(&dir)?;
        assert!(db.add_card(USER, "geo", "  ", "Paris", noon(1), day(1)).is_err());
        Ok(())
    }

    #[test]
    fn test_missing_card() -> Fallible<()> {
        let dir = tempdir()?;
        let db = open(&dir)?;
        let id = CardId::of_content("a", "b", "c");
        let err = db.card(USER, id).err().map(|e| e.to_string());
        assert_eq!(err, Some(format!("error: no such card: {id}")));
        Ok(())
    }

    #[test]
    fn test_empty_progress() -> Fallible<()> {
        let dir = tempdir()?;
        let db = open(&dir)?;
        let progress = db.progress(USER)?;
        assert_eq!(progress.version, 0);
        assert_eq!(progress.value, UserProgress::default());
        Ok(())
    }

    #[test]
    fn test_due_cards() -> Fallible<()> {
        let dir = tempdir()?;
        let mut db = open(&dir)?;
        let a = db.add_card(USER, "geo", "Capital of France?", "Paris", noon(1), day(1))?;
        let b = db.add_card(USER, "geo", "Capital of Peru?", "Lima", noon(3), day(3))?;
        db.add_card("bob", "geo", "Capital of Chile?", "Santiago", noon(1), day(1))?;
        let due: Vec<CardId> = db.due_cards(USER, day(2))?.iter().map(|c| c.card_id).collect();
        assert_eq!(due, vec![a]);
        let due: Vec<CardId> = db.due_cards(USER, day(3))?.iter().map(|c| c.card_id).collect();
        assert_eq!(due, vec![a, b]);
        Ok(())
    }

    #[test]
    fn test_commit_review_persists_both() -> Fallible<()> {
        let dir = tempdir()?;
        let mut db = open(&dir)?;
        let id = db.add_card(USER, "geo", "Capital of France?", "Paris", noon(1), day(1))?;
        assert_eq!(review_once(&mut db, id, 5, noon(1))?, Commit::Applied);
        assert_eq!(review_once(&mut db, id, 5, noon(2))?, Commit::Applied);

        let card = db.card(USER, id)?;
        assert_eq!(card.version, 3);
        assert_eq!(card.value.state.repetitions, 2);
        assert_eq!(card.value.state.interval, 3);
        assert_eq!(card.value.state.due_day, day(5));

        let progress = db.progress(USER)?;
        assert_eq!(progress.version, 2);
        assert_eq!(progress.value.current_streak, 2);
        assert_eq!(progress.value.last_review_day, Some(day(2)));
        assert_eq!(progress.value.reviews_on(day(1)), 1);
        assert_eq!(progress.value.reviews_on(day(2)), 1);
        assert!(db.due_cards(USER, day(4))?.is_empty());
        Ok(())
    }

    #[test]
    fn test_easiness_round_trips_exactly() -> Fallible<()> {
        let dir = tempdir()?;
        let mut db = open(&dir)?;
        let id = db.add_card(USER, "geo", "Capital of France?", "Paris", noon(1), day(1))?;
        review_once(&mut db, id, 3, noon(1))?;
        let stored = db.card(USER, id)?.value.state.easiness_factor;
        assert_eq!(stored, 2.5 + easiness_delta(Quality::new(3)?));
        Ok(())
    }

    #[test]
    fn test_stale_card_snapshot() -> Fallible<()> {
        let dir = tempdir()?;
        let mut first = open(&dir)?;
        let mut second = open(&dir)?;
        let id = first.add_card(USER, "geo", "Capital of France?", "Paris", noon(1), day(1))?;

        let calendar = Calendar::default();
        let card = second.card(USER, id)?;
        let progress = second.progress(USER)?;
        let (new_card, new_progress) =
            review(&calendar, &card.value.state, &progress.value, 4, noon(1))?;

        // The other connection commits in between.
        assert_eq!(review_once(&mut first, id, 5, noon(1))?, Commit::Applied);

        let outcome = second.commit_review(ReviewCommit {
            user: USER,
            card: &card,
            new_card: &new_card,
            progress: &progress,
            new_progress: &new_progress,
            quality: Quality::new(4)?,
            reviewed_at: noon(1),
        })?;
        assert_eq!(outcome, Commit::Stale);

        // Nothing from the stale commit landed.
        let progress = second.progress(USER)?;
        assert_eq!(progress.value.reviews_on(day(1)), 1);
        assert_eq!(second.card(USER, id)?.version, 2);
        Ok(())
    }

    #[test]
    fn test_stale_progress_snapshot() -> Fallible<()> {
        let dir = tempdir()?;
        let mut first = open(&dir)?;
        let mut second = open(&dir)?;
        let a = first.add_card(USER, "geo", "Capital of France?", "Paris", noon(1), day(1))?;
        let b = first.add_card(USER, "geo", "Capital of Peru?", "Lima", noon(1), day(1))?;

        // Two different cards, same user: only the progress row conflicts.
        let calendar = Calendar::default();
        let card = second.card(USER, b)?;
        let progress = second.progress(USER)?;
        let (new_card, new_progress) =
            review(&calendar, &card.value.state, &progress.value, 4, noon(1))?;

        assert_eq!(review_once(&mut first, a, 5, noon(1))?, Commit::Applied);

        let outcome = second.commit_review(ReviewCommit {
            user: USER,
            card: &card,
            new_card: &new_card,
            progress: &progress,
            new_progress: &new_progress,
            quality: Quality::new(4)?,
            reviewed_at: noon(1),
        })?;
        assert_eq!(outcome, Commit::Stale);
        // The card update was rolled back with the rest.
        assert_eq!(second.card(USER, b)?.version, 1);

        // Recomputing from fresh snapshots succeeds.
        assert_eq!(review_once(&mut second, b, 4, noon(1))?, Commit::Applied);
        assert_eq!(second.progress(USER)?.value.reviews_on(day(1)), 2);
        Ok(())
    }

    #[test]
    fn test_far_future_due_day_is_not_due() -> Fallible<()> {
        let dir = tempdir()?;
        let mut db = open(&dir)?;
        let id = db.add_card(USER, "geo", "Capital of France?", "Paris", noon(1), day(1))?;
        for _ in 0..20 {
            assert_eq!(review_once(&mut db, id, 5, noon(1))?, Commit::Applied);
        }
        let state = db.card(USER, id)?.value.state;
        assert!(state.due_day.into_inner().year() > 9999);
        assert!(db.due_cards(USER, day(1))?.is_empty());
        assert!(db.due_cards(USER, DayId::from_ymd(9999, 12, 31)?)?.is_empty());
        assert_eq!(db.due_cards(USER, state.due_day)?.len(), 1);
        Ok(())
    }

    #[test]
    fn test_list_cards() -> Fallible<()> {
        let dir = tempdir()?;
        let mut db = open(&dir)?;
        let a = db.add_card(USER, "geo", "Capital of France?", "Paris", noon(1), day(1))?;
        let b = db.add_card(USER, "chem", "Symbol for gold?", "Au", noon(1), day(1))?;
        db.add_card("bob", "geo", "Capital of Chile?", "Santiago", noon(1), day(1))?;
        let all: Vec<CardId> = db.cards(USER, None)?.iter().map(|c| c.card_id).collect();
        assert_eq!(all, vec![b, a]);
        let geo: Vec<CardId> = db.cards(USER, Some("geo"))?.iter().map(|c| c.card_id).collect();
        assert_eq!(geo, vec![a]);
        assert!(db.cards(USER, Some("history"))?.is_empty());
        Ok(())
    }

    #[test]
    fn test_edit_card_keeps_state_and_log() -> Fallible<()> {
        let dir = tempdir()?;
        let mut db = open(&dir)?;
        let id = db.add_card(USER, "geo", "Capital of France?", "Pariz", noon(1), day(1))?;
        review_once(&mut db, id, 5, noon(1))?;
        let before = db.card(USER, id)?.value.state;

        let edit = CardEdit {
            answer: Some("Paris".to_string()),
            ..Default::default()
        };
        let new_id = db.edit_card(USER, id, edit)?;
        assert_eq!(new_id, CardId::of_content("geo", "Capital of France?", "Paris"));
        assert!(db.card(USER, id).is_err());

        let card = db.card(USER, new_id)?;
        assert_eq!(card.value.answer, "Paris");
        assert_eq!(card.value.state, before);
        assert_eq!(db.reviews(USER, new_id)?.len(), 1);
        Ok(())
    }

    #[test]
    fn test_edit_card_collision() -> Fallible<()> {
        let dir = tempdir()?;
        let mut db = open(&dir)?;
        let a = db.add_card(USER, "geo", "Capital of France?", "Paris", noon(1), day(1))?;
        db.add_card(USER, "geo", "Capital of Peru?", "Lima", noon(1), day(1))?;
        let edit = CardEdit {
            question: Some("Capital of Peru?".to_string()),
            answer: Some("Lima".to_string()),
            ..Default::default()
        };
        assert!(db.edit_card(USER, a, edit).is_err());
        // Editing to the same content is a no-op.
        assert_eq!(db.edit_card(USER, a, CardEdit::default())?, a);
        Ok(())
    }

    #[test]
    fn test_delete_card() -> Fallible<()> {
        let dir = tempdir()?;
        let mut db = open(&dir)?;
        let id = db.add_card(USER, "geo", "Capital of France?", "Paris", noon(1), day(1))?;
        review_once(&mut db, id, 4, noon(1))?;
        db.delete_card(USER, id)?;
        assert!(db.card(USER, id).is_err());
        assert!(db.reviews(USER, id)?.is_empty());
        // The review still counts towards the streak.
        assert_eq!(db.progress(USER)?.value.reviews_on(day(1)), 1);
        assert!(db.delete_card(USER, id).is_err());
        Ok(())
    }

    #[test]
    fn test_folders() -> Fallible<()> {
        let dir = tempdir()?;
        let mut db = open(&dir)?;
        let a = db.add_card(USER, "geo", "Capital of France?", "Paris", noon(1), day(1))?;
        db.add_card(USER, "geo", "Capital of Peru?", "Lima", noon(1), day(1))?;
        db.add_card(USER, "chem", "Symbol for gold?", "Au", noon(1), day(1))?;
        db.add_card("bob", "art", "Painter of Guernica?", "Picasso", noon(1), day(1))?;
        let edit = CardEdit {
            folder: Some("capitals".to_string()),
            ..Default::default()
        };
        db.edit_card(USER, a, edit)?;
        let folders = db.folders(USER)?;
        let summary: Vec<(&str, usize)> = folders
            .iter()
            .map(|f| (f.name.as_str(), f.card_count))
            .collect();
        assert_eq!(summary, vec![("capitals", 1), ("chem", 1), ("geo", 1)]);
        Ok(())
    }

    #[test]
    fn test_review_log() -> Fallible<()> {
        let dir = tempdir()?;
        let mut db = open(&dir)?;
        let id = db.add_card(USER, "geo", "Capital of France?", "Paris", noon(1), day(1))?;
        review_once(&mut db, id, 5, noon(1))?;
        review_once(&mut db, id, 2, noon(2))?;
        let log = db.reviews(USER, id)?;
        assert_eq!(log.len(), 2);
        assert_eq!(log[0].reviewed_at, noon(1));
        assert_eq!(log[0].quality, Quality::new(5)?);
        assert_eq!(log[0].state.due_day, day(2));
        assert_eq!(log[1].quality, Quality::new(2)?);
        assert_eq!(log[1].state.repetitions, 0);
        assert_eq!(log[1].state, db.card(USER, id)?.value.state);
        Ok(())
    }

    #[test]
    fn test_progress_ignores_uncommitted_writes() -> Fallible<()> {
        let dir = tempdir()?;
        let mut first = open(&dir)?;
        let second = open(&dir)?;
        let id = first.add_card(USER, "geo", "Capital of France?", "Paris", noon(1), day(1))?;
        review_once(&mut first, id, 5, noon(1))?;

        let tx = first.conn.transaction()?;
        tx.execute(
            "update progress set current_streak = 2, last_review_day = ? where user_name = ?;",
            (day(2), USER),
        )?;
        tx.execute(
            "insert into review_history (user_name, day, review_count) values (?, ?, 1);",
            (USER, day(2)),
        )?;
        let progress = second.progress(USER)?;
        drop(tx);

        assert_eq!(progress.value.current_streak, 1);
        assert_eq!(progress.value.last_review_day, Some(day(1)));
        assert_eq!(progress.value.review_history.len(), 1);
        progress.value.validate()
    }
}
