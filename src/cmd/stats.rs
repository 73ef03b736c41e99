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

use std::fmt::Display;
use std::fmt::Formatter;

use clap::ValueEnum;
use serde::Serialize;

use crate::collection::Collection;
use crate::error::Fallible;
use crate::stats::HEATMAP_DAYS;
use crate::stats::HeatmapCell;
use crate::stats::active_days;
use crate::stats::effective_streak;
use crate::stats::history_window;
use crate::stats::longest_streak;
use crate::stats::total_reviews;
use crate::types::day::DayId;
use crate::types::timestamp::Timestamp;

#[derive(ValueEnum, Clone)]
pub enum StatsFormat {
    /// Plain text summary.
    Text,
    /// JSON output, including the heatmap.
    Json,
}

impl Display for StatsFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            StatsFormat::Text => write!(f, "text"),
            StatsFormat::Json => write!(f, "json"),
        }
    }
}

pub fn stats_command(
    directory: Option<String>,
    user: Option<String>,
    format: StatsFormat,
) -> Fallible<()> {
    let coll = Collection::new(directory, user)?;
    let stats = get_stats(&coll, Timestamp::now())?;
    match format {
        StatsFormat::Text => {
            println!("user:            {}", stats.user);
            println!("today:           {}", stats.today);
            println!("current streak:  {}", stats.current_streak);
            println!("longest streak:  {}", stats.longest_streak);
            println!("reviews today:   {}", stats.today_review_count);
            println!("total reviews:   {}", stats.total_review_count);
            println!("active days:     {}", stats.active_day_count);
            println!("cards:           {}", stats.card_count);
            println!("due today:       {}", stats.due_count);
        }
        StatsFormat::Json => {
            let stats_json = serde_json::to_string_pretty(&stats)?;
            println!("{}", stats_json);
        }
    }
    Ok(())
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    user: String,
    today: DayId,
    current_streak: u32,
    longest_streak: u32,
    last_review_day: Option<DayId>,
    today_review_count: u32,
    total_review_count: u64,
    active_day_count: usize,
    card_count: usize,
    due_count: usize,
    heatmap: Vec<HeatmapCell>,
}

pub fn get_stats(coll: &Collection, now: Timestamp) -> Fallible<Stats> {
    let user = &coll.config.user;
    let today = coll.config.calendar.day_of(now);
    let progress = coll.db.progress(user)?.value;
    Ok(Stats {
        user: user.clone(),
        today,
        current_streak: effective_streak(&progress, today),
        longest_streak: longest_streak(&progress),
        last_review_day: progress.last_review_day,
        today_review_count: progress.reviews_on(today),
        total_review_count: total_reviews(&progress),
        active_day_count: active_days(&progress),
        card_count: coll.db.card_count(user)?,
        due_count: coll.db.due_cards(user, today)?.len(),
        heatmap: history_window(&progress, today, HEATMAP_DAYS),
    })
}
