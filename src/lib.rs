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

//! recall: a spaced repetition scheduler with daily review streaks.
//!
//! The scheduling core is pure: it takes card and progress records in and
//! hands new records back, and never touches storage itself.
//! - `calendar`: calendar days under one fixed UTC offset
//! - `sm2`: the SM-2 interval and easiness update
//! - `streak`: consecutive-day streaks and the per-day review tally
//! - `review`: one review transaction over both
//!
//! `db` is a SQLite store for those records with optimistic concurrency, and
//! `cli` is the command line front end.

pub mod calendar;
pub mod cli;
pub mod cmd;
pub mod collection;
pub mod config;
pub mod db;
pub mod error;
pub mod review;
pub mod sm2;
pub mod stats;
pub mod streak;
pub mod types;

pub use calendar::Calendar;
pub use error::ErrorReport;
pub use error::Fallible;
pub use error::fail;
pub use review::review;
pub use types::card_state::CardState;
pub use types::day::DayId;
pub use types::progress::UserProgress;
pub use types::quality::Quality;
pub use types::timestamp::Timestamp;
