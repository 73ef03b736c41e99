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
use std::str::FromStr;

use chrono::Datelike;
use chrono::Duration;
use chrono::NaiveDate;
use rusqlite::ToSql;
use rusqlite::types::FromSql;
use rusqlite::types::FromSqlError;
use rusqlite::types::FromSqlResult;
use rusqlite::types::ToSqlOutput;
use rusqlite::types::ValueRef;
use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;
use serde::Serializer;

use crate::error::ErrorReport;
use crate::error::Fallible;

const FORMAT: &str = "%Y-%m-%d";

/// A calendar day in the anchor timezone. Carries no time of day, so two
/// `DayId`s compare by date alone.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct DayId(NaiveDate);

impl DayId {
    pub fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    pub fn from_ymd(year: i32, month: u32, day: u32) -> Fallible<Self> {
        match NaiveDate::from_ymd_opt(year, month, day) {
            Some(date) => Ok(Self(date)),
            None => Err(ErrorReport::new(format!(
                "invalid day: {year:04}-{month:02}-{day:02}"
            ))),
        }
    }

    pub fn into_inner(self) -> NaiveDate {
        self.0
    }

    /// Calendar addition. Saturates at the ends of the representable range
    /// instead of failing.
    pub fn add_days(self, n: i64) -> Self {
        let date = Duration::try_days(n)
            .and_then(|d| self.0.checked_add_signed(d))
            .unwrap_or(if n < 0 { NaiveDate::MIN } else { NaiveDate::MAX });
        Self(date)
    }

    pub fn yesterday(self) -> Self {
        self.add_days(-1)
    }

    /// Days since 0001-01-01 (day 1). This is the stored form: unlike the
    /// text form it orders correctly for years past 9999.
    pub fn day_number(self) -> i32 {
        self.0.num_days_from_ce()
    }

    pub fn from_day_number(n: i32) -> Fallible<Self> {
        match NaiveDate::from_num_days_from_ce_opt(n) {
            Some(date) => Ok(Self(date)),
            None => Err(ErrorReport::new(format!("invalid day number: {n}"))),
        }
    }
}

impl Display for DayId {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "{}", self.0.format(FORMAT))
    }
}

impl FromStr for DayId {
    type Err = ErrorReport;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let date = NaiveDate::parse_from_str(s, FORMAT)?;
        Ok(Self(date))
    }
}

impl ToSql for DayId {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.day_number()))
    }
}

impl FromSql for DayId {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let n: i32 = FromSql::column_result(value)?;
        DayId::from_day_number(n).map_err(|e| FromSqlError::Other(Box::new(e)))
    }
}

impl Serialize for DayId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for DayId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let string = String::deserialize(deserializer)?;
        DayId::from_str(&string).map_err(serde::de::Error::custom)
    }
}
