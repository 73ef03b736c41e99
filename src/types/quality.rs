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

use rusqlite::ToSql;
use rusqlite::types::FromSql;
use rusqlite::types::FromSqlError;
use rusqlite::types::FromSqlResult;
use rusqlite::types::ToSqlOutput;
use rusqlite::types::ValueRef;
use serde::Serialize;

use crate::error::Fallible;
use crate::error::fail;

/// The lowest quality that counts as successful recall.
const PASSING: u8 = 3;

/// A self-assessed recall rating from 0 (blackout) to 5 (perfect).
///
/// Out-of-range ratings are rejected rather than clamped.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug, Serialize)]
pub struct Quality(u8);

impl Quality {
    pub const MAX: Quality = Quality(5);

    pub fn new(value: i64) -> Fallible<Self> {
        match u8::try_from(value) {
            Ok(q) if q <= Self::MAX.0 => Ok(Self(q)),
            _ => fail(format!("quality must be between 0 and 5, got {value}")),
        }
    }

    pub fn value(self) -> u8 {
        self.0
    }

    pub fn is_passing(self) -> bool {
        self.0 >= PASSING
    }
}

impl Display for Quality {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl ToSql for Quality {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.0))
    }
}

impl FromSql for Quality {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let n: i64 = FromSql::column_result(value)?;
        Quality::new(n).map_err(|e| FromSqlError::Other(Box::new(e)))
    }
}
