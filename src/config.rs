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

use std::fs::read_to_string;
use std::path::Path;

use serde::Deserialize;

use crate::calendar::Calendar;
use crate::calendar::DEFAULT_ANCHOR_OFFSET;
use crate::error::Fallible;
use crate::error::fail;

/// The name of the optional configuration file in a collection directory.
pub const CONFIG_FILE: &str = "recall.toml";

/// The user to act as when none is configured.
pub const DEFAULT_USER: &str = "default";

/// The contents of `recall.toml`. Every key is optional.
#[derive(Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    anchor_offset: Option<String>,
    user: Option<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    pub calendar: Calendar,
    pub user: String,
}

impl Config {
    /// Reads `recall.toml` from `directory` if present. A user given on the
    /// command line takes precedence over the file.
    pub fn load(directory: &Path, user: Option<String>) -> Fallible<Self> {
        let path = directory.join(CONFIG_FILE);
        let file: ConfigFile = if path.exists() {
            let content = read_to_string(&path)?;
            toml::from_str(&content)?
        } else {
            ConfigFile::default()
        };
        let offset = file
            .anchor_offset
            .unwrap_or_else(|| DEFAULT_ANCHOR_OFFSET.to_string());
        let calendar = Calendar::from_offset_str(&offset)?;
        let user = user
            .or(file.user)
            .unwrap_or_else(|| DEFAULT_USER.to_string());
        let user = user.trim().to_string();
        if user.is_empty() {
            return fail("user name must not be empty.");
        }
        log::debug!("Anchor offset {}, user {user}", calendar.offset());
        Ok(Self { calendar, user })
    }
}
