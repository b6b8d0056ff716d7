//
// Copyright 2025-2026 Hans W. Uhlig. All Rights Reserved.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//


//! Caller call signs

use std::fmt;

/// Normalized call sign of the connecting node
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Callsign(String);

impl Callsign {
    /// Derive a call sign from the login line.
    ///
    /// Leading whitespace is skipped, the first token is kept and upper
    /// cased. Returns `None` when the line holds no token at all.
    pub fn from_login(line: &str) -> Option<Self> {
        let call: String = line
            .trim_start()
            .chars()
            .take_while(|c| !c.is_whitespace() && !c.is_control())
            .map(|c| c.to_ascii_uppercase())
            .collect();

        if call.is_empty() { None } else { Some(Self(call)) }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Callsign {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Callsign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
