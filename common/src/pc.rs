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


//! PC protocol messages
//!
//! DX cluster nodes talk to each other with `^` delimited lines. The first
//! field is a message tag such as `PC18` or `PC51` and a well formed message
//! always ends with a trailing delimiter.

use std::fmt;

/// Field delimiter used by every PC message
pub const DELIMITER: char = '^';

/// Node capability announcement sent after login
pub const PC18: &str = "PC18";

/// Initialisation request from the remote node
pub const PC20: &str = "PC20";

/// Initialisation complete
pub const PC22: &str = "PC22";

/// Keep-alive ping and pong
pub const PC51: &str = "PC51";

/// Software identification announced in PC18
pub const SOFTWARE_VERSION: &str = "DXSpider Version: 1.55 Build: 0.166 Git: 4868adf[i] pc9x";

/// Protocol version announced in PC18
pub const PROTOCOL_VERSION: &str = "5455";

/// A single PC protocol message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PcMessage {
    tag: String,
    fields: Vec<String>,
}

impl PcMessage {
    /// Create a message with no fields beyond the tag
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            fields: Vec::new(),
        }
    }

    /// Append a field
    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.fields.push(field.into());
        self
    }

    /// Parse a received line.
    ///
    /// Returns `None` when the line does not start with a `PC` tag. Line
    /// terminators are ignored and the empty field produced by the trailing
    /// delimiter is dropped, so `PC51^A^B^1^` has three fields.
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim_end_matches(['\r', '\n']);
        if !line.starts_with("PC") {
            return None;
        }

        let body = line.strip_suffix(DELIMITER).unwrap_or(line);
        let mut parts = body.split(DELIMITER);
        let tag = parts.next()?.to_string();
        let fields = parts.map(str::to_string).collect();

        Some(Self { tag, fields })
    }

    /// Message tag, e.g. `PC51`
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Fields following the tag
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    /// Field at `index` (zero based, tag excluded), empty when absent
    pub fn field(&self, index: usize) -> &str {
        self.fields.get(index).map(String::as_str).unwrap_or("")
    }

    /// PC18 capability announcement identifying this node as a DXSpider peer
    pub fn capabilities() -> Self {
        Self::new(PC18)
            .with_field(SOFTWARE_VERSION)
            .with_field(PROTOCOL_VERSION)
    }

    /// PC22 reply to a PC20 initialisation request
    pub fn init_done() -> Self {
        Self::new(PC22)
    }

    /// Answer to a PC51 ping.
    ///
    /// The tag is echoed, the sender's call (field 1) is addressed as the
    /// destination, `local_call` becomes the origin and the flag is always `0`.
    /// Missing fields are treated as empty.
    pub fn pong(&self, local_call: &str) -> Self {
        Self::new(self.tag.clone())
            .with_field(self.field(1))
            .with_field(local_call)
            .with_field("0")
    }
}

impl fmt::Display for PcMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.tag)?;
        for field in &self.fields {
            write!(f, "{}{}", DELIMITER, field)?;
        }
        write!(f, "{}", DELIMITER)
    }
}
