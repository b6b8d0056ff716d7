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


//! Telnet control sequences
//!
//! Cluster nodes connect through telnet, so raw input may carry `IAC`
//! negotiation sequences (`0xFF` followed by a command and an option byte).
//! These must be removed before a line is read as a call sign or command.

/// Telnet command codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum TelnetCommand {
    /// Interpret As Command
    IAC = 255,
    /// Don't do option
    DONT = 254,
    /// Do option
    DO = 253,
    /// Won't do option
    WONT = 252,
    /// Will do option
    WILL = 251,
    /// Subnegotiation begin
    SB = 250,
    /// Go ahead
    GA = 249,
    /// Are you there
    AYT = 246,
    /// Interrupt process
    IP = 244,
    /// No operation
    NOP = 241,
    /// Subnegotiation end
    SE = 240,
}

impl TelnetCommand {
    /// Convert byte to telnet command
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            255 => Some(Self::IAC),
            254 => Some(Self::DONT),
            253 => Some(Self::DO),
            252 => Some(Self::WONT),
            251 => Some(Self::WILL),
            250 => Some(Self::SB),
            249 => Some(Self::GA),
            246 => Some(Self::AYT),
            244 => Some(Self::IP),
            241 => Some(Self::NOP),
            240 => Some(Self::SE),
            _ => None,
        }
    }

    /// Convert command to byte
    pub fn to_byte(self) -> u8 {
        self as u8
    }
}

/// A control sequence located in an input line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControlSequence {
    /// Offset of the `IAC` byte
    pub offset: usize,
    /// Command byte, if present and known
    pub command: Option<TelnetCommand>,
    /// Option byte, if present
    pub option: Option<u8>,
}

/// Locate the last `IAC` sequence in `line`
pub fn find_control_sequence(line: &[u8]) -> Option<ControlSequence> {
    let offset = line
        .iter()
        .rposition(|&byte| byte == TelnetCommand::IAC.to_byte())?;

    Some(ControlSequence {
        offset,
        command: line.get(offset + 1).copied().and_then(TelnetCommand::from_byte),
        option: line.get(offset + 2).copied(),
    })
}

/// Remove a telnet control sequence from a raw input line.
///
/// The line is scanned from the end for the last `IAC` byte. That byte, the
/// two bytes following it and everything before it are discarded; the rest
/// of the line is returned. Lines without `IAC` are returned unchanged. A
/// sequence truncated by the end of the line leaves nothing behind.
pub fn strip_control_sequence(line: &[u8]) -> &[u8] {
    match find_control_sequence(line) {
        Some(sequence) => line.get(sequence.offset + 3..).unwrap_or(&[]),
        None => line,
    }
}
