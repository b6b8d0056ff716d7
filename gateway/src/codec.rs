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


//! Byte oriented line framing
//!
//! Both the controlling stream and the feed program deliver `\n` terminated
//! lines. Raw telnet input is not guaranteed to be UTF-8 (negotiation bytes
//! start with `0xFF`), so lines are framed as bytes and only converted to
//! text after sanitization.

use bytes::BytesMut;
use rbngate_common::telnet;
use tokio_util::codec::{Decoder, FramedRead};

/// Longest line handed out in one piece; longer input is split
pub const MAX_LINE_LENGTH: usize = 1024;

/// Line reader over any async source
pub type LineReader<R> = FramedRead<R, RawLineCodec>;

/// Create a [`LineReader`] with the default line limit
pub fn line_reader<R: tokio::io::AsyncRead>(reader: R) -> LineReader<R> {
    FramedRead::new(reader, RawLineCodec::default())
}

/// Decoder splitting a byte stream on `\n`, dropping `\r\n` terminators
#[derive(Debug, Clone)]
pub struct RawLineCodec {
    max_length: usize,
    /// Bytes already searched for a newline
    next_index: usize,
}

impl RawLineCodec {
    pub fn with_max_length(max_length: usize) -> Self {
        Self {
            max_length: max_length.max(1),
            next_index: 0,
        }
    }
}

impl Default for RawLineCodec {
    fn default() -> Self {
        Self::with_max_length(MAX_LINE_LENGTH)
    }
}

fn strip_carriage_return(line: &mut BytesMut) {
    if line.last() == Some(&b'\r') {
        line.truncate(line.len() - 1);
    }
}

impl Decoder for RawLineCodec {
    type Item = BytesMut;
    type Error = std::io::Error;

    fn decode(&mut self, buf: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        let search_end = buf.len().min(self.max_length);
        let newline = buf[self.next_index..search_end]
            .iter()
            .position(|&byte| byte == b'\n')
            .map(|offset| self.next_index + offset);

        match newline {
            Some(index) => {
                self.next_index = 0;
                let mut line = buf.split_to(index + 1);
                line.truncate(index);
                strip_carriage_return(&mut line);
                Ok(Some(line))
            }
            None if buf.len() >= self.max_length => {
                self.next_index = 0;
                Ok(Some(buf.split_to(self.max_length)))
            }
            None => {
                self.next_index = search_end;
                Ok(None)
            }
        }
    }

    fn decode_eof(&mut self, buf: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        if let Some(line) = self.decode(buf)? {
            return Ok(Some(line));
        }
        if buf.is_empty() {
            return Ok(None);
        }

        self.next_index = 0;
        let mut line = buf.split_to(buf.len());
        strip_carriage_return(&mut line);
        Ok(Some(line))
    }
}

/// Strip telnet negotiation from a raw input line and decode it as text
pub fn sanitize_line(raw: &[u8]) -> String {
    if let Some(sequence) = telnet::find_control_sequence(raw) {
        tracing::debug!(
            "Stripping telnet sequence {:?} option {:?} at offset {}",
            sequence.command,
            sequence.option,
            sequence.offset
        );
    }
    String::from_utf8_lossy(telnet::strip_control_sequence(raw)).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;

    #[test]
    fn test_decode_lines() {
        let mut codec = RawLineCodec::default();
        let mut buf = BytesMut::from(&b"PC20^\r\nbye\n"[..]);

        assert_eq!(codec.decode(&mut buf).unwrap().unwrap(), &b"PC20^"[..]);
        assert_eq!(codec.decode(&mut buf).unwrap().unwrap(), &b"bye"[..]);
        assert!(codec.decode(&mut buf).unwrap().is_none());
    }

    #[test]
    fn test_decode_partial_line() {
        let mut codec = RawLineCodec::default();
        let mut buf = BytesMut::from(&b"PC51^K1A"[..]);
        assert!(codec.decode(&mut buf).unwrap().is_none());

        buf.extend_from_slice(b"BC^W2XYZ^1^\r\n");
        assert_eq!(
            codec.decode(&mut buf).unwrap().unwrap(),
            &b"PC51^K1ABC^W2XYZ^1^"[..]
        );
    }

    #[test]
    fn test_decode_keeps_telnet_bytes() {
        let mut codec = RawLineCodec::default();
        let mut buf = BytesMut::from(&[0xFF, 0xFB, 0x01, b'N', b'0', b'\r', b'\n'][..]);
        assert_eq!(
            codec.decode(&mut buf).unwrap().unwrap(),
            &[0xFF, 0xFB, 0x01, b'N', b'0'][..]
        );
    }

    #[test]
    fn test_decode_splits_long_lines() {
        let mut codec = RawLineCodec::with_max_length(4);
        let mut buf = BytesMut::from(&b"ABCDEFG\n"[..]);

        assert_eq!(codec.decode(&mut buf).unwrap().unwrap(), &b"ABCD"[..]);
        assert_eq!(codec.decode(&mut buf).unwrap().unwrap(), &b"EFG"[..]);
    }

    #[test]
    fn test_decode_eof_flushes_remainder() {
        let mut codec = RawLineCodec::default();
        let mut buf = BytesMut::from(&b"bye"[..]);
        assert!(codec.decode(&mut buf).unwrap().is_none());
        assert_eq!(codec.decode_eof(&mut buf).unwrap().unwrap(), &b"bye"[..]);
        assert!(codec.decode_eof(&mut buf).unwrap().is_none());
    }

    #[test]
    fn test_sanitize_line() {
        assert_eq!(sanitize_line(b"PC20^"), "PC20^");
        assert_eq!(sanitize_line(&[0xFF, 0xFD, 0x03, b'b', b'y', b'e']), "bye");
        assert_eq!(sanitize_line(&[b'x', 0xFF]), "");
    }

    #[tokio::test]
    async fn test_line_reader_over_stream() {
        let input: &[u8] = b"n0call\r\nPC20^\r\ntrailing";
        let mut lines = line_reader(input);

        assert_eq!(lines.next().await.unwrap().unwrap(), &b"n0call"[..]);
        assert_eq!(lines.next().await.unwrap().unwrap(), &b"PC20^"[..]);
        assert_eq!(lines.next().await.unwrap().unwrap(), &b"trailing"[..]);
        assert!(lines.next().await.is_none());
    }
}
