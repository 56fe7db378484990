use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use ssh_key::{HashAlg, PublicKey};

#[derive(thiserror::Error, Debug)]
pub enum KeyParseError {
    #[error("malformed key entry at byte offset {offset} (line {line}): {reason}")]
    MalformedKeyEntry {
        offset: usize,
        line: usize,
        reason: String,
    },
}

/// An SSH public key compared by its canonical wire encoding.
///
/// Comments and `authorized_keys` options are not part of identity: two keys
/// are the same key iff their encoded key data is byte-identical.
#[derive(Debug, Clone)]
pub struct Key {
    public: PublicKey,
    wire: Vec<u8>,
}

impl Key {
    pub fn new(public: PublicKey) -> Result<Self, ssh_key::Error> {
        let wire = public.to_bytes()?;
        Ok(Self { public, wire })
    }

    pub fn same_key_as(&self, other: &Key) -> bool {
        self.wire == other.wire
    }

    pub fn algorithm(&self) -> String {
        self.public.algorithm().as_str().to_string()
    }

    pub fn fingerprint(&self) -> String {
        self.public.fingerprint(HashAlg::Sha256).to_string()
    }

    /// `<algorithm> <base64>` without options or comment.
    pub fn canonical(&self) -> String {
        format!("{} {}", self.algorithm(), STANDARD.encode(&self.wire))
    }
}

impl PartialEq for Key {
    fn eq(&self, other: &Self) -> bool {
        self.same_key_as(other)
    }
}

impl Eq for Key {}

impl Serialize for Key {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("Key", 3)?;
        s.serialize_field("algorithm", &self.algorithm())?;
        s.serialize_field("key", &self.canonical())?;
        s.serialize_field("fingerprint", &self.fingerprint())?;
        s.end()
    }
}

#[derive(Debug, Clone)]
pub struct ParsedKey {
    pub key: Key,
    /// 1-based physical line of the entry.
    pub line: usize,
    pub comment: String,
}

/// Lazy reader over the entries of an `authorized_keys` file.
///
/// Blank lines and `#` comment lines are skipped. The first malformed entry
/// yields an error and ends the sequence.
pub struct KeyEntries<'a> {
    input: &'a [u8],
    offset: usize,
    line: usize,
    done: bool,
}

pub fn parse_keys(input: &[u8]) -> KeyEntries<'_> {
    KeyEntries {
        input,
        offset: 0,
        line: 0,
        done: false,
    }
}

/// Parses a whole file, aborting on the first malformed entry.
pub fn collect_keys(input: &[u8]) -> Result<Vec<ParsedKey>, KeyParseError> {
    parse_keys(input).collect()
}

impl KeyEntries<'_> {
    fn malformed(&mut self, offset: usize, reason: String) -> KeyParseError {
        self.done = true;
        KeyParseError::MalformedKeyEntry {
            offset,
            line: self.line,
            reason,
        }
    }
}

impl Iterator for KeyEntries<'_> {
    type Item = Result<ParsedKey, KeyParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let input = self.input;
        while self.offset < input.len() {
            let start = self.offset;
            let rest = &input[start..];
            let (raw, consumed) = match rest.iter().position(|b| *b == b'\n') {
                Some(i) => (&rest[..i], i + 1),
                None => (rest, rest.len()),
            };
            self.offset += consumed;
            self.line += 1;

            // Key material is ASCII; only comments and options may carry other bytes.
            let decoded = String::from_utf8_lossy(raw);
            let text = decoded.trim();
            if text.is_empty() || text.starts_with('#') {
                continue;
            }

            return Some(match parse_entry(text) {
                Ok((key, comment)) => Ok(ParsedKey {
                    key,
                    line: self.line,
                    comment,
                }),
                Err(e) => Err(self.malformed(start, e.to_string())),
            });
        }
        self.done = true;
        None
    }
}

/// Parses `[options] <algorithm> <base64> [comment]`.
///
/// Fields may be separated by any run of spaces or tabs. Options are only
/// looked for when the line does not start with a key.
fn parse_entry(text: &str) -> Result<(Key, String), ssh_key::Error> {
    match parse_key_fields(text) {
        Ok(parsed) => Ok(parsed),
        Err(first) => match skip_options(text) {
            Some(rest) => parse_key_fields(rest).map_err(|_| first),
            None => Err(first),
        },
    }
}

fn parse_key_fields(text: &str) -> Result<(Key, String), ssh_key::Error> {
    let (algorithm, rest) = next_field(text);
    let (data, rest) = next_field(rest);
    let public = PublicKey::from_openssh(&format!("{algorithm} {data}"))?;
    Ok((Key::new(public)?, rest.trim().to_string()))
}

fn next_field(text: &str) -> (&str, &str) {
    let text = text.trim_start();
    match text.find(char::is_whitespace) {
        Some(i) => text.split_at(i),
        None => (text, ""),
    }
}

/// Everything after the options field. Whitespace inside double quotes
/// belongs to the options; `\"` does not close a quote.
fn skip_options(text: &str) -> Option<&str> {
    let mut quoted = false;
    let mut escaped = false;
    for (i, c) in text.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' if quoted => escaped = true,
            '"' => quoted = !quoted,
            c if c.is_whitespace() && !quoted => return Some(text[i..].trim_start()),
            _ => {}
        }
    }
    None
}
