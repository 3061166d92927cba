//! Lenient HTML tag/text scanner.
//!
//! Produces a flat stream of text runs and start/end tags. There is no tree
//! building and no implied-end-tag logic: structure is the parser's concern.
//! Markup that can never be completed (a tag or comment still open at end of
//! input) is reported as a [`ParseError`].

use std::borrow::Cow;

use crate::entities::{decode_attribute, decode_entities};
use crate::error::ParseError;

/// Elements whose content is raw text up to the matching end tag.
const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style"];

/// One item of the tag/text stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token<'a> {
    /// Character data, entity-decoded.
    Text(Cow<'a, str>),
    /// An opening tag. Names are lowercased; valueless attributes carry `""`.
    StartTag {
        name: String,
        attrs: Vec<(String, String)>,
        self_closing: bool,
    },
    /// A closing tag with its lowercased name.
    EndTag { name: String },
}

impl Token<'_> {
    /// Look up an attribute of a start tag.
    pub fn attr(&self, key: &str) -> Option<&str> {
        match self {
            Token::StartTag { attrs, .. } => attrs
                .iter()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.as_str()),
            _ => None,
        }
    }
}

/// Iterator over the tokens of an HTML fragment.
///
/// Yields at most one `Err`, after which iteration ends.
pub struct Tokenizer<'a> {
    input: &'a str,
    pos: usize,
    raw_text: Option<&'static str>,
    done: bool,
}

impl<'a> Tokenizer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            pos: 0,
            raw_text: None,
            done: false,
        }
    }

    fn bytes(&self) -> &'a [u8] {
        self.input.as_bytes()
    }

    /// Whether the `<` at `at` opens markup rather than being literal text.
    fn starts_markup(&self, at: usize) -> bool {
        let bytes = self.bytes();
        match bytes.get(at + 1) {
            Some(b) if b.is_ascii_alphabetic() => true,
            Some(b'!' | b'?') => true,
            Some(b'/') => bytes.get(at + 2).is_some_and(u8::is_ascii_alphabetic),
            _ => false,
        }
    }

    /// Byte offset of the next markup-opening `<` at or after `from`.
    fn next_markup(&self, from: usize) -> Option<usize> {
        let mut search = from;
        while let Some(rel) = self.input[search..].find('<') {
            let at = search + rel;
            if self.starts_markup(at) {
                return Some(at);
            }
            search = at + 1;
        }
        None
    }

    fn read_text(&mut self) -> Token<'a> {
        let end = self.next_markup(self.pos).unwrap_or(self.input.len());
        let raw = &self.input[self.pos..end];
        self.pos = end;
        Token::Text(decode_entities(raw))
    }

    /// Consume raw text up to `</name` (case-insensitive) or end of input.
    fn read_raw_text(&mut self, name: &str) -> Option<Token<'a>> {
        let rest = &self.input[self.pos..];
        let needle = format!("</{name}");
        let end = rest
            .as_bytes()
            .windows(needle.len())
            .position(|w| w.eq_ignore_ascii_case(needle.as_bytes()))
            .map_or(self.input.len(), |rel| self.pos + rel);
        let raw = &self.input[self.pos..end];
        self.pos = end;
        (!raw.is_empty()).then(|| Token::Text(Cow::Borrowed(raw)))
    }

    /// Skip a comment, declaration or processing instruction starting at `self.pos`.
    fn skip_bogus(&mut self) -> Result<(), ParseError> {
        let start = self.pos;
        let (terminator, body_from) = if self.input[start..].starts_with("<!--") {
            ("-->", start + 4)
        } else {
            (">", start + 2)
        };
        match self.input[body_from..].find(terminator) {
            Some(rel) => {
                self.pos = body_from + rel + terminator.len();
                Ok(())
            }
            None => Err(ParseError::UnterminatedComment { offset: start }),
        }
    }

    fn read_name(&mut self) -> String {
        let bytes = self.bytes();
        let start = self.pos;
        while self.pos < bytes.len()
            && (bytes[self.pos].is_ascii_alphanumeric() || matches!(bytes[self.pos], b'-' | b':' | b'_'))
        {
            self.pos += 1;
        }
        self.input[start..self.pos].to_ascii_lowercase()
    }

    fn skip_whitespace(&mut self) {
        let bytes = self.bytes();
        while self.pos < bytes.len() && bytes[self.pos].is_ascii_whitespace() {
            self.pos += 1;
        }
    }

    fn read_end_tag(&mut self) -> Result<Token<'a>, ParseError> {
        let start = self.pos;
        self.pos += 2; // consume `</`
        let name = self.read_name();
        match self.input[self.pos..].find('>') {
            Some(rel) => {
                self.pos += rel + 1;
                Ok(Token::EndTag { name })
            }
            None => Err(ParseError::UnterminatedTag { name, offset: start }),
        }
    }

    fn read_start_tag(&mut self) -> Result<Token<'a>, ParseError> {
        let start = self.pos;
        self.pos += 1; // consume `<`
        let name = self.read_name();
        let unterminated = |name: &str| ParseError::UnterminatedTag {
            name: name.to_string(),
            offset: start,
        };

        let bytes = self.bytes();
        let mut attrs = Vec::new();
        let mut self_closing = false;

        loop {
            self.skip_whitespace();
            match bytes.get(self.pos) {
                None => return Err(unterminated(&name)),
                Some(b'>') => {
                    self.pos += 1;
                    break;
                }
                Some(b'/') => {
                    self.pos += 1;
                    if bytes.get(self.pos) == Some(&b'>') {
                        self.pos += 1;
                        self_closing = true;
                        break;
                    }
                    continue;
                }
                Some(_) => {}
            }

            // Attribute name: anything up to whitespace, `=`, `>` or `/`.
            let key_start = self.pos;
            while self.pos < bytes.len()
                && !bytes[self.pos].is_ascii_whitespace()
                && !matches!(bytes[self.pos], b'=' | b'>' | b'/')
            {
                self.pos += 1;
            }
            let key = self.input[key_start..self.pos].to_ascii_lowercase();

            self.skip_whitespace();
            if bytes.get(self.pos) != Some(&b'=') {
                attrs.push((key, String::new()));
                continue;
            }
            self.pos += 1; // consume `=`
            self.skip_whitespace();

            let value = match bytes.get(self.pos) {
                None => return Err(unterminated(&name)),
                Some(&quote) if quote == b'"' || quote == b'\'' => {
                    self.pos += 1;
                    let rel = self.input[self.pos..]
                        .find(quote as char)
                        .ok_or_else(|| unterminated(&name))?;
                    let raw = &self.input[self.pos..self.pos + rel];
                    self.pos += rel + 1;
                    raw
                }
                Some(_) => {
                    let val_start = self.pos;
                    while self.pos < bytes.len()
                        && !bytes[self.pos].is_ascii_whitespace()
                        && bytes[self.pos] != b'>'
                    {
                        self.pos += 1;
                    }
                    &self.input[val_start..self.pos]
                }
            };
            attrs.push((key, decode_attribute(value).into_owned()));
        }

        if !self_closing {
            self.raw_text = RAW_TEXT_ELEMENTS.iter().copied().find(|el| *el == name);
        }

        Ok(Token::StartTag {
            name,
            attrs,
            self_closing,
        })
    }

    fn next_token(&mut self) -> Option<Result<Token<'a>, ParseError>> {
        loop {
            if let Some(name) = self.raw_text.take() {
                if let Some(text) = self.read_raw_text(name) {
                    return Some(Ok(text));
                }
            }

            let bytes = self.bytes();
            if self.pos >= bytes.len() {
                return None;
            }

            if bytes[self.pos] != b'<' || !self.starts_markup(self.pos) {
                return Some(Ok(self.read_text()));
            }

            let token = match bytes[self.pos + 1] {
                b'!' | b'?' => {
                    if let Err(e) = self.skip_bogus() {
                        return Some(Err(e));
                    }
                    continue;
                }
                b'/' => self.read_end_tag(),
                _ => self.read_start_tag(),
            };
            return Some(token);
        }
    }
}

impl<'a> Iterator for Tokenizer<'a> {
    type Item = Result<Token<'a>, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let token = self.next_token();
        if matches!(token, None | Some(Err(_))) {
            self.done = true;
        }
        token
    }
}

/// Tokenize `input` into a stream of text runs and tags.
pub fn tokenize(input: &str) -> Tokenizer<'_> {
    Tokenizer::new(input)
}
