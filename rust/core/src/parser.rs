// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! STEP/IFC Parser using nom
//!
//! Zero-copy tokenization of entity statements and a quote-aware scanner
//! over the DATA section.

use nom::{
    branch::alt,
    bytes::complete::{take_while, take_while1},
    character::complete::{char, digit1, one_of},
    combinator::{map, map_res, opt, recognize},
    multi::separated_list0,
    sequence::{delimited, pair, preceded, tuple},
    IResult,
};

use crate::error::{Error, Result};

/// STEP token borrowed from the source text
#[derive(Debug, Clone, PartialEq)]
pub enum Token<'a> {
    /// Entity reference: #123
    EntityRef(u32),
    /// String literal, still STEP-escaped: 'it''s'
    String(&'a str),
    /// Integer: 42
    Integer(i64),
    /// Real: 3.14, 0., 1.5E-10
    Float(f64),
    /// Enumeration without the dots: .T. -> "T"
    Enum(&'a str),
    /// Aggregate: (1, 2, 3)
    List(Vec<Token<'a>>),
    /// Typed parameter: IFCLABEL('x'), IFCBOOLEAN(.T.)
    Typed(&'a str, Vec<Token<'a>>),
    /// Unset value: $
    Null,
    /// Derived value: *
    Derived,
}

/// One `#id=TYPE(...);` statement split into its parts
#[derive(Debug, Clone, PartialEq)]
pub struct RawEntity<'a> {
    pub id: u32,
    pub type_name: &'a str,
    pub attributes: Vec<Token<'a>>,
}

fn is_keyword_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

fn express_id(input: &str) -> IResult<&str, u32> {
    preceded(
        char('#'),
        map_res(digit1, |s: &str| lexical_core::parse::<u32>(s.as_bytes())),
    )(input)
}

fn entity_ref(input: &str) -> IResult<&str, Token> {
    map(express_id, Token::EntityRef)(input)
}

/// Body of a quoted string; a doubled quote is an escaped quote
fn quoted_body(input: &str) -> IResult<&str, &str> {
    let bytes = input.as_bytes();
    let mut i = 0;
    while let Some(offset) = memchr::memchr(b'\'', &bytes[i..]) {
        let at = i + offset;
        if bytes.get(at + 1) == Some(&b'\'') {
            i = at + 2;
            continue;
        }
        return Ok((&input[at..], &input[..at]));
    }
    Err(nom::Err::Error(nom::error::Error::new(
        input,
        nom::error::ErrorKind::Char,
    )))
}

fn string_literal(input: &str) -> IResult<&str, Token> {
    map(delimited(char('\''), quoted_body, char('\'')), Token::String)(input)
}

fn integer(input: &str) -> IResult<&str, Token> {
    map_res(recognize(pair(opt(one_of("+-")), digit1)), |s: &str| {
        lexical_core::parse::<i64>(s.as_bytes()).map(Token::Integer)
    })(input)
}

/// STEP reals always carry a '.'; "0." and "1.E3" are legal
fn float(input: &str) -> IResult<&str, Token> {
    map_res(
        recognize(tuple((
            opt(one_of("+-")),
            digit1,
            char('.'),
            opt(digit1),
            opt(tuple((one_of("eE"), opt(one_of("+-")), digit1))),
        ))),
        |s: &str| fast_float::parse::<f64, _>(s).map(Token::Float),
    )(input)
}

fn enum_value(input: &str) -> IResult<&str, Token> {
    map(
        delimited(char('.'), take_while1(is_keyword_char), char('.')),
        Token::Enum,
    )(input)
}

fn ws(input: &str) -> IResult<&str, &str> {
    take_while(char::is_whitespace)(input)
}

fn arguments(input: &str) -> IResult<&str, Vec<Token>> {
    delimited(
        char('('),
        separated_list0(char(','), token),
        preceded(ws, char(')')),
    )(input)
}

fn list(input: &str) -> IResult<&str, Token> {
    map(arguments, Token::List)(input)
}

fn typed_value(input: &str) -> IResult<&str, Token> {
    map(
        pair(take_while1(is_keyword_char), preceded(ws, arguments)),
        |(name, args)| Token::Typed(name, args),
    )(input)
}

fn token(input: &str) -> IResult<&str, Token> {
    delimited(
        ws,
        alt((
            float,
            integer,
            entity_ref,
            string_literal,
            enum_value,
            list,
            typed_value,
            map(char('$'), |_| Token::Null),
            map(char('*'), |_| Token::Derived),
        )),
        ws,
    )(input)
}

/// Parse a single entity statement
///
/// Example: `#123=IFCWALL('guid',#5,'Wall-001',$,$,#20,#30,'tag',.STANDARD.);`
pub fn parse_entity(input: &str) -> Result<RawEntity<'_>> {
    let result: IResult<&str, (u32, &str, Vec<Token>)> = tuple((
        delimited(ws, express_id, ws),
        preceded(char('='), delimited(ws, take_while1(is_keyword_char), ws)),
        arguments,
    ))(input);

    let (rest, (id, type_name, attributes)) =
        result.map_err(|e| Error::parse(0, format!("Failed to parse entity: {}", e)))?;

    let rest = rest.trim_start();
    if !rest.starts_with(';') {
        let consumed = input.len() - rest.len();
        return Err(Error::parse(consumed, "Expected ';' after entity arguments"));
    }

    Ok(RawEntity {
        id,
        type_name,
        attributes,
    })
}

/// Parse the argument list of a header statement such as `FILE_SCHEMA(('IFC4'));`
pub fn parse_arguments(input: &str) -> Result<Vec<Token<'_>>> {
    preceded(ws, arguments)(input)
        .map(|(_, args)| args)
        .map_err(|e| Error::parse(0, format!("Failed to parse arguments: {}", e)))
}

/// Undo STEP string encoding: `''`, `\\`, `\X\hh`, `\X2\hhhh...\X0\` and `\S\c`
pub fn decode_step_string(raw: &str) -> String {
    if !raw.contains('\'') && !raw.contains('\\') {
        return raw.to_string();
    }

    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;
    while let Some(c) = rest.chars().next() {
        if c == '\'' && rest.starts_with("''") {
            out.push('\'');
            rest = &rest[2..];
        } else if rest.starts_with("\\\\") {
            out.push('\\');
            rest = &rest[2..];
        } else if let Some(tail) = rest.strip_prefix("\\X2\\") {
            let end = tail.find("\\X0\\").unwrap_or(tail.len());
            let units: Vec<u16> = tail[..end]
                .as_bytes()
                .chunks(4)
                .filter(|chunk| chunk.len() == 4 && chunk.iter().all(u8::is_ascii_hexdigit))
                .filter_map(|chunk| std::str::from_utf8(chunk).ok())
                .filter_map(|hex| u16::from_str_radix(hex, 16).ok())
                .collect();
            out.extend(char::decode_utf16(units).map(|r| r.unwrap_or(char::REPLACEMENT_CHARACTER)));
            rest = tail.get(end + 4..).unwrap_or("");
        } else if let Some(tail) = rest.strip_prefix("\\X\\") {
            match tail
                .get(..2)
                .filter(|hex| hex.bytes().all(|b| b.is_ascii_hexdigit()))
                .and_then(|hex| u8::from_str_radix(hex, 16).ok())
            {
                Some(byte) => {
                    out.push(byte as char);
                    rest = &tail[2..];
                }
                None => {
                    out.push_str("\\X\\");
                    rest = tail;
                }
            }
        } else if let Some(tail) = rest.strip_prefix("\\S\\") {
            match tail.chars().next() {
                Some(shifted) if shifted.is_ascii() => {
                    out.push(char::from(shifted as u8 + 128));
                    rest = &tail[1..];
                }
                _ => {
                    out.push_str("\\S\\");
                    rest = tail;
                }
            }
        } else {
            out.push(c);
            rest = &rest[c.len_utf8()..];
        }
    }
    out
}

/// Position of the `;` terminating the statement that starts at `from`,
/// ignoring semicolons inside string literals
fn statement_end(bytes: &[u8], from: usize) -> Option<usize> {
    let mut pos = from;
    let mut in_string = false;
    while pos < bytes.len() {
        let offset = if in_string {
            memchr::memchr(b'\'', &bytes[pos..])?
        } else {
            memchr::memchr2(b'\'', b';', &bytes[pos..])?
        };
        let at = pos + offset;
        match bytes[at] {
            b';' => return Some(at),
            _ => {
                // '' inside a string is an escaped quote, not a terminator
                if in_string && bytes.get(at + 1) == Some(&b'\'') {
                    pos = at + 2;
                    continue;
                }
                in_string = !in_string;
                pos = at + 1;
            }
        }
    }
    None
}

/// Skip whitespace and `/* ... */` comments
fn skip_trivia(bytes: &[u8], mut pos: usize) -> usize {
    loop {
        while pos < bytes.len() && bytes[pos].is_ascii_whitespace() {
            pos += 1;
        }
        if bytes[pos..].starts_with(b"/*") {
            match memchr::memmem::find(&bytes[pos + 2..], b"*/") {
                Some(end) => pos += end + 4,
                None => return bytes.len(),
            }
        } else {
            return pos;
        }
    }
}

/// Byte offset of the first statement in the DATA section
pub fn data_section_start(content: &str) -> Option<usize> {
    memchr::memmem::find(content.as_bytes(), b"DATA;").map(|at| at + "DATA;".len())
}

/// Location of one entity statement in the source text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScannedEntity<'a> {
    pub id: u32,
    pub type_name: &'a str,
    /// Offset of the leading '#'
    pub start: usize,
    /// Offset just past the terminating ';'
    pub end: usize,
}

/// Statement scanner over the DATA section
///
/// Walks statement boundaries without tokenizing attributes, so a full scan
/// of a large file stays a single linear pass.
pub struct EntityScanner<'a> {
    content: &'a str,
    origin: usize,
    position: usize,
}

impl<'a> EntityScanner<'a> {
    /// Scanner starting at the DATA section (or the beginning if there is none)
    pub fn new(content: &'a str) -> Self {
        let origin = data_section_start(content).unwrap_or(0);
        Self {
            content,
            origin,
            position: origin,
        }
    }

    /// Next entity statement, or `None` at ENDSEC / end of input
    pub fn next_entity(&mut self) -> Option<ScannedEntity<'a>> {
        let bytes = self.content.as_bytes();
        loop {
            let start = skip_trivia(bytes, self.position);
            if start >= bytes.len() {
                self.position = bytes.len();
                return None;
            }
            let terminator = statement_end(bytes, start)?;
            self.position = terminator + 1;

            let statement = &self.content[start..terminator];
            if statement.trim_end() == "ENDSEC" {
                return None;
            }
            if let Some(found) = split_statement(statement) {
                let (id, type_offset, type_len) = found;
                let type_start = start + type_offset;
                return Some(ScannedEntity {
                    id,
                    type_name: &self.content[type_start..type_start + type_len],
                    start,
                    end: terminator + 1,
                });
            }
        }
    }

    /// Count entities by type name
    pub fn count_by_type(&mut self) -> rustc_hash::FxHashMap<&'a str, usize> {
        let mut counts = rustc_hash::FxHashMap::default();
        while let Some(entity) = self.next_entity() {
            *counts.entry(entity.type_name).or_insert(0) += 1;
        }
        counts
    }

    /// Reset scanner to the start of the DATA section
    pub fn reset(&mut self) {
        self.position = self.origin;
    }
}

impl<'a> Iterator for EntityScanner<'a> {
    type Item = ScannedEntity<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_entity()
    }
}

/// Split `#12 = IFCWALL(` into (12, offset of type name, type name length)
fn split_statement(statement: &str) -> Option<(u32, usize, usize)> {
    let bytes = statement.as_bytes();
    if bytes.first() != Some(&b'#') {
        return None;
    }
    let digits = bytes[1..].iter().take_while(|b| b.is_ascii_digit()).count();
    if digits == 0 {
        return None;
    }
    let id = lexical_core::parse::<u32>(&bytes[1..1 + digits]).ok()?;

    let mut pos = 1 + digits;
    while pos < bytes.len() && bytes[pos].is_ascii_whitespace() {
        pos += 1;
    }
    if bytes.get(pos) != Some(&b'=') {
        return None;
    }
    pos += 1;
    while pos < bytes.len() && bytes[pos].is_ascii_whitespace() {
        pos += 1;
    }
    let type_len = bytes[pos..]
        .iter()
        .take_while(|&&b| b.is_ascii_alphanumeric() || b == b'_')
        .count();
    if type_len == 0 {
        return None;
    }
    Some((id, pos, type_len))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar_tokens() {
        assert_eq!(entity_ref("#123"), Ok(("", Token::EntityRef(123))));
        assert_eq!(integer("-42"), Ok(("", Token::Integer(-42))));
        assert_eq!(float("0."), Ok(("", Token::Float(0.0))));
        assert_eq!(float("1.5E-10"), Ok(("", Token::Float(1.5e-10))));
        assert_eq!(enum_value(".T."), Ok(("", Token::Enum("T"))));
    }

    #[test]
    fn test_string_with_escaped_quote() {
        assert_eq!(
            string_literal("'it''s a wall'"),
            Ok(("", Token::String("it''s a wall")))
        );
        assert_eq!(decode_step_string("it''s a wall"), "it's a wall");
    }

    #[test]
    fn test_decode_extended_encodings() {
        assert_eq!(decode_step_string("T\\X2\\00FC\\X0\\r"), "Tür");
        assert_eq!(decode_step_string("\\X\\E9t\\X\\E9"), "été");
        assert_eq!(decode_step_string("plain"), "plain");
    }

    #[test]
    fn test_escape_requires_hex_digits() {
        assert_eq!(decode_step_string("\\X\\+F"), "\\X\\+F");
        assert_eq!(decode_step_string("a\\X\\-1b"), "a\\X\\-1b");
        assert_eq!(decode_step_string("\\X2\\+0FC00E9\\X0\\"), "é");
    }

    #[test]
    fn test_typed_value() {
        let (_, token) = token("IFCBOOLEAN(.T.)").unwrap();
        assert_eq!(token, Token::Typed("IFCBOOLEAN", vec![Token::Enum("T")]));
    }

    #[test]
    fn test_parse_entity() {
        let entity = parse_entity("#9 = IFCDIRECTION((0.,0.,1.));").unwrap();
        assert_eq!(entity.id, 9);
        assert_eq!(entity.type_name, "IFCDIRECTION");
        match &entity.attributes[0] {
            Token::List(items) => assert_eq!(items.len(), 3),
            other => panic!("Expected list, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_entity_rejects_missing_terminator() {
        assert!(parse_entity("#1=IFCWALL('a',$)").is_err());
    }

    #[test]
    fn test_scanner_skips_header_and_quoted_semicolons() {
        let content = "ISO-10303-21;\nHEADER;\nFILE_DESCRIPTION(('#1=FAKE();'),'2;1');\nENDSEC;\nDATA;\n\
#1=IFCPROJECT('g',$,'A;B',$,$,$,$,$,$);\n/* comment ; */\n#2 = IFCWALL('g2',$,'it''s;',$,$,$,$,$);\nENDSEC;\nEND-ISO-10303-21;\n";

        let found: Vec<_> = EntityScanner::new(content).collect();
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].id, 1);
        assert_eq!(found[0].type_name, "IFCPROJECT");
        assert_eq!(found[1].id, 2);
        assert_eq!(found[1].type_name, "IFCWALL");
        assert!(content[found[1].start..found[1].end].ends_with(");"));
    }

    #[test]
    fn test_count_by_type() {
        let content = "DATA;\n#1=IFCWALL('a');\n#2=IFCDOOR('b');\n#3=IFCWALL('c');\nENDSEC;";
        let mut scanner = EntityScanner::new(content);
        let counts = scanner.count_by_type();
        assert_eq!(counts.get("IFCWALL"), Some(&2));
        assert_eq!(counts.get("IFCDOOR"), Some(&1));

        scanner.reset();
        assert_eq!(scanner.next_entity().map(|e| e.id), Some(1));
    }
}
