//! Recursive descent parser for pattern strings.

use std::iter::Peekable;
use std::str::Chars;

use itertools::Itertools;
use thiserror::Error;

use super::ast::*;
use super::classes::POSIX_CLASSES;

/// Errors that can occur while compiling a pattern.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("unexpected `{0}` in pattern")]
    UnexpectedChar(char),
    #[error("unexpected end of pattern")]
    UnexpectedEnd,
    #[error("nothing to repeat")]
    NothingToRepeat,
    #[error("unmatched `)`")]
    UnmatchedParen,
    #[error("unclosed group")]
    UnclosedGroup,
    #[error("unsupported group syntax `(?{0}`")]
    UnsupportedGroup(char),
    #[error("invalid group name")]
    BadGroupName,
    #[error("unclosed character class")]
    UnclosedClass,
    #[error("invalid range in character class")]
    BadClassRange,
    #[error("unknown POSIX class `[:{0}:]`")]
    UnknownPosixClass(String),
    #[error("only ASCII is allowed inside a character class")]
    NonAsciiInClass,
    #[error("invalid repeat bounds")]
    BadRepeat,
    #[error("unsupported escape `\\{0}`")]
    UnsupportedEscape(char),
    #[error("invalid `\\x` escape")]
    BadHexEscape,
    #[error("invalid backreference `\\{0}`")]
    BadBackref(usize),
    #[error("undefined name reference `{0}`")]
    UndefinedNameRef(String),
}

/// Parse a pattern string into an [`Ast`].
pub fn parse(input: &str) -> Result<Ast, ParseError> {
    let mut parser = Parser {
        chars: input.chars().peekable(),
        group_count: 0,
        names: Vec::new(),
        name_refs: Vec::new(),
        max_backref: 0,
    };
    let root = parser.parse_alternation()?;
    if parser.chars.next().is_some() {
        // parse_alternation stops only at `)` or the end of input
        return Err(ParseError::UnmatchedParen);
    }
    parser.finish(root)
}

struct Parser<'a> {
    chars: Peekable<Chars<'a>>,
    group_count: usize,
    names: Vec<NamedGroup>,
    /// Names used by `\k<...>`, checked against `names` once parsing ends.
    name_refs: Vec<String>,
    max_backref: usize,
}

/// A class member before range handling: a plain byte may form a range,
/// anything else may not.
enum ClassAtom {
    Byte(u8),
    Part(ClassPart),
}

impl Parser<'_> {
    fn parse_alternation(&mut self) -> Result<Alternation, ParseError> {
        let mut branches = vec![self.parse_sequence()?];
        while self.chars.next_if_eq(&'|').is_some() {
            branches.push(self.parse_sequence()?);
        }
        Ok(Alternation { branches })
    }

    fn parse_sequence(&mut self) -> Result<Sequence, ParseError> {
        let mut items = Vec::new();
        while !matches!(self.chars.peek(), None | Some('|') | Some(')')) {
            let element = self.parse_element()?;
            let quantifier = self.parse_quantifier(&element)?;
            items.push(Item {
                quantifier,
                element,
            });
        }
        Ok(Sequence { items })
    }

    fn parse_element(&mut self) -> Result<Element, ParseError> {
        let ch = self.chars.next().ok_or(ParseError::UnexpectedEnd)?;
        match ch {
            '(' => self.parse_group(),
            '[' => self.parse_class(),
            '.' => Ok(Element::Any),
            '^' => Ok(Element::Anchor(Anchor::LineStart)),
            '$' => Ok(Element::Anchor(Anchor::LineEnd)),
            '\\' => self.parse_escape(),
            '*' | '+' | '?' => Err(ParseError::NothingToRepeat),
            '{' | '}' => Err(ParseError::UnexpectedChar(ch)),
            _ => Ok(literal_element(ch)),
        }
    }

    fn parse_group(&mut self) -> Result<Element, ParseError> {
        let index = if self.chars.next_if_eq(&'?').is_some() {
            match self.chars.next() {
                Some(':') => None,
                Some('<') => {
                    if matches!(self.chars.peek(), Some('=') | Some('!')) {
                        // lookbehind
                        return Err(ParseError::UnsupportedGroup('<'));
                    }
                    let name = self.parse_group_name()?;
                    let number = self.next_group_number();
                    self.define_name(name, number);
                    Some(number)
                }
                Some(other) => return Err(ParseError::UnsupportedGroup(other)),
                None => return Err(ParseError::UnexpectedEnd),
            }
        } else {
            Some(self.next_group_number())
        };
        let inner = self.parse_alternation()?;
        if self.chars.next_if_eq(&')').is_none() {
            return Err(ParseError::UnclosedGroup);
        }
        Ok(Element::Group { index, inner })
    }

    fn next_group_number(&mut self) -> usize {
        self.group_count += 1;
        self.group_count
    }

    /// Identifier up to the closing `>` of `(?<...>` or `\k<...>`.
    fn parse_group_name(&mut self) -> Result<String, ParseError> {
        let name: String = self
            .chars
            .peeking_take_while(|ch| ch.is_ascii_alphanumeric() || *ch == '_')
            .collect();
        if self.chars.next_if_eq(&'>').is_none() {
            return Err(ParseError::BadGroupName);
        }
        if name.is_empty() || name.starts_with(|ch: char| ch.is_ascii_digit()) {
            return Err(ParseError::BadGroupName);
        }
        Ok(name)
    }

    fn define_name(&mut self, name: String, number: usize) {
        if let Some(entry) = self.names.iter_mut().find(|entry| entry.name == name) {
            entry.numbers.push(number);
        } else {
            self.names.push(NamedGroup {
                name,
                numbers: vec![number],
            });
        }
    }

    fn parse_escape(&mut self) -> Result<Element, ParseError> {
        let ch = self.chars.next().ok_or(ParseError::UnexpectedEnd)?;
        match ch {
            'A' => Ok(Element::Anchor(Anchor::TextStart)),
            'z' => Ok(Element::Anchor(Anchor::TextEnd)),
            'd' | 'D' => Ok(shorthand_element(ByteClass::Digit, ch.is_ascii_uppercase())),
            'w' | 'W' => Ok(shorthand_element(ByteClass::Word, ch.is_ascii_uppercase())),
            's' | 'S' => Ok(shorthand_element(ByteClass::Space, ch.is_ascii_uppercase())),
            'h' | 'H' => Ok(shorthand_element(ByteClass::Hex, ch.is_ascii_uppercase())),
            'k' => {
                if self.chars.next_if_eq(&'<').is_none() {
                    return Err(ParseError::BadGroupName);
                }
                let name = self.parse_group_name()?;
                self.name_refs.push(name.clone());
                Ok(Element::NamedBackref(name))
            }
            '1'..='9' => {
                let number = ch as usize - '0' as usize;
                self.max_backref = self.max_backref.max(number);
                Ok(Element::NumberBackref(number))
            }
            'x' => Ok(Element::Literal(vec![self.parse_hex_byte()?])),
            _ => escape_byte(ch)
                .map(|byte| Element::Literal(vec![byte]))
                .ok_or(ParseError::UnsupportedEscape(ch)),
        }
    }

    /// Exactly two hex digits after `\x`.
    fn parse_hex_byte(&mut self) -> Result<u8, ParseError> {
        let hi = self
            .chars
            .next()
            .and_then(|ch| ch.to_digit(16))
            .ok_or(ParseError::BadHexEscape)?;
        let lo = self
            .chars
            .next()
            .and_then(|ch| ch.to_digit(16))
            .ok_or(ParseError::BadHexEscape)?;
        Ok((hi * 16 + lo) as u8)
    }

    fn parse_class(&mut self) -> Result<Element, ParseError> {
        let negated = self.chars.next_if_eq(&'^').is_some();
        let mut parts = Vec::new();
        if self.chars.next_if_eq(&']').is_some() {
            // `]` right after the opening bracket is a member, not the close
            parts.push(ClassPart::Byte(b']'));
        }
        loop {
            match self.chars.peek() {
                None => return Err(ParseError::UnclosedClass),
                Some(']') => {
                    self.chars.next();
                    break;
                }
                _ => {}
            }
            match self.parse_class_atom()? {
                ClassAtom::Part(part) => parts.push(part),
                ClassAtom::Byte(lo) => {
                    if self.chars.next_if_eq(&'-').is_none() {
                        parts.push(ClassPart::Byte(lo));
                    } else if matches!(self.chars.peek(), Some(']') | None) {
                        // trailing `-` is a literal member
                        parts.push(ClassPart::Byte(lo));
                        parts.push(ClassPart::Byte(b'-'));
                    } else {
                        let ClassAtom::Byte(hi) = self.parse_class_atom()? else {
                            return Err(ParseError::BadClassRange);
                        };
                        if hi < lo {
                            return Err(ParseError::BadClassRange);
                        }
                        parts.push(ClassPart::Range(lo, hi));
                    }
                }
            }
        }
        Ok(Element::Class(ClassSet { negated, parts }))
    }

    fn parse_class_atom(&mut self) -> Result<ClassAtom, ParseError> {
        let ch = self.chars.next().ok_or(ParseError::UnclosedClass)?;
        match ch {
            '[' if self.chars.peek() == Some(&':') => {
                self.chars.next();
                let negated = self.chars.next_if_eq(&'^').is_some();
                let name: String = self
                    .chars
                    .peeking_take_while(|ch| ch.is_ascii_lowercase())
                    .collect();
                if self.chars.next_if_eq(&':').is_none() || self.chars.next_if_eq(&']').is_none() {
                    return Err(ParseError::UnclosedClass);
                }
                let class = POSIX_CLASSES
                    .get(name.as_str())
                    .copied()
                    .ok_or_else(|| ParseError::UnknownPosixClass(name))?;
                Ok(ClassAtom::Part(ClassPart::Class { class, negated }))
            }
            '\\' => self.parse_class_escape(),
            _ if ch.is_ascii() => Ok(ClassAtom::Byte(ch as u8)),
            _ => Err(ParseError::NonAsciiInClass),
        }
    }

    fn parse_class_escape(&mut self) -> Result<ClassAtom, ParseError> {
        let ch = self.chars.next().ok_or(ParseError::UnclosedClass)?;
        let shorthand = |class| {
            Ok(ClassAtom::Part(ClassPart::Class {
                class,
                negated: ch.is_ascii_uppercase(),
            }))
        };
        match ch {
            'd' | 'D' => shorthand(ByteClass::Digit),
            'w' | 'W' => shorthand(ByteClass::Word),
            's' | 'S' => shorthand(ByteClass::Space),
            'h' | 'H' => shorthand(ByteClass::Hex),
            'x' => Ok(ClassAtom::Byte(self.parse_hex_byte()?)),
            _ => escape_byte(ch)
                .map(ClassAtom::Byte)
                .ok_or(ParseError::UnsupportedEscape(ch)),
        }
    }

    fn parse_quantifier(&mut self, element: &Element) -> Result<Quantifier, ParseError> {
        let (min, max) = match self.chars.peek() {
            Some('*') => {
                self.chars.next();
                (0, None)
            }
            Some('+') => {
                self.chars.next();
                (1, None)
            }
            Some('?') => {
                self.chars.next();
                (0, Some(1))
            }
            Some('{') => {
                self.chars.next();
                self.parse_repeat_bounds()?
            }
            _ => return Ok(Quantifier::ONCE),
        };
        if matches!(element, Element::Anchor(_)) {
            return Err(ParseError::NothingToRepeat);
        }
        let lazy = self.chars.next_if_eq(&'?').is_some();
        Ok(Quantifier { min, max, lazy })
    }

    /// The inside of `{n}`, `{n,}` or `{n,m}`; the `{` is already consumed.
    fn parse_repeat_bounds(&mut self) -> Result<(u32, Option<u32>), ParseError> {
        let min = self.parse_number()?.ok_or(ParseError::BadRepeat)?;
        let max = if self.chars.next_if_eq(&',').is_some() {
            self.parse_number()?
        } else {
            Some(min)
        };
        if self.chars.next_if_eq(&'}').is_none() {
            return Err(ParseError::BadRepeat);
        }
        if let Some(max) = max
            && max < min
        {
            return Err(ParseError::BadRepeat);
        }
        Ok((min, max))
    }

    fn parse_number(&mut self) -> Result<Option<u32>, ParseError> {
        let digits: String = self
            .chars
            .peeking_take_while(|ch| ch.is_ascii_digit())
            .collect();
        if digits.is_empty() {
            return Ok(None);
        }
        digits
            .parse::<u32>()
            .map(Some)
            .map_err(|_| ParseError::BadRepeat)
    }

    /// Validations that need the whole pattern: backreference targets.
    fn finish(self, root: Alternation) -> Result<Ast, ParseError> {
        if self.max_backref > self.group_count {
            return Err(ParseError::BadBackref(self.max_backref));
        }
        for name in &self.name_refs {
            if !self.names.iter().any(|entry| entry.name == *name) {
                return Err(ParseError::UndefinedNameRef(name.clone()));
            }
        }
        Ok(Ast {
            root,
            group_count: self.group_count,
            names: self.names,
        })
    }
}

fn literal_element(ch: char) -> Element {
    let mut buf = [0u8; 4];
    Element::Literal(ch.encode_utf8(&mut buf).as_bytes().to_vec())
}

fn shorthand_element(class: ByteClass, negated: bool) -> Element {
    Element::Class(ClassSet {
        negated,
        parts: vec![ClassPart::Class {
            class,
            negated: false,
        }],
    })
}

/// Byte value of a single-character escape, `None` when `\ch` has no
/// meaning here.
fn escape_byte(ch: char) -> Option<u8> {
    match ch {
        'n' => Some(b'\n'),
        't' => Some(b'\t'),
        'r' => Some(b'\r'),
        'f' => Some(0x0c),
        'v' => Some(0x0b),
        'a' => Some(0x07),
        'e' => Some(0x1b),
        '0' => Some(0),
        _ if ch.is_ascii() && !ch.is_ascii_alphanumeric() => Some(ch as u8),
        _ => None,
    }
}
