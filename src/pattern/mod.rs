//! Bundled backtracking pattern engine.
//!
//! [`Pattern::new`] compiles a pattern once; the compiled value implements
//! [`Matcher`](crate::Matcher) and plugs into the scan entry points.
//! Matching is byte-oriented: a non-ASCII literal matches its UTF-8 byte
//! sequence, and character classes cover single bytes only.
//!
//! # Pattern syntax
//!
//! | Token             | Meaning                                        |
//! |-------------------|------------------------------------------------|
//! | `a`, `é`          | Literal character, as its UTF-8 bytes          |
//! | `\n` `\t` `\r` …  | Control escapes (`\f` `\v` `\a` `\e` `\0`)     |
//! | `\xHH`            | Byte with hex value `HH`                       |
//! | `.`               | Any byte except newline                        |
//! | `[abc]`, `[a-f]`  | Byte set; ranges are inclusive                 |
//! | `[^…]`            | Negated byte set                               |
//! | `[[:alpha:]]`     | POSIX class (`[[:^alpha:]]` negates)           |
//! | `\d` `\w` `\s` `\h` | Class shorthands; uppercase negates          |
//! | `X*` `X+` `X?`    | Zero or more, one or more, optional            |
//! | `X{n}` `X{n,}` `X{n,m}` | Counted repeats                          |
//! | `X*?` `X+?` …     | Lazy variant of any quantifier                 |
//! | `X\|Y`            | Alternation, leftmost branch first             |
//! | `(…)`             | Capturing group                                |
//! | `(?:…)`           | Non-capturing group                            |
//! | `(?<name>…)`      | Named capturing group                          |
//! | `\1` … `\9`       | Backreference to group *n*                     |
//! | `\k<name>`        | Backreference by name                          |
//! | `^` `$`           | Line start / line end within the window        |
//! | `\A` `\z`         | Window start / window end                      |

mod ast;
mod classes;
mod matcher;
mod parser;

pub use parser::ParseError;

use std::ops::Range;

use crate::engine::Matcher;
use crate::region::{RegionSet, UNSET};

use ast::Ast;
use matcher::MatchSpans;

/// A compiled pattern.
#[derive(Debug)]
pub struct Pattern {
    ast: Ast,
    source: String,
}

impl Pattern {
    /// Compiles `source`.
    pub fn new(source: &str) -> Result<Pattern, ParseError> {
        Ok(Pattern {
            ast: parser::parse(source)?,
            source: source.to_owned(),
        })
    }

    /// The text this pattern was compiled from.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Number of capturing groups.
    pub fn group_count(&self) -> usize {
        self.ast.group_count
    }
}

impl Matcher for Pattern {
    fn match_at(
        &self,
        text: &str,
        window: Range<usize>,
        at: usize,
        regs: &mut RegionSet,
    ) -> Option<usize> {
        let spans = matcher::match_at(&self.ast, text.as_bytes(), window.clone(), at)?;
        write_regions(regs, &spans, window.start);
        Some(spans.end - spans.start)
    }

    fn search_in(
        &self,
        text: &str,
        window: Range<usize>,
        from: usize,
        regs: &mut RegionSet,
    ) -> Option<usize> {
        let spans = matcher::search_in(&self.ast, text.as_bytes(), window.clone(), from)?;
        write_regions(regs, &spans, window.start);
        Some(spans.start - window.start)
    }

    fn for_each_named_group(&self, visit: &mut dyn FnMut(&str, &[usize])) {
        for entry in &self.ast.names {
            visit(&entry.name, &entry.numbers);
        }
    }

    fn name_to_backref(&self, name: &str, regs: &RegionSet) -> Option<usize> {
        let entry = self.ast.names.iter().find(|entry| entry.name == name)?;
        if let [number] = entry.numbers.as_slice() {
            return Some(*number);
        }
        for &number in entry.numbers.iter().rev() {
            if number < regs.len() && regs.begin(number) >= 0 {
                return Some(number);
            }
        }
        entry.numbers.last().copied()
    }
}

/// Rewrites `regs` from match spans, shifting every position down by the
/// window base.
fn write_regions(regs: &mut RegionSet, spans: &MatchSpans, base: usize) {
    regs.clear();
    regs.set_region(
        0,
        (spans.start - base) as isize,
        (spans.end - base) as isize,
    );
    for (index, span) in spans.groups.iter().enumerate() {
        match *span {
            Some((begin, end)) => {
                regs.set_region(index + 1, (begin - base) as isize, (end - base) as isize);
            }
            None => regs.set_region(index + 1, UNSET, UNSET),
        }
    }
}
