//! AST types for compiled patterns.

/// A fully parsed pattern plus the group bookkeeping the matcher and the
/// name lookups need.
#[derive(Debug)]
pub struct Ast {
    pub root: Alternation,
    /// Number of capturing groups; the whole-match slot is not counted.
    pub group_count: usize,
    /// Named groups in first-definition order. Numbers ascend per name.
    pub names: Vec<NamedGroup>,
}

/// Every group number defined under one name.
#[derive(Debug, PartialEq, Eq)]
pub struct NamedGroup {
    pub name: String,
    pub numbers: Vec<usize>,
}

/// One or more `|`-separated branches, tried left to right.
#[derive(Debug, PartialEq, Eq)]
pub struct Alternation {
    pub branches: Vec<Sequence>,
}

/// A concatenation of items.
#[derive(Debug, PartialEq, Eq)]
pub struct Sequence {
    pub items: Vec<Item>,
}

/// One quantified element.
#[derive(Debug, PartialEq, Eq)]
pub struct Item {
    pub quantifier: Quantifier,
    pub element: Element,
}

/// Repeat bounds for one item. `max == None` means unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quantifier {
    pub min: u32,
    pub max: Option<u32>,
    pub lazy: bool,
}

impl Quantifier {
    /// Plain single occurrence.
    pub const ONCE: Quantifier = Quantifier {
        min: 1,
        max: Some(1),
        lazy: false,
    };
}

#[derive(Debug, PartialEq, Eq)]
pub enum Element {
    /// One source character, as its UTF-8 bytes.
    Literal(Vec<u8>),
    /// `.`: any byte except a newline.
    Any,
    /// A bracket expression or a class shorthand.
    Class(ClassSet),
    /// A parenthesized subpattern; `index` is `None` for `(?:...)`.
    Group {
        index: Option<usize>,
        inner: Alternation,
    },
    /// `\1` through `\9`.
    NumberBackref(usize),
    /// `\k<name>`.
    NamedBackref(String),
    Anchor(Anchor),
}

/// Zero-width position assertions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    /// `^`: the window start, or right after a newline.
    LineStart,
    /// `$`: the window end, or right before a newline.
    LineEnd,
    /// `\A`: the window start only.
    TextStart,
    /// `\z`: the window end only.
    TextEnd,
}

/// One bracket expression: members joined by or, the whole set optionally
/// negated.
#[derive(Debug, PartialEq, Eq)]
pub struct ClassSet {
    pub negated: bool,
    pub parts: Vec<ClassPart>,
}

/// A single member of a bracket expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassPart {
    Byte(u8),
    /// Inclusive byte range.
    Range(u8, u8),
    /// A named class; `negated` covers the `\D` and `[:^alpha:]` forms.
    Class { class: ByteClass, negated: bool },
}

/// The named byte classes: POSIX bracket names plus the escape shorthands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteClass {
    Alnum,
    Alpha,
    Ascii,
    Blank,
    Cntrl,
    Digit,
    Graph,
    Hex,
    Lower,
    Print,
    Punct,
    Space,
    Upper,
    Word,
}
