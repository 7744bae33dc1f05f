//! Byte class membership tests.

use phf::{Map, phf_map};

use super::ast::{ByteClass, ClassPart, ClassSet};

/// Class names accepted inside `[[:name:]]`.
pub static POSIX_CLASSES: Map<&'static str, ByteClass> = phf_map! {
    "alnum" => ByteClass::Alnum,
    "alpha" => ByteClass::Alpha,
    "ascii" => ByteClass::Ascii,
    "blank" => ByteClass::Blank,
    "cntrl" => ByteClass::Cntrl,
    "digit" => ByteClass::Digit,
    "graph" => ByteClass::Graph,
    "lower" => ByteClass::Lower,
    "print" => ByteClass::Print,
    "punct" => ByteClass::Punct,
    "space" => ByteClass::Space,
    "upper" => ByteClass::Upper,
    "word" => ByteClass::Word,
    "xdigit" => ByteClass::Hex,
};

/// Test whether `byte` is a member of the bracket expression `set`.
pub fn set_matches(set: &ClassSet, byte: u8) -> bool {
    set.parts.iter().any(|part| part_matches(part, byte)) != set.negated
}

/// Test whether `byte` matches a single member of a bracket expression.
pub fn part_matches(part: &ClassPart, byte: u8) -> bool {
    match part {
        ClassPart::Byte(b) => *b == byte,
        ClassPart::Range(lo, hi) => *lo <= byte && byte <= *hi,
        ClassPart::Class { class, negated } => class_matches(*class, byte) != *negated,
    }
}

/// Test whether `byte` belongs to a named class.
pub fn class_matches(class: ByteClass, byte: u8) -> bool {
    match class {
        ByteClass::Alnum => byte.is_ascii_alphanumeric(),
        ByteClass::Alpha => byte.is_ascii_alphabetic(),
        ByteClass::Ascii => byte.is_ascii(),
        ByteClass::Blank => byte == b' ' || byte == b'\t',
        ByteClass::Cntrl => byte.is_ascii_control(),
        ByteClass::Digit => byte.is_ascii_digit(),
        ByteClass::Graph => byte.is_ascii_graphic(),
        ByteClass::Hex => byte.is_ascii_hexdigit(),
        ByteClass::Lower => byte.is_ascii_lowercase(),
        ByteClass::Print => byte.is_ascii_graphic() || byte == b' ',
        ByteClass::Punct => byte.is_ascii_punctuation(),
        // \s takes in vertical tab; is_ascii_whitespace does not
        ByteClass::Space => byte.is_ascii_whitespace() || byte == 0x0b,
        ByteClass::Upper => byte.is_ascii_uppercase(),
        ByteClass::Word => byte.is_ascii_alphanumeric() || byte == b'_',
    }
}
