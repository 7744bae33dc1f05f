//! Capture-region and scan-position bookkeeping for string scanning.
//!
//! A scanner walks a haystack with a byte cursor. Every match runs inside a
//! window that reaches from a configurable base to the end of the haystack:
//! capture regions are stored relative to that base, while the entry points
//! return the absolute end of the match so the caller can advance its
//! cursor. Keeping the base at the cursor gives match-local regions;
//! pinning it at zero gives haystack-absolute ones.
//!
//! The engine behind a scan is anything implementing [`Matcher`]. The
//! bundled [`Pattern`] covers the classic backtracking syntax;
//! [`match_literal`] skips the engine entirely for plain strings.
//!
//! # Example
//!
//! ```rust
//! use scanregs::{Pattern, RegionSet, ScanCtx, match_anchored, match_literal, search_unanchored};
//!
//! let text = "name: ferris";
//! let mut regs = RegionSet::new();
//!
//! // A literal step: no engine involved, same region bookkeeping.
//! let end = match_literal("name:", ScanCtx::new(text, 0, 0), &mut regs);
//! assert_eq!(end, Some(5));
//!
//! // Anchored matching starts exactly at the cursor.
//! let blanks = Pattern::new(" +").unwrap();
//! let end = match_anchored(&blanks, ScanCtx::new(text, 5, 5), &mut regs);
//! assert_eq!(end, Some(6));
//!
//! // Searching scans forward; regions stay relative to the window base.
//! let who = Pattern::new(r"(?<who>\w+)$").unwrap();
//! let end = search_unanchored(&who, ScanCtx::new(text, 6, 6), &mut regs);
//! assert_eq!(end, Some(12));
//! assert_eq!(regs.pos(1), Some((0, 6)));
//! assert_eq!(&text[6..12], "ferris");
//! ```

mod context;
mod engine;
mod names;
pub mod pattern;
mod region;
mod scan;

pub use context::ScanCtx;
pub use engine::Matcher;
pub use names::{GroupNameError, name_to_backref_number, named_captures};
pub use pattern::{ParseError, Pattern};
pub use region::{RegionSet, UNSET};
pub use scan::{match_anchored, match_literal, search_unanchored};
