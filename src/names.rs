//! Group name lookups.

use std::collections::HashMap;

use thiserror::Error;

use crate::engine::Matcher;
use crate::region::RegionSet;

/// A group name the pattern does not define.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("undefined group name reference: {name}")]
pub struct GroupNameError {
    pub name: String,
}

/// Collects every group name of `pattern` into a name to group number map.
///
/// When several groups share a name, the last number the engine enumerates
/// for it is kept.
pub fn named_captures<M: Matcher + ?Sized>(pattern: &M) -> HashMap<String, usize> {
    let mut map = HashMap::new();
    pattern.for_each_named_group(&mut |name, numbers| {
        if let Some(&number) = numbers.last() {
            map.insert(name.to_string(), number);
        }
    });
    map
}

/// Resolves `name` to a single group number, consulting `regs` to pick
/// between groups that share the name.
///
/// Fails with [`GroupNameError`] when the pattern does not define the name.
pub fn name_to_backref_number<M: Matcher + ?Sized>(
    pattern: &M,
    name: &str,
    regs: &RegionSet,
) -> Result<usize, GroupNameError> {
    pattern.name_to_backref(name, regs).ok_or_else(|| GroupNameError {
        name: name.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::ScanCtx;
    use crate::pattern::Pattern;
    use crate::scan::match_anchored;

    fn pat(source: &str) -> Pattern {
        Pattern::new(source).expect(source)
    }

    #[test]
    fn names_map_to_their_group_numbers() {
        let map = named_captures(&pat("(?<y>a)(b)(?<x>c)"));
        assert_eq!(map.len(), 2);
        assert_eq!(map.get("y"), Some(&1));
        assert_eq!(map.get("x"), Some(&3));
    }

    #[test]
    fn duplicate_name_keeps_the_last_number() {
        let map = named_captures(&pat("(?<x>a)|(?<x>b)"));
        assert_eq!(map.len(), 1);
        assert_eq!(map.get("x"), Some(&2));
    }

    #[test]
    fn pattern_without_names_yields_an_empty_map() {
        assert!(named_captures(&pat("(a)(b)")).is_empty());
    }

    #[test]
    fn unknown_name_is_an_error() {
        let err = name_to_backref_number(&pat("(?<x>a)"), "y", &RegionSet::new());
        assert_eq!(
            err,
            Err(GroupNameError {
                name: "y".to_string()
            })
        );
        assert_eq!(
            err.unwrap_err().to_string(),
            "undefined group name reference: y"
        );
    }

    #[test]
    fn unique_name_resolves_without_regions() {
        let number = name_to_backref_number(&pat("(a)(?<x>b)"), "x", &RegionSet::new());
        assert_eq!(number, Ok(2));
    }

    #[test]
    fn shared_name_prefers_the_group_that_matched() {
        let pattern = pat("(?<x>a)|(?<x>b)");
        let mut regs = RegionSet::new();

        match_anchored(&pattern, ScanCtx::new("b", 0, 0), &mut regs);
        assert_eq!(name_to_backref_number(&pattern, "x", &regs), Ok(2));

        match_anchored(&pattern, ScanCtx::new("a", 0, 0), &mut regs);
        assert_eq!(name_to_backref_number(&pattern, "x", &regs), Ok(1));
    }

    #[test]
    fn shared_name_falls_back_to_the_highest_number() {
        let pattern = pat("(?<x>a)|(?<x>b)");
        assert_eq!(name_to_backref_number(&pattern, "x", &RegionSet::new()), Ok(2));
    }
}
