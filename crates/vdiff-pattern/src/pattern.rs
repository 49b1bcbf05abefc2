//! The catalogue of elementary edit patterns
//!
//! Nine patterns describe how a single artifact was edited. Each pattern
//! applies to artifacts of exactly one [`DiffType`].

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;
use thiserror::Error;
use vdiff_tree::DiffType;

/// Elementary edit pattern of an artifact
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum EditPattern {
    /// Added below an annotation that already existed
    AddToPC,
    /// Added together with its annotation
    AddWithMapping,
    /// Removed from below an annotation that is kept
    RemFromPC,
    /// Removed together with its annotation
    RemWithMapping,
    /// Kept, but present in fewer variants
    Specialization,
    /// Kept, but present in more variants
    Generalization,
    /// Kept, present in a different but overlapping set of variants
    Reconfiguration,
    /// Kept in the same variants below restructured annotations
    Refactoring,
    /// Kept in the same variants below the same annotations
    Untouched,
}

static BY_NAME: Lazy<HashMap<&'static str, EditPattern>> =
    Lazy::new(|| EditPattern::ALL.iter().map(|p| (p.name(), *p)).collect());

static BY_DIFF_TYPE: Lazy<HashMap<DiffType, Vec<EditPattern>>> = Lazy::new(|| {
    let mut map: HashMap<DiffType, Vec<EditPattern>> = HashMap::new();
    for pattern in EditPattern::ALL {
        map.entry(pattern.diff_type()).or_default().push(pattern);
    }
    map
});

impl EditPattern {
    /// All patterns in catalogue order
    pub const ALL: [EditPattern; 9] = [
        EditPattern::AddToPC,
        EditPattern::AddWithMapping,
        EditPattern::RemFromPC,
        EditPattern::RemWithMapping,
        EditPattern::Specialization,
        EditPattern::Generalization,
        EditPattern::Reconfiguration,
        EditPattern::Refactoring,
        EditPattern::Untouched,
    ];

    /// Catalogue name
    #[inline]
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            EditPattern::AddToPC => "AddToPC",
            EditPattern::AddWithMapping => "AddWithMapping",
            EditPattern::RemFromPC => "RemFromPC",
            EditPattern::RemWithMapping => "RemWithMapping",
            EditPattern::Specialization => "Specialization",
            EditPattern::Generalization => "Generalization",
            EditPattern::Reconfiguration => "Reconfiguration",
            EditPattern::Refactoring => "Refactoring",
            EditPattern::Untouched => "Untouched",
        }
    }

    /// Diff type of the artifacts this pattern applies to
    #[inline]
    #[must_use]
    pub fn diff_type(self) -> DiffType {
        match self {
            EditPattern::AddToPC | EditPattern::AddWithMapping => DiffType::Added,
            EditPattern::RemFromPC | EditPattern::RemWithMapping => DiffType::Removed,
            EditPattern::Specialization
            | EditPattern::Generalization
            | EditPattern::Reconfiguration
            | EditPattern::Refactoring
            | EditPattern::Untouched => DiffType::Unchanged,
        }
    }

    /// Look up a pattern by its catalogue name
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        BY_NAME.get(name).copied()
    }

    /// Patterns applicable to artifacts of `diff_type`, in catalogue order
    #[must_use]
    pub fn patterns_for(diff_type: DiffType) -> &'static [EditPattern] {
        BY_DIFF_TYPE.get(&diff_type).map_or(&[][..], Vec::as_slice)
    }
}

impl Display for EditPattern {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Name that is not in the catalogue
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown edit pattern: {0}")]
pub struct UnknownPattern(pub String);

impl FromStr for EditPattern {
    type Err = UnknownPattern;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| UnknownPattern(s.to_owned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip() {
        for pattern in EditPattern::ALL {
            assert_eq!(pattern.name().parse::<EditPattern>(), Ok(pattern));
            assert_eq!(pattern.to_string(), pattern.name());
        }
        assert_eq!(
            "Moved".parse::<EditPattern>(),
            Err(UnknownPattern("Moved".into()))
        );
    }

    #[test]
    fn catalogue_is_partitioned_by_diff_type() {
        assert_eq!(
            EditPattern::patterns_for(DiffType::Added),
            [EditPattern::AddToPC, EditPattern::AddWithMapping]
        );
        assert_eq!(
            EditPattern::patterns_for(DiffType::Removed),
            [EditPattern::RemFromPC, EditPattern::RemWithMapping]
        );
        assert_eq!(EditPattern::patterns_for(DiffType::Unchanged).len(), 5);

        let total: usize = [DiffType::Added, DiffType::Removed, DiffType::Unchanged]
            .into_iter()
            .map(|d| EditPattern::patterns_for(d).len())
            .sum();
        assert_eq!(total, EditPattern::ALL.len());
    }

    #[test]
    fn serde_uses_catalogue_names() {
        let json = serde_json::to_string(&EditPattern::AddWithMapping).unwrap();
        assert_eq!(json, "\"AddWithMapping\"");
        let back: EditPattern = serde_json::from_str(&json).unwrap();
        assert_eq!(back, EditPattern::AddWithMapping);
    }
}
