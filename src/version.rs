//! Three-tier version numbers and their allocation order.
//!
//! Asset versions are identified by up to three non-negative integer tiers.
//! Unspecified tiers are filled with the sentinel `-1` internally; the
//! external API accepts and returns 1-, 2-, or 3-tuples trimmed of trailing
//! sentinels.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Sentinel used for version tiers that were not supplied by the caller.
pub const SENTINEL: i64 = -1;

/// The internal, always-three-tier form of a version number.
///
/// `-1` sorts before any non-negative value, so the derived `Ord`
/// implementation already gives the "latest version" ordering described in
/// spec §4.1: a stored `(0, -1, -1)` is older than `(0, 0, 0)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct VersionId(pub i64, pub i64, pub i64);

impl VersionId {
    /// The baseline row assumed for an asset with no published versions.
    pub const EMPTY: VersionId = VersionId(0, SENTINEL, SENTINEL);

    /// Tiers as a plain array, in order.
    pub fn tiers(&self) -> [i64; 3] {
        [self.0, self.1, self.2]
    }

    /// Right-trims trailing sentinel tiers into the external presentation.
    pub fn denormalize(&self) -> VersionSpec {
        if self.1 == SENTINEL {
            VersionSpec::Scalar(self.0)
        } else if self.2 == SENTINEL {
            VersionSpec::Pair(self.0, self.1)
        } else {
            VersionSpec::Triple(self.0, self.1, self.2)
        }
    }

    /// The dotted-version string used in path ids, e.g. `"3.1.2"` or `"1"`,
    /// omitting sentinel tiers.
    pub fn dotted(&self) -> String {
        self.tiers()
            .iter()
            .filter(|t| **t != SENTINEL)
            .map(i64::to_string)
            .collect::<Vec<_>>()
            .join(".")
    }

    /// Applies the allocation rule from spec §4.1: bump the tier just
    /// before the first sentinel, or the last tier if there is no
    /// sentinel.
    pub fn next(&self) -> VersionId {
        let mut tiers = self.tiers();
        let bump_idx = tiers
            .iter()
            .position(|t| *t == SENTINEL)
            .map(|idx| idx.saturating_sub(1))
            .unwrap_or(2);
        tiers[bump_idx] += 1;
        VersionId(tiers[0], tiers[1], tiers[2])
    }
}

impl fmt::Display for VersionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.dotted())
    }
}

/// The 1-, 2-, or 3-tuple presentation callers work with at the API
/// boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VersionSpec {
    /// Only the major tier was supplied.
    Scalar(i64),
    /// Major and minor tiers were supplied.
    Pair(i64, i64),
    /// All three tiers were supplied.
    Triple(i64, i64, i64),
}

impl VersionSpec {
    /// Fills unspecified tiers with [`SENTINEL`].
    pub fn normalize(&self) -> VersionId {
        match *self {
            VersionSpec::Scalar(a) => VersionId(a, SENTINEL, SENTINEL),
            VersionSpec::Pair(a, b) => VersionId(a, b, SENTINEL),
            VersionSpec::Triple(a, b, c) => VersionId(a, b, c),
        }
    }
}

impl From<i64> for VersionSpec {
    fn from(v: i64) -> Self {
        VersionSpec::Scalar(v)
    }
}

impl From<(i64,)> for VersionSpec {
    fn from(v: (i64,)) -> Self {
        VersionSpec::Scalar(v.0)
    }
}

impl From<(i64, i64)> for VersionSpec {
    fn from(v: (i64, i64)) -> Self {
        VersionSpec::Pair(v.0, v.1)
    }
}

impl From<(i64, i64, i64)> for VersionSpec {
    fn from(v: (i64, i64, i64)) -> Self {
        VersionSpec::Triple(v.0, v.1, v.2)
    }
}

impl From<VersionSpec> for VersionId {
    fn from(spec: VersionSpec) -> Self {
        spec.normalize()
    }
}
