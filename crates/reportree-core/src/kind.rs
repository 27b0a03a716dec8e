//! Node kinds and kind sets.

use std::fmt;
use std::ops::{BitOr, BitOrAssign};

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, FromRepr, IntoEnumIterator, IntoStaticStr};

/// Category of a report node.
///
/// Every kind occupies exactly one bit so kinds can be combined into a
/// [`KindSet`] acceptance mask.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumIter,
    FromRepr,
    IntoStaticStr,
)]
#[repr(u8)]
#[serde(rename_all = "lowercase")]
pub enum Kind {
    /// Labeled container; the only kind that accepts children by default.
    #[strum(to_string = "#")]
    Structure = 1,
    #[strum(to_string = "<error>")]
    Error = 1 << 1,
    #[strum(to_string = "<info>")]
    Info = 1 << 2,
    #[strum(to_string = "<debug>")]
    Debug = 1 << 3,
    #[strum(to_string = "<warning>")]
    Warn = 1 << 4,
    #[strum(to_string = "<deprecated>")]
    Deprecation = 1 << 5,
}

impl Kind {
    /// All kinds in declaration order.
    pub fn all() -> impl Iterator<Item = Kind> {
        Self::iter()
    }

    /// Raw bit of this kind.
    pub fn bit(self) -> u8 {
        self as u8
    }

    /// Convert a single raw bit back into a kind.
    ///
    /// # Panics
    ///
    /// Panics if `bit` is not exactly one known kind bit. Such a value can
    /// only come from a corrupted mask.
    pub fn from_bit(bit: u8) -> Self {
        match Self::from_repr(bit) {
            Some(kind) => kind,
            None => panic!("wrong node kind - {bit:#04x}"),
        }
    }

    /// Rendering tag, e.g. `#` or `<error>`.
    pub fn tag(self) -> &'static str {
        self.into()
    }

    /// Kinds a freshly built node of this kind accepts as direct children.
    pub fn default_allow(self) -> KindSet {
        match self {
            Self::Structure => KindSet::ALL,
            other => KindSet::from(other),
        }
    }
}

/// Bit set of [`Kind`]s.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "u8", into = "u8")]
pub struct KindSet(u8);

impl KindSet {
    /// No kinds.
    pub const EMPTY: Self = Self(0);

    /// Every kind.
    pub const ALL: Self = Self(
        Kind::Structure as u8
            | Kind::Error as u8
            | Kind::Info as u8
            | Kind::Debug as u8
            | Kind::Warn as u8
            | Kind::Deprecation as u8,
    );

    /// Build a set from raw bits, dropping bits that name no kind.
    pub fn from_bits_truncate(bits: u8) -> Self {
        Self(bits & Self::ALL.0)
    }

    /// Raw bits of the set.
    pub fn bits(self) -> u8 {
        self.0
    }

    /// Whether `kind` is in the set.
    pub fn contains(self, kind: Kind) -> bool {
        self.0 & kind.bit() != 0
    }

    /// Add `kind` to the set.
    pub fn insert(&mut self, kind: Kind) {
        self.0 |= kind.bit();
    }

    /// Kinds in either set.
    pub fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    /// Whether the set holds no kind.
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Number of kinds in the set.
    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    /// Iterate the kinds in the set, lowest bit first.
    pub fn iter(self) -> impl Iterator<Item = Kind> {
        (0..u8::BITS)
            .map(|shift| 1u8 << shift)
            .filter(move |bit| self.0 & bit != 0)
            .map(Kind::from_bit)
    }
}

impl fmt::Debug for KindSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl From<Kind> for KindSet {
    fn from(kind: Kind) -> Self {
        Self(kind.bit())
    }
}

impl From<u8> for KindSet {
    fn from(bits: u8) -> Self {
        Self::from_bits_truncate(bits)
    }
}

impl From<KindSet> for u8 {
    fn from(set: KindSet) -> Self {
        set.0
    }
}

impl<const N: usize> From<[Kind; N]> for KindSet {
    fn from(kinds: [Kind; N]) -> Self {
        kinds.into_iter().collect()
    }
}

impl FromIterator<Kind> for KindSet {
    fn from_iter<I: IntoIterator<Item = Kind>>(iter: I) -> Self {
        let mut set = Self::EMPTY;
        for kind in iter {
            set.insert(kind);
        }
        set
    }
}

impl BitOr for Kind {
    type Output = KindSet;

    fn bitor(self, rhs: Self) -> KindSet {
        KindSet::from(self).union(rhs.into())
    }
}

impl BitOr<Kind> for KindSet {
    type Output = KindSet;

    fn bitor(self, rhs: Kind) -> KindSet {
        self.union(rhs.into())
    }
}

impl BitOr for KindSet {
    type Output = KindSet;

    fn bitor(self, rhs: Self) -> KindSet {
        self.union(rhs)
    }
}

impl BitOrAssign<Kind> for KindSet {
    fn bitor_assign(&mut self, rhs: Kind) {
        self.insert(rhs);
    }
}

impl BitOrAssign for KindSet {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}
