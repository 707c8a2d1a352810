//! Group tags and the three-mask filter every body carries
//!
//! A `Group` is one bit of a 64-bit word. `GroupData` keeps three such words:
//! - `groups`           what this body is
//! - `groups_to_check`  what this body wants to detect
//! - `groups_no_resolve` what this body detects but never pushes out of

use serde::{Deserialize, Serialize};

pub const MAX_GROUPS: u32 = 64;

/// A single group tag (bit position 0..64).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Group(u8);

impl Group {
    /// Returns `None` when `bit` does not fit in the 64-bit mask.
    pub const fn new(bit: u32) -> Option<Self> {
        if bit < MAX_GROUPS {
            Some(Self(bit as u8))
        } else {
            None
        }
    }

    #[inline]
    pub const fn bit(self) -> u32 {
        self.0 as u32
    }

    #[inline(always)]
    const fn mask(self) -> u64 {
        1u64 << self.0
    }
}

/// Fixed-width set of groups backed by one `u64`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GroupSet(u64);

impl GroupSet {
    pub const EMPTY: GroupSet = GroupSet(0);
    pub const ALL: GroupSet = GroupSet(u64::MAX);

    pub const fn from_bits(bits: u64) -> Self {
        Self(bits)
    }

    #[inline]
    pub const fn bits(self) -> u64 {
        self.0
    }

    pub fn of(groups: &[Group]) -> Self {
        let mut set = Self::EMPTY;
        for g in groups {
            set.insert(*g);
        }
        set
    }

    #[inline(always)]
    pub fn insert(&mut self, group: Group) {
        self.0 |= group.mask();
    }

    #[inline(always)]
    pub fn remove(&mut self, group: Group) {
        self.0 &= !group.mask();
    }

    #[inline(always)]
    pub fn contains(self, group: Group) -> bool {
        (self.0 & group.mask()) != 0
    }

    /// True when at least one tag is shared ("test-any" of the AND).
    #[inline(always)]
    pub fn intersects(self, other: GroupSet) -> bool {
        (self.0 & other.0) != 0
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn len(self) -> u32 {
        self.0.count_ones()
    }

    pub fn union(self, other: GroupSet) -> GroupSet {
        GroupSet(self.0 | other.0)
    }

    /// Iterate set tags from lowest bit to highest.
    pub fn iter(self) -> impl Iterator<Item = Group> {
        let mut bits = self.0;
        std::iter::from_fn(move || {
            if bits == 0 {
                return None;
            }
            let bit = bits.trailing_zeros();
            bits &= bits - 1;
            Some(Group(bit as u8))
        })
    }
}

impl From<Group> for GroupSet {
    fn from(group: Group) -> Self {
        GroupSet(group.mask())
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupData {
    groups: GroupSet,
    groups_to_check: GroupSet,
    groups_no_resolve: GroupSet,
}

impl GroupData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_group(&mut self, group: Group) {
        self.groups.insert(group);
    }

    pub fn add_group_to_check(&mut self, group: Group) {
        self.groups_to_check.insert(group);
    }

    pub fn add_group_no_resolve(&mut self, group: Group) {
        self.groups_no_resolve.insert(group);
    }

    pub fn remove_group(&mut self, group: Group) {
        self.groups.remove(group);
    }

    pub fn remove_group_to_check(&mut self, group: Group) {
        self.groups_to_check.remove(group);
    }

    pub fn remove_group_no_resolve(&mut self, group: Group) {
        self.groups_no_resolve.remove(group);
    }

    #[inline]
    pub fn groups(&self) -> GroupSet {
        self.groups
    }

    #[inline]
    pub fn groups_to_check(&self) -> GroupSet {
        self.groups_to_check
    }

    #[inline]
    pub fn groups_no_resolve(&self) -> GroupSet {
        self.groups_no_resolve
    }

    /// Detection eligibility: something we check for is something `other` is.
    #[inline]
    pub fn must_check_against(&self, other: &GroupData) -> bool {
        self.groups_to_check.intersects(other.groups)
    }

    /// Resolution eligibility: detectable, and `other` carries none of our no-resolve tags.
    #[inline]
    pub fn must_resolve_against(&self, other: &GroupData) -> bool {
        self.must_check_against(other) && self.yields_to(other)
    }

    /// Whether a push coming from `other` may move us, checked or not.
    #[inline]
    pub fn yields_to(&self, other: &GroupData) -> bool {
        !self.groups_no_resolve.intersects(other.groups)
    }
}
