//! Common value types
//!
//! Closed day-of-week enum, the bounded day set used by pricing rules, and
//! the authenticated principal handed over by the (external) auth layer.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Day of week enum
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DayOfWeek {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl DayOfWeek {
    /// All days, Monday first
    pub const ALL: [DayOfWeek; 7] = [
        DayOfWeek::Monday,
        DayOfWeek::Tuesday,
        DayOfWeek::Wednesday,
        DayOfWeek::Thursday,
        DayOfWeek::Friday,
        DayOfWeek::Saturday,
        DayOfWeek::Sunday,
    ];

    const fn bit(self) -> u8 {
        1 << self as u8
    }
}

impl From<chrono::Weekday> for DayOfWeek {
    fn from(weekday: chrono::Weekday) -> Self {
        match weekday {
            chrono::Weekday::Mon => DayOfWeek::Monday,
            chrono::Weekday::Tue => DayOfWeek::Tuesday,
            chrono::Weekday::Wed => DayOfWeek::Wednesday,
            chrono::Weekday::Thu => DayOfWeek::Thursday,
            chrono::Weekday::Fri => DayOfWeek::Friday,
            chrono::Weekday::Sat => DayOfWeek::Saturday,
            chrono::Weekday::Sun => DayOfWeek::Sunday,
        }
    }
}

/// Bounded set of weekdays backed by a single byte.
///
/// Replaces the array-of-enum column of the source schema with O(1)
/// membership tests. Serialized as a list of day names; an absent set on a
/// pricing rule already means "all days", so no ALL sentinel exists here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DaySet(u8);

impl DaySet {
    pub const fn empty() -> Self {
        DaySet(0)
    }

    pub const fn all() -> Self {
        DaySet(0b0111_1111)
    }

    pub fn insert(&mut self, day: DayOfWeek) {
        self.0 |= day.bit();
    }

    pub fn contains(self, day: DayOfWeek) -> bool {
        self.0 & day.bit() != 0
    }

    pub fn len(self) -> u32 {
        self.0.count_ones()
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Days in the set, Monday first
    pub fn iter(self) -> impl Iterator<Item = DayOfWeek> {
        DayOfWeek::ALL.into_iter().filter(move |d| self.contains(*d))
    }
}

impl FromIterator<DayOfWeek> for DaySet {
    fn from_iter<I: IntoIterator<Item = DayOfWeek>>(iter: I) -> Self {
        let mut set = DaySet::empty();
        for day in iter {
            set.insert(day);
        }
        set
    }
}

impl Serialize for DaySet {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter())
    }
}

impl<'de> Deserialize<'de> for DaySet {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let days = Vec::<DayOfWeek>::deserialize(deserializer)?;
        Ok(days.into_iter().collect())
    }
}

/// Actor role issued by the auth layer
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Customer,
    BusinessOwner,
    Admin,
}

/// Verified principal for the current request
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Principal {
    pub id: Uuid,
    pub role: Role,
}

impl Principal {
    pub fn customer(id: Uuid) -> Self {
        Principal {
            id,
            role: Role::Customer,
        }
    }

    pub fn business_owner(id: Uuid) -> Self {
        Principal {
            id,
            role: Role::BusinessOwner,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}
