//! Prayer value types shared by the schedule engine and its consumers.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;
use std::fmt;

/// The six daily prayer times, in their fixed daily order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PrayerKind {
    Fajr,    // imsak
    Sunrise, // güneş
    Dhuhr,   // öğle
    Asr,     // ikindi
    Maghrib, // akşam
    Isha,    // yatsı
}

impl PrayerKind {
    /// All kinds in daily order.
    pub const ALL: [PrayerKind; 6] = [
        PrayerKind::Fajr,
        PrayerKind::Sunrise,
        PrayerKind::Dhuhr,
        PrayerKind::Asr,
        PrayerKind::Maghrib,
        PrayerKind::Isha,
    ];

    /// Stable order index 0..=5.
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Stable machine key, used in config files and logs.
    pub fn key(self) -> &'static str {
        match self {
            PrayerKind::Fajr => "imsak",
            PrayerKind::Sunrise => "gunes",
            PrayerKind::Dhuhr => "ogle",
            PrayerKind::Asr => "ikindi",
            PrayerKind::Maghrib => "aksam",
            PrayerKind::Isha => "yatsi",
        }
    }

    /// Display name in the given language.
    pub fn label(self, language: Language) -> &'static str {
        match (language, self) {
            (Language::Turkish, PrayerKind::Fajr) => "İmsak",
            (Language::Turkish, PrayerKind::Sunrise) => "Güneş",
            (Language::Turkish, PrayerKind::Dhuhr) => "Öğle",
            (Language::Turkish, PrayerKind::Asr) => "İkindi",
            (Language::Turkish, PrayerKind::Maghrib) => "Akşam",
            (Language::Turkish, PrayerKind::Isha) => "Yatsı",
            (Language::English, PrayerKind::Fajr) => "Fajr",
            (Language::English, PrayerKind::Sunrise) => "Sunrise",
            (Language::English, PrayerKind::Dhuhr) => "Dhuhr",
            (Language::English, PrayerKind::Asr) => "Asr",
            (Language::English, PrayerKind::Maghrib) => "Maghrib",
            (Language::English, PrayerKind::Isha) => "Isha",
        }
    }
}

impl fmt::Display for PrayerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Language used for prayer names.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Turkish,
    English,
}

/// One prayer at one absolute instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrayerInstant {
    pub kind: PrayerKind,
    pub timestamp: DateTime<Utc>,
}

impl PrayerInstant {
    pub fn new(kind: PrayerKind, timestamp: DateTime<Utc>) -> Self {
        Self { kind, timestamp }
    }
}

/// The six prayers of one local calendar day, sorted by timestamp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailySchedule {
    pub date: NaiveDate,
    pub entries: Vec<PrayerInstant>,
    /// The sun never rose or set that day; entries are the fixed clock schedule.
    pub used_fallback: bool,
}

impl DailySchedule {
    /// Instant for a given prayer kind.
    pub fn get(&self, kind: PrayerKind) -> Option<PrayerInstant> {
        self.entries.iter().copied().find(|entry| entry.kind == kind)
    }

    pub fn iter(&self) -> impl Iterator<Item = &PrayerInstant> {
        self.entries.iter()
    }
}

/// The prayer pair surrounding a reference instant.
///
/// `previous.timestamp <= now < next.timestamp`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeline {
    pub previous: PrayerInstant,
    pub next: PrayerInstant,
}

impl Timeline {
    /// Time left until `next`, zero if it has already passed.
    pub fn remaining(&self, now: DateTime<Utc>) -> chrono::Duration {
        let remaining = self.next.timestamp - now;
        if remaining < chrono::Duration::zero() {
            chrono::Duration::zero()
        } else {
            remaining
        }
    }

    /// Fraction of the previous-to-next interval already elapsed, in [0, 1].
    pub fn progress(&self, now: DateTime<Utc>) -> f32 {
        let total = (self.next.timestamp - self.previous.timestamp).num_seconds() as f32;
        if total <= 0.0 {
            return 1.0;
        }
        let elapsed = (now - self.previous.timestamp).num_seconds() as f32;
        (elapsed / total).clamp(0.0, 1.0)
    }
}
