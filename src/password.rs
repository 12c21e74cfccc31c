//! Classification of candidate passwords against a [`BloomFilter`] of
//! passwords already in use.
//!
//! ```
//! use streamsketch::password::{check_password_uniqueness, Candidate, Status};
//! use streamsketch::BloomFilter;
//!
//! let mut bloom = BloomFilter::new(1000, 3).unwrap();
//! bloom.add("admin123");
//!
//! let results = check_password_uniqueness(
//!     &bloom,
//!     vec![Candidate::from("admin123"), Candidate::from("guest"), Candidate::Absent],
//! );
//!
//! assert_eq!(results.get(&Candidate::from("admin123")), Some(Status::AlreadyUsed));
//! assert_eq!(results.get(&Candidate::from("guest")), Some(Status::Unique));
//! assert_eq!(results.get(&Candidate::Absent), Some(Status::InvalidValue));
//! ```

use std::collections::HashMap;
use std::fmt;

use serde::Serialize;

use crate::bloom::{BloomFilter, Item};
use crate::hash::HashFamily;

/// A candidate password, which may be missing altogether.
///
/// Absence is a variant of its own so that it can never be mistaken for a
/// password spelled like a missing-value marker.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum Candidate {
    Present(String),
    Absent,
}

impl From<&str> for Candidate {
    fn from(value: &str) -> Self {
        Candidate::Present(value.to_owned())
    }
}

impl From<String> for Candidate {
    fn from(value: String) -> Self {
        Candidate::Present(value)
    }
}

impl<T> From<Option<T>> for Candidate
where
    T: Into<String>,
{
    fn from(value: Option<T>) -> Self {
        match value {
            Some(value) => Candidate::Present(value.into()),
            None => Candidate::Absent,
        }
    }
}

impl Item for Candidate {
    #[inline]
    fn as_text(&self) -> Option<&str> {
        match self {
            Candidate::Present(value) => Some(value.as_str()),
            Candidate::Absent => None,
        }
    }
}

impl fmt::Display for Candidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Candidate::Present(value) => value.fmt(f),
            Candidate::Absent => "<absent>".fmt(f),
        }
    }
}

/// The classification of a [`Candidate`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum Status {
    /// Absent or empty.
    #[serde(rename = "invalid value")]
    InvalidValue,
    /// Reported as contained by the filter; may be a false positive.
    #[serde(rename = "already used")]
    AlreadyUsed,
    /// Definitely not in the filter.
    #[serde(rename = "unique")]
    Unique,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::InvalidValue => "invalid value",
            Status::AlreadyUsed => "already used",
            Status::Unique => "unique",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.as_str().fmt(f)
    }
}

/// Insertion ordered mapping from candidates to their status.
///
/// A candidate seen twice keeps its first position and its latest status.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Classification {
    entries: Vec<(Candidate, Status)>,
    index:   HashMap<Candidate, usize>,
}

impl Classification {
    fn insert(&mut self, candidate: Candidate, status: Status) {
        match self.index.get(&candidate) {
            Some(&i) => self.entries[i].1 = status,
            None => {
                self.index.insert(candidate.clone(), self.entries.len());
                self.entries.push((candidate, status));
            },
        }
    }

    /// Returns the status of `candidate`, if it was classified.
    pub fn get(&self, candidate: &Candidate) -> Option<Status> {
        self.index.get(candidate).map(|&i| self.entries[i].1)
    }

    /// Returns the number of distinct candidates.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over the candidates in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (&Candidate, Status)> + '_ {
        self.entries.iter().map(|(c, s)| (c, *s))
    }
}

/// Classifies every candidate against `bloom` without modifying it.
///
/// A candidate is `invalid value` if absent or empty, `already used` if the
/// filter reports it as contained and `unique` otherwise.
pub fn check_password_uniqueness<F, I>(
    bloom: &BloomFilter<F>,
    candidates: I,
) -> Classification
where
    F: HashFamily,
    I: IntoIterator,
    I::Item: Into<Candidate>,
{
    let mut results = Classification::default();

    for candidate in candidates {
        let candidate = candidate.into();

        let status = match candidate.as_text() {
            None | Some("") => Status::InvalidValue,
            Some(_) if bloom.contains(&candidate) => Status::AlreadyUsed,
            Some(_) => Status::Unique,
        };

        results.insert(candidate, status);
    }

    results
}
