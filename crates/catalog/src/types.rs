//! Core domain types for the movie catalog.
//!
//! This module defines the fundamental data structures used throughout the system.
//! Key Rust concepts demonstrated here:
//! - Type aliases for domain clarity (MovieId)
//! - Structs with public fields
//! - Enums for fixed sets of values, with serde renames for wire names
//! - `Option<T>` fields to model partial updates

use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use uuid::Uuid;

// =============================================================================
// Type Aliases
// =============================================================================

/// Unique identifier for a movie, generated by the store on creation
pub type MovieId = Uuid;

// =============================================================================
// Genre
// =============================================================================

/// The fixed set of genres a movie may be tagged with.
///
/// Wire names are case-sensitive: `"Sci-Fi"` is accepted, `"sci-fi"` is not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Genre {
    Action,
    Comedy,
    Drama,
    Horror,
    Crime,
    Romance,
    #[serde(rename = "Sci-Fi")]
    SciFi,
}

impl Genre {
    /// Every genre, in declaration order
    pub const ALL: [Genre; 7] = [
        Genre::Action,
        Genre::Comedy,
        Genre::Drama,
        Genre::Horror,
        Genre::Crime,
        Genre::Romance,
        Genre::SciFi,
    ];

    /// Wire names of every genre, in declaration order
    pub const NAMES: [&'static str; 7] = [
        "Action", "Comedy", "Drama", "Horror", "Crime", "Romance", "Sci-Fi",
    ];

    /// The wire name of this genre
    pub fn as_str(self) -> &'static str {
        match self {
            Genre::Action => "Action",
            Genre::Comedy => "Comedy",
            Genre::Drama => "Drama",
            Genre::Horror => "Horror",
            Genre::Crime => "Crime",
            Genre::Romance => "Romance",
            Genre::SciFi => "Sci-Fi",
        }
    }

    /// Case-insensitive comparison against a free-form query
    pub fn matches(self, query: &str) -> bool {
        self.as_str().to_lowercase() == query.to_lowercase()
    }
}

impl fmt::Display for Genre {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Movie
// =============================================================================

/// A stored movie record.
///
/// Every `Movie` in the store satisfies the full schema; partial records
/// only ever exist as a [`MoviePatch`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    pub id: MovieId,
    pub title: String,
    pub year: u16,
    pub director: String,
    /// Running time in minutes
    pub duration: u32,
    #[serde(serialize_with = "serialize_rate")]
    pub rate: f64,
    pub poster: String,
    pub genre: Vec<Genre>,
}

impl Movie {
    /// Attach an id to validated fields
    pub fn from_new(id: MovieId, fields: NewMovie) -> Self {
        Self {
            id,
            title: fields.title,
            year: fields.year,
            director: fields.director,
            duration: fields.duration,
            rate: fields.rate,
            poster: fields.poster,
            genre: fields.genre,
        }
    }

    /// Merge a patch over this record. Fields absent from the patch keep
    /// their current values; the id never changes.
    pub fn apply(&mut self, patch: MoviePatch) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(year) = patch.year {
            self.year = year;
        }
        if let Some(director) = patch.director {
            self.director = director;
        }
        if let Some(duration) = patch.duration {
            self.duration = duration;
        }
        if let Some(rate) = patch.rate {
            self.rate = rate;
        }
        if let Some(poster) = patch.poster {
            self.poster = poster;
        }
        if let Some(genre) = patch.genre {
            self.genre = genre;
        }
    }

    /// Whether any of this movie's genres matches `query`, ignoring case
    pub fn has_genre(&self, query: &str) -> bool {
        self.genre.iter().any(|genre| genre.matches(query))
    }
}

/// The fields of a movie that passed full validation, before an id is assigned
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewMovie {
    pub title: String,
    pub year: u16,
    pub director: String,
    pub duration: u32,
    #[serde(serialize_with = "serialize_rate")]
    pub rate: f64,
    pub poster: String,
    pub genre: Vec<Genre>,
}

/// Whole-number rates go out as JSON integers (`5`, not `5.0`)
fn serialize_rate<S: Serializer>(rate: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    if rate.fract() == 0.0 && rate.abs() <= i64::MAX as f64 {
        serializer.serialize_i64(*rate as i64)
    } else {
        serializer.serialize_f64(*rate)
    }
}

/// The fields of a movie that passed partial validation
///
/// Rust concept: `Option<T>` distinguishes "not supplied" from a value
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MoviePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub director: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rate: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub poster: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub genre: Option<Vec<Genre>>,
}

impl MoviePatch {
    /// True when the patch carries no fields at all
    pub fn is_empty(&self) -> bool {
        *self == MoviePatch::default()
    }
}
