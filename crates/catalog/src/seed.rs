//! Loading the initial catalog from static JSON seed data.
//!
//! The seed is a JSON array of complete movie objects, each carrying its
//! own `id`. Every record goes through the same full validation as a
//! `POST /movies` body, so the store never starts with a record that a
//! client could not have created.
//!
//! Rust concepts demonstrated:
//! - `include_str!` to embed a data file in the binary
//! - Mapping lower-level errors into domain errors with `map_err`
//! - The `?` operator across several error sources (`#[from]` conversions)

use std::fs;
use std::path::Path;

use serde_json::Value;
use tracing::info;
use uuid::Uuid;

use crate::error::{CatalogError, Result};
use crate::schema::validate_full;
use crate::store::MovieStore;
use crate::types::Movie;

/// The seed shipped with the workspace, embedded at compile time
pub const DEFAULT_SEED: &str = include_str!("../../../data/movies.json");

/// Parse seed JSON text into validated movies, in file order
pub fn parse_seed(json: &str) -> Result<Vec<Movie>> {
    let value: Value = serde_json::from_str(json)?;
    let Value::Array(records) = value else {
        return Err(CatalogError::NotAnArray);
    };

    let mut movies = Vec::with_capacity(records.len());
    for (index, record) in records.iter().enumerate() {
        let id = parse_id(index, record)?;
        let fields =
            validate_full(record).map_err(|source| CatalogError::InvalidRecord { index, source })?;
        movies.push(Movie::from_new(id, fields));
    }
    Ok(movies)
}

/// Seed records must carry their own UUID
fn parse_id(index: usize, record: &Value) -> Result<Uuid> {
    match record.get("id") {
        Some(Value::String(raw)) => Uuid::parse_str(raw).map_err(|_| CatalogError::InvalidId {
            index,
            value: raw.clone(),
        }),
        Some(other) => Err(CatalogError::InvalidId {
            index,
            value: other.to_string(),
        }),
        None => Err(CatalogError::InvalidId {
            index,
            value: "<missing>".to_string(),
        }),
    }
}

/// Build a store from seed JSON text
pub fn store_from_json(json: &str) -> Result<MovieStore> {
    MovieStore::from_seed(parse_seed(json)?)
}

/// Build a store from the seed file at `path`
pub fn load_from_file(path: &Path) -> Result<MovieStore> {
    info!("Loading movie seed from {:?}", path);
    let json = fs::read_to_string(path)?;
    let store = store_from_json(&json)?;
    info!("Loaded {} movies", store.len());
    Ok(store)
}

/// Build a store from the embedded [`DEFAULT_SEED`]
pub fn load_default() -> Result<MovieStore> {
    let store = store_from_json(DEFAULT_SEED)?;
    info!("Loaded {} movies from embedded seed", store.len());
    Ok(store)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Genre;

    const ONE_MOVIE: &str = r#"[
        {
            "id": "c8a7d63f-3b04-44d3-9d95-8782fd7dcfaf",
            "title": "Forrest Gump",
            "year": 1994,
            "director": "Robert Zemeckis",
            "duration": 142,
            "poster": "https://img.example.com/forrest-gump.jpg",
            "genre": ["Drama", "Romance"],
            "rate": 8.8
        }
    ]"#;

    #[test]
    fn test_parse_seed() {
        let movies = parse_seed(ONE_MOVIE).unwrap();
        assert_eq!(movies.len(), 1);
        assert_eq!(movies[0].id.to_string(), "c8a7d63f-3b04-44d3-9d95-8782fd7dcfaf");
        assert_eq!(movies[0].genre, vec![Genre::Drama, Genre::Romance]);
        assert_eq!(movies[0].rate, 8.8);
    }

    #[test]
    fn test_default_seed_is_valid() {
        let store = load_default().unwrap();
        assert!(!store.is_empty());
    }

    #[test]
    fn test_seed_must_be_an_array() {
        let result = parse_seed(r#"{ "movies": [] }"#);
        assert!(matches!(result, Err(CatalogError::NotAnArray)));
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(parse_seed("[{"), Err(CatalogError::Json(_))));
    }

    #[test]
    fn test_invalid_record_reports_index() {
        let json = ONE_MOVIE.replace("1994", "1700");
        let json = format!("[{}, {}]", &json[1..json.len() - 1], r#"{"id": 1}"#);
        match parse_seed(&json) {
            Err(CatalogError::InvalidRecord { index, source }) => {
                assert_eq!(index, 0);
                assert!(source.concerns("year"));
            }
            other => panic!("expected InvalidRecord, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_or_bad_id() {
        let no_id = ONE_MOVIE.replace(r#""id": "c8a7d63f-3b04-44d3-9d95-8782fd7dcfaf","#, "");
        assert!(matches!(
            parse_seed(&no_id),
            Err(CatalogError::InvalidId { index: 0, .. })
        ));

        let bad_id = ONE_MOVIE.replace("c8a7d63f-3b04-44d3-9d95-8782fd7dcfaf", "movie-1");
        match parse_seed(&bad_id) {
            Err(CatalogError::InvalidId { value, .. }) => assert_eq!(value, "movie-1"),
            other => panic!("expected InvalidId, got {:?}", other),
        }
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let inner = ONE_MOVIE.trim().trim_start_matches('[').trim_end_matches(']');
        let json = format!("[{inner},{inner}]");
        assert!(matches!(
            store_from_json(&json),
            Err(CatalogError::DuplicateId(_))
        ));
    }
}
