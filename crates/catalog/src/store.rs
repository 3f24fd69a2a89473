//! The in-memory movie store.
//!
//! `MovieStore` owns every movie record for the lifetime of the process.
//! It is a plain ordered `Vec`: insertion appends, removal shifts the tail
//! down without reordering it, and updates replace a record in place.
//!
//! The store itself does no locking. Callers that share it between threads
//! wrap it in a single lock and hold that lock for each whole operation.

use std::collections::HashSet;

use tracing::debug;
use uuid::Uuid;

use crate::error::{CatalogError, Result};
use crate::types::{Movie, MovieId, MoviePatch, NewMovie};

/// Ordered collection of movies with identity-based lookup
#[derive(Debug, Default, Clone)]
pub struct MovieStore {
    movies: Vec<Movie>,
}

impl MovieStore {
    /// Creates a new, empty store
    pub fn new() -> Self {
        Self { movies: Vec::new() }
    }

    /// Build a store from already-validated records, keeping their order.
    ///
    /// Fails if two records share an id.
    pub fn from_seed(movies: Vec<Movie>) -> Result<Self> {
        let mut seen = HashSet::with_capacity(movies.len());
        for movie in &movies {
            if !seen.insert(movie.id) {
                return Err(CatalogError::DuplicateId(movie.id));
            }
        }
        Ok(Self { movies })
    }

    /// Every movie, in store order
    pub fn list_all(&self) -> &[Movie] {
        &self.movies
    }

    /// Movies tagged with `genre`, compared case-insensitively.
    ///
    /// An unknown genre simply matches nothing.
    pub fn list_by_genre(&self, genre: &str) -> Vec<&Movie> {
        self.movies
            .iter()
            .filter(|movie| movie.has_genre(genre))
            .collect()
    }

    /// Get a movie by id
    pub fn get(&self, id: MovieId) -> Option<&Movie> {
        self.movies.iter().find(|movie| movie.id == id)
    }

    /// Assign a fresh id to `fields`, append the record and return it
    pub fn insert(&mut self, fields: NewMovie) -> Movie {
        let id = self.fresh_id();
        let movie = Movie::from_new(id, fields);
        self.movies.push(movie.clone());
        debug!(%id, count = self.movies.len(), "Inserted movie");
        movie
    }

    /// Merge `patch` over the movie with `id`, keeping its position.
    ///
    /// Returns the merged record, or `None` if no movie has that id.
    pub fn update(&mut self, id: MovieId, patch: MoviePatch) -> Option<Movie> {
        let movie = self.movies.iter_mut().find(|movie| movie.id == id)?;
        movie.apply(patch);
        Some(movie.clone())
    }

    /// Delete the movie with `id`. Returns whether anything was removed.
    pub fn remove(&mut self, id: MovieId) -> bool {
        match self.movies.iter().position(|movie| movie.id == id) {
            Some(index) => {
                // `Vec::remove` shifts the tail, preserving order
                self.movies.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.movies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.movies.is_empty()
    }

    /// A v4 UUID not used by any record currently in the store
    fn fresh_id(&self) -> MovieId {
        loop {
            let id = Uuid::new_v4();
            if self.get(id).is_none() {
                return id;
            }
        }
    }
}
