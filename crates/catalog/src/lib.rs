//! # Catalog Crate
//!
//! This crate holds the movie catalog: what a valid movie is, and the
//! in-memory collection that stores them.
//!
//! ## Main Components
//!
//! - **types**: Core domain types (Movie, NewMovie, MoviePatch, Genre)
//! - **schema**: Declarative movie schema with full and partial validation
//! - **store**: The ordered in-memory MovieStore
//! - **seed**: Build the initial store from static JSON
//! - **error**: Error types for seed loading
//!
//! ## Example Usage
//!
//! ```ignore
//! use catalog::{seed, schema};
//! use serde_json::json;
//!
//! let mut store = seed::load_default()?;
//!
//! let fields = schema::validate_full(&json!({
//!     "title": "Alien",
//!     "year": 1979,
//!     "director": "Ridley Scott",
//!     "duration": 117,
//!     "poster": "https://x.com/a.jpg",
//!     "genre": ["Sci-Fi"]
//! }))?;
//! let movie = store.insert(fields);
//!
//! println!("{} has rate {}", movie.title, movie.rate); // defaulted to 5
//! ```

// Public modules
pub mod error;
pub mod types;
pub mod schema;
pub mod store;
pub mod seed;

// Re-export commonly used types for convenience
pub use error::{CatalogError, Result};
pub use schema::{validate_full, validate_partial, Issue, IssueCode, ValidationError};
pub use store::MovieStore;
pub use types::{
    // Type aliases
    MovieId,
    // Core types
    Movie,
    NewMovie,
    MoviePatch,
    // Enums
    Genre,
};
