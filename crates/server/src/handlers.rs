//! # Request Handlers
//!
//! One handler per CRUD intent. Each handler:
//! 1. Validates its input (body first, before touching the store)
//! 2. Takes the store lock once for the whole lookup-and-mutate step
//! 3. Maps the store's answer to a status code and JSON body
//!
//! | Intent | Success | Failure |
//! |---|---|---|
//! | list/filter | 200 array | 400 |
//! | get | 200 object | 404 |
//! | create | 201 object | 400 |
//! | update | 200 object | 400, then 404 |
//! | delete | 204 | 404 |

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use catalog::{validate_full, validate_partial, Movie, MovieId};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::error::{ApiError, ApiResult};
use crate::routes::AppState;

/// Query string of `GET /movies`
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub genre: Option<String>,
}

/// Ids are UUIDs; any other path segment cannot name a movie
fn parse_id(path: Result<Path<String>, PathRejection>) -> ApiResult<MovieId> {
    let Path(raw) = path.inspect_err(|rejection| warn!("Rejected path: {}", rejection))?;
    MovieId::parse_str(&raw).map_err(|_| {
        debug!(id = %raw, "Path id is not a UUID");
        ApiError::NotFound
    })
}

fn body_value(body: Result<Json<Value>, JsonRejection>) -> ApiResult<Value> {
    let Json(value) = body.inspect_err(|rejection| warn!("Rejected request body: {}", rejection))?;
    Ok(value)
}

/// `GET /movies[?genre=<text>]`
pub async fn list_movies(
    State(state): State<AppState>,
    query: Result<Query<ListParams>, QueryRejection>,
) -> ApiResult<Json<Vec<Movie>>> {
    let Query(params) = query.inspect_err(|rejection| warn!("Rejected query string: {}", rejection))?;
    let store = state.store.read().await;
    let movies: Vec<Movie> = match params.genre.as_deref() {
        // `?genre=` with no value lists everything
        Some(genre) if !genre.is_empty() => {
            store.list_by_genre(genre).into_iter().cloned().collect()
        }
        _ => store.list_all().to_vec(),
    };
    debug!(genre = ?params.genre, count = movies.len(), "Listed movies");
    Ok(Json(movies))
}

/// `GET /movies/:id`
pub async fn get_movie(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
) -> ApiResult<Json<Movie>> {
    let id = parse_id(path)?;
    let store = state.store.read().await;
    match store.get(id) {
        Some(movie) => Ok(Json(movie.clone())),
        None => {
            debug!(%id, "Movie not found");
            Err(ApiError::NotFound)
        }
    }
}

/// `POST /movies`
pub async fn create_movie(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Movie>)> {
    let input = body_value(body)?;
    let fields = validate_full(&input).inspect_err(|err| warn!("Rejected new movie: {}", err))?;

    let movie = state.store.write().await.insert(fields);
    info!(id = %movie.id, title = %movie.title, "Created movie");
    Ok((StatusCode::CREATED, Json(movie)))
}

/// `PATCH /movies/:id`
///
/// The body is validated before the id is looked up, so an invalid body
/// for an unknown id is a 400, not a 404.
pub async fn update_movie(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Json<Movie>> {
    let input = body_value(body)?;
    let patch = validate_partial(&input).inspect_err(|err| warn!("Rejected movie patch: {}", err))?;
    let id = parse_id(path)?;
    if patch.is_empty() {
        debug!(%id, "Patch carries no known fields");
    }

    match state.store.write().await.update(id, patch) {
        Some(movie) => {
            info!(%id, "Updated movie");
            Ok(Json(movie))
        }
        None => {
            debug!(%id, "Movie not found");
            Err(ApiError::NotFound)
        }
    }
}

/// `DELETE /movies/:id`
pub async fn delete_movie(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
) -> ApiResult<StatusCode> {
    let id = parse_id(path)?;
    if state.store.write().await.remove(id) {
        info!(%id, "Deleted movie");
        Ok(StatusCode::NO_CONTENT)
    } else {
        debug!(%id, "Movie not found");
        Err(ApiError::NotFound)
    }
}

/// `OPTIONS /movies` and `OPTIONS /movies/:id`. CORS headers are added by
/// the origin gate middleware.
pub async fn preflight() -> StatusCode {
    StatusCode::OK
}
