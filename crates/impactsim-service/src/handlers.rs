//! Route handlers.
//!
//! Each handler parses and validates its input, makes one call into
//! [`impactsim_lib::ImpactService`], and formats the result. Every failure is
//! answered with problem details.

use axum::{
    extract::{
        rejection::{PathRejection, QueryRejection},
        Path, Query, State,
    },
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::{info, warn};

use impactsim_lib::{
    AsteroidId, Error as LibError, GenerativeProvider, ImageId, PlacesProvider,
    StaticMapProvider,
};
use impactsim_service_shared::{
    content_type_for, from_lib_error, record_explosion_radius, record_image_cached,
    record_image_edit, record_upstream_failure, AppState, BinaryResponse, ExplosionQuery,
    ImpactImageQuery, MapImageQuery, ModifiedImageQuery, PredictionQuery, ProblemDetails,
    RequestId, ServiceResponse, Validate, ZoneQuery, EXPLOSION_RADIUS_HEADER, IMAGE_ID_HEADER,
    ZOOM_LEVEL_HEADER,
};

type HandlerResult<T = Response> = Result<T, Box<ProblemDetails>>;

/// Asteroid details returned by `/asteroids/info/{id}`.
#[derive(Debug, Serialize)]
struct AsteroidInfo {
    mass: f64,
    diameter: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'static str>,
}

#[derive(Debug, Serialize)]
struct Prediction {
    text: String,
}

pub async fn asteroid_info<M, P, G>(
    State(state): State<AppState<M, P, G>>,
    request_id: RequestId,
    id: Result<Path<AsteroidId>, PathRejection>,
) -> HandlerResult
where
    M: StaticMapProvider,
    P: PlacesProvider,
    G: GenerativeProvider,
{
    let id = parse_id(id, &request_id)?;
    let service = state.service();
    let profile = service.asteroid_profile(id);

    let info = AsteroidInfo {
        mass: profile.mass,
        diameter: profile.diameter,
        name: service.catalog().name_of(id),
    };
    Ok(ServiceResponse::new(info).into_response())
}

pub async fn asteroid_diameter<M, P, G>(
    State(state): State<AppState<M, P, G>>,
    request_id: RequestId,
    id: Result<Path<AsteroidId>, PathRejection>,
) -> HandlerResult
where
    M: StaticMapProvider,
    P: PlacesProvider,
    G: GenerativeProvider,
{
    let id = parse_id(id, &request_id)?;
    Ok(Json(state.service().asteroid_diameter(id)).into_response())
}

pub async fn asteroid_catalog<M, P, G>(State(state): State<AppState<M, P, G>>) -> Response
where
    M: StaticMapProvider,
    P: PlacesProvider,
    G: GenerativeProvider,
{
    Json(state.service().known_asteroids()).into_response()
}

pub async fn explosion<M, P, G>(
    State(state): State<AppState<M, P, G>>,
    request_id: RequestId,
    query: Result<Query<ExplosionQuery>, QueryRejection>,
) -> HandlerResult
where
    M: StaticMapProvider,
    P: PlacesProvider,
    G: GenerativeProvider,
{
    let query = parse_query(query, &request_id)?;
    let radius = state.service().explosion_radius(query.velocity, query.mass);
    record_explosion_radius(radius);
    Ok(Json(radius).into_response())
}

pub async fn map_image<M, P, G>(
    State(state): State<AppState<M, P, G>>,
    request_id: RequestId,
    query: Result<Query<MapImageQuery>, QueryRejection>,
) -> HandlerResult
where
    M: StaticMapProvider,
    P: PlacesProvider,
    G: GenerativeProvider,
{
    let query = parse_query(query, &request_id)?;
    let image = state
        .service()
        .map_image(query.latitude, query.longitude, query.diameter)
        .await
        .map_err(|e| problem(&e, &request_id))?;

    record_image_cached("image");
    Ok(BinaryResponse::png(image.bytes)
        .with_header(IMAGE_ID_HEADER, image.id)
        .with_header(ZOOM_LEVEL_HEADER, image.zoom)
        .into_response())
}

pub async fn impact_image<M, P, G>(
    State(state): State<AppState<M, P, G>>,
    request_id: RequestId,
    query: Result<Query<ImpactImageQuery>, QueryRejection>,
) -> HandlerResult
where
    M: StaticMapProvider,
    P: PlacesProvider,
    G: GenerativeProvider,
{
    let query = parse_query(query, &request_id)?;
    let impact = state
        .service()
        .impact_image(query.latitude, query.longitude, query.velocity, query.mass)
        .await
        .map_err(|e| problem(&e, &request_id))?;

    record_explosion_radius(impact.explosion_radius);
    record_image_cached("impact-image");
    Ok(BinaryResponse::png(impact.image.bytes)
        .with_header(IMAGE_ID_HEADER, impact.image.id)
        .with_header(ZOOM_LEVEL_HEADER, impact.image.zoom)
        .with_header(EXPLOSION_RADIUS_HEADER, impact.explosion_radius)
        .into_response())
}

pub async fn zone<M, P, G>(
    State(state): State<AppState<M, P, G>>,
    request_id: RequestId,
    query: Result<Query<ZoneQuery>, QueryRejection>,
) -> HandlerResult
where
    M: StaticMapProvider,
    P: PlacesProvider,
    G: GenerativeProvider,
{
    let query = parse_query(query, &request_id)?;
    let population = state
        .service()
        .zone_population(query.longitude, query.latitude, query.radius)
        .await
        .map_err(|e| problem(&e, &request_id))?;

    Ok(Json(population).into_response())
}

pub async fn prediction<M, P, G>(
    State(state): State<AppState<M, P, G>>,
    request_id: RequestId,
    query: Result<Query<PredictionQuery>, QueryRejection>,
) -> HandlerResult
where
    M: StaticMapProvider,
    P: PlacesProvider,
    G: GenerativeProvider,
{
    let query = parse_query(query, &request_id)?;
    let text = state
        .service()
        .narrative(query.longitude, query.latitude, query.radius, query.years)
        .await
        .map_err(|e| problem(&e, &request_id))?;

    Ok(ServiceResponse::new(Prediction { text }).into_response())
}

pub async fn modified_image<M, P, G>(
    State(state): State<AppState<M, P, G>>,
    request_id: RequestId,
    query: Result<Query<ModifiedImageQuery>, QueryRejection>,
) -> HandlerResult
where
    M: StaticMapProvider,
    P: PlacesProvider,
    G: GenerativeProvider,
{
    let query = parse_query(query, &request_id)?;
    let id: ImageId = query.id.parse().map_err(|e| problem(&e, &request_id))?;

    let edited = state
        .service()
        .edit_image(&id, query.years)
        .await
        .map_err(|e| problem(&e, &request_id))?;

    record_image_edit(query.years);
    info!(request_id = %request_id, image_id = %edited.id, "served edited image");
    Ok(ServiceResponse::new(edited).into_response())
}

pub async fn artifact<M, P, G>(
    State(state): State<AppState<M, P, G>>,
    request_id: RequestId,
    name: Result<Path<String>, PathRejection>,
) -> HandlerResult
where
    M: StaticMapProvider,
    P: PlacesProvider,
    G: GenerativeProvider,
{
    let Path(name) = name.map_err(|rejection| bad_request(rejection.body_text(), &request_id))?;
    let bytes = state
        .service()
        .artifact(&name)
        .await
        .map_err(|e| problem(&e, &request_id))?;

    Ok(BinaryResponse::new(bytes, content_type_for(&name)).into_response())
}

fn parse_id(
    id: Result<Path<AsteroidId>, PathRejection>,
    request_id: &RequestId,
) -> HandlerResult<AsteroidId> {
    let Path(id) = id.map_err(|rejection| bad_request(rejection.body_text(), request_id))?;
    Ok(id)
}

fn parse_query<T: Validate>(
    query: Result<Query<T>, QueryRejection>,
    request_id: &RequestId,
) -> HandlerResult<T> {
    let Query(query) = query.map_err(|rejection| bad_request(rejection.body_text(), request_id))?;
    query.validate(request_id.as_str())?;
    Ok(query)
}

fn bad_request(detail: String, request_id: &RequestId) -> Box<ProblemDetails> {
    Box::new(ProblemDetails::bad_request(detail, request_id.as_str()))
}

/// Map a library error to problem details, counting provider failures.
fn problem(error: &LibError, request_id: &RequestId) -> Box<ProblemDetails> {
    match error {
        LibError::Upstream { service, .. } => {
            record_upstream_failure(service);
            warn!(request_id = %request_id, error = %error, "upstream provider failed");
        }
        LibError::Validation { .. }
        | LibError::ImageNotFound { .. }
        | LibError::FileNotFound { .. } => {
            info!(request_id = %request_id, error = %error, "request rejected");
        }
        _ => warn!(request_id = %request_id, error = %error, "request failed"),
    }
    Box::new(from_lib_error(error, request_id.as_str()))
}
