use std::sync::Arc;

use axum::extract::multipart::{MultipartError, MultipartRejection};
use axum::extract::rejection::QueryRejection;
use axum::extract::{DefaultBodyLimit, Multipart, Query, State};
use axum::http::StatusCode;
use axum::middleware;
use axum::routing::{get, post};
use axum::Json;
use axum::Router;
use serde::Deserialize;
use tracing::{info, warn};

use crate::api::rest::auth::require_bearer;
use crate::documents::{StoredDocument, Upload};
use crate::error::AppError;
use crate::geo::GeoPoint;
use crate::models::rider::{NewRider, Rider};
use crate::notify::template::inspection_notice;
use crate::state::AppState;

const DOCUMENT_FIELD: &str = "drivingPapers";

pub fn router(state: &Arc<AppState>) -> Router<Arc<AppState>> {
    let mut register =
        post(register_rider).layer(DefaultBodyLimit::max(state.settings.max_upload_bytes));
    if state.settings.auth_token.is_some() {
        register = register.route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_bearer,
        ));
    }

    Router::new()
        .route("/riders", register)
        .route("/nearest-riders", get(nearest_riders))
}

#[derive(Debug, Deserialize)]
pub struct NearestQuery {
    pub latitude: Option<String>,
    pub longitude: Option<String>,
}

#[derive(Debug, Default)]
struct RegistrationForm {
    name: Option<String>,
    latitude: Option<String>,
    longitude: Option<String>,
    pre_owned: Option<String>,
    address: Option<String>,
    email: Option<String>,
    phone_number: Option<String>,
    driving_papers: Option<Upload>,
}

#[derive(Debug)]
struct Registration {
    name: String,
    address: String,
    email: String,
    phone_number: String,
    pre_owned: Option<String>,
    location: GeoPoint,
}

fn multipart_error(err: MultipartError, limit: usize) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        return AppError::PayloadTooLarge(limit);
    }
    AppError::BadRequest(format!("invalid multipart body: {}", err.body_text()))
}

impl RegistrationForm {
    async fn read(mut multipart: Multipart, limit: usize) -> Result<Self, AppError> {
        let mut form = Self::default();
        let malformed = move |err| multipart_error(err, limit);

        while let Some(field) = multipart.next_field().await.map_err(malformed)? {
            let Some(name) = field.name().map(str::to_owned) else {
                continue;
            };

            if name == DOCUMENT_FIELD {
                // A part without a filename is a plain text value, not a file.
                let Some(original_name) = field.file_name().map(str::to_owned) else {
                    continue;
                };
                if form.driving_papers.is_some() {
                    return Err(AppError::BadRequest(format!(
                        "exactly one {DOCUMENT_FIELD} file is allowed"
                    )));
                }

                let content_type = field.content_type().map(str::to_owned);
                let bytes = field.bytes().await.map_err(malformed)?;
                form.driving_papers = Some(Upload {
                    original_name,
                    content_type,
                    bytes,
                });
                continue;
            }

            let slot = match name.as_str() {
                "name" => &mut form.name,
                "latitude" => &mut form.latitude,
                "longitude" => &mut form.longitude,
                "preOwned" => &mut form.pre_owned,
                "address" => &mut form.address,
                "email" => &mut form.email,
                "phoneNumber" => &mut form.phone_number,
                _ => continue,
            };
            *slot = Some(field.text().await.map_err(malformed)?);
        }

        Ok(form)
    }

    fn validate(self) -> Result<(Registration, Upload), AppError> {
        let upload = self.driving_papers.ok_or_else(|| {
            AppError::BadRequest(format!("{DOCUMENT_FIELD} file is required"))
        })?;
        if upload.bytes.is_empty() {
            return Err(AppError::BadRequest(format!(
                "{DOCUMENT_FIELD} file is empty"
            )));
        }

        let name = required(self.name, "name")?;
        let address = required(self.address, "address")?;
        let email = required(self.email, "email")?;
        let phone_number = required(self.phone_number, "phoneNumber")?;
        let latitude = parse_coordinate(self.latitude.as_deref(), "latitude", 90.0)?;
        let longitude = parse_coordinate(self.longitude.as_deref(), "longitude", 180.0)?;

        let registration = Registration {
            name,
            address,
            email,
            phone_number,
            pre_owned: self.pre_owned,
            location: GeoPoint::new(longitude, latitude),
        };

        Ok((registration, upload))
    }
}

impl Registration {
    fn into_new_rider(self, document: &StoredDocument) -> NewRider {
        NewRider {
            name: self.name,
            address: self.address,
            email: self.email,
            phone_number: self.phone_number,
            pre_owned: self.pre_owned,
            driving_papers: document.path_string(),
            location: self.location,
        }
    }
}

fn required(value: Option<String>, field: &str) -> Result<String, AppError> {
    match value {
        Some(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(AppError::BadRequest(format!("{field} is required"))),
    }
}

fn parse_coordinate(raw: Option<&str>, field: &str, limit: f64) -> Result<f64, AppError> {
    let raw = raw
        .map(str::trim)
        .filter(|raw| !raw.is_empty())
        .ok_or_else(|| AppError::BadRequest(format!("{field} is required")))?;

    let value: f64 = raw
        .parse()
        .map_err(|_| AppError::BadRequest(format!("{field} must be a number, got {raw:?}")))?;

    if !value.is_finite() || value.abs() > limit {
        return Err(AppError::BadRequest(format!(
            "{field} must be between -{limit} and {limit}"
        )));
    }

    Ok(value)
}

async fn register_rider(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<(StatusCode, Json<Rider>), AppError> {
    match register(&state, multipart).await {
        Ok(rider) => {
            state.metrics.riders_registered_total.inc();
            info!(rider_id = %rider.id, "rider registered");
            Ok((StatusCode::CREATED, Json(rider)))
        }
        Err(err) => {
            state
                .metrics
                .registration_rejections_total
                .with_label_values(&[err.reason()])
                .inc();
            warn!(error = %err, "registration rejected");
            Err(err)
        }
    }
}

async fn register(
    state: &AppState,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Rider, AppError> {
    let multipart = multipart.map_err(|err| AppError::BadRequest(err.body_text()))?;
    let (registration, upload) =
        RegistrationForm::read(multipart, state.settings.max_upload_bytes)
            .await?
            .validate()?;

    let document = state.documents.save(upload).await?;

    let rider = match state
        .riders
        .insert(registration.into_new_rider(&document))
        .await
    {
        Ok(rider) => rider,
        Err(err) => {
            state.documents.discard(&document).await;
            return Err(err.into());
        }
    };

    state.notifier.dispatch(inspection_notice(
        &state.settings.mail_from,
        &rider,
        &document,
    ));

    Ok(rider)
}

async fn nearest_riders(
    State(state): State<Arc<AppState>>,
    query: Result<Query<NearestQuery>, QueryRejection>,
) -> Result<Json<Vec<Rider>>, AppError> {
    let Query(query) = query.map_err(|err| AppError::BadRequest(err.body_text()))?;

    let latitude = parse_coordinate(query.latitude.as_deref(), "latitude", 90.0)?;
    let longitude = parse_coordinate(query.longitude.as_deref(), "longitude", 180.0)?;

    let timer = state.metrics.nearest_query_latency_seconds.start_timer();
    let riders = state
        .riders
        .find_near(
            GeoPoint::new(longitude, latitude),
            state.settings.max_distance_meters,
        )
        .await?;
    timer.observe_duration();

    Ok(Json(riders))
}

#[cfg(test)]
mod tests {
    use super::parse_coordinate;

    #[test]
    fn coordinates_parse_within_range() {
        assert_eq!(parse_coordinate(Some("28.70"), "latitude", 90.0).unwrap(), 28.70);
        assert_eq!(parse_coordinate(Some(" -77.1 "), "longitude", 180.0).unwrap(), -77.1);
    }

    #[test]
    fn malformed_coordinates_are_client_errors() {
        for raw in [None, Some(""), Some("north"), Some("NaN"), Some("inf"), Some("90.5")] {
            assert!(parse_coordinate(raw, "latitude", 90.0).is_err(), "{raw:?}");
        }
    }
}
