use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use uuid::Uuid;

use crate::geo::{haversine_meters, GeoPoint};
use crate::models::rider::{NewRider, Rider};
use crate::store::{RiderStore, StoreError};

#[derive(Default)]
pub struct MemoryRiderStore {
    riders: DashMap<Uuid, Rider>,
}

impl MemoryRiderStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn validate(rider: &NewRider) -> Result<(), StoreError> {
    let required = [
        ("name", &rider.name),
        ("address", &rider.address),
        ("email", &rider.email),
        ("phoneNumber", &rider.phone_number),
        ("drivingPapers", &rider.driving_papers),
    ];

    for (field, value) in required {
        if value.is_empty() {
            return Err(StoreError::Validation(format!("{field} is required")));
        }
    }

    if !rider.location.is_valid() {
        let [lng, lat] = rider.location.coordinates();
        return Err(StoreError::Validation(format!(
            "location is not a valid point: [{lng}, {lat}]"
        )));
    }

    Ok(())
}

#[async_trait]
impl RiderStore for MemoryRiderStore {
    async fn insert(&self, rider: NewRider) -> Result<Rider, StoreError> {
        validate(&rider)?;

        let stored = Rider::from_new(rider, Uuid::new_v4(), Utc::now());
        self.riders.insert(stored.id, stored.clone());
        Ok(stored)
    }

    async fn find_near(
        &self,
        point: GeoPoint,
        max_distance_meters: f64,
    ) -> Result<Vec<Rider>, StoreError> {
        if !point.is_valid() {
            return Err(StoreError::Validation(
                "query point is not a valid location".to_string(),
            ));
        }
        if !max_distance_meters.is_finite() || max_distance_meters < 0.0 {
            return Err(StoreError::Validation(
                "max distance must be a non-negative number".to_string(),
            ));
        }

        let mut hits: Vec<(f64, Rider)> = self
            .riders
            .iter()
            .filter_map(|entry| {
                let rider = entry.value();
                let distance = haversine_meters(&point, &rider.location);
                (distance <= max_distance_meters).then(|| (distance, rider.clone()))
            })
            .collect();

        hits.sort_by(|a, b| {
            a.0.total_cmp(&b.0)
                .then_with(|| a.1.created_at.cmp(&b.1.created_at))
                .then_with(|| a.1.id.cmp(&b.1.id))
        });

        Ok(hits.into_iter().map(|(_, rider)| rider).collect())
    }

    async fn count(&self) -> Result<usize, StoreError> {
        Ok(self.riders.len())
    }
}
