pub mod memory;

use async_trait::async_trait;
use thiserror::Error;

use crate::geo::GeoPoint;
use crate::models::rider::{NewRider, Rider};

pub use memory::MemoryRiderStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("rider validation failed: {0}")]
    Validation(String),

    #[error("rider store unavailable: {0}")]
    Unavailable(String),
}

#[async_trait]
pub trait RiderStore: Send + Sync {
    async fn insert(&self, rider: NewRider) -> Result<Rider, StoreError>;

    /// Every rider within `max_distance_meters` of `point`, nearest first.
    async fn find_near(
        &self,
        point: GeoPoint,
        max_distance_meters: f64,
    ) -> Result<Vec<Rider>, StoreError>;

    async fn count(&self) -> Result<usize, StoreError>;
}
