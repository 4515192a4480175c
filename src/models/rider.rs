use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::geo::GeoPoint;

#[derive(Debug, Clone, PartialEq)]
pub struct NewRider {
    pub name: String,
    pub address: String,
    pub email: String,
    pub phone_number: String,
    pub pre_owned: Option<String>,
    pub driving_papers: String,
    pub location: GeoPoint,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rider {
    pub id: Uuid,
    pub name: String,
    pub address: String,
    pub email: String,
    pub phone_number: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pre_owned: Option<String>,
    pub driving_papers: String,
    pub location: GeoPoint,
    pub created_at: DateTime<Utc>,
}

impl Rider {
    pub fn from_new(new: NewRider, id: Uuid, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            name: new.name,
            address: new.address,
            email: new.email,
            phone_number: new.phone_number,
            pre_owned: new.pre_owned,
            driving_papers: new.driving_papers,
            location: new.location,
            created_at,
        }
    }
}
