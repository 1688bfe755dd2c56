//! # Resource Handlers
//!
//! One module per REST resource. Each handler follows the same shape:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Handler Anatomy                                  │
//! │                                                                         │
//! │  1. authorize(identity, action, resource)   ← policy, before anything  │
//! │  2. repository call                         ← nova-db                  │
//! │  3. view-model construction                 ← explicit structs,        │
//! │     (list views extended into detail views    per action               │
//! │      by composition, not inheritance)                                  │
//! │  4. Json(...) / ApiError                                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::HashMap;

use nova_core::{Route, Station, Train, TrainType, Trip};
use nova_db::Database;

use crate::error::ApiError;

pub mod crews;
pub mod orders;
pub mod routes;
pub mod stations;
pub mod tickets;
pub mod train_types;
pub mod trains;
pub mod trips;
pub mod users;

/// Per-request cache for resolving entity references while building view
/// models.
///
/// A page of trips repeats the same route/train ids over and over; each
/// id is fetched at most once per request. Referenced rows are guaranteed
/// by foreign keys, so a miss here is a data integrity fault and surfaces
/// as a 500, not a 404.
#[derive(Default)]
pub(crate) struct RefCache {
    stations: HashMap<String, Station>,
    routes: HashMap<String, Route>,
    trains: HashMap<String, Train>,
    train_types: HashMap<String, TrainType>,
    trips: HashMap<String, Trip>,
}

impl RefCache {
    pub fn new() -> Self {
        RefCache::default()
    }

    pub async fn station(&mut self, db: &Database, id: &str) -> Result<Station, ApiError> {
        if let Some(station) = self.stations.get(id) {
            return Ok(station.clone());
        }
        let station = db
            .stations()
            .get_by_id(id)
            .await?
            .ok_or_else(|| ApiError::internal(format!("referenced station {id} missing")))?;
        self.stations.insert(id.to_string(), station.clone());
        Ok(station)
    }

    pub async fn route(&mut self, db: &Database, id: &str) -> Result<Route, ApiError> {
        if let Some(route) = self.routes.get(id) {
            return Ok(route.clone());
        }
        let route = db
            .routes()
            .get_by_id(id)
            .await?
            .ok_or_else(|| ApiError::internal(format!("referenced route {id} missing")))?;
        self.routes.insert(id.to_string(), route.clone());
        Ok(route)
    }

    pub async fn train(&mut self, db: &Database, id: &str) -> Result<Train, ApiError> {
        if let Some(train) = self.trains.get(id) {
            return Ok(train.clone());
        }
        let train = db
            .trains()
            .get_by_id(id)
            .await?
            .ok_or_else(|| ApiError::internal(format!("referenced train {id} missing")))?;
        self.trains.insert(id.to_string(), train.clone());
        Ok(train)
    }

    pub async fn train_type(&mut self, db: &Database, id: &str) -> Result<TrainType, ApiError> {
        if let Some(train_type) = self.train_types.get(id) {
            return Ok(train_type.clone());
        }
        let train_type = db
            .train_types()
            .get_by_id(id)
            .await?
            .ok_or_else(|| ApiError::internal(format!("referenced train type {id} missing")))?;
        self.train_types.insert(id.to_string(), train_type.clone());
        Ok(train_type)
    }

    pub async fn trip(&mut self, db: &Database, id: &str) -> Result<Trip, ApiError> {
        if let Some(trip) = self.trips.get(id) {
            return Ok(trip.clone());
        }
        let trip = db
            .trips()
            .get_by_id(id)
            .await?
            .ok_or_else(|| ApiError::internal(format!("referenced trip {id} missing")))?;
        self.trips.insert(id.to_string(), trip.clone());
        Ok(trip)
    }
}
