//! Table Registry
//!
//! Holds the hygrometric table and every station's corrections for the
//! lifetime of the application. Tables can be replaced while derivations are
//! running: readers get an `Arc` to whatever was current when they asked and
//! keep it until they are done.
//!
//! The registry implements [`StationCorrectionRepository`], so an
//! `Arc<TableRegistry>` plugs straight into the calculators.

use std::{
    collections::HashMap,
    path::Path,
    sync::{Arc, PoisonError, RwLock},
};

use log::{info, warn};
use metobs_core::{
    tables::{HygrometricTable, StationCorrectionRepository, StationCorrections},
    ObservationDeriver,
};

use crate::{accept, open_document, StationMap, TableError, TableResult};

fn poisoned<T>(_: PoisonError<T>) -> TableError {
    TableError::LockPoisoned
}

/// Thread-safe store of reference tables
#[derive(Debug, Default)]
pub struct TableRegistry {
    /// Hygrometric table shared by all stations
    hygrometric: RwLock<Option<Arc<HygrometricTable>>>,

    /// Correction tables by station id
    stations: RwLock<HashMap<String, Arc<StationCorrections>>>,
}

impl TableRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry filled from a hygrometric table file and a station map file
    pub fn from_paths(
        hygrometric: impl AsRef<Path>,
        stations: impl AsRef<Path>,
    ) -> TableResult<Self> {
        let registry = Self::new();
        registry.set_hygrometric_table(open_document(hygrometric)?)?;
        let count = registry.register_stations(open_document::<StationMap>(stations)?)?;
        info!("Table registry ready with {} station(s)", count);
        Ok(registry)
    }

    /// Replace the hygrometric table after validating it
    pub fn set_hygrometric_table(&self, table: HygrometricTable) -> TableResult<()> {
        let table = Arc::new(accept(table)?);
        *self.hygrometric.write().map_err(poisoned)? = Some(table);
        Ok(())
    }

    /// Current hygrometric table
    pub fn hygrometric_table(&self) -> TableResult<Arc<HygrometricTable>> {
        self.hygrometric
            .read()
            .map_err(poisoned)?
            .clone()
            .ok_or_else(|| TableError::NotFound("hygrometric table".to_string()))
    }

    /// Add or replace one station after validating it
    pub fn register_station(
        &self,
        station_id: impl Into<String>,
        corrections: StationCorrections,
    ) -> TableResult<()> {
        let station_id = station_id.into();
        let corrections = accept(corrections).map_err(|err| match err {
            TableError::Invalid(msg) => {
                TableError::Invalid(format!("station {}: {}", station_id, msg))
            }
            other => other,
        })?;

        let mut stations = self.stations.write().map_err(poisoned)?;
        if stations.insert(station_id.clone(), Arc::new(corrections)).is_some() {
            info!("Replaced correction tables for station {}", station_id);
        }
        Ok(())
    }

    /// Add or replace every station of a map; returns the number registered
    ///
    /// The map is validated as a whole first, so either all stations are
    /// registered or none.
    pub fn register_stations(&self, stations: StationMap) -> TableResult<usize> {
        let stations = accept(stations)?;
        let count = stations.len();

        let mut registered = self.stations.write().map_err(poisoned)?;
        for (station_id, corrections) in stations {
            registered.insert(station_id, Arc::new(corrections));
        }
        Ok(count)
    }

    /// Remove a station, returning its tables if it was registered
    pub fn remove_station(&self, station_id: &str) -> TableResult<Option<Arc<StationCorrections>>> {
        Ok(self.stations.write().map_err(poisoned)?.remove(station_id))
    }

    /// Correction tables of one station
    pub fn station(&self, station_id: &str) -> TableResult<Arc<StationCorrections>> {
        self.stations
            .read()
            .map_err(poisoned)?
            .get(station_id)
            .cloned()
            .ok_or_else(|| TableError::NotFound(format!("station {}", station_id)))
    }

    /// Registered station ids, sorted
    pub fn station_ids(&self) -> TableResult<Vec<String>> {
        let mut ids: Vec<String> =
            self.stations.read().map_err(poisoned)?.keys().cloned().collect();
        ids.sort();
        Ok(ids)
    }

    /// Number of registered stations
    pub fn station_count(&self) -> TableResult<usize> {
        Ok(self.stations.read().map_err(poisoned)?.len())
    }

    /// Deriver over the current hygrometric table and this registry's stations
    ///
    /// Station tables are looked up on every derivation, so stations
    /// registered later are seen. The hygrometric table is fixed at the one
    /// current now.
    pub fn deriver(self: Arc<Self>) -> TableResult<ObservationDeriver<Arc<Self>>> {
        let table = self.hygrometric_table()?;
        Ok(ObservationDeriver::new(table, self))
    }
}

impl StationCorrectionRepository for TableRegistry {
    fn corrections(&self, station_id: &str) -> Option<Arc<StationCorrections>> {
        match self.stations.read() {
            Ok(stations) => stations.get(station_id).cloned(),
            Err(_) => {
                warn!("Station table lock poisoned; no corrections for {}", station_id);
                None
            }
        }
    }
}
