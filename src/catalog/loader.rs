use std::collections::HashMap;

use crate::catalog::error::LoadError;
use crate::catalog::source::{http_client, Source};
use crate::catalog::types::{ElementSet, SatelliteChoice, SatelliteRecord};

const PRIMARY_MIN_LINES: usize = 3;

/// How loaded records get their ids and names
#[derive(Debug, Clone)]
pub struct Naming {
    pub primary_id: String,
    pub primary_name: String,
    pub bulk_prefix: String,
}

impl Default for Naming {
    fn default() -> Self {
        Self {
            primary_id: "iss".to_string(),
            primary_name: "ISS (ZARYA)".to_string(),
            bulk_prefix: "starlink".to_string(),
        }
    }
}

/// Orbital data store. Records keep their load order.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    records: Vec<SatelliteRecord>,
    index: HashMap<String, usize>,
}

impl Catalog {
    /// Fetch both sources concurrently and parse them.
    ///
    /// Either fetch failing, or a primary source too short to hold an element
    /// set, fails the whole load. Malformed bulk groups are only skipped.
    pub async fn load(
        primary: &Source,
        bulk: &Source,
        naming: &Naming,
    ) -> Result<Self, LoadError> {
        let client = http_client()?;
        let (primary_text, bulk_text) =
            tokio::try_join!(primary.fetch(&client), bulk.fetch(&client))?;

        let catalog = Self::from_texts(&primary_text, &bulk_text, naming)?;
        log::info!(
            "Loaded {} satellites from {} and {}",
            catalog.len(),
            primary,
            bulk
        );
        Ok(catalog)
    }

    pub fn from_texts(
        primary_text: &str,
        bulk_text: &str,
        naming: &Naming,
    ) -> Result<Self, LoadError> {
        let mut catalog = Catalog::default();
        catalog.insert(parse_primary(primary_text, naming)?);
        for record in parse_bulk(bulk_text, &naming.bulk_prefix) {
            catalog.insert(record);
        }
        Ok(catalog)
    }

    fn insert(&mut self, record: SatelliteRecord) {
        if let Some(&existing) = self.index.get(&record.id) {
            log::warn!("Duplicate satellite id {}, keeping the latest", record.id);
            self.records[existing] = record;
            return;
        }
        self.index.insert(record.id.clone(), self.records.len());
        self.records.push(record);
    }

    pub fn get(&self, id: &str) -> Option<&SatelliteRecord> {
        self.index.get(id).map(|&i| &self.records[i])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn records(&self) -> &[SatelliteRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// id -> name pairs for the satellite chooser, in load order
    pub fn choices(&self) -> Vec<SatelliteChoice> {
        self.records
            .iter()
            .map(|r| SatelliteChoice {
                id: r.id.clone(),
                name: r.name.clone(),
            })
            .collect()
    }
}

fn split_lines(content: &str) -> Vec<&str> {
    content.trim().split('\n').collect()
}

/// Parse the primary object's TLE. The name line is ignored in favour of
/// the configured display name.
pub fn parse_primary(content: &str, naming: &Naming) -> Result<SatelliteRecord, LoadError> {
    let lines = split_lines(content);
    if lines.len() < PRIMARY_MIN_LINES {
        return Err(LoadError::InvalidPrimary(format!(
            "expected at least {} lines, got {}",
            PRIMARY_MIN_LINES,
            lines.len()
        )));
    }

    let element_set = ElementSet::new(lines[1], lines[2])
        .ok_or_else(|| LoadError::InvalidPrimary("empty element set line".into()))?;

    Ok(SatelliteRecord {
        id: naming.primary_id.clone(),
        name: naming.primary_name.clone(),
        element_set,
    })
}

/// Parse consecutive name/line1/line2 groups.
///
/// Ids come from the group position in the source, so a rejected group never
/// shifts the ids of the groups after it.
pub fn parse_bulk(content: &str, prefix: &str) -> Vec<SatelliteRecord> {
    let lines = split_lines(content);
    let mut records = Vec::new();

    let mut i = 0;
    while i + 2 < lines.len() {
        let name = lines[i].trim();
        match ElementSet::new(lines[i + 1], lines[i + 2]) {
            Some(element_set) if !name.is_empty() => records.push(SatelliteRecord {
                id: format!("{}-{}", prefix, i / 3),
                name: name.to_string(),
                element_set,
            }),
            _ => log::warn!("Skipping malformed TLE at index {}", i),
        }
        i += 3;
    }

    records
}
