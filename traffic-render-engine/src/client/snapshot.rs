use bevy::prelude::*;
use constants::direction::direction_angle;
use constants::endpoints;
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;

use super::error::SnapshotError;

/// Entity categories reported by the simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EntityCategory {
    Car,
    TrafficLight,
    Obstacle,
    Road,
    Destination,
}

impl EntityCategory {
    pub const DYNAMIC: [EntityCategory; 2] = [EntityCategory::Car, EntityCategory::TrafficLight];
    pub const STATIC: [EntityCategory; 3] = [
        EntityCategory::Obstacle,
        EntityCategory::Road,
        EntityCategory::Destination,
    ];

    /// Dynamic categories are re-fetched after every advance call.
    pub fn is_dynamic(self) -> bool {
        matches!(self, EntityCategory::Car | EntityCategory::TrafficLight)
    }

    pub fn endpoint(self) -> &'static str {
        match self {
            EntityCategory::Car => endpoints::CARS,
            EntityCategory::TrafficLight => endpoints::TRAFFIC_LIGHTS,
            EntityCategory::Obstacle => endpoints::OBSTACLES,
            EntityCategory::Road => endpoints::ROADS,
            EntityCategory::Destination => endpoints::DESTINATIONS,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            EntityCategory::Car => "car",
            EntityCategory::TrafficLight => "traffic_light",
            EntityCategory::Obstacle => "obstacle",
            EntityCategory::Road => "road",
            EntityCategory::Destination => "destination",
        }
    }
}

/// Coarse compass heading reported for cars and roads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Heading {
    Up,
    Down,
    Left,
    Right,
}

impl Heading {
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "up" => Some(Heading::Up),
            "down" => Some(Heading::Down),
            "left" => Some(Heading::Left),
            "right" => Some(Heading::Right),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Heading::Up => "Up",
            Heading::Down => "Down",
            Heading::Left => "Left",
            Heading::Right => "Right",
        }
    }

    /// Yaw in radians from the direction table.
    pub fn yaw(self) -> f32 {
        direction_angle(self.name()).unwrap_or(0.0)
    }
}

/// One normalised entity report.
#[derive(Debug, Clone, PartialEq)]
pub struct SnapshotRecord {
    pub id: String,
    pub position: Vec3,
    pub heading: Option<Heading>,
    /// Light on/off state. Only meaningful for traffic lights.
    pub state: bool,
    /// Reported future position hint for cars.
    pub lookahead: Option<Vec3>,
}

impl SnapshotRecord {
    pub fn new(id: impl Into<String>, position: Vec3) -> Self {
        Self {
            id: id.into(),
            position,
            heading: None,
            state: false,
            lookahead: None,
        }
    }

    pub fn with_heading(mut self, heading: Heading) -> Self {
        self.heading = Some(heading);
        self
    }

    pub fn with_state(mut self, state: bool) -> Self {
        self.state = state;
        self
    }

    pub fn with_lookahead(mut self, lookahead: Vec3) -> Self {
        self.lookahead = Some(lookahead);
        self
    }
}

/// Point-in-time mapping from identity to reported state for one category.
///
/// Records keep first-seen order. A duplicate id replaces the earlier record
/// in place, so the later occurrence wins.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub category: EntityCategory,
    records: Vec<SnapshotRecord>,
    index: HashMap<String, usize>,
    /// Entries dropped because their id or position could not be parsed.
    pub skipped: usize,
    /// Entries that replaced an earlier record with the same id.
    pub duplicates: usize,
}

impl Snapshot {
    pub fn new(category: EntityCategory) -> Self {
        Self {
            category,
            records: Vec::new(),
            index: HashMap::new(),
            skipped: 0,
            duplicates: 0,
        }
    }

    pub fn from_records(
        category: EntityCategory,
        records: impl IntoIterator<Item = SnapshotRecord>,
    ) -> Self {
        let mut snapshot = Self::new(category);
        for record in records {
            snapshot.insert(record);
        }
        snapshot
    }

    pub fn insert(&mut self, record: SnapshotRecord) {
        match self.index.get(&record.id) {
            Some(&slot) => {
                self.duplicates += 1;
                self.records[slot] = record;
            }
            None => {
                self.index.insert(record.id.clone(), self.records.len());
                self.records.push(record);
            }
        }
    }

    /// Normalise a `{"positions": [...]}` payload.
    pub fn from_json(category: EntityCategory, payload: &Value) -> Result<Self, SnapshotError> {
        let entries = payload
            .get("positions")
            .ok_or(SnapshotError::MissingPositions)?
            .as_array()
            .ok_or(SnapshotError::NotAnArray)?;

        let mut snapshot = Self::new(category);
        for entry in entries {
            match parse_record(entry) {
                Some(record) => snapshot.insert(record),
                None => snapshot.skipped += 1,
            }
        }
        Ok(snapshot)
    }

    pub fn records(&self) -> &[SnapshotRecord] {
        &self.records
    }

    pub fn get(&self, id: &str) -> Option<&SnapshotRecord> {
        self.index.get(id).map(|&slot| &self.records[slot])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

fn parse_record(entry: &Value) -> Option<SnapshotRecord> {
    let id = match entry.get("id")? {
        Value::String(text) => text.clone(),
        Value::Number(number) => number.to_string(),
        _ => return None,
    };
    let position = parse_vec3(entry)?;

    let heading = entry
        .get("direction")
        .and_then(Value::as_str)
        .and_then(Heading::parse);
    let state = match entry.get("state") {
        Some(Value::Bool(on)) => *on,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|v| v != 0.0),
        _ => false,
    };
    let lookahead = entry.get("futurePos").and_then(parse_vec3);

    Some(SnapshotRecord {
        id,
        position,
        heading,
        state,
        lookahead,
    })
}

fn parse_vec3(value: &Value) -> Option<Vec3> {
    let axis = |key: &str| {
        value
            .get(key)
            .and_then(Value::as_f64)
            .map(|v| v as f32)
            .filter(|v| v.is_finite())
    };
    Some(Vec3::new(axis("x")?, axis("y")?, axis("z")?))
}

/// Scalar counters reported by the simulation.
#[derive(Resource, Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SimulationMetrics {
    pub current_step: u64,
    pub total_spawned: u64,
    pub total_reached_destination: u64,
    pub current_active_cars: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_string_and_numeric_ids() {
        let payload = json!({"positions": [
            {"id": "c1", "x": 1.0, "y": 1.0, "z": 2.0, "direction": "Up"},
            {"id": 7, "x": 3, "y": 1, "z": 4},
        ]});
        let snapshot = Snapshot::from_json(EntityCategory::Car, &payload).expect("valid payload");
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot.get("c1").map(|r| r.heading), Some(Some(Heading::Up)));
        assert_eq!(
            snapshot.get("7").map(|r| r.position),
            Some(Vec3::new(3.0, 1.0, 4.0))
        );
    }

    #[test]
    fn skips_entries_without_usable_position() {
        let payload = json!({"positions": [
            {"id": "a", "x": 1.0, "y": 0.0},
            {"id": "b", "x": "one", "y": 0.0, "z": 0.0},
            {"x": 0.0, "y": 0.0, "z": 0.0},
            {"id": "c", "x": 0.0, "y": 0.0, "z": 0.0},
        ]});
        let snapshot =
            Snapshot::from_json(EntityCategory::Obstacle, &payload).expect("valid payload");
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot.skipped, 3);
        assert!(snapshot.contains("c"));
    }

    #[test]
    fn later_duplicate_wins() {
        let payload = json!({"positions": [
            {"id": "l1", "x": 0.0, "y": 0.0, "z": 0.0, "state": false},
            {"id": "l2", "x": 5.0, "y": 0.0, "z": 0.0, "state": false},
            {"id": "l1", "x": 1.0, "y": 0.0, "z": 0.0, "state": true},
        ]});
        let snapshot =
            Snapshot::from_json(EntityCategory::TrafficLight, &payload).expect("valid payload");
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot.duplicates, 1);
        let light = snapshot.get("l1").expect("l1 present");
        assert!(light.state);
        assert_eq!(light.position.x, 1.0);
        assert_eq!(snapshot.records()[0].id, "l1");
    }

    #[test]
    fn missing_light_state_is_off() {
        let payload = json!({"positions": [{"id": "l", "x": 0, "y": 0, "z": 0}]});
        let snapshot =
            Snapshot::from_json(EntityCategory::TrafficLight, &payload).expect("valid payload");
        assert!(!snapshot.records()[0].state);
    }

    #[test]
    fn rejects_malformed_envelope() {
        assert!(matches!(
            Snapshot::from_json(EntityCategory::Car, &json!({"agents": []})),
            Err(SnapshotError::MissingPositions)
        ));
        assert!(matches!(
            Snapshot::from_json(EntityCategory::Car, &json!({"positions": 3})),
            Err(SnapshotError::NotAnArray)
        ));
    }

    #[test]
    fn reads_lookahead_hint() {
        let payload = json!({"positions": [
            {"id": "c", "x": 0, "y": 1, "z": 0, "futurePos": {"x": 1, "y": 1, "z": 0}},
        ]});
        let snapshot = Snapshot::from_json(EntityCategory::Car, &payload).expect("valid payload");
        assert_eq!(
            snapshot.records()[0].lookahead,
            Some(Vec3::new(1.0, 1.0, 0.0))
        );
    }

    #[test]
    fn unknown_heading_is_ignored() {
        assert_eq!(Heading::parse("north"), None);
        assert_eq!(Heading::parse(" right "), Some(Heading::Right));
    }
}
