//! Durable travel plan
//!
//! The plan is an ordered collection of saved venues, persisted as JSON in
//! full on every mutation. Insertion order is display and itinerary order.
//! The only dedup key is the venue name, compared case-insensitively.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Venue fields extracted from retrieved text, best-effort
///
/// Missing fields stay at their empty defaults so callers can see exactly
/// what extraction produced.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VenueInfo {
    pub name: String,
    pub location: String,
    pub venue_type: String,
    pub rating: String,
    pub budget: String,
}

/// Parse the model's `Key: value` extraction output
///
/// Same tolerance rules as classification parsing: recognized lines set
/// fields, everything else is ignored.
pub fn parse_venue_info(text: &str) -> VenueInfo {
    debug!(text_len = text.len(), "parse_venue_info: called");
    let mut info = VenueInfo::default();
    for line in text.lines() {
        let line = line.trim();
        if let Some(value) = line.strip_prefix("Name:") {
            info.name = value.trim().to_string();
        } else if let Some(value) = line.strip_prefix("Location:") {
            info.location = value.trim().to_string();
        } else if let Some(value) = line.strip_prefix("Type:") {
            info.venue_type = value.trim().to_string();
        } else if let Some(value) = line.strip_prefix("Rating:") {
            info.rating = value.trim().to_string();
        } else if let Some(value) = line.strip_prefix("Budget:") {
            info.budget = value.trim().to_string();
        }
    }
    info
}

/// One saved venue
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanEntry {
    pub name: String,
    pub location: String,
    #[serde(rename = "type")]
    pub venue_type: String,
    pub rating: String,
    pub budget: String,
    /// Set at creation, immutable afterwards
    pub added_at: DateTime<Utc>,
    /// The raw retrieved text snippet that produced this entry
    pub context: String,
}

impl PlanEntry {
    /// Build an entry from extracted info, stamped with the current time
    pub fn from_info(info: VenueInfo, context: &str) -> Self {
        Self {
            name: info.name,
            location: info.location,
            venue_type: info.venue_type,
            rating: info.rating,
            budget: info.budget,
            added_at: Utc::now(),
            context: context.to_string(),
        }
    }
}

/// Projection of a plan entry for summary and day-plan prompts
///
/// Rating and raw context are deliberately omitted.
#[derive(Debug, Clone, Serialize)]
pub struct VenueSummary {
    pub name: String,
    #[serde(rename = "type")]
    pub venue_type: String,
    pub location: String,
    pub budget: String,
}

/// Wire format: `{"venues": [...]}`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Plan {
    pub venues: Vec<PlanEntry>,
}

/// File-backed plan store
pub struct PlanStore {
    path: PathBuf,
    plan: Plan,
}

fn fallback(value: &str, default: &str) -> String {
    if value.trim().is_empty() {
        default.to_string()
    } else {
        value.to_string()
    }
}

impl PlanStore {
    /// Load the plan from disk
    ///
    /// A missing or corrupt file resets to an empty plan and immediately
    /// re-persists it.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        debug!(?path, "PlanStore::load: called");

        let plan = match fs::read_to_string(&path) {
            Ok(content) => match serde_json::from_str(&content) {
                Ok(plan) => plan,
                Err(e) => {
                    warn!(?path, error = %e, "Corrupt plan file, resetting to empty plan");
                    Plan::default()
                }
            },
            Err(_) => {
                debug!(?path, "No plan file, starting with empty plan");
                Plan::default()
            }
        };

        let mut store = Self { path, plan };
        store.save()?;
        Ok(store)
    }

    /// Saved venues in insertion order
    pub fn venues(&self) -> &[PlanEntry] {
        &self.plan.venues
    }

    pub fn len(&self) -> usize {
        self.plan.venues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plan.venues.is_empty()
    }

    /// Case-insensitive name membership check (the only dedup key)
    pub fn contains_name(&self, name: &str) -> bool {
        let needle = name.to_lowercase();
        self.plan.venues.iter().any(|v| v.name.to_lowercase() == needle)
    }

    /// Append an entry and rewrite the whole file
    pub fn push(&mut self, entry: PlanEntry) -> Result<()> {
        debug!(name = %entry.name, "push: called");
        self.plan.venues.push(entry);
        self.save()
    }

    /// Project every entry to the four prompt-facing fields, in plan order
    pub fn project(&self) -> Vec<VenueSummary> {
        self.plan
            .venues
            .iter()
            .map(|v| VenueSummary {
                name: fallback(&v.name, "Unknown Venue"),
                venue_type: fallback(&v.venue_type, "Unknown Type"),
                location: fallback(&v.location, "Location not specified"),
                budget: fallback(&v.budget, "Budget not specified"),
            })
            .collect()
    }

    fn save(&mut self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).context("Failed to create plan directory")?;
        }
        let content = serde_json::to_string_pretty(&self.plan)?;
        fs::write(&self.path, content).context("Failed to write plan file")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn entry(name: &str) -> PlanEntry {
        PlanEntry::from_info(
            VenueInfo {
                name: name.to_string(),
                ..Default::default()
            },
            "some context",
        )
    }

    #[test]
    fn test_parse_venue_info_full() {
        let text = "Name: Los Tacos No.1\n\
                    Location: Chelsea Market\n\
                    Type: Restaurant\n\
                    Rating: 4.7\n\
                    Budget: $";
        let info = parse_venue_info(text);
        assert_eq!(info.name, "Los Tacos No.1");
        assert_eq!(info.location, "Chelsea Market");
        assert_eq!(info.venue_type, "Restaurant");
        assert_eq!(info.rating, "4.7");
        assert_eq!(info.budget, "$");
    }

    #[test]
    fn test_parse_venue_info_partial() {
        let info = parse_venue_info("Name: The Met\nnonsense\nBudget:");
        assert_eq!(info.name, "The Met");
        assert_eq!(info.budget, "");
        assert_eq!(info.location, "");
    }

    #[test]
    fn test_load_missing_and_corrupt_file_resets_to_empty() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("plan.json");

        let store = PlanStore::load(&path).unwrap();
        assert!(store.is_empty());

        fs::write(&path, "[1,2,3").unwrap();
        let store = PlanStore::load(&path).unwrap();
        assert!(store.is_empty());
        // Reset was re-persisted
        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("\"venues\""));
    }

    #[test]
    fn test_push_persists_and_survives_reload() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("plan.json");

        let mut store = PlanStore::load(&path).unwrap();
        store.push(entry("Los Tacos No.1")).unwrap();
        assert_eq!(store.len(), 1);

        let reloaded = PlanStore::load(&path).unwrap();
        assert_eq!(reloaded.len(), 1);
        assert_eq!(reloaded.venues()[0].name, "Los Tacos No.1");
        assert_eq!(reloaded.venues()[0].context, "some context");
    }

    #[test]
    fn test_contains_name_is_case_insensitive() {
        let temp = TempDir::new().unwrap();
        let mut store = PlanStore::load(temp.path().join("plan.json")).unwrap();
        store.push(entry("Los Tacos No.1")).unwrap();

        assert!(store.contains_name("los tacos no.1"));
        assert!(store.contains_name("LOS TACOS NO.1"));
        assert!(!store.contains_name("Shake Shack"));
    }

    #[test]
    fn test_project_substitutes_defaults_and_omits_rating() {
        let temp = TempDir::new().unwrap();
        let mut store = PlanStore::load(temp.path().join("plan.json")).unwrap();
        store.push(entry("")).unwrap();

        let projected = store.project();
        assert_eq!(projected[0].name, "Unknown Venue");
        assert_eq!(projected[0].venue_type, "Unknown Type");
        assert_eq!(projected[0].location, "Location not specified");
        assert_eq!(projected[0].budget, "Budget not specified");

        let json = serde_json::to_string(&projected).unwrap();
        assert!(!json.contains("rating"));
        assert!(!json.contains("context"));
        assert!(json.contains("\"type\""));
    }

    #[test]
    fn test_wire_format_uses_type_key() {
        let entry = PlanEntry::from_info(
            VenueInfo {
                name: "The Met".to_string(),
                venue_type: "Museum".to_string(),
                ..Default::default()
            },
            "ctx",
        );
        let json = serde_json::to_string(&entry).unwrap();
        assert!(json.contains("\"type\":\"Museum\""));
        assert!(json.contains("\"added_at\""));
    }
}
