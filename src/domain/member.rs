//! Member Entity
//!
//! A tracked family member and the tracker definitions they own.

use serde::{Deserialize, Serialize};

use super::entity::{position_of, Entity};
use super::tracker::Tracker;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    /// Unique key across all members; records are filed under it
    pub name: String,
    #[serde(default)]
    pub trackers: Vec<Tracker>,
    #[serde(default)]
    pub enable_notes: bool,
}

impl Member {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            trackers: Vec::new(),
            enable_notes: false,
        }
    }

    pub fn tracker(&self, name: &str) -> Option<&Tracker> {
        position_of(&self.trackers, name).map(|i| &self.trackers[i])
    }

    /// Trackers shown in the diary view
    pub fn active_trackers(&self) -> impl Iterator<Item = &Tracker> {
        self.trackers.iter().filter(|t| t.is_active)
    }
}

impl Entity for Member {
    fn key(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TrackerTemplate;
    use serde_json::json;

    #[test]
    fn test_member_wire_shape() {
        let member: Member = serde_json::from_value(json!({
            "name": "Anna",
            "trackers": [{ "name": "Weight", "type": "unlimited-number", "value": 60 }],
            "enableNotes": true
        }))
        .unwrap();
        assert!(member.enable_notes);
        assert_eq!(member.tracker("Weight").unwrap().template, TrackerTemplate::UnlimitedNumber(60.0));
    }

    #[test]
    fn test_active_trackers() {
        let mut member = Member::new("Anna");
        member.trackers.push(Tracker::new("Weight", TrackerTemplate::UnlimitedNumber(0.0)));
        let mut hidden = Tracker::new("Water", TrackerTemplate::LimitedNumber(8));
        hidden.is_active = false;
        member.trackers.push(hidden);
        let names: Vec<_> = member.active_trackers().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["Weight"]);
    }
}
