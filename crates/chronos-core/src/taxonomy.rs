//! Configurable taxonomy of teaching modes and actions.
//!
//! Modes and actions are closed enumerations, but closed at configuration
//! time rather than compile time: observers in different settings track
//! different behavior sets. A [`Taxonomy`] is validated once on construction
//! and the engine only ever sees the typed ids it hands out, so a session can
//! never reference a variant outside the configured domain.

use serde::{Deserialize, Serialize};

use crate::error::TaxonomyError;

/// A teaching mode definition: stable machine key plus display label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModeDef {
    pub key: String,
    pub label: String,
}

/// A teaching action definition: stable machine key plus display label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionDef {
    pub key: String,
    pub label: String,
}

/// Index of a mode within its [`Taxonomy`]. Only obtainable via lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModeId(pub(crate) usize);

/// Index of an action within its [`Taxonomy`]. Only obtainable via lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActionId(pub(crate) usize);

impl ModeId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl ActionId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// The closed set of modes and actions an observation session runs against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Taxonomy {
    modes: Vec<ModeDef>,
    actions: Vec<ActionDef>,
}

impl Taxonomy {
    /// Build a validated taxonomy. Both axes must be non-empty and keys
    /// unique within their axis.
    pub fn new(modes: Vec<ModeDef>, actions: Vec<ActionDef>) -> Result<Self, TaxonomyError> {
        if modes.is_empty() {
            return Err(TaxonomyError::EmptyModes);
        }
        if actions.is_empty() {
            return Err(TaxonomyError::EmptyActions);
        }
        check_unique(modes.iter().map(|m| m.key.as_str()))?;
        check_unique(actions.iter().map(|a| a.key.as_str()))?;
        Ok(Self { modes, actions })
    }

    /// The default classroom set: four modes, five actions.
    pub fn classroom_default() -> Self {
        let def = |key: &str, label: &str| -> (String, String) { (key.into(), label.into()) };
        let modes = [
            def("lecture", "講述式"),
            def("discussion", "小組討論"),
            def("practice", "實作練習"),
            def("digital", "數位互動"),
        ]
        .into_iter()
        .map(|(key, label)| ModeDef { key, label })
        .collect();
        let actions = [
            def("encouragement", "鼓勵"),
            def("correction", "糾正"),
            def("open_q", "開放式提問"),
            def("closed_q", "封閉式提問"),
            def("patrol", "行間巡視"),
        ]
        .into_iter()
        .map(|(key, label)| ActionDef { key, label })
        .collect();
        Self::new(modes, actions).expect("default taxonomy is valid")
    }

    pub fn mode_count(&self) -> usize {
        self.modes.len()
    }

    pub fn action_count(&self) -> usize {
        self.actions.len()
    }

    /// Look up a mode by key.
    pub fn mode_id(&self, key: &str) -> Option<ModeId> {
        self.modes.iter().position(|m| m.key == key).map(ModeId)
    }

    /// Look up an action by key.
    pub fn action_id(&self, key: &str) -> Option<ActionId> {
        self.actions.iter().position(|a| a.key == key).map(ActionId)
    }

    pub fn mode(&self, id: ModeId) -> &ModeDef {
        &self.modes[id.0]
    }

    pub fn action(&self, id: ActionId) -> &ActionDef {
        &self.actions[id.0]
    }

    /// Modes in configuration order, paired with their ids.
    pub fn modes(&self) -> impl Iterator<Item = (ModeId, &ModeDef)> {
        self.modes.iter().enumerate().map(|(i, m)| (ModeId(i), m))
    }

    /// Actions in configuration order, paired with their ids.
    pub fn actions(&self) -> impl Iterator<Item = (ActionId, &ActionDef)> {
        self.actions.iter().enumerate().map(|(i, a)| (ActionId(i), a))
    }

    /// Whether a mode id belongs to this taxonomy.
    pub fn contains_mode(&self, id: ModeId) -> bool {
        id.0 < self.modes.len()
    }

    /// Whether an action id belongs to this taxonomy.
    pub fn contains_action(&self, id: ActionId) -> bool {
        id.0 < self.actions.len()
    }
}

impl Default for Taxonomy {
    fn default() -> Self {
        Self::classroom_default()
    }
}

fn check_unique<'a>(keys: impl Iterator<Item = &'a str>) -> Result<(), TaxonomyError> {
    let mut seen: Vec<&str> = Vec::new();
    for key in keys {
        if seen.contains(&key) {
            return Err(TaxonomyError::DuplicateKey(key.to_string()));
        }
        seen.push(key);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_has_4_modes_5_actions() {
        let t = Taxonomy::classroom_default();
        assert_eq!(t.mode_count(), 4);
        assert_eq!(t.action_count(), 5);
    }

    #[test]
    fn lookup_by_key() {
        let t = Taxonomy::classroom_default();
        let lecture = t.mode_id("lecture").unwrap();
        assert_eq!(t.mode(lecture).label, "講述式");
        assert!(t.mode_id("recess").is_none());

        let patrol = t.action_id("patrol").unwrap();
        assert_eq!(t.action(patrol).label, "行間巡視");
    }

    #[test]
    fn rejects_empty_axes() {
        let err = Taxonomy::new(vec![], vec![]).unwrap_err();
        assert!(matches!(err, TaxonomyError::EmptyModes));

        let modes = vec![ModeDef {
            key: "lecture".into(),
            label: "講述式".into(),
        }];
        let err = Taxonomy::new(modes, vec![]).unwrap_err();
        assert!(matches!(err, TaxonomyError::EmptyActions));
    }

    #[test]
    fn rejects_duplicate_keys() {
        let modes = vec![
            ModeDef {
                key: "lecture".into(),
                label: "講述式".into(),
            },
            ModeDef {
                key: "lecture".into(),
                label: "再講一次".into(),
            },
        ];
        let actions = vec![ActionDef {
            key: "patrol".into(),
            label: "行間巡視".into(),
        }];
        let err = Taxonomy::new(modes, actions).unwrap_err();
        assert!(matches!(err, TaxonomyError::DuplicateKey(k) if k == "lecture"));
    }

    #[test]
    fn ids_are_stable_indexes() {
        let t = Taxonomy::classroom_default();
        let ids: Vec<_> = t.modes().map(|(id, _)| id.index()).collect();
        assert_eq!(ids, vec![0, 1, 2, 3]);
    }
}
