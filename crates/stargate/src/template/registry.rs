//! `TemplateRegistry` resource: the loaded template set and its trigger index.
//!
//! The registry never mutates in place. Loading and reloading build a whole
//! new [`TemplateSet`] first and then swap the shared pointer, so anything
//! holding a [`TemplateRegistry::snapshot`] keeps a consistent view.

use std::collections::HashMap;
use std::sync::Arc;

use bevy::prelude::*;

use crate::material::Material;

use super::definition::{GateDefinition, TemplateError};
use super::gate_template::GateTemplate;

/// One generation of loaded templates.
#[derive(Debug, Default)]
pub struct TemplateSet {
    templates: Vec<Arc<GateTemplate>>,
    by_trigger: HashMap<Material, Vec<Arc<GateTemplate>>>,
}

impl TemplateSet {
    pub fn templates(&self) -> &[Arc<GateTemplate>] {
        &self.templates
    }

    pub fn candidates_for(&self, material: Material) -> &[Arc<GateTemplate>] {
        self.by_trigger
            .get(&material)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn get(&self, name: &str) -> Option<&Arc<GateTemplate>> {
        self.templates.iter().find(|t| t.name() == name)
    }
}

/// Outcome of a (re)load. Rejected definitions never abort the load.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadReport {
    pub loaded: Vec<String>,
    pub rejected: Vec<(String, TemplateError)>,
}

impl LoadReport {
    pub fn is_clean(&self) -> bool {
        self.rejected.is_empty()
    }
}

#[derive(Resource, Debug, Clone, Default)]
pub struct TemplateRegistry {
    current: Arc<TemplateSet>,
}

fn build_set(definitions: &[GateDefinition]) -> (TemplateSet, LoadReport) {
    let mut set = TemplateSet::default();
    let mut report = LoadReport::default();

    for def in definitions {
        let parsed = if set.get(&def.name).is_some() {
            Err(TemplateError::DuplicateName(def.name.clone()))
        } else {
            GateTemplate::from_definition(def)
        };
        match parsed {
            Ok(template) => {
                let template = Arc::new(template);
                // Each trigger list keeps declaration order: first match wins.
                for &material in template.trigger_materials() {
                    set.by_trigger
                        .entry(material)
                        .or_default()
                        .push(Arc::clone(&template));
                }
                report.loaded.push(def.name.clone());
                set.templates.push(template);
            }
            Err(e) => {
                warn!("Gate template '{}' skipped: {}", def.name, e);
                report.rejected.push((def.name.clone(), e));
            }
        }
    }

    (set, report)
}

impl TemplateRegistry {
    pub fn from_definitions(definitions: &[GateDefinition]) -> (Self, LoadReport) {
        let mut registry = Self::default();
        let report = registry.reload(definitions);
        (registry, report)
    }

    /// Replace every loaded template with a freshly validated set.
    pub fn reload(&mut self, definitions: &[GateDefinition]) -> LoadReport {
        let (set, report) = build_set(definitions);
        self.current = Arc::new(set);
        info!(
            "Gate templates loaded: {} accepted, {} rejected",
            report.loaded.len(),
            report.rejected.len()
        );
        report
    }

    /// The current generation, unaffected by later reloads.
    pub fn snapshot(&self) -> Arc<TemplateSet> {
        Arc::clone(&self.current)
    }

    pub fn candidates_for(&self, material: Material) -> &[Arc<GateTemplate>] {
        self.current.candidates_for(material)
    }

    pub fn get(&self, name: &str) -> Option<&Arc<GateTemplate>> {
        self.current.get(name)
    }

    pub fn templates(&self) -> &[Arc<GateTemplate>] {
        self.current.templates()
    }

    pub fn len(&self) -> usize {
        self.current.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.current.templates.is_empty()
    }
}
