//! Serializable gate definitions and their validation into templates.
//!
//! A definition draws the gate face row by row, as seen from the control side:
//!
//! ```text
//!  XX
//! X..X
//! -..-
//! X*.X
//!  XX
//! ```
//!
//! * `-` is a control block; its accepted materials come from `symbols['-']`.
//! * `.` is an entrance block, which is also part of the iris.
//! * `*` is like `.` and additionally marks the exit. Exactly one is required.
//! * A space is ignored.
//! * Any other character is a frame block accepting `symbols[char]`.
//!
//! Column becomes `right`, row becomes `depth`, and every position lies in
//! the gate plane (`distance = 0`).

use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::material::Material;
use crate::vector::RelativeVector;

use super::gate_template::GateTemplate;
use super::types::{ControlRole, StructureRole};

pub const CONTROL_SYMBOL: char = '-';
pub const ENTRANCE_SYMBOL: char = '.';
pub const EXIT_SYMBOL: char = '*';
pub const EMPTY_SYMBOL: char = ' ';

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GateDefinition {
    pub name: String,
    pub layout: Vec<String>,
    pub symbols: BTreeMap<char, Vec<Material>>,
    /// Iris material while the gate is open.
    pub open: Material,
    /// Iris material while the gate is closed.
    pub closed: Material,
    /// One role per control block, in layout reading order. Omitted means
    /// every control block is [`ControlRole::Any`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub control_roles: Option<Vec<ControlRole>>,
}

/// Why a definition was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateError {
    /// The definition text was not valid JSON for a [`GateDefinition`].
    Json(String),
    EmptyName,
    EmptyLayout,
    UnmappedSymbol { symbol: char, row: usize, column: usize },
    /// Frame and control blocks must be rigid blocks that exist before the
    /// gate does.
    NonSolidMaterial { symbol: char, material: Material },
    NoControls,
    NoExit,
    MultipleExits { count: usize },
    ControlRoleCount { expected: usize, found: usize },
    /// No control block may carry the sign, so the gate can never be anchored.
    NoSignPosition,
    DuplicateName(String),
}

impl fmt::Display for TemplateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TemplateError::Json(msg) => write!(f, "invalid definition JSON: {msg}"),
            TemplateError::EmptyName => write!(f, "template name is empty"),
            TemplateError::EmptyLayout => write!(f, "layout has no blocks"),
            TemplateError::UnmappedSymbol {
                symbol,
                row,
                column,
            } => write!(
                f,
                "symbol '{symbol}' at row {row}, column {column} has no material mapping"
            ),
            TemplateError::NonSolidMaterial { symbol, material } => write!(
                f,
                "symbol '{symbol}' maps to {material:?}, which cannot carry a frame"
            ),
            TemplateError::NoControls => write!(f, "layout has no control blocks"),
            TemplateError::NoExit => write!(f, "layout has no exit block"),
            TemplateError::MultipleExits { count } => {
                write!(f, "layout has {count} exit blocks, expected exactly one")
            }
            TemplateError::ControlRoleCount { expected, found } => write!(
                f,
                "{found} control roles declared for {expected} control blocks"
            ),
            TemplateError::NoSignPosition => {
                write!(f, "no control block is allowed to hold the sign")
            }
            TemplateError::DuplicateName(name) => {
                write!(f, "a template named '{name}' is already loaded")
            }
        }
    }
}

impl std::error::Error for TemplateError {}

impl GateDefinition {
    pub fn from_json(json: &str) -> Result<Self, TemplateError> {
        serde_json::from_str(json).map_err(|e| TemplateError::Json(e.to_string()))
    }

    pub fn to_json(&self) -> Result<String, TemplateError> {
        serde_json::to_string_pretty(self).map_err(|e| TemplateError::Json(e.to_string()))
    }
}

fn accepted_materials(
    symbols: &BTreeMap<char, Vec<Material>>,
    symbol: char,
    row: usize,
    column: usize,
) -> Result<Vec<Material>, TemplateError> {
    match symbols.get(&symbol) {
        Some(materials) if !materials.is_empty() => {
            if let Some(&material) = materials.iter().find(|m| !m.is_solid()) {
                return Err(TemplateError::NonSolidMaterial { symbol, material });
            }
            Ok(materials.clone())
        }
        _ => Err(TemplateError::UnmappedSymbol {
            symbol,
            row,
            column,
        }),
    }
}

impl GateTemplate {
    /// Validate a definition into an immutable template.
    pub fn from_definition(def: &GateDefinition) -> Result<Self, TemplateError> {
        if def.name.trim().is_empty() {
            return Err(TemplateError::EmptyName);
        }

        let mut positions: [Vec<RelativeVector>; 4] = Default::default();
        let mut accepted: HashMap<RelativeVector, Vec<Material>> = HashMap::new();
        let mut exits = Vec::new();

        for (row, line) in def.layout.iter().enumerate() {
            for (column, symbol) in line.chars().enumerate() {
                let v = RelativeVector::new(column as i32, row as i32, 0);
                match symbol {
                    EMPTY_SYMBOL => {}
                    CONTROL_SYMBOL => {
                        let materials = accepted_materials(&def.symbols, symbol, row, column)?;
                        accepted.insert(v, materials);
                        positions[StructureRole::Control.slot()].push(v);
                    }
                    ENTRANCE_SYMBOL | EXIT_SYMBOL => {
                        positions[StructureRole::Entrance.slot()].push(v);
                        positions[StructureRole::Iris.slot()].push(v);
                        if symbol == EXIT_SYMBOL {
                            exits.push(v);
                        }
                    }
                    _ => {
                        let materials = accepted_materials(&def.symbols, symbol, row, column)?;
                        accepted.insert(v, materials);
                        positions[StructureRole::Frame.slot()].push(v);
                    }
                }
            }
        }

        if positions.iter().all(Vec::is_empty) {
            return Err(TemplateError::EmptyLayout);
        }
        let control_count = positions[StructureRole::Control.slot()].len();
        if control_count == 0 {
            return Err(TemplateError::NoControls);
        }
        let exit = match exits.as_slice() {
            [] => return Err(TemplateError::NoExit),
            [exit] => *exit,
            _ => return Err(TemplateError::MultipleExits { count: exits.len() }),
        };

        let control_roles = match &def.control_roles {
            None => vec![ControlRole::Any; control_count],
            Some(roles) if roles.len() == control_count => roles.clone(),
            Some(roles) => {
                return Err(TemplateError::ControlRoleCount {
                    expected: control_count,
                    found: roles.len(),
                })
            }
        };
        if !control_roles.iter().any(|r| r.can_hold_sign()) {
            return Err(TemplateError::NoSignPosition);
        }

        let triggers: HashSet<Material> = positions[StructureRole::Control.slot()]
            .iter()
            .filter_map(|v| accepted.get(v))
            .flatten()
            .copied()
            .collect();

        Ok(GateTemplate {
            name: def.name.clone(),
            positions,
            control_roles,
            accepted,
            exit,
            open: def.open,
            closed: def.closed,
            triggers,
        })
    }
}
