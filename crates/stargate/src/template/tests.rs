//! Unit tests for template definitions and the registry.

use std::collections::BTreeMap;

use super::*;
use crate::material::Material;
use crate::vector::RelativeVector;

fn nether_definition(name: &str) -> GateDefinition {
    GateDefinition {
        name: name.to_string(),
        layout: vec![
            " XX ".to_string(),
            "X..X".to_string(),
            "-..-".to_string(),
            "X*.X".to_string(),
            " XX ".to_string(),
        ],
        symbols: BTreeMap::from([
            ('X', vec![Material::Obsidian]),
            ('-', vec![Material::Obsidian]),
        ]),
        open: Material::NetherPortal,
        closed: Material::Air,
        control_roles: None,
    }
}

fn sandstone_definition(name: &str) -> GateDefinition {
    GateDefinition {
        name: name.to_string(),
        layout: vec![
            "SSSS".to_string(),
            "-.*-".to_string(),
            "SSSS".to_string(),
        ],
        symbols: BTreeMap::from([
            ('S', vec![Material::Sandstone]),
            ('-', vec![Material::Sandstone, Material::Glowstone]),
        ]),
        open: Material::Water,
        closed: Material::Air,
        control_roles: None,
    }
}

#[test]
fn test_layout_exit() {
    let template = GateTemplate::from_definition(&nether_definition("nether")).unwrap();
    assert_eq!(template.exit(), RelativeVector::new(1, 3, 0));
}

#[test]
fn test_layout_frame() {
    let template = GateTemplate::from_definition(&nether_definition("nether")).unwrap();
    let expected = [
        RelativeVector::new(1, 0, 0),
        RelativeVector::new(2, 0, 0),
        RelativeVector::new(0, 1, 0),
        RelativeVector::new(3, 1, 0),
        RelativeVector::new(0, 3, 0),
        RelativeVector::new(3, 3, 0),
        RelativeVector::new(1, 4, 0),
        RelativeVector::new(2, 4, 0),
    ];
    let frame = template.positions(StructureRole::Frame);
    assert_eq!(frame.len(), expected.len());
    for v in expected {
        assert!(frame.contains(&v), "missing frame position {v}");
    }
}

#[test]
fn test_layout_controls_in_declaration_order() {
    let template = GateTemplate::from_definition(&nether_definition("nether")).unwrap();
    assert_eq!(
        template.control_positions(),
        &[RelativeVector::new(0, 2, 0), RelativeVector::new(3, 2, 0)]
    );
    assert!(template.controls().all(|(_, role)| role == ControlRole::Any));
}

#[test]
fn test_layout_entrances_are_iris() {
    let template = GateTemplate::from_definition(&nether_definition("nether")).unwrap();
    let entrances = template.positions(StructureRole::Entrance);
    assert_eq!(entrances.len(), 6);
    assert_eq!(entrances, template.positions(StructureRole::Iris));
    assert!(entrances.contains(&RelativeVector::new(2, 3, 0)));
}

#[test]
fn test_trigger_materials_come_from_controls() {
    let template = GateTemplate::from_definition(&sandstone_definition("sand")).unwrap();
    let triggers = template.trigger_materials();
    assert_eq!(triggers.len(), 2);
    assert!(triggers.contains(&Material::Glowstone));
    assert!(!triggers.contains(&Material::Water));
}

#[test]
fn test_accepts_by_role() {
    let template = GateTemplate::from_definition(&nether_definition("nether")).unwrap();
    let frame = RelativeVector::new(1, 0, 0);
    assert!(template.accepts(StructureRole::Frame, frame, Material::Obsidian));
    assert!(!template.accepts(StructureRole::Frame, frame, Material::Stone));
    assert!(!template.accepts(StructureRole::Frame, frame, Material::Air));

    let entrance = RelativeVector::new(1, 1, 0);
    assert!(template.accepts(StructureRole::Entrance, entrance, Material::Air));
    assert!(template.accepts(StructureRole::Entrance, entrance, Material::NetherPortal));
    assert!(!template.accepts(StructureRole::Entrance, entrance, Material::Obsidian));
    assert!(template.accepts(StructureRole::Iris, entrance, Material::Obsidian));
}

#[test]
fn test_role_of() {
    let template = GateTemplate::from_definition(&nether_definition("nether")).unwrap();
    assert_eq!(
        template.role_of(RelativeVector::new(0, 2, 0)),
        Some(StructureRole::Control)
    );
    assert_eq!(
        template.role_of(RelativeVector::new(1, 2, 0)),
        Some(StructureRole::Entrance)
    );
    assert_eq!(template.role_of(RelativeVector::new(0, 0, 0)), None);
}

#[test]
fn test_unmapped_symbol_rejected() {
    let mut def = nether_definition("nether");
    def.layout[0] = " XY ".to_string();
    assert_eq!(
        GateTemplate::from_definition(&def),
        Err(TemplateError::UnmappedSymbol {
            symbol: 'Y',
            row: 0,
            column: 2
        })
    );
}

#[test]
fn test_non_solid_frame_rejected() {
    let mut def = nether_definition("ghost");
    def.symbols.insert('X', vec![Material::Air]);
    assert_eq!(
        GateTemplate::from_definition(&def),
        Err(TemplateError::NonSolidMaterial {
            symbol: 'X',
            material: Material::Air
        })
    );

    // One passable entry is enough to reject the whole symbol.
    let mut def = nether_definition("wet");
    def.symbols.insert('-', vec![Material::Obsidian, Material::Water]);
    assert_eq!(
        GateTemplate::from_definition(&def),
        Err(TemplateError::NonSolidMaterial {
            symbol: '-',
            material: Material::Water
        })
    );
}

#[test]
fn test_missing_exit_rejected() {
    let mut def = nether_definition("nether");
    def.layout[3] = "X..X".to_string();
    assert_eq!(GateTemplate::from_definition(&def), Err(TemplateError::NoExit));

    def.layout[1] = "X**X".to_string();
    assert_eq!(
        GateTemplate::from_definition(&def),
        Err(TemplateError::MultipleExits { count: 2 })
    );
}

#[test]
fn test_control_role_validation() {
    let mut def = nether_definition("nether");
    def.control_roles = Some(vec![ControlRole::Sign]);
    assert_eq!(
        GateTemplate::from_definition(&def),
        Err(TemplateError::ControlRoleCount {
            expected: 2,
            found: 1
        })
    );

    def.control_roles = Some(vec![ControlRole::Button, ControlRole::Button]);
    assert_eq!(
        GateTemplate::from_definition(&def),
        Err(TemplateError::NoSignPosition)
    );

    def.control_roles = Some(vec![ControlRole::Button, ControlRole::Sign]);
    let template = GateTemplate::from_definition(&def).unwrap();
    let roles: Vec<ControlRole> = template.controls().map(|(_, r)| r).collect();
    assert_eq!(roles, vec![ControlRole::Button, ControlRole::Sign]);
}

#[test]
fn test_empty_layout_rejected() {
    let mut def = nether_definition("nether");
    def.layout = vec!["    ".to_string()];
    assert_eq!(GateTemplate::from_definition(&def), Err(TemplateError::EmptyLayout));
}

#[test]
fn test_definition_from_json() {
    let json = r#"{
        "name": "nether",
        "layout": [" XX ", "X..X", "-..-", "X*.X", " XX "],
        "symbols": { "X": ["OBSIDIAN"], "-": ["OBSIDIAN"] },
        "open": "NETHER_PORTAL",
        "closed": "AIR"
    }"#;
    let def = GateDefinition::from_json(json).unwrap();
    assert_eq!(def, nether_definition("nether"));
    assert_eq!(GateDefinition::from_json(&def.to_json().unwrap()).unwrap(), def);

    assert!(matches!(
        GateDefinition::from_json("{\"name\": 3}"),
        Err(TemplateError::Json(_))
    ));
}

#[test]
fn test_registry_skips_invalid_templates() {
    let mut broken = nether_definition("broken");
    broken.layout.clear();
    let (registry, report) = TemplateRegistry::from_definitions(&[
        nether_definition("first"),
        broken,
        sandstone_definition("second"),
    ]);

    assert_eq!(registry.len(), 2);
    assert_eq!(report.loaded, vec!["first".to_string(), "second".to_string()]);
    assert_eq!(report.rejected.len(), 1);
    assert_eq!(report.rejected[0].0, "broken");
    assert!(!report.is_clean());
}

#[test]
fn test_registry_rejects_duplicate_names() {
    let (registry, report) = TemplateRegistry::from_definitions(&[
        nether_definition("gate"),
        sandstone_definition("gate"),
    ]);
    assert_eq!(registry.len(), 1);
    assert_eq!(
        report.rejected,
        vec![(
            "gate".to_string(),
            TemplateError::DuplicateName("gate".to_string())
        )]
    );
}

#[test]
fn test_candidates_keep_declaration_order() {
    let (registry, _) = TemplateRegistry::from_definitions(&[
        sandstone_definition("sand"),
        nether_definition("nether"),
        nether_definition("nether-2"),
    ]);

    let names: Vec<&str> = registry
        .candidates_for(Material::Obsidian)
        .iter()
        .map(|t| t.name())
        .collect();
    assert_eq!(names, vec!["nether", "nether-2"]);
    assert_eq!(registry.candidates_for(Material::Glowstone).len(), 1);
    assert!(registry.candidates_for(Material::Stone).is_empty());
}

#[test]
fn test_reload_swaps_whole_set() {
    let (mut registry, _) = TemplateRegistry::from_definitions(&[nether_definition("nether")]);
    let before = registry.snapshot();

    registry.reload(&[sandstone_definition("sand")]);

    // The old generation is untouched by the reload.
    assert_eq!(before.templates().len(), 1);
    assert!(before.get("nether").is_some());
    assert!(registry.get("nether").is_none());
    assert!(registry.get("sand").is_some());
    assert!(registry.candidates_for(Material::Obsidian).is_empty());
}
