use bevy::prelude::*;

use crate::material::Material;

/// Lowest loaded block layer in the reference world.
pub const WORLD_MIN_Y: i32 = -64;
/// Highest loaded block layer in the reference world.
pub const WORLD_MAX_Y: i32 = 319;

pub const DEFAULT_BUTTON: Material = Material::StoneButton;
/// Buttons pop off underwater; a wall fan survives there and is still clickable.
pub const DEFAULT_WATER_BUTTON: Material = Material::DeadTubeCoralWallFan;

/// Runtime knobs for gate behavior.
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct GateConfig {
    pub default_button: Material,
    pub water_button: Material,
    /// Place the button as soon as a gate is created.
    pub draw_button_on_create: bool,
    /// Tear the gate down when one of its frame or control blocks changes.
    pub destroy_on_frame_break: bool,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            default_button: DEFAULT_BUTTON,
            water_button: DEFAULT_WATER_BUTTON,
            draw_button_on_create: true,
            destroy_on_frame_break: true,
        }
    }
}

impl GateConfig {
    /// Button material suited to a gate whose iris rests on `closed`.
    pub fn button_for(&self, closed: Material) -> Material {
        match closed {
            Material::Water => self.water_button,
            m if m.is_air() => self.default_button,
            other => {
                debug!(
                    "{:?} has no dedicated button, using {:?}",
                    other, self.default_button
                );
                self.default_button
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_button_for_closed_material() {
        let config = GateConfig::default();
        assert_eq!(config.button_for(Material::Air), Material::StoneButton);
        assert_eq!(config.button_for(Material::Water), Material::DeadTubeCoralWallFan);
        assert_eq!(config.button_for(Material::Lava), Material::StoneButton);
    }
}
