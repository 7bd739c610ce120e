use std::sync::Arc;

use bevy::prelude::*;

use crate::config::GateConfig;
use crate::facing::Facing;
use crate::material::MaterialPolicies;
use crate::mutation::BlockMutationQueue;
use crate::spatial_index::SpatialIndex;
use crate::template::{GateTemplate, StructureRole};
use crate::transform::CoordinateTransform;
use crate::vector::RelativeVector;

/// A template bound to a world origin and orientation.
///
/// Origin, transform and template are fixed for the gate's lifetime; only the
/// open/closed state changes. Every block query goes through
/// [`GateInstance::location`].
#[derive(Component, Debug, Clone)]
pub struct GateInstance {
    template: Arc<GateTemplate>,
    transform: CoordinateTransform,
    origin: IVec3,
    sign_pos: RelativeVector,
    button_pos: Option<RelativeVector>,
    is_open: bool,
    destroyed: bool,
}

impl GateInstance {
    pub fn new(
        template: Arc<GateTemplate>,
        transform: CoordinateTransform,
        origin: IVec3,
        sign_pos: RelativeVector,
        button_pos: Option<RelativeVector>,
    ) -> Self {
        Self {
            template,
            transform,
            origin,
            sign_pos,
            button_pos,
            is_open: false,
            destroyed: false,
        }
    }

    pub fn template(&self) -> &Arc<GateTemplate> {
        &self.template
    }

    pub fn transform(&self) -> CoordinateTransform {
        self.transform
    }

    pub fn origin(&self) -> IVec3 {
        self.origin
    }

    pub fn facing(&self) -> Facing {
        self.transform.facing()
    }

    pub fn sign_pos(&self) -> RelativeVector {
        self.sign_pos
    }

    pub fn button_pos(&self) -> Option<RelativeVector> {
        self.button_pos
    }

    // -----------------------------------------------------------------------
    // Geometry
    // -----------------------------------------------------------------------

    /// World block for a template-space vector.
    #[inline]
    pub fn location(&self, v: RelativeVector) -> IVec3 {
        self.origin + self.transform.inverse_operation(v.to_canonical())
    }

    /// Template-space vector for a world block.
    #[inline]
    pub fn relative_vector(&self, pos: IVec3) -> RelativeVector {
        RelativeVector::from_canonical(self.transform.operation(pos - self.origin))
    }

    pub fn exit(&self) -> IVec3 {
        self.location(self.template.exit())
    }

    pub fn locations(&self, role: StructureRole) -> Vec<IVec3> {
        self.template
            .positions(role)
            .iter()
            .map(|&v| self.location(v))
            .collect()
    }

    /// The control block the sign is attached to.
    pub fn control_location(&self) -> IVec3 {
        self.location(self.sign_pos)
    }

    /// Where the sign itself sits, one block in front of its control block.
    pub fn sign_location(&self) -> IVec3 {
        self.location(self.sign_pos + RelativeVector::OUTWARD)
    }

    pub fn button_location(&self) -> Option<IVec3> {
        self.button_pos
            .map(|v| self.location(v + RelativeVector::OUTWARD))
    }

    /// The role `pos` plays in this gate, if it belongs to it.
    pub fn classify(&self, pos: IVec3) -> Option<StructureRole> {
        self.template.role_of(self.relative_vector(pos))
    }

    // -----------------------------------------------------------------------
    // Open / close
    // -----------------------------------------------------------------------

    pub fn is_open(&self) -> bool {
        self.is_open
    }

    pub fn open(&mut self, queue: &mut BlockMutationQueue, policies: &MaterialPolicies) {
        self.set_iris(true, queue, policies);
    }

    pub fn close(&mut self, queue: &mut BlockMutationQueue, policies: &MaterialPolicies) {
        self.set_iris(false, queue, policies);
    }

    fn set_iris(&mut self, open: bool, queue: &mut BlockMutationQueue, policies: &MaterialPolicies) {
        let material = self.template.iris_material(open);
        let policy = policies.get(material);
        let orientation = policy.orientation_for(&self.transform);
        for pos in self.locations(StructureRole::Iris) {
            queue.enqueue(pos, material, orientation);
            if policy.neutralize {
                queue.enqueue_neutralize(pos);
            }
        }
        self.is_open = open;
    }

    /// Queue the button block in front of the button control position.
    pub fn draw_button(
        &self,
        queue: &mut BlockMutationQueue,
        config: &GateConfig,
        policies: &MaterialPolicies,
    ) {
        let Some(pos) = self.button_location() else {
            return;
        };
        let button = config.button_for(self.template.closed_material());
        let orientation = policies.get(button).orientation_for(&self.transform);
        queue.enqueue(pos, button, orientation);
    }

    // -----------------------------------------------------------------------
    // Spatial index lifecycle
    // -----------------------------------------------------------------------

    /// Claim every block of this gate for `entity`. The matcher has already
    /// ruled out conflicting claims.
    pub fn register(&self, entity: Entity, index: &mut SpatialIndex) {
        for role in StructureRole::ALL {
            for pos in self.locations(role) {
                index.register(role, pos, entity);
            }
        }
    }

    /// Release every claim `entity` still holds. Claims owned by another gate
    /// are left alone, and calling it again is a no-op.
    pub fn destroy(&mut self, entity: Entity, index: &mut SpatialIndex) {
        if self.destroyed {
            return;
        }
        for role in StructureRole::ALL {
            for pos in self.locations(role) {
                index.release(role, pos, entity);
            }
        }
        self.destroyed = true;
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }
}
