use bevy::prelude::*;

use super::debug::DebugRenderer;

pub trait SteeringTarget {
    fn position(&self) -> Vec2;
    fn velocity(&self) -> Vec2 {
        Vec2::ZERO
    }
}

impl SteeringTarget for Vec2 {
    fn position(&self) -> Vec2 {
        *self
    }
}

/// Snapshot of a target's kinematic state, supplied by the caller each frame.
#[derive(Debug, Default, Clone, Copy, PartialEq, Reflect)]
pub struct TargetData {
    pub position: Vec2,
    pub linear_velocity: Vec2,
}

impl TargetData {
    pub fn new(position: Vec2, linear_velocity: Vec2) -> Self {
        Self {
            position,
            linear_velocity,
        }
    }

    pub fn from_target(target: &impl SteeringTarget) -> Self {
        Self {
            position: target.position(),
            linear_velocity: target.velocity(),
        }
    }
}

impl From<Vec2> for TargetData {
    fn from(position: Vec2) -> Self {
        Self {
            position,
            linear_velocity: Vec2::ZERO,
        }
    }
}

impl SteeringTarget for TargetData {
    fn position(&self) -> Vec2 {
        self.position
    }

    fn velocity(&self) -> Vec2 {
        self.linear_velocity
    }
}

/// Result of a single steering calculation. The default value means "no steering".
#[derive(Component, Debug, Default, Clone, Copy, PartialEq, Reflect)]
pub struct SteeringOutput {
    /// Desired linear velocity. Not normalized: clamping against the max speed is left to
    /// whoever integrates the motion.
    pub linear_velocity: Vec2,
    /// Desired angular velocity in degrees per second.
    pub angular_velocity: f32,
}

impl SteeringOutput {
    pub fn linear(linear_velocity: Vec2) -> Self {
        Self {
            linear_velocity,
            angular_velocity: 0.0,
        }
    }

    pub fn angular(angular_velocity: f32) -> Self {
        Self {
            linear_velocity: Vec2::ZERO,
            angular_velocity,
        }
    }
}

/// Everything a behavior is allowed to read from or change on the agent it steers.
pub trait SteeringAgent {
    fn position(&self) -> Vec2;
    /// Heading in degrees, counter-clockwise from +X.
    fn rotation(&self) -> f32;
    fn max_linear_speed(&self) -> f32;
    fn set_max_linear_speed(&mut self, speed: f32);

    fn is_debug_rendering_enabled(&self) -> bool {
        false
    }

    /// Sink for debug draw requests. Only consulted when debug rendering is enabled.
    fn debug_renderer(&mut self) -> Option<&mut dyn DebugRenderer> {
        None
    }
}

/// Common contract of every steering behavior.
pub trait SteeringBehavior {
    /// Replaces the stored target. Values are not validated.
    fn set_target(&mut self, target: TargetData);

    fn target(&self) -> TargetData;

    fn compute(&mut self, delta_time: f32, agent: &mut dyn SteeringAgent) -> SteeringOutput;
}

/// A ready-made agent with all the state behaviors need.
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Component, Default, PartialEq)]
pub struct SteeringHost {
    pub position: Vec2,
    /// Degrees.
    pub rotation: f32,
    /// Current velocity. Only read when this host is used as someone else's target.
    pub linear_velocity: Vec2,
    /// Defaults to `250.0`.
    pub max_linear_speed: f32,
    pub debug_rendering: bool,
}

impl Default for SteeringHost {
    fn default() -> Self {
        Self {
            position: Vec2::ZERO,
            rotation: 0.0,
            linear_velocity: Vec2::ZERO,
            max_linear_speed: 250.0,
            debug_rendering: false,
        }
    }
}

impl SteeringHost {
    pub fn new(position: Vec2, rotation: f32, max_linear_speed: f32) -> Self {
        Self {
            position,
            rotation,
            max_linear_speed,
            ..default()
        }
    }
}

impl SteeringAgent for SteeringHost {
    fn position(&self) -> Vec2 {
        self.position
    }

    fn rotation(&self) -> f32 {
        self.rotation
    }

    fn max_linear_speed(&self) -> f32 {
        self.max_linear_speed
    }

    fn set_max_linear_speed(&mut self, speed: f32) {
        self.max_linear_speed = speed;
    }

    fn is_debug_rendering_enabled(&self) -> bool {
        self.debug_rendering
    }
}

impl SteeringTarget for SteeringHost {
    fn position(&self) -> Vec2 {
        self.position
    }

    fn velocity(&self) -> Vec2 {
        self.linear_velocity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_output_is_no_steering() {
        let output = SteeringOutput::default();
        assert_eq!(output.linear_velocity, Vec2::ZERO);
        assert_eq!(output.angular_velocity, 0.0);
    }

    #[test]
    fn target_from_host_copies_velocity() {
        let mut host = SteeringHost::new(Vec2::new(1.0, 2.0), 0.0, 10.0);
        host.linear_velocity = Vec2::new(0.0, 5.0);

        let target = TargetData::from_target(&host);
        assert_eq!(target, TargetData::new(Vec2::new(1.0, 2.0), Vec2::new(0.0, 5.0)));
        assert_eq!(TargetData::from(Vec2::ONE).linear_velocity, Vec2::ZERO);
    }

    #[test]
    fn host_max_speed_is_settable() {
        let mut host = SteeringHost::default();
        assert_eq!(host.max_linear_speed(), 250.0);
        host.set_max_linear_speed(12.0);
        assert_eq!(host.max_linear_speed, 12.0);
    }
}
