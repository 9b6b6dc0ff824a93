use super::{
    debug::renderer_of,
    steering::{SteeringAgent, SteeringBehavior, SteeringOutput, TargetData},
};
use bevy::{color::palettes::css, prelude::*};
use common::math::{direction_from_degrees, point_on_circle, rng_f32, truncate_vec2, wrap_angle};
use rand::{rngs::SmallRng, Rng, SeedableRng};

/// Below this distance `Face` has no meaningful heading and outputs no rotation.
pub const FACE_EPSILON: f32 = 0.01;

const DIRECTION_LINE_LENGTH: f32 = 250.0;
const TARGET_LINE_LENGTH: f32 = 300.0;
const PREDICTION_LINE_LENGTH: f32 = 400.0;
const PREDICTION_MARKER_RADIUS: f32 = 20.0;
const WANDER_MARKER_RADIUS: f32 = 15.0;

/// Unnormalized vector from the agent to `target`.
fn seek_towards(target: Vec2, agent: &dyn SteeringAgent) -> Vec2 {
    target - agent.position()
}

/// First-order guess of where the target will be once the agent covers the distance to it
/// at full speed. Agents that can't move predict the target's current position.
fn predict_position(target: &TargetData, agent: &dyn SteeringAgent) -> Vec2 {
    let distance = (target.position - agent.position()).length();
    let max_speed = agent.max_linear_speed();
    let time_to_reach = if max_speed > 0.0 {
        distance / max_speed
    } else {
        0.0
    };

    target.position + target.linear_velocity * time_to_reach
}

/// Seeks the specified target moving directly towards it.
#[derive(Debug, Default, Clone, Copy, PartialEq, Reflect)]
pub struct Seek {
    pub target: TargetData,
}

impl Seek {
    pub fn new(target: impl Into<TargetData>) -> Self {
        Self {
            target: target.into(),
        }
    }

    fn steer(target: &TargetData, agent: &mut dyn SteeringAgent) -> SteeringOutput {
        let velocity = seek_towards(target.position, agent);
        let position = agent.position();

        if let Some(renderer) = renderer_of(agent) {
            let end = position + velocity.normalize_or_zero() * DIRECTION_LINE_LENGTH;
            renderer.line(position, end, css::LIME.into(), 2.0);
        }

        SteeringOutput::linear(velocity)
    }
}

impl SteeringBehavior for Seek {
    fn set_target(&mut self, target: TargetData) {
        self.target = target;
    }

    fn target(&self) -> TargetData {
        self.target
    }

    fn compute(&mut self, _delta_time: f32, agent: &mut dyn SteeringAgent) -> SteeringOutput {
        Self::steer(&self.target, agent)
    }
}

/// Flees from the specified target moving away from it.
/// Works the same way as `Seek` but the result vector is inverted.
#[derive(Debug, Default, Clone, Copy, PartialEq, Reflect)]
pub struct Flee {
    pub target: TargetData,
}

impl Flee {
    pub fn new(target: impl Into<TargetData>) -> Self {
        Self {
            target: target.into(),
        }
    }
}

impl SteeringBehavior for Flee {
    fn set_target(&mut self, target: TargetData) {
        self.target = target;
    }

    fn target(&self) -> TargetData {
        self.target
    }

    fn compute(&mut self, _delta_time: f32, agent: &mut dyn SteeringAgent) -> SteeringOutput {
        let away = -seek_towards(self.target.position, agent);
        let position = agent.position();

        if let Some(renderer) = renderer_of(agent) {
            let end = position + away.normalize_or_zero() * DIRECTION_LINE_LENGTH;
            renderer.line(position, end, css::RED.into(), 2.0);
            renderer.line(position, self.target.position, css::YELLOW.into(), 1.0);
        }

        SteeringOutput::linear(away)
    }
}

/// Moves towards the target, lowering the agent's max speed inside `slow_radius` and
/// stopping it completely inside `target_radius`.
///
/// The first call captures the agent's max speed as a baseline. Since the behavior
/// changes the agent's max speed, call [`Arrive::release`] with the same agent before
/// dropping or replacing the behavior so the baseline gets restored.
///
/// `target_radius` is expected to be smaller than `slow_radius`; otherwise the speed
/// factor leaves the `[0, 1]` range.
/// Clones start without a captured baseline, so only the original is responsible
/// for restoring the agent.
#[derive(Debug, PartialEq, Reflect)]
pub struct Arrive {
    pub target: TargetData,
    /// Defaults to `500.0`.
    pub slow_radius: f32,
    /// Defaults to `50.0`.
    pub target_radius: f32,
    original_max_speed: f32,
}

impl Default for Arrive {
    fn default() -> Self {
        Self {
            target: TargetData::default(),
            slow_radius: 500.0,
            target_radius: 50.0,
            original_max_speed: 0.0,
        }
    }
}

impl Clone for Arrive {
    fn clone(&self) -> Self {
        Self {
            target: self.target,
            slow_radius: self.slow_radius,
            target_radius: self.target_radius,
            original_max_speed: 0.0,
        }
    }
}

impl Arrive {
    pub fn new(slow_radius: f32, target_radius: f32) -> Self {
        Self {
            target: TargetData::default(),
            slow_radius,
            target_radius,
            original_max_speed: 0.0,
        }
    }

    pub fn set_slow_radius(&mut self, radius: f32) {
        self.slow_radius = radius;
    }

    pub fn set_target_radius(&mut self, radius: f32) {
        self.target_radius = radius;
    }

    /// The captured max speed, if any.
    pub fn original_max_speed(&self) -> Option<f32> {
        (self.original_max_speed > 0.0).then_some(self.original_max_speed)
    }

    /// Restores the captured max speed on `agent` and forgets it, so the next
    /// `compute` captures a fresh baseline. Does nothing if nothing was captured.
    pub fn release(&mut self, agent: &mut dyn SteeringAgent) {
        if let Some(speed) = self.original_max_speed() {
            debug!("Arrive: restoring max linear speed {}", speed);
            agent.set_max_linear_speed(speed);
        }
        self.original_max_speed = 0.0;
    }
}

impl Drop for Arrive {
    fn drop(&mut self) {
        if let Some(speed) = self.original_max_speed() {
            warn!(
                "Arrive dropped without release, agent max linear speed may not be restored to {}",
                speed
            );
        }
    }
}

impl SteeringBehavior for Arrive {
    fn set_target(&mut self, target: TargetData) {
        self.target = target;
    }

    fn target(&self) -> TargetData {
        self.target
    }

    fn compute(&mut self, _delta_time: f32, agent: &mut dyn SteeringAgent) -> SteeringOutput {
        if self.original_max_speed == 0.0 {
            self.original_max_speed = agent.max_linear_speed();
            debug!(
                "Arrive: captured max linear speed {}",
                self.original_max_speed
            );
        }

        let to_target = seek_towards(self.target.position, agent);
        let distance = to_target.length();

        let velocity = if distance > self.slow_radius {
            agent.set_max_linear_speed(self.original_max_speed);
            to_target
        } else if distance < self.target_radius {
            agent.set_max_linear_speed(0.0);
            Vec2::ZERO
        } else {
            let speed_factor =
                (distance - self.target_radius) / (self.slow_radius - self.target_radius);
            agent.set_max_linear_speed(self.original_max_speed * speed_factor);
            to_target
        };

        let position = agent.position();
        if let Some(renderer) = renderer_of(agent) {
            if distance > self.target_radius {
                let end = position + truncate_vec2(to_target, TARGET_LINE_LENGTH);
                renderer.line(position, end, css::AQUA.into(), 2.0);
            }
            renderer.circle(self.target.position, self.slow_radius, css::BLUE.into(), 2.0);
            renderer.circle(self.target.position, self.target_radius, css::RED.into(), 2.0);
        }

        SteeringOutput::linear(velocity)
    }
}

/// Rotates the agent towards the target without moving it.
#[derive(Debug, Default, Clone, Copy, PartialEq, Reflect)]
pub struct Face {
    pub target: TargetData,
}

impl Face {
    pub fn new(target: impl Into<TargetData>) -> Self {
        Self {
            target: target.into(),
        }
    }
}

impl SteeringBehavior for Face {
    fn set_target(&mut self, target: TargetData) {
        self.target = target;
    }

    fn target(&self) -> TargetData {
        self.target
    }

    fn compute(&mut self, _delta_time: f32, agent: &mut dyn SteeringAgent) -> SteeringOutput {
        let to_target = seek_towards(self.target.position, agent);
        if to_target.length() <= FACE_EPSILON {
            return SteeringOutput::default();
        }

        let desired = to_target.y.atan2(to_target.x);
        let current = agent.rotation().to_radians();
        let turn = wrap_angle(desired - current);
        if !turn.is_finite() {
            warn!("Face: agent rotation {} is not finite", agent.rotation());
            return SteeringOutput::default();
        }

        SteeringOutput::angular(turn.to_degrees())
    }
}

/// Moves towards future position of the target, predicting it.
#[derive(Debug, Default, Clone, Copy, PartialEq, Reflect)]
pub struct Pursuit {
    pub target: TargetData,
}

impl Pursuit {
    pub fn new(target: TargetData) -> Self {
        Self { target }
    }
}

impl SteeringBehavior for Pursuit {
    fn set_target(&mut self, target: TargetData) {
        self.target = target;
    }

    fn target(&self) -> TargetData {
        self.target
    }

    fn compute(&mut self, _delta_time: f32, agent: &mut dyn SteeringAgent) -> SteeringOutput {
        let predicted = predict_position(&self.target, agent);
        let to_predicted = seek_towards(predicted, agent);

        let position = agent.position();
        if let Some(renderer) = renderer_of(agent) {
            let to_target = self.target.position - position;
            renderer.line(
                position,
                position + truncate_vec2(to_target, TARGET_LINE_LENGTH),
                css::YELLOW.into(),
                1.0,
            );
            renderer.line(
                position,
                position + truncate_vec2(to_predicted, PREDICTION_LINE_LENGTH),
                css::LIME.into(),
                2.0,
            );
            renderer.sphere(predicted, PREDICTION_MARKER_RADIUS, css::LIME.into());
        }

        SteeringOutput::linear(to_predicted)
    }
}

/// Moves away from the target with prediction of the target's future position.
#[derive(Debug, Default, Clone, Copy, PartialEq, Reflect)]
pub struct Evade {
    pub target: TargetData,
}

impl Evade {
    pub fn new(target: TargetData) -> Self {
        Self { target }
    }
}

impl SteeringBehavior for Evade {
    fn set_target(&mut self, target: TargetData) {
        self.target = target;
    }

    fn target(&self) -> TargetData {
        self.target
    }

    fn compute(&mut self, _delta_time: f32, agent: &mut dyn SteeringAgent) -> SteeringOutput {
        let predicted = predict_position(&self.target, agent);
        let to_predicted = seek_towards(predicted, agent);

        let position = agent.position();
        if let Some(renderer) = renderer_of(agent) {
            renderer.line(
                position,
                position + truncate_vec2(to_predicted, PREDICTION_LINE_LENGTH),
                css::ORANGE.into(),
                1.0,
            );
            let flee_end = position - to_predicted.normalize_or_zero() * DIRECTION_LINE_LENGTH;
            renderer.line(position, flee_end, css::RED.into(), 2.0);
            renderer.sphere(predicted, PREDICTION_MARKER_RADIUS, css::RED.into());
        }

        SteeringOutput::linear(-to_predicted)
    }
}

/// Wanders around by seeking a point on a circle projected in front of the agent.
/// The point drifts randomly along the circle every call.
#[derive(Debug, Clone)]
pub struct Wander<R: Rng = SmallRng> {
    pub target: TargetData,
    /// Distance from the agent to the circle center. Defaults to `6.0`.
    pub offset_distance: f32,
    /// Defaults to `4.0`.
    pub radius: f32,
    /// Largest change of the wander angle per call, in radians. Defaults to 45 degrees.
    pub max_angle_change: f32,
    wander_angle: f32,
    rng: R,
}

impl Default for Wander {
    fn default() -> Self {
        Self::with_rng(SmallRng::from_entropy())
    }
}

impl Wander {
    /// Deterministic wander, useful for replays and tests.
    pub fn from_seed(seed: u64) -> Self {
        Self::with_rng(SmallRng::seed_from_u64(seed))
    }
}

impl<R: Rng> Wander<R> {
    pub fn with_rng(rng: R) -> Self {
        Self {
            target: TargetData::default(),
            offset_distance: 6.0,
            radius: 4.0,
            max_angle_change: 45f32.to_radians(),
            wander_angle: 0.0,
            rng,
        }
    }

    pub fn set_wander_offset(&mut self, offset: f32) {
        self.offset_distance = offset;
    }

    pub fn set_wander_radius(&mut self, radius: f32) {
        self.radius = radius;
    }

    pub fn set_max_angle_change(&mut self, radians: f32) {
        self.max_angle_change = radians;
    }

    /// Accumulated wander angle in radians. Never wrapped.
    pub fn wander_angle(&self) -> f32 {
        self.wander_angle
    }
}

impl<R: Rng> SteeringBehavior for Wander<R> {
    fn set_target(&mut self, target: TargetData) {
        self.target = target;
    }

    fn target(&self) -> TargetData {
        self.target
    }

    fn compute(&mut self, _delta_time: f32, agent: &mut dyn SteeringAgent) -> SteeringOutput {
        let position = agent.position();
        let forward = direction_from_degrees(agent.rotation());
        let circle_center = position + forward * self.offset_distance;

        let angle_change = rng_f32(&mut self.rng, -self.max_angle_change, self.max_angle_change);
        self.wander_angle += angle_change;
        let wander_target = point_on_circle(circle_center, self.radius, self.wander_angle);

        self.set_target(TargetData::from(wander_target));
        let steering = Seek::steer(&self.target, agent);

        if let Some(renderer) = renderer_of(agent) {
            renderer.circle(circle_center, self.radius, css::AQUA.into(), 1.0);
            renderer.line(position, circle_center, css::AQUA.into(), 1.0);
            renderer.sphere(wander_target, WANDER_MARKER_RADIUS, css::FUCHSIA.into());
            renderer.line(position, wander_target, css::FUCHSIA.into(), 2.0);
        }

        steering
    }
}

/// Closed set of the behaviors above, for owners that swap behaviors at runtime.
#[derive(Debug, Clone)]
pub enum Behavior {
    Seek(Seek),
    Flee(Flee),
    Arrive(Arrive),
    Face(Face),
    Pursuit(Pursuit),
    Evade(Evade),
    Wander(Wander),
}

impl Behavior {
    pub fn name(&self) -> &'static str {
        match self {
            Behavior::Seek(_) => "seek",
            Behavior::Flee(_) => "flee",
            Behavior::Arrive(_) => "arrive",
            Behavior::Face(_) => "face",
            Behavior::Pursuit(_) => "pursuit",
            Behavior::Evade(_) => "evade",
            Behavior::Wander(_) => "wander",
        }
    }

    pub fn as_arrive(&self) -> Option<&Arrive> {
        match self {
            Behavior::Arrive(arrive) => Some(arrive),
            _ => None,
        }
    }

    pub fn as_arrive_mut(&mut self) -> Option<&mut Arrive> {
        match self {
            Behavior::Arrive(arrive) => Some(arrive),
            _ => None,
        }
    }

    pub fn as_wander_mut(&mut self) -> Option<&mut Wander> {
        match self {
            Behavior::Wander(wander) => Some(wander),
            _ => None,
        }
    }

    /// Undoes any change the behavior made to `agent`. Only `Arrive` changes agents.
    pub fn release(&mut self, agent: &mut dyn SteeringAgent) {
        if let Behavior::Arrive(arrive) = self {
            arrive.release(agent);
        }
    }

    fn as_dyn_mut(&mut self) -> &mut dyn SteeringBehavior {
        match self {
            Behavior::Seek(b) => b,
            Behavior::Flee(b) => b,
            Behavior::Arrive(b) => b,
            Behavior::Face(b) => b,
            Behavior::Pursuit(b) => b,
            Behavior::Evade(b) => b,
            Behavior::Wander(b) => b,
        }
    }

    fn as_dyn(&self) -> &dyn SteeringBehavior {
        match self {
            Behavior::Seek(b) => b,
            Behavior::Flee(b) => b,
            Behavior::Arrive(b) => b,
            Behavior::Face(b) => b,
            Behavior::Pursuit(b) => b,
            Behavior::Evade(b) => b,
            Behavior::Wander(b) => b,
        }
    }
}

impl SteeringBehavior for Behavior {
    fn set_target(&mut self, target: TargetData) {
        self.as_dyn_mut().set_target(target);
    }

    fn target(&self) -> TargetData {
        self.as_dyn().target()
    }

    fn compute(&mut self, delta_time: f32, agent: &mut dyn SteeringAgent) -> SteeringOutput {
        self.as_dyn_mut().compute(delta_time, agent)
    }
}
