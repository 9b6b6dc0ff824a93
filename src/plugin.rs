use bevy::prelude::*;

use crate::movement::{
    behaviors::{Arrive, Behavior},
    debug::{replay, DebugAgent, RecordingRenderer},
    steering::{SteeringAgent, SteeringBehavior, SteeringHost, SteeringOutput, TargetData},
};

/// The behavior currently steering an entity.
///
/// Prefer [`ActiveBehavior::replace`] for swapping behaviors. Overwriting the component
/// with `insert` drops the old behavior unreleased; `SteeringPlugin` then restores the
/// host's max speed from [`CapturedMaxSpeed`] if the entity has one.
#[derive(Component, Debug, Clone)]
pub struct ActiveBehavior(pub Behavior);

impl ActiveBehavior {
    /// Swaps in `behavior`, releasing whatever the old one changed on `host` first.
    /// Returns the old behavior.
    pub fn replace(&mut self, behavior: Behavior, host: &mut dyn SteeringAgent) -> Behavior {
        self.0.release(host);
        std::mem::replace(&mut self.0, behavior)
    }
}

/// A component that stores an `Entity` that is served as a target.
/// Its `SteeringHost` position and velocity are copied into the behavior's target every frame.
#[derive(Component, Debug, Clone, Copy)]
pub struct SteeringTargetEntity(pub Entity);

/// Max speed captured by the entity's `Arrive`, mirrored after every steering update.
#[derive(Component, Debug, Default, Clone, Copy, PartialEq)]
pub struct CapturedMaxSpeed(pub Option<f32>);

#[derive(Bundle)]
pub struct SteeringBundle {
    pub host: SteeringHost,
    pub behavior: ActiveBehavior,
    pub output: SteeringOutput,
    pub captured: CapturedMaxSpeed,
}

impl SteeringBundle {
    pub fn new(host: SteeringHost, behavior: Behavior) -> Self {
        Self {
            host,
            behavior: ActiveBehavior(behavior),
            output: SteeringOutput::default(),
            captured: CapturedMaxSpeed::default(),
        }
    }
}

/// Draw requests of the current frame from hosts with `debug_rendering` enabled.
#[derive(Resource, Debug, Default)]
pub struct DebugDrawQueue(pub RecordingRenderer);

/// Computes a `SteeringOutput` for every entity with an `ActiveBehavior` each frame.
/// Applying the output to the entity's motion is up to the app.
pub struct SteeringPlugin;

impl Plugin for SteeringPlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<SteeringHost>()
            .register_type::<SteeringOutput>()
            .init_resource::<DebugDrawQueue>()
            .add_systems(Update, (track_target_entities, compute_steering).chain())
            .observe(release_removed_behavior)
            .observe(restore_overwritten_behavior);
    }
}

/// Draws the `DebugDrawQueue` with gizmos. Requires `SteeringPlugin` and the gizmo plugin.
pub struct SteeringDebugPlugin;

impl Plugin for SteeringDebugPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Update, draw_debug_queue.after(compute_steering));
    }
}

fn track_target_entities(
    mut seekers: Query<(&mut ActiveBehavior, &SteeringTargetEntity)>,
    targets: Query<&SteeringHost>,
) {
    for (mut behavior, target) in &mut seekers {
        if let Ok(host) = targets.get(target.0) {
            behavior.0.set_target(TargetData::from_target(host));
        }
    }
}

fn compute_steering(
    time: Res<Time>,
    mut queue: ResMut<DebugDrawQueue>,
    mut hosts: Query<(
        Entity,
        &mut SteeringHost,
        &mut ActiveBehavior,
        &mut SteeringOutput,
        Option<&mut CapturedMaxSpeed>,
    )>,
) {
    queue.0.clear();
    let delta = time.delta_seconds();

    for (entity, mut host, mut behavior, mut output, captured) in &mut hosts {
        let host = &mut *host;
        *output = if host.debug_rendering {
            behavior
                .0
                .compute(delta, &mut DebugAgent::new(host, &mut queue.0))
        } else {
            behavior.0.compute(delta, host)
        };

        if let Some(mut captured) = captured {
            let speed = behavior.0.as_arrive().and_then(Arrive::original_max_speed);
            if captured.0 != speed {
                captured.0 = speed;
            }
        }

        trace!(
            "{:?} {}: linear {:?}, angular {}",
            entity,
            behavior.0.name(),
            output.linear_velocity,
            output.angular_velocity
        );
    }
}

fn release_removed_behavior(
    trigger: Trigger<OnRemove, ActiveBehavior>,
    mut hosts: Query<(
        &mut SteeringHost,
        &mut ActiveBehavior,
        Option<&mut CapturedMaxSpeed>,
    )>,
) {
    if let Ok((mut host, mut behavior, captured)) = hosts.get_mut(trigger.entity()) {
        debug!("Releasing {} on {:?}", behavior.0.name(), trigger.entity());
        behavior.0.release(&mut *host);
        if let Some(mut captured) = captured {
            captured.0 = None;
        }
    }
}

/// `insert` over an existing `ActiveBehavior` fires no `OnRemove`, so the old behavior
/// never gets released. Restores the last captured max speed instead.
fn restore_overwritten_behavior(
    trigger: Trigger<OnInsert, ActiveBehavior>,
    mut hosts: Query<(&mut SteeringHost, &mut CapturedMaxSpeed)>,
) {
    if let Ok((mut host, mut captured)) = hosts.get_mut(trigger.entity()) {
        if let Some(speed) = captured.0.take() {
            debug!(
                "Restoring max linear speed {} on {:?} after behavior was overwritten",
                speed,
                trigger.entity()
            );
            host.max_linear_speed = speed;
        }
    }
}

fn draw_debug_queue(queue: Res<DebugDrawQueue>, mut gizmos: Gizmos) {
    replay(&queue.0.commands, &mut gizmos);
}
