pub use crate::config::{ConfigError, SteeringConfig};
pub use crate::movement::behaviors::{Arrive, Behavior, Evade, Face, Flee, Pursuit, Seek, Wander};
pub use crate::movement::debug::{DebugAgent, DebugRenderer, DrawCommand, RecordingRenderer};
pub use crate::movement::steering::{
    SteeringAgent, SteeringBehavior, SteeringHost, SteeringOutput, SteeringTarget, TargetData,
};
pub use crate::plugin::{
    ActiveBehavior, CapturedMaxSpeed, DebugDrawQueue, SteeringBundle, SteeringDebugPlugin,
    SteeringPlugin, SteeringTargetEntity,
};
