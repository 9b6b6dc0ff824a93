use bevy::prelude::*;

use super::steering::SteeringAgent;

/// Receives debug draw requests from behaviors. Implementations decide how (and whether)
/// anything actually gets drawn.
pub trait DebugRenderer {
    fn line(&mut self, start: Vec2, end: Vec2, color: Color, thickness: f32);
    fn circle(&mut self, center: Vec2, radius: f32, color: Color, thickness: f32);
    fn sphere(&mut self, center: Vec2, radius: f32, color: Color);
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DrawCommand {
    Line {
        start: Vec2,
        end: Vec2,
        color: Color,
        thickness: f32,
    },
    Circle {
        center: Vec2,
        radius: f32,
        color: Color,
        thickness: f32,
    },
    Sphere {
        center: Vec2,
        radius: f32,
        color: Color,
    },
}

/// Stores every draw request so it can be replayed or inspected later.
#[derive(Debug, Default, Clone)]
pub struct RecordingRenderer {
    pub commands: Vec<DrawCommand>,
}

impl RecordingRenderer {
    pub fn clear(&mut self) {
        self.commands.clear();
    }
}

impl DebugRenderer for RecordingRenderer {
    fn line(&mut self, start: Vec2, end: Vec2, color: Color, thickness: f32) {
        self.commands.push(DrawCommand::Line {
            start,
            end,
            color,
            thickness,
        });
    }

    fn circle(&mut self, center: Vec2, radius: f32, color: Color, thickness: f32) {
        self.commands.push(DrawCommand::Circle {
            center,
            radius,
            color,
            thickness,
        });
    }

    fn sphere(&mut self, center: Vec2, radius: f32, color: Color) {
        self.commands.push(DrawCommand::Sphere {
            center,
            radius,
            color,
        });
    }
}

/// Pairs an agent with a renderer. Debug output is produced only if the wrapped agent
/// has debug rendering enabled.
pub struct DebugAgent<'a, A: SteeringAgent> {
    pub agent: &'a mut A,
    pub renderer: &'a mut dyn DebugRenderer,
}

impl<'a, A: SteeringAgent> DebugAgent<'a, A> {
    pub fn new(agent: &'a mut A, renderer: &'a mut dyn DebugRenderer) -> Self {
        Self { agent, renderer }
    }
}

impl<'a, A: SteeringAgent> SteeringAgent for DebugAgent<'a, A> {
    fn position(&self) -> Vec2 {
        self.agent.position()
    }

    fn rotation(&self) -> f32 {
        self.agent.rotation()
    }

    fn max_linear_speed(&self) -> f32 {
        self.agent.max_linear_speed()
    }

    fn set_max_linear_speed(&mut self, speed: f32) {
        self.agent.set_max_linear_speed(speed);
    }

    fn is_debug_rendering_enabled(&self) -> bool {
        self.agent.is_debug_rendering_enabled()
    }

    fn debug_renderer(&mut self) -> Option<&mut dyn DebugRenderer> {
        Some(&mut *self.renderer)
    }
}

/// Returns the agent's renderer if debug rendering is switched on.
pub(crate) fn renderer_of(agent: &mut dyn SteeringAgent) -> Option<&mut dyn DebugRenderer> {
    if agent.is_debug_rendering_enabled() {
        agent.debug_renderer()
    } else {
        None
    }
}

impl DebugRenderer for Gizmos<'_, '_> {
    fn line(&mut self, start: Vec2, end: Vec2, color: Color, _thickness: f32) {
        self.line_2d(start, end, color);
    }

    fn circle(&mut self, center: Vec2, radius: f32, color: Color, _thickness: f32) {
        self.circle_2d(center, radius, color);
    }

    fn sphere(&mut self, center: Vec2, radius: f32, color: Color) {
        self.circle_2d(center, radius, color);
    }
}

/// Replays recorded commands, e.g. onto `Gizmos`.
pub fn replay(commands: &[DrawCommand], renderer: &mut dyn DebugRenderer) {
    for command in commands {
        match *command {
            DrawCommand::Line {
                start,
                end,
                color,
                thickness,
            } => renderer.line(start, end, color, thickness),
            DrawCommand::Circle {
                center,
                radius,
                color,
                thickness,
            } => renderer.circle(center, radius, color, thickness),
            DrawCommand::Sphere {
                center,
                radius,
                color,
            } => renderer.sphere(center, radius, color),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::movement::steering::SteeringHost;

    #[test]
    fn debug_agent_forwards_to_wrapped_agent() {
        let mut host = SteeringHost::new(Vec2::new(4.0, 2.0), 15.0, 30.0);
        let mut renderer = RecordingRenderer::default();
        let mut agent = DebugAgent::new(&mut host, &mut renderer);

        assert_eq!(SteeringAgent::position(&agent), Vec2::new(4.0, 2.0));
        assert_eq!(agent.rotation(), 15.0);
        agent.set_max_linear_speed(7.0);
        assert!(!agent.is_debug_rendering_enabled());
        assert!(renderer_of(&mut agent).is_none());
        assert_eq!(host.max_linear_speed, 7.0);
    }

    #[test]
    fn replay_reproduces_recorded_commands() {
        let mut recorded = RecordingRenderer::default();
        recorded.line(Vec2::ZERO, Vec2::X, Color::WHITE, 2.0);
        recorded.circle(Vec2::ONE, 3.0, Color::BLACK, 1.0);
        recorded.sphere(Vec2::Y, 5.0, Color::WHITE);

        let mut copy = RecordingRenderer::default();
        replay(&recorded.commands, &mut copy);

        assert_eq!(copy.commands, recorded.commands);
        copy.clear();
        assert!(copy.commands.is_empty());
    }
}
