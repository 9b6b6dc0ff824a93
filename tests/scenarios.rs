//! End-to-end steering scenarios driving agents over several frames.
use approx::assert_relative_eq;
use bevy::math::Vec2;
use common::math::truncate_vec2;
use rstest::rstest;
use steer_rs::prelude::*;

const DT: f32 = 1.0 / 60.0;

/// Moves `host` by the output, clamped to the host's current max speed.
fn integrate(host: &mut SteeringHost, output: SteeringOutput) {
    let velocity = truncate_vec2(output.linear_velocity, host.max_linear_speed);
    host.linear_velocity = velocity;
    host.position += velocity * DT;
    host.rotation += output.angular_velocity * DT;
}

#[test]
fn stationary_target_straight_ahead() {
    let mut host = SteeringHost::new(Vec2::ZERO, 0.0, 50.0);
    let target = TargetData::from(Vec2::new(100.0, 0.0));

    let seek = Seek::new(target).compute(DT, &mut host);
    let face = Face::new(target).compute(DT, &mut host);

    assert_eq!(seek.linear_velocity, Vec2::new(100.0, 0.0));
    assert_eq!(face.angular_velocity, 0.0);
}

#[test]
fn pursuit_leads_a_moving_target() {
    let mut host = SteeringHost::new(Vec2::ZERO, 0.0, 50.0);
    let target = TargetData::new(Vec2::new(100.0, 0.0), Vec2::new(0.0, 50.0));

    let output = Pursuit::new(target).compute(DT, &mut host);

    assert_eq!(output.linear_velocity, Vec2::new(100.0, 100.0));
}

#[test]
fn arrive_settles_at_target_radius_and_releases() {
    let mut host = SteeringHost::new(Vec2::ZERO, 0.0, 100.0);
    let mut arrive = Arrive::new(200.0, 20.0);
    arrive.set_target(Vec2::new(500.0, 0.0).into());

    for _ in 0..1200 {
        let output = arrive.compute(DT, &mut host);
        integrate(&mut host, output);
    }

    let distance = (Vec2::new(500.0, 0.0) - host.position).length();
    assert!((distance - 20.0).abs() < 1.0, "distance {distance}");
    assert!(host.max_linear_speed < 1.0);

    arrive.release(&mut host);
    assert_eq!(host.max_linear_speed, 100.0);
}

#[rstest]
#[case(90.0)]
#[case(-135.0)]
#[case(179.0)]
fn face_turns_towards_target(#[case] start_rotation: f32) {
    let mut host = SteeringHost::new(Vec2::ZERO, start_rotation, 100.0);
    let mut face = Face::new(Vec2::new(0.0, -40.0));

    for _ in 0..1200 {
        let output = face.compute(DT, &mut host);
        integrate(&mut host, output);
    }

    let remaining = face.compute(DT, &mut host).angular_velocity;
    assert_relative_eq!(remaining, 0.0, epsilon = 0.01);
    assert_eq!(host.position, Vec2::ZERO);
}

#[test]
fn seeded_wander_replays_the_same_path() {
    let run = |seed: u64| {
        let mut host = SteeringHost::new(Vec2::ZERO, 0.0, 30.0);
        let mut wander = Wander::from_seed(seed);
        let mut path = Vec::new();
        for _ in 0..120 {
            let output = wander.compute(DT, &mut host);
            let heading = output.linear_velocity;
            host.rotation = heading.y.atan2(heading.x).to_degrees();
            integrate(&mut host, output);
            path.push(host.position);
        }
        (path, wander.wander_angle())
    };

    let (first, first_angle) = run(99);
    let (second, second_angle) = run(99);
    let (other, _) = run(100);

    assert_eq!(first, second);
    assert_eq!(first_angle, second_angle);
    assert_ne!(first, other);
}

#[test]
fn behaviors_are_swappable_at_runtime() {
    let mut host = SteeringHost::new(Vec2::new(10.0, 10.0), 0.0, 40.0);
    let target = TargetData::from(Vec2::new(20.0, 10.0));
    let mut active = ActiveBehavior(Behavior::Seek(Seek::new(target)));

    assert_eq!(active.0.compute(DT, &mut host).linear_velocity, Vec2::new(10.0, 0.0));

    active.replace(Behavior::Flee(Flee::default()), &mut host);
    active.0.set_target(target);

    assert_eq!(active.0.compute(DT, &mut host).linear_velocity, Vec2::new(-10.0, 0.0));
}
