use bevy::prelude::*;
use rand::Rng;
use std::f32::consts::{PI, TAU};

pub fn truncate_vec2(vec2: Vec2, max: f32) -> Vec2 {
    if vec2.length() > max {
        let vec2 = vec2.normalize_or_zero();
        return vec2 * max;
    }

    vec2
}

/// Returns a uniformly distributed value in the closed range `[min, max]`.
/// Bounds given in the wrong order are swapped.
pub fn rng_f32(rng: &mut impl Rng, min: f32, max: f32) -> f32 {
    let (min, max) = if min <= max { (min, max) } else { (max, min) };
    rng.gen_range(min..=max)
}

/// Wraps an angle in radians into `(-PI, PI]`. Non-finite angles come back as NaN.
pub fn wrap_angle(angle: f32) -> f32 {
    let angle = angle.rem_euclid(TAU);
    if angle > PI {
        angle - TAU
    } else if angle <= -PI {
        angle + TAU
    } else {
        angle
    }
}

/// Unit vector pointing along `degrees`, measured counter-clockwise from +X.
pub fn direction_from_degrees(degrees: f32) -> Vec2 {
    let angle = degrees.to_radians();
    Vec2::new(angle.cos(), angle.sin())
}

/// Point on a circle of `radius` around `center` at `angle` radians.
pub fn point_on_circle(center: Vec2, radius: f32, angle: f32) -> Vec2 {
    center + Vec2::new(angle.cos(), angle.sin()) * radius
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::{rngs::SmallRng, SeedableRng};

    #[test]
    fn truncate_keeps_short_vectors() {
        assert_eq!(truncate_vec2(Vec2::new(3.0, 4.0), 10.0), Vec2::new(3.0, 4.0));
        let v = truncate_vec2(Vec2::new(30.0, 40.0), 10.0);
        assert_relative_eq!(v.length(), 10.0, epsilon = 1e-4);
    }

    #[test]
    fn wrap_angle_range() {
        assert_relative_eq!(wrap_angle(3.0 * PI / 2.0), -PI / 2.0, epsilon = 1e-5);
        assert_relative_eq!(wrap_angle(-3.0 * PI / 2.0), PI / 2.0, epsilon = 1e-5);
        assert_relative_eq!(wrap_angle(5.0 * TAU + 0.25), 0.25, epsilon = 1e-4);
        assert_eq!(wrap_angle(-PI), PI);
        assert_eq!(wrap_angle(PI), PI);
    }

    #[test]
    fn wrap_angle_handles_huge_and_infinite_angles() {
        for degrees in [1e6f32, 1e9, 1e12, -1e12, f32::MAX] {
            let wrapped = wrap_angle(degrees.to_radians());
            assert!(wrapped > -PI && wrapped <= PI, "{degrees} -> {wrapped}");
        }

        assert!(wrap_angle(f32::INFINITY).is_nan());
        assert!(wrap_angle(f32::NEG_INFINITY).is_nan());
        assert!(wrap_angle(f32::NAN).is_nan());
    }

    #[test]
    fn rng_stays_in_closed_range() {
        let mut rng = SmallRng::seed_from_u64(3);
        for _ in 0..1000 {
            let v = rng_f32(&mut rng, -0.5, 0.5);
            assert!((-0.5..=0.5).contains(&v));
        }
        assert_eq!(rng_f32(&mut rng, 0.0, 0.0), 0.0);
        let swapped = rng_f32(&mut rng, 1.0, -1.0);
        assert!((-1.0..=1.0).contains(&swapped));
    }

    #[test]
    fn direction_follows_degrees() {
        let up = direction_from_degrees(90.0);
        assert_relative_eq!(up.x, 0.0, epsilon = 1e-6);
        assert_relative_eq!(up.y, 1.0, epsilon = 1e-6);
    }
}
