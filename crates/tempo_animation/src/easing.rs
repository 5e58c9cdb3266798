//! Easing curves
//!
//! Named curves are forwarded to the engine by name. [`Easing::apply`] is
//! only evaluated locally where a curve shapes something the orchestration
//! layer computes itself, such as eased stagger delays.

use serde::{Deserialize, Serialize};

/// An easing curve
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Easing {
    #[default]
    Linear,
    EaseIn,
    EaseOut,
    EaseInOut,
    CircIn,
    CircOut,
    CircInOut,
    BackIn,
    BackOut,
    BackInOut,
    Anticipate,
    /// Cubic bezier with control points (x1, y1, x2, y2)
    CubicBezier(f64, f64, f64, f64),
    /// Jump in `n` equal steps, holding each value until its step ends
    Steps(u32),
}

const BEZIER_PRECISION: f64 = 0.000_000_1;
const BEZIER_MAX_ITERATIONS: usize = 12;

impl Easing {
    /// Map linear progress `t` (0.0 to 1.0) through the curve
    pub fn apply(&self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match *self {
            Easing::Linear => t,
            Easing::EaseIn => cubic_bezier(0.42, 0.0, 1.0, 1.0, t),
            Easing::EaseOut => cubic_bezier(0.0, 0.0, 0.58, 1.0, t),
            Easing::EaseInOut => cubic_bezier(0.42, 0.0, 0.58, 1.0, t),
            Easing::CircIn => circ_in(t),
            Easing::CircOut => 1.0 - circ_in(1.0 - t),
            Easing::CircInOut => mirror(circ_in, t),
            Easing::BackIn => back_in(t),
            Easing::BackOut => 1.0 - back_in(1.0 - t),
            Easing::BackInOut => mirror(back_in, t),
            Easing::Anticipate => {
                let t = t * 2.0;
                if t < 1.0 {
                    0.5 * back_in(t)
                } else {
                    0.5 * (2.0 - 2f64.powf(-10.0 * (t - 1.0)))
                }
            }
            Easing::CubicBezier(x1, y1, x2, y2) => cubic_bezier(x1, y1, x2, y2, t),
            Easing::Steps(steps) => {
                if steps == 0 {
                    return t;
                }
                let steps = steps as f64;
                ((t.min(0.999) * steps).floor() / steps).clamp(0.0, 1.0)
            }
        }
    }
}

fn circ_in(t: f64) -> f64 {
    1.0 - t.acos().sin()
}

fn back_in(t: f64) -> f64 {
    cubic_bezier(0.31, 0.01, 0.66, -0.59, t)
}

/// First half runs `f`, second half runs its reflection
fn mirror(f: fn(f64) -> f64, t: f64) -> f64 {
    if t <= 0.5 {
        f(2.0 * t) / 2.0
    } else {
        (2.0 - f(2.0 * (1.0 - t))) / 2.0
    }
}

fn bezier_component(t: f64, a1: f64, a2: f64) -> f64 {
    (((1.0 - 3.0 * a2 + 3.0 * a1) * t + (3.0 * a2 - 6.0 * a1)) * t + 3.0 * a1) * t
}

/// Solve x(t) = x by bisection, then evaluate y(t)
fn cubic_bezier(x1: f64, y1: f64, x2: f64, y2: f64, x: f64) -> f64 {
    if x1 == y1 && x2 == y2 {
        return x;
    }
    if x <= 0.0 || x >= 1.0 {
        return x;
    }

    let mut lower = 0.0;
    let mut upper = 1.0;
    let mut t = 0.5;
    for _ in 0..BEZIER_MAX_ITERATIONS {
        t = lower + (upper - lower) / 2.0;
        let current = bezier_component(t, x1, x2) - x;
        if current.abs() <= BEZIER_PRECISION {
            break;
        }
        if current > 0.0 {
            upper = t;
        } else {
            lower = t;
        }
    }

    bezier_component(t, y1, y2)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 0.001;

    #[test]
    fn test_endpoints_are_fixed() {
        for easing in [
            Easing::Linear,
            Easing::EaseIn,
            Easing::EaseOut,
            Easing::EaseInOut,
            Easing::CircIn,
            Easing::CircOut,
            Easing::BackInOut,
        ] {
            assert!(easing.apply(0.0).abs() < EPSILON, "{:?} at 0", easing);
            assert!((easing.apply(1.0) - 1.0).abs() < EPSILON, "{:?} at 1", easing);
        }
    }

    #[test]
    fn test_ease_in_starts_slow() {
        assert!(Easing::EaseIn.apply(0.25) < 0.25);
        assert!(Easing::EaseOut.apply(0.25) > 0.25);
        assert!((Easing::EaseInOut.apply(0.5) - 0.5).abs() < 0.01);
    }

    #[test]
    fn test_back_in_undershoots() {
        assert!(Easing::BackIn.apply(0.2) < 0.0);
    }

    #[test]
    fn test_steps_hold_values() {
        let steps = Easing::Steps(4);
        assert_eq!(steps.apply(0.1), 0.0);
        assert_eq!(steps.apply(0.3), 0.25);
        assert_eq!(steps.apply(1.0), 0.75);
    }

    #[test]
    fn test_named_easing_json() {
        let easing: Easing = serde_json::from_str("\"easeInOut\"").unwrap();
        assert_eq!(easing, Easing::EaseInOut);

        let bezier: Easing = serde_json::from_str(r#"{"cubicBezier":[0.1,0.2,0.3,0.4]}"#).unwrap();
        assert_eq!(bezier, Easing::CubicBezier(0.1, 0.2, 0.3, 0.4));
    }
}
