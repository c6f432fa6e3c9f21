//! Stateless geometry helpers.
//!
//! Containment and overlap tests, angle math, interpolation and a few random
//! helpers. Everything here is pure except the random helpers, which draw from
//! a caller-supplied [`fastrand::Rng`].
//!
//! # Conventions
//!
//! - Angles are in degrees. 0° points along +X and angles grow towards +Y
//!   (clockwise on screen, since Y grows downwards).
//! - [`point_inside_rectangle`] excludes the boundary while
//!   [`point_inside_circle`] includes it. The asymmetry is intentional and the
//!   collider tests depend on it.
//! - [`rectangle_inside_rectangle`] and [`rectangle_inside_circle`] only sample
//!   the centre and four corners of the first rectangle. Two shapes can overlap
//!   without any sampled point being inside the other one (a long thin bar
//!   crossing the middle of a box, for example); those overlaps are missed.

use fastrand::Rng;

use crate::math::vector::Vector2;

/// Strict interior test; a point on the edge is outside.
pub fn point_inside_rectangle(x: f32, y: f32, tlx: f32, tly: f32, brx: f32, bry: f32) -> bool {
    !(x <= tlx || x >= brx || y <= tly || y >= bry)
}

/// True when the point lies within `rad` of the centre (edge included).
pub fn point_inside_circle(x: f32, y: f32, cx: f32, cy: f32, rad: f32) -> bool {
    point_distance(x, y, cx, cy) <= rad
}

/// Approximate rectangle overlap: centre and corners of the first rectangle
/// tested against the second.
#[allow(clippy::too_many_arguments)]
pub fn rectangle_inside_rectangle(
    tlx: f32,
    tly: f32,
    brx: f32,
    bry: f32,
    tlx2: f32,
    tly2: f32,
    brx2: f32,
    bry2: f32,
) -> bool {
    let center_x = tlx + (brx - tlx) * 0.5;
    let center_y = tly + (bry - tly) * 0.5;
    [
        (center_x, center_y),
        (tlx, tly),
        (brx, tly),
        (tlx, bry),
        (brx, bry),
    ]
    .iter()
    .any(|&(px, py)| point_inside_rectangle(px, py, tlx2, tly2, brx2, bry2))
}

/// Approximate rectangle/circle overlap: the circle centre inside the
/// rectangle, or any rectangle corner inside the circle.
pub fn rectangle_inside_circle(
    tlx: f32,
    tly: f32,
    brx: f32,
    bry: f32,
    cx: f32,
    cy: f32,
    rad: f32,
) -> bool {
    if point_inside_rectangle(cx, cy, tlx, tly, brx, bry) {
        return true;
    }
    [(tlx, tly), (brx, tly), (tlx, bry), (brx, bry)]
        .iter()
        .any(|&(px, py)| point_inside_circle(px, py, cx, cy, rad))
}

/// Exact circle overlap: centre distance within the sum of radii.
pub fn circle_inside_circle(cx: f32, cy: f32, rad: f32, cx2: f32, cy2: f32, rad2: f32) -> bool {
    point_inside_circle(cx, cy, cx2, cy2, rad + rad2)
}

/// Clamp a point into the rectangle `(tlx, tly)..(brx, bry)`.
pub fn constrain_point(x: f32, y: f32, tlx: f32, tly: f32, brx: f32, bry: f32) -> Vector2 {
    let mut constrained = Vector2::new(x, y);
    if x < tlx {
        constrained.x = tlx;
    }
    if x > brx {
        constrained.x = brx;
    }
    if y < tly {
        constrained.y = tly;
    }
    if y > bry {
        constrained.y = bry;
    }
    constrained
}

pub fn point_distance(x1: f32, y1: f32, x2: f32, y2: f32) -> f32 {
    ((x1 - x2).powi(2) + (y1 - y2).powi(2)).sqrt()
}

pub fn lerp(start: f32, end: f32, percent: f32) -> f32 {
    start * (1.0 - percent) + end * percent
}

pub fn round_to_increment(value: f32, increment: f32) -> f32 {
    (value / increment).round() * increment
}

pub fn floor_to_increment(value: f32, increment: f32) -> f32 {
    (value / increment).floor() * increment
}

pub fn ceil_to_increment(value: f32, increment: f32) -> f32 {
    (value / increment).ceil() * increment
}

/// Angle in degrees from point 1 to point 2, always within `[0, 360)`.
pub fn find_angle(x1: f32, y1: f32, x2: f32, y2: f32) -> f32 {
    let degrees = (y2 - y1).atan2(x2 - x1).to_degrees();
    let normalized = (360.0 + degrees) % 360.0;
    // rounding just below 360 can land on 360.0
    if normalized >= 360.0 { 0.0 } else { normalized }
}

/// Displacement of `distance` along `angle`.
///
/// A negative angle is the "no heading" sentinel and, like a zero distance,
/// yields the zero vector.
pub fn move_toward(angle: f32, distance: f32) -> Vector2 {
    if angle < 0.0 || distance == 0.0 {
        return Vector2::zero_vec();
    }
    let radians = angle.to_radians();
    Vector2::new(radians.cos() * distance, radians.sin() * distance)
}

/// Unit vector pointing along `angle`.
pub fn vector_from_angle(angle: f32) -> Vector2 {
    move_toward(angle, 1.0)
}

/// Round `angle` to the nearest multiple of `snap`.
pub fn angle_snap(angle: f32, snap: f32) -> f32 {
    (angle / snap).round() * snap
}

/// Bucket an angle into `max_index` equal segments (rounded), e.g. to pick a
/// rotation frame. An angle close to 360° rounds up to `max_index`.
pub fn angle_to_index(angle: f32, max_index: u32) -> i32 {
    let angle_per_index = 360.0 / max_index as f32;
    (angle / angle_per_index).round() as i32
}

/// Random value in `[start, end)`.
pub fn rand_range(rng: &mut Rng, start: f32, end: f32) -> f32 {
    lerp(start, end, rng.f32())
}

pub fn random_angle(rng: &mut Rng) -> f32 {
    rand_range(rng, 0.0, 360.0)
}

/// True with a `percent` in 100 chance.
pub fn prob(rng: &mut Rng, percent: f32) -> bool {
    rng.f32() * 100.0 < percent
}
