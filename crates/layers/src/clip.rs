//! Hemisphere clipping for the orthographic view.
//!
//! Rings are clipped in view space against the horizon great circle
//! (`x = 0`). Stretches of a ring that run behind the globe are replaced by
//! an arc along the horizon circle that follows the stretch's sweep around
//! the view axis, so the clipped ring still encloses what the original
//! enclosed on the visible side.

use std::f64::consts::{PI, TAU};

use foundation::math::{LonLat, Orthographic, Vec2, Vec3};

/// Angular step of generated horizon arcs.
pub const HORIZON_STEP_DEG: f64 = 6.0;

/// Closed polygon outline of the visible disc (first point not repeated).
pub fn horizon_disc(proj: &Orthographic) -> Vec<Vec2> {
    let steps = (360.0 / HORIZON_STEP_DEG).round() as usize;
    (0..steps)
        .map(|i| horizon_point(proj, i as f64 / steps as f64 * TAU))
        .collect()
}

/// Clip one ring to the facing hemisphere and project it.
///
/// Returns the screen-space ring without a repeated closing point, or `None`
/// when nothing of it is visible.
pub fn clip_ring(proj: &Orthographic, ring: &[LonLat]) -> Option<Vec<Vec2>> {
    let mut view: Vec<Vec3> = ring
        .iter()
        .filter(|p| p.lon_deg.is_finite() && p.lat_deg.is_finite())
        .map(|p| proj.to_view(*p))
        .collect();
    if view.len() > 1 && view.first() == view.last() {
        view.pop();
    }
    if view.len() < 3 {
        return None;
    }

    let Some(start) = view.iter().position(|v| !hidden(v)) else {
        return hidden_ring(proj, &view);
    };
    view.rotate_left(start);

    let n = view.len();
    let mut out = Vec::with_capacity(n + 8);
    out.push(proj.view_to_screen(view[0]));

    let mut exit: Option<Vec3> = None;
    let mut behind: Vec<Vec3> = Vec::new();
    for i in 0..n {
        let a = view[i];
        let b = view[(i + 1) % n];
        match (hidden(&a), hidden(&b)) {
            (false, false) => {
                if i + 1 < n {
                    out.push(proj.view_to_screen(b));
                }
            }
            (false, true) => {
                let e = horizon_crossing(a, b);
                out.push(proj.view_to_screen(e));
                exit = Some(e);
                behind.clear();
                behind.push(b);
            }
            (true, true) => behind.push(b),
            (true, false) => {
                let entry = horizon_crossing(b, a);
                if let Some(e) = exit.take() {
                    let sweep = net_sweep(e, &behind, entry);
                    push_horizon_arc(proj, &mut out, azimuth(e), sweep);
                }
                out.push(proj.view_to_screen(entry));
                if i + 1 < n {
                    out.push(proj.view_to_screen(b));
                }
            }
        }
    }

    if out.len() < 3 {
        return None;
    }
    Some(out)
}

fn hidden(v: &Vec3) -> bool {
    v.x < 0.0
}

/// Point on the great circle through `front` and `back` where it meets the
/// horizon, between the two.
fn horizon_crossing(front: Vec3, back: Vec3) -> Vec3 {
    let p = front.scale(-back.x) + back.scale(front.x);
    if p.length() < 1e-12 {
        return Vec3::new(0.0, front.y, front.z).normalize();
    }
    let p = p.normalize();
    Vec3::new(0.0, p.y, p.z)
}

/// Screen azimuth (y down) of a view-space point around the view axis.
fn azimuth(v: Vec3) -> f64 {
    (-v.z).atan2(v.y)
}

fn wrap_pi(a: f64) -> f64 {
    let a = (a + PI).rem_euclid(TAU) - PI;
    if a == -PI { PI } else { a }
}

/// Signed azimuth swept from `exit` through the hidden points to `entry`.
fn net_sweep(exit: Vec3, behind: &[Vec3], entry: Vec3) -> f64 {
    let mut total = 0.0;
    let mut prev = azimuth(exit);
    for v in behind.iter().chain(std::iter::once(&entry)) {
        // Points on the view axis have no azimuth.
        if v.y.hypot(v.z) < 1e-9 {
            continue;
        }
        let a = azimuth(*v);
        total += wrap_pi(a - prev);
        prev = a;
    }
    total
}

fn horizon_point(proj: &Orthographic, angle: f64) -> Vec2 {
    let c = proj.center();
    let r = proj.radius();
    Vec2::new(c.x + r * angle.cos(), c.y + r * angle.sin())
}

fn push_horizon_arc(proj: &Orthographic, out: &mut Vec<Vec2>, from: f64, sweep: f64) {
    let steps = (sweep.abs() / HORIZON_STEP_DEG.to_radians()).ceil() as usize;
    for k in 1..steps {
        out.push(horizon_point(proj, from + sweep * k as f64 / steps as f64));
    }
}

/// A ring entirely behind the globe either encloses the far side only
/// (dropped) or, when it winds clockwise on screen around the view axis,
/// the whole visible disc.
fn hidden_ring(proj: &Orthographic, view: &[Vec3]) -> Option<Vec<Vec2>> {
    let first = view[0];
    let sweep = net_sweep(first, &view[1..], first);
    if sweep > PI {
        Some(horizon_disc(proj))
    } else {
        None
    }
}
