// src/geometry.rs
//
// Region-based moment-magnitude assignment. A geometry here is a pure
// function of the (mesh-unit) site position returning the per-site moment:
// a fixed value inside the region, 0 outside. Zero marks a non-magnetic
// site.

/// Magnitude function from an arbitrary position predicate.
pub fn region_mu_s<P>(pred: P, value: f64) -> impl Fn([f64; 3]) -> f64
where
    P: Fn([f64; 3]) -> bool,
{
    move |pos| if pred(pos) { value } else { 0.0 }
}

/// In-plane disk: (x-cx)^2 + (y-cy)^2 <= radius^2, any z.
pub fn disk_mu_s(center: (f64, f64), radius: f64, value: f64) -> impl Fn([f64; 3]) -> f64 {
    let (cx, cy) = center;
    let r2 = radius * radius;
    region_mu_s(
        move |pos| {
            let dx = pos[0] - cx;
            let dy = pos[1] - cy;
            dx * dx + dy * dy <= r2
        },
        value,
    )
}
