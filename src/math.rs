// Small numeric helpers sketches tend to need.

/// Clamp `value` into `[min, max]`.
#[inline]
pub fn constrain(value: f32, min: f32, max: f32) -> f32 {
    if value < min {
        min
    } else if value > max {
        max
    } else {
        value
    }
}

/// Re-map `value` from `[min, max]` onto `[new_min, new_max]`. Not clamped.
#[inline]
pub fn map_range(value: f32, min: f32, max: f32, new_min: f32, new_max: f32) -> f32 {
    new_min + (new_max - new_min) * ((value - min) / (max - min))
}

/// Euclidean distance between (x0, y0) and (x1, y1).
#[inline]
pub fn dist(x0: f32, y0: f32, x1: f32, y1: f32) -> f32 {
    let dx = x1 - x0;
    let dy = y1 - y0;
    (dx * dx + dy * dy).sqrt()
}
