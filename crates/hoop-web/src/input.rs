use glam::Vec2;

// WheelEvent.deltaMode values
pub const DELTA_PIXEL: u32 = 0;
pub const DELTA_LINE: u32 = 1;
pub const DELTA_PAGE: u32 = 2;

/// Convert a raw wheel delta into pixels so every browser scrolls the story
/// at the same rate. Non-finite deltas become zero.
#[inline]
pub fn wheel_delta_px(delta: f64, delta_mode: u32, line_px: f32, page_px: f32) -> f32 {
    if !delta.is_finite() {
        return 0.0;
    }
    let d = delta as f32;
    match delta_mode {
        DELTA_LINE => d * line_px,
        DELTA_PAGE => d * page_px,
        _ => d,
    }
}

/// Map a pointer position in CSS pixels onto normalised device coordinates of
/// a canvas whose bounding rect is `(left, top, width, height)`.
///
/// Returns `None` for an empty rect or a point outside the canvas.
#[inline]
pub fn client_to_ndc(client: Vec2, left: f32, top: f32, width: f32, height: f32) -> Option<Vec2> {
    if width <= 0.0 || height <= 0.0 {
        return None;
    }
    let u = (client.x - left) / width;
    let v = (client.y - top) / height;
    if !(0.0..=1.0).contains(&u) || !(0.0..=1.0).contains(&v) {
        return None;
    }
    Some(Vec2::new(u * 2.0 - 1.0, 1.0 - v * 2.0))
}
