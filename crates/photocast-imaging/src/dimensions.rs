//! Target size computation

/// Fits `width`×`height` inside a `max`×`max` box, keeping the aspect ratio.
///
/// Images already inside the box are returned unchanged (no upscaling).
/// Otherwise the larger side becomes exactly `max`.
pub fn calculate_dimensions(width: u32, height: u32, max: u32) -> (u32, u32) {
    if width <= max && height <= max {
        return (width, height);
    }

    let aspect_ratio = width as f64 / height.max(1) as f64;
    if width > height {
        let h = (max as f64 / aspect_ratio).round().max(1.0) as u32;
        (max, h)
    } else {
        let w = (max as f64 * aspect_ratio).round().max(1.0) as u32;
        (w, max)
    }
}
