//! Outlined-rectangle geometry derived from interpreter state.
//!
//! The rectangle is nominally `rect_size` square, scaled per axis and
//! centered on the interpreter's accumulated center. Negative scale yields
//! negative extents; the geometry is reported as computed, unclamped.

use std::fmt;

use crate::config::Tunables;
use crate::event::Point;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

pub const OUTLINE_COLOR: Rgb = Rgb(0, 0, 255);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RectOutline {
    pub top_left: Point,
    pub width: f32,
    pub height: f32,
    pub stroke_width: f32,
    pub color: Rgb,
}

pub fn rect_outline(center: Point, sx: f32, sy: f32, tun: &Tunables) -> RectOutline {
    let width = tun.rect_size * sx;
    let height = tun.rect_size * sy;
    RectOutline {
        top_left: Point::new(center.x - width / 2.0, center.y - height / 2.0),
        width,
        height,
        stroke_width: tun.stroke_width,
        color: OUTLINE_COLOR,
    }
}

impl fmt::Display for RectOutline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "rect {:.1}x{:.1} at ({:.1}, {:.1}) stroke {:.1}",
            self.width, self.height, self.top_left.x, self.top_left.y, self.stroke_width
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_scale_centers_nominal_rect() {
        let tun = Tunables::default();
        let r = rect_outline(Point::new(200.0, 300.0), 1.0, 1.0, &tun);
        assert_eq!(r.top_left, Point::new(150.0, 250.0));
        assert_eq!(r.width, 100.0);
        assert_eq!(r.height, 100.0);
        assert_eq!(r.stroke_width, 8.0);
        assert_eq!(r.color, OUTLINE_COLOR);
    }

    #[test]
    fn per_axis_scale_is_independent() {
        let tun = Tunables::default();
        let r = rect_outline(Point::new(0.0, 0.0), 2.0, 0.5, &tun);
        assert_eq!(r.width, 200.0);
        assert_eq!(r.height, 50.0);
        assert_eq!(r.top_left, Point::new(-100.0, -25.0));
    }

    #[test]
    fn negative_scale_reported_unclamped() {
        let tun = Tunables::default();
        let r = rect_outline(Point::new(0.0, 0.0), -1.0, 1.0, &tun);
        assert_eq!(r.width, -100.0);
        assert_eq!(r.top_left.x, 50.0);
    }
}
