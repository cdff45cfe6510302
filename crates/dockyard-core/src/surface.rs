#![forbid(unsafe_code)]

//! Abstract 2D drawing surface.
//!
//! The docking engine never touches pixels. Hosts implement [`DrawSurface`]
//! on top of whatever toolkit they use; the engine only asks for filled and
//! outlined rectangles plus plain text.

use serde::{Deserialize, Serialize};

use crate::geometry::{Rect, Size};

/// Straight (non-premultiplied) RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    /// Opaque color.
    #[inline]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Color with explicit alpha.
    #[inline]
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Whether the color is fully transparent.
    #[inline]
    pub const fn is_transparent(&self) -> bool {
        self.a == 0
    }
}

/// Drawing primitives consumed by the docking engine.
pub trait DrawSurface {
    /// Fill `rect` with `color`.
    fn fill_rect(&mut self, rect: Rect, color: Rgba);

    /// Outline `rect` with a pen of `width` pixels.
    fn stroke_rect(&mut self, rect: Rect, color: Rgba, width: i32);

    /// Measure `text` in the surface's current font.
    fn text_size(&self, text: &str) -> Size;

    /// Draw `text` with its top-left corner at (`x`, `y`).
    fn draw_text(&mut self, text: &str, x: i32, y: i32, color: Rgba);

    /// Restrict subsequent drawing to `rect` (`None` clears the clip).
    fn set_clip(&mut self, _rect: Option<Rect>) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder {
        fills: Vec<(Rect, Rgba)>,
        clip: Option<Rect>,
    }

    impl DrawSurface for Recorder {
        fn fill_rect(&mut self, rect: Rect, color: Rgba) {
            self.fills.push((rect, color));
        }

        fn stroke_rect(&mut self, _rect: Rect, _color: Rgba, _width: i32) {}

        fn text_size(&self, text: &str) -> Size {
            Size::new(text.len() as i32 * 7, 13)
        }

        fn draw_text(&mut self, _text: &str, _x: i32, _y: i32, _color: Rgba) {}

        fn set_clip(&mut self, rect: Option<Rect>) {
            self.clip = rect;
        }
    }

    #[test]
    fn rgba_constructors() {
        assert_eq!(Rgba::rgb(1, 2, 3), Rgba::rgba(1, 2, 3, 255));
        assert!(Rgba::default().is_transparent());
    }

    #[test]
    fn surface_is_object_safe() {
        let mut recorder = Recorder::default();
        {
            let surface: &mut dyn DrawSurface = &mut recorder;
            surface.set_clip(Some(Rect::new(0, 0, 10, 10)));
            surface.fill_rect(Rect::new(1, 1, 2, 2), Rgba::rgb(96, 96, 96));
            assert_eq!(surface.text_size("abc"), Size::new(21, 13));
        }
        assert_eq!(recorder.fills.len(), 1);
        assert_eq!(recorder.clip, Some(Rect::new(0, 0, 10, 10)));
    }
}
