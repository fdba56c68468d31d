//! The drawing-surface seam.
//!
//! [`Surface`] is the subset of the Canvas2D API the renderer talks to. The
//! browser backend forwards each call to `CanvasRenderingContext2d`; the
//! Vello backend and the recording fake emulate its semantics (path points
//! are mapped through the current transform when they are added, strokes use
//! the transform active at stroke time).

use kurbo::Affine;
use std::ops::{Deref, DerefMut};

pub trait Surface {
    /// Replace the current transform (not compose with it).
    fn set_transform(&mut self, transform: Affine);

    /// Push the current transform and styles.
    fn save(&mut self);

    /// Pop the state pushed by the matching [`Surface::save`].
    fn restore(&mut self);

    fn translate(&mut self, x: f64, y: f64);
    fn rotate(&mut self, angle: f64);
    fn scale(&mut self, sx: f64, sy: f64);

    /// Erase a rectangle given in current (transformed) coordinates.
    fn clear_rect(&mut self, x: f64, y: f64, width: f64, height: f64);

    fn begin_path(&mut self);
    fn move_to(&mut self, x: f64, y: f64);
    fn line_to(&mut self, x: f64, y: f64);
    /// Arc around `(cx, cy)` from `start` to `end` radians, in the direction
    /// of increasing angle.
    fn arc(&mut self, cx: f64, cy: f64, radius: f64, start: f64, end: f64);
    fn close_path(&mut self);

    /// CSS color string, passed through verbatim.
    fn set_stroke_style(&mut self, color: &str);
    fn set_fill_style(&mut self, color: &str);
    fn set_line_width(&mut self, width: f64);

    fn stroke(&mut self);
    fn fill(&mut self);

    /// Save the state now and restore it when the guard drops.
    fn saved(&mut self) -> SavedState<'_, Self>
    where
        Self: Sized,
    {
        SavedState::new(self)
    }
}

/// Scoped save/restore around a [`Surface`].
///
/// Derefs to the surface so drawing calls go through the guard; the
/// matching `restore` runs on every exit path, including unwinding.
pub struct SavedState<'a, S: Surface> {
    surface: &'a mut S,
}

impl<'a, S: Surface> SavedState<'a, S> {
    pub fn new(surface: &'a mut S) -> Self {
        surface.save();
        Self { surface }
    }
}

impl<S: Surface> Deref for SavedState<'_, S> {
    type Target = S;

    fn deref(&self) -> &S {
        self.surface
    }
}

impl<S: Surface> DerefMut for SavedState<'_, S> {
    fn deref_mut(&mut self) -> &mut S {
        self.surface
    }
}

impl<S: Surface> Drop for SavedState<'_, S> {
    fn drop(&mut self) {
        self.surface.restore();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{Op, RecordingSurface};

    #[test]
    fn guard_restores_on_drop() {
        let mut surface = RecordingSurface::new(100, 100);
        {
            let mut state = surface.saved();
            state.translate(10.0, 20.0);
            state.rotate(1.0);
        }
        assert_eq!(surface.transform(), Affine::IDENTITY);
        assert_eq!(surface.ops().first(), Some(&Op::Save));
        assert_eq!(surface.ops().last(), Some(&Op::Restore));
    }

    #[test]
    fn guard_restores_while_unwinding() {
        let mut surface = RecordingSurface::new(100, 100);
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let mut state = surface.saved();
            state.scale(3.0, 3.0);
            panic!("boom");
        }));
        assert!(result.is_err());
        assert_eq!(surface.transform(), Affine::IDENTITY);
        assert_eq!(surface.depth(), 0);
    }
}
