use crate::expr::Function;
use crate::guard::Guard;
use crate::types::{Complex, PathPoint, Viewport};
#[cfg(feature = "rayon")]
use rayon::iter::{IntoParallelRefIterator, ParallelIterator};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::iter;
///breaks pass through, everything else is evaluated and guarded
pub fn map_point(f: &Function, guard: Guard, z: PathPoint) -> PathPoint {
    z.and_then(|z| guard.clamp(f.eval(z)))
}
///index wise map_point, output has the same length and breaks as the input
pub fn map_sequence(f: &Function, guard: Guard, domain: &[PathPoint]) -> Vec<PathPoint> {
    #[cfg(feature = "rayon")]
    let points = domain.par_iter();
    #[cfg(not(feature = "rayon"))]
    let points = domain.iter();
    points.map(|z| map_point(f, guard, *z)).collect()
}
///reference gridlines of the source plane, centered on the origin and
///covering the viewport, regenerated instead of mutated when the view changes
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Grid {
    ///distance between neighbouring lines in plane units
    pub pitch: f64,
    ///samples per cell along a line
    pub steps: usize,
    ///lines on each side of the imaginary axis
    pub columns: i64,
    ///lines on each side of the real axis
    pub rows: i64,
}
impl Grid {
    ///pitch_px is the on screen distance between lines, so the line count only
    ///depends on the viewport and the plane distance only on the span
    pub fn new(viewport: Viewport, span: f64, pitch_px: f64, steps: usize) -> Self {
        Self {
            pitch: pitch_px / viewport.pixels_per_unit(span),
            steps: steps.max(1),
            columns: ((viewport.width / 2.0 / pitch_px).floor() as i64).saturating_add(1),
            rows: ((viewport.height / 2.0 / pitch_px).floor() as i64).saturating_add(1),
        }
    }
    ///half the width and height covered by the lines
    pub fn extent(&self) -> (f64, f64) {
        (
            self.columns as f64 * self.pitch,
            self.rows as f64 * self.pitch,
        )
    }
    ///vertical lines left to right, then horizontal lines bottom to top,
    ///every line starts with a break, calling again restarts the sequence
    pub fn samples(self) -> impl Iterator<Item = PathPoint> {
        let Grid {
            pitch,
            steps,
            columns,
            rows,
        } = self;
        let steps = steps as i64;
        let fine = pitch / steps as f64;
        let vertical = (-columns..=columns).flat_map(move |x| {
            iter::once(None).chain(
                (-rows * steps..=rows * steps)
                    .map(move |y| Some(Complex::new(x as f64 * pitch, y as f64 * fine))),
            )
        });
        let horizontal = (-rows..=rows).flat_map(move |y| {
            iter::once(None).chain(
                (-columns * steps..=columns * steps)
                    .map(move |x| Some(Complex::new(x as f64 * fine, y as f64 * pitch))),
            )
        });
        vertical.chain(horizontal)
    }
    pub fn len(&self) -> usize {
        let steps = self.steps as i64;
        let vertical = (2 * self.columns + 1) * (2 * self.rows * steps + 2);
        let horizontal = (2 * self.rows + 1) * (2 * self.columns * steps + 2);
        (vertical + horizontal) as usize
    }
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
    ///end points of every line, for drawing the straight source grid
    pub fn lines(self) -> impl Iterator<Item = (Complex, Complex)> {
        let (w, h) = self.extent();
        let pitch = self.pitch;
        let vertical = (-self.columns..=self.columns).map(move |x| {
            let x = x as f64 * pitch;
            (Complex::new(x, -h), Complex::new(x, h))
        });
        let horizontal = (-self.rows..=self.rows).map(move |y| {
            let y = y as f64 * pitch;
            (Complex::new(-w, y), Complex::new(w, y))
        });
        vertical.chain(horizontal)
    }
}
