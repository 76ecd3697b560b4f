use crate::config::Config;
use crate::diff::Derivative;
use crate::error::{DerivativeFault, ParseFault};
use crate::expr::Function;
use crate::guard::Guard;
use crate::sample::Grid;
use crate::schedule::Debounce;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::ops::Sub;
pub type Complex = num_complex::Complex64;
///one entry of a path, None is a pen lift and is never connected to its neighbors
pub type PathPoint = Option<Complex>;
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(PartialEq, Eq, Debug, Clone, Copy)]
pub enum Plane {
    ///the plane containing z
    Source,
    ///the plane containing f(z)
    Destination,
}
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(PartialEq, Eq, Debug, Clone, Copy)]
pub enum Zoom {
    In,
    Out,
}
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(PartialEq, Eq, Debug, Clone, Copy, Default)]
pub enum Status {
    #[default]
    Idle,
    ///last submitted expression failed to parse, previous function still active
    FaultedRecompile,
}
///narrowest span zooming in can reach
pub const MIN_SPAN: f64 = 1e-9;
///widest span zooming out can reach
pub const MAX_SPAN: f64 = 1e9;
///largest accepted canvas side in pixels
pub const MAX_PIXELS: f64 = 16384.0;
///visual span of each plane, in plane units across the viewport width
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Copy, Debug, Clone, PartialEq)]
pub struct ViewScale {
    pub source: f64,
    pub destination: f64,
}
impl ViewScale {
    pub fn new(source: f64, destination: f64) -> Self {
        Self {
            source,
            destination,
        }
    }
    pub fn get(&self, plane: Plane) -> f64 {
        match plane {
            Plane::Source => self.source,
            Plane::Destination => self.destination,
        }
    }
    ///zooming in shrinks the span, factor must be positive, the span stays
    ///within MIN_SPAN..=MAX_SPAN
    pub fn zoom(&mut self, plane: Plane, zoom: Zoom, factor: f64) {
        let span = match plane {
            Plane::Source => &mut self.source,
            Plane::Destination => &mut self.destination,
        };
        *span = match zoom {
            Zoom::In => *span / factor,
            Zoom::Out => *span * factor,
        }
        .clamp(MIN_SPAN, MAX_SPAN);
    }
}
///pixel position, y grows downwards
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Copy, Debug, Clone, PartialEq, Default)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}
impl Vec2 {
    pub fn norm(&self) -> f64 {
        self.y.hypot(self.x)
    }
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}
impl Sub for Vec2 {
    type Output = Vec2;
    fn sub(self, rhs: Self) -> Self::Output {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}
///pixel size of a canvas, the plane origin sits at its center
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Copy, Debug, Clone, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}
impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
    ///both sides within 0 < side <= MAX_PIXELS
    pub fn is_valid(&self) -> bool {
        let side = |v: f64| v > 0.0 && v <= MAX_PIXELS;
        side(self.width) && side(self.height)
    }
    ///pixels per plane unit
    pub fn pixels_per_unit(&self, span: f64) -> f64 {
        self.width / span
    }
    ///converts a position relative to the top left corner into a plane value
    pub fn to_complex(&self, span: f64, pos: Vec2) -> Complex {
        let s = self.pixels_per_unit(span);
        Complex::new(
            (pos.x - self.width / 2.0) / s,
            (pos.y - self.height / 2.0) / -s,
        )
    }
    pub fn to_pixel(&self, span: f64, z: Complex) -> Vec2 {
        let s = self.pixels_per_unit(span);
        Vec2::new(z.re * s + self.width / 2.0, self.height / 2.0 - z.im * s)
    }
}
///f(z) together with the images of a unit step along +1 and +i
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Copy, Debug, Clone, PartialEq)]
pub struct Tangent {
    pub value: Complex,
    pub dx: Complex,
    pub dy: Complex,
}
impl Tangent {
    pub fn horizontal(&self) -> Complex {
        self.value + self.dx
    }
    pub fn vertical(&self) -> Complex {
        self.value + self.dy
    }
}
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Copy, Debug, Clone, PartialEq)]
pub struct PointerSample {
    pub z: Complex,
    pub tangent: Tangent,
}
impl PointerSample {
    pub fn value(&self) -> Complex {
        self.tangent.value
    }
    ///ends of the +1 and +i unit steps in the source plane
    pub fn source_probes(&self) -> (Complex, Complex) {
        (self.z + 1.0, self.z + Complex::i())
    }
    ///where f's linear approximation sends the source probes
    pub fn image_probes(&self) -> (Complex, Complex) {
        (self.tangent.horizontal(), self.tangent.vertical())
    }
}
///the live view, every mutation goes through the methods in lib.rs and input.rs
#[derive(Debug)]
pub struct ViewState {
    pub(crate) config: Config,
    pub(crate) guard: Guard,
    ///source text of the active function
    pub(crate) source: String,
    pub(crate) function: Function,
    pub(crate) derivative: Derivative,
    ///last rejected expression, cleared by the next successful submit
    pub(crate) fault: Option<ParseFault>,
    pub(crate) domain_path: Vec<PathPoint>,
    pub(crate) image_path: Vec<PathPoint>,
    pub(crate) pointer_z: Option<Complex>,
    pub(crate) pointer: Option<PointerSample>,
    pub(crate) scale: ViewScale,
    pub(crate) viewport: Viewport,
    ///grid the current grid_image was sampled from
    pub(crate) grid: Grid,
    pub(crate) grid_image: Vec<PathPoint>,
    pub(crate) recompute: Debounce,
    pub(crate) pen_down: bool,
}
///borrowed view of the state between two operations
#[cfg_attr(feature = "serde", derive(Serialize))]
#[derive(Clone, Copy, Debug)]
pub struct Snapshot<'a> {
    pub source: &'a str,
    pub status: Status,
    pub fault: Option<&'a ParseFault>,
    pub derivative_note: Option<&'a DerivativeFault>,
    pub scale: ViewScale,
    pub viewport: Viewport,
    pub domain_path: &'a [PathPoint],
    pub image_path: &'a [PathPoint],
    pub pointer: Option<&'a PointerSample>,
    pub grid: Grid,
    pub grid_image: &'a [PathPoint],
    ///a grid recompute is waiting on the debounce
    pub pending: bool,
}
#[cfg(test)]
mod tests {
    use super::*;
    #[test]
    fn zoom_in_then_out_restores_span() {
        let mut scale = ViewScale::new(5.0, 50.0);
        scale.zoom(Plane::Source, Zoom::In, 1.3);
        assert!((scale.source - 5.0 / 1.3).abs() < 1e-12);
        assert_eq!(scale.destination, 50.0);
        scale.zoom(Plane::Source, Zoom::Out, 1.3);
        assert!((scale.source - 5.0).abs() < 1e-12);
        scale.zoom(Plane::Destination, Zoom::Out, 1.3);
        assert!((scale.get(Plane::Destination) - 65.0).abs() < 1e-9);
    }
    #[test]
    fn zoom_stays_finite_and_positive() {
        let mut scale = ViewScale::new(5.0, 50.0);
        for _ in 0..3000 {
            scale.zoom(Plane::Source, Zoom::Out, 1.3);
            scale.zoom(Plane::Destination, Zoom::In, 1.3);
        }
        assert_eq!(scale.source, MAX_SPAN);
        assert_eq!(scale.destination, MIN_SPAN);
        scale.zoom(Plane::Destination, Zoom::Out, 1.3);
        assert!((scale.destination - MIN_SPAN * 1.3).abs() < 1e-20);
    }
    #[test]
    fn viewport_bounds() {
        assert!(Viewport::new(600.0, 600.0).is_valid());
        assert!(Viewport::new(MAX_PIXELS, 1.0).is_valid());
        assert!(!Viewport::new(0.0, 100.0).is_valid());
        assert!(!Viewport::new(1e300, 100.0).is_valid());
        assert!(!Viewport::new(f64::INFINITY, 100.0).is_valid());
        assert!(!Viewport::new(100.0, f64::NAN).is_valid());
    }
    #[test]
    fn viewport_maps_center_to_origin() {
        let viewport = Viewport::new(400.0, 300.0);
        let z = viewport.to_complex(4.0, Vec2::new(200.0, 150.0));
        assert_eq!(z, Complex::new(0.0, 0.0));
        let z = viewport.to_complex(4.0, Vec2::new(300.0, 50.0));
        assert_eq!(z, Complex::new(1.0, 1.0));
        let back = viewport.to_pixel(4.0, z);
        assert!((back - Vec2::new(300.0, 50.0)).norm() < 1e-9);
    }
    #[test]
    fn unit_steps_offset_from_the_sample() {
        let sample = PointerSample {
            z: Complex::new(1.0, 0.0),
            tangent: Tangent {
                value: Complex::new(1.0, 0.0),
                dx: Complex::new(2.0, 0.0),
                dy: Complex::new(0.0, 2.0),
            },
        };
        assert_eq!(
            sample.source_probes(),
            (Complex::new(2.0, 0.0), Complex::new(1.0, 1.0))
        );
        assert_eq!(
            sample.image_probes(),
            (Complex::new(3.0, 0.0), Complex::new(1.0, 2.0))
        );
    }
}
