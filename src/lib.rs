//! Maps a reference grid and freehand paths through a user supplied complex
//! function f(z), and samples its local linear approximation at the pointer.
//!
//! [`ViewState`] owns everything and is only changed through its methods,
//! renderers read a borrowed [`Snapshot`] between operations.
pub mod config;
pub mod diff;
pub mod error;
pub mod expr;
pub mod guard;
mod input;
pub mod preset;
pub mod sample;
pub mod schedule;
pub mod types;
#[cfg(feature = "wasm")]
pub mod wasm;
pub use crate::config::Config;
pub use crate::diff::Derivative;
pub use crate::error::{DerivativeFault, Error, EvalFault, ParseFault, Result};
pub use crate::expr::{Function, compile};
pub use crate::guard::Guard;
pub use crate::preset::Preset;
pub use crate::sample::{Grid, map_point, map_sequence};
use crate::schedule::Debounce;
pub use crate::types::*;
impl ViewState {
    ///compiles the configured expression and samples the initial grid
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        let function = Function::compile(&config.expression)?;
        let derivative = Derivative::new(&function, config.derivative_step);
        let grid = Grid::new(
            config.viewport,
            config.source_span,
            config.grid_pitch,
            config.grid_steps,
        );
        let mut view = ViewState {
            guard: Guard::new(config.max_norm_sqr),
            source: config.expression.clone(),
            function,
            derivative,
            fault: None,
            domain_path: Vec::new(),
            image_path: Vec::new(),
            pointer_z: None,
            pointer: None,
            scale: ViewScale::new(config.source_span, config.destination_span),
            viewport: config.viewport,
            grid,
            grid_image: Vec::new(),
            recompute: Debounce::new(config.debounce),
            pen_down: false,
            config,
        };
        view.recompute_grid();
        Ok(view)
    }
    ///replaces function and derivative if text compiles, otherwise keeps
    ///both and remembers the fault for display
    pub fn submit_expression(&mut self, text: &str) -> std::result::Result<(), ParseFault> {
        if text == self.source {
            self.fault = None;
            return Ok(());
        }
        let function = match Function::compile(text) {
            Ok(function) => function,
            Err(fault) => {
                tracing::warn!(expression = text, %fault, "rejected expression");
                self.fault = Some(fault.clone());
                return Err(fault);
            }
        };
        let derivative = Derivative::new(&function, self.config.derivative_step);
        tracing::debug!(
            expression = text,
            analytic = derivative.is_analytic(),
            "recompiled"
        );
        self.source = text.to_string();
        self.function = function;
        self.derivative = derivative;
        self.fault = None;
        self.image_path = map_sequence(&self.function, self.guard, &self.domain_path);
        self.set_pointer(self.pointer_z);
        self.recompute_grid();
        Ok(())
    }
    ///appends to both paths, None lifts the pen
    pub fn append_point(&mut self, z: PathPoint) {
        self.domain_path.push(z);
        self.image_path.push(map_point(&self.function, self.guard, z));
    }
    pub fn clear_path(&mut self) {
        self.domain_path.clear();
        self.image_path.clear();
    }
    ///replaces the path with a generated shape
    pub fn load_preset(&mut self, preset: Preset) {
        self.clear_path();
        let points = preset.points(
            self.config.preset_radius,
            self.config.preset_rings,
            self.config.preset_segments,
        );
        self.domain_path.reserve(points.len());
        self.image_path.reserve(points.len());
        for z in points {
            self.append_point(z);
        }
    }
    ///one zoom step, the grid is resampled once the changes settle
    pub fn set_scale(&mut self, plane: Plane, zoom: Zoom) {
        self.scale.zoom(plane, zoom, self.config.zoom_factor);
        self.recompute.request(schedule::now());
    }
    ///None clears the sample, as does a point where f or f' is undefined
    pub fn set_pointer(&mut self, z: Option<Complex>) {
        self.pointer_z = z;
        self.pointer = z.and_then(|z| {
            self.derivative
                .evaluate_tangent(&self.function, self.guard, z)
                .map(|tangent| PointerSample { z, tangent })
        });
    }
    ///resize of the source canvas, degenerate or oversized canvases are ignored
    pub fn set_viewport(&mut self, width: f64, height: f64) {
        let viewport = Viewport::new(width, height);
        if !viewport.is_valid() {
            tracing::debug!(width, height, "ignoring invalid viewport");
            return;
        }
        if viewport != self.viewport {
            self.viewport = viewport;
            self.recompute.request(schedule::now());
        }
    }
    ///runs the pending grid recompute if the debounce has settled,
    ///meant to be called once per frame before reading a snapshot
    pub fn update(&mut self) -> bool {
        if self.recompute.poll(schedule::now()) {
            self.recompute_grid();
            true
        } else {
            false
        }
    }
    ///runs the pending grid recompute immediately
    pub fn flush(&mut self) -> bool {
        if self.recompute.take() {
            self.recompute_grid();
            true
        } else {
            false
        }
    }
    fn recompute_grid(&mut self) {
        self.recompute.cancel();
        self.grid = Grid::new(
            self.viewport,
            self.scale.source,
            self.config.grid_pitch,
            self.config.grid_steps,
        );
        let samples: Vec<PathPoint> = self.grid.samples().collect();
        self.grid_image = map_sequence(&self.function, self.guard, &samples);
        tracing::debug!(
            samples = samples.len(),
            pitch = self.grid.pitch,
            "resampled grid"
        );
    }
    pub fn status(&self) -> Status {
        if self.fault.is_some() {
            Status::FaultedRecompile
        } else {
            Status::Idle
        }
    }
    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            source: &self.source,
            status: self.status(),
            fault: self.fault.as_ref(),
            derivative_note: self.derivative.note(),
            scale: self.scale,
            viewport: self.viewport,
            domain_path: &self.domain_path,
            image_path: &self.image_path,
            pointer: self.pointer.as_ref(),
            grid: self.grid,
            grid_image: &self.grid_image,
            pending: self.recompute.is_pending(),
        }
    }
    ///text of the active function
    pub fn source(&self) -> &str {
        &self.source
    }
    pub fn function(&self) -> &Function {
        &self.function
    }
    pub fn derivative(&self) -> &Derivative {
        &self.derivative
    }
    ///simplified df/dz when it has a closed form
    pub fn derivative_text(&self) -> Option<String> {
        match &self.derivative {
            Derivative::Analytic(df) => Some(df.to_string()),
            Derivative::Numeric { .. } => None,
        }
    }
    pub fn derivative_note(&self) -> Option<&DerivativeFault> {
        self.derivative.note()
    }
    pub fn fault(&self) -> Option<&ParseFault> {
        self.fault.as_ref()
    }
    pub fn domain_path(&self) -> &[PathPoint] {
        &self.domain_path
    }
    pub fn image_path(&self) -> &[PathPoint] {
        &self.image_path
    }
    pub fn pointer(&self) -> Option<&PointerSample> {
        self.pointer.as_ref()
    }
    pub fn scale(&self) -> ViewScale {
        self.scale
    }
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }
    pub fn grid(&self) -> Grid {
        self.grid
    }
    pub fn grid_image(&self) -> &[PathPoint] {
        &self.grid_image
    }
    pub fn config(&self) -> &Config {
        &self.config
    }
    ///source plane value under a pixel of the source canvas
    pub fn to_source(&self, pos: Vec2) -> Complex {
        self.viewport.to_complex(self.scale.source, pos)
    }
}
#[cfg(test)]
mod tests {
    use super::*;
    fn view(expression: &str) -> ViewState {
        ViewState::new(Config {
            expression: expression.to_string(),
            debounce: std::time::Duration::ZERO,
            ..Default::default()
        })
        .unwrap()
    }
    fn c(re: f64, im: f64) -> Complex {
        Complex::new(re, im)
    }
    #[test]
    fn starts_idle_with_sampled_grid() {
        let v = view("e^z");
        assert_eq!(v.status(), Status::Idle);
        assert_eq!(v.grid_image().len(), v.grid().len());
        assert!(v.derivative().is_analytic());
        assert!(v.domain_path().is_empty());
    }
    #[test]
    fn rejects_invalid_startup_expression() {
        let err = ViewState::new(Config {
            expression: "z +".to_string(),
            ..Default::default()
        })
        .unwrap_err();
        assert_eq!(err, Error::Parse(ParseFault::UnexpectedEnd));
    }
    #[test]
    fn failed_submit_keeps_everything() {
        let mut v = view("z^2");
        v.append_point(Some(c(2.0, 0.0)));
        assert_eq!(v.submit_expression("z^"), Err(ParseFault::UnexpectedEnd));
        assert_eq!(v.status(), Status::FaultedRecompile);
        assert_eq!(v.source(), "z^2");
        assert_eq!(v.image_path(), &[Some(c(4.0, 0.0))]);
        v.append_point(Some(c(3.0, 0.0)));
        assert_eq!(v.image_path()[1], Some(c(9.0, 0.0)));
        assert_eq!(v.submit_expression("z^2"), Ok(()));
        assert_eq!(v.status(), Status::Idle);
    }
    #[test]
    fn submit_recomputes_path_grid_and_pointer() {
        let mut v = view("z^2");
        v.append_point(Some(c(2.0, 0.0)));
        v.append_point(None);
        v.set_pointer(Some(c(1.0, 0.0)));
        let before = v.grid_image().to_vec();
        v.submit_expression("z^3").unwrap();
        assert_eq!(v.image_path(), &[Some(c(8.0, 0.0)), None]);
        assert_ne!(v.grid_image(), before.as_slice());
        let p = v.pointer().unwrap();
        assert!((p.tangent.dx - c(3.0, 0.0)).norm() < 1e-12);
        assert_eq!(v.derivative_text().as_deref(), Some("3*z^2"));
    }
    #[test]
    fn non_holomorphic_notes_numeric_mode() {
        let mut v = view("z");
        v.submit_expression("abs(z)").unwrap();
        assert!(v.derivative_note().is_some());
        assert_eq!(v.derivative_text(), None);
        v.set_pointer(Some(c(1.0, 1.0)));
        assert!(v.pointer().is_some());
    }
    #[test]
    fn presets_replace_the_path() {
        let mut v = view("z");
        v.append_point(Some(c(9.0, 9.0)));
        v.load_preset(Preset::Disk);
        assert_eq!(v.domain_path(), v.image_path());
        assert_ne!(v.domain_path()[0], Some(c(9.0, 9.0)));
        v.load_preset(Preset::Pacman);
        assert_eq!(v.domain_path().len(), v.image_path().len());
        v.clear_path();
        assert!(v.domain_path().is_empty() && v.image_path().is_empty());
    }
    #[test]
    fn zoom_is_debounced_until_update() {
        let mut v = ViewState::new(Config {
            debounce: std::time::Duration::from_secs(3600),
            ..Default::default()
        })
        .unwrap();
        let pitch = v.grid().pitch;
        v.set_scale(Plane::Source, Zoom::In);
        v.set_scale(Plane::Source, Zoom::In);
        assert!(v.snapshot().pending);
        assert!(!v.update());
        assert_eq!(v.grid().pitch, pitch);
        assert!(v.flush());
        assert!(!v.flush());
        assert!((v.grid().pitch - pitch / 1.69).abs() < 1e-12);
        assert!((v.scale().source - 5.0 / 1.69).abs() < 1e-12);
    }
    #[test]
    fn resize_resamples_after_settling() {
        let mut v = view("z");
        v.set_viewport(0.0, 100.0);
        v.set_viewport(1e300, 100.0);
        v.set_viewport(100.0, f64::INFINITY);
        assert!(!v.snapshot().pending);
        assert!(!v.flush());
        assert_eq!(v.viewport(), Viewport::new(600.0, 600.0));
        v.set_viewport(1000.0, 400.0);
        assert!(v.update());
        assert_eq!(v.viewport(), Viewport::new(1000.0, 400.0));
        assert_eq!(v.grid().columns, 11);
        assert_eq!(v.grid_image().len(), v.grid().len());
    }
    #[test]
    fn pixels_map_through_the_source_scale() {
        let v = view("z");
        assert_eq!(v.to_source(Vec2::new(300.0, 300.0)), c(0.0, 0.0));
        let z = v.to_source(Vec2::new(420.0, 180.0));
        assert!((z - c(1.0, 1.0)).norm() < 1e-12);
    }
    #[cfg(feature = "serde")]
    #[test]
    fn snapshot_serializes_breaks_as_null() {
        let mut v = view("z");
        v.append_point(None);
        v.append_point(Some(c(1.0, 2.0)));
        let json = serde_json::to_value(v.snapshot()).unwrap();
        assert_eq!(json["domain_path"], serde_json::json!([null, [1.0, 2.0]]));
        assert_eq!(json["status"], "Idle");
    }
}
