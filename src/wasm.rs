//! WebAssembly bindings so a browser canvas can drive a [`ViewState`].
//!
//! Paths cross the boundary as flat `[re, im, re, im, ...]` arrays, a break
//! is a `NaN, NaN` pair.
use crate::types::{Complex, PathPoint, Plane, Vec2, ViewState, Zoom};
use crate::{Config, Preset};
use wasm_bindgen::prelude::*;
fn flatten(path: &[PathPoint]) -> Vec<f64> {
    path.iter()
        .flat_map(|z| match z {
            Some(z) => [z.re, z.im],
            None => [f64::NAN; 2],
        })
        .collect()
}
fn js_error(e: impl ToString) -> JsValue {
    js_sys::Error::new(&e.to_string()).into()
}
#[wasm_bindgen]
pub struct View {
    state: ViewState,
}
impl View {
    fn at(&self, x: f64, y: f64) -> Complex {
        self.state.to_source(Vec2::new(x, y))
    }
}
#[wasm_bindgen]
impl View {
    #[wasm_bindgen(constructor)]
    pub fn new(width: f64, height: f64) -> Result<View, JsValue> {
        let mut state = ViewState::new(Config::default()).map_err(js_error)?;
        state.set_viewport(width, height);
        state.flush();
        Ok(View { state })
    }
    pub fn submit(&mut self, text: &str) -> Result<(), JsValue> {
        self.state.submit_expression(text).map_err(js_error)
    }
    ///x, y are canvas pixels from the top left corner
    pub fn press(&mut self, x: f64, y: f64) {
        let z = self.at(x, y);
        self.state.press(z);
    }
    pub fn motion(&mut self, x: f64, y: f64, held: bool) {
        let z = self.at(x, y);
        self.state.motion(z, held);
    }
    pub fn leave(&mut self, held: bool) {
        self.state.leave(held);
    }
    pub fn release(&mut self) {
        self.state.release();
    }
    pub fn clear(&mut self) {
        self.state.clear_path();
    }
    pub fn preset(&mut self, name: &str) -> Result<(), JsValue> {
        let preset: Preset = name.parse().map_err(js_error)?;
        self.state.load_preset(preset);
        Ok(())
    }
    pub fn zoom(&mut self, destination: bool, out: bool) {
        let plane = if destination {
            Plane::Destination
        } else {
            Plane::Source
        };
        self.state
            .set_scale(plane, if out { Zoom::Out } else { Zoom::In });
    }
    pub fn resize(&mut self, width: f64, height: f64) {
        self.state.set_viewport(width, height);
    }
    ///call once per animation frame, true when the grid changed
    pub fn update(&mut self) -> bool {
        self.state.update()
    }
    pub fn domain_path(&self) -> Vec<f64> {
        flatten(self.state.domain_path())
    }
    pub fn image_path(&self) -> Vec<f64> {
        flatten(self.state.image_path())
    }
    pub fn grid(&self) -> Vec<f64> {
        let samples: Vec<PathPoint> = self.state.grid().samples().collect();
        flatten(&samples)
    }
    pub fn grid_image(&self) -> Vec<f64> {
        flatten(self.state.grid_image())
    }
    ///z, f(z), z+1, z+i and their images under the linear approximation,
    ///empty when there is no sample
    pub fn pointer(&self) -> Vec<f64> {
        let Some(p) = self.state.pointer() else {
            return Vec::new();
        };
        let (sx, sy) = p.source_probes();
        let (ix, iy) = p.image_probes();
        flatten(&[Some(p.z), Some(p.value()), Some(sx), Some(sy), Some(ix), Some(iy)])
    }
    ///source and destination span
    pub fn scale(&self) -> Vec<f64> {
        let scale = self.state.scale();
        vec![scale.source, scale.destination]
    }
    pub fn source(&self) -> String {
        self.state.source().to_string()
    }
    pub fn fault(&self) -> Option<String> {
        self.state.fault().map(ToString::to_string)
    }
    pub fn note(&self) -> Option<String> {
        self.state.derivative_note().map(ToString::to_string)
    }
    pub fn derivative(&self) -> Option<String> {
        self.state.derivative_text()
    }
}
