use crate::error::EvalFault;
use crate::types::Complex;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
///keeps evaluated values drawable, a single astronomically large coordinate
///can make a renderer drop the whole connected path
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Guard {
    ///largest squared magnitude passed through unchanged
    pub max_norm_sqr: f64,
}
impl Guard {
    pub fn new(max_norm_sqr: f64) -> Self {
        Self { max_norm_sqr }
    }
    ///faults and non finite values become path breaks, outliers are pulled
    ///back onto the circle of squared radius max_norm_sqr keeping their angle
    pub fn clamp(&self, fz: Result<Complex, EvalFault>) -> Option<Complex> {
        let fz = fz.ok().filter(|w| w.is_finite())?;
        let n = fz.norm_sqr();
        if n <= self.max_norm_sqr {
            return Some(fz);
        }
        //norm_sqr may overflow for finite inputs, normalize by the larger part first
        let unit = fz.unscale(fz.re.abs().max(fz.im.abs()));
        Some(unit.scale(self.max_norm_sqr.sqrt() / unit.norm()))
    }
}
