use crate::error::Error;
use crate::types::{Complex, PathPoint};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::f64::consts::{FRAC_PI_6, TAU};
use std::str::FromStr;
///programmatic shapes that replace the drawn path
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(PartialEq, Eq, Debug, Clone, Copy)]
pub enum Preset {
    ///concentric rings filling a disk, plus a dot at the center
    Disk,
    ///a disk with a wedge cut out, drawn as rays from the center and its outline
    Pacman,
}
///half the opening angle of the pacman mouth
const MOUTH: f64 = FRAC_PI_6;
fn circle(r: f64, from: f64, to: f64, segments: usize) -> impl Iterator<Item = PathPoint> {
    (0..=segments).map(move |j| {
        let t = from + (to - from) * j as f64 / segments as f64;
        Some(Complex::from_polar(r, t))
    })
}
impl Preset {
    ///domain points with breaks between strokes, ending with a break
    pub fn points(self, radius: f64, rings: usize, segments: usize) -> Vec<PathPoint> {
        let center = Complex::new(0.0, 0.0);
        let mut path = Vec::new();
        match self {
            Preset::Disk => {
                path.extend([Some(center), Some(center), None]);
                for k in 1..=rings {
                    let r = radius * k as f64 / rings as f64;
                    path.extend(circle(r, 0.0, TAU, segments));
                    path.push(None);
                }
            }
            Preset::Pacman => {
                let rays = (segments / 4).max(2);
                for j in 0..=rays {
                    let t = MOUTH + (TAU - 2.0 * MOUTH) * j as f64 / rays as f64;
                    path.extend((0..=rings).map(|k| {
                        Some(Complex::from_polar(radius * k as f64 / rings as f64, t))
                    }));
                    path.push(None);
                }
                path.push(Some(center));
                path.extend(circle(radius, MOUTH, TAU - MOUTH, segments));
                path.extend([Some(center), None]);
            }
        }
        path
    }
}
impl FromStr for Preset {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "disk" | "circle" => Ok(Preset::Disk),
            "pacman" | "sector" => Ok(Preset::Pacman),
            _ => Err(Error::UnknownPreset(s.to_string())),
        }
    }
}
#[cfg(test)]
mod tests {
    use super::*;
    #[test]
    fn disk_rings_lie_on_their_radius() {
        let path = Preset::Disk.points(2.0, 4, 32);
        assert_eq!(path.len(), 3 + 4 * (33 + 1));
        assert_eq!(path.last(), Some(&None));
        let outer: Vec<Complex> = path[path.len() - 34..path.len() - 1]
            .iter()
            .flatten()
            .copied()
            .collect();
        assert_eq!(outer.len(), 33);
        assert!(outer.iter().all(|z| (z.norm() - 2.0).abs() < 1e-12));
        assert!((outer[0] - outer[32]).norm() < 1e-12);
    }
    #[test]
    fn pacman_avoids_the_mouth() {
        let path = Preset::Pacman.points(1.0, 4, 32);
        for z in path.iter().flatten() {
            assert!(z.norm() <= 1.0 + 1e-12);
            if z.norm() > 1e-9 {
                assert!(z.arg().abs() >= MOUTH - 1e-9);
            }
        }
        assert_eq!(path.last(), Some(&None));
    }
    #[test]
    fn parses_names() {
        assert_eq!("disk".parse::<Preset>().unwrap(), Preset::Disk);
        assert_eq!("Pacman".parse::<Preset>().unwrap(), Preset::Pacman);
        assert!("square".parse::<Preset>().is_err());
    }
}
