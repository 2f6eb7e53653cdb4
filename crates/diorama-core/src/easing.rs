//! Easing curves for camera moves and fades.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Ease {
    Linear,
    /// Quadratic ease-out; the default for every move.
    #[default]
    Power1Out,
    Power1In,
    Power1InOut,
    /// Cubic ease-out.
    Power2Out,
}

impl Ease {
    /// Input is clamped to [0, 1]; output hits 0 and 1 at the ends.
    #[inline]
    pub fn evaluate(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Ease::Linear => t,
            Ease::Power1Out => {
                let omt = 1.0 - t;
                1.0 - omt * omt
            }
            Ease::Power1In => t * t,
            Ease::Power1InOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    let omt = 1.0 - t;
                    1.0 - 2.0 * omt * omt
                }
            }
            Ease::Power2Out => {
                let omt = 1.0 - t;
                1.0 - omt * omt * omt
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Ease; 5] = [
        Ease::Linear,
        Ease::Power1Out,
        Ease::Power1In,
        Ease::Power1InOut,
        Ease::Power2Out,
    ];

    #[test]
    fn endpoints_are_fixed() {
        for e in ALL {
            assert_eq!(e.evaluate(0.0), 0.0, "{e:?}");
            assert!((e.evaluate(1.0) - 1.0).abs() < 1e-6, "{e:?}");
        }
    }

    #[test]
    fn power1_out_front_loads_progress() {
        assert_eq!(Ease::Power1Out.evaluate(0.5), 0.75);
        assert_eq!(Ease::Power1Out.evaluate(-1.0), 0.0);
        assert_eq!(Ease::Power1Out.evaluate(2.0), 1.0);
    }
}
