//! Fixed Network Weights
//!
//! Two dense layers, 6 -> 8 -> 2. Values are literal constants; changing any
//! of them changes every recommendation.
//!
//! Layout is one row per *receiving* unit:
//! - `HIDDEN_WEIGHTS[j][i]` connects input feature `i` to hidden unit `j`
//!   (i.e. W1 is the 6×8 transpose of this table)
//! - `OUTPUT_WEIGHTS[k][j]` connects hidden unit `j` to output unit `k`
//!   (W2 is the 8×2 transpose)

use crate::features::FEATURE_COUNT;

pub const HIDDEN_UNITS: usize = 8;
pub const OUTPUT_UNITS: usize = 2;

pub static HIDDEN_WEIGHTS: [[f32; FEATURE_COUNT]; HIDDEN_UNITS] = [
    [ 0.06,  0.10,  0.02, -0.03, 0.12,  0.08],
    [-0.04,  0.07,  0.05,  0.06, 0.10, -0.02],
    [ 0.09, -0.08,  0.03,  0.02, 0.05,  0.04],
    [ 0.03,  0.01,  0.12, -0.04, 0.08,  0.06],
    [ 0.02,  0.05, -0.03,  0.07, 0.09,  0.01],
    [ 0.04,  0.06,  0.02,  0.05, 0.11,  0.03],
    [-0.02,  0.03,  0.08,  0.04, 0.07,  0.02],
    [ 0.05,  0.02,  0.06,  0.03, 0.10,  0.05],
];

pub static HIDDEN_BIAS: [f32; HIDDEN_UNITS] = [0.02, -0.01, 0.03, 0.00, 0.02, 0.01, -0.02, 0.01];

pub static OUTPUT_WEIGHTS: [[f32; HIDDEN_UNITS]; OUTPUT_UNITS] = [
    [0.18, -0.06, 0.07,  0.09, 0.05,  0.04, 0.02, 0.03],  // irrigation
    [0.12,  0.08, 0.06, -0.05, 0.07, -0.02, 0.04, 0.05],  // fertilization
];

pub static OUTPUT_BIAS: [f32; OUTPUT_UNITS] = [0.01, 0.02];

/// Borrowed view of a full weight set
#[derive(Debug, Clone, Copy)]
pub struct NetworkWeights {
    pub hidden: &'static [[f32; FEATURE_COUNT]; HIDDEN_UNITS],
    pub hidden_bias: &'static [f32; HIDDEN_UNITS],
    pub output: &'static [[f32; HIDDEN_UNITS]; OUTPUT_UNITS],
    pub output_bias: &'static [f32; OUTPUT_UNITS],
}

impl NetworkWeights {
    /// The fixed advisory network
    pub fn fixed() -> Self {
        Self {
            hidden: &HIDDEN_WEIGHTS,
            hidden_bias: &HIDDEN_BIAS,
            output: &OUTPUT_WEIGHTS,
            output_bias: &OUTPUT_BIAS,
        }
    }

    /// Iterator over every parameter, for validation
    pub fn parameters(&self) -> impl Iterator<Item = f32> + '_ {
        self.hidden
            .iter()
            .flatten()
            .chain(self.hidden_bias.iter())
            .chain(self.output.iter().flatten())
            .chain(self.output_bias.iter())
            .copied()
    }
}

impl Default for NetworkWeights {
    fn default() -> Self {
        Self::fixed()
    }
}
