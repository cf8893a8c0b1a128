//! Gray-Scott reaction-diffusion on two channels.
//!
//! Channel 0 is the substrate U, channel 1 the activator V. U is fed at rate F
//! and consumed by `U + 2V -> 3V`; V is produced by that reaction and removed
//! at rate `F + k`. Both diffuse through a 9-point Laplacian on a torus, and
//! each step is one explicit Euler update clamped to `[0, 1]`.

use cellsim_core::params::param_f64;
use cellsim_core::{
    AutomataError, Grid, GridSize, Kernel3x3, RuleSpec, StateKind, Transition, Xorshift64,
};
use serde_json::{json, Value};

use crate::continuous_values;

pub const NAME: &str = "reaction_diffusion";

const DEFAULT_FEED_RATE: f64 = 0.060;
const DEFAULT_KILL_RATE: f64 = 0.062;
const DEFAULT_DIFFUSION_U: f64 = 0.16;
const DEFAULT_DIFFUSION_V: f64 = 0.8;
const DEFAULT_DT: f64 = 1.0;
/// Spot radius in cells for [`spot_grid`].
const SPOT_RADIUS: isize = 3;
/// Spots per cell of area for [`spot_grid`].
const SPOT_DENSITY: f64 = 0.0005;

/// Isotropic 9-point Laplacian; weights sum to zero.
pub const LAPLACIAN: Kernel3x3 = Kernel3x3([
    [0.05, 0.2, 0.05],
    [0.2, -1.0, 0.2],
    [0.05, 0.2, 0.05],
]);

/// Tunable Gray-Scott constants.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GrayScottParams {
    /// Feed rate (F): how fast U is replenished.
    pub feed_rate: f64,
    /// Kill rate (k): how fast V is removed.
    pub kill_rate: f64,
    pub diffusion_u: f64,
    pub diffusion_v: f64,
    /// Euler time step.
    pub dt: f64,
}

impl Default for GrayScottParams {
    fn default() -> Self {
        Self {
            feed_rate: DEFAULT_FEED_RATE,
            kill_rate: DEFAULT_KILL_RATE,
            diffusion_u: DEFAULT_DIFFUSION_U,
            diffusion_v: DEFAULT_DIFFUSION_V,
            dt: DEFAULT_DT,
        }
    }
}

impl GrayScottParams {
    /// Reads parameters, falling back to defaults for missing keys.
    ///
    /// Negative or non-finite values are a `Configuration` error.
    pub fn from_json(params: &Value) -> Result<Self, AutomataError> {
        let parsed = Self {
            feed_rate: param_f64(params, "feed_rate", DEFAULT_FEED_RATE),
            kill_rate: param_f64(params, "kill_rate", DEFAULT_KILL_RATE),
            diffusion_u: param_f64(params, "diffusion_u", DEFAULT_DIFFUSION_U),
            diffusion_v: param_f64(params, "diffusion_v", DEFAULT_DIFFUSION_V),
            dt: param_f64(params, "dt", DEFAULT_DT),
        };
        for (name, value) in parsed.named() {
            if !value.is_finite() || value < 0.0 {
                return Err(AutomataError::Configuration(format!(
                    "{name} must be a non-negative number, got {value}"
                )));
            }
        }
        Ok(parsed)
    }

    fn named(&self) -> [(&'static str, f64); 5] {
        [
            ("feed_rate", self.feed_rate),
            ("kill_rate", self.kill_rate),
            ("diffusion_u", self.diffusion_u),
            ("diffusion_v", self.diffusion_v),
            ("dt", self.dt),
        ]
    }

    pub fn to_json(&self) -> Value {
        Value::Object(
            self.named()
                .into_iter()
                .map(|(name, value)| (name.to_string(), json!(value)))
                .collect(),
        )
    }
}

/// One Euler step of the Gray-Scott equations.
pub fn step(grid: &Grid, params: &GrayScottParams) -> Result<Grid, AutomataError> {
    let cells = continuous_values(NAME, grid, 2, 2)?;
    let lap_u = LAPLACIAN.apply_wrapped(grid, 0)?;
    let lap_v = LAPLACIAN.apply_wrapped(grid, 1)?;

    let GrayScottParams {
        feed_rate: f,
        kill_rate: k,
        diffusion_u: du,
        diffusion_v: dv,
        dt,
    } = *params;

    let mut next = Vec::with_capacity(cells.len());
    for (i, uv) in cells.chunks_exact(2).enumerate() {
        let (u, v) = (uv[0], uv[1]);
        let reaction = u * v * v;
        next.push((u + dt * (du * lap_u[i] - reaction + f * (1.0 - u))).clamp(0.0, 1.0));
        next.push((v + dt * (dv * lap_v[i] + reaction - (f + k) * v)).clamp(0.0, 1.0));
    }
    Grid::from_values(grid.size(), 2, next)
}

pub fn spec(params: GrayScottParams) -> Result<RuleSpec, AutomataError> {
    RuleSpec::new(
        NAME,
        2,
        format!(
            "Gray-Scott reaction-diffusion (F={}, k={})",
            params.feed_rate, params.kill_rate
        ),
        StateKind::Continuous { channels: 2 },
        Transition::state_only(move |grid: &Grid| step(grid, &params)),
    )
}

/// Structured start for [`step`]: U = 1 everywhere, V = 0 except for filled
/// circles of V = 1 at seeded positions.
///
/// Spot count scales with area (at least one); spots wrap across edges.
pub fn spot_grid(size: GridSize, seed: u64) -> Result<Grid, AutomataError> {
    let (h, w) = (size.height(), size.width());
    let cells = size.cell_count()?;
    let mut values: Vec<f64> = std::iter::repeat([1.0, 0.0])
        .take(cells)
        .flatten()
        .collect();

    let mut rng = Xorshift64::new(seed);
    let spot_count = ((cells as f64 * SPOT_DENSITY).ceil() as usize).max(1);
    let r = SPOT_RADIUS;
    for _ in 0..spot_count {
        let cy = rng.next_usize(h) as isize;
        let cx = rng.next_usize(w) as isize;
        for dy in -r..=r {
            for dx in -r..=r {
                if dx * dx + dy * dy <= r * r {
                    let y = (cy + dy).rem_euclid(h as isize) as usize;
                    let x = (cx + dx).rem_euclid(w as isize) as usize;
                    values[(y * w + x) * 2 + 1] = 1.0;
                }
            }
        }
    }
    tracing::debug!(%size, seed, spot_count, "seeded reaction-diffusion spots");
    Grid::from_values(size, 2, values)
}

pub fn param_schema() -> Value {
    json!({
        "feed_rate": {
            "type": "number",
            "default": DEFAULT_FEED_RATE,
            "min": 0.0,
            "max": 0.1,
            "description": "Feed rate (F): how fast substrate U is replenished"
        },
        "kill_rate": {
            "type": "number",
            "default": DEFAULT_KILL_RATE,
            "min": 0.0,
            "max": 0.1,
            "description": "Kill rate (k): how fast activator V is removed"
        },
        "diffusion_u": {
            "type": "number",
            "default": DEFAULT_DIFFUSION_U,
            "min": 0.0,
            "max": 1.0,
            "description": "Diffusion rate for U"
        },
        "diffusion_v": {
            "type": "number",
            "default": DEFAULT_DIFFUSION_V,
            "min": 0.0,
            "max": 1.0,
            "description": "Diffusion rate for V"
        },
        "dt": {
            "type": "number",
            "default": DEFAULT_DT,
            "min": 0.0,
            "max": 2.0,
            "description": "Euler time step"
        }
    })
}
