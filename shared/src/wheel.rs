use serde::{Deserialize, Serialize};
use std::f64::consts::{PI, TAU};
use std::fmt;

/// Angle of the fixed pointer (visual top) in the wheel's unrotated frame.
pub const POINTER_ANGLE: f64 = 1.5 * PI;

/// Fewest options the wheel accepts for a spin or keeps after a removal.
pub const MIN_OPTIONS: usize = 2;

/// A single selectable entry on the wheel
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct WheelOption {
    pub id: String,
    pub label: String,
}

impl WheelOption {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
        }
    }
}

/// Current orientation of the wheel and whether an animation is in flight
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Default)]
pub struct WheelState {
    pub rotation: f64,
    pub spinning: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WheelError {
    InsufficientOptions,
    AlreadySpinning,
    NoOptions,
    DivisionUndefined,
}

impl fmt::Display for WheelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WheelError::InsufficientOptions => {
                write!(f, "at least {} options are needed to spin", MIN_OPTIONS)
            }
            WheelError::AlreadySpinning => write!(f, "the wheel is already spinning"),
            WheelError::NoOptions => write!(f, "there are no options on the wheel"),
            WheelError::DivisionUndefined => write!(f, "slice angle is undefined without options"),
        }
    }
}

impl std::error::Error for WheelError {}

/// Ordered option list plus the wheel's rotation.
///
/// Rotation is only written by `SpinController` while a spin is active; everything
/// else reads it.
#[derive(Debug, Clone, Default)]
pub struct WheelModel {
    options: Vec<WheelOption>,
    state: WheelState,
}

impl WheelModel {
    pub fn new(options: Vec<WheelOption>) -> Self {
        Self {
            options,
            state: WheelState::default(),
        }
    }

    /// Replaces the working set. Validation belongs to whoever owns the backing store.
    pub fn set_options(&mut self, options: Vec<WheelOption>) {
        self.options = options;
    }

    pub fn options(&self) -> &[WheelOption] {
        &self.options
    }

    pub fn len(&self) -> usize {
        self.options.len()
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    pub fn state(&self) -> WheelState {
        self.state
    }

    pub fn rotation(&self) -> f64 {
        self.state.rotation
    }

    pub fn is_spinning(&self) -> bool {
        self.state.spinning
    }

    pub(crate) fn set_rotation(&mut self, rotation: f64) {
        self.state.rotation = rotation;
    }

    pub(crate) fn set_spinning(&mut self, spinning: bool) {
        self.state.spinning = spinning;
    }

    pub fn slice_angle(&self) -> Result<f64, WheelError> {
        slice_angle_for(self.options.len())
    }

    /// Local-frame angular range `[start, end)` covered by slice `index`.
    pub fn slice_bounds(&self, index: usize) -> Result<(f64, f64), WheelError> {
        let slice = self.slice_angle()?;
        Ok((index as f64 * slice, (index + 1) as f64 * slice))
    }

    pub fn resolve(&self, rotation: f64) -> Result<&WheelOption, WheelError> {
        resolve_in(&self.options, rotation)
    }
}

pub fn slice_angle_for(count: usize) -> Result<f64, WheelError> {
    if count == 0 {
        return Err(WheelError::DivisionUndefined);
    }
    Ok(TAU / count as f64)
}

/// Index of the slice sitting under the pointer after the wheel turned by `rotation`.
///
/// Slice `i` covers `[i * slice, (i + 1) * slice)` before rotation, so the pointer
/// probes the local-frame angle `POINTER_ANGLE - rotation`.
pub fn winning_index(count: usize, rotation: f64) -> Result<usize, WheelError> {
    if count == 0 {
        return Err(WheelError::NoOptions);
    }
    let slice = slice_angle_for(count)?;
    let normalized = rotation.rem_euclid(TAU);
    let mut pointer = (POINTER_ANGLE - normalized) % TAU;
    if pointer < 0.0 {
        pointer += TAU;
    }
    let index = (pointer / slice).floor() as usize;
    Ok(index.min(count - 1))
}

pub fn resolve_in(options: &[WheelOption], rotation: f64) -> Result<&WheelOption, WheelError> {
    let index = winning_index(options.len(), rotation)?;
    Ok(&options[index])
}
