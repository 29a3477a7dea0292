use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::{GridError, Result};

pub const MAX_DIMENSION: u16 = 128;

/// Parses the width and height typed by the user. Both have to be whole
/// numbers in `1..=max`.
pub fn parse_dimensions(
    width: &str,
    height: &str,
    max: u16,
) -> Result<(u16, u16)> {
    let parse = |text: &str| text.trim().parse::<i64>().ok();

    let (Some(width), Some(height)) = (parse(width), parse(height)) else {
        return Err(GridError::invalid_dimensions(
            "grid size must be positive numbers",
        ));
    };
    if width <= 0 || height <= 0 {
        return Err(GridError::invalid_dimensions(
            "grid size must be positive numbers",
        ));
    }
    if width > max as i64 || height > max as i64 {
        return Err(GridError::invalid_dimensions(format!(
            "grid size is too big (max {}x{})",
            max, max
        )));
    }

    Ok((width as u16, height as u16))
}

/// Moves a dimension by `delta`. Returns `None` when the result would leave
/// `1..=max`, in which case the input is ignored.
pub fn nudge(value: u16, delta: i32, max: u16) -> Option<u16> {
    let nudged = (value as i32).checked_add(delta)?;
    if nudged >= 1 && nudged <= max as i32 {
        Some(nudged as u16)
    } else {
        None
    }
}

/// Fixed square grid sizes, named after the C integer type whose bit width
/// matches the side length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SizePreset {
    #[serde(rename = "uint8_t")]
    U8,
    #[serde(rename = "uint16_t")]
    U16,
    #[serde(rename = "uint32_t")]
    U32,
    #[serde(rename = "uint64_t")]
    U64,
}

impl SizePreset {
    pub const ALL: [SizePreset; 4] =
        [SizePreset::U8, SizePreset::U16, SizePreset::U32, SizePreset::U64];

    /// Side length of the square grid.
    pub fn side(self) -> u16 {
        match self {
            SizePreset::U8 => 8,
            SizePreset::U16 => 16,
            SizePreset::U32 => 32,
            SizePreset::U64 => 64,
        }
    }

    pub fn type_name(self) -> &'static str {
        match self {
            SizePreset::U8 => "uint8_t",
            SizePreset::U16 => "uint16_t",
            SizePreset::U32 => "uint32_t",
            SizePreset::U64 => "uint64_t",
        }
    }

    /// Finds the preset whose grid holds exactly `bits` cells.
    pub fn from_bit_count(bits: usize) -> Option<SizePreset> {
        SizePreset::ALL
            .into_iter()
            .find(|preset| preset.side() as usize * preset.side() as usize == bits)
    }
}

impl fmt::Display for SizePreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.type_name())
    }
}

impl FromStr for SizePreset {
    type Err = GridError;

    fn from_str(name: &str) -> Result<SizePreset> {
        let name = name.trim();
        SizePreset::ALL
            .into_iter()
            .find(|preset| preset.type_name() == name)
            .ok_or_else(|| {
                GridError::invalid_dimensions(format!(
                    "unknown size type '{}'",
                    name
                ))
            })
    }
}

/// Computes the on-screen side length of a cell so the whole grid fits into
/// 90% of the viewport width and 60% of its height. Never below one.
pub fn fit_cell_size(
    viewport_width: f32,
    viewport_height: f32,
    width: u16,
    height: u16,
) -> u32 {
    let max_width = viewport_width * 0.9;
    let max_height = viewport_height * 0.6;

    let cell_x = (max_width / width.max(1) as f32).floor();
    let cell_y = (max_height / height.max(1) as f32).floor();
    cell_x.min(cell_y).max(1.0) as u32
}
