//! Packing of the grid into bytes and the C array literal text around them.
//!
//! Each row is packed MSB-first into `ceil(width / 8)` bytes. When the row
//! width is not a multiple of 8 the last byte of the row is padded with
//! zero bits at the low end, so rows never share a byte.

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::errors::{GridError, Result};
use crate::pixel_grid::PixelGrid;
use crate::undo::UndoLog;

pub const DEFAULT_ELEMENT_TYPE: &str = "uint8_t";
pub const DEFAULT_ARRAY_NAME: &str = "bitmap";

/// The number system the byte literals are written in.
#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Radix {
    #[default]
    Hex,
    Binary,
}

/// How the generated array declaration looks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportOptions {
    pub radix: Radix,
    pub element_type: String,
    pub array_name: String,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            radix: Radix::Hex,
            element_type: DEFAULT_ELEMENT_TYPE.to_string(),
            array_name: DEFAULT_ARRAY_NAME.to_string(),
        }
    }
}

/// Number of bytes a row of `width` cells occupies.
pub fn bytes_per_row(width: u16) -> usize {
    (width as usize + 7) / 8
}

/// Number of bytes a `width` x `height` grid encodes to.
pub fn encoded_len(width: u16, height: u16) -> usize {
    bytes_per_row(width) * height as usize
}

/// Packs the grid into bytes, row by row, most significant bit first.
pub fn encode(grid: &PixelGrid) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(encoded_len(grid.width(), grid.height()));

    for row in grid.rows() {
        for chunk in row.chunks(8) {
            let mut byte = chunk
                .iter()
                .fold(0u8, |acc, &active| (acc << 1) | active as u8);
            if chunk.len() < 8 {
                byte <<= 8 - chunk.len();
            }
            bytes.push(byte);
        }
    }

    bytes
}

/// Formats a single byte as `0xHH` or `Bbbbbbbbb`.
pub fn format_literal(byte: u8, radix: Radix) -> String {
    match radix {
        Radix::Hex => format!("0x{:02x}", byte),
        Radix::Binary => format!("B{:08b}", byte),
    }
}

/// Produces the full array declaration for the grid, for example
///
/// ```text
/// uint8_t bitmap[] = {
///     0xf0, 0x0f
/// };
/// ```
pub fn export(grid: &PixelGrid, options: &ExportOptions) -> String {
    let literals: Vec<String> = encode(grid)
        .into_iter()
        .map(|byte| format_literal(byte, options.radix))
        .collect();

    format!(
        "{} {}[] = {{\n    {}\n}};",
        options.element_type,
        options.array_name,
        literals.join(", ")
    )
}

/// Returns the part of the input that holds the byte literals: the text
/// between the first `{` and the next `}`, or everything if there is no
/// opening brace.
fn array_body(input: &str) -> &str {
    match input.find('{') {
        Some(open) => {
            let rest = &input[open + 1..];
            match rest.find('}') {
                Some(close) => &rest[..close],
                None => rest,
            }
        }
        None => input,
    }
}

fn is_binary_literal(token: &str) -> bool {
    match token.strip_prefix('B') {
        Some(digits) => {
            !digits.is_empty()
                && digits.len() <= 8
                && digits.chars().all(|c| c == '0' || c == '1')
        }
        None => false,
    }
}

fn parse_hex_literal(token: &str) -> Result<u8> {
    let digits = token
        .strip_prefix("0x")
        .or_else(|| token.strip_prefix("0X"))
        .unwrap_or(token);

    if digits.is_empty()
        || digits.len() > 2
        || !digits.chars().all(|c| c.is_ascii_hexdigit())
    {
        return Err(GridError::UnparseableToken {
            token: token.to_string(),
        });
    }

    u8::from_str_radix(digits, 16).map_err(|_| GridError::UnparseableToken {
        token: token.to_string(),
    })
}

/// Extracts the byte values from pasted code. Accepts a full array
/// declaration or just the comma separated literals. When every literal is
/// a `B` binary literal the input is read as binary, otherwise as hex with
/// an optional `0x` prefix.
pub fn parse_bytes(input: &str) -> Result<Vec<u8>> {
    let input = input.trim();
    if input.is_empty() {
        return Err(GridError::EmptyImportInput);
    }

    let tokens: Vec<&str> = array_body(input)
        .split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .collect();
    if tokens.is_empty() {
        return Err(GridError::EmptyImportInput);
    }

    if tokens.iter().all(|token| is_binary_literal(token)) {
        debug!("parsing {} binary literals", tokens.len());
        return tokens
            .iter()
            .map(|token| {
                u8::from_str_radix(&token[1..], 2).map_err(|_| {
                    GridError::UnparseableToken {
                        token: token.to_string(),
                    }
                })
            })
            .collect();
    }

    debug!("parsing {} hex literals", tokens.len());
    tokens.iter().map(|token| parse_hex_literal(token)).collect()
}

/// Repaints the whole grid from packed bytes. The byte count has to match
/// the encoded size of the grid exactly; on a mismatch nothing is touched.
/// Changed cells are recorded into the open stroke of `undo`.
///
/// Returns the number of cells that changed.
pub fn decode_into(
    grid: &mut PixelGrid,
    undo: &mut UndoLog,
    bytes: &[u8],
) -> Result<usize> {
    let expected = encoded_len(grid.width(), grid.height());
    if bytes.len() != expected {
        warn!(
            "rejecting import of {} bytes into a {}x{} grid ({} bytes)",
            bytes.len(),
            grid.width(),
            grid.height(),
            expected
        );
        return Err(GridError::SizeMismatch {
            expected,
            actual: bytes.len(),
        });
    }

    let row_bytes = bytes_per_row(grid.width());
    let mut changed = 0;
    for y in 0..grid.height() {
        for x in 0..grid.width() {
            let byte = bytes[y as usize * row_bytes + x as usize / 8];
            let active = (byte >> (7 - x % 8)) & 1 == 1;
            let current = grid.get(x, y)?;
            if current != active {
                undo.record(x, y, current);
                grid.set(x, y, active)?;
                changed += 1;
            }
        }
    }

    Ok(changed)
}

/// Parses the pasted code and repaints the grid with it.
pub fn decode(
    input: &str,
    grid: &mut PixelGrid,
    undo: &mut UndoLog,
) -> Result<usize> {
    let bytes = parse_bytes(input)?;
    decode_into(grid, undo, &bytes)
}
