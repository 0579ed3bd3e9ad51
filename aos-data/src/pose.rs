//! Camera pose parsing.
//!
//! Manifests store each pose as a 3x4 camera-to-world matrix whose cells
//! may be JSON numbers or numeric strings. [`parse_transform`] embeds that
//! block into a 4x4 identity, producing a column-major [`Transform`].

use glam::{DMat4, DVec3};
use serde_json::Value as JsonValue;
use thiserror::Error;

/// 4x4 homogeneous camera-to-world transform (column-major).
pub type Transform = DMat4;

/// Rows in a manifest pose block.
pub const POSE_ROWS: usize = 3;
/// Columns in a manifest pose block.
pub const POSE_COLUMNS: usize = 4;

/// Errors produced while converting a manifest pose block.
#[derive(Debug, Error, PartialEq)]
pub enum TransformError {
    #[error("pose matrix must have 3 rows, found {rows}")]
    MalformedRows { rows: usize },

    #[error("pose matrix row {row} must have 4 columns, found {columns}")]
    MalformedColumns { row: usize, columns: usize },

    #[error("pose matrix must be an array of rows, found `{kind}`")]
    UnsupportedBlockType { kind: &'static str },

    #[error("pose matrix row {row} must be an array of cells, found `{kind}`")]
    UnsupportedRowType { row: usize, kind: &'static str },

    #[error("unsupported cell type `{kind}` at row {row}, column {column}")]
    UnsupportedCellType {
        row: usize,
        column: usize,
        kind: &'static str,
    },

    #[error("cell at row {row}, column {column} is not a number: {text:?}")]
    InvalidNumber {
        row: usize,
        column: usize,
        text: String,
    },
}

/// A single pose cell as it appears in the manifest.
#[derive(Debug, Clone, PartialEq)]
pub enum MatrixCell {
    Number(f64),
    NumericText(String),
}

impl MatrixCell {
    /// Classify a JSON value. Anything other than a number or a string is rejected.
    pub fn from_json(value: &JsonValue, row: usize, column: usize) -> Result<Self, TransformError> {
        match value {
            JsonValue::Number(n) => n
                .as_f64()
                .map(MatrixCell::Number)
                .ok_or(TransformError::UnsupportedCellType {
                    row,
                    column,
                    kind: "number",
                }),
            JsonValue::String(s) => Ok(MatrixCell::NumericText(s.clone())),
            other => Err(TransformError::UnsupportedCellType {
                row,
                column,
                kind: json_kind(other),
            }),
        }
    }

    /// Resolve the cell to its numeric value.
    pub fn value(&self, row: usize, column: usize) -> Result<f64, TransformError> {
        match self {
            MatrixCell::Number(v) => Ok(*v),
            MatrixCell::NumericText(text) => {
                text.trim()
                    .parse::<f64>()
                    .map_err(|_| TransformError::InvalidNumber {
                        row,
                        column,
                        text: text.clone(),
                    })
            }
        }
    }
}

fn json_kind(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "bool",
        JsonValue::Number(_) => "number",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "array",
        JsonValue::Object(_) => "object",
    }
}

/// Convert a 3x4 manifest block into a 4x4 transform.
///
/// Row `r`, column `c` lands at flat column-major index `c * 4 + r`; the
/// bottom row keeps the identity's `[0, 0, 0, 1]`. No orthogonality check
/// or normalization is applied.
pub fn parse_transform(block: &JsonValue) -> Result<Transform, TransformError> {
    let rows = match block {
        JsonValue::Array(rows) if rows.len() == POSE_ROWS => rows,
        JsonValue::Array(rows) => return Err(TransformError::MalformedRows { rows: rows.len() }),
        other => {
            return Err(TransformError::UnsupportedBlockType {
                kind: json_kind(other),
            });
        }
    };

    let mut data = DMat4::IDENTITY.to_cols_array();

    for (r, row) in rows.iter().enumerate() {
        let cells = match row {
            JsonValue::Array(cells) if cells.len() == POSE_COLUMNS => cells,
            JsonValue::Array(cells) => {
                return Err(TransformError::MalformedColumns {
                    row: r,
                    columns: cells.len(),
                });
            }
            other => {
                return Err(TransformError::UnsupportedRowType {
                    row: r,
                    kind: json_kind(other),
                });
            }
        };

        for (c, cell) in cells.iter().enumerate() {
            data[c * 4 + r] = MatrixCell::from_json(cell, r, c)?.value(r, c)?;
        }
    }

    Ok(DMat4::from_cols_array(&data))
}

/// Translation column of the camera-to-world transform.
pub fn translation(transform: &Transform) -> DVec3 {
    transform.w_axis.truncate()
}

/// Camera position as seen from the inverse of the stored pose.
pub fn camera_position(transform: &Transform) -> DVec3 {
    transform.inverse().w_axis.truncate()
}
