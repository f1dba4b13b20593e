use base64::{engine::general_purpose::STANDARD_NO_PAD, Engine as _};
use crystal_trail_core::{CellCoord, GenerationError, GridSize, PuzzleLayout};
use serde::{Deserialize, Serialize};
use thiserror::Error;

const CODE_DOMAIN: &str = "trail";
const CODE_VERSION: &str = "v1";

/// Identifier prefix emitted before the encoded layout payload.
pub(crate) const CODE_HEADER: &str = "trail:v1";
/// Delimiter used to separate the prefix, board dimensions and payload.
const FIELD_DELIMITER: char = ':';

/// Puzzle layout together with the board it was generated for.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct LevelCode {
    size: GridSize,
    layout: PuzzleLayout,
}

impl LevelCode {
    /// Pairs a layout with its board, rejecting layouts that leave the board.
    pub(crate) fn new(size: GridSize, layout: PuzzleLayout) -> Result<Self, LevelCodeError> {
        let cells: Vec<CellCoord> = layout.cells().collect();
        size.ensure_contains(&cells)?;
        Ok(Self { size, layout })
    }

    /// Board dimensions the layout was generated for.
    pub(crate) fn size(&self) -> GridSize {
        self.size
    }

    /// Layout carried by the code.
    pub(crate) fn layout(&self) -> &PuzzleLayout {
        &self.layout
    }

    /// Encodes the layout into a single-line string suitable for sharing.
    pub(crate) fn encode(&self) -> Result<String, LevelCodeError> {
        let payload = LayoutPayload {
            start: self.layout.start(),
            collectibles: self.layout.collectibles().iter().copied().collect(),
            target: self.layout.target(),
            moves: self.layout.optimal_move_count(),
        };
        let json = serde_json::to_vec(&payload).map_err(LevelCodeError::InvalidPayload)?;
        let encoded = STANDARD_NO_PAD.encode(json);
        Ok(format!(
            "{CODE_HEADER}:{}x{}:{encoded}",
            self.size.width(),
            self.size.height()
        ))
    }

    /// Decodes a level code from its string representation.
    pub(crate) fn decode(value: &str) -> Result<Self, LevelCodeError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(LevelCodeError::EmptyCode);
        }

        let mut parts = trimmed.split(FIELD_DELIMITER);
        let domain = parts.next().ok_or(LevelCodeError::MissingPrefix)?;
        let version = parts.next().ok_or(LevelCodeError::MissingVersion)?;
        let dimensions = parts.next().ok_or(LevelCodeError::MissingDimensions)?;
        let payload = parts.next().ok_or(LevelCodeError::MissingPayload)?;

        if domain != CODE_DOMAIN {
            return Err(LevelCodeError::InvalidPrefix(domain.to_owned()));
        }
        if version != CODE_VERSION {
            return Err(LevelCodeError::UnsupportedVersion(version.to_owned()));
        }

        let size = parse_dimensions(dimensions)?;
        let bytes = STANDARD_NO_PAD
            .decode(payload.as_bytes())
            .map_err(LevelCodeError::InvalidEncoding)?;
        let decoded: LayoutPayload =
            serde_json::from_slice(&bytes).map_err(LevelCodeError::InvalidPayload)?;

        let layout = PuzzleLayout::new(
            decoded.start,
            decoded.collectibles,
            decoded.target,
            decoded.moves,
        )?;
        Self::new(size, layout)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
struct LayoutPayload {
    start: CellCoord,
    collectibles: Vec<CellCoord>,
    target: CellCoord,
    moves: u32,
}

/// Errors that can occur while decoding level codes.
#[derive(Debug, Error)]
pub(crate) enum LevelCodeError {
    /// The provided string was empty or contained only whitespace.
    #[error("level code was empty")]
    EmptyCode,
    /// The prefix segment was missing from the code.
    #[error("level code is missing the prefix")]
    MissingPrefix,
    /// The code did not contain a version segment.
    #[error("level code is missing the version")]
    MissingVersion,
    /// The code did not include board dimensions.
    #[error("level code is missing the board dimensions")]
    MissingDimensions,
    /// The code did not include the payload segment.
    #[error("level code is missing the payload")]
    MissingPayload,
    /// The code used an unexpected prefix segment.
    #[error("level code prefix '{0}' is not supported")]
    InvalidPrefix(String),
    /// The code used an unsupported version identifier.
    #[error("level code version '{0}' is not supported")]
    UnsupportedVersion(String),
    /// The board dimensions could not be parsed.
    #[error("could not parse board dimensions '{0}'")]
    InvalidDimensions(String),
    /// The base64 payload could not be decoded.
    #[error("could not decode level payload: {0}")]
    InvalidEncoding(#[source] base64::DecodeError),
    /// The payload could not be serialised or deserialised.
    #[error("could not parse level payload: {0}")]
    InvalidPayload(#[source] serde_json::Error),
    /// The payload described a layout that does not fit its board.
    #[error("level layout is inconsistent: {0}")]
    InvalidLayout(#[from] GenerationError),
}

fn parse_dimensions(dimensions: &str) -> Result<GridSize, LevelCodeError> {
    let invalid = || LevelCodeError::InvalidDimensions(dimensions.to_owned());
    let (width, height) = dimensions.split_once(['x', 'X']).ok_or_else(invalid)?;

    let width = width.trim().parse::<u32>().map_err(|_| invalid())?;
    let height = height.trim().parse::<u32>().map_err(|_| invalid())?;

    if width == 0 || height == 0 {
        return Err(invalid());
    }

    Ok(GridSize::new(width, height))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_layout() -> PuzzleLayout {
        PuzzleLayout::new(
            CellCoord::new(3, 6),
            [CellCoord::new(1, 1), CellCoord::new(5, 2)],
            CellCoord::new(6, 0),
            14,
        )
        .expect("distinct cells")
    }

    #[test]
    fn round_trip_populated_layout() {
        let code =
            LevelCode::new(GridSize::new(7, 7), sample_layout()).expect("layout fits the board");

        let encoded = code.encode().expect("layout encodes");
        assert!(encoded.starts_with(&format!("{CODE_HEADER}:7x7:")));
        assert!(!encoded.ends_with('='));

        let decoded = LevelCode::decode(&encoded).expect("code decodes");
        assert_eq!(code, decoded);
        assert_eq!(decoded.size(), GridSize::new(7, 7));
    }

    #[test]
    fn rejects_malformed_envelopes() {
        assert!(matches!(
            LevelCode::decode("   "),
            Err(LevelCodeError::EmptyCode)
        ));
        assert!(matches!(
            LevelCode::decode("trial:v1:3x3:e30"),
            Err(LevelCodeError::InvalidPrefix(prefix)) if prefix == "trial"
        ));
        assert!(matches!(
            LevelCode::decode("trail:v2:3x3:e30"),
            Err(LevelCodeError::UnsupportedVersion(_))
        ));
        assert!(matches!(
            LevelCode::decode("trail:v1:0x3:e30"),
            Err(LevelCodeError::InvalidDimensions(_))
        ));
        assert!(matches!(
            LevelCode::decode("trail:v1:3x3"),
            Err(LevelCodeError::MissingPayload)
        ));
        assert!(matches!(
            LevelCode::decode("trail:v1:3x3:!!!"),
            Err(LevelCodeError::InvalidEncoding(_))
        ));
    }

    #[test]
    fn rejects_layouts_outside_board() {
        let code = LevelCode::new(GridSize::new(7, 7), sample_layout()).expect("layout fits");
        let encoded = code.encode().expect("layout encodes");
        let shrunk = encoded.replace(":7x7:", ":4x4:");

        assert!(matches!(
            LevelCode::decode(&shrunk),
            Err(LevelCodeError::InvalidLayout(_))
        ));
    }

    #[test]
    fn rejects_overlapping_cells() {
        let payload = LayoutPayload {
            start: CellCoord::new(0, 0),
            collectibles: vec![CellCoord::new(0, 0)],
            target: CellCoord::new(1, 1),
            moves: 2,
        };
        let json = serde_json::to_vec(&payload).expect("payload serializes");
        let code = format!("{CODE_HEADER}:3x3:{}", STANDARD_NO_PAD.encode(json));

        assert!(matches!(
            LevelCode::decode(&code),
            Err(LevelCodeError::InvalidLayout(_))
        ));
    }
}
