use std::fs;
use std::path::Path;

use image::Rgb;
use itertools::Itertools;
use serde::Deserialize;
use thiserror::Error;
use unordered_pair::UnorderedPair;

use crate::board::Board;
use crate::builder::{BoardBuilder, BuilderInvalidReason};
use crate::location::{Dimension, Location};
use crate::palette::parse_color;
use crate::shape::SquareStep;

/// `[row, column]`
type Coords = (usize, usize);

/// Reasons a puzzle file could not be turned into a [`Board`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("could not read puzzle: {0}")]
    Io(#[from] std::io::Error),
    /// The file is not a well-formed puzzle description.
    #[error("malformed puzzle: {0}")]
    Parse(#[from] serde_json::Error),
    /// A flow names a color that is neither a [`NamedColor`](crate::palette::NamedColor) nor `#rrggbb`.
    #[error("unknown color {0:?}")]
    UnknownColor(String),
    /// The description parsed but does not make a valid board.
    #[error("invalid puzzle: {}", .0.iter().join(", "))]
    Invalid(Vec<BuilderInvalidReason>),
}

/// One flow of a [`PuzzleConfig`].
#[derive(Clone, Debug, Deserialize)]
pub struct FlowConfig {
    /// Where the flow starts.
    pub start: Coords,
    /// Where the flow ends.
    pub end: Coords,
    /// Color name or `#rrggbb`.
    pub color: String,
    /// Cells forced into this flow before solving.
    #[serde(default)]
    pub seed: Vec<Coords>,
}

/// A warp on a board edge, as taken by [`BoardBuilder::add_edge_warp`].
#[derive(Clone, Debug, Deserialize)]
pub struct EdgeWarpConfig {
    /// The edge cell.
    pub at: Coords,
    /// Which way off the board the warp leads; needed only at corners.
    #[serde(default)]
    pub direction: Option<SquareStep>,
}

/// A puzzle as written in a JSON file.
///
/// ```json
/// {
///   "rows": 2, "cols": 2,
///   "flows": [
///     { "start": [0, 0], "end": [1, 1], "color": "BLUE" },
///     { "start": [0, 1], "end": [1, 0], "color": "#ff0000" }
///   ],
///   "warps": [[[0, 0], [1, 1]], [[0, 1], [1, 0]]]
/// }
/// ```
#[derive(Clone, Debug, Deserialize)]
pub struct PuzzleConfig {
    /// Number of rows.
    pub rows: Dimension,
    /// Number of columns.
    pub cols: Dimension,
    /// Flows, in solving order.
    pub flows: Vec<FlowConfig>,
    /// Pairs of cells joined directly.
    #[serde(default)]
    pub warps: Vec<(Coords, Coords)>,
    /// Wrap-around warps on the board's edges.
    #[serde(default)]
    pub edge_warps: Vec<EdgeWarpConfig>,
    /// Pairs of adjacent cells with a wall between them.
    #[serde(default)]
    pub walls: Vec<(Coords, Coords)>,
    /// Cells cut out of the board.
    #[serde(default)]
    pub holes: Vec<Coords>,
}

impl PuzzleConfig {
    /// Parse a puzzle from JSON text.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Read and parse a puzzle file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::from_json(&fs::read_to_string(path)?)
    }

    /// A builder holding everything this puzzle describes, for further changes before building.
    ///
    /// Invalid features are not reported here; they surface from [`BoardBuilder::build`].
    pub fn builder(&self) -> Result<BoardBuilder<Rgb<u8>>, ConfigError> {
        let mut builder = BoardBuilder::with_dims((self.rows, self.cols));

        for flow in &self.flows {
            let color = parse_color(&flow.color).ok_or_else(|| ConfigError::UnknownColor(flow.color.clone()))?;
            builder.add_termini(color, (Location::from(flow.start), Location::from(flow.end)));
        }

        for (index, flow) in self.flows.iter().enumerate() {
            if !flow.seed.is_empty() {
                builder.seed(index, &flow.seed.iter().copied().map(Location::from).collect_vec());
            }
        }

        for (a, b) in &self.warps {
            builder.add_warp(UnorderedPair(Location::from(*a), Location::from(*b)));
        }

        for warp in &self.edge_warps {
            builder.add_edge_warp(Location::from(warp.at), warp.direction);
        }

        for (a, b) in &self.walls {
            builder.disconnect(UnorderedPair(Location::from(*a), Location::from(*b)));
        }

        for hole in &self.holes {
            builder.drop_location(Location::from(*hole));
        }

        Ok(builder)
    }

    /// Build the board this puzzle describes.
    pub fn build(&self) -> Result<Board<Rgb<u8>>, ConfigError> {
        self.builder()?.build().map_err(ConfigError::Invalid)
    }
}

#[cfg(test)]
mod tests {
    use image::Rgb;

    use super::{ConfigError, PuzzleConfig};
    use crate::builder::BuilderInvalidReason;
    use crate::location::Location;
    use crate::palette::NamedColor;

    #[test]
    fn optional_sections_default_to_empty() {
        let config = PuzzleConfig::from_json(r#"{
            "rows": 1, "cols": 2,
            "flows": [{ "start": [0, 0], "end": [0, 1], "color": "red" }]
        }"#).unwrap();
        assert!(config.warps.is_empty() && config.walls.is_empty() && config.holes.is_empty());

        let board = config.build().unwrap();
        assert_eq!(board.attributes(), &[Rgb([255, 0, 0])]);
        assert_eq!(board.termini(0), (Location(0, 0), Location(0, 1)));
    }

    #[test]
    fn every_feature_reaches_the_board() {
        let board = PuzzleConfig::from_json(r##"{
            "rows": 3, "cols": 3,
            "flows": [
                { "start": [0, 0], "end": [2, 2], "color": "#102030", "seed": [[1, 1]] },
                { "start": [0, 2], "end": [2, 0], "color": "LIME" }
            ],
            "warps": [[[0, 0], [2, 2]]],
            "edge_warps": [{ "at": [1, 0] }],
            "walls": [[[0, 0], [0, 1]]],
            "holes": [[0, 1]]
        }"##).unwrap().build().unwrap();

        assert_eq!(board.warps().len(), 2);
        assert!(board.flows()[0].claimed().contains(4));
        assert_eq!(board.attributes()[0], Rgb([0x10, 0x20, 0x30]));
    }

    #[test]
    fn bundled_puzzle_keeps_its_colors() {
        let board = PuzzleConfig::from_json(include_str!("../demos/minimal.json")).unwrap().build().unwrap();
        let expected = [NamedColor::Blue, NamedColor::Green, NamedColor::Yellow, NamedColor::Red].map(|color| color.rgb());
        assert_eq!(board.attributes(), &expected);
        assert_eq!(board.termini(3), (Location(2, 1), Location(1, 3)));
        assert_eq!(board.warps().len(), 6);
    }

    #[test]
    fn zero_sized_boards_do_not_parse() {
        let result = PuzzleConfig::from_json(r#"{ "rows": 0, "cols": 3, "flows": [] }"#);
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn errors_name_their_cause() {
        let unknown = PuzzleConfig::from_json(r#"{
            "rows": 2, "cols": 2,
            "flows": [{ "start": [0, 0], "end": [1, 1], "color": "mauve" }]
        }"#).unwrap().build();
        assert!(matches!(unknown, Err(ConfigError::UnknownColor(name)) if name == "mauve"));

        let off_board = PuzzleConfig::from_json(r#"{
            "rows": 2, "cols": 2,
            "flows": [{ "start": [0, 0], "end": [5, 1], "color": "RED" }]
        }"#).unwrap().build();
        match off_board {
            Err(ConfigError::Invalid(reasons)) => assert_eq!(reasons, vec![BuilderInvalidReason::FeatureOutOfBounds]),
            other => panic!("expected an invalid board, got {other:?}"),
        }
    }
}
