//! Textual point lists: `"x,y x,y ..."` (whitespace or `;` between pairs).

use std::fmt;

use crate::geom::Vec2;

/// Error type for point-list parsing.
#[derive(Debug, Clone, PartialEq)]
pub enum ParseError {
    /// A token that is not exactly two comma-separated fields.
    BadPair { index: usize, token: String },
    /// A coordinate that is not a finite number.
    BadNumber { index: usize, token: String },
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::BadPair { index, token } => {
                write!(f, "point #{index}: expected `x,y`, got `{token}`")
            }
            ParseError::BadNumber { index, token } => {
                write!(f, "point #{index}: `{token}` is not a finite number")
            }
        }
    }
}

impl std::error::Error for ParseError {}

/// Parse a point list. An empty or blank string yields no points.
pub fn parse_points(input: &str) -> Result<Vec<Vec2>, ParseError> {
    input
        .split(|c: char| c.is_whitespace() || c == ';')
        .filter(|tok| !tok.is_empty())
        .enumerate()
        .map(|(index, tok)| parse_pair(index, tok))
        .collect()
}

fn parse_pair(index: usize, tok: &str) -> Result<Vec2, ParseError> {
    let mut fields = tok.split(',');
    let (Some(x), Some(y), None) = (fields.next(), fields.next(), fields.next()) else {
        return Err(ParseError::BadPair {
            index,
            token: tok.to_string(),
        });
    };
    Ok(Vec2::new(parse_coord(index, x)?, parse_coord(index, y)?))
}

fn parse_coord(index: usize, s: &str) -> Result<f64, ParseError> {
    match s.trim().parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(ParseError::BadNumber {
            index,
            token: s.to_string(),
        }),
    }
}

/// Inverse of `parse_points` (shortest round-trippable floats).
pub fn format_points(points: &[Vec2]) -> String {
    points
        .iter()
        .map(|p| format!("{},{}", p.x, p.y))
        .collect::<Vec<_>>()
        .join(" ")
}
