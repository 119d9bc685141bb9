//! Control point lists: a count followed by that many `a b c` triples.
//!
//! The files are authored Z-up, so each triple is stored as `(a, c, b)`.

use std::{fmt, path::Path};

use cgmath::Vector3;

use crate::resources::load_string;

#[derive(Debug, Clone, PartialEq)]
pub enum PointsError {
    MissingCount,
    BadCount(String),
    Number { point: usize, token: String },
    TooFew { declared: usize, found: usize },
}

impl fmt::Display for PointsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PointsError::MissingCount => write!(f, "point list is empty"),
            PointsError::BadCount(token) => write!(f, "point count '{}' is not a number", token),
            PointsError::Number { point, token } => {
                write!(f, "point {}: '{}' is not a number", point, token)
            }
            PointsError::TooFew { declared, found } => {
                write!(f, "{} points declared but only {} present", declared, found)
            }
        }
    }
}

impl std::error::Error for PointsError {}

pub fn parse_points(text: &str) -> Result<Vec<Vector3<f32>>, PointsError> {
    let mut tokens = text.split_whitespace();
    let count_token = tokens.next().ok_or(PointsError::MissingCount)?;
    let declared: usize = count_token
        .parse()
        .map_err(|_| PointsError::BadCount(count_token.to_string()))?;

    let mut points = Vec::with_capacity(declared);
    for point in 0..declared {
        let mut coords = [0.0f32; 3];
        for coord in coords.iter_mut() {
            let token = tokens.next().ok_or(PointsError::TooFew {
                declared,
                found: point,
            })?;
            *coord = token.parse().map_err(|_| PointsError::Number {
                point,
                token: token.to_string(),
            })?;
        }
        let [a, b, c] = coords;
        points.push(Vector3::new(a, c, b));
    }
    if tokens.next().is_some() {
        log::warn!("point list has data past the {} declared points", declared);
    }
    Ok(points)
}

pub async fn load_points(root: &Path, file_name: &str) -> anyhow::Result<Vec<Vector3<f32>>> {
    let text = load_string(root, file_name).await?;
    let points = parse_points(&text).map_err(|e| anyhow::anyhow!("{}: {}", file_name, e))?;
    log::debug!("loaded {} control points from {}", points.len(), file_name);
    Ok(points)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn swaps_the_last_two_coordinates() {
        let points = parse_points("2\n1 2 3\n-1.5 0 4.25\n").unwrap();
        assert_eq!(points, vec![Vector3::new(1.0, 3.0, 2.0), Vector3::new(-1.5, 4.25, 0.0)]);
    }

    #[test]
    fn zero_points_is_fine() {
        assert!(parse_points("0\n").unwrap().is_empty());
    }

    #[test]
    fn short_lists_are_rejected() {
        assert_eq!(
            parse_points("3\n0 0 0\n1 1 1\n"),
            Err(PointsError::TooFew {
                declared: 3,
                found: 2
            })
        );
        assert_eq!(parse_points(""), Err(PointsError::MissingCount));
        assert!(matches!(parse_points("many\n"), Err(PointsError::BadCount(_))));
        assert!(matches!(
            parse_points("1\n0 x 0\n"),
            Err(PointsError::Number { point: 0, .. })
        ));
    }
}
