//! # Geometry
//!
//! Turns raw snack dimensions into a single size metric.
//!
//! | shape    | area                      | perimeter                                  |
//! |----------|---------------------------|--------------------------------------------|
//! | circle   | π·(d/2)²                  | π·d                                        |
//! | ellipse  | π·(L/2)·(W/2)             | π·[3(a+b) − √((3a+b)(a+3b))], a=L/2, b=W/2 |
//! | triangle | Heron, √(s(s−a)(s−b)(s−c)) | a+b+c                                      |
//!
//! ## Rules
//!
//! - A missing, non-positive or non-finite field is a [`GeometryError::MissingDimensions`],
//!   whichever field it is.
//! - Triangle sides that are all present but cannot close a triangle are a
//!   [`GeometryError::InvalidTriangle`], kept apart so callers can tell bad geometry from absent data.
//! - Ellipse inclination never enters the metric and never fails a computation.
use std::f64::consts::PI;

use thiserror::Error;

use crate::types::{DetectedType, Dimensions, MetricMode};

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeometryError {
    #[error("Could not calculate {0} due to missing or invalid dimensions.")]
    MissingDimensions(MetricMode),

    #[error("Invalid samoosa dimensions. The sides do not form a valid triangle.")]
    InvalidTriangle,

    #[error("The snack could not be identified.")]
    UnknownSnack,
}

/// Computes the metric for a classified snack. Unknown snacks and dimensions of the wrong
/// shape for the declared type never produce a value.
pub fn compute(
    mode: MetricMode,
    detected: DetectedType,
    dimensions: &Dimensions,
) -> Result<f64, GeometryError> {
    let snack_type = detected.snack_type().ok_or(GeometryError::UnknownSnack)?;

    if snack_type.shape() != dimensions.shape() {
        return Err(GeometryError::MissingDimensions(mode));
    }

    metric(mode, dimensions)
}

pub fn metric(mode: MetricMode, dimensions: &Dimensions) -> Result<f64, GeometryError> {
    match *dimensions {
        Dimensions::Circle { diameter } => circle(mode, diameter),
        Dimensions::Ellipse {
            length,
            width,
            inclination,
        } => ellipse(mode, length, width, inclination),
        Dimensions::Triangle {
            side_a,
            side_b,
            side_c,
        } => triangle(mode, side_a, side_b, side_c),
    }
}

pub fn circle(mode: MetricMode, diameter: Option<f64>) -> Result<f64, GeometryError> {
    let d = positive(diameter).ok_or(GeometryError::MissingDimensions(mode))?;

    let value = match mode {
        MetricMode::Area => PI * (d / 2.0).powi(2),
        MetricMode::Perimeter => PI * d,
    };

    checked(mode, value)
}

pub fn ellipse(
    mode: MetricMode,
    length: Option<f64>,
    width: Option<f64>,
    _inclination: Option<f64>,
) -> Result<f64, GeometryError> {
    let (Some(length), Some(width)) = (positive(length), positive(width)) else {
        return Err(GeometryError::MissingDimensions(mode));
    };

    let a = length / 2.0;
    let b = width / 2.0;

    let value = match mode {
        MetricMode::Area => PI * a * b,
        // Ramanujan's second approximation
        MetricMode::Perimeter => PI * (3.0 * (a + b) - ((3.0 * a + b) * (a + 3.0 * b)).sqrt()),
    };

    checked(mode, value)
}

pub fn triangle(
    mode: MetricMode,
    side_a: Option<f64>,
    side_b: Option<f64>,
    side_c: Option<f64>,
) -> Result<f64, GeometryError> {
    let (Some(a), Some(b), Some(c)) = (positive(side_a), positive(side_b), positive(side_c)) else {
        return Err(GeometryError::MissingDimensions(mode));
    };

    if !(a + b > c && a + c > b && b + c > a) {
        return Err(GeometryError::InvalidTriangle);
    }

    let value = match mode {
        MetricMode::Area => {
            let s = (a + b + c) / 2.0;
            (s * (s - a) * (s - b) * (s - c)).sqrt()
        }
        MetricMode::Perimeter => a + b + c,
    };

    // Nearly flat triangles can pass the inequality and still round to zero area.
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(GeometryError::InvalidTriangle)
    }
}

/// Inclination outside [-90, 90] degrees, or missing altogether, reads as 0.
pub fn normalize_inclination(inclination: Option<f64>) -> f64 {
    match inclination {
        Some(theta) if (-90.0..=90.0).contains(&theta) => theta,
        _ => 0.0,
    }
}

/// Returns the same dimensions with any display-only fields brought into range.
pub fn normalize(dimensions: Dimensions) -> Dimensions {
    match dimensions {
        Dimensions::Ellipse {
            length,
            width,
            inclination,
        } => Dimensions::Ellipse {
            length,
            width,
            inclination: Some(normalize_inclination(inclination)),
        },
        other => other,
    }
}

fn positive(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite() && *v > 0.0)
}

fn checked(mode: MetricMode, value: f64) -> Result<f64, GeometryError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(GeometryError::MissingDimensions(mode))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn close(actual: f64, expected: f64) -> bool {
        (actual - expected).abs() < EPS
    }

    #[test]
    fn test_circle() {
        assert!(close(circle(MetricMode::Area, Some(10.0)).unwrap(), 25.0 * PI));
        assert!(close(circle(MetricMode::Perimeter, Some(10.0)).unwrap(), 10.0 * PI));
        assert!((circle(MetricMode::Area, Some(10.0)).unwrap() - 78.54).abs() < 0.01);
    }

    #[test]
    fn test_circle_missing_or_non_positive() {
        for diameter in [None, Some(0.0), Some(-3.0), Some(f64::NAN), Some(f64::INFINITY)] {
            assert_eq!(
                circle(MetricMode::Area, diameter),
                Err(GeometryError::MissingDimensions(MetricMode::Area))
            );
        }
    }

    #[test]
    fn test_ellipse_area_ignores_inclination() {
        let flat = ellipse(MetricMode::Area, Some(12.0), Some(6.0), Some(0.0)).unwrap();
        let tilted = ellipse(MetricMode::Area, Some(12.0), Some(6.0), Some(45.0)).unwrap();
        assert!(close(flat, PI * 6.0 * 3.0));
        assert!(close(flat, tilted));
    }

    #[test]
    fn test_ellipse_perimeter_ramanujan() {
        let (a, b): (f64, f64) = (6.0, 3.0);
        let expected = PI * (3.0 * (a + b) - ((3.0 * a + b) * (a + 3.0 * b)).sqrt());
        let actual = ellipse(MetricMode::Perimeter, Some(12.0), Some(6.0), None).unwrap();
        assert!(close(actual, expected));

        // Degenerates to a circle's circumference when both axes match.
        let round = ellipse(MetricMode::Perimeter, Some(10.0), Some(10.0), None).unwrap();
        assert!(close(round, 10.0 * PI));
    }

    #[test]
    fn test_ellipse_bad_inclination_never_fails() {
        for inclination in [Some(135.0), Some(-91.0), Some(f64::NAN), None] {
            assert!(ellipse(MetricMode::Area, Some(12.0), Some(6.0), inclination).is_ok());
        }
    }

    #[test]
    fn test_ellipse_missing() {
        assert_eq!(
            ellipse(MetricMode::Perimeter, Some(12.0), None, Some(10.0)),
            Err(GeometryError::MissingDimensions(MetricMode::Perimeter))
        );
        assert_eq!(
            ellipse(MetricMode::Area, Some(-1.0), Some(5.0), None),
            Err(GeometryError::MissingDimensions(MetricMode::Area))
        );
    }

    #[test]
    fn test_triangle_345() {
        assert!(close(triangle(MetricMode::Area, Some(3.0), Some(4.0), Some(5.0)).unwrap(), 6.0));
        assert!(close(
            triangle(MetricMode::Perimeter, Some(3.0), Some(4.0), Some(5.0)).unwrap(),
            12.0
        ));
    }

    #[test]
    fn test_triangle_invalid_is_distinct_from_missing() {
        for mode in [MetricMode::Area, MetricMode::Perimeter] {
            assert_eq!(
                triangle(mode, Some(10.0), Some(2.0), Some(3.0)),
                Err(GeometryError::InvalidTriangle)
            );
            // Degenerate: a + b == c
            assert_eq!(
                triangle(mode, Some(2.0), Some(3.0), Some(5.0)),
                Err(GeometryError::InvalidTriangle)
            );
            assert_eq!(
                triangle(mode, Some(3.0), None, Some(5.0)),
                Err(GeometryError::MissingDimensions(mode))
            );
        }

        assert_ne!(
            GeometryError::InvalidTriangle.to_string(),
            GeometryError::MissingDimensions(MetricMode::Area).to_string()
        );
    }

    #[test]
    fn test_compute_unknown_and_mismatched() {
        let circle = Dimensions::Circle {
            diameter: Some(10.0),
        };
        assert_eq!(
            compute(MetricMode::Area, DetectedType::Unknown, &circle),
            Err(GeometryError::UnknownSnack)
        );
        assert_eq!(
            compute(MetricMode::Area, DetectedType::Samoosa, &circle),
            Err(GeometryError::MissingDimensions(MetricMode::Area))
        );
        assert!(compute(MetricMode::Area, DetectedType::Parippuvada, &circle).is_ok());
    }

    #[test]
    fn test_normalize_inclination() {
        assert_eq!(normalize_inclination(Some(30.0)), 30.0);
        assert_eq!(normalize_inclination(Some(-90.0)), -90.0);
        assert_eq!(normalize_inclination(Some(90.5)), 0.0);
        assert_eq!(normalize_inclination(None), 0.0);

        let normalized = normalize(Dimensions::Ellipse {
            length: Some(12.0),
            width: Some(6.0),
            inclination: Some(200.0),
        });
        assert_eq!(
            normalized,
            Dimensions::Ellipse {
                length: Some(12.0),
                width: Some(6.0),
                inclination: Some(0.0),
            }
        );
    }

    #[test]
    fn test_error_messages_name_the_mode() {
        assert_eq!(
            GeometryError::MissingDimensions(MetricMode::Perimeter).to_string(),
            "Could not calculate perimeter due to missing or invalid dimensions."
        );
    }
}
