//! Closed-curve line integral between two scales
//!
//! Two scale curves and the two straight connectors joining their endpoints
//! form a closed loop. The circulation of
//! `F(x, y) = (y - y(2x-1)^4, x(2y-1)^4)` around that loop, taken
//! anticlockwise, measures the area between the curves by Green's theorem.
//! The integrand `(2x-1)^4 + (2y-1)^4 - 1` is negative over most of the unit
//! square, so well-separated scales give clearly negative values and scales
//! running close together give values near zero.

use glam::{DVec2, dvec2};

use crate::chebyshev::quadrature::{clenshaw_curtis, gauss_legendre_unit};
use crate::errors::NomogenError;
use crate::layout::ScaleCurve;

/// The vector potential integrated around the loop
#[inline]
pub fn potential(p: DVec2) -> DVec2 {
    let gx = (2.0 * p.x - 1.0).powi(4);
    let gy = (2.0 * p.y - 1.0).powi(4);
    dvec2(p.y - p.y * gx, p.x * gy)
}

/// Which endpoints the straight connectors join
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pairing {
    /// `a.end` to `b.end`, `b.start` to `a.start`
    Direct,
    /// `a.end` to `b.start`, `b.end` to `a.start`
    Crossed,
}

/// Pick the pairing with the shorter total connector length.
///
/// The longer pairing is the one whose connectors cross. Equal lengths leave
/// no way to tell, which is reported rather than guessed.
pub fn choose_pairing(a: &ScaleCurve, b: &ScaleCurve) -> Result<Pairing, NomogenError> {
    let direct = a.end().distance(b.end()) + b.start().distance(a.start());
    let crossed = a.end().distance(b.start()) + b.end().distance(a.start());
    if direct < crossed {
        Ok(Pairing::Direct)
    } else if crossed < direct {
        Ok(Pairing::Crossed)
    } else {
        Err(NomogenError::UnresolvedPairing {
            first: a.id(),
            second: b.id(),
            length: direct,
        })
    }
}

/// Whether the loop through `vertices` runs anticlockwise, judged by the turn
/// at its bottommost-leftmost vertex, which is always convex
pub fn is_anticlockwise(vertices: &[DVec2; 4]) -> bool {
    let mut k = 0;
    for (i, p) in vertices.iter().enumerate().skip(1) {
        let best = vertices[k];
        if p.y < best.y || (p.y == best.y && p.x < best.x) {
            k = i;
        }
    }
    let prev = vertices[(k + 3) % 4];
    let next = vertices[(k + 1) % 4];
    (vertices[k] - prev).perp_dot(next - vertices[k]) >= 0.0
}

/// Circulation along a scale curve from its first node to its last, by
/// Clenshaw-Curtis quadrature over the nodes with spectral tangents
fn curve_circulation(curve: &ScaleCurve) -> f64 {
    let weights = clenshaw_curtis(curve.len(), curve.domain().span());
    curve
        .positions()
        .iter()
        .zip(curve.tangents())
        .zip(&weights)
        .map(|((&p, t), w)| w * potential(p).dot(t))
        .sum()
}

/// Circulation along the straight segment from `from` to `to`
fn segment_circulation(from: DVec2, to: DVec2) -> f64 {
    let delta = to - from;
    gauss_legendre_unit(|s| potential(from + delta * s).dot(delta))
}

/// Anticlockwise circulation around the loop formed by `a`, `b` and the two
/// non-crossing connectors between their endpoints
pub fn enclosed_area(a: &ScaleCurve, b: &ScaleCurve) -> Result<f64, NomogenError> {
    let pairing = choose_pairing(a, b)?;
    let (a0, a1, b0, b1) = (a.start(), a.end(), b.start(), b.end());
    let along_a = curve_circulation(a);
    let along_b = curve_circulation(b);

    let (vertices, circulation) = match pairing {
        Pairing::Direct => (
            [a0, a1, b1, b0],
            along_a + segment_circulation(a1, b1) - along_b + segment_circulation(b0, a0),
        ),
        Pairing::Crossed => (
            [a0, a1, b0, b1],
            along_a + segment_circulation(a1, b0) + along_b + segment_circulation(b1, a0),
        ),
    };

    if is_anticlockwise(&vertices) {
        Ok(circulation)
    } else {
        Ok(-circulation)
    }
}
