//! Strongly-typed inputs for the layout engine.
//!
//! Values crossing into the pipeline are validated once, here, so the
//! numerical stages can rely on finite bounds, `min < max`, an odd node count
//! of at least three and a positive output size.

use std::fmt;

use glam::{DVec2, dvec2};

use crate::defaults;
use crate::errors::NomogenError;

/// One of the three scales of a nomogram, `w = f(u, v)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScaleId {
    U,
    V,
    W,
}

impl ScaleId {
    pub const ALL: [ScaleId; 3] = [ScaleId::U, ScaleId::V, ScaleId::W];

    /// Position of this scale in per-scale arrays and in the layout vector
    #[inline]
    pub const fn index(self) -> usize {
        match self {
            ScaleId::U => 0,
            ScaleId::V => 1,
            ScaleId::W => 2,
        }
    }
}

impl fmt::Display for ScaleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScaleId::U => write!(f, "u"),
            ScaleId::V => write!(f, "v"),
            ScaleId::W => write!(f, "w"),
        }
    }
}

/// Closed interval of values covered by one scale
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Domain {
    min: f64,
    max: f64,
}

impl Domain {
    /// Create a domain, rejecting non-finite or inverted bounds
    pub fn new(scale: ScaleId, min: f64, max: f64) -> Result<Domain, NomogenError> {
        if !min.is_finite() || !max.is_finite() {
            return Err(NomogenError::NonFiniteBound { scale, min, max });
        }
        if max <= min {
            return Err(NomogenError::InvertedDomain { scale, min, max });
        }
        Ok(Domain { min, max })
    }

    #[inline]
    pub fn min(&self) -> f64 {
        self.min
    }

    #[inline]
    pub fn max(&self) -> f64 {
        self.max
    }

    #[inline]
    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    /// Map a value to `[0, 1]` across the domain (unclamped)
    #[inline]
    pub fn normalize(&self, value: f64) -> f64 {
        (value - self.min) / self.span()
    }

    /// The value at fraction `t` of the way from `min` to `max`
    ///
    /// `t == 1.0` returns `max` exactly.
    #[inline]
    pub fn lerp(&self, t: f64) -> f64 {
        if t == 1.0 {
            self.max
        } else {
            self.min + self.span() * t
        }
    }

    /// Whether `value` lies inside the domain, allowing rounding noise of
    /// [`defaults::RANGE_TOLERANCE`] relative to the span
    pub fn admits(&self, value: f64) -> bool {
        let slack = defaults::RANGE_TOLERANCE * self.span();
        value.is_finite() && value >= self.min - slack && value <= self.max + slack
    }
}

/// Number of Chebyshev nodes per scale: odd and at least 3
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct NodeCount(usize);

impl NodeCount {
    /// Validate a requested node count, bumping even counts to the next odd one
    pub fn new(requested: usize) -> Result<NodeCount, NomogenError> {
        if requested < 3 {
            return Err(NomogenError::TooFewNodes { requested });
        }
        Ok(NodeCount(requested | 1))
    }

    #[inline]
    pub const fn get(self) -> usize {
        self.0
    }
}

impl Default for NodeCount {
    fn default() -> Self {
        NodeCount(defaults::NODES)
    }
}

/// Physical size of the printed nomogram in millimetres
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OutputSize {
    width_mm: f64,
    height_mm: f64,
}

impl OutputSize {
    pub fn new(width_mm: f64, height_mm: f64) -> Result<OutputSize, NomogenError> {
        let valid = |v: f64| v.is_finite() && v > 0.0;
        if !valid(width_mm) || !valid(height_mm) {
            return Err(NomogenError::InvalidOutputSize { width_mm, height_mm });
        }
        Ok(OutputSize { width_mm, height_mm })
    }

    #[inline]
    pub fn width_mm(&self) -> f64 {
        self.width_mm
    }

    #[inline]
    pub fn height_mm(&self) -> f64 {
        self.height_mm
    }

    /// Printer dots per unit of unit-square area.
    ///
    /// Two points whose squared unit-square distance times this value is at
    /// most 1 fall on the same dot.
    pub fn resolution(&self) -> f64 {
        self.width_mm * self.height_mm * defaults::DOTS_PER_MM * defaults::DOTS_PER_MM
    }

    /// Side of the square verification grid, about one sample per millimetre
    pub fn grid_density(&self) -> usize {
        ((self.width_mm * self.height_mm).sqrt().round() as usize).max(2)
    }

    /// Convert a unit-square position to millimetres
    #[inline]
    pub fn to_mm(&self, p: DVec2) -> DVec2 {
        dvec2(p.x * self.width_mm, p.y * self.height_mm)
    }
}

impl Default for OutputSize {
    fn default() -> Self {
        OutputSize {
            width_mm: defaults::WIDTH_MM,
            height_mm: defaults::HEIGHT_MM,
        }
    }
}
