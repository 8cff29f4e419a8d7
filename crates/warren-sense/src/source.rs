//! Source state shared by every propagation algorithm.

use thiserror::Error;

use warren_grid::math::wrap_around_f64;
use warren_grid::{Distance, Grid, GridView, Point, SettableGridView};

use crate::{ripple, shadowcast};

#[derive(Debug, Error, PartialEq)]
pub enum SenseSourceError {
    #[error("sense source radius must be positive, got {0}")]
    NonPositiveRadius(f64),
    #[error("sense source intensity must be non-negative, got {0}")]
    NegativeIntensity(f64),
    #[error("sense source span must be within [0, 360] degrees, got {0}")]
    SpanOutOfRange(f64),
}

/// How far each step of a ripple spread reaches for contributing neighbors:
/// low counts give tight beams, high counts a loose diffuse glow.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RippleType {
    Regular,
    Loose,
    Tight,
    VeryLoose,
}

impl RippleType {
    pub(crate) fn spread_neighbors(self) -> usize {
        match self {
            RippleType::Regular => 2,
            RippleType::Loose => 3,
            RippleType::Tight => 1,
            RippleType::VeryLoose => 6,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SourceAlgorithm {
    RecursiveShadowcasting,
    Ripple(RippleType),
}

/// One emitter of scalar intensity.
///
/// The source owns a square local buffer of side `2 * floor(radius) + 1`
/// centered on itself; a sense map stamps that buffer into its shared result
/// view. Angles are compass style on the outside (0 = up, clockwise) and kept
/// rotated by -90 degrees internally so 0 lines up with the +x axis.
#[derive(Debug)]
pub struct SenseSource {
    algorithm: SourceAlgorithm,
    position: Point,
    radius: f64,
    intensity: f64,
    decay: f64,
    distance: Distance,
    angle_internal: f64,
    span: f64,
    enabled: bool,
    buffer: Grid<f64>,
}

impl SenseSource {
    pub fn new(
        algorithm: SourceAlgorithm,
        position: Point,
        radius: f64,
        distance: Distance,
    ) -> Result<Self, SenseSourceError> {
        if radius <= 0.0 {
            return Err(SenseSourceError::NonPositiveRadius(radius));
        }
        let size = buffer_size(radius);
        Ok(Self {
            algorithm,
            position,
            radius,
            intensity: 1.0,
            decay: 1.0 / (radius + 1.0),
            distance,
            angle_internal: wrap_around_f64(-90.0, 360.0),
            span: 360.0,
            enabled: true,
            buffer: Grid::filled(size, size, 0.0),
        })
    }

    pub fn algorithm(&self) -> SourceAlgorithm {
        self.algorithm
    }

    pub fn position(&self) -> Point {
        self.position
    }

    pub fn set_position(&mut self, position: Point) {
        self.position = position;
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Rejects non-positive radii; otherwise resizes and clears the local
    /// buffer and recomputes the decay.
    pub fn set_radius(&mut self, radius: f64) -> Result<(), SenseSourceError> {
        if radius <= 0.0 {
            return Err(SenseSourceError::NonPositiveRadius(radius));
        }
        self.radius = radius;
        self.decay = self.intensity / (radius + 1.0);
        let size = buffer_size(radius);
        self.buffer = Grid::filled(size, size, 0.0);
        Ok(())
    }

    pub fn intensity(&self) -> f64 {
        self.intensity
    }

    pub fn set_intensity(&mut self, intensity: f64) -> Result<(), SenseSourceError> {
        if intensity < 0.0 {
            return Err(SenseSourceError::NegativeIntensity(intensity));
        }
        self.intensity = intensity;
        self.decay = intensity / (self.radius + 1.0);
        Ok(())
    }

    pub fn decay(&self) -> f64 {
        self.decay
    }

    pub fn distance(&self) -> Distance {
        self.distance
    }

    pub fn set_distance(&mut self, distance: Distance) {
        self.distance = distance;
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Compass angle of the restriction arc's center: 0 = up, clockwise.
    pub fn angle(&self) -> f64 {
        wrap_around_f64(self.angle_internal + 90.0, 360.0)
    }

    pub fn set_angle(&mut self, angle: f64) {
        self.angle_internal = wrap_around_f64(angle - 90.0, 360.0);
    }

    pub fn span(&self) -> f64 {
        self.span
    }

    /// Width of the restriction arc in degrees; anything below 360 turns the
    /// restriction on.
    pub fn set_span(&mut self, span: f64) -> Result<(), SenseSourceError> {
        if !(0.0..=360.0).contains(&span) {
            return Err(SenseSourceError::SpanOutOfRange(span));
        }
        self.span = span;
        Ok(())
    }

    pub fn is_angle_restricted(&self) -> bool {
        self.span != 360.0
    }

    /// The local result buffer from the last calculation.
    pub fn buffer(&self) -> &Grid<f64> {
        &self.buffer
    }

    pub(crate) fn buffer_mut(&mut self) -> &mut Grid<f64> {
        &mut self.buffer
    }

    /// Side length of the local buffer.
    pub fn size(&self) -> usize {
        self.buffer.width()
    }

    /// Index of the source's own cell on both buffer axes.
    pub fn center(&self) -> i32 {
        (self.size() / 2) as i32
    }

    pub(crate) fn angle_internal(&self) -> f64 {
        self.angle_internal
    }

    /// Buffer coordinates of a global position, unchecked.
    pub(crate) fn local_of(&self, global: Point) -> Point {
        global - self.position + Point::new(self.center(), self.center())
    }

    /// Global coordinates of a buffer position.
    pub(crate) fn global_of(&self, local: Point) -> Point {
        self.position + local - Point::new(self.center(), self.center())
    }

    /// Clears the buffer, seeds the center with the full intensity, and runs
    /// the configured algorithm against `resistance`. Disabled sources only
    /// clear.
    pub fn calculate<V: GridView<f64>>(&mut self, resistance: &V) {
        self.buffer.fill(0.0);
        if !self.enabled {
            return;
        }
        let center = Point::new(self.center(), self.center());
        self.buffer.set(center, self.intensity);
        match self.algorithm {
            SourceAlgorithm::RecursiveShadowcasting => shadowcast::spread(self, resistance),
            SourceAlgorithm::Ripple(ripple_type) => {
                ripple::spread(self, resistance, ripple_type.spread_neighbors())
            }
        }
    }
}

fn buffer_size(radius: f64) -> usize {
    2 * (radius.floor() as usize) + 1
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source(radius: f64) -> SenseSource {
        SenseSource::new(
            SourceAlgorithm::RecursiveShadowcasting,
            Point::new(5, 5),
            radius,
            Distance::Chebyshev,
        )
        .unwrap()
    }

    #[test]
    fn buffer_is_sized_from_the_radius() {
        let mut emitter = source(3.0);
        assert_eq!(emitter.size(), 7);
        assert_eq!(emitter.center(), 3);

        emitter.set_radius(5.9).unwrap();
        assert_eq!(emitter.size(), 11);
        assert_eq!(emitter.center(), 5);
    }

    #[test]
    fn decay_follows_radius_and_intensity() {
        let mut emitter = source(3.0);
        assert!((emitter.decay() - 0.25).abs() < 1e-12);

        emitter.set_intensity(2.0).unwrap();
        assert!((emitter.decay() - 0.5).abs() < 1e-12);

        emitter.set_radius(7.0).unwrap();
        assert!((emitter.decay() - 0.25).abs() < 1e-12);
    }

    #[test]
    fn invalid_parameters_are_rejected() {
        assert_eq!(
            SenseSource::new(
                SourceAlgorithm::RecursiveShadowcasting,
                Point::new(0, 0),
                0.0,
                Distance::Chebyshev,
            )
            .unwrap_err(),
            SenseSourceError::NonPositiveRadius(0.0)
        );
        let mut emitter = source(3.0);
        assert_eq!(emitter.set_radius(-1.0).unwrap_err(), SenseSourceError::NonPositiveRadius(-1.0));
        assert_eq!(
            emitter.set_intensity(-0.5).unwrap_err(),
            SenseSourceError::NegativeIntensity(-0.5)
        );
        assert_eq!(emitter.set_span(400.0).unwrap_err(), SenseSourceError::SpanOutOfRange(400.0));
    }

    #[test]
    fn external_angle_is_compass_style() {
        let mut emitter = source(3.0);
        emitter.set_angle(0.0);
        assert_eq!(emitter.angle(), 0.0);
        assert_eq!(emitter.angle_internal(), 270.0);

        emitter.set_angle(90.0);
        assert_eq!(emitter.angle_internal(), 0.0);
        assert_eq!(emitter.angle(), 90.0);

        assert!(!emitter.is_angle_restricted());
        emitter.set_span(90.0).unwrap();
        assert!(emitter.is_angle_restricted());
        emitter.set_span(360.0).unwrap();
        assert!(!emitter.is_angle_restricted());
    }

    #[test]
    fn disabled_sources_only_clear_their_buffer() {
        let resistance = Grid::<f64>::filled(12, 12, 0.0);
        let mut emitter = source(3.0);
        emitter.calculate(&resistance);
        assert!(emitter.buffer().cells().iter().any(|&value| value > 0.0));

        emitter.set_enabled(false);
        emitter.calculate(&resistance);
        assert!(emitter.buffer().cells().iter().all(|&value| value == 0.0));
    }
}
