use crate::grid::Grid;
use crate::particle::{Particle, ParticleId};
use rand::Rng;

/// Axis-aligned bounding box of the settled aggregate, padded outward by
/// the configured bound width. Coordinates are signed because the padding
/// can reach past the domain edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds {
    pub min_x: i64,
    pub max_x: i64,
    pub min_y: i64,
    pub max_y: i64,
}

impl Bounds {
    /// Inverted box; only meaningful once at least one particle has
    /// settled. The seed particle guarantees that from step one.
    pub fn empty(width: usize, height: usize) -> Self {
        Self {
            min_x: width as i64,
            max_x: 0,
            min_y: height as i64,
            max_y: 0,
        }
    }

    /// Scan the inactive particles and pad the result on all four sides.
    /// Active walkers never define the structure's extent.
    pub fn of_inactive(
        grid: &Grid,
        particles: &[Particle],
        inactive: &[ParticleId],
        pad: usize,
    ) -> Self {
        let mut bounds = Bounds::empty(grid.width(), grid.height());
        for &id in inactive {
            let (x, y) = grid.index_to_coord(particles[id].pos);
            let (x, y) = (x as i64, y as i64);
            bounds.min_x = bounds.min_x.min(x);
            bounds.max_x = bounds.max_x.max(x);
            bounds.min_y = bounds.min_y.min(y);
            bounds.max_y = bounds.max_y.max(y);
        }
        let pad = pad as i64;
        bounds.min_x -= pad;
        bounds.max_x += pad;
        bounds.min_y -= pad;
        bounds.max_y += pad;
        bounds
    }

    pub fn contains(&self, x: i64, y: i64) -> bool {
        x >= self.min_x && x <= self.max_x && y >= self.min_y && y <= self.max_y
    }

    pub fn area(&self) -> i64 {
        (self.max_x - self.min_x) * (self.max_y - self.min_y)
    }

    /// Pick a coordinate near the box perimeter: one coin flip chooses the
    /// vertical or horizontal edge pair, the long axis is uniform over the
    /// box, and a second flip offsets into the box from either edge by up
    /// to `band`. The result is rounded but not checked against occupancy
    /// or the domain; callers re-check before using it.
    pub fn edge_point<R: Rng>(&self, band: usize, rng: &mut R) -> (i64, i64) {
        let offset = rng.gen::<f64>() * band as f64;
        let (x, y) = if rng.gen::<bool>() {
            let y = rng.gen::<f64>() * (self.max_y - self.min_y) as f64 + self.min_y as f64;
            let x = if rng.gen::<bool>() {
                self.min_x as f64 + offset
            } else {
                self.max_x as f64 - offset
            };
            (x, y)
        } else {
            let x = rng.gen::<f64>() * (self.max_x - self.min_x) as f64 + self.min_x as f64;
            let y = if rng.gen::<bool>() {
                self.min_y as f64 + offset
            } else {
                self.max_y as f64 - offset
            };
            (x, y)
        };
        (x.round() as i64, y.round() as i64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn settled(pos: usize) -> Particle {
        Particle::new(pos, [0, 0, 0, 255], false, None)
    }

    #[test]
    fn test_bounds_of_single_seed() {
        let grid = Grid::new(10, 10);
        let particles = vec![settled(55)]; // (5, 5)
        let bounds = Bounds::of_inactive(&grid, &particles, &[0], 2);
        assert_eq!(
            bounds,
            Bounds {
                min_x: 3,
                max_x: 7,
                min_y: 3,
                max_y: 7,
            }
        );
        assert_eq!(bounds.area(), 16);
    }

    #[test]
    fn test_bounds_span_multiple_particles() {
        let grid = Grid::new(20, 20);
        // (2, 1) and (9, 12)
        let particles = vec![settled(22), settled(249)];
        let bounds = Bounds::of_inactive(&grid, &particles, &[0, 1], 3);
        assert_eq!(bounds.min_x, -1);
        assert_eq!(bounds.max_x, 12);
        assert_eq!(bounds.min_y, -2);
        assert_eq!(bounds.max_y, 15);
    }

    #[test]
    fn test_bounds_ignore_active_particles() {
        let grid = Grid::new(10, 10);
        let particles = vec![settled(55), Particle::new(0, [0, 0, 0, 255], true, None)];
        // Only id 0 is in the inactive list; the walker at (0, 0) must not
        // widen the box.
        let bounds = Bounds::of_inactive(&grid, &particles, &[0], 1);
        assert_eq!(bounds.min_x, 4);
        assert_eq!(bounds.min_y, 4);
    }

    #[test]
    fn test_empty_bounds_are_inverted() {
        let bounds = Bounds::empty(10, 10);
        assert!(bounds.min_x > bounds.max_x);
        assert!(bounds.min_y > bounds.max_y);
    }

    #[test]
    fn test_edge_point_stays_in_perimeter_band() {
        let bounds = Bounds {
            min_x: 10,
            max_x: 50,
            min_y: 20,
            max_y: 60,
        };
        let band = 5;
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..500 {
            let (x, y) = bounds.edge_point(band, &mut rng);
            assert!(bounds.contains(x, y), "({}, {}) escaped the box", x, y);
            let near_x = x <= bounds.min_x + band as i64 || x >= bounds.max_x - band as i64;
            let near_y = y <= bounds.min_y + band as i64 || y >= bounds.max_y - band as i64;
            assert!(near_x || near_y, "({}, {}) is not near any edge", x, y);
        }
    }
}
