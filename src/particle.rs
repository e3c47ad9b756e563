use rand::Rng;
use serde::{Deserialize, Serialize};

/// RGBA color assigned to a particle at creation.
pub type Rgba = [u8; 4];

/// Identifier of a particle within the engine's particle list.
pub type ParticleId = usize;

/// The four lattice directions a walker can take.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Right,
    Left,
    Up,
    Down,
}

impl Direction {
    /// Offset over the linear grid index for a grid of the given width.
    /// Left/right deliberately do not special-case row edges: stepping
    /// left from column 0 lands on the previous row's last cell. This
    /// matches the lattice the simulation has always run on.
    pub fn offset(&self, width: usize) -> i64 {
        match self {
            Direction::Right => 1,
            Direction::Left => -1,
            Direction::Up => -(width as i64),
            Direction::Down => width as i64,
        }
    }

    /// All four directions, in settle-check order.
    pub fn all() -> [Direction; 4] {
        [
            Direction::Right,
            Direction::Left,
            Direction::Up,
            Direction::Down,
        ]
    }

    /// Draw a direction uniformly at random.
    pub fn random<R: Rng>(rng: &mut R) -> Direction {
        match rng.gen_range(0..4) {
            0 => Direction::Right,
            1 => Direction::Left,
            2 => Direction::Up,
            _ => Direction::Down,
        }
    }
}

/// A single particle: either an active walker or a settled part of the
/// aggregate. Settling is terminal; settled particles are never removed.
#[derive(Debug, Clone)]
pub struct Particle {
    /// Linear cell index; kept in sync with the grid occupancy.
    pub pos: usize,
    /// Fixed at creation, immutable thereafter.
    pub color: Rgba,
    /// `true` while walking, `false` once part of the aggregate.
    pub active: bool,
    /// Fixed walk direction (determined mode only); `None` means a fresh
    /// random direction is drawn on every move attempt.
    pub direction: Option<Direction>,
    /// Transient per-step flag, recomputed on every move.
    pub has_moved: bool,
}

impl Particle {
    pub fn new(pos: usize, color: Rgba, active: bool, direction: Option<Direction>) -> Self {
        Self {
            pos,
            color,
            active,
            direction,
            has_moved: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_direction_offsets() {
        let width = 10;
        assert_eq!(Direction::Right.offset(width), 1);
        assert_eq!(Direction::Left.offset(width), -1);
        assert_eq!(Direction::Up.offset(width), -10);
        assert_eq!(Direction::Down.offset(width), 10);
    }

    #[test]
    fn test_random_direction_covers_all_variants() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut seen = [false; 4];
        for _ in 0..200 {
            match Direction::random(&mut rng) {
                Direction::Right => seen[0] = true,
                Direction::Left => seen[1] = true,
                Direction::Up => seen[2] = true,
                Direction::Down => seen[3] = true,
            }
        }
        assert!(seen.iter().all(|&s| s));
    }

    #[test]
    fn test_new_particle_has_not_moved() {
        let p = Particle::new(55, [0, 0, 0, 255], true, None);
        assert!(!p.has_moved);
        assert!(p.active);
        assert_eq!(p.pos, 55);
    }
}
