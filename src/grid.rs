use crate::particle::ParticleId;

/// Exclusive-occupancy map over a fixed width x height domain, keyed by
/// row-major linear cell index. At most one particle per cell.
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<Option<ParticleId>>,
}

impl Grid {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![None; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Number of cells in the domain.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Whether a signed candidate index falls inside the domain. Candidates
    /// come from offset arithmetic and may be negative or past the end.
    pub fn in_domain(&self, index: i64) -> bool {
        index >= 0 && (index as usize) < self.cells.len()
    }

    pub fn occupant_at(&self, index: usize) -> Option<ParticleId> {
        self.cells[index]
    }

    /// Occupy a cell. Callers check occupancy first; placing onto an
    /// occupied cell is a no-op so a missed check cannot corrupt the map.
    pub fn place(&mut self, index: usize, id: ParticleId) {
        if self.cells[index].is_none() {
            self.cells[index] = Some(id);
        }
    }

    pub fn clear(&mut self, index: usize) {
        self.cells[index] = None;
    }

    /// (x, y) of a linear index.
    pub fn index_to_coord(&self, index: usize) -> (usize, usize) {
        (index % self.width, index / self.width)
    }

    /// Linear index of an (x, y) coordinate.
    pub fn coord_to_index(&self, x: usize, y: usize) -> usize {
        y * self.width + x
    }

    /// Signed variant used for edge-reseeded positions, which may carry
    /// coordinates outside the domain after padding.
    pub fn signed_index(&self, x: i64, y: i64) -> i64 {
        y * self.width as i64 + x
    }
}
