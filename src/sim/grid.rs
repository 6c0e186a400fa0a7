//! Grid dimensions, seeding, and dispatch math.

use rand::Rng;

/// Dimensions of the cell grid, immutable after creation.
///
/// Shared by all passes through a single uniform buffer; the compute and
/// vertex stages both derive cell coordinates from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridParameters {
    width: u32,
    height: u32,
}

impl GridParameters {
    /// A square grid, the configured shape for the automaton workload.
    #[must_use]
    pub fn square(size: u32) -> Self {
        Self {
            width: size,
            height: size,
        }
    }

    /// Grid width in cells.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Grid height in cells.
    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Total number of cells.
    ///
    /// Widened to `u64` so power-of-two grid edges up to and beyond 65536 do
    /// not overflow the multiply.
    #[must_use]
    pub fn cell_count(&self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }

    /// Byte size of one generation's cell-state buffer (one `u32` per cell).
    #[must_use]
    pub fn state_bytes(&self) -> u64 {
        self.cell_count() * std::mem::size_of::<u32>() as u64
    }

    /// Workgroup counts covering the grid: `ceil(dimension / workgroup)` per
    /// axis.
    #[must_use]
    pub fn dispatch_extent(&self, workgroup_size: u32) -> (u32, u32) {
        (
            self.width.div_ceil(workgroup_size),
            self.height.div_ceil(workgroup_size),
        )
    }

    /// The grid-size uniform payload consumed by the shaders.
    #[must_use]
    pub fn uniform_data(&self) -> [f32; 2] {
        [self.width as f32, self.height as f32]
    }
}

/// Draw an initial cell population: each cell is independently alive with the
/// given probability.
///
/// Probability 0.0 yields all dead cells and 1.0 all alive, since the draw is
/// strictly-less-than against a sample from `[0, 1)`.
pub fn seed_cells<R: Rng>(
    grid: GridParameters,
    alive_probability: f32,
    rng: &mut R,
) -> Vec<u32> {
    (0..grid.cell_count())
        .map(|_| u32::from(rng.random::<f32>() < alive_probability))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn dispatch_covers_grid_exactly_when_divisible() {
        let grid = GridParameters::square(32);
        assert_eq!(grid.dispatch_extent(8), (4, 4));
    }

    #[test]
    fn dispatch_rounds_up_when_not_divisible() {
        let grid = GridParameters::square(33);
        assert_eq!(grid.dispatch_extent(8), (5, 5));

        let grid = GridParameters::square(1);
        assert_eq!(grid.dispatch_extent(8), (1, 1));
    }

    #[test]
    fn state_bytes_is_four_per_cell() {
        let grid = GridParameters::square(32);
        assert_eq!(grid.cell_count(), 1024);
        assert_eq!(grid.state_bytes(), 4096);
    }

    #[test]
    fn cell_count_survives_a_65536_edge() {
        // 65536 * 65536 is one past u32::MAX; the count must widen, not wrap.
        let grid = GridParameters::square(65_536);
        assert_eq!(grid.cell_count(), 4_294_967_296);
        assert_eq!(grid.state_bytes(), 4 * 4_294_967_296);
    }

    #[test]
    fn probability_zero_seeds_all_dead() {
        let grid = GridParameters::square(16);
        let mut rng = StdRng::seed_from_u64(7);
        let cells = seed_cells(grid, 0.0, &mut rng);
        assert_eq!(cells.len(), 256);
        assert!(cells.iter().all(|&c| c == 0));
    }

    #[test]
    fn probability_one_seeds_all_alive() {
        let grid = GridParameters::square(16);
        let mut rng = StdRng::seed_from_u64(7);
        let cells = seed_cells(grid, 1.0, &mut rng);
        assert!(cells.iter().all(|&c| c == 1));
    }

    #[test]
    fn intermediate_probability_seeds_a_mix() {
        let grid = GridParameters::square(64);
        let mut rng = StdRng::seed_from_u64(42);
        let cells = seed_cells(grid, 0.4, &mut rng);
        let alive: u32 = cells.iter().sum();
        // 4096 draws at p=0.4; a wide band around the mean catches only
        // seeding logic errors, not RNG variance.
        assert!(alive > 1200 && alive < 2100, "alive = {alive}");
    }

    #[test]
    fn uniform_data_mirrors_dimensions() {
        let grid = GridParameters::square(32);
        assert_eq!(grid.uniform_data(), [32.0, 32.0]);
    }
}
