/// A bounded 2D grid of cells stored contiguously in row-major order.
///
/// Cells are addressed by `(x, y)` with `x < width` and `y < height`. Unlike a
/// planetary map nothing wraps: the landscape is a flat rectangle whose outer
/// border is the map edge.
#[derive(Clone, Debug)]
pub struct Tilemap<T> {
    pub width: usize,
    pub height: usize,
    data: Vec<T>,
}

impl<T: Clone + Default> Tilemap<T> {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            data: vec![T::default(); width * height],
        }
    }
}

impl<T: Clone> Tilemap<T> {
    pub fn new_with(width: usize, height: usize, value: T) -> Self {
        Self {
            width,
            height,
            data: vec![value; width * height],
        }
    }

    /// Linear index of a cell. Panics when the cell lies outside the map.
    pub fn index(&self, x: usize, y: usize) -> usize {
        assert!(
            x < self.width && y < self.height,
            "cell ({}, {}) outside {}x{} map",
            x,
            y,
            self.width,
            self.height
        );
        y * self.width + x
    }

    pub fn in_bounds(&self, x: i64, y: i64) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height
    }

    /// True when the cell sits on the outer border of the map.
    pub fn is_border(&self, x: usize, y: usize) -> bool {
        x == 0 || y == 0 || x + 1 == self.width || y + 1 == self.height
    }

    pub fn get(&self, x: usize, y: usize) -> &T {
        &self.data[self.index(x, y)]
    }

    pub fn get_mut(&mut self, x: usize, y: usize) -> &mut T {
        let idx = self.index(x, y);
        &mut self.data[idx]
    }

    /// In-bounds 8-connected neighbours, scanning dx then dy from -1 to 1.
    pub fn neighbors_8(&self, x: usize, y: usize) -> Vec<(usize, usize)> {
        let mut result = Vec::with_capacity(8);

        for dx in -1i64..=1 {
            for dy in -1i64..=1 {
                if dx == 0 && dy == 0 {
                    continue;
                }
                let nx = x as i64 + dx;
                let ny = y as i64 + dy;
                if self.in_bounds(nx, ny) {
                    result.push((nx as usize, ny as usize));
                }
            }
        }

        result
    }

    /// Inclusive-exclusive bounding box `(xmin, xmax, ymin, ymax)` of a square
    /// of the given radius around a centre, clipped to the map.
    pub fn clipped_box(&self, cx: usize, cy: usize, radius: usize) -> (usize, usize, usize, usize) {
        let xmin = cx.saturating_sub(radius);
        let xmax = (cx + radius + 1).min(self.width);
        let ymin = cy.saturating_sub(radius);
        let ymax = (cy + radius + 1).min(self.height);
        (xmin, xmax, ymin, ymax)
    }

    /// Iterate over all cells with their coordinates.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, &T)> {
        let width = self.width;
        self.data.iter().enumerate().map(move |(idx, val)| {
            let x = idx % width;
            let y = idx / width;
            (x, y, val)
        })
    }

    /// Iterate mutably over all cells with their coordinates.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (usize, usize, &mut T)> {
        let width = self.width;
        self.data.iter_mut().enumerate().map(move |(idx, val)| {
            let x = idx % width;
            let y = idx / width;
            (x, y, val)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_row_major() {
        let map: Tilemap<u8> = Tilemap::new(7, 3);
        assert_eq!(map.index(5, 2), 19);
        assert_eq!(map.index(0, 1), 7);
    }

    #[test]
    fn test_neighbors_do_not_wrap() {
        let map: Tilemap<u8> = Tilemap::new(4, 4);
        assert_eq!(map.neighbors_8(0, 0), vec![(0, 1), (1, 0), (1, 1)]);
        assert_eq!(map.neighbors_8(3, 3).len(), 3);
        assert_eq!(map.neighbors_8(1, 1).len(), 8);
    }

    #[test]
    fn test_clipped_box() {
        let map: Tilemap<u8> = Tilemap::new(10, 10);
        assert_eq!(map.clipped_box(1, 8, 3), (0, 5, 5, 10));
    }

    #[test]
    fn test_border() {
        let map: Tilemap<u8> = Tilemap::new(5, 4);
        assert!(map.is_border(0, 2));
        assert!(map.is_border(2, 3));
        assert!(!map.is_border(2, 2));
    }

    #[test]
    #[should_panic]
    fn test_out_of_bounds_panics() {
        let map: Tilemap<u8> = Tilemap::new(2, 2);
        map.get(2, 0);
    }
}
