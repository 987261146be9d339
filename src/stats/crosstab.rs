/// Square matrix with bounds-checked accessors, used for the conditional
/// mutual information table and the confusion matrix.
#[derive(Debug, Clone)]
pub struct Crosstab<T> {
    cells: Vec<T>,
    dim: usize,
}

impl<T: Copy + Default> Crosstab<T> {
    pub fn new(dim: usize) -> Self {
        Self {
            cells: vec![T::default(); dim * dim],
            dim,
        }
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> T {
        assert!(row < self.dim && col < self.dim, "crosstab index out of range");
        self.cells[row * self.dim + col]
    }

    #[inline]
    pub fn set(&mut self, row: usize, col: usize, value: T) {
        assert!(row < self.dim && col < self.dim, "crosstab index out of range");
        self.cells[row * self.dim + col] = value;
    }

    pub fn fill(&mut self, value: T) {
        self.cells.fill(value);
    }

    pub fn row(&self, row: usize) -> &[T] {
        assert!(row < self.dim, "crosstab row out of range");
        &self.cells[row * self.dim..(row + 1) * self.dim]
    }
}

impl Crosstab<u64> {
    #[inline]
    pub fn add(&mut self, row: usize, col: usize, amount: u64) {
        assert!(row < self.dim && col < self.dim, "crosstab index out of range");
        self.cells[row * self.dim + col] += amount;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_set_and_row() {
        let mut tab = Crosstab::<f64>::new(3);
        tab.set(1, 2, 0.5);
        tab.set(2, 1, 0.25);
        assert_eq!(tab.get(1, 2), 0.5);
        assert_eq!(tab.get(2, 1), 0.25);
        assert_eq!(tab.row(1), &[0.0, 0.0, 0.5]);
    }

    #[test]
    fn test_counter_add() {
        let mut tab = Crosstab::<u64>::new(2);
        tab.add(0, 1, 2);
        tab.add(0, 1, 1);
        assert_eq!(tab.get(0, 1), 3);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_out_of_range_get_panics() {
        let tab = Crosstab::<f64>::new(2);
        tab.get(2, 0);
    }
}
