use std::any::Any;
use std::fmt::Debug;

pub trait Scalar: Copy + PartialEq + Debug + Any {}
impl<T: Copy + PartialEq + Debug + Any> Scalar for T {}

/// Dense `(row, layer)` storage. A row is a cell, an edge or a boundary segment and the
/// layers of one row are contiguous in memory, top layer first.
#[derive(Clone, Debug)]
pub struct LayeredArray<T: Scalar> {
    values: Vec<T>,

    num_rows: usize,
    num_layers: usize,
}

impl<T: Scalar> LayeredArray<T>
where
    T: Default,
{
    pub fn new(num_rows: usize, num_layers: usize) -> Self {
        LayeredArray {
            num_rows,
            num_layers,
            values: vec![T::default(); num_rows * num_layers],
        }
    }

    #[inline(always)]
    pub fn get(&self, row_idx: usize, layer_idx: usize) -> T {
        self.values[self.index_from_row_and_layer(row_idx, layer_idx)]
    }

    #[inline(always)]
    pub fn set(&mut self, row_idx: usize, layer_idx: usize, value: T) {
        let idx = self.index_from_row_and_layer(row_idx, layer_idx);
        self.values[idx] = value
    }

    pub fn set_all(&mut self, value: T) {
        for x in self.values.iter_mut() {
            *x = value;
        }
    }

    /// Overwrites this array with the contents of `other`, which must have the same shape.
    pub fn copy_from(&mut self, other: &LayeredArray<T>) {
        assert_eq!(
            (self.num_rows, self.num_layers),
            (other.num_rows, other.num_layers),
            "Cannot copy between layered arrays of different shapes."
        );
        self.values.copy_from_slice(&other.values);
    }

    pub fn row(&self, row_idx: usize) -> &[T] {
        let start = row_idx * self.num_layers;
        &self.values[start..start + self.num_layers]
    }

    pub fn num_rows(&self) -> usize {
        self.num_rows
    }

    pub fn num_layers(&self) -> usize {
        self.num_layers
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.values.iter()
    }

    #[inline(always)]
    fn index_from_row_and_layer(&self, row_idx: usize, layer_idx: usize) -> usize {
        debug_assert!(
            row_idx < self.num_rows && layer_idx < self.num_layers,
            "Index ({}, {}) out of bounds for layered array of shape ({}, {}).",
            row_idx,
            layer_idx,
            self.num_rows,
            self.num_layers
        );
        row_idx * self.num_layers + layer_idx
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layers_of_a_row_are_contiguous() {
        let mut field = LayeredArray::<f64>::new(3, 4);
        field.set(1, 0, 1.0);
        field.set(1, 3, 4.0);
        field.set(2, 0, 9.0);

        assert_eq!(field.row(1), &[1.0, 0.0, 0.0, 4.0]);
        assert_eq!(field.get(2, 0), 9.0);
        assert_eq!(field.iter().count(), 12);
    }

    #[test]
    fn set_all_overwrites_every_value() {
        let mut field = LayeredArray::<i8>::new(2, 2);
        field.set(0, 1, 7);
        field.set_all(-1);
        assert!(field.iter().all(|&value| value == -1));
    }

    #[test]
    #[should_panic(expected = "different shapes")]
    fn copy_from_rejects_mismatched_shapes() {
        let mut a = LayeredArray::<f64>::new(2, 3);
        let b = LayeredArray::<f64>::new(3, 2);
        a.copy_from(&b);
    }
}
