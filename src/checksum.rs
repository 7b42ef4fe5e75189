use crate::layered_array::LayeredArray;
use crate::WorkingPrecision;

pub fn field_checksum(field: &LayeredArray<WorkingPrecision>) -> WorkingPrecision {
    values_checksum(field.iter())
}

pub fn values_checksum<'a>(values: impl Iterator<Item = &'a WorkingPrecision>) -> WorkingPrecision {
    values.map(|value| value.abs()).sum()
}
