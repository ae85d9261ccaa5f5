use crate::models::Record;

/// 1 if `value > threshold`, else 0. A value equal to the threshold is negative.
pub fn binarize(value: f32, threshold: f32) -> u8 {
    u8::from(value > threshold)
}

/// Threshold a label into the {0, 1} recommendation classes
///
/// Bare labels map to `u8`; records keep their shape with the label replaced by
/// `0.0` or `1.0`.
pub trait Binarize {
    type Output;

    fn binarize(self, threshold: f32) -> Self::Output;
}

impl Binarize for f32 {
    type Output = u8;

    fn binarize(self, threshold: f32) -> u8 {
        binarize(self, threshold)
    }
}

impl Binarize for Record {
    type Output = Record;

    fn binarize(self, threshold: f32) -> Record {
        Record {
            label: f32::from(binarize(self.label, threshold)),
            ..self
        }
    }
}

pub fn binarize_all<T: Binarize>(values: Vec<T>, threshold: f32) -> Vec<T::Output> {
    values.into_iter().map(|v| v.binarize(threshold)).collect()
}
