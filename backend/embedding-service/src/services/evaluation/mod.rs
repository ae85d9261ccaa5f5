/// Evaluation Module
///
/// Label thresholding, request formatting and accuracy for the
/// recommendation (binary) model.
pub mod accuracy;
pub mod binarize;
pub mod inference;

pub use accuracy::{class_accuracy, response_accuracy};
pub use binarize::{binarize, binarize_all, Binarize};
pub use inference::to_inference_request;
