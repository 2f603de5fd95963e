pub mod interface;
pub mod client;

pub use interface::{Classifier, ClassifierError, ImageUpload, Prediction};
pub use client::RemoteClassifier;
