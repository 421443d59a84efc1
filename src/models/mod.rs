//! Data models module
//!
//! Defines the classification request/response shapes and the wire types of
//! the hosted inference API

pub mod classification;
pub mod huggingface;

pub use classification::{
    ClassificationRequest, ClassificationResponse, ClassificationResult, RankedLabels,
    ResponseDetails,
};
