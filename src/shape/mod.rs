//! Silhouette extraction and normalization.
//!
//! This module turns the alpha channel of a cut-out picture into a single
//! closed outline and maps it into the centred model frame.

pub mod contour;
pub mod normalize;
pub mod simplify;

pub use contour::{alpha_mask, crop_to_alpha, extract_contour, CropRect, ExtractOptions};
pub use normalize::normalize_contour;
pub use simplify::simplify_closed;
