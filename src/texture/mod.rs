//! Texture preparation.
//!
//! The cut-out picture is flattened onto an opaque background and a solid
//! seam-colour band is appended below it, so the seam ribbon can sample a
//! uniform colour from the same image as the caps.

mod compositor;

pub use compositor::{prepare_texture, PreparedTexture, TextureOptions};
