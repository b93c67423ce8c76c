//! Collaborator abstraction layer.
//!
//! The batch engine never talks to a graphics API directly; it drives the
//! [`Device`], [`Shader`] and [`Texture`] traits defined here. Concrete
//! backends implement these over their API of choice.

pub mod traits;
pub mod types;

pub use traits::*;
pub use types::*;
