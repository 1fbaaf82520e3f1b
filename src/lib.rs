//! Synthetic blob masks.
//!
//! A blob is a randomly perturbed circle rasterized onto a square frame.
//! [`generate`] builds one mask from [`BlobParams`] and an injected random
//! source; [`BlobWriter`] saves masks as grayscale PNG files.
//!
//! ```no_run
//! use blobber::{generate, BlobParams, InterpKind};
//! use rand::SeedableRng;
//!
//! let params = BlobParams::new(128, 0.5, 10, InterpKind::CUBIC);
//! let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(3);
//! let mask = generate(&params, &mut rng).unwrap();
//! assert_eq!(mask.height(), 128);
//! ```

pub mod blob;
pub mod error;
pub mod grid;
pub mod interp;
pub mod mask;
pub mod output;
pub mod params;

pub use blob::{generate, generate_many, generate_many_par};
pub use error::{BlobError, Result};
pub use interp::{BoundaryFunction, InterpKind};
pub use mask::{Mask, Palette};
pub use output::BlobWriter;
pub use params::BlobParams;
