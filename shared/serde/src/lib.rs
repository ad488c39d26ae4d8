//! # Scenesync Serde
//! Bit-level serialization for the scenesync wire protocol: a growable
//! [`BitWriter`], a bounds-checked [`BitReader`], a hashing [`HashWriter`]
//! sink, and the [`Serde`] trait implemented for primitives, strings,
//! collections and `glam` math types.

#![deny(trivial_numeric_casts, unstable_features, unused_import_braces)]

mod bit_reader;
mod bit_writer;
mod error;
mod hash_writer;
mod impls;
mod integer;
mod serde;

pub use bit_reader::BitReader;
pub use bit_writer::{BitWrite, BitWriter};
pub use error::SerdeErr;
pub use hash_writer::HashWriter;
pub use integer::{SerdeInteger, SignedVariableInteger, UnsignedVariableInteger};
pub use serde::Serde;
