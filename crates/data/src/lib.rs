//! Structured data for save files.
//!
//! A [`DataObject`] is a string-keyed tree of [`DataBox`] values. Save files,
//! registry ID maps and per-item payloads are all written through it, either
//! directly or through the streaming [`DataSink`] trait. The binary form is
//! postcard over the serde representation (see [`DataObject::to_bytes`]).

mod error;
mod object;
mod value;

pub use error::{DataError, Result};
pub use object::{DataObject, DataSink};
pub use value::{DataBox, DataType, FromDataBox};
