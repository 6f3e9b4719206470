//! # bitframe
//!
//! A schema-driven codec for bit-packed binary formats: protocol headers,
//! hardware registers and wire formats whose fields are not byte-aligned.
//!
//! Records are grouped into words of 8 to 64 bits (in byte multiples), each
//! subdivided into unsigned-integer and boolean fields of declared bit
//! length. Field offsets are never written down; they are derived from
//! declaration order, with the first field in the most-significant bits.
//! Layouts are validated and derived once per record type, cached, and used
//! to marshal records to big-endian byte-packed buffers and back.
//!
//! ## Example
//!
//! ```
//! use bitframe::{Codec, Record, RecordWord};
//!
//! #[derive(Debug, Default, PartialEq, Record)]
//! struct Frame {
//!     #[word("16")]
//!     header: FrameHeader,
//! }
//!
//! #[derive(Debug, Default, PartialEq, RecordWord)]
//! struct FrameHeader {
//!     #[bits("4")]
//!     version: u8,
//!     #[bits("1")]
//!     ack: bool,
//!     #[bits("11")]
//!     length: u16,
//! }
//!
//! let codec = Codec::new();
//!
//! let frame = Frame {
//!     header: FrameHeader { version: 2, ack: true, length: 1024 },
//! };
//!
//! let bytes = codec.marshal(&frame).unwrap();
//! assert_eq!(bytes, [0b0010_1100, 0b0000_0000]);
//!
//! let mut decoded = Frame::default();
//! codec.unmarshal(&bytes, &mut decoded).unwrap();
//! assert_eq!(decoded, frame);
//! ```

pub mod codec;
pub mod errors;
pub mod field;
pub mod format;
pub mod record;
pub mod shape;
pub mod word;

pub use codec::Codec;
pub use errors::{MarshalError, SchemaError, UnmarshalError};
pub use field::{Field, FieldKind};
pub use format::Format;
pub use record::{Record, RecordWord};
pub use shape::{FieldShape, RecordShape, ShapeKind, WordBody, WordShape};
pub use word::Word;

pub use bitframe_derive::{Record, RecordWord};
