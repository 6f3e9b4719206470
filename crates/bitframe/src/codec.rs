//! Codec: the public marshal/unmarshal entry point and its format cache.

use std::{
    any::TypeId,
    collections::HashMap,
    sync::{Arc, PoisonError, RwLock},
};

use crate::{
    errors::{MarshalError, SchemaError, UnmarshalError},
    format::Format,
    record::Record,
};

/// Marshals and unmarshals [Record] types, deriving each type's [Format]
/// on first use and caching it for the codec's lifetime.
///
/// A `Codec` is `Send + Sync`; callers that want a process-wide instance
/// construct one at startup and share it by reference. Cached formats are
/// never evicted or updated. Concurrent first resolutions of the same type
/// may derive the format more than once, but all callers converge on a
/// single cached value and never observe a partial one.
///
/// ```
/// use bitframe::{Codec, Record, RecordWord};
///
/// #[derive(Debug, Default, PartialEq, Record)]
/// struct Frame {
///     #[word("16")]
///     header: FrameHeader,
/// }
///
/// #[derive(Debug, Default, PartialEq, RecordWord)]
/// struct FrameHeader {
///     #[bits("4")]
///     version: u8,
///     #[bits("1")]
///     ack: bool,
///     #[bits("11")]
///     length: u16,
/// }
///
/// let codec = Codec::new();
///
/// let frame = Frame {
///     header: FrameHeader { version: 2, ack: true, length: 1024 },
/// };
///
/// let bytes = codec.marshal(&frame).unwrap();
/// assert_eq!(bytes, [0b0010_1100, 0b0000_0000]);
///
/// let mut decoded = Frame::default();
/// codec.unmarshal(&bytes, &mut decoded).unwrap();
/// assert_eq!(decoded, frame);
/// ```
pub struct Codec {
    formats: RwLock<HashMap<TypeId, Arc<Format>>>,
}

impl Codec {
    pub fn new() -> Self {
        Codec {
            formats: RwLock::new(HashMap::new()),
        }
    }

    /// The derived format of `T`, from the cache when already resolved.
    /// A format that fails validation is never cached.
    pub fn format_of<T: Record>(&self) -> Result<Arc<Format>, SchemaError> {
        let key = TypeId::of::<T>();

        {
            let formats = self.formats.read().unwrap_or_else(PoisonError::into_inner);

            if let Some(format) = formats.get(&key) {
                return Ok(Arc::clone(format));
            }
        }

        // Derive outside the lock; racing derivations of the same type are
        // equivalent and the first insert wins.
        let format = Arc::new(Format::derive(&T::shape())?);

        let mut formats = self.formats.write().unwrap_or_else(PoisonError::into_inner);

        Ok(Arc::clone(formats.entry(key).or_insert(format)))
    }

    /// Marshals `record` into exactly `format.length_bytes()` bytes.
    /// No bytes are returned on error.
    pub fn marshal<T: Record>(&self, record: &T) -> Result<Vec<u8>, MarshalError> {
        let format = self.format_of::<T>()?;

        format.marshal(record)
    }

    /// Unmarshals `bytes` into `record`, populating every field. The record
    /// is untouched unless `bytes` has exactly the format's length.
    pub fn unmarshal<T: Record>(&self, bytes: &[u8], record: &mut T) -> Result<(), UnmarshalError> {
        let format = self.format_of::<T>()?;

        format.unmarshal(bytes, record)
    }
}

impl Default for Codec {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shape::{FieldShape, RecordShape, ShapeKind, WordBody, WordShape};

    #[derive(Debug, Default, PartialEq)]
    struct Status {
        online: bool,
        code: u8,
    }

    impl Record for Status {
        fn shape() -> RecordShape {
            RecordShape {
                name: "Status",
                words: vec![WordShape {
                    name: "word0",
                    tag: Some("8"),
                    body: WordBody::Fields(vec![
                        FieldShape {
                            name: "online",
                            tag: Some("1"),
                            kind: ShapeKind::Bool,
                        },
                        FieldShape {
                            name: "code",
                            tag: Some("7"),
                            kind: ShapeKind::Uint8,
                        },
                    ]),
                }],
            }
        }

        fn read(&self, word: usize, field: usize) -> u64 {
            match (word, field) {
                (0, 0) => self.online as u64,
                (0, 1) => self.code as u64,
                _ => 0,
            }
        }

        fn write(&mut self, word: usize, field: usize, value: u64) {
            match (word, field) {
                (0, 0) => self.online = value == 1,
                (0, 1) => self.code = value as u8,
                _ => {}
            }
        }
    }

    struct Broken;

    impl Record for Broken {
        fn shape() -> RecordShape {
            RecordShape {
                name: "Broken",
                words: vec![],
            }
        }

        fn read(&self, _: usize, _: usize) -> u64 {
            0
        }

        fn write(&mut self, _: usize, _: usize, _: u64) {}
    }

    #[test]
    fn test_marshal_unmarshal_through_cache() {
        let codec = Codec::new();
        let status = Status {
            online: true,
            code: 0x2A,
        };

        let bytes = codec.marshal(&status).unwrap();
        assert_eq!(bytes, [0b1010_1010]);

        let mut decoded = Status::default();
        codec.unmarshal(&bytes, &mut decoded).unwrap();
        assert_eq!(decoded, status);
    }

    #[test]
    fn test_format_is_derived_once() {
        let codec = Codec::new();

        let first = codec.format_of::<Status>().unwrap();
        let second = codec.format_of::<Status>().unwrap();

        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_invalid_shape_is_never_cached() {
        let codec = Codec::new();

        for _ in 0..2 {
            assert_eq!(
                codec.format_of::<Broken>(),
                Err(SchemaError::FormatHasNoWords { format: "Broken" })
            );
        }

        assert!(
            codec
                .formats
                .read()
                .unwrap_or_else(PoisonError::into_inner)
                .is_empty()
        );
    }

    #[test]
    fn test_concurrent_resolution_converges() {
        let codec = std::sync::Arc::new(Codec::new());

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let codec = std::sync::Arc::clone(&codec);
                std::thread::spawn(move || codec.format_of::<Status>().unwrap())
            })
            .collect();

        let formats: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

        for format in &formats {
            assert_eq!(format.length_bytes(), 1);
            assert!(Arc::ptr_eq(format, &formats[0]) || **format == *formats[0]);
        }
    }
}
