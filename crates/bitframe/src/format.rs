//! Format descriptor: the full bit-level layout of one record type.

use crate::{
    errors::{MarshalError, SchemaError, UnmarshalError},
    record::Record,
    shape::RecordShape,
    word::Word,
};

/// A validated format: ordered words and the derived total byte length.
/// Derived once per record type and never mutated afterwards; use
/// [Format::derive] to build one from a [RecordShape].
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Format {
    pub(crate) name: &'static str,
    pub(crate) length_bytes: usize,
    pub(crate) words: Vec<Word>,
}

impl Format {
    /// Validates a record shape into a format. Fails with the first
    /// violated rule in validation order; nothing is returned on failure.
    pub fn derive(shape: &RecordShape) -> Result<Self, SchemaError> {
        if shape.words.is_empty() {
            return Err(SchemaError::FormatHasNoWords { format: shape.name });
        }

        let mut words = Vec::with_capacity(shape.words.len());
        let mut length_bytes = 0;

        for word_shape in &shape.words {
            let word = Word::derive(word_shape, shape.name)?;
            length_bytes += word.length_bytes;
            words.push(word);
        }

        Ok(Format {
            name: shape.name,
            length_bytes,
            words,
        })
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Exact length of a marshalled record, in bytes.
    pub fn length_bytes(&self) -> usize {
        self.length_bytes
    }

    /// Words in declaration order.
    pub fn words(&self) -> &[Word] {
        &self.words
    }

    pub(crate) fn marshal<R: Record>(&self, record: &R) -> Result<Vec<u8>, MarshalError> {
        let mut bytes = Vec::with_capacity(self.length_bytes);

        for (w, word) in self.words.iter().enumerate() {
            word.marshal(self.name, |f| record.read(w, f), &mut bytes)?;
        }

        Ok(bytes)
    }

    pub(crate) fn unmarshal<R: Record>(
        &self,
        bytes: &[u8],
        record: &mut R,
    ) -> Result<(), UnmarshalError> {
        if bytes.len() != self.length_bytes {
            return Err(UnmarshalError::ByteSliceLengthMismatch {
                format: self.name,
                expected: self.length_bytes,
                actual: bytes.len(),
            });
        }

        let mut position = 0;

        for (w, word) in self.words.iter().enumerate() {
            let end = position + word.length_bytes;
            word.unmarshal(&bytes[position..end], &mut |f, value| {
                record.write(w, f, value);
            });
            position = end;
        }

        Ok(())
    }
}
