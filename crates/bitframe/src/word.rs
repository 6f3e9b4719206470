//! Word descriptor: a fixed-size group of bits subdivided into fields.
//!
//! Words are 8 to 64 bits long in byte multiples. The first declared field
//! occupies the most-significant bits; offsets are derived from declaration
//! order, leaving no gaps.

use crate::{
    errors::{MarshalError, SchemaError},
    field::Field,
    shape::{WordBody, WordShape},
};

pub(crate) const WORD_LENGTH_FACTOR: u32 = 8;
pub(crate) const WORD_LENGTH_MIN_BITS: u32 = 8;
pub(crate) const WORD_LENGTH_MAX_BITS: u32 = 64;
pub(crate) const WORD_LENGTH_MAX_BYTES: usize = (WORD_LENGTH_MAX_BITS / WORD_LENGTH_FACTOR) as usize;

/// A validated word: ordered fields with derived offsets and a declared
/// total bit length. Immutable once derived.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Word {
    pub(crate) name: &'static str,
    pub(crate) length_bits: u32,
    pub(crate) length_bytes: usize,
    pub(crate) fields: Vec<Field>,
}

impl Word {
    pub(crate) fn derive(shape: &WordShape, format: &'static str) -> Result<Self, SchemaError> {
        let field_shapes = match &shape.body {
            WordBody::Fields(field_shapes) => field_shapes,
            WordBody::Scalar(found) => {
                return Err(SchemaError::WordNotStruct {
                    format,
                    word: shape.name,
                    found,
                });
            }
        };

        let tag = shape.tag.ok_or(SchemaError::WordMissingLengthTag {
            format,
            word: shape.name,
        })?;

        let length_bits: u32 = tag
            .parse()
            .map_err(|_| SchemaError::WordMalformedLengthTag {
                format,
                word: shape.name,
                tag,
            })?;

        let length_ok = length_bits % WORD_LENGTH_FACTOR == 0
            && length_bits >= WORD_LENGTH_MIN_BITS
            && length_bits <= WORD_LENGTH_MAX_BITS;

        if !length_ok {
            return Err(SchemaError::WordLengthInvalid {
                format,
                word: shape.name,
                length: length_bits,
            });
        }

        if field_shapes.is_empty() {
            return Err(SchemaError::WordHasNoFields {
                format,
                word: shape.name,
            });
        }

        let mut fields = Vec::with_capacity(field_shapes.len());
        let mut sum = 0u32;

        for field_shape in field_shapes {
            let field = Field::derive(field_shape, shape.name, format)?;
            sum = sum.saturating_add(field.length_bits);
            fields.push(field);
        }

        if sum != length_bits {
            return Err(SchemaError::WordLengthNotSumOfFieldLengths {
                format,
                word: shape.name,
                declared: length_bits,
                sum,
            });
        }

        // Offsets accumulate from the most-significant end.
        let mut offset = length_bits;

        for field in &mut fields {
            offset -= field.length_bits;
            field.offset_bits = offset;
        }

        Ok(Word {
            name: shape.name,
            length_bits,
            length_bytes: (length_bits / WORD_LENGTH_FACTOR) as usize,
            fields,
        })
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn length_bits(&self) -> u32 {
        self.length_bits
    }

    pub fn length_bytes(&self) -> usize {
        self.length_bytes
    }

    /// Fields in declaration order, most-significant first.
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Packs field values into a 64-bit accumulator and appends this word's
    /// big-endian contribution to `out`. `read` yields the value of the
    /// field at the given position.
    pub(crate) fn marshal(
        &self,
        format: &'static str,
        read: impl Fn(usize) -> u64,
        out: &mut Vec<u8>,
    ) -> Result<(), MarshalError> {
        let mut accumulator = 0u64;

        for (i, field) in self.fields.iter().enumerate() {
            accumulator |= field.marshal(read(i), self.name, format)?;
        }

        let bytes = accumulator.to_be_bytes();
        out.extend_from_slice(&bytes[WORD_LENGTH_MAX_BYTES - self.length_bytes..]);

        Ok(())
    }

    /// Decodes this word's byte slice (exactly [Word::length_bytes] long)
    /// and hands each field value to `write`.
    pub(crate) fn unmarshal(&self, bytes: &[u8], write: &mut impl FnMut(usize, u64)) {
        let mut buffer = [0u8; WORD_LENGTH_MAX_BYTES];
        buffer[WORD_LENGTH_MAX_BYTES - bytes.len()..].copy_from_slice(bytes);

        let accumulator = u64::from_be_bytes(buffer);

        for (i, field) in self.fields.iter().enumerate() {
            write(i, field.unmarshal(accumulator));
        }
    }
}
