//! Field descriptor: one scalar sub-range of bits within a word.

use crate::{
    errors::{MarshalError, SchemaError},
    shape::{FieldShape, ShapeKind},
};

/// Scalar kind of a field value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum FieldKind {
    Uint8,
    Uint16,
    Uint32,
    Uint64,
    Bool,
}

impl FieldKind {
    /// Largest bit length a field of this kind can declare.
    pub fn capacity_bits(self) -> u32 {
        match self {
            FieldKind::Uint8 => 8,
            FieldKind::Uint16 => 16,
            FieldKind::Uint32 => 32,
            FieldKind::Uint64 => 64,
            FieldKind::Bool => 1,
        }
    }

    fn type_name(self) -> &'static str {
        match self {
            FieldKind::Uint8 => "u8",
            FieldKind::Uint16 => "u16",
            FieldKind::Uint32 => "u32",
            FieldKind::Uint64 => "u64",
            FieldKind::Bool => "bool",
        }
    }
}

/// A validated field: bit length, derived offset from the word's
/// least-significant bit, and scalar kind. Immutable once derived.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Field {
    pub(crate) name: &'static str,
    pub(crate) length_bits: u32,
    pub(crate) offset_bits: u32,
    pub(crate) kind: FieldKind,
}

impl Field {
    /// Validates one field shape. The offset is assigned by the enclosing
    /// word once all field lengths are known.
    pub(crate) fn derive(
        shape: &FieldShape,
        word: &'static str,
        format: &'static str,
    ) -> Result<Self, SchemaError> {
        let kind = match shape.kind {
            ShapeKind::Uint8 => FieldKind::Uint8,
            ShapeKind::Uint16 => FieldKind::Uint16,
            ShapeKind::Uint32 => FieldKind::Uint32,
            ShapeKind::Uint64 => FieldKind::Uint64,
            ShapeKind::Bool => FieldKind::Bool,
            ShapeKind::Unsupported(found) => {
                return Err(SchemaError::FieldUnsupportedType {
                    format,
                    word,
                    field: shape.name,
                    found,
                });
            }
        };

        let tag = shape.tag.ok_or(SchemaError::FieldMissingLengthTag {
            format,
            word,
            field: shape.name,
        })?;

        let length_bits: u32 = match tag.parse() {
            Ok(length) if length > 0 => length,
            _ => {
                return Err(SchemaError::FieldMalformedLengthTag {
                    format,
                    word,
                    field: shape.name,
                    tag,
                });
            }
        };

        if length_bits > kind.capacity_bits() {
            return Err(SchemaError::FieldLengthOverflowsType {
                format,
                word,
                field: shape.name,
                kind: kind.type_name(),
                capacity: kind.capacity_bits(),
                length: length_bits,
            });
        }

        Ok(Field {
            name: shape.name,
            length_bits,
            offset_bits: 0,
            kind,
        })
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn length_bits(&self) -> u32 {
        self.length_bits
    }

    /// Number of bits to the right of this field's least-significant bit
    /// within its word.
    pub fn offset_bits(&self) -> u32 {
        self.offset_bits
    }

    pub fn kind(&self) -> FieldKind {
        self.kind
    }

    /// Positions `value` within a word accumulator, rejecting values that
    /// do not fit in the declared bits.
    pub(crate) fn marshal(
        &self,
        value: u64,
        word: &'static str,
        format: &'static str,
    ) -> Result<u64, MarshalError> {
        if value > value_mask(self.length_bits) {
            return Err(MarshalError::ValueOverflowsField {
                format,
                word,
                field: self.name,
                value,
                length: self.length_bits,
            });
        }

        Ok(value << self.offset_bits)
    }

    /// Recovers this field's value from a decoded word accumulator.
    pub(crate) fn unmarshal(&self, word_value: u64) -> u64 {
        (word_value >> self.offset_bits) & value_mask(self.length_bits)
    }
}

/// Mask of the low `length_bits` bits, for lengths in 1..=64.
pub(crate) fn value_mask(length_bits: u32) -> u64 {
    u64::MAX >> (64 - length_bits)
}
