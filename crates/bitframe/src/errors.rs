//! Error types for schema derivation and the codec operations.

use thiserror::Error;

/// Errors produced when deriving a [crate::format::Format] from a
/// [crate::shape::RecordShape]. Each variant names the offending record,
/// word and field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// The record declares no words.
    #[error("format `{format}` has no words")]
    FormatHasNoWords { format: &'static str },

    /// A word member is not a struct.
    #[error("word `{word}` of format `{format}` is not a struct but `{found}`")]
    WordNotStruct {
        format: &'static str,
        word: &'static str,
        found: &'static str,
    },

    /// A word member carries no length annotation.
    #[error("word `{word}` of format `{format}` has no length tag")]
    WordMissingLengthTag {
        format: &'static str,
        word: &'static str,
    },

    /// A word length annotation does not parse as an integer.
    #[error("word `{word}` of format `{format}` has a malformed length tag `{tag}`")]
    WordMalformedLengthTag {
        format: &'static str,
        word: &'static str,
        tag: &'static str,
    },

    /// A word length is not a multiple of 8 in [8, 64].
    #[error(
        "word `{word}` of format `{format}` has length {length}, \
         expected a multiple of 8 no less than 8 and no greater than 64"
    )]
    WordLengthInvalid {
        format: &'static str,
        word: &'static str,
        length: u32,
    },

    /// A word struct declares no fields.
    #[error("word `{word}` of format `{format}` has no fields")]
    WordHasNoFields {
        format: &'static str,
        word: &'static str,
    },

    /// A field is not an unsigned integer or a boolean.
    #[error(
        "field `{field}` of word `{word}` of format `{format}` \
         has unsupported type `{found}`"
    )]
    FieldUnsupportedType {
        format: &'static str,
        word: &'static str,
        field: &'static str,
        found: &'static str,
    },

    /// A field carries no length annotation.
    #[error("field `{field}` of word `{word}` of format `{format}` has no length tag")]
    FieldMissingLengthTag {
        format: &'static str,
        word: &'static str,
        field: &'static str,
    },

    /// A field length annotation does not parse as a non-zero integer.
    #[error(
        "field `{field}` of word `{word}` of format `{format}` \
         has a malformed length tag `{tag}`"
    )]
    FieldMalformedLengthTag {
        format: &'static str,
        word: &'static str,
        field: &'static str,
        tag: &'static str,
    },

    /// A field length exceeds the bit capacity of its type.
    #[error(
        "field `{field}` of word `{word}` of format `{format}` has length {length} \
         exceeding the {capacity}-bit capacity of `{kind}`"
    )]
    FieldLengthOverflowsType {
        format: &'static str,
        word: &'static str,
        field: &'static str,
        kind: &'static str,
        capacity: u32,
        length: u32,
    },

    /// The field lengths of a word do not add up to its declared length.
    #[error(
        "word `{word}` of format `{format}` has length {declared} \
         not equal to sum of field lengths {sum}"
    )]
    WordLengthNotSumOfFieldLengths {
        format: &'static str,
        word: &'static str,
        declared: u32,
        sum: u32,
    },
}

/// Errors produced by [crate::codec::Codec::marshal].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MarshalError {
    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// A record value does not fit in the bits declared for its field.
    /// Overflowing values are rejected, never truncated.
    #[error(
        "value {value} of field `{field}` of word `{word}` of format `{format}` \
         overflows {length} bits"
    )]
    ValueOverflowsField {
        format: &'static str,
        word: &'static str,
        field: &'static str,
        value: u64,
        length: u32,
    },
}

/// Errors produced by [crate::codec::Codec::unmarshal].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UnmarshalError {
    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// The input does not have exactly the derived length of the format.
    #[error(
        "byte slice of length {actual} does not match length {expected} \
         of format `{format}`"
    )]
    ByteSliceLengthMismatch {
        format: &'static str,
        expected: usize,
        actual: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_error_names_offenders() {
        let e = SchemaError::FieldLengthOverflowsType {
            format: "Header",
            word: "word0",
            field: "version",
            kind: "u8",
            capacity: 8,
            length: 32,
        };

        let message = e.to_string();
        assert!(message.contains("Header"));
        assert!(message.contains("word0"));
        assert!(message.contains("version"));
        assert!(message.contains("u8"));
    }

    #[test]
    fn test_marshal_error_from_schema_error() {
        let schema = SchemaError::FormatHasNoWords { format: "Empty" };
        let e = MarshalError::from(schema.clone());
        assert_eq!(e, MarshalError::Schema(schema));
    }

    #[test]
    fn test_length_mismatch_reports_both_lengths() {
        let e = UnmarshalError::ByteSliceLengthMismatch {
            format: "Header",
            expected: 20,
            actual: 19,
        };

        let message = e.to_string();
        assert!(message.contains("20"));
        assert!(message.contains("19"));
    }
}
