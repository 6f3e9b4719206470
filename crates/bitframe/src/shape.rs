//! Raw description of a record type: the input to schema derivation.
//!
//! A [RecordShape] carries the declaration exactly as written: member names,
//! length annotations as unparsed strings, and scalar kinds. It is normally
//! produced by `#[derive(Record)]`, but can be built by hand; all validation
//! happens in [crate::format::Format::derive].

/// Shape of a format-level record: an ordered list of word members.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct RecordShape {
    pub name: &'static str,
    /// Word members in declaration order.
    pub words: Vec<WordShape>,
}

/// Shape of one word member of a record.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct WordShape {
    pub name: &'static str,
    /// The word length annotation, unparsed, if present.
    pub tag: Option<&'static str>,
    pub body: WordBody,
}

/// What a word member contains: fields for struct members, or the type name
/// of a member that is not a struct.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum WordBody {
    Fields(Vec<FieldShape>),
    Scalar(&'static str),
}

/// Shape of one field of a word struct.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct FieldShape {
    pub name: &'static str,
    /// The field length annotation, unparsed, if present.
    pub tag: Option<&'static str>,
    pub kind: ShapeKind,
}

/// Declared scalar kind of a field, before validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum ShapeKind {
    Uint8,
    Uint16,
    Uint32,
    Uint64,
    Bool,
    /// Any other type, recorded by name for diagnostics.
    Unsupported(&'static str),
}
