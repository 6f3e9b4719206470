//! Derive macros producing [`bitframe`] shape descriptions and accessors.
//!
//! `#[derive(Record)]` marks a format-level struct whose members are word
//! structs annotated with `#[word("N")]`; `#[derive(RecordWord)]` marks a
//! word-level struct whose fields are scalars annotated with `#[bits("N")]`.
//! The macros capture the declaration verbatim: annotation strings are passed
//! through unparsed and member types are classified, never validated, so that
//! schema derivation at runtime reports the full error taxonomy.

extern crate proc_macro;
use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{Data, DeriveInput, Fields, FieldsNamed, LitStr, Type, TypePath, parse_macro_input};

/// Primitive type names that cannot be word structs.
fn is_primitive(ident: &str) -> bool {
    matches!(
        ident,
        "u8" | "u16"
            | "u32"
            | "u64"
            | "u128"
            | "usize"
            | "i8"
            | "i16"
            | "i32"
            | "i64"
            | "i128"
            | "isize"
            | "f32"
            | "f64"
            | "bool"
            | "char"
            | "str"
            | "String"
    )
}

/// Scalar field kinds the codec supports, mapped to their `ShapeKind` variant.
fn field_kind_variant(ident: &str) -> Option<TokenStream2> {
    match ident {
        "u8" => Some(quote! { ::bitframe::ShapeKind::Uint8 }),
        "u16" => Some(quote! { ::bitframe::ShapeKind::Uint16 }),
        "u32" => Some(quote! { ::bitframe::ShapeKind::Uint32 }),
        "u64" => Some(quote! { ::bitframe::ShapeKind::Uint64 }),
        "bool" => Some(quote! { ::bitframe::ShapeKind::Bool }),
        _ => None,
    }
}

fn path_ident(ty: &Type) -> Option<String> {
    match ty {
        Type::Path(TypePath { path, .. }) => {
            path.segments.last().map(|segment| segment.ident.to_string())
        }
        _ => None,
    }
}

fn named_fields(input: &DeriveInput) -> Result<&FieldsNamed, syn::Error> {
    match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(named) => Ok(named),
            _ => Err(syn::Error::new_spanned(
                &input.ident,
                "only structs with named fields are supported",
            )),
        },
        _ => Err(syn::Error::new_spanned(
            &input.ident,
            "only structs are supported",
        )),
    }
}

/// Extracts the string value of a `#[key("...")]` length annotation, if present.
fn length_tag(field: &syn::Field, key: &str) -> Result<Option<String>, syn::Error> {
    for attr in &field.attrs {
        if attr.path().is_ident(key) {
            let literal: LitStr = attr.parse_args().map_err(|_| {
                syn::Error::new_spanned(
                    attr,
                    format!("expected a string literal, e.g. #[{key}(\"32\")]"),
                )
            })?;

            return Ok(Some(literal.value()));
        }
    }

    Ok(None)
}

fn option_tokens(tag: &Option<String>) -> TokenStream2 {
    match tag {
        Some(value) => quote! { ::core::option::Option::Some(#value) },
        None => quote! { ::core::option::Option::None },
    }
}

#[proc_macro_derive(Record, attributes(word))]
pub fn derive_record(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    let named = match named_fields(&input) {
        Ok(named) => named,
        Err(e) => return e.to_compile_error().into(),
    };

    let mut word_shapes = Vec::new();
    let mut read_arms = Vec::new();
    let mut write_arms = Vec::new();

    for (index, member) in named.named.iter().enumerate() {
        let member_ident = member.ident.as_ref().unwrap();
        let member_name = member_ident.to_string();

        let tag = match length_tag(member, "word") {
            Ok(tag) => option_tokens(&tag),
            Err(e) => return e.to_compile_error().into(),
        };

        let is_word_struct = match path_ident(&member.ty) {
            Some(ident) => !is_primitive(&ident),
            None => false,
        };

        if is_word_struct {
            let ty = &member.ty;

            word_shapes.push(quote! {
                ::bitframe::WordShape {
                    name: #member_name,
                    tag: #tag,
                    body: <#ty as ::bitframe::RecordWord>::body(),
                }
            });
            read_arms.push(quote! {
                #index => ::bitframe::RecordWord::read(&self.#member_ident, field),
            });
            write_arms.push(quote! {
                #index => ::bitframe::RecordWord::write(&mut self.#member_ident, field, value),
            });
        } else {
            // Not a word struct; described as-is so derivation can reject it.
            let ty = &member.ty;
            let type_name = quote!(#ty).to_string();

            word_shapes.push(quote! {
                ::bitframe::WordShape {
                    name: #member_name,
                    tag: #tag,
                    body: ::bitframe::WordBody::Scalar(#type_name),
                }
            });
            read_arms.push(quote! { #index => 0, });
            write_arms.push(quote! { #index => {} });
        }
    }

    let ident = &input.ident;
    let record_name = ident.to_string();

    let expanded = quote! {
        impl ::bitframe::Record for #ident {
            fn shape() -> ::bitframe::RecordShape {
                ::bitframe::RecordShape {
                    name: #record_name,
                    words: ::std::vec![ #( #word_shapes ),* ],
                }
            }

            fn read(&self, word: usize, field: usize) -> u64 {
                let _ = field;

                match word {
                    #( #read_arms )*
                    _ => 0,
                }
            }

            fn write(&mut self, word: usize, field: usize, value: u64) {
                let _ = (field, value);

                match word {
                    #( #write_arms )*
                    _ => {}
                }
            }
        }
    };

    expanded.into()
}

#[proc_macro_derive(RecordWord, attributes(bits))]
pub fn derive_record_word(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    let named = match named_fields(&input) {
        Ok(named) => named,
        Err(e) => return e.to_compile_error().into(),
    };

    let mut field_shapes = Vec::new();
    let mut read_arms = Vec::new();
    let mut write_arms = Vec::new();

    for (index, field) in named.named.iter().enumerate() {
        let field_ident = field.ident.as_ref().unwrap();
        let field_name = field_ident.to_string();

        let tag = match length_tag(field, "bits") {
            Ok(tag) => option_tokens(&tag),
            Err(e) => return e.to_compile_error().into(),
        };

        let kind = path_ident(&field.ty).and_then(|ident| field_kind_variant(&ident));

        match kind {
            Some(kind) => {
                field_shapes.push(quote! {
                    ::bitframe::FieldShape {
                        name: #field_name,
                        tag: #tag,
                        kind: #kind,
                    }
                });

                read_arms.push(quote! { #index => self.#field_ident as u64, });

                let ty = &field.ty;
                let store = match path_ident(ty).as_deref() {
                    Some("bool") => quote! { value == 1 },
                    Some("u64") => quote! { value },
                    _ => quote! { value as #ty },
                };

                write_arms.push(quote! { #index => self.#field_ident = #store, });
            }
            None => {
                // Unsupported scalar kind; derivation reports it by name.
                let ty = &field.ty;
                let type_name = quote!(#ty).to_string();

                field_shapes.push(quote! {
                    ::bitframe::FieldShape {
                        name: #field_name,
                        tag: #tag,
                        kind: ::bitframe::ShapeKind::Unsupported(#type_name),
                    }
                });
                read_arms.push(quote! { #index => 0, });
                write_arms.push(quote! { #index => {} });
            }
        }
    }

    let ident = &input.ident;

    let expanded = quote! {
        impl ::bitframe::RecordWord for #ident {
            fn body() -> ::bitframe::WordBody {
                ::bitframe::WordBody::Fields(::std::vec![ #( #field_shapes ),* ])
            }

            fn read(&self, field: usize) -> u64 {
                match field {
                    #( #read_arms )*
                    _ => 0,
                }
            }

            fn write(&mut self, field: usize, value: u64) {
                let _ = value;

                match field {
                    #( #write_arms )*
                    _ => {}
                }
            }
        }
    };

    expanded.into()
}
