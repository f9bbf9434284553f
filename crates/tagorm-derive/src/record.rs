//! Record derive macro implementation

use proc_macro2::{Literal, TokenStream};
use quote::quote;
use syn::ext::IdentExt;
use syn::{Data, DeriveInput, Field, Fields, LitStr, Result};

pub fn expand(input: DeriveInput) -> Result<TokenStream> {
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    &input,
                    "Record can only be derived for structs with named fields",
                ));
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                &input,
                "Record can only be derived for structs",
            ));
        }
    };

    let mut defs = Vec::with_capacity(fields.len());
    let mut getters = Vec::new();
    let mut setters = Vec::new();

    for (index, field) in fields.iter().enumerate() {
        let Some(ident) = field.ident.as_ref() else {
            continue;
        };
        let ty = &field.ty;
        let ident_str = ident.unraw().to_string();
        let tag = parse_tag(field)?;
        let index = Literal::usize_unsuffixed(index);

        if is_ignored(&tag) {
            let type_name = quote!(#ty).to_string().replace(' ', "");
            defs.push(quote! {
                tagorm::FieldDef::new(#ident_str, #tag, tagorm::FieldKind::Unsupported(#type_name))
            });
            continue;
        }

        defs.push(quote! {
            tagorm::FieldDef::new(#ident_str, #tag, <#ty as tagorm::Column>::KIND)
        });
        getters.push(quote! {
            #index => ::core::option::Option::Some(tagorm::Column::to_value(&self.#ident))
        });
        setters.push(quote! {
            #index => tagorm::record::assign(&mut self.#ident, value)
        });
    }

    let name_str = name.unraw().to_string();

    Ok(quote! {
        impl #impl_generics tagorm::Record for #name #ty_generics #where_clause {
            const NAME: &'static str = #name_str;

            const FIELDS: &'static [tagorm::FieldDef] = &[
                #(#defs),*
            ];

            fn value_at(&self, index: usize) -> ::core::option::Option<tagorm::Value> {
                match index {
                    #(#getters,)*
                    _ => ::core::option::Option::None,
                }
            }

            #[allow(unused_variables)]
            fn set_value_at(&mut self, index: usize, value: tagorm::Value) -> bool {
                match index {
                    #(#setters,)*
                    _ => false,
                }
            }
        }
    })
}

/// Raw tag string of `#[db("...")]`, empty when absent.
fn parse_tag(field: &Field) -> Result<String> {
    let mut tag: Option<LitStr> = None;
    for attr in &field.attrs {
        if !attr.path().is_ident("db") {
            continue;
        }
        if tag.is_some() {
            return Err(syn::Error::new_spanned(
                attr,
                "duplicate #[db] attribute; combine items with `;`",
            ));
        }
        tag = Some(attr.parse_args::<LitStr>()?);
    }
    Ok(tag.map(|lit| lit.value()).unwrap_or_default())
}

/// Same key rules as the runtime tag parser: `;`-separated items, key before
/// the first `:`, surrounding whitespace trimmed.
fn is_ignored(tag: &str) -> bool {
    tag.split(';').any(|item| {
        let key = item.split_once(':').map_or(item, |(k, _)| k);
        key.trim() == "ignore"
    })
}
