use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{Data, DeriveInput, Fields, Meta, parse_macro_input};

/// Derive macro for the `SetField` trait.
///
/// Each column is assigned to the struct field of the same name, decoded with
/// `FromValue`.
///
/// # Example
///
/// ```ignore
/// #[derive(Default, Clone, SetField)]
/// struct User {
///     name: String,
///     age: u8,
/// }
/// ```
///
/// # Strict Mode
///
/// By default, unknown columns are silently skipped. Use `#[set_field(strict)]`
/// to error on unknown columns and on fields the row does not provide:
///
/// ```ignore
/// #[derive(Default, Clone, SetField)]
/// #[set_field(strict)]
/// struct User {
///     name: String,
///     age: u8,
/// }
/// ```
#[proc_macro_derive(SetField, attributes(set_field))]
pub fn derive_set_field(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    expand(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

fn is_strict(input: &DeriveInput) -> bool {
    input.attrs.iter().any(|attr| {
        if !attr.path().is_ident("set_field") {
            return false;
        }
        match &attr.meta {
            Meta::List(list) => list.tokens.to_string().contains("strict"),
            _ => false,
        }
    })
}

fn expand(input: &DeriveInput) -> syn::Result<TokenStream2> {
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();
    let strict = is_strict(input);

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => {
                return Err(syn::Error::new(
                    name.span(),
                    "SetField only supports structs with named fields",
                ));
            }
        },
        _ => {
            return Err(syn::Error::new(
                name.span(),
                "SetField only supports structs",
            ));
        }
    };

    let field_idents: Vec<_> = fields.iter().filter_map(|f| f.ident.as_ref()).collect();
    let field_types: Vec<_> = fields.iter().map(|f| &f.ty).collect();
    // raw identifiers map to their plain column name
    let column_names: Vec<_> = field_idents
        .iter()
        .map(|ident| {
            let s = ident.to_string();
            s.strip_prefix("r#").map(str::to_string).unwrap_or(s)
        })
        .collect();

    let match_arms = field_idents
        .iter()
        .zip(field_types.iter())
        .zip(column_names.iter())
        .map(|((ident, ty), column)| {
            quote! {
                #column => {
                    self.#ident = <#ty as ::zero_cursor::decode::FromValue>::from_value(__value)?;
                }
            }
        });

    let fallback_arm = if strict {
        quote! {
            __unknown => {
                return Err(::zero_cursor::error::Error::UnknownColumn(__unknown.to_string()));
            }
        }
    } else {
        quote! {
            _ => {}
        }
    };

    let populate = if strict {
        quote! {
            fn populate(&mut self, __row: ::zero_cursor::row::Row) -> ::zero_cursor::error::Result<()> {
                #(
                    if !__row.contains_key(#column_names) {
                        return Err(::zero_cursor::error::Error::MissingColumn(#column_names));
                    }
                )*
                for (__name, __value) in __row {
                    ::zero_cursor::object::SetField::set_field(self, &__name, __value)?;
                }
                Ok(())
            }
        }
    } else {
        quote! {}
    };

    Ok(quote! {
        impl #impl_generics ::zero_cursor::object::SetField for #name #ty_generics #where_clause {
            fn set_field(
                &mut self,
                __name: &str,
                __value: ::zero_cursor::value::Value,
            ) -> ::zero_cursor::error::Result<()> {
                match __name {
                    #(#match_arms)*
                    #fallback_arm
                }
                Ok(())
            }

            #populate
        }
    })
}
