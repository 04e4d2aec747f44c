//! # typesnap Derive
//!
//! Procedural macro implementing `Introspect` for Rust structs.
//!
//! Structs with named fields become Go structs, newtype structs become named
//! types over the inner type's shape and unit structs become empty structs.
//! Enums, unions and structs with type parameters are rejected.

mod attr;

use attr::{ContainerAttrs, FieldAttrs, pascal_case};
use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::ext::IdentExt;
use syn::{Data, DeriveInput, Fields, GenericParam, Path, parse_macro_input};

/// Derives `Introspect` for a struct.
///
/// # Example
/// ```ignore
/// #[derive(Introspect)]
/// #[typesnap(location = "github.com/acme/shop/orders")]
/// struct Order {
///     #[typesnap(rename = "ID", tag = "json:\"id\"")]
///     id: u64,
///     #[typesnap(embed)]
///     audit: Audit,
///     #[typesnap(skip)]
///     cache: Vec<u8>,
/// }
/// ```
#[proc_macro_derive(Introspect, attributes(typesnap))]
pub fn derive_introspect(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    expand(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

fn expand(input: &DeriveInput) -> syn::Result<TokenStream2> {
    let container = ContainerAttrs::parse(&input.attrs)?;
    let krate: Path = match container.krate {
        Some(path) => path,
        None => syn::parse_quote!(::typesnap::core),
    };

    if let Some(param) = input
        .generics
        .params
        .iter()
        .find(|p| !matches!(p, GenericParam::Lifetime(_)))
    {
        return Err(syn::Error::new_spanned(
            param,
            "Introspect cannot be derived for generic types",
        ));
    }

    let data = match &input.data {
        Data::Struct(data) => data,
        Data::Enum(data) => {
            return Err(syn::Error::new_spanned(
                data.enum_token,
                "Introspect can only be derived for structs",
            ));
        }
        Data::Union(data) => {
            return Err(syn::Error::new_spanned(
                data.union_token,
                "Introspect can only be derived for structs",
            ));
        }
    };

    let shape = match &data.fields {
        Fields::Named(fields) => {
            let mut entries = Vec::new();
            for field in &fields.named {
                let attrs = FieldAttrs::parse(&field.attrs)?;
                if attrs.skip {
                    continue;
                }
                let ident = field
                    .ident
                    .as_ref()
                    .map(|i| i.unraw().to_string())
                    .unwrap_or_default();
                entries.push(field_entry(&krate, &field.ty, &ident, attrs));
            }
            quote! { #krate::Shape::Struct(vec![#(#entries),*]) }
        }
        Fields::Unnamed(fields) if fields.unnamed.len() == 1 => {
            let ty = &fields.unnamed[0].ty;
            quote! {{
                let inner = <#ty as #krate::Introspect>::describe(graph);
                graph.node(inner).shape().clone()
            }}
        }
        Fields::Unnamed(fields) => {
            return Err(syn::Error::new_spanned(
                fields,
                "Introspect supports tuple structs with exactly one field",
            ));
        }
        Fields::Unit => quote! { #krate::Shape::Struct(Vec::new()) },
    };

    let ident = &input.ident;
    let type_name = container.rename.unwrap_or_else(|| ident.unraw().to_string());
    let location = match container.location {
        Some(location) => quote! { #location.to_string() },
        None => quote! { module_path!().replace("::", "/") },
    };
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    Ok(quote! {
        impl #impl_generics #krate::Introspect for #ident #ty_generics #where_clause {
            fn describe(graph: &mut #krate::TypeGraph) -> #krate::NodeId {
                let location = #location;
                let (id, fresh) = graph.declare(&location, #type_name);
                if fresh {
                    let shape = #shape;
                    graph.define(id, shape);
                }
                id
            }
        }
    })
}

/// Builds the expression describing one named field.
fn field_entry(krate: &Path, ty: &syn::Type, ident: &str, attrs: FieldAttrs) -> TokenStream2 {
    let name = match (attrs.rename, attrs.embed) {
        (Some(rename), _) => quote! { #rename.to_string() },
        // Embedded fields are named after the type they embed.
        (None, true) => quote! { graph.handle(ty).dig_pointers().1.name().to_string() },
        (None, false) => {
            let name = pascal_case(ident);
            quote! { #name.to_string() }
        }
    };
    let tag = attrs.tag.map(|tag| quote! { let field = field.with_tag(#tag); });
    let embed = attrs.embed.then(|| quote! { let field = field.embedded(); });

    quote! {{
        let ty = <#ty as #krate::Introspect>::describe(graph);
        let field = #krate::Field::new(#name, ty);
        #tag
        #embed
        field
    }}
}
