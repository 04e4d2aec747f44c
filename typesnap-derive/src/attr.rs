//! `#[typesnap(...)]` attribute parsing.

use syn::{Attribute, LitStr, Path};

/// Options set on the struct itself.
#[derive(Default)]
pub struct ContainerAttrs {
    /// Defining location; defaults to the module path.
    pub location: Option<String>,
    /// Type name; defaults to the struct identifier.
    pub rename: Option<String>,
    /// Path to the core crate.
    pub krate: Option<Path>,
}

/// Options set on a field.
#[derive(Default)]
pub struct FieldAttrs {
    /// Field name; defaults to the identifier in PascalCase.
    pub rename: Option<String>,
    /// Metadata tag.
    pub tag: Option<String>,
    /// Embedded field.
    pub embed: bool,
    /// Field left out of the description.
    pub skip: bool,
}

fn is_typesnap(attr: &Attribute) -> bool {
    attr.path().is_ident("typesnap")
}

impl ContainerAttrs {
    pub fn parse(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut out = Self::default();
        for attr in attrs.iter().filter(|a| is_typesnap(a)) {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("location") {
                    let value: LitStr = meta.value()?.parse()?;
                    out.location = Some(value.value());
                } else if meta.path.is_ident("rename") {
                    let value: LitStr = meta.value()?.parse()?;
                    out.rename = Some(value.value());
                } else if meta.path.is_ident("crate") {
                    let value: LitStr = meta.value()?.parse()?;
                    out.krate = Some(value.parse()?);
                } else {
                    return Err(meta.error("unsupported typesnap container attribute"));
                }
                Ok(())
            })?;
        }
        Ok(out)
    }
}

impl FieldAttrs {
    pub fn parse(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut out = Self::default();
        for attr in attrs.iter().filter(|a| is_typesnap(a)) {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("rename") {
                    let value: LitStr = meta.value()?.parse()?;
                    out.rename = Some(value.value());
                } else if meta.path.is_ident("tag") {
                    let value: LitStr = meta.value()?.parse()?;
                    out.tag = Some(value.value());
                } else if meta.path.is_ident("embed") {
                    out.embed = true;
                } else if meta.path.is_ident("skip") {
                    out.skip = true;
                } else {
                    return Err(meta.error("unsupported typesnap field attribute"));
                }
                Ok(())
            })?;
        }
        Ok(out)
    }
}

/// Converts a snake_case identifier to PascalCase.
pub fn pascal_case(ident: &str) -> String {
    ident
        .split('_')
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use syn::parse_quote;

    #[test]
    fn test_pascal_case() {
        assert_eq!(pascal_case("customer_id"), "CustomerId");
        assert_eq!(pascal_case("items"), "Items");
        assert_eq!(pascal_case("_private"), "Private");
        assert_eq!(pascal_case("ID"), "ID");
    }

    #[test]
    fn test_container_attrs() {
        let attrs: Vec<Attribute> = vec![parse_quote! {
            #[typesnap(location = "github.com/acme/shop", rename = "Order", crate = "crate::core")]
        }];
        let parsed = ContainerAttrs::parse(&attrs).unwrap();
        assert_eq!(parsed.location.as_deref(), Some("github.com/acme/shop"));
        assert_eq!(parsed.rename.as_deref(), Some("Order"));
        assert!(parsed.krate.is_some());
    }

    #[test]
    fn test_field_attrs() {
        let attrs: Vec<Attribute> = vec![
            parse_quote!(#[typesnap(rename = "ID", tag = "json:\"id\"")]),
            parse_quote!(#[typesnap(embed)]),
            parse_quote!(#[doc = "ignored"]),
        ];
        let parsed = FieldAttrs::parse(&attrs).unwrap();
        assert_eq!(parsed.rename.as_deref(), Some("ID"));
        assert_eq!(parsed.tag.as_deref(), Some("json:\"id\""));
        assert!(parsed.embed);
        assert!(!parsed.skip);
    }

    #[test]
    fn test_unknown_attribute_is_rejected() {
        let attrs: Vec<Attribute> = vec![parse_quote!(#[typesnap(flatten)])];
        assert!(FieldAttrs::parse(&attrs).is_err());
    }
}
