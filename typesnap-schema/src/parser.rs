//! Universe XML parser.
//!
//! This module parses universe description documents into the internal
//! [`Universe`] representation:
//!
//! ```xml
//! <universe>
//!     <package path="github.com/acme/shop">
//!         <struct name="Order">
//!             <field name="Items" type="[]Item" tag='json:"items"'/>
//!             <field name="Meta">
//!                 <struct>
//!                     <field name="Note" type="string"/>
//!                 </struct>
//!             </field>
//!         </struct>
//!         <interface name="Notifier"/>
//!         <type name="Status" type="string"/>
//!     </package>
//! </universe>
//! ```

use crate::error::ParseError;
use crate::expr::parse_type_expr;
use crate::types::{FieldDecl, PackageDef, TypeDecl, TypeExpr, Universe};
use quick_xml::Reader;
use quick_xml::escape::unescape;
use quick_xml::events::{BytesStart, Event};

/// Parses a universe description from a string.
///
/// # Arguments
/// * `xml` - XML document content
///
/// # Returns
/// Parsed universe or parse error.
///
/// # Errors
/// Returns `ParseError` if the XML is malformed or contains invalid elements.
pub fn parse_universe(xml: &str) -> Result<Universe, ParseError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut universe: Option<Universe> = None;
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => {
                let name_bytes = e.name().as_ref().to_vec();
                let name = std::str::from_utf8(&name_bytes)?;
                match (name, universe.as_mut()) {
                    ("universe", None) => universe = Some(Universe::new()),
                    ("package", Some(u)) => {
                        let package = parse_package(&mut reader, e)?;
                        u.add_package(package);
                    }
                    (other, Some(_)) => {
                        return Err(ParseError::unknown_element(other, "universe"));
                    }
                    (other, None) => {
                        return Err(ParseError::unknown_element(other, "document"));
                    }
                }
            }
            Ok(Event::Empty(ref e)) => {
                let name_bytes = e.name().as_ref().to_vec();
                let name = std::str::from_utf8(&name_bytes)?;
                match (name, universe.as_mut()) {
                    ("universe", None) => universe = Some(Universe::new()),
                    ("package", Some(u)) => {
                        let path = required_attr(e, "package", "path")?;
                        u.add_package(PackageDef::new(path));
                    }
                    (other, _) => return Err(ParseError::unknown_element(other, "universe")),
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(ParseError::Xml(e)),
            _ => {}
        }
        buf.clear();
    }

    universe.ok_or_else(|| ParseError::InvalidStructure {
        message: "missing <universe> root element".to_string(),
    })
}

/// Collects the attributes of an element as unescaped key/value pairs.
fn attributes(e: &BytesStart<'_>) -> Result<Vec<(String, String)>, ParseError> {
    let mut out = Vec::new();
    for attr in e.attributes() {
        let attr = attr?;
        let key = std::str::from_utf8(attr.key.as_ref())?.to_string();
        let raw = std::str::from_utf8(&attr.value)?;
        let value = unescape(raw)
            .map_err(|_| ParseError::invalid_attr(element_name(e), key.as_str(), raw))?
            .into_owned();
        out.push((key, value));
    }
    Ok(out)
}

fn element_name(e: &BytesStart<'_>) -> String {
    String::from_utf8_lossy(e.name().as_ref()).into_owned()
}

fn required_attr(e: &BytesStart<'_>, element: &str, attribute: &str) -> Result<String, ParseError> {
    attributes(e)?
        .into_iter()
        .find(|(k, _)| k == attribute)
        .map(|(_, v)| v)
        .ok_or_else(|| ParseError::missing_attr(element, attribute))
}

fn parse_bool(element: &str, attribute: &str, value: &str) -> Result<bool, ParseError> {
    match value {
        "true" | "1" => Ok(true),
        "false" | "0" => Ok(false),
        _ => Err(ParseError::invalid_attr(element, attribute, value)),
    }
}

/// Parses a package element and its type declarations.
fn parse_package(
    reader: &mut Reader<&[u8]>,
    e: &BytesStart<'_>,
) -> Result<PackageDef, ParseError> {
    let path = required_attr(e, "package", "path")?;
    let mut package = PackageDef::new(path);
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => {
                let decl = parse_declaration(reader, e, true)?;
                package.add_type(decl);
            }
            Ok(Event::Empty(ref e)) => {
                let decl = parse_declaration(reader, e, false)?;
                package.add_type(decl);
            }
            Ok(Event::End(_)) => break,
            Ok(Event::Eof) => {
                return Err(ParseError::InvalidStructure {
                    message: format!("unterminated package '{}'", package.path),
                });
            }
            Err(e) => return Err(ParseError::Xml(e)),
            _ => {}
        }
        buf.clear();
    }

    Ok(package)
}

/// Parses a `struct`, `interface` or `type` declaration.
fn parse_declaration(
    reader: &mut Reader<&[u8]>,
    e: &BytesStart<'_>,
    has_body: bool,
) -> Result<TypeDecl, ParseError> {
    let element = element_name(e);
    let mut name = None;
    let mut type_attr = None;
    let mut description = None;

    for (key, value) in attributes(e)? {
        match key.as_str() {
            "name" => name = Some(value),
            "type" => type_attr = Some(value),
            "description" => description = Some(value),
            _ => {}
        }
    }

    let name = name.ok_or_else(|| ParseError::missing_attr(element.as_str(), "name"))?;

    let expr = match element.as_str() {
        "struct" => {
            let fields = if has_body {
                parse_struct_fields(reader)?
            } else {
                Vec::new()
            };
            TypeExpr::Struct(fields)
        }
        "interface" => {
            if has_body {
                skip_to_end(reader)?;
            }
            TypeExpr::Interface
        }
        "type" => parse_typed_body(reader, "type", type_attr, has_body)?,
        other => return Err(ParseError::unknown_element(other, "package")),
    };

    let mut decl = TypeDecl::new(name, expr);
    decl.description = description;
    Ok(decl)
}

/// Resolves the type of a `type` or `field` element, given either as a
/// `type` attribute or as a nested anonymous `<struct>`.
fn parse_typed_body(
    reader: &mut Reader<&[u8]>,
    element: &str,
    type_attr: Option<String>,
    has_body: bool,
) -> Result<TypeExpr, ParseError> {
    let nested = if has_body {
        parse_nested_type(reader, element)?
    } else {
        None
    };

    match (type_attr, nested) {
        (Some(src), None) => parse_type_expr(&src),
        (None, Some(expr)) => Ok(expr),
        (Some(_), Some(_)) => Err(ParseError::InvalidStructure {
            message: format!("<{element}> has both a type attribute and a nested type"),
        }),
        (None, None) => Err(ParseError::missing_attr(element, "type")),
    }
}

/// Reads the children of a typed element up to its end tag.
fn parse_nested_type(
    reader: &mut Reader<&[u8]>,
    context: &str,
) -> Result<Option<TypeExpr>, ParseError> {
    let mut nested = None;
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => {
                let expr = match element_name(e).as_str() {
                    "struct" => TypeExpr::Struct(parse_struct_fields(reader)?),
                    "interface" => {
                        skip_to_end(reader)?;
                        TypeExpr::Interface
                    }
                    other => return Err(ParseError::unknown_element(other, context)),
                };
                set_nested(&mut nested, expr, context)?;
            }
            Ok(Event::Empty(ref e)) => {
                let expr = match element_name(e).as_str() {
                    "struct" => TypeExpr::Struct(Vec::new()),
                    "interface" => TypeExpr::Interface,
                    other => return Err(ParseError::unknown_element(other, context)),
                };
                set_nested(&mut nested, expr, context)?;
            }
            Ok(Event::End(_)) => break,
            Ok(Event::Eof) => {
                return Err(ParseError::InvalidStructure {
                    message: format!("unterminated <{context}>"),
                });
            }
            Err(e) => return Err(ParseError::Xml(e)),
            _ => {}
        }
        buf.clear();
    }

    Ok(nested)
}

fn set_nested(
    slot: &mut Option<TypeExpr>,
    expr: TypeExpr,
    context: &str,
) -> Result<(), ParseError> {
    if slot.is_some() {
        return Err(ParseError::InvalidStructure {
            message: format!("<{context}> holds more than one nested type"),
        });
    }
    *slot = Some(expr);
    Ok(())
}

/// Parses the fields of a struct body up to its end tag.
fn parse_struct_fields(reader: &mut Reader<&[u8]>) -> Result<Vec<FieldDecl>, ParseError> {
    let mut fields = Vec::new();
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => {
                if element_name(e) != "field" {
                    return Err(ParseError::unknown_element(element_name(e), "struct"));
                }
                fields.push(parse_field(reader, e, true)?);
            }
            Ok(Event::Empty(ref e)) => {
                if element_name(e) != "field" {
                    return Err(ParseError::unknown_element(element_name(e), "struct"));
                }
                fields.push(parse_field(reader, e, false)?);
            }
            Ok(Event::End(_)) => break,
            Ok(Event::Eof) => {
                return Err(ParseError::InvalidStructure {
                    message: "unterminated <struct>".to_string(),
                });
            }
            Err(e) => return Err(ParseError::Xml(e)),
            _ => {}
        }
        buf.clear();
    }

    Ok(fields)
}

/// Parses a struct field.
fn parse_field(
    reader: &mut Reader<&[u8]>,
    e: &BytesStart<'_>,
    has_body: bool,
) -> Result<FieldDecl, ParseError> {
    let mut name = None;
    let mut type_attr = None;
    let mut tag = None;
    let mut embedded = false;

    for (key, value) in attributes(e)? {
        match key.as_str() {
            "name" => name = Some(value),
            "type" => type_attr = Some(value),
            "tag" => tag = Some(value),
            "embedded" => embedded = parse_bool("field", "embedded", &value)?,
            _ => {}
        }
    }

    let expr = parse_typed_body(reader, "field", type_attr, has_body)?;

    let name = match name {
        Some(name) => name,
        None if embedded => expr
            .base_name()
            .map(str::to_string)
            .ok_or_else(|| ParseError::missing_attr("field", "name"))?,
        None => return Err(ParseError::missing_attr("field", "name")),
    };

    let mut field = FieldDecl::new(name, expr);
    field.tag = tag.filter(|t| !t.is_empty());
    field.embedded = embedded;
    Ok(field)
}

/// Skips to the end of the current element.
fn skip_to_end(reader: &mut Reader<&[u8]>) -> Result<(), ParseError> {
    let mut buf = Vec::new();
    let mut depth = 1;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(_)) => depth += 1,
            Ok(Event::End(_)) => {
                depth -= 1;
                if depth == 0 {
                    break;
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(ParseError::Xml(e)),
            _ => {}
        }
        buf.clear();
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ChanDir;

    const SHOP_UNIVERSE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<universe>
    <package path="github.com/acme/shop/orders">
        <struct name="Order" description="A customer order">
            <field name="Items" type="[]github.com/acme/shop/items.Item" tag='json:"items"'/>
            <field name="Owner" type="*github.com/acme/shop/customers.Customer"/>
            <field name="Meta">
                <struct>
                    <field name="Note" type="string"/>
                </struct>
            </field>
            <field type="Base" embedded="true"/>
        </struct>
        <struct name="Base"/>
        <type name="Status" type="string"/>
        <type name="Updates" type="&lt;-chan Status"/>
        <interface name="Notifier"/>
    </package>
    <package path="github.com/acme/shop/items">
        <struct name="Item">
            <field name="SKU" type="string"/>
        </struct>
    </package>
    <package path="github.com/acme/shop/customers">
        <struct name="Customer">
            <field name="Name" type="string"/>
            <field name="Referrer" type="*Customer"/>
        </struct>
    </package>
</universe>"#;

    #[test]
    fn test_parse_packages() {
        let universe = parse_universe(SHOP_UNIVERSE).expect("Failed to parse universe");

        assert_eq!(universe.packages.len(), 3);
        assert!(universe.has_package("github.com/acme/shop/items"));
        assert_eq!(universe.type_count(), 7);
    }

    #[test]
    fn test_parse_struct_fields() {
        let universe = parse_universe(SHOP_UNIVERSE).expect("Failed to parse universe");
        let orders = universe.get_package("github.com/acme/shop/orders").unwrap();
        let order = orders.get_type("Order").unwrap();

        assert_eq!(order.description.as_deref(), Some("A customer order"));
        let TypeExpr::Struct(fields) = &order.expr else {
            panic!("Order should be a struct");
        };
        assert_eq!(fields.len(), 4);
        assert_eq!(fields[0].tag.as_deref(), Some("json:\"items\""));
        assert!(matches!(fields[1].expr, TypeExpr::Pointer(_)));
        assert!(matches!(&fields[2].expr, TypeExpr::Struct(inner) if inner.len() == 1));
        assert!(fields[3].embedded);
        assert_eq!(fields[3].name, "Base");
    }

    #[test]
    fn test_parse_named_types() {
        let universe = parse_universe(SHOP_UNIVERSE).expect("Failed to parse universe");
        let orders = universe.get_package("github.com/acme/shop/orders").unwrap();

        assert_eq!(
            orders.get_type("Status").unwrap().expr,
            TypeExpr::named("string")
        );
        assert_eq!(
            orders.get_type("Updates").unwrap().expr,
            TypeExpr::Chan {
                dir: ChanDir::Recv,
                elem: Box::new(TypeExpr::named("Status")),
            }
        );
        assert_eq!(
            orders.get_type("Notifier").unwrap().expr,
            TypeExpr::Interface
        );
        assert_eq!(
            orders.get_type("Base").unwrap().expr,
            TypeExpr::Struct(Vec::new())
        );
    }

    #[test]
    fn test_missing_root_element() {
        let result = parse_universe("<?xml version=\"1.0\"?>");
        assert!(matches!(result, Err(ParseError::InvalidStructure { .. })));
    }

    #[test]
    fn test_missing_package_path() {
        let result = parse_universe("<universe><package/></universe>");
        assert!(matches!(result, Err(ParseError::MissingAttribute { .. })));
    }

    #[test]
    fn test_unknown_declaration() {
        let xml = r#"<universe><package path="a"><enum name="X"/></package></universe>"#;
        assert!(matches!(
            parse_universe(xml),
            Err(ParseError::UnknownElement { .. })
        ));
    }

    #[test]
    fn test_field_requires_type() {
        let xml = r#"<universe><package path="a">
            <struct name="X"><field name="Y"/></struct>
        </package></universe>"#;
        assert!(matches!(
            parse_universe(xml),
            Err(ParseError::MissingAttribute { .. })
        ));
    }

    #[test]
    fn test_invalid_embedded_flag() {
        let xml = r#"<universe><package path="a">
            <struct name="X"><field type="Y" embedded="yes"/></struct>
        </package></universe>"#;
        assert!(matches!(
            parse_universe(xml),
            Err(ParseError::InvalidAttribute { .. })
        ));
    }

    #[test]
    fn test_invalid_type_expression() {
        let xml = r#"<universe><package path="a">
            <type name="X" type="map[string"/>
        </package></universe>"#;
        assert!(matches!(
            parse_universe(xml),
            Err(ParseError::InvalidTypeExpr { .. })
        ));
    }
}
