#![allow(dead_code)]

use typesnap::prelude::*;

mod shop {
    use typesnap::Introspect;

    #[derive(Introspect)]
    pub struct Audit {
        pub created_by: String,
    }

    #[derive(Introspect)]
    #[typesnap(location = "github.com/acme/shop")]
    pub struct Order {
        #[typesnap(rename = "ID", tag = "json:\"id\"")]
        pub id: u64,
        #[typesnap(embed)]
        pub audit: Audit,
        #[typesnap(skip)]
        pub cache: Vec<u8>,
        pub line_items: Vec<String>,
    }
}

#[derive(Introspect)]
#[typesnap(location = "list", rename = "ListNode")]
struct Node {
    value: i32,
    next: Option<Box<Self>>,
}

#[derive(Introspect)]
#[typesnap(location = "ids")]
struct UserId(u64);

#[derive(Introspect)]
#[typesnap(location = "markers")]
struct Marker;

#[derive(Introspect)]
#[typesnap(location = "a/pkg", rename = "User")]
struct UserA {
    name: String,
}

#[derive(Introspect)]
#[typesnap(location = "b/pkg", rename = "User")]
struct UserB {
    #[typesnap(embed)]
    base: Option<UserA>,
}

#[derive(Introspect)]
#[typesnap(location = "chain")]
struct Link(Option<Box<Link>>);

fn describe<T: Introspect>() -> (TypeGraph, NodeId) {
    let mut graph = TypeGraph::new();
    let id = T::describe(&mut graph);
    (graph, id)
}

#[test]
fn test_named_struct_fields() {
    let (graph, id) = describe::<shop::Order>();
    let order = graph.handle(id);

    assert_eq!(order.name(), "Order");
    assert_eq!(order.location(), "github.com/acme/shop");
    assert_eq!(order.kind(), Kind::Struct);

    let fields = order.fields();
    assert_eq!(fields.len(), 3);
    assert_eq!(fields[0].name, "ID");
    assert_eq!(fields[0].tag, Some("json:\"id\""));
    assert_eq!(fields[0].ty.kind(), Kind::Primitive(Primitive::Uint64));
    assert_eq!(fields[1].name, "Audit");
    assert!(fields[1].embedded);
    assert_eq!(fields[2].name, "LineItems");
    assert_eq!(fields[2].ty.kind(), Kind::Slice);
}

#[test]
fn test_location_defaults_to_module_path() {
    let (graph, id) = describe::<shop::Audit>();
    assert_eq!(graph.node(id).location(), "derive/shop");
}

#[test]
fn test_recursive_struct_terminates() {
    let (graph, id) = describe::<Node>();
    let node = graph.handle(id);
    assert_eq!(node.name(), "ListNode");

    let next = node.fields()[1].ty;
    assert_eq!(next.kind(), Kind::Pointer);
    assert_eq!(next.elem().map(|h| h.id()), Some(id));
}

#[test]
fn test_newtype_and_unit_struct() {
    let (graph, id) = describe::<UserId>();
    assert_eq!(graph.node(id).name(), "UserId");
    assert_eq!(graph.node(id).shape(), &Shape::Primitive(Primitive::Uint64));
    assert!(!graph.node(id).is_builtin());

    let (graph, id) = describe::<Marker>();
    assert_eq!(graph.node(id).shape(), &Shape::Struct(Vec::new()));
}

#[test]
fn test_embedded_pointer_named_after_pointee() {
    let (graph, id) = describe::<UserB>();
    let field = graph.handle(id).fields()[0];
    assert_eq!(field.name, "User");
    assert!(field.embedded);
    assert_eq!(field.ty.kind(), Kind::Pointer);
}

#[test]
fn test_generate_order_snapshot() {
    let mut generator = Generator::new(SnapshotConfig::new().header(false));
    generator.add::<shop::Order>();
    let snapshot = generator.generate().unwrap();

    let expected = "package snapshot\n\n\
                    type (\n\
                    \tAudit struct {\n\
                    \t\tCreatedBy string\n\
                    \t}\n\
                    \n\
                    \tOrder struct {\n\
                    \t\tID uint64 `json:\"id\"`\n\
                    \t\tAudit\n\
                    \t\tLineItems []string\n\
                    \t}\n\
                    )\n";
    assert_eq!(snapshot, expected);
}

#[test]
fn test_generate_colliding_names() {
    let mut generator = Generator::new(SnapshotConfig::new().header(false).suffix("V1"));
    generator.add::<UserB>();
    let snapshot = generator.generate().unwrap();

    assert!(snapshot.contains("\tAPkgUserV1 struct {\n\t\tName string\n\t}\n"));
    assert!(snapshot.contains("\tBPkgUserV1 struct {\n\t\t*APkgUserV1\n\t}\n"));
}

#[test]
fn test_generate_self_pointing_newtype() {
    let mut generator = Generator::new(SnapshotConfig::new().header(false));
    generator.add::<Link>();
    let snapshot = generator.generate().unwrap();

    assert_eq!(snapshot, "package snapshot\n\ntype (\n\tLink *Link\n)\n");
}
