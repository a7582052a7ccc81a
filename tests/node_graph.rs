//! Integration tests for building node graphs.
//!
//! Each test declares a small class model, builds the tree for a root type and checks
//! its shape: node kinds, resolved classes, cycles and the overrides applied.

use blueprint::{prelude::*, Result};
use rayon::prelude::*;
use std::sync::Arc;

struct Model {
    registry: Arc<ClassRegistry>,
    person: ClassRc,
    address: ClassRc,
    pet: ClassRc,
    pair: ClassRc,
    boxed: ClassRc,
    main_pojo: ClassRc,
    detail_pojo: ClassRc,
}

fn class(registry: &ClassRegistry, kind: PlatformKind) -> TypeDescriptor {
    TypeDescriptor::concrete(registry.platform(kind))
}

fn model() -> Result<Model> {
    let registry = Arc::new(ClassRegistry::new()?);
    let string = class(&registry, PlatformKind::String);
    let list = registry.platform(PlatformKind::List);

    // class Address { String street; String city; }
    let address = ClassBuilder::new(registry.clone(), "demo", "Address")
        .field("street", string.clone())
        .field("city", string.clone())
        .build()?;

    // class Pet { String name; }
    let pet = ClassBuilder::new(registry.clone(), "demo", "Pet")
        .field("name", string.clone())
        .build()?;

    // class Person { String name; int age; Address address; Pet[] pets; }
    let person = ClassBuilder::new(registry.clone(), "demo", "Person")
        .field("name", string.clone())
        .field("age", class(&registry, PlatformKind::I32))
        .field("address", address.id.into())
        .field("pets", TypeDescriptor::array_of(pet.id.into()))
        .build()?;

    // class Pair<L, R> { L left; R right; }
    let pair = ClassBuilder::new(registry.clone(), "demo", "Pair")
        .type_param("L")
        .type_param("R");
    let (left, right) = (pair.var("L"), pair.var("R"));
    let pair = pair.field("left", left).field("right", right).build()?;

    // class Box<T> { List<T> items; }
    let boxed = ClassBuilder::new(registry.clone(), "demo", "Box").type_param("T");
    let items = TypeDescriptor::parameterized(list, vec![boxed.var("T")]);
    let boxed = boxed.field("items", items).build()?;

    // class MainPojo { List<DetailPojo> detailPojos; }
    // class DetailPojo { MainPojo mainPojo; }
    let detail = ClassBuilder::new(registry.clone(), "demo", "DetailPojo");
    let main_pojo = ClassBuilder::new(registry.clone(), "demo", "MainPojo")
        .field(
            "detailPojos",
            TypeDescriptor::parameterized(list, vec![detail.id().into()]),
        )
        .build()?;
    let detail_pojo = detail.field("mainPojo", main_pojo.id.into()).build()?;

    Ok(Model {
        registry,
        person,
        address,
        pet,
        pair,
        boxed,
        main_pojo,
        detail_pojo,
    })
}

fn build(context: RootContext) -> Result<NodeRc> {
    NodeGraphBuilder::new(Arc::new(context)).build_root()
}

fn member<'a>(node: &'a NodeRc, name: &str) -> &'a NodeRc {
    node.children()
        .iter()
        .find(|child| child.originating_member().is_some_and(|m| m.name == name))
        .unwrap_or_else(|| panic!("'{}' has no member '{name}'", node.path()))
}

/// Person: a child per field, `name` is a leaf, `pets` an array with one Pet element.
#[test]
fn test_non_generic_root() -> Result<()> {
    let m = model()?;
    let context = RootContext::builder(m.registry.clone(), m.person.id.into()).build()?;
    assert!(context.root_bindings().is_empty());

    let root = build(context)?;
    let names: Vec<&str> = root
        .children()
        .iter()
        .filter_map(|child| child.originating_member())
        .map(|member| member.name.as_str())
        .collect();
    assert_eq!(names, vec!["name", "age", "address", "pets"]);

    let name = member(&root, "name");
    assert!(name.is_leaf());
    assert_eq!(name.kind(), NodeKind::Class);

    let age = member(&root, "age");
    assert!(age.is_leaf());
    assert!(age.resolved_class().is_primitive());

    let address = member(&root, "address");
    assert_eq!(address.children().len(), 2);

    let pets = member(&root, "pets");
    assert_eq!(pets.kind(), NodeKind::Array);
    assert_eq!(pets.children().len(), 1);
    assert_eq!(pets.raw_class().name, "Pet[]");
    let pet = pets.element().unwrap();
    assert_eq!(pet.resolved_class().id, m.pet.id);
    assert_eq!(pet.children().len(), 1);

    Ok(())
}

/// Pair<Integer, String>: left resolves to Integer, right to String.
#[test]
fn test_generic_root_arguments() -> Result<()> {
    let m = model()?;
    let integer = m.registry.platform(PlatformKind::Integer);
    let string = m.registry.platform(PlatformKind::String);

    let context = RootContext::builder(m.registry.clone(), m.pair.id.into())
        .with_type_arguments(vec![integer.into(), string.into()])?
        .build()?;
    let root = build(context)?;

    assert_eq!(member(&root, "left").resolved_class().id, integer);
    assert_eq!(member(&root, "right").resolved_class().id, string);
    Ok(())
}

/// The same binding can be supplied through a parameterized root type.
#[test]
fn test_parameterized_root() -> Result<()> {
    let m = model()?;
    let integer = m.registry.platform(PlatformKind::Integer);
    let string = m.registry.platform(PlatformKind::String);
    let root_type = TypeDescriptor::parameterized(m.pair.id, vec![integer.into(), string.into()]);

    let root = build(RootContext::builder(m.registry.clone(), root_type.clone()).build()?)?;

    assert_eq!(root.generic_type(), Some(&root_type));
    assert_eq!(member(&root, "left").resolved_class().id, integer);
    assert_eq!(member(&root, "right").resolved_class().id, string);
    Ok(())
}

/// Box<T> bound to Long at the root: `items` is a collection of Long.
#[test]
fn test_root_binding_reaches_collection_element() -> Result<()> {
    let m = model()?;
    let long = m.registry.platform(PlatformKind::Long);

    let context = RootContext::builder(m.registry.clone(), m.boxed.id.into())
        .with_type_arguments(vec![long.into()])?
        .build()?;
    let root = build(context)?;

    let items = member(&root, "items");
    assert_eq!(items.kind(), NodeKind::Collection);
    assert_eq!(items.children().len(), 1);
    let element = items.element().unwrap();
    assert_eq!(element.resolved_class().id, long);
    assert!(element.originating_member().is_none());
    assert_eq!(element.path(), "Box.items[*]");
    Ok(())
}

/// Without type arguments a generic root is rejected before anything is built.
#[test]
fn test_missing_root_arguments() -> Result<()> {
    let m = model()?;
    let result = RootContext::builder(m.registry.clone(), m.boxed.id.into()).build();
    assert!(matches!(result, Err(Error::Usage(_))));
    Ok(())
}

/// MainPojo -> detailPojos -> DetailPojo -> mainPojo: the second MainPojo is cyclic.
#[test]
fn test_cycle_through_collection() -> Result<()> {
    let m = model()?;
    let root = build(RootContext::builder(m.registry.clone(), m.main_pojo.id.into()).build()?)?;

    assert!(!root.is_cyclic());
    assert_eq!(root.children().len(), 1);

    let details = member(&root, "detailPojos");
    assert!(!details.is_cyclic());
    let detail = details.element().unwrap();
    assert_eq!(detail.resolved_class().id, m.detail_pojo.id);
    assert!(!detail.is_cyclic());

    let main = member(detail, "mainPojo");
    assert_eq!(main.resolved_class().id, m.main_pojo.id);
    assert!(main.is_cyclic());
    assert!(main.children().is_empty());
    Ok(())
}

/// A class holding itself directly terminates after one level.
#[test]
fn test_direct_self_reference() -> Result<()> {
    let registry = Arc::new(ClassRegistry::new()?);
    let builder = ClassBuilder::new(registry.clone(), "demo", "TreeNode");
    let id = builder.id();
    let list = registry.platform(PlatformKind::List);
    let tree = builder
        .field("parent", id.into())
        .field("children", TypeDescriptor::parameterized(list, vec![id.into()]))
        .build()?;

    let context = RootContext::builder(registry.clone(), tree.id.into())
        .with_config(NodeConfig::unlimited())
        .build()?;
    let root = build(context)?;

    assert!(member(&root, "parent").is_cyclic());
    let children = member(&root, "children");
    assert!(!children.is_cyclic());
    assert!(children.element().unwrap().is_cyclic());
    Ok(())
}

/// The same class in two sibling branches is expanded in both.
#[test]
fn test_sibling_repeats_are_not_cycles() -> Result<()> {
    let m = model()?;
    let order = ClassBuilder::new(m.registry.clone(), "demo", "Order")
        .field("billing", m.address.id.into())
        .field("shipping", m.address.id.into())
        .build()?;

    let root = build(RootContext::builder(m.registry.clone(), order.id.into()).build()?)?;

    for name in ["billing", "shipping"] {
        let address = member(&root, name);
        assert!(!address.is_cyclic(), "{name}");
        assert_eq!(address.children().len(), 2, "{name}");
    }
    Ok(())
}

/// A type repeated below a sibling, not below itself, is not a cycle either.
#[test]
fn test_repeat_in_nested_sibling_branch() -> Result<()> {
    let m = model()?;
    let list = m.registry.platform(PlatformKind::List);
    let household = ClassBuilder::new(m.registry.clone(), "demo", "Household")
        .field("owner", m.person.id.into())
        .field(
            "residents",
            TypeDescriptor::parameterized(list, vec![m.person.id.into()]),
        )
        .build()?;

    let root = build(RootContext::builder(m.registry.clone(), household.id.into()).build()?)?;

    let owner = member(&root, "owner");
    let resident = member(&root, "residents").element().unwrap();
    assert!(!owner.is_cyclic());
    assert!(!resident.is_cyclic());
    assert_eq!(owner.children().len(), resident.children().len());
    Ok(())
}

/// Map nodes have a key and a value child for every map class.
#[test]
fn test_map_shapes() -> Result<()> {
    let m = model()?;
    let string = m.registry.platform(PlatformKind::String);

    for kind in [PlatformKind::Map, PlatformKind::HashMap, PlatformKind::TreeMap] {
        let map = m.registry.platform(kind);
        let root_type =
            TypeDescriptor::parameterized(map, vec![string.into(), m.person.id.into()]);
        let root = build(RootContext::builder(m.registry.clone(), root_type).build()?)?;

        assert_eq!(root.kind(), NodeKind::Map, "{kind:?}");
        assert_eq!(root.children().len(), 2, "{kind:?}");
        assert_eq!(root.key().unwrap().resolved_class().id, string);
        assert_eq!(root.value().unwrap().resolved_class().id, m.person.id);
        assert_eq!(root.value().unwrap().path(), format!("{}<value>", map_name(kind)));
    }
    Ok(())
}

fn map_name(kind: PlatformKind) -> &'static str {
    match kind {
        PlatformKind::HashMap => "HashMap",
        PlatformKind::TreeMap => "TreeMap",
        _ => "Map",
    }
}

/// A map declared through an interface and substituted by the context.
#[test]
fn test_map_subtype_substitution() -> Result<()> {
    let m = model()?;
    let string = m.registry.platform(PlatformKind::String);
    let long = m.registry.platform(PlatformKind::Long);
    let map = m.registry.platform(PlatformKind::Map);
    let tree_map = m.registry.platform(PlatformKind::TreeMap);

    let context = RootContext::builder(m.registry.clone(), map.into())
        .with_type_arguments(vec![string.into(), long.into()])?
        .subtype(map, tree_map)?
        .build()?;
    let root = build(context)?;

    assert_eq!(root.raw_class().id, map);
    assert_eq!(root.resolved_class().id, tree_map);
    assert_eq!(root.key().unwrap().resolved_class().id, string);
    assert_eq!(root.value().unwrap().resolved_class().id, long);
    Ok(())
}

/// Registered subtypes replace member classes; the subtype's own fields are collected.
#[test]
fn test_member_subtype_substitution() -> Result<()> {
    let m = model()?;
    let extension = ClassBuilder::new(m.registry.clone(), "demo", "AddressExtension")
        .extends(m.address.id.into())
        .field("zip", class(&m.registry, PlatformKind::String))
        .build()?;

    let context = RootContext::builder(m.registry.clone(), m.person.id.into())
        .subtype(m.address.id, extension.id)?
        .build()?;
    let root = build(context)?;

    let address = member(&root, "address");
    assert_eq!(address.raw_class().id, m.address.id);
    assert_eq!(address.resolved_class().id, extension.id);
    let names: Vec<String> = address
        .children()
        .iter()
        .map(|child| child.originating_member().unwrap().name.clone())
        .collect();
    assert_eq!(names, vec!["zip", "street", "city"]);
    Ok(())
}

/// Leaves stay leaves at any depth.
#[test]
fn test_leaf_classes_have_no_children() -> Result<()> {
    let m = model()?;
    let root = build(RootContext::builder(m.registry.clone(), m.person.id.into()).build()?)?;

    for node in preorder(&root) {
        let class = node.resolved_class();
        if class.id.is_platform() && !class.is_array() {
            assert!(node.is_leaf(), "{}", node.path());
        }
    }
    Ok(())
}

/// Generic supertype arguments bind inherited members.
#[test]
fn test_inherited_generic_member() -> Result<()> {
    let m = model()?;
    let string = class(&m.registry, PlatformKind::String);

    // class Named<T> { T name; }  class Tag extends Named<String> {}
    let named = ClassBuilder::new(m.registry.clone(), "demo", "Named").type_param("T");
    let name = named.var("T");
    let named = named.field("name", name).build()?;
    let tag = ClassBuilder::new(m.registry.clone(), "demo", "Tag")
        .extends(TypeDescriptor::parameterized(named.id, vec![string]))
        .build()?;

    let root = build(RootContext::builder(m.registry.clone(), tag.id.into()).build()?)?;
    let name = member(&root, "name");
    assert_eq!(name.resolved_class().id, PlatformKind::String.id());
    assert_eq!(name.originating_member().unwrap().declaring_class, named.id);
    Ok(())
}

/// A class implementing a parameterized collection is built as a collection.
#[test]
fn test_custom_collection_class() -> Result<()> {
    let m = model()?;
    let array_list = m.registry.platform(PlatformKind::ArrayList);
    let pets = ClassBuilder::new(m.registry.clone(), "demo", "PetList")
        .extends(TypeDescriptor::parameterized(
            array_list,
            vec![m.pet.id.into()],
        ))
        .build()?;

    let root = build(RootContext::builder(m.registry.clone(), pets.id.into()).build()?)?;
    assert_eq!(root.kind(), NodeKind::Collection);
    assert_eq!(root.element().unwrap().resolved_class().id, m.pet.id);
    Ok(())
}

/// Nested generics resolve level by level.
#[test]
fn test_nested_generic_containers() -> Result<()> {
    let m = model()?;
    let long = m.registry.platform(PlatformKind::Long);
    let list = m.registry.platform(PlatformKind::List);
    let map = m.registry.platform(PlatformKind::Map);
    let string = m.registry.platform(PlatformKind::String);

    // class Index<K> { Map<K, List<Box<K>>> entries; }
    let index = ClassBuilder::new(m.registry.clone(), "demo", "Index").type_param("K");
    let key = index.var("K");
    let entries = TypeDescriptor::parameterized(
        map,
        vec![
            key.clone(),
            TypeDescriptor::parameterized(
                list,
                vec![TypeDescriptor::parameterized(m.boxed.id, vec![key])],
            ),
        ],
    );
    let index = index.field("entries", entries).build()?;

    let context = RootContext::builder(m.registry.clone(), index.id.into())
        .with_type_arguments(vec![long.into()])?
        .build()?;
    let root = build(context)?;

    let entries = member(&root, "entries");
    assert_eq!(entries.key().unwrap().resolved_class().id, long);
    let boxes = entries.value().unwrap();
    assert_eq!(boxes.kind(), NodeKind::Collection);
    let boxed = boxes.element().unwrap();
    assert_eq!(boxed.resolved_class().id, m.boxed.id);
    let items = member(boxed, "items");
    assert_eq!(items.element().unwrap().resolved_class().id, long);
    assert_ne!(items.element().unwrap().resolved_class().id, string);
    Ok(())
}

/// An unresolvable variable names the member chain.
#[test]
fn test_unresolved_type_variable() -> Result<()> {
    let m = model()?;
    let holder = ClassBuilder::new(m.registry.clone(), "demo", "Holder")
        .field("boxed", m.boxed.id.into())
        .build()?;

    let context = RootContext::builder(m.registry.clone(), holder.id.into()).build()?;
    match build(context) {
        Err(Error::Resolution { var, path }) => {
            assert_eq!(var, "Box.T");
            assert_eq!(path, "Holder.boxed.items: List<T>");
        }
        other => panic!("expected a resolution error, got {other:?}"),
    }
    Ok(())
}

/// Ignored members and classes are built but not expanded.
#[test]
fn test_ignored_nodes() -> Result<()> {
    let m = model()?;
    let context = Arc::new(
        RootContext::builder(m.registry.clone(), m.person.id.into())
            .ignore_member(m.person.id, "address")?
            .ignore_class(m.pet.id)
            .build()?,
    );
    let root = NodeGraphBuilder::new(context.clone()).build_root()?;

    let address = member(&root, "address");
    assert!(address.is_ignored());
    assert!(address.is_leaf());
    assert!(context.is_ignored(address));

    let pet = member(&root, "pets").element().unwrap();
    assert!(pet.is_ignored());
    assert!(pet.is_leaf());
    Ok(())
}

/// Nullable and generator overrides are answered per node.
#[test]
fn test_node_overrides() -> Result<()> {
    let m = model()?;
    let string = m.registry.platform(PlatformKind::String);
    let context = Arc::new(
        RootContext::builder(m.registry.clone(), m.person.id.into())
            .nullable_member(m.person.id, "address")?
            .generator_for_member(m.person.id, "name", GeneratorId(1))?
            .generator_for_class(string, GeneratorId(2))
            .build()?,
    );
    let root = NodeGraphBuilder::new(context.clone()).build_root()?;

    assert!(context.is_nullable(member(&root, "address")));
    assert!(!context.is_nullable(member(&root, "name")));
    assert_eq!(context.generator(member(&root, "name")), Some(GeneratorId(1)));

    let street = member(member(&root, "address"), "street");
    assert_eq!(context.generator(street), Some(GeneratorId(2)));
    assert_eq!(context.generator(member(&root, "age")), None);
    Ok(())
}

/// Unmatched setters become members of their own when configured.
#[test]
fn test_unmatched_setter_members() -> Result<()> {
    let m = model()?;
    let string = class(&m.registry, PlatformKind::String);
    let account = ClassBuilder::new(m.registry.clone(), "demo", "Account")
        .field("login", string.clone())
        .setter("setLogin", string.clone())
        .setter("setPassword", string)
        .build()?;

    let config = NodeConfig::method_assignment().with_ignore_unmatched_setters(false);
    let context = RootContext::builder(m.registry.clone(), account.id.into())
        .with_config(config)
        .build()?;
    let root = build(context)?;

    let paths: Vec<String> = root.children().iter().map(|child| child.path()).collect();
    assert_eq!(paths, vec!["Account.login", "Account.setPassword()"]);
    assert!(root.children()[1]
        .originating_member()
        .unwrap()
        .is_unmatched_setter());
    Ok(())
}

/// Each node is created once and the finished tree can be read from many threads.
#[test]
fn test_tree_shared_across_threads() -> Result<()> {
    let m = model()?;
    let root = build(RootContext::builder(m.registry.clone(), m.person.id.into()).build()?)?;

    let expected: Vec<String> = preorder(&root).map(|node| node.path()).collect();
    let results: Vec<Vec<String>> = (0..8)
        .into_par_iter()
        .map(|_| preorder(&root).map(|node| node.path()).collect())
        .collect();

    for paths in results {
        assert_eq!(paths, expected);
    }
    Ok(())
}

fn structural_message(result: Result<NodeRc>) -> String {
    match result {
        Err(Error::Structural { message, .. }) => message,
        Err(other) => panic!("expected a structural error, got {other}"),
        Ok(root) => panic!("expected a structural error, got {root}"),
    }
}

/// `Tree extends ArrayList<Tree>`: the element repeats its container and is cyclic,
/// even without a depth limit.
#[test]
fn test_self_referential_collection_subclass() -> Result<()> {
    let m = model()?;
    let array_list = m.registry.platform(PlatformKind::ArrayList);
    let hash_map = m.registry.platform(PlatformKind::HashMap);

    let tree = ClassBuilder::new(m.registry.clone(), "demo", "Tree");
    let tree_id = tree.id();
    let tree = tree
        .extends(TypeDescriptor::parameterized(array_list, vec![tree_id.into()]))
        .build()?;

    let context = RootContext::builder(m.registry.clone(), tree.id.into())
        .with_config(NodeConfig::unlimited())
        .build()?;
    let root = build(context)?;
    assert_eq!(root.kind(), NodeKind::Collection);
    assert!(!root.is_cyclic());
    let element = root.element().unwrap();
    assert_eq!(element.resolved_class().id, tree.id);
    assert_eq!(element.kind(), NodeKind::Collection);
    assert!(element.is_cyclic());
    assert!(element.is_leaf());
    assert_eq!(element.path(), "Tree[*]");

    // the same below a member, and for a map whose value is the map itself
    let forest = ClassBuilder::new(m.registry.clone(), "demo", "Forest")
        .field("trees", tree.id.into())
        .build()?;
    let root = build(
        RootContext::builder(m.registry.clone(), forest.id.into())
            .with_config(NodeConfig::unlimited())
            .build()?,
    )?;
    let trees = member(&root, "trees");
    assert!(!trees.is_cyclic());
    assert!(trees.element().unwrap().is_cyclic());

    let index = ClassBuilder::new(m.registry.clone(), "demo", "Index");
    let index_id = index.id();
    let index = index
        .extends(TypeDescriptor::parameterized(
            hash_map,
            vec![class(&m.registry, PlatformKind::String), index_id.into()],
        ))
        .build()?;
    let root = build(
        RootContext::builder(m.registry.clone(), index.id.into())
            .with_config(NodeConfig::unlimited())
            .build()?,
    )?;
    assert_eq!(root.kind(), NodeKind::Map);
    assert!(root.key().unwrap().is_leaf());
    let value = root.value().unwrap();
    assert_eq!(value.resolved_class().id, index.id);
    assert!(value.is_cyclic());
    Ok(())
}

/// `Link<T> { T value; Link<T> next; }` bound to String: `next` repeats the root.
#[test]
fn test_generic_self_reference_is_cyclic() -> Result<()> {
    let m = model()?;
    let string = m.registry.platform(PlatformKind::String);
    let long = m.registry.platform(PlatformKind::Long);

    let link = ClassBuilder::new(m.registry.clone(), "demo", "Link").type_param("T");
    let value = link.var("T");
    let next = TypeDescriptor::parameterized(link.id(), vec![value.clone()]);
    let link = link.field("value", value).field("next", next).build()?;

    let context = RootContext::builder(m.registry.clone(), link.id.into())
        .with_type_arguments(vec![string.into()])?
        .build()?;
    let root = build(context)?;
    let link_of_string = TypeDescriptor::parameterized(link.id, vec![string.into()]);
    assert_eq!(root.generic_type(), Some(&link_of_string));
    assert_eq!(member(&root, "value").resolved_class().id, string);

    let next = member(&root, "next");
    assert_eq!(next.generic_type(), Some(&link_of_string));
    assert!(next.is_cyclic());
    assert!(next.is_leaf());

    // a differently parameterized link is a different type
    let outer = ClassBuilder::new(m.registry.clone(), "demo", "Chain")
        .field(
            "strings",
            TypeDescriptor::parameterized(link.id, vec![string.into()]),
        )
        .field(
            "longs",
            TypeDescriptor::parameterized(link.id, vec![long.into()]),
        )
        .build()?;
    let root = build(RootContext::builder(m.registry.clone(), outer.id.into()).build()?)?;
    for name in ["strings", "longs"] {
        let chain = member(&root, name);
        assert!(!chain.is_cyclic());
        assert!(member(chain, "next").is_cyclic());
    }
    Ok(())
}

/// Shapes the builder cannot handle are reported with the member chain they occur at.
#[test]
fn test_structural_errors_name_member_chain() -> Result<()> {
    let m = model()?;
    let list = m.registry.platform(PlatformKind::List);
    let both = TypeDescriptor::Wildcard(vec![
        class(&m.registry, PlatformKind::Long),
        class(&m.registry, PlatformKind::String),
    ]);

    let holder = ClassBuilder::new(m.registry.clone(), "demo", "Holder")
        .field("odd", both.clone())
        .build()?;
    let message = structural_message(build(
        RootContext::builder(m.registry.clone(), holder.id.into()).build()?,
    ));
    assert!(message.contains("multiple upper bounds"), "{message}");
    assert!(message.contains(" at Holder.odd: "), "{message}");

    let nested = ClassBuilder::new(m.registry.clone(), "demo", "Nested")
        .field("values", TypeDescriptor::parameterized(list, vec![both]))
        .build()?;
    let wrapper = ClassBuilder::new(m.registry.clone(), "demo", "Wrapper")
        .field("nested", nested.id.into())
        .build()?;
    let message = structural_message(build(
        RootContext::builder(m.registry.clone(), wrapper.id.into()).build()?,
    ));
    assert!(message.contains(" at Wrapper.nested.values: List<"), "{message}");

    let missing = m.registry.next_id();
    let ghost = ClassBuilder::new(m.registry.clone(), "demo", "Haunted")
        .field("ghost", missing.into())
        .build()?;
    let message = structural_message(build(
        RootContext::builder(m.registry.clone(), ghost.id.into()).build()?,
    ));
    assert!(message.contains("Class not found"), "{message}");
    assert!(message.contains(" at Haunted.ghost: "), "{message}");
    Ok(())
}

/// Ignoring a declared class also ignores nodes where it was substituted.
#[test]
fn test_ignored_substituted_class() -> Result<()> {
    let m = model()?;
    let list = m.registry.platform(PlatformKind::List);
    let array_list = m.registry.platform(PlatformKind::ArrayList);

    let context = Arc::new(
        RootContext::builder(m.registry.clone(), m.main_pojo.id.into())
            .ignore_class(list)
            .subtype(list, array_list)?
            .build()?,
    );
    let root = NodeGraphBuilder::new(context.clone()).build_root()?;

    let details = member(&root, "detailPojos");
    assert_eq!(details.raw_class().id, list);
    assert_eq!(details.resolved_class().id, array_list);
    assert!(details.is_ignored());
    assert!(details.is_leaf());
    assert!(context.is_ignored(details));
    assert!(!context.is_ignored(&root));
    Ok(())
}
