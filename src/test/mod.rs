//! Shared class models for unit tests.
//!
//! Every call to [`fixtures`] creates a fresh registry, so tests never observe classes
//! registered by other tests.

use std::sync::Arc;

use crate::typesystem::{ClassBuilder, ClassRc, ClassRegistry, PlatformKind, TypeDescriptor};

/// Registry pre-populated with the demo models
pub struct Fixtures {
    pub registry: Arc<ClassRegistry>,
    /// `Person { name: String, age: int, address: Address, pets: Pet[] }`
    pub person: ClassRc,
    /// `Address { street: String, city: String }` with `setStreet` and `setCity`
    pub address: ClassRc,
    /// `AddressExtension extends Address { zip: String }`
    pub address_extension: ClassRc,
    /// `Pet { name: String }`
    pub pet: ClassRc,
    /// `Pair<L, R> { left: L, right: R }`
    pub pair: ClassRc,
    /// `Box<T> { value: T, items: List<T> }`
    pub boxed: ClassRc,
    /// `MainPojo { detailPojos: List<DetailPojo> }`
    pub main_pojo: ClassRc,
    /// `DetailPojo { mainPojo: MainPojo }`
    pub detail_pojo: ClassRc,
    /// `Base<T> { value: T }`
    pub base: ClassRc,
    /// `Child extends Base<String> { label: String }`
    pub child: ClassRc,
}

// Helper function to declare a generic class with one field per type parameter
fn generic_class(
    registry: &Arc<ClassRegistry>,
    name: &str,
    params: &[(&str, &str)],
) -> ClassRc {
    let mut builder = ClassBuilder::new(registry.clone(), "demo", name);
    for (param, _) in params {
        builder = builder.type_param(param);
    }
    for (param, field) in params {
        let var = builder.var(param);
        builder = builder.field(field, var);
    }
    builder.build().unwrap()
}

pub fn fixtures() -> Fixtures {
    let registry = Arc::new(ClassRegistry::new().unwrap());
    let string = TypeDescriptor::concrete(registry.platform(PlatformKind::String));
    let int = TypeDescriptor::concrete(registry.platform(PlatformKind::I32));
    let list = registry.platform(PlatformKind::List);

    let address = ClassBuilder::new(registry.clone(), "demo", "Address")
        .field("street", string.clone())
        .field("city", string.clone())
        .setter("setStreet", string.clone())
        .setter("setCity", string.clone())
        .build()
        .unwrap();

    let address_extension = ClassBuilder::new(registry.clone(), "demo", "AddressExtension")
        .extends(address.id.into())
        .field("zip", string.clone())
        .build()
        .unwrap();

    let pet = ClassBuilder::new(registry.clone(), "demo", "Pet")
        .field("name", string.clone())
        .build()
        .unwrap();

    let person = ClassBuilder::new(registry.clone(), "demo", "Person")
        .field("name", string.clone())
        .field("age", int)
        .field("address", address.id.into())
        .field("pets", TypeDescriptor::array_of(pet.id.into()))
        .build()
        .unwrap();

    let pair = generic_class(&registry, "Pair", &[("L", "left"), ("R", "right")]);

    let boxed = ClassBuilder::new(registry.clone(), "demo", "Box").type_param("T");
    let value = boxed.var("T");
    let boxed = boxed
        .field("value", value.clone())
        .field("items", TypeDescriptor::parameterized(list, vec![value]))
        .build()
        .unwrap();

    let detail = ClassBuilder::new(registry.clone(), "demo", "DetailPojo");
    let main_pojo = ClassBuilder::new(registry.clone(), "demo", "MainPojo")
        .field(
            "detailPojos",
            TypeDescriptor::parameterized(list, vec![detail.id().into()]),
        )
        .build()
        .unwrap();
    let detail_pojo = detail
        .field("mainPojo", main_pojo.id.into())
        .build()
        .unwrap();

    let base = generic_class(&registry, "Base", &[("T", "value")]);
    let child = ClassBuilder::new(registry.clone(), "demo", "Child")
        .extends(TypeDescriptor::parameterized(base.id, vec![string.clone()]))
        .field("label", string)
        .build()
        .unwrap();

    Fixtures {
        registry,
        person,
        address,
        address_extension,
        pet,
        pair,
        boxed,
        main_pojo,
        detail_pojo,
        base,
        child,
    }
}
