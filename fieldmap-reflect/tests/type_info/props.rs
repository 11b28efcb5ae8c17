//! Name ordering and collision properties over shapes built at runtime.

use std::any::{Any, TypeId};
use std::cell::Cell;
use std::collections::BTreeSet;
use std::sync::Arc;

use fieldmap::{Field, FieldAccess, FieldFlags, ParentLink, Shape, SlotVTable, Type};
use fieldmap_reflect::{NameCase, TypeInfo, TypeInfoError};
use proptest::prelude::*;

struct Opaque;

fn no_get(_: &dyn Any) -> Option<&dyn Any> {
    None
}

fn no_get_mut(_: &mut dyn Any) -> Option<&mut dyn Any> {
    None
}

fn no_replace(_: &mut dyn Any, value: Box<dyn Any>) -> Result<Box<dyn Any>, Box<dyn Any>> {
    Err(value)
}

fn leak_shape(type_name: &'static str, names: &[String], parent: Option<ParentLink>) -> &'static Shape {
    let fields: Vec<Field> = names
        .iter()
        .map(|name| Field {
            name: Box::leak(name.clone().into_boxed_str()),
            rename: None,
            flags: FieldFlags::empty(),
            type_name: core::any::type_name::<u8>,
            type_id: TypeId::of::<u8>,
            access: FieldAccess::Slot(SlotVTable {
                get: no_get,
                get_mut: no_get_mut,
                replace: no_replace,
            }),
            doc: &[],
        })
        .collect();
    Box::leak(Box::new(Shape {
        type_name,
        id: TypeId::of::<Opaque>,
        ty: Type::Struct,
        parent,
        fields: Box::leak(fields.into_boxed_slice()),
        doc: &[],
    }))
}

thread_local! {
    static PARENT: Cell<Option<&'static Shape>> = const { Cell::new(None) };
}

fn current_parent() -> &'static Shape {
    PARENT.with(|parent| parent.get()).unwrap_or_else(|| unreachable!("no parent shape set"))
}

fn no_parent(_: &'static Shape, _: NameCase) -> Result<Arc<TypeInfo>, TypeInfoError> {
    unreachable!("shape has no parent")
}

fn build(shape: &'static Shape, case: NameCase) -> Result<TypeInfo, TypeInfoError> {
    TypeInfo::build(shape, case, |parent, case| {
        TypeInfo::build(parent, case, no_parent).map(Arc::new)
    })
}

fn names() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec("[a-zA-Z_]{1,6}", 0..12)
}

fn normalized(names: &[String], case: NameCase) -> Vec<String> {
    names.iter().map(|n| case.normalize(n).into_owned()).collect()
}

fn all_distinct(names: &[String]) -> bool {
    names.iter().collect::<BTreeSet<_>>().len() == names.len()
}

proptest! {
    #[test]
    fn sensitive_names_are_sorted_and_unique(names in names()) {
        let shape = leak_shape("Generated", &names, None);
        match build(shape, NameCase::Sensitive) {
            Ok(info) => {
                prop_assert!(all_distinct(&names));
                let expected: Vec<&str> = names.iter().map(String::as_str).collect::<BTreeSet<_>>().into_iter().collect();
                prop_assert_eq!(info.keys().collect::<Vec<_>>(), expected);
                for name in &names {
                    prop_assert_eq!(info.field(name).and_then(|f| f.name()), Some(name.as_str()));
                }
            }
            Err(TypeInfoError::DuplicateName { name, .. }) => {
                prop_assert!(!all_distinct(&names));
                let name = name.unwrap();
                prop_assert!(names.iter().filter(|n| n.as_str() == name.as_str()).count() > 1);
            }
            Err(other) => prop_assert!(false, "unexpected error: {other}"),
        }
    }

    #[test]
    fn insensitive_names_are_normalized(names in names()) {
        let shape = leak_shape("Generated", &names, None);
        let lowered = normalized(&names, NameCase::Insensitive);
        match build(shape, NameCase::Insensitive) {
            Ok(info) => {
                prop_assert!(all_distinct(&lowered));
                let mut expected = lowered.clone();
                expected.sort();
                prop_assert_eq!(info.keys().map(str::to_owned).collect::<Vec<_>>(), expected);
                for name in &names {
                    prop_assert!(info.field(&name.to_uppercase()).is_some());
                    prop_assert!(info.field(&name.to_lowercase()).is_some());
                }
            }
            Err(TypeInfoError::DuplicateName { case, .. }) => {
                prop_assert_eq!(case, NameCase::Insensitive);
                prop_assert!(!all_distinct(&lowered));
            }
            Err(other) => prop_assert!(false, "unexpected error: {other}"),
        }
    }

    #[test]
    fn inherited_names_merge_without_overrides(parent_names in names(), child_names in names()) {
        prop_assume!(all_distinct(&parent_names));
        let parent = leak_shape("GeneratedParent", &parent_names, None);
        PARENT.with(|cell| cell.set(Some(parent)));
        let child = leak_shape(
            "GeneratedChild",
            &child_names,
            Some(ParentLink {
                field: "parent",
                shape: current_parent,
                project: no_get,
                project_mut: no_get_mut,
            }),
        );

        let mut all = parent_names.clone();
        all.extend(child_names.iter().cloned());

        match build(child, NameCase::Sensitive) {
            Ok(info) => {
                prop_assert!(all_distinct(&all));
                prop_assert_eq!(info.len(), all.len());
                for name in &parent_names {
                    let field = info.field(name).unwrap();
                    prop_assert!(field.is_inherited());
                    prop_assert_eq!(field.declaring_shape().type_name, "GeneratedParent");
                }
                for name in &child_names {
                    prop_assert!(!info.field(name).unwrap().is_inherited());
                }
            }
            Err(TypeInfoError::DuplicateName { .. }) => prop_assert!(!all_distinct(&all)),
            Err(other) => prop_assert!(false, "unexpected error: {other}"),
        }
    }
}
