use fieldmap::Keyed;
use fieldmap_reflect::{DataError, NameCase, TypeInfo, TypeInfoError, enum_name, parse_enum};
use fieldmap_testhelpers::test;

#[derive(Keyed, Debug, PartialEq)]
enum Color {
    Red,
    #[keyed(rename = "verde")]
    Green,
    #[keyed(null)]
    Unset,
    #[keyed(skip)]
    Internal,
}

#[derive(Keyed)]
#[allow(dead_code)]
struct NotAnEnum {
    field: u8,
}

#[test]
fn null_name_sorts_first() {
    let info = TypeInfo::of::<Color>(NameCase::Sensitive).unwrap();
    assert!(info.is_enum());
    assert_eq!(info.len(), 3);
    assert_eq!(info.names()[0], None);
    assert_eq!(info.keys().collect::<Vec<_>>(), ["Red", "verde"]);
    assert_eq!(info.null_field().unwrap().field().name, "Unset");
    assert!(info.field("Internal").is_none());
}

#[test]
fn variants_map_to_wire_names() {
    assert_eq!(enum_name(&Color::Red), Ok(Some("Red")));
    assert_eq!(enum_name(&Color::Green), Ok(Some("verde")));
    assert_eq!(enum_name(&Color::Unset), Ok(None));
    assert_eq!(
        enum_name(&Color::Internal),
        Err(DataError::UnknownVariant { type_name: "Color" })
    );
}

#[test]
fn wire_names_map_back_to_variants() {
    assert_eq!(parse_enum::<Color>(Some("verde")), Ok(Some(Color::Green)));
    assert_eq!(parse_enum::<Color>(Some("Red")), Ok(Some(Color::Red)));
    assert_eq!(parse_enum::<Color>(None), Ok(Some(Color::Unset)));
    assert_eq!(parse_enum::<Color>(Some("Green")), Ok(None));
    assert_eq!(parse_enum::<Color>(Some("Internal")), Ok(None));
}

#[test]
fn variant_fields_produce_values_not_slots() {
    let info = TypeInfo::of::<Color>(NameCase::Sensitive).unwrap();
    let red = info.field("Red").unwrap();
    assert!(red.get(&Color::Red).is_none());
    assert!(red.is_variant(&Color::Red));
    assert!(!red.is_variant(&Color::Green));
    let value = red.enum_value().unwrap();
    assert_eq!(value.downcast_ref::<Color>(), Some(&Color::Red));
    assert_eq!(info.variant_name(&Color::Green), Some(Some("verde")));
    assert_eq!(info.variant_name(&1_u8), None);
}

#[test]
fn enums_refuse_case_insensitive_mode() {
    assert_eq!(
        TypeInfo::of::<Color>(NameCase::Insensitive).unwrap_err(),
        TypeInfoError::CaseInsensitiveEnum { type_name: "Color" }
    );
}

#[test]
fn struct_types_are_not_enums() {
    let value = NotAnEnum { field: 1 };
    assert_eq!(
        enum_name(&value),
        Err(DataError::NotAnEnum { type_name: "NotAnEnum" })
    );
    assert_eq!(
        parse_enum::<NotAnEnum>(Some("field")).map(|v| v.is_some()),
        Err(DataError::NotAnEnum { type_name: "NotAnEnum" })
    );
}
