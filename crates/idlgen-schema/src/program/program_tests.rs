#![allow(non_snake_case)]

use super::*;
use crate::definition::{EnumVariant, Function};
use crate::types::{Field, Primitive};

fn sample() -> Program {
    Program::new(vec![
        Definition::Typedef(TypedefDef {
            name: "UserId".into(),
            target: Type::primitive(Primitive::I64),
        }),
        Definition::Typedef(TypedefDef {
            name: "Owner".into(),
            target: Type::Typedef("UserId".into()),
        }),
        Definition::Enum(EnumDef {
            name: "Color".into(),
            variants: vec![EnumVariant {
                name: "RED".into(),
                value: 1,
            }],
        }),
        Definition::Struct(StructDef::new(
            "Point",
            vec![Field::new(1, "x", Type::primitive(Primitive::I32))],
        )),
        Definition::Exception(StructDef::new("DivByZero", vec![])),
        Definition::Service(Service {
            name: "Calc".into(),
            functions: vec![Function::new(
                "ping",
                vec![],
                Type::primitive(Primitive::Void),
            )],
        }),
    ])
}

#[test]
fn Program___lookups___find_each_definition_kind() {
    let program = sample();

    assert!(program.struct_def("Point").is_some());
    assert!(program.struct_def("DivByZero").is_some());
    assert!(program.typedef_def("UserId").is_some());
    assert!(program.enum_def("Color").is_some());
    assert!(program.service("Calc").is_some());
    assert!(program.struct_def("Color").is_none());
}

#[test]
fn Program___is_exception___distinguishes_exceptions() {
    let program = sample();

    assert!(program.is_exception("DivByZero"));
    assert!(!program.is_exception("Point"));
    assert!(!program.is_exception("Missing"));
}

#[test]
fn Program___canonical___follows_typedef_chain() {
    let program = sample();
    let owner = Type::Typedef("Owner".into());

    let canonical = program.canonical(&owner);

    assert_eq!(canonical, Some(&Type::primitive(Primitive::I64)));
}

#[test]
fn Program___canonical___non_typedef_is_itself() {
    let program = sample();
    let color = Type::Enum("Color".into());

    assert_eq!(program.canonical(&color), Some(&color));
}

#[test]
fn Program___canonical___undefined_typedef_returns_none() {
    let program = sample();

    assert!(program.canonical(&Type::Typedef("Nope".into())).is_none());
}

#[test]
fn Program___canonical___looping_chain_returns_none() {
    let program = Program::new(vec![
        Definition::Typedef(TypedefDef {
            name: "A".into(),
            target: Type::Typedef("B".into()),
        }),
        Definition::Typedef(TypedefDef {
            name: "B".into(),
            target: Type::Typedef("A".into()),
        }),
    ]);

    assert!(program.canonical(&Type::Typedef("A".into())).is_none());
}

#[test]
fn Program___duplicate_names___first_definition_wins() {
    let program = Program::new(vec![
        Definition::Struct(StructDef::new("Dup", vec![])),
        Definition::Struct(StructDef::new(
            "Dup",
            vec![Field::new(1, "x", Type::primitive(Primitive::Bool))],
        )),
    ]);

    assert!(program.struct_def("Dup").unwrap().fields.is_empty());
}

#[test]
fn Program___services_and_structs___keep_source_order() {
    let program = sample();

    let structs: Vec<&str> = program.structs().map(|s| s.name.as_str()).collect();
    let services: Vec<&str> = program.services().map(|s| s.name.as_str()).collect();

    assert_eq!(structs, vec!["Point", "DivByZero"]);
    assert_eq!(services, vec!["Calc"]);
}

#[test]
fn Program___from_json___builds_lookups() {
    let json = r#"{
        "definitions": [
            {"kind": "struct", "name": "Point", "fields": [
                {"id": 1, "name": "x", "type": {"primitive": "i32"}}
            ]},
            {"kind": "service", "name": "Geo", "functions": [
                {"name": "origin", "return_type": {"struct": "Point"}}
            ]}
        ]
    }"#;

    let program = Program::from_json(json).unwrap();

    assert_eq!(program.definitions().len(), 2);
    assert_eq!(program.struct_def("Point").unwrap().fields.len(), 1);
    assert_eq!(
        program.service("Geo").unwrap().functions[0].return_type,
        Type::named_struct("Point")
    );
}

#[test]
fn Program___serialize___roundtrips_definitions() {
    let program = sample();

    let json = serde_json::to_string(&program).unwrap();
    let recovered = Program::from_json(&json).unwrap();

    assert_eq!(recovered.definitions(), program.definitions());
    assert!(recovered.enum_def("Color").is_some());
}

#[test]
fn Program___from_json___invalid_document_returns_error() {
    let result = Program::from_json(r#"{"definitions": [{"kind": "widget"}]}"#);

    assert!(result.is_err());
}
