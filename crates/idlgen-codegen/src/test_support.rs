//! Shared schema fixtures for unit tests

use idlgen_schema::prelude::*;

pub(crate) fn i32_t() -> Type {
    Type::primitive(Primitive::I32)
}

pub(crate) fn string_t() -> Type {
    Type::primitive(Primitive::String)
}

pub(crate) fn float_t() -> Type {
    Type::primitive(Primitive::Float)
}

pub(crate) fn point() -> StructDef {
    StructDef::new(
        "Point",
        vec![Field::new(1, "x", i32_t()), Field::new(2, "y", i32_t())],
    )
}

/// A small program touching every type family:
///
/// ```text
/// enum Color { RED = 1, GREEN = 2, BLUE = 4 }
/// typedef i64 Id
/// struct Point { 1: i32 x, 2: i32 y }
/// struct Shape {
///   1: string name, 2: list<Point> points, 3: map<string, set<i32>> tags,
///   4: Color color, 5: Id id
/// }
/// exception DivByZero { 1: string message }
/// service Calc {
///   i32 add(1: i32 a, 2: i32 b)
///   i32 divide(1: i32 a, 2: i32 b) throws (1: DivByZero e)
///   void ping()
///   list<Point> path(1: Shape shape)
/// }
/// ```
pub(crate) fn calc_program() -> Program {
    Program::new(vec![
        Definition::Enum(EnumDef {
            name: "Color".into(),
            variants: vec![
                EnumVariant {
                    name: "RED".into(),
                    value: 1,
                },
                EnumVariant {
                    name: "GREEN".into(),
                    value: 2,
                },
                EnumVariant {
                    name: "BLUE".into(),
                    value: 4,
                },
            ],
        }),
        Definition::Typedef(TypedefDef {
            name: "Id".into(),
            target: Type::primitive(Primitive::I64),
        }),
        Definition::Struct(point()),
        Definition::Struct(StructDef::new(
            "Shape",
            vec![
                Field::new(1, "name", string_t()),
                Field::new(2, "points", Type::list(Type::named_struct("Point"))),
                Field::new(3, "tags", Type::map(string_t(), Type::set(i32_t()))),
                Field::new(4, "color", Type::Enum("Color".into())),
                Field::new(5, "id", Type::Typedef("Id".into())),
            ],
        )),
        Definition::Exception(StructDef::new(
            "DivByZero",
            vec![Field::new(1, "message", string_t())],
        )),
        Definition::Service(Service {
            name: "Calc".into(),
            functions: vec![
                Function::new(
                    "add",
                    vec![Field::new(1, "a", i32_t()), Field::new(2, "b", i32_t())],
                    i32_t(),
                ),
                Function::new(
                    "divide",
                    vec![Field::new(1, "a", i32_t()), Field::new(2, "b", i32_t())],
                    i32_t(),
                )
                .with_throws(vec![Field::new(1, "e", Type::named_struct("DivByZero"))]),
                Function::new("ping", vec![], Type::primitive(Primitive::Void)),
                Function::new(
                    "path",
                    vec![Field::new(1, "shape", Type::named_struct("Shape"))],
                    Type::list(Type::named_struct("Point")),
                ),
            ],
        }),
    ])
}

/// Program with a single struct definition
pub(crate) fn single_struct(def: StructDef) -> Program {
    Program::new(vec![Definition::Struct(def)])
}
