//! idlgen-conformance - Generated code for `fixtures/calc.json`, compiled
//!
//! The build script runs the generator over the fixture program and this
//! crate includes the three units into one module. The tests drive the
//! result through `idlgen-runtime` to check wire behavior end to end.

/// Output of `idlgen generate` for the calc fixture
#[allow(dead_code, clippy::all)]
pub mod calc {
    include!(concat!(env!("OUT_DIR"), "/calc_types.rs"));
    include!(concat!(env!("OUT_DIR"), "/calc.rs"));
    include!(concat!(env!("OUT_DIR"), "/calc_impl.rs"));
}
