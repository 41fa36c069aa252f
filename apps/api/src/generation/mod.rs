// Schema-Constrained Generator.
// The only caller of the generation service backend; every pipeline goes through
// `SchemaGenerator::generate` and receives an already-validated value.

pub mod generator;
pub mod schema;
