// crates/db/src/queries/mod.rs
// Query modules hang operations off the `Database` handle via `impl` blocks.

pub mod phases;
pub mod projects;
mod row_types;
