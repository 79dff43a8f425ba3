//! # Export
//!
//! ASCII STL serialization and download naming.

mod filename;
mod stl;

pub use filename::export_filename;
pub use stl::{solid_name, to_stl_string, write_stl};
