pub mod bindings_file;

pub use bindings_file::{BindingsFile, BindingsFileError};
