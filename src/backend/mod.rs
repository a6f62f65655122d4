//! Backend: Python code generation

pub mod codegen;

pub use codegen::generate;
