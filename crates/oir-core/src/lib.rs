pub mod config;
pub mod error;
pub mod generator;
pub mod ir;
pub mod parse;
pub mod transform;

pub use config::ConvertOptions;
pub use ir::IrOpenApiFile;
pub use transform::{generate_ir, generate_ir_with_options};
