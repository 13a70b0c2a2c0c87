pub mod content_conflicts;
pub mod context;
pub mod discriminants;
pub mod extensions;
pub mod name_normalizer;
pub mod path_converter;
pub mod reference_occurrences;
pub mod schema_converter;
pub mod security_converter;
pub mod spec_to_ir;

pub use content_conflicts::{ContentResolution, eliminate_content_conflicts};
pub use reference_occurrences::{ReferenceOccurrences, get_reference_occurrences};
pub use spec_to_ir::{generate_ir, generate_ir_with_options};
