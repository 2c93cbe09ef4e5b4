mod classify;
mod definition;
mod extract;

pub use classify::{Role, SuffixTable};
pub use definition::{DefinitionRenderer, FILL_IN};
pub use extract::{Extraction, Projectsetup, ProjectsetupNamespace, aggregate, apply_role_bindings, extract};
