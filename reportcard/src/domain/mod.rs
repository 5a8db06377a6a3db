//! Report-card record types
//!
//! Each type is a flat record with an optional store-assigned id. Relations
//! are plain foreign-key ids; nothing here resolves them. Fields serialize in
//! camelCase, which is what the browser client sends and expects back.

mod classe;
mod eleve;
mod evaluation;
mod inscrire;
mod matiere;

pub use classe::Classe;
pub use eleve::Eleve;
pub use evaluation::Evaluation;
pub use inscrire::Inscrire;
pub use matiere::Matiere;
