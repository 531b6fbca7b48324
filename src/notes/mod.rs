// Note structure parsing and advisory validation

mod parser;
mod rules;

pub use parser::{parse, AtomicNote, ParseOutcome};
pub use rules::{validate, NoteRules, Validation};
