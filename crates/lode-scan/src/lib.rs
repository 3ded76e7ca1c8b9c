//! Reference scanner: discovers data blob references inside object
//! definitions.
//!
//! A geoscience object definition is an arbitrarily nested JSON document in
//! which binary attachments are referenced out-of-band: wherever a mapping
//! key named `data` holds a string, that string identifies a blob stored
//! separately from the structured content. The scanner walks a definition
//! and returns every such reference in document order.

use serde_json::Value;

/// The mapping key whose string values are blob references.
const DATA_KEY: &str = "data";

/// Pending work for the pre-order walk.
///
/// `Emit` entries exist so that a reference is emitted exactly where it was
/// encountered relative to its siblings' subtrees; emitting directly while
/// scanning a mapping's entries would hoist shallow references ahead of
/// deeper ones that precede them in the document.
enum Step<'a> {
    Visit(&'a Value),
    Emit(&'a str),
}

/// Extract all data blob references from an object definition.
///
/// The traversal is a deterministic pre-order walk: at a mapping, every
/// `data` key holding a string emits that string and is not descended into;
/// every other value is descended into regardless of its key. Sequences are
/// walked element-wise. Duplicate references are preserved in discovery
/// order, since each occurrence may correspond to a different attachment
/// slot.
///
/// A `data` key holding anything other than a string is treated as nested
/// structure, not a reference; this avoids false positives on structural
/// fields that happen to be named `data`.
///
/// The walk uses an explicit work stack, so definition depth is bounded by
/// heap rather than call-stack size. Pure function; the input is never
/// mutated.
pub fn extract_data_references(tree: &Value) -> Vec<String> {
    let mut references = Vec::new();
    let mut stack = vec![Step::Visit(tree)];

    while let Some(step) = stack.pop() {
        match step {
            Step::Emit(reference) => references.push(reference.to_owned()),
            Step::Visit(Value::Object(map)) => {
                // Entries are pushed in reverse so they pop in document order.
                for (key, value) in map.iter().rev() {
                    match value {
                        Value::String(s) if key == DATA_KEY => stack.push(Step::Emit(s)),
                        other => stack.push(Step::Visit(other)),
                    }
                }
            }
            Step::Visit(Value::Array(items)) => {
                for item in items.iter().rev() {
                    stack.push(Step::Visit(item));
                }
            }
            // Scalars terminate the walk.
            Step::Visit(_) => {}
        }
    }

    references
}
