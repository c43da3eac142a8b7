use std::fmt;

use crate::codegen::label::Labels;
use crate::encoder;
use crate::intern::{Interner, Name};

/// Pool of string literals encountered during code generation; flushed
/// into the `.data` section once the whole unit has been emitted.
pub struct StringPool {
    entries: Vec<(String, Name)>,
}

impl StringPool {
    pub fn new() -> Self {
        StringPool {
            entries: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Registers a literal and returns the label naming it.
    pub fn add(&mut self, literal: Name, labels: &mut Labels) -> String {
        let label = labels.next_string();
        self.entries.push((label.clone(), literal));
        label
    }

    pub fn write_data<W: fmt::Write>(&self, interner: &Interner, out: &mut W) -> fmt::Result {
        for (label, literal) in &self.entries {
            let encoded = encoder::string_encode(interner.resolve(*literal));
            writeln!(out, "{}:\n\t.string {}", label, encoded)?;
        }
        Ok(())
    }
}

impl Default for StringPool {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pool_emits_encoded_literals() {
        let mut interner = Interner::new();
        let mut labels = Labels::new();
        let mut pool = StringPool::new();
        let hello = interner.intern("hi\n");
        let label = pool.add(hello, &mut labels);
        assert_eq!(label, ".S0");

        let mut out = String::new();
        pool.write_data(&interner, &mut out).unwrap();
        assert_eq!(out, ".S0:\n\t.string \"hi\\n\"\n");
    }
}
