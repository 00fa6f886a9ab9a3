use std::collections::{BTreeMap, HashMap};

use crate::prototypes::{OperandCount, Prototype};

/// Read-only access to prototypes by opcode.
///
/// The decoder and renderer only ever read through this trait, so any source of prototypes
/// works: a loaded [`PrototypeTable`], or a map assembled by hand.
pub trait PrototypeLookup {
    /// Returns the prototype registered for `opcode`, if any.
    fn lookup(&self, opcode: u16) -> Option<&Prototype>;
}

impl PrototypeLookup for HashMap<u16, Prototype> {
    fn lookup(&self, opcode: u16) -> Option<&Prototype> {
        self.get(&opcode)
    }
}

impl PrototypeLookup for BTreeMap<u16, Prototype> {
    fn lookup(&self, opcode: u16) -> Option<&Prototype> {
        self.get(&opcode)
    }
}

/// An immutable opcode → prototype mapping.
///
/// Tables are only created through [`PrototypeTableBuilder::build`] (or empty through
/// `Default`), so nothing can change a table once decoding has started.
///
/// # Examples
///
/// ```rust
/// use scmscope::prototypes::{Prototype, PrototypeLookup, PrototypeTableBuilder};
///
/// let mut builder = PrototypeTableBuilder::new();
/// builder.insert(Prototype::operator(0x0008, "+=", 2));
/// builder.register(0x0001, "1".parse()?);
/// builder.apply_name(0x0001, "wait");
/// let table = builder.build();
///
/// assert_eq!(table.len(), 2);
/// assert_eq!(table.lookup(0x0001).and_then(|p| p.name.as_deref()), Some("wait"));
/// # Ok::<(), scmscope::Error>(())
/// ```
#[derive(Clone, Debug, Default)]
pub struct PrototypeTable {
    prototypes: BTreeMap<u16, Prototype>,
}

impl PrototypeTable {
    /// Number of prototypes in the table.
    #[must_use]
    pub fn len(&self) -> usize {
        self.prototypes.len()
    }

    /// Returns `true` if the table holds no prototypes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.prototypes.is_empty()
    }

    /// Iterates all prototypes in ascending opcode order.
    pub fn iter(&self) -> impl Iterator<Item = &Prototype> {
        self.prototypes.values()
    }
}

impl PrototypeLookup for PrototypeTable {
    fn lookup(&self, opcode: u16) -> Option<&Prototype> {
        self.prototypes.get(&opcode)
    }
}

/// Accumulates prototypes from one or more sources before freezing them into a
/// [`PrototypeTable`].
#[derive(Clone, Debug, Default)]
pub struct PrototypeTableBuilder {
    prototypes: BTreeMap<u16, Prototype>,
}

impl PrototypeTableBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an opcode's operand count, replacing any earlier entry for it (including its
    /// name).
    pub fn register(&mut self, opcode: u16, operand_count: OperandCount) {
        self.prototypes
            .insert(opcode, Prototype::new(opcode, operand_count));
    }

    /// Sets the display name of an opcode. An opcode that has not been registered yet gets a
    /// zero-operand function prototype.
    pub fn apply_name(&mut self, opcode: u16, name: &str) {
        self.prototypes
            .entry(opcode)
            .or_insert_with(|| Prototype::new(opcode, OperandCount::Fixed(0)))
            .name = Some(name.to_string());
    }

    /// Inserts a complete prototype, replacing any earlier entry for its opcode.
    pub fn insert(&mut self, prototype: Prototype) {
        self.prototypes.insert(prototype.opcode, prototype);
    }

    /// Number of prototypes accumulated so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.prototypes.len()
    }

    /// Returns `true` if nothing has been accumulated yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.prototypes.is_empty()
    }

    /// Freezes the accumulated prototypes into a read-only table.
    #[must_use]
    pub fn build(self) -> PrototypeTable {
        PrototypeTable {
            prototypes: self.prototypes,
        }
    }
}

impl FromIterator<Prototype> for PrototypeTable {
    fn from_iter<I: IntoIterator<Item = Prototype>>(iter: I) -> Self {
        let mut builder = PrototypeTableBuilder::new();
        for prototype in iter {
            builder.insert(prototype);
        }
        builder.build()
    }
}
