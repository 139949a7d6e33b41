//! # Module Storage
//!
//! The persistent configuration region a module slot owns on behalf of
//! whatever logic it currently runs. Storage is a sparse array of typed
//! words addressed by position; a logic describes which position holds
//! which field through its [`StorageLayout`].
//!
//! ## Positional Stability
//!
//! An upgrade swaps the logic and keeps the storage. That is only sound if
//! the new logic reads every existing field from the same position with
//! the same kind. [`StorageLayout::check_upgrade`] enforces exactly that:
//! the new layout may append fields at fresh positions, and it may not
//! move, retype, or drop an existing one.
//!
//! Words are typed, so even a buggy layout cannot read an address as a
//! number: the read fails with [`StorageError::KindMismatch`].

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use tce_core::Address;

// ─── Fields and words ────────────────────────────────────────────────

/// A named configuration field a module may expose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfigField {
    /// Address of the external credential source the module consults.
    SourceAddress,
    /// Minimum value a numeric check requires.
    MinimumThreshold,
}

impl std::fmt::Display for ConfigField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SourceAddress => f.write_str("source_address"),
            Self::MinimumThreshold => f.write_str("minimum_threshold"),
        }
    }
}

/// The kind of value a storage position holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WordKind {
    /// A 20-byte address.
    Address,
    /// An unsigned integer.
    Uint,
}

impl std::fmt::Display for WordKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Address => f.write_str("address"),
            Self::Uint => f.write_str("uint"),
        }
    }
}

/// A single stored value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageWord {
    /// An address value.
    Address(Address),
    /// An unsigned integer value.
    Uint(u128),
}

impl StorageWord {
    /// The kind of this word.
    pub fn kind(&self) -> WordKind {
        match self {
            Self::Address(_) => WordKind::Address,
            Self::Uint(_) => WordKind::Uint,
        }
    }

    /// The address, if this is an address word.
    pub fn as_address(&self) -> Option<Address> {
        match self {
            Self::Address(a) => Some(*a),
            Self::Uint(_) => None,
        }
    }

    /// The integer, if this is an integer word.
    pub fn as_uint(&self) -> Option<u128> {
        match self {
            Self::Uint(v) => Some(*v),
            Self::Address(_) => None,
        }
    }
}

impl std::fmt::Display for StorageWord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Address(a) => write!(f, "{a}"),
            Self::Uint(v) => write!(f, "{v}"),
        }
    }
}

// ─── Errors ──────────────────────────────────────────────────────────

/// Errors reading storage or validating layouts.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    /// A position holds a word of a different kind than the layout says.
    #[error("storage position {index} holds a {found} word, layout expects {expected}")]
    KindMismatch {
        /// The storage position.
        index: u32,
        /// The kind the layout declares.
        expected: WordKind,
        /// The kind actually stored.
        found: WordKind,
    },

    /// An upgrade would move, retype, or drop an existing field.
    #[error("layout conflict at position {index}: {current} would become {next}")]
    LayoutConflict {
        /// The storage position.
        index: u32,
        /// The current field at that position.
        current: String,
        /// What the new layout puts there.
        next: String,
    },
}

// ─── Layout ──────────────────────────────────────────────────────────

/// Declares that `field` lives at position `index` with kind `kind`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FieldSlot {
    /// Storage position.
    pub index: u32,
    /// Field stored there.
    pub field: ConfigField,
    /// Kind of the stored word.
    pub kind: WordKind,
}

impl FieldSlot {
    /// Declare a field position.
    pub const fn new(index: u32, field: ConfigField, kind: WordKind) -> Self {
        Self { index, field, kind }
    }
}

impl std::fmt::Display for FieldSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.field, self.kind)
    }
}

/// The storage layout of a module logic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StorageLayout {
    fields: &'static [FieldSlot],
}

impl StorageLayout {
    /// A layout over the given field positions.
    pub const fn new(fields: &'static [FieldSlot]) -> Self {
        Self { fields }
    }

    /// All declared fields, in declaration order.
    pub fn fields(&self) -> &'static [FieldSlot] {
        self.fields
    }

    /// Where `field` lives, if this layout declares it.
    pub fn slot_of(&self, field: ConfigField) -> Option<&'static FieldSlot> {
        self.fields.iter().find(|slot| slot.field == field)
    }

    fn at(&self, index: u32) -> Option<&'static FieldSlot> {
        self.fields.iter().find(|slot| slot.index == index)
    }

    /// Verify `next` can take over storage written under `self`.
    ///
    /// Every position declared here must be declared identically in
    /// `next`. Positions `next` adds are fine.
    pub fn check_upgrade(&self, next: &StorageLayout) -> Result<(), StorageError> {
        for current in self.fields {
            match next.at(current.index) {
                Some(candidate) if candidate == current => {}
                Some(candidate) => {
                    return Err(StorageError::LayoutConflict {
                        index: current.index,
                        current: current.to_string(),
                        next: candidate.to_string(),
                    });
                }
                None => {
                    return Err(StorageError::LayoutConflict {
                        index: current.index,
                        current: current.to_string(),
                        next: "nothing".to_string(),
                    });
                }
            }
        }
        Ok(())
    }
}

// ─── Storage region ──────────────────────────────────────────────────

/// A slot's persistent configuration region.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModuleStorage {
    words: BTreeMap<u32, StorageWord>,
}

impl ModuleStorage {
    /// An empty region.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether nothing has been written.
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Number of written positions.
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// The raw word at `index`.
    pub fn load(&self, index: u32) -> Option<&StorageWord> {
        self.words.get(&index)
    }

    /// Write `word` to the position `slot` declares, checking its kind.
    pub fn store(&mut self, slot: &FieldSlot, word: StorageWord) -> Result<(), StorageError> {
        if word.kind() != slot.kind {
            return Err(StorageError::KindMismatch {
                index: slot.index,
                expected: slot.kind,
                found: word.kind(),
            });
        }
        self.words.insert(slot.index, word);
        Ok(())
    }

    /// Read the word at the position `slot` declares.
    ///
    /// `Ok(None)` means the position was never written.
    pub fn read(&self, slot: &FieldSlot) -> Result<Option<StorageWord>, StorageError> {
        match self.words.get(&slot.index) {
            None => Ok(None),
            Some(word) if word.kind() == slot.kind => Ok(Some(*word)),
            Some(word) => Err(StorageError::KindMismatch {
                index: slot.index,
                expected: slot.kind,
                found: word.kind(),
            }),
        }
    }

    /// Read an address field. Unwritten and zero addresses are both `None`.
    pub fn read_address(&self, slot: &FieldSlot) -> Result<Option<Address>, StorageError> {
        Ok(self
            .read(slot)?
            .and_then(|w| w.as_address())
            .filter(|a| !a.is_zero()))
    }

    /// Read an integer field. Only unwritten positions are `None`; zero is a value.
    pub fn read_uint(&self, slot: &FieldSlot) -> Result<Option<u128>, StorageError> {
        Ok(self.read(slot)?.and_then(|w| w.as_uint()))
    }

    /// Iterate written positions in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, &StorageWord)> {
        self.words.iter().map(|(i, w)| (*i, w))
    }
}
