use easel_core::traits::Validate;
use easel_core::{EaselError, Result};
use serde::{Deserialize, Serialize};

use crate::function::CurveFunction;
use crate::modifier::{Convert, Modifier};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModifierEntry {
    pub modifier: Modifier,
    pub enabled: bool,
}

/// Ordered list of modifiers attached to a curve. Entries apply in
/// attachment order; disabled entries are skipped.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModifierChain {
    entries: Vec<ModifierEntry>,
}

impl ModifierChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[ModifierEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Attach an enabled modifier at the end of the chain.
    pub fn push(&mut self, modifier: impl Into<Modifier>) {
        let modifier = modifier.into();
        log::debug!("attached {} at {}", modifier.name(), self.entries.len());
        self.entries.push(ModifierEntry {
            modifier,
            enabled: true,
        });
    }

    pub fn remove(&mut self, index: usize) -> Option<Modifier> {
        if index >= self.entries.len() {
            return None;
        }
        let entry = self.entries.remove(index);
        log::debug!("detached {} from {}", entry.modifier.name(), index);
        Some(entry.modifier)
    }

    pub fn set_enabled(&mut self, index: usize, enabled: bool) -> bool {
        match self.entries.get_mut(index) {
            Some(entry) => {
                entry.enabled = enabled;
                true
            }
            None => false,
        }
    }

    /// Swap two entries; order changes the composed result.
    pub fn swap(&mut self, a: usize, b: usize) -> bool {
        if a >= self.entries.len() || b >= self.entries.len() {
            return false;
        }
        self.entries.swap(a, b);
        true
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        bincode::serialize(self).map_err(|e| EaselError::Serialization(e.to_string()))
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let chain: ModifierChain =
            bincode::deserialize(bytes).map_err(|e| EaselError::Serialization(e.to_string()))?;
        chain.validate()?;
        Ok(chain)
    }
}

impl Convert for ModifierChain {
    fn convert(&self, function: &CurveFunction) -> CurveFunction {
        self.entries
            .iter()
            .filter(|entry| entry.enabled)
            .fold(function.clone(), |f, entry| entry.modifier.convert(&f))
    }
}

impl Validate for ModifierChain {
    fn validate(&self) -> Result<()> {
        self.entries.iter().try_for_each(|entry| entry.modifier.validate())
    }
}
