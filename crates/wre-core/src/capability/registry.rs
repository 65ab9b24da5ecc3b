//! Capability Set
//!
//! Small, explicit set of granted capabilities.
//! Behavior: checks fail-closed.

use std::collections::HashSet;

use crate::error::{WreError, WreResult};
use crate::intrinsic::Intrinsic;
use super::capability::Capability;

/// Capabilities granted to a machine at construction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CapabilitySet {
    granted: HashSet<Capability>,
}

impl CapabilitySet {
    /// New set denies everything
    pub fn none() -> Self {
        CapabilitySet { granted: HashSet::new() }
    }

    /// Strings, floats and input
    pub fn all() -> Self {
        CapabilitySet { granted: Capability::ALL.into_iter().collect() }
    }

    /// Strings without floats or input, the shape of the earliest builds
    pub fn output_only() -> Self {
        let mut set = Self::none();
        set.grant(Capability::Strings);
        set
    }

    pub fn grant(&mut self, capability: Capability) {
        self.granted.insert(capability);
    }

    pub fn revoke(&mut self, capability: Capability) {
        self.granted.remove(&capability);
    }

    pub fn with(mut self, capability: Capability) -> Self {
        self.grant(capability);
        self
    }

    pub fn without(mut self, capability: Capability) -> Self {
        self.revoke(capability);
        self
    }

    pub fn contains(&self, capability: Capability) -> bool {
        self.granted.contains(&capability)
    }

    /// Check every capability `intrinsic` needs and fail-closed if one is missing
    pub fn check(&self, intrinsic: Intrinsic) -> WreResult<()> {
        if intrinsic.required_capabilities().iter().all(|c| self.contains(*c)) {
            Ok(())
        } else {
            Err(WreError::CapabilityDenied(intrinsic))
        }
    }

    /// Bit mask of granted capability ids
    pub fn bits(&self) -> u8 {
        self.granted.iter().fold(0, |acc, c| acc | c.id())
    }

    pub fn from_bits(bits: u8) -> Self {
        CapabilitySet {
            granted: Capability::ALL.into_iter().filter(|c| bits & c.id() != 0).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_capability_fails_closed() {
        let set = CapabilitySet::none();
        assert!(set.check(Intrinsic::PrintInteger).is_ok());
        assert!(matches!(
            set.check(Intrinsic::PrintString),
            Err(WreError::CapabilityDenied(Intrinsic::PrintString))
        ));
    }

    #[test]
    fn read_float_needs_both_input_and_floats() {
        let input_only = CapabilitySet::none().with(Capability::Input);
        assert!(input_only.check(Intrinsic::ReadInteger).is_ok());
        assert!(input_only.check(Intrinsic::ReadFloat).is_err());
        assert!(input_only.with(Capability::Floats).check(Intrinsic::ReadFloat).is_ok());
    }

    #[test]
    fn bits_round_trip() {
        let set = CapabilitySet::all().without(Capability::Floats);
        assert_eq!(set.bits(), 0x05);
        assert_eq!(CapabilitySet::from_bits(set.bits()), set);
    }
}
