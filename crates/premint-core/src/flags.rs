//! Generic bit-flag sets
//!
//! Registries pack several independently named booleans into one integer.
//! A [`FlagSet`] maps an ordered list of names to bits (`index i -> 1 << i`)
//! and answers membership questions about an encoded value.
//!
//! Some families of settings use "bit set = disabled" semantics. Those are
//! built with `inverted = true`: [`FlagSet::has`] negates the raw bit test and
//! [`FlagSet::encode`] clears the bits of the names it is given, so that
//! `has(encode(S), n)` holds for every `n` in `S` in both modes.
//!
//! The type knows nothing about concrete domains; the names live in
//! [`crate::permissions::PermissionTable`].

use crate::errors::{MigrationError, Result};

/// Maximum number of names a flag set can hold.
///
/// Values are carried in a `u32`; the top bit is left unused so encoded
/// values never depend on sign handling at a registry boundary.
pub const MAX_FLAGS: usize = 31;

/// Immutable mapping from flag names to power-of-two bits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlagSet {
    names: Vec<String>,
    inverted: bool,
}

impl FlagSet {
    /// Build a flag set from an ordered list of names.
    ///
    /// Fails with `TooManyFlags` for more than [`MAX_FLAGS`] names and with
    /// `DuplicateFlag` when a name repeats.
    pub fn build<I, S>(names: I, inverted: bool) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        if names.len() > MAX_FLAGS {
            return Err(MigrationError::TooManyFlags {
                count: names.len(),
                max: MAX_FLAGS,
            });
        }
        for (i, name) in names.iter().enumerate() {
            if names[..i].contains(name) {
                return Err(MigrationError::DuplicateFlag { name: name.clone() });
            }
        }
        Ok(Self { names, inverted })
    }

    /// Names in declaration order.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Number of flags.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// True when the set has no flags.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Whether membership is negated.
    pub fn is_inverted(&self) -> bool {
        self.inverted
    }

    /// Bit value assigned to `name`.
    pub fn bit(&self, name: &str) -> Result<u32> {
        self.names
            .iter()
            .position(|n| n == name)
            .map(|i| 1u32 << i)
            .ok_or_else(|| MigrationError::UnknownFlag {
                name: name.to_string(),
            })
    }

    /// Every bit this set knows about.
    pub fn all_bits(&self) -> u32 {
        match self.names.len() {
            0 => 0,
            n => u32::MAX >> (32 - n),
        }
    }

    /// Test whether `value` carries `name`.
    pub fn has(&self, name: &str, value: u32) -> Result<bool> {
        let bit = self.bit(name)?;
        let set = (value & bit) == bit;
        Ok(set != self.inverted)
    }

    /// Encode a subset of names.
    ///
    /// In inverted mode the members are the cleared bits and every other
    /// known bit is set.
    pub fn encode<S: AsRef<str>>(&self, names: &[S]) -> Result<u32> {
        let mut bits = 0u32;
        for name in names {
            bits |= self.bit(name.as_ref())?;
        }
        Ok(if self.inverted {
            self.all_bits() & !bits
        } else {
            bits
        })
    }

    /// Encode a full truth vector, one entry per flag in declaration order.
    pub fn encode_values(&self, values: &[bool]) -> Result<u32> {
        if values.len() != self.names.len() {
            return Err(MigrationError::invalid(format!(
                "expected {} flag values, got {}",
                self.names.len(),
                values.len()
            )));
        }
        Ok(values
            .iter()
            .enumerate()
            .filter(|(_, enabled)| **enabled != self.inverted)
            .fold(0u32, |acc, (i, _)| acc | (1u32 << i)))
    }

    /// Names held by `value`, in declaration order.
    pub fn decode(&self, value: u32) -> Vec<&str> {
        self.names
            .iter()
            .enumerate()
            .filter(|(i, _)| {
                let bit = 1u32 << i;
                ((value & bit) == bit) != self.inverted
            })
            .map(|(_, name)| name.as_str())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn roles() -> FlagSet {
        FlagSet::build(["Issuer", "Freezer", "Admin"], false).unwrap()
    }

    fn settings() -> FlagSet {
        FlagSet::build(
            [
                "TransferableItems",
                "UnlockedMetadata",
                "UnlockedAttributes",
                "UnlockedMaxSupply",
                "DepositRequired",
            ],
            true,
        )
        .unwrap()
    }

    #[test]
    fn bits_follow_declaration_order() {
        let flags = roles();
        assert_eq!(flags.bit("Issuer").unwrap(), 1);
        assert_eq!(flags.bit("Freezer").unwrap(), 2);
        assert_eq!(flags.bit("Admin").unwrap(), 4);
        assert_eq!(flags.all_bits(), 0b111);
    }

    #[test]
    fn has_tests_raw_bits() {
        let flags = roles();
        assert!(flags.has("Admin", 0b101).unwrap());
        assert!(flags.has("Issuer", 0b101).unwrap());
        assert!(!flags.has("Freezer", 0b101).unwrap());
    }

    #[test]
    fn inverted_set_reads_cleared_bits_as_enabled() {
        let flags = settings();
        // Everything unlocked on a fresh collection.
        assert!(flags.has("UnlockedAttributes", 0).unwrap());
        // Bit 2 set means attributes are locked.
        assert!(!flags.has("UnlockedAttributes", 0b100).unwrap());
    }

    #[test]
    fn unknown_flag_is_rejected() {
        assert_matches!(
            roles().has("Owner", 7),
            Err(MigrationError::UnknownFlag { name }) if name == "Owner"
        );
        assert_matches!(
            roles().encode(&["Owner"]),
            Err(MigrationError::UnknownFlag { .. })
        );
    }

    #[test]
    fn duplicate_names_are_rejected() {
        assert_matches!(
            FlagSet::build(["A", "A"], false),
            Err(MigrationError::DuplicateFlag { name }) if name == "A"
        );
    }

    #[test]
    fn too_many_names_are_rejected() {
        let names: Vec<String> = (0..32).map(|i| format!("F{i}")).collect();
        assert_matches!(
            FlagSet::build(names, false),
            Err(MigrationError::TooManyFlags { count: 32, max: 31 })
        );

        let names: Vec<String> = (0..31).map(|i| format!("F{i}")).collect();
        let flags = FlagSet::build(names, false).unwrap();
        assert_eq!(flags.all_bits(), 0x7fff_ffff);
        assert_eq!(flags.bit("F30").unwrap(), 1 << 30);
    }

    #[test]
    fn encode_values_matches_positional_truth_vector() {
        let flags = roles();
        assert_eq!(flags.encode_values(&[true, false, true]).unwrap(), 0b101);

        let flags = settings();
        // Only attributes unlocked: every other bit set.
        let value = flags
            .encode_values(&[false, false, true, false, false])
            .unwrap();
        assert_eq!(value, 0b11011);
        assert!(flags.has("UnlockedAttributes", value).unwrap());
        assert!(!flags.has("UnlockedMetadata", value).unwrap());

        assert_matches!(
            flags.encode_values(&[true]),
            Err(MigrationError::Invalid { .. })
        );
    }

    #[test]
    fn decode_lists_held_names() {
        assert_eq!(roles().decode(0b110), vec!["Freezer", "Admin"]);
        assert_eq!(
            settings().decode(0b11011),
            vec!["UnlockedAttributes"]
        );
    }
}

#[cfg(test)]
mod proptest_flags {
    use super::*;
    use proptest::prelude::*;

    /// A name list plus a membership mask over it
    fn arb_subset() -> impl Strategy<Value = (Vec<String>, Vec<bool>, bool)> {
        (1usize..=MAX_FLAGS).prop_flat_map(|n| {
            (
                Just((0..n).map(|i| format!("Flag{i}")).collect::<Vec<_>>()),
                proptest::collection::vec(any::<bool>(), n),
                any::<bool>(),
            )
        })
    }

    proptest! {
        /// has(encode(S), n) is true exactly for members of S, in both modes
        #[test]
        fn encode_then_has_reports_membership((names, mask, inverted) in arb_subset()) {
            let flags = FlagSet::build(names.clone(), inverted).unwrap();
            let subset: Vec<&String> = names
                .iter()
                .zip(&mask)
                .filter(|(_, m)| **m)
                .map(|(n, _)| n)
                .collect();
            let value = flags.encode(&subset).unwrap();
            for (name, member) in names.iter().zip(&mask) {
                prop_assert_eq!(flags.has(name, value).unwrap(), *member);
            }
        }

        /// Positional and named encodings agree
        #[test]
        fn encode_values_agrees_with_encode((names, mask, inverted) in arb_subset()) {
            let flags = FlagSet::build(names.clone(), inverted).unwrap();
            let subset: Vec<&String> = names
                .iter()
                .zip(&mask)
                .filter(|(_, m)| **m)
                .map(|(n, _)| n)
                .collect();
            prop_assert_eq!(flags.encode(&subset).unwrap(), flags.encode_values(&mask).unwrap());
        }

        /// decode is the inverse of encode on known bits
        #[test]
        fn decode_recovers_subset((names, mask, inverted) in arb_subset()) {
            let flags = FlagSet::build(names.clone(), inverted).unwrap();
            let value = flags.encode_values(&mask).unwrap();
            let expected: Vec<&str> = names
                .iter()
                .zip(&mask)
                .filter(|(_, m)| **m)
                .map(|(n, _)| n.as_str())
                .collect();
            prop_assert_eq!(flags.decode(value), expected);
        }
    }
}
