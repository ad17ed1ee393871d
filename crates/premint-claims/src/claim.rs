//! Pre-signed claims
//!
//! Two payloads are signed off chain and redeemed by the current registry:
//!
//! - [`Claim`] authorizes exactly one mint: one item, one recipient, one
//!   deadline.
//! - [`AttributeClaim`] authorizes setting attributes on an existing item
//!   under a given namespace.
//!
//! Both are signed over their SCALE encoding, so the field order below is
//! the contract shared with the redeeming runtime:
//!
//! ```text
//! Claim          collection u32, item u32, attributes Vec<(Vec<u8>, Vec<u8>)>,
//!                metadata Vec<u8>, only_account Option<[u8; 32]>,
//!                deadline u32, mint_price Option<u128>
//! AttributeClaim collection u32, item u32, attributes Vec<(Vec<u8>, Vec<u8>)>,
//!                namespace AttributeNamespace, deadline u32
//! ```
//!
//! Decoding is strict: trailing bytes, truncated input, bad option or enum
//! tags and non-canonical compact lengths are all rejected, so every accepted
//! payload re-encodes to the exact bytes that were signed.

use parity_scale_codec::{Decode, DecodeAll, Encode};
use premint_core::{
    verify_signature, AccountId, BlockNumber, ClaimSigner, CollectionId, ItemId, MigrationError,
    Result, SignatureBytes,
};

/// Key/value attribute pairs carried by a claim.
pub type Attributes = Vec<(Vec<u8>, Vec<u8>)>;

/// Unsigned mint claim payload.
#[derive(Debug, Clone, PartialEq, Eq, Encode, Decode)]
pub struct Claim {
    /// Target collection the item is minted into.
    pub collection: CollectionId,
    /// Item id, identical to the source item id.
    pub item: ItemId,
    /// Attributes set at mint time. Empty for migrated items.
    pub attributes: Attributes,
    /// Item metadata copied from the source registry; empty when absent.
    pub metadata: Vec<u8>,
    /// The only account allowed to redeem the claim.
    pub only_account: Option<AccountId>,
    /// Last block at which the claim can be redeemed.
    pub deadline: BlockNumber,
    /// Mint price; `None` means free to redeem.
    pub mint_price: Option<u128>,
}

/// Owner of an attribute on the current registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Encode, Decode)]
pub enum AttributeNamespace {
    /// Written by the registry itself.
    Pallet,
    /// Written by the collection owner or an admin.
    CollectionOwner,
    /// Written by the item owner.
    ItemOwner,
    /// Written by a delegated account.
    Account(AccountId),
}

/// Unsigned attribute claim payload.
#[derive(Debug, Clone, PartialEq, Eq, Encode, Decode)]
pub struct AttributeClaim {
    /// Collection holding the item.
    pub collection: CollectionId,
    /// Item whose attributes are set.
    pub item: ItemId,
    /// Attributes to set.
    pub attributes: Attributes,
    /// Namespace the attributes are written under.
    pub namespace: AttributeNamespace,
    /// Last block at which the claim can be redeemed.
    pub deadline: BlockNumber,
}

/// A payload that is signed over its SCALE encoding.
pub trait SignedPayload: Encode + Decode {
    /// Short name used in error messages.
    const KIND: &'static str;

    /// Item the payload applies to.
    fn item(&self) -> ItemId;
}

impl SignedPayload for Claim {
    const KIND: &'static str = "mint claim";

    fn item(&self) -> ItemId {
        self.item
    }
}

impl SignedPayload for AttributeClaim {
    const KIND: &'static str = "attribute claim";

    fn item(&self) -> ItemId {
        self.item
    }
}

/// Decode `bytes` as exactly one `T`. Trailing bytes are an error.
pub fn decode_exact<T: SignedPayload>(bytes: &[u8]) -> Result<T> {
    T::decode_all(&mut &bytes[..])
        .map_err(|e| MigrationError::encoding(format!("invalid {} encoding: {e}", T::KIND)))
}

/// A payload with its encoding and signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signed<T> {
    /// Decoded payload.
    pub claim: T,
    /// Encoding of `claim`, the exact signed bytes.
    pub data: Vec<u8>,
    /// Signature over `data`.
    pub signature: SignatureBytes,
}

/// A signed mint claim.
pub type SignedClaim = Signed<Claim>;

/// A signed attribute claim.
pub type SignedAttributeClaim = Signed<AttributeClaim>;

impl<T: SignedPayload> Signed<T> {
    /// Encode `claim` and sign the bytes.
    pub fn sign<S: ClaimSigner + ?Sized>(claim: T, signer: &S) -> Result<Self> {
        let data = claim.encode();
        let signature = signer.sign(&data)?;
        Ok(Self {
            claim,
            data,
            signature,
        })
    }

    /// Rebuild from stored bytes, decoding the payload.
    pub fn from_parts(data: Vec<u8>, signature: SignatureBytes) -> Result<Self> {
        let claim = decode_exact(&data)?;
        Ok(Self {
            claim,
            data,
            signature,
        })
    }

    /// Check that `data` is the encoding of `claim` and that the signature
    /// was produced by `signer`.
    pub fn verify(&self, signer: &AccountId) -> Result<()> {
        if self.claim.encode() != self.data {
            return Err(MigrationError::encoding(format!(
                "{} for item {} does not match its signed bytes",
                T::KIND,
                self.claim.item()
            )));
        }
        verify_signature(signer, &self.data, &self.signature)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use premint_core::Ed25519Signer;

    fn sample() -> Claim {
        Claim {
            collection: CollectionId::new(34),
            item: ItemId::new(7),
            attributes: vec![],
            metadata: b"ipfs://meta".to_vec(),
            only_account: Some(AccountId::from_bytes([2; 32])),
            deadline: BlockNumber::new(5_256_100),
            mint_price: None,
        }
    }

    fn attribute_sample() -> AttributeClaim {
        AttributeClaim {
            collection: CollectionId::new(34),
            item: ItemId::new(7),
            attributes: vec![(b"some key".to_vec(), b"new value".to_vec())],
            namespace: AttributeNamespace::CollectionOwner,
            deadline: BlockNumber::new(5_256_100),
        }
    }

    #[test]
    fn claim_layout_is_stable() {
        let claim = Claim {
            collection: CollectionId::new(1),
            item: ItemId::new(2),
            attributes: vec![],
            metadata: vec![0xaa, 0xbb],
            only_account: None,
            deadline: BlockNumber::new(0x0100),
            mint_price: Some(5),
        };
        let mut expected = vec![1, 0, 0, 0, 2, 0, 0, 0, 0x00, 0x08, 0xaa, 0xbb, 0x00, 0, 1, 0, 0, 1];
        expected.extend_from_slice(&5u128.to_le_bytes());
        assert_eq!(claim.encode(), expected);
    }

    #[test]
    fn attribute_claim_layout_is_stable() {
        let claim = AttributeClaim {
            collection: CollectionId::new(1),
            item: ItemId::new(2),
            attributes: vec![(b"k".to_vec(), b"v".to_vec())],
            namespace: AttributeNamespace::CollectionOwner,
            deadline: BlockNumber::new(0x0100),
        };
        let expected = vec![
            1, 0, 0, 0, 2, 0, 0, 0, 0x04, 0x04, b'k', 0x04, b'v', 0x01, 0, 1, 0, 0,
        ];
        assert_eq!(claim.encode(), expected);

        let delegated = AttributeClaim {
            namespace: AttributeNamespace::Account(AccountId::from_bytes([9; 32])),
            ..claim
        };
        let bytes = delegated.encode();
        assert_eq!(bytes[13], 0x03);
        assert_eq!(&bytes[14..46], &[9; 32]);
    }

    #[test]
    fn long_metadata_uses_two_byte_length() {
        let mut claim = sample();
        claim.metadata = vec![0x11; 64];
        let bytes = claim.encode();
        assert_eq!(&bytes[9..11], &[0x01, 0x01]);
        assert_eq!(decode_exact::<Claim>(&bytes).unwrap(), claim);
    }

    #[test]
    fn decode_inverts_encode() {
        let mut claim = sample();
        claim.attributes = vec![(b"k".to_vec(), b"v".to_vec()), (vec![], vec![0; 70])];
        claim.mint_price = Some(u128::MAX);
        assert_eq!(decode_exact::<Claim>(&claim.encode()).unwrap(), claim);
    }

    #[test]
    fn trailing_bytes_are_rejected() {
        let mut bytes = sample().encode();
        bytes.push(0);
        assert_matches!(
            decode_exact::<Claim>(&bytes),
            Err(MigrationError::InvalidEncoding { .. })
        );
    }

    #[test]
    fn truncated_input_is_rejected() {
        let bytes = sample().encode();
        assert!(decode_exact::<Claim>(&bytes[..bytes.len() - 1]).is_err());
    }

    #[test]
    fn non_canonical_length_is_rejected() {
        // metadata length 2 written in two-byte compact mode
        let mut bytes = vec![1, 0, 0, 0, 2, 0, 0, 0, 0x00, 0x09, 0x00, 0xaa, 0xbb, 0x00, 0, 1, 0, 0, 0];
        assert_matches!(
            decode_exact::<Claim>(&bytes),
            Err(MigrationError::InvalidEncoding { .. })
        );

        bytes.remove(10);
        bytes[9] = 0x08;
        assert_eq!(decode_exact::<Claim>(&bytes).unwrap().metadata, vec![0xaa, 0xbb]);
    }

    #[test]
    fn bad_option_and_namespace_tags_are_rejected() {
        let mut bytes = sample().encode();
        let tag = 8 + 1 + 1 + sample().metadata.len();
        assert_eq!(bytes[tag], 0x01);
        bytes[tag] = 0x02;
        assert_matches!(
            decode_exact::<Claim>(&bytes),
            Err(MigrationError::InvalidEncoding { .. })
        );

        let mut bytes = attribute_sample().encode();
        let tag = bytes.len() - 5;
        assert_eq!(bytes[tag], 0x01);
        bytes[tag] = 0x04;
        assert_matches!(
            decode_exact::<AttributeClaim>(&bytes),
            Err(MigrationError::InvalidEncoding { .. })
        );
    }

    #[test]
    fn signed_claim_verifies_and_detects_tampering() {
        let signer = Ed25519Signer::from_seed(&[1; 32]);
        let signed = SignedClaim::sign(sample(), &signer).unwrap();
        let restored = SignedClaim::from_parts(signed.data.clone(), signed.signature).unwrap();
        assert_eq!(restored, signed);
        restored.verify(&signer.account()).unwrap();

        let other = Ed25519Signer::from_seed(&[2; 32]);
        assert_matches!(
            signed.verify(&other.account()),
            Err(MigrationError::Crypto { .. })
        );

        let mut tampered = signed.clone();
        tampered.claim.deadline = BlockNumber::new(1);
        assert_matches!(
            tampered.verify(&signer.account()),
            Err(MigrationError::InvalidEncoding { .. })
        );
    }

    #[test]
    fn signed_attribute_claim_verifies() {
        let signer = Ed25519Signer::from_seed(&[1; 32]);
        let signed = SignedAttributeClaim::sign(attribute_sample(), &signer).unwrap();
        signed.verify(&signer.account()).unwrap();

        let restored = SignedAttributeClaim::from_parts(signed.data.clone(), signed.signature).unwrap();
        assert_eq!(restored.claim.namespace, AttributeNamespace::CollectionOwner);

        // a mint claim decoder does not accept attribute claim bytes
        assert!(SignedClaim::from_parts(signed.data.clone(), signed.signature).is_err());
    }
}

#[cfg(test)]
mod proptest_claims {
    use super::*;
    use proptest::prelude::*;

    fn arb_attributes() -> impl Strategy<Value = Attributes> {
        proptest::collection::vec(
            (
                proptest::collection::vec(any::<u8>(), 0..80),
                proptest::collection::vec(any::<u8>(), 0..80),
            ),
            0..4,
        )
    }

    fn arb_claim() -> impl Strategy<Value = Claim> {
        (
            any::<u32>(),
            any::<u32>(),
            arb_attributes(),
            proptest::collection::vec(any::<u8>(), 0..300),
            proptest::option::of(any::<[u8; 32]>()),
            any::<u32>(),
            proptest::option::of(any::<u128>()),
        )
            .prop_map(
                |(collection, item, attributes, metadata, account, deadline, mint_price)| Claim {
                    collection: CollectionId::new(collection),
                    item: ItemId::new(item),
                    attributes,
                    metadata,
                    only_account: account.map(AccountId::from_bytes),
                    deadline: BlockNumber::new(deadline),
                    mint_price,
                },
            )
    }

    fn arb_namespace() -> impl Strategy<Value = AttributeNamespace> {
        prop_oneof![
            Just(AttributeNamespace::Pallet),
            Just(AttributeNamespace::CollectionOwner),
            Just(AttributeNamespace::ItemOwner),
            any::<[u8; 32]>().prop_map(|b| AttributeNamespace::Account(AccountId::from_bytes(b))),
        ]
    }

    fn arb_attribute_claim() -> impl Strategy<Value = AttributeClaim> {
        (any::<u32>(), any::<u32>(), arb_attributes(), arb_namespace(), any::<u32>()).prop_map(
            |(collection, item, attributes, namespace, deadline)| AttributeClaim {
                collection: CollectionId::new(collection),
                item: ItemId::new(item),
                attributes,
                namespace,
                deadline: BlockNumber::new(deadline),
            },
        )
    }

    proptest! {
        #[test]
        fn decode_recovers_encoded_claim(claim in arb_claim()) {
            prop_assert_eq!(decode_exact::<Claim>(&claim.encode()).unwrap(), claim);
        }

        #[test]
        fn any_strict_prefix_fails_to_decode(claim in arb_claim(), cut in any::<prop::sample::Index>()) {
            let bytes = claim.encode();
            let len = cut.index(bytes.len());
            prop_assert!(decode_exact::<Claim>(&bytes[..len]).is_err());
        }

        #[test]
        fn decode_recovers_encoded_attribute_claim(claim in arb_attribute_claim()) {
            prop_assert_eq!(decode_exact::<AttributeClaim>(&claim.encode()).unwrap(), claim);
        }
    }
}
