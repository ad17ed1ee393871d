//! Signature manifests
//!
//! A manifest bundles every signed claim of a batch with the provenance
//! needed to audit it. Its serialized bytes are content addressed, so
//! [`Manifest::to_bytes`] must be byte-stable: struct fields serialize in
//! declaration order, claims keep generation order, and nothing is drawn
//! from a hash map.

use crate::claim::SignedClaim;
use premint_core::{
    AccountId, CollectionId, ContentAddress, MigrationError, Result, SignatureBytes,
};
use serde::{Deserialize, Serialize};

/// Kind tag written at the top of every manifest.
pub const MANIFEST_KIND: &str = "uniques-to-nfts-migration";

/// Who produced a manifest, when, and for which collections.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Provenance {
    /// Runtime version the claims were generated against.
    pub runtime_version: u32,
    /// Generation time, milliseconds since the Unix epoch.
    pub generated_at: u64,
    /// Source collection on the legacy registry.
    pub source_collection: CollectionId,
    /// Target collection on the current registry.
    pub target_collection: CollectionId,
    /// Account that signed every claim.
    pub signer: AccountId,
}

/// A non-empty batch of signed claims with provenance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Manifest {
    provenance: Provenance,
    claims: Vec<SignedClaim>,
}

/// Assembles manifests.
#[derive(Debug, Default, Clone, Copy)]
pub struct ManifestBuilder;

impl ManifestBuilder {
    /// Bundle `claims` under `provenance`.
    pub fn build(claims: Vec<SignedClaim>, provenance: Provenance) -> Result<Manifest> {
        if claims.is_empty() {
            return Err(MigrationError::EmptyManifest);
        }
        Ok(Manifest { provenance, claims })
    }
}

impl Manifest {
    /// Provenance block.
    pub fn provenance(&self) -> &Provenance {
        &self.provenance
    }

    /// Signed claims in generation order.
    pub fn claims(&self) -> &[SignedClaim] {
        &self.claims
    }

    /// Serializable form.
    pub fn to_document(&self) -> ManifestDocument {
        ManifestDocument {
            kind: MANIFEST_KIND.to_string(),
            runtime_version: self.provenance.runtime_version,
            date: self.provenance.generated_at,
            source_collection: self.provenance.source_collection,
            target_collection: self.provenance.target_collection,
            signer: self.provenance.signer,
            signatures: self
                .claims
                .iter()
                .map(|signed| SignatureEntry {
                    data: signed.data.clone(),
                    signature: signed.signature,
                })
                .collect(),
        }
    }

    /// Canonical bytes: tab-indented JSON.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        self.to_document().to_bytes()
    }
}

/// One `{data, signature}` pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignatureEntry {
    /// Canonical claim encoding.
    #[serde(with = "premint_core::hexstr::bytes")]
    pub data: Vec<u8>,
    /// Signature over `data`.
    pub signature: SignatureBytes,
}

/// On-disk manifest layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManifestDocument {
    /// Manifest kind tag.
    #[serde(rename = "type")]
    pub kind: String,
    /// Runtime version at generation.
    pub runtime_version: u32,
    /// Generation time in epoch milliseconds.
    pub date: u64,
    /// Source collection, as a decimal string.
    #[serde(with = "decimal_string")]
    pub source_collection: CollectionId,
    /// Target collection, as a decimal string.
    #[serde(with = "decimal_string")]
    pub target_collection: CollectionId,
    /// Signing account.
    pub signer: AccountId,
    /// Signed claims.
    pub signatures: Vec<SignatureEntry>,
}

impl ManifestDocument {
    /// Parse manifest bytes.
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        let document: Self = serde_json::from_slice(bytes)
            .map_err(|e| MigrationError::serialization(format!("invalid manifest: {e}")))?;
        if document.kind != MANIFEST_KIND {
            return Err(MigrationError::serialization(format!(
                "unexpected manifest type {:?}",
                document.kind
            )));
        }
        Ok(document)
    }

    /// Serialize with tab indentation.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"\t");
        let mut serializer = serde_json::Serializer::with_formatter(&mut out, formatter);
        self.serialize(&mut serializer)?;
        Ok(out)
    }

    /// Provenance block.
    pub fn provenance(&self) -> Provenance {
        Provenance {
            runtime_version: self.runtime_version,
            generated_at: self.date,
            source_collection: self.source_collection,
            target_collection: self.target_collection,
            signer: self.signer,
        }
    }

    /// Decode every entry back into a signed claim.
    pub fn decode_claims(&self) -> Result<Vec<SignedClaim>> {
        self.signatures
            .iter()
            .map(|entry| SignedClaim::from_parts(entry.data.clone(), entry.signature))
            .collect()
    }

    /// Rebuild the in-memory manifest.
    pub fn into_manifest(self) -> Result<Manifest> {
        let provenance = self.provenance();
        ManifestBuilder::build(self.decode_claims()?, provenance)
    }
}

/// Content address of serialized manifest bytes.
pub fn content_address(bytes: &[u8]) -> ContentAddress {
    ContentAddress::of(bytes)
}

/// Gateway URLs for `address`, one per configured prefix.
pub fn gateway_urls<S: AsRef<str>>(address: &ContentAddress, gateways: &[S]) -> Vec<String> {
    gateways
        .iter()
        .map(|prefix| {
            let prefix = prefix.as_ref();
            if prefix.ends_with('/') {
                format!("{prefix}{address}")
            } else {
                format!("{prefix}/{address}")
            }
        })
        .collect()
}

mod decimal_string {
    use premint_core::CollectionId;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(id: &CollectionId, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&id.to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<CollectionId, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::{ClaimGenerator, MigratingItem};
    use assert_matches::assert_matches;
    use premint_core::{BlockNumber, ClaimSigner, Ed25519Signer, ItemId};

    fn manifest() -> Manifest {
        let signer = Ed25519Signer::from_seed(&[4; 32]);
        let generator = ClaimGenerator::new(
            &signer,
            CollectionId::new(12),
            CollectionId::new(34),
            BlockNumber::new(1_000),
        );
        let items = vec![
            MigratingItem {
                id: ItemId::new(1),
                owner: AccountId::from_bytes([1; 32]),
                metadata: Some(b"one".to_vec()),
            },
            MigratingItem {
                id: ItemId::new(2),
                owner: AccountId::from_bytes([2; 32]),
                metadata: None,
            },
        ];
        let provenance = Provenance {
            runtime_version: 9430,
            generated_at: 1_700_000_000_000,
            source_collection: CollectionId::new(12),
            target_collection: CollectionId::new(34),
            signer: signer.account(),
        };
        ManifestBuilder::build(generator.generate(&items).unwrap(), provenance).unwrap()
    }

    #[test]
    fn empty_manifest_is_rejected() {
        let provenance = manifest().provenance().clone();
        assert_matches!(
            ManifestBuilder::build(vec![], provenance),
            Err(MigrationError::EmptyManifest)
        );
    }

    #[test]
    fn serialization_has_fixed_field_order_and_tabs() {
        let bytes = manifest().to_bytes().unwrap();
        let text = String::from_utf8(bytes).unwrap();
        let positions: Vec<usize> = [
            "\"type\"",
            "\"runtimeVersion\"",
            "\"date\"",
            "\"sourceCollection\"",
            "\"targetCollection\"",
            "\"signer\"",
            "\"signatures\"",
        ]
        .iter()
        .map(|key| text.find(key).unwrap())
        .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
        assert!(text.contains("\n\t\"type\": \"uniques-to-nfts-migration\""));
        assert!(text.contains("\"sourceCollection\": \"12\""));
        assert!(text.contains("\"date\": 1700000000000"));
    }

    #[test]
    fn serialization_is_stable() {
        let a = manifest().to_bytes().unwrap();
        let b = manifest().to_bytes().unwrap();
        assert_eq!(a, b);
        assert_eq!(content_address(&a), content_address(&b));
    }

    #[test]
    fn parse_restores_manifest() {
        let original = manifest();
        let parsed = ManifestDocument::parse(&original.to_bytes().unwrap()).unwrap();
        assert_eq!(parsed.into_manifest().unwrap(), original);
    }

    #[test]
    fn foreign_documents_are_rejected() {
        let mut document = manifest().to_document();
        document.kind = "something-else".to_string();
        let bytes = document.to_bytes().unwrap();
        assert_matches!(
            ManifestDocument::parse(&bytes),
            Err(MigrationError::Serialization { .. })
        );
    }

    #[test]
    fn gateway_urls_join_prefixes() {
        let address = ContentAddress::of(b"x");
        let urls = gateway_urls(&address, &["https://ipfs.filebase.io/ipfs/", "https://dweb.link/ipfs"]);
        assert_eq!(urls[0], format!("https://ipfs.filebase.io/ipfs/{address}"));
        assert_eq!(urls[1], format!("https://dweb.link/ipfs/{address}"));
    }
}
