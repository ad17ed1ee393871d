//! SS58 network addresses
//!
//! An address is `base58(prefix ++ public key ++ checksum)`, where the
//! checksum is the first two bytes of `blake2b-512("SS58PRE" ++ prefix ++
//! public key)`. Prefixes below 64 take one byte; larger ones up to 16383
//! take two.

use crate::errors::{MigrationError, Result};
use crate::types::AccountId;
use blake2::{Blake2b512, Digest};

const CHECKSUM_PREAMBLE: &[u8] = b"SS58PRE";
const CHECKSUM_LEN: usize = 2;
const MAX_PREFIX: u16 = 0x3fff;

/// A named network and its address prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Network {
    /// Display name.
    pub name: &'static str,
    /// Address prefix.
    pub prefix: u16,
}

/// Networks reported by `premint signer`.
pub const NETWORKS: [Network; 3] = [
    Network {
        name: "Polkadot",
        prefix: 0,
    },
    Network {
        name: "Kusama",
        prefix: 2,
    },
    Network {
        name: "Westend",
        prefix: 42,
    },
];

fn prefix_bytes(prefix: u16) -> Result<Vec<u8>> {
    match prefix {
        0..=63 => Ok(vec![prefix as u8]),
        64..=MAX_PREFIX => {
            let first = (((prefix & 0b0000_0000_1111_1100) >> 2) as u8) | 0b0100_0000;
            let second = ((prefix >> 8) as u8) | (((prefix & 0b0000_0000_0000_0011) as u8) << 6);
            Ok(vec![first, second])
        }
        _ => Err(MigrationError::invalid(format!(
            "address prefix {prefix} exceeds {MAX_PREFIX}"
        ))),
    }
}

fn checksum(payload: &[u8]) -> [u8; CHECKSUM_LEN] {
    let mut hasher = Blake2b512::new();
    hasher.update(CHECKSUM_PREAMBLE);
    hasher.update(payload);
    let digest = hasher.finalize();
    [digest[0], digest[1]]
}

/// Render `account` as an address on the network with `prefix`.
pub fn encode(account: &AccountId, prefix: u16) -> Result<String> {
    let mut payload = prefix_bytes(prefix)?;
    payload.extend_from_slice(account.as_bytes());
    let check = checksum(&payload);
    payload.extend_from_slice(&check);
    Ok(bs58::encode(payload).into_string())
}

/// Parse an address, returning the account and its prefix.
pub fn decode(address: &str) -> Result<(AccountId, u16)> {
    let bytes = bs58::decode(address)
        .into_vec()
        .map_err(|e| MigrationError::invalid(format!("invalid address {address:?}: {e}")))?;

    let (prefix, prefix_len) = match bytes.first() {
        Some(&b) if b < 64 => (u16::from(b), 1),
        Some(&b) if b < 128 && bytes.len() > 1 => {
            let lower = (u16::from(b) << 2) | (u16::from(bytes[1]) >> 6);
            let upper = u16::from(bytes[1] & 0b0011_1111);
            ((lower & 0x00ff) | (upper << 8), 2)
        }
        _ => {
            return Err(MigrationError::invalid(format!(
                "invalid address {address:?}: unsupported prefix"
            )))
        }
    };

    if bytes.len() != prefix_len + 32 + CHECKSUM_LEN {
        return Err(MigrationError::invalid(format!(
            "invalid address {address:?}: expected a 32-byte account"
        )));
    }
    let (payload, check) = bytes.split_at(prefix_len + 32);
    if checksum(payload) != check {
        return Err(MigrationError::invalid(format!(
            "invalid address {address:?}: checksum mismatch"
        )));
    }

    let mut key = [0u8; 32];
    key.copy_from_slice(&payload[prefix_len..]);
    Ok((AccountId::from_bytes(key), prefix))
}
