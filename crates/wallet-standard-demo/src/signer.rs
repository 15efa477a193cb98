//! Demo signers
//!
//! Real signatures over keys generated in memory: Ed25519 for Solana
//! accounts, secp256k1 for Ethereum accounts. Nothing here is persisted.

use ed25519_dalek::Signer as _;
use k256::ecdsa;
use rand::{rngs::OsRng, RngCore};
use sha3::{Digest, Keccak256};
use zeroize::Zeroizing;

use crate::error::{DemoError, Result};

const BASE58_ALPHABET: &[u8; 58] = b"123456789ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz";

/// Ed25519 key for Solana accounts
pub struct SolanaSigner {
    key: ed25519_dalek::SigningKey,
}

impl SolanaSigner {
    /// Generate a fresh random key
    pub fn random() -> Self {
        let mut seed = Zeroizing::new([0u8; 32]);
        OsRng.fill_bytes(&mut seed[..]);
        Self {
            key: ed25519_dalek::SigningKey::from_bytes(&seed),
        }
    }

    /// Load a key from its 32-byte seed
    pub fn from_bytes(secret: &[u8]) -> Result<Self> {
        let seed: &[u8; 32] = secret.try_into().map_err(|_| {
            DemoError::Signing(format!("expected 32 secret bytes, got {}", secret.len()))
        })?;
        Ok(Self {
            key: ed25519_dalek::SigningKey::from_bytes(seed),
        })
    }

    /// Raw 32-byte public key
    pub fn public_key(&self) -> Vec<u8> {
        self.key.verifying_key().to_bytes().to_vec()
    }

    /// Base58 public key, as Solana displays it
    pub fn address(&self) -> String {
        base58_encode(&self.public_key())
    }

    /// 64-byte Ed25519 signature
    pub fn sign(&self, message: &[u8]) -> Vec<u8> {
        self.key.sign(message).to_bytes().to_vec()
    }
}

impl std::fmt::Debug for SolanaSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SolanaSigner")
            .field("address", &self.address())
            .finish_non_exhaustive()
    }
}

/// Verify a [`SolanaSigner::sign`] signature
pub fn verify_solana(public_key: &[u8], message: &[u8], signature: &[u8]) -> Result<()> {
    let key_bytes: &[u8; 32] = public_key.try_into().map_err(|_| {
        DemoError::Signing(format!("expected 32-byte key, got {}", public_key.len()))
    })?;
    let key = ed25519_dalek::VerifyingKey::from_bytes(key_bytes)
        .map_err(|e| DemoError::Signing(e.to_string()))?;
    let signature = ed25519_dalek::Signature::from_slice(signature)
        .map_err(|e| DemoError::Signing(e.to_string()))?;
    key.verify_strict(message, &signature)
        .map_err(|e| DemoError::Signing(e.to_string()))
}

/// secp256k1 key for Ethereum accounts
pub struct EthereumSigner {
    key: ecdsa::SigningKey,
}

impl EthereumSigner {
    /// Generate a fresh random key
    pub fn random() -> Self {
        let mut seed = Zeroizing::new([0u8; 32]);
        loop {
            OsRng.fill_bytes(&mut seed[..]);
            // Rejects zero and values above the curve order
            if let Ok(key) = ecdsa::SigningKey::from_slice(&seed[..]) {
                return Self { key };
            }
        }
    }

    /// Load a key from 32 secret bytes
    pub fn from_bytes(secret: &[u8]) -> Result<Self> {
        let key = ecdsa::SigningKey::from_slice(secret)?;
        Ok(Self { key })
    }

    /// Compressed SEC1 public key (33 bytes)
    pub fn public_key(&self) -> Vec<u8> {
        self.key.verifying_key().to_sec1_bytes().to_vec()
    }

    /// Last 20 bytes of Keccak-256 over the uncompressed key
    pub fn address(&self) -> String {
        let point = self.key.verifying_key().to_encoded_point(false);
        let hash = Keccak256::digest(&point.as_bytes()[1..]);
        format!("0x{}", hex::encode(&hash[12..]))
    }

    /// 65-byte `r || s || v` signature over the Ethereum personal-message
    /// digest
    pub fn sign_message(&self, message: &[u8]) -> Result<Vec<u8>> {
        let digest = ethereum_message_digest(message);
        let (signature, recovery_id) = self.key.sign_prehash_recoverable(&digest)?;
        let mut bytes = signature.to_bytes().to_vec();
        bytes.push(27 + recovery_id.to_byte());
        Ok(bytes)
    }
}

impl std::fmt::Debug for EthereumSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EthereumSigner")
            .field("address", &self.address())
            .finish_non_exhaustive()
    }
}

/// Keccak-256 of `"\x19Ethereum Signed Message:\n" || len || message`
pub fn ethereum_message_digest(message: &[u8]) -> [u8; 32] {
    let mut hasher = Keccak256::new();
    hasher.update(format!("\x19Ethereum Signed Message:\n{}", message.len()).as_bytes());
    hasher.update(message);
    hasher.finalize().into()
}

fn base58_encode(data: &[u8]) -> String {
    let zeros = data.iter().take_while(|&&b| b == 0).count();

    // Little-endian base-58 digits
    let mut digits: Vec<u8> = Vec::with_capacity(data.len() * 138 / 100 + 1);
    for &byte in &data[zeros..] {
        let mut carry = byte as u32;
        for digit in digits.iter_mut() {
            carry += (*digit as u32) << 8;
            *digit = (carry % 58) as u8;
            carry /= 58;
        }
        while carry > 0 {
            digits.push((carry % 58) as u8);
            carry /= 58;
        }
    }

    std::iter::repeat('1')
        .take(zeros)
        .chain(digits.iter().rev().map(|&d| BASE58_ALPHABET[d as usize] as char))
        .collect()
}
