//! ============================================================================
//! Wallet Derivation - Secret input to public wallet address
//! ============================================================================
//! Accepts either a BIP39 seed phrase (derived at Solana's standard
//! m/44'/501'/0'/0' path) or a base58-encoded private key of 64 bytes (full
//! keypair) or 32 bytes (seed). Keys never leave the process.
//! ============================================================================

use bip39::{Language, Mnemonic, Seed};
use solana_sdk::derivation_path::DerivationPath;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::Keypair;
use solana_sdk::signer::keypair::{keypair_from_seed, keypair_from_seed_and_derivation_path};
use solana_sdk::signer::Signer;
use thiserror::Error;

/// Errors from parsing a user-supplied wallet secret.
#[derive(Debug, Error)]
pub enum SecretError {
    /// Base58 decoded, but to a length no key format uses
    #[error("invalid private key length ({0} bytes, must be 32 or 64 bytes)")]
    InvalidKeyLength(usize),

    /// Input is neither a valid mnemonic nor base58 text
    #[error("invalid seed phrase or private key")]
    Unrecognized,

    /// Bytes had the right shape but ed25519 derivation rejected them
    #[error("key derivation failed: {0}")]
    Derivation(String),
}

/// Derive the public wallet address for a secret input.
pub fn derive_pubkey(secret: &str) -> Result<Pubkey, SecretError> {
    Ok(derive_keypair(secret)?.pubkey())
}

/// Derive the full keypair for a secret input.
///
/// Mnemonics are tried first: a phrase that validates against the English
/// BIP39 wordlist is expanded with an empty passphrase and derived at
/// m/44'/501'/0'/0'. Anything else is treated as a base58 private key.
pub fn derive_keypair(secret: &str) -> Result<Keypair, SecretError> {
    let secret = secret.trim();

    if let Ok(mnemonic) = Mnemonic::from_phrase(secret, Language::English) {
        let seed = Seed::new(&mnemonic, "");
        return keypair_from_seed_and_derivation_path(
            seed.as_bytes(),
            Some(DerivationPath::new_bip44(Some(0), Some(0))),
        )
        .map_err(|e| SecretError::Derivation(e.to_string()));
    }

    let bytes = bs58::decode(secret)
        .into_vec()
        .map_err(|_| SecretError::Unrecognized)?;

    match bytes.len() {
        64 => Keypair::try_from(bytes.as_slice())
            .map_err(|e| SecretError::Derivation(e.to_string())),
        32 => keypair_from_seed(&bytes).map_err(|e| SecretError::Derivation(e.to_string())),
        n => Err(SecretError::InvalidKeyLength(n)),
    }
}
