//! # Signature Verifier
//!
//! Checks the Ed25519 signature Discord attaches to every webhook call. The signed
//! message is `timestamp || body` over the raw, unparsed request bytes.

use ed25519_dalek::{Signature, Verifier, VerifyingKey};

pub const SIGNATURE_HEADER: &str = "x-signature-ed25519";
pub const TIMESTAMP_HEADER: &str = "x-signature-timestamp";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verification {
    Valid,
    Invalid(&'static str),
}

#[cfg(test)]
impl Verification {
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }
}

#[derive(Debug, Clone)]
pub struct SignatureVerifier {
    key: VerifyingKey,
}

impl SignatureVerifier {
    pub fn new(public_key: &[u8; 32]) -> anyhow::Result<Self> {
        let key = VerifyingKey::from_bytes(public_key)
            .map_err(|e| anyhow::anyhow!("Invalid Discord public key: {e}"))?;
        Ok(Self { key })
    }

    pub fn verify(
        &self,
        signature_hex: Option<&str>,
        timestamp: Option<&str>,
        body: &[u8],
    ) -> Verification {
        let (Some(signature_hex), Some(timestamp)) = (signature_hex, timestamp) else {
            return Verification::Invalid("missing signature headers");
        };
        if signature_hex.is_empty() || timestamp.is_empty() {
            return Verification::Invalid("missing signature headers");
        }

        let Ok(raw) = hex::decode(signature_hex) else {
            return Verification::Invalid("signature is not hex");
        };
        let Ok(signature) = Signature::from_slice(&raw) else {
            return Verification::Invalid("signature has wrong length");
        };

        let mut message = Vec::with_capacity(timestamp.len() + body.len());
        message.extend_from_slice(timestamp.as_bytes());
        message.extend_from_slice(body);

        match self.key.verify(&message, &signature) {
            Ok(()) => Verification::Valid,
            Err(_) => Verification::Invalid("signature mismatch"),
        }
    }
}
