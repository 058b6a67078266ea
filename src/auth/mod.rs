//! Caller authorization for mutating ledger operations
//!
//! A request is authorized when its detached signature `sigma` verifies over
//! `payload || binding` under the credential of the expected signer. Binding
//! the session value into the signed message keeps a captured signature from
//! being replayed in another session.

use ed25519_dalek::{Signature, VerifyingKey, PUBLIC_KEY_LENGTH};
use tracing::{debug, warn};

use crate::traits::*;
use crate::types::*;

/// Ed25519 signature verification.
///
/// Credentials are 32-byte verifying keys and signatures are 64 bytes.
#[derive(Debug, Clone, Copy, Default)]
pub struct Ed25519Verifier;

impl SignatureVerifier for Ed25519Verifier {
    fn verify(&self, credential: &[u8], signature: &[u8], message: &[u8]) -> LedgerResult<bool> {
        let key_bytes: &[u8; PUBLIC_KEY_LENGTH] = credential.try_into().map_err(|_| {
            LedgerError::VerificationFailure(format!(
                "credential must be {} bytes, got {}",
                PUBLIC_KEY_LENGTH,
                credential.len()
            ))
        })?;
        let key = VerifyingKey::from_bytes(key_bytes)
            .map_err(|e| LedgerError::VerificationFailure(format!("invalid credential: {}", e)))?;

        let Ok(signature) = Signature::from_slice(signature) else {
            debug!(len = signature.len(), "malformed signature");
            return Ok(false);
        };

        Ok(key.verify_strict(message, &signature).is_ok())
    }
}

/// Policy that requires the request to be signed by the given credential
#[derive(Debug, Clone, Default)]
pub struct SignatureAuthorizer<V: SignatureVerifier> {
    verifier: V,
}

impl<V: SignatureVerifier> SignatureAuthorizer<V> {
    /// Create a policy backed by `verifier`
    pub fn new(verifier: V) -> Self {
        Self { verifier }
    }
}

impl<V: SignatureVerifier> AuthorizationPolicy for SignatureAuthorizer<V> {
    fn is_authorized(
        &self,
        request: &RequestContext,
        credential: Option<&[u8]>,
    ) -> LedgerResult<bool> {
        let Some(credential) = credential else {
            warn!("no administrator credential recorded, denying request");
            return Ok(false);
        };

        debug!(
            signature_len = request.signature.len(),
            payload_len = request.payload.len(),
            binding_len = request.binding.len(),
            "checking caller signature"
        );

        let ok = self
            .verifier
            .verify(credential, &request.signature, &request.signed_message())?;
        if !ok {
            warn!("invalid caller signature");
        }
        Ok(ok)
    }
}
