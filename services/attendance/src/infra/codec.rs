use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chacha20poly1305::aead::{Aead, AeadCore, KeyInit, OsRng};
use chacha20poly1305::{ChaCha20Poly1305, Key, Nonce};
use sha2::{Digest, Sha256};

use crate::domain::codec::{DecodeError, EncodeError, PayloadCodec, QrPayload};

const NONCE_SIZE: usize = 12;
const TAG_SIZE: usize = 16;

/// ChaCha20-Poly1305 payload codec.
///
/// Key is SHA-256 of the configured QR secret. Wire format is
/// base64url-no-pad of `nonce || ciphertext || tag`, with a fresh nonce per
/// encode.
#[derive(Clone)]
pub struct ChaChaPayloadCodec {
    cipher: ChaCha20Poly1305,
}

impl ChaChaPayloadCodec {
    pub fn new(secret: &str) -> Self {
        let digest = Sha256::digest(secret.as_bytes());
        let key = Key::from_slice(digest.as_slice());
        Self {
            cipher: ChaCha20Poly1305::new(key),
        }
    }
}

impl PayloadCodec for ChaChaPayloadCodec {
    fn encode(&self, payload: &QrPayload) -> Result<String, EncodeError> {
        let nonce = ChaCha20Poly1305::generate_nonce(&mut OsRng);
        let ciphertext = self
            .cipher
            .encrypt(&nonce, payload.to_plaintext().as_bytes())
            .map_err(|_| EncodeError)?;

        let mut wire = Vec::with_capacity(NONCE_SIZE + ciphertext.len());
        wire.extend_from_slice(nonce.as_slice());
        wire.extend_from_slice(&ciphertext);
        Ok(URL_SAFE_NO_PAD.encode(wire))
    }

    fn decode(&self, raw: &str) -> Result<QrPayload, DecodeError> {
        let wire = URL_SAFE_NO_PAD
            .decode(raw.trim())
            .map_err(|_| DecodeError::Encoding)?;
        if wire.len() < NONCE_SIZE + TAG_SIZE {
            return Err(DecodeError::Truncated);
        }
        let (nonce, ciphertext) = wire.split_at(NONCE_SIZE);
        let plaintext = self
            .cipher
            .decrypt(Nonce::from_slice(nonce), ciphertext)
            .map_err(|_| DecodeError::Authentication)?;
        let plaintext = String::from_utf8(plaintext).map_err(|_| DecodeError::Utf8)?;
        QrPayload::from_plaintext(&plaintext)
    }
}
