//! Per-user search key
//!
//! One 32-byte master key drives every keyed operation on the index:
//!
//! ```text
//! token      --HMAC-SHA256(master, "index-key" || token)--> IndexKey
//! entity id  --HMAC-SHA256(master, "entity-id" || id)-----> EncId
//! posting    --AES-256-GCM(k_post, nonce, aad = EncId)----> payload
//!            where k_post = HMAC-SHA256(master, "posting-key")
//! ```
//!
//! Index keys and encrypted ids are deterministic so equal inputs collide on
//! purpose; posting payloads use a fresh random nonce per seal.

use std::fmt;

use aes_gcm::aead::{Aead, KeyInit, Payload};
use aes_gcm::{Aes256Gcm, Nonce};
use cipherdex_core::{
    AppId, AttributeId, CryptoError, EncId, EncryptedPosting, IndexCrypto, IndexKey, Posting,
    TypeId,
};
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use zeroize::Zeroize;

type HmacSha256 = Hmac<Sha256>;

/// Length of the nonce prefixed to every posting payload
pub const NONCE_LEN: usize = 12;

/// Length of the master key
pub const KEY_LEN: usize = 32;

const INDEX_KEY_DOMAIN: &[u8] = b"cipherdex/index-key\0";
const ENTITY_ID_DOMAIN: &[u8] = b"cipherdex/entity-id\0";
const POSTING_KEY_DOMAIN: &[u8] = b"cipherdex/posting-key\0";

/// Plaintext of a posting payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct PostingBody {
    id: String,
    app: AppId,
    type_id: TypeId,
    attribute: AttributeId,
}

/// Keyed index crypto for one user
///
/// Raw key bytes are zeroized as soon as the derived state is built.
///
/// # Examples
///
/// ```
/// use cipherdex_core::{AttributeId, EntityKind, IndexCrypto};
/// use cipherdex_security::SearchKey;
///
/// let key = SearchKey::from_bytes([7u8; 32]).unwrap();
/// assert_eq!(key.index_key("invoice"), key.index_key("invoice"));
///
/// let sealed = key
///     .seal_posting("mail-1", EntityKind::Mail.app(), EntityKind::Mail.type_id(), AttributeId(1))
///     .unwrap();
/// let posting = key.decrypt_posting(&sealed).unwrap();
/// assert_eq!(posting.id, "mail-1");
/// ```
#[derive(Clone)]
pub struct SearchKey {
    mac: HmacSha256,
    cipher: Aes256Gcm,
}

impl SearchKey {
    /// Derive a search key from master key bytes
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::Malformed`] if the key material is rejected.
    pub fn from_bytes(mut master: [u8; KEY_LEN]) -> Result<Self, CryptoError> {
        let built = Self::derive(&master);
        master.zeroize();
        built
    }

    /// Generate a fresh random search key
    pub fn generate() -> Result<Self, CryptoError> {
        Self::from_bytes(rand::random::<[u8; KEY_LEN]>())
    }

    fn derive(master: &[u8; KEY_LEN]) -> Result<Self, CryptoError> {
        let mac = <HmacSha256 as Mac>::new_from_slice(master)
            .map_err(|e| CryptoError::Malformed(format!("master key rejected: {}", e)))?;

        let mut posting_key: [u8; 32] = Self::tag(&mac, POSTING_KEY_DOMAIN, b"");
        let cipher = Aes256Gcm::new_from_slice(&posting_key)
            .map_err(|e| CryptoError::Malformed(format!("posting key rejected: {}", e)));
        posting_key.zeroize();

        Ok(SearchKey {
            mac,
            cipher: cipher?,
        })
    }

    fn tag(mac: &HmacSha256, domain: &[u8], data: &[u8]) -> [u8; 32] {
        let mut mac = mac.clone();
        mac.update(domain);
        mac.update(data);
        let mut out = [0u8; 32];
        out.copy_from_slice(&mac.finalize().into_bytes());
        out
    }

    /// Deterministic encrypted id for a logical entity id
    pub fn encrypt_id(&self, id: &str) -> EncId {
        EncId(Self::tag(&self.mac, ENTITY_ID_DOMAIN, id.as_bytes()).to_vec())
    }

    /// Seal a posting for storage under a random nonce
    pub fn seal_posting(
        &self,
        id: &str,
        app: AppId,
        type_id: TypeId,
        attribute: AttributeId,
    ) -> Result<EncryptedPosting, CryptoError> {
        self.seal_posting_with_nonce(id, app, type_id, attribute, rand::random())
    }

    /// Seal a posting under a caller-chosen nonce
    ///
    /// Reusing a nonce under the same key breaks confidentiality; only use
    /// this for reproducible fixtures.
    pub fn seal_posting_with_nonce(
        &self,
        id: &str,
        app: AppId,
        type_id: TypeId,
        attribute: AttributeId,
        nonce: [u8; NONCE_LEN],
    ) -> Result<EncryptedPosting, CryptoError> {
        let enc_id = self.encrypt_id(id);
        let body = PostingBody {
            id: id.to_string(),
            app,
            type_id,
            attribute,
        };
        let plaintext = rmp_serde::to_vec(&body)
            .map_err(|e| CryptoError::Encrypt(format!("cannot encode posting: {}", e)))?;

        let ciphertext = self
            .cipher
            .encrypt(
                Nonce::from_slice(&nonce),
                Payload {
                    msg: &plaintext,
                    aad: enc_id.as_bytes(),
                },
            )
            .map_err(|e| CryptoError::Encrypt(e.to_string()))?;

        let mut payload = Vec::with_capacity(NONCE_LEN + ciphertext.len());
        payload.extend_from_slice(&nonce);
        payload.extend_from_slice(&ciphertext);
        Ok(EncryptedPosting { enc_id, payload })
    }
}

impl IndexCrypto for SearchKey {
    fn index_key(&self, token: &str) -> IndexKey {
        IndexKey(Self::tag(&self.mac, INDEX_KEY_DOMAIN, token.as_bytes()).to_vec())
    }

    fn decrypt_posting(&self, posting: &EncryptedPosting) -> Result<Posting, CryptoError> {
        if posting.payload.len() <= NONCE_LEN {
            return Err(CryptoError::Malformed(format!(
                "payload of {} bytes is shorter than nonce plus tag",
                posting.payload.len()
            )));
        }
        let (nonce, ciphertext) = posting.payload.split_at(NONCE_LEN);
        let plaintext = self
            .cipher
            .decrypt(
                Nonce::from_slice(nonce),
                Payload {
                    msg: ciphertext,
                    aad: posting.enc_id.as_bytes(),
                },
            )
            .map_err(|e| CryptoError::Decrypt(e.to_string()))?;

        let body: PostingBody = rmp_serde::from_slice(&plaintext)
            .map_err(|e| CryptoError::Malformed(format!("posting body: {}", e)))?;

        Ok(Posting {
            id: body.id,
            enc_id: posting.enc_id.clone(),
            app: body.app,
            type_id: body.type_id,
            attribute: body.attribute,
        })
    }
}

impl fmt::Debug for SearchKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SearchKey(..)")
    }
}
