use sha2::{Digest, Sha512};
use shared::CallbackNotification;
use subtle::ConstantTimeEq;

/// Checks the reverse hash the gateway attaches to its callback:
/// `sha512(salt|status|udf10..udf1|email|firstname|productinfo|amount|txnid|key)`.
pub struct SignatureVerifier {
    salt: String,
}

impl SignatureVerifier {
    pub fn new(salt: impl Into<String>) -> Self {
        Self { salt: salt.into() }
    }

    pub fn expected_hash(&self, notification: &CallbackNotification) -> String {
        hex::encode(self.digest(notification))
    }

    /// Compares digest bytes in constant time. Hashes that are not hex or have
    /// the wrong length are rejected.
    pub fn verify(&self, notification: &CallbackNotification) -> bool {
        let Some(provided) = notification.hash.as_deref().and_then(|hash| hex::decode(hash).ok()) else {
            return false;
        };
        let expected = self.digest(notification);
        provided.len() == expected.len() && bool::from(provided.as_slice().ct_eq(expected.as_slice()))
    }

    fn digest(&self, notification: &CallbackNotification) -> Vec<u8> {
        let mut fields: Vec<&str> = Vec::with_capacity(18);
        fields.push(&self.salt);
        fields.push(notification.status.as_deref().unwrap_or_default());
        fields.extend(notification.udfs_reversed());
        fields.push(&notification.email);
        fields.push(&notification.firstname);
        fields.push(&notification.productinfo);
        fields.push(&notification.amount);
        fields.push(notification.txnid.as_deref().unwrap_or_default());
        fields.push(&notification.key);

        Sha512::digest(fields.join("|").as_bytes()).to_vec()
    }
}
