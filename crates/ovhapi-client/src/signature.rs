//! Request signing
//!
//! `X-Ovh-Signature` is `$1$` followed by the hex SHA-1 of
//! `secret+consumer+METHOD+url+body+timestamp`.

use sha1::{Digest, Sha1};

/// Fields covered by the signature
pub struct SignedRequest<'a> {
    pub application_secret: &'a str,
    pub consumer_key: &'a str,
    pub method: &'a str,
    pub url: &'a str,
    pub body: &'a str,
    pub timestamp: i64,
}

impl SignedRequest<'_> {
    /// Value of the `X-Ovh-Signature` header
    pub fn signature(&self) -> String {
        let timestamp = self.timestamp.to_string();
        let mut hasher = Sha1::new();
        for (i, part) in [
            self.application_secret,
            self.consumer_key,
            self.method,
            self.url,
            self.body,
            timestamp.as_str(),
        ]
        .iter()
        .enumerate()
        {
            if i > 0 {
                hasher.update(b"+");
            }
            hasher.update(part.as_bytes());
        }
        format!("$1${}", hex::encode(hasher.finalize()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request<'a>(method: &'a str, url: &'a str, body: &'a str) -> SignedRequest<'a> {
        SignedRequest {
            application_secret: "secret",
            consumer_key: "consumer",
            method,
            url,
            body,
            timestamp: 1_457_018_875,
        }
    }

    #[test]
    fn test_signature_matches_joined_digest() {
        let expected = {
            let mut hasher = Sha1::new();
            hasher.update(b"secret+consumer+GET+https://eu.api.ovh.com/1.0/me++1457018875");
            format!("$1${}", hex::encode(hasher.finalize()))
        };
        assert_eq!(
            request("GET", "https://eu.api.ovh.com/1.0/me", "").signature(),
            expected
        );
    }

    #[test]
    fn test_signature_shape() {
        let sig = request("POST", "https://eu.api.ovh.com/1.0/x", "{}").signature();
        assert!(sig.starts_with("$1$"));
        assert_eq!(sig.len(), 3 + 40);
        assert!(sig[3..].chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn test_every_field_is_covered() {
        let base = request("PUT", "https://eu.api.ovh.com/1.0/me", "{\"a\":1}");
        let mut other = request("PUT", "https://eu.api.ovh.com/1.0/me", "{\"a\":2}");
        assert_ne!(base.signature(), other.signature());
        other.body = base.body;
        other.timestamp += 1;
        assert_ne!(base.signature(), other.signature());
    }
}
