//! Gateway checkout signatures: hex(HMAC-SHA256(order_id + "|" + payment_id, key_secret)).

use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, Secret};
use sha2::Sha256;
use subtle::ConstantTimeEq;

use super::errors::PaymentError;

type HmacSha256 = Hmac<Sha256>;

#[derive(Clone)]
pub struct PaymentSignatureVerifier {
  secret: Secret<String>,
}

impl PaymentSignatureVerifier {
  pub fn new(secret: Secret<String>) -> Self {
    Self { secret }
  }

  pub fn sign(&self, order_id: &str, payment_id: &str) -> Result<String, PaymentError> {
    let mut mac = HmacSha256::new_from_slice(self.secret.expose_secret().as_bytes())
      .map_err(|e| PaymentError::Gateway(format!("Invalid signing key: {}", e)))?;
    mac.update(order_id.as_bytes());
    mac.update(b"|");
    mac.update(payment_id.as_bytes());
    Ok(hex::encode(mac.finalize().into_bytes()))
  }

  /// Constant-time, byte-exact comparison against the caller-supplied signature.
  /// The gateway emits lowercase hex, so any other spelling is rejected.
  pub fn verify(&self, order_id: &str, payment_id: &str, signature: &str) -> bool {
    let Ok(expected) = self.sign(order_id, payment_id) else {
      return false;
    };

    if expected.len() != signature.len() {
      return false;
    }
    expected.as_bytes().ct_eq(signature.as_bytes()).into()
  }
}

impl std::fmt::Debug for PaymentSignatureVerifier {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("PaymentSignatureVerifier")
      .field("secret", &"[REDACTED]")
      .finish()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn verifier() -> PaymentSignatureVerifier {
    PaymentSignatureVerifier::new(Secret::new("test_secret".to_string()))
  }

  #[test]
  fn test_known_signature() {
    let signature = verifier().sign("order_123", "pay_456").unwrap();
    assert_eq!(
      signature,
      "6c343620f1910da483982cf25b9dc33d709afdd25930f08964ef60b65aefa831"
    );
    assert!(verifier().verify("order_123", "pay_456", &signature));
  }

  #[test]
  fn test_every_single_bit_flip_is_rejected() {
    let verifier = verifier();
    let signature = verifier.sign("order_123", "pay_456").unwrap();
    let bytes = hex::decode(&signature).unwrap();

    for index in 0..bytes.len() {
      for bit in 0..8 {
        let mut tampered = bytes.clone();
        tampered[index] ^= 1 << bit;
        assert!(!verifier.verify("order_123", "pay_456", &hex::encode(tampered)));
      }
    }
  }

  #[test]
  fn test_wrong_inputs_are_rejected() {
    let verifier = verifier();
    let signature = verifier.sign("order_123", "pay_456").unwrap();

    assert!(!verifier.verify("order_123", "pay_457", &signature));
    assert!(!verifier.verify("order_124", "pay_456", &signature));
    assert!(!verifier.verify("order_123", "pay_456", &signature[1..]));
    assert!(!verifier.verify("order_123", "pay_456", ""));

    let other = PaymentSignatureVerifier::new(Secret::new("other_secret".to_string()));
    assert!(!other.verify("order_123", "pay_456", &signature));
  }

  #[test]
  fn test_signature_must_match_byte_for_byte() {
    let verifier = verifier();
    let signature = verifier.sign("order_123", "pay_456").unwrap();

    assert!(!verifier.verify("order_123", "pay_456", &signature.to_uppercase()));
    assert!(!verifier.verify("order_123", "pay_456", &format!(" {}", signature)));
    assert!(!verifier.verify("order_123", "pay_456", &format!("{}\n", signature)));

    // flip the case of a single hex letter
    let index = signature.find(|c: char| c.is_ascii_alphabetic()).unwrap();
    let mut flipped = signature.clone().into_bytes();
    flipped[index] = flipped[index].to_ascii_uppercase();
    let flipped = String::from_utf8(flipped).unwrap();
    assert!(!verifier.verify("order_123", "pay_456", &flipped));
  }

  #[test]
  fn test_debug_redacts_secret() {
    assert!(!format!("{:?}", verifier()).contains("test_secret"));
  }
}
