use std::str::FromStr;

use lazy_static::lazy_static;
use regex::Regex;
use solana_sdk::signature::Signature;

lazy_static! {
    static ref SIGNATURE_REGEX: Regex =
        Regex::new(r"[1-9A-HJ-NP-Za-km-z]{87,88}").expect("signature regex is valid");
}

/// Finds the first base58 transaction signature in `text`. Wallet and RPC
/// failures often only carry the signature inside their message.
pub fn extract_transaction_signature(text: &str) -> Option<Signature> {
    SIGNATURE_REGEX
        .find_iter(text)
        .find_map(|m| Signature::from_str(m.as_str()).ok())
}

pub fn build_explorer_url(signature: &Signature, cluster: &str) -> String {
    format!(
        "https://explorer.solana.com/tx/{}?cluster={}",
        signature, cluster
    )
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_extract_transaction_signature() {
        let signature = Signature::from([7u8; 64]);
        let message = format!(
            "Transaction simulation failed: Error processing Instruction 0: custom program error: 0x1 signature: {}.",
            signature
        );
        assert_eq!(extract_transaction_signature(&message), Some(signature));
        assert_eq!(extract_transaction_signature("no signature here"), None);
    }

    #[test]
    fn test_build_explorer_url() {
        let signature = Signature::from([1u8; 64]);
        assert_eq!(
            build_explorer_url(&signature, "devnet"),
            format!(
                "https://explorer.solana.com/tx/{}?cluster=devnet",
                signature
            )
        );
    }
}
