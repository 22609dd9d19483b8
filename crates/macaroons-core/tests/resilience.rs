use macaroons_core::{Macaroon, MacaroonError, Verifier, SIGNATURE_SIZE};
use macaroons_wire::{base64url_decode, base64url_encode};

fn make_token() -> (Macaroon, Vec<u8>) {
    let macaroon = Macaroon::create("https://target-service.co", "12345", b"123")
        .with_first_party_caveat("user = alice", None)
        .with_third_party_caveat(b"987", "user_auth", Some("https://auth.target-service.co"))
        .unwrap();
    let bytes = base64url_decode(&macaroon.serialize().unwrap()).unwrap();
    (macaroon, bytes)
}

fn make_verifier(root: &Macaroon) -> Verifier {
    let discharge = Macaroon::create("https://auth.target-service.co", "user_auth", b"987");
    Verifier::new()
        .satisfy_exact("user = alice")
        .with_discharge_macaroon(root.bind(&discharge))
}

#[test]
fn test_flipped_signature_bytes_are_rejected() {
    let (macaroon, bytes) = make_token();
    let verifier = make_verifier(&macaroon);
    assert!(macaroon.verify(b"123", &verifier).unwrap());

    // Signature bytes sit just before the trailing newline.
    let end = bytes.len() - 1;
    for index in end - SIGNATURE_SIZE..end {
        let mut tampered = bytes.clone();
        tampered[index] ^= 0x01;

        let forged = Macaroon::deserialize(&base64url_encode(&tampered)).unwrap();
        assert!(
            matches!(
                forged.verify(b"123", &verifier),
                Err(MacaroonError::InvalidSignature(_))
            ),
            "flipping byte {} was not detected",
            index
        );
    }
}

#[test]
fn test_flipped_body_bytes_never_verify() {
    let (macaroon, bytes) = make_token();
    let verifier = make_verifier(&macaroon);
    let original = macaroon.serialize().unwrap();

    // The leading location packet is advisory and not signed.
    let header = std::str::from_utf8(&bytes[..4]).unwrap();
    let location_packet = usize::from_str_radix(header, 16).unwrap();

    for index in location_packet..bytes.len() {
        let mut tampered = bytes.clone();
        tampered[index] ^= 0x20;

        // Either the stream no longer parses or verification fails.
        if let Ok(forged) = Macaroon::deserialize(&base64url_encode(&tampered)) {
            // Upper-case hex in a size header decodes to the same token.
            if forged.serialize().unwrap() == original {
                continue;
            }
            assert!(
                forged.verify(b"123", &verifier).is_err(),
                "flipping byte {} verified",
                index
            );
        }
    }
}

#[test]
fn test_truncated_tokens_are_malformed() {
    let (_, bytes) = make_token();

    for len in 0..bytes.len() {
        let result = Macaroon::deserialize(&base64url_encode(&bytes[..len]));
        assert!(
            matches!(result, Err(MacaroonError::Malformed(_))),
            "truncation to {} bytes was accepted",
            len
        );
    }
}

#[test]
fn test_garbage_input_is_malformed() {
    for input in ["", "!!!!", "MDAwMA", "AAAA", "MDAwNmEgCg"] {
        assert!(
            matches!(Macaroon::deserialize(input), Err(MacaroonError::Malformed(_))),
            "{:?} was accepted",
            input
        );
    }
}
