use macaroons_core::{Macaroon, MacaroonError, Signature, Verifier};
use macaroons_wire::WireError;

const NO_CAVEATS: &str = "MDAyN2xvY2F0aW9uIGh0dHBzOi8vdGFyZ2V0LXNlcnZpY2UuY28KMDAxNWlkZW50aWZpZXIgMTIzNDUKMDAyZnNpZ25hdHVyZSCa_Iibary2DNKgvTEycX378-oLUOyTFmP2UeJxaD_RzQo";

const UNKNOWN_KEY: &str = "MDAyNWxvdGlvbiBodHRwczovL3RhcmdldC1zZXJ2aWNlLmNvCjAwMTVpZGVudGlmaWVyIDEyMzQ1CjAwMmZzaWduYXR1cmUgmvyIm2q8tgzSoL0xMnF9-_PqC1DskxZj9lHicWg_0c0K";

const FOREIGN_NO_CAVEATS: &str = "MDAyN2xvY2F0aW9uIGh0dHBzOi8vdGFyZ2V0LXNlcnZpY2UuY28KMDAxNWlkZW50aWZpZXIgMTIzNDUKMDAyZnNpZ25hdHVyZSBY9k79AD4QC8CL7gaxktTlFKf6RhYV3aK6nGWbDGmleQo";

const FOREIGN_THIRD_PARTY: &str = "MDAyN2xvY2F0aW9uIGh0dHBzOi8vdGFyZ2V0LXNlcnZpY2UuY28KMDAxNWlkZW50aWZpZXIgMTIzNDUKMDAxNmNpZCB1c2VyID0gMTIzNDU2CjAwMTJjaWQgdXNlcl9hdXRoCjAwNTF2aWQgR9WEm5fSA_BFBD_GlQJCM5ERPKfiJM4XlbDxX2FmpQYq1T_rYenWAtXxbq_tfly9zCEtsr9v--c1M0-AZBlVRObbo82HtdDKCjAwMjFjbCBodHRwczovL3RhcmdldC1zZXJ2aWNlLmNvCjAwMmZzaWduYXR1cmUgFWZP3jmuaisMUZPit9KWOP1y1SrXu5YPFsIk_CmcX-sK";

// Tokens issued by a Rust implementation with the secret "this is the key".
const RUST_NO_CAVEATS: &str = "MDAyMWxvY2F0aW9uIGh0dHA6Ly9leGFtcGxlLm9yZy8KMDAxNWlkZW50aWZpZXIga2V5aWQKMDAyZnNpZ25hdHVyZSB83ueSURxbxvUoSFgF3-myTnheKOKpkwH51xHGCeOO9wo";
const RUST_ONE_CAVEAT: &str = "MDAyMWxvY2F0aW9uIGh0dHA6Ly9leGFtcGxlLm9yZy8KMDAxNWlkZW50aWZpZXIga2V5aWQKMDAxZGNpZCBhY2NvdW50ID0gMzczNTkyODU1OQowMDJmc2lnbmF0dXJlIPVIB_bcbt-Ivw9zBrOCJWKjYlM9v3M5umF2XaS9JZ2HCg";
const RUST_TWO_CAVEATS: &str = "MDAyMWxvY2F0aW9uIGh0dHA6Ly9leGFtcGxlLm9yZy8KMDAxNWlkZW50aWZpZXIga2V5aWQKMDAxZGNpZCBhY2NvdW50ID0gMzczNTkyODU1OQowMDE1Y2lkIHVzZXIgPSBhbGljZQowMDJmc2lnbmF0dXJlIEvpZ80eoMaya69qSpTumwWxWIbaC6hejEKpPI0OEl78Cg";
const RUST_SECRET: &[u8] = b"this is the key";

#[test]
fn test_golden_serialization() {
    let macaroon = Macaroon::create("https://target-service.co", "12345", b"123");

    assert_eq!(
        hex::encode(macaroon.signature().as_bytes()),
        "9afc889b6abcb60cd2a0bd3132717dfbf3ea0b50ec931663f651e271683fd1cd"
    );
    assert_eq!(macaroon.serialize().unwrap(), NO_CAVEATS);
}

#[test]
fn test_golden_round_trip() {
    let macaroon = Macaroon::deserialize(NO_CAVEATS).unwrap();

    assert_eq!(macaroon.location(), "https://target-service.co");
    assert_eq!(macaroon.identifier(), "12345");
    assert!(!macaroon.has_caveats());
    assert!(macaroon.verify(b"123", &Verifier::new()).unwrap());
    assert_eq!(macaroon.serialize().unwrap(), NO_CAVEATS);
}

#[test]
fn test_unknown_packet_key() {
    let result = Macaroon::deserialize(UNKNOWN_KEY);

    assert_eq!(
        result,
        Err(MacaroonError::Malformed(WireError::UnknownKey("lotion".to_string())))
    );
    assert!(result.unwrap_err().to_string().contains("'lotion'"));
}

#[test]
fn test_foreign_token_without_caveats() {
    let macaroon = Macaroon::deserialize(FOREIGN_NO_CAVEATS).unwrap();

    assert_eq!(macaroon.location(), "https://target-service.co");
    assert_eq!(macaroon.identifier(), "12345");
    assert!(!macaroon.has_caveats());
}

#[test]
fn test_foreign_token_with_third_party_caveat() {
    let macaroon = Macaroon::deserialize(FOREIGN_THIRD_PARTY).unwrap();

    assert_eq!(macaroon.location(), "https://target-service.co");
    assert_eq!(macaroon.identifier(), "12345");
    assert_eq!(macaroon.caveats().len(), 2);

    let first = macaroon.caveats().get(0).unwrap();
    assert!(first.is_first_party());
    assert_eq!(first.caveat_id(), "user = 123456");
    assert_eq!(first.location(), None);

    let second = macaroon.caveats().get(1).unwrap();
    assert!(second.is_third_party());
    assert_eq!(second.caveat_id(), "user_auth");
    assert_eq!(second.location(), Some("https://target-service.co"));
    assert_eq!(second.verification_id().len(), 72);

    assert_eq!(macaroon.serialize().unwrap(), FOREIGN_THIRD_PARTY);
}

#[test]
fn test_rust_token_without_caveats() {
    let macaroon = Macaroon::deserialize(RUST_NO_CAVEATS).unwrap();
    let expected = Signature::new([
        124, 222, 231, 146, 81, 28, 91, 198, 245, 40, 72, 88, 5, 223, 233, 178, 78, 120, 94, 40,
        226, 169, 147, 1, 249, 215, 17, 198, 9, 227, 142, 247,
    ]);

    assert_eq!(macaroon.location(), "http://example.org/");
    assert_eq!(macaroon.identifier(), "keyid");
    assert_eq!(macaroon.signature(), &expected);
    assert!(!macaroon.has_caveats());
    assert!(macaroon.verify(RUST_SECRET, &Verifier::new()).unwrap());
}

#[test]
fn test_rust_token_with_one_caveat() {
    let macaroon = Macaroon::deserialize(RUST_ONE_CAVEAT).unwrap();
    let expected = Signature::new([
        245, 72, 7, 246, 220, 110, 223, 136, 191, 15, 115, 6, 179, 130, 37, 98, 163, 98, 83, 61,
        191, 115, 57, 186, 97, 118, 93, 164, 189, 37, 157, 135,
    ]);

    assert_eq!(macaroon.identifier(), "keyid");
    assert_eq!(macaroon.signature(), &expected);
    assert_eq!(macaroon.caveats().len(), 1);

    let verifier = Verifier::new().satisfy_exact("account = 3735928559");
    assert!(macaroon.verify(RUST_SECRET, &verifier).unwrap());
}

#[test]
fn test_rust_token_with_two_caveats() {
    let macaroon = Macaroon::deserialize(RUST_TWO_CAVEATS).unwrap();
    let expected = Signature::new([
        75, 233, 103, 205, 30, 160, 198, 178, 107, 175, 106, 74, 148, 238, 155, 5, 177, 88, 134,
        218, 11, 168, 94, 140, 66, 169, 60, 141, 14, 18, 94, 252,
    ]);

    assert_eq!(macaroon.signature(), &expected);

    let predicates: Vec<&str> = macaroon.iter().map(|caveat| caveat.caveat_id()).collect();
    assert_eq!(predicates, vec!["account = 3735928559", "user = alice"]);
    assert!(macaroon.iter().all(|caveat| caveat.is_first_party()));

    // Rebuilding the chain locally must land on the same signature.
    let rebuilt = Macaroon::create("http://example.org/", "keyid", RUST_SECRET)
        .with_first_party_caveat("account = 3735928559", None)
        .with_first_party_caveat("user = alice", None);
    assert_eq!(rebuilt, macaroon);
    assert_eq!(rebuilt.serialize().unwrap(), RUST_TWO_CAVEATS);
}

#[test]
fn test_rust_token_rejects_missing_predicate() {
    let macaroon = Macaroon::deserialize(RUST_TWO_CAVEATS).unwrap();
    let verifier = Verifier::new().satisfy_exact("account = 3735928559");

    assert_eq!(
        macaroon.verify(RUST_SECRET, &verifier),
        Err(MacaroonError::UnsatisfiedCaveat("user = alice".to_string()))
    );
}
