//! End-to-end tests for the LM-OTS/LMS/HSS stack.

use hbs::lmots::{self, LmsOtsAlgorithm};
use hbs::lms::{self, LmsAlgorithm};
use hbs::{hss, Error};
use rand::rngs::StdRng;
use rand::SeedableRng;

const H5: LmsAlgorithm = LmsAlgorithm::LmsSha256M32H5;
const W1: LmsOtsAlgorithm = LmsOtsAlgorithm::LmsOtsSha256N32W1;

#[test]
fn lmots_w1_sign_verify_and_tamper() {
    let mut rng = StdRng::seed_from_u64(1);
    let mut sk = lmots::SigningKey::new(W1, &mut rng).unwrap();
    let pk = sk.public();

    let msg = b"Hello, world!";
    let sig = sk.sign(&mut rng, msg).unwrap();
    pk.verify(msg, &sig).unwrap();

    // flip the first byte of y[0], right after the typecode and C
    let mut bytes = sig.to_bytes();
    assert_eq!(bytes.len(), W1.sig_len());
    bytes[4 + 32] ^= 0x01;
    let tampered = lmots::Signature::try_from(bytes.as_slice()).unwrap();
    assert!(matches!(
        pk.verify(msg, &tampered),
        Err(Error::InvalidSignature)
    ));

    // flipping any byte of the message is caught too
    let mut wrong = msg.to_vec();
    wrong[0] ^= 0x80;
    assert!(matches!(
        pk.verify(&wrong, &sig),
        Err(Error::InvalidSignature)
    ));
}

#[test]
fn lms_h5_full_sequence_with_resume() {
    let mut rng = StdRng::seed_from_u64(2);
    let mut sk = lms::SigningKey::new(H5, W1, &mut rng).unwrap();
    let pk = sk.public();

    for i in 0..32u32 {
        let msg = i.to_be_bytes();
        let sig = sk.sign(&mut rng, &msg).unwrap();
        assert_eq!(sig.q(), i, "leaf counter must track the signature number");
        pk.verify(&msg, &sig).unwrap();

        // serialize mid-sequence and continue with the parsed key
        if i == 17 {
            let bytes = sk.to_bytes();
            sk = lms::SigningKey::try_from(bytes.as_slice()).unwrap();
            assert_eq!(sk.q(), 18);
        }
    }

    assert!(matches!(
        sk.sign(&mut rng, b"the 33rd"),
        Err(Error::ExhaustedKey)
    ));
}

#[test]
fn lms_signature_tamper_detection() {
    let mut rng = StdRng::seed_from_u64(3);
    let mut sk = lms::SigningKey::new(H5, W1, &mut rng).unwrap();
    let pk = sk.public();
    let msg = b"tamper with me";
    let sig = sk.sign(&mut rng, msg).unwrap();
    let bytes = sig.to_bytes();

    // try a flip in each structural region: q, OTS sig, typecode, path
    for offset in [3, 40, bytes.len() - 5 * 32 - 3, bytes.len() - 1] {
        let mut tampered = bytes.clone();
        tampered[offset] ^= 0x01;
        match lms::Signature::try_from(tampered.as_slice()) {
            Ok(sig) => assert!(
                matches!(pk.verify(msg, &sig), Err(Error::InvalidSignature)),
                "flip at {offset} must not verify"
            ),
            // typecode flips are already rejected structurally
            Err(Error::InvalidTypecode(_) | Error::Parse(_)) => {}
            Err(other) => panic!("unexpected error for flip at {offset}: {other}"),
        }
    }
}

#[test]
fn hss_three_layers_with_rollover() {
    let mut rng = StdRng::seed_from_u64(4);
    let mut sk = hss::SigningKey::new(H5, W1, 3, &mut rng).unwrap();
    let pk = sk.public();

    let mut previous_leaf_pub: Option<lms::VerifyingKey> = None;
    for i in 0..64u32 {
        let msg = i.to_be_bytes();
        let sig = sk.sign(&mut rng, &msg).unwrap();
        pk.verify(&msg, &sig).unwrap();

        // the message counter of the deepest tree wraps at 32
        assert_eq!(sig.message_signature().q(), i % 32);

        let leaf_pub = sig.chain()[1].1.clone();
        if let Some(prev) = previous_leaf_pub.take() {
            if i == 32 {
                // the deepest sub-tree rolled over between the 32nd and the
                // 33rd message; its parent signed the fresh root at leaf 1
                assert_ne!(prev, leaf_pub, "layer-2 tree must be regenerated");
                assert_eq!(sig.chain()[1].0.q(), 1);
            } else {
                assert_eq!(prev, leaf_pub);
            }
        }
        previous_leaf_pub = Some(leaf_pub);

        // wire round trip preserves the chain
        let parsed = hss::Signature::try_from(sig.to_bytes().as_slice()).unwrap();
        assert_eq!(parsed, sig);
    }
}

#[test]
fn hss_private_key_round_trip() {
    let mut rng = StdRng::seed_from_u64(5);
    let mut sk = hss::SigningKey::new(H5, W1, 2, &mut rng).unwrap();
    let pk = sk.public();
    for i in 0..5u32 {
        let sig = sk.sign(&mut rng, &i.to_be_bytes()).unwrap();
        pk.verify(&i.to_be_bytes(), &sig).unwrap();
    }

    let bytes = sk.to_bytes();
    assert_eq!(bytes.len(), 4 + 2 * 60);
    let mut sk2 = hss::SigningKey::parse(&bytes, &mut rng).unwrap();
    let sig = sk2.sign(&mut rng, b"after the round trip").unwrap();
    pk.verify(b"after the round trip", &sig).unwrap();
}

#[test]
fn cross_algorithm_rejection() {
    let mut rng = StdRng::seed_from_u64(6);
    let mut w1_sk = lmots::SigningKey::new(W1, &mut rng).unwrap();
    let sig = w1_sk.sign(&mut rng, b"typecode matters").unwrap();

    let w2_sk =
        lmots::SigningKey::new(LmsOtsAlgorithm::LmsOtsSha256N32W2, &mut rng).unwrap();
    let w2_pk = w2_sk.public();
    assert!(matches!(
        w2_pk.verify(b"typecode matters", &sig),
        Err(Error::InvalidSignature)
    ));
}

#[test]
fn serialized_lengths_match_formulas() {
    let mut rng = StdRng::seed_from_u64(7);

    for ots in [
        LmsOtsAlgorithm::LmsOtsSha256N32W1,
        LmsOtsAlgorithm::LmsOtsSha256N32W2,
        LmsOtsAlgorithm::LmsOtsSha256N32W4,
        LmsOtsAlgorithm::LmsOtsSha256N32W8,
    ] {
        let mut sk = lmots::SigningKey::new(ots, &mut rng).unwrap();
        assert_eq!(sk.to_bytes().len(), 4 + 16 + 4 + 32);
        assert_eq!(sk.public().to_bytes().len(), 4 + 16 + 4 + 32);
        let sig = sk.sign(&mut rng, b"x").unwrap();
        assert_eq!(sig.to_bytes().len(), 4 + 32 * (ots.p() + 1));
    }

    let mut sk = lms::SigningKey::new(H5, W1, &mut rng).unwrap();
    assert_eq!(sk.to_bytes().len(), 4 + 4 + 4 + 16 + 32);
    assert_eq!(sk.public().to_bytes().len(), 4 + 4 + 16 + 32);
    let sig = sk.sign(&mut rng, b"x").unwrap();
    let lms_sig_len = 4 + W1.sig_len() + 4 + 5 * 32;
    assert_eq!(sig.to_bytes().len(), lms_sig_len);

    let mut sk = hss::SigningKey::new(H5, W1, 3, &mut rng).unwrap();
    assert_eq!(sk.to_bytes().len(), 4 + 3 * 60);
    assert_eq!(sk.public().to_bytes().len(), 4 + 56);
    let sig = sk.sign(&mut rng, b"x").unwrap();
    assert_eq!(sig.to_bytes().len(), 4 + 3 * lms_sig_len + 2 * 56);
}
