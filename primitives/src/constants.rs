//! Constants shared by the circuit, the encodings and the command interface.

// Personalisation strings.
/// Personalisation string for the BLAKE2s digest that identifies a key pair.
pub const PERSONALISATION_KEY_PAIR_ID: &[u8; 8] = b"HBZK_KID";

// Circuit constants.
/// Bit length of a quantity value.
pub const VALUE_BITS: usize = 64;
/// Bit length of a unit or asset prime identifier.
pub const IDENTIFIER_BITS: usize = 32;
/// Bit length of an encoded quantity `value * unit * asset`. Two encoded quantities multiplied
/// together stay below the BLS12-381 scalar modulus, so the balancing equation cannot wrap.
pub const ENCODED_QUANTITY_BITS: usize = 127;
/// Number of public inputs: one dimension per quantity, four quantities.
pub const PUBLIC_INPUT_COUNT: usize = 4;

// Encoding sizes.
/// Size of a key pair identifier.
pub const KEY_PAIR_ID_SIZE: usize = 32;
/// Size of a compressed BLS12-381 G1 point.
pub const G1_COMPRESSED_SIZE: usize = 48;
/// Size of a compressed BLS12-381 G2 point.
pub const G2_COMPRESSED_SIZE: usize = 96;
/// Size of an uncompressed BLS12-381 G1 point.
pub const G1_UNCOMPRESSED_SIZE: usize = 96;
/// Size of an uncompressed BLS12-381 G2 point.
pub const G2_UNCOMPRESSED_SIZE: usize = 192;
/// Size of a compressed Groth16 proof (A, B, C).
pub const PROOF_SIZE: usize = 2 * G1_COMPRESSED_SIZE + G2_COMPRESSED_SIZE;
/// Size of a transported proof: key pair identifier followed by the proof.
pub const PROOF_ARTIFACT_SIZE: usize = KEY_PAIR_ID_SIZE + PROOF_SIZE;

/// Size of an encoded verifying key for a circuit with `public_inputs` public inputs: alpha_g1,
/// beta_g1, delta_g1, beta_g2, gamma_g2, delta_g2, a u32 length prefix and one IC point per
/// public input plus one for the constant.
pub const fn verifying_key_size(public_inputs: usize) -> usize {
    3 * G1_UNCOMPRESSED_SIZE + 3 * G2_UNCOMPRESSED_SIZE + 4 + (public_inputs + 1) * G1_UNCOMPRESSED_SIZE
}

// Key artifacts.
/// Default file name of the proving key.
pub const PROVING_KEY_FILE_NAME: &str = "hashblock_zkSNARK.pk";
/// Default file name of the verifying key.
pub const VERIFYING_KEY_FILE_NAME: &str = "hashblock_zkSNARK.vk";

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_sizes() {
        assert_eq!(PROOF_SIZE, 192);
        assert_eq!(PROOF_ARTIFACT_SIZE, 224);
        assert_eq!(verifying_key_size(PUBLIC_INPUT_COUNT), 1348);
        // Two encoded quantities must multiply to less than the 255 bit modulus.
        assert!(2 * ENCODED_QUANTITY_BITS < 255);
        assert!(VALUE_BITS + 2 * IDENTIFIER_BITS <= 2 * 64);
    }
}
