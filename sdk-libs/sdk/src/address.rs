use sha3::{Digest, Keccak256};

use crate::{instruction::PackedAddressTreeInfo, Pubkey};

pub const HASH_TO_FIELD_SIZE_SEED: u8 = u8::MAX;

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct AddressSeed(pub [u8; 32]);

impl From<[u8; 32]> for AddressSeed {
    fn from(value: [u8; 32]) -> Self {
        AddressSeed(value)
    }
}

impl From<AddressSeed> for [u8; 32] {
    fn from(address_seed: AddressSeed) -> Self {
        address_seed.0
    }
}

pub type CompressedAddress = [u8; 32];

/// Keccak256 over `bytes` followed by the bump seed, with the first byte
/// zeroed so the result is smaller than the bn254 field modulus.
pub fn hashv_to_bn254_field_size_be(bytes: &[&[u8]]) -> [u8; 32] {
    let mut hasher = Keccak256::new();
    for slice in bytes {
        hasher.update(slice);
    }
    hasher.update([HASH_TO_FIELD_SIZE_SEED]);
    let mut hashed_value: [u8; 32] = hasher.finalize().into();
    // Truncates to 31 bytes so that value is less than bn254 Fr modulo
    // field size.
    hashed_value[0] = 0;
    hashed_value
}

/// Derives a single address seed for a compressed account from the
/// provided `seeds`.
///
/// # Examples
///
/// ```rust
/// use counter_delegation_sdk::address::derive_address_seed;
///
/// let seed = derive_address_seed(&[b"my_compressed_account".as_slice()]);
/// assert_eq!(seed.0[0], 0);
/// ```
pub fn derive_address_seed(seeds: &[&[u8]]) -> AddressSeed {
    AddressSeed(hashv_to_bn254_field_size_be(seeds))
}

/// Seed of the compressed delegation record that mirrors `counter`.
pub fn derive_counter_address_seed(counter: &Pubkey) -> AddressSeed {
    derive_address_seed(&[counter.as_ref()])
}

/// Derives an address for a compressed account from a singular `seed`, the
/// `address_tree_pubkey` and the owning `program_id`.
pub fn derive_address_from_seed(
    address_seed: &AddressSeed,
    address_tree_pubkey: &[u8; 32],
    program_id: &[u8; 32],
) -> CompressedAddress {
    hashv_to_bn254_field_size_be(&[
        address_seed.0.as_slice(),
        address_tree_pubkey.as_slice(),
        program_id.as_slice(),
    ])
}

/// Derives an address from provided seeds. Returns that address and a singular
/// seed.
///
/// # Examples
///
/// ```rust
/// use counter_delegation_sdk::address::derive_address;
/// use solana_sdk::pubkey;
///
/// let program_id = pubkey!("GRLu2hKaAiMbxpkAM1HeXzks9YeGuz18SEgXEizVvPqX");
/// let address_tree_pubkey = pubkey!("amt2kaJA14v3urZbZvnc5v2np8jqvc4Z8zDep5wbtzx");
///
/// let (address, address_seed) = derive_address(
///     &[b"my_compressed_account".as_slice()],
///     &address_tree_pubkey.to_bytes(),
///     &program_id.to_bytes(),
/// );
/// ```
pub fn derive_address(
    seeds: &[&[u8]],
    address_tree_pubkey: &[u8; 32],
    program_id: &[u8; 32],
) -> (CompressedAddress, AddressSeed) {
    let address_seed = derive_address_seed(seeds);
    let address = derive_address_from_seed(&address_seed, address_tree_pubkey, program_id);
    (address, address_seed)
}

pub fn pack_address_tree_info(
    root_index: u16,
    address_merkle_tree_pubkey_index: u8,
    address_queue_pubkey_index: u8,
) -> PackedAddressTreeInfo {
    PackedAddressTreeInfo {
        address_merkle_tree_pubkey_index,
        address_queue_pubkey_index,
        root_index,
    }
}

#[cfg(test)]
mod test {
    use solana_sdk::pubkey;

    use super::*;

    const PROGRAM_ID: Pubkey = pubkey!("7yucc7fL3JGbyMwg4neUaenNSdySS39hbAk89Ao3t1Hz");

    #[test]
    fn test_derive_address_seed() {
        let address_seed = derive_address_seed(&[b"foo", b"bar"]);
        assert_eq!(
            address_seed,
            [
                0, 177, 134, 198, 24, 76, 116, 207, 56, 127, 189, 181, 87, 237, 154, 181, 246, 54,
                131, 21, 150, 248, 106, 75, 26, 80, 147, 245, 3, 23, 136, 56
            ]
            .into()
        );

        let address_seed = derive_address_seed(&[b"ayy", b"lmao"]);
        assert_eq!(
            address_seed,
            [
                0, 224, 206, 65, 137, 189, 70, 157, 163, 133, 247, 140, 198, 252, 169, 250, 18, 18,
                16, 189, 164, 131, 225, 113, 197, 225, 64, 81, 175, 154, 221, 28
            ]
            .into()
        );
    }

    #[test]
    fn test_derive_address() {
        let address_tree_pubkey = [0u8; 32];

        let (address, _) = derive_address(
            &[b"foo", b"bar"],
            &address_tree_pubkey,
            &PROGRAM_ID.to_bytes(),
        );
        assert_eq!(
            address,
            [
                0, 16, 227, 141, 38, 32, 23, 82, 252, 50, 202, 3, 183, 186, 236, 133, 86, 112, 59,
                23, 128, 162, 11, 84, 91, 127, 179, 208, 25, 178, 1, 240
            ]
        );

        let (address, _) = derive_address(
            &[b"ayy", b"lmao"],
            &address_tree_pubkey,
            &PROGRAM_ID.to_bytes(),
        );
        assert_eq!(
            address,
            [
                0, 226, 28, 142, 199, 153, 126, 212, 37, 54, 82, 232, 244, 161, 108, 12, 67, 84,
                111, 66, 107, 111, 8, 126, 153, 233, 239, 192, 83, 117, 25, 6
            ]
        );
    }

    #[test]
    fn test_derive_counter_address() {
        let counter = Pubkey::new_from_array([7; 32]);
        let seed = derive_counter_address_seed(&counter);
        assert_eq!(
            seed.0,
            [
                0, 168, 191, 191, 43, 196, 48, 112, 133, 227, 54, 61, 229, 139, 250, 253, 42, 168,
                44, 110, 223, 112, 185, 44, 27, 53, 223, 130, 96, 219, 157, 118
            ]
        );

        let address =
            derive_address_from_seed(&seed, &crate::ADDRESS_TREE.to_bytes(), &PROGRAM_ID.to_bytes());
        assert_eq!(
            address,
            [
                0, 40, 37, 210, 230, 205, 130, 13, 40, 19, 20, 3, 109, 92, 122, 196, 242, 117, 80,
                114, 207, 70, 117, 229, 67, 214, 149, 43, 102, 199, 201, 127
            ]
        );

        // Any change of the tree changes the address.
        let other_tree = derive_address_from_seed(&seed, &[0u8; 32], &PROGRAM_ID.to_bytes());
        assert_eq!(
            other_tree,
            [
                0, 11, 28, 55, 86, 166, 182, 213, 86, 198, 37, 99, 254, 106, 128, 6, 46, 209, 91,
                9, 177, 111, 188, 104, 93, 5, 78, 198, 254, 183, 47, 152
            ]
        );
        assert_ne!(address, other_tree);

        let other_program =
            derive_address_from_seed(&seed, &crate::ADDRESS_TREE.to_bytes(), &[1u8; 32]);
        assert_ne!(address, other_program);
    }
}
