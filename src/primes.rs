// Copyright 2020-2024 MathxH Chen.
//
// Code is licensed under MIT Apache Dual License

//! Well-known prime moduli and helpers for choosing a modulus.
//!
//! - `prime_192`: 2^192 - 2^64 - 1 (the NIST P-192 field prime)
//! - `prime_384`: 2^384 - 2^128 - 2^96 + 2^32 - 1 (the NIST P-384 field prime)
//! - `prime_4096`: RFC 3526 4096-bit MODP prime (group 16),
//!   2^4096 - 2^4032 - 1 + 2^64 * { [2^3966 pi] + 240904 }
//! - `prime_8192`: RFC 3526 8192-bit MODP prime (group 18),
//!   2^8192 - 2^8128 - 1 + 2^64 * { [2^8062 pi] + 4743158 }
//!
//! Each constant is parsed once, on first use, and checked against its
//! bigintcs form so a corrupted literal cannot go unnoticed.

use num_bigint::{BigInt, ToBigInt, ToBigUint};
use num_primes::{Generator, Verification};
use num_traits::Signed;
use std::sync::OnceLock;
use tracing::debug;

use crate::checksum;
use crate::error::{Error, Result};

/// Smallest bit length handed to the prime generator.
const MIN_RANDOM_PRIME_BITS: usize = 64;

fn load(cell: &'static OnceLock<BigInt>, hex: &str, expected: &str) -> &'static BigInt {
    cell.get_or_init(|| {
        let value = BigInt::parse_bytes(hex.as_bytes(), 16).expect("prime literal is valid hex");
        assert_eq!(
            checksum::encode(&value),
            expected,
            "prime literal does not match its checksum form"
        );
        value
    })
}

pub fn prime_192() -> &'static BigInt {
    static PRIME: OnceLock<BigInt> = OnceLock::new();
    load(&PRIME, PRIME_192_HEX, PRIME_192_CHECKSUM)
}

pub fn prime_384() -> &'static BigInt {
    static PRIME: OnceLock<BigInt> = OnceLock::new();
    load(&PRIME, PRIME_384_HEX, PRIME_384_CHECKSUM)
}

pub fn prime_4096() -> &'static BigInt {
    static PRIME: OnceLock<BigInt> = OnceLock::new();
    load(&PRIME, PRIME_4096_HEX, PRIME_4096_CHECKSUM)
}

pub fn prime_8192() -> &'static BigInt {
    static PRIME: OnceLock<BigInt> = OnceLock::new();
    load(&PRIME, PRIME_8192_HEX, PRIME_8192_CHECKSUM)
}

/// The well-known primes, smallest first.
pub fn known_primes() -> [&'static BigInt; 4] {
    [prime_192(), prime_384(), prime_4096(), prime_8192()]
}

/// Picks the smallest well-known prime that is larger than `secret`.
pub fn modulus_for_secret(secret: &BigInt) -> Result<BigInt> {
    known_primes()
        .into_iter()
        .find(|prime| secret < *prime)
        .cloned()
        .ok_or(Error::SecretTooLarge)
}

/// Generates a fresh random prime larger than `secret`.
pub fn random_modulus_for_secret(secret: &BigInt) -> BigInt {
    let bits = (secret.bits() + 1).max(MIN_RANDOM_PRIME_BITS);
    loop {
        let candidate = Generator::new_prime(bits)
            .to_bigint()
            .expect("unsigned values always convert");
        if &candidate > secret {
            debug!(bits, "generated random modulus");
            return candidate;
        }
    }
}

/// Probabilistic primality check, `false` for anything below 2.
pub fn is_probable_prime(n: &BigInt) -> bool {
    if n.is_negative() {
        return false;
    }
    match n.to_biguint() {
        Some(unsigned) => Verification::is_prime(&unsigned),
        None => false,
    }
}

const PRIME_192_HEX: &str = "fffffffffffffffffffffffffffffffeffffffffffffffff";

const PRIME_192_CHECKSUM: &str = "bigintcs:ffffff-ffffff-ffffff-ffffff-ffffff-feffff-ffffff-ffffff\
  -A81EE8";

const PRIME_384_HEX: &str = "fffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffe\
  ffffffff0000000000000000ffffffff";

const PRIME_384_CHECKSUM: &str = "bigintcs:ffffff-ffffff-ffffff-ffffff-ffffff-ffffff-ffffff-ffffff\
  -ffffff-ffffff-fffeff-ffffff-000000-000000-0000ff-ffffff-25E005";

const PRIME_4096_HEX: &str = "ffffffffffffffffc90fdaa22168c234c4c6628b80dc1cd129024e088a67cc74\
  020bbea63b139b22514a08798e3404ddef9519b3cd3a431b302b0a6df25f1437\
  4fe1356d6d51c245e485b576625e7ec6f44c42e9a637ed6b0bff5cb6f406b7ed\
  ee386bfb5a899fa5ae9f24117c4b1fe649286651ece45b3dc2007cb8a163bf05\
  98da48361c55d39a69163fa8fd24cf5f83655d23dca3ad961c62f356208552bb\
  9ed529077096966d670c354e4abc9804f1746c08ca18217c32905e462e36ce3b\
  e39e772c180e86039b2783a2ec07a28fb5c55df06f4c52c9de2bcbf695581718\
  3995497cea956ae515d2261898fa051015728e5a8aaac42dad33170d04507a33\
  a85521abdf1cba64ecfb850458dbef0a8aea71575d060c7db3970f85a6e1e4c7\
  abf5ae8cdb0933d71e8c94e04a25619dcee3d2261ad2ee6bf12ffa06d98a0864\
  d87602733ec86a64521f2b18177b200cbbe117577a615d6c770988c0bad946e2\
  08e24fa074e5ab3143db5bfce0fd108e4b82d120a92108011a723c12a787e6d7\
  88719a10bdba5b2699c327186af4e23c1a946834b6150bda2583e9ca2ad44ce8\
  dbbbc2db04de8ef92e8efc141fbecaa6287c59474e6bc05d99b2964fa090c3a2\
  233ba186515be7ed1f612970cee2d7afb81bdd762170481cd0069127d5b05aa9\
  93b4ea988d8fddc186ffb7dc90a6c08f4df435c934063199ffffffffffffffff";

const PRIME_4096_CHECKSUM: &str = "bigintcs:00ffff-ffffff-ffffff-c90fda-a22168-c234c4-c6628b-80dc1c\
  -d12902-4e088a-67cc74-020bbe-a63b13-9b2251-4a0879-8e3404-ddef95-\
  19b3cd-3a431b-302b0a-6df25f-14374f-e1356d-6d51c2-45e485-b57662-5\
  e7ec6-f44c42-e9a637-ed6b0b-ff5cb6-f406b7-edee38-6bfb5a-899fa5-ae\
  9f24-117c4b-1fe649-286651-ece45b-3dc200-7cb8a1-63bf05-98da48-361\
  c55-d39a69-163fa8-fd24cf-5f8365-5d23dc-a3ad96-1c62f3-562085-52bb\
  9e-d52907-709696-6d670c-354e4a-bc9804-f1746c-08ca18-217c32-905e4\
  6-2e36ce-3be39e-772c18-0e8603-9b2783-a2ec07-a28fb5-c55df0-6f4c52\
  -c9de2b-cbf695-581718-399549-7cea95-6ae515-d22618-98fa05-101572-\
  8e5a8a-aac42d-ad3317-0d0450-7a33a8-5521ab-df1cba-64ecfb-850458-d\
  bef0a-8aea71-575d06-0c7db3-970f85-a6e1e4-c7abf5-ae8cdb-0933d7-1e\
  8c94-e04a25-619dce-e3d226-1ad2ee-6bf12f-fa06d9-8a0864-d87602-733\
  ec8-6a6452-1f2b18-177b20-0cbbe1-17577a-615d6c-770988-c0bad9-46e2\
  08-e24fa0-74e5ab-3143db-5bfce0-fd108e-4b82d1-20a921-08011a-723c1\
  2-a787e6-d78871-9a10bd-ba5b26-99c327-186af4-e23c1a-946834-b6150b\
  -da2583-e9ca2a-d44ce8-dbbbc2-db04de-8ef92e-8efc14-1fbeca-a6287c-\
  59474e-6bc05d-99b296-4fa090-c3a223-3ba186-515be7-ed1f61-2970ce-e\
  2d7af-b81bdd-762170-481cd0-069127-d5b05a-a993b4-ea988d-8fddc1-86\
  ffb7-dc90a6-c08f4d-f435c9-340631-99ffff-ffffff-ffffff-33E8EE";

const PRIME_8192_HEX: &str = "ffffffffffffffffc90fdaa22168c234c4c6628b80dc1cd129024e088a67cc74\
  020bbea63b139b22514a08798e3404ddef9519b3cd3a431b302b0a6df25f1437\
  4fe1356d6d51c245e485b576625e7ec6f44c42e9a637ed6b0bff5cb6f406b7ed\
  ee386bfb5a899fa5ae9f24117c4b1fe649286651ece45b3dc2007cb8a163bf05\
  98da48361c55d39a69163fa8fd24cf5f83655d23dca3ad961c62f356208552bb\
  9ed529077096966d670c354e4abc9804f1746c08ca18217c32905e462e36ce3b\
  e39e772c180e86039b2783a2ec07a28fb5c55df06f4c52c9de2bcbf695581718\
  3995497cea956ae515d2261898fa051015728e5a8aaac42dad33170d04507a33\
  a85521abdf1cba64ecfb850458dbef0a8aea71575d060c7db3970f85a6e1e4c7\
  abf5ae8cdb0933d71e8c94e04a25619dcee3d2261ad2ee6bf12ffa06d98a0864\
  d87602733ec86a64521f2b18177b200cbbe117577a615d6c770988c0bad946e2\
  08e24fa074e5ab3143db5bfce0fd108e4b82d120a92108011a723c12a787e6d7\
  88719a10bdba5b2699c327186af4e23c1a946834b6150bda2583e9ca2ad44ce8\
  dbbbc2db04de8ef92e8efc141fbecaa6287c59474e6bc05d99b2964fa090c3a2\
  233ba186515be7ed1f612970cee2d7afb81bdd762170481cd0069127d5b05aa9\
  93b4ea988d8fddc186ffb7dc90a6c08f4df435c93402849236c3fab4d27c7026\
  c1d4dcb2602646dec9751e763dba37bdf8ff9406ad9e530ee5db382f413001ae\
  b06a53ed9027d831179727b0865a8918da3edbebcf9b14ed44ce6cbaced4bb1b\
  db7f1447e6cc254b332051512bd7af426fb8f401378cd2bf5983ca01c64b92ec\
  f032ea15d1721d03f482d7ce6e74fef6d55e702f46980c82b5a84031900b1c9e\
  59e7c97fbec7e8f323a97a7e36cc88be0f1d45b7ff585ac54bd407b22b4154aa\
  cc8f6d7ebf48e1d814cc5ed20f8037e0a79715eef29be32806a1d58bb7c5da76\
  f550aa3d8a1fbff0eb19ccb1a313d55cda56c9ec2ef29632387fe8d76e3c0468\
  043e8f663f4860ee12bf2d5b0b7474d6e694f91e6dbe115974a3926f12fee5e4\
  38777cb6a932df8cd8bec4d073b931ba3bc832b68d9dd300741fa7bf8afc47ed\
  2576f6936ba424663aab639c5ae4f5683423b4742bf1c978238f16cbe39d652d\
  e3fdb8befc848ad922222e04a4037c0713eb57a81a23f0c73473fc646cea306b\
  4bcbc8862f8385ddfa9d4b7fa2c087e879683303ed5bdd3a062b3cf5b3a278a6\
  6d2a13f83f44f82ddf310ee074ab6a364597e899a0255dc164f31cc50846851d\
  f9ab48195ded7ea1b1d510bd7ee74d73faf36bc31ecfa268359046f4eb879f92\
  4009438b481c6cd7889a002ed5ee382bc9190da6fc026e479558e4475677e9aa\
  9e3050e2765694dfc81f56e880b96e7160c980dd98edd3dfffffffffffffffff";

const PRIME_8192_CHECKSUM: &str = "bigintcs:0000ff-ffffff-ffffff-ffc90f-daa221-68c234-c4c662-8b80dc\
  -1cd129-024e08-8a67cc-74020b-bea63b-139b22-514a08-798e34-04ddef-\
  9519b3-cd3a43-1b302b-0a6df2-5f1437-4fe135-6d6d51-c245e4-85b576-6\
  25e7e-c6f44c-42e9a6-37ed6b-0bff5c-b6f406-b7edee-386bfb-5a899f-a5\
  ae9f-24117c-4b1fe6-492866-51ece4-5b3dc2-007cb8-a163bf-0598da-483\
  61c-55d39a-69163f-a8fd24-cf5f83-655d23-dca3ad-961c62-f35620-8552\
  bb-9ed529-077096-966d67-0c354e-4abc98-04f174-6c08ca-18217c-32905\
  e-462e36-ce3be3-9e772c-180e86-039b27-83a2ec-07a28f-b5c55d-f06f4c\
  -52c9de-2bcbf6-955817-183995-497cea-956ae5-15d226-1898fa-051015-\
  728e5a-8aaac4-2dad33-170d04-507a33-a85521-abdf1c-ba64ec-fb8504-5\
  8dbef-0a8aea-71575d-060c7d-b3970f-85a6e1-e4c7ab-f5ae8c-db0933-d7\
  1e8c-94e04a-25619d-cee3d2-261ad2-ee6bf1-2ffa06-d98a08-64d876-027\
  33e-c86a64-521f2b-18177b-200cbb-e11757-7a615d-6c7709-88c0ba-d946\
  e2-08e24f-a074e5-ab3143-db5bfc-e0fd10-8e4b82-d120a9-210801-1a723\
  c-12a787-e6d788-719a10-bdba5b-2699c3-27186a-f4e23c-1a9468-34b615\
  -0bda25-83e9ca-2ad44c-e8dbbb-c2db04-de8ef9-2e8efc-141fbe-caa628-\
  7c5947-4e6bc0-5d99b2-964fa0-90c3a2-233ba1-86515b-e7ed1f-612970-c\
  ee2d7-afb81b-dd7621-70481c-d00691-27d5b0-5aa993-b4ea98-8d8fdd-c1\
  86ff-b7dc90-a6c08f-4df435-c93402-849236-c3fab4-d27c70-26c1d4-dcb\
  260-2646de-c9751e-763dba-37bdf8-ff9406-ad9e53-0ee5db-382f41-3001\
  ae-b06a53-ed9027-d83117-9727b0-865a89-18da3e-dbebcf-9b14ed-44ce6\
  c-baced4-bb1bdb-7f1447-e6cc25-4b3320-51512b-d7af42-6fb8f4-01378c\
  -d2bf59-83ca01-c64b92-ecf032-ea15d1-721d03-f482d7-ce6e74-fef6d5-\
  5e702f-46980c-82b5a8-403190-0b1c9e-59e7c9-7fbec7-e8f323-a97a7e-3\
  6cc88-be0f1d-45b7ff-585ac5-4bd407-b22b41-54aacc-8f6d7e-bf48e1-d8\
  14cc-5ed20f-8037e0-a79715-eef29b-e32806-a1d58b-b7c5da-76f550-aa3\
  d8a-1fbff0-eb19cc-b1a313-d55cda-56c9ec-2ef296-32387f-e8d76e-3c04\
  68-043e8f-663f48-60ee12-bf2d5b-0b7474-d6e694-f91e6d-be1159-74a39\
  2-6f12fe-e5e438-777cb6-a932df-8cd8be-c4d073-b931ba-3bc832-b68d9d\
  -d30074-1fa7bf-8afc47-ed2576-f6936b-a42466-3aab63-9c5ae4-f56834-\
  23b474-2bf1c9-78238f-16cbe3-9d652d-e3fdb8-befc84-8ad922-222e04-a\
  4037c-0713eb-57a81a-23f0c7-3473fc-646cea-306b4b-cbc886-2f8385-dd\
  fa9d-4b7fa2-c087e8-796833-03ed5b-dd3a06-2b3cf5-b3a278-a66d2a-13f\
  83f-44f82d-df310e-e074ab-6a3645-97e899-a0255d-c164f3-1cc508-4685\
  1d-f9ab48-195ded-7ea1b1-d510bd-7ee74d-73faf3-6bc31e-cfa268-35904\
  6-f4eb87-9f9240-09438b-481c6c-d7889a-002ed5-ee382b-c9190d-a6fc02\
  -6e4795-58e447-5677e9-aa9e30-50e276-5694df-c81f56-e880b9-6e7160-\
  c980dd-98edd3-dfffff-ffffff-ffffff-6D4B8D";
