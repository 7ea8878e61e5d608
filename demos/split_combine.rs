// Copyright 2020-2024 MathxH Chen.
//
// Code is licensed under MIT Apache Dual License

use num_bigint::BigInt;
use tracing::Level;

use secretshare_rs::checksum;
use secretshare_rs::primes;
use secretshare_rs::{ParanoidConfig, PublicInfo, SecretShare, ShareInfo};

fn main() {
    let collector = tracing_subscriber::fmt()
        .with_max_level(Level::DEBUG)
        .finish();
    tracing::subscriber::set_global_default(collector).expect("collector can be installed once");

    let secret = BigInt::parse_bytes(b"48656c6c6f2053656372657453686172652e", 16).unwrap();
    let modulus = primes::modulus_for_secret(&secret).unwrap();
    let info = PublicInfo::new(Some(6), 3, Some(modulus), "demo secret").unwrap();
    let engine = SecretShare::new(info);

    let split = engine.split(&secret, &mut rand::thread_rng()).unwrap();
    println!("{}", split.polynomial());
    println!("modulus: {}", checksum::encode(split.public_info().prime_modulus().unwrap()));
    let written: Vec<(i32, String)> = split
        .shares()
        .iter()
        .map(|share| (share.x(), checksum::encode(share.value())))
        .collect();
    for (x, text) in &written {
        println!("share {}: {}", x, text);
    }

    // read three of them back as a participant would
    let restored: Vec<ShareInfo> = written
        .iter()
        .step_by(2)
        .map(|(x, text)| {
            ShareInfo::new(*x, checksum::decode(text).unwrap(), engine.public_info().clone())
                .unwrap()
        })
        .collect();
    let combined = engine.combine(&restored).unwrap();
    assert_eq!(combined.secret, secret);
    println!("secret: {}", checksum::encode(&combined.secret));

    let config: ParanoidConfig = "all,limitPrint=3".parse().unwrap();
    let paranoid = engine.combine_paranoid(split.shares(), &config).unwrap();
    for sample in &paranoid.samples {
        match &sample.secret {
            Some(secret) => println!("combination {} {} -> {}", sample.ordinal, sample.indexes, secret),
            None => println!("combination {} {} -> unsolvable", sample.ordinal, sample.indexes),
        }
    }
    println!("{}", paranoid);
}
