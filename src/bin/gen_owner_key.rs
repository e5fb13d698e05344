use rust_helm::crypto::KeyPair;
use serde::{Deserialize, Serialize};
use std::fs;

#[derive(Serialize, Deserialize)]
struct OwnerKeyPair {
    address: String,
    private_key: String,
}

fn main() {
    println!("=== Helm Owner Key Generator ===\n");

    let keypair = KeyPair::generate();
    let address = keypair.address().to_hex();
    let private_hex = keypair.secret_hex();

    println!("Generated Owner Keypair:");
    println!("Address:     {}", address);
    println!("Private Key: {} (KEEP SECRET!)\n", private_hex);

    let owner_key = OwnerKeyPair {
        address: address.clone(),
        private_key: private_hex,
    };

    let json = serde_json::to_string_pretty(&owner_key).unwrap();
    fs::write("owner_key.json", json).expect("Failed to write owner_key.json");
    println!("✓ Saved to owner_key.json");

    println!("\nAdd the address to your protocol config as the account owner:");
    println!("  orchestrator = \"0x...\"");
    println!("  # owner of the account you deploy:");
    println!("  # {}", address);
}
