//! Version command implementation.

const VERSION: &str = env!("CARGO_PKG_VERSION");
const NAME: &str = env!("CARGO_PKG_NAME");

pub fn run() {
    println!("{NAME} {VERSION}");
    println!();
    println!("Portable digests, MACs, key derivation and checksums.");
    println!();
    println!("Algorithms:");
    println!("  Digests:   SHA-224, SHA-256, SHA-384, SHA-512");
    println!("  MAC:       HMAC over any digest above");
    println!("  KDF:       PBKDF2-HMAC");
    println!("  Cipher:    AES-128/192/256 in CTR mode");
    println!("  Checksums: CRC32 (IEEE, Castagnoli, Koopman)");
    println!();
    println!("Build info:");
    println!("  Target:    {}", std::env::consts::ARCH);
    println!("  OS:        {}", std::env::consts::OS);
}
