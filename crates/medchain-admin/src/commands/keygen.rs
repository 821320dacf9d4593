// Key pair generation

use medchain_admin::KeyFile;
use medchain_signature::{Ed25519Signer, Signer};
use std::path::Path;

/// Generate a key pair and print the identity.
///
/// With `output` the key pair goes to that file; otherwise both keys are
/// printed.
pub fn run(output: Option<&Path>) -> anyhow::Result<()> {
    let signer = Ed25519Signer::generate(&mut rand::rngs::OsRng);
    let identity = signer.identity();

    match output {
        Some(path) => {
            KeyFile::from_signer(&signer).save(path)?;
            tracing::info!(identity = %identity, path = %path.display(), "Wrote key file");
            println!("{identity}");
        }
        None => {
            println!("identity    = {identity}");
            println!("public_key  = {}", signer.public_key_hex());
            println!("private_key = {}", *signer.private_key_hex());
        }
    }
    Ok(())
}
