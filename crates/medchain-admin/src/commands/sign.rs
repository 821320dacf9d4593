// Sign a request file and print the reply

use medchain_admin::{AdminConfig, SigningService};
use std::path::Path;

/// Run the sign handler on a request file.
///
/// A request without a key pair is signed with the configured local signer.
/// The JSON reply or error body goes to stdout; a rejected request also
/// fails the command.
pub fn run(config: &AdminConfig, request: &Path) -> anyhow::Result<()> {
    let body = std::fs::read(request)?;
    let response = SigningService::from_config(config)?.handle_sign_body(&body);
    println!("{}", String::from_utf8_lossy(&response.body));

    if !response.is_success() {
        anyhow::bail!("sign request rejected with status {}", response.status);
    }
    Ok(())
}
