use crate::client::Result;
use std::{fs, path::Path};

/// Write a token file holding the oauth token and oauth token secret, one per line.
pub fn write_token_file<P: AsRef<Path>>(path: P, token: &str, token_secret: &str) -> Result<()> {
    fs::write(path, format!("{}\n{}\n", token, token_secret))?;
    Ok(())
}

/// Read a token file and return the oauth token and oauth token secret.
pub fn read_token_file<P: AsRef<Path>>(path: P) -> Result<(String, String)> {
    let contents = fs::read_to_string(path)?;
    let mut lines = contents.lines().map(str::trim);

    let token = lines.next().unwrap_or_default().to_owned();
    let token_secret = lines.next().unwrap_or_default().to_owned();

    Ok((token, token_secret))
}
