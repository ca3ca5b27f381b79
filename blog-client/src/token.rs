//! On-disk storage for the API token between CLI invocations.

use std::fs;
use std::io;
use std::path::Path;

pub const TOKEN_FILE: &str = ".blog_token";

pub fn save_token(path: impl AsRef<Path>, token: &str) -> io::Result<()> {
    fs::write(path, token)
}

/// Reads a saved token. A missing or blank file means "not logged in".
pub fn load_token(path: impl AsRef<Path>) -> io::Result<Option<String>> {
    match fs::read_to_string(path) {
        Ok(contents) => {
            let token = contents.trim();
            Ok((!token.is_empty()).then(|| token.to_string()))
        }
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(err) => Err(err),
    }
}

pub fn clear_token(path: impl AsRef<Path>) -> io::Result<()> {
    match fs::remove_file(path) {
        Err(err) if err.kind() != io::ErrorKind::NotFound => Err(err),
        _ => Ok(()),
    }
}
