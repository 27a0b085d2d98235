pub mod check;
pub mod keypair;
pub mod run;

/// Split a `KEY=VALUE` style argument on its first `=`.
pub fn split_pair(entry: &str) -> Option<(String, String)> {
    let (key, value) = entry.split_once('=')?;
    let key = key.trim();
    if key.is_empty() {
        return None;
    }
    Some((key.to_string(), value.trim().to_string()))
}
