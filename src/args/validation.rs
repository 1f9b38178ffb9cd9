use reqwest::Url;
use std::{fs, path::PathBuf};

/// # Errors
///
/// Will return `Err` if the file is not readable
pub fn check_readable_file(file: &str) -> Result<String, String> {
    // split by semi-colon
    for file in file.split(';').map(str::trim).filter(|f| !f.is_empty()) {
        let path = PathBuf::from(file);
        if !path.is_file() || fs::metadata(&path).is_err() {
            return Err(format!("The sql startup script '{file}' is not readable."));
        }
    }
    Ok(file.to_string())
}

/// # Errors
///
/// Will return `Err` unless the url is http or https.
pub fn check_rest_url(url: &str) -> Result<String, String> {
    let url = url.trim().trim_end_matches('/');
    let parsed = Url::parse(url).map_err(|e| format!("The store url '{url}' is not a url: {e}"))?;
    match parsed.scheme() {
        "http" | "https" if parsed.host_str().is_some() => Ok(url.to_string()),
        scheme => Err(format!(
            "The store url '{url}' must use http or https with a host, not '{scheme}'."
        )),
    }
}
