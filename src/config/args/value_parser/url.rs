use url::Url;

const INVALID_SCHEME: &str = "organization URL scheme must be https:// or http://";
const MISSING_HOST: &str = "organization URL must contain a host";

/// Accepts `http(s)://host[/collection]` organization URLs.
pub fn check_scheme(url: &str) -> Result<String, String> {
    let parsed = Url::parse(url).map_err(|e| e.to_string())?;

    if parsed.scheme() != "https" && parsed.scheme() != "http" {
        return Err(INVALID_SCHEME.to_string());
    }

    if parsed.host_str().is_none_or(str::is_empty) {
        return Err(MISSING_HOST.to_string());
    }

    Ok(url.to_string())
}
