use reqwest::Client;
use serde::Deserialize;

/// Value recorded when the lookup fails for any reason.
pub const UNKNOWN_IP: &str = "unknown";

#[derive(Deserialize)]
struct IpResponse {
    ip: String,
}

/// Best-effort public IP lookup. Network errors, non-success statuses and
/// malformed bodies all degrade to `"unknown"`; the caller never sees an
/// error from this path.
pub async fn lookup_caller_ip(client: &Client, url: &str) -> String {
    match try_lookup(client, url).await {
        Ok(ip) => ip,
        Err(e) => {
            tracing::debug!(error = %e, "Could not fetch caller IP");
            UNKNOWN_IP.to_string()
        }
    }
}

async fn try_lookup(client: &Client, url: &str) -> Result<String, reqwest::Error> {
    let resp: IpResponse = client.get(url).send().await?.error_for_status()?.json().await?;
    Ok(resp.ip)
}
