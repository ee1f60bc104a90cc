//! Channel URL construction.

use fret_settings::ChannelTemplates;
use reqwest::Url;

use crate::errors::ChannelError;
use crate::types::ChannelType;

/// Path template for `channel_type`.
pub fn template_for(templates: &ChannelTemplates, channel_type: ChannelType) -> &str {
    match channel_type {
        ChannelType::Tracking => &templates.tracking,
        ChannelType::Order => &templates.order,
        ChannelType::Chat => &templates.chat,
    }
}

/// `{ws_base}/{template with id}`, plus `?token=<access>` when a token is
/// given.
///
/// The id is inserted as an escaped path segment, so `/`, `?` and `#` in it
/// stay inside its segment. Empty, `.` and `..` ids are rejected.
pub fn channel_url(
    ws_base: &str,
    template: &str,
    id: &str,
    token: Option<&str>,
) -> Result<Url, ChannelError> {
    let invalid = |url: String, reason: &str| ChannelError::InvalidUrl {
        url,
        reason: reason.to_string(),
    };
    if matches!(id, "" | "." | "..") {
        return Err(invalid(template.to_string(), "resource id is not a path segment"));
    }

    let mut url = Url::parse(ws_base).map_err(|e| invalid(ws_base.to_string(), &e.to_string()))?;
    {
        let mut segments = url
            .path_segments_mut()
            .map_err(|()| invalid(ws_base.to_string(), "base URL cannot carry a path"))?;
        let _ = segments.pop_if_empty();
        let parts: Vec<&str> = template.trim_start_matches('/').split('/').collect();
        let last = parts.len() - 1;
        for (i, part) in parts.into_iter().enumerate() {
            if part.is_empty() && i != last {
                continue;
            }
            let _ = segments.push(&part.replace(ChannelTemplates::ID_PLACEHOLDER, id));
        }
    }
    if let Some(token) = token {
        let _ = url.query_pairs_mut().append_pair("token", token);
    }
    Ok(url)
}

/// `url` with the token query value masked, for logs.
pub fn redacted(url: &Url) -> String {
    let mut shown = url.clone();
    if url.query_pairs().any(|(k, _)| k == "token") {
        let pairs: Vec<(String, String)> = url
            .query_pairs()
            .map(|(k, v)| {
                let v = if k == "token" { "***".to_string() } else { v.into_owned() };
                (k.into_owned(), v)
            })
            .collect();
        let _ = shown.query_pairs_mut().clear().extend_pairs(pairs);
    }
    shown.to_string()
}
