//! Switchboard links for documents on remote drives

use url::Url;

use crate::node::Document;
use crate::AppError;

/// External URL of `document` on the switchboard serving `remote_url`
///
/// The document type and id are appended as path segments of the drive URL.
pub fn switchboard_url(remote_url: &str, document: &Document) -> Result<Url, AppError> {
    let mut url = Url::parse(remote_url)?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(AppError::InvalidLink(format!("unsupported scheme in {}", remote_url)));
    }

    url.path_segments_mut()
        .map_err(|_| AppError::InvalidLink(remote_url.to_string()))?
        .pop_if_empty()
        .push(&document.document_type)
        .push(&document.id);

    url.set_query(None);
    url.set_fragment(None);

    Ok(url)
}
