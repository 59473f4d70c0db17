//! Streaming download of release assets

use crate::host::Host;
use al_core::{DispatchError, Result};
use log::debug;
use std::io::{self, Write};
use url::Url;

/// Downloads `url` into `dest`
///
/// Non-200 responses and transport errors fail with the URL attached. A body
/// that ends early surfaces as a copy error instead of a truncated file.
/// Returns the number of bytes written.
pub fn download_to_file<W: Write>(host: &dyn Host, url: &Url, dest: &mut W) -> Result<u64> {
    debug!("GET {}", url);
    let response = host.http_get(url).map_err(|e| DispatchError::Download {
        url: url.to_string(),
        source: e,
    })?;

    if response.status != 200 {
        return Err(DispatchError::UnexpectedStatus {
            url: url.to_string(),
            status: response.status,
        });
    }

    let mut body = response.body;
    let written = io::copy(&mut body, dest).map_err(|e| DispatchError::Download {
        url: url.to_string(),
        source: e,
    })?;
    debug!("downloaded {} bytes from {}", written, url);
    Ok(written)
}
