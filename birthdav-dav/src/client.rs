//! HTTP client construction for WebDAV collections.

use anyhow::{Context, Result};
use http::Uri;
use hyper_rustls::HttpsConnectorBuilder;
use hyper_util::{client::legacy::Client, client::legacy::connect::HttpConnector, rt::TokioExecutor};
use libdav::dav::WebDavClient;
use tower::ServiceBuilder;
use tower::util::Either;
use tower_http::auth::{AddAuthorization, AddAuthorizationLayer};
use tower_http::follow_redirect::{FollowRedirect, FollowRedirectLayer};

type HyperClient = Client<hyper_rustls::HttpsConnector<HttpConnector>, String>;

/// HTTP client with optional basic auth and redirect following.
pub type HttpClient = FollowRedirect<Either<AddAuthorization<HyperClient>, HyperClient>>;

pub type DavClient = WebDavClient<HttpClient>;

/// Create a libdav WebDavClient for a collection.
///
/// Basic authentication is only added when credentials are given. Plain
/// `http` URLs are accepted alongside `https`.
pub fn create_dav_client(base_url: &str, credentials: Option<(&str, &str)>) -> Result<DavClient> {
    let uri: Uri = base_url
        .parse()
        .with_context(|| format!("Invalid base URL: {}", base_url))?;

    let https_connector = HttpsConnectorBuilder::new()
        .with_native_roots()
        .context("Failed to load native TLS roots")?
        .https_or_http()
        .enable_http1()
        .build();

    let http_client = Client::builder(TokioExecutor::new()).build(https_connector);

    let client = ServiceBuilder::new()
        .layer(FollowRedirectLayer::new())
        .option_layer(credentials.map(|(user, pass)| AddAuthorizationLayer::basic(user, pass)))
        .service(http_client);

    Ok(WebDavClient::new(uri, client))
}

/// Extract the href path from a full URL.
///
/// Converts "https://dav.example.com/cal/birthdays/" to "/cal/birthdays/".
pub fn url_to_href(url: &str) -> String {
    if let Ok(uri) = url.parse::<Uri>() {
        uri.path().to_string()
    } else {
        url.to_string()
    }
}

/// Href of an object inside a collection.
pub fn object_href(collection_href: &str, key: &str) -> String {
    format!("{}/{}", collection_href.trim_end_matches('/'), key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_to_href() {
        assert_eq!(url_to_href("https://dav.example.com/cal/birthdays/"), "/cal/birthdays/");
        assert_eq!(url_to_href("http://localhost:5232/"), "/");
    }

    #[test]
    fn test_object_href() {
        assert_eq!(object_href("/cal/birthdays/", "e1.ics"), "/cal/birthdays/e1.ics");
        assert_eq!(object_href("/cal/birthdays", "e1.ics"), "/cal/birthdays/e1.ics");
    }
}
