//! WebDAV requests for plain object collections.
//!
//! libdav's own resource requests are conditional (If-None-Match / If-Match);
//! birthdav overwrites its events unconditionally, so the four requests it
//! needs are defined here.

use http::{Method, StatusCode};
use libdav::requests::{DavRequest, ParseResponseError, PreparedRequest};

const PROPFIND_BODY: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<d:propfind xmlns:d="DAV:">
  <d:prop>
    <d:resourcetype/>
  </d:prop>
</d:propfind>"#;

fn check_status(parts: &http::response::Parts) -> Result<(), ParseResponseError> {
    if parts.status.is_success() {
        Ok(())
    } else {
        Err(ParseResponseError::BadStatusCode(parts.status))
    }
}

/// PROPFIND with `Depth: 1` listing the members of a collection.
pub struct ListMembers<'a> {
    collection_href: &'a str,
}

impl<'a> ListMembers<'a> {
    pub fn new(collection_href: &'a str) -> Self {
        Self { collection_href }
    }
}

/// Object keys (last href segment) of every non-collection member.
#[derive(Debug)]
pub struct ListMembersResponse {
    pub keys: Vec<String>,
}

impl DavRequest for ListMembers<'_> {
    type Response = ListMembersResponse;
    type ParseError = ParseResponseError;
    type Error<E> = libdav::dav::WebDavError<E>;

    fn prepare_request(&self) -> Result<PreparedRequest, http::Error> {
        Ok(PreparedRequest {
            method: Method::from_bytes(b"PROPFIND")?,
            path: self.collection_href.to_string(),
            body: PROPFIND_BODY.to_string(),
            headers: vec![
                ("Depth".to_string(), "1".to_string()),
                (
                    "Content-Type".to_string(),
                    "application/xml; charset=utf-8".to_string(),
                ),
            ],
        })
    }

    fn parse_response(
        &self,
        parts: &http::response::Parts,
        body: &[u8],
    ) -> Result<Self::Response, ParseResponseError> {
        check_status(parts)?;
        let keys = parse_member_keys(body)?;
        Ok(ListMembersResponse { keys })
    }
}

/// Parse a multistatus body into member keys, skipping collections.
fn parse_member_keys(body: &[u8]) -> Result<Vec<String>, ParseResponseError> {
    let text = std::str::from_utf8(body)?;
    let doc = roxmltree::Document::parse(text)?;
    let root = doc.root_element();

    let mut keys = Vec::new();

    for response in root.descendants().filter(|n| n.tag_name().name() == "response") {
        let Some(href) = response
            .descendants()
            .find(|n| n.tag_name().name() == "href")
            .and_then(|n| n.text())
        else {
            continue;
        };

        let is_collection = response
            .descendants()
            .any(|n| n.tag_name().name() == "collection");
        if is_collection {
            continue;
        }

        if let Some(key) = href
            .trim()
            .trim_end_matches('/')
            .rsplit('/')
            .next()
            .filter(|k| !k.is_empty())
        {
            keys.push(key.to_string());
        }
    }

    keys.sort();
    Ok(keys)
}

/// GET of a single object.
pub struct GetObject<'a> {
    href: &'a str,
}

impl<'a> GetObject<'a> {
    pub fn new(href: &'a str) -> Self {
        Self { href }
    }
}

impl DavRequest for GetObject<'_> {
    type Response = Vec<u8>;
    type ParseError = ParseResponseError;
    type Error<E> = libdav::dav::WebDavError<E>;

    fn prepare_request(&self) -> Result<PreparedRequest, http::Error> {
        Ok(PreparedRequest {
            method: Method::GET,
            path: self.href.to_string(),
            body: String::new(),
            headers: vec![],
        })
    }

    fn parse_response(
        &self,
        parts: &http::response::Parts,
        body: &[u8],
    ) -> Result<Self::Response, ParseResponseError> {
        check_status(parts)?;
        Ok(body.to_vec())
    }
}

/// Unconditional PUT, creating or replacing an object.
pub struct PutObject<'a> {
    href: &'a str,
    body: &'a str,
    content_type: &'a str,
}

impl<'a> PutObject<'a> {
    pub fn new(href: &'a str, body: &'a str, content_type: &'a str) -> Self {
        Self {
            href,
            body,
            content_type,
        }
    }
}

impl DavRequest for PutObject<'_> {
    type Response = ();
    type ParseError = ParseResponseError;
    type Error<E> = libdav::dav::WebDavError<E>;

    fn prepare_request(&self) -> Result<PreparedRequest, http::Error> {
        Ok(PreparedRequest {
            method: Method::PUT,
            path: self.href.to_string(),
            body: self.body.to_string(),
            headers: vec![("Content-Type".to_string(), self.content_type.to_string())],
        })
    }

    fn parse_response(
        &self,
        parts: &http::response::Parts,
        _body: &[u8],
    ) -> Result<Self::Response, ParseResponseError> {
        check_status(parts)
    }
}

/// DELETE of a single object; an already missing object is not an error.
pub struct DeleteObject<'a> {
    href: &'a str,
}

impl<'a> DeleteObject<'a> {
    pub fn new(href: &'a str) -> Self {
        Self { href }
    }
}

impl DavRequest for DeleteObject<'_> {
    type Response = ();
    type ParseError = ParseResponseError;
    type Error<E> = libdav::dav::WebDavError<E>;

    fn prepare_request(&self) -> Result<PreparedRequest, http::Error> {
        Ok(PreparedRequest {
            method: Method::DELETE,
            path: self.href.to_string(),
            body: String::new(),
            headers: vec![],
        })
    }

    fn parse_response(
        &self,
        parts: &http::response::Parts,
        _body: &[u8],
    ) -> Result<Self::Response, ParseResponseError> {
        if parts.status == StatusCode::NOT_FOUND {
            return Ok(());
        }
        check_status(parts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parts(status: StatusCode) -> http::response::Parts {
        let (parts, _) = http::Response::builder()
            .status(status)
            .body(())
            .unwrap()
            .into_parts();
        parts
    }

    const MULTISTATUS: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<d:multistatus xmlns:d="DAV:">
  <d:response>
    <d:href>/cal/birthdays/</d:href>
    <d:propstat>
      <d:prop><d:resourcetype><d:collection/></d:resourcetype></d:prop>
      <d:status>HTTP/1.1 200 OK</d:status>
    </d:propstat>
  </d:response>
  <d:response>
    <d:href>/cal/birthdays/e2.ics</d:href>
    <d:propstat>
      <d:prop><d:resourcetype/></d:prop>
      <d:status>HTTP/1.1 200 OK</d:status>
    </d:propstat>
  </d:response>
  <d:response>
    <d:href>https://dav.example.com/cal/birthdays/e1.ics</d:href>
    <d:propstat>
      <d:prop><d:resourcetype/></d:prop>
      <d:status>HTTP/1.1 200 OK</d:status>
    </d:propstat>
  </d:response>
  <d:response>
    <d:href>/cal/birthdays/nested/</d:href>
    <d:propstat>
      <d:prop><d:resourcetype><d:collection/></d:resourcetype></d:prop>
      <d:status>HTTP/1.1 200 OK</d:status>
    </d:propstat>
  </d:response>
</d:multistatus>"#;

    #[test]
    fn test_list_members_skips_collections() {
        let response = ListMembers::new("/cal/birthdays/")
            .parse_response(&parts(StatusCode::MULTI_STATUS), MULTISTATUS.as_bytes())
            .unwrap();

        assert_eq!(response.keys, vec!["e1.ics", "e2.ics"]);
    }

    #[test]
    fn test_list_members_rejects_bad_status() {
        let result = ListMembers::new("/cal/birthdays/")
            .parse_response(&parts(StatusCode::UNAUTHORIZED), b"");

        assert!(matches!(
            result,
            Err(ParseResponseError::BadStatusCode(StatusCode::UNAUTHORIZED))
        ));
    }

    #[test]
    fn test_propfind_request_shape() {
        let request = ListMembers::new("/card/").prepare_request().unwrap();

        assert_eq!(request.method.as_str(), "PROPFIND");
        assert_eq!(request.path, "/card/");
        assert!(request.headers.contains(&("Depth".to_string(), "1".to_string())));
        assert!(request.body.contains("resourcetype"));
    }

    #[test]
    fn test_put_carries_content_type() {
        let request = PutObject::new("/cal/e1.ics", "BEGIN:VCALENDAR", "text/calendar")
            .prepare_request()
            .unwrap();

        assert_eq!(request.method, Method::PUT);
        assert_eq!(request.body, "BEGIN:VCALENDAR");
        assert_eq!(
            request.headers,
            vec![("Content-Type".to_string(), "text/calendar".to_string())]
        );
    }

    #[test]
    fn test_delete_of_missing_object_succeeds() {
        let request = DeleteObject::new("/cal/gone.ics");

        assert!(request.parse_response(&parts(StatusCode::NOT_FOUND), b"").is_ok());
        assert!(request.parse_response(&parts(StatusCode::NO_CONTENT), b"").is_ok());
        assert!(request.parse_response(&parts(StatusCode::FORBIDDEN), b"").is_err());
    }

    #[test]
    fn test_get_returns_body() {
        let body = GetObject::new("/card/a.vcf")
            .parse_response(&parts(StatusCode::OK), b"BEGIN:VCARD")
            .unwrap();

        assert_eq!(body, b"BEGIN:VCARD");
    }
}
