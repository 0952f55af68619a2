use http::StatusCode;
use log::{debug, info};

use super::header_str;
use crate::fs::FileInfo;
use crate::mime;
use crate::request::Request;
use crate::response::Response;
use crate::util::{decode_url, epoch_to_httpdate, epoch_to_rfc3339};
use crate::xml::Document;

const XML_DECLARATION: &str = "<?xml version=\"1.0\" encoding=\"utf-8\"?>\n";

const CONTENT_TYPE_XML: &str = "application/xml; charset=utf-8";

/// Names acknowledged by PROPPATCH for Windows clients.
const WIN32_PROPS: [&str; 4] = [
    "Win32LastModifiedTime",
    "Win32FileAttributes",
    "Win32CreationTime",
    "Win32LastAccessTime",
];

fn multistatus() -> Document {
    let mut doc = Document::new("D:multistatus");
    doc.set_attribute(Document::ROOT, "xmlns:D", "DAV:");
    doc
}

/// Append one `<D:response>` carrying the fixed live-property set (plus any
/// dead properties the metadata holds).
fn add_resource_response(doc: &mut Document, href: &str, info: &FileInfo) {
    let response = doc.add_child(Document::ROOT, "D:response");
    let node = doc.add_child(response, "D:href");
    doc.set_value(node, href);

    let propstat = doc.add_child(response, "D:propstat");
    let prop = doc.add_child(propstat, "D:prop");

    let resourcetype = doc.add_child(prop, "D:resourcetype");
    if info.is_directory {
        doc.add_child(resourcetype, "D:collection");
    }

    let node = doc.add_child(prop, "D:getcontentlength");
    doc.set_value(node, info.size.to_string());
    let node = doc.add_child(prop, "D:getlastmodified");
    doc.set_value(node, epoch_to_httpdate(info.modified));
    let node = doc.add_child(prop, "D:creationdate");
    doc.set_value(node, epoch_to_rfc3339(info.created));
    let node = doc.add_child(prop, "D:getetag");
    doc.set_value(node, info.etag.as_str());
    let node = doc.add_child(prop, "D:getcontenttype");
    doc.set_value(node, mime::mime_type(&info.name));
    let node = doc.add_child(prop, "D:displayname");
    doc.set_value(node, info.name.as_str());

    let supportedlock = doc.add_child(prop, "D:supportedlock");
    let lockentry = doc.add_child(supportedlock, "D:lockentry");
    let lockscope = doc.add_child(lockentry, "D:lockscope");
    doc.add_child(lockscope, "D:exclusive");
    let locktype = doc.add_child(lockentry, "D:locktype");
    doc.add_child(locktype, "D:write");

    for (name, value) in &info.properties {
        let node = doc.add_child(prop, name.as_str());
        doc.set_value(node, value.as_str());
    }

    let node = doc.add_child(propstat, "D:status");
    doc.set_value(node, "HTTP/1.1 200 OK");
}

/// `Depth: 0 | 1 | infinity`; anything else (or no header) behaves as
/// infinity, which lists a single level.
fn depth_of(req: &Request) -> i32 {
    match header_str(req, "depth") {
        None | Some("infinity") => -1,
        Some(value) => value.parse().unwrap_or(-1),
    }
}

impl crate::DavHandler {
    pub(crate) async fn handle_propfind(&self, req: &Request) -> Response {
        let path = decode_url(&req.uri);

        let mut res = Response::new(StatusCode::MULTI_STATUS);
        res.headers.insert("cache-control", "no-cache".parse().unwrap());
        res.headers.insert("connection", "Keep-Alive".parse().unwrap());
        res.headers
            .insert("keep-alive", "timeout=5, max=100".parse().unwrap());

        let info = match self.fs.get_resource_info(&path).await {
            Ok(info) => info,
            Err(_) => {
                res.status = StatusCode::NOT_FOUND;
                return res;
            }
        };

        // The request body is parsed when present, but the answered
        // property set is fixed regardless of what it asks for.
        if !req.body.is_empty() {
            match Document::parse(&String::from_utf8_lossy(&req.body)) {
                Ok(body) => debug!("propfind body root: {}", body.node(Document::ROOT).name),
                Err(err) => debug!("ignoring unparseable propfind body: {err}"),
            }
        }

        let depth = depth_of(req);
        let mut doc = multistatus();
        add_resource_response(&mut doc, &req.uri, &info);

        if info.is_directory && depth != 0 {
            if let Ok(items) = self.fs.list_directory(&path).await {
                let base = req.uri.trim_end_matches('/');
                for item in &items {
                    add_resource_response(&mut doc, &format!("{base}/{}", item.name), item);
                }
            }
        }

        res.headers
            .insert(http::header::CONTENT_TYPE, CONTENT_TYPE_XML.parse().unwrap());
        res.set_body(format!("{XML_DECLARATION}{}", doc.to_xml()));
        res
    }

    pub(crate) async fn handle_proppatch(&self, req: &Request) -> Response {
        let path = decode_url(&req.uri);
        info!("handling PROPPATCH request for: {path}");

        if !req.body.is_empty() {
            if let Err(err) = Document::parse(&String::from_utf8_lossy(&req.body)) {
                debug!("ignoring unparseable proppatch body: {err}");
            }
        }

        // Acknowledge the Windows property names without storing anything.
        let mut doc = multistatus();
        let response = doc.add_child(Document::ROOT, "D:response");
        let node = doc.add_child(response, "D:href");
        doc.set_value(node, req.uri.as_str());
        let propstat = doc.add_child(response, "D:propstat");
        let prop = doc.add_child(propstat, "D:prop");
        for name in WIN32_PROPS {
            doc.add_child(prop, name);
        }
        let node = doc.add_child(propstat, "D:status");
        doc.set_value(node, "HTTP/1.1 200 OK");

        let mut res = Response::new(StatusCode::MULTI_STATUS);
        res.headers
            .insert(http::header::CONTENT_TYPE, CONTENT_TYPE_XML.parse().unwrap());
        res.set_body(format!("{XML_DECLARATION}{}", doc.to_xml()));
        res
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use http::HeaderMap;

    fn file_info(dir: bool) -> FileInfo {
        FileInfo {
            name: "x.txt".into(),
            path: "/dir/x.txt".into(),
            size: 12,
            created: 1_000_000,
            modified: 2_000_000,
            accessed: 2_000_000,
            is_directory: dir,
            etag: "\"1e8480-c\"".into(),
            properties: Default::default(),
        }
    }

    #[test]
    fn response_node_shape() {
        let mut doc = multistatus();
        add_resource_response(&mut doc, "/dir/x.txt", &file_info(false));

        let xml = doc.to_xml();
        let parsed = Document::parse(&xml).unwrap();
        let response = parsed.find_child(Document::ROOT, "D:response").unwrap();
        let href = parsed.find_child(response, "D:href").unwrap();
        assert_eq!(parsed.node(href).value, "/dir/x.txt");

        let propstat = parsed.find_child(response, "D:propstat").unwrap();
        let prop = parsed.find_child(propstat, "D:prop").unwrap();
        let resourcetype = parsed.find_child(prop, "D:resourcetype").unwrap();
        assert!(parsed.find_child(resourcetype, "D:collection").is_none());
        let ctype = parsed.find_child(prop, "D:getcontenttype").unwrap();
        assert_eq!(parsed.node(ctype).value, "text/plain");
        let status = parsed.find_child(propstat, "D:status").unwrap();
        assert_eq!(parsed.node(status).value, "HTTP/1.1 200 OK");
    }

    #[test]
    fn directories_carry_collection() {
        let mut doc = multistatus();
        add_resource_response(&mut doc, "/dir", &file_info(true));
        let xml = doc.to_xml();
        assert!(xml.contains("<D:resourcetype><D:collection/></D:resourcetype>"));
    }

    #[test]
    fn depth_parsing() {
        let depth = |value: Option<&str>| {
            let mut headers = HeaderMap::new();
            if let Some(value) = value {
                headers.insert("depth", value.parse().unwrap());
            }
            depth_of(&Request {
                method: crate::request::DavMethod::PropFind,
                uri: "/".into(),
                version: "HTTP/1.1".into(),
                headers,
                body: Bytes::new(),
            })
        };
        assert_eq!(depth(None), -1);
        assert_eq!(depth(Some("infinity")), -1);
        assert_eq!(depth(Some("0")), 0);
        assert_eq!(depth(Some("1")), 1);
        assert_eq!(depth(Some("bogus")), -1);
    }
}
