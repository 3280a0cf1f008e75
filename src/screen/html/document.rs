//! Virtual document: fetched markup, scanned just enough to pull pieces out of it.
//!
//! The scanner is deliberately permissive. It records start and end tags with their
//! attributes and byte ranges, skips comments and doctypes, and treats the content of
//! `script`, `style`, `title` and `textarea` as text. No tree is built; element content
//! is found by balancing same-named tags.

use crate::dom::{Element, Resource, ResourceKind};

const RAW_TEXT_ELEMENTS: [&str; 4] = ["script", "style", "title", "textarea"];
const VOID_ELEMENTS: [&str; 14] = [
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source", "track", "wbr",
];

#[derive(Debug, Clone)]
struct Tag {
    /// Lowercased tag name
    name: String,
    attributes: Vec<(String, String)>,
    /// Byte offset of `<`
    start: usize,
    /// Byte offset just past `>`
    end: usize,
    closing: bool,
    self_closing: bool,
}

impl Tag {
    fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    fn is_void(&self) -> bool {
        self.self_closing || VOID_ELEMENTS.contains(&self.name.as_str())
    }
}

#[derive(Debug, Clone)]
pub struct VirtualDocument {
    source: String,
    tags: Vec<Tag>,
}

impl VirtualDocument {
    pub fn parse(markup: &str) -> Self {
        Self {
            source: markup.to_string(),
            tags: scan(markup),
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Text of the first `<title>` element.
    pub fn title(&self) -> Option<String> {
        let idx = self.find_start(|t| t.name == "title")?;
        let (from, to) = self.inner_range(idx);
        Some(decode_entities(self.source[from..to].trim()))
    }

    /// The `<body>` element, if the markup has one.
    pub fn body(&self) -> Option<Element> {
        self.find_start(|t| t.name == "body").map(|idx| self.element_at(idx))
    }

    /// The first element whose `id` attribute equals `id`.
    pub fn element_by_id(&self, id: &str) -> Option<Element> {
        self.find_start(|t| t.attribute("id") == Some(id))
            .map(|idx| self.element_at(idx))
    }

    /// Scripts and stylesheets in document order.
    pub fn resources(&self) -> Vec<Resource> {
        let mut out = Vec::new();
        for (idx, tag) in self.tags.iter().enumerate().filter(|(_, t)| !t.closing) {
            match tag.name.as_str() {
                "script" => {
                    let url = tag.attribute("src").map(str::to_string);
                    let inline = if url.is_none() { self.inline_text(idx) } else { None };
                    if url.is_some() || inline.is_some() {
                        out.push(Resource { kind: ResourceKind::Script, url, inline });
                    }
                }
                "link" => {
                    let is_stylesheet = tag
                        .attribute("rel")
                        .map(|rel| rel.split_ascii_whitespace().any(|r| r.eq_ignore_ascii_case("stylesheet")))
                        .unwrap_or(false);
                    if let (true, Some(href)) = (is_stylesheet, tag.attribute("href")) {
                        out.push(Resource {
                            kind: ResourceKind::Style,
                            url: Some(href.to_string()),
                            inline: None,
                        });
                    }
                }
                "style" => {
                    if let Some(inline) = self.inline_text(idx) {
                        out.push(Resource { kind: ResourceKind::Style, url: None, inline: Some(inline) });
                    }
                }
                _ => {}
            }
        }
        out
    }

    fn find_start(&self, pred: impl Fn(&Tag) -> bool) -> Option<usize> {
        self.tags.iter().position(|t| !t.closing && pred(t))
    }

    fn inline_text(&self, idx: usize) -> Option<String> {
        let (from, to) = self.inner_range(idx);
        let text = self.source[from..to].trim();
        (!text.is_empty()).then(|| text.to_string())
    }

    fn element_at(&self, idx: usize) -> Element {
        let tag = &self.tags[idx];
        let (from, to) = self.inner_range(idx);
        Element {
            tag: tag.name.clone(),
            attributes: tag.attributes.clone(),
            inner_html: self.source[from..to].to_string(),
        }
    }

    /// Byte range of the content of the start tag at `idx`. Unclosed elements run to
    /// the end of the source.
    fn inner_range(&self, idx: usize) -> (usize, usize) {
        let open = &self.tags[idx];
        if open.is_void() {
            return (open.end, open.end);
        }

        let mut depth = 1usize;
        for tag in self.tags[idx + 1..].iter().filter(|t| t.name == open.name) {
            if tag.closing {
                depth -= 1;
                if depth == 0 {
                    return (open.end, tag.start);
                }
            } else if !tag.self_closing {
                depth += 1;
            }
        }
        (open.end, self.source.len())
    }
}

fn scan(src: &str) -> Vec<Tag> {
    let bytes = src.as_bytes();
    let lower = src.to_ascii_lowercase();
    let mut tags = Vec::new();
    let mut i = 0;

    while let Some(offset) = src[i..].find('<') {
        let start = i + offset;
        let rest = &src[start..];

        if rest.starts_with("<!--") {
            match rest.find("-->") {
                Some(end) => i = start + end + 3,
                None => break,
            }
            continue;
        }
        if rest.starts_with("<!") || rest.starts_with("<?") {
            match rest.find('>') {
                Some(end) => i = start + end + 1,
                None => break,
            }
            continue;
        }

        let closing = rest.starts_with("</");
        let name_start = start + if closing { 2 } else { 1 };
        if !bytes.get(name_start).is_some_and(|b| b.is_ascii_alphabetic()) {
            i = start + 1;
            continue;
        }

        let Some(tag) = parse_tag(src, start, name_start, closing) else {
            break;
        };
        i = tag.end;

        if !tag.closing && !tag.self_closing && RAW_TEXT_ELEMENTS.contains(&tag.name.as_str()) {
            let needle = format!("</{}", tag.name);
            i = match lower[i..].find(&needle) {
                Some(pos) => i + pos,
                None => src.len(),
            };
        }
        tags.push(tag);
    }

    tags
}

/// Parses the tag starting at `start`. Returns `None` when the tag is not terminated.
fn parse_tag(src: &str, start: usize, name_start: usize, closing: bool) -> Option<Tag> {
    let bytes = src.as_bytes();
    let mut i = name_start;
    while i < bytes.len() && !bytes[i].is_ascii_whitespace() && bytes[i] != b'>' && bytes[i] != b'/' {
        i += 1;
    }
    let name = src[name_start..i].to_ascii_lowercase();
    let mut attributes = Vec::new();
    let mut self_closing = false;

    loop {
        while i < bytes.len() && bytes[i].is_ascii_whitespace() {
            i += 1;
        }
        match bytes.get(i)? {
            b'>' => {
                i += 1;
                break;
            }
            b'/' => {
                i += 1;
                if bytes.get(i) == Some(&b'>') {
                    self_closing = true;
                    i += 1;
                    break;
                }
                continue;
            }
            _ => {}
        }

        let attr_start = i;
        while i < bytes.len() && !bytes[i].is_ascii_whitespace() && !matches!(bytes[i], b'=' | b'>' | b'/') {
            i += 1;
        }
        let attr_name = src[attr_start..i].to_ascii_lowercase();

        while i < bytes.len() && bytes[i].is_ascii_whitespace() {
            i += 1;
        }
        let mut value = String::new();
        if bytes.get(i) == Some(&b'=') {
            i += 1;
            while i < bytes.len() && bytes[i].is_ascii_whitespace() {
                i += 1;
            }
            match bytes.get(i)? {
                quote @ (b'"' | b'\'') => {
                    let close = src[i + 1..].find(*quote as char)?;
                    value = decode_entities(&src[i + 1..i + 1 + close]);
                    i += close + 2;
                }
                _ => {
                    let value_start = i;
                    while i < bytes.len() && !bytes[i].is_ascii_whitespace() && bytes[i] != b'>' {
                        i += 1;
                    }
                    value = decode_entities(&src[value_start..i]);
                }
            }
        }

        if !attr_name.is_empty() && !closing {
            attributes.push((attr_name, value));
        }
    }

    Some(Tag {
        name,
        attributes,
        start,
        end: i,
        closing,
        self_closing,
    })
}

fn decode_entities(s: &str) -> String {
    if !s.contains('&') {
        return s.to_string();
    }
    s.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}
