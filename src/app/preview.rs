use std::path::Path;

use pulldown_cmark::{Options, Parser, html};

/// Render markdown text to raw HTML.
pub fn render_markdown(text: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);

    let parser = Parser::new_ext(text, options);
    let mut html_output = String::new();
    html::push_html(&mut html_output, parser);

    html_output
}

/// Rewrite relative `<img src>` attributes to absolute paths under the
/// document's directory, so the preview widget can resolve them regardless
/// of the process working directory. Remote (http/https) and absolute
/// sources pass through untouched, as do all other attributes. With no base
/// directory the HTML is returned as-is.
pub fn resolve_asset_paths(html: &str, base_dir: Option<&Path>) -> String {
    let Some(base_dir) = base_dir else {
        return html.to_string();
    };

    let mut result = String::with_capacity(html.len());
    let mut rest = html;

    while let Some(img_start) = rest.find("<img ") {
        let tag_end = match rest[img_start..].find('>') {
            Some(i) => img_start + i + 1,
            None => rest.len(),
        };
        result.push_str(&rest[..img_start]);
        result.push_str(&rewrite_img_src(&rest[img_start..tag_end], base_dir));
        rest = &rest[tag_end..];
    }

    result.push_str(rest);
    result
}

/// Splice the absolutized src value into the tag, leaving every other
/// attribute untouched.
fn rewrite_img_src(tag: &str, base_dir: &Path) -> String {
    let Some((start, end)) = attr_value_span(tag, "src") else {
        return tag.to_string();
    };
    let src = &tag[start..end];
    let is_remote = src.starts_with("http://") || src.starts_with("https://");
    if is_remote || Path::new(src).is_absolute() {
        return tag.to_string();
    }
    let abs = base_dir.join(src).to_string_lossy().to_string();
    format!("{}{}{}", &tag[..start], abs, &tag[end..])
}

/// Byte span of an attribute's double-quoted value within a tag. The match
/// is ASCII case-insensitive over the raw bytes, so the returned offsets
/// slice the original string safely even when neighboring attribute values
/// contain multi-byte characters.
fn attr_value_span(tag: &str, attr_name: &str) -> Option<(usize, usize)> {
    let needle = format!("{attr_name}=\"");
    let needle = needle.as_bytes();
    let bytes = tag.as_bytes();

    let mut i = 0;
    while i + needle.len() <= bytes.len() {
        if bytes[i..i + needle.len()].eq_ignore_ascii_case(needle)
            && (i == 0 || bytes[i - 1].is_ascii_whitespace())
        {
            // The matched bytes are ASCII, so `start` is a char boundary.
            let start = i + needle.len();
            let end = start + tag[start..].find('"')?;
            return Some((start, end));
        }
        i += 1;
    }
    None
}

/// Wrap HTML in HelpView-compatible font tags.
pub fn wrap_html_for_helpview(html: &str) -> String {
    format!("<font face=\"Helvetica\" size=\"4\">{}</font>", html)
}
