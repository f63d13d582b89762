use std::process::Command;
use std::sync::OnceLock;

use regex_lite::Regex;

use super::error::{AppError, Result};
use super::storage::Storage;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Txt,
    Html,
    Pdf,
    Png,
    Jpg,
    Docx,
    Rtf,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Txt => "txt",
            ExportFormat::Html => "html",
            ExportFormat::Pdf => "pdf",
            ExportFormat::Png => "png",
            ExportFormat::Jpg => "jpg",
            ExportFormat::Docx => "docx",
            ExportFormat::Rtf => "rtf",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ExportFormat::Txt => "Text",
            ExportFormat::Html => "HTML",
            ExportFormat::Pdf => "PDF",
            ExportFormat::Png => "PNG Image",
            ExportFormat::Jpg => "JPEG Image",
            ExportFormat::Docx => "Word Document",
            ExportFormat::Rtf => "Rich Text",
        }
    }
}

/// Extract a filename-safe title from the first H1 heading, or "Untitled".
pub fn derive_export_title(markdown: &str) -> String {
    static H1: OnceLock<Regex> = OnceLock::new();
    let re = H1.get_or_init(|| Regex::new(r"(?m)^#\s+(.+)$").unwrap());

    let Some(captures) = re.captures(markdown) else {
        return "Untitled".to_string();
    };
    let title: String = captures[1]
        .chars()
        .filter(|c| !matches!(c, '<' | '>' | ':' | '"' | '/' | '\\' | '|' | '?' | '*'))
        .collect();
    let title = title.trim();
    if title.is_empty() {
        "Untitled".to_string()
    } else {
        title.to_string()
    }
}

/// Export the active document. Prompts for a destination; cancellation
/// returns `Ok(false)` with nothing written. Conversion failures surface as
/// `Export` errors and are never retried.
pub fn export_document<S: Storage>(
    storage: &mut S,
    format: ExportFormat,
    markdown: &str,
    rendered_html: &str,
) -> Result<bool> {
    let title = derive_export_title(markdown);
    let default_name = format!("{}.{}", title, format.extension());
    let pattern = format!("*.{}", format.extension());

    let Some(path) = storage.save_dialog(&default_name, &pattern) else {
        return Ok(false);
    };

    match format {
        ExportFormat::Txt => storage.write_text(&path, markdown)?,
        ExportFormat::Html => {
            storage.write_text(&path, &standalone_html(&title, rendered_html))?
        }
        ExportFormat::Pdf => {
            let tmp = write_conversion_input(storage, &title, rendered_html)?;
            run_converter("wkhtmltopdf", &[&tmp, &path])?;
        }
        ExportFormat::Png | ExportFormat::Jpg => {
            let tmp = write_conversion_input(storage, &title, rendered_html)?;
            run_converter("wkhtmltoimage", &[&tmp, &path])?;
        }
        ExportFormat::Docx | ExportFormat::Rtf => {
            let tmp = write_conversion_input(storage, &title, rendered_html)?;
            run_converter(
                "pandoc",
                &["-f", "html", "-t", format.extension(), "-o", &path, &tmp],
            )?;
        }
    }

    Ok(true)
}

fn write_conversion_input<S: Storage>(
    storage: &mut S,
    title: &str,
    rendered_html: &str,
) -> Result<String> {
    let tmp = std::env::temp_dir().join("mendel-export.html");
    let tmp = tmp.to_string_lossy().to_string();
    storage.write_text(&tmp, &standalone_html(title, rendered_html))?;
    Ok(tmp)
}

fn run_converter(program: &str, args: &[&str]) -> Result<()> {
    let status = Command::new(program)
        .args(args)
        .status()
        .map_err(|e| AppError::Export(format!("failed to run {program}: {e}")))?;
    if status.success() {
        Ok(())
    } else {
        Err(AppError::Export(format!("{program} exited with {status}")))
    }
}

/// Wrap rendered body HTML in a standalone light-theme document.
fn standalone_html(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>{title}</title>
<style>
body {{ background: #ffffff; color: #333333; font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Roboto, sans-serif; margin: 0; padding: 0; }}
.preview-content {{ max-width: 800px; margin: 0 auto; padding: 24px 32px; line-height: 1.6; }}
.preview-content h1, .preview-content h2, .preview-content h3 {{ color: #1a1a1a; }}
.preview-content h1, .preview-content h2 {{ border-bottom: 1px solid #cccccc; }}
.preview-content code {{ background: #f5f5f5; color: #333333; }}
.preview-content pre {{ background: #f5f5f5; color: #333333; padding: 8px; }}
.preview-content pre code {{ background: none; }}
.preview-content blockquote {{ border-left: 3px solid #cccccc; color: #666666; margin-left: 0; padding-left: 12px; }}
.preview-content a {{ color: #0066cc; }}
.preview-content th, .preview-content td {{ border: 1px solid #cccccc; padding: 4px 8px; }}
.preview-content th {{ background: #f0f0f0; color: #1a1a1a; }}
</style>
</head>
<body>
<div class="preview-content">{body}</div>
</body>
</html>"#
    )
}
