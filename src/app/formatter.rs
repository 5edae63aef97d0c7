use crate::app::models::FileEntry;

pub const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="utf-8" standalone="no"?>"#;
pub const LINE_ENDING: &str = "\r\n";

pub struct OutputGenerator;

impl OutputGenerator {
    /// One tab-indented `<entry>` line per file, CRLF-joined. Empty for no entries.
    pub fn generate_entries(entries: &[FileEntry], escape: bool) -> String {
        entries
            .iter()
            .map(|entry| {
                let text = if escape {
                    escape_xml(&entry.relative_path)
                } else {
                    entry.relative_path.clone()
                };
                format!("\t<entry>{}</entry>", text)
            })
            .collect::<Vec<_>>()
            .join(LINE_ENDING)
    }

    /// Wraps the entry block in the declaration and the `<configurations>` root.
    /// There is no trailing line ending.
    pub fn format_document(entries_block: &str) -> String {
        let mut out = String::from(XML_DECLARATION);
        out.push_str(LINE_ENDING);
        out.push_str("<configurations>");
        out.push_str(LINE_ENDING);
        out.push_str(entries_block);
        out.push_str(LINE_ENDING);
        out.push_str("</configurations>");
        out
    }

    pub fn render(entries: &[FileEntry], escape: bool) -> String {
        Self::format_document(&Self::generate_entries(entries, escape))
    }
}

fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}
