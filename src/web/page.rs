//! HTML rendering for the single-page UI.
//!
//! One template, rendered server-side with plain string building. The body
//! is an enum, so a page structurally cannot carry both a result and an
//! error. Everything user-derived (extracted text, transcripts, error
//! messages, filenames embedded in error messages) goes through [`escape`].

/// What the result area of the page shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageBody {
    /// Just the upload form(s).
    Form,
    /// Successful PDF extraction.
    PdfText(String),
    /// Successful audio transcription.
    Transcript(String),
    /// Any request error, already formatted for the user.
    Error(String),
}

/// A fully-specified page, ready to render.
#[derive(Debug, Clone)]
pub struct Page {
    /// Show the audio-transcription form section.
    pub audio_enabled: bool,
    pub body: PageBody,
}

impl Page {
    pub fn form(audio_enabled: bool) -> Self {
        Self {
            audio_enabled,
            body: PageBody::Form,
        }
    }
}

/// Escape text for safe embedding in HTML element content and attributes.
pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Render the page to an HTML document.
pub fn render(page: &Page) -> String {
    let mut html = String::with_capacity(2048);
    html.push_str(HEADER);

    html.push_str(
        r#"        <h2>Convert PDF to Text</h2>
        <form method="post" enctype="multipart/form-data" action="/pdf-to-txt">
            <input type="file" name="pdf_file" accept=".pdf">
            <button type="submit">Convert PDF to Text</button>
        </form>
"#,
    );

    if page.audio_enabled {
        html.push_str(
            r#"        <h2>Audio Transcription</h2>
        <form method="post" enctype="multipart/form-data" action="/transcribe">
            <input type="file" name="audio_file" accept=".wav,audio/wav">
            <button type="submit">Transcribe Audio</button>
        </form>
"#,
        );
    }

    match &page.body {
        PageBody::Form => {}
        PageBody::PdfText(text) => push_result(&mut html, "Extracted Text", text),
        PageBody::Transcript(text) => push_result(&mut html, "Transcription", text),
        PageBody::Error(message) => {
            html.push_str("        <div class=\"error\">\n            <h3>Error</h3>\n");
            html.push_str(&format!("            <p>{}</p>\n", escape(message)));
            html.push_str("        </div>\n");
        }
    }

    html.push_str(FOOTER);
    html
}

fn push_result(html: &mut String, heading: &str, text: &str) {
    html.push_str("        <div class=\"result\">\n");
    html.push_str(&format!("            <h3>{heading}</h3>\n"));
    html.push_str(&format!(
        "            <textarea readonly>{}</textarea>\n",
        escape(text)
    ));
    html.push_str("        </div>\n");
}

const HEADER: &str = r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>textpress</title>
    <style>
        body { font-family: Arial, sans-serif; margin: 20px; background-color: #f4f4f4; color: #333; }
        .container { max-width: 600px; margin: auto; padding: 20px; border: 1px solid #ccc; border-radius: 8px; background-color: #fff; }
        h1 { color: #007bff; text-align: center; }
        h2 { color: #555; border-bottom: 1px solid #eee; padding-bottom: 10px; margin-top: 30px; }
        input[type="file"] { margin-bottom: 10px; display: block; }
        button { padding: 10px 15px; background-color: #007bff; color: white; border: none; border-radius: 5px; cursor: pointer; }
        button:hover { background-color: #0056b3; }
        textarea { width: 100%; height: 250px; margin-top: 10px; padding: 10px; border-radius: 4px; border: 1px solid #ddd; resize: vertical; }
        .result { margin-top: 20px; padding: 15px; background-color: #e9f7ef; border: 1px solid #d4edda; border-radius: 6px; }
        .error { margin-top: 20px; padding: 15px; background-color: #f8d7da; border: 1px solid #f5c6cb; border-radius: 6px; color: #721c24; }
    </style>
</head>
<body>
    <div class="container">
        <h1>textpress</h1>
"#;

const FOOTER: &str = r#"    </div>
</body>
</html>
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escape_covers_the_html_specials() {
        assert_eq!(
            escape(r#"<b>&"quote"&'tick'</b>"#),
            "&lt;b&gt;&amp;&quot;quote&quot;&amp;&#39;tick&#39;&lt;/b&gt;"
        );
        assert_eq!(escape("plain text"), "plain text");
    }

    #[test]
    fn form_page_has_the_pdf_form() {
        let html = render(&Page::form(false));
        assert!(html.contains("action=\"/pdf-to-txt\""));
        assert!(html.contains("name=\"pdf_file\""));
        assert!(!html.contains("action=\"/transcribe\""));
    }

    #[test]
    fn audio_form_appears_only_when_enabled() {
        let html = render(&Page::form(true));
        assert!(html.contains("action=\"/transcribe\""));
        assert!(html.contains("name=\"audio_file\""));
    }

    #[test]
    fn result_text_is_escaped_into_the_textarea() {
        let page = Page {
            audio_enabled: false,
            body: PageBody::PdfText("a < b & c".into()),
        };
        let html = render(&page);
        assert!(html.contains("<textarea readonly>a &lt; b &amp; c</textarea>"));
        assert!(!html.contains("class=\"error\""));
    }

    #[test]
    fn error_page_has_no_result_block() {
        let page = Page {
            audio_enabled: false,
            body: PageBody::Error("Conversion failed: <boom>".into()),
        };
        let html = render(&page);
        assert!(html.contains("class=\"error\""));
        assert!(html.contains("Conversion failed: &lt;boom&gt;"));
        assert!(!html.contains("class=\"result\""));
    }
}
