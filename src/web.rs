//! Article extraction for train-from-url
//!
//! Fetches a page and reduces it to the title plus the first five
//! non-empty paragraphs, which then becomes the output text of an
//! "article" training example.

use anyhow::{Context, Result};
use scraper::{Html, Selector};
use std::time::Duration;

/// Fetch a URL and extract its title and leading paragraphs.
pub async fn extract_text_from_url(url: &str) -> Result<String> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(10))
        .build()
        .context("Failed to build HTTP client")?;
    let body = client
        .get(url)
        .send()
        .await
        .context("Failed to fetch URL")?
        .error_for_status()
        .context("URL returned an error status")?
        .text()
        .await
        .context("Failed to read response body")?;

    Ok(extract_text(&body))
}

fn extract_text(html: &str) -> String {
    let document = Html::parse_document(html);

    let title = document
        .select(&Selector::parse("title").unwrap())
        .next()
        .map(|t| t.text().collect::<String>().trim().to_string())
        .unwrap_or_default();

    let paragraph_selector = Selector::parse("p").unwrap();
    let paragraphs: Vec<String> = document
        .select(&paragraph_selector)
        .filter_map(|p| {
            let text = p.text().collect::<String>().trim().to_string();
            (!text.is_empty()).then_some(text)
        })
        .take(5)
        .collect();

    format!("{}\n{}", title, paragraphs.join("\n"))
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_title_and_paragraphs() {
        let html = "<html><head><title> Rust News </title></head>\
                    <body><p>First.</p><p>  </p><p>Second.</p></body></html>";
        assert_eq!(extract_text(html), "Rust News\nFirst.\nSecond.");
    }

    #[test]
    fn test_caps_at_five_paragraphs() {
        let paragraphs: String = (1..=8).map(|i| format!("<p>P{}</p>", i)).collect();
        let html = format!("<html><body>{}</body></html>", paragraphs);
        let text = extract_text(&html);
        assert!(text.contains("P5"));
        assert!(!text.contains("P6"));
    }

    #[test]
    fn test_missing_title_and_body() {
        assert_eq!(extract_text("<html></html>"), "");
    }
}
