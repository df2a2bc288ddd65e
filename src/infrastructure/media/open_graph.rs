//! Scrapes the `og:video` meta tag from the post page.

use anyhow::{Result, bail};
use regex::Regex;

use crate::domain::types::ProviderResult;

const BROWSER_UA: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

const OG_VIDEO: &str = r#"<meta\s+property=["']og:video(?::secure_url)?["']\s+content=["']([^"']+)["']"#;

pub(super) fn find_video(html: &str) -> Result<Option<String>> {
    let re = Regex::new(OG_VIDEO)?;
    Ok(re
        .captures(html)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().replace("&amp;", "&")))
}

pub(super) async fn scrape(http: &reqwest::Client, url: &str) -> Result<ProviderResult> {
    let html = http
        .get(url)
        .header(reqwest::header::USER_AGENT, BROWSER_UA)
        .send()
        .await?
        .text()
        .await?;
    match find_video(&html)? {
        Some(video) => Ok(ProviderResult::RemoteUrl(video)),
        None => bail!("No og:video found"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_finds_secure_url_and_unescapes() {
        let html = r#"<head><meta property="og:video:secure_url" content="https://cdn.example/v.mp4?a=1&amp;b=2" /></head>"#;
        assert_eq!(
            find_video(html).unwrap().as_deref(),
            Some("https://cdn.example/v.mp4?a=1&b=2")
        );
    }

    #[test]
    fn test_single_quotes_and_missing_tag() {
        let html = "<meta property='og:video' content='https://cdn.example/x.mp4'>";
        assert_eq!(find_video(html).unwrap().as_deref(), Some("https://cdn.example/x.mp4"));
        assert_eq!(find_video("<meta property=\"og:image\" content=\"x\">").unwrap(), None);
    }
}
