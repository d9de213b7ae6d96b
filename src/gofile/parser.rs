//! 链接解析

use url::Url;

use super::error::ResolveError;

/// 从分享链接中提取 content id
///
/// 只支持 `{site_base}/d/<id>`，例如：
/// - https://gofile.io/d/en4HXu
/// - https://gofile.io/d/en4HXu?foo=bar（query / fragment 忽略）
pub fn extract_content_id(share_url: &str, site_base: &str) -> Option<String> {
    let url = Url::parse(share_url.trim()).ok()?;
    let base = Url::parse(site_base).ok()?;

    if url.scheme() != base.scheme()
        || url.host_str() != base.host_str()
        || url.port_or_known_default() != base.port_or_known_default()
    {
        return None;
    }

    let segments: Vec<&str> = url.path_segments()?.filter(|s| !s.is_empty()).collect();
    match segments.as_slice() {
        ["d", id] if is_content_id(id) => Some((*id).to_string()),
        _ => None,
    }
}

/// 根引用可以是分享链接，也可以直接是 content id
pub fn parse_root_ref(root_ref: &str, site_base: &str) -> Result<String, ResolveError> {
    let root_ref = root_ref.trim();

    if root_ref.contains("://") {
        return extract_content_id(root_ref, site_base)
            .ok_or_else(|| ResolveError::InvalidInput(format!("invalid url: {}", root_ref)));
    }

    if is_content_id(root_ref) {
        Ok(root_ref.to_string())
    } else {
        Err(ResolveError::InvalidInput(format!(
            "invalid content id: {}",
            root_ref
        )))
    }
}

fn is_content_id(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    const SITE: &str = "https://gofile.io";

    #[test]
    fn test_extract_content_id() {
        assert_eq!(
            extract_content_id("https://gofile.io/d/en4HXu", SITE),
            Some("en4HXu".to_string())
        );
        assert_eq!(
            extract_content_id("  https://gofile.io/d/en4HXu/  ", SITE),
            Some("en4HXu".to_string())
        );
        assert_eq!(
            extract_content_id("https://gofile.io/d/a1-b_2?x=1#top", SITE),
            Some("a1-b_2".to_string())
        );
    }

    #[test]
    fn test_extract_content_id_rejects_other_forms() {
        for url in [
            "http://gofile.io/d/abc",
            "https://example.com/d/abc",
            "https://gofile.io/s/abc",
            "https://gofile.io/d/",
            "https://gofile.io/d/abc/def",
            "not-a-url",
            "",
        ] {
            assert_eq!(extract_content_id(url, SITE), None, "url: {}", url);
        }
    }

    #[test]
    fn test_parse_root_ref() {
        assert_eq!(parse_root_ref("en4HXu", SITE).unwrap(), "en4HXu");
        assert_eq!(
            parse_root_ref("https://gofile.io/d/en4HXu", SITE).unwrap(),
            "en4HXu"
        );
        assert!(matches!(
            parse_root_ref("https://drive.example.org/s/1abc", SITE),
            Err(ResolveError::InvalidInput(_))
        ));
        assert!(matches!(
            parse_root_ref("a b", SITE),
            Err(ResolveError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_custom_site_base_with_port() {
        let site = "http://127.0.0.1:8080";
        assert_eq!(
            extract_content_id("http://127.0.0.1:8080/d/xyz", site),
            Some("xyz".to_string())
        );
        assert_eq!(extract_content_id("http://127.0.0.1:9090/d/xyz", site), None);
    }
}
