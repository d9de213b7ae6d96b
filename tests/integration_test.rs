//! 集成测试

use gofile_direct_link::gofile;

const SITE: &str = "https://gofile.io";

#[test]
fn test_extract_content_id_valid() {
    let test_cases = vec![
        ("https://gofile.io/d/en4HXu", Some(String::from("en4HXu"))),
        ("https://gofile.io/d/YbiRbg?ref=home", Some(String::from("YbiRbg"))),
        ("https://gofile.io/d/mnaS35/", Some(String::from("mnaS35"))),
    ];

    for (url, expected) in test_cases {
        let result = gofile::extract_content_id(url, SITE);
        assert_eq!(result, expected, "Failed for URL: {}", url);
    }
}

#[test]
fn test_extract_content_id_invalid() {
    let invalid_urls = vec![
        "https://example.com/d/en4HXu",
        "not-a-url",
        "https://gofile.io/other/path",
        "https://drive.example.org/s/1abc123",
        "",
    ];

    for url in invalid_urls {
        let result = gofile::extract_content_id(url, SITE);
        assert!(
            result.is_none(),
            "Should return None for invalid URL: {}",
            url
        );
    }
}

#[test]
fn test_password_digest_distinguishes_missing_password() {
    assert_eq!(gofile::password_digest(None), "");
    assert_eq!(gofile::password_digest(Some("pw")).len(), 64);
}
