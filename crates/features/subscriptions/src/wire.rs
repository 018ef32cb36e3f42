//! Search URL and response body of the subscription search endpoint.

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use serde::Deserialize;

/// Everything except unreserved characters, so a value stays inside its matrix parameter.
const MATRIX_VALUE: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'_').remove(b'.').remove(b'~');
const SKU_LIST: &AsciiSet = &MATRIX_VALUE.remove(b',');

#[derive(Debug, Deserialize)]
pub(crate) struct SubscriptionDetails {
    #[serde(default, alias = "Entries")]
    entries: Vec<Entry>,
}

#[derive(Debug, Deserialize)]
struct Entry {
    #[serde(alias = "Value")]
    value: String,
}

/// Flattens the body into SKUs, keeping upstream order and duplicates.
///
/// # Errors
/// The body is not a JSON array of `{"entries": [{"value": ..}]}` objects.
pub(crate) fn parse_skus(body: &[u8]) -> Result<Vec<String>, serde_json::Error> {
    let details: Vec<SubscriptionDetails> = serde_json::from_slice(body)?;
    Ok(details.into_iter().flat_map(|d| d.entries).map(|e| e.value).collect())
}

/// Search URL for one organization, with the SKU filter segment only when given.
pub(crate) fn search_url(host: &str, org_id: &str, sku_filter: Option<&str>) -> String {
    let host = host.trim_end_matches('/');
    let org_id = utf8_percent_encode(org_id, MATRIX_VALUE);
    let sku = sku_filter
        .map(|f| format!(";sku={}", utf8_percent_encode(f, SKU_LIST)))
        .unwrap_or_default();

    format!(
        "{host}/svcrest/subscription/v5/search/criteria;web_customer_id={org_id}{sku};status=active/options;products=ALL/product.sku|product.name"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flattens_entries_in_order() {
        let body = br#"[
            {"entries": [{"value": "SVC123"}, {"value": "MCT3691"}]},
            {"entries": []},
            {"entries": [{"value": "SVC123"}]}
        ]"#;

        assert_eq!(parse_skus(body).expect("valid body"), ["SVC123", "MCT3691", "SVC123"]);
    }

    #[test]
    fn accepts_capitalized_keys() {
        let body = br#"[{"Entries": [{"Value": "MCT1122"}]}]"#;
        assert_eq!(parse_skus(body).expect("valid body"), ["MCT1122"]);
    }

    #[test]
    fn rejects_non_array_body() {
        assert!(parse_skus(b"{\"entries\": []}").is_err());
        assert!(parse_skus(b"<html>").is_err());
    }

    #[test]
    fn builds_url_with_and_without_filter() {
        assert_eq!(
            search_url("https://subs.example/", "4384938490324", Some("MCT1122,SVC3124")),
            "https://subs.example/svcrest/subscription/v5/search/criteria;web_customer_id=4384938490324;sku=MCT1122,SVC3124;status=active/options;products=ALL/product.sku|product.name"
        );
        assert!(!search_url("https://subs.example", "1", None).contains(";sku="));
    }

    #[test]
    fn reserved_characters_stay_inside_the_org_parameter() {
        let url = search_url("https://subs.example", "123#", Some("MCT1122"));
        assert!(url.contains(";web_customer_id=123%23;sku=MCT1122;status=active/"));

        let parsed = reqwest::Url::parse(&url).expect("valid url");
        assert_eq!(parsed.fragment(), None);
        assert_eq!(parsed.query(), None);
        assert!(parsed.path().contains(";sku=MCT1122;status=active/options"));

        let url = search_url("https://subs.example", "1;status=x/../?a", None);
        assert!(url.contains(";web_customer_id=1%3Bstatus%3Dx%2F..%2F%3Fa;status=active/"));
    }
}
