use bigdecimal::BigDecimal;
use mockito::{mock, Matcher};
use quotedata::*;
use serde_json::json;
use std::str::FromStr;

fn client() -> QuoteClient {
    QuoteClient::with_urls(&mockito::server_url(), &mockito::server_url()).unwrap()
}

fn quote_query(code: &str) -> Matcher {
    Matcher::AllOf(vec![
        Matcher::UrlEncoded("client".into(), "ig".into()),
        Matcher::UrlEncoded("q".into(), code.into()),
    ])
}

#[test]
fn test_get_quote() {
    let response_body = format!(
        "\n// {}",
        json!([{
            "id": "22144",
            "t": "AAPL",
            "e": "NASDAQ",
            "l": "114.06",
            "l_cur": "114.06",
            "ltt": "4:00PM EDT",
            "lt_dts": "2016-10-07T16:00:02Z",
            "lt": "Oct 7, 4:00PM EDT"
        }])
    );
    let m = mock("GET", "/finance/info")
        .match_query(quote_query("NASDAQ:AAPL"))
        .with_status(200)
        .with_body(&response_body)
        .create();

    let quote = client()
        .execute(GetQuote {
            code: "NASDAQ:AAPL".to_owned(),
        })
        .unwrap();
    m.assert();
    assert_eq!("AAPL", quote.ticker);
    assert_eq!("NASDAQ", quote.venue);
    assert_eq!(BigDecimal::from_str("114.06").unwrap(), quote.price);
    assert_eq!("2016-10-07T16:00:02+00:00", quote.observed_at.to_rfc3339());
}

#[test]
fn test_get_quote_empty_list() {
    let _m = mock("GET", "/finance/info")
        .match_query(quote_query("NYSE:NOPE"))
        .with_status(200)
        .with_body("// []")
        .create();

    let err = client()
        .execute(GetQuote {
            code: "NYSE:NOPE".to_owned(),
        })
        .unwrap_err();
    assert!(matches!(err, Error::Parse(..)), "unexpected error: {:?}", err);
}

#[test]
fn test_get_quote_missing_timestamp() {
    let response_body = json!([{"t": "GE", "e": "NYSE", "l": "29.61"}]).to_string();
    let _m = mock("GET", "/finance/info")
        .match_query(quote_query("NYSE:GE"))
        .with_status(200)
        .with_body(&response_body)
        .create();

    let err = client()
        .execute(GetQuote {
            code: "NYSE:GE".to_owned(),
        })
        .unwrap_err();
    assert!(matches!(err, Error::MissingField("lt_dts")), "unexpected error: {:?}", err);
}

#[test]
fn test_get_quote_server_error() {
    let _m = mock("GET", "/finance/info")
        .match_query(quote_query("NYSE:JNJ"))
        .with_status(503)
        .create();

    let err = client()
        .execute(GetQuote {
            code: "NYSE:JNJ".to_owned(),
        })
        .unwrap_err();
    assert!(matches!(err, Error::Status(503, _)), "unexpected error: {:?}", err);
}

#[test]
fn test_get_company() {
    let page = r#"<!DOCTYPE html>
<html><head><title>Microsoft Corporation</title></head>
<body>
  <div id="appbar">
    <div class="appbar-snippet-primary"><span>Microsoft Corporation</span></div>
    <div class="appbar-snippet-secondary"><span>(NASDAQ:MSFT)</span></div>
  </div>
</body></html>"#;
    let m = mock("GET", "/finance")
        .match_query(Matcher::UrlEncoded("q".into(), "NASDAQ:MSFT".into()))
        .match_header("user-agent", Matcher::Regex("Mozilla".into()))
        .with_status(200)
        .with_body(page)
        .create();

    let company = client()
        .execute(GetCompany {
            code: "NASDAQ:MSFT".to_owned(),
        })
        .unwrap();
    m.assert();
    assert_eq!(
        Company {
            name: "Microsoft Corporation".to_owned(),
            venue: "NASDAQ".to_owned(),
        },
        company
    );
}

#[test]
fn test_get_company_without_snippet() {
    let _m = mock("GET", "/finance")
        .match_query(Matcher::UrlEncoded("q".into(), "NYSE:CHL".into()))
        .with_status(200)
        .with_body("<html><body><p>not found</p></body></html>")
        .create();

    let err = client()
        .execute(GetCompany {
            code: "NYSE:CHL".to_owned(),
        })
        .unwrap_err();
    assert!(matches!(err, Error::MissingField(..)), "unexpected error: {:?}", err);
}
