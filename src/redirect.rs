//! Redirect token extraction
//!
//! Identity providers redirect back into the app with a custom-scheme URL
//! that carries the session tokens either in the fragment or in the query
//! string, percent-encoded or not. This module recovers the
//! `access_token`/`refresh_token` pair from such a URL without ever failing:
//! a URL that carries no recognizable pair is the common case (any deep link
//! that is not an auth callback) and yields `None`.
//!
//! Three strategies are tried in order, first success wins:
//!
//! 1. Raw scan for fragment-style parameters. Tried first because strict URL
//!    parsers silently drop fragment parameters, which several providers use
//!    for token delivery. The ordering is a compatibility contract, not a
//!    style choice.
//! 2. Structured parse via [`url::Url`], reading the query pairs and then the
//!    fragment re-interpreted as a query string.
//! 3. Manual split at the first `#` or `?`, parsing the remainder as a
//!    query-parameter block. Covers custom schemes the structured parser
//!    rejects.

use std::borrow::Cow;

use log::debug;
use url::Url;

use crate::models::TokenPair;

const ACCESS_TOKEN_KEY: &str = "access_token";
const REFRESH_TOKEN_KEY: &str = "refresh_token";

/// Extract an access/refresh token pair from a redirect URL
///
/// Pure function: never mutates or stores its input, never panics, and
/// treats every internal parse failure as "this strategy found nothing".
/// Returns `None` when the URL does not carry both tokens - including the
/// partial case where only one of the two is present.
#[must_use]
pub fn extract_token_pair(redirect_url: &str) -> Option<TokenPair> {
    if redirect_url.is_empty() {
        return None;
    }

    let pair = scan_raw_params(redirect_url)
        .or_else(|| parse_structured(redirect_url))
        .or_else(|| split_param_block(redirect_url));

    if pair.is_some() {
        debug!("Recovered token pair from redirect URL");
    } else {
        debug!("Redirect URL carries no token pair");
    }
    pair
}

/// Strategy 1: scan the raw string for fragment-style parameters
///
/// Matches `access_token=`/`refresh_token=` only when immediately preceded
/// by `#` or `&`, capturing up to the next `&` or end of string, then
/// percent-decodes the captured values.
fn scan_raw_params(raw: &str) -> Option<TokenPair> {
    let access = scan_value(raw, ACCESS_TOKEN_KEY)?;
    let refresh = scan_value(raw, REFRESH_TOKEN_KEY)?;
    TokenPair::new(access, refresh)
}

fn scan_value(raw: &str, key: &str) -> Option<String> {
    let needle = format!("{key}=");
    let mut from = 0;
    while let Some(found) = raw[from..].find(&needle) {
        let at = from + found;
        // `#` and `&` are single-byte, so byte inspection is safe here
        if at > 0 && matches!(raw.as_bytes()[at - 1], b'#' | b'&') {
            let start = at + needle.len();
            let end = raw[start..].find('&').map_or(raw.len(), |i| start + i);
            let value = &raw[start..end];
            if !value.is_empty() {
                // A value that decodes to invalid UTF-8 fails this
                // strategy, not the call
                return urlencoding::decode(value).ok().map(Cow::into_owned);
            }
        }
        from = at + needle.len();
    }
    None
}

/// Strategy 2: structured URL parse, query pairs first, then the fragment
/// re-parsed as its own query string
fn parse_structured(raw: &str) -> Option<TokenPair> {
    let url = Url::parse(raw).ok()?;

    if let Some(pair) = pair_from_params(url.query_pairs()) {
        return Some(pair);
    }
    url.fragment()
        .and_then(|fragment| pair_from_params(url::form_urlencoded::parse(fragment.as_bytes())))
}

/// Strategy 3: split at the first `#` or `?` and parse the remainder as a
/// query-parameter block
fn split_param_block(raw: &str) -> Option<TokenPair> {
    let at = raw.find(['#', '?'])?;
    let block = &raw[at + 1..];
    pair_from_params(url::form_urlencoded::parse(block.as_bytes()))
}

fn pair_from_params<'a>(params: impl Iterator<Item = (Cow<'a, str>, Cow<'a, str>)>) -> Option<TokenPair> {
    let mut access = None;
    let mut refresh = None;
    for (key, value) in params {
        match key.as_ref() {
            ACCESS_TOKEN_KEY if access.is_none() => access = Some(value.into_owned()),
            REFRESH_TOKEN_KEY if refresh.is_none() => refresh = Some(value.into_owned()),
            _ => {}
        }
    }
    TokenPair::new(access?, refresh?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair(access: &str, refresh: &str) -> TokenPair {
        TokenPair::new(access.to_string(), refresh.to_string()).unwrap()
    }

    #[test]
    fn test_fragment_tokens_extracted() {
        let result = extract_token_pair(
            "app://#access_token=abc123&refresh_token=xyz789&token_type=bearer",
        );
        assert_eq!(result, Some(pair("abc123", "xyz789")));
    }

    #[test]
    fn test_query_tokens_extracted() {
        let result = extract_token_pair("app://?access_token=abc%20123&refresh_token=xyz789");
        assert_eq!(result, Some(pair("abc 123", "xyz789")));
    }

    #[test]
    fn test_path_then_fragment_tokens() {
        let result =
            extract_token_pair("app://callback#access_token=aaa&refresh_token=bbb&expires_in=3600");
        assert_eq!(result, Some(pair("aaa", "bbb")));
    }

    #[test]
    fn test_https_redirect_with_query() {
        let result = extract_token_pair(
            "https://example.com/auth/callback?state=s&access_token=aaa&refresh_token=bbb",
        );
        assert_eq!(result, Some(pair("aaa", "bbb")));
    }

    #[test]
    fn test_percent_encoded_fragment_values_decoded() {
        let result =
            extract_token_pair("app://#access_token=a%2Fb%3Dc&refresh_token=r%20t");
        assert_eq!(result, Some(pair("a/b=c", "r t")));
    }

    #[test]
    fn test_missing_refresh_token_is_absence() {
        assert_eq!(extract_token_pair("app://#access_token=onlyone"), None);
    }

    #[test]
    fn test_missing_access_token_is_absence() {
        assert_eq!(extract_token_pair("app://#refresh_token=onlyone"), None);
    }

    #[test]
    fn test_plain_deep_link_is_absence() {
        assert_eq!(extract_token_pair("app://callback"), None);
    }

    #[test]
    fn test_empty_input_is_absence() {
        assert_eq!(extract_token_pair(""), None);
    }

    #[test]
    fn test_not_a_url_is_absence() {
        assert_eq!(extract_token_pair("not a url"), None);
    }

    #[test]
    fn test_empty_token_values_are_absence() {
        assert_eq!(
            extract_token_pair("app://#access_token=&refresh_token=bbb"),
            None
        );
        assert_eq!(
            extract_token_pair("app://?access_token=aaa&refresh_token="),
            None
        );
    }

    #[test]
    fn test_key_substring_does_not_match() {
        // `xaccess_token` must not satisfy the access_token capture
        assert_eq!(
            extract_token_pair("app://#xaccess_token=aaa&refresh_token=bbb"),
            None
        );
    }

    #[test]
    fn test_scheme_rejected_by_parser_falls_back_to_split() {
        // A parameter block behind a bare `?` with no parseable scheme
        let result = extract_token_pair("callback?access_token=aaa&refresh_token=bbb");
        assert_eq!(result, Some(pair("aaa", "bbb")));
    }

    #[test]
    fn test_fragment_scan_takes_priority_over_structured_parse() {
        // The raw scan keeps `+` literal; the structured parser would have
        // read it as an encoded space. Observing the literal value proves
        // the scan runs first, which is the documented precedence contract.
        let result = extract_token_pair("app://cb#access_token=a+b&refresh_token=r+t");
        assert_eq!(result, Some(pair("a+b", "r+t")));
    }

    #[test]
    fn test_extraneous_parameters_ignored() {
        let result = extract_token_pair(
            "app://#token_type=bearer&access_token=aaa&expires_in=3600&refresh_token=bbb&provider=google",
        );
        assert_eq!(result, Some(pair("aaa", "bbb")));
    }

    #[test]
    fn test_extraction_is_idempotent() {
        let url = "app://#access_token=abc123&refresh_token=xyz789";
        assert_eq!(extract_token_pair(url), extract_token_pair(url));
    }

    #[test]
    fn test_broken_percent_sequence_kept_literally() {
        // `%zz` is not a valid percent sequence; decoding keeps the literal
        // bytes instead of failing the whole extraction
        let result = extract_token_pair("app://cb#access_token=a%zz&refresh_token=bbb");
        assert_eq!(result, Some(pair("a%zz", "bbb")));
    }
}
