//! Placeholder resolution
//!
//! Replaces entry-bound placeholders in a parsed token stream with the
//! entry's values. Everything else passes through untouched.

use async_stream::try_stream;
use futures_core::Stream;
use futures_util::TryStreamExt;
use tracing::debug;

use crate::domain::sequence::{parse, Token, DEFAULT_SEQUENCE};

use super::ports::{EntryAccessor, ResolveError};

/// Lazily expand entry placeholders.
///
/// Only `{TOTP}` suspends, since fetching the code may run an external
/// process. A failing TOTP lookup ends the stream with an error instead of
/// typing an empty code.
pub fn expand_placeholders<'a, E, I>(
    entry: &'a E,
    tokens: I,
) -> impl Stream<Item = Result<Token, ResolveError>> + 'a
where
    E: EntryAccessor + ?Sized,
    I: IntoIterator<Item = Token>,
    I::IntoIter: 'a,
{
    let tokens = tokens.into_iter();

    try_stream! {
        for token in tokens {
            match token {
                Token::Username => {
                    yield Token::text(entry.username().unwrap_or_default());
                }
                Token::Password => {
                    yield Token::text(entry.password());
                }
                Token::Totp => {
                    let code = entry.current_totp_code().await?;
                    yield Token::Text(code);
                }
                Token::Attribute(key) => {
                    yield Token::text(entry.custom_attribute(&key).unwrap_or_default());
                }
                other => {
                    yield other;
                }
            }
        }
    }
}

/// Resolve the entry's sequence into a complete token list.
///
/// Uses the entry's own sequence, then `fallback`, then
/// [`DEFAULT_SEQUENCE`]. Blank sequences count as missing. The whole list
/// is materialized so no lookup runs while keys are being typed.
pub async fn resolve_sequence<E>(
    entry: &E,
    fallback: Option<&str>,
) -> Result<Vec<Token>, ResolveError>
where
    E: EntryAccessor + ?Sized,
{
    let sequence = select_sequence(entry.configured_sequence(), fallback);
    debug!(directives = sequence.matches('{').count(), "resolving auto-type sequence");

    expand_placeholders(entry, parse(sequence))
        .try_collect()
        .await
}

fn select_sequence<'a>(configured: Option<&'a str>, fallback: Option<&'a str>) -> &'a str {
    configured
        .filter(|s| !s.is_empty())
        .or(fallback.filter(|s| !s.is_empty()))
        .unwrap_or(DEFAULT_SEQUENCE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct MockEntry {
        username: Option<String>,
        password: String,
        attributes: HashMap<String, String>,
        totp: Result<String, ResolveError>,
        sequence: Option<String>,
        totp_calls: AtomicUsize,
    }

    impl MockEntry {
        fn alice() -> Self {
            Self {
                username: Some("alice".to_string()),
                password: "p@ss".to_string(),
                attributes: HashMap::from([("pin".to_string(), "1234".to_string())]),
                totp: Ok("654321".to_string()),
                sequence: None,
                totp_calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl EntryAccessor for MockEntry {
        fn username(&self) -> Option<&str> {
            self.username.as_deref()
        }

        fn password(&self) -> &str {
            &self.password
        }

        fn custom_attribute(&self, key: &str) -> Option<&str> {
            self.attributes.get(key).map(String::as_str)
        }

        async fn current_totp_code(&self) -> Result<String, ResolveError> {
            self.totp_calls.fetch_add(1, Ordering::SeqCst);
            self.totp.clone()
        }

        fn configured_sequence(&self) -> Option<&str> {
            self.sequence.as_deref()
        }
    }

    async fn resolve(entry: &MockEntry, sequence: &str) -> Result<Vec<Token>, ResolveError> {
        expand_placeholders(entry, parse(sequence)).try_collect().await
    }

    #[tokio::test]
    async fn resolves_default_credentials() {
        let entry = MockEntry::alice();
        let tokens = resolve(&entry, "{USERNAME}{TAB}{PASSWORD}{ENTER}")
            .await
            .unwrap();

        assert_eq!(
            tokens,
            vec![
                Token::text("alice"),
                Token::text("\t"),
                Token::text("p@ss"),
                Token::text("\n"),
            ]
        );
    }

    #[tokio::test]
    async fn missing_sequence_uses_default() {
        let entry = MockEntry::alice();
        let implicit = resolve_sequence(&entry, None).await.unwrap();
        let explicit = resolve(&entry, DEFAULT_SEQUENCE).await.unwrap();
        assert_eq!(implicit, explicit);
    }

    #[tokio::test]
    async fn empty_sequence_counts_as_missing() {
        let entry = MockEntry {
            sequence: Some(String::new()),
            ..MockEntry::alice()
        };
        let tokens = resolve_sequence(&entry, None).await.unwrap();
        assert_eq!(tokens[0], Token::text("alice"));
        assert_eq!(tokens.len(), 4);
    }

    #[tokio::test]
    async fn configured_sequence_wins_over_fallback() {
        let entry = MockEntry {
            sequence: Some("{PASSWORD}".to_string()),
            ..MockEntry::alice()
        };
        let tokens = resolve_sequence(&entry, Some("{USERNAME}")).await.unwrap();
        assert_eq!(tokens, vec![Token::text("p@ss")]);
    }

    #[tokio::test]
    async fn fallback_used_without_configured_sequence() {
        let entry = MockEntry::alice();
        let tokens = resolve_sequence(&entry, Some("{USERNAME}{ENTER}"))
            .await
            .unwrap();
        assert_eq!(tokens, vec![Token::text("alice"), Token::text("\n")]);
    }

    #[tokio::test]
    async fn missing_username_becomes_empty_text() {
        let entry = MockEntry {
            username: None,
            ..MockEntry::alice()
        };
        let tokens = resolve(&entry, "{USERNAME}").await.unwrap();
        assert_eq!(tokens, vec![Token::text("")]);
    }

    #[tokio::test]
    async fn attributes_resolve_or_default_to_empty() {
        let entry = MockEntry::alice();
        let tokens = resolve(&entry, "{S:pin}{S:missing}").await.unwrap();
        assert_eq!(tokens, vec![Token::text("1234"), Token::text("")]);
    }

    #[tokio::test]
    async fn totp_is_fetched_once_per_placeholder() {
        let entry = MockEntry::alice();
        let tokens = resolve(&entry, "{TOTP}{ENTER}").await.unwrap();
        assert_eq!(tokens, vec![Token::text("654321"), Token::text("\n")]);
        assert_eq!(entry.totp_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn totp_failure_propagates() {
        let entry = MockEntry {
            totp: Err(ResolveError::Totp("no TOTP configured".to_string())),
            ..MockEntry::alice()
        };
        let err = resolve(&entry, "{USERNAME}{TOTP}").await.unwrap_err();
        assert!(err.to_string().contains("no TOTP configured"));
    }

    #[tokio::test]
    async fn non_placeholders_pass_through() {
        let entry = MockEntry::alice();
        let tokens = resolve(&entry, "{TITLE}{HOME}{F3}{DELAY=5}{NOPE}")
            .await
            .unwrap();
        assert_eq!(
            tokens,
            vec![
                Token::Title,
                Token::Special(crate::domain::sequence::SpecialKey::Home),
                Token::Function(3),
                Token::SetDelay(5),
                Token::Unknown("{NOPE}".to_string()),
            ]
        );
    }

    #[test]
    fn select_sequence_order() {
        assert_eq!(select_sequence(Some("{A}"), Some("{B}")), "{A}");
        assert_eq!(select_sequence(None, Some("{B}")), "{B}");
        assert_eq!(select_sequence(Some(""), Some("")), DEFAULT_SEQUENCE);
        assert_eq!(select_sequence(None, None), DEFAULT_SEQUENCE);
    }
}
