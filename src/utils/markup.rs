//! Post text to HTML.
//!
//! Rendering is split in two phases. [`resolve_mentions`] does every store
//! lookup up front and produces a [`MentionTable`]; [`substitute`] is then a
//! pure function of the text and that table.

use std::collections::{HashMap, HashSet};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use crate::store::Store;

/// username -> user id, for mentions that resolved to an existing user.
pub type MentionTable = HashMap<String, String>;

static MENTION: Lazy<Regex> = Lazy::new(|| Regex::new(r"@([A-Za-z0-9_]+)").unwrap());
static BOLD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*\*(.*?)\*\*").unwrap());
static ITALIC: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*(.*?)\*").unwrap());
static UNDERLINE: Lazy<Regex> = Lazy::new(|| Regex::new(r"__(.*?)__").unwrap());
static STRIKE: Lazy<Regex> = Lazy::new(|| Regex::new(r"~~(.*?)~~").unwrap());
static SPOILER: Lazy<Regex> = Lazy::new(|| Regex::new(r"\|\|(.*?)\|\|").unwrap());
static HIGHLIGHT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"==#([0-9a-fA-F]{3,8})==(.*?)==").unwrap()
});

/// Distinct mentioned usernames in first-seen order.
pub fn mentioned_usernames(text: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    MENTION
        .captures_iter(text)
        .map(|captures| captures[1].to_string())
        .filter(|username| seen.insert(username.clone()))
        .collect()
}

/// Phase 1. Each username is looked up once per call; failed lookups are
/// logged and the mention is left unresolved.
pub async fn resolve_mentions(store: &dyn Store, text: &str) -> MentionTable {
    let mut table = MentionTable::new();
    for username in mentioned_usernames(text) {
        match store.find_user_id_by_username(&username).await {
            Ok(Some(user_id)) => {
                table.insert(username, user_id);
            },
            Ok(None) => {},
            Err(error) => log::error!("{:?}", error),
        }
    }
    table
}

/// Phase 2. Escapes the text, links resolved mentions, then applies the
/// inline markdown subset.
pub fn substitute(text: &str, mentions: &MentionTable) -> String {
    let escaped = html_escape::encode_safe(text);

    let linked = MENTION.replace_all(&escaped, |captures: &Captures| {
        let username = &captures[1];
        match mentions.get(username) {
            Some(user_id) => format!(
                "<a href=\"/profile/{}\" data-mention=\"true\" class=\"mention\">@{}</a>",
                html_escape::encode_double_quoted_attribute(user_id),
                username
            ),
            None => captures[0].to_string(),
        }
    });

    let html = BOLD.replace_all(&linked, "<b>$1</b>");
    let html = ITALIC.replace_all(&html, "<i>$1</i>");
    let html = UNDERLINE.replace_all(&html, "<u>$1</u>");
    let html = STRIKE.replace_all(&html, "<s>$1</s>");
    let html = SPOILER.replace_all(&html, "<span class=\"spoiler-text\">$1</span>");
    let html = HIGHLIGHT.replace_all(&html, "<mark style=\"background-color: #$1;\">$2</mark>");

    html.into_owned()
}

pub async fn render(store: &dyn Store, text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }
    let mentions = resolve_mentions(store, text).await;
    substitute(text, &mentions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::account::User;
    use crate::store::{MemoryStore, MockStore};
    use crate::error::StoreError;

    fn table(pairs: &[(&str, &str)]) -> MentionTable {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn formats_markdown_subset() {
        let html = substitute("**bold** *it* __u__ ~~s~~ ||secret||", &MentionTable::new());
        assert_eq!(
            html,
            "<b>bold</b> <i>it</i> <u>u</u> <s>s</s> <span class=\"spoiler-text\">secret</span>"
        );
    }

    #[test]
    fn highlight_accepts_hex_colors_only() {
        assert_eq!(
            substitute("==#ff0000==red==", &MentionTable::new()),
            "<mark style=\"background-color: #ff0000;\">red</mark>"
        );
        assert_eq!(substitute("==#red;x==y==", &MentionTable::new()), "==#red;x==y==");
    }

    #[test]
    fn escapes_html_before_formatting() {
        let html = substitute("<script>**x**</script>", &MentionTable::new());
        assert!(!html.contains("<script>"));
        assert!(html.contains("<b>x</b>"));
    }

    #[test]
    fn links_every_occurrence_of_resolved_mentions() {
        let html = substitute("@anna ciao @bob e ancora @anna", &table(&[("anna", "u1")]));
        assert_eq!(html.matches("href=\"/profile/u1\"").count(), 2);
        assert!(html.contains("@bob"));
        assert!(!html.contains("/profile/bob"));
    }

    #[test]
    fn distinct_usernames_in_order() {
        assert_eq!(mentioned_usernames("@b @a @b"), vec!["b", "a"]);
    }

    #[test]
    fn mentions_are_ascii_usernames() {
        assert!(mentioned_usernames("@àccento").is_empty());
        assert_eq!(mentioned_usernames("ciao @anna_1è"), vec!["anna_1"]);
    }

    #[tokio::test]
    async fn render_resolves_through_store() {
        let store = MemoryStore::new();
        store.insert_user(&User::new("u1", "anna", 0)).await.unwrap();

        let html = render(&store, "ciao @anna e @nessuno").await;
        assert!(html.contains("<a href=\"/profile/u1\" data-mention=\"true\" class=\"mention\">@anna</a>"));
        assert!(html.contains("@nessuno"));
    }

    #[tokio::test]
    async fn each_username_is_looked_up_once() {
        let mut store = MockStore::new();
        store
            .expect_find_user_id_by_username()
            .times(1)
            .returning(|_| Err(StoreError::Unavailable("down".into())));

        let html = render(&store, "@anna @anna").await;
        assert_eq!(html, "@anna @anna");
    }
}
