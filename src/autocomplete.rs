use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::warn;

use crate::client::ClientError;

/// Inputs shorter than this never trigger a lookup.
pub const MIN_QUERY_CHARS: usize = 2;

pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

#[async_trait]
pub trait SchoolLookup: Send + Sync {
    async fn lookup(&self, query: &str) -> Result<Vec<String>, ClientError>;
}

/// Current field text and how it got there.
#[derive(Debug, Clone, Default)]
struct Field {
    text: String,
    picked: bool,
}

/// Debounced school-name suggestions for one text input.
///
/// Every keystroke clears the current suggestions. A lookup only runs once
/// the input has been quiet for the debounce interval, and its result is
/// dropped if the input changed while it was in flight. Picking a suggestion
/// fills the field and closes the list without another lookup.
pub struct Autocomplete {
    input: watch::Sender<Field>,
    suggestions: watch::Receiver<Vec<String>>,
    worker: JoinHandle<()>,
}

impl Autocomplete {
    pub fn spawn<L>(lookup: Arc<L>, debounce: Duration) -> Self
    where
        L: SchoolLookup + 'static,
    {
        let (input, input_rx) = watch::channel(Field::default());
        let (suggestions_tx, suggestions) = watch::channel(Vec::new());
        let worker = tokio::spawn(run(lookup, debounce, input_rx, suggestions_tx));

        Self {
            input,
            suggestions,
            worker,
        }
    }

    pub fn input(&self, text: &str) {
        self.input.send_replace(Field {
            text: text.to_string(),
            picked: false,
        });
    }

    pub fn select(&self, name: &str) {
        self.input.send_replace(Field {
            text: name.to_string(),
            picked: true,
        });
    }

    pub fn text(&self) -> String {
        self.input.borrow().text.clone()
    }

    pub fn suggestions(&self) -> Vec<String> {
        self.suggestions.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Vec<String>> {
        self.suggestions.clone()
    }
}

impl Drop for Autocomplete {
    fn drop(&mut self) {
        self.worker.abort();
    }
}

async fn run<L: SchoolLookup>(
    lookup: Arc<L>,
    debounce: Duration,
    mut input: watch::Receiver<Field>,
    suggestions: watch::Sender<Vec<String>>,
) {
    'changes: while input.changed().await.is_ok() {
        // Restart the quiet window on every change.
        let query = loop {
            let field = input.borrow_and_update().clone();
            suggestions.send_replace(Vec::new());

            if field.picked {
                continue 'changes;
            }

            match tokio::time::timeout(debounce, input.changed()).await {
                Ok(Ok(())) => continue,
                Ok(Err(_)) => return,
                Err(_) => break field.text,
            }
        };

        if query.chars().count() < MIN_QUERY_CHARS {
            continue;
        }

        match lookup.lookup(&query).await {
            Ok(names) => {
                if !input.has_changed().unwrap_or(true) {
                    suggestions.send_replace(names);
                }
            }
            Err(e) => warn!("Error fetching school suggestions: {e}"),
        }
    }
}

/// A run of suggestion text, marked by whether it matched the typed query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment<'a> {
    Plain(&'a str),
    Match(&'a str),
}

/// Splits `text` around case-insensitive occurrences of `query`, left to
/// right and without overlap.
pub fn highlight<'a>(text: &'a str, query: &str) -> Vec<Segment<'a>> {
    let needle: Vec<char> = query.chars().flat_map(char::to_lowercase).collect();
    if needle.is_empty() {
        return vec![Segment::Plain(text)];
    }

    let mut segments = Vec::new();
    let mut plain_start = 0;
    let mut cursor = 0;

    while cursor < text.len() {
        match match_len(&text[cursor..], &needle) {
            Some(len) => {
                if plain_start < cursor {
                    segments.push(Segment::Plain(&text[plain_start..cursor]));
                }
                segments.push(Segment::Match(&text[cursor..cursor + len]));
                cursor += len;
                plain_start = cursor;
            }
            None => {
                cursor += text[cursor..].chars().next().map_or(1, char::len_utf8);
            }
        }
    }

    if plain_start < text.len() {
        segments.push(Segment::Plain(&text[plain_start..]));
    }

    segments
}

/// Byte length of the prefix of `haystack` that equals `needle` once
/// lowercased, if any.
fn match_len(haystack: &str, needle: &[char]) -> Option<usize> {
    let mut matched = 0;
    let mut consumed = 0;

    for ch in haystack.chars() {
        let lowered: Vec<char> = ch.to_lowercase().collect();
        let end = matched + lowered.len();
        if end > needle.len() || needle[matched..end] != lowered[..] {
            return None;
        }
        matched = end;
        consumed += ch.len_utf8();
        if matched == needle.len() {
            return Some(consumed);
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct Directory {
        names: Vec<&'static str>,
        calls: Mutex<Vec<String>>,
    }

    impl Directory {
        fn new(names: Vec<&'static str>) -> Arc<Self> {
            Arc::new(Self {
                names,
                calls: Mutex::new(Vec::new()),
            })
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl SchoolLookup for Directory {
        async fn lookup(&self, query: &str) -> Result<Vec<String>, ClientError> {
            self.calls.lock().unwrap().push(query.to_string());
            let query = query.to_lowercase();
            Ok(self
                .names
                .iter()
                .filter(|name| name.to_lowercase().contains(&query))
                .map(|name| name.to_string())
                .collect())
        }
    }

    fn schools() -> Arc<Directory> {
        Directory::new(vec![
            "Colegio Santa Ana",
            "Institución Educativa San José",
            "Colegio Simón Bolívar",
        ])
    }

    async fn settle() {
        tokio::time::sleep(Duration::from_millis(500)).await;
    }

    #[tokio::test(start_paused = true)]
    async fn rapid_typing_issues_one_lookup() {
        let directory = schools();
        let autocomplete = Autocomplete::spawn(directory.clone(), DEFAULT_DEBOUNCE);

        autocomplete.input("co");
        autocomplete.input("col");
        autocomplete.input("cole");
        settle().await;

        assert_eq!(directory.calls(), vec!["cole"]);
        assert_eq!(
            autocomplete.suggestions(),
            vec!["Colegio Santa Ana", "Colegio Simón Bolívar"]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn pause_shorter_than_debounce_restarts_the_window() {
        let directory = schools();
        let autocomplete = Autocomplete::spawn(directory.clone(), DEFAULT_DEBOUNCE);

        autocomplete.input("sa");
        tokio::time::sleep(Duration::from_millis(100)).await;
        autocomplete.input("san");
        settle().await;

        assert_eq!(directory.calls(), vec!["san"]);
    }

    #[tokio::test(start_paused = true)]
    async fn single_character_never_queries() {
        let directory = schools();
        let autocomplete = Autocomplete::spawn(directory.clone(), DEFAULT_DEBOUNCE);

        autocomplete.input("c");
        settle().await;

        assert!(directory.calls().is_empty());
        assert!(autocomplete.suggestions().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn shortening_input_clears_suggestions() {
        let directory = schools();
        let autocomplete = Autocomplete::spawn(directory.clone(), DEFAULT_DEBOUNCE);

        autocomplete.input("josé");
        settle().await;
        assert_eq!(
            autocomplete.suggestions(),
            vec!["Institución Educativa San José"]
        );

        autocomplete.input("j");
        settle().await;
        assert!(autocomplete.suggestions().is_empty());
        assert_eq!(directory.calls(), vec!["josé"]);
    }

    #[tokio::test(start_paused = true)]
    async fn picking_a_suggestion_closes_the_list_without_searching() {
        let directory = schools();
        let autocomplete = Autocomplete::spawn(directory.clone(), DEFAULT_DEBOUNCE);

        autocomplete.input("san");
        settle().await;
        let picked = autocomplete.suggestions()[0].clone();

        autocomplete.select(&picked);
        settle().await;

        assert_eq!(directory.calls(), vec!["san"]);
        assert!(autocomplete.suggestions().is_empty());
        assert_eq!(autocomplete.text(), picked);
    }

    #[tokio::test(start_paused = true)]
    async fn picking_during_the_quiet_window_cancels_the_lookup() {
        let directory = schools();
        let autocomplete = Autocomplete::spawn(directory.clone(), DEFAULT_DEBOUNCE);

        autocomplete.input("col");
        tokio::time::sleep(Duration::from_millis(100)).await;
        autocomplete.select("Colegio Santa Ana");
        settle().await;

        assert!(directory.calls().is_empty());
        assert!(autocomplete.suggestions().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn typing_after_a_pick_searches_again() {
        let directory = schools();
        let autocomplete = Autocomplete::spawn(directory.clone(), DEFAULT_DEBOUNCE);

        autocomplete.select("Colegio Santa Ana");
        settle().await;
        autocomplete.input("Colegio Sim");
        settle().await;

        assert_eq!(directory.calls(), vec!["Colegio Sim"]);
        assert_eq!(autocomplete.suggestions(), vec!["Colegio Simón Bolívar"]);
    }

    #[test]
    fn highlight_marks_case_insensitive_matches() {
        let segments = highlight("Colegio Santa Ana", "an");
        assert_eq!(
            segments,
            vec![
                Segment::Plain("Colegio S"),
                Segment::Match("an"),
                Segment::Plain("ta "),
                Segment::Match("An"),
                Segment::Plain("a"),
            ]
        );
    }

    #[test]
    fn highlight_handles_accented_text() {
        let segments = highlight("Institución Educativa", "CIÓN");
        assert_eq!(
            segments,
            vec![
                Segment::Plain("Institu"),
                Segment::Match("ción"),
                Segment::Plain(" Educativa"),
            ]
        );
    }

    #[test]
    fn empty_query_leaves_text_plain() {
        assert_eq!(highlight("Colegio", ""), vec![Segment::Plain("Colegio")]);
        assert_eq!(highlight("Colegio", "xyz"), vec![Segment::Plain("Colegio")]);
    }
}
