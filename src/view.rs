use crate::controller::SearchState;
use crate::data_models::{SearchResponse, SearchResult};
use crate::year_filter::YearRange;

/// Static suggestion list shown on the idle screen. Display-only, no logic.
pub const POPULAR_TERMS: [&str; 10] = [
    "machine learning",
    "deep learning",
    "neural networks",
    "natural language processing",
    "computer vision",
    "reinforcement learning",
    "transfer learning",
    "attention mechanisms",
    "transformers",
    "generative models",
];

pub struct ViewOptions {
    /// Shown in the error panel so the user knows where the client expected
    /// to find the server.
    pub endpoint: String,
    pub show_key_terms: bool,
    /// When set, only result cards whose year falls inside the range are
    /// rendered. Results without a year are always kept.
    pub year_range: Option<YearRange>,
}

/// Pure function of controller state: same state, same string.
pub fn render(state: &SearchState, options: &ViewOptions) -> String {
    match state {
        SearchState::Idle => render_idle(),
        SearchState::Loading => "Searching...\n".to_string(),
        SearchState::Failed(err) => render_error(&err.to_string(), &options.endpoint),
        SearchState::Ready(response) => render_results(response, options),
    }
}

/// 0.93 -> "93.0%". The model keeps similarity as a fraction; this is the
/// only place it is scaled.
pub fn format_similarity(similarity: f64) -> String {
    format!("{:.1}%", similarity * 100.0)
}

fn render_idle() -> String {
    let mut out = String::from("Enter a search query to find research papers\n");
    out.push_str("\nPopular search terms:\n");
    for term in POPULAR_TERMS {
        out.push_str("  ");
        out.push_str(term);
        out.push('\n');
    }
    out
}

fn render_error(message: &str, endpoint: &str) -> String {
    format!(
        "Error: {message}\nPlease make sure the search server is running at {endpoint}\n"
    )
}

fn render_results(response: &SearchResponse, options: &ViewOptions) -> String {
    let visible: Vec<&SearchResult> = response
        .results
        .iter()
        .filter(|result| in_range(result, options.year_range.as_ref()))
        .collect();

    if visible.is_empty() {
        return "No results found. Try a different search query.\n".to_string();
    }

    let mut out = format!("Found {} results\n", visible.len());
    if options.show_key_terms && !response.key_terms.is_empty() {
        out.push_str("Key terms: ");
        out.push_str(&response.key_terms.join(", "));
        out.push('\n');
    }
    for result in visible {
        out.push('\n');
        out.push_str(&render_card(result));
    }
    out
}

fn in_range(result: &SearchResult, range: Option<&YearRange>) -> bool {
    match (range, result.year) {
        (Some(range), Some(year)) => range.contains(year),
        _ => true,
    }
}

fn render_card(result: &SearchResult) -> String {
    let mut card = format!("{}\n", result.title);
    if let Some(year) = result.year {
        card.push_str(&format!("  Year: {year}\n"));
    }
    if !result.snippet.is_empty() {
        card.push_str(&format!("  {}\n", result.snippet));
    }
    card.push_str(&format!(
        "  Similarity: {}\n",
        format_similarity(result.similarity)
    ));
    if let Some(url) = &result.url {
        card.push_str(&format!("  Read paper: {url}\n"));
    }
    card
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search_client::SearchError;

    fn options() -> ViewOptions {
        ViewOptions {
            endpoint: "http://localhost:5000".to_string(),
            show_key_terms: false,
            year_range: None,
        }
    }

    fn result(title: &str, year: Option<i32>, similarity: f64) -> SearchResult {
        SearchResult {
            id: Some(format!("id-{title}")),
            title: title.to_string(),
            year,
            snippet: format!("about {title}"),
            similarity,
            url: Some("http://x".to_string()),
        }
    }

    #[test]
    fn test_format_similarity_one_decimal_percent() {
        assert_eq!(format_similarity(0.93), "93.0%");
        assert_eq!(format_similarity(0.876), "87.6%");
        assert_eq!(format_similarity(1.0), "100.0%");
        assert_eq!(format_similarity(0.0), "0.0%");
    }

    #[test]
    fn test_render_result_card() {
        let response = SearchResponse {
            results: vec![result("Attention Is All You Need", Some(2017), 0.93)],
            key_terms: vec![],
        };
        let out = render(&SearchState::Ready(response), &options());
        assert!(out.contains("Found 1 results"));
        assert!(out.contains("Attention Is All You Need"));
        assert!(out.contains("Year: 2017"));
        assert!(out.contains("Similarity: 93.0%"));
        assert!(out.contains("Read paper: http://x"));
    }

    #[test]
    fn test_render_empty_results() {
        let out = render(&SearchState::Ready(SearchResponse::default()), &options());
        assert!(out.contains("No results found"));
    }

    #[test]
    fn test_render_error_panel_has_message_and_hint() {
        let out = render(
            &SearchState::Failed(SearchError::HttpStatus {
                status: 500,
                message: "index unavailable".to_string(),
            }),
            &options(),
        );
        assert!(out.contains("Error: index unavailable"));
        assert!(out.contains("running at http://localhost:5000"));
    }

    #[test]
    fn test_render_idle_and_loading() {
        assert!(render(&SearchState::Idle, &options()).contains("transformers"));
        assert!(render(&SearchState::Loading, &options()).contains("Searching..."));
    }

    #[test]
    fn test_key_terms_only_behind_flag() {
        let response = SearchResponse {
            results: vec![result("A", None, 0.5)],
            key_terms: vec!["attention".to_string(), "transformers".to_string()],
        };
        let state = SearchState::Ready(response);

        let hidden = render(&state, &options());
        assert!(!hidden.contains("Key terms:"));

        let mut opts = options();
        opts.show_key_terms = true;
        let shown = render(&state, &opts);
        assert!(shown.contains("Key terms: attention, transformers"));
    }

    #[test]
    fn test_year_range_narrows_cards_but_keeps_yearless() {
        let response = SearchResponse {
            results: vec![
                result("Old", Some(1995), 0.9),
                result("New", Some(2020), 0.8),
                result("Undated", None, 0.7),
            ],
            key_terms: vec![],
        };
        let mut opts = options();
        let mut range = YearRange::all();
        range.set_min(2010);
        opts.year_range = Some(range);

        let out = render(&SearchState::Ready(response), &opts);
        assert!(!out.contains("Old"));
        assert!(out.contains("New"));
        assert!(out.contains("Undated"));
        assert!(out.contains("Found 2 results"));
    }
}
