//! HTML fragments for the search page: loading placeholder, result cards,
//! empty state, error banner, status strip, and the full page document.

use std::fmt::Write as _;
use std::time::Duration;

use crate::format::{algorithm_name, escape_html, format_price};
use crate::page::{PageSnapshot, ResultsSink};
use crate::types::{CarRecord, SearchMethod};

pub const LOADING_HTML: &str = r#"<div class="loading">🔍 Buscando...</div>"#;

pub const EMPTY_HTML: &str = concat!(
    r#"<div class="empty">"#,
    "🔍 Nenhum resultado encontrado.<br>",
    "Tente outro termo de busca.",
    "</div>"
);

/// Replace the container content with the cards for `results`.
///
/// `None` and an empty slice both render the empty-state message.
pub fn render_results(container: &dyn ResultsSink, results: Option<&[CarRecord]>) {
    container.replace(results_html(results));
}

/// Markup for a result set: one card per record, in input order.
pub fn results_html(results: Option<&[CarRecord]>) -> String {
    let cars = match results {
        Some(cars) if !cars.is_empty() => cars,
        _ => return EMPTY_HTML.to_string(),
    };

    let mut html = String::from("<div class=\"results-grid\">\n");
    for car in cars {
        html.push_str(&card_html(car));
    }
    html.push_str("</div>");
    html
}

fn card_html(car: &CarRecord) -> String {
    format!(
        concat!(
            "<div class=\"car-card\">\n",
            "  <div class=\"car-brand\">{brand}</div>\n",
            "  <div class=\"car-model\">{model}</div>\n",
            "  <div class=\"car-details\">\n",
            "    <span class=\"car-year\">📅 {year}</span>\n",
            "    <span class=\"car-price\">{price}</span>\n",
            "  </div>\n",
            "</div>\n",
        ),
        brand = escape_html(&car.brand),
        model = escape_html(&car.model),
        year = car.year,
        price = format_price(car.price),
    )
}

/// Status strip for a completed search.
pub fn status_html(count: u64, elapsed: Duration, method: &str) -> String {
    format!(
        concat!(
            "<span class=\"stat\">✅ Encontrados: <strong>{count}</strong> resultados</span>\n",
            "<span class=\"stat\">⏱️ Tempo: <strong>{elapsed}ms</strong></span>\n",
            "<span class=\"stat\">📊 Algoritmo: <strong>{label}</strong></span>",
        ),
        count = count,
        elapsed = format_elapsed(elapsed),
        label = escape_html(&algorithm_name(method)),
    )
}

/// Milliseconds with two decimals, e.g. `12.34`.
pub fn format_elapsed(elapsed: Duration) -> String {
    format!("{:.2}", elapsed.as_secs_f64() * 1000.0)
}

/// Error banner shown in place of results.
pub fn error_html(detail: &str) -> String {
    format!(
        "<div class=\"error\">❌ Erro ao realizar busca: {}</div>",
        escape_html(detail)
    )
}

// ---------------------------------------------------------------------------
// Full page
// ---------------------------------------------------------------------------

/// Current contents of the search form.
#[derive(Debug, Clone, Default)]
pub struct SearchForm {
    pub method: String,
    pub query: String,
}

/// Wrap a page snapshot into a complete HTML document with the search form.
pub fn page_document(page: &PageSnapshot, form: &SearchForm) -> String {
    let mut options = String::new();
    for method in SearchMethod::ALL {
        let selected = if form.method == method.as_str() { " selected" } else { "" };
        let _ = writeln!(
            options,
            "      <option value=\"{}\"{selected}>{}</option>",
            method.as_str(),
            method.label()
        );
    }

    let disabled = if page.submit_enabled { "" } else { " disabled" };
    let (info_class, info_html) = match &page.status_html {
        Some(html) => ("results-info show", html.as_str()),
        None => ("results-info", ""),
    };

    format!(
        concat!(
            "<!DOCTYPE html>\n",
            "<html lang=\"pt-BR\">\n",
            "<head>\n",
            "  <meta charset=\"utf-8\">\n",
            "  <title>USED CARS SEARCH</title>\n",
            "</head>\n",
            "<body>\n",
            "  <h1>🚗 USED CARS SEARCH</h1>\n",
            "  <form class=\"search-form\" method=\"get\" action=\"/\">\n",
            "    <select id=\"search-method\" name=\"method\">\n",
            "{options}",
            "    </select>\n",
            "    <input id=\"search-input\" type=\"text\" name=\"q\" value=\"{query}\" placeholder=\"Digite a marca ou o modelo\">\n",
            "    <button id=\"search-btn\" type=\"submit\"{disabled}>Buscar</button>\n",
            "  </form>\n",
            "  <div id=\"results-info\" class=\"{info_class}\">{info_html}</div>\n",
            "  <div id=\"results-container\">{results}</div>\n",
            "</body>\n",
            "</html>\n",
        ),
        options = options,
        query = escape_html(&form.query),
        disabled = disabled,
        info_class = info_class,
        info_html = info_html,
        results = page.results_html,
    )
}
