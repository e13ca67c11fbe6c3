use crate::config::{PipelineConfig, TableLayout, UniqueCodePolicy};
use crate::models::StockRecord;
use crate::service::normalize::parse_digits;
use scraper::{ElementRef, Html, Selector};
use tracing::debug;

/// Parser settings taken from the pipeline config
#[derive(Debug, Clone)]
pub struct ParseOptions {
    pub layout: TableLayout,
    pub unique_code_policy: UniqueCodePolicy,
    pub discontinued_markers: Vec<String>,
}

impl From<&PipelineConfig> for ParseOptions {
    fn from(cfg: &PipelineConfig) -> Self {
        Self {
            layout: cfg.table_layout.clone(),
            unique_code_policy: cfg.unique_code_policy,
            discontinued_markers: cfg.discontinued_markers.clone(),
        }
    }
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self::from(&PipelineConfig::default())
    }
}

/// Records plus what was skipped along the way
#[derive(Debug, Clone, Default)]
pub struct ParseOutcome {
    pub records: Vec<StockRecord>,
    pub malformed: usize,
    pub discontinued: usize,
    pub missing_code: usize,
}

fn selector(css: &'static str) -> Selector {
    Selector::parse(css).expect("static selector")
}

/// Parse a stock-list document into records, in row order.
/// A document without table rows (login page, empty body) yields nothing.
pub fn parse_stock_document(document: &str, options: &ParseOptions) -> Vec<StockRecord> {
    parse_stock_table(document, options).records
}

pub fn parse_stock_table(document: &str, options: &ParseOptions) -> ParseOutcome {
    let mut outcome = ParseOutcome::default();
    if document.trim().is_empty() {
        return outcome;
    }

    let html = Html::parse_document(document);
    let row_selector = selector("tr");
    let input_selector = selector("input");
    let layout = &options.layout;

    for (row_idx, row) in html.select(&row_selector).enumerate() {
        // direct <td> children only, nested tables stay out
        let cells: Vec<ElementRef> = row
            .children()
            .filter_map(ElementRef::wrap)
            .filter(|el| el.value().name() == "td")
            .collect();

        if cells.len() < layout.min_columns {
            debug!(
                "Skipping malformed row {}: {} cells, need {}",
                row_idx,
                cells.len(),
                layout.min_columns
            );
            outcome.malformed += 1;
            continue;
        }

        let value = |idx: usize| -> String {
            cells
                .get(idx)
                .map(|cell| cell_value(cell, &input_selector))
                .unwrap_or_default()
        };

        let discontinued = is_discontinued(&cells, &options.discontinued_markers);
        let record = StockRecord {
            brand: value(layout.brand),
            model: value(layout.model),
            internal_code: value(layout.internal_code),
            size: value(layout.size),
            unique_code: value(layout.unique_code),
            supply_price: parse_digits(&value(layout.supply_price)),
            stock: parse_digits(&value(layout.stock)),
            discontinued,
        };

        if record.discontinued {
            outcome.discontinued += 1;
            continue;
        }
        if options.unique_code_policy == UniqueCodePolicy::RequireCode && !record.has_unique_code() {
            outcome.missing_code += 1;
            continue;
        }
        outcome.records.push(record);
    }

    debug!(
        "Parsed {} stock rows ({} malformed, {} discontinued, {} without code)",
        outcome.records.len(),
        outcome.malformed,
        outcome.discontinued,
        outcome.missing_code
    );
    outcome
}

/// Input's current value when the cell holds one, else the cell text
fn cell_value(cell: &ElementRef, input_selector: &Selector) -> String {
    if let Some(value) = cell
        .select(input_selector)
        .next()
        .and_then(|input| input.value().attr("value"))
    {
        return value.trim().to_string();
    }
    collapse_ws(&cell.text().collect::<String>())
}

fn collapse_ws(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Status lives in the last or second-to-last column
fn is_discontinued(cells: &[ElementRef], markers: &[String]) -> bool {
    cells.iter().rev().take(2).any(|cell| {
        let text = cell.text().collect::<String>().to_lowercase();
        markers
            .iter()
            .any(|marker| !marker.is_empty() && text.contains(&marker.to_lowercase()))
    })
}
