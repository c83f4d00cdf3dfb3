//! Table state and the derived view over the product collection.
//!
//! The view is recomputed from scratch on every call to [`derive_view`]:
//! filter on name, stable sort on the active column, then slice the page.

use std::sync::Arc;

use crate::filter::filter_dynamic;
use crate::sort::{sort_dynamic, SortValue};
use crate::store::Rows;
use crate::structs::Product;

const FILTERABLE_FIELDS: &[&str] = &["name"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    /// Display-only row number.
    Index,
    Name,
    Quantity,
    Price,
    Actions,
}

impl Column {
    pub const ALL: [Column; 5] = [
        Column::Index,
        Column::Name,
        Column::Quantity,
        Column::Price,
        Column::Actions,
    ];

    pub fn header(self) -> &'static str {
        match self {
            Column::Index => "#",
            Column::Name => "Product Name",
            Column::Quantity => "Quantity",
            Column::Price => "Price",
            Column::Actions => "Action Buttons",
        }
    }

    pub fn is_sortable(self) -> bool {
        matches!(self, Column::Name | Column::Quantity | Column::Price)
    }

    fn sort_value(self, product: &Product) -> SortValue<'_> {
        match self {
            Column::Quantity => SortValue::Number(product.quantity as f64),
            Column::Price => SortValue::Number(product.price),
            _ => SortValue::Text(&product.name),
        }
    }
}

fn field_value(product: &Product, field: &str) -> Option<String> {
    match field {
        "name" => Some(product.name.clone()),
        _ => None,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PageSize {
    #[default]
    Five,
    Ten,
    Twenty,
}

impl PageSize {
    pub const ALL: [PageSize; 3] = [PageSize::Five, PageSize::Ten, PageSize::Twenty];

    pub fn get(self) -> usize {
        match self {
            PageSize::Five => 5,
            PageSize::Ten => 10,
            PageSize::Twenty => 20,
        }
    }

    /// 5 -> 10 -> 20 -> 5
    pub fn next(self) -> Self {
        match self {
            PageSize::Five => PageSize::Ten,
            PageSize::Ten => PageSize::Twenty,
            PageSize::Twenty => PageSize::Five,
        }
    }
}

impl TryFrom<usize> for PageSize {
    type Error = String;

    fn try_from(n: usize) -> Result<Self, Self::Error> {
        PageSize::ALL
            .into_iter()
            .find(|size| size.get() == n)
            .ok_or_else(|| format!("page size must be one of 5, 10, 20 (got {n})"))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortBy {
    pub column: Column,
    pub descending: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TableState {
    pub global_filter: Option<String>,
    pub sort: Option<SortBy>,
    pub page_index: usize,
    pub page_size: PageSize,
}

impl TableState {
    pub fn with_page_size(page_size: PageSize) -> Self {
        Self {
            page_size,
            ..Self::default()
        }
    }
}

/// `ceil(count / size)`, never less than one page.
pub fn page_count(filtered_count: usize, page_size: PageSize) -> usize {
    filtered_count.div_ceil(page_size.get()).max(1)
}

#[derive(Debug, Clone, PartialEq)]
pub struct DisplayRow {
    /// Value of the `#` column.
    pub number: usize,
    pub product: Product,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableView {
    pub rows: Vec<DisplayRow>,
    pub page_index: usize,
    pub page_count: usize,
    pub page_size: PageSize,
    pub filtered_count: usize,
    pub sort: Option<SortBy>,
}

impl TableView {
    pub fn can_previous_page(&self) -> bool {
        self.page_index > 0
    }

    pub fn can_next_page(&self) -> bool {
        self.page_index + 1 < self.page_count
    }
}

fn filtered<'a>(rows: &'a [Product], filter: Option<&str>) -> Vec<&'a Product> {
    match filter {
        Some(text) => filter_dynamic(rows, text, FILTERABLE_FIELDS, field_value),
        None => rows.iter().collect(),
    }
}

/// Pure derivation of the visible page. The page index is clamped here as
/// well, so a collection that shrank since the state was last updated still
/// yields a valid page.
#[tracing::instrument(level = "debug", skip_all, fields(row_count = rows.len()))]
pub fn derive_view(rows: &[Product], state: &TableState) -> TableView {
    let mut matching = filtered(rows, state.global_filter.as_deref());

    if let Some(sort) = state.sort {
        sort_dynamic(&mut matching, sort.descending, |p| {
            sort.column.sort_value(p)
        });
    }

    let filtered_count = matching.len();
    let page_count = page_count(filtered_count, state.page_size);
    let page_index = state.page_index.min(page_count - 1);
    let size = state.page_size.get();
    let start = page_index * size;

    let rows = matching
        .into_iter()
        .skip(start)
        .take(size)
        .enumerate()
        .map(|(position, product)| DisplayRow {
            number: start + position + 1,
            product: product.clone(),
        })
        .collect();

    TableView {
        rows,
        page_index,
        page_count,
        page_size: state.page_size,
        filtered_count,
        sort: state.sort,
    }
}

/// Owns the collection currently shown and the transient table state.
#[derive(Debug, Clone)]
pub struct ProductTable {
    rows: Rows,
    state: TableState,
}

impl Default for ProductTable {
    fn default() -> Self {
        Self::new(TableState::default())
    }
}

impl ProductTable {
    pub fn new(state: TableState) -> Self {
        Self {
            rows: Arc::from(Vec::new()),
            state,
        }
    }

    pub fn state(&self) -> &TableState {
        &self.state
    }

    pub fn rows(&self) -> &Rows {
        &self.rows
    }

    pub fn view(&self) -> TableView {
        derive_view(&self.rows, &self.state)
    }

    pub fn filtered_count(&self) -> usize {
        filtered(&self.rows, self.state.global_filter.as_deref()).len()
    }

    pub fn page_count(&self) -> usize {
        page_count(self.filtered_count(), self.state.page_size)
    }

    fn clamp_page(&mut self) {
        self.state.page_index = self.state.page_index.min(self.page_count() - 1);
    }

    /// Swaps in a new collection, e.g. after the cache revalidated.
    pub fn set_data(&mut self, rows: Rows) {
        self.rows = rows;
        self.clamp_page();
    }

    /// Empty text clears the filter. Jumps back to the first page when the
    /// current page no longer has any rows.
    pub fn set_global_filter(&mut self, text: Option<String>) {
        self.state.global_filter = text.filter(|t| !t.is_empty());
        if self.state.page_index >= self.page_count() {
            self.state.page_index = 0;
        }
    }

    /// unsorted -> ascending -> descending -> unsorted, one column at a time.
    pub fn toggle_sort(&mut self, column: Column) {
        if !column.is_sortable() {
            return;
        }
        self.state.sort = match self.state.sort {
            Some(SortBy {
                column: current,
                descending: false,
            }) if current == column => Some(SortBy {
                column,
                descending: true,
            }),
            Some(SortBy {
                column: current,
                descending: true,
            }) if current == column => None,
            _ => Some(SortBy {
                column,
                descending: false,
            }),
        };
    }

    pub fn set_page_size(&mut self, page_size: PageSize) {
        self.state.page_size = page_size;
        self.clamp_page();
    }

    pub fn goto_page(&mut self, index: usize) {
        self.state.page_index = index.min(self.page_count() - 1);
    }

    pub fn first_page(&mut self) {
        self.state.page_index = 0;
    }

    pub fn last_page(&mut self) {
        self.state.page_index = self.page_count() - 1;
    }

    pub fn next_page(&mut self) {
        if self.state.page_index + 1 < self.page_count() {
            self.state.page_index += 1;
        }
    }

    pub fn previous_page(&mut self) {
        self.state.page_index = self.state.page_index.saturating_sub(1);
    }
}
