//! Terminal rendering of grid pages and summaries with `comfy-table`.

use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{
    Attribute, Cell, CellAlignment, Color, ColumnConstraint, ContentArrangement, Table, Width,
};
use grid_model::{FieldDescriptor, ValueKind};
use grid_view::{GridView, LoadState};

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
}

pub fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

pub fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}

pub fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn is_numeric(field: &FieldDescriptor) -> bool {
    matches!(field.kind, ValueKind::Number | ValueKind::ByteSize)
}

/// Table for the rows of the current page.
pub fn grid_table(view: &GridView<'_>) -> Table {
    let mut table = Table::new();
    table.set_header(
        view.columns
            .iter()
            .map(|field| header_cell(&field.label))
            .collect::<Vec<_>>(),
    );
    apply_table_style(&mut table);

    for row in view.cells() {
        table.add_row(row.into_iter().map(|cell| {
            if cell.is_empty() {
                dim_cell("-")
            } else {
                Cell::new(cell)
            }
        }));
    }

    let constraints: Vec<ColumnConstraint> = view
        .columns
        .iter()
        .map(|field| match field.min_width {
            Some(width) => ColumnConstraint::LowerBoundary(Width::Fixed(width)),
            None => ColumnConstraint::ContentWidth,
        })
        .collect();
    table.set_constraints(constraints);

    for (index, field) in view.columns.iter().enumerate() {
        if is_numeric(field) {
            align_column(&mut table, index, CellAlignment::Right);
        }
    }
    table
}

/// `Page 2 of 3 (120 rows)` plus a `1 [2] 3` page strip.
pub fn page_footer(view: &GridView<'_>) -> String {
    let strip: Vec<String> = view
        .page_strip
        .iter()
        .map(|page| {
            if *page == view.current_page {
                format!("[{page}]")
            } else {
                page.to_string()
            }
        })
        .collect();
    let mut footer = format!(
        "Page {} of {} ({} rows",
        view.current_page, view.total_pages, view.matching_rows
    );
    if view.matching_rows != view.loaded_rows {
        footer.push_str(&format!(", {} loaded", view.loaded_rows));
    }
    footer.push(')');
    if strip.len() > 1 {
        footer.push_str("  ");
        footer.push_str(&strip.join(" "));
    }
    footer
}

pub fn load_state_line(state: &LoadState) -> Option<String> {
    match state {
        LoadState::Failed { message } => Some(format!("warning: showing stale data ({message})")),
        _ => None,
    }
}
