use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use chrono::Utc;
use comfy_table::{CellAlignment, Table};
use tracing::{debug, info_span};

use grid_catalog::{CatalogRegistry, Category};
use grid_cli::query::{filter_value, sort_state};
use grid_cli::{DirectorySink, FilePreferences, JsonDirStore, Settings};
use grid_export::{ExportFormat, ExportOutcome, ExportRequest, TracingReporter, export_to_sink};
use grid_model::{
    FieldDescriptor, GridError, GridSchema, ResourceStore, ValueKind, format_bytes, format_number,
};
use grid_view::{ColumnVisibility, GridSession, LoadState, count_by, sum_field};

use crate::cli::{ColumnsArgs, ExportArgs, ListArgs, QueryArgs, SummaryArgs};
use crate::render::{
    align_column, apply_table_style, dim_cell, grid_table, header_cell, load_state_line,
    page_footer,
};

/// Fields summarized when `summary` gets no `--by`/`--sum`.
const DEFAULT_SUMMARY_FIELDS: [&str; 2] = ["accountName", "region"];

/// Resolved settings and collaborators for one invocation.
pub struct App {
    pub settings: Settings,
    pub settings_path: PathBuf,
    pub registry: &'static CatalogRegistry,
    pub prefs: FilePreferences,
}

impl App {
    pub fn load(config: Option<PathBuf>, data_dir: Option<PathBuf>) -> Self {
        let settings_path = config.unwrap_or_else(Settings::config_path);
        let mut settings = Settings::load_from(&settings_path);
        if let Some(dir) = data_dir {
            settings.data.dir = dir;
        }
        let prefs = FilePreferences::new(Settings::preferences_path(&settings_path));
        debug!(
            settings = %settings_path.display(),
            data_dir = %settings.data.dir.display(),
            "loaded settings"
        );
        Self {
            settings,
            settings_path,
            registry: CatalogRegistry::shared(),
            prefs,
        }
    }

    fn schema(&self, resource_type: &str) -> Result<Arc<GridSchema>> {
        Ok(self.registry.get(resource_type)?)
    }

    /// Load a grid and apply search, filters and sort.
    fn open_session(&self, query: &QueryArgs) -> Result<GridSession> {
        let schema = self.schema(&query.resource_type)?;
        let span = info_span!("grid", resource_type = %schema.resource_type);
        let _guard = span.enter();

        let store: Arc<dyn ResourceStore> = Arc::new(JsonDirStore::new(&self.settings.data.dir));
        let mut session = GridSession::new(schema, store, &self.prefs, self.settings.grid);
        session.load();
        let timeout = Duration::from_secs(self.settings.data.fetch_timeout_secs);
        if !session.wait(timeout) {
            session.teardown();
            bail!(
                "timed out after {}s loading {}",
                timeout.as_secs(),
                session.schema().resource_type
            );
        }
        if let LoadState::Failed { message } = session.load_state() {
            bail!("{message}");
        }

        if let Some(term) = &query.search {
            session.set_search(term);
        }
        let filters = query
            .filters
            .iter()
            .map(|(key, value)| Ok((key.clone(), filter_value(session.schema(), key, value)?)))
            .collect::<Result<Vec<_>>>()?;
        for (key, value) in filters {
            session.set_filter(key, value);
        }
        if let Some(column) = &query.sort {
            let sort = sort_state(session.schema(), column, query.desc)?;
            session.set_sort(sort);
        }
        Ok(session)
    }
}

fn require_field<'s>(schema: &'s GridSchema, key: &str) -> Result<&'s FieldDescriptor> {
    schema.get(key).ok_or_else(|| {
        GridError::UnknownColumn {
            resource_type: schema.resource_type.clone(),
            key: key.to_string(),
        }
        .into()
    })
}

// =============================================================================
// types
// =============================================================================

pub fn run_types(app: &App) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Type"),
        header_cell("Category"),
        header_cell("Title"),
        header_cell("Columns"),
        header_cell("Filters"),
    ]);
    apply_table_style(&mut table);
    for category in Category::ALL {
        for entry in app.registry.by_category(category) {
            let schema = &entry.schema;
            table.add_row(vec![
                schema.resource_type.clone(),
                category.to_string(),
                schema.title.clone(),
                schema.fields.len().to_string(),
                schema
                    .filters
                    .iter()
                    .map(|filter| filter.key.as_str())
                    .collect::<Vec<_>>()
                    .join(", "),
            ]);
        }
    }
    align_column(&mut table, 3, CellAlignment::Right);
    println!("{table}");
}

// =============================================================================
// list
// =============================================================================

pub fn run_list(app: &App, args: &ListArgs) -> Result<()> {
    let mut session = app.open_session(&args.query)?;

    if let Some(field) = &args.options {
        require_field(session.schema(), field)?;
        for option in session.filter_options(field) {
            println!("{option}");
        }
        return Ok(());
    }

    if let Some(page_size) = args.page_size {
        session.set_page_size(page_size);
    }
    session.go_to_page(args.page);

    let view = session.view(Utc::now());
    if let Some(line) = load_state_line(view.load_state) {
        eprintln!("{line}");
    }
    if view.rows.is_empty() {
        println!("No matching {}.", session.schema().title);
    } else {
        println!("{}", grid_table(&view));
    }
    println!("{}", page_footer(&view));
    Ok(())
}

// =============================================================================
// export
// =============================================================================

pub fn run_export(app: &App, args: &ExportArgs) -> Result<ExportOutcome> {
    let session = app.open_session(&args.query)?;
    let now = Utc::now();
    let records = session.matching_records(now);
    let fields = session.visible_fields();
    let format = args
        .format
        .map_or(app.settings.export.format, ExportFormat::from);
    let sink = DirectorySink::new(
        args.output
            .clone()
            .unwrap_or_else(|| app.settings.export.dir.clone()),
    );

    let request = ExportRequest::new(session.schema(), &fields, &records, format, now);
    let outcome = export_to_sink(&request, &sink, &TracingReporter);
    match &outcome {
        ExportOutcome::Delivered { file_name, rows } => {
            println!(
                "Exported {rows} rows to {}",
                sink.dir().join(file_name).display()
            );
        }
        ExportOutcome::Empty => println!("Nothing to export: no matching records."),
        ExportOutcome::Failed => {}
    }
    Ok(outcome)
}

// =============================================================================
// columns
// =============================================================================

pub fn run_columns(app: &App, args: &ColumnsArgs) -> Result<()> {
    let schema = app.schema(&args.resource_type)?;
    for key in args.show.iter().chain(&args.hide) {
        require_field(&schema, key)?;
    }

    let mut columns = ColumnVisibility::load(&schema, &app.prefs);
    if args.has_changes() {
        columns.begin_edit();
        if args.reset {
            columns = ColumnVisibility::new(&schema);
        }
        if args.all {
            columns.select_all();
        }
        if args.none {
            columns.deselect_all();
        }
        for key in &args.show {
            columns.show(key);
        }
        for key in &args.hide {
            if columns.is_required(key) {
                eprintln!("note: '{key}' is required and stays visible");
            }
            columns.hide(key);
        }
        columns.apply(&app.prefs);
    }

    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Column"),
        header_cell("Label"),
        header_cell("Kind"),
        header_cell("Visible"),
    ]);
    apply_table_style(&mut table);
    for field in &schema.fields {
        let visible = if columns.is_required(&field.key) {
            dim_cell("required")
        } else if columns.is_visible(&field.key) {
            comfy_table::Cell::new("yes")
        } else {
            dim_cell("no")
        };
        table.add_row(vec![
            comfy_table::Cell::new(&field.key),
            comfy_table::Cell::new(&field.label),
            dim_cell(field.kind.name()),
            visible,
        ]);
    }
    println!("{table}");
    Ok(())
}

// =============================================================================
// summary
// =============================================================================

pub fn run_summary(app: &App, args: &SummaryArgs) -> Result<()> {
    let session = app.open_session(&args.query)?;
    let schema = session.schema();
    let records = session.matching_records(Utc::now());
    println!("{} matching {}", records.len(), schema.title);

    let by: Vec<&str> = if args.by.is_empty() && args.sum.is_empty() {
        DEFAULT_SUMMARY_FIELDS
            .into_iter()
            .filter(|key| schema.has_field(key))
            .collect()
    } else {
        args.by.iter().map(String::as_str).collect()
    };

    for key in by {
        let field = require_field(schema, key)?;
        let counts = count_by(records.iter().copied(), key, args.top);
        let mut table = Table::new();
        table.set_header(vec![header_cell(&field.label), header_cell("Count")]);
        apply_table_style(&mut table);
        for count in counts {
            table.add_row(vec![count.value, count.count.to_string()]);
        }
        align_column(&mut table, 1, CellAlignment::Right);
        println!("{table}");
    }

    if !args.sum.is_empty() {
        let mut table = Table::new();
        table.set_header(vec![
            header_cell("Field"),
            header_cell("Total"),
            header_cell("Counted"),
            header_cell("Skipped"),
        ]);
        apply_table_style(&mut table);
        for key in &args.sum {
            let field = require_field(schema, key)?;
            let sum = sum_field(records.iter().copied(), key);
            let total = match field.kind {
                ValueKind::ByteSize => format_bytes(sum.total.max(0.0).round() as u64),
                _ => format_number(sum.total),
            };
            table.add_row(vec![
                field.label.clone(),
                total,
                sum.counted.to_string(),
                sum.skipped.to_string(),
            ]);
        }
        for index in 1..=3 {
            align_column(&mut table, index, CellAlignment::Right);
        }
        println!("{table}");
    }
    Ok(())
}

// =============================================================================
// config
// =============================================================================

pub fn run_config(app: &App, init: bool) -> Result<()> {
    if init && !app.settings_path.exists() {
        app.settings
            .save_to(&app.settings_path)
            .with_context(|| format!("initialize {}", app.settings_path.display()))?;
        println!("Wrote {}", app.settings_path.display());
    }
    println!("# settings:    {}", app.settings_path.display());
    println!("# preferences: {}", app.prefs.path().display());
    let content = toml::to_string_pretty(&app.settings).context("serialize settings")?;
    print!("{content}");
    Ok(())
}
