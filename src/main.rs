//! Scorelens: Student Performance Analytics CLI
//!
//! Loads the student performance dataset (an uploaded CSV or the remote
//! object), then recomputes and prints every dashboard section each time
//! the filter selection changes.

use anyhow::{Context, Result};
use clap::Parser;

use scorelens::cli::{confirm_step, prompt_filters, Cli};
use scorelens::pipeline::{
    FilterSelection, HttpObjectStore, LocalObjectStore, ObjectStore, Session,
};
use scorelens::report::{export_view, render, ExportParams};
use scorelens::utils::{
    create_spinner, finish_with_success, finish_with_warning, init_logging, print_banner,
    print_info, print_source, print_success, print_warning,
};

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    print_banner(env!("CARGO_PKG_VERSION"));

    let upload = match &cli.upload {
        Some(path) => Some(
            std::fs::read(path)
                .with_context(|| format!("Failed to read upload file: {}", path.display()))?,
        ),
        None => None,
    };

    let store: Box<dyn ObjectStore> = match &cli.store_dir {
        Some(dir) => Box::new(LocalObjectStore::new(dir)),
        None => Box::new(HttpObjectStore::new(&cli.endpoint)?),
    };

    let spinner = create_spinner("Loading dataset...");
    let session = match Session::open(
        store,
        cli.location(),
        cli.load_options(),
        cli.analysis_config(),
        upload.as_deref(),
    ) {
        Ok(session) => {
            finish_with_success(&spinner, &format!("Loaded {}", session.source()));
            session
        }
        Err(e) => {
            finish_with_warning(&spinner, "No dataset available");
            print_info("Please upload a data file or ensure remote access to begin analysis.");
            return Err(e.into());
        }
    };

    if let Some(err) = session.upload_error() {
        print_warning(&format!("Error loading uploaded file: {}", err));
    }

    let (rows, columns) = session.dataset().shape();
    print_source(
        &session.source().to_string(),
        &session.config().outcome,
        rows,
        columns,
    );

    let mut selection = cli.filter_selection()?;
    loop {
        if !cli.no_confirm {
            selection = prompt_filters(session.classification(), &selection)?;
        }

        let view = match session.view(&selection, cli.group_by.as_deref()) {
            Ok(view) => view,
            Err(e) if cli.no_confirm => return Err(e.into()),
            Err(e) => {
                print_warning(&format!("{}; filters cleared", e));
                selection = FilterSelection::new();
                continue;
            }
        };

        render(&view, &session.config().outcome, cli.details);

        if let Some(path) = &cli.export {
            let config = session.config();
            let source = session.source().to_string();
            export_view(
                &view,
                path,
                &ExportParams {
                    source: &source,
                    outcome_column: &config.outcome,
                    pass_threshold: config.pass_threshold,
                    insight_threshold: config.insight_threshold,
                },
            )?;
            print_success(&format!("Exported view to {}", path.display()));
        }

        if cli.no_confirm || !confirm_step("Adjust filters?", false)? {
            break;
        }
    }

    Ok(())
}
