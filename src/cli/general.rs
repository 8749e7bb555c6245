//! General commands - `status`, `dashboard` and `advise`.

use crate::{
    cli::Session,
    core::{
        advisor::{CostAdvisor, analyze_costing, format_analysis},
        dashboard::{DashboardSummary, cost_lines, format_cost_line, format_dashboard, mode_label},
        remote::RemoteBackend,
    },
};
use std::fmt::Write as _;

/// Persistence mode and catalog size.
pub fn status<B: RemoteBackend, A>(session: &Session<B, A>) -> String {
    let catalog = &session.catalog;
    let mut out = String::new();
    let _ = writeln!(out, "Mode: {}", mode_label(session.service.is_online()));
    let _ = writeln!(
        out,
        "Remote backend: {}",
        if session.service.has_remote() {
            "configured"
        } else {
            "not configured"
        }
    );
    let _ = writeln!(out, "Components: {}", catalog.components.len());
    let _ = write!(out, "Products: {}", catalog.products.len());
    if catalog.seeded_components || catalog.seeded_products {
        let _ = write!(
            out,
            "\nDefault catalog loaded ({})",
            if catalog.seed_persisted {
                "saved locally"
            } else {
                "not saved"
            }
        );
    }
    out
}

/// Dashboard block followed by one cost line per product.
pub fn dashboard<B: RemoteBackend, A>(session: &Session<B, A>) -> String {
    let catalog = &session.catalog;
    let summary = DashboardSummary::build(&catalog.products, &catalog.components);
    let mut out = format_dashboard(&summary, session.service.is_online());

    let lines = cost_lines(&catalog.products, &catalog.components);
    if !lines.is_empty() {
        out.push_str("\n\nProducts");
        for line in &lines {
            let _ = write!(out, "\n  {}", format_cost_line(line));
        }
    }
    out
}

/// Runs the cost advisor over the working catalog.
pub async fn advise<B: RemoteBackend, A: CostAdvisor>(session: &Session<B, A>) -> String {
    let catalog = &session.catalog;
    match analyze_costing(&session.advisor, &catalog.products, &catalog.components).await {
        Some(result) => format_analysis(&result),
        None => "Add products first to get an analysis.".to_string(),
    }
}
