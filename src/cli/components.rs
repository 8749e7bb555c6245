//! Component commands - list, add, set-price, delete, import and template.

use crate::{
    cli::{ComponentCommand, Session, saved_to},
    core::{
        component::{find_component, new_component, search_components, with_price},
        dashboard::format_currency,
        import::{TemplateKind, import_components, template, write_template},
        remote::RemoteBackend,
    },
    errors::{Error, Result},
    models::Component,
};
use std::fmt::Write as _;
use std::path::Path;
use tracing::info;

/// Dispatches a component subcommand.
pub async fn run<B: RemoteBackend, A>(
    session: &mut Session<B, A>,
    command: ComponentCommand,
) -> Result<String> {
    match command {
        ComponentCommand::List { search } => Ok(list(session, search.as_deref().unwrap_or(""))),
        ComponentCommand::Add {
            name,
            price,
            unit,
            category,
        } => add(session, &name, price, &unit, &category).await,
        ComponentCommand::SetPrice { id, price } => set_price(session, &id, price).await,
        ComponentCommand::Delete { id } => delete(session, &id).await,
        ComponentCommand::Import { path } => import(session, &path).await,
        ComponentCommand::Template { output } => {
            template_output(TemplateKind::Component, output.as_deref())
        }
    }
}

/// One listing line, e.g. `Crystal Bead 4mm - ₹0.50/pcs [Beads] id: 2`.
#[must_use]
pub fn format_component(component: &Component) -> String {
    format!(
        "{} - {}/{} [{}] id: {}",
        component.name,
        format_currency(component.price),
        component.unit,
        component.category,
        component.id
    )
}

fn list<B, A>(session: &Session<B, A>, term: &str) -> String {
    let matches = search_components(&session.catalog.components, term);
    if matches.is_empty() {
        return "No components found.".to_string();
    }

    let mut out = format!("Components ({})", matches.len());
    for component in matches {
        let _ = write!(out, "\n  {}", format_component(component));
    }
    out
}

async fn add<B: RemoteBackend, A>(
    session: &mut Session<B, A>,
    name: &str,
    price: f64,
    unit: &str,
    category: &str,
) -> Result<String> {
    let component = new_component(name, price, unit, category)?;
    let served = session.service.add_component_served(component).await?;
    let where_to = saved_to(&served);
    let component = served.into_inner();

    let reply = format!("✅ Added {} ({})", format_component(&component), where_to);
    session.catalog.components.push(component);
    Ok(reply)
}

async fn set_price<B: RemoteBackend, A>(
    session: &mut Session<B, A>,
    id: &str,
    price: f64,
) -> Result<String> {
    let current = find_component(&session.catalog.components, id).ok_or_else(|| {
        Error::ComponentNotFound { id: id.to_string() }
    })?;
    session.ensure_component_saved(id, &current.name)?;
    let old_price = current.price;
    let updated = with_price(current, price)?;

    let served = session.service.update_component_served(updated).await?;
    let where_to = saved_to(&served);
    let updated = served.into_inner();

    let reply = format!(
        "✅ {} price changed from {} to {} ({})",
        updated.name,
        format_currency(old_price),
        format_currency(updated.price),
        where_to
    );
    if let Some(slot) = session
        .catalog
        .components
        .iter_mut()
        .find(|c| c.id == updated.id)
    {
        *slot = updated;
    }
    Ok(reply)
}

async fn delete<B: RemoteBackend, A>(session: &mut Session<B, A>, id: &str) -> Result<String> {
    let name = find_component(&session.catalog.components, id)
        .map(|c| c.name.clone())
        .ok_or_else(|| Error::ComponentNotFound { id: id.to_string() })?;
    session.ensure_component_saved(id, &name)?;

    let served = session.service.delete_component_served(id).await?;
    session.catalog.components.retain(|c| c.id != id);

    let still_used = session
        .catalog
        .products
        .iter()
        .filter(|p| p.components.iter().any(|line| line.component_id == id))
        .count();

    let mut reply = format!("🗑️ Deleted component {name} ({})", saved_to(&served));
    if still_used > 0 {
        let _ = write!(
            reply,
            "\n⚠️ {still_used} product(s) still list it; it now adds nothing to their cost"
        );
    }
    Ok(reply)
}

async fn import<B: RemoteBackend, A>(session: &mut Session<B, A>, path: &Path) -> Result<String> {
    let imported = import_components(&session.service, path).await?;
    info!("Imported {} components from {:?}", imported.len(), path);
    let count = imported.len();
    session.catalog.components.extend(imported);
    Ok(format!("✅ Imported {count} components"))
}

/// Prints a template, or writes it to `output` when given.
pub(crate) fn template_output(kind: TemplateKind, output: Option<&Path>) -> Result<String> {
    match output {
        Some(path) => {
            let file = std::fs::File::create(path)?;
            write_template(file, kind)?;
            Ok(format!("Template written to {}", path.display()))
        }
        None => template(kind),
    }
}
