//! Product commands - list, add, delete and template.

use crate::{
    cli::{ProductCommand, Session, components::template_output, saved_to},
    core::{
        component::find_component,
        dashboard::{cost_lines, format_cost_line, format_currency},
        import::TemplateKind,
        product::{RecipeBuilder, new_product, parse_recipe_line},
        remote::RemoteBackend,
    },
    errors::{Error, Result},
};
use std::fmt::Write as _;

/// Dispatches a product subcommand.
pub async fn run<B: RemoteBackend, A>(
    session: &mut Session<B, A>,
    command: ProductCommand,
) -> Result<String> {
    match command {
        ProductCommand::List => Ok(list(session)),
        ProductCommand::Add {
            name,
            sku,
            making_charges,
            components,
        } => add(session, &name, &sku, making_charges, &components).await,
        ProductCommand::Delete { id } => delete(session, &id).await,
        ProductCommand::Template { output } => {
            template_output(TemplateKind::Product, output.as_deref())
        }
    }
}

fn list<B, A>(session: &Session<B, A>) -> String {
    let lines = cost_lines(&session.catalog.products, &session.catalog.components);
    if lines.is_empty() {
        return "No products yet.".to_string();
    }

    let mut out = format!("Products ({})", lines.len());
    for line in &lines {
        let _ = write!(out, "\n  {}", format_cost_line(line));
    }
    out
}

/// Builds the recipe from `id:qty` arguments; repeated ids add up.
fn build_recipe<B, A>(session: &Session<B, A>, specs: &[String]) -> Result<RecipeBuilder> {
    let mut recipe = RecipeBuilder::new();
    for spec in specs {
        let line = parse_recipe_line(spec)?;
        if find_component(&session.catalog.components, &line.component_id).is_none() {
            return Err(Error::ComponentNotFound {
                id: line.component_id,
            });
        }
        let existing = recipe
            .lines()
            .iter()
            .find(|l| l.component_id == line.component_id)
            .map_or(0.0, |l| l.quantity);
        recipe.set_quantity(&line.component_id, existing + line.quantity);
    }
    Ok(recipe)
}

async fn add<B: RemoteBackend, A>(
    session: &mut Session<B, A>,
    name: &str,
    sku: &str,
    making_charges: f64,
    specs: &[String],
) -> Result<String> {
    let recipe = build_recipe(session, specs)?;
    let estimate = recipe.estimate(&session.catalog.components, making_charges);
    let product = new_product(name, sku, making_charges, recipe.into_lines())?;

    let served = session.service.add_product_served(product).await?;
    let where_to = saved_to(&served);
    let product = served.into_inner();

    let reply = format!(
        "✅ Added {} - total {} (material {}, making {}) id: {} ({})",
        product.name,
        format_currency(estimate.total_cost),
        format_currency(estimate.material_cost),
        format_currency(estimate.making_charges),
        product.id,
        where_to
    );
    session.catalog.products.push(product);
    Ok(reply)
}

async fn delete<B: RemoteBackend, A>(session: &mut Session<B, A>, id: &str) -> Result<String> {
    let name = session
        .catalog
        .products
        .iter()
        .find(|p| p.id == id)
        .map(|p| p.name.clone())
        .ok_or_else(|| Error::ProductNotFound { id: id.to_string() })?;
    session.ensure_product_saved(id, &name)?;

    let served = session.service.delete_product_served(id).await?;
    session.catalog.products.retain(|p| p.id != id);
    Ok(format!("🗑️ Deleted product {name} ({})", saved_to(&served)))
}
