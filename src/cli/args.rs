//! Command-line argument definitions using clap derive

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Top-level command line.
#[derive(Parser, Debug)]
#[command(name = "jewel-cost")]
#[command(author, version, about = "Component price tracking and recipe costing for jewelry workshops")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Command to run; shows the dashboard when omitted
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Available commands.
#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Show persistence mode and catalog size
    Status,

    /// Show catalog value and per-product costs
    Dashboard,

    /// Component management
    #[command(subcommand)]
    Components(ComponentCommand),

    /// Product management
    #[command(subcommand)]
    Products(ProductCommand),

    /// Ask the cost advisor for an analysis of the catalog
    Advise,
}

/// Component subcommands.
#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum ComponentCommand {
    /// List components
    List {
        /// Only show components whose name or category contains this text
        #[arg(long, short = 's')]
        search: Option<String>,
    },

    /// Add a component
    Add {
        /// Component name
        #[arg(long, short = 'n')]
        name: String,

        /// Unit price
        #[arg(long, short = 'p')]
        price: f64,

        /// Unit of measure (pcs, meter, gram, ...)
        #[arg(long, short = 'u', default_value = "pcs")]
        unit: String,

        /// Category
        #[arg(long, short = 'c', default_value = "General")]
        category: String,
    },

    /// Change the unit price of a component
    SetPrice {
        /// Component id
        id: String,

        /// New unit price
        #[arg(allow_negative_numbers = true)]
        price: f64,
    },

    /// Delete a component (products that use it keep their recipe lines)
    Delete {
        /// Component id
        id: String,
    },

    /// Import components from a CSV file with a Name,Price,Unit,Category header
    Import {
        /// CSV file to import
        path: PathBuf,
    },

    /// Print or write the component import template
    Template {
        /// Write the template to this file instead of printing it
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },
}

/// Product subcommands.
#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum ProductCommand {
    /// List products with their costs
    List,

    /// Add a product
    Add {
        /// Product name
        #[arg(long, short = 'n')]
        name: String,

        /// Stock keeping unit
        #[arg(long, default_value = "")]
        sku: String,

        /// Labor charge per unit
        #[arg(long, short = 'm', default_value_t = 0.0)]
        making_charges: f64,

        /// Recipe line as `component_id:quantity` (repeatable; quantity defaults to 1)
        #[arg(long = "component", short = 'c', value_name = "ID:QTY")]
        components: Vec<String>,
    },

    /// Delete a product
    Delete {
        /// Product id
        id: String,
    },

    /// Print or write the product import template
    Template {
        /// Write the template to this file instead of printing it
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },
}
