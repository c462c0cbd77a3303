//! CLI command implementations.

pub mod auth;
pub mod cart;
pub mod checkout;
pub mod config;

use clap::{Args, Subcommand};

/// Arguments for the cart command.
#[derive(Args)]
pub struct CartArgs {
    #[command(subcommand)]
    pub command: Option<CartCommand>,
}

#[derive(Subcommand)]
pub enum CartCommand {
    /// Show the cart with its totals.
    Show,
    /// Add a product, or change the quantity of one already in the cart.
    Add {
        /// Product ID.
        product_id: String,

        /// Quantity; clamped to what is in stock.
        #[arg(short, long, default_value_t = 1, allow_negative_numbers = true)]
        qty: i64,
    },
    /// Remove a product from the cart.
    Remove {
        /// Product ID.
        product_id: String,
    },
    /// Empty the cart and forget the shipping address and payment method.
    Clear {
        /// Skip confirmation.
        #[arg(short, long)]
        yes: bool,
    },
}

/// Arguments for the login command.
#[derive(Args)]
pub struct LoginArgs {
    /// Account email.
    pub email: String,

    /// Password (prompted for when omitted).
    #[arg(short, long)]
    pub password: Option<String>,
}

/// Arguments for the whoami command.
#[derive(Args)]
pub struct WhoamiArgs {
    /// Ask the backend whether the session is still accepted.
    #[arg(long)]
    pub check: bool,
}

/// Arguments for the checkout command.
#[derive(Args)]
pub struct CheckoutArgs {
    #[command(subcommand)]
    pub command: CheckoutCommand,
}

#[derive(Subcommand)]
pub enum CheckoutCommand {
    /// Enter the shipping address; without arguments, show the saved one.
    Shipping {
        /// Street address.
        address: Option<String>,
        city: Option<String>,
        postal_code: Option<String>,
        country: Option<String>,
    },
    /// Choose the payment method.
    Payment {
        /// Method identifier.
        #[arg(default_value = "COD")]
        method: String,
    },
    /// Review the order before placing it.
    Review,
    /// Place the order.
    Place {
        /// Skip confirmation prompt.
        #[arg(short, long)]
        yes: bool,
    },
}

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration.
    Show,
    /// Initialize a new config file.
    Init {
        /// Force overwrite existing config.
        #[arg(short, long)]
        force: bool,
    },
}
