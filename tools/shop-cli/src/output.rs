//! Output formatting for the CLI.

use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use shop_commerce::cart::OrderTotals;
use shop_commerce::checkout::{CheckoutStep, Transition};

/// Output handler for CLI messages.
#[derive(Clone)]
pub struct Output {
    verbose: bool,
    json: bool,
}

impl Output {
    /// Create a new output handler.
    pub fn new(verbose: bool, json: bool) -> Self {
        Self { verbose, json }
    }

    /// Print an info message.
    pub fn info(&self, msg: &str) {
        if self.json {
            return;
        }
        println!("{} {}", style("ℹ").blue(), msg);
    }

    /// Print a success message.
    pub fn success(&self, msg: &str) {
        if self.json {
            return;
        }
        println!("{} {}", style("✓").green(), msg);
    }

    /// Print a warning message.
    pub fn warn(&self, msg: &str) {
        if self.json {
            return;
        }
        eprintln!("{} {}", style("⚠").yellow(), msg);
    }

    /// Print an error message.
    pub fn error(&self, msg: &str) {
        if self.json {
            eprintln!("{}", serde_json::json!({ "error": msg }));
            return;
        }
        eprintln!("{} {}", style("✗").red(), style(msg).red());
    }

    /// Print a debug message (only in verbose mode).
    pub fn debug(&self, msg: &str) {
        if !self.verbose || self.json {
            return;
        }
        eprintln!("{} {}", style("→").dim(), style(msg).dim());
    }

    /// Print a header/title.
    pub fn header(&self, msg: &str) {
        if self.json {
            return;
        }
        println!("\n{}", style(msg).bold().underlined());
    }

    /// Print JSON output.
    pub fn json<T: serde::Serialize>(&self, value: &T) {
        if let Ok(json) = serde_json::to_string_pretty(value) {
            println!("{}", json);
        }
    }

    /// Print a key-value pair.
    pub fn kv(&self, key: &str, value: &str) {
        if self.json {
            return;
        }
        println!("  {}: {}", style(key).dim(), value);
    }

    /// Print a table row.
    pub fn table_row(&self, cols: &[&str], widths: &[usize]) {
        if self.json {
            return;
        }
        let formatted: Vec<String> = cols
            .iter()
            .zip(widths.iter())
            .map(|(col, width)| format!("{:width$}", col, width = width))
            .collect();
        println!("  {}", formatted.join("  "));
    }

    /// Print the order summary box of the cart and review pages.
    pub fn totals(&self, totals: &OrderTotals) {
        if self.json {
            return;
        }
        self.kv("Items", &totals.items_price.display());
        let shipping = if totals.is_free_shipping() {
            style("Free").green().to_string()
        } else {
            totals.shipping_price.display()
        };
        self.kv("Shipping", &shipping);
        self.kv("Tax", &totals.tax_price.display());
        println!(
            "  {}: {}",
            style("Total").bold(),
            style(totals.total_price.display()).bold()
        );
    }

    /// Explain a guard that did not let the shopper through.
    pub fn redirect(&self, transition: &Transition) {
        match transition {
            Transition::Allowed { .. } => {}
            Transition::Login { .. } => {
                self.warn("Please sign in first: shop login <email>");
                self.debug(&format!("redirect {}", transition.location()));
            }
            Transition::Redirect { step } => {
                self.warn(&format!("{} first", step_hint(*step)));
                self.debug(&format!("redirect {}", transition.location()));
            }
        }
    }

    /// Create a spinner for indeterminate progress.
    pub fn spinner(&self, msg: &str) -> ProgressBar {
        if self.json {
            return ProgressBar::hidden();
        }

        let pb = ProgressBar::new_spinner();
        if let Ok(template) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
            pb.set_style(template);
        }
        pb.set_message(msg.to_string());
        pb.enable_steady_tick(std::time::Duration::from_millis(100));
        pb
    }

    /// Check if JSON mode is enabled.
    pub fn is_json(&self) -> bool {
        self.json
    }
}

/// What the shopper has to do on a step before moving on.
pub fn step_hint(step: CheckoutStep) -> &'static str {
    match step {
        CheckoutStep::Cart => "Add something to the cart (shop cart add <product-id>)",
        CheckoutStep::Shipping => {
            "Enter a complete shipping address (shop checkout shipping <address> <city> <postal-code> <country>)"
        }
        CheckoutStep::Payment => "Choose a payment method (shop checkout payment [METHOD])",
        CheckoutStep::Review => "Review the order (shop checkout review)",
        CheckoutStep::Submitted => "Place a new order",
    }
}

/// Checkout progress line, e.g. `Cart > Shipping > [Payment] > Place Order`.
pub fn progress_line(current: CheckoutStep) -> String {
    [
        CheckoutStep::Cart,
        CheckoutStep::Shipping,
        CheckoutStep::Payment,
        CheckoutStep::Review,
    ]
    .into_iter()
    .map(|step| {
        if step == current {
            style(format!("[{}]", step.display_name())).bold().to_string()
        } else if step.number() < current.number() {
            style(step.display_name()).green().to_string()
        } else {
            style(step.display_name()).dim().to_string()
        }
    })
    .collect::<Vec<_>>()
    .join(" > ")
}
